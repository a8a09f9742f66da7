//! # Buzzer Quiz Library
//!
//! This library provides the game logic behind a live trivia session played
//! with physical buzzers. It keeps track of the three actors taking part (the
//! buzzer unit, the audience display and the operator control surface),
//! drives the session through its steps, decides which team buzzed first and
//! applies the operator's judgments to team scores.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
use serde::{Deserialize, Serialize};

pub mod actors;
pub mod answers;
pub mod config;
pub mod constants;
pub mod game;
pub mod names;
pub mod questions;
pub mod session;
pub mod step;
pub mod teams;

/// Messages sent to the display and control screens
///
/// Each variant corresponds to one capability of a screen. Both screens
/// receive the same gameplay updates; rejections and source failures only go
/// to the actor concerned.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum UpdateMessage {
    /// Which actors are currently connected
    SetActors(actors::Presence),
    /// The session moved to a new step
    SetStep(step::Step),
    /// The question order selected by the operator
    SetMode(questions::Mode),
    /// The full question list in asking order
    SetQuestions(Vec<questions::Question>),
    /// The full team roster in controller order
    SetTeams(Vec<teams::Team>),
    /// One team changed
    UpdateTeam(teams::Team),
    /// A team was admitted during the activation step
    ActivateTeam {
        /// The admitted team
        team: teams::Team,
        /// Whether the screen should highlight the team
        flashing: bool,
    },
    /// A controller buzzed, or its buzz was abandoned
    SetAnswered {
        /// The controller concerned
        controller: teams::ControllerIndex,
        /// Whether the controller is waiting for a judgment
        answered: bool,
    },
    /// The active question, sent when resynchronizing a screen
    SetQuestion(questions::Question),
    /// A question was started with a fresh answer record
    StartQuestion(usize),
    /// The active question continues without resetting its answers
    ContinueQuestion(usize),
    /// The operator judged the pending buzz
    ValidateAnswer(answers::ValidationResult),
    /// The game is over and scores are final
    FinishGame,
    /// A command from this actor was refused
    Rejected(game::Error),
    /// The question source failed
    SourceFailure(session::SourceError),
}

impl UpdateMessage {
    /// Converts the update message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Delayed events requested through a [`session::Scheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// The team activation countdown ran out
    ActivationExpired {
        /// Session that scheduled the countdown
        session: game::SessionId,
        /// Which activation step of that session it belongs to
        round: usize,
    },
}
