//! Collaborators of the orchestrator
//!
//! This module defines the traits through which the game reaches the outside
//! world: the hardware buzzer unit, the two screens (display and control),
//! the question source and a scheduler for delayed events. Implementations
//! live in the host application; the game only holds handles to them.
//!
//! Nothing here calls back into the game. Presses, lifecycle events, loaded
//! questions and fired alarms are delivered by the host through the
//! [`Game`](crate::game::Game) methods, one event at a time.

use serde::Serialize;
use thiserror::Error;
use web_time::Duration;

use crate::{
    AlarmMessage, UpdateMessage,
    questions::{Mode, Question},
    teams::ControllerIndex,
};

/// The hardware buzzer unit
///
/// Indicator commands are fire-and-forget; no acknowledgment is expected.
pub trait Buzzer {
    /// Number of physical controllers plugged in
    fn controller_count(&self) -> usize;

    /// Switches a controller's indicator on
    fn light_on(&self, controller: ControllerIndex);

    /// Switches a controller's indicator off
    fn light_off(&self, controller: ControllerIndex);
}

/// A connected screen, either the audience display or the operator control
///
/// Implementations might use WebSockets or any other real-time transport.
pub trait Screen {
    /// Sends an update message to the screen
    ///
    /// # Arguments
    ///
    /// * `message` - The update message to send
    fn send_message(&self, message: &UpdateMessage);
}

/// Where the questions come from
///
/// Both requests are asynchronous: the host delivers the outcome later
/// through [`Game::questions_loaded`](crate::game::Game::questions_loaded) and
/// [`Game::informations_loaded`](crate::game::Game::informations_loaded).
pub trait QuestionSource {
    /// Requests the question list stored at `location` for `mode`
    fn load(&self, location: &str, mode: Mode);

    /// Requests the media details of the question at `index`
    fn load_informations(&self, index: usize, question: &Question);
}

/// Schedules delayed events
pub trait Scheduler {
    /// Requests `alarm` to be delivered to
    /// [`Game::receive_alarm`](crate::game::Game::receive_alarm) after `delay`
    fn schedule(&self, alarm: AlarmMessage, delay: Duration);
}

/// Failures reported by the question source
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The question list could not be loaded
    #[error("failed to load questions from {location}: {reason}")]
    Load {
        /// Location that was requested
        location: String,
        /// Description given by the source
        reason: String,
    },
    /// The media details of a question could not be resolved
    #[error("failed to resolve media of question {index}: {reason}")]
    Informations {
        /// Index of the question in the sequence
        index: usize,
        /// Description given by the source
        reason: String,
    },
}
