//! Core game logic and state management
//!
//! This module contains the orchestrator of a buzzer quiz session. It is the
//! only component talking to the three actors and to the question source:
//! it tracks which actors are connected, moves the session through its
//! steps, admits teams, decides which controller buzzed first and applies
//! the operator's judgments to the scores.
//!
//! Every inbound event is handled by a `&mut self` method and runs to
//! completion before the next one, so the pending validation and the
//! activation counter need no further synchronization.

use std::{fmt::Debug, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    AlarmMessage, UpdateMessage,
    actors::{Actor, Lifecycle, Presence},
    answers::{Answer, AnswerRecord, Answers, Decision, ValidationResult},
    config::Options,
    constants::session::{MAX_CONTROLLER_COUNT, MIN_ACTIVE_TEAMS},
    names,
    questions::{
        Mode, Question, QuestionSequence,
        media::MediaInformations,
        sequence::Advance,
    },
    session::{Buzzer, QuestionSource, Scheduler, Screen, SourceError},
    step::Step,
    teams::{self, ControllerIndex, Team, TeamId, TeamRegistry},
};

/// Identifier minted every time a fresh session starts
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// Commands received from the display and control screens
///
/// `Register` is how a screen announces it is ready. Every other command
/// comes from the operator and is only accepted from the control screen.
#[derive(Debug, Deserialize, Clone)]
pub enum IncomingMessage {
    /// The screen is connected and ready for updates
    Register,
    /// Open the team activation step
    SetActivationStep,
    /// Leave team activation and start asking questions
    StartQuiz,
    /// Start a question with a fresh answer record
    StartQuestion(usize),
    /// Show more of a question without resetting its answers
    ContinueQuestion(usize),
    /// Start the question after the active one
    NextQuestion,
    /// Select the question order and load the questions
    SetMode(Mode),
    /// Rename a team
    SetTeamName {
        /// Team to rename
        id: TeamId,
        /// Requested name
        name: String,
    },
    /// Judge the pending buzz
    ValidateAnswer(Decision),
    /// Show the final scores
    FinishGame,
    /// Discard the session and start over
    Restart,
}

impl IncomingMessage {
    /// Whether `actor` may send this message
    fn follows(&self, actor: Actor) -> bool {
        match self {
            IncomingMessage::Register => matches!(actor, Actor::Display | Actor::Control),
            _ => matches!(actor, Actor::Control),
        }
    }
}

/// Commands refused by the orchestrator
///
/// None of these end the session; they are reported back to the actor that
/// sent the command.
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Not every actor has connected yet
    #[error("the session has not started")]
    NotStarted,
    /// The command does not apply to the current step
    #[error("not allowed during step {current}")]
    InvalidStep {
        /// The step the session is in
        current: Step,
    },
    /// Too few teams pressed their buzzer during activation
    #[error("{activated} team(s) activated, at least {min} required", min = MIN_ACTIVE_TEAMS)]
    NotEnoughTeams {
        /// Number of admitted teams
        activated: usize,
    },
    /// The roster refused the operation
    #[error(transparent)]
    Team(#[from] teams::Error),
    /// The requested team name was refused
    #[error("invalid team name: {0}")]
    TeamName(#[from] names::Error),
    /// No question has been started
    #[error("no question is active")]
    NoActiveQuestion,
    /// A buzz is already waiting for the operator
    #[error("controller {0} is waiting for validation")]
    AwaitingValidation(ControllerIndex),
    /// The controller was already judged on this question
    #[error("controller {0} already answered this question")]
    AlreadyAnswered(ControllerIndex),
    /// There is no buzz to judge
    #[error("no answer is waiting for validation")]
    NoPendingAnswer,
    /// The question list has not been loaded
    #[error("questions are not loaded")]
    QuestionsNotLoaded,
    /// The question index is past the end of the list
    #[error("question {index} is out of range, {count} question(s) loaded")]
    QuestionOutOfRange {
        /// Requested index
        index: usize,
        /// Number of loaded questions
        count: usize,
    },
    /// The command targets another question than the active one
    #[error("question {index} is not the active question {active}")]
    QuestionNotActive {
        /// Requested index
        index: usize,
        /// Index of the active question
        active: usize,
    },
    /// The last question has already been asked
    #[error("no more questions")]
    NoMoreQuestions,
    /// The actor may not send this command
    #[error("{0} may not send this command")]
    NotAllowed(Actor),
}

/// The display and control screens, which receive the same updates
struct Screens<S> {
    display: S,
    control: S,
}

impl<S: Screen> Screens<S> {
    fn announce(&self, message: &UpdateMessage) {
        self.display.send_message(message);
        self.control.send_message(message);
    }

    fn send(&self, actor: Actor, message: &UpdateMessage) {
        match actor {
            Actor::Display => self.display.send_message(message),
            Actor::Control => self.control.send_message(message),
            Actor::Hardware => {}
        }
    }
}

/// State of a started session
///
/// Created when all three actors are connected for the first time and kept
/// until an explicit restart, whatever actors come and go in between.
#[derive(Debug)]
struct Session {
    id: SessionId,
    step: Step,
    mode: Option<Mode>,
    teams: TeamRegistry,
    questions: Option<QuestionSequence>,
    answers: Answers,
    /// Controller whose buzz awaits the operator's judgment
    pending: Option<ControllerIndex>,
    /// Incremented every time the activation step opens
    activation_round: usize,
}

impl Session {
    fn new(teams: TeamRegistry) -> Self {
        Self {
            id: SessionId::new(),
            step: Step::ModeSelect,
            mode: None,
            teams,
            questions: None,
            answers: Answers::default(),
            pending: None,
            activation_round: 0,
        }
    }

    fn require(&self, step: Step) -> Result<(), Error> {
        if self.step == step {
            Ok(())
        } else {
            Err(Error::InvalidStep { current: self.step })
        }
    }

    fn questions(&self) -> Result<&QuestionSequence, Error> {
        self.questions
            .as_ref()
            .filter(|questions| !questions.is_empty())
            .ok_or(Error::QuestionsNotLoaded)
    }

    fn active_question(&self) -> Option<usize> {
        self.questions.as_ref().and_then(QuestionSequence::cursor)
    }
}

/// The orchestrator of a game session
///
/// It holds the handles to its collaborators, injected at construction.
/// The host application feeds it with lifecycle events, presses, screen
/// commands, source completions and alarms.
pub struct Game<B, S, Q, A> {
    buzzer: B,
    screens: Screens<S>,
    source: Q,
    scheduler: A,
    options: Options,
    presence: Presence,
    session: Option<Session>,
}

impl<B, S, Q, A> Debug for Game<B, S, Q, A> {
    /// Custom debug implementation that leaves the collaborators out
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("presence", &self.presence)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

// Accessors
impl<B, S, Q, A> Game<B, S, Q, A> {
    /// Options the game was built with
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Which actors are connected
    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    /// Whether a session has started
    pub fn is_started(&self) -> bool {
        self.session.is_some()
    }

    /// Identifier of the current session
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|session| session.id)
    }

    /// Current step
    pub fn step(&self) -> Option<Step> {
        self.session.as_ref().map(|session| session.step)
    }

    /// Selected question order
    pub fn mode(&self) -> Option<Mode> {
        self.session.as_ref().and_then(|session| session.mode)
    }

    /// Team roster in controller order
    pub fn teams(&self) -> Vec<Team> {
        self.session
            .as_ref()
            .map(|session| session.teams.teams())
            .unwrap_or_default()
    }

    /// Team of a controller
    pub fn team(&self, controller: ControllerIndex) -> Option<&Team> {
        self.session
            .as_ref()
            .and_then(|session| session.teams.by_controller(controller).ok())
    }

    /// Number of teams admitted during activation
    pub fn activated_teams(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |session| session.teams.activated())
    }

    /// Controller waiting for the operator's judgment
    pub fn pending(&self) -> Option<ControllerIndex> {
        self.session.as_ref().and_then(|session| session.pending)
    }

    /// Loaded questions
    pub fn questions(&self) -> Option<&QuestionSequence> {
        self.session
            .as_ref()
            .and_then(|session| session.questions.as_ref())
    }

    /// Answer record of a question
    pub fn answer_record(&self, question: usize) -> Option<&AnswerRecord> {
        self.session
            .as_ref()
            .and_then(|session| session.answers.record(question))
    }

    /// Answer of a controller's team to a question
    pub fn answer(&self, question: usize, controller: ControllerIndex) -> Option<Answer> {
        let session = self.session.as_ref()?;
        let team = session.teams.id_of(controller).ok()?;
        Some(session.answers.get(question, team))
    }
}

impl<B: Buzzer, S: Screen, Q: QuestionSource, A: Scheduler> Game<B, S, Q, A> {
    /// Creates an orchestrator with no actor connected
    ///
    /// # Arguments
    ///
    /// * `buzzer` - The hardware buzzer unit
    /// * `display` - The audience-facing screen
    /// * `control` - The operator control screen
    /// * `source` - Where questions are loaded from
    /// * `scheduler` - Delivers delayed alarms
    /// * `options` - Session options
    pub fn new(
        buzzer: B,
        display: S,
        control: S,
        source: Q,
        scheduler: A,
        options: Options,
    ) -> Self {
        Self {
            buzzer,
            screens: Screens { display, control },
            source,
            scheduler,
            options,
            presence: Presence::default(),
            session: None,
        }
    }

    // Readiness

    /// Handles a lifecycle event of an actor
    pub fn receive_lifecycle(&mut self, actor: Actor, event: Lifecycle) {
        match event {
            Lifecycle::Ready => self.join(actor),
            Lifecycle::Leave => self.leave(actor),
        }
    }

    /// Marks an actor as connected
    ///
    /// Once all three actors are connected, the first join starts the
    /// session and every later one resynchronizes the screens.
    pub fn join(&mut self, actor: Actor) {
        if actor == Actor::Hardware {
            for controller in 0..self.buzzer.controller_count() {
                self.buzzer.light_off(ControllerIndex::from(controller));
            }
        }

        self.presence.join(actor);
        debug!(%actor, "Actor joined");
        self.screens
            .announce(&UpdateMessage::SetActors(self.presence.clone()));

        if !self.presence.is_complete() {
            debug!(missing = ?self.presence.missing().collect_vec(), "Waiting for actors");
            return;
        }

        if self.session.is_none() {
            self.start();
        } else {
            self.resync();
        }
    }

    /// Marks an actor as disconnected, leaving the session untouched
    pub fn leave(&mut self, actor: Actor) {
        self.presence.leave(actor);
        debug!(%actor, "Actor left");
        self.screens
            .announce(&UpdateMessage::SetActors(self.presence.clone()));
    }

    /// Discards the session
    ///
    /// If every actor is still connected, a fresh session starts right away.
    pub fn restart(&mut self) {
        if let Some(session) = self.session.take() {
            info!(session = %session.id, "Discarding session");
            for team in session.teams.teams().into_iter().filter(|team| team.lit) {
                self.buzzer.light_off(team.controller);
            }
        }

        if self.presence.is_complete() {
            self.start();
        }
    }

    fn start(&mut self) {
        let controller_count = self.buzzer.controller_count();
        if controller_count > MAX_CONTROLLER_COUNT {
            warn!(
                controller_count,
                max = MAX_CONTROLLER_COUNT,
                "Too many controllers, extra ones are ignored"
            );
        }

        let session = Session::new(TeamRegistry::new(controller_count));
        info!(session = %session.id, teams = session.teams.len(), "Starting session");
        self.screens.announce(&UpdateMessage::SetStep(session.step));
        self.session = Some(session);
    }

    fn resync(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        info!(session = %session.id, step = %session.step, "Resynchronizing screens");

        self.screens.announce(&UpdateMessage::SetStep(session.step));

        if let Some(mode) = session.mode {
            self.screens.announce(&UpdateMessage::SetMode(mode));
        }

        let finished = session.step.is_terminal();
        if let Some(questions) = session
            .questions
            .as_ref()
            .filter(|questions| !finished && !questions.is_empty())
        {
            self.screens
                .announce(&UpdateMessage::SetQuestions(questions.all().to_vec()));
        }

        session.teams.clear_lights();
        self.screens
            .announce(&UpdateMessage::SetTeams(session.teams.teams()));

        let current = session
            .questions
            .as_ref()
            .and_then(QuestionSequence::current)
            .cloned();

        if finished {
            self.screens.announce(&UpdateMessage::FinishGame);
        } else if let Some(question) = current {
            self.release_pending();
            self.screens
                .announce(&UpdateMessage::SetQuestion(question));
        }
    }

    // Steps

    fn transition(&mut self, next: Step) -> Result<(), Error> {
        let session = self.session.as_mut().ok_or(Error::NotStarted)?;
        if !session.step.can_transition_to(next) {
            return Err(Error::InvalidStep {
                current: session.step,
            });
        }

        info!(session = %session.id, from = %session.step, to = %next, "Step transition");
        session.step = next;
        self.screens.announce(&UpdateMessage::SetStep(next));
        Ok(())
    }

    /// Opens the team activation step
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStep`] outside of mode selection.
    pub fn request_activation_step(&mut self) -> Result<(), Error> {
        self.transition(Step::TeamActivation)?;

        let session = self.session.as_mut().ok_or(Error::NotStarted)?;
        session.activation_round += 1;
        self.screens
            .announce(&UpdateMessage::SetTeams(session.teams.teams()));
        self.scheduler.schedule(
            AlarmMessage::ActivationExpired {
                session: session.id,
                round: session.activation_round,
            },
            self.options.team_activation_duration,
        );
        Ok(())
    }

    /// Leaves team activation and starts the questions
    ///
    /// With fewer than two admitted teams the session goes back to mode
    /// selection instead.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidStep` - not in team activation
    /// * `Error::NotEnoughTeams` - the session reverted to mode selection
    /// * `Error::QuestionsNotLoaded` - no question list yet, nothing changes
    pub fn start_quiz(&mut self) -> Result<(), Error> {
        let session = self.session.as_ref().ok_or(Error::NotStarted)?;
        session.require(Step::TeamActivation)?;

        let activated = session.teams.activated();
        if activated < MIN_ACTIVE_TEAMS {
            info!(session = %session.id, activated, "Not enough teams, back to mode selection");
            self.transition(Step::ModeSelect)?;
            return Err(Error::NotEnoughTeams { activated });
        }
        session.questions()?;

        self.transition(Step::Questions)?;

        let session = self.session.as_mut().ok_or(Error::NotStarted)?;
        session.teams.clear_lights();
        for team in session.teams.teams() {
            self.buzzer.light_off(team.controller);
            self.screens.announce(&UpdateMessage::UpdateTeam(team));
        }
        if let Some(questions) = &session.questions {
            self.screens
                .announce(&UpdateMessage::SetQuestions(questions.all().to_vec()));
        }
        Ok(())
    }

    /// Shows the final scores
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStep`] unless questions are being asked.
    pub fn finish_game(&mut self) -> Result<(), Error> {
        self.transition(Step::Scores)?;
        self.release_pending();
        self.screens.announce(&UpdateMessage::FinishGame);
        Ok(())
    }

    // Mode and questions

    /// Selects the question order and requests the question list
    ///
    /// Any previously loaded list is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStep`] outside of mode selection.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        let session = self.session.as_mut().ok_or(Error::NotStarted)?;
        session.require(Step::ModeSelect)?;

        info!(session = %session.id, %mode, "Mode selected");
        session.mode = Some(mode);
        session.questions = None;
        self.screens.announce(&UpdateMessage::SetMode(mode));
        self.source.load(&self.options.questions_location, mode);
        Ok(())
    }

    /// Receives the outcome of a question list request
    ///
    /// Lists loaded for a mode that is no longer selected are dropped.
    /// Failures are reported to the control screen.
    pub fn questions_loaded(&mut self, mode: Mode, result: Result<Vec<Question>, SourceError>) {
        let Some(session) = self.session.as_mut() else {
            debug!(%mode, "Questions loaded without a session");
            return;
        };
        if session.mode != Some(mode) {
            debug!(session = %session.id, %mode, "Questions loaded for a superseded mode");
            return;
        }

        match result {
            Ok(questions) => {
                let sequence = QuestionSequence::new(questions, mode);
                info!(session = %session.id, count = sequence.len(), "Questions loaded");
                for (index, question) in sequence.all().iter().enumerate() {
                    if question.needs_informations() {
                        self.source.load_informations(index, question);
                    }
                }
                session.questions = Some(sequence);
            }
            Err(error) => {
                warn!(session = %session.id, %error, "Question source failed");
                self.screens
                    .send(Actor::Control, &UpdateMessage::SourceFailure(error));
            }
        }
    }

    /// Receives the media details of a question
    ///
    /// Failures are reported to the control screen and leave the question
    /// without details.
    pub fn informations_loaded(
        &mut self,
        index: usize,
        result: Result<MediaInformations, SourceError>,
    ) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(question) = session.questions.as_ref().and_then(|q| q.get(index)) else {
            debug!(index, "Media details for an unknown question");
            return;
        };

        match result {
            Ok(informations) => {
                if !question.set_informations(informations) {
                    debug!(index, "Media details already known");
                    return;
                }
                let asking = session.step == Step::Questions;
                if let Some(questions) = session.questions.as_ref().filter(|_| asking) {
                    self.screens
                        .announce(&UpdateMessage::SetQuestions(questions.all().to_vec()));
                }
            }
            Err(error) => {
                warn!(session = %session.id, %error, "Media details unavailable");
                self.screens
                    .send(Actor::Control, &UpdateMessage::SourceFailure(error));
            }
        }
    }

    /// Starts a question with a fresh answer record
    ///
    /// A buzz still waiting for validation is abandoned.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidStep` - not asking questions
    /// * `Error::QuestionOutOfRange` - no question at `index`
    pub fn start_question(&mut self, index: usize) -> Result<(), Error> {
        let session = self.session.as_mut().ok_or(Error::NotStarted)?;
        session.require(Step::Questions)?;
        let questions = session.questions.as_mut().ok_or(Error::QuestionsNotLoaded)?;
        if !questions.seek(index) {
            return Err(Error::QuestionOutOfRange {
                index,
                count: questions.len(),
            });
        }

        session.answers.reset(index, session.teams.ids());
        debug!(session = %session.id, index, "Question started");
        self.release_pending();
        self.screens.announce(&UpdateMessage::StartQuestion(index));
        Ok(())
    }

    /// Starts the question after the active one
    ///
    /// # Errors
    ///
    /// * `Error::InvalidStep` - not asking questions
    /// * `Error::NoMoreQuestions` - the last question was already asked and
    ///   the game is not set to finish on its own
    pub fn next_question(&mut self) -> Result<(), Error> {
        let session = self.session.as_mut().ok_or(Error::NotStarted)?;
        session.require(Step::Questions)?;
        let questions = session.questions.as_mut().ok_or(Error::QuestionsNotLoaded)?;

        match questions.next() {
            Advance::Question(index) => self.start_question(index),
            Advance::Finished if self.options.auto_finish_on_last_question => {
                info!(session = %session.id, "Last question reached, finishing");
                self.finish_game()
            }
            Advance::Finished => Err(Error::NoMoreQuestions),
        }
    }

    /// Shows more of the active question, keeping its answer record
    ///
    /// A buzz still waiting for validation is abandoned, so the team may buzz
    /// again.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidStep` - not asking questions
    /// * `Error::NoActiveQuestion` - no question has been started
    /// * `Error::QuestionNotActive` - `index` is not the active question
    pub fn continue_question(&mut self, index: usize) -> Result<(), Error> {
        let session = self.session.as_ref().ok_or(Error::NotStarted)?;
        session.require(Step::Questions)?;
        let active = session.active_question().ok_or(Error::NoActiveQuestion)?;
        if index != active {
            return Err(Error::QuestionNotActive { index, active });
        }

        self.release_pending();
        self.screens
            .announce(&UpdateMessage::ContinueQuestion(index));
        Ok(())
    }

    fn release_pending(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(controller) = session.pending.take() else {
            return;
        };
        debug!(session = %session.id, %controller, "Pending buzz abandoned");

        self.buzzer.light_off(controller);
        if let Ok(team) = session.teams.by_controller_mut(controller) {
            team.lit = false;
            self.screens
                .announce(&UpdateMessage::UpdateTeam(team.clone()));
        }
        self.screens.announce(&UpdateMessage::SetAnswered {
            controller,
            answered: false,
        });
    }

    // Teams

    /// Renames a team
    ///
    /// # Errors
    ///
    /// * `Error::Team` - unknown team
    /// * `Error::TeamName` - the name was refused
    pub fn set_team_name(&mut self, id: TeamId, name: &str) -> Result<(), Error> {
        let session = self.session.as_mut().ok_or(Error::NotStarted)?;
        if session.teams.get(id).is_none() {
            return Err(teams::Error::UnknownTeam(id).into());
        }
        let name = names::clean_team_name(&session.teams, id, name)?;

        let team = session.teams.get_mut(id)?;
        team.name = name;
        self.screens
            .announce(&UpdateMessage::UpdateTeam(team.clone()));
        Ok(())
    }

    /// Admits the team of a controller during the activation step
    ///
    /// # Errors
    ///
    /// * `Error::InvalidStep` - not in team activation
    /// * `Error::Team` - the team is already active or the controller unknown
    pub fn activate_team(&mut self, controller: ControllerIndex) -> Result<(), Error> {
        let session = self.session.as_mut().ok_or(Error::NotStarted)?;
        session.require(Step::TeamActivation)?;

        let team = session.teams.activate(controller)?.flashing();
        self.buzzer.light_on(controller);
        self.screens.announce(&UpdateMessage::ActivateTeam {
            team,
            flashing: true,
        });

        let full_roster = session.teams.all_activated();
        info!(
            session = %session.id,
            %controller,
            activated = session.teams.activated(),
            "Team activated"
        );

        if full_roster && self.options.auto_advance_on_full_roster {
            self.advance_to_quiz();
        }
        Ok(())
    }

    /// Starts the quiz without an operator command, reporting a refusal to
    /// the control screen
    fn advance_to_quiz(&mut self) {
        if let Err(error) = self.start_quiz() {
            self.screens
                .send(Actor::Control, &UpdateMessage::Rejected(error));
        }
    }

    // Buzzes

    /// Handles a physical press
    ///
    /// During team activation the press admits the controller's team; while
    /// questions are asked it is a buzz.
    ///
    /// # Errors
    ///
    /// Returns why the press was ignored. The hardware has no way to be told,
    /// so the host usually only logs it.
    pub fn press(&mut self, controller: ControllerIndex, button: usize) -> Result<(), Error> {
        debug!(%controller, button, "Buzzer press");
        let step = self.session.as_ref().ok_or(Error::NotStarted)?.step;

        let result = match step {
            Step::TeamActivation => self.activate_team(controller),
            Step::Questions => self.buzz(controller),
            current => Err(Error::InvalidStep { current }),
        };

        if let Err(error) = &result {
            debug!(%controller, %error, "Press rejected");
        }
        result
    }

    fn buzz(&mut self, controller: ControllerIndex) -> Result<(), Error> {
        let session = self.session.as_mut().ok_or(Error::NotStarted)?;
        let question = session.active_question().ok_or(Error::NoActiveQuestion)?;
        if let Some(pending) = session.pending {
            return Err(Error::AwaitingValidation(pending));
        }
        let id = session.teams.id_of(controller)?;
        if !session.answers.get(question, id).is_open() {
            return Err(Error::AlreadyAnswered(controller));
        }

        let team = session.teams.by_controller_mut(controller)?;
        team.lit = true;
        let update = team.flashing();
        session.pending = Some(controller);

        info!(session = %session.id, %controller, question, "Buzz accepted");
        self.screens.announce(&UpdateMessage::UpdateTeam(update));
        self.buzzer.light_on(controller);
        self.screens.announce(&UpdateMessage::SetAnswered {
            controller,
            answered: true,
        });
        Ok(())
    }

    /// Applies the operator's judgment to the pending buzz
    ///
    /// # Errors
    ///
    /// * `Error::InvalidStep` - not asking questions
    /// * `Error::NoPendingAnswer` - no buzz is waiting
    pub fn validate_answer(&mut self, decision: Decision) -> Result<(), Error> {
        let session = self.session.as_mut().ok_or(Error::NotStarted)?;
        session.require(Step::Questions)?;
        let controller = session.pending.ok_or(Error::NoPendingAnswer)?;
        let question = session.active_question().ok_or(Error::NoActiveQuestion)?;

        let team = session.teams.by_controller_mut(controller)?;
        team.points += decision.points;
        team.lit = false;
        let update = if decision.points == 0 {
            team.clone()
        } else {
            team.flashing()
        };
        session.answers.set(question, update.id, decision.into());

        info!(
            session = %session.id,
            %controller,
            question,
            success = decision.success,
            points = decision.points,
            "Answer validated"
        );
        self.buzzer.light_off(controller);
        self.screens.announce(&UpdateMessage::UpdateTeam(update));
        self.screens.announce(&UpdateMessage::ValidateAnswer(
            ValidationResult::new(decision, controller),
        ));
        session.pending = None;
        Ok(())
    }

    // Network

    /// Handles a command from a screen
    ///
    /// Refused commands are reported back to the screen that sent them.
    pub fn receive_message(&mut self, actor: Actor, message: IncomingMessage) {
        let result = if message.follows(actor) {
            self.dispatch(actor, message)
        } else {
            Err(Error::NotAllowed(actor))
        };

        if let Err(error) = result {
            debug!(%actor, %error, "Command rejected");
            self.screens.send(actor, &UpdateMessage::Rejected(error));
        }
    }

    fn dispatch(&mut self, actor: Actor, message: IncomingMessage) -> Result<(), Error> {
        match message {
            IncomingMessage::Register => {
                self.join(actor);
                Ok(())
            }
            IncomingMessage::SetActivationStep => self.request_activation_step(),
            IncomingMessage::StartQuiz => self.start_quiz(),
            IncomingMessage::StartQuestion(index) => self.start_question(index),
            IncomingMessage::ContinueQuestion(index) => self.continue_question(index),
            IncomingMessage::NextQuestion => self.next_question(),
            IncomingMessage::SetMode(mode) => self.set_mode(mode),
            IncomingMessage::SetTeamName { id, name } => self.set_team_name(id, &name),
            IncomingMessage::ValidateAnswer(decision) => self.validate_answer(decision),
            IncomingMessage::FinishGame => self.finish_game(),
            IncomingMessage::Restart => {
                self.restart();
                Ok(())
            }
        }
    }

    /// Handles a scheduled alarm
    ///
    /// Alarms from another session or an earlier activation step are
    /// ignored.
    pub fn receive_alarm(&mut self, message: AlarmMessage) {
        match message {
            AlarmMessage::ActivationExpired { session, round } => {
                let current = self.session.as_ref().is_some_and(|s| {
                    s.id == session
                        && s.activation_round == round
                        && s.step == Step::TeamActivation
                });
                if !current {
                    debug!(%session, round, "Stale activation alarm");
                    return;
                }

                info!(%session, "Team activation countdown expired");
                if self.options.auto_advance_on_activation_timeout {
                    self.advance_to_quiz();
                }
            }
        }
    }
}
