//! Orchestrator configuration
//!
//! Options are usually read from a JSON document supplied by the host
//! application and validated before a [`Game`](crate::game::Game) is built.

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::Duration;

use crate::constants;

type ValidationResult = garde::Result;

fn validate_activation_duration(val: &Duration, _ctx: &()) -> ValidationResult {
    let (min, max) = (
        constants::activation::MIN_DURATION,
        constants::activation::MAX_DURATION,
    );
    if (min..=max).contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "team activation duration is outside of the bounds [{min},{max}]",
        )))
    }
}

/// Options controlling a game session
///
/// The three `auto_*` switches enable transitions that would otherwise
/// require an operator command. They are all off by default.
#[serde_with::serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Options {
    /// Length of the team activation countdown
    #[garde(custom(validate_activation_duration))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub team_activation_duration: Duration,
    /// Location handed to the question source on mode selection
    #[garde(length(min = 1, max = constants::questions::MAX_LOCATION_LENGTH))]
    pub questions_location: String,
    /// Start the questions when the activation countdown expires
    #[garde(skip)]
    pub auto_advance_on_activation_timeout: bool,
    /// Start the questions as soon as every controller has been activated
    #[garde(skip)]
    pub auto_advance_on_full_roster: bool,
    /// Show the scores when moving past the last question
    #[garde(skip)]
    pub auto_finish_on_last_question: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            team_activation_duration: Duration::from_secs(
                constants::activation::DEFAULT_DURATION,
            ),
            questions_location: constants::questions::DEFAULT_LOCATION.to_owned(),
            auto_advance_on_activation_timeout: false,
            auto_advance_on_full_roster: false,
            auto_finish_on_last_question: false,
        }
    }
}

/// Errors raised while reading options
#[derive(Error, Debug)]
pub enum Error {
    /// The document is not valid JSON for [`Options`]
    #[error("malformed options: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but breaks a limit
    #[error("invalid options: {0}")]
    Invalid(#[from] garde::Report),
}

impl Options {
    /// Parses and validates options from a JSON document
    ///
    /// Missing fields take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed JSON and [`Error::Invalid`]
    /// when a value is out of bounds.
    pub fn from_json(s: &str) -> Result<Self, Error> {
        let options: Self = serde_json::from_str(s)?;
        options.validate()?;
        Ok(options)
    }
}
