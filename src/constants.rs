//! Configuration constants for the buzzer quiz
//!
//! This module contains the limits and defaults used throughout the
//! orchestrator so that every component agrees on the same boundaries.

/// Session-wide limits
pub mod session {
    /// Letters used to derive team identifiers from controller positions
    pub const TEAM_LETTERS: &str = "ABCDEFGHIJKLMNOPQRST";
    /// Maximum number of buzzer controllers mapped to teams
    pub const MAX_CONTROLLER_COUNT: usize = TEAM_LETTERS.len();
    /// Minimum number of activated teams required to start the questions
    pub const MIN_ACTIVE_TEAMS: usize = 2;
}

/// Team activation phase
pub mod activation {
    /// Default length of the activation countdown in seconds
    pub const DEFAULT_DURATION: u64 = 60;
    /// Shortest allowed activation countdown in seconds
    pub const MIN_DURATION: u64 = 5;
    /// Longest allowed activation countdown in seconds
    pub const MAX_DURATION: u64 = 600;
}

/// Team names set by the operator
pub mod team_name {
    /// Maximum length of a team name in characters
    pub const MAX_LENGTH: usize = 32;
}

/// Question bank location
pub mod questions {
    /// Location handed to the question source when none is configured
    pub const DEFAULT_LOCATION: &str = "./questions";
    /// Maximum length of the configured location
    pub const MAX_LOCATION_LENGTH: usize = 512;
}
