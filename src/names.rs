//! Team name validation
//!
//! The operator may rename teams during a session. Names are trimmed, length
//! checked, filtered for inappropriate content and must stay unique across
//! the roster, since the display shows them side by side.

use rustrict::CensorStr;
use serde::Serialize;
use thiserror::Error;

use crate::{
    constants::team_name::MAX_LENGTH,
    teams::{TeamId, TeamRegistry},
};

/// Errors that can occur during team name validation
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Another team already uses this name
    #[error("name already in-use")]
    Used,
    /// The name is empty or contains only whitespace
    #[error("name cannot be empty")]
    Empty,
    /// The name contains inappropriate content
    #[error("name is inappropriate")]
    Sinful,
    /// The name exceeds the maximum allowed length
    #[error("name is too long")]
    TooLong,
}

/// Validates a requested name for `team`
///
/// Returns the trimmed name on success. Renaming a team to its current
/// name is allowed.
///
/// # Errors
///
/// * `Error::TooLong` - more than [`MAX_LENGTH`] characters
/// * `Error::Empty` - nothing left after trimming whitespace
/// * `Error::Sinful` - flagged by the content filter
/// * `Error::Used` - another team has the same name, ignoring case
pub fn clean_team_name(registry: &TeamRegistry, team: TeamId, name: &str) -> Result<String, Error> {
    let name = rustrict::trim_whitespace(name);
    if name.chars().count() > MAX_LENGTH {
        return Err(Error::TooLong);
    }
    if name.is_empty() {
        return Err(Error::Empty);
    }
    if name.is_inappropriate() {
        return Err(Error::Sinful);
    }
    let taken = registry
        .teams()
        .into_iter()
        .any(|other| other.id != team && other.name.eq_ignore_ascii_case(name));
    if taken {
        return Err(Error::Used);
    }
    Ok(name.to_owned())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn team(s: &str) -> TeamId {
        s.parse().unwrap()
    }

    #[test]
    fn test_clean_name_trims_whitespace() {
        let registry = TeamRegistry::new(2);
        assert_eq!(
            clean_team_name(&registry, team("a"), "  The Owls  "),
            Ok("The Owls".to_string())
        );
    }

    #[test]
    fn test_clean_name_empty() {
        let registry = TeamRegistry::new(2);
        assert_eq!(clean_team_name(&registry, team("a"), "   "), Err(Error::Empty));
    }

    #[test]
    fn test_clean_name_too_long() {
        let registry = TeamRegistry::new(2);
        let name = "x".repeat(MAX_LENGTH + 1);
        assert_eq!(clean_team_name(&registry, team("a"), &name), Err(Error::TooLong));

        let name = "a".repeat(MAX_LENGTH);
        assert!(clean_team_name(&registry, team("a"), &name).is_ok());
    }

    #[test]
    fn test_clean_name_inappropriate() {
        let registry = TeamRegistry::new(2);
        for name in ["fuck", "shit"] {
            assert_eq!(
                clean_team_name(&registry, team("a"), name),
                Err(Error::Sinful),
                "Expected '{name}' to be flagged as inappropriate"
            );
        }
    }

    #[test]
    fn test_clean_name_must_be_unique() {
        let registry = TeamRegistry::new(2);
        // team b is called "B" by default
        assert_eq!(clean_team_name(&registry, team("a"), "b"), Err(Error::Used));
        assert_eq!(clean_team_name(&registry, team("b"), "B"), Ok("B".to_string()));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(Error::Used.to_string(), "name already in-use");
        assert_eq!(Error::TooLong.to_string(), "name is too long");
    }
}
