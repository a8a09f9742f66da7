//! Team roster management
//!
//! Every physical buzzer controller maps to exactly one team. Teams are
//! keyed by a stable [`TeamId`] derived from the controller position, and the
//! registry keeps a separate position lookup so that the rest of the crate
//! never relies on the order of a vector to find a team.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

use crate::constants::session::{MAX_CONTROLLER_COUNT, TEAM_LETTERS};

/// Zero-based slot of a physical buzzer controller
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::Into,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct ControllerIndex(usize);

impl ControllerIndex {
    /// Returns the raw position
    pub fn get(self) -> usize {
        self.0
    }
}

/// Stable identifier of a team, a lower-case letter
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct TeamId(char);

impl TeamId {
    /// Derives the identifier for a controller position
    ///
    /// Returns `None` past [`MAX_CONTROLLER_COUNT`].
    pub fn for_controller(controller: ControllerIndex) -> Option<Self> {
        TEAM_LETTERS
            .chars()
            .nth(controller.get())
            .map(|c| Self(c.to_ascii_lowercase()))
    }

    /// Default display name: the upper-case letter
    pub fn default_name(self) -> String {
        self.0.to_ascii_uppercase().to_string()
    }
}

impl Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors when parsing a [`TeamId`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a team identifier: {0:?}")]
pub struct ParseTeamIdError(String);

impl FromStr for TeamId {
    type Err = ParseTeamIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if TEAM_LETTERS.contains(c.to_ascii_uppercase()) => {
                Ok(Self(c.to_ascii_lowercase()))
            }
            _ => Err(ParseTeamIdError(s.to_owned())),
        }
    }
}

/// A team as seen by the display and control actors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Stable identifier
    pub id: TeamId,
    /// Controller this team buzzes with
    pub controller: ControllerIndex,
    /// Display name
    pub name: String,
    /// Whether the team was admitted during the activation phase
    pub active: bool,
    /// Whether the team's indicator is lit
    pub lit: bool,
    /// One-shot highlight, only ever `true` inside a single notification
    pub flash: bool,
    /// Current score
    pub points: i64,
}

impl Team {
    fn new(id: TeamId, controller: ControllerIndex) -> Self {
        Self {
            id,
            controller,
            name: id.default_name(),
            active: false,
            lit: false,
            flash: false,
            points: 0,
        }
    }

    /// Returns a copy of the team carrying the flash pulse
    ///
    /// The stored team keeps `flash == false`, so the pulse is delivered
    /// exactly once.
    pub fn flashing(&self) -> Self {
        Self {
            flash: true,
            ..self.clone()
        }
    }
}

/// Errors raised by the registry
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No team is mapped to this controller
    #[error("no team for controller {0}")]
    UnknownController(ControllerIndex),
    /// No team has this identifier
    #[error("no team with id {0}")]
    UnknownTeam(TeamId),
    /// The team was already admitted
    #[error("team {0} is already active")]
    AlreadyActive(TeamId),
}

/// Holds the team of every controller for one session
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    /// Teams by identifier
    teams: BTreeMap<TeamId, Team>,
    /// Controller position to team identifier
    by_controller: Vec<TeamId>,
    /// Number of teams admitted so far
    activated: usize,
}

impl TeamRegistry {
    /// Builds a fresh roster for `controller_count` controllers
    ///
    /// Counts above [`MAX_CONTROLLER_COUNT`] are clamped.
    pub fn new(controller_count: usize) -> Self {
        let by_controller = (0..controller_count.min(MAX_CONTROLLER_COUNT))
            .map(ControllerIndex::from)
            .filter_map(TeamId::for_controller)
            .collect_vec();

        let teams = by_controller
            .iter()
            .enumerate()
            .map(|(position, id)| (*id, Team::new(*id, ControllerIndex::from(position))))
            .collect();

        Self {
            teams,
            by_controller,
            activated: 0,
        }
    }

    /// Number of controllers (and teams)
    pub fn len(&self) -> usize {
        self.by_controller.len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.by_controller.is_empty()
    }

    /// Number of teams admitted during activation
    pub fn activated(&self) -> usize {
        self.activated
    }

    /// Whether every team has been admitted
    pub fn all_activated(&self) -> bool {
        !self.is_empty() && self.activated == self.len()
    }

    /// All team identifiers in controller order
    pub fn ids(&self) -> &[TeamId] {
        &self.by_controller
    }

    /// Looks up the team identifier of a controller
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownController`] for positions outside the roster.
    pub fn id_of(&self, controller: ControllerIndex) -> Result<TeamId, Error> {
        self.by_controller
            .get(controller.get())
            .copied()
            .ok_or(Error::UnknownController(controller))
    }

    /// Gets a team by identifier
    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    /// Gets the team of a controller
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownController`] for positions outside the roster.
    pub fn by_controller(&self, controller: ControllerIndex) -> Result<&Team, Error> {
        let id = self.id_of(controller)?;
        self.teams.get(&id).ok_or(Error::UnknownController(controller))
    }

    /// Gets the team of a controller for modification
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownController`] for positions outside the roster.
    pub fn by_controller_mut(&mut self, controller: ControllerIndex) -> Result<&mut Team, Error> {
        let id = self.id_of(controller)?;
        self.teams
            .get_mut(&id)
            .ok_or(Error::UnknownController(controller))
    }

    /// Gets a team by identifier for modification
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTeam`] if no team has this identifier.
    pub fn get_mut(&mut self, id: TeamId) -> Result<&mut Team, Error> {
        self.teams.get_mut(&id).ok_or(Error::UnknownTeam(id))
    }

    /// Admits the team of a controller
    ///
    /// Sets `active` and `lit` and counts the activation. Activating a team
    /// twice is rejected and leaves the registry untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyActive`] or [`Error::UnknownController`].
    pub fn activate(&mut self, controller: ControllerIndex) -> Result<&Team, Error> {
        let team = self.by_controller_mut(controller)?;
        if team.active {
            return Err(Error::AlreadyActive(team.id));
        }
        team.active = true;
        team.lit = true;
        self.activated += 1;
        self.by_controller(controller)
    }

    /// Switches every indicator flag off
    pub fn clear_lights(&mut self) {
        for team in self.teams.values_mut() {
            team.lit = false;
            team.flash = false;
        }
    }

    /// Teams in controller order
    pub fn teams(&self) -> Vec<Team> {
        self.by_controller
            .iter()
            .filter_map(|id| self.teams.get(id))
            .cloned()
            .collect_vec()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_registry_builds_lettered_teams() {
        let registry = TeamRegistry::new(3);
        let teams = registry.teams();

        assert_eq!(registry.len(), 3);
        assert_eq!(
            teams.iter().map(|t| t.id.to_string()).collect_vec(),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            teams.iter().map(|t| t.name.as_str()).collect_vec(),
            vec!["A", "B", "C"]
        );
        assert!(teams.iter().all(|t| !t.active && !t.lit && !t.flash && t.points == 0));
    }

    #[test]
    fn test_registry_clamps_controller_count() {
        let registry = TeamRegistry::new(MAX_CONTROLLER_COUNT + 5);
        assert_eq!(registry.len(), MAX_CONTROLLER_COUNT);
        assert_eq!(registry.ids().last().unwrap().to_string(), "t");
    }

    #[test]
    fn test_controller_lookup() {
        let registry = TeamRegistry::new(4);
        let team = registry.by_controller(ControllerIndex::from(2)).unwrap();
        assert_eq!(team.id.to_string(), "c");
        assert_eq!(team.controller, ControllerIndex::from(2));

        assert_eq!(
            registry.by_controller(ControllerIndex::from(4)),
            Err(Error::UnknownController(ControllerIndex::from(4)))
        );
    }

    #[test]
    fn test_activate_is_idempotent() {
        let mut registry = TeamRegistry::new(4);
        let team = registry.activate(ControllerIndex::from(1)).unwrap();
        assert!(team.active);
        assert!(team.lit);
        assert!(!team.flash);

        let second = registry.activate(ControllerIndex::from(1));
        assert_eq!(second, Err(Error::AlreadyActive("b".parse().unwrap())));
        assert_eq!(registry.activated(), 1);
    }

    #[test]
    fn test_all_activated() {
        let mut registry = TeamRegistry::new(2);
        assert!(!registry.all_activated());
        registry.activate(ControllerIndex::from(0)).unwrap();
        registry.activate(ControllerIndex::from(1)).unwrap();
        assert!(registry.all_activated());
        assert!(!TeamRegistry::new(0).all_activated());
    }

    #[test]
    fn test_clear_lights_keeps_activation() {
        let mut registry = TeamRegistry::new(2);
        registry.activate(ControllerIndex::from(0)).unwrap();
        registry.clear_lights();

        let team = registry.by_controller(ControllerIndex::from(0)).unwrap();
        assert!(team.active);
        assert!(!team.lit);
    }

    #[test]
    fn test_flashing_copy_leaves_stored_team() {
        let registry = TeamRegistry::new(1);
        let team = registry.by_controller(ControllerIndex::from(0)).unwrap();
        assert!(team.flashing().flash);
        assert!(!team.flash);
    }

    #[test]
    fn test_team_id_parsing() {
        assert_eq!("a".parse::<TeamId>().unwrap().to_string(), "a");
        assert_eq!("B".parse::<TeamId>().unwrap().to_string(), "b");
        assert!("z".parse::<TeamId>().is_err());
        assert!("ab".parse::<TeamId>().is_err());
        assert!("".parse::<TeamId>().is_err());
    }

    #[test]
    fn test_team_serializes_id_as_string() {
        let registry = TeamRegistry::new(1);
        let json = serde_json::to_string(&registry.teams()[0]).unwrap();
        assert!(json.contains(r#""id":"a""#));
        assert!(json.contains(r#""controller":0"#));
    }
}
