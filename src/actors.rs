//! Actor presence tracking
//!
//! Three actors take part in a session: the hardware buzzer unit, the
//! audience display and the operator control surface. Each connects and
//! disconnects on its own channel; this module keeps the combined view used
//! to decide when a session may start or must be resynchronized.

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

/// One of the real-time participants of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    /// The buzzer unit with its physical controllers
    #[display("hardware")]
    Hardware,
    /// The audience-facing screen
    #[display("display")]
    Display,
    /// The operator control surface
    #[display("control")]
    Control,
}

/// Connection lifecycle events emitted by every actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// The actor finished connecting and is ready to receive updates
    Ready,
    /// The actor disconnected
    Leave,
}

/// Which actors are currently connected
///
/// Only [`Presence::join`] and [`Presence::leave`] mutate it; game state is
/// never touched by presence changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Presence(EnumMap<Actor, bool>);

impl Presence {
    /// Marks an actor as connected
    pub fn join(&mut self, actor: Actor) {
        self.0[actor] = true;
    }

    /// Marks an actor as disconnected
    pub fn leave(&mut self, actor: Actor) {
        self.0[actor] = false;
    }

    /// Returns whether a specific actor is connected
    pub fn is_present(&self, actor: Actor) -> bool {
        self.0[actor]
    }

    /// Returns whether all three actors are connected
    pub fn is_complete(&self) -> bool {
        self.0.values().all(|present| *present)
    }

    /// Actors that are not connected yet, in declaration order
    pub fn missing(&self) -> impl Iterator<Item = Actor> + '_ {
        self.0
            .iter()
            .filter(|(_, present)| !**present)
            .map(|(actor, _)| actor)
    }
}
