//! Game progression
//!
//! A session moves through four steps. Only the transitions below are
//! allowed; the orchestrator checks them before applying any side effect.
//!
//! ```text
//! ModeSelect ──SetActivationStep──▶ TeamActivation ──StartQuiz──▶ Questions ──FinishGame──▶ Scores
//!      ▲                                   │
//!      └────────── fewer than 2 teams ─────┘
//! ```

use serde::{Deserialize, Serialize};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Step {
    /// Operator picks how questions are ordered
    #[serde(rename = "mode")]
    #[display("mode")]
    ModeSelect,
    /// Teams press their buzzer to take part
    #[serde(rename = "teams-activation")]
    #[display("teams-activation")]
    TeamActivation,
    /// Questions are asked and buzzes arbitrated
    #[serde(rename = "questions")]
    #[display("questions")]
    Questions,
    /// Final scores; terminal until the session is restarted
    #[serde(rename = "scores")]
    #[display("scores")]
    Scores,
}

impl Step {
    /// Whether the machine may move from `self` to `next`
    ///
    /// `TeamActivation -> ModeSelect` is the revert taken when too few teams
    /// were activated.
    pub fn can_transition_to(self, next: Step) -> bool {
        matches!(
            (self, next),
            (Step::ModeSelect, Step::TeamActivation)
                | (Step::TeamActivation, Step::Questions | Step::ModeSelect)
                | (Step::Questions, Step::Scores)
        )
    }

    /// Whether no transition leaves this step
    pub fn is_terminal(self) -> bool {
        matches!(self, Step::Scores)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    const ALL: [Step; 4] = [
        Step::ModeSelect,
        Step::TeamActivation,
        Step::Questions,
        Step::Scores,
    ];

    #[test]
    fn test_allowed_transitions() {
        assert!(Step::ModeSelect.can_transition_to(Step::TeamActivation));
        assert!(Step::TeamActivation.can_transition_to(Step::Questions));
        assert!(Step::TeamActivation.can_transition_to(Step::ModeSelect));
        assert!(Step::Questions.can_transition_to(Step::Scores));
    }

    #[test]
    fn test_forbidden_transitions() {
        assert!(!Step::ModeSelect.can_transition_to(Step::Questions));
        assert!(!Step::ModeSelect.can_transition_to(Step::Scores));
        assert!(!Step::Questions.can_transition_to(Step::ModeSelect));
        assert!(!Step::TeamActivation.can_transition_to(Step::Scores));
    }

    #[test]
    fn test_scores_is_terminal() {
        for step in ALL {
            assert!(!Step::Scores.can_transition_to(step));
            assert!(!step.can_transition_to(step));
        }
        assert!(Step::Scores.is_terminal());
        assert!(!Step::Questions.is_terminal());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&Step::TeamActivation).unwrap(),
            r#""teams-activation""#
        );
        assert_eq!(Step::ModeSelect.to_string(), "mode");
        assert_eq!(
            serde_json::from_str::<Step>(r#""scores""#).unwrap(),
            Step::Scores
        );
    }
}
