//! Per-question answer records and operator decisions
//!
//! Each question started during a session gets an [`AnswerRecord`] holding
//! one slot per team. A slot moves from [`Answer::Unanswered`] to either
//! [`Answer::Incorrect`] or [`Answer::Correct`] once the operator judges the
//! team's buzz.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::teams::{ControllerIndex, TeamId};

/// State of one team's answer to one question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Answer {
    /// The team has not been judged on this question
    #[default]
    Unanswered,
    /// The operator rejected the team's answer
    Incorrect,
    /// The operator accepted the team's answer
    Correct,
}

impl Answer {
    /// Whether the team may still buzz for this question
    pub fn is_open(self) -> bool {
        matches!(self, Self::Unanswered)
    }
}

/// Answers of every team to a single question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord(BTreeMap<TeamId, Answer>);

impl AnswerRecord {
    /// Creates a record with every team `Unanswered`
    pub fn new(teams: &[TeamId]) -> Self {
        Self(teams.iter().map(|id| (*id, Answer::Unanswered)).collect())
    }

    /// Number of slots, equal to the number of controllers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no slots
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Answer of a team, `Unanswered` for teams not in the record
    pub fn get(&self, team: TeamId) -> Answer {
        self.0.get(&team).copied().unwrap_or_default()
    }

    /// Sets a team's answer
    pub fn set(&mut self, team: TeamId, answer: Answer) {
        self.0.insert(team, answer);
    }

    /// Iterates over the slots in team order
    pub fn iter(&self) -> impl Iterator<Item = (TeamId, Answer)> + '_ {
        self.0.iter().map(|(id, answer)| (*id, *answer))
    }
}

/// Answer records of every question started in the session
#[derive(Debug, Clone, Default)]
pub struct Answers {
    records: HashMap<usize, AnswerRecord>,
}

impl Answers {
    /// Resets the record of a question to all-`Unanswered`
    pub fn reset(&mut self, question: usize, teams: &[TeamId]) -> &AnswerRecord {
        self.records.insert(question, AnswerRecord::new(teams));
        &self.records[&question]
    }

    /// Record of a question, if it was ever started
    pub fn record(&self, question: usize) -> Option<&AnswerRecord> {
        self.records.get(&question)
    }

    /// Answer of a team to a question
    pub fn get(&self, question: usize, team: TeamId) -> Answer {
        self.record(question)
            .map_or(Answer::Unanswered, |record| record.get(team))
    }

    /// Records the operator's judgment
    pub fn set(&mut self, question: usize, team: TeamId, answer: Answer) {
        self.records
            .entry(question)
            .or_insert_with(|| AnswerRecord(BTreeMap::new()))
            .set(team, answer);
    }
}

/// Operator judgment on the pending buzz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the answer was right
    pub success: bool,
    /// Points added to the team, zero or negative allowed
    pub points: i64,
}

/// Outcome of a validation, sent to the display and control actors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Whether the answer was right
    pub success: bool,
    /// Points added to the team
    pub points: i64,
    /// Controller whose buzz was judged
    pub controller: ControllerIndex,
}

impl ValidationResult {
    /// Attaches the judged controller to a decision
    pub fn new(decision: Decision, controller: ControllerIndex) -> Self {
        Self {
            success: decision.success,
            points: decision.points,
            controller,
        }
    }
}

impl From<Decision> for Answer {
    fn from(decision: Decision) -> Self {
        if decision.success {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }
}
