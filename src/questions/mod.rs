//! Questions and their ordering
//!
//! This module contains the question model handed over by the question
//! source and the sequence the orchestrator walks through during the
//! `QUESTIONS` step.

pub mod media;
pub mod question;
pub mod sequence;

pub use question::{Question, QuestionKind};
pub use sequence::{Mode, QuestionSequence};
