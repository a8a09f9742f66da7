//! Ordered question list with a cursor

use serde::{Deserialize, Serialize};

use super::question::Question;

/// Order in which the loaded questions are asked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Questions are asked in the order of the bank
    #[default]
    #[display("ordered")]
    Ordered,
    /// Questions are shuffled once when the list is built
    #[display("random")]
    Random,
}

/// Outcome of moving the cursor forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The cursor now points at this question
    Question(usize),
    /// There is no question after the current one
    Finished,
}

/// The questions of a session and the one currently asked
#[derive(Debug, Clone, Default)]
pub struct QuestionSequence {
    questions: Vec<Question>,
    cursor: Option<usize>,
    finished: bool,
}

impl QuestionSequence {
    /// Builds the sequence for a mode
    pub fn new(mut questions: Vec<Question>, mode: Mode) -> Self {
        if mode == Mode::Random {
            fastrand::shuffle(&mut questions);
        }
        Self {
            questions,
            cursor: None,
            finished: false,
        }
    }

    /// Number of questions
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// All questions in asking order
    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    /// Question at `index`
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Index of the active question
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The active question
    pub fn current(&self) -> Option<&Question> {
        self.cursor.and_then(|index| self.get(index))
    }

    /// Whether the cursor ran past the last question
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Points the cursor at `index`
    ///
    /// Returns `false`, leaving the cursor unchanged, if `index` is out of range.
    pub fn seek(&mut self, index: usize) -> bool {
        if index >= self.questions.len() {
            return false;
        }
        self.cursor = Some(index);
        self.finished = false;
        true
    }

    /// Moves the cursor to the next question
    ///
    /// The first call points at question 0. Past the end the cursor stays on
    /// the last question and the sequence is marked finished.
    pub fn next(&mut self) -> Advance {
        let next = self.cursor.map_or(0, |index| index + 1);
        if self.seek(next) {
            Advance::Question(next)
        } else {
            self.finished = true;
            Advance::Finished
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question::new(format!("Question {i}"), format!("Answer {i}")))
            .collect()
    }

    #[test]
    fn test_ordered_mode_keeps_order() {
        let sequence = QuestionSequence::new(questions(5), Mode::Ordered);
        assert_eq!(
            sequence.all().iter().map(|q| q.answer.as_str()).collect_vec(),
            vec!["Answer 0", "Answer 1", "Answer 2", "Answer 3", "Answer 4"]
        );
        assert_eq!(sequence.cursor(), None);
        assert!(sequence.current().is_none());
    }

    #[test]
    fn test_random_mode_keeps_every_question() {
        let sequence = QuestionSequence::new(questions(20), Mode::Random);
        let mut answers = sequence.all().iter().map(|q| q.answer.clone()).collect_vec();
        answers.sort();
        let mut expected = questions(20).into_iter().map(|q| q.answer).collect_vec();
        expected.sort();
        assert_eq!(answers, expected);
    }

    #[test]
    fn test_next_walks_to_the_end() {
        let mut sequence = QuestionSequence::new(questions(2), Mode::Ordered);
        assert_eq!(sequence.next(), Advance::Question(0));
        assert_eq!(sequence.next(), Advance::Question(1));
        assert!(!sequence.is_finished());

        assert_eq!(sequence.next(), Advance::Finished);
        assert!(sequence.is_finished());
        assert_eq!(sequence.cursor(), Some(1));
    }

    #[test]
    fn test_seek_out_of_range() {
        let mut sequence = QuestionSequence::new(questions(2), Mode::Ordered);
        assert!(sequence.seek(1));
        assert!(!sequence.seek(2));
        assert_eq!(sequence.cursor(), Some(1));
        assert_eq!(sequence.current().unwrap().answer, "Answer 1");
    }

    #[test]
    fn test_empty_sequence_finishes_immediately() {
        let mut sequence = QuestionSequence::new(Vec::new(), Mode::Ordered);
        assert_eq!(sequence.next(), Advance::Finished);
        assert_eq!(sequence.cursor(), None);
    }

    #[test]
    fn test_mode_wire_names() {
        assert_eq!(serde_json::to_string(&Mode::Random).unwrap(), r#""random""#);
        assert_eq!(
            serde_json::from_str::<Mode>(r#""ordered""#).unwrap(),
            Mode::Ordered
        );
    }
}
