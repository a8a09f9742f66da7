//! A single quiz question

use once_cell_serde::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::media::{Media, MediaInformations};

/// How a question is presented to the audience
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Text read on screen
    #[default]
    Classic,
    /// Audio clip to recognise
    Blind,
    /// Silent video or picture to recognise
    Deaf,
}

/// A question as handed over by the question source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Presentation of the question
    #[serde(default)]
    pub kind: QuestionKind,
    /// What is asked
    pub statement: String,
    /// Expected answer, shown to the operator
    pub answer: String,
    /// Media played or shown with the question
    #[serde(default)]
    pub media: Option<Media>,
    /// Media details resolved after loading
    #[serde(default)]
    informations: OnceCell<MediaInformations>,
}

impl Question {
    /// Creates a question without media
    pub fn new(statement: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            kind: QuestionKind::Classic,
            statement: statement.into(),
            answer: answer.into(),
            media: None,
            informations: OnceCell::new(),
        }
    }

    /// Attaches media to the question
    #[must_use]
    pub fn with_media(mut self, kind: QuestionKind, media: Media) -> Self {
        self.kind = kind;
        self.media = Some(media);
        self
    }

    /// Whether the media details still have to be resolved
    pub fn needs_informations(&self) -> bool {
        self.media.is_some() && self.informations.get().is_none()
    }

    /// Media details, once resolved
    pub fn informations(&self) -> Option<&MediaInformations> {
        self.informations.get()
    }

    /// Stores the resolved media details
    ///
    /// Returns `false` if details were already stored; the first value wins.
    pub fn set_informations(&self, informations: MediaInformations) -> bool {
        self.informations.set(informations).is_ok()
    }
}
