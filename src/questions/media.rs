//! Media attached to questions
//!
//! Blind test and muted video questions point at a media file. The details
//! shown to the operator (title, artist, length) are resolved lazily by the
//! question source after the list is loaded.

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// A media file referenced by a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Location of the file, interpreted by the question source
    pub path: String,
}

/// Metadata resolved for a media file
#[serde_with::serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaInformations {
    /// Track or clip title
    pub title: Option<String>,
    /// Performer, for audio clips
    pub artist: Option<String>,
    /// Playback length
    #[serde_as(as = "Option<serde_with::DurationMilliSeconds<u64>>")]
    pub duration: Option<Duration>,
}
