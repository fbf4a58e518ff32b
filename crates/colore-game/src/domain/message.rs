//! Story and chat messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sender name used for every AI-generated story continuation.
pub const NARRATOR: &str = "AI Narrator";

/// Which log a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Player actions and narrator replies; visible to the narrator.
    Story,
    /// Private coordination between players; never sent to the narrator.
    Chat,
}

/// One entry in the story or chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Player name, or [`NARRATOR`].
    pub sender: String,
    /// Trimmed message body.
    pub content: String,
    /// The log this message was appended to.
    pub channel: Channel,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Whether this message was produced by the narrator.
    #[must_use]
    pub fn is_from_narrator(&self) -> bool {
        self.sender == NARRATOR
    }
}
