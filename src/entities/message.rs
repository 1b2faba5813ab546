//! Snapshots of deleted and edited messages kept for `snipe`/`editsnipe`.
//! These never touch disk.

use super::UserId;

/// Anything the snipe cache can age out
pub trait Timestamped {
    /// Unix seconds when the entry was captured
    fn timestamp(&self) -> i64;
}

/// A message as it was just before deletion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletedMessage {
    /// Message text
    pub content: String,
    /// Author of the message
    pub author_id: UserId,
    /// Capture time (unix seconds)
    pub timestamp: i64,
}

/// A message edit with both versions of the text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditedMessage {
    /// Text before the edit
    pub old_content: String,
    /// Text after the edit
    pub new_content: String,
    /// Author of the message
    pub author_id: UserId,
    /// Capture time (unix seconds)
    pub timestamp: i64,
}

impl Timestamped for DeletedMessage {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl Timestamped for EditedMessage {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
