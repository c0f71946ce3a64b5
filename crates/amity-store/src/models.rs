//! Domain model structs persisted in the SQLite database.
//!
//! Records reference each other by id only. A user never owns its edges or
//! messages in memory; callers resolve them through the repositories.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered user. The id is immutable, the name is not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name (1..=100 characters, validated upstream).
    pub name: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Friendship
// ---------------------------------------------------------------------------

/// One directed half of a friendship. A confirmed friendship between A and B
/// is the pair `(A, B)` + `(B, A)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FriendshipEdge {
    pub user_id: Uuid,
    pub friend_id: Uuid,
}

impl FriendshipEdge {
    pub fn new(user_id: Uuid, friend_id: Uuid) -> Self {
        Self { user_id, friend_id }
    }

    /// The opposite-direction edge.
    pub fn reversed(&self) -> Self {
        Self {
            user_id: self.friend_id,
            friend_id: self.user_id,
        }
    }
}

/// An outgoing edge joined to the friend's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendProfile {
    pub id: Uuid,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A direct message between two users. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    /// Plain-text content (1..=500 characters, validated upstream).
    pub content: String,
    /// When the message was sent (UTC).
    pub sent_at: DateTime<Utc>,
}

/// Which participant's perspective a message view belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewRole {
    Sent,
    Received,
}

impl ViewRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewRole::Sent => "sent",
            ViewRole::Received => "received",
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

pub(crate) fn parse_uuid(idx: usize, s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
