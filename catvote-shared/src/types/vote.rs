use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::VoteValue;

/// Prefix marking a locally generated placeholder id.
const TEMP_ID_PREFIX: &str = "temp-";

/// Identifier of a vote.
///
/// A vote id is either assigned by the server, or a locally generated
/// placeholder that exists only while a vote is optimistic. Temporary ids
/// are never sent to the server; they are replaced by the server-assigned
/// id during reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "String", from = "String")]
pub enum VoteId {
    /// Server-assigned identifier.
    Server(String),
    /// Locally generated placeholder for an optimistic vote.
    Temporary(String),
}

impl VoteId {
    /// Generate a fresh temporary id for an optimistic vote.
    pub fn temporary() -> Self {
        VoteId::Temporary(format!("{}{}", TEMP_ID_PREFIX, Uuid::new_v4()))
    }

    /// Whether this id is a locally generated placeholder.
    pub fn is_temporary(&self) -> bool {
        matches!(self, VoteId::Temporary(_))
    }
}

impl From<VoteId> for String {
    fn from(id: VoteId) -> Self {
        match id {
            VoteId::Server(s) | VoteId::Temporary(s) => s,
        }
    }
}

impl From<String> for VoteId {
    fn from(s: String) -> Self {
        if s.starts_with(TEMP_ID_PREFIX) {
            VoteId::Temporary(s)
        } else {
            VoteId::Server(s)
        }
    }
}

/// Represents a user's vote on a cat image.
///
/// This struct stores information about a vote cast by a pseudonymous
/// user (`sub_id`) on a specific image. While a vote is optimistic its
/// `id` is temporary and `created_at` is client-generated; once confirmed
/// both fields are server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vote {
    pub id: VoteId,
    pub image_id: String,
    pub sub_id: String,
    pub value: VoteValue,
    pub created_at: DateTime<Utc>,
}
