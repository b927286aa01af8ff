use serde::{Deserialize, Serialize};

use crate::types::{VoteId, VoteValue};

/// Request body for casting a vote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateVoteRequest {
    pub image_id: String,
    pub sub_id: String,
    pub value: VoteValue,
}

/// Server response to a cast vote.
///
/// Echoes the submitted fields and carries the server-assigned id that
/// replaces the temporary id of the optimistic vote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateVoteResponse {
    #[serde(default)]
    pub message: String,
    pub id: VoteId,
    pub image_id: String,
    pub sub_id: String,
    pub value: VoteValue,
    #[serde(default)]
    pub country_code: String,
}
