//! Error types for the voting coordinator.
//! Defines the errors surfaced when a vote write or a vote list fetch
//! against the remote gateway fails.
use catvote_api::CatApiError;
use thiserror::Error;

/// Represents errors that can occur within the voting coordinator.
///
/// A `Submit` error means the optimistic vote was rolled back and a
/// failure context was recorded; the vote can be replayed with `retry`.
/// A `Fetch` error means the vote list could not be reconciled with the
/// server.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Vote submission failed: {0}")]
    Submit(CatApiError),

    #[error("Vote list fetch failed: {0}")]
    Fetch(CatApiError),
}
