//! Error types for the cat voting application.
//! Consolidates errors from the gateway, identity, and coordinator
//! layers behind one application-level enum.
#[derive(Debug, thiserror::Error)]
pub enum VotingAppError {
    #[error("API error: {0}")]
    Api(#[from] catvote_api::CatApiError),
    #[error("Identity error: {0}")]
    Identity(#[from] catvote_identity::IdentityError),
    #[error("Coordinator error: {0}")]
    Coordinator(#[from] catvote_core::CoordinatorError),
}
