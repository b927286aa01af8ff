//! # Catvote Core
//! This crate provides the client-side voting core: the in-memory vote
//! cache with optimistic insertion and snapshot rollback, the optimistic
//! voting coordinator that enforces single-flight and retry semantics per
//! image, and the debounce primitive used to coalesce rapid repeated
//! intents.

pub mod cache;
pub mod coordinator;
pub mod debounce;
pub mod errors;

pub use cache::{CacheSnapshot, VoteCache};
pub use coordinator::{FailureContext, VoteOutcome, VoteState, VotingCoordinator};
pub use debounce::Debouncer;
pub use errors::CoordinatorError;
