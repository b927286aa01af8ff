//! Cat Voting Library
//!
//! This library wires together the cat voting components: configuration
//! management, error handling, telemetry, and dependency injection. It is
//! the facade a presentation shell embeds; there is no command-line entry
//! point.

pub mod config;
pub mod errors;
pub mod telemetry;

pub use config::Dependencies;
pub use errors::VotingAppError;
