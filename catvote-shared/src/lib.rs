//! # Catvote Shared
//! This crate defines shared data structures and types used across the cat
//! voting ecosystem. It includes common definitions for cat images, votes,
//! vote values, and the create-vote request/response wire formats.
pub mod types;
