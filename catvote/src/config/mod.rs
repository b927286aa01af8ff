//! Configuration module for the cat voting application.
//! Defines and manages application-wide settings and dependencies.
mod dependencies;

pub use dependencies::Dependencies;
