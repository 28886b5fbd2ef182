//! Shared types for LeaseAbstract: configuration, the cross-crate error
//! type, structured trace events and stream aliases.

pub mod config;
pub mod error;
pub mod stream;
pub mod trace;
