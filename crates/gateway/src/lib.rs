//! `la-gateway` — HTTP server, CLI and chat runtime for LeaseAbstract.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod runtime;
pub mod state;
