//! Language Server Protocol adapter for the sable context engine.
//!
//! Thin wiring only: requests are translated into calls on the engine and
//! the analysis collaborators, and their domain results are translated back
//! into protocol shapes. The engine rebuilds its context per request from
//! the stored document snapshot; no parse state is cached across edits.

pub mod server;

pub use server::SableLanguageServer;
