//! CLI module for the campus concierge binary.
//!
//! Command handlers run the query pipeline in-process, either behind the
//! HTTP server or for a single question from the terminal.

mod commands;
mod output;

pub use commands::*;
