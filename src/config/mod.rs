//! Configuration for the campus concierge server.

mod settings;

pub use settings::*;
