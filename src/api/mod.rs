//! HTTP API for the chat frontend and operators.

mod handlers;
mod rest;

pub use handlers::*;
pub use rest::*;
