//! Integration tests for the campus concierge.
//!
//! These tests load datasets from a temporary directory and drive the
//! query pipeline and the HTTP router end to end. No network access is
//! needed: collaborators are disabled or replaced by local stubs.

#[path = "integration/test_api.rs"]
mod test_api;

#[path = "integration/test_pipeline.rs"]
mod test_pipeline;
