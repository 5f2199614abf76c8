//! Query routing: intent classification and the answer pipeline.
//!
//! This module provides:
//! - Intent classification (keyword rules or a language model with keyword fallback)
//! - The resolver interface shared by the calendar, directory and club lookups
//! - The executor that walks resolver, conversation and fallback search in order

pub mod classifier;
pub mod executor;
pub mod types;

pub use classifier::*;
pub use executor::*;
pub use types::*;
