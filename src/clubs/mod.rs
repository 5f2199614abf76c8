//! Student club and circle lookup.

pub mod categories;
pub mod resolver;

pub use categories::{touched_groups, CATEGORY_GROUPS, GENERIC_TERMS};
pub use resolver::{extract_terms, normalize, ClubResolver, NOT_FOUND};
