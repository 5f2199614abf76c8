//! Keyword scoring and cross-dataset fallback search.
//!
//! # Architecture
//!
//! ```text
//! Query Text
//!     │
//!     ▼
//! tokenize (width fold, lower-case, split on punctuation)
//!     │
//!     ├──────────────────────────┐
//!     ▼                          ▼
//! Club resolver             FallbackSearch
//! (ScoringRules::CLUB)      (ScoringRules::KEYWORD)
//!     │                          │
//!     └────────────┬─────────────┘
//!                  ▼
//!          scorer::rank (stable, score > 0)
//! ```

pub mod fallback;
pub mod scorer;

pub use fallback::{format_hits, FallbackSearch, SearchHit, NO_RESULTS};
pub use scorer::{rank, score, ScoreQuery, ScoreTarget, ScoringRules};
