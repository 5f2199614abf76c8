//! Academic calendar resolver.
//!
//! Answers three kinds of question against the calendar dataset:
//!
//! - **Breaks**: summer/winter/spring vacation and generic holidays
//! - **Term boundaries**: when a semester or quarter starts or ends
//! - **Dates**: what happens today, tomorrow, or on an explicit date
//!
//! # Resolution order
//!
//! ```text
//! query ──► break vocabulary? ──yes──► titles matching season/break keywords
//!              │ no / empty
//!              ▼
//!          start/end vocabulary? ──yes──► boundary titles ∩ term qualifiers
//!              │ no / empty
//!              ▼
//!          target date ──► events with start <= date <= end
//! ```

pub mod resolver;
pub mod terms;

pub use resolver::CalendarResolver;
pub use terms::{Season, TermQualifier};
