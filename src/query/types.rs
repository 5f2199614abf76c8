//! Types for the query routing pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Intent
// ============================================================================

/// Domain a query is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Academic calendar: dates, terms, breaks
    Calendar,
    /// Faculty directory and office hours
    Teacher,
    /// Student clubs and circles
    Clubs,
    /// Weather lookup
    Weather,
    /// Question answered from the generic datasets
    DataQa,
    /// Anything else (chit-chat, out of domain)
    Other,
}

impl Intent {
    /// Every intent, in declaration order.
    pub const ALL: [Intent; 6] = [
        Intent::Calendar,
        Intent::Teacher,
        Intent::Clubs,
        Intent::Weather,
        Intent::DataQa,
        Intent::Other,
    ];

    /// Wire name of the intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Teacher => "teacher",
            Self::Clubs => "clubs",
            Self::Weather => "weather",
            Self::DataQa => "data_qa",
            Self::Other => "other",
        }
    }

    /// Parse a wire name; surrounding whitespace and case are ignored.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|i| i.as_str() == value)
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Calendar => "Academic Calendar",
            Self::Teacher => "Faculty Directory",
            Self::Clubs => "Clubs",
            Self::Weather => "Weather",
            Self::DataQa => "Dataset Q&A",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Query
// ============================================================================

/// An incoming question with an optional caller-declared category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    /// Declared category, kept only when it names an [`Intent`].
    pub declared: Option<Intent>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            declared: None,
        }
    }

    /// Attach a caller-declared category; unrecognized values are ignored.
    pub fn with_category(mut self, category: &str) -> Self {
        self.declared = Intent::parse(category);
        self
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Outcome of a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A final answer (including prompts and diagnostics).
    Answered(String),
    /// Nothing matched; the text is the resolver's "not found" message.
    NoMatch(String),
}

impl Resolution {
    pub fn text(&self) -> &str {
        match self {
            Self::Answered(text) | Self::NoMatch(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Answered(text) | Self::NoMatch(text) => text,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered(_))
    }
}

/// A resolver turns query text plus a dataset into an answer for one intent.
pub trait Resolver: Send + Sync {
    /// The intent this resolver serves.
    fn intent(&self) -> Intent;

    /// Resolve the query. Never fails; absence is reported as [`Resolution::NoMatch`].
    fn resolve(&self, text: &str) -> Resolution;
}

// ============================================================================
// Answer
// ============================================================================

/// Which stage of the pipeline produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Resolver,
    Weather,
    Conversation,
    FallbackSearch,
    NotFound,
}

/// Final answer of the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub content: String,
    /// Intent the query was routed to.
    pub intent: Intent,
    pub source: AnswerSource,
}
