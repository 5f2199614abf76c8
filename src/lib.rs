//! Campus Concierge: intent routing over university datasets
//!
//! Answers natural-language questions about the academic calendar, faculty
//! office hours and student clubs. Each message is classified into an
//! intent, resolved against in-memory datasets, and falls back to a
//! conversational model or keyword search when no resolver applies.

pub mod api;
pub mod calendar;
pub mod clubs;
pub mod collaborators;
pub mod config;
pub mod dataset;
pub mod directory;
pub mod error;
pub mod metrics;
pub mod query;
pub mod search;
pub mod text;
pub mod utils;

pub use api::{create_router, ApiState, ChatRequest, ChatResponse};
pub use calendar::CalendarResolver;
pub use clubs::ClubResolver;
pub use collaborators::{LanguageModel, OllamaClient, OpenMeteoWeather, WeatherService};
pub use config::Config;
pub use dataset::{CalendarEvent, ClubDataset, ClubRecord, DatasetStore, DatasetSummary, FacultyRecord};
pub use directory::DirectoryResolver;
pub use error::{CampusError, CollaboratorError, ConfigError, DatasetError, Result};
pub use metrics::{get_metrics, Metrics, MetricsSnapshot};
pub use query::{
    Answer, AnswerSource, Intent, IntentClassifier, IntentStrategy, KeywordStrategy, ModelStrategy,
    Query, QueryExecutor, Resolution, Resolver,
};
pub use search::{FallbackSearch, SearchHit};
