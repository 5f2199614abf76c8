//! Dataset store: calendar events, faculty records, clubs and generic documents.

mod store;
pub mod types;

pub use store::{ClubDataset, DatasetKind, DatasetStore, DatasetSummary};
pub use types::{CalendarEvent, ClubRecord, FacultyRecord, ABSENT};
