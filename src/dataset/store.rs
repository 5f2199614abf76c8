//! Init-once, read-many dataset store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{DatasetError, Result};
use crate::metrics::get_metrics;

use super::types::{CalendarEvent, ClubRecord, FacultyRecord};

/// Typed collection a dataset file is decoded into, chosen by file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Calendar,
    Faculty,
    Clubs,
}

impl DatasetKind {
    /// Recognize a dataset by its (case-insensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "calendar" | "academic_calendar" | "schedule" | "events" => Some(Self::Calendar),
            "teachers" | "faculty" | "office_hours" | "professors" => Some(Self::Faculty),
            "clubs" | "club" | "circles" => Some(Self::Clubs),
            _ => None,
        }
    }

    fn wrapper_keys(self) -> &'static [&'static str] {
        match self {
            Self::Calendar => &["events", "calendar", "data"],
            Self::Faculty => &["teachers", "faculty", "data"],
            Self::Clubs => &["clubs", "data"],
        }
    }
}

/// State of the club collection.
#[derive(Debug, Clone, Default)]
pub enum ClubDataset {
    /// No club dataset was found.
    #[default]
    Missing,
    /// A club dataset exists but is not a list of records.
    Malformed(String),
    /// Club records in dataset order.
    Loaded(Vec<ClubRecord>),
}

/// Counts reported by the diagnostics endpoint and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub root: String,
    pub datasets: Vec<String>,
    pub faculty_count: usize,
    pub club_count: usize,
    pub calendar_count: usize,
    pub skipped_files: usize,
}

/// Immutable in-memory holder of every loaded dataset.
///
/// Every file is kept as a generic document for fallback search; recognized
/// files are additionally decoded into typed collections.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    root: PathBuf,
    documents: BTreeMap<String, Value>,
    calendar: Vec<CalendarEvent>,
    faculty: Vec<FacultyRecord>,
    clubs: ClubDataset,
    skipped_files: usize,
}

impl DatasetStore {
    /// Load every `*.json` file under `dir`.
    ///
    /// Files that cannot be read or parsed are logged and skipped.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(DatasetError::DirectoryNotFound(dir.display().to_string()).into());
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")))
            .collect();
        paths.sort();

        let mut documents = BTreeMap::new();
        let mut skipped = 0;
        for path in &paths {
            match read_document(path) {
                Ok(value) => {
                    let name = dataset_name(path);
                    debug!(dataset = %name, "Loaded dataset file");
                    documents.insert(name, value);
                }
                Err(e) => {
                    warn!("Skipping dataset file: {}", e);
                    get_metrics().dataset_load_errors_total.inc();
                    skipped += 1;
                }
            }
        }

        let mut store = Self::from_documents(documents);
        store.root = dir.to_path_buf();
        store.skipped_files = skipped;

        info!(
            datasets = store.documents.len(),
            calendar = store.calendar.len(),
            faculty = store.faculty.len(),
            clubs = store.club_count(),
            skipped,
            "Datasets loaded from {}",
            dir.display()
        );
        Ok(store)
    }

    /// Build a store from already-parsed documents keyed by dataset name.
    pub fn from_documents(documents: BTreeMap<String, Value>) -> Self {
        let mut store = Self::default();

        for (name, value) in &documents {
            match DatasetKind::from_name(name) {
                Some(DatasetKind::Calendar) => store.ingest_calendar(name, value),
                Some(DatasetKind::Faculty) => store.ingest_faculty(name, value),
                Some(DatasetKind::Clubs) => store.ingest_clubs(name, value),
                None => {}
            }
        }

        store.documents = documents;
        store
    }

    fn ingest_calendar(&mut self, name: &str, value: &Value) {
        let Some(items) = unwrap_list(value, DatasetKind::Calendar.wrapper_keys()) else {
            warn!(dataset = %name, "Calendar dataset is not a list; kept for search only");
            return;
        };
        for item in items {
            match item.as_object().and_then(CalendarEvent::from_json) {
                Some(event) => self.calendar.push(event),
                None => warn!(dataset = %name, "Skipping calendar entry without title or date: {}", item),
            }
        }
    }

    fn ingest_faculty(&mut self, name: &str, value: &Value) {
        let Some(items) = unwrap_list(value, DatasetKind::Faculty.wrapper_keys()) else {
            warn!(dataset = %name, "Faculty dataset is not a list; kept for search only");
            return;
        };
        self.faculty
            .extend(items.iter().filter_map(Value::as_object).map(FacultyRecord::from_json));
    }

    fn ingest_clubs(&mut self, name: &str, value: &Value) {
        let Some(items) = unwrap_list(value, DatasetKind::Clubs.wrapper_keys()) else {
            warn!(dataset = %name, "Club dataset is not a list; kept for search only");
            if !matches!(self.clubs, ClubDataset::Loaded(_)) {
                self.clubs = ClubDataset::Malformed(name.to_string());
            }
            return;
        };
        let records = items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(ClubRecord::from_json);
        match &mut self.clubs {
            ClubDataset::Loaded(existing) => existing.extend(records),
            other => *other = ClubDataset::Loaded(records.collect()),
        }
    }

    /// Directory the datasets were loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every dataset as a generic document, in name order.
    pub fn documents(&self) -> &BTreeMap<String, Value> {
        &self.documents
    }

    /// Names of the loaded datasets.
    pub fn dataset_names(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    pub fn calendar(&self) -> &[CalendarEvent] {
        &self.calendar
    }

    pub fn faculty(&self) -> &[FacultyRecord] {
        &self.faculty
    }

    pub fn clubs(&self) -> &ClubDataset {
        &self.clubs
    }

    fn club_count(&self) -> usize {
        match &self.clubs {
            ClubDataset::Loaded(records) => records.len(),
            _ => 0,
        }
    }

    /// Diagnostic counts.
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            root: self.root.display().to_string(),
            datasets: self.dataset_names(),
            faculty_count: self.faculty.len(),
            club_count: self.club_count(),
            calendar_count: self.calendar.len(),
            skipped_files: self.skipped_files,
        }
    }
}

fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_document(path: &Path) -> std::result::Result<Value, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.display().to_string(),
        source,
    })?;
    // Tolerate a UTF-8 byte order mark.
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(&content);
    serde_json::from_str(content).map_err(|source| DatasetError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// The record list of a dataset: either the document itself or a list
/// under one of the wrapper keys.
fn unwrap_list<'a>(value: &'a Value, wrapper_keys: &[&str]) -> Option<&'a Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(obj) => wrapper_keys
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array)),
        _ => None,
    }
}
