//! Faculty directory lookup by (partial) name.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::dataset::{DatasetStore, FacultyRecord};
use crate::query::{Intent, Resolution, Resolver};
use crate::text::{fold_width, honorific_start, remove_whitespace, strip_honorifics};
use crate::utils::capped_lines;

/// Maximum number of records listed for an ambiguous name.
pub const MAX_LISTED: usize = 20;
/// Maximum number of "did you mean" suggestions.
pub const MAX_SUGGESTIONS: usize = 5;

/// Prompt returned when no usable name could be extracted.
pub const ASK_FOR_NAME: &str =
    "先生の名前を含めて質問してください。(例: 田中先生のオフィスアワーは?)";

static CLAUSE_CUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)について|に関して|の|は|を|って|が|に|[?？!！]|\babout\b|\bregarding\b")
        .expect("Invalid regex")
});

/// Markers separating a leading phrase from the name right before an
/// honorific. A single-character particle only counts after a kanji or
/// alphanumeric character, so hiragana names survive.
static LEAD_CUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)について|に関して|[\p{Han}A-Za-z0-9](?:の|は|を|が|に|って)|[?？!！、。]|\babout\b")
        .expect("Invalid regex")
});

static NAME_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{Han}\p{Hiragana}\p{Katakana}ーA-Za-z・\s]+").expect("Invalid regex")
});

/// Extract the name the user is asking about.
///
/// When an honorific follows a name, the text between the last leading
/// phrase marker and the honorific is the name. Otherwise honorifics are
/// removed and the query is cut at the first clause marker. Either way the
/// leading run of name characters is kept without spaces.
pub fn extract_name(text: &str) -> String {
    let folded = fold_width(text);
    let before_title = honorific_start(&folded).map(|pos| {
        let head = &folded[..pos];
        let start = LEAD_CUT.find_iter(head).last().map_or(0, |m| m.end());
        name_run(&head[start..])
    });
    match before_title {
        Some(name) if !name.is_empty() => name,
        _ => {
            let stripped = strip_honorifics(&folded);
            let head = match CLAUSE_CUT.find(&stripped) {
                Some(m) => &stripped[..m.start()],
                None => stripped.as_str(),
            };
            name_run(head)
        }
    }
}

fn name_run(text: &str) -> String {
    NAME_RUN
        .find(text.trim())
        .map(|m| remove_whitespace(m.as_str()))
        .unwrap_or_default()
}

/// Office-hour lookup over the faculty records.
pub struct DirectoryResolver {
    store: Arc<DatasetStore>,
}

impl DirectoryResolver {
    pub fn new(store: Arc<DatasetStore>) -> Self {
        Self { store }
    }

    fn named(&self) -> impl Iterator<Item = &FacultyRecord> {
        self.store.faculty().iter().filter(|r| r.has_name())
    }

    /// Records matching the query: full names present in the query first,
    /// otherwise names containing the extracted candidate.
    pub fn find(&self, text: &str, candidate: &str) -> Vec<&FacultyRecord> {
        let compact_query = remove_whitespace(&fold_width(text));
        let exact: Vec<&FacultyRecord> = self
            .named()
            .filter(|r| compact_query.contains(&remove_whitespace(&r.name)))
            .collect();
        if !exact.is_empty() {
            return exact;
        }
        self.named()
            .filter(|r| remove_whitespace(&r.name).contains(candidate))
            .collect()
    }

    /// Up to [`MAX_SUGGESTIONS`] distinct names sharing the candidate's first character.
    pub fn suggestions(&self, candidate: &str) -> Vec<&str> {
        let Some(first) = candidate.chars().next() else {
            return Vec::new();
        };
        let mut names: Vec<&str> = Vec::new();
        for record in self.named() {
            if record.name.contains(first) && !names.contains(&record.name.as_str()) {
                names.push(&record.name);
                if names.len() == MAX_SUGGESTIONS {
                    break;
                }
            }
        }
        names
    }

    /// Names containing `fragment`, in dataset order.
    pub fn names_like(&self, fragment: &str) -> Vec<&str> {
        self.named()
            .filter(|r| r.name.contains(fragment))
            .map(|r| r.name.as_str())
            .collect()
    }
}

impl Resolver for DirectoryResolver {
    fn intent(&self) -> Intent {
        Intent::Teacher
    }

    fn resolve(&self, text: &str) -> Resolution {
        let candidate = extract_name(text);
        if candidate.chars().count() < 2 {
            return Resolution::Answered(ASK_FOR_NAME.to_string());
        }

        let matches = self.find(text, &candidate);
        match matches.as_slice() {
            [] => {
                let suggestions = self.suggestions(&candidate);
                if suggestions.is_empty() {
                    Resolution::NoMatch(format!(
                        "「{}」先生の情報は見つかりませんでした。",
                        candidate
                    ))
                } else {
                    Resolution::NoMatch(format!(
                        "「{}」先生は見つかりませんでした。もしかして: {}",
                        candidate,
                        suggestions.join("、")
                    ))
                }
            }
            [single] => Resolution::Answered(format_record(single)),
            many => Resolution::Answered(format_many(many)),
        }
    }
}

fn format_record(record: &FacultyRecord) -> String {
    let mut line = format!(
        "{} {} 先生のオフィスアワー: {}",
        record.department, record.name, record.office_hours_memo
    );
    if let Some(link) = &record.link {
        line.push_str(&format!(" ({})", link));
    }
    line
}

fn format_many(records: &[&FacultyRecord]) -> String {
    let (lines, rest) = capped_lines(records, MAX_LISTED, |r| {
        format!("- {} {}: {}", r.department, r.name, r.office_hours_memo)
    });
    let mut out = format!("該当する先生が{}名見つかりました:\n{}", records.len(), lines.join("\n"));
    if rest > 0 {
        out.push_str(&format!("\n…ほか{}名", rest));
    }
    out
}
