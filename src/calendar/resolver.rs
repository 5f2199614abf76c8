//! Calendar resolver: break periods, term boundaries and date containment.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate};

use crate::dataset::{CalendarEvent, DatasetStore};
use crate::query::{Intent, Resolution, Resolver};
use crate::text::{contains_any, fold_width, resolve_target_date, today_in};

use super::terms::{
    Season, TermQualifier, BREAK_KEYWORDS, END_QUERY, END_TITLE, START_QUERY, START_TITLE,
};

/// Answers date, term and break questions against the academic calendar.
pub struct CalendarResolver {
    store: Arc<DatasetStore>,
    timezone: FixedOffset,
}

impl CalendarResolver {
    pub fn new(store: Arc<DatasetStore>, timezone: FixedOffset) -> Self {
        Self { store, timezone }
    }

    /// Resolve a query with an explicit "today".
    ///
    /// Branches are tried in order and the first non-empty one answers:
    /// break periods, term boundaries, then events on the target date.
    pub fn resolve_on(&self, text: &str, today: NaiveDate) -> Resolution {
        if self.store.calendar().is_empty() {
            return Resolution::NoMatch("学年暦のデータが見つかりませんでした。".to_string());
        }

        let query = fold_width(text).to_lowercase();

        if let Some(events) = self.break_events(&query) {
            if !events.is_empty() {
                return Resolution::Answered(format_events("休暇・休業期間", &events));
            }
        }

        if let Some(events) = self.term_boundary_events(&query) {
            if !events.is_empty() {
                return Resolution::Answered(format_events("授業期間の予定", &events));
            }
        }

        let target = resolve_target_date(&query, today);
        let events = self.events_on(target);
        let date = target.format("%Y-%m-%d");
        if events.is_empty() {
            Resolution::Answered(format!("{} に該当する予定はありません。", date))
        } else {
            Resolution::Answered(format_events(&format!("{} の予定", date), &events))
        }
    }

    /// Events whose title names a break, or `None` if the query is not about breaks.
    fn break_events(&self, query: &str) -> Option<Vec<&CalendarEvent>> {
        let season = Season::detect(query);
        if season.is_none() && !contains_any(query, BREAK_KEYWORDS) && !query.contains('休') {
            return None;
        }
        let keywords = season.map(Season::break_keywords).unwrap_or(BREAK_KEYWORDS);
        Some(self.filter_titles(|title| contains_any(title, keywords)))
    }

    /// Events marking a term start or end, narrowed by any semester or
    /// quarter named in the query.
    fn term_boundary_events(&self, query: &str) -> Option<Vec<&CalendarEvent>> {
        let wants_start = contains_any(query, START_QUERY);
        let wants_end = contains_any(query, END_QUERY);
        if !wants_start && !wants_end {
            return None;
        }

        let qualifiers = TermQualifier::detect(query);
        Some(self.filter_titles(|title| {
            let boundary = (wants_start && contains_any(title, START_TITLE))
                || (wants_end && contains_any(title, END_TITLE));
            boundary && (qualifiers.is_empty() || qualifiers.iter().any(|q| q.matches_title(title)))
        }))
    }

    /// Every event whose interval contains `date`, in dataset order.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.store
            .calendar()
            .iter()
            .filter(|e| e.contains(date))
            .collect()
    }

    fn filter_titles<F>(&self, predicate: F) -> Vec<&CalendarEvent>
    where
        F: Fn(&str) -> bool,
    {
        self.store
            .calendar()
            .iter()
            .filter(|e| predicate(&fold_width(&e.title).to_lowercase()))
            .collect()
    }
}

impl Resolver for CalendarResolver {
    fn intent(&self) -> Intent {
        Intent::Calendar
    }

    fn resolve(&self, text: &str) -> Resolution {
        self.resolve_on(text, today_in(self.timezone))
    }
}

fn format_events(heading: &str, events: &[&CalendarEvent]) -> String {
    let mut out = format!("{}:", heading);
    for event in events {
        out.push_str("\n- ");
        out.push_str(&event.display_line());
    }
    out
}
