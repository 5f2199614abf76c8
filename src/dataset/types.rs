//! Typed dataset records and their tolerant JSON decoding.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::text::parse_dataset_date;

/// Placeholder substituted for missing faculty fields.
pub const ABSENT: &str = "不明";

// ============================================================================
// Calendar
// ============================================================================

/// A dated entry of the academic calendar.
///
/// Invariant: `start_date <= end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CalendarEvent {
    /// Create an event; a missing or earlier end date collapses to the start date.
    pub fn new(title: impl Into<String>, start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        let end_date = end_date.filter(|end| *end >= start_date).unwrap_or(start_date);
        Self {
            title: title.into(),
            start_date,
            end_date,
        }
    }

    /// Whether the event's interval contains `date` (inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// `title: start` or `title: start ~ end`.
    pub fn display_line(&self) -> String {
        if self.start_date == self.end_date {
            format!("{}: {}", self.title, self.start_date.format("%Y-%m-%d"))
        } else {
            format!(
                "{}: {} ~ {}",
                self.title,
                self.start_date.format("%Y-%m-%d"),
                self.end_date.format("%Y-%m-%d")
            )
        }
    }

    pub(crate) fn from_json(obj: &Map<String, Value>) -> Option<Self> {
        let title = text_field(obj, TITLE_KEYS)?;
        let start = text_field(obj, START_KEYS).and_then(|s| parse_dataset_date(&s))?;
        let end = text_field(obj, END_KEYS).and_then(|s| parse_dataset_date(&s));
        Some(Self::new(title, start, end))
    }
}

// ============================================================================
// Faculty
// ============================================================================

/// A faculty member with office-hour information, in canonical shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacultyRecord {
    pub name: String,
    pub department: String,
    pub office_hours_memo: String,
    pub link: Option<String>,
}

impl FacultyRecord {
    /// Decode either source shape: a flat record whose office hours are a
    /// string, or a structured record with a list of office-hour slots.
    pub(crate) fn from_json(obj: &Map<String, Value>) -> Self {
        let office_hours_memo = match first_value(obj, MEMO_KEYS) {
            Some(Value::Array(slots)) => {
                let rendered: Vec<String> = slots.iter().filter_map(render_slot).collect();
                if rendered.is_empty() {
                    ABSENT.to_string()
                } else {
                    rendered.join(" / ")
                }
            }
            Some(value) => render_slot(value).unwrap_or_else(|| ABSENT.to_string()),
            None => ABSENT.to_string(),
        };

        Self {
            name: text_field(obj, NAME_KEYS).unwrap_or_else(|| ABSENT.to_string()),
            department: text_field(obj, DEPARTMENT_KEYS).unwrap_or_else(|| ABSENT.to_string()),
            office_hours_memo,
            link: text_field(obj, LINK_KEYS),
        }
    }

    /// Whether the record carries a usable name.
    pub fn has_name(&self) -> bool {
        !self.name.is_empty() && self.name != ABSENT
    }
}

/// `day time (place) note` for one structured office-hour slot.
fn render_slot(slot: &Value) -> Option<String> {
    let obj = match slot {
        Value::Object(obj) => obj,
        other => return scalar_text(other),
    };
    let mut parts = Vec::new();
    if let Some(day) = text_field(obj, SLOT_DAY_KEYS) {
        parts.push(day);
    }
    if let Some(time) = text_field(obj, SLOT_TIME_KEYS) {
        parts.push(time);
    }
    if let Some(place) = text_field(obj, SLOT_PLACE_KEYS) {
        parts.push(format!("({})", place));
    }
    if let Some(note) = text_field(obj, SLOT_NOTE_KEYS) {
        parts.push(note);
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

// ============================================================================
// Clubs
// ============================================================================

/// A student club or circle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClubRecord {
    pub name: String,
    pub day: String,
    pub location: String,
    pub detail: Option<String>,
    pub sns: Option<String>,
}

impl ClubRecord {
    pub(crate) fn from_json(obj: &Map<String, Value>) -> Option<Self> {
        Some(Self {
            name: text_field(obj, CLUB_NAME_KEYS)?,
            day: text_field(obj, CLUB_DAY_KEYS).unwrap_or_default(),
            location: text_field(obj, CLUB_LOCATION_KEYS).unwrap_or_default(),
            detail: text_field(obj, CLUB_DETAIL_KEYS),
            sns: text_field(obj, CLUB_SNS_KEYS),
        })
    }

    /// Concatenation of the searchable fields.
    pub fn blob(&self) -> String {
        format!(
            "{}{}{}{}",
            self.name,
            self.detail.as_deref().unwrap_or(""),
            self.location,
            self.day
        )
    }
}

// ============================================================================
// Field helpers
// ============================================================================

const TITLE_KEYS: &[&str] = &["title", "name", "event", "summary", "行事", "行事名", "イベント"];
const START_KEYS: &[&str] = &["date", "start", "start_date", "startDate", "開始日", "日付"];
const END_KEYS: &[&str] = &["end", "end_date", "endDate", "終了日"];

const NAME_KEYS: &[&str] = &["name", "氏名", "名前", "教員名"];
const DEPARTMENT_KEYS: &[&str] = &["department", "所属", "学部", "学科"];
const MEMO_KEYS: &[&str] = &["office_hours", "officeHours", "オフィスアワー", "備考", "memo"];
const LINK_KEYS: &[&str] = &["link", "url", "URL", "リンク"];
const SLOT_DAY_KEYS: &[&str] = &["day", "曜日"];
const SLOT_TIME_KEYS: &[&str] = &["time", "period", "時限", "時間"];
const SLOT_PLACE_KEYS: &[&str] = &["place", "room", "location", "場所"];
const SLOT_NOTE_KEYS: &[&str] = &["note", "備考"];

const CLUB_NAME_KEYS: &[&str] = &["name", "団体名", "名前", "クラブ名"];
const CLUB_DAY_KEYS: &[&str] = &["day", "days", "活動日", "活動曜日"];
const CLUB_LOCATION_KEYS: &[&str] = &["location", "place", "活動場所", "場所"];
const CLUB_DETAIL_KEYS: &[&str] = &["detail", "description", "詳細", "活動内容"];
const CLUB_SNS_KEYS: &[&str] = &["sns", "SNS", "twitter", "instagram", "url"];

fn first_value<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// First non-empty scalar among `keys`, as text.
fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(scalar_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_event_defaults_end_to_start() {
        let event = CalendarEvent::from_json(&obj(json!({"title": "入学式", "date": "2024-04-05"}))).unwrap();
        assert_eq!(event.start_date, d(2024, 4, 5));
        assert_eq!(event.end_date, d(2024, 4, 5));
        assert_eq!(event.display_line(), "入学式: 2024-04-05");
    }

    #[test]
    fn test_event_range_and_clamp() {
        let event = CalendarEvent::from_json(&obj(
            json!({"行事": "夏季休業", "開始日": "2024/8/10", "終了日": "2024/9/30"}),
        ))
        .unwrap();
        assert!(event.contains(d(2024, 9, 1)));
        assert!(!event.contains(d(2024, 10, 1)));
        assert_eq!(event.display_line(), "夏季休業: 2024-08-10 ~ 2024-09-30");

        let inverted = CalendarEvent::new("x", d(2024, 5, 2), Some(d(2024, 5, 1)));
        assert_eq!(inverted.end_date, inverted.start_date);
    }

    #[test]
    fn test_event_without_date_is_rejected() {
        assert!(CalendarEvent::from_json(&obj(json!({"title": "未定の行事"}))).is_none());
    }

    #[test]
    fn test_faculty_flat_shape() {
        let record = FacultyRecord::from_json(&obj(json!({
            "氏名": "田中 太郎",
            "所属": "工学部",
            "オフィスアワー": "月曜3限 研究室301"
        })));
        assert_eq!(record.name, "田中 太郎");
        assert_eq!(record.department, "工学部");
        assert_eq!(record.office_hours_memo, "月曜3限 研究室301");
        assert_eq!(record.link, None);
    }

    #[test]
    fn test_faculty_structured_shape() {
        let record = FacultyRecord::from_json(&obj(json!({
            "name": "佐藤花子",
            "department": "理学部",
            "office_hours": [
                {"day": "火", "period": "4限", "room": "理系複合棟 402"},
                {"day": "木", "time": "12:10-12:50", "note": "要予約"}
            ],
            "url": "https://example.ac.jp/sato"
        })));
        assert_eq!(
            record.office_hours_memo,
            "火 4限 (理系複合棟 402) / 木 12:10-12:50 要予約"
        );
        assert_eq!(record.link.as_deref(), Some("https://example.ac.jp/sato"));
    }

    #[test]
    fn test_faculty_missing_fields_use_marker() {
        let record = FacultyRecord::from_json(&obj(json!({"name": "鈴木"})));
        assert_eq!(record.department, ABSENT);
        assert_eq!(record.office_hours_memo, ABSENT);
        assert!(record.has_name());

        let nameless = FacultyRecord::from_json(&obj(json!({"department": "法学部"})));
        assert!(!nameless.has_name());
    }

    #[test]
    fn test_club_blob() {
        let club = ClubRecord::from_json(&obj(json!({
            "name": "サッカー部",
            "day": "月・水",
            "location": "グラウンド",
            "detail": "初心者歓迎"
        })))
        .unwrap();
        assert_eq!(club.blob(), "サッカー部初心者歓迎グラウンド月・水");
        assert_eq!(club.sns, None);
    }
}
