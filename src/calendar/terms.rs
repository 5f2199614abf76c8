//! Keyword tables for break, term-boundary and term-qualifier detection.
//!
//! All matching is done on width-folded, lower-cased text.

use std::sync::LazyLock;

use regex::Regex;

use crate::text::contains_any;

/// Season named in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Winter,
}

impl Season {
    /// Detect the season a query talks about.
    ///
    /// Season-named semesters (春学期, spring semester) are not seasons.
    pub fn detect(text: &str) -> Option<Self> {
        let text = SEASONAL_SEMESTER.replace_all(text, "");
        let text = text.as_ref();
        if contains_any(text, &["夏", "summer"]) {
            Some(Self::Summer)
        } else if contains_any(text, &["冬", "年末年始", "winter"]) {
            Some(Self::Winter)
        } else if contains_any(text, &["春", "spring"]) {
            Some(Self::Spring)
        } else {
            None
        }
    }

    /// Title keywords of this season's break.
    pub fn break_keywords(self) -> &'static [&'static str] {
        match self {
            Self::Summer => &[
                "夏休み", "夏休", "夏季休業", "夏期休業", "夏季休暇", "夏期休暇", "summer",
            ],
            Self::Winter => &[
                "冬休み", "冬休", "冬季休業", "冬期休業", "冬季休暇", "冬期休暇", "年末年始", "winter",
            ],
            Self::Spring => &[
                "春休み", "春休", "春季休業", "春期休業", "春季休暇", "春期休暇", "spring break",
            ],
        }
    }
}

/// Break vocabulary, in queries and in event titles.
pub const BREAK_KEYWORDS: &[&str] = &[
    "休業", "休み", "休暇", "休講", "祝日", "休日", "vacation", "holiday", "break",
];

/// Query vocabulary asking when a term starts.
pub const START_QUERY: &[&str] = &[
    "開始", "始まり", "始まる", "はじまり", "はじまる", "いつから", "開講", "start", "begin",
];

/// Query vocabulary asking when a term ends.
pub const END_QUERY: &[&str] = &[
    "終了", "終わり", "終わる", "おわり", "おわる", "いつまで", "最終", "end", "finish",
];

/// Event title keywords marking a term start.
pub const START_TITLE: &[&str] = &["開始", "始まり", "開講", "start", "begin"];

/// Event title keywords marking a term end.
pub const END_TITLE: &[&str] = &["終了", "終わり", "最終", "end"];

const FIRST_SEMESTER: &[&str] = &["前期", "1学期", "第1学期", "春学期", "first semester", "spring semester"];
const SECOND_SEMESTER: &[&str] = &["後期", "2学期", "第2学期", "秋学期", "second semester", "fall semester"];

/// A semester or quarter named in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermQualifier {
    /// Semester 1 or 2.
    Semester(u8),
    /// Quarter 1 to 4.
    Quarter(u8),
}

impl TermQualifier {
    /// All qualifiers mentioned in a query, semesters first.
    pub fn detect(text: &str) -> Vec<Self> {
        let mut found = Vec::new();
        if contains_any(text, FIRST_SEMESTER) {
            found.push(Self::Semester(1));
        }
        if contains_any(text, SECOND_SEMESTER) {
            found.push(Self::Semester(2));
        }
        for caps in QUARTER_PATTERN.captures_iter(text) {
            let digit = caps
                .iter()
                .skip(1)
                .flatten()
                .next()
                .and_then(|m| m.as_str().parse::<u8>().ok());
            if let Some(q) = digit {
                let qualifier = Self::Quarter(q);
                if !found.contains(&qualifier) {
                    found.push(qualifier);
                }
            }
        }
        found
    }

    /// Title fragments accepted for this qualifier.
    ///
    /// Semesters and quarters correspond loosely: semester 1 covers
    /// quarters 1-2 and semester 2 covers quarters 3-4, in both directions.
    pub fn title_terms(self) -> Vec<String> {
        match self {
            Self::Semester(s) => {
                let mut terms = semester_terms(s);
                let first = if s == 1 { 1 } else { 3 };
                terms.extend(quarter_terms(first));
                terms.extend(quarter_terms(first + 1));
                terms
            }
            Self::Quarter(q) => {
                let mut terms = quarter_terms(q);
                terms.extend(semester_terms(q.div_ceil(2)));
                terms
            }
        }
    }

    /// Whether an event title matches this qualifier.
    pub fn matches_title(self, title: &str) -> bool {
        self.title_terms().iter().any(|t| title.contains(t.as_str()))
    }
}

fn semester_terms(semester: u8) -> Vec<String> {
    let table = if semester == 1 { FIRST_SEMESTER } else { SECOND_SEMESTER };
    table.iter().map(|s| s.to_string()).collect()
}

fn quarter_terms(q: u8) -> Vec<String> {
    vec![
        format!("第{}クォーター", q),
        format!("第{}クオーター", q),
        format!("{}クォーター", q),
        format!("{}クオーター", q),
        format!("第{}ターム", q),
        format!("{}ターム", q),
        format!("{}q", q),
        format!("q{}", q),
        format!("quarter {}", q),
    ]
}

static SEASONAL_SEMESTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[春夏秋冬]学期|(?:spring|summer|fall|autumn|winter)\s+(?:semester|term)")
        .expect("Invalid regex")
});

static QUARTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:第\s*([1-4])\s*(?:クォーター|クオーター|ターム|q))|(?:([1-4])\s*(?:クォーター|クオーター|ターム|q))|(?:q\s*([1-4]))|(?:quarter\s*([1-4]))",
    )
    .expect("Invalid regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_detection() {
        assert_eq!(Season::detect("夏休みはいつ?"), Some(Season::Summer));
        assert_eq!(Season::detect("winter break"), Some(Season::Winter));
        assert_eq!(Season::detect("春休み"), Some(Season::Spring));
        assert_eq!(Season::detect("祝日は?"), None);
    }

    #[test]
    fn test_semester_name_is_not_a_season() {
        assert_eq!(Season::detect("春学期の授業開始はいつ?"), None);
        assert_eq!(Season::detect("夏学期"), None);
        assert_eq!(Season::detect("spring semester start"), None);
        assert_eq!(Season::detect("春学期が終わったら春休み"), Some(Season::Spring));
    }

    #[test]
    fn test_qualifier_detection() {
        assert_eq!(TermQualifier::detect("前期の授業開始"), vec![TermQualifier::Semester(1)]);
        assert_eq!(TermQualifier::detect("第3クォーターはいつから"), vec![TermQualifier::Quarter(3)]);
        assert_eq!(TermQualifier::detect("2qの授業終了"), vec![TermQualifier::Quarter(2)]);
        assert_eq!(TermQualifier::detect("quarter 4 end"), vec![TermQualifier::Quarter(4)]);
        assert!(TermQualifier::detect("授業開始はいつ").is_empty());
    }

    #[test]
    fn test_loose_semester_quarter_mapping() {
        assert!(TermQualifier::Semester(1).matches_title("第2クォーター授業開始"));
        assert!(!TermQualifier::Semester(1).matches_title("第3クォーター授業開始"));
        assert!(TermQualifier::Quarter(4).matches_title("後期授業終了"));
        assert!(!TermQualifier::Quarter(1).matches_title("後期授業開始"));
    }
}
