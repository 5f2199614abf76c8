//! Club and circle lookup with weighted keyword scoring.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::dataset::{ClubDataset, ClubRecord, DatasetStore};
use crate::query::{Intent, Resolution, Resolver};
use crate::search::{rank, score, ScoreQuery, ScoreTarget, ScoringRules};
use crate::text::{first_contained, fold_width, tokenize};
use crate::utils::capped_lines;

use super::categories::{touched_groups, GENERIC_TERMS};

/// Clubs fully described in an answer.
pub const TOP_DETAILED: usize = 3;
/// Further club names listed as other candidates.
pub const MAX_OTHERS: usize = 5;
/// Names listed for "what clubs are there".
pub const MAX_LISTED: usize = 20;

pub const NOT_FOUND: &str = "該当するサークル・部活が見つかりませんでした。";

static STOP_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"琉球大学|琉大|大学|部活動|部活|同好会|サークル|クラブ|チーム|部|club|circle|team|[\s\p{P}\p{S}‐‑–—―－-]+",
    )
    .expect("Invalid regex")
});

static QUERY_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"ありますか|あります|ある|ない|について|教えて|知りたい|どこ|いつ|なに|何|って|は|が|の|を|に|で|と|も|か",
    )
    .expect("Invalid regex")
});

static LIST_ALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:どんな|どういう|なに|何)の?\s*(?:部活動|部活|サークル|クラブ|団体|部)|(?:部活動|部活|サークル|クラブ)\s*(?:一覧|全部|すべて|全て|リスト)|(?:list|all)\s+(?:of\s+)?(?:the\s+)?(?:clubs|circles)|what\s+clubs",
    )
    .expect("Invalid regex")
});

/// Lower-case and strip institution names, club suffixes, punctuation and whitespace.
pub fn normalize(text: &str) -> String {
    STOP_TERMS
        .replace_all(&fold_width(text).to_lowercase(), "")
        .into_owned()
}

/// Content words of a query after stop terms and question phrasing are removed.
pub fn extract_terms(text: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for token in tokenize(text) {
        let normalized = normalize(&token);
        for piece in QUERY_NOISE.split(&normalized) {
            if !piece.is_empty() && !terms.iter().any(|t| t == piece) {
                terms.push(piece.to_string());
            }
        }
    }
    terms
}

/// Resolves club questions against the club dataset.
pub struct ClubResolver {
    store: Arc<DatasetStore>,
}

impl ClubResolver {
    pub fn new(store: Arc<DatasetStore>) -> Self {
        Self { store }
    }

    /// Prepare the query side of the scorer.
    pub fn score_query(text: &str) -> ScoreQuery {
        let folded = fold_width(text).to_lowercase();
        ScoreQuery {
            normalized: normalize(text),
            terms: extract_terms(text),
            categories: touched_groups(&folded),
            generic_term: first_contained(&folded, GENERIC_TERMS),
        }
    }

    /// Score one club for a prepared query.
    pub fn score_club(query: &ScoreQuery, club: &ClubRecord) -> u32 {
        let target = ScoreTarget {
            name: &club.name,
            normalized_name: normalize(&club.name),
            text: fold_width(&club.blob()).to_lowercase(),
        };
        score(&ScoringRules::CLUB, query, &target)
    }

    /// Clubs with a positive score, best first, ties in dataset order.
    pub fn ranked<'a>(&self, clubs: &'a [ClubRecord], text: &str) -> Vec<(&'a ClubRecord, u32)> {
        let query = Self::score_query(text);
        rank(clubs.iter().map(|c| (c, Self::score_club(&query, c))))
    }
}

/// Whether the query asks for the whole club list.
fn wants_list(text: &str) -> bool {
    let folded = fold_width(text).to_lowercase();
    if LIST_ALL.is_match(&folded) {
        return true;
    }
    let bare: String = tokenize(&folded).concat();
    GENERIC_TERMS.contains(&bare.as_str())
}

impl Resolver for ClubResolver {
    fn intent(&self) -> Intent {
        Intent::Clubs
    }

    fn resolve(&self, text: &str) -> Resolution {
        let clubs = match self.store.clubs() {
            ClubDataset::Loaded(clubs) => clubs,
            ClubDataset::Malformed(dataset) => {
                return Resolution::Answered(format!(
                    "サークル情報のデータ形式が正しくありません ({} がリスト形式ではありません)。",
                    dataset
                ));
            }
            ClubDataset::Missing => {
                return Resolution::NoMatch("サークル情報のデータが見つかりませんでした。".to_string());
            }
        };

        if wants_list(text) {
            return Resolution::Answered(format_list(clubs));
        }

        let ranked = self.ranked(clubs, text);
        if ranked.is_empty() {
            return Resolution::NoMatch(NOT_FOUND.to_string());
        }

        let mut out = ranked
            .iter()
            .take(TOP_DETAILED)
            .map(|(club, _)| format_club(club))
            .collect::<Vec<_>>()
            .join("\n\n");
        let others: Vec<&str> = ranked
            .iter()
            .skip(TOP_DETAILED)
            .take(MAX_OTHERS)
            .map(|(club, _)| club.name.as_str())
            .collect();
        if !others.is_empty() {
            out.push_str(&format!("\n\n他の候補: {}", others.join("、")));
        }
        Resolution::Answered(out)
    }
}

fn format_club(club: &ClubRecord) -> String {
    let mut lines = vec![format!("【{}】", club.name)];
    if !club.day.is_empty() {
        lines.push(format!("活動日: {}", club.day));
    }
    if !club.location.is_empty() {
        lines.push(format!("場所: {}", club.location));
    }
    if let Some(detail) = &club.detail {
        lines.push(format!("詳細: {}", detail));
    }
    if let Some(sns) = &club.sns {
        lines.push(format!("SNS: {}", sns));
    }
    lines.join("\n")
}

fn format_list(clubs: &[ClubRecord]) -> String {
    if clubs.is_empty() {
        return NOT_FOUND.to_string();
    }
    let (lines, rest) = capped_lines(clubs, MAX_LISTED, |c| format!("- {}", c.name));
    let mut out = format!(
        "登録されているサークル・部活は{}件です:\n{}",
        clubs.len(),
        lines.join("\n")
    );
    if rest > 0 {
        out.push_str(&format!("\n…ほか{}件", rest));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn resolver(clubs: serde_json::Value) -> ClubResolver {
        let mut docs = BTreeMap::new();
        docs.insert("clubs".to_string(), clubs);
        ClubResolver::new(Arc::new(DatasetStore::from_documents(docs)))
    }

    fn sample() -> serde_json::Value {
        json!([
            {"name": "軽音楽部", "day": "毎日", "location": "サークル棟", "detail": "バンド活動"},
            {"name": "サッカー部", "day": "月水金", "location": "陸上競技場", "detail": "サッカーの練習と試合", "sns": "@ryudai_soccer"},
            {"name": "フットサルサークル", "day": "土", "location": "体育館", "detail": "ゆるくフットサル"},
            {"name": "写真同好会", "day": "不定期", "location": "部室", "detail": "撮影会"}
        ])
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("琉大サッカー部!"), "サッカー");
        assert_eq!(normalize("Soccer Club"), "soccer");
        assert_eq!(normalize("ＥＳＳ　サークル"), "ess");
    }

    #[test]
    fn test_extract_terms() {
        assert_eq!(extract_terms("サッカー部ある?"), vec!["サッカー"]);
        assert_eq!(extract_terms("写真 と 軽音"), vec!["写真", "軽音"]);
        assert!(extract_terms("サークルある?").is_empty());
    }

    #[test]
    fn test_soccer_scores_first() {
        let r = resolver(sample());
        let clubs = match r.store.clubs() {
            ClubDataset::Loaded(c) => c.clone(),
            _ => panic!("clubs not loaded"),
        };
        let ranked = r.ranked(&clubs, "サッカー部ある?");
        assert_eq!(ranked[0].0.name, "サッカー部");
        assert!(ranked[0].1 >= 10);

        let text = r.resolve("サッカー部ある?").into_text();
        assert!(text.starts_with("【サッカー部】\n活動日: 月水金"));
        assert!(text.contains("SNS: @ryudai_soccer"));
    }

    #[test]
    fn test_adding_name_raises_score_by_containment() {
        let query_without = ClubResolver::score_query("練習してる?");
        let query_with = ClubResolver::score_query("写真同好会 練習してる?");
        let club = ClubRecord {
            name: "写真同好会".into(),
            day: String::new(),
            location: String::new(),
            detail: None,
            sns: None,
        };
        let before = ClubResolver::score_club(&query_without, &club);
        let after = ClubResolver::score_club(&query_with, &club);
        assert!(after >= before + 8);
    }

    #[test]
    fn test_rescue_bonus() {
        let r = resolver(sample());
        let text = r.resolve("サークルある?").into_text();
        assert!(text.starts_with("【フットサルサークル】"));
        assert!(!text.contains("軽音楽部"));
    }

    #[test]
    fn test_list_all() {
        let r = resolver(sample());
        for q in ["どんなサークルがある?", "サークル", "部活一覧"] {
            let text = r.resolve(q).into_text();
            assert!(text.starts_with("登録されているサークル・部活は4件です:"), "{}", q);
        }
    }

    #[test]
    fn test_list_cap() {
        let clubs: Vec<_> = (0..25).map(|i| json!({"name": format!("団体{}", i)})).collect();
        let text = resolver(json!(clubs)).resolve("サークル一覧").into_text();
        assert_eq!(text.lines().filter(|l| l.starts_with("- ")).count(), MAX_LISTED);
        assert!(text.ends_with("…ほか5件"));
    }

    #[test]
    fn test_other_candidates() {
        let clubs: Vec<_> = (0..10)
            .map(|i| json!({"name": format!("テニス{}", i), "detail": "テニス"}))
            .collect();
        let text = resolver(json!(clubs)).resolve("テニス").into_text();
        assert_eq!(text.matches('【').count(), TOP_DETAILED);
        assert!(text.ends_with("他の候補: テニス3、テニス4、テニス5、テニス6、テニス7"));
    }

    #[test]
    fn test_not_found_and_malformed() {
        let r = resolver(sample());
        assert_eq!(r.resolve("宇宙開発"), Resolution::NoMatch(NOT_FOUND.to_string()));

        let r = resolver(json!({"name": "not a list"}));
        let answer = r.resolve("サッカー");
        assert!(answer.is_answered());
        assert!(answer.text().starts_with("サークル情報のデータ形式が正しくありません"));

        let empty = ClubResolver::new(Arc::new(DatasetStore::default()));
        assert!(!empty.resolve("サッカー").is_answered());
    }
}
