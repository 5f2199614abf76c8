//! Weighted term scoring shared by the club resolver and fallback search.
//!
//! A score is the sum of four rules, each enabled by a non-zero weight:
//!
//! - **containment**: normalized candidate name and normalized query contain one another
//! - **term**: each query term found literally in the candidate text
//! - **category**: each distinct keyword of a touched category group found in the candidate text
//! - **rescue**: the query has no usable terms but names a generic term the candidate name shares

/// Per-rule weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    pub containment: u32,
    pub term: u32,
    pub category: u32,
    pub rescue: u32,
}

impl ScoringRules {
    /// Club matching: name containment dominates, categories break ties.
    pub const CLUB: Self = Self {
        containment: 8,
        term: 1,
        category: 2,
        rescue: 1,
    };

    /// Plain keyword counting.
    pub const KEYWORD: Self = Self {
        containment: 0,
        term: 1,
        category: 0,
        rescue: 0,
    };
}

/// A query prepared for scoring.
#[derive(Debug, Clone, Default)]
pub struct ScoreQuery {
    /// Normalized whole query, compared against normalized candidate names.
    pub normalized: String,
    /// Lower-cased terms looked up in candidate text.
    pub terms: Vec<String>,
    /// Keyword groups the query touched.
    pub categories: Vec<&'static [&'static str]>,
    /// Bare generic term present in the query (e.g. "サークル").
    pub generic_term: Option<&'static str>,
}

impl ScoreQuery {
    /// A query scored by terms only.
    pub fn terms(terms: Vec<String>) -> Self {
        Self {
            terms,
            ..Default::default()
        }
    }
}

/// What a candidate exposes to the scorer.
#[derive(Debug, Clone, Default)]
pub struct ScoreTarget<'a> {
    /// Raw display name.
    pub name: &'a str,
    /// Normalized name for containment.
    pub normalized_name: String,
    /// Lower-cased searchable text.
    pub text: String,
}

/// Score a candidate against a query.
pub fn score(rules: &ScoringRules, query: &ScoreQuery, target: &ScoreTarget<'_>) -> u32 {
    let mut total = 0;

    if rules.containment > 0
        && !query.normalized.is_empty()
        && !target.normalized_name.is_empty()
        && (query.normalized.contains(&target.normalized_name)
            || target.normalized_name.contains(&query.normalized))
    {
        total += rules.containment;
    }

    if rules.term > 0 {
        let hits = query
            .terms
            .iter()
            .filter(|t| !t.is_empty() && target.text.contains(t.as_str()))
            .count() as u32;
        total += hits * rules.term;
    }

    if rules.category > 0 {
        let mut seen: Vec<&str> = Vec::new();
        for group in &query.categories {
            for keyword in group.iter() {
                if !seen.contains(keyword) && target.text.contains(&keyword.to_lowercase()) {
                    seen.push(keyword);
                }
            }
        }
        total += seen.len() as u32 * rules.category;
    }

    if rules.rescue > 0 && query.terms.is_empty() {
        if let Some(term) = query.generic_term {
            if target.name.to_lowercase().contains(term) {
                total += rules.rescue;
            }
        }
    }

    total
}

/// Keep positively scored items, ordered by descending score.
///
/// The sort is stable, so equal scores keep their input order.
pub fn rank<T>(scored: impl IntoIterator<Item = (T, u32)>) -> Vec<(T, u32)> {
    let mut ranked: Vec<(T, u32)> = scored.into_iter().filter(|(_, s)| *s > 0).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
