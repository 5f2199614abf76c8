//! Cross-dataset keyword search over every loaded document.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::dataset::DatasetStore;
use crate::text::{fold_width, tokenize};
use crate::utils::truncate_chars;

use super::scorer::{rank, score, ScoreQuery, ScoreTarget, ScoringRules};

/// Message returned when nothing matches.
pub const NO_RESULTS: &str = "該当する情報が見つかりませんでした。質問の言い方を変えてお試しください。";

/// One ranked item from a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Dataset the item came from.
    pub dataset: String,
    /// Position within the dataset when the dataset is a list.
    pub index: Option<usize>,
    /// Number of query terms found in the item.
    pub score: u32,
    /// Serialized item, truncated.
    pub preview: String,
}

impl SearchHit {
    fn label(&self) -> String {
        match self.index {
            Some(i) => format!("{}#{}", self.dataset, i),
            None => self.dataset.clone(),
        }
    }
}

/// Keyword search across all datasets, used when no resolver applies.
pub struct FallbackSearch {
    store: Arc<DatasetStore>,
    preview_chars: usize,
}

impl FallbackSearch {
    pub fn new(store: Arc<DatasetStore>, preview_chars: usize) -> Self {
        Self {
            store,
            preview_chars,
        }
    }

    /// Rank list elements and standalone documents by query-term overlap.
    ///
    /// Returns at most `top_k` hits, each with score >= 1.
    pub fn hits(&self, text: &str, top_k: usize) -> Vec<SearchHit> {
        let query = ScoreQuery::terms(tokenize(text));
        if query.terms.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut scored = Vec::new();
        for (name, document) in self.store.documents() {
            match document {
                Value::Array(items) => {
                    for (i, item) in items.iter().enumerate() {
                        scored.push(self.score_item(&query, name, Some(i), item));
                    }
                }
                other => scored.push(self.score_item(&query, name, None, other)),
            }
        }

        rank(scored)
            .into_iter()
            .take(top_k)
            .map(|(hit, _)| hit)
            .collect()
    }

    fn score_item(
        &self,
        query: &ScoreQuery,
        dataset: &str,
        index: Option<usize>,
        item: &Value,
    ) -> (SearchHit, u32) {
        let serialized = item.to_string();
        let target = ScoreTarget {
            name: dataset,
            text: fold_width(&serialized).to_lowercase(),
            ..Default::default()
        };
        let s = score(&ScoringRules::KEYWORD, query, &target);
        let hit = SearchHit {
            dataset: dataset.to_string(),
            index,
            score: s,
            preview: truncate_chars(&serialized, self.preview_chars).to_string(),
        };
        (hit, s)
    }

    /// Formatted answer listing the top hits, or [`NO_RESULTS`].
    pub fn search(&self, text: &str, top_k: usize) -> String {
        format_hits(&self.hits(text, top_k))
    }
}

/// Render hits as a human-readable answer.
pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return NO_RESULTS.to_string();
    }
    let mut out = String::from("関連しそうな情報が見つかりました:");
    for hit in hits {
        out.push_str(&format!("\n\n[{}] (一致 {})\n{}", hit.label(), hit.score, hit.preview));
    }
    out
}
