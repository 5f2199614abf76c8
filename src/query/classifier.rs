//! Query Intent Classifier.
//!
//! Two strategies share one interface: ordered keyword rules, and a
//! language model that falls back to those rules whenever it is slow,
//! unreachable, or answers outside the intent set.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::collaborators::{LanguageModel, OllamaClient};
use crate::config::LlmConfig;
use crate::error::Result;
use crate::metrics::get_metrics;
use crate::text::fold_width;
use crate::utils::truncate_str;

use super::types::*;

// ============================================================================
// Strategy interface
// ============================================================================

/// Maps query text to an [`Intent`]. Never fails.
#[async_trait]
pub trait IntentStrategy: Send + Sync {
    async fn classify(&self, text: &str) -> Intent;

    /// Strategy name for logs.
    fn name(&self) -> &'static str;
}

// ============================================================================
// Keyword strategy
// ============================================================================

/// Deterministic keyword rules, first match wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordStrategy;

impl KeywordStrategy {
    pub fn classify_text(&self, text: &str) -> Intent {
        let text = fold_width(text).to_lowercase();
        KEYWORD_RULES
            .iter()
            .find(|(pattern, _)| pattern.is_match(&text))
            .map(|(_, intent)| *intent)
            .unwrap_or(Intent::DataQa)
    }
}

#[async_trait]
impl IntentStrategy for KeywordStrategy {
    async fn classify(&self, text: &str) -> Intent {
        self.classify_text(text)
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

// ============================================================================
// Model strategy
// ============================================================================

const CLASSIFY_PROMPT: &str = "\
あなたは大学の案内チャットボットの分類器です。次の質問を以下のカテゴリのいずれか1つに分類してください。
- calendar: 学年暦、授業期間、休暇、行事、日付
- teacher: 教員、オフィスアワー、研究室
- clubs: サークル、部活動
- weather: 天気
- data_qa: 大学に関するその他の質問
- other: 雑談、大学と無関係な話題
JSON のみで {\"intent\": \"<カテゴリ>\"} の形式で答えてください。

質問: ";

/// Asks a language model for the intent; uses keyword rules on any failure.
pub struct ModelStrategy {
    model: Arc<dyn LanguageModel>,
    fallback: KeywordStrategy,
    timeout: Duration,
}

impl ModelStrategy {
    pub fn new(model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self {
            model,
            fallback: KeywordStrategy,
            timeout,
        }
    }
}

#[async_trait]
impl IntentStrategy for ModelStrategy {
    async fn classify(&self, text: &str) -> Intent {
        let prompt = format!("{}{}", CLASSIFY_PROMPT, text);
        let reason = match tokio::time::timeout(self.timeout, self.model.generate(&prompt, true)).await {
            Ok(Ok(output)) => match parse_model_intent(&output) {
                Some(intent) => {
                    debug!(model = self.model.model_name(), intent = %intent, "Model classified query");
                    return intent;
                }
                None => format!("output outside intent set: {}", truncate_str(&output, 80)),
            },
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {:?}", self.timeout),
        };

        warn!(model = self.model.model_name(), %reason, "Model classification failed; using keyword rules");
        get_metrics().record_collaborator_failure("classifier");
        self.fallback.classify_text(text)
    }

    fn name(&self) -> &'static str {
        "model"
    }
}

/// Read an intent from model output: `{"intent": "..."}` (possibly wrapped
/// in prose) or a bare intent name.
pub fn parse_model_intent(output: &str) -> Option<Intent> {
    let trimmed = output.trim();
    let json_span = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&trimmed[start..=end]),
        _ => None,
    };
    if let Some(span) = json_span {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return value
                .get("intent")
                .and_then(Value::as_str)
                .and_then(Intent::parse);
        }
    }
    Intent::parse(trimmed.trim_matches(|c: char| c == '"' || c == '\'' || c == '.'))
}

// ============================================================================
// Intent Classifier
// ============================================================================

/// Classifies queries, honouring a caller-declared category.
pub struct IntentClassifier {
    strategy: Box<dyn IntentStrategy>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::keyword()
    }
}

impl IntentClassifier {
    /// Keyword rules only.
    pub fn keyword() -> Self {
        Self {
            strategy: Box::new(KeywordStrategy),
        }
    }

    /// Model classification with keyword fallback.
    pub fn with_model(model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self {
            strategy: Box::new(ModelStrategy::new(model, timeout)),
        }
    }

    /// Pick the strategy from configuration.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        if config.enabled && config.classify {
            let model = OllamaClient::from_config(config)?;
            Ok(Self::with_model(
                Arc::new(model),
                Duration::from_secs(config.timeout_secs),
            ))
        } else {
            Ok(Self::keyword())
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// The declared category if it names an intent, otherwise the strategy's answer.
    pub async fn classify(&self, query: &Query) -> Intent {
        if let Some(declared) = query.declared {
            debug!(intent = %declared, "Using declared category");
            return declared;
        }
        let intent = self.strategy.classify(&query.text).await;
        debug!(strategy = self.strategy.name(), intent = %intent, "Classified query");
        intent
    }
}

// ============================================================================
// Keyword rules
// ============================================================================

static BREAK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"休み|休暇|休業|休講|祝日|休日|vacation|holiday|break").expect("Invalid regex")
});
static SCHEDULE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"授業開始|授業終了|開講|学期|前期|後期|クォーター|クオーター|ターム|[1-4]\s*q\b|\bq\s*[1-4]|試験|テスト|期末|中間|成績|履修|行事|日程|カレンダー|学年暦|いつから|いつまで|calendar|semester|quarter|\bexams?\b",
    )
    .expect("Invalid regex")
});
/// Day words and generic "schedule" words. Checked after weather so that
/// "明日の天気" is a weather question.
static DAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"今日|明日|明後日|昨日|予定|スケジュール|\btoday\b|\btomorrow\b|schedule|\bevents?\b")
        .expect("Invalid regex")
});
static TEACHER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"先生|教授|講師|助教|せんせい|教員|オフィスアワー|研究室|ゼミ|professor|\bprof\b|office\s*hours?|\blab\b|teacher|faculty|sensei",
    )
    .expect("Invalid regex")
});
static CLUB_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"サークル|部活|同好会|クラブ|チーム|\bclubs?\b|\bcircles?\b|\bteams?\b|(?:^|[^学全一細幹本支外内])部(?:$|[^屋署分品長門材位局内外下])",
    )
    .expect("Invalid regex")
});
static WEATHER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"天気|気温|天候|weather|forecast|temperature").expect("Invalid regex")
});

static KEYWORD_RULES: LazyLock<[(&'static LazyLock<Regex>, Intent); 6]> = LazyLock::new(|| {
    [
        (&BREAK_PATTERN, Intent::Calendar),
        (&SCHEDULE_PATTERN, Intent::Calendar),
        (&TEACHER_PATTERN, Intent::Teacher),
        (&CLUB_PATTERN, Intent::Clubs),
        (&WEATHER_PATTERN, Intent::Weather),
        (&DAY_PATTERN, Intent::Calendar),
    ]
});

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollaboratorError;

    struct FixedModel(&'static str);

    #[async_trait]
    impl LanguageModel for FixedModel {
        async fn generate(&self, _prompt: &str, json: bool) -> Result<String> {
            assert!(json);
            Ok(self.0.to_string())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingModel;

    #[async_trait]
    impl LanguageModel for FailingModel {
        async fn generate(&self, _prompt: &str, _json: bool) -> Result<String> {
            Err(CollaboratorError::Request("Connection failed".into()).into())
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    struct SlowModel;

    #[async_trait]
    impl LanguageModel for SlowModel {
        async fn generate(&self, _prompt: &str, _json: bool) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("{\"intent\": \"other\"}".to_string())
        }

        fn model_name(&self) -> &str {
            "slow"
        }
    }

    fn keyword(text: &str) -> Intent {
        KeywordStrategy.classify_text(text)
    }

    #[test]
    fn test_keyword_rules() {
        assert_eq!(keyword("夏休みはいつ?"), Intent::Calendar);
        assert_eq!(keyword("今日の予定は?"), Intent::Calendar);
        assert_eq!(keyword("後期の授業開始日"), Intent::Calendar);
        assert_eq!(keyword("２Ｑはいつから"), Intent::Calendar);
        assert_eq!(keyword("田中先生のオフィスアワーは?"), Intent::Teacher);
        assert_eq!(keyword("Prof Smith office hours"), Intent::Teacher);
        assert_eq!(keyword("サッカー部ある?"), Intent::Clubs);
        assert_eq!(keyword("テニスサークル"), Intent::Clubs);
        assert_eq!(keyword("那覇の天気"), Intent::Weather);
        assert_eq!(keyword("図書館の開館時間"), Intent::DataQa);
    }

    #[test]
    fn test_day_words_do_not_hide_weather() {
        assert_eq!(keyword("今日の天気は?"), Intent::Weather);
        assert_eq!(keyword("明日の天気"), Intent::Weather);
        assert_eq!(keyword("tomorrow weather"), Intent::Weather);
        assert_eq!(keyword("明日の予定"), Intent::Calendar);
        assert_eq!(keyword("2024/9/1のスケジュール"), Intent::Calendar);
    }

    #[test]
    fn test_club_suffix_followed_by_any_particle() {
        assert_eq!(keyword("サッカー部を探してる"), Intent::Clubs);
        assert_eq!(keyword("サッカー部で活動したい"), Intent::Clubs);
        assert_eq!(keyword("テニス部もある?"), Intent::Clubs);
        assert_eq!(keyword("写真部か美術部"), Intent::Clubs);
        assert_eq!(keyword("軽音部"), Intent::Clubs);
    }

    #[test]
    fn test_faculty_word_is_not_a_club() {
        assert_eq!(keyword("工学部の場所"), Intent::DataQa);
        assert_eq!(keyword("部屋の予約"), Intent::DataQa);
        assert_eq!(keyword("全部教えて"), Intent::DataQa);
        assert_eq!(keyword("本部棟はどこ"), Intent::DataQa);
    }

    #[test]
    fn test_rule_order() {
        // break vocabulary wins over club vocabulary
        assert_eq!(keyword("サークルの休み"), Intent::Calendar);
        // teacher vocabulary wins over weather
        assert_eq!(keyword("先生と天気の話"), Intent::Teacher);
    }

    #[test]
    fn test_parse_model_intent() {
        assert_eq!(parse_model_intent("{\"intent\": \"clubs\"}"), Some(Intent::Clubs));
        assert_eq!(
            parse_model_intent("Sure! {\"intent\": \"Teacher\"} hope that helps"),
            Some(Intent::Teacher)
        );
        assert_eq!(parse_model_intent("\"weather\""), Some(Intent::Weather));
        assert_eq!(parse_model_intent("{\"intent\": \"sports\"}"), None);
        assert_eq!(parse_model_intent("I don't know"), None);
    }

    #[tokio::test]
    async fn test_model_answer_used() {
        let classifier =
            IntentClassifier::with_model(Arc::new(FixedModel("{\"intent\":\"other\"}")), Duration::from_secs(1));
        assert_eq!(classifier.classify(&Query::new("サッカー部ある?")).await, Intent::Other);
        assert_eq!(classifier.strategy_name(), "model");
    }

    #[tokio::test]
    async fn test_model_garbage_falls_back() {
        let classifier = IntentClassifier::with_model(Arc::new(FixedModel("bananas")), Duration::from_secs(1));
        assert_eq!(classifier.classify(&Query::new("サッカー部ある?")).await, Intent::Clubs);
    }

    #[tokio::test]
    async fn test_model_error_falls_back() {
        let classifier = IntentClassifier::with_model(Arc::new(FailingModel), Duration::from_secs(1));
        assert_eq!(classifier.classify(&Query::new("今日の予定")).await, Intent::Calendar);
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_timeout_falls_back() {
        let classifier = IntentClassifier::with_model(Arc::new(SlowModel), Duration::from_millis(100));
        assert_eq!(classifier.classify(&Query::new("那覇の天気")).await, Intent::Weather);
    }

    #[tokio::test]
    async fn test_declared_category_overrides() {
        let classifier = IntentClassifier::keyword();
        let query = Query::new("サッカー部ある?").with_category("calendar");
        assert_eq!(classifier.classify(&query).await, Intent::Calendar);

        let query = Query::new("サッカー部ある?").with_category("general");
        assert_eq!(classifier.classify(&query).await, Intent::Clubs);
    }

    #[test]
    fn test_from_config() {
        let config = LlmConfig::default();
        assert_eq!(IntentClassifier::from_config(&config).unwrap().strategy_name(), "keyword");

        let config = LlmConfig {
            enabled: true,
            ..LlmConfig::default()
        };
        assert_eq!(IntentClassifier::from_config(&config).unwrap().strategy_name(), "model");
    }
}
