//! Query Executor.
//!
//! Routes a classified query to its resolver and walks the fallback chain
//! when the resolver has nothing: conversational model, then fallback
//! search, then the resolver's own "not found" message.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::calendar::CalendarResolver;
use crate::clubs::ClubResolver;
use crate::collaborators::{LanguageModel, OllamaClient, OpenMeteoWeather, WeatherService};
use crate::config::Config;
use crate::dataset::DatasetStore;
use crate::directory::DirectoryResolver;
use crate::error::Result;
use crate::metrics::get_metrics;
use crate::search::{format_hits, FallbackSearch, SearchHit, NO_RESULTS};

use super::classifier::IntentClassifier;
use super::types::*;

const CONVERSATION_PROMPT: &str = "\
あなたは大学の案内アシスタントです。参考情報を踏まえて、質問に日本語で簡潔に答えてください。
参考情報に答えがない場合は推測せず、わからないと答えてください。
";

// ============================================================================
// Query Executor
// ============================================================================

/// Runs one query through classification, resolution and fallbacks.
pub struct QueryExecutor {
    store: Arc<DatasetStore>,
    classifier: IntentClassifier,
    resolvers: Vec<Box<dyn Resolver>>,
    search: FallbackSearch,
    top_k: usize,
    conversation: Option<Arc<dyn LanguageModel>>,
    conversation_timeout: Duration,
    weather: Option<Arc<dyn WeatherService>>,
    weather_timeout: Duration,
}

impl QueryExecutor {
    /// Build the pipeline and its collaborators from configuration.
    pub fn from_config(store: Arc<DatasetStore>, config: &Config) -> Result<Self> {
        let conversation: Option<Arc<dyn LanguageModel>> = if config.llm.enabled {
            Some(Arc::new(OllamaClient::from_config(&config.llm)?))
        } else {
            None
        };
        let weather: Option<Arc<dyn WeatherService>> = if config.weather.enabled {
            Some(Arc::new(OpenMeteoWeather::from_config(&config.weather)?))
        } else {
            None
        };

        Ok(Self::new(store, config)
            .with_classifier(IntentClassifier::from_config(&config.llm)?)
            .with_language_model(conversation)
            .with_weather(weather))
    }

    /// Keyword classification and no collaborators.
    pub fn new(store: Arc<DatasetStore>, config: &Config) -> Self {
        let resolvers: Vec<Box<dyn Resolver>> = vec![
            Box::new(CalendarResolver::new(store.clone(), config.data.timezone())),
            Box::new(DirectoryResolver::new(store.clone())),
            Box::new(ClubResolver::new(store.clone())),
        ];
        Self {
            search: FallbackSearch::new(store.clone(), config.search.preview_chars),
            store,
            classifier: IntentClassifier::keyword(),
            resolvers,
            top_k: config.search.top_k,
            conversation: None,
            conversation_timeout: Duration::from_secs(config.llm.timeout_secs),
            weather: None,
            weather_timeout: Duration::from_secs(config.weather.timeout_secs),
        }
    }

    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_language_model(mut self, model: Option<Arc<dyn LanguageModel>>) -> Self {
        self.conversation = model;
        self
    }

    pub fn with_weather(mut self, weather: Option<Arc<dyn WeatherService>>) -> Self {
        self.weather = weather;
        self
    }

    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Answer a query. Never fails; every path ends in a textual answer.
    pub async fn execute(&self, query: &Query) -> Answer {
        let start = Instant::now();
        let intent = self.classifier.classify(query).await;

        let answer = match intent {
            Intent::Calendar | Intent::Teacher | Intent::Clubs => self.resolve(intent, &query.text).await,
            Intent::Weather => self.report_weather(&query.text).await,
            Intent::DataQa | Intent::Other => self.fallback(intent, &query.text, None).await,
        };

        let elapsed = start.elapsed();
        get_metrics().record_query(intent.as_str(), elapsed);
        debug!(
            intent = %intent,
            source = ?answer.source,
            elapsed_ms = elapsed.as_millis() as u64,
            "Query answered"
        );
        answer
    }

    async fn resolve(&self, intent: Intent, text: &str) -> Answer {
        let Some(resolver) = self.resolvers.iter().find(|r| r.intent() == intent) else {
            return self.fallback(intent, text, None).await;
        };
        match resolver.resolve(text) {
            Resolution::Answered(content) => Answer {
                content,
                intent,
                source: AnswerSource::Resolver,
            },
            Resolution::NoMatch(message) => {
                debug!(intent = %intent, "Resolver found nothing; falling back");
                self.fallback(intent, text, Some(message)).await
            }
        }
    }

    async fn report_weather(&self, text: &str) -> Answer {
        if let Some(service) = &self.weather {
            match tokio::time::timeout(self.weather_timeout, service.report(text)).await {
                Ok(Ok(content)) => {
                    return Answer {
                        content,
                        intent: Intent::Weather,
                        source: AnswerSource::Weather,
                    };
                }
                Ok(Err(e)) => warn!(error = %e, "Weather lookup failed"),
                Err(_) => warn!("Weather lookup timed out"),
            }
            get_metrics().record_collaborator_failure("weather");
        }
        self.fallback(Intent::Weather, text, None).await
    }

    /// Conversational model, then fallback search, then `not_found`.
    async fn fallback(&self, intent: Intent, text: &str, not_found: Option<String>) -> Answer {
        let hits = self.search.hits(text, self.top_k);

        if let Some(content) = self.converse(text, &hits).await {
            return Answer {
                content,
                intent,
                source: AnswerSource::Conversation,
            };
        }

        if !hits.is_empty() {
            get_metrics().fallback_searches_total.inc();
            return Answer {
                content: format_hits(&hits),
                intent,
                source: AnswerSource::FallbackSearch,
            };
        }

        Answer {
            content: not_found.unwrap_or_else(|| NO_RESULTS.to_string()),
            intent,
            source: AnswerSource::NotFound,
        }
    }

    async fn converse(&self, text: &str, hits: &[SearchHit]) -> Option<String> {
        let model = self.conversation.as_ref()?;
        let prompt = conversation_prompt(text, hits);
        match tokio::time::timeout(self.conversation_timeout, model.generate(&prompt, false)).await {
            Ok(Ok(content)) if !content.trim().is_empty() => Some(content),
            Ok(Ok(_)) => {
                warn!(model = model.model_name(), "Conversation model returned nothing");
                get_metrics().record_collaborator_failure("conversation");
                None
            }
            Ok(Err(e)) => {
                warn!(model = model.model_name(), error = %e, "Conversation model failed");
                get_metrics().record_collaborator_failure("conversation");
                None
            }
            Err(_) => {
                warn!(model = model.model_name(), "Conversation model timed out");
                get_metrics().record_collaborator_failure("conversation");
                None
            }
        }
    }
}

/// Question plus the top search hits as context.
pub fn conversation_prompt(text: &str, hits: &[SearchHit]) -> String {
    let mut prompt = String::from(CONVERSATION_PROMPT);
    if !hits.is_empty() {
        prompt.push_str("\n参考情報:\n");
        for hit in hits {
            prompt.push_str(&format!("- [{}] {}\n", hit.dataset, hit.preview));
        }
    }
    prompt.push_str(&format!("\n質問: {}\n回答:", text));
    prompt
}
