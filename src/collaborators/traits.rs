//! Collaborator trait definitions.

use async_trait::async_trait;

/// A text-generation model reached over the network.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// With `json` set, the model is asked to answer with a JSON object.
    async fn generate(&self, prompt: &str, json: bool) -> crate::error::Result<String>;

    /// Model identifier used in logs.
    fn model_name(&self) -> &str;
}

/// Current weather for a place named in a query.
#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Render a short weather report for the place the query mentions,
    /// or for the configured default location.
    async fn report(&self, query: &str) -> crate::error::Result<String>;
}
