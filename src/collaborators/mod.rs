//! Optional network collaborators: a text-generation model and a weather service.
//!
//! Both are reached over HTTP with a bounded timeout. Callers treat every
//! failure as "unavailable" and continue on the deterministic path.

pub mod ollama;
pub mod traits;
pub mod weather;

pub use ollama::OllamaClient;
pub use traits::{LanguageModel, WeatherService};
pub use weather::{describe_weather_code, extract_location, OpenMeteoWeather};
