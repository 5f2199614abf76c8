//! Open-Meteo weather lookup: geocode a place name, then fetch current conditions.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::WeatherConfig;
use crate::error::{CollaboratorError, Result};
use crate::text::fold_width;

use super::WeatherService;

static JA_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^\sの、。,.?？!！]+)の(?:天気|気温|天候)").expect("Invalid regex")
});

static EN_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)weather\s+(?:in|at|for)\s+([a-z][a-z\s]*[a-z])").expect("Invalid regex")
});

/// Time words that can precede "の天気" without naming a place.
const TIME_WORDS: &[&str] = &["今日", "明日", "明後日", "あした", "きょう", "今", "現在", "週末", "今週"];

/// The place a weather question names, if any.
pub fn extract_location(text: &str) -> Option<String> {
    let text = fold_width(text);
    for caps in JA_LOCATION.captures_iter(&text) {
        let place = caps[1].trim();
        if !place.is_empty() && !TIME_WORDS.contains(&place) {
            return Some(place.to_string());
        }
    }
    EN_LOCATION
        .captures(&text)
        .map(|caps| caps[1].trim().to_string())
}

/// Japanese description of a WMO weather interpretation code.
pub fn describe_weather_code(code: u32) -> &'static str {
    match code {
        0 => "快晴",
        1 => "晴れ",
        2 => "一部曇り",
        3 => "曇り",
        45 | 48 => "霧",
        51 | 53 | 55 => "霧雨",
        56 | 57 => "着氷性の霧雨",
        61 => "小雨",
        63 => "雨",
        65 => "大雨",
        66 | 67 => "着氷性の雨",
        71 | 73 | 75 | 77 => "雪",
        80 | 81 | 82 => "にわか雨",
        85 | 86 => "にわか雪",
        95 => "雷雨",
        96 | 99 => "雹を伴う雷雨",
        _ => "不明",
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Clone, Deserialize)]
struct Place {
    name: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    #[serde(default)]
    windspeed: f64,
    weathercode: u32,
}

/// [`WeatherService`] backed by the Open-Meteo geocoding and forecast APIs.
pub struct OpenMeteoWeather {
    client: Client,
    geocoding_url: String,
    forecast_url: String,
    default_location: String,
}

impl OpenMeteoWeather {
    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CollaboratorError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            default_location: config.default_location.clone(),
        })
    }

    async fn geocode(&self, name: &str) -> Result<Place> {
        let response = self
            .client
            .get(&self.geocoding_url)
            .query(&[("name", name), ("count", "1"), ("language", "ja"), ("format", "json")])
            .send()
            .await
            .map_err(CollaboratorError::from)?
            .error_for_status()
            .map_err(CollaboratorError::from)?;

        let parsed: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Unparsable(e.to_string()))?;
        parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| CollaboratorError::NotFound(name.to_string()).into())
    }

    async fn current(&self, place: &Place) -> Result<CurrentWeather> {
        let response = self
            .client
            .get(&self.forecast_url)
            .query(&[
                ("latitude", place.latitude.to_string()),
                ("longitude", place.longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(CollaboratorError::from)?
            .error_for_status()
            .map_err(CollaboratorError::from)?;

        let parsed: ForecastResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Unparsable(e.to_string()))?;
        Ok(parsed.current_weather)
    }
}

#[async_trait]
impl WeatherService for OpenMeteoWeather {
    async fn report(&self, query: &str) -> Result<String> {
        let name = extract_location(query).unwrap_or_else(|| self.default_location.clone());
        debug!(location = %name, "Looking up weather");

        let place = self.geocode(&name).await?;
        let weather = self.current(&place).await?;
        Ok(format!(
            "{}の現在の天気: {}、気温 {:.1}℃、風速 {:.1} km/h",
            place.name,
            describe_weather_code(weather.weathercode),
            weather.temperature,
            weather.windspeed
        ))
    }
}
