//! Weather feed
//!
//! Returns a weather snapshot for a city. When an OpenWeatherMap API key is
//! configured the upstream provider is queried; otherwise, or whenever the
//! upstream call fails, a synthetic snapshot is served. Callers never see an
//! error from this module.
//!
//! Snapshots use the OpenWeatherMap "current weather" layout
//! (`name`, `main`, `weather[]`, `wind`) so the browser client can read live
//! and synthetic data the same way.

use std::time::Duration;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::config::WeatherConfig;

/// Descriptions used by the synthetic generator
const SYNTHETIC_DESCRIPTIONS: [&str; 4] = ["Sunny", "Cloudy", "Partly Cloudy", "Rainy"];

/// Where a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    Live,
    Synthetic,
}

/// Main readings (°C, %, hPa)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: u32,
}

/// Sky condition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// Wind (m/s)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
}

/// Point-in-time weather for one city
///
/// `weather` always holds at least one condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    pub main: Readings,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    pub source: SnapshotSource,
}

impl WeatherSnapshot {
    /// Randomly generated readings, used when no provider is configured
    pub fn synthetic(city: &str, rng: &mut impl Rng) -> Self {
        let temp = f64::from(rng.random_range(10..35_i32));
        let speed = (rng.random_range(0.0..10.0_f64) * 10.0).round() / 10.0;
        let description = SYNTHETIC_DESCRIPTIONS
            .choose(rng)
            .copied()
            .unwrap_or("Sunny");

        Self {
            name: city.to_string(),
            main: Readings {
                temp,
                feels_like: f64::from(rng.random_range(10..35_i32)),
                humidity: rng.random_range(30..80),
                pressure: rng.random_range(990..=1030),
            },
            weather: vec![Condition {
                description: description.to_string(),
                icon: "01d".to_string(),
            }],
            wind: Wind { speed },
            source: SnapshotSource::Synthetic,
        }
    }

    /// Fixed readings served when the upstream provider fails
    pub fn fallback(city: &str) -> Self {
        Self {
            name: city.to_string(),
            main: Readings {
                temp: 18.0,
                feels_like: 18.0,
                humidity: 65,
                pressure: 1013,
            },
            weather: vec![Condition {
                description: "Partly Cloudy".to_string(),
                icon: "02d".to_string(),
            }],
            wind: Wind { speed: 5.2 },
            source: SnapshotSource::Synthetic,
        }
    }

    /// Description of the primary condition
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or_default()
    }
}

/// Upstream provider failure; always masked by a fallback snapshot
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    #[error("Invalid upstream response: {0}")]
    Decode(String),
}

// ============================================================================
// OpenWeatherMap response
// ============================================================================

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: String,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<Condition>,
    #[serde(default)]
    wind: Wind,
}

/// Upstream numbers may arrive as floats
#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: f64,
}

impl From<OwmResponse> for WeatherSnapshot {
    fn from(resp: OwmResponse) -> Self {
        let mut weather = resp.weather;
        if weather.is_empty() {
            weather.push(Condition::default());
        }

        Self {
            name: resp.name,
            main: Readings {
                temp: resp.main.temp,
                feels_like: resp.main.feels_like,
                humidity: resp.main.humidity.round().clamp(0.0, 100.0) as u8,
                pressure: resp.main.pressure.round().max(0.0) as u32,
            },
            weather,
            wind: resp.wind,
            source: SnapshotSource::Live,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Weather snapshot provider
pub struct WeatherClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    default_city: String,
    timeout: Duration,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.effective_api_key().map(str::to_string),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_city: config.default_city.clone(),
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
        }
    }

    /// Whether snapshots come from the upstream provider
    pub fn is_live(&self) -> bool {
        self.api_key.is_some()
    }

    /// Requested city, or the configured default when missing/blank
    pub fn resolve_city(&self, city: Option<&str>) -> String {
        city.map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.default_city)
            .to_string()
    }

    /// Current snapshot for `city`. Never fails.
    pub async fn snapshot(&self, city: Option<&str>) -> WeatherSnapshot {
        let city = self.resolve_city(city);

        let Some(api_key) = self.api_key.as_deref() else {
            return WeatherSnapshot::synthetic(&city, &mut rand::rng());
        };

        match self.fetch(&city, api_key).await {
            Ok(snapshot) => {
                tracing::debug!(%city, description = snapshot.description(), "live weather");
                snapshot
            }
            Err(e) => {
                tracing::warn!(%city, error = %e, "weather upstream unavailable, using fallback");
                WeatherSnapshot::fallback(&city)
            }
        }
    }

    async fn fetch(&self, city: &str, api_key: &str) -> Result<WeatherSnapshot, UpstreamError> {
        let timeout_ms = self.timeout.as_millis() as u64;

        let response = self
            .http
            .get(format!("{}/weather", self.base_url))
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout(timeout_ms)
                } else {
                    UpstreamError::Connection(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status().as_u16()));
        }

        let body: OwmResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;
        Ok(body.into())
    }
}
