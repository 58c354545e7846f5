// src/config.rs

use crate::domain::condition::Condition;
use crate::domain::filter::SearchCriteria;
use crate::errors::{AppError, AppResult};
use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for a research run. Every section falls back to its defaults,
/// so a YAML file only needs the keys it wants to change.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target_towns: Vec<String>,
    pub criteria: SearchCriteria,
    pub email: EmailConfig,
    pub database_path: PathBuf,
    pub output_dir: PathBuf,
    pub wishlist_path: PathBuf,
    pub schedule: Schedule,
    pub log: LogConfig,
    pub http: HttpConfig,
    pub delays: Delays,
    pub limits: Limits,
    pub translate: TranslateConfig,
    pub geocode: GeocodeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_towns: vec![
                "Crotone".into(),
                "Catania".into(),
                "Andria".into(),
                "Rodi Garganico".into(),
            ],
            criteria: SearchCriteria::default(),
            email: EmailConfig::default(),
            database_path: PathBuf::from("properties.db"),
            output_dir: PathBuf::from("."),
            wishlist_path: PathBuf::from("family_wishlist.json"),
            schedule: Schedule::default(),
            log: LogConfig::default(),
            http: HttpConfig::default(),
            delays: Delays::default(),
            limits: Limits::default(),
            translate: TranslateConfig::default(),
            geocode: GeocodeConfig::default(),
        }
    }
}

impl Config {
    /// Loads the YAML file when given, then applies secrets from the environment.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p).map_err(|e| {
                    AppError::Config(format!("Failed to read {}: {e}", p.display()))
                })?;
                Self::from_yaml(&text)?
            }
            None => Self::default(),
        };

        if let Ok(key) = std::env::var("BREVO_API_KEY") {
            config.email.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("TRANSLATE_API_KEY") {
            config.translate.api_key = Some(key);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.criteria.min_price > self.criteria.max_price {
            return Err(AppError::Config(format!(
                "min_price ({}) is greater than max_price ({})",
                self.criteria.min_price, self.criteria.max_price
            )));
        }
        if self.target_towns.is_empty() {
            return Err(AppError::Config("target_towns is empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub sender_email: String,
    pub sender_name: String,
    pub recipients: Vec<String>,
}

impl EmailConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
            && !self.sender_email.is_empty()
            && !self.recipients.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Once,
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Schedule {
    pub frequency: Frequency,
    /// Local time of day, "HH:MM".
    pub at: String,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            frequency: Frequency::Weekly,
            at: "09:00".into(),
        }
    }
}

impl Schedule {
    /// Next run strictly after `now`. Weekly runs keep the weekday of `now`.
    pub fn next_run_after(&self, now: NaiveDateTime) -> AppResult<Option<NaiveDateTime>> {
        let at = NaiveTime::parse_from_str(&self.at, "%H:%M")
            .map_err(|e| AppError::Config(format!("Invalid schedule time '{}': {e}", self.at)))?;

        let today = now.date().and_time(at);
        let next = match self.frequency {
            Frequency::Once => return Ok(None),
            Frequency::Daily => {
                if today > now {
                    today
                } else {
                    today + ChronoDuration::days(1)
                }
            }
            Frequency::Weekly => today + ChronoDuration::days(7),
        };
        Ok(Some(next))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: Some(PathBuf::from("property_research.log")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub cache_ttl_secs: i64,
    pub max_attempts: u32,
    pub render_js: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            cache_ttl_secs: 3600,
            max_attempts: 3,
            render_js: false,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Delays {
    pub listing_ms: u64,
    pub casa_listing_ms: u64,
    pub town_ms: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            listing_ms: 1000,
            casa_listing_ms: 500,
            town_ms: 2000,
        }
    }
}

impl Delays {
    pub fn none() -> Self {
        Self {
            listing_ms: 0,
            casa_listing_ms: 0,
            town_ms: 0,
        }
    }
}

/// Upper bound on cards parsed per search page.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub immobiliare: usize,
    pub casa: usize,
    pub collector: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            immobiliare: 20,
            casa: 15,
            collector: 20,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// LibreTranslate-compatible endpoint. Unset means descriptions stay Italian.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocodeConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://nominatim.openstreetmap.org/search".into(),
        }
    }
}

pub fn default_acceptable_conditions() -> Vec<Condition> {
    vec![
        Condition::Excellent,
        Condition::Good,
        Condition::Habitable,
        Condition::MinorRenovation,
    ]
}
