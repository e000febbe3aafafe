use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::acceptance::BandedAcceptance;
use crate::engine::anchor::RatioAnchor;
use crate::engine::ladder::SteppedLadder;
use crate::engine::offers::GapOfferEngine;
use crate::engine::phase::PhaseSchedule;
use crate::engine::{DefaultBuyerPolicy, DeterministicBuyerPolicy};
use crate::framing::{default_keywords, MessageFramer};

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub policy: PolicyConfig,
    pub logging: LoggingConfig,
}

/// Personality constants for one buyer. Immutable once a session is created,
/// so differently configured sessions can run side by side.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyConfig {
    pub anchor_ratio: Decimal,
    pub max_rounds: u8,
    pub opening_through: u8,
    pub moderate_through: u8,
    pub opening_rate: Decimal,
    pub moderate_rate: Decimal,
    pub pressure_rate: Decimal,
    pub early_accept_ratio: Decimal,
    pub pressure_accept_ratio: Decimal,
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub preset: Option<String>,
    pub anchor_ratio: Option<Decimal>,
    pub max_rounds: Option<u8>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            anchor_ratio: Decimal::new(65, 2),
            max_rounds: 10,
            opening_through: 3,
            moderate_through: 6,
            opening_rate: Decimal::new(5, 2),
            moderate_rate: Decimal::new(10, 2),
            pressure_rate: Decimal::new(15, 2),
            early_accept_ratio: Decimal::new(90, 2),
            pressure_accept_ratio: Decimal::ONE,
            keywords: default_keywords(),
        }
    }
}

impl PolicyConfig {
    /// Composed persona: patient 0.65 anchor, uniform 90% acceptance band in
    /// every non-final phase.
    pub fn composed() -> Self {
        Self { pressure_accept_ratio: Decimal::new(90, 2), ..Self::default() }
    }

    /// Insider persona: higher 0.80 anchor, accepts up to market price under
    /// pressure.
    pub fn insider() -> Self {
        Self { anchor_ratio: Decimal::new(80, 2), ..Self::default() }
    }

    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::default()),
            "composed" => Ok(Self::composed()),
            "insider" => Ok(Self::insider()),
            other => Err(ConfigError::Validation(format!(
                "unsupported policy preset `{other}` (expected default|composed|insider)"
            ))),
        }
    }

    pub fn schedule(&self) -> PhaseSchedule {
        PhaseSchedule::new(self.opening_through, self.moderate_through, self.max_rounds)
    }

    pub fn build_policy(&self) -> DefaultBuyerPolicy {
        DeterministicBuyerPolicy::new(
            self.schedule(),
            RatioAnchor::new(self.anchor_ratio),
            GapOfferEngine::new(SteppedLadder::new(
                self.opening_rate,
                self.moderate_rate,
                self.pressure_rate,
            )),
            BandedAcceptance::new(self.early_accept_ratio, self.pressure_accept_ratio),
        )
    }

    pub fn framer(&self) -> MessageFramer {
        MessageFramer::new(self.keywords.clone())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.anchor_ratio <= Decimal::ZERO || self.anchor_ratio > Decimal::ONE {
            return Err(ConfigError::Validation(
                "policy.anchor_ratio must be in range (0, 1]".to_string(),
            ));
        }

        if self.max_rounds < 1 {
            return Err(ConfigError::Validation(
                "policy.max_rounds must be at least 1".to_string(),
            ));
        }

        if self.opening_through < 1 || self.moderate_through <= self.opening_through {
            return Err(ConfigError::Validation(
                "policy phase boundaries must satisfy 1 <= opening_through < moderate_through"
                    .to_string(),
            ));
        }

        for (name, rate) in [
            ("opening_rate", self.opening_rate),
            ("moderate_rate", self.moderate_rate),
            ("pressure_rate", self.pressure_rate),
        ] {
            if rate <= Decimal::ZERO || rate >= Decimal::ONE {
                return Err(ConfigError::Validation(format!(
                    "policy.{name} must be in range (0, 1)"
                )));
            }
        }

        if self.opening_rate > self.moderate_rate || self.moderate_rate > self.pressure_rate {
            return Err(ConfigError::Validation(
                "policy concession rates must be non-decreasing across phases".to_string(),
            ));
        }

        if self.early_accept_ratio <= Decimal::ZERO
            || self.early_accept_ratio > self.pressure_accept_ratio
            || self.pressure_accept_ratio > Decimal::TWO
        {
            return Err(ConfigError::Validation(
                "policy acceptance ratios must satisfy 0 < early_accept_ratio <= pressure_accept_ratio <= 2"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("haggle.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides)?;
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(policy) = patch.policy {
            if let Some(preset) = policy.preset {
                self.policy = PolicyConfig::preset(&preset)?;
            }
            if let Some(anchor_ratio) = policy.anchor_ratio {
                self.policy.anchor_ratio = anchor_ratio;
            }
            if let Some(max_rounds) = policy.max_rounds {
                self.policy.max_rounds = max_rounds;
            }
            if let Some(opening_through) = policy.opening_through {
                self.policy.opening_through = opening_through;
            }
            if let Some(moderate_through) = policy.moderate_through {
                self.policy.moderate_through = moderate_through;
            }
            if let Some(opening_rate) = policy.opening_rate {
                self.policy.opening_rate = opening_rate;
            }
            if let Some(moderate_rate) = policy.moderate_rate {
                self.policy.moderate_rate = moderate_rate;
            }
            if let Some(pressure_rate) = policy.pressure_rate {
                self.policy.pressure_rate = pressure_rate;
            }
            if let Some(early_accept_ratio) = policy.early_accept_ratio {
                self.policy.early_accept_ratio = early_accept_ratio;
            }
            if let Some(pressure_accept_ratio) = policy.pressure_accept_ratio {
                self.policy.pressure_accept_ratio = pressure_accept_ratio;
            }
            if let Some(keywords) = policy.keywords {
                self.policy.keywords = keywords;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("HAGGLE_POLICY_PRESET") {
            self.policy = PolicyConfig::preset(&value)?;
        }
        if let Some(value) = read_env("HAGGLE_ANCHOR_RATIO") {
            self.policy.anchor_ratio = parse_decimal("HAGGLE_ANCHOR_RATIO", &value)?;
        }
        if let Some(value) = read_env("HAGGLE_MAX_ROUNDS") {
            self.policy.max_rounds = parse_u8("HAGGLE_MAX_ROUNDS", &value)?;
        }
        if let Some(value) = read_env("HAGGLE_KEYWORDS") {
            self.policy.keywords =
                value.split(',').map(|keyword| keyword.trim().to_string()).collect();
        }

        let log_level = read_env("HAGGLE_LOGGING_LEVEL").or_else(|| read_env("HAGGLE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("HAGGLE_LOGGING_FORMAT").or_else(|| read_env("HAGGLE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(preset) = overrides.preset {
            self.policy = PolicyConfig::preset(&preset)?;
        }
        if let Some(anchor_ratio) = overrides.anchor_ratio {
            self.policy.anchor_ratio = anchor_ratio;
        }
        if let Some(max_rounds) = overrides.max_rounds {
            self.policy.max_rounds = max_rounds;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy.validate()?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("haggle.toml"), PathBuf::from("config/haggle.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u8(key: &str, value: &str) -> Result<u8, ConfigError> {
    value.parse::<u8>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    value.parse::<Decimal>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    policy: Option<PolicyPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct PolicyPatch {
    preset: Option<String>,
    anchor_ratio: Option<Decimal>,
    max_rounds: Option<u8>,
    opening_through: Option<u8>,
    moderate_through: Option<u8>,
    opening_rate: Option<Decimal>,
    moderate_rate: Option<Decimal>,
    pressure_rate: Option<Decimal>,
    early_accept_ratio: Option<Decimal>,
    pressure_accept_ratio: Option<Decimal>,
    keywords: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
