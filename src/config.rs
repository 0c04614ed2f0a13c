//! Application configuration.
//!
//! Every tunable lives here: server binding, database location, the
//! freshness decay windows, the XP/rank ladder and quiz parameters.
//! Values are resolved with priority: config.toml > .env / environment > default.

use chrono::Duration;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("invalid config: {0}")]
  Invalid(String),
}

/// Configuration file structure for config.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  pub server: ServerConfig,
  pub database: DatabaseConfig,
  pub freshness: FreshnessConfig,
  pub xp: XpConfig,
  pub quiz: QuizConfig,
}

// ==================== Server Configuration ====================

/// Default address to bind to
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub addr: Option<String>,
  pub port: Option<u16>,
}

// ==================== Database Configuration ====================

/// Database used when neither config.toml nor DATABASE_PATH names one
pub const DEFAULT_DATABASE_PATH: &str = "data/fridge.db";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
  pub path: Option<PathBuf>,
}

// ==================== Freshness Configuration ====================

/// Decay windows, in days, for a word at proficiency level 0.
///
/// Each level widens both windows by `level_widening`:
/// a level-2 word with the default 0.5 widening keeps twice as long.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FreshnessConfig {
  pub fresh_days: f64,
  pub rotten_days: f64,
  pub level_widening: f64,
}

impl Default for FreshnessConfig {
  fn default() -> Self {
    Self {
      fresh_days: 7.0,
      rotten_days: 30.0,
      level_widening: 0.5,
    }
  }
}

// ==================== XP Configuration ====================

/// One step of the rank ladder
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rank {
  pub threshold: u64,
  pub title: String,
}

impl Rank {
  pub fn new(threshold: u64, title: &str) -> Self {
    Self {
      threshold,
      title: title.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct XpConfig {
  pub base_xp_per_item: u64,
  pub per_level_xp: u64,
  pub ranks: Vec<Rank>,
}

impl Default for XpConfig {
  fn default() -> Self {
    Self {
      base_xp_per_item: 50,
      per_level_xp: 20,
      ranks: vec![
        Rank::new(0, "🥚 Dorm Student"),
        Rank::new(200, "🍳 Home Cook"),
        Rank::new(1000, "👨‍🍳 Master Chef"),
        Rank::new(5000, "👑 Legend"),
      ],
    }
  }
}

// ==================== Quiz Configuration ====================

/// Number of options (1 correct + 3 distractors) when the caller does not ask
pub const DEFAULT_OPTION_COUNT: usize = 4;

/// Minutes an unanswered quiz stays redeemable
pub const DEFAULT_CHALLENGE_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
  pub option_count: usize,
  /// Proficiency added by a successful review commit
  pub proficiency_delta: u32,
  /// Minutes an issued challenge stays redeemable
  pub challenge_ttl_minutes: i64,
}

impl QuizConfig {
  /// Challenge time to live. Out of range values fall back to the default.
  pub fn challenge_ttl(&self) -> Duration {
    Duration::try_minutes(self.challenge_ttl_minutes)
      .filter(|ttl| *ttl > Duration::zero())
      .unwrap_or_else(|| Duration::minutes(DEFAULT_CHALLENGE_TTL_MINUTES))
  }
}

impl Default for QuizConfig {
  fn default() -> Self {
    Self {
      option_count: DEFAULT_OPTION_COUNT,
      proficiency_delta: 1,
      challenge_ttl_minutes: DEFAULT_CHALLENGE_TTL_MINUTES,
    }
  }
}

/// The parts of the configuration the progression engine needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressionConfig {
  pub freshness: FreshnessConfig,
  pub xp: XpConfig,
  pub quiz: QuizConfig,
}

// ==================== Loading ====================

impl AppConfig {
  /// Load `.env`, then config.toml from the working directory if present.
  pub fn load() -> Result<Self, ConfigError> {
    let _ = dotenvy::dotenv();
    Self::load_from(Path::new(CONFIG_FILE))
  }

  /// Load from an explicit file, falling back to defaults if it does not exist.
  pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
    if !path.exists() {
      tracing::info!("No {} found, using default configuration", path.display());
      return Ok(Self::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.display().to_string(),
      source,
    })?;
    tracing::info!("Using configuration from {}", path.display());
    Self::from_toml_str(&contents)
  }

  pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
    let config: Self = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    let f = &self.freshness;
    if !(f.fresh_days > 0.0) {
      return Err(ConfigError::Invalid("freshness.fresh_days must be positive".into()));
    }
    if !(f.rotten_days >= f.fresh_days) {
      return Err(ConfigError::Invalid(
        "freshness.rotten_days must not be below fresh_days".into(),
      ));
    }
    if !(f.level_widening >= 0.0) {
      return Err(ConfigError::Invalid("freshness.level_widening must not be negative".into()));
    }

    let ranks = &self.xp.ranks;
    match ranks.first() {
      None => return Err(ConfigError::Invalid("xp.ranks must not be empty".into())),
      Some(first) if first.threshold != 0 => {
        return Err(ConfigError::Invalid("the first rank must start at 0 XP".into()));
      }
      Some(_) => {}
    }
    if ranks.windows(2).any(|pair| pair[1].threshold <= pair[0].threshold) {
      return Err(ConfigError::Invalid("rank thresholds must strictly increase".into()));
    }

    if self.quiz.option_count == 0 {
      return Err(ConfigError::Invalid("quiz.option_count must be at least 1".into()));
    }
    if self.quiz.proficiency_delta == 0 {
      return Err(ConfigError::Invalid("quiz.proficiency_delta must be at least 1".into()));
    }
    if self.quiz.challenge_ttl_minutes <= 0 {
      return Err(ConfigError::Invalid("quiz.challenge_ttl_minutes must be positive".into()));
    }
    if Duration::try_minutes(self.quiz.challenge_ttl_minutes).is_none() {
      return Err(ConfigError::Invalid("quiz.challenge_ttl_minutes is too large".into()));
    }
    Ok(())
  }

  pub fn progression(&self) -> ProgressionConfig {
    ProgressionConfig {
      freshness: self.freshness.clone(),
      xp: self.xp.clone(),
      quiz: self.quiz.clone(),
    }
  }

  /// Database path with priority: config.toml > DATABASE_PATH env > default
  pub fn database_path(&self) -> PathBuf {
    resolve_database_path(
      self.database.path.as_deref(),
      std::env::var("DATABASE_PATH").ok(),
    )
  }

  /// Full server bind address, honouring the PORT env var when config.toml has no port
  pub fn server_bind_addr(&self) -> String {
    let addr = self.server.addr.as_deref().unwrap_or(DEFAULT_SERVER_ADDR);
    let port = resolve_port(self.server.port, std::env::var("PORT").ok());
    format!("{}:{}", addr, port)
  }
}

fn resolve_database_path(from_file: Option<&Path>, from_env: Option<String>) -> PathBuf {
  if let Some(path) = from_file {
    tracing::info!("Using database from config.toml: {}", path.display());
    return path.to_path_buf();
  }
  if let Some(path) = from_env {
    tracing::info!("Using database from DATABASE_PATH env: {}", path);
    return PathBuf::from(path);
  }
  let default = PathBuf::from(DEFAULT_DATABASE_PATH);
  tracing::info!("Using default database path: {}", default.display());
  default
}

fn resolve_port(from_file: Option<u16>, from_env: Option<String>) -> u16 {
  from_file
    .or_else(|| from_env.and_then(|p| p.parse().ok()))
    .unwrap_or(DEFAULT_SERVER_PORT)
}
