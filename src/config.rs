use serde::Deserialize;
use thiserror::Error;

use crate::models::{MaritalStatus, Occupation, ViewerId, ViewerProfile};

/// Rejected recommender configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("min_rating must be a finite, non-negative number (got {0})")]
    InvalidMinRating(f64),
    #[error("result limit n must be at least 1")]
    ZeroResultLimit,
    #[error("neighbor count k must be at least 1")]
    ZeroNeighborCount,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON file holding the catalog and interaction log; the built-in seed
    /// data is used when unset
    #[serde(default)]
    pub snapshot_path: Option<String>,

    /// Viewer being served; excluded from its own neighbor pool
    #[serde(default = "default_active_viewer_id")]
    pub active_viewer_id: ViewerId,

    /// Minimum rating for popularity recommendations
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,

    /// Minimum review count for popularity recommendations
    #[serde(default = "default_min_engagement")]
    pub min_engagement: u32,

    /// Maximum entries per recommendation list
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// Number of similar viewers consulted by collaborative scoring
    #[serde(default = "default_neighbor_count")]
    pub neighbor_count: usize,

    /// Age of the active viewer before any profile update
    #[serde(default = "default_initial_age")]
    pub initial_age: Option<u32>,

    /// Marital status of the active viewer; unset never matches a neighbor
    #[serde(default = "default_initial_marital_status")]
    pub initial_marital_status: Option<MaritalStatus>,

    /// Occupation of the active viewer; stored but not used for scoring
    #[serde(default = "default_initial_occupation")]
    pub initial_occupation: Option<Occupation>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_active_viewer_id() -> ViewerId {
    1
}

fn default_min_rating() -> f64 {
    4.5
}

fn default_min_engagement() -> u32 {
    500
}

fn default_result_limit() -> usize {
    3
}

fn default_neighbor_count() -> usize {
    2
}

fn default_initial_age() -> Option<u32> {
    Some(30)
}

fn default_initial_marital_status() -> Option<MaritalStatus> {
    Some(MaritalStatus::Single)
}

fn default_initial_occupation() -> Option<Occupation> {
    Some(Occupation::Employed)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Validated scoring parameters
    pub fn recommender(&self) -> Result<RecommenderConfig, ConfigError> {
        RecommenderConfig::new(
            self.min_rating,
            self.min_engagement,
            self.result_limit,
            self.neighbor_count,
        )
    }

    /// Profile the active viewer starts with
    pub fn initial_profile(&self) -> ViewerProfile {
        ViewerProfile {
            age: self.initial_age,
            marital_status: self.initial_marital_status,
            occupation: self.initial_occupation,
        }
    }
}

/// Scoring parameters shared by every recommendation cycle
///
/// Only obtainable through [`RecommenderConfig::new`], so a value of this type
/// is always valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommenderConfig {
    min_rating: f64,
    min_engagement: u32,
    result_limit: usize,
    neighbor_count: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            min_rating: default_min_rating(),
            min_engagement: default_min_engagement(),
            result_limit: default_result_limit(),
            neighbor_count: default_neighbor_count(),
        }
    }
}

impl RecommenderConfig {
    pub fn new(
        min_rating: f64,
        min_engagement: u32,
        result_limit: usize,
        neighbor_count: usize,
    ) -> Result<Self, ConfigError> {
        if !min_rating.is_finite() || min_rating < 0.0 {
            return Err(ConfigError::InvalidMinRating(min_rating));
        }
        if result_limit == 0 {
            return Err(ConfigError::ZeroResultLimit);
        }
        if neighbor_count == 0 {
            return Err(ConfigError::ZeroNeighborCount);
        }

        Ok(Self {
            min_rating,
            min_engagement,
            result_limit,
            neighbor_count,
        })
    }

    pub fn min_rating(&self) -> f64 {
        self.min_rating
    }

    pub fn min_engagement(&self) -> u32 {
        self.min_engagement
    }

    /// Cap `n` on every ranked list
    pub fn result_limit(&self) -> usize {
        self.result_limit
    }

    /// Neighbor count `k` for collaborative scoring
    pub fn neighbor_count(&self) -> usize {
        self.neighbor_count
    }
}
