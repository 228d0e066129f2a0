use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::Snapshot;

/// Catalog and interaction log bundled with the binary
const SEED_SNAPSHOT: &str = include_str!("../../data/seed.json");

const MAX_RATING: f64 = 5.0;

/// Error types for loading a snapshot
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid snapshot: {0}")]
    InvalidData(String),
}

/// Source of the product catalog and viewer interaction log
///
/// Implementations decide freshness and size. Whatever they return is taken
/// as already validated by the recommender.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InteractionStore: Send + Sync {
    /// Loads a complete snapshot of products and viewers
    async fn load(&self) -> Result<Snapshot, StoreError>;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Serves the bundled demo data set
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedStore;

impl SeedStore {
    pub fn snapshot() -> Result<Snapshot, StoreError> {
        parse_snapshot(SEED_SNAPSHOT)
    }
}

#[async_trait::async_trait]
impl InteractionStore for SeedStore {
    async fn load(&self) -> Result<Snapshot, StoreError> {
        Self::snapshot()
    }

    fn name(&self) -> &'static str {
        "seed"
    }
}

/// Reads a snapshot from a JSON file on every load
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl InteractionStore for JsonFileStore {
    async fn load(&self) -> Result<Snapshot, StoreError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        let snapshot = parse_snapshot(&raw)?;

        tracing::debug!(
            path = %self.path.display(),
            products = snapshot.products.len(),
            viewers = snapshot.viewers.len(),
            "Loaded snapshot from file"
        );

        Ok(snapshot)
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}

fn parse_snapshot(raw: &str) -> Result<Snapshot, StoreError> {
    let snapshot: Snapshot = serde_json::from_str(raw)?;
    validate(&snapshot)?;
    Ok(snapshot)
}

fn validate(snapshot: &Snapshot) -> Result<(), StoreError> {
    let mut product_ids = HashSet::new();
    for product in &snapshot.products {
        if !product_ids.insert(product.id) {
            return Err(StoreError::InvalidData(format!(
                "duplicate product id {}",
                product.id
            )));
        }
        if !(0.0..=MAX_RATING).contains(&product.rating) {
            return Err(StoreError::InvalidData(format!(
                "product {} has rating {} outside 0.0-{}",
                product.id, product.rating, MAX_RATING
            )));
        }
    }

    let mut viewer_ids = HashSet::new();
    for viewer in &snapshot.viewers {
        if !viewer_ids.insert(viewer.id) {
            return Err(StoreError::InvalidData(format!(
                "duplicate viewer id {}",
                viewer.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) fn seed_snapshot() -> Snapshot {
    SeedStore::snapshot().expect("bundled seed data is valid")
}
