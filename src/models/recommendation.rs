use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Product, ProductId, ViewerId, ViewerProfile};

/// Read-only projection of a [`Product`] handed to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationRecord {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub rating: f64,
    pub engagement: u32,
}

impl From<&Product> for RecommendationRecord {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            category: product.category,
            rating: product.rating,
            engagement: product.engagement,
        }
    }
}

/// The three ranked lists produced by one recommendation cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub popularity: Vec<RecommendationRecord>,
    pub content_based: Vec<RecommendationRecord>,
    pub collaborative: Vec<RecommendationRecord>,
}

/// A result as published to readers, tagged with when and for whom it was computed
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublishedRecommendations {
    /// Incremented on every recomputation
    pub revision: u64,
    pub computed_at: DateTime<Utc>,
    pub profile: ViewerProfile,
    pub recommendations: RecommendationResult,
}

/// A viewer picked as similar to the active profile
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Neighbor {
    pub viewer_id: ViewerId,
    /// Age gap plus one if marital status differs; lower is closer
    pub dissimilarity: u32,
}
