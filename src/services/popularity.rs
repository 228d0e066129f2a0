use crate::models::{Category, Product, RecommendationRecord};

use super::ranking::top_rated;

/// Ranks the catalog by rating among products that clear both thresholds
///
/// Independent of the viewer profile. Returns an empty list when nothing
/// qualifies.
pub fn score(
    catalog: &[Product],
    min_rating: f64,
    min_engagement: u32,
    n: usize,
) -> Vec<RecommendationRecord> {
    top_rated(
        catalog
            .iter()
            .filter(|p| qualifies(p, min_rating, min_engagement)),
        n,
    )
}

/// Same as [`score`], restricted to one line of insurance
pub fn score_in_category(
    catalog: &[Product],
    category: Category,
    min_rating: f64,
    min_engagement: u32,
    n: usize,
) -> Vec<RecommendationRecord> {
    top_rated(
        catalog
            .iter()
            .filter(|p| p.category == category && qualifies(p, min_rating, min_engagement)),
        n,
    )
}

fn qualifies(product: &Product, min_rating: f64, min_engagement: u32) -> bool {
    product.rating >= min_rating && product.engagement >= min_engagement
}
