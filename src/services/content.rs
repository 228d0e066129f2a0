use crate::models::{Product, ProductId, RecommendationRecord};

use super::ranking::top_rated;

/// The catalog's most-engaged product; the first one wins a tie
pub fn reference_product(catalog: &[Product]) -> Option<&Product> {
    catalog.iter().reduce(|best, candidate| {
        if candidate.engagement > best.engagement {
            candidate
        } else {
            best
        }
    })
}

/// Ranks products sharing the category of the most-engaged product
///
/// The reference product itself is never part of the result.
pub fn score(catalog: &[Product], n: usize) -> Vec<RecommendationRecord> {
    match reference_product(catalog) {
        Some(reference) => similar_to(catalog, reference, n),
        None => Vec::new(),
    }
}

/// Same as [`score`], but seeded from an explicit product
///
/// An unknown reference yields an empty list.
pub fn score_for(catalog: &[Product], reference_id: ProductId, n: usize) -> Vec<RecommendationRecord> {
    match catalog.iter().find(|p| p.id == reference_id) {
        Some(reference) => similar_to(catalog, reference, n),
        None => Vec::new(),
    }
}

fn similar_to(catalog: &[Product], reference: &Product, n: usize) -> Vec<RecommendationRecord> {
    tracing::debug!(
        reference_id = reference.id,
        category = %reference.category,
        "Scoring content-based recommendations"
    );

    top_rated(
        catalog
            .iter()
            .filter(|p| p.category == reference.category && p.id != reference.id),
        n,
    )
}
