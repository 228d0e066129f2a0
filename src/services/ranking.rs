use std::collections::HashSet;

use crate::models::{Product, RecommendationRecord};

/// Orders candidates by rating (highest first) and keeps the top `limit`
///
/// The sort is stable, so products with equal ratings keep the order they
/// were supplied in. A product ID that shows up more than once is only
/// emitted the first time.
pub(crate) fn top_rated<'a, I>(candidates: I, limit: usize) -> Vec<RecommendationRecord>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut ranked: Vec<&Product> = candidates.into_iter().collect();
    ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .filter(|product| seen.insert(product.id))
        .take(limit)
        .map(RecommendationRecord::from)
        .collect()
}
