use std::collections::HashSet;

use crate::models::{
    Neighbor, Product, ProductId, RecommendationRecord, Viewer, ViewerId, ViewerProfile,
};

use super::ranking::top_rated;

/// Distance between a viewer and the active profile
///
/// Age gap plus one when marital statuses differ. An unknown age counts as 0
/// and an unknown status never matches.
pub fn dissimilarity(viewer: &Viewer, profile: &ViewerProfile) -> u32 {
    let age_gap = viewer.age.abs_diff(profile.age_or_default());
    let status_gap = u32::from(!profile.shares_marital_status(viewer.marital_status));
    age_gap.saturating_add(status_gap)
}

/// The `k` viewers closest to the profile, excluding the active viewer
///
/// Equal distances keep interaction-log order. Fewer than `k` viewers are
/// returned when the log is short.
pub fn neighbors(
    viewers: &[Viewer],
    active_viewer_id: ViewerId,
    profile: &ViewerProfile,
    k: usize,
) -> Vec<Neighbor> {
    nearest(viewers, active_viewer_id, profile, k)
        .into_iter()
        .map(|(viewer, dissimilarity)| Neighbor {
            viewer_id: viewer.id,
            dissimilarity,
        })
        .collect()
}

/// Ranks products selected by the viewers most similar to the profile
pub fn score(
    catalog: &[Product],
    viewers: &[Viewer],
    active_viewer_id: ViewerId,
    profile: &ViewerProfile,
    k: usize,
    n: usize,
) -> Vec<RecommendationRecord> {
    let nearest = nearest(viewers, active_viewer_id, profile, k);

    let selected: HashSet<ProductId> = nearest
        .iter()
        .flat_map(|(viewer, _)| viewer.selections.iter().copied())
        .collect();

    tracing::debug!(
        neighbors = ?nearest.iter().map(|(v, _)| v.id).collect::<Vec<_>>(),
        candidate_products = selected.len(),
        "Scoring collaborative recommendations"
    );

    if selected.is_empty() {
        return Vec::new();
    }

    top_rated(catalog.iter().filter(|p| selected.contains(&p.id)), n)
}

fn nearest<'a>(
    viewers: &'a [Viewer],
    active_viewer_id: ViewerId,
    profile: &ViewerProfile,
    k: usize,
) -> Vec<(&'a Viewer, u32)> {
    let mut candidates: Vec<(&Viewer, u32)> = viewers
        .iter()
        .filter(|v| v.id != active_viewer_id)
        .map(|v| (v, dissimilarity(v, profile)))
        .collect();

    candidates.sort_by_key(|(_, distance)| *distance);
    candidates.truncate(k);
    candidates
}
