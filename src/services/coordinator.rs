use std::sync::Arc;

use crate::config::RecommenderConfig;
use crate::models::{
    Neighbor, ProfileUpdate, RecommendationResult, Snapshot, ViewerId, ViewerProfile,
};

use super::{collaborative, content, popularity};

/// Runs one full recommendation cycle
///
/// Pure function of its inputs: identical arguments always produce the same
/// lists in the same order.
pub fn recommend(
    snapshot: &Snapshot,
    active_viewer_id: ViewerId,
    profile: &ViewerProfile,
    config: &RecommenderConfig,
) -> RecommendationResult {
    let n = config.result_limit();

    RecommendationResult {
        popularity: popularity::score(
            &snapshot.products,
            config.min_rating(),
            config.min_engagement(),
            n,
        ),
        content_based: content::score(&snapshot.products, n),
        collaborative: collaborative::score(
            &snapshot.products,
            &snapshot.viewers,
            active_viewer_id,
            profile,
            config.neighbor_count(),
            n,
        ),
    }
}

/// Owns the active viewer's profile and the recommendations derived from it
///
/// Every mutation recomputes all three lists before returning, so
/// [`RecommendationCoordinator::result`] never reflects a stale profile.
#[derive(Debug, Clone)]
pub struct RecommendationCoordinator {
    snapshot: Arc<Snapshot>,
    active_viewer_id: ViewerId,
    profile: ViewerProfile,
    config: RecommenderConfig,
    result: RecommendationResult,
}

impl RecommendationCoordinator {
    /// Creates a coordinator and computes the initial recommendations
    pub fn new(
        snapshot: Arc<Snapshot>,
        active_viewer_id: ViewerId,
        profile: ViewerProfile,
        config: RecommenderConfig,
    ) -> Self {
        let result = recommend(&snapshot, active_viewer_id, &profile, &config);
        Self {
            snapshot,
            active_viewer_id,
            profile,
            config,
            result,
        }
    }

    /// Merges a partial profile update and recomputes
    pub fn set_profile(&mut self, update: ProfileUpdate) -> &RecommendationResult {
        self.set_profile_batch(std::iter::once(update))
    }

    /// Merges several updates in order, then recomputes once
    pub fn set_profile_batch<I>(&mut self, updates: I) -> &RecommendationResult
    where
        I: IntoIterator<Item = ProfileUpdate>,
    {
        for update in updates {
            self.profile.apply(update);
        }
        self.recompute()
    }

    /// Swaps in a fresh catalog and interaction log, then recomputes
    pub fn replace_snapshot(&mut self, snapshot: Arc<Snapshot>) -> &RecommendationResult {
        self.snapshot = snapshot;
        self.recompute()
    }

    /// Most recently computed recommendations
    pub fn result(&self) -> &RecommendationResult {
        &self.result
    }

    pub fn profile(&self) -> &ViewerProfile {
        &self.profile
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn active_viewer_id(&self) -> ViewerId {
        self.active_viewer_id
    }

    /// Viewers the collaborative list is currently drawn from
    pub fn neighbors(&self) -> Vec<Neighbor> {
        collaborative::neighbors(
            &self.snapshot.viewers,
            self.active_viewer_id,
            &self.profile,
            self.config.neighbor_count(),
        )
    }

    fn recompute(&mut self) -> &RecommendationResult {
        self.result = recommend(
            &self.snapshot,
            self.active_viewer_id,
            &self.profile,
            &self.config,
        );

        tracing::debug!(
            popularity = self.result.popularity.len(),
            content_based = self.result.content_based.len(),
            collaborative = self.result.collaborative.len(),
            "Recommendations recomputed"
        );

        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaritalStatus, Occupation};
    use crate::services::store::seed_snapshot;

    fn ids(records: &[crate::models::RecommendationRecord]) -> Vec<u32> {
        records.iter().map(|r| r.id).collect()
    }

    fn coordinator() -> RecommendationCoordinator {
        RecommendationCoordinator::new(
            Arc::new(seed_snapshot()),
            1,
            ViewerProfile::new(30, MaritalStatus::Single, Occupation::Employed),
            RecommenderConfig::default(),
        )
    }

    #[test]
    fn test_initial_result_is_computed() {
        let coordinator = coordinator();
        let result = coordinator.result();

        assert_eq!(ids(&result.popularity), vec![3, 1, 2]);
        assert_eq!(ids(&result.content_based), vec![9]);
        assert_eq!(ids(&result.collaborative), vec![3, 1, 2]);
    }

    #[test]
    fn test_result_is_idempotent() {
        let coordinator = coordinator();
        let first = coordinator.result().clone();
        let second = coordinator.result().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_profile_change_recomputes_collaborative() {
        let mut coordinator = coordinator();
        coordinator.set_profile(ProfileUpdate {
            age: Some(58),
            marital_status: Some(MaritalStatus::Married),
            occupation: None,
        });

        // viewer 4 (|60-58| = 2) and viewer 2 (|45-58| = 13) are now closest
        assert_eq!(
            coordinator.neighbors().iter().map(|n| n.viewer_id).collect::<Vec<_>>(),
            vec![4, 2]
        );
        assert_eq!(ids(&coordinator.result().collaborative), vec![3, 2, 6]);
        assert_eq!(coordinator.profile().occupation, Some(Occupation::Employed));
    }

    #[test]
    fn test_profile_independent_lists_are_stable() {
        let mut coordinator = coordinator();
        let before = coordinator.result().clone();
        coordinator.set_profile(ProfileUpdate::age(70));

        assert_eq!(coordinator.result().popularity, before.popularity);
        assert_eq!(coordinator.result().content_based, before.content_based);
    }

    #[test]
    fn test_batch_applies_in_order() {
        let mut batched = coordinator();
        batched.set_profile_batch(vec![ProfileUpdate::age(40), ProfileUpdate::age(61)]);

        let mut direct = coordinator();
        direct.set_profile(ProfileUpdate::age(61));

        assert_eq!(batched.profile(), direct.profile());
        assert_eq!(batched.result(), direct.result());
    }

    #[test]
    fn test_empty_profile_does_not_fail() {
        let coordinator = RecommendationCoordinator::new(
            Arc::new(seed_snapshot()),
            1,
            ViewerProfile::default(),
            RecommenderConfig::default(),
        );
        assert!(coordinator.result().collaborative.len() <= 3);
    }

    #[test]
    fn test_replace_snapshot() {
        let mut coordinator = coordinator();
        coordinator.replace_snapshot(Arc::new(Snapshot::default()));
        assert_eq!(coordinator.result(), &RecommendationResult::default());
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let snapshot = seed_snapshot();
        let profile = ViewerProfile::new(44, MaritalStatus::Married, Occupation::Employed);
        let config = RecommenderConfig::new(4.0, 100, 5, 3).unwrap();

        let first = recommend(&snapshot, 1, &profile, &config);
        let second = recommend(&snapshot, 1, &profile, &config);
        assert_eq!(first, second);
        assert!(first.popularity.len() <= 5);
    }
}
