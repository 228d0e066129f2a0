use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, RwLock};

use crate::{
    config::RecommenderConfig,
    error::AppResult,
    models::{
        Neighbor, ProfileUpdate, PublishedRecommendations, Snapshot, ViewerId, ViewerProfile,
    },
};

use super::{coordinator::RecommendationCoordinator, store::InteractionStore};

/// Shared handle to the recommendation coordinator
///
/// Mutations hold the write lock across merge, recompute and publish, so two
/// profile changes never interleave and readers always see the result of the
/// last applied change. Outside this crate profile changes go through
/// [`ProfileQueue`](super::profile_worker::ProfileQueue), which fixes their order.
#[derive(Clone)]
pub struct RecommendationService {
    coordinator: Arc<RwLock<RecommendationCoordinator>>,
    published: Arc<watch::Sender<Arc<PublishedRecommendations>>>,
    store: Arc<dyn InteractionStore>,
}

impl RecommendationService {
    /// Loads the initial snapshot from `store` and computes the first result
    pub async fn new(
        store: Arc<dyn InteractionStore>,
        active_viewer_id: ViewerId,
        profile: ViewerProfile,
        config: RecommenderConfig,
    ) -> AppResult<Self> {
        let snapshot = store.load().await?;

        tracing::info!(
            store = store.name(),
            products = snapshot.products.len(),
            viewers = snapshot.viewers.len(),
            active_viewer_id,
            "Snapshot loaded"
        );

        if snapshot.viewer(active_viewer_id).is_none() {
            tracing::warn!(active_viewer_id, "Active viewer has no interaction history");
        }

        let coordinator =
            RecommendationCoordinator::new(Arc::new(snapshot), active_viewer_id, profile, config);
        Ok(Self::from_coordinator(coordinator, store))
    }

    pub fn from_coordinator(
        coordinator: RecommendationCoordinator,
        store: Arc<dyn InteractionStore>,
    ) -> Self {
        let initial = Arc::new(PublishedRecommendations {
            revision: 0,
            computed_at: Utc::now(),
            profile: *coordinator.profile(),
            recommendations: coordinator.result().clone(),
        });
        let (published, _) = watch::channel(initial);

        Self {
            coordinator: Arc::new(RwLock::new(coordinator)),
            published: Arc::new(published),
            store,
        }
    }

    /// Most recently published recommendations
    ///
    /// Side-effect free; repeated calls without a mutation in between return
    /// the same value.
    pub fn latest(&self) -> Arc<PublishedRecommendations> {
        self.published.borrow().clone()
    }

    /// Receiver that is notified after every recomputation
    pub fn subscribe(&self) -> watch::Receiver<Arc<PublishedRecommendations>> {
        self.published.subscribe()
    }

    /// Merges updates in arrival order and publishes one recomputed result
    pub(crate) async fn apply_batch(&self, updates: Vec<ProfileUpdate>) -> Arc<PublishedRecommendations> {
        let mut coordinator = self.coordinator.write().await;
        let count = updates.len();
        coordinator.set_profile_batch(updates);

        let published = self.publish(&coordinator);
        tracing::info!(
            revision = published.revision,
            updates = count,
            profile = ?published.profile,
            "Profile updated"
        );
        published
    }

    /// Reloads the snapshot from the store and publishes the recomputed result
    pub async fn reload(&self) -> AppResult<Arc<PublishedRecommendations>> {
        let snapshot = self.store.load().await?;
        let products = snapshot.products.len();
        let viewers = snapshot.viewers.len();

        let mut coordinator = self.coordinator.write().await;
        coordinator.replace_snapshot(Arc::new(snapshot));

        let published = self.publish(&coordinator);
        tracing::info!(
            store = self.store.name(),
            revision = published.revision,
            products,
            viewers,
            "Snapshot reloaded"
        );
        Ok(published)
    }

    pub async fn profile(&self) -> ViewerProfile {
        *self.coordinator.read().await.profile()
    }

    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.coordinator.read().await.snapshot().clone()
    }

    pub async fn config(&self) -> RecommenderConfig {
        *self.coordinator.read().await.config()
    }

    pub async fn active_viewer_id(&self) -> ViewerId {
        self.coordinator.read().await.active_viewer_id()
    }

    pub async fn neighbors(&self) -> Vec<Neighbor> {
        self.coordinator.read().await.neighbors()
    }

    /// Must be called with the write lock held
    fn publish(&self, coordinator: &RecommendationCoordinator) -> Arc<PublishedRecommendations> {
        let revision = self.published.borrow().revision + 1;
        let published = Arc::new(PublishedRecommendations {
            revision,
            computed_at: Utc::now(),
            profile: *coordinator.profile(),
            recommendations: coordinator.result().clone(),
        });
        self.published.send_replace(published.clone());
        published
    }
}
