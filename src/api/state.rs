use crate::services::{profile_worker::ProfileQueue, RecommendationService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommender: RecommendationService,
    pub profile_queue: ProfileQueue,
}

impl AppState {
    pub fn new(recommender: RecommendationService, profile_queue: ProfileQueue) -> Self {
        Self {
            recommender,
            profile_queue,
        }
    }
}
