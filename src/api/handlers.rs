use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::RecommenderConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{
    Category, Neighbor, Product, ProductId, ProfileUpdate, PublishedRecommendations,
    RecommendationRecord, Viewer, ViewerId, ViewerProfile,
};
use crate::services::{collaborative, content, popularity};

use super::AppState;

// Request/Response types

/// Body of the ad-hoc scoring endpoint; `type` selects the strategy
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecommendRequest {
    Popularity {
        category: Option<Category>,
        min_rating: Option<f64>,
        min_engagement: Option<u32>,
        num_recommendations: Option<usize>,
    },
    Content {
        /// Defaults to the most-engaged product
        product_id: Option<ProductId>,
        num_recommendations: Option<usize>,
    },
    Collaborative {
        /// Defaults to the active viewer
        viewer_id: Option<ViewerId>,
        /// Overrides the stored profile of `viewer_id`
        profile: Option<ViewerProfile>,
        num_recommendations: Option<usize>,
        similar_viewers: Option<usize>,
    },
}

#[derive(Debug, Serialize)]
pub struct NeighborsResponse {
    pub active_viewer_id: ViewerId,
    pub profile: ViewerProfile,
    pub neighbors: Vec<Neighbor>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Products in the current snapshot, in catalog order
pub async fn get_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    let snapshot = state.recommender.snapshot().await;
    Json(snapshot.products.clone())
}

/// Viewers in the current interaction log
pub async fn get_viewers(State(state): State<AppState>) -> Json<Vec<Viewer>> {
    let snapshot = state.recommender.snapshot().await;
    Json(snapshot.viewers.clone())
}

/// Active viewer profile
pub async fn get_profile(State(state): State<AppState>) -> Json<ViewerProfile> {
    Json(state.recommender.profile().await)
}

/// Applies a partial profile update and returns the recomputed recommendations
///
/// Goes through the profile queue, so it is ordered against queued events.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(body): Json<Value>,
) -> AppResult<Json<PublishedRecommendations>> {
    let update = parse_profile_update(body)?;

    tracing::info!(request_id = %request_id, update = ?update, "Processing profile update");

    let published = state
        .profile_queue
        .apply(update)
        .await
        .ok_or_else(|| AppError::Internal("Profile worker is not running".to_string()))?;
    Ok(Json(published.as_ref().clone()))
}

/// Queues a profile update for the background worker
pub async fn enqueue_profile_event(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(body): Json<Value>,
) -> AppResult<StatusCode> {
    let update = parse_profile_update(body)?;

    tracing::debug!(request_id = %request_id, update = ?update, "Queueing profile event");

    if !state.profile_queue.enqueue(update) {
        return Err(AppError::Internal("Profile worker is not running".to_string()));
    }

    Ok(StatusCode::ACCEPTED)
}

/// Latest recommendations for the active profile
pub async fn get_recommendations(State(state): State<AppState>) -> Json<PublishedRecommendations> {
    Json(state.recommender.latest().as_ref().clone())
}

/// Viewers currently feeding the collaborative list
pub async fn get_neighbors(State(state): State<AppState>) -> Json<NeighborsResponse> {
    Json(NeighborsResponse {
        active_viewer_id: state.recommender.active_viewer_id().await,
        profile: state.recommender.profile().await,
        neighbors: state.recommender.neighbors().await,
    })
}

/// Reloads the catalog and interaction log from the store
pub async fn reload_snapshot(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<PublishedRecommendations>> {
    tracing::info!(request_id = %request_id, "Reloading snapshot");
    let published = state.recommender.reload().await?;
    Ok(Json(published.as_ref().clone()))
}

/// Runs a single strategy with request-supplied parameters
///
/// Does not touch the active profile or the published recommendations.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(body): Json<Value>,
) -> AppResult<Json<Vec<RecommendationRecord>>> {
    let request: RecommendRequest = serde_json::from_value(body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid recommendation request: {}", e)))?;

    tracing::info!(request_id = %request_id, request = ?request, "Processing ad-hoc recommendation");

    let defaults = state.recommender.config().await;
    let snapshot = state.recommender.snapshot().await;

    let records = match request {
        RecommendRequest::Popularity {
            category,
            min_rating,
            min_engagement,
            num_recommendations,
        } => {
            let config = RecommenderConfig::new(
                min_rating.unwrap_or(defaults.min_rating()),
                min_engagement.unwrap_or(defaults.min_engagement()),
                num_recommendations.unwrap_or(defaults.result_limit()),
                defaults.neighbor_count(),
            )?;

            match category {
                Some(category) => popularity::score_in_category(
                    &snapshot.products,
                    category,
                    config.min_rating(),
                    config.min_engagement(),
                    config.result_limit(),
                ),
                None => popularity::score(
                    &snapshot.products,
                    config.min_rating(),
                    config.min_engagement(),
                    config.result_limit(),
                ),
            }
        }
        RecommendRequest::Content {
            product_id,
            num_recommendations,
        } => {
            let config = with_limits(&defaults, num_recommendations, None)?;

            match product_id {
                Some(id) => {
                    if snapshot.product(id).is_none() {
                        return Err(AppError::NotFound(format!("Product {}", id)));
                    }
                    content::score_for(&snapshot.products, id, config.result_limit())
                }
                None => content::score(&snapshot.products, config.result_limit()),
            }
        }
        RecommendRequest::Collaborative {
            viewer_id,
            profile,
            num_recommendations,
            similar_viewers,
        } => {
            let config = with_limits(&defaults, num_recommendations, similar_viewers)?;
            let active_viewer_id = state.recommender.active_viewer_id().await;
            let viewer_id = viewer_id.unwrap_or(active_viewer_id);

            let profile = match profile {
                Some(profile) => profile,
                None if viewer_id == active_viewer_id => state.recommender.profile().await,
                None => snapshot
                    .viewer(viewer_id)
                    .map(|v| ViewerProfile::new(v.age, v.marital_status, v.occupation))
                    .ok_or_else(|| AppError::NotFound(format!("Viewer {}", viewer_id)))?,
            };

            collaborative::score(
                &snapshot.products,
                &snapshot.viewers,
                viewer_id,
                &profile,
                config.neighbor_count(),
                config.result_limit(),
            )
        }
    };

    Ok(Json(records))
}

fn parse_profile_update(body: Value) -> AppResult<ProfileUpdate> {
    let update: ProfileUpdate = serde_json::from_value(body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid profile update: {}", e)))?;

    if update.is_empty() {
        return Err(AppError::InvalidInput(
            "Provide at least one of age, marital_status, occupation".to_string(),
        ));
    }
    Ok(update)
}

fn with_limits(
    defaults: &RecommenderConfig,
    num_recommendations: Option<usize>,
    similar_viewers: Option<usize>,
) -> AppResult<RecommenderConfig> {
    Ok(RecommenderConfig::new(
        defaults.min_rating(),
        defaults.min_engagement(),
        num_recommendations.unwrap_or(defaults.result_limit()),
        similar_viewers.unwrap_or(defaults.neighbor_count()),
    )?)
}
