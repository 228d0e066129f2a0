pub mod collaborative;
pub mod content;
pub mod coordinator;
pub mod popularity;
pub mod profile_worker;
pub mod recommender;
pub mod store;

mod ranking;

pub use coordinator::{recommend, RecommendationCoordinator};
pub use recommender::RecommendationService;
pub use store::{InteractionStore, JsonFileStore, SeedStore, StoreError};
