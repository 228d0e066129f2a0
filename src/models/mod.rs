use serde::{Deserialize, Serialize};

pub mod product;
pub mod profile;
pub mod recommendation;
pub mod viewer;

pub use product::{Category, Product, ProductId};
pub use profile::{ProfileUpdate, ViewerProfile};
pub use recommendation::{
    Neighbor, PublishedRecommendations, RecommendationRecord, RecommendationResult,
};
pub use viewer::{MaritalStatus, Occupation, Viewer, ViewerId};

/// Immutable view of the catalog and interaction log for one recommendation cycle
///
/// Both sequences keep the order the store supplied them in, since that order
/// is the tie-break for every ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub products: Vec<Product>,
    #[serde(default)]
    pub viewers: Vec<Viewer>,
}

impl Snapshot {
    pub fn new(products: Vec<Product>, viewers: Vec<Viewer>) -> Self {
        Self { products, viewers }
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn viewer(&self, id: ViewerId) -> Option<&Viewer> {
        self.viewers.iter().find(|v| v.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = Snapshot::new(
            vec![Product::new(7, "HealthEssentials", Category::Health, 4.4, 890)],
            vec![Viewer::new(3, 25, MaritalStatus::Single, Occupation::Student)],
        );

        assert_eq!(snapshot.product(7).map(|p| p.name.as_str()), Some("HealthEssentials"));
        assert!(snapshot.product(8).is_none());
        assert_eq!(snapshot.viewer(3).map(|v| v.age), Some(25));
        assert!(snapshot.viewer(1).is_none());
    }

    #[test]
    fn test_snapshot_without_viewers_deserializes() {
        let json = r#"{"products":[]}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.viewers.is_empty());
    }
}
