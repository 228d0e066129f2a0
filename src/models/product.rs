use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier for a catalog product
pub type ProductId = u32;

/// Line of insurance a product belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Health,
    Life,
    Property,
    Umbrella,
    IncomeProtection,
    Auto,
    Travel,
    Business,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Health => "health",
            Category::Life => "life",
            Category::Property => "property",
            Category::Umbrella => "umbrella",
            Category::IncomeProtection => "income_protection",
            Category::Auto => "auto",
            Category::Travel => "travel",
            Category::Business => "business",
        };
        write!(f, "{}", name)
    }
}

/// An insurance product eligible for recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique identifier within the catalog
    pub id: ProductId,
    /// Display name (e.g., "HealthGuard Plus")
    pub name: String,
    pub category: Category,
    /// Average customer rating on a 0.0 - 5.0 scale
    pub rating: f64,
    /// Number of reviews the product has collected
    pub engagement: u32,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: Category,
        rating: f64,
        engagement: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            rating,
            engagement,
        }
    }
}
