use serde::{Deserialize, Serialize};

use super::ProductId;

/// Identifier for a viewer in the interaction log
pub type ViewerId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Occupation {
    Employed,
    SelfEmployed,
    Student,
    Retired,
    Unemployed,
}

/// A viewer whose profile and purchase history can inform recommendations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Viewer {
    pub id: ViewerId,
    pub age: u32,
    pub marital_status: MaritalStatus,
    pub occupation: Occupation,
    /// Previously selected product IDs, in selection order
    #[serde(default)]
    pub selections: Vec<ProductId>,
}

impl Viewer {
    pub fn new(
        id: ViewerId,
        age: u32,
        marital_status: MaritalStatus,
        occupation: Occupation,
    ) -> Self {
        Self {
            id,
            age,
            marital_status,
            occupation,
            selections: Vec::new(),
        }
    }

    /// Records a product selection, ignoring repeats
    pub fn select(&mut self, product_id: ProductId) {
        if !self.selections.contains(&product_id) {
            self.selections.push(product_id);
        }
    }

    /// Builder-style variant of [`Viewer::select`] for a batch of products
    pub fn with_selections(mut self, product_ids: impl IntoIterator<Item = ProductId>) -> Self {
        for id in product_ids {
            self.select(id);
        }
        self
    }
}
