use serde::{Deserialize, Serialize};

use super::{MaritalStatus, Occupation};

/// Profile of the viewer currently being served
///
/// Every field is optional. A missing field never fails scoring; it only
/// makes the similarity comparison less precise.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewerProfile {
    pub age: Option<u32>,
    pub marital_status: Option<MaritalStatus>,
    pub occupation: Option<Occupation>,
}

/// Partial change to a [`ViewerProfile`]
///
/// Only the fields present in the update are applied.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default)]
    pub occupation: Option<Occupation>,
}

impl ViewerProfile {
    pub fn new(age: u32, marital_status: MaritalStatus, occupation: Occupation) -> Self {
        Self {
            age: Some(age),
            marital_status: Some(marital_status),
            occupation: Some(occupation),
        }
    }

    /// Merges a partial update into this profile
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(age) = update.age {
            self.age = Some(age);
        }
        if let Some(status) = update.marital_status {
            self.marital_status = Some(status);
        }
        if let Some(occupation) = update.occupation {
            self.occupation = Some(occupation);
        }
    }

    /// Age used for similarity, defaulting to 0 when unknown
    pub fn age_or_default(&self) -> u32 {
        self.age.unwrap_or(0)
    }

    /// Whether the profile's marital status equals `status`
    ///
    /// An unknown status matches nothing.
    pub fn shares_marital_status(&self, status: MaritalStatus) -> bool {
        self.marital_status == Some(status)
    }
}

impl ProfileUpdate {
    pub fn age(age: u32) -> Self {
        Self {
            age: Some(age),
            ..Self::default()
        }
    }

    pub fn marital_status(status: MaritalStatus) -> Self {
        Self {
            marital_status: Some(status),
            ..Self::default()
        }
    }

    pub fn occupation(occupation: Occupation) -> Self {
        Self {
            occupation: Some(occupation),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.marital_status.is_none() && self.occupation.is_none()
    }
}
