use serde::{Deserialize, Serialize};
use tankwatch_quantities::{Litres, Percent};

/// Identifier of the physical tank sensor, stable across its lifetime.
#[must_use]
#[derive(
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct AssetId(String);

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Tank metadata needed by the analytics.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize, bon::Builder)]
pub struct Asset {
    #[serde(alias = "asset_id")]
    #[builder(into)]
    pub id: AssetId,

    #[serde(default)]
    #[builder(into)]
    pub name: Option<String>,

    #[serde(default, alias = "capacity_liters")]
    pub capacity: Option<Litres>,

    /// Asset-specific override of the global refill threshold.
    #[serde(default, alias = "refill_detection_threshold_percent")]
    pub refill_threshold: Option<Percent>,
}

impl Asset {
    /// Capacity when it is usable for litre conversions.
    pub fn known_capacity(&self) -> Option<Litres> {
        self.capacity.filter(|capacity| capacity.is_positive())
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_ref())
    }
}
