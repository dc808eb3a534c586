//! Resource basket and priced snapshots
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category an inflation effect can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Housing,
    Utilities,
    Goods,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Housing => "housing",
            Self::Utilities => "utilities",
            Self::Goods => "goods",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A good in the basket as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    /// Configured starting price in whole currency units.
    pub base_price: i64,
    /// Required resources are billed every month; optional ones are bought
    /// on demand for energy.
    pub is_required: bool,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_boost: Option<i32>,
}

/// A resource together with its current price and the change produced by
/// the latest inflation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedResource {
    pub resource: Resource,
    pub price: i64,
    /// Price immediately before the latest event was applied.
    pub previous_price: i64,
    /// Rounded percent change of the latest event's multiplier.
    pub percentage_change: i32,
}

impl PricedResource {
    #[must_use]
    pub fn new(resource: Resource) -> Self {
        let price = resource.base_price;
        Self {
            resource,
            price,
            previous_price: price,
            percentage_change: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.resource.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.resource.name
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.resource.category
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.resource.is_required
    }

    #[must_use]
    pub const fn energy_boost(&self) -> Option<i32> {
        self.resource.energy_boost
    }

    /// Absolute change against the previous price.
    #[must_use]
    pub const fn price_delta(&self) -> i64 {
        self.price - self.previous_price
    }

    #[must_use]
    pub const fn has_risen(&self) -> bool {
        self.percentage_change > 0
    }
}

impl From<Resource> for PricedResource {
    fn from(resource: Resource) -> Self {
        Self::new(resource)
    }
}

/// Configured resource basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ResourceTable(pub Vec<Resource>);

impl ResourceTable {
    /// Load the basket from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid resource data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Resource> {
        self.0.iter().find(|r| r.id == id)
    }

    /// Fresh price list with every resource at its base price.
    #[must_use]
    pub fn priced(&self) -> Vec<PricedResource> {
        self.0.iter().cloned().map(PricedResource::new).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
