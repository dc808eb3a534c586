use serde::{Deserialize, Serialize};

use crate::resources::Category;
use crate::rng::EventSource;

/// One multiplier inside an inflation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEffect {
    /// Resources this effect applies to; `None` targets every category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub multiplier: f64,
}

impl EventEffect {
    #[must_use]
    pub fn applies_to(&self, category: Category) -> bool {
        self.category.is_none_or(|c| c == category)
    }
}

/// A market shock that reprices part of the basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflationEvent {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub effects: Vec<EventEffect>,
}

impl InflationEvent {
    /// First effect, in list order, whose category is unset or equal to `category`.
    #[must_use]
    pub fn matching_effect(&self, category: Category) -> Option<&EventEffect> {
        self.effects.iter().find(|effect| effect.applies_to(category))
    }
}

/// Container for all configured inflation events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct EventCatalog(pub Vec<InflationEvent>);

impl EventCatalog {
    /// Load events from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid event data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn from_events(events: Vec<InflationEvent>) -> Self {
        Self(events)
    }

    /// Draw one event uniformly, with replacement. `None` only for an empty catalog.
    pub fn draw(&self, source: &mut dyn EventSource) -> Option<&InflationEvent> {
        if self.0.is_empty() {
            return None;
        }
        let index = source.pick_index(self.0.len());
        self.0.get(index.min(self.0.len() - 1))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&InflationEvent> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InflationEvent> {
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
