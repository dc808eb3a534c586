use serde::Deserialize;
use std::collections::HashSet;

use crate::error::ConfigError;
use crate::events::EventCatalog;
use crate::resources::ResourceTable;
use crate::roles::{Role, RoleId, RolesList};

const BUILTIN_CONFIG: &str = include_str!("../assets/game_config.json");

/// Immutable role, resource, and event tables a session is played against.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameConfig {
    pub roles: RolesList,
    pub resources: ResourceTable,
    pub events: EventCatalog,
}

impl GameConfig {
    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the tables are unusable.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The tables shipped with the game.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded asset is corrupt.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_CONFIG)
    }

    /// Check the invariants the simulator relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resources.is_empty() {
            return Err(ConfigError::NoResources);
        }
        if self.events.is_empty() {
            return Err(ConfigError::NoEvents);
        }

        let mut seen = HashSet::new();
        for resource in &self.resources.0 {
            if !seen.insert(resource.id.as_str()) {
                return Err(ConfigError::DuplicateResource {
                    id: resource.id.clone(),
                });
            }
            if resource.base_price <= 0 {
                return Err(ConfigError::NonPositivePrice {
                    id: resource.id.clone(),
                    price: resource.base_price,
                });
            }
            if let Some(boost) = resource.energy_boost
                && boost <= 0
            {
                return Err(ConfigError::NonPositiveBoost {
                    id: resource.id.clone(),
                    boost,
                });
            }
        }

        for event in &self.events.0 {
            if let Some(effect) = event
                .effects
                .iter()
                .find(|effect| !effect.multiplier.is_finite() || effect.multiplier <= 0.0)
            {
                return Err(ConfigError::InvalidMultiplier {
                    event: event.title.clone(),
                    multiplier: effect.multiplier,
                });
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn role(&self, id: RoleId) -> Option<&Role> {
        self.roles.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Category;

    const MINIMAL: &str = r#"{
        "roles": { "worker": { "title": "Worker", "monthly_income": 10, "starting_money": 20, "energy_drain": 5 } },
        "resources": [ { "id": "rent", "name": "Rent", "base_price": 5, "is_required": true, "category": "housing" } ],
        "events": [ { "title": "Shock", "description": "", "effects": [ { "multiplier": 1.5 } ] } ]
    }"#;

    #[test]
    fn builtin_tables_load() {
        let config = GameConfig::builtin().unwrap();
        assert_eq!(config.roles.len(), 5);
        assert_eq!(config.resources.len(), 7);
        assert_eq!(config.events.len(), 4);

        let worker = config.role(RoleId::Worker).unwrap();
        assert_eq!(worker.title, "Factory Worker");
        assert_eq!(worker.monthly_income, 3000);
        assert_eq!(worker.starting_money, 5000);
        assert_eq!(worker.energy_drain, 100);

        let required: i64 = config
            .resources
            .iter()
            .filter(|r| r.is_required)
            .map(|r| r.base_price)
            .sum();
        assert_eq!(required, 1248);
        let optional_boosts: Vec<_> = config
            .resources
            .iter()
            .filter(|r| !r.is_required)
            .map(|r| (r.id.as_str(), r.energy_boost))
            .collect();
        assert_eq!(
            optional_boosts,
            vec![("clothing", Some(150)), ("entertainment", Some(200))]
        );
        assert_eq!(
            config.events.get(1).unwrap().effects[0].category,
            Some(Category::Food)
        );
    }

    #[test]
    fn minimal_document_parses() {
        let config = GameConfig::from_json(MINIMAL).unwrap();
        assert_eq!(config.roles.len(), 1);
        assert!(config.role(RoleId::Banker).is_none());
    }

    #[test]
    fn empty_tables_are_rejected() {
        let no_events = MINIMAL.replace(
            r#"[ { "title": "Shock", "description": "", "effects": [ { "multiplier": 1.5 } ] } ]"#,
            "[]",
        );
        assert!(matches!(
            GameConfig::from_json(&no_events),
            Err(ConfigError::NoEvents)
        ));

        let no_resources = MINIMAL.replace(
            r#"[ { "id": "rent", "name": "Rent", "base_price": 5, "is_required": true, "category": "housing" } ]"#,
            "[]",
        );
        assert!(matches!(
            GameConfig::from_json(&no_resources),
            Err(ConfigError::NoResources)
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = GameConfig::from_json(MINIMAL).unwrap();
        config.resources.0[0].base_price = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositivePrice { price: 0, .. })
        ));

        let mut config = GameConfig::from_json(MINIMAL).unwrap();
        config.resources.0[0].energy_boost = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveBoost { boost: 0, .. })
        ));

        let mut config = GameConfig::from_json(MINIMAL).unwrap();
        let duplicate = config.resources.0[0].clone();
        config.resources.0.push(duplicate);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateResource { .. })
        ));

        let mut config = GameConfig::from_json(MINIMAL).unwrap();
        config.events.0[0].effects[0].multiplier = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMultiplier { .. })
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
