//! Read-only projection of a session for presentation layers.

use serde::Serialize;

use crate::resources::{Category, PricedResource};
use crate::roles::{Role, RoleId};
use crate::state::{GameOverReason, GameState, MonthlyRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceLine {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub price: i64,
    pub previous_price: i64,
    pub percentage_change: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_boost: Option<i32>,
    /// Whether the money on hand covers this price.
    pub affordable: bool,
}

impl PriceLine {
    fn new(resource: &PricedResource, money: i64) -> Self {
        Self {
            id: resource.id().to_string(),
            name: resource.name().to_string(),
            category: resource.category(),
            price: resource.price,
            previous_price: resource.previous_price,
            percentage_change: resource.percentage_change,
            energy_boost: resource.energy_boost(),
            affordable: money >= resource.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventLine {
    pub title: String,
    pub description: String,
}

/// Snapshot of everything a game board shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub role: RoleId,
    pub role_title: String,
    pub month: u32,
    pub money: i64,
    pub energy: i32,
    pub required_expenses: i64,
    pub required: Vec<PriceLine>,
    pub optional: Vec<PriceLine>,
    pub current_event: Option<EventLine>,
    pub history: Vec<MonthlyRecord>,
    pub game_over: Option<GameOverReason>,
    pub optionals_enabled: bool,
}

impl GameView {
    #[must_use]
    pub fn new(role: &Role, state: &GameState, optionals_enabled: bool) -> Self {
        Self {
            role: role.id,
            role_title: role.title.clone(),
            month: state.month,
            money: state.money,
            energy: state.energy,
            required_expenses: state.required_expenses(),
            required: state
                .required()
                .map(|r| PriceLine::new(r, state.money))
                .collect(),
            optional: state
                .optional()
                .map(|r| PriceLine::new(r, state.money))
                .collect(),
            current_event: state.current_event.as_ref().map(|event| EventLine {
                title: event.title.clone(),
                description: event.description.clone(),
            }),
            history: state.history.clone(),
            game_over: state.game_over_reason(),
            optionals_enabled,
        }
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    /// Game-over headline, if the session has ended.
    #[must_use]
    pub fn headline(&self) -> Option<&'static str> {
        self.game_over.map(GameOverReason::headline)
    }
}
