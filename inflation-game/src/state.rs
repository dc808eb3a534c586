use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    FIRST_MONTH, HEADLINE_ENERGY_DEPLETED, HEADLINE_INSUFFICIENT_FUNDS, STARTING_ENERGY,
};
use crate::events::InflationEvent;
use crate::pricing::required_expenses;
use crate::resources::{PricedResource, ResourceTable};
use crate::roles::{Role, RoleId};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// Required expenses exceeded the money on hand.
    InsufficientFunds,
    /// The monthly drain would take energy to zero or below.
    EnergyDepleted,
}

impl GameOverReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientFunds => "insufficient funds for necessities",
            Self::EnergyDepleted => "energy depleted",
        }
    }

    /// Player-facing line for the game-over screen.
    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::InsufficientFunds => HEADLINE_INSUFFICIENT_FUNDS,
            Self::EnergyDepleted => HEADLINE_ENERGY_DEPLETED,
        }
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Active,
    GameOver(GameOverReason),
}

/// Ledger line appended once per completed month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub month: u32,
    pub costs: i64,
    pub income: i64,
}

impl MonthlyRecord {
    #[must_use]
    pub const fn net(&self) -> i64 {
        self.income - self.costs
    }
}

/// Everything that changes while a session is played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub role: RoleId,
    pub month: u32,
    pub money: i64,
    pub energy: i32,
    pub prices: Vec<PricedResource>,
    #[serde(default)]
    pub current_event: Option<InflationEvent>,
    #[serde(default)]
    pub history: Vec<MonthlyRecord>,
    #[serde(default)]
    pub status: GameStatus,
}

impl GameState {
    /// Fresh state for `role` with every resource at its base price and no
    /// event drawn yet.
    #[must_use]
    pub fn new(role: &Role, resources: &ResourceTable) -> Self {
        Self {
            role: role.id,
            month: FIRST_MONTH,
            money: role.starting_money,
            energy: STARTING_ENERGY,
            prices: resources.priced(),
            current_event: None,
            history: Vec::new(),
            status: GameStatus::Active,
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, GameStatus::Active)
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        !self.is_active()
    }

    #[must_use]
    pub const fn game_over_reason(&self) -> Option<GameOverReason> {
        match self.status {
            GameStatus::Active => None,
            GameStatus::GameOver(reason) => Some(reason),
        }
    }

    /// What the next month will bill at current prices.
    #[must_use]
    pub fn required_expenses(&self) -> i64 {
        required_expenses(&self.prices)
    }

    pub fn required(&self) -> impl Iterator<Item = &PricedResource> {
        self.prices.iter().filter(|r| r.is_required())
    }

    pub fn optional(&self) -> impl Iterator<Item = &PricedResource> {
        self.prices.iter().filter(|r| !r.is_required())
    }

    #[must_use]
    pub fn find_price(&self, id: &str) -> Option<&PricedResource> {
        self.prices.iter().find(|r| r.id() == id)
    }

    #[must_use]
    pub fn months_completed(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn total_costs(&self) -> i64 {
        self.history.iter().map(|r| r.costs).sum()
    }

    #[must_use]
    pub fn total_income(&self) -> i64 {
        self.history.iter().map(|r| r.income).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Category, Resource};

    fn role() -> Role {
        Role {
            id: RoleId::Farmer,
            title: "Farmer".to_string(),
            description: String::new(),
            monthly_income: 4000,
            starting_money: 10_000,
            energy_drain: 120,
        }
    }

    fn resources() -> ResourceTable {
        ResourceTable(vec![
            Resource {
                id: "rent".to_string(),
                name: "Rent".to_string(),
                base_price: 1000,
                is_required: true,
                category: Category::Housing,
                energy_boost: None,
            },
            Resource {
                id: "entertainment".to_string(),
                name: "Entertainment".to_string(),
                base_price: 100,
                is_required: false,
                category: Category::Goods,
                energy_boost: Some(200),
            },
        ])
    }

    #[test]
    fn new_state_uses_role_baseline() {
        let state = GameState::new(&role(), &resources());
        assert_eq!(state.role, RoleId::Farmer);
        assert_eq!(state.month, 1);
        assert_eq!(state.money, 10_000);
        assert_eq!(state.energy, 1_000);
        assert!(state.current_event.is_none());
        assert!(state.history.is_empty());
        assert!(state.is_active());
        assert_eq!(state.game_over_reason(), None);
    }

    #[test]
    fn partitions_required_and_optional() {
        let state = GameState::new(&role(), &resources());
        let required: Vec<_> = state.required().map(PricedResource::id).collect();
        let optional: Vec<_> = state.optional().map(PricedResource::id).collect();
        assert_eq!(required, vec!["rent"]);
        assert_eq!(optional, vec!["entertainment"]);
        assert_eq!(state.required_expenses(), 1000);
        assert!(state.find_price("entertainment").is_some());
        assert!(state.find_price("caviar").is_none());
    }

    #[test]
    fn ledger_totals_follow_history() {
        let mut state = GameState::new(&role(), &resources());
        state.history.push(MonthlyRecord {
            month: 1,
            costs: 1000,
            income: 4000,
        });
        state.history.push(MonthlyRecord {
            month: 2,
            costs: 1400,
            income: 4000,
        });
        assert_eq!(state.months_completed(), 2);
        assert_eq!(state.total_costs(), 2400);
        assert_eq!(state.total_income(), 8000);
        assert_eq!(state.history[1].net(), 2600);
    }

    #[test]
    fn status_serializes_with_reason() {
        let status = GameStatus::GameOver(GameOverReason::InsufficientFunds);
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"status":"game_over","reason":"insufficient_funds"}"#);
        let active = serde_json::to_string(&GameStatus::Active).unwrap();
        assert_eq!(active, r#"{"status":"active"}"#);
    }

    #[test]
    fn reasons_carry_headlines() {
        assert_eq!(
            GameOverReason::InsufficientFunds.headline(),
            "You can no longer afford basic necessities!"
        );
        assert_eq!(
            GameOverReason::EnergyDepleted.headline(),
            "Your energy has been depleted!"
        );
        assert_eq!(GameOverReason::EnergyDepleted.to_string(), "energy depleted");
    }
}
