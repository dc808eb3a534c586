//! End-of-run summary.
use serde::{Deserialize, Serialize};

use crate::constants::HEADLINE_ONGOING;
use crate::roles::Role;
use crate::state::{GameOverReason, GameState};

/// How a run ended, or `Ongoing` if it has not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    Ongoing,
    InsufficientFunds,
    EnergyDepleted,
}

impl Ending {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::InsufficientFunds => "insufficient_funds",
            Self::EnergyDepleted => "energy_depleted",
        }
    }

    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Ongoing => HEADLINE_ONGOING,
            Self::InsufficientFunds => GameOverReason::InsufficientFunds.headline(),
            Self::EnergyDepleted => GameOverReason::EnergyDepleted.headline(),
        }
    }
}

impl From<Option<GameOverReason>> for Ending {
    fn from(reason: Option<GameOverReason>) -> Self {
        match reason {
            None => Self::Ongoing,
            Some(GameOverReason::InsufficientFunds) => Self::InsufficientFunds,
            Some(GameOverReason::EnergyDepleted) => Self::EnergyDepleted,
        }
    }
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Totals for the result screen and for tester reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub role_title: String,
    pub months_survived: usize,
    pub final_money: i64,
    pub final_energy: i32,
    pub total_costs: i64,
    pub total_income: i64,
    pub net: i64,
    pub ending: Ending,
    pub headline: String,
}

/// Summarize a run as played by `role`.
#[must_use]
pub fn run_summary(role: &Role, state: &GameState) -> RunSummary {
    let ending = Ending::from(state.game_over_reason());
    let total_costs = state.total_costs();
    let total_income = state.total_income();
    RunSummary {
        role_title: role.title.clone(),
        months_survived: state.months_completed(),
        final_money: state.money,
        final_energy: state.energy,
        total_costs,
        total_income,
        net: total_income - total_costs,
        ending,
        headline: ending.headline().to_string(),
    }
}
