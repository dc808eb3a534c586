//! Economy simulator: the month-advance and optional-purchase transitions.
//!
//! Every transition validates first and commits last, so a rejected command or
//! a game-over check never leaves a half-applied month behind.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::events::{EventCatalog, InflationEvent};
use crate::numbers::clamp_energy;
use crate::pricing::apply_event;
use crate::resources::{PricedResource, ResourceTable};
use crate::rng::{EventSource, SeededEventSource};
use crate::roles::Role;
use crate::state::{GameOverReason, GameState, GameStatus, MonthlyRecord};

/// Result of a month-advance command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthOutcome {
    /// The month closed and this record was appended to the history.
    Advanced(MonthlyRecord),
    /// The month could not be paid for; the session is now terminal.
    GameOver(GameOverReason),
}

impl MonthOutcome {
    #[must_use]
    pub const fn ended(&self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}

/// Why an optional purchase did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    OptionalsDisabled,
    Unaffordable,
}

/// Result of an optional-purchase command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOutcome {
    Purchased { cost: i64, energy_gained: i32 },
    Skipped(SkipReason),
}

impl PurchaseOutcome {
    #[must_use]
    pub const fn purchased(&self) -> bool {
        matches!(self, Self::Purchased { .. })
    }
}

/// Owns one session's evolving state together with the role it is played as,
/// the event catalog, and the random source used for draws.
#[derive(Debug, Clone)]
pub struct EconomySimulator<R = SeededEventSource> {
    role: Role,
    events: EventCatalog,
    state: GameState,
    rng: R,
}

impl<R: EventSource> EconomySimulator<R> {
    /// Build a simulator for `role` and perform the opening event draw.
    #[must_use]
    pub fn new(role: Role, resources: &ResourceTable, events: EventCatalog, rng: R) -> Self {
        let state = GameState::new(&role, resources);
        let mut simulator = Self::from_state(role, state, events, rng);
        simulator.draw_event();
        simulator
    }

    /// Wrap an existing state without drawing anything.
    #[must_use]
    pub const fn from_state(role: Role, state: GameState, events: EventCatalog, rng: R) -> Self {
        Self {
            role,
            events,
            state,
            rng,
        }
    }

    /// Opening draw. Month advances draw as part of their own commit, and a
    /// terminal state is never repriced.
    fn draw_event(&mut self) -> Option<&InflationEvent> {
        if !self.state.is_active() {
            return self.state.current_event.as_ref();
        }
        if let Some((event, prices)) = self.next_prices() {
            debug!("event drawn: {}", event.title);
            self.state.prices = prices;
            self.state.current_event = Some(event);
        }
        self.state.current_event.as_ref()
    }

    /// The terminal reason the next advance would hit, if any.
    #[must_use]
    pub fn pending_failure(&self) -> Option<GameOverReason> {
        if self.state.money < self.state.required_expenses() {
            return Some(GameOverReason::InsufficientFunds);
        }
        if self.energy_after_drain() <= 0 {
            return Some(GameOverReason::EnergyDepleted);
        }
        None
    }

    /// Close the current month.
    ///
    /// Required expenses are billed at the prices in effect *before* this
    /// month's event; the new event only affects the following month.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::GameOver`] if the session already ended.
    pub fn advance_month(&mut self) -> Result<MonthOutcome, CommandError> {
        self.ensure_active()?;

        if let Some(reason) = self.pending_failure() {
            self.state.status = GameStatus::GameOver(reason);
            info!(
                "game over in month {} as {}: {reason}",
                self.state.month, self.role.id
            );
            return Ok(MonthOutcome::GameOver(reason));
        }

        let costs = self.state.required_expenses();
        let record = MonthlyRecord {
            month: self.state.month,
            costs,
            income: self.role.monthly_income,
        };
        let energy = self.energy_after_drain();
        let money = (self.state.money - costs).saturating_add(self.role.monthly_income);
        let next = self.next_prices();

        // commit
        self.state.energy = energy;
        self.state.money = money;
        self.state.history.push(record);
        self.state.month += 1;
        if let Some((event, prices)) = next {
            self.state.prices = prices;
            self.state.current_event = Some(event);
        }

        debug!(
            "month {} closed: costs {} income {} -> money {} energy {}",
            record.month, record.costs, record.income, self.state.money, self.state.energy
        );
        Ok(MonthOutcome::Advanced(record))
    }

    /// Buy one unit of an optional resource at its current price.
    ///
    /// Buying with too little money is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the session already ended, the id is unknown, or
    /// the resource is a required expense.
    pub fn purchase_optional(&mut self, resource_id: &str) -> Result<PurchaseOutcome, CommandError> {
        self.ensure_active()?;
        let resource = self.optional_resource(resource_id)?;
        let cost = resource.price;
        let boost = resource.energy_boost().unwrap_or(0);

        if self.state.money < cost {
            debug!(
                "skipped {resource_id}: costs {cost}, have {}",
                self.state.money
            );
            return Ok(PurchaseOutcome::Skipped(SkipReason::Unaffordable));
        }

        let energy = clamp_energy(i64::from(self.state.energy) + i64::from(boost));
        let energy_gained = energy - self.state.energy;
        self.state.money -= cost;
        self.state.energy = energy;
        debug!("bought {resource_id} for {cost}, energy +{energy_gained}");
        Ok(PurchaseOutcome::Purchased {
            cost,
            energy_gained,
        })
    }

    /// Look up an optional resource without touching state.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown ids and required resources.
    pub fn optional_resource(&self, resource_id: &str) -> Result<&PricedResource, CommandError> {
        let resource =
            self.state
                .find_price(resource_id)
                .ok_or_else(|| CommandError::UnknownResource {
                    id: resource_id.to_string(),
                })?;
        if resource.is_required() {
            return Err(CommandError::NotOptional {
                id: resource_id.to_string(),
            });
        }
        Ok(resource)
    }

    /// Reject commands once the session is terminal.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::GameOver`] when the state is terminal.
    pub fn ensure_active(&self) -> Result<(), CommandError> {
        match self.state.status {
            GameStatus::Active => Ok(()),
            GameStatus::GameOver(reason) => Err(CommandError::GameOver { reason }),
        }
    }

    fn energy_after_drain(&self) -> i32 {
        self.state.energy.saturating_sub(self.role.energy_drain)
    }

    fn next_prices(&mut self) -> Option<(InflationEvent, Vec<PricedResource>)> {
        let event = self.events.draw(&mut self.rng)?.clone();
        let prices = apply_event(&self.state.prices, &event);
        Some((event, prices))
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn role(&self) -> &Role {
        &self.role
    }

    #[must_use]
    pub const fn events(&self) -> &EventCatalog {
        &self.events
    }

    #[must_use]
    pub const fn rng(&self) -> &R {
        &self.rng
    }

    /// Consume the simulator, returning the underlying game state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }
}
