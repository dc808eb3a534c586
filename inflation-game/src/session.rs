use log::debug;

use crate::data::GameConfig;
use crate::economy::{EconomySimulator, MonthOutcome, PurchaseOutcome, SkipReason};
use crate::error::CommandError;
use crate::rng::{EventSource, SeededEventSource};
use crate::roles::{Role, RoleId};
use crate::state::{GameOverReason, GameState};
use crate::summary::{RunSummary, run_summary};
use crate::view::GameView;

/// High-level session wrapper binding the economy simulator to the player's
/// table-level choices.
///
/// The role is fixed for the lifetime of a session. Once the game is over the
/// only way forward is [`GameSession::reset`].
#[derive(Debug, Clone)]
pub struct GameSession<R = SeededEventSource> {
    simulator: EconomySimulator<R>,
    optionals_enabled: bool,
}

impl<R: EventSource> GameSession<R> {
    /// Start a session as `role`, drawing the opening event from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownRole`] if the role is missing from the
    /// configured tables.
    pub fn start(config: &GameConfig, role: RoleId, source: R) -> Result<Self, CommandError> {
        let role = config
            .role(role)
            .cloned()
            .ok_or(CommandError::UnknownRole { role })?;
        debug!("starting session as {}", role.id);
        let simulator =
            EconomySimulator::new(role, &config.resources, config.events.clone(), source);
        Ok(Self::from_simulator(simulator))
    }

    /// Wrap an existing simulator with optional purchases enabled.
    #[must_use]
    pub const fn from_simulator(simulator: EconomySimulator<R>) -> Self {
        Self {
            simulator,
            optionals_enabled: true,
        }
    }

    /// Close the current month.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::GameOver`] if the session already ended.
    pub fn advance_month(&mut self) -> Result<MonthOutcome, CommandError> {
        self.simulator.advance_month()
    }

    /// Buy one optional resource, honoring the optionals toggle.
    ///
    /// # Errors
    ///
    /// Returns an error if the session already ended, the id is unknown, or
    /// the resource is a required expense.
    pub fn purchase_optional(&mut self, resource_id: &str) -> Result<PurchaseOutcome, CommandError> {
        if !self.optionals_enabled {
            self.simulator.ensure_active()?;
            self.simulator.optional_resource(resource_id)?;
            debug!("skipped {resource_id}: optional purchases disabled");
            return Ok(PurchaseOutcome::Skipped(SkipReason::OptionalsDisabled));
        }
        self.simulator.purchase_optional(resource_id)
    }

    /// Replace a finished session with a fresh one for `role`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::SessionActive`] while the game is still being
    /// played, or [`CommandError::UnknownRole`] for a role missing from the
    /// tables. The session is untouched on error.
    pub fn reset(&mut self, config: &GameConfig, role: RoleId, source: R) -> Result<(), CommandError> {
        if self.state().is_active() {
            return Err(CommandError::SessionActive);
        }
        *self = Self::start(config, role, source)?;
        Ok(())
    }

    pub const fn set_optionals_enabled(&mut self, enabled: bool) {
        self.optionals_enabled = enabled;
    }

    /// Flip the optionals toggle, returning the new setting.
    pub const fn toggle_optionals(&mut self) -> bool {
        self.optionals_enabled = !self.optionals_enabled;
        self.optionals_enabled
    }

    #[must_use]
    pub const fn optionals_enabled(&self) -> bool {
        self.optionals_enabled
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        self.simulator.state()
    }

    #[must_use]
    pub const fn role(&self) -> &Role {
        self.simulator.role()
    }

    #[must_use]
    pub const fn simulator(&self) -> &EconomySimulator<R> {
        &self.simulator
    }

    #[must_use]
    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.state().game_over_reason()
    }

    #[must_use]
    pub fn view(&self) -> GameView {
        GameView::new(self.role(), self.state(), self.optionals_enabled)
    }

    #[must_use]
    pub fn summary(&self) -> RunSummary {
        run_summary(self.role(), self.state())
    }

    /// Consume the session, returning the underlying game state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.simulator.into_state()
    }
}

/// Summarize a session in its current state.
#[must_use]
pub fn summarize<R: EventSource>(session: &GameSession<R>) -> RunSummary {
    session.summary()
}
