use anyhow::Result;
use inflation_game::{
    GameConfig, GameSession, GameState, MonthOutcome, PurchaseOutcome, RoleId,
    SeededEventSource,
};

use crate::logic::policy::{GameplayStrategy, PlayerPolicy};

/// Hard cap on purchases per month so a misbehaving policy cannot spin forever.
pub const MAX_PURCHASES_PER_MONTH: usize = 32;

/// Configuration for a simulation session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub role: RoleId,
    pub strategy: GameplayStrategy,
    pub max_months: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(role: RoleId, strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            role,
            strategy,
            max_months: 120,
        }
    }

    #[must_use]
    pub const fn with_max_months(mut self, max_months: u32) -> Self {
        self.max_months = max_months;
        self
    }
}

/// One optional purchase attempted by the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRecord {
    pub month: u32,
    pub resource_id: String,
    pub policy_name: String,
    pub outcome: PurchaseOutcome,
    pub rationale: Option<String>,
}

/// Result of playing out one month.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub month: u32,
    pub decisions: Vec<DecisionRecord>,
    pub outcome: MonthOutcome,
    pub event_title: Option<String>,
    pub money: i64,
    pub energy: i32,
    pub next_required: i64,
    pub game_ended: bool,
}

/// Deterministic harness driving a [`GameSession`] with a purchase policy.
pub struct SimulationSession {
    session: GameSession<SeededEventSource>,
    max_months: u32,
}

impl SimulationSession {
    /// Start a seeded session for the configured role.
    ///
    /// # Errors
    ///
    /// Returns an error if the role is missing from `tables`.
    pub fn new(config: SimulationConfig, tables: &GameConfig) -> Result<Self> {
        let session = GameSession::start(
            tables,
            config.role,
            SeededEventSource::from_user_seed(config.seed),
        )?;
        Ok(Self {
            session,
            max_months: config.max_months,
        })
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        self.session.state()
    }

    #[must_use]
    pub fn into_session(self) -> GameSession<SeededEventSource> {
        self.session
    }

    /// Let `policy` shop, then close the month.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy names a resource the session rejects or
    /// the session is already over.
    pub fn advance(&mut self, policy: &mut dyn PlayerPolicy) -> Result<TurnOutcome> {
        let month = self.state().month;
        let plan = policy.plan_month(self.session.state(), self.session.role());

        let mut decisions = Vec::with_capacity(plan.len());
        for decision in plan.into_iter().take(MAX_PURCHASES_PER_MONTH) {
            let outcome = self.session.purchase_optional(&decision.resource_id)?;
            decisions.push(DecisionRecord {
                month,
                resource_id: decision.resource_id,
                policy_name: policy.name().to_string(),
                outcome,
                rationale: decision.rationale,
            });
        }

        let outcome = self.session.advance_month()?;
        let state = self.session.state();
        let capped = state.months_completed() >= usize::try_from(self.max_months).unwrap_or(usize::MAX);
        Ok(TurnOutcome {
            month,
            decisions,
            outcome,
            event_title: state.current_event.as_ref().map(|event| event.title.clone()),
            money: state.money,
            energy: state.energy,
            next_required: state.required_expenses(),
            game_ended: outcome.ended() || capped,
        })
    }
}
