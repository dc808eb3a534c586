use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use inflation_game::{
    Ending, GameConfig, GameState, MonthOutcome, PurchaseOutcome, RoleId, RunSummary,
};

use crate::logic::policy::GameplayStrategy;
use crate::logic::simulation::{DecisionRecord, SimulationConfig, SimulationSession, TurnOutcome};

pub const DEFAULT_MAX_MONTHS: u32 = 120;

/// Collection of immutable data required to run a simulation.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    config: GameConfig,
}

impl TesterAssets {
    /// Tables embedded in the game crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded tables fail validation.
    pub fn load_default() -> Result<Self> {
        let config = GameConfig::builtin().context("embedded game tables are invalid")?;
        Ok(Self { config })
    }

    /// Tables read from a JSON document on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = GameConfig::from_json(&json)
            .with_context(|| format!("invalid game tables in {}", path.display()))?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Roles present in the loaded tables.
    pub fn roles(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.config.roles.iter().map(|role| role.id)
    }
}

/// Declarative plan for running a simulation session.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub role: RoleId,
    pub strategy: GameplayStrategy,
    pub max_months: Option<u32>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(role: RoleId, strategy: GameplayStrategy) -> Self {
        Self {
            role,
            strategy,
            max_months: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_months(mut self, max_months: u32) -> Self {
        self.max_months = Some(max_months);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    /// # Errors
    ///
    /// Returns the expectation's failure.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub role: RoleId,
    pub strategy: GameplayStrategy,
    pub max_months: u32,
    pub turns: Vec<TurnOutcome>,
    pub metrics: PlayabilityMetrics,
    pub final_state: GameState,
    pub run: RunSummary,
    pub game_ended: bool,
    pub assets: Arc<TesterAssets>,
}

/// Aggregated analytics produced by a simulation run.
#[derive(Debug, Clone)]
pub struct PlayabilityMetrics {
    pub months_survived: u32,
    pub ending: Ending,
    pub reached_cap: bool,
    pub final_money: i64,
    pub final_energy: i32,
    pub min_energy: i32,
    pub peak_required: i64,
    pub optional_purchases: u32,
    pub optional_spend: i64,
    pub skipped_purchases: u32,
    pub decision_log: Vec<DecisionRecord>,
}

impl Default for PlayabilityMetrics {
    fn default() -> Self {
        Self {
            months_survived: 0,
            ending: Ending::Ongoing,
            reached_cap: false,
            final_money: 0,
            final_energy: 0,
            min_energy: i32::MAX,
            peak_required: 0,
            optional_purchases: 0,
            optional_spend: 0,
            skipped_purchases: 0,
            decision_log: Vec::new(),
        }
    }
}

impl PlayabilityMetrics {
    pub fn record_turn(&mut self, outcome: &TurnOutcome) {
        for decision in &outcome.decisions {
            match decision.outcome {
                PurchaseOutcome::Purchased { cost, .. } => {
                    self.optional_purchases = self.optional_purchases.saturating_add(1);
                    self.optional_spend += cost;
                }
                PurchaseOutcome::Skipped(_) => {
                    self.skipped_purchases = self.skipped_purchases.saturating_add(1);
                }
            }
            self.decision_log.push(decision.clone());
        }
        if let MonthOutcome::Advanced(record) = outcome.outcome {
            self.peak_required = self.peak_required.max(record.costs);
        }
        self.min_energy = self.min_energy.min(outcome.energy);
    }

    pub fn finalize(&mut self, state: &GameState) {
        self.months_survived = u32::try_from(state.months_completed()).unwrap_or(u32::MAX);
        self.ending = Ending::from(state.game_over_reason());
        self.reached_cap = state.is_active();
        self.final_money = state.money;
        self.final_energy = state.energy;
        self.min_energy = self.min_energy.min(state.energy);
        self.peak_required = self.peak_required.max(state.required_expenses());
    }

    /// Ending label used in reports; runs cut off by the month cap count as survived.
    #[must_use]
    pub const fn ending_label(&self) -> &'static str {
        match self.ending {
            Ending::Ongoing => "survived",
            Ending::InsufficientFunds => "funds",
            Ending::EnergyDepleted => "energy",
        }
    }
}

/// Headless deterministic runner for the core game logic.
#[derive(Clone)]
pub struct GameTester {
    verbose: bool,
    assets: Arc<TesterAssets>,
}

impl GameTester {
    pub const fn new(assets: Arc<TesterAssets>, verbose: bool) -> Self {
        Self { verbose, assets }
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Play `plan` to completion from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the role is not in the tables or the session
    /// rejects a command the policy issued.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let max_months = plan.max_months.unwrap_or(DEFAULT_MAX_MONTHS);
        let config =
            SimulationConfig::new(plan.role, plan.strategy, seed).with_max_months(max_months);
        let mut session = SimulationSession::new(config, self.assets.config())
            .with_context(|| format!("could not start a {} session", plan.role))?;

        if self.verbose {
            log_initial_state(seed, plan, session.state());
        }

        let mut policy = config.strategy.create_policy(config.seed);
        let mut metrics = PlayabilityMetrics::default();
        let mut turns = Vec::new();

        if max_months > 0 {
            loop {
                let outcome = session.advance(policy.as_mut()).with_context(|| {
                    format!("{} month {} failed", plan.strategy, session.state().month)
                })?;
                metrics.record_turn(&outcome);

                if self.verbose {
                    log_turn(&outcome);
                }

                let finished = outcome.game_ended;
                turns.push(outcome);
                if finished {
                    break;
                }
            }
        }

        let session = session.into_session();
        let run = session.summary();
        let final_state = session.into_state();
        metrics.finalize(&final_state);
        let game_ended = final_state.is_game_over();

        Ok(SimulationSummary {
            seed,
            role: plan.role,
            strategy: plan.strategy,
            max_months,
            turns,
            metrics,
            final_state,
            run,
            game_ended,
            assets: Arc::clone(&self.assets),
        })
    }
}

fn log_initial_state(seed: u64, plan: &SimulationPlan, state: &GameState) {
    println!(
        "🎮 Starting simulation | seed:{seed} role:{} policy:{}",
        plan.role,
        plan.strategy.label()
    );
    println!(
        "📊 Initial state | Money:{} Energy:{} Required:{} Event:{}",
        state.money,
        state.energy,
        state.required_expenses(),
        state
            .current_event
            .as_ref()
            .map_or("-", |event| event.title.as_str())
    );
}

fn log_turn(outcome: &TurnOutcome) {
    for decision in &outcome.decisions {
        println!(
            "🛒 Month {}: {} -> {:?} ({})",
            decision.month, decision.resource_id, decision.outcome, decision.policy_name
        );
    }

    if outcome.month % 12 == 0 || outcome.game_ended {
        println!(
            "📅 Month {} | Money:{} Energy:{} Next bill:{}",
            outcome.month, outcome.money, outcome.energy, outcome.next_required
        );
    }

    if let MonthOutcome::GameOver(reason) = outcome.outcome {
        println!("🏁 Simulation ended: {}", reason.headline());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tester() -> GameTester {
        GameTester::new(Arc::new(TesterAssets::load_default().unwrap()), false)
    }

    #[test]
    fn run_plan_collects_metrics() {
        let plan = SimulationPlan::new(RoleId::Worker, GameplayStrategy::EnergyKeeper);
        let summary = tester().run_plan(&plan, 1337).unwrap();
        assert_eq!(summary.turns.len(), summary.final_state.history.len());
        assert_eq!(
            usize::try_from(summary.metrics.months_survived).unwrap(),
            summary.final_state.history.len()
        );
        assert_eq!(summary.run.months_survived, summary.final_state.history.len());
        assert_eq!(summary.metrics.ending, summary.run.ending);
        assert!(summary.metrics.min_energy >= 0);
        assert!(summary.metrics.min_energy <= 1000);
    }

    #[test]
    fn zero_month_plan_does_not_play() {
        let plan = SimulationPlan::new(RoleId::Farmer, GameplayStrategy::Frugal).with_max_months(0);
        let summary = tester().run_plan(&plan, 5).unwrap();
        assert!(summary.turns.is_empty());
        assert!(!summary.game_ended);
        assert_eq!(summary.final_state.month, 1);
        assert_eq!(summary.metrics.ending_label(), "survived");
    }

    #[test]
    fn unknown_role_is_an_error() {
        let mut config = GameConfig::builtin().unwrap();
        config.roles.0.clear();
        let tester = GameTester::new(Arc::new(TesterAssets { config }), false);
        let plan = SimulationPlan::new(RoleId::Worker, GameplayStrategy::Frugal);
        assert!(tester.run_plan(&plan, 1).is_err());
    }

    #[test]
    fn assets_load_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "inflation-tables-{}.json",
            std::process::id()
        ));
        let json = r#"{
            "roles": { "banker": { "title": "Banker", "monthly_income": 7000, "starting_money": 20000, "energy_drain": 80 } },
            "resources": [ { "id": "rent", "name": "Rent", "base_price": 1000, "is_required": true, "category": "housing" } ],
            "events": [ { "title": "Calm", "description": "", "effects": [] } ]
        }"#;
        fs::write(&path, json).unwrap();
        let assets = TesterAssets::from_path(&path).unwrap();
        assert_eq!(assets.roles().collect::<Vec<_>>(), vec![RoleId::Banker]);
        let _ = fs::remove_file(&path);

        assert!(TesterAssets::from_path(Path::new("/nonexistent/tables.json")).is_err());
    }
}
