pub mod catalog;

use anyhow::{Result, ensure};
use inflation_game::RoleId;
use inflation_game::constants::{MAX_ENERGY, MIN_ENERGY};

use crate::logic::game_tester::SimulationSummary;
use crate::logic::{GameplayStrategy, SimulationPlan};
use catalog::find_catalog_scenario;

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Invariants every finished run satisfies regardless of policy.
fn run_invariants(summary: &SimulationSummary) -> Result<()> {
    let state = &summary.final_state;
    ensure!(
        summary.turns.len() == state.history.len(),
        "played {} turns but recorded {} months",
        summary.turns.len(),
        state.history.len()
    );
    ensure!(
        usize::try_from(state.month).ok() == Some(state.history.len() + 1),
        "month counter {} does not follow {} recorded months",
        state.month,
        state.history.len()
    );
    ensure!(state.money >= 0, "money went negative: {}", state.money);
    ensure!(
        (MIN_ENERGY..=MAX_ENERGY).contains(&state.energy),
        "energy {} escaped its bounds",
        state.energy
    );
    ensure!(
        summary.game_ended == state.is_game_over(),
        "summary and state disagree about game over"
    );
    ensure!(
        summary.metrics.ending == summary.run.ending,
        "metrics ending {} differs from run summary ending {}",
        summary.metrics.ending,
        summary.run.ending
    );
    Ok(())
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    run_invariants(summary)?;
    ensure!(
        summary.metrics.months_survived > 0,
        "game should survive at least one month"
    );
    ensure!(
        summary.game_ended || summary.metrics.reached_cap,
        "run stopped before an ending or the month cap"
    );
    Ok(())
}

fn smoke_scenario() -> TestScenario {
    TestScenario::simulation(
        "Smoke Test",
        SimulationPlan::new(RoleId::Worker, GameplayStrategy::Frugal)
            .with_expectation(smoke_expectation),
    )
}

fn strategy_scenario(name: &'static str, strategy: GameplayStrategy) -> TestScenario {
    TestScenario::simulation(
        name,
        SimulationPlan::new(RoleId::Worker, strategy).with_expectation(run_invariants),
    )
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(smoke_scenario()),
        "frugal-strategy" | "frugal" => Some(strategy_scenario(
            "Frugal Strategy Test",
            GameplayStrategy::Frugal,
        )),
        "energy-keeper-strategy" | "energy-keeper" => Some(strategy_scenario(
            "Energy Keeper Strategy Test",
            GameplayStrategy::EnergyKeeper,
        )),
        "spender-strategy" | "spender" => Some(strategy_scenario(
            "Spender Strategy Test",
            GameplayStrategy::Spender,
        )),
        "random-strategy" | "random" => Some(strategy_scenario(
            "Random Strategy Test",
            GameplayStrategy::Random,
        )),
        "deterministic-replay" | "deterministic" => find_catalog_scenario("Deterministic Replay"),
        "pricing-purity" | "pricing" => find_catalog_scenario("Pricing Purity"),
        "month-atomicity" | "atomicity" => find_catalog_scenario("Month Atomicity"),
        "history-numbering" | "history" => find_catalog_scenario("History Numbering"),
        "energy-clamp" => find_catalog_scenario("Energy Clamp"),
        "exact-funds-boundary" | "exact-funds" => find_catalog_scenario("Exact Funds Boundary"),
        "energy-zero-boundary" | "energy-zero" => find_catalog_scenario("Energy Zero Boundary"),
        "unaffordable-purchase" | "unaffordable" => find_catalog_scenario("Unaffordable Purchase"),
        "optionals-toggle" | "toggle" => find_catalog_scenario("Optionals Toggle"),
        "session-reset" | "reset" => find_catalog_scenario("Session Reset"),
        "worker-first-month" | "first-month" => find_catalog_scenario("Worker First Month"),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("frugal-strategy", "Frugal Strategy Test"),
        ("energy-keeper-strategy", "Energy Keeper Strategy Test"),
        ("spender-strategy", "Spender Strategy Test"),
        ("random-strategy", "Random Strategy Test"),
        ("deterministic-replay", "Deterministic Replay"),
        ("pricing-purity", "Pricing Purity"),
        ("month-atomicity", "Month Atomicity"),
        ("history-numbering", "History Numbering"),
        ("energy-clamp", "Energy Clamp"),
        ("exact-funds-boundary", "Exact Funds Boundary"),
        ("energy-zero-boundary", "Energy Zero Boundary"),
        ("unaffordable-purchase", "Unaffordable Purchase"),
        ("optionals-toggle", "Optionals Toggle"),
        ("session-reset", "Session Reset"),
        ("worker-first-month", "Worker First Month"),
    ]
}

/// Every scenario key, in listing order.
pub fn all_scenario_keys() -> Vec<String> {
    list_scenarios()
        .into_iter()
        .map(|(key, _)| key.to_string())
        .collect()
}
