use anyhow::{Context, Result, anyhow, ensure};
use inflation_game::constants::MAX_ENERGY;
use inflation_game::pricing::reprice;
use inflation_game::{
    CommandError, EconomySimulator, GameConfig, GameOverReason, GameSession, GameState,
    MonthOutcome, PurchaseOutcome, RoleId, ScriptedEventSource, SeededEventSource, SkipReason,
    apply_event, required_expenses,
};

use crate::common::scenario::TestScenario;
use crate::logic::game_tester::{GameTester, SimulationSummary};
use crate::logic::{GameplayStrategy, SimulationPlan};

type Expectation = fn(&SimulationSummary) -> Result<()>;

pub fn catalog_scenarios() -> Vec<TestScenario> {
    let entries: [(&str, Expectation); 11] = [
        ("Deterministic Replay", deterministic_replay_expectation),
        ("Pricing Purity", pricing_purity_expectation),
        ("Month Atomicity", month_atomicity_expectation),
        ("History Numbering", history_numbering_expectation),
        ("Energy Clamp", energy_clamp_expectation),
        ("Exact Funds Boundary", exact_funds_expectation),
        ("Energy Zero Boundary", energy_zero_expectation),
        ("Unaffordable Purchase", unaffordable_purchase_expectation),
        ("Optionals Toggle", optionals_toggle_expectation),
        ("Session Reset", session_reset_expectation),
        ("Worker First Month", worker_first_month_expectation),
    ];

    entries
        .into_iter()
        .map(|(name, expectation)| {
            let plan = if name == "Deterministic Replay" {
                SimulationPlan::new(RoleId::Worker, GameplayStrategy::Random)
                    .with_max_months(24)
            } else {
                base_plan()
            };
            TestScenario::simulation(name, plan.with_expectation(expectation))
        })
        .collect()
}

pub fn find_catalog_scenario(name: &str) -> Option<TestScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.name == name)
}

fn base_plan() -> SimulationPlan {
    SimulationPlan::new(RoleId::Worker, GameplayStrategy::Frugal)
        .with_max_months(0)
}

/// Simulator over the opening state of `summary`, with `adjust` applied
/// and every later draw picking the first event.
fn simulator_from(
    summary: &SimulationSummary,
    adjust: impl FnOnce(&mut GameState),
) -> Result<EconomySimulator<ScriptedEventSource>> {
    let config = summary.assets.config();
    let role = config
        .role(summary.role)
        .cloned()
        .ok_or_else(|| anyhow!("role {} missing from tables", summary.role))?;
    let mut state = summary.final_state.clone();
    adjust(&mut state);
    Ok(EconomySimulator::from_state(
        role,
        state,
        config.events.clone(),
        ScriptedEventSource::repeating(0),
    ))
}

fn deterministic_replay_expectation(summary: &SimulationSummary) -> Result<()> {
    let plan =
        SimulationPlan::new(summary.role, summary.strategy).with_max_months(summary.max_months);
    let replay = GameTester::new(summary.assets.clone(), false)
        .run_plan(&plan, summary.seed)
        .context("replay failed")?;

    ensure!(
        replay.final_state == summary.final_state,
        "replay of seed {} diverged: month {} vs {}",
        summary.seed,
        replay.final_state.month,
        summary.final_state.month
    );
    ensure!(
        replay.metrics.decision_log == summary.metrics.decision_log,
        "replay made different purchases"
    );
    let titles = |s: &SimulationSummary| -> Vec<Option<String>> {
        s.turns.iter().map(|t| t.event_title.clone()).collect()
    };
    ensure!(
        titles(&replay) == titles(summary),
        "replay drew a different event sequence"
    );
    Ok(())
}

fn pricing_purity_expectation(summary: &SimulationSummary) -> Result<()> {
    let config = summary.assets.config();
    let prices = config.resources.priced();
    let snapshot = prices.clone();

    for event in config.events.iter() {
        let first = apply_event(&prices, event);
        let second = apply_event(&prices, event);
        ensure!(prices == snapshot, "{} mutated its input", event.title);
        ensure!(first == second, "{} repriced nondeterministically", event.title);
        ensure!(first.len() == prices.len(), "{} changed the basket size", event.title);

        for (before, after) in prices.iter().zip(&first) {
            ensure!(before.id() == after.id(), "{} reordered the basket", event.title);
            ensure!(
                after.previous_price == before.price,
                "{}: {} previous price {} should be {}",
                event.title,
                after.id(),
                after.previous_price,
                before.price
            );
            let expected = reprice(before, event.matching_effect(before.category()));
            ensure!(
                after == &expected,
                "{}: {} repriced to {} instead of {}",
                event.title,
                after.id(),
                after.price,
                expected.price
            );
        }
    }
    Ok(())
}

fn month_atomicity_expectation(summary: &SimulationSummary) -> Result<()> {
    let mut simulator = simulator_from(summary, |state| {
        state.money = state.required_expenses() - 1;
    })?;
    let before = simulator.state().clone();

    let outcome = simulator.advance_month()?;
    ensure!(
        outcome == MonthOutcome::GameOver(GameOverReason::InsufficientFunds),
        "expected insufficient funds, got {outcome:?}"
    );

    let after = simulator.state();
    ensure!(after.money == before.money, "money changed on a failed month");
    ensure!(after.energy == before.energy, "energy changed on a failed month");
    ensure!(after.prices == before.prices, "prices changed on a failed month");
    ensure!(after.history == before.history, "history grew on a failed month");
    ensure!(after.month == before.month, "month advanced on a failed month");
    ensure!(after.is_game_over(), "session should be over");

    ensure!(
        matches!(simulator.advance_month(), Err(CommandError::GameOver { .. })),
        "terminal session accepted another month"
    );
    Ok(())
}

fn history_numbering_expectation(summary: &SimulationSummary) -> Result<()> {
    let config = summary.assets.config();
    let mut session = GameSession::start(
        config,
        summary.role,
        SeededEventSource::from_user_seed(summary.seed),
    )?;

    for _ in 0..12 {
        if session.advance_month()?.ended() {
            break;
        }
    }

    let state = session.state();
    for (index, record) in state.history.iter().enumerate() {
        ensure!(
            usize::try_from(record.month).ok() == Some(index + 1),
            "history entry {index} is numbered {}",
            record.month
        );
    }
    ensure!(
        usize::try_from(state.month).ok() == Some(state.history.len() + 1),
        "month {} after {} records",
        state.month,
        state.history.len()
    );
    let run = session.summary();
    ensure!(
        run.total_costs == state.history.iter().map(|r| r.costs).sum::<i64>(),
        "summary costs disagree with history"
    );
    Ok(())
}

fn energy_clamp_expectation(summary: &SimulationSummary) -> Result<()> {
    let (id, price, boost) = summary
        .final_state
        .optional()
        .find_map(|r| r.energy_boost().map(|boost| (r.id().to_string(), r.price, boost)))
        .ok_or_else(|| anyhow!("tables have no energy boosting extra"))?;

    let start_energy = MAX_ENERGY - boost / 2;
    let mut simulator = simulator_from(summary, |state| state.energy = start_energy)?;
    let money_before = simulator.state().money;

    let outcome = simulator.purchase_optional(&id)?;
    ensure!(
        outcome
            == PurchaseOutcome::Purchased {
                cost: price,
                energy_gained: MAX_ENERGY - start_energy,
            },
        "unexpected purchase outcome {outcome:?}"
    );
    ensure!(simulator.state().energy == MAX_ENERGY, "energy not clamped");
    ensure!(
        simulator.state().money == money_before - price,
        "full price should be charged even when the boost is clamped"
    );
    Ok(())
}

fn exact_funds_expectation(summary: &SimulationSummary) -> Result<()> {
    let mut simulator = simulator_from(summary, |state| {
        state.money = state.required_expenses();
    })?;
    let income = simulator.role().monthly_income;

    let outcome = simulator.advance_month()?;
    ensure!(
        matches!(outcome, MonthOutcome::Advanced(_)),
        "exact funds should pay the bills, got {outcome:?}"
    );
    ensure!(
        simulator.state().money == income,
        "money after paying exactly should equal income ({} vs {income})",
        simulator.state().money
    );
    Ok(())
}

fn energy_zero_expectation(summary: &SimulationSummary) -> Result<()> {
    let drain = summary
        .assets
        .config()
        .role(summary.role)
        .map(|role| role.energy_drain)
        .ok_or_else(|| anyhow!("role {} missing from tables", summary.role))?;
    let mut simulator = simulator_from(summary, |state| state.energy = drain)?;

    let outcome = simulator.advance_month()?;
    ensure!(
        outcome == MonthOutcome::GameOver(GameOverReason::EnergyDepleted),
        "draining to zero should end the game, got {outcome:?}"
    );
    ensure!(simulator.state().energy == drain, "energy changed on a failed month");
    ensure!(simulator.state().history.is_empty(), "failed month was recorded");

    simulator = simulator_from(summary, |state| state.energy = drain + 1)?;
    ensure!(
        matches!(simulator.advance_month()?, MonthOutcome::Advanced(_)),
        "one point of energy above the drain should survive"
    );
    ensure!(simulator.state().energy == 1, "energy should be left at 1");
    Ok(())
}

fn unaffordable_purchase_expectation(summary: &SimulationSummary) -> Result<()> {
    let (id, price) = summary
        .final_state
        .optional()
        .map(|r| (r.id().to_string(), r.price))
        .next()
        .ok_or_else(|| anyhow!("tables have no optional resources"))?;

    let mut simulator = simulator_from(summary, |state| state.money = price - 1)?;
    let before = simulator.state().clone();

    let outcome = simulator.purchase_optional(&id)?;
    ensure!(
        outcome == PurchaseOutcome::Skipped(SkipReason::Unaffordable),
        "expected an unaffordable skip, got {outcome:?}"
    );
    ensure!(simulator.state() == &before, "skipped purchase changed state");

    let required = before
        .required()
        .next()
        .map(|r| r.id().to_string())
        .ok_or_else(|| anyhow!("tables have no required resources"))?;
    ensure!(
        matches!(
            simulator.purchase_optional(&required),
            Err(CommandError::NotOptional { .. })
        ),
        "required expenses must not be purchasable"
    );
    ensure!(
        matches!(
            simulator.purchase_optional("no-such-thing"),
            Err(CommandError::UnknownResource { .. })
        ),
        "unknown ids must be rejected"
    );
    Ok(())
}

fn optionals_toggle_expectation(summary: &SimulationSummary) -> Result<()> {
    let config = summary.assets.config();
    let mut session = GameSession::start(config, summary.role, ScriptedEventSource::repeating(0))?;
    let id = session
        .state()
        .optional()
        .next()
        .map(|r| r.id().to_string())
        .ok_or_else(|| anyhow!("tables have no optional resources"))?;

    ensure!(session.optionals_enabled(), "optionals start enabled");
    ensure!(!session.toggle_optionals(), "toggle should disable optionals");
    let before = session.state().clone();
    let outcome = session.purchase_optional(&id)?;
    ensure!(
        outcome == PurchaseOutcome::Skipped(SkipReason::OptionalsDisabled),
        "disabled optionals should skip, got {outcome:?}"
    );
    ensure!(session.state() == &before, "disabled purchase changed state");
    ensure!(!session.view().optionals_enabled, "view ignores the toggle");

    session.set_optionals_enabled(true);
    ensure!(
        session.purchase_optional(&id)?.purchased(),
        "re-enabled purchase should go through"
    );
    Ok(())
}

fn session_reset_expectation(summary: &SimulationSummary) -> Result<()> {
    let config = summary.assets.config();
    let mut session = GameSession::start(config, summary.role, ScriptedEventSource::repeating(0))?;

    ensure!(
        session.reset(config, summary.role, ScriptedEventSource::repeating(0))
            == Err(CommandError::SessionActive),
        "reset must be refused while the game is running"
    );

    let mut months = 0;
    while !session.advance_month()?.ended() {
        months += 1;
        ensure!(months < 1_000, "game never ended");
    }
    ensure!(session.state().is_game_over(), "loop ended without game over");

    session.reset(config, summary.role, ScriptedEventSource::repeating(0))?;
    let fresh = session.state();
    ensure!(fresh.is_active(), "reset session should be active");
    ensure!(fresh.history.is_empty(), "reset session kept history");
    ensure!(fresh.month == 1, "reset session starts in month {}", fresh.month);
    ensure!(
        fresh.money == session.role().starting_money,
        "reset session has {} money",
        fresh.money
    );
    Ok(())
}

/// Worker on the embedded tables with an oil crisis every draw.
fn worker_first_month_expectation(_summary: &SimulationSummary) -> Result<()> {
    let config = GameConfig::builtin()?;
    let mut session = GameSession::start(
        &config,
        RoleId::Worker,
        ScriptedEventSource::repeating(0),
    )?;

    let opening = session.state();
    ensure!(
        opening.current_event.as_ref().map(|e| e.title.as_str()) == Some("Oil Crisis"),
        "opening event should be the oil crisis"
    );
    ensure!(
        opening.required_expenses() == 1498,
        "opening bill should be 1498, got {}",
        opening.required_expenses()
    );
    ensure!(
        opening.prices.iter().all(|p| p.percentage_change == 20),
        "every price should show +20%"
    );

    let outcome = session.advance_month()?;
    let MonthOutcome::Advanced(record) = outcome else {
        return Err(anyhow!("first month should not end the game: {outcome:?}"));
    };
    ensure!(record.month == 1 && record.costs == 1498 && record.income == 3000);

    let state = session.state();
    ensure!(state.money == 6502, "money after month one is {}", state.money);
    ensure!(state.energy == 900, "energy after month one is {}", state.energy);
    ensure!(state.month == 2, "should be month 2");
    ensure!(
        required_expenses(&state.prices) == 1797,
        "second bill should be 1797, got {}",
        required_expenses(&state.prices)
    );
    Ok(())
}
