use anyhow::{Context, Result, ensure};
use inflation_game::constants::{MAX_ENERGY, MIN_ENERGY};
use inflation_game::numbers::i64_to_f64;
use inflation_game::{Ending, RoleId};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::logic::game_tester::{GameTester, PlayabilityMetrics, SimulationPlan};
use crate::logic::policy::GameplayStrategy;
use crate::logic::seeds::SeedInfo;

#[derive(Debug, Clone)]
pub struct PlayabilityRecord {
    pub scenario_name: String,
    pub role: RoleId,
    pub strategy: GameplayStrategy,
    pub seed_label: String,
    pub seed_value: u64,
    pub max_months: u32,
    pub metrics: PlayabilityMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayabilityAggregate {
    pub scenario_name: String,
    pub role: RoleId,
    pub strategy: String,
    pub iterations: usize,
    pub mean_months: f64,
    pub std_months: f64,
    pub funds_failure_pct: f64,
    pub energy_failure_pct: f64,
    pub survived_pct: f64,
    pub mean_final_money: f64,
    pub mean_optional_spend: f64,
}

/// Which roles, strategies, and seeds a playability sweep covers.
#[derive(Debug, Clone)]
pub struct PlayabilitySweep<'a> {
    pub roles: &'a [RoleId],
    pub strategies: &'a [GameplayStrategy],
    pub seeds: &'a [SeedInfo],
    pub iterations: usize,
    pub max_months: u32,
}

/// Play every role × strategy combination for each seed and iteration.
///
/// # Errors
///
/// Returns an error if any run cannot be played.
pub fn run_playability_analysis(
    tester: &GameTester,
    sweep: &PlayabilitySweep<'_>,
) -> Result<Vec<PlayabilityRecord>> {
    let iterations = sweep.iterations.max(1);
    let mut records = Vec::with_capacity(
        sweep.roles.len() * sweep.strategies.len() * sweep.seeds.len() * iterations,
    );

    for &role in sweep.roles {
        for &strategy in sweep.strategies {
            for seed in sweep.seeds {
                for iteration in 0..iterations {
                    let iteration_offset = u64::try_from(iteration).unwrap_or(0);
                    let iteration_seed = seed.seed.wrapping_add(iteration_offset);
                    let plan =
                        SimulationPlan::new(role, strategy).with_max_months(sweep.max_months);
                    let summary = tester.run_plan(&plan, iteration_seed).with_context(|| {
                        format!(
                            "Playability run failed for role {role}, strategy {strategy}, seed {} (iteration {})",
                            seed.display(),
                            iteration + 1
                        )
                    })?;

                    records.push(PlayabilityRecord {
                        scenario_name: scenario_label(role, strategy),
                        role,
                        strategy,
                        seed_label: seed.display(),
                        seed_value: iteration_seed,
                        max_months: sweep.max_months,
                        metrics: summary.metrics,
                    });
                }
            }
        }
    }

    Ok(records)
}

#[must_use]
pub fn aggregate_playability(records: &[PlayabilityRecord]) -> Vec<PlayabilityAggregate> {
    let mut aggregates: BTreeMap<(RoleId, GameplayStrategy), AggregateBuilder> = BTreeMap::new();

    for record in records {
        aggregates
            .entry((record.role, record.strategy))
            .or_insert_with(|| AggregateBuilder::new(record))
            .ingest(&record.metrics);
    }

    aggregates
        .into_values()
        .map(AggregateBuilder::finish)
        .collect()
}

/// Check the invariants every finished run must satisfy.
///
/// # Errors
///
/// Returns the first record that violates one.
pub fn validate_playability_targets(records: &[PlayabilityRecord]) -> Result<()> {
    for record in records {
        let metrics = &record.metrics;
        let context = || format!("{} seed {}", record.scenario_name, record.seed_label);
        ensure!(
            metrics.months_survived <= record.max_months,
            "{}: survived {} months past the cap of {}",
            context(),
            metrics.months_survived,
            record.max_months
        );
        ensure!(
            (MIN_ENERGY..=MAX_ENERGY).contains(&metrics.final_energy),
            "{}: energy {} left its bounds",
            context(),
            metrics.final_energy
        );
        ensure!(
            metrics.final_money >= 0,
            "{}: money went negative ({})",
            context(),
            metrics.final_money
        );
        ensure!(
            metrics.ending != Ending::Ongoing || metrics.months_survived == record.max_months,
            "{}: run stopped after {} months without an ending",
            context(),
            metrics.months_survived
        );
    }
    Ok(())
}

fn scenario_label(role: RoleId, strategy: GameplayStrategy) -> String {
    format!("{role} - {strategy}")
}

#[derive(Debug, Clone)]
struct AggregateBuilder {
    scenario_name: String,
    role: RoleId,
    strategy: GameplayStrategy,
    stats_months: RunningStats,
    iterations: u32,
    funds_failures: u32,
    energy_failures: u32,
    survived: u32,
    final_money_sum: f64,
    optional_spend_sum: f64,
}

impl AggregateBuilder {
    fn new(record: &PlayabilityRecord) -> Self {
        Self {
            scenario_name: record.scenario_name.clone(),
            role: record.role,
            strategy: record.strategy,
            stats_months: RunningStats::default(),
            iterations: 0,
            funds_failures: 0,
            energy_failures: 0,
            survived: 0,
            final_money_sum: 0.0,
            optional_spend_sum: 0.0,
        }
    }

    fn ingest(&mut self, metrics: &PlayabilityMetrics) {
        self.iterations += 1;
        self.stats_months.add(f64::from(metrics.months_survived));
        match metrics.ending {
            Ending::InsufficientFunds => self.funds_failures += 1,
            Ending::EnergyDepleted => self.energy_failures += 1,
            Ending::Ongoing => self.survived += 1,
        }
        self.final_money_sum += i64_to_f64(metrics.final_money);
        self.optional_spend_sum += i64_to_f64(metrics.optional_spend);
    }

    fn finish(self) -> PlayabilityAggregate {
        let iterations = usize::try_from(self.iterations).unwrap_or(usize::MAX);
        let denom = f64::from(self.iterations.max(1));
        PlayabilityAggregate {
            scenario_name: self.scenario_name,
            role: self.role,
            strategy: self.strategy.label().to_string(),
            iterations,
            mean_months: self.stats_months.mean(),
            std_months: self.stats_months.std_dev(),
            funds_failure_pct: f64::from(self.funds_failures) / denom,
            energy_failure_pct: f64::from(self.energy_failures) / denom,
            survived_pct: f64::from(self.survived) / denom,
            mean_final_money: self.final_money_sum / denom,
            mean_optional_spend: self.optional_spend_sum / denom,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / f64::from(self.count - 1)
        } else {
            0.0
        }
    }

    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
