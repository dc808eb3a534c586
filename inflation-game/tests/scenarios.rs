use inflation_game::resources::Category;
use inflation_game::{
    CommandError, EconomySimulator, GameConfig, GameSession, GameState, MonthOutcome,
    MonthlyRecord, Resource, RoleId, ScriptedEventSource,
};

const OIL_CRISIS: usize = 0;

fn builtin() -> GameConfig {
    GameConfig::builtin().expect("builtin tables load")
}

/// Builtin tables plus a commuting expense, bringing the worker's bill to 1438.
fn commuter_tables() -> GameConfig {
    let mut config = builtin();
    config.resources.0.insert(
        5,
        Resource {
            id: "transport".to_string(),
            name: "Transport".to_string(),
            base_price: 190,
            is_required: true,
            category: Category::Utilities,
            energy_boost: None,
        },
    );
    config.validate().expect("fixture is valid");
    config
}

fn undrawn_worker(config: &GameConfig) -> EconomySimulator<ScriptedEventSource> {
    let role = config.role(RoleId::Worker).expect("worker").clone();
    let state = GameState::new(&role, &config.resources);
    EconomySimulator::from_state(
        role,
        state,
        config.events.clone(),
        ScriptedEventSource::repeating(OIL_CRISIS),
    )
}

#[test]
fn worker_first_month_under_oil_crisis() {
    let config = commuter_tables();
    let mut sim = undrawn_worker(&config);
    assert_eq!(sim.state().money, 5000);
    assert_eq!(sim.state().energy, 1000);
    assert_eq!(sim.state().required_expenses(), 1438);

    let outcome = sim.advance_month().unwrap();
    assert_eq!(
        outcome,
        MonthOutcome::Advanced(MonthlyRecord {
            month: 1,
            costs: 1438,
            income: 3000,
        })
    );

    let state = sim.state();
    assert_eq!(state.month, 2);
    assert_eq!(state.money, 6566);
    assert_eq!(state.energy, 900);
    assert_eq!(state.required_expenses(), 1726);
    assert_eq!(state.current_event.as_ref().unwrap().title, "Oil Crisis");
    assert!(state.prices.iter().all(|r| r.percentage_change == 20));
}

#[test]
fn worker_first_month_with_builtin_tables() {
    let config = builtin();
    let mut sim = undrawn_worker(&config);
    assert_eq!(sim.state().required_expenses(), 1248);

    sim.advance_month().unwrap();
    let state = sim.state();
    assert_eq!(state.money, 6752);
    assert_eq!(state.energy, 900);
    assert_eq!(state.required_expenses(), 1498);
    let rent = state.find_price("rent").unwrap();
    assert_eq!((rent.previous_price, rent.price), (1000, 1200));
}

#[test]
fn game_over_freezes_the_session() {
    let config = builtin();
    let mut session =
        GameSession::start(&config, RoleId::Worker, ScriptedEventSource::repeating(OIL_CRISIS))
            .unwrap();
    let reason = loop {
        if let MonthOutcome::GameOver(reason) = session.advance_month().unwrap() {
            break reason;
        }
    };
    let frozen = session.state().clone();
    assert_eq!(
        session.advance_month(),
        Err(CommandError::GameOver { reason })
    );
    assert_eq!(
        session.purchase_optional("clothing"),
        Err(CommandError::GameOver { reason })
    );
    assert_eq!(session.state(), &frozen);
    assert_eq!(
        session.view().headline(),
        Some(reason.headline())
    );
}
