//! Inflation Chaos Game Engine
//!
//! Platform-agnostic core logic for the Inflation Chaos economic survival game.
//! This crate provides pricing, the monthly economy simulation, and session
//! control without UI or platform-specific dependencies.

pub mod constants;
pub mod data;
pub mod economy;
pub mod error;
pub mod events;
pub mod numbers;
pub mod pricing;
pub mod resources;
pub mod rng;
pub mod roles;
pub mod session;
pub mod state;
pub mod summary;
pub mod view;

// Re-export commonly used types
pub use data::GameConfig;
pub use economy::{EconomySimulator, MonthOutcome, PurchaseOutcome, SkipReason};
pub use error::{CommandError, ConfigError};
pub use events::{EventCatalog, EventEffect, InflationEvent};
pub use pricing::{apply_event, required_expenses};
pub use resources::{Category, PricedResource, Resource, ResourceTable};
pub use rng::{EventSource, ScriptedEventSource, SeededEventSource};
pub use roles::{Role, RoleId, RolesList};
pub use session::{GameSession, summarize};
pub use state::{GameOverReason, GameState, GameStatus, MonthlyRecord};
pub use summary::{Ending, RunSummary, run_summary};
pub use view::{EventLine, GameView, PriceLine};

/// Trait for abstracting configuration loading.
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the role, resource, and event tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables cannot be read or fail validation.
    fn load_config(&self) -> Result<GameConfig, Self::Error>;
}

/// Loads the tables embedded in this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinData;

impl DataLoader for BuiltinData {
    type Error = ConfigError;

    fn load_config(&self) -> Result<GameConfig, Self::Error> {
        GameConfig::builtin()
    }
}

/// Main game engine for starting sessions against one set of tables.
#[derive(Debug, Clone)]
pub struct GameEngine<L: DataLoader> {
    data_loader: L,
    config: GameConfig,
}

impl<L: DataLoader> GameEngine<L> {
    /// Create an engine, loading the tables once up front.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn new(data_loader: L) -> Result<Self, L::Error> {
        let config = data_loader.load_config()?;
        Ok(Self {
            data_loader,
            config,
        })
    }

    /// Roles available for selection, in display order.
    #[must_use]
    pub fn list_roles(&self) -> &[Role] {
        self.config.roles.as_slice()
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn data_loader(&self) -> &L {
        &self.data_loader
    }

    /// Start a session whose event draws derive from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownRole`] if the role is not configured.
    pub fn start_session(&self, role: RoleId, seed: u64) -> Result<GameSession, CommandError> {
        self.start_session_with(role, SeededEventSource::from_user_seed(seed))
    }

    /// Start a session drawing events from an injected source.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownRole`] if the role is not configured.
    pub fn start_session_with<R: EventSource>(
        &self,
        role: RoleId,
        source: R,
    ) -> Result<GameSession<R>, CommandError> {
        GameSession::start(&self.config, role, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl DataLoader for FixtureLoader {
        type Error = Infallible;

        fn load_config(&self) -> Result<GameConfig, Self::Error> {
            let mut config = GameConfig::builtin().unwrap();
            config.roles.0.truncate(2);
            Ok(config)
        }
    }

    #[test]
    fn engine_lists_roles_in_order() {
        let engine = GameEngine::new(BuiltinData).unwrap();
        let ids: Vec<_> = engine.list_roles().iter().map(|r| r.id).collect();
        assert_eq!(ids, RoleId::ALL.to_vec());
    }

    #[test]
    fn seeded_sessions_replay() {
        let engine = GameEngine::new(BuiltinData).unwrap();
        let mut a = engine.start_session(RoleId::BusinessOwner, 0xABCD).unwrap();
        let mut b = engine.start_session(RoleId::BusinessOwner, 0xABCD).unwrap();
        for _ in 0..5 {
            assert_eq!(a.advance_month(), b.advance_month());
        }
        assert_eq!(a.state(), b.state());
        assert_eq!(a.simulator().rng().seed(), 0xABCD);
        assert_eq!(a.simulator().rng().picks(), 6);
    }

    #[test]
    fn custom_loader_limits_roles() {
        let engine = GameEngine::new(FixtureLoader).unwrap();
        assert_eq!(engine.list_roles().len(), 2);
        assert!(matches!(
            engine.start_session_with(RoleId::Government, ScriptedEventSource::repeating(0)),
            Err(CommandError::UnknownRole { .. })
        ));
        let session = engine
            .start_session_with(RoleId::Worker, ScriptedEventSource::repeating(2))
            .unwrap();
        assert_eq!(
            session.state().current_event.as_ref().unwrap().title,
            "Housing Bubble"
        );
    }
}
