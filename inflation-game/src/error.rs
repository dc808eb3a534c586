//! Rejected commands and configuration failures.

use thiserror::Error;

use crate::roles::RoleId;
use crate::state::GameOverReason;

/// A command the session refused. State is never mutated when one of these
/// is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("no resource with id `{id}`")]
    UnknownResource { id: String },
    #[error("`{id}` is a required expense and cannot be bought separately")]
    NotOptional { id: String },
    #[error("the game is over ({reason}); start a new session")]
    GameOver { reason: GameOverReason },
    #[error("the session is still active; a reset is only offered after game over")]
    SessionActive,
    #[error("role `{role}` is not in the configured role table")]
    UnknownRole { role: RoleId },
}

/// Errors raised when configuration tables violate their invariants.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("at least one inflation event is required")]
    NoEvents,
    #[error("at least one resource is required")]
    NoResources,
    #[error("resource id `{id}` appears more than once")]
    DuplicateResource { id: String },
    #[error("resource `{id}` must have a positive base price (got {price})")]
    NonPositivePrice { id: String, price: i64 },
    #[error("resource `{id}` must have a positive energy boost (got {boost})")]
    NonPositiveBoost { id: String, boost: i32 },
    #[error("event `{event}` has an invalid multiplier {multiplier}")]
    InvalidMultiplier { event: String, multiplier: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = CommandError::UnknownResource {
            id: "yacht".to_string(),
        };
        assert!(err.to_string().contains("yacht"));

        let err = CommandError::GameOver {
            reason: GameOverReason::EnergyDepleted,
        };
        assert!(err.to_string().contains("energy depleted"));

        let err = ConfigError::InvalidMultiplier {
            event: "Oil Crisis".to_string(),
            multiplier: -1.0,
        };
        assert!(err.to_string().contains("Oil Crisis"));
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConfigError = parse.into();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
