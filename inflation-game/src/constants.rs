//! Centralized balance constants for the Inflation Chaos simulation.
//!
//! Role, resource, and event tables are data; the values here are part of
//! the rules themselves and only change through code review.

/// Upper bound for the energy meter.
pub const MAX_ENERGY: i32 = 1_000;
/// Lower bound for the energy meter.
pub const MIN_ENERGY: i32 = 0;
/// Energy every session starts with, independent of role.
pub const STARTING_ENERGY: i32 = 1_000;
/// First month of a fresh session.
pub const FIRST_MONTH: u32 = 1;

/// Domain tag used to derive the event-draw stream from a user seed.
pub(crate) const EVENT_STREAM_TAG: &[u8] = b"inflation-events";

// Headlines -----------------------------------------------------------------
pub const HEADLINE_INSUFFICIENT_FUNDS: &str = "You can no longer afford basic necessities!";
pub const HEADLINE_ENERGY_DEPLETED: &str = "Your energy has been depleted!";
pub const HEADLINE_ONGOING: &str = "Still making ends meet.";
