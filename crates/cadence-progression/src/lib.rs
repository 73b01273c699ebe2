//! Subsystem logic for the Cadence progression engine.
//!
//! This crate contains every rule that operates on a
//! [`PlayerAggregate`](cadence_types::PlayerAggregate) without touching I/O.
//! It sits between `cadence-types` (the data structures) and `cadence-core`
//! (the store, command pipeline and persistence).
//!
//! Subsystems never call each other's mutators. Each operation receives an
//! [`Env`] (catalog, tunables, current time) and an [`Effects`] accumulator;
//! cross-cutting consequences such as mission progress travel as
//! [`MissionEvent`]s that the command pipeline routes afterwards.
//!
//! # Modules
//!
//! - [`achievements`] -- Condition evaluation and one-shot unlocks
//! - [`config`] -- Tunable constants ([`ProgressionConfig`])
//! - [`economy`] -- Currency and the multiplier resolver ([`Multiplier`])
//! - [`effects`] -- Notification and event accumulator ([`Effects`])
//! - [`env`] -- Calendar helpers in the player's UTC offset ([`Env`])
//! - [`error`] -- Rejections and faults ([`ProgressionError`])
//! - [`family`] -- Child simulation, care actions and family activities
//! - [`leveling`] -- XP thresholds and level-ups ([`LevelChange`])
//! - [`missions`] -- Daily/weekly mission refresh, progress and claims
//! - [`pets`] -- Adoption, care, pet XP, evolution and special requests
//! - [`quests`] -- Narrative quest lifecycle
//! - [`relationships`] -- NPC relationship points, romance, marriage and decay

pub mod achievements;
pub mod config;
pub mod economy;
pub mod effects;
pub mod env;
pub mod error;
pub mod family;
pub mod leveling;
pub mod missions;
pub mod pets;
pub mod quests;
pub mod relationships;

// Re-export primary types at crate root for convenience.
pub use config::{
    EconomyConfig, FamilyConfig, MissionConfig, PetConfig, ProgressionConfig, RelationshipConfig,
};
pub use economy::{Multiplier, earn_currency, resolve, spend_currency};
pub use effects::{Effects, MissionEvent};
pub use env::{Env, SECS_PER_HOUR};
pub use error::ProgressionError;
pub use family::ActivityOutcome;
pub use leveling::{LevelChange, apply_xp, level_for, xp_to_next_level};
