//! Read-only content catalog for the Cadence progression engine.
//!
//! The catalog holds every static definition the engine consumes:
//! achievements, missions, quests, training items, monsters, pets,
//! furniture, house levels, shop entries, NPCs and family activities.
//! The player aggregate references these by id only.
//!
//! # Modules
//!
//! - [`builtin`] -- Content shipped with the engine.
//! - [`catalog`] -- The [`Catalog`] container, lookups, YAML loading and
//!   integrity validation.
//! - [`definitions`] -- Definition structs and the data-driven
//!   [`AchievementCondition`] and mission [`ProgressRule`] types.
//! - [`error`] -- Error types for catalog loading.

pub mod builtin;
pub mod catalog;
pub mod definitions;
pub mod error;

// Re-export primary types at crate root.
pub use catalog::Catalog;
pub use definitions::{
    AchievementCondition, AchievementDef, FamilyActivityDef, FurnitureBonus, FurnitureDef,
    HouseLevelDef, KeyItemIds, MissionDef, MissionEventKind, MonsterDef, NpcDef, PetAbility,
    PetDef, PetEvolution, ProgressRule, QuestDef, QuestObjective, Reward, ShopItemDef,
    SpouseBonus, TrainingItemDef,
};
pub use error::CatalogError;
