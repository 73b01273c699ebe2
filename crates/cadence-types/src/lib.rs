//! Shared type definitions for the Cadence progression engine.
//!
//! This crate is the single source of truth for all types used across the
//! Cadence workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the game UI.
//!
//! # Modules
//!
//! - [`ids`] -- Stable catalog keys and notification ids
//! - [`enums`] -- Closed sets (modes, tiers, stages, rejection reasons)
//! - [`structs`] -- The persisted [`PlayerAggregate`] and its records
//! - [`commands`] -- Command surface and command outcomes
//! - [`notifications`] -- Notifications emitted by accepted commands

pub mod commands;
pub mod enums;
pub mod ids;
pub mod notifications;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use commands::{Command, CommandOutcome, TrainingContext};
pub use enums::{
    ChildNeed, GameMode, GiftPreference, Grade, GrowthStage, MissionFrequency, MultiplierKind,
    MusicalItemKind, NotificationKind, PetStat, QuestStatus, RejectionReason, RelationshipStatus,
    ShopItemKind,
};
pub use ids::{
    AchievementId, ActivityId, FurnitureId, ItemId, MissionId, MonsterId, NotificationId, NpcId,
    PetId, QuestId,
};
pub use notifications::{Notification, NotificationPayload};
pub use structs::{
    ChildRecord, Economy, Family, House, Inventory, LifetimeStats, LoginState, METER_MAX,
    MissionBoard, MissionProgress, PetCollection, PetInstance, PlayerAggregate, QuestProgress,
    RelationshipRecord, STARTING_CURRENCY, STARTING_PET_FOOD, SpecialRequest, Timeline, UnlockRef,
    Unlocks,
};
