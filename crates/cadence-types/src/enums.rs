//! Enumeration types for the Cadence progression engine.
//!
//! Every closed set the engine reasons about lives here so the UI
//! collaborator receives the same variants through the generated
//! `TypeScript` bindings.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

/// A training game mode reported by the UI with every answer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum GameMode {
    /// Identify the interval between two tones.
    #[default]
    Intervals,
    /// Identify chord qualities.
    Chords,
    /// Identify scales and modes.
    Scales,
    /// Sing back or transcribe short melodies.
    Melodies,
    /// Monster battles driven by training answers.
    Arena,
}

/// Kind of unlockable training content.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum MusicalItemKind {
    /// An interval (e.g. a major third).
    #[default]
    Interval,
    /// A chord quality (e.g. a dominant seventh).
    Chord,
    /// A scale or mode.
    Scale,
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

/// A cross-cutting economy multiplier resolved from house, furniture, pet
/// and spouse bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum MultiplierKind {
    /// Experience earned from training answers.
    XpGainTraining,
    /// Currency earned from training answers.
    CurrencyGainTraining,
    /// Discount applied to unlock and shop prices.
    UnlockCostDiscount,
    /// Experience earned by the active pet.
    PetXpGain,
    /// Daily login reward size.
    DailyLoginBonus,
    /// Reduction of the practice nook cooldown.
    PracticeNookCooldownReduction,
}

impl MultiplierKind {
    /// Whether this kind shrinks a base value (discount) rather than
    /// growing it (gain).
    pub const fn is_discount(self) -> bool {
        matches!(
            self,
            Self::UnlockCostDiscount | Self::PracticeNookCooldownReduction
        )
    }
}

/// Category of a purchasable shop item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ShopItemKind {
    /// A pack of pet food portions.
    PetFood,
    /// A child care kit (cures sickness).
    ChildCareKit,
    /// A unique key item such as the locket or the wedding ring.
    KeyItem,
    /// A giftable item for NPCs.
    Gift,
    /// A piece of furniture for the house.
    Furniture,
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

/// A pet meter that missions can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PetStat {
    /// Fullness (100 = fully fed).
    Hunger,
    /// Mood (100 = delighted).
    Happiness,
    /// Pet level.
    Level,
}

// ---------------------------------------------------------------------------
// Relationships & family
// ---------------------------------------------------------------------------

/// Relationship tier with a romanceable NPC.
///
/// Ordered so that `Neutral < Friendly < Dating < Married`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum RelationshipStatus {
    /// No meaningful relationship yet.
    #[default]
    Neutral,
    /// Friends; eligible for confession once RP is maxed.
    Friendly,
    /// Dating after a successful confession.
    Dating,
    /// Married after a successful proposal.
    Married,
}

/// How much an NPC likes a gifted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum GiftPreference {
    /// Favourite item.
    Loved,
    /// Pleasant item.
    Liked,
    /// Indifferent.
    Neutral,
    /// Unwanted item (negative RP).
    Disliked,
}

/// Growth stage of the child, ordered from youngest to oldest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum GrowthStage {
    /// Newborn.
    #[default]
    Infant,
    /// Crawling baby.
    Crawler,
    /// Walking toddler.
    Toddler,
    /// Attends school; academic grade is tracked.
    SchoolAge,
}

/// A child need that can be pending until the matching care action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ChildNeed {
    /// Needs feeding.
    Hunger,
    /// Needs a diaper change or bath.
    Cleanliness,
    /// Needs attention.
    Affection,
    /// Needs cheering up.
    Happiness,
    /// Needs to be soothed to sleep.
    Sleep,
}

/// Academic letter grade, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Grade {
    /// Failing.
    F,
    /// Poor.
    D,
    /// Average.
    C,
    /// Good.
    B,
    /// Excellent.
    A,
}

impl Grade {
    /// The next better grade, saturating at `A`.
    pub const fn improved(self) -> Self {
        match self {
            Self::F => Self::D,
            Self::D => Self::C,
            Self::C => Self::B,
            Self::B | Self::A => Self::A,
        }
    }

    /// The next worse grade, saturating at `F`.
    pub const fn degraded(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::C,
            Self::C => Self::D,
            Self::D | Self::F => Self::F,
        }
    }
}

// ---------------------------------------------------------------------------
// Missions & quests
// ---------------------------------------------------------------------------

/// How often a mission definition is rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum MissionFrequency {
    /// Refreshed on the first command of every calendar day.
    Daily,
    /// Refreshed on the first command of every ISO week.
    Weekly,
}

/// Lifecycle of an accepted quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum QuestStatus {
    /// Objectives are still open.
    Active,
    /// Every objective is done; rewards await claiming.
    Completed,
    /// Rewards have been granted.
    Claimed,
}

// ---------------------------------------------------------------------------
// Notifications & rejections
// ---------------------------------------------------------------------------

/// Closed set of notification kinds produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum NotificationKind {
    /// The player reached a new level.
    LevelUp,
    /// An achievement was unlocked.
    AchievementUnlocked,
    /// A mission reached its target.
    MissionCompleted,
    /// A mission reward was claimed.
    MissionRewardClaimed,
    /// A pet gained a level.
    PetLevelUp,
    /// A pet evolved into a new form.
    PetEvolution,
    /// A pet asked for a specific training item.
    PetSpecialRequest,
    /// A relationship tier, marriage or family state changed.
    RelationshipChanged,
    /// A quest was started, progressed, completed or claimed.
    QuestEvent,
    /// A monster was defeated in the arena.
    MonsterDefeated,
    /// General information.
    Info,
    /// A fault the player should know about (e.g. a reset save).
    Error,
}

/// Why a command was declined.
///
/// Every declined command leaves the aggregate untouched. Only
/// [`RejectionReason::MissingDefinition`] indicates an integrity fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RejectionReason {
    /// Not enough currency.
    InsufficientFunds,
    /// Not enough food, care kits, gifts or other consumables.
    InsufficientResource,
    /// The action is on cooldown.
    CooldownActive,
    /// The item or pet is already owned (idempotent no-op).
    AlreadyOwned,
    /// The unlock or daily reward was already taken (idempotent no-op).
    AlreadyUnlocked,
    /// The requested state machine transition is not allowed from here.
    InvalidStateTransition,
    /// A level, house level, key item or similar gate is not satisfied.
    PreconditionNotMet,
    /// A catalog lookup failed (internal integrity fault).
    MissingDefinition,
}
