//! The persisted player aggregate and every record it owns.
//!
//! [`PlayerAggregate`] is the root of one save file. Records reference
//! catalog definitions by id only. Every struct carries
//! `#[serde(default)]` so saves written by older builds load with missing
//! fields backfilled from the default aggregate.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    ChildNeed, GameMode, Grade, GrowthStage, MusicalItemKind, QuestStatus, RelationshipStatus,
};
use crate::ids::{AchievementId, ActivityId, FurnitureId, ItemId, MissionId, NpcId, PetId, QuestId};

/// Currency a brand-new player starts with.
pub const STARTING_CURRENCY: u64 = 100;

/// Pet food portions a brand-new player starts with.
pub const STARTING_PET_FOOD: u32 = 3;

/// Upper bound of every 0..=100 meter (hunger, happiness, child needs).
pub const METER_MAX: u32 = 100;

// ---------------------------------------------------------------------------
// Root
// ---------------------------------------------------------------------------

/// Root save-state structure for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerAggregate {
    /// Experience, level and currency.
    pub economy: Economy,
    /// Unlocked achievements. Only grows (reset wipes it).
    pub achievements: BTreeSet<AchievementId>,
    /// Lifetime correct answers per game mode and training item.
    pub mastery: BTreeMap<GameMode, BTreeMap<ItemId, u32>>,
    /// Best answer streak per game mode.
    pub highest_streaks: BTreeMap<GameMode, u32>,
    /// Unlocked training content and purchased shop items.
    pub unlocks: Unlocks,
    /// Consumables and key items.
    pub inventory: Inventory,
    /// Owned pets.
    pub pets: PetCollection,
    /// House level, furniture and practice nook state.
    pub house: House,
    /// Currently offered daily and weekly missions.
    pub missions: MissionBoard,
    /// Accepted narrative quests.
    pub quests: Vec<QuestProgress>,
    /// One record per NPC the player has met, created lazily.
    pub relationships: BTreeMap<NpcId, RelationshipRecord>,
    /// Marriage and child state.
    pub family: Family,
    /// Lifetime counters.
    pub stats: LifetimeStats,
    /// Daily login streak.
    pub login: LoginState,
    /// Clock bookkeeping for ticks and day boundaries.
    pub timeline: Timeline,
}

impl PlayerAggregate {
    /// Lifetime correct answers for one item in one mode.
    pub fn mastery_count(&self, mode: GameMode, item: &ItemId) -> u32 {
        self.mastery
            .get(&mode)
            .and_then(|items| items.get(item))
            .copied()
            .unwrap_or(0)
    }

    /// Lifetime correct answers for one item summed across every mode.
    pub fn mastery_total(&self, item: &ItemId) -> u64 {
        self.mastery
            .values()
            .filter_map(|items| items.get(item))
            .map(|count| u64::from(*count))
            .sum()
    }

    /// Best recorded streak in a mode.
    pub fn highest_streak(&self, mode: GameMode) -> u32 {
        self.highest_streaks.get(&mode).copied().unwrap_or(0)
    }

    /// The relationship record for an NPC, if one exists yet.
    pub fn relationship(&self, npc: &NpcId) -> Option<&RelationshipRecord> {
        self.relationships.get(npc)
    }

    /// The relationship record for an NPC, created on first contact.
    pub fn relationship_mut(&mut self, npc: &NpcId) -> &mut RelationshipRecord {
        self.relationships
            .entry(npc.clone())
            .or_insert_with(|| RelationshipRecord::new(npc.clone()))
    }

    /// The quest progress record for a quest, if it was started.
    pub fn quest(&self, id: &QuestId) -> Option<&QuestProgress> {
        self.quests.iter().find(|q| &q.quest_id == id)
    }

    /// Mutable quest progress record for a quest, if it was started.
    pub fn quest_mut(&mut self, id: &QuestId) -> Option<&mut QuestProgress> {
        self.quests.iter_mut().find(|q| &q.quest_id == id)
    }

    /// The instance of the active pet, if any.
    pub fn active_pet(&self) -> Option<&PetInstance> {
        self.pets
            .active
            .as_ref()
            .and_then(|id| self.pets.instances.get(id))
    }

    /// Mutable instance of the active pet, if any.
    pub fn active_pet_mut(&mut self) -> Option<&mut PetInstance> {
        let id = self.pets.active.clone()?;
        self.pets.instances.get_mut(&id)
    }

    /// Count of every unlocked training item and purchased shop item.
    pub fn unlocked_item_count(&self) -> usize {
        self.unlocks
            .advanced_items
            .len()
            .saturating_add(self.unlocks.purchased_items.len())
    }
}

// ---------------------------------------------------------------------------
// Economy & unlocks
// ---------------------------------------------------------------------------

/// Player experience, level and currency.
///
/// Invariant: `level` always equals the level computed from `xp` by the
/// leveling table in use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct Economy {
    /// Lifetime experience points.
    pub xp: u64,
    /// Current player level (1-based).
    pub level: u32,
    /// Spendable currency. Never negative.
    pub currency: u64,
    /// Every coin ever earned, for "earn X total" achievements.
    pub total_currency_earned: u64,
}

impl Default for Economy {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            currency: STARTING_CURRENCY,
            total_currency_earned: 0,
        }
    }
}

/// Reference to an unlocked piece of advanced training content.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct UnlockRef {
    /// Content kind.
    pub kind: MusicalItemKind,
    /// Content identifier.
    pub id: ItemId,
}

/// Unlocked training content and one-off shop purchases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct Unlocks {
    /// Advanced intervals, chords and scales bought with currency.
    pub advanced_items: BTreeSet<UnlockRef>,
    /// Unique shop items bought (furniture, key items).
    pub purchased_items: BTreeSet<ItemId>,
}

/// Consumables and key items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct Inventory {
    /// Pet food portions.
    pub pet_food: u32,
    /// Child care kits (cure sickness).
    pub care_kits: u32,
    /// Unique key items such as the locket or the wedding ring.
    pub key_items: BTreeSet<ItemId>,
    /// Giftable items and their counts.
    pub gifts: BTreeMap<ItemId, u32>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            pet_food: STARTING_PET_FOOD,
            care_kits: 0,
            key_items: BTreeSet::new(),
            gifts: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

/// The player's pets.
///
/// Invariant: `active` is either `None` or a member of `owned`, and
/// `instances` has exactly one entry per owned pet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct PetCollection {
    /// Owned pet definitions (evolved forms replace their base form).
    pub owned: BTreeSet<PetId>,
    /// The pet currently following the player.
    pub active: Option<PetId>,
    /// Mutable state per owned pet.
    pub instances: BTreeMap<PetId, PetInstance>,
}

/// Mutable state of one owned pet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct PetInstance {
    /// Catalog definition this instance belongs to.
    pub pet_id: PetId,
    /// Name chosen by the player (defaults to the catalog name).
    pub display_name: String,
    /// Fullness, 0..=100.
    pub hunger: u32,
    /// Mood, 0..=100.
    pub happiness: u32,
    /// Experience toward the next level.
    pub xp: u64,
    /// Pet level, 1..=10.
    pub level: u32,
    /// Whether this instance is an evolved form.
    pub evolved: bool,
    /// Last time the pet was fed.
    pub last_fed: Option<DateTime<Utc>>,
    /// Last time the player played with the pet.
    pub last_played: Option<DateTime<Utc>>,
    /// Boredom clock: advanced by play and by consumed boredom windows.
    pub last_interaction: DateTime<Utc>,
    /// Hunger clock: advanced by consumed whole hours.
    pub last_decay: DateTime<Utc>,
    /// Last time a special request was spawned.
    pub last_request_at: Option<DateTime<Utc>>,
    /// Cosmetic slots (collar, hat, ...).
    pub customization: BTreeMap<String, String>,
    /// Outstanding or recently fulfilled special request.
    pub special_request: Option<SpecialRequest>,
    /// Lifetime feed and play interactions.
    pub lifetime_interactions: u64,
}

/// A pet micro-quest asking the player to train a specific item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct SpecialRequest {
    /// Mode the item must be answered in.
    pub mode: GameMode,
    /// Training item requested.
    pub item_id: ItemId,
    /// When the request appeared.
    pub requested_at: DateTime<Utc>,
    /// When the request was fulfilled, if it was.
    pub fulfilled_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// House
// ---------------------------------------------------------------------------

/// The player's house.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct House {
    /// House level, 0..=3.
    pub level: u32,
    /// Owned furniture.
    pub furniture: BTreeSet<FurnitureId>,
    /// Last practice nook activation.
    pub practice_nook_last_used: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Missions & quests
// ---------------------------------------------------------------------------

/// Missions currently on offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct MissionBoard {
    /// Active daily and weekly missions.
    pub active: Vec<MissionProgress>,
    /// Local calendar day of the last daily refresh.
    pub last_daily_refresh: Option<NaiveDate>,
    /// Local calendar day of the last weekly refresh.
    pub last_weekly_refresh: Option<NaiveDate>,
}

impl MissionBoard {
    /// The progress record of an active mission.
    pub fn get(&self, id: &MissionId) -> Option<&MissionProgress> {
        self.active.iter().find(|m| &m.mission_id == id)
    }

    /// Mutable progress record of an active mission.
    pub fn get_mut(&mut self, id: &MissionId) -> Option<&mut MissionProgress> {
        self.active.iter_mut().find(|m| &m.mission_id == id)
    }
}

/// Progress on one offered mission.
///
/// Invariant: `progress <= target`; `completed` flips to true once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct MissionProgress {
    /// Catalog definition.
    pub mission_id: MissionId,
    /// Counted or max-valued progress, clamped to `target`.
    pub progress: u32,
    /// Target copied from the definition when the mission was drawn.
    pub target: u32,
    /// Whether the target was reached.
    pub completed: bool,
    /// Whether the reward was claimed.
    pub claimed: bool,
}

/// Progress on an accepted narrative quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct QuestProgress {
    /// Catalog definition.
    pub quest_id: QuestId,
    /// Lifecycle state.
    pub status: QuestStatus,
    /// Completion flag per catalog objective, aligned by index.
    pub objectives: Vec<bool>,
}

impl Default for QuestProgress {
    fn default() -> Self {
        Self {
            quest_id: QuestId::default(),
            status: QuestStatus::Active,
            objectives: Vec::new(),
        }
    }
}

impl QuestProgress {
    /// Whether every objective is marked done.
    pub fn all_objectives_done(&self) -> bool {
        self.objectives.iter().all(|done| *done)
    }
}

// ---------------------------------------------------------------------------
// Relationships & family
// ---------------------------------------------------------------------------

/// Relationship with one NPC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct RelationshipRecord {
    /// The NPC.
    pub npc_id: NpcId,
    /// Relationship points toward the next tier.
    pub rp: u32,
    /// Current tier.
    pub status: RelationshipStatus,
    /// Last interaction or gift that raised RP.
    pub last_positive_interaction: Option<DateTime<Utc>>,
    /// Local calendar day of the last RP-granting interaction.
    pub last_daily_interaction: Option<NaiveDate>,
    /// One-shot story flags (e.g. a heart event was shown).
    pub event_flags: BTreeSet<String>,
}

impl RelationshipRecord {
    /// A fresh neutral record.
    pub fn new(npc_id: NpcId) -> Self {
        Self {
            npc_id,
            ..Self::default()
        }
    }
}

/// Marriage and child state.
///
/// Invariant: `spouse.is_some() == is_married`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct Family {
    /// Whether the player is married.
    pub is_married: bool,
    /// The spouse.
    pub spouse: Option<NpcId>,
    /// Wedding day.
    pub married_on: Option<NaiveDate>,
    /// Marriage happiness, 0..=100.
    pub marriage_happiness: u32,
    /// Set when happiness fell below the heartsick threshold; disables
    /// the spouse bonus until happiness recovers.
    pub heartsick: bool,
    /// Local calendar day of the last spouse interaction.
    pub last_spouse_interaction: Option<NaiveDate>,
    /// Last day each family activity was performed.
    pub activity_log: BTreeMap<ActivityId, NaiveDate>,
    /// The child, once born.
    pub child: Option<ChildRecord>,
}

/// The player's child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct ChildRecord {
    /// Given name.
    pub name: String,
    /// Growth stage.
    pub stage: GrowthStage,
    /// Whole days since birth.
    pub age_days: u32,
    /// Fullness, 0..=100.
    pub hunger: u32,
    /// Cleanliness, 0..=100.
    pub cleanliness: u32,
    /// Affection, 0..=100.
    pub affection: u32,
    /// Overall happiness, 0..=100.
    pub happiness: u32,
    /// Tiredness, 0..=100 (rises over time).
    pub sleepiness: u32,
    /// Whether the child is sick.
    pub is_sick: bool,
    /// Whole days spent sick so far.
    pub sick_days: u32,
    /// Needs waiting for the matching care action.
    pub pending_needs: BTreeSet<ChildNeed>,
    /// Academic grade (school age only).
    pub grade: Option<Grade>,
    /// Study points toward the next grade.
    pub study_points: u32,
    /// Local calendar day homework was last done.
    pub last_homework: Option<NaiveDate>,
    /// Days since homework was last done (school age only).
    pub days_since_homework: u32,
    /// Consecutive days that ended with low happiness.
    pub low_happiness_streak: u32,
    /// Local calendar day tuition was last paid.
    pub last_tuition: Option<NaiveDate>,
    /// Hourly decay clock: advanced by consumed whole hours.
    pub last_checked: DateTime<Utc>,
}

impl Default for ChildRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            stage: GrowthStage::Infant,
            age_days: 0,
            hunger: METER_MAX,
            cleanliness: METER_MAX,
            affection: METER_MAX,
            happiness: METER_MAX,
            sleepiness: 0,
            is_sick: false,
            sick_days: 0,
            pending_needs: BTreeSet::new(),
            grade: None,
            study_points: 0,
            last_homework: None,
            days_since_homework: 0,
            low_happiness_streak: 0,
            last_tuition: None,
            last_checked: DateTime::<Utc>::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Bookkeeping
// ---------------------------------------------------------------------------

/// Lifetime counters used by achievements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct LifetimeStats {
    /// Correct training answers.
    pub correct_answers: u64,
    /// Arena monsters defeated.
    pub monsters_defeated: u64,
    /// Feed and play interactions across all pets.
    pub pet_interactions: u64,
    /// Gifts given to NPCs.
    pub gifts_given: u64,
    /// Busking performances.
    pub busking_performances: u64,
    /// Mission rewards claimed.
    pub missions_claimed: u64,
    /// Quest rewards claimed.
    pub quests_claimed: u64,
    /// Practice nook activations.
    pub practice_nook_uses: u64,
    /// Pet evolutions.
    pub pets_evolved: u64,
}

/// Daily login streak.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct LoginState {
    /// Local calendar day of the last claimed login reward.
    pub last_login: Option<NaiveDate>,
    /// Consecutive days with a claimed login reward.
    pub streak: u32,
}

/// Clock bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct Timeline {
    /// Last periodic tick.
    pub last_tick: Option<DateTime<Utc>>,
    /// Last local calendar day whose day-boundary rules ran.
    pub last_day_processed: Option<NaiveDate>,
    /// Last busking performance.
    pub last_busking: Option<DateTime<Utc>>,
}
