//! Static content definitions.
//!
//! Every definition is plain data, deserializable from the catalog YAML
//! file. Save data references these by id only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cadence_types::{
    AchievementId, ActivityId, FurnitureId, GameMode, GiftPreference, GrowthStage, ItemId,
    MissionFrequency, MissionId, MonsterId, MultiplierKind, MusicalItemKind, NpcId, PetId,
    PetStat, QuestId, RelationshipStatus, ShopItemKind,
};

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

/// One achievement and the rule that unlocks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDef {
    /// Stable id.
    pub id: AchievementId,
    /// Display name carried into the unlock notification.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Unlock rule, evaluated after every accepted command.
    pub condition: AchievementCondition,
}

/// Data-driven unlock rule for an achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AchievementCondition {
    /// Player level at least `level`.
    ReachLevel {
        /// Required level.
        level: u32,
    },
    /// Currency currently held at least `amount`.
    CurrencyHeld {
        /// Required balance.
        amount: u64,
    },
    /// Lifetime currency earned at least `amount`.
    TotalCurrencyEarned {
        /// Required lifetime earnings.
        amount: u64,
    },
    /// Correct answers for one item, in one mode or across all modes.
    Mastery {
        /// Training item.
        item_id: ItemId,
        /// Restrict to one mode.
        #[serde(default)]
        mode: Option<GameMode>,
        /// Required correct answers.
        count: u32,
    },
    /// Lifetime correct answers at least `count`.
    CorrectAnswers {
        /// Required correct answers.
        count: u64,
    },
    /// Best streak in one mode, or in any mode.
    Streak {
        /// Restrict to one mode.
        #[serde(default)]
        mode: Option<GameMode>,
        /// Required streak length.
        length: u32,
    },
    /// Number of owned pets.
    PetsOwned {
        /// Required count.
        count: u32,
    },
    /// Any owned pet at or above `level`.
    PetLevel {
        /// Required level.
        level: u32,
    },
    /// Any owned pet is an evolved form.
    PetEvolved,
    /// Lifetime pet interactions.
    PetInteractions {
        /// Required count.
        count: u64,
    },
    /// House level at least `level`.
    HouseLevel {
        /// Required level.
        level: u32,
    },
    /// Number of owned furniture pieces.
    FurnitureOwned {
        /// Required count.
        count: u32,
    },
    /// The player is married.
    Married,
    /// Some NPC (or a specific one) has reached `status`.
    Relationship {
        /// Required tier.
        status: RelationshipStatus,
        /// Restrict to one NPC.
        #[serde(default)]
        npc_id: Option<NpcId>,
    },
    /// The player has a child.
    HasChild,
    /// The child reached `stage`.
    ChildStage {
        /// Required growth stage.
        stage: GrowthStage,
    },
    /// Lifetime mission claims.
    MissionsClaimed {
        /// Required count.
        count: u64,
    },
    /// Lifetime quest claims.
    QuestsClaimed {
        /// Required count.
        count: u64,
    },
    /// Lifetime monsters defeated.
    MonstersDefeated {
        /// Required count.
        count: u64,
    },
    /// Lifetime busking performances.
    BuskingPerformances {
        /// Required count.
        count: u64,
    },
    /// Unlocked training items plus unique shop purchases.
    UnlockedItems {
        /// Required count.
        count: u32,
    },
    /// Daily login streak.
    LoginStreak {
        /// Required consecutive days.
        days: u32,
    },
}

// ---------------------------------------------------------------------------
// Missions & quests
// ---------------------------------------------------------------------------

/// Event stream a mission counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionEventKind {
    /// A correct training answer.
    CorrectAnswer,
    /// XP earned (counts the amount).
    EarnXp,
    /// Currency delta (counts positive amounts only).
    EarnCurrency,
    /// An arena monster defeated.
    DefeatMonster,
    /// The active pet was fed.
    FeedPet,
    /// The player played with the active pet.
    PlayWithPet,
    /// An RP-granting NPC interaction.
    InteractNpc,
    /// A gift given to an NPC.
    GiveGift,
    /// A busking performance.
    Busking,
    /// A training item unlocked.
    UnlockItem,
    /// A shop item bought.
    PurchaseItem,
    /// A child care action.
    CareForChild,
    /// A quest claimed.
    CompleteQuest,
    /// Best streak reached (max-valued).
    ReachStreak,
    /// A pet meter reached a value (max-valued).
    PetStat,
}

impl MissionEventKind {
    /// Max-valued events set progress to the best value seen instead of
    /// adding to it.
    pub const fn is_max_valued(self) -> bool {
        matches!(self, Self::ReachStreak | Self::PetStat)
    }
}

/// Which events a mission counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRule {
    /// Event stream.
    pub event: MissionEventKind,
    /// Only count this training item.
    #[serde(default)]
    pub item_id: Option<ItemId>,
    /// Only count this mode.
    #[serde(default)]
    pub mode: Option<GameMode>,
    /// Only count this monster.
    #[serde(default)]
    pub monster_id: Option<MonsterId>,
    /// Pet meter for [`MissionEventKind::PetStat`].
    #[serde(default)]
    pub pet_stat: Option<PetStat>,
}

/// Reward bundle for missions and quests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reward {
    /// Currency granted.
    pub currency: u64,
    /// Player XP granted.
    pub xp: u64,
    /// XP granted to the active pet.
    pub pet_xp: u64,
}

/// A daily or weekly mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionDef {
    /// Stable id.
    pub id: MissionId,
    /// Localization key of the title.
    pub title_ref: String,
    /// Rotation frequency.
    pub frequency: MissionFrequency,
    /// Progress needed to complete.
    pub target: u32,
    /// What counts toward progress.
    pub rule: ProgressRule,
    /// Granted on claim.
    pub reward: Reward,
}

/// One step of a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestObjective {
    /// Marked done explicitly by the UI.
    Manual {
        /// Localization key of the description.
        description_ref: String,
    },
    /// Done by an RP-granting interaction with the NPC.
    TalkTo {
        /// NPC to talk to.
        npc_id: NpcId,
    },
    /// Done by defeating the monster.
    DefeatMonster {
        /// Monster to defeat.
        monster_id: MonsterId,
    },
}

/// A narrative quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDef {
    /// Stable id.
    pub id: QuestId,
    /// Display name.
    pub name: String,
    /// Player level required to start.
    #[serde(default)]
    pub min_level: u32,
    /// Quest that must be claimed first.
    #[serde(default)]
    pub prerequisite: Option<QuestId>,
    /// Steps, completable in any order.
    pub objectives: Vec<QuestObjective>,
    /// Granted on claim.
    pub reward: Reward,
}

// ---------------------------------------------------------------------------
// Training & arena
// ---------------------------------------------------------------------------

/// A trainable interval, chord or scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingItemDef {
    /// Stable id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Content kind.
    pub kind: MusicalItemKind,
    /// Mode the item is trained in.
    pub mode: GameMode,
    /// Whether the item must be unlocked with currency.
    #[serde(default)]
    pub advanced: bool,
}

/// An arena monster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterDef {
    /// Stable id.
    pub id: MonsterId,
    /// Display name.
    pub name: String,
    /// Currency granted on defeat.
    pub currency: u64,
    /// XP granted on defeat.
    pub xp: u64,
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

/// One-way evolution of a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetEvolution {
    /// Level at which the pet evolves.
    pub level: u32,
    /// Evolved form.
    pub into: PetId,
}

/// Passive multiplier granted while the pet is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetAbility {
    /// Multiplier the ability feeds.
    pub kind: MultiplierKind,
    /// Percent bonus (or discount).
    pub percent: u32,
    /// Pet level the ability activates at.
    #[serde(default = "default_ability_level")]
    pub min_level: u32,
}

const fn default_ability_level() -> u32 {
    1
}

/// A pet species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetDef {
    /// Stable id.
    pub id: PetId,
    /// Default display name.
    pub name: String,
    /// Adoption price before discounts.
    pub cost: u64,
    /// Evolution, if the species evolves.
    #[serde(default)]
    pub evolution: Option<PetEvolution>,
    /// Passive ability while active.
    #[serde(default)]
    pub ability: Option<PetAbility>,
}

// ---------------------------------------------------------------------------
// House & shop
// ---------------------------------------------------------------------------

/// A furniture multiplier bonus.
///
/// `percent` feeds the multiplier factor; `flat` is added to gains or
/// subtracted from discounted prices after rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureBonus {
    /// Multiplier the bonus feeds.
    pub kind: MultiplierKind,
    /// Percent term.
    #[serde(default)]
    pub percent: u32,
    /// Flat term.
    #[serde(default)]
    pub flat: u64,
}

/// A furniture piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureDef {
    /// Stable id.
    pub id: FurnitureId,
    /// Display name.
    pub name: String,
    /// House level needed to place it.
    #[serde(default)]
    pub min_house_level: u32,
    /// Multiplier bonuses while owned.
    #[serde(default)]
    pub bonuses: Vec<FurnitureBonus>,
    /// Extra happiness added when feeding a pet.
    #[serde(default)]
    pub pet_happiness_bonus: u32,
}

/// A house level and its upgrade price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseLevelDef {
    /// House level.
    pub level: u32,
    /// Price to upgrade into this level.
    pub upgrade_cost: u64,
    /// Minimum player level to upgrade into this level.
    #[serde(default)]
    pub min_player_level: u32,
    /// Percent bonuses per multiplier kind.
    #[serde(default)]
    pub bonuses: BTreeMap<MultiplierKind, u32>,
}

/// A shop entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItemDef {
    /// Stable id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Category, which decides the purchase effect.
    pub kind: ShopItemKind,
    /// Price before discounts.
    pub price: u64,
    /// Units granted per purchase (food portions, kits, gifts).
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Furniture granted (furniture entries only).
    #[serde(default)]
    pub furniture_id: Option<FurnitureId>,
}

const fn default_quantity() -> u32 {
    1
}

/// Ids of the items the engine gives special meaning to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyItemIds {
    /// Needed to confess.
    pub locket: ItemId,
    /// Needed to propose.
    pub wedding_ring: ItemId,
    /// Furniture that enables the practice nook.
    pub practice_nook: FurnitureId,
}

impl Default for KeyItemIds {
    fn default() -> Self {
        Self {
            locket: ItemId::from("locket"),
            wedding_ring: ItemId::from("wedding_ring"),
            practice_nook: FurnitureId::from("practice_nook"),
        }
    }
}

// ---------------------------------------------------------------------------
// NPCs & family
// ---------------------------------------------------------------------------

/// Spouse passive bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseBonus {
    /// Multiplier the bonus feeds.
    pub kind: MultiplierKind,
    /// Percent bonus (or discount).
    pub percent: u32,
}

/// A non-player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcDef {
    /// Stable id.
    pub id: NpcId,
    /// Display name.
    pub name: String,
    /// Whether the NPC can be dated and married.
    #[serde(default)]
    pub romanceable: bool,
    /// Gift preferences; unlisted items are neutral.
    #[serde(default)]
    pub preferences: BTreeMap<ItemId, GiftPreference>,
    /// Passive bonus while married to this NPC.
    #[serde(default)]
    pub spouse_bonus: Option<SpouseBonus>,
}

impl NpcDef {
    /// How much the NPC likes an item.
    pub fn preference(&self, item: &ItemId) -> GiftPreference {
        self.preferences
            .get(item)
            .copied()
            .unwrap_or(GiftPreference::Neutral)
    }
}

/// A family activity (dates, outings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyActivityDef {
    /// Stable id.
    pub id: ActivityId,
    /// Display name.
    pub name: String,
    /// Price per activity.
    #[serde(default)]
    pub cost: u64,
    /// Marriage happiness gained.
    #[serde(default)]
    pub marriage_happiness: u32,
    /// Child happiness gained.
    #[serde(default)]
    pub child_happiness: u32,
    /// Whether a child is required.
    #[serde(default)]
    pub requires_child: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlisted_gift_is_neutral() {
        let npc = NpcDef {
            id: NpcId::from("aria"),
            name: "Aria".to_owned(),
            romanceable: true,
            preferences: BTreeMap::from([(ItemId::from("sheet_music"), GiftPreference::Loved)]),
            spouse_bonus: None,
        };
        assert_eq!(npc.preference(&ItemId::from("sheet_music")), GiftPreference::Loved);
        assert_eq!(npc.preference(&ItemId::from("rock")), GiftPreference::Neutral);
    }

    #[test]
    fn max_valued_events() {
        assert!(MissionEventKind::ReachStreak.is_max_valued());
        assert!(MissionEventKind::PetStat.is_max_valued());
        assert!(!MissionEventKind::CorrectAnswer.is_max_valued());
    }

    #[test]
    fn conditions_parse_from_tagged_json() {
        let cond: Option<AchievementCondition> =
            serde_json::from_str(r#"{"kind":"mastery","item_id":"major_third","count":5}"#).ok();
        assert_eq!(
            cond,
            Some(AchievementCondition::Mastery {
                item_id: ItemId::from("major_third"),
                mode: None,
                count: 5,
            })
        );
    }
}
