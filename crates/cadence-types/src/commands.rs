//! Command surface of the progression engine.
//!
//! The UI submits one [`Command`] per player action. The store answers
//! every command with a [`CommandOutcome`]; accepted commands may also
//! produce notifications, drained separately.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{GameMode, MusicalItemKind, RejectionReason, ShopItemKind};
use crate::ids::{ActivityId, ItemId, MissionId, MonsterId, NpcId, PetId, QuestId};

// ---------------------------------------------------------------------------
// Training context
// ---------------------------------------------------------------------------

/// What happened in the training game that produced an XP/coin grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct TrainingContext {
    /// Mode the answer was given in.
    pub mode: GameMode,
    /// Training item that was answered, when the grant is per-answer.
    pub item_id: Option<ItemId>,
    /// Whether the answer was correct.
    pub correct: bool,
    /// Arena monster involved, if any.
    pub monster_id: Option<MonsterId>,
    /// Whether that monster was defeated by this answer.
    pub monster_defeated: bool,
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A single player action or timer event submitted to the store.
///
/// Serialized as internally tagged JSON, e.g.
/// `{"type":"adopt_pet","pet_id":"melody_cat"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Command {
    /// Grant training XP and coins (multipliers applied).
    AddXpAndCoinsFromTraining {
        /// XP before multipliers.
        base_xp: u64,
        /// Coins before multipliers.
        base_coins: u64,
        /// What the player did.
        context: TrainingContext,
    },
    /// Record a streak; keeps the best per mode.
    UpdateHighestStreak {
        /// Streak length reached.
        streak: u32,
        /// Mode it was reached in.
        mode: GameMode,
    },
    /// Buy an advanced interval, chord or scale.
    UnlockMusicalItem {
        /// Item to unlock.
        item_id: ItemId,
        /// Item kind.
        kind: MusicalItemKind,
        /// Price before discounts.
        cost: u64,
    },
    /// Buy a shop item at its discounted catalog price.
    PurchaseShopItem {
        /// Shop item.
        item_id: ItemId,
    },
    /// Adopt a pet from the catalog.
    AdoptPet {
        /// Pet definition.
        pet_id: PetId,
    },
    /// Feed the active pet one portion.
    FeedPet,
    /// Play with the active pet.
    PlayWithPet,
    /// Make an owned pet the active one.
    SetActivePet {
        /// Owned pet.
        pet_id: PetId,
    },
    /// Rename an owned pet.
    RenamePet {
        /// Owned pet.
        pet_id: PetId,
        /// New display name.
        name: String,
    },
    /// Set a cosmetic slot of an owned pet.
    CustomizePet {
        /// Owned pet.
        pet_id: PetId,
        /// Cosmetic slot (collar, hat, ...).
        slot: String,
        /// Chosen value.
        value: String,
    },
    /// Upgrade the house to the next level.
    UpgradeHouse,
    /// Use the practice nook furniture.
    ActivatePracticeNook,
    /// Claim a completed mission's reward.
    ClaimMissionReward {
        /// Mission to claim.
        mission_id: MissionId,
    },
    /// Accept a quest.
    StartQuest {
        /// Quest to start.
        quest_id: QuestId,
    },
    /// Mark one quest objective done.
    ProgressQuest {
        /// Quest.
        quest_id: QuestId,
        /// Objective index in catalog order.
        objective_index: u32,
    },
    /// Claim a completed quest's rewards.
    CompleteQuest {
        /// Quest.
        quest_id: QuestId,
    },
    /// Talk to an NPC.
    InteractWithNpc {
        /// NPC.
        npc_id: NpcId,
    },
    /// Give an NPC a gift from the inventory.
    GiveGiftToNpc {
        /// NPC.
        npc_id: NpcId,
        /// Gift item.
        item_id: ItemId,
        /// Category of the gifted item.
        kind: ShopItemKind,
    },
    /// Confess to a friendly NPC (needs the locket).
    ConfessToNpc {
        /// NPC.
        npc_id: NpcId,
    },
    /// Propose to a dating NPC (needs the wedding ring).
    ProposeToNpc {
        /// NPC.
        npc_id: NpcId,
    },
    /// Feed the child.
    FeedChild,
    /// Play with the child.
    PlayWithChild,
    /// Change the child's diaper.
    ChangeChildDiaper,
    /// Put the child to sleep.
    SootheChildToSleep,
    /// Cure the child's sickness with a care kit.
    UseChildCareKit,
    /// Pay this week's tuition.
    PayTuition,
    /// Help the child with homework.
    HelpWithHomework,
    /// Perform on the street for coins.
    PerformBusking,
    /// Do a family activity from the catalog.
    PerformFamilyActivity {
        /// Activity.
        activity_id: ActivityId,
    },
    /// Claim today's login reward.
    CheckForDailyLoginReward,
    /// Wipe the save back to the default aggregate.
    ResetGame,
    /// Persist immediately.
    SaveGameExplicitly,
    /// Periodic timer: decay, requests, day boundaries.
    Tick,
}

impl Command {
    /// Stable snake-case name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddXpAndCoinsFromTraining { .. } => "add_xp_and_coins_from_training",
            Self::UpdateHighestStreak { .. } => "update_highest_streak",
            Self::UnlockMusicalItem { .. } => "unlock_musical_item",
            Self::PurchaseShopItem { .. } => "purchase_shop_item",
            Self::AdoptPet { .. } => "adopt_pet",
            Self::FeedPet => "feed_pet",
            Self::PlayWithPet => "play_with_pet",
            Self::SetActivePet { .. } => "set_active_pet",
            Self::RenamePet { .. } => "rename_pet",
            Self::CustomizePet { .. } => "customize_pet",
            Self::UpgradeHouse => "upgrade_house",
            Self::ActivatePracticeNook => "activate_practice_nook",
            Self::ClaimMissionReward { .. } => "claim_mission_reward",
            Self::StartQuest { .. } => "start_quest",
            Self::ProgressQuest { .. } => "progress_quest",
            Self::CompleteQuest { .. } => "complete_quest",
            Self::InteractWithNpc { .. } => "interact_with_npc",
            Self::GiveGiftToNpc { .. } => "give_gift_to_npc",
            Self::ConfessToNpc { .. } => "confess_to_npc",
            Self::ProposeToNpc { .. } => "propose_to_npc",
            Self::FeedChild => "feed_child",
            Self::PlayWithChild => "play_with_child",
            Self::ChangeChildDiaper => "change_child_diaper",
            Self::SootheChildToSleep => "soothe_child_to_sleep",
            Self::UseChildCareKit => "use_child_care_kit",
            Self::PayTuition => "pay_tuition",
            Self::HelpWithHomework => "help_with_homework",
            Self::PerformBusking => "perform_busking",
            Self::PerformFamilyActivity { .. } => "perform_family_activity",
            Self::CheckForDailyLoginReward => "check_for_daily_login_reward",
            Self::ResetGame => "reset_game",
            Self::SaveGameExplicitly => "save_game_explicitly",
            Self::Tick => "tick",
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The answer to a submitted [`Command`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CommandOutcome {
    /// Whether the command was applied.
    pub success: bool,
    /// Why it was declined (present only if `success` is false).
    pub reason: Option<RejectionReason>,
    /// Human-readable detail for logs and debugging.
    pub detail: Option<String>,
    /// Seconds until a cooldown expires (only for `CooldownActive`).
    pub retry_after_secs: Option<i64>,
}

impl CommandOutcome {
    /// An applied command.
    pub const fn accepted() -> Self {
        Self {
            success: true,
            reason: None,
            detail: None,
            retry_after_secs: None,
        }
    }

    /// A declined command.
    pub fn rejected(reason: RejectionReason, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: Some(reason),
            detail: Some(detail.into()),
            retry_after_secs: None,
        }
    }

    /// Attach a cooldown hint.
    #[must_use]
    pub const fn with_retry_after(mut self, secs: i64) -> Self {
        self.retry_after_secs = Some(secs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_use_internal_tags() {
        let cmd = Command::AdoptPet {
            pet_id: PetId::from("melody_cat"),
        };
        let json = serde_json::to_string(&cmd).unwrap_or_default();
        assert_eq!(json, r#"{"type":"adopt_pet","pet_id":"melody_cat"}"#);

        let unit: Option<Command> = serde_json::from_str(r#"{"type":"feed_pet"}"#).ok();
        assert_eq!(unit, Some(Command::FeedPet));
    }

    #[test]
    fn training_context_defaults_missing_fields() {
        let cmd: Option<Command> = serde_json::from_str(
            r#"{"type":"add_xp_and_coins_from_training","base_xp":10,"base_coins":5,
                "context":{"mode":"Intervals","item_id":"major_third","correct":true}}"#,
        )
        .ok();
        let Some(Command::AddXpAndCoinsFromTraining { context, .. }) = cmd else {
            panic!("expected a training command");
        };
        assert_eq!(context.item_id, Some(ItemId::from("major_third")));
        assert!(context.monster_id.is_none());
        assert!(!context.monster_defeated);
    }

    #[test]
    fn outcome_constructors() {
        assert!(CommandOutcome::accepted().success);
        let out = CommandOutcome::rejected(RejectionReason::CooldownActive, "play")
            .with_retry_after(30);
        assert!(!out.success);
        assert_eq!(out.reason, Some(RejectionReason::CooldownActive));
        assert_eq!(out.retry_after_secs, Some(30));
        assert_eq!(Command::Tick.name(), "tick");
    }
}
