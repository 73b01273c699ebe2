//! Notifications produced by accepted commands.
//!
//! A [`Notification`] carries a closed [`NotificationKind`], a localization
//! key for the title (`title_ref`) and a typed payload. The engine never
//! formats display strings; the UI resolves `title_ref` itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{GameMode, NotificationKind, QuestStatus, RelationshipStatus};
use crate::ids::{AchievementId, ItemId, MissionId, MonsterId, NotificationId, NpcId, PetId, QuestId};

/// A single user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Notification {
    /// Unique, time-ordered id.
    pub id: NotificationId,
    /// What happened.
    pub kind: NotificationKind,
    /// Localization key of the title, e.g. `notification.level_up`.
    pub title_ref: String,
    /// Kind-specific details.
    pub payload: NotificationPayload,
    /// When the notification was produced.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build a notification with a fresh id.
    pub fn new(
        kind: NotificationKind,
        title_ref: impl Into<String>,
        payload: NotificationPayload,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            kind,
            title_ref: title_ref.into(),
            payload,
            created_at,
        }
    }
}

/// Kind-specific notification details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NotificationPayload {
    /// Player level changed.
    LevelUp {
        /// Level before the grant.
        old_level: u32,
        /// Level after the grant.
        new_level: u32,
        /// XP still needed for the following level; `None` at the cap.
        xp_to_next: Option<u64>,
    },
    /// An achievement was unlocked.
    Achievement {
        /// Achievement id.
        achievement_id: AchievementId,
        /// Catalog display name.
        name: String,
    },
    /// A mission reached its target.
    MissionCompleted {
        /// Mission id.
        mission_id: MissionId,
        /// Final progress (equals the target).
        progress: u32,
    },
    /// A mission reward was granted.
    MissionReward {
        /// Mission id.
        mission_id: MissionId,
        /// Currency granted.
        currency: u64,
        /// Player XP granted.
        xp: u64,
        /// Pet XP granted.
        pet_xp: u64,
    },
    /// A pet gained a level.
    PetLevel {
        /// Pet id.
        pet_id: PetId,
        /// New level.
        level: u32,
    },
    /// A pet evolved.
    PetEvolution {
        /// Base form.
        from: PetId,
        /// Evolved form.
        to: PetId,
    },
    /// A pet asked for a training item.
    PetRequest {
        /// Pet id.
        pet_id: PetId,
        /// Requested mode.
        mode: GameMode,
        /// Requested item.
        item_id: ItemId,
    },
    /// A relationship, marriage or family state changed.
    Relationship {
        /// NPC involved, if any.
        npc_id: Option<NpcId>,
        /// Tier after the change, if it changed.
        status: Option<RelationshipStatus>,
        /// Short machine-readable event name (e.g. `heartsick`, `child_born`).
        event: String,
    },
    /// A quest changed state.
    Quest {
        /// Quest id.
        quest_id: QuestId,
        /// Status after the change.
        status: QuestStatus,
    },
    /// An arena monster was defeated.
    Monster {
        /// Monster id.
        monster_id: MonsterId,
        /// Currency reward.
        currency: u64,
        /// XP reward.
        xp: u64,
    },
    /// Free-form informational message key.
    Message {
        /// Machine-readable message key (e.g. `pet_hungry`).
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_internally_tagged() {
        let payload = NotificationPayload::LevelUp {
            old_level: 1,
            new_level: 2,
            xp_to_next: Some(150),
        };
        let json = serde_json::to_string(&payload).unwrap_or_default();
        assert_eq!(
            json,
            r#"{"type":"level_up","old_level":1,"new_level":2,"xp_to_next":150}"#
        );
    }

    #[test]
    fn notification_ids_differ() {
        let now = Utc::now();
        let payload = NotificationPayload::Message {
            key: "pet_hungry".to_owned(),
        };
        let a = Notification::new(NotificationKind::Info, "notification.info", payload.clone(), now);
        let b = Notification::new(NotificationKind::Info, "notification.info", payload, now);
        assert_ne!(a.id, b.id);
        assert_eq!(a.title_ref, "notification.info");
    }
}
