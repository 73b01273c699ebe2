//! Side-effect accumulator for one command.
//!
//! Subsystems never call each other's mutators. Instead they push
//! notifications and [`MissionEvent`]s into an [`Effects`] value owned by
//! the store, which later routes events to the mission and quest trackers.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use cadence_types::{
    GameMode, ItemId, MonsterId, Notification, NotificationKind, NotificationPayload, NpcId,
    PetStat, QuestId,
};

/// Something that happened during a command that missions or quests may count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissionEvent {
    /// A correct training answer.
    CorrectAnswer {
        /// Mode answered in.
        mode: GameMode,
        /// Item answered, if the UI reported one.
        item_id: Option<ItemId>,
    },
    /// XP earned.
    EarnXp(u64),
    /// Signed currency delta; only positive deltas count.
    EarnCurrency(i64),
    /// An arena monster defeated.
    DefeatMonster(MonsterId),
    /// The active pet was fed.
    FeedPet,
    /// The player played with the active pet.
    PlayWithPet,
    /// A conversation with an NPC.
    InteractNpc(NpcId),
    /// A gift given to an NPC.
    GiveGift(NpcId),
    /// A busking performance.
    Busking,
    /// A training item unlocked.
    UnlockItem,
    /// A shop item bought.
    PurchaseItem,
    /// A child care action.
    CareForChild,
    /// A quest claimed.
    CompleteQuest(QuestId),
    /// A streak was recorded.
    ReachStreak {
        /// Mode of the streak.
        mode: GameMode,
        /// Streak length.
        streak: u32,
    },
    /// A pet meter changed.
    PetStat {
        /// Meter.
        stat: PetStat,
        /// Value after the change.
        value: u32,
    },
}

/// Notifications and events produced by one command.
#[derive(Debug, Clone)]
pub struct Effects {
    now: DateTime<Utc>,
    notifications: Vec<Notification>,
    events: VecDeque<MissionEvent>,
}

impl Effects {
    /// Empty accumulator stamped with the command time.
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            notifications: Vec::new(),
            events: VecDeque::new(),
        }
    }

    /// Queue a notification.
    pub fn notify(
        &mut self,
        kind: NotificationKind,
        title_ref: &str,
        payload: NotificationPayload,
    ) {
        self.notifications
            .push(Notification::new(kind, title_ref, payload, self.now));
    }

    /// Queue an informational message.
    pub fn info(&mut self, key: &str) {
        self.notify(
            NotificationKind::Info,
            "notification.info",
            NotificationPayload::Message {
                key: key.to_owned(),
            },
        );
    }

    /// Queue a mission event.
    pub fn event(&mut self, event: MissionEvent) {
        self.events.push_back(event);
    }

    /// Take the oldest unprocessed event.
    pub fn next_event(&mut self) -> Option<MissionEvent> {
        self.events.pop_front()
    }

    /// Notifications produced so far, in production order.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Consume the accumulator, returning its notifications.
    pub fn into_notifications(self) -> Vec<Notification> {
        self.notifications
    }
}
