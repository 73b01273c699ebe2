//! Narrative quests.
//!
//! A quest is started explicitly, its objectives are completed in any order
//! (explicitly or from gameplay events) and its reward is claimed once all
//! objectives are done. `Active -> Completed -> Claimed`, never backwards.

use tracing::debug;

use cadence_catalog::{Catalog, QuestDef, QuestObjective, Reward};
use cadence_types::{
    NotificationKind, NotificationPayload, PlayerAggregate, QuestId, QuestProgress, QuestStatus,
};

use crate::effects::{Effects, MissionEvent};
use crate::error::ProgressionError;

fn announce(effects: &mut Effects, quest_id: &QuestId, status: QuestStatus) {
    effects.notify(
        NotificationKind::QuestEvent,
        "notification.quest",
        NotificationPayload::Quest {
            quest_id: quest_id.clone(),
            status,
        },
    );
}

/// Whether the player may start the quest right now.
pub fn is_available(agg: &PlayerAggregate, def: &QuestDef) -> bool {
    agg.quest(&def.id).is_none()
        && agg.economy.level >= def.min_level
        && def.prerequisite.as_ref().is_none_or(|pre| {
            agg.quest(pre)
                .is_some_and(|q| q.status == QuestStatus::Claimed)
        })
}

/// Start a quest.
///
/// # Errors
///
/// `PreconditionNotMet` when the quest was already started, the level is
/// too low or the prerequisite is unclaimed; `MissingDefinition` for an
/// unknown id.
pub fn start(
    agg: &mut PlayerAggregate,
    catalog: &Catalog,
    quest_id: &QuestId,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let def = catalog
        .quest(quest_id)
        .ok_or_else(|| ProgressionError::missing("quest", quest_id))?;
    if !is_available(agg, def) {
        return Err(ProgressionError::precondition(format!(
            "{quest_id} is not available"
        )));
    }
    agg.quests.push(QuestProgress {
        quest_id: quest_id.clone(),
        status: QuestStatus::Active,
        objectives: vec![false; def.objectives.len()],
    });
    debug!(quest = %quest_id, "quest started");
    announce(effects, quest_id, QuestStatus::Active);
    Ok(())
}

/// Mark objective `index` done, completing the quest when it was the last.
fn mark(progress: &mut QuestProgress, index: usize, effects: &mut Effects) {
    let Some(done) = progress.objectives.get_mut(index) else {
        return;
    };
    if *done {
        return;
    }
    *done = true;
    if progress.objectives.iter().all(|done| *done) {
        progress.status = QuestStatus::Completed;
        debug!(quest = %progress.quest_id, "quest completed");
        announce(effects, &progress.quest_id, QuestStatus::Completed);
    }
}

/// Explicitly complete one objective. Revisiting a done objective is a no-op.
///
/// # Errors
///
/// `PreconditionNotMet` when the quest is not active or `index` is out of
/// range.
pub fn progress(
    agg: &mut PlayerAggregate,
    quest_id: &QuestId,
    index: u32,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let quest = agg
        .quest_mut(quest_id)
        .filter(|q| q.status == QuestStatus::Active)
        .ok_or_else(|| ProgressionError::precondition(format!("{quest_id} is not active")))?;
    let index = usize::try_from(index).unwrap_or(usize::MAX);
    if index >= quest.objectives.len() {
        return Err(ProgressionError::precondition(format!(
            "{quest_id} has no objective {index}"
        )));
    }
    mark(quest, index, effects);
    Ok(())
}

/// Auto-complete talk-to and defeat-monster objectives from an event.
pub fn record_event(
    agg: &mut PlayerAggregate,
    catalog: &Catalog,
    event: &MissionEvent,
    effects: &mut Effects,
) {
    if !matches!(
        event,
        MissionEvent::InteractNpc(_) | MissionEvent::DefeatMonster(_)
    ) {
        return;
    }
    for quest in agg
        .quests
        .iter_mut()
        .filter(|q| q.status == QuestStatus::Active)
    {
        let Some(def) = catalog.quest(&quest.quest_id) else {
            continue;
        };
        let hits: Vec<usize> = def
            .objectives
            .iter()
            .enumerate()
            .filter(|(_, objective)| match (objective, event) {
                (QuestObjective::TalkTo { npc_id }, MissionEvent::InteractNpc(npc)) => {
                    npc_id == npc
                }
                (
                    QuestObjective::DefeatMonster { monster_id },
                    MissionEvent::DefeatMonster(monster),
                ) => monster_id == monster,
                _ => false,
            })
            .map(|(index, _)| index)
            .collect();
        for index in hits {
            mark(quest, index, effects);
        }
    }
}

/// Claim a completed quest. The caller grants the returned reward.
///
/// # Errors
///
/// `PreconditionNotMet` unless the quest is `Completed`;
/// `MissingDefinition` for an unknown id.
pub fn complete(
    agg: &mut PlayerAggregate,
    catalog: &Catalog,
    quest_id: &QuestId,
    effects: &mut Effects,
) -> Result<Reward, ProgressionError> {
    let def = catalog
        .quest(quest_id)
        .ok_or_else(|| ProgressionError::missing("quest", quest_id))?;
    let quest = agg
        .quest_mut(quest_id)
        .filter(|q| q.status == QuestStatus::Completed)
        .ok_or_else(|| {
            ProgressionError::precondition(format!("{quest_id} is not ready to claim"))
        })?;
    quest.status = QuestStatus::Claimed;
    agg.stats.quests_claimed = agg.stats.quests_claimed.saturating_add(1);
    announce(effects, quest_id, QuestStatus::Claimed);
    effects.event(MissionEvent::CompleteQuest(quest_id.clone()));
    Ok(def.reward)
}
