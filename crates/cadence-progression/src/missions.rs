//! Daily and weekly missions.
//!
//! The board is refreshed before every command: the first command of a new
//! local day redraws the daily missions and the first command of a new ISO
//! week redraws the weekly ones. Completed missions whose reward was not
//! claimed survive a refresh; everything else of that frequency is
//! discarded.
//!
//! Progress comes from [`MissionEvent`]s. Counted rules add the event's
//! amount; max-valued rules (streaks, pet meters) keep the highest value
//! seen. Progress never exceeds the target.

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use cadence_catalog::{Catalog, MissionEventKind, ProgressRule, Reward};
use cadence_types::{
    GameMode, MissionFrequency, MissionId, MissionProgress, NotificationKind, NotificationPayload,
    PlayerAggregate,
};

use crate::effects::{Effects, MissionEvent};
use crate::env::Env;
use crate::error::ProgressionError;

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

/// Redraw daily and weekly missions when their period rolled over.
///
/// Returns whether anything was redrawn.
pub fn refresh(agg: &mut PlayerAggregate, env: &Env<'_>, rng: &mut impl Rng) -> bool {
    let today = env.today();
    let mut changed = false;

    if agg.missions.last_daily_refresh != Some(today) {
        redraw(agg, env.catalog, MissionFrequency::Daily, env.config.missions.daily_count, rng);
        agg.missions.last_daily_refresh = Some(today);
        changed = true;
    }
    let same_week = agg
        .missions
        .last_weekly_refresh
        .is_some_and(|last| Env::same_iso_week(last, today));
    if !same_week {
        redraw(agg, env.catalog, MissionFrequency::Weekly, env.config.missions.weekly_count, rng);
        agg.missions.last_weekly_refresh = Some(today);
        changed = true;
    }
    changed
}

fn redraw(
    agg: &mut PlayerAggregate,
    catalog: &Catalog,
    frequency: MissionFrequency,
    count: usize,
    rng: &mut impl Rng,
) {
    agg.missions.active.retain(|mission| {
        let Some(def) = catalog.mission(&mission.mission_id) else {
            warn!(mission = %mission.mission_id, "dropping mission with no definition");
            return false;
        };
        def.frequency != frequency || (mission.completed && !mission.claimed)
    });

    let candidates: Vec<_> = catalog
        .missions_of(frequency)
        .filter(|def| agg.missions.get(&def.id).is_none())
        .collect();
    for def in candidates.choose_multiple(rng, count) {
        agg.missions.active.push(MissionProgress {
            mission_id: def.id.clone(),
            progress: 0,
            target: def.target,
            completed: false,
            claimed: false,
        });
    }
    debug!(?frequency, active = agg.missions.active.len(), "missions refreshed");
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// The amount an event contributes to a rule, or `None` if it does not match.
pub fn contribution(rule: &ProgressRule, event: &MissionEvent) -> Option<u32> {
    use MissionEventKind as K;
    let mode_ok = |mode: GameMode| rule.mode.is_none_or(|wanted| wanted == mode);
    match (rule.event, event) {
        (K::CorrectAnswer, MissionEvent::CorrectAnswer { mode, item_id }) => {
            let item_ok = rule
                .item_id
                .as_ref()
                .is_none_or(|wanted| item_id.as_ref() == Some(wanted));
            (mode_ok(*mode) && item_ok).then_some(1)
        }
        (K::EarnXp, MissionEvent::EarnXp(amount)) => Some(clamp_u32(*amount)),
        (K::EarnCurrency, MissionEvent::EarnCurrency(delta)) => {
            (*delta > 0).then(|| clamp_u32(delta.unsigned_abs()))
        }
        (K::DefeatMonster, MissionEvent::DefeatMonster(monster)) => rule
            .monster_id
            .as_ref()
            .is_none_or(|wanted| wanted == monster)
            .then_some(1),
        (K::FeedPet, MissionEvent::FeedPet)
        | (K::PlayWithPet, MissionEvent::PlayWithPet)
        | (K::InteractNpc, MissionEvent::InteractNpc(_))
        | (K::GiveGift, MissionEvent::GiveGift(_))
        | (K::Busking, MissionEvent::Busking)
        | (K::UnlockItem, MissionEvent::UnlockItem)
        | (K::PurchaseItem, MissionEvent::PurchaseItem)
        | (K::CareForChild, MissionEvent::CareForChild)
        | (K::CompleteQuest, MissionEvent::CompleteQuest(_)) => Some(1),
        (K::ReachStreak, MissionEvent::ReachStreak { mode, streak }) => {
            mode_ok(*mode).then_some(*streak)
        }
        (K::PetStat, MissionEvent::PetStat { stat, value }) => rule
            .pet_stat
            .is_none_or(|wanted| wanted == *stat)
            .then_some(*value),
        _ => None,
    }
}

/// Apply one event to every open mission.
pub fn record(
    agg: &mut PlayerAggregate,
    catalog: &Catalog,
    event: &MissionEvent,
    effects: &mut Effects,
) {
    for mission in agg.missions.active.iter_mut().filter(|m| !m.completed) {
        let Some(def) = catalog.mission(&mission.mission_id) else {
            continue;
        };
        let Some(amount) = contribution(&def.rule, event) else {
            continue;
        };
        let raw = if def.rule.event.is_max_valued() {
            mission.progress.max(amount)
        } else {
            mission.progress.saturating_add(amount)
        };
        mission.progress = raw.min(mission.target);
        if mission.progress >= mission.target {
            mission.completed = true;
            debug!(mission = %mission.mission_id, "mission completed");
            effects.notify(
                NotificationKind::MissionCompleted,
                "notification.mission_completed",
                NotificationPayload::MissionCompleted {
                    mission_id: mission.mission_id.clone(),
                    progress: mission.progress,
                },
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Claim
// ---------------------------------------------------------------------------

/// Claim a completed mission. The caller grants the returned reward.
///
/// # Errors
///
/// `PreconditionNotMet` when the mission is not on the board, not complete
/// or already claimed; `MissingDefinition` when its definition is gone.
pub fn claim(
    agg: &mut PlayerAggregate,
    catalog: &Catalog,
    mission_id: &MissionId,
    effects: &mut Effects,
) -> Result<Reward, ProgressionError> {
    let def = catalog
        .mission(mission_id)
        .ok_or_else(|| ProgressionError::missing("mission", mission_id))?;
    let mission = agg
        .missions
        .get_mut(mission_id)
        .ok_or_else(|| ProgressionError::precondition(format!("{mission_id} is not on offer")))?;
    if !mission.completed {
        return Err(ProgressionError::precondition(format!(
            "{mission_id} is not complete"
        )));
    }
    if mission.claimed {
        return Err(ProgressionError::precondition(format!(
            "{mission_id} was already claimed"
        )));
    }
    mission.claimed = true;
    agg.stats.missions_claimed = agg.stats.missions_claimed.saturating_add(1);
    effects.notify(
        NotificationKind::MissionRewardClaimed,
        "notification.mission_reward",
        NotificationPayload::MissionReward {
            mission_id: mission_id.clone(),
            currency: def.reward.currency,
            xp: def.reward.xp,
            pet_xp: def.reward.pet_xp,
        },
    );
    Ok(def.reward)
}
