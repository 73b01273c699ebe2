//! Data-driven achievement evaluation.
//!
//! Each [`AchievementDef`](cadence_catalog::AchievementDef) carries an
//! [`AchievementCondition`]. [`evaluate_all`] walks the table once per
//! accepted command and unlocks every condition that has become true, in
//! catalog order. Unlocks only grow the set.

use cadence_catalog::{AchievementCondition, Catalog};
use cadence_types::{AchievementId, NotificationKind, NotificationPayload, PlayerAggregate};
use tracing::debug;

use crate::effects::Effects;
use crate::error::ProgressionError;

/// Whether a condition currently holds for the aggregate.
pub fn is_met(condition: &AchievementCondition, agg: &PlayerAggregate) -> bool {
    use AchievementCondition as C;
    match condition {
        C::ReachLevel { level } => agg.economy.level >= *level,
        C::CurrencyHeld { amount } => agg.economy.currency >= *amount,
        C::TotalCurrencyEarned { amount } => agg.economy.total_currency_earned >= *amount,
        C::Mastery {
            item_id,
            mode,
            count,
        } => match mode {
            Some(mode) => agg.mastery_count(*mode, item_id) >= *count,
            None => agg.mastery_total(item_id) >= u64::from(*count),
        },
        C::CorrectAnswers { count } => agg.stats.correct_answers >= *count,
        C::Streak { mode, length } => match mode {
            Some(mode) => agg.highest_streak(*mode) >= *length,
            None => agg.highest_streaks.values().any(|s| s >= length),
        },
        C::PetsOwned { count } => agg.pets.owned.len() >= as_len(*count),
        C::PetLevel { level } => agg.pets.instances.values().any(|p| p.level >= *level),
        C::PetEvolved => agg.stats.pets_evolved > 0,
        C::PetInteractions { count } => agg.stats.pet_interactions >= *count,
        C::HouseLevel { level } => agg.house.level >= *level,
        C::FurnitureOwned { count } => agg.house.furniture.len() >= as_len(*count),
        C::Married => agg.family.is_married,
        C::Relationship { status, npc_id } => match npc_id {
            Some(npc) => agg.relationship(npc).is_some_and(|r| r.status >= *status),
            None => agg.relationships.values().any(|r| r.status >= *status),
        },
        C::HasChild => agg.family.child.is_some(),
        C::ChildStage { stage } => agg.family.child.as_ref().is_some_and(|c| c.stage >= *stage),
        C::MissionsClaimed { count } => agg.stats.missions_claimed >= *count,
        C::QuestsClaimed { count } => agg.stats.quests_claimed >= *count,
        C::MonstersDefeated { count } => agg.stats.monsters_defeated >= *count,
        C::BuskingPerformances { count } => agg.stats.busking_performances >= *count,
        C::UnlockedItems { count } => agg.unlocked_item_count() >= as_len(*count),
        C::LoginStreak { days } => agg.login.streak >= *days,
    }
}

fn as_len(count: u32) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX)
}

/// Unlock one achievement.
///
/// Returns `Ok(false)` without a notification when it was already unlocked.
///
/// # Errors
///
/// `MissingDefinition` when the id is not in the catalog.
pub fn unlock(
    agg: &mut PlayerAggregate,
    catalog: &Catalog,
    id: &AchievementId,
    effects: &mut Effects,
) -> Result<bool, ProgressionError> {
    let def = catalog
        .achievement(id)
        .ok_or_else(|| ProgressionError::missing("achievement", id))?;
    if !agg.achievements.insert(id.clone()) {
        return Ok(false);
    }
    debug!(achievement = %id, "achievement unlocked");
    effects.notify(
        NotificationKind::AchievementUnlocked,
        "notification.achievement",
        NotificationPayload::Achievement {
            achievement_id: id.clone(),
            name: def.name.clone(),
        },
    );
    Ok(true)
}

/// Unlock every achievement whose condition now holds. Returns how many
/// were newly unlocked.
pub fn evaluate_all(agg: &mut PlayerAggregate, catalog: &Catalog, effects: &mut Effects) -> usize {
    let newly_met: Vec<AchievementId> = catalog
        .achievements
        .iter()
        .filter(|def| !agg.achievements.contains(&def.id) && is_met(&def.condition, agg))
        .map(|def| def.id.clone())
        .collect();
    let mut unlocked = 0_usize;
    for id in &newly_met {
        if matches!(unlock(agg, catalog, id, effects), Ok(true)) {
            unlocked = unlocked.saturating_add(1);
        }
    }
    unlocked
}

#[cfg(test)]
mod tests {
    use cadence_types::{GameMode, ItemId, NpcId, RelationshipStatus};
    use chrono::Utc;

    use super::*;

    #[test]
    fn unlocking_twice_is_a_no_op() {
        let catalog = Catalog::builtin();
        let mut agg = PlayerAggregate::default();
        let mut fx = Effects::new(Utc::now());
        let id = AchievementId::from("warming_up");
        assert_eq!(unlock(&mut agg, &catalog, &id, &mut fx), Ok(true));
        let snapshot = agg.clone();
        assert_eq!(unlock(&mut agg, &catalog, &id, &mut fx), Ok(false));
        assert_eq!(agg, snapshot);
        assert_eq!(fx.notifications().len(), 1);
    }

    #[test]
    fn unknown_achievement_is_a_fault() {
        let catalog = Catalog::builtin();
        let mut agg = PlayerAggregate::default();
        let mut fx = Effects::new(Utc::now());
        let result = unlock(&mut agg, &catalog, &AchievementId::from("ghost"), &mut fx);
        assert!(result.is_err_and(|e| e.is_fault()));
    }

    #[test]
    fn evaluation_unlocks_in_catalog_order() {
        let catalog = Catalog::builtin();
        let mut agg = PlayerAggregate::default();
        agg.economy.level = 5;
        agg.stats.correct_answers = 1;
        let mut fx = Effects::new(Utc::now());
        assert_eq!(evaluate_all(&mut agg, &catalog, &mut fx), 3);
        let names: Vec<_> = fx
            .notifications()
            .iter()
            .filter_map(|n| match &n.payload {
                NotificationPayload::Achievement { achievement_id, .. } => {
                    Some(achievement_id.as_str().to_owned())
                }
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["warming_up", "apprentice", "first_note"]);
        assert_eq!(evaluate_all(&mut agg, &catalog, &mut fx), 0);
    }

    #[test]
    fn mastery_with_and_without_mode() {
        let mut agg = PlayerAggregate::default();
        let third = ItemId::from("major_third");
        agg.mastery
            .entry(GameMode::Intervals)
            .or_default()
            .insert(third.clone(), 3);
        agg.mastery
            .entry(GameMode::Arena)
            .or_default()
            .insert(third.clone(), 2);
        let any_mode = AchievementCondition::Mastery {
            item_id: third.clone(),
            mode: None,
            count: 5,
        };
        let intervals_only = AchievementCondition::Mastery {
            item_id: third,
            mode: Some(GameMode::Intervals),
            count: 5,
        };
        assert!(is_met(&any_mode, &agg));
        assert!(!is_met(&intervals_only, &agg));
    }

    #[test]
    fn relationship_status_counts_higher_tiers() {
        let mut agg = PlayerAggregate::default();
        agg.relationship_mut(&NpcId::from("leo")).status = RelationshipStatus::Married;
        let dating = AchievementCondition::Relationship {
            status: RelationshipStatus::Dating,
            npc_id: None,
        };
        assert!(is_met(&dating, &agg));
        let with_aria = AchievementCondition::Relationship {
            status: RelationshipStatus::Dating,
            npc_id: Some(NpcId::from("aria")),
        };
        assert!(!is_met(&with_aria, &agg));
    }
}
