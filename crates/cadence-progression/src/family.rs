//! Child simulation: birth, hourly needs, sickness, growth and school.
//!
//! The child is born on a day boundary once a happy marriage is old
//! enough. Needs decay hour by hour; a meter below the need floor raises a
//! pending need that only the matching care action clears. Growth and
//! academics advance once per calendar day.

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use cadence_types::{
    ActivityId, ChildNeed, ChildRecord, Grade, GrowthStage, METER_MAX, NotificationKind,
    NotificationPayload, PlayerAggregate, RejectionReason,
};

use crate::config::FamilyConfig;
use crate::effects::{Effects, MissionEvent};
use crate::env::{Env, SECS_PER_HOUR, advance, days_between};
use crate::error::ProgressionError;

/// Hours of decay simulated in one catch-up; older time is skipped.
pub const MAX_CATCH_UP_HOURS: i64 = 720;

fn announce(effects: &mut Effects, event: &str) {
    effects.notify(
        NotificationKind::RelationshipChanged,
        "notification.family",
        NotificationPayload::Relationship {
            npc_id: None,
            status: None,
            event: event.to_owned(),
        },
    );
}

fn meter_add(value: u32, delta: u32) -> u32 {
    value.saturating_add(delta).min(METER_MAX)
}

fn child_mut(agg: &mut PlayerAggregate) -> Result<&mut ChildRecord, ProgressionError> {
    agg.family
        .child
        .as_mut()
        .ok_or_else(|| ProgressionError::precondition("no child"))
}

fn school_child_mut(agg: &mut PlayerAggregate) -> Result<&mut ChildRecord, ProgressionError> {
    let child = child_mut(agg)?;
    if child.stage == GrowthStage::SchoolAge {
        Ok(child)
    } else {
        Err(ProgressionError::precondition("child is not school age"))
    }
}

/// Growth stage for an age in days.
pub fn stage_for_age(config: &FamilyConfig, age_days: u32) -> GrowthStage {
    let [crawler, toddler, school] = config.growth_ages;
    if age_days >= school {
        GrowthStage::SchoolAge
    } else if age_days >= toddler {
        GrowthStage::Toddler
    } else if age_days >= crawler {
        GrowthStage::Crawler
    } else {
        GrowthStage::Infant
    }
}

// ---------------------------------------------------------------------------
// Birth & time
// ---------------------------------------------------------------------------

/// Welcome a child when the marriage is old and happy enough.
///
/// Returns whether a child was born.
pub fn maybe_birth(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    day: NaiveDate,
    rng: &mut impl Rng,
    effects: &mut Effects,
) -> bool {
    let family = &agg.family;
    let Some(married_on) = family.married_on else {
        return false;
    };
    if !family.is_married
        || family.child.is_some()
        || family.marriage_happiness < env.config.relationships.content_threshold
        || days_between(married_on, day) < env.config.family.days_until_child
    {
        return false;
    }
    let name = env
        .config
        .family
        .child_names
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| "Baby".to_owned());
    info!(child = %name, "child born");
    agg.family.child = Some(ChildRecord {
        name,
        last_checked: env.now,
        ..ChildRecord::default()
    });
    announce(effects, "child_born");
    true
}

/// Apply whole hours of need decay since the child was last checked.
///
/// # Order of operations (per hour)
///
/// 1. Hunger, cleanliness, affection and happiness fall; sleepiness rises
/// 2. Meters past their limits raise pending needs
/// 3. Happiness drops once per pending need
/// 4. The child falls sick when happiness or a need drops below the
///    sick threshold
pub fn hourly_decay(agg: &mut PlayerAggregate, env: &Env<'_>, effects: &mut Effects) {
    let config = &env.config.family;
    let Some(child) = agg.family.child.as_mut() else {
        return;
    };
    let hours = env
        .now
        .signed_duration_since(child.last_checked)
        .num_seconds()
        .checked_div(SECS_PER_HOUR)
        .unwrap_or(0);
    if hours <= 0 {
        return;
    }
    child.last_checked = advance(child.last_checked, hours.saturating_mul(SECS_PER_HOUR));

    let needs_before = child.pending_needs.len();
    let mut fell_sick = false;
    for _ in 0..hours.min(MAX_CATCH_UP_HOURS) {
        // 1. Decay
        child.hunger = child.hunger.saturating_sub(config.hunger_decay_per_hour);
        child.cleanliness = child.cleanliness.saturating_sub(config.cleanliness_decay_per_hour);
        child.affection = child.affection.saturating_sub(config.affection_decay_per_hour);
        child.happiness = child.happiness.saturating_sub(config.happiness_decay_per_hour);
        child.sleepiness = meter_add(child.sleepiness, config.sleepiness_rise_per_hour);

        // 2. Needs
        for (need, below) in [
            (ChildNeed::Hunger, child.hunger < config.need_floor),
            (ChildNeed::Cleanliness, child.cleanliness < config.need_floor),
            (ChildNeed::Affection, child.affection < config.need_floor),
            (ChildNeed::Happiness, child.happiness < config.need_floor),
            (ChildNeed::Sleep, child.sleepiness > config.sleep_ceiling),
        ] {
            if below {
                child.pending_needs.insert(need);
            }
        }

        // 3. Unmet needs hurt
        let penalty = u32::try_from(child.pending_needs.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(config.need_happiness_penalty);
        child.happiness = child.happiness.saturating_sub(penalty);

        // 4. Sickness
        let lowest_need = child.hunger.min(child.cleanliness).min(child.affection);
        if !child.is_sick
            && (child.happiness < config.sick_threshold || lowest_need < config.sick_threshold)
        {
            child.is_sick = true;
            child.sick_days = 0;
            fell_sick = true;
        }
    }

    if child.pending_needs.len() > needs_before {
        effects.info("child_needs_care");
    }
    if fell_sick {
        debug!(child = %child.name, "child fell sick");
        effects.info("child_sick");
    }
}

/// Advance the child by one calendar day.
///
/// # Order of operations
///
/// 1. Age and growth (school age starts at grade C)
/// 2. Sickness recovery
/// 3. Academic decline from skipped homework or a low-happiness streak
pub fn daily_step(agg: &mut PlayerAggregate, env: &Env<'_>, effects: &mut Effects) {
    let config = &env.config.family;
    let Some(child) = agg.family.child.as_mut() else {
        return;
    };

    // 1. Growth
    child.age_days = child.age_days.saturating_add(1);
    let stage = stage_for_age(config, child.age_days);
    if stage > child.stage {
        child.stage = stage;
        if stage == GrowthStage::SchoolAge && child.grade.is_none() {
            child.grade = Some(Grade::C);
        }
        info!(child = %child.name, ?stage, "child grew");
        announce(effects, "child_grew");
    }

    // 2. Recovery
    if child.is_sick {
        child.sick_days = child.sick_days.saturating_add(1);
        if child.sick_days >= config.sick_days_to_recover {
            child.is_sick = false;
            child.sick_days = 0;
            effects.info("child_recovered");
        }
    }

    // 3. Academics
    if child.stage != GrowthStage::SchoolAge {
        return;
    }
    let Some(grade) = child.grade else {
        return;
    };
    let mut lowered = false;
    child.days_since_homework = child.days_since_homework.saturating_add(1);
    if child.days_since_homework >= config.homework_neglect_days {
        child.days_since_homework = 0;
        lowered = true;
    }
    if child.happiness < config.low_happiness_threshold {
        child.low_happiness_streak = child.low_happiness_streak.saturating_add(1);
    } else {
        child.low_happiness_streak = 0;
    }
    if child.low_happiness_streak >= config.low_happiness_days {
        child.low_happiness_streak = 0;
        lowered = true;
    }
    if lowered {
        child.grade = Some(grade.degraded());
        effects.info("grade_dropped");
    }
}

// ---------------------------------------------------------------------------
// Care actions
// ---------------------------------------------------------------------------

fn cared(child: &mut ChildRecord, cleared: &[ChildNeed], effects: &mut Effects) {
    for need in cleared {
        child.pending_needs.remove(need);
    }
    effects.event(MissionEvent::CareForChild);
}

/// Feed the child.
///
/// # Errors
///
/// `PreconditionNotMet` without a child.
pub fn feed_child(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let child = child_mut(agg)?;
    child.hunger = meter_add(child.hunger, env.config.family.feed_amount);
    cared(child, &[ChildNeed::Hunger], effects);
    Ok(())
}

/// Play with the child.
///
/// # Errors
///
/// `PreconditionNotMet` without a child.
pub fn play_with_child(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let config = &env.config.family;
    let child = child_mut(agg)?;
    child.affection = meter_add(child.affection, config.play_affection);
    child.happiness = meter_add(child.happiness, config.play_happiness);
    cared(child, &[ChildNeed::Affection, ChildNeed::Happiness], effects);
    Ok(())
}

/// Change the child's diaper.
///
/// # Errors
///
/// `PreconditionNotMet` without a child, `InvalidStateTransition` once the
/// child is school age.
pub fn change_diaper(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let child = child_mut(agg)?;
    if child.stage == GrowthStage::SchoolAge {
        return Err(ProgressionError::invalid_transition(
            "school-age children do not wear diapers",
        ));
    }
    child.cleanliness = meter_add(child.cleanliness, env.config.family.diaper_cleanliness);
    cared(child, &[ChildNeed::Cleanliness], effects);
    Ok(())
}

/// Soothe the child to sleep.
///
/// # Errors
///
/// `PreconditionNotMet` without a child.
pub fn soothe_to_sleep(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let child = child_mut(agg)?;
    child.sleepiness = child.sleepiness.saturating_sub(env.config.family.soothe_amount);
    cared(child, &[ChildNeed::Sleep], effects);
    Ok(())
}

/// Cure a sick child with a care kit.
///
/// # Errors
///
/// `PreconditionNotMet` without a child or when the child is healthy,
/// `InsufficientResource` without a kit.
pub fn use_care_kit(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let kits = agg.inventory.care_kits;
    let child = child_mut(agg)?;
    if !child.is_sick {
        return Err(ProgressionError::precondition("child is not sick"));
    }
    if kits == 0 {
        return Err(ProgressionError::rejected(
            RejectionReason::InsufficientResource,
            "no care kit",
        ));
    }
    child.is_sick = false;
    child.sick_days = 0;
    child.happiness = meter_add(child.happiness, env.config.family.care_kit_happiness);
    cared(child, &[], effects);
    agg.inventory.care_kits = kits.saturating_sub(1);
    Ok(())
}

/// Pay this week's tuition, raising the grade immediately.
///
/// Returns the price; the caller charges it.
///
/// # Errors
///
/// `PreconditionNotMet` unless the child is school age, `CooldownActive`
/// until next week once paid this ISO week.
pub fn pay_tuition(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<u64, ProgressionError> {
    let today = env.today();
    let child = school_child_mut(agg)?;
    if let Some(paid) = child.last_tuition
        && Env::same_iso_week(paid, today)
    {
        return Err(ProgressionError::cooldown(
            env.secs_until_next_week(),
            "tuition already paid this week",
        ));
    }
    child.last_tuition = Some(today);
    child.grade = Some(child.grade.map_or(Grade::C, Grade::improved));
    cared(child, &[], effects);
    Ok(env.config.family.tuition_cost)
}

/// Help with homework once per day; enough study points raise the grade.
///
/// # Errors
///
/// `PreconditionNotMet` unless the child is school age, `CooldownActive`
/// until tomorrow once done today.
pub fn help_with_homework(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    effects: &mut Effects,
) -> Result<(), ProgressionError> {
    let today = env.today();
    let points_per_grade = env.config.family.points_per_grade;
    let child = school_child_mut(agg)?;
    if child.last_homework == Some(today) {
        return Err(ProgressionError::cooldown(
            env.secs_until_next_day(),
            "homework already done today",
        ));
    }
    child.last_homework = Some(today);
    child.days_since_homework = 0;
    child.study_points = child.study_points.saturating_add(1);
    if child.study_points >= points_per_grade {
        child.study_points = 0;
        child.grade = Some(child.grade.map_or(Grade::C, Grade::improved));
        effects.info("grade_improved");
    }
    cared(child, &[], effects);
    Ok(())
}

// ---------------------------------------------------------------------------
// Family activities
// ---------------------------------------------------------------------------

/// What a family activity asks of the caller after it is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityOutcome {
    /// Currency to charge.
    pub cost: u64,
    /// Marriage happiness to add.
    pub marriage_happiness: u32,
}

/// Perform a catalog family activity, at most once per day each.
///
/// Child happiness is applied here; the returned [`ActivityOutcome`]
/// carries the cost and marriage happiness for the caller.
///
/// # Errors
///
/// - `PreconditionNotMet` when unmarried or the activity needs a child.
/// - `CooldownActive` until tomorrow when already done today.
/// - `MissingDefinition` for an unknown activity.
pub fn perform_family_activity(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    activity_id: &ActivityId,
    effects: &mut Effects,
) -> Result<ActivityOutcome, ProgressionError> {
    let def = env
        .catalog
        .family_activity(activity_id)
        .ok_or_else(|| ProgressionError::missing("family activity", activity_id))?;
    if !agg.family.is_married {
        return Err(ProgressionError::precondition("family activities need a spouse"));
    }
    if def.requires_child && agg.family.child.is_none() {
        return Err(ProgressionError::precondition(format!(
            "{activity_id} needs a child"
        )));
    }
    let today = env.today();
    if agg.family.activity_log.get(activity_id) == Some(&today) {
        return Err(ProgressionError::cooldown(
            env.secs_until_next_day(),
            format!("{activity_id} already done today"),
        ));
    }
    agg.family.activity_log.insert(activity_id.clone(), today);
    if let Some(child) = agg.family.child.as_mut() {
        child.happiness = meter_add(child.happiness, def.child_happiness);
    }
    effects.info("family_activity");
    Ok(ActivityOutcome {
        cost: def.cost,
        marriage_happiness: def.marriage_happiness,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cadence_catalog::Catalog;
    use chrono::{DateTime, Days, Offset, TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::ProgressionConfig;

    fn day(n: u64) -> DateTime<Utc> {
        let base = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        base.checked_add_days(Days::new(n)).unwrap()
    }

    fn env_at<'a>(
        catalog: &'a Catalog,
        config: &'a ProgressionConfig,
        now: DateTime<Utc>,
    ) -> Env<'a> {
        Env::new(catalog, config, now, Utc.fix())
    }

    fn with_child(stage: GrowthStage) -> PlayerAggregate {
        let mut agg = PlayerAggregate::default();
        agg.family.is_married = true;
        agg.family.spouse = Some("aria".into());
        agg.family.marriage_happiness = 80;
        agg.family.child = Some(ChildRecord {
            name: "Lyra".to_owned(),
            stage,
            grade: (stage == GrowthStage::SchoolAge).then_some(Grade::C),
            last_checked: day(0),
            ..ChildRecord::default()
        });
        agg
    }

    fn child(agg: &PlayerAggregate) -> &ChildRecord {
        agg.family.child.as_ref().unwrap()
    }

    #[test]
    fn birth_waits_for_a_week_of_happy_marriage() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = PlayerAggregate::default();
        agg.family.is_married = true;
        agg.family.spouse = Some("aria".into());
        agg.family.married_on = Some(day(0).date_naive());
        agg.family.marriage_happiness = 70;
        let mut rng = SmallRng::seed_from_u64(3);
        let mut fx = Effects::new(day(6));

        let env = env_at(&catalog, &config, day(6));
        assert!(!maybe_birth(&mut agg, &env, env.today(), &mut rng, &mut fx));

        agg.family.marriage_happiness = 40;
        let env = env_at(&catalog, &config, day(7));
        assert!(!maybe_birth(&mut agg, &env, env.today(), &mut rng, &mut fx));

        agg.family.marriage_happiness = 60;
        assert!(maybe_birth(&mut agg, &env, env.today(), &mut rng, &mut fx));
        let born = child(&agg);
        assert!(config.family.child_names.contains(&born.name));
        assert_eq!(born.stage, GrowthStage::Infant);
        assert!(!maybe_birth(&mut agg, &env, env.today(), &mut rng, &mut fx));
    }

    #[test]
    fn hourly_decay_raises_needs_and_sickness() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = with_child(GrowthStage::Infant);
        let later = advance(day(0), 66_600);
        let mut fx = Effects::new(later);
        hourly_decay(&mut agg, &env_at(&catalog, &config, later), &mut fx);
        let c = child(&agg);
        assert_eq!(c.hunger, 28);
        assert_eq!(c.last_checked, advance(day(0), 64_800));
        assert!(c.pending_needs.contains(&ChildNeed::Hunger));
        assert!(c.pending_needs.contains(&ChildNeed::Sleep));
        assert!(c.happiness < 100);

        let much_later = advance(day(0), 259_200);
        hourly_decay(&mut agg, &env_at(&catalog, &config, much_later), &mut fx);
        let c = child(&agg);
        assert!(c.is_sick);
        assert_eq!(c.hunger, 0);
        assert!(c.happiness <= METER_MAX);
    }

    #[test]
    fn care_clears_matching_needs() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, day(0));
        let mut agg = with_child(GrowthStage::Infant);
        if let Some(c) = agg.family.child.as_mut() {
            c.hunger = 10;
            c.pending_needs.insert(ChildNeed::Hunger);
            c.pending_needs.insert(ChildNeed::Cleanliness);
        }
        let mut fx = Effects::new(day(0));
        feed_child(&mut agg, &env, &mut fx).unwrap();
        let c = child(&agg);
        assert_eq!(c.hunger, 50);
        assert!(!c.pending_needs.contains(&ChildNeed::Hunger));
        assert!(c.pending_needs.contains(&ChildNeed::Cleanliness));
        assert_eq!(fx.next_event(), Some(MissionEvent::CareForChild));
    }

    #[test]
    fn care_needs_a_child() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, day(0));
        let mut agg = PlayerAggregate::default();
        let mut fx = Effects::new(day(0));
        let err = feed_child(&mut agg, &env, &mut fx).unwrap_err();
        assert_eq!(err.reason(), RejectionReason::PreconditionNotMet);
    }

    #[test]
    fn school_age_has_no_diapers() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, day(0));
        let mut agg = with_child(GrowthStage::SchoolAge);
        let mut fx = Effects::new(day(0));
        let err = change_diaper(&mut agg, &env, &mut fx).unwrap_err();
        assert_eq!(err.reason(), RejectionReason::InvalidStateTransition);
    }

    #[test]
    fn care_kit_cures_sickness() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, day(0));
        let mut agg = with_child(GrowthStage::Toddler);
        let mut fx = Effects::new(day(0));

        let healthy = use_care_kit(&mut agg, &env, &mut fx).unwrap_err();
        assert_eq!(healthy.reason(), RejectionReason::PreconditionNotMet);

        if let Some(c) = agg.family.child.as_mut() {
            c.is_sick = true;
        }
        let no_kit = use_care_kit(&mut agg, &env, &mut fx).unwrap_err();
        assert_eq!(no_kit.reason(), RejectionReason::InsufficientResource);

        agg.inventory.care_kits = 1;
        use_care_kit(&mut agg, &env, &mut fx).unwrap();
        assert!(!child(&agg).is_sick);
        assert_eq!(agg.inventory.care_kits, 0);
    }

    #[test]
    fn growth_follows_cumulative_ages() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, day(0));
        let mut agg = with_child(GrowthStage::Infant);
        let mut fx = Effects::new(day(0));
        let mut stages = Vec::new();
        for _ in 0..14 {
            daily_step(&mut agg, &env, &mut fx);
            stages.push(child(&agg).stage);
        }
        assert_eq!(stages.get(2), Some(&GrowthStage::Crawler));
        assert_eq!(stages.get(6), Some(&GrowthStage::Toddler));
        assert_eq!(stages.get(13), Some(&GrowthStage::SchoolAge));
        assert_eq!(child(&agg).grade, Some(Grade::C));
    }

    #[test]
    fn sickness_clears_after_recovery_days() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, day(0));
        let mut agg = with_child(GrowthStage::Infant);
        if let Some(c) = agg.family.child.as_mut() {
            c.is_sick = true;
        }
        let mut fx = Effects::new(day(0));
        daily_step(&mut agg, &env, &mut fx);
        daily_step(&mut agg, &env, &mut fx);
        assert!(child(&agg).is_sick);
        daily_step(&mut agg, &env, &mut fx);
        assert!(!child(&agg).is_sick);
    }

    #[test]
    fn homework_raises_the_grade_once_per_day() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = with_child(GrowthStage::SchoolAge);
        let mut fx = Effects::new(day(0));
        for n in 0..3 {
            help_with_homework(&mut agg, &env_at(&catalog, &config, day(n)), &mut fx).unwrap();
        }
        assert_eq!(child(&agg).grade, Some(Grade::B));
        let again = help_with_homework(&mut agg, &env_at(&catalog, &config, day(2)), &mut fx)
            .unwrap_err();
        assert_eq!(again.reason(), RejectionReason::CooldownActive);
        assert!(again.retry_after_secs().is_some_and(|s| s > 0));
    }

    #[test]
    fn neglected_homework_lowers_the_grade() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, day(0));
        let mut agg = with_child(GrowthStage::SchoolAge);
        let mut fx = Effects::new(day(0));
        for _ in 0..3 {
            daily_step(&mut agg, &env, &mut fx);
        }
        assert_eq!(child(&agg).grade, Some(Grade::D));
    }

    #[test]
    fn tuition_once_per_week() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = with_child(GrowthStage::SchoolAge);
        let mut fx = Effects::new(day(0));
        // day(0) is a Monday.
        let cost = pay_tuition(&mut agg, &env_at(&catalog, &config, day(0)), &mut fx).unwrap();
        assert_eq!(cost, 200);
        assert_eq!(child(&agg).grade, Some(Grade::B));
        let again = pay_tuition(&mut agg, &env_at(&catalog, &config, day(4)), &mut fx).unwrap_err();
        assert_eq!(again.reason(), RejectionReason::CooldownActive);
        assert!(pay_tuition(&mut agg, &env_at(&catalog, &config, day(7)), &mut fx).is_ok());
        assert_eq!(child(&agg).grade, Some(Grade::A));
    }

    #[test]
    fn tuition_needs_school_age() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut agg = with_child(GrowthStage::Toddler);
        let mut fx = Effects::new(day(0));
        let err = pay_tuition(&mut agg, &env_at(&catalog, &config, day(0)), &mut fx).unwrap_err();
        assert_eq!(err.reason(), RejectionReason::PreconditionNotMet);
    }

    #[test]
    fn family_activities() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = env_at(&catalog, &config, day(0));
        let mut fx = Effects::new(day(0));

        let mut single = PlayerAggregate::default();
        let err = perform_family_activity(&mut single, &env, &"picnic".into(), &mut fx).unwrap_err();
        assert_eq!(err.reason(), RejectionReason::PreconditionNotMet);

        let mut agg = with_child(GrowthStage::Toddler);
        let outcome = perform_family_activity(&mut agg, &env, &"picnic".into(), &mut fx).unwrap();
        assert_eq!(outcome.cost, 20);
        assert_eq!(outcome.marriage_happiness, 10);
        let again = perform_family_activity(&mut agg, &env, &"picnic".into(), &mut fx).unwrap_err();
        assert_eq!(again.reason(), RejectionReason::CooldownActive);

        agg.family.child = None;
        let zoo = perform_family_activity(&mut agg, &env, &"zoo_trip".into(), &mut fx).unwrap_err();
        assert_eq!(zoo.reason(), RejectionReason::PreconditionNotMet);
    }
}
