//! The phases wrapped around every command.
//!
//! 1. **Calendar** -- refresh missions for a new day or week, then run the
//!    day-boundary rules once per local day missed since the last command.
//! 2. **Command** -- the handler in [`commands`](super::commands).
//! 3. **Routing** -- drain mission events into the mission and quest
//!    trackers until none remain.
//! 4. **Achievements** -- scan the achievement table once.

use chrono::{Days, NaiveDate};
use rand::Rng;
use tracing::debug;

use cadence_catalog::Catalog;
use cadence_progression::env::days_between;
use cadence_progression::{Effects, Env, achievements, family, missions, quests, relationships};
use cadence_types::PlayerAggregate;

/// Days of missed boundaries replayed after a long absence.
pub const MAX_CATCH_UP_DAYS: i64 = 60;

/// Phase 1: mission refresh and day-boundary catch-up.
pub fn before_command(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    rng: &mut impl Rng,
    effects: &mut Effects,
) {
    missions::refresh(agg, env, rng);
    catch_up_days(agg, env, rng, effects);
}

fn catch_up_days(
    agg: &mut PlayerAggregate,
    env: &Env<'_>,
    rng: &mut impl Rng,
    effects: &mut Effects,
) {
    let today = env.today();
    let Some(last) = agg.timeline.last_day_processed else {
        agg.timeline.last_day_processed = Some(today);
        return;
    };
    let missed = days_between(last, today);
    if missed <= 0 {
        return;
    }
    let first = missed.saturating_sub(MAX_CATCH_UP_DAYS).saturating_add(1).max(1);
    debug!(missed, replayed = missed.saturating_sub(first).saturating_add(1), "day boundaries");
    for offset in first..=missed {
        let Some(day) = day_after(last, offset) else {
            break;
        };
        relationships::daily_decay(agg, env, day, effects);
        family::daily_step(agg, env, effects);
        family::maybe_birth(agg, env, day, rng, effects);
    }
    agg.timeline.last_day_processed = Some(today);
}

fn day_after(day: NaiveDate, offset: i64) -> Option<NaiveDate> {
    u64::try_from(offset)
        .ok()
        .and_then(|n| day.checked_add_days(Days::new(n)))
}

/// Phases 3 and 4: route events, then evaluate achievements.
pub fn after_command(agg: &mut PlayerAggregate, catalog: &Catalog, effects: &mut Effects) {
    while let Some(event) = effects.next_event() {
        missions::record(agg, catalog, &event, effects);
        quests::record_event(agg, catalog, &event, effects);
    }
    achievements::evaluate_all(agg, catalog, effects);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cadence_progression::{MissionEvent, ProgressionConfig};
    use cadence_types::{MissionId, MissionProgress, NpcId, RelationshipStatus};
    use chrono::{DateTime, Offset, TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn first_command_only_stamps_the_day() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let env = Env::new(&catalog, &config, at(2), Utc.fix());
        let mut rng = StdRng::seed_from_u64(1);
        let mut agg = PlayerAggregate::default();
        let mut fx = Effects::new(env.now);

        before_command(&mut agg, &env, &mut rng, &mut fx);
        assert_eq!(agg.timeline.last_day_processed, Some(env.today()));
        assert!(!agg.missions.active.is_empty());
    }

    #[test]
    fn missed_days_decay_relationships() {
        let catalog = Catalog::builtin();
        let config = ProgressionConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut agg = PlayerAggregate::default();
        let aria = NpcId::from("aria");
        {
            let record = agg.relationship_mut(&aria);
            record.rp = 50;
            record.status = RelationshipStatus::Friendly;
            record.last_positive_interaction = Some(at(2));
        }
        agg.timeline.last_day_processed = Some(at(2).date_naive());

        let env = Env::new(&catalog, &config, at(20), Utc.fix());
        let mut fx = Effects::new(env.now);
        before_command(&mut agg, &env, &mut rng, &mut fx);
        assert!(agg.relationship(&aria).unwrap().rp < 50);
        assert_eq!(agg.timeline.last_day_processed, Some(env.today()));
    }

    #[test]
    fn events_feed_missions_after_the_command() {
        let catalog = Catalog::builtin();
        let mut agg = PlayerAggregate::default();
        let id = MissionId::from("daily_busking");
        agg.missions.active.push(MissionProgress {
            mission_id: id.clone(),
            target: 1,
            ..MissionProgress::default()
        });
        let mut fx = Effects::new(at(2));
        fx.event(MissionEvent::Busking);
        after_command(&mut agg, &catalog, &mut fx);
        assert!(agg.missions.get(&id).unwrap().completed);
        assert_eq!(fx.next_event(), None);
    }
}
