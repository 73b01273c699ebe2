//! Read-only inputs shared by every subsystem call within one command.
//!
//! [`Env`] bundles the catalog, the tunables and the command's timestamp,
//! plus the UTC offset that defines the player's calendar day.

use cadence_catalog::Catalog;
use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, TimeDelta, Utc};

use crate::config::ProgressionConfig;

/// Seconds in one hour.
pub const SECS_PER_HOUR: i64 = 3600;

/// Read-only inputs for one command.
#[derive(Debug, Clone, Copy)]
pub struct Env<'a> {
    /// Content definitions.
    pub catalog: &'a Catalog,
    /// Tunables.
    pub config: &'a ProgressionConfig,
    /// When the command is applied.
    pub now: DateTime<Utc>,
    /// Offset of the player's local calendar.
    pub offset: FixedOffset,
}

impl<'a> Env<'a> {
    /// Bundle the inputs for one command.
    pub const fn new(
        catalog: &'a Catalog,
        config: &'a ProgressionConfig,
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            catalog,
            config,
            now,
            offset,
        }
    }

    /// Local calendar day of an instant.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Local calendar day of `now`.
    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now)
    }

    /// Whether two local days fall in the same ISO week.
    pub fn same_iso_week(a: NaiveDate, b: NaiveDate) -> bool {
        a.iso_week() == b.iso_week()
    }

    /// Seconds from `now` until the next local midnight.
    pub fn secs_until_next_day(&self) -> i64 {
        self.secs_until(self.today().checked_add_days(Days::new(1)))
    }

    /// Seconds from `now` until next Monday's local midnight.
    pub fn secs_until_next_week(&self) -> i64 {
        let today = self.today();
        let days_left = 7_u32.saturating_sub(today.weekday().num_days_from_monday());
        self.secs_until(today.checked_add_days(Days::new(u64::from(days_left))))
    }

    /// Seconds remaining until `since + cooldown_secs`, or `None` once elapsed.
    pub fn cooldown_remaining(&self, since: DateTime<Utc>, cooldown_secs: i64) -> Option<i64> {
        let elapsed = self.now.signed_duration_since(since).num_seconds();
        let remaining = cooldown_secs.saturating_sub(elapsed);
        (remaining > 0).then_some(remaining)
    }

    fn secs_until(&self, day: Option<NaiveDate>) -> i64 {
        day.and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|midnight| midnight.and_local_timezone(self.offset).single())
            .map_or(0, |at| {
                at.with_timezone(&Utc)
                    .signed_duration_since(self.now)
                    .num_seconds()
                    .max(0)
            })
    }
}

/// Whole days from `earlier` to `later` (negative if reversed).
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    later.signed_duration_since(earlier).num_days()
}

/// `at` moved forward by `secs`, saturating at `at` on overflow.
pub fn advance(at: DateTime<Utc>, secs: i64) -> DateTime<Utc> {
    TimeDelta::try_seconds(secs)
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn today_respects_offset() {
        let catalog = Catalog::default();
        let config = ProgressionConfig::default();
        let mut env = Env::new(&catalog, &config, at(2026, 3, 2, 23, 30), Utc.fix());
        assert_eq!(env.today(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap_or_default());
        env.offset = FixedOffset::east_opt(3600).unwrap_or(Utc.fix());
        assert_eq!(env.today(), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap_or_default());
    }

    #[test]
    fn seconds_until_midnight() {
        let catalog = Catalog::default();
        let config = ProgressionConfig::default();
        let env = Env::new(&catalog, &config, at(2026, 3, 2, 23, 30), Utc.fix());
        assert_eq!(env.secs_until_next_day(), 1800);
    }

    #[test]
    fn seconds_until_monday() {
        let catalog = Catalog::default();
        let config = ProgressionConfig::default();
        // 2026-03-08 is a Sunday.
        let env = Env::new(&catalog, &config, at(2026, 3, 8, 12, 0), Utc.fix());
        assert_eq!(env.secs_until_next_week(), 12 * 3600);
    }

    #[test]
    fn cooldowns() {
        let catalog = Catalog::default();
        let config = ProgressionConfig::default();
        let now = at(2026, 3, 2, 12, 0);
        let env = Env::new(&catalog, &config, now, Utc.fix());
        assert_eq!(env.cooldown_remaining(advance(now, -100), 300), Some(200));
        assert_eq!(env.cooldown_remaining(advance(now, -300), 300), None);
    }

    #[test]
    fn iso_weeks() {
        let sun = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap_or_default();
        let mon = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap_or_default();
        let tue = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap_or_default();
        assert!(!Env::same_iso_week(sun, mon));
        assert!(Env::same_iso_week(mon, tue));
        assert_eq!(days_between(sun, tue), 2);
    }
}
