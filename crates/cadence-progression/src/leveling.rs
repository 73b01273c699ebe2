//! Player leveling.
//!
//! The level is a pure function of lifetime XP over an ascending threshold
//! table: level `n` (1-based) is the index of the highest threshold not
//! above the player's XP. [`apply_xp`] is the only way XP enters the
//! economy, so `level == level_for(xp)` holds after every command.

use cadence_types::{Economy, NotificationKind, NotificationPayload};

use crate::effects::{Effects, MissionEvent};

/// Level before and after an XP grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    /// Level before the grant.
    pub old_level: u32,
    /// Level after the grant.
    pub new_level: u32,
}

impl LevelChange {
    /// Whether the grant raised the level.
    pub const fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }
}

/// Level for a lifetime XP total. Never below 1.
pub fn level_for(thresholds: &[u64], xp: u64) -> u32 {
    let reached = thresholds.iter().take_while(|t| **t <= xp).count();
    u32::try_from(reached).unwrap_or(u32::MAX).max(1)
}

/// XP still needed for the next level, or `None` at the top of the table.
pub fn xp_to_next_level(thresholds: &[u64], xp: u64) -> Option<u64> {
    thresholds
        .iter()
        .find(|t| **t > xp)
        .map(|next| next.saturating_sub(xp))
}

/// Add XP (saturating), recompute the level and emit one `LevelUp`
/// notification when it rises. The notification carries the XP left to
/// the following level.
pub fn apply_xp(
    economy: &mut Economy,
    thresholds: &[u64],
    delta: u64,
    effects: &mut Effects,
) -> LevelChange {
    let old_level = economy.level;
    economy.xp = economy.xp.saturating_add(delta);
    economy.level = level_for(thresholds, economy.xp);
    let change = LevelChange {
        old_level,
        new_level: economy.level,
    };
    if delta > 0 {
        effects.event(MissionEvent::EarnXp(delta));
    }
    if change.leveled_up() {
        effects.notify(
            NotificationKind::LevelUp,
            "notification.level_up",
            NotificationPayload::LevelUp {
                old_level,
                new_level: change.new_level,
                xp_to_next: xp_to_next_level(thresholds, economy.xp),
            },
        );
    }
    change
}
