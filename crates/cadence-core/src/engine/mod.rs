//! The state store: a pure reducer plus the session object that owns it.
//!
//! [`reduce`] applies one [`Command`] to a working copy of the aggregate
//! and returns the new aggregate with the notifications it produced, or
//! the first rejection. Nothing is committed on rejection.
//!
//! [`GameStore`] is the single owner of the live aggregate for a session.
//! It stamps commands with its clock, commits accepted transitions, maps
//! rejections to [`CommandOutcome`]s and feeds the notification queue.
//!
//! # Modules
//!
//! - [`commands`] -- One handler per command.
//! - [`pipeline`] -- Calendar, routing and achievement phases around each
//!   handler.

pub mod commands;
pub mod pipeline;

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info};

use cadence_catalog::Catalog;
use cadence_progression::{Effects, Env, ProgressionConfig, ProgressionError};
use cadence_types::{Command, CommandOutcome, Notification, PlayerAggregate};

use crate::clock::GameClock;
use crate::notifications::NotificationQueue;
use crate::persistence;

/// Inputs for one reduction besides the aggregate and the command.
pub struct Context<'a, R: Rng> {
    /// Catalog, tunables, time and calendar offset.
    pub env: Env<'a>,
    /// Randomness for mission draws, pet requests and child names.
    pub rng: &'a mut R,
}

/// The result of an accepted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The aggregate after the command.
    pub aggregate: PlayerAggregate,
    /// Notifications in production order.
    pub notifications: Vec<Notification>,
    /// Whether the caller should persist immediately.
    pub save_requested: bool,
}

/// Apply a command to a copy of `aggregate`.
///
/// # Order of operations
///
/// 1. Reset short-circuits to the default aggregate
/// 2. Mission refresh and day-boundary catch-up
/// 3. The command handler
/// 4. Event routing into missions and quests
/// 5. Achievement scan
///
/// # Errors
///
/// Returns the handler's [`ProgressionError`]; the input is untouched.
pub fn reduce<R: Rng>(
    aggregate: &PlayerAggregate,
    command: &Command,
    ctx: &mut Context<'_, R>,
) -> Result<Transition, ProgressionError> {
    let env = ctx.env;
    let mut effects = Effects::new(env.now);

    // 1. Reset
    if matches!(command, Command::ResetGame) {
        effects.info("game_reset");
        return Ok(Transition {
            aggregate: PlayerAggregate::default(),
            notifications: effects.into_notifications(),
            save_requested: true,
        });
    }

    let mut working = aggregate.clone();
    // 2. Calendar
    pipeline::before_command(&mut working, &env, &mut *ctx.rng, &mut effects);
    // 3. Handler
    commands::dispatch(&mut working, command, &env, &mut *ctx.rng, &mut effects)?;
    // 4-5. Routing and achievements
    pipeline::after_command(&mut working, env.catalog, &mut effects);

    Ok(Transition {
        aggregate: working,
        notifications: effects.into_notifications(),
        save_requested: matches!(command, Command::SaveGameExplicitly),
    })
}

/// What [`GameStore::apply`] reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Outcome for the UI.
    pub outcome: CommandOutcome,
    /// Whether the aggregate should be persisted now.
    pub save_requested: bool,
}

/// Owner of the live aggregate for one session.
pub struct GameStore {
    aggregate: PlayerAggregate,
    catalog: Arc<Catalog>,
    config: ProgressionConfig,
    offset: FixedOffset,
    clock: Box<dyn GameClock>,
    rng: StdRng,
    notifications: NotificationQueue,
}

impl GameStore {
    /// Build a store around a loaded aggregate, repairing its derived fields.
    pub fn new(
        mut aggregate: PlayerAggregate,
        catalog: Arc<Catalog>,
        config: ProgressionConfig,
        offset: FixedOffset,
        clock: Box<dyn GameClock>,
        seed: Option<u64>,
        notification_capacity: usize,
    ) -> Self {
        persistence::restore_invariants(&mut aggregate, &catalog, &config);
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            aggregate,
            catalog,
            config,
            offset,
            clock,
            rng,
            notifications: NotificationQueue::new(notification_capacity),
        }
    }

    /// Apply a command at the clock's current time.
    pub fn apply(&mut self, command: &Command) -> Applied {
        let now = self.clock.now();
        self.apply_at(command, now)
    }

    /// Apply a command at an explicit time.
    pub fn apply_at(&mut self, command: &Command, now: DateTime<Utc>) -> Applied {
        let env = Env::new(&self.catalog, &self.config, now, self.offset);
        let mut ctx = Context {
            env,
            rng: &mut self.rng,
        };
        match reduce(&self.aggregate, command, &mut ctx) {
            Ok(transition) => {
                if matches!(command, Command::ResetGame) {
                    info!("game reset to a fresh aggregate");
                }
                debug!(
                    command = command.name(),
                    notifications = transition.notifications.len(),
                    "command applied"
                );
                self.aggregate = transition.aggregate;
                self.notifications.extend(transition.notifications);
                Applied {
                    outcome: CommandOutcome::accepted(),
                    save_requested: transition.save_requested,
                }
            }
            Err(err) => {
                if err.is_fault() {
                    error!(command = command.name(), error = %err, "catalog integrity fault");
                } else {
                    debug!(command = command.name(), reason = ?err.reason(), error = %err, "command rejected");
                }
                let outcome = CommandOutcome::rejected(err.reason(), err.to_string());
                let outcome = match err.retry_after_secs() {
                    Some(secs) => outcome.with_retry_after(secs),
                    None => outcome,
                };
                Applied {
                    outcome,
                    save_requested: false,
                }
            }
        }
    }

    /// The live aggregate.
    pub const fn aggregate(&self) -> &PlayerAggregate {
        &self.aggregate
    }

    /// The catalog in use.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Take every queued notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Queued notifications without draining them.
    pub const fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }
}

impl std::fmt::Debug for GameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameStore")
            .field("level", &self.aggregate.economy.level)
            .field("offset", &self.offset)
            .field("queued", &self.notifications.len())
            .finish_non_exhaustive()
    }
}
