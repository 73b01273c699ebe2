//! State store, session runner and persistence for the Cadence ear-training
//! game.
//!
//! This crate wraps the progression rules in a single-writer store: every
//! command is reduced against a working copy of the player aggregate, then
//! committed or discarded as a whole.
//!
//! # Modules
//!
//! - [`clock`] -- Wall-clock abstraction with a controllable test clock.
//! - [`config`] -- Configuration loading from `cadence-config.yaml` into
//!   strongly-typed structs.
//! - [`engine`] -- The reducer, its phases and the [`GameStore`].
//! - [`notifications`] -- Bounded queue of player-facing notifications.
//! - [`persistence`] -- Save blob encoding and [`SaveStore`] media.
//! - [`runner`] -- Async session loop with periodic ticks and background
//!   saves.
//!
//! [`GameStore`]: engine::GameStore
//! [`SaveStore`]: persistence::SaveStore

pub mod clock;
pub mod config;
pub mod engine;
pub mod notifications;
pub mod persistence;
pub mod runner;

pub use clock::{FixedClock, GameClock, SystemClock};
pub use config::{ConfigError, GameConfig};
pub use engine::{Applied, GameStore, reduce};
pub use persistence::{FileSaveStore, MemorySaveStore, PersistError, SaveStore};
pub use runner::{RunnerError, SessionHandle, SessionReply, SessionSummary, run_session};
