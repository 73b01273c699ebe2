//! Line-oriented shell for the Cadence progression engine.
//!
//! Reads one JSON [`Command`] per line from stdin, submits it to a running
//! session and prints one JSON reply per line on stdout. Logs go to stderr.
//!
//! ```text
//! {"type":"add_xp_and_coins_from_training","base_xp":100,"base_coins":10,"context":{}}
//! {"type":"adopt_pet","pet_id":"melody_cat"}
//! ```
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the first argument or `cadence-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load the content catalog
//! 4. Load the save
//! 5. Start the session runner
//! 6. Pump stdin into the session until EOF
//! 7. Wait for the final save

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use cadence_catalog::Catalog;
use cadence_core::clock::SystemClock;
use cadence_core::config::GameConfig;
use cadence_core::engine::GameStore;
use cadence_core::persistence::{self, FileSaveStore};
use cadence_core::runner::{self, SessionReply};
use cadence_types::Command;
use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

const DEFAULT_CONFIG_PATH: &str = "cadence-config.yaml";

/// One line written to stdout.
#[derive(Debug, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
enum ReplyLine<'a> {
    /// The session answered a command.
    Outcome {
        command: &'static str,
        #[serde(flatten)]
        session_reply: &'a SessionReply,
    },
    /// The input line was not a command.
    Invalid { error: String },
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if startup fails, stdin or stdout fail, or the final
/// save cannot be written.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Configuration.
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, found) = load_config(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // 2. Logging.
    init_logging(&config)?;
    info!(
        config = %config_path.display(),
        found,
        save_path = %config.persistence.save_path.display(),
        tick_interval_secs = config.session.tick_interval_secs,
        "cadence starting"
    );

    // 3. Catalog.
    let catalog = load_catalog(&config).context("loading the content catalog")?;

    // 4. Save.
    let saves = Arc::new(FileSaveStore::new(config.persistence.save_path.clone()));
    let aggregate = persistence::load_aggregate(saves.as_ref());

    // 5. Session.
    let store = GameStore::new(
        aggregate,
        Arc::new(catalog),
        config.progression.clone(),
        config.calendar.offset()?,
        Box::new(SystemClock),
        config.session.seed,
        config.session.notification_capacity,
    );
    let (handle, requests) = runner::channel(16);
    let session = tokio::spawn(runner::run_session(
        store,
        saves,
        requests,
        Duration::from_secs(config.session.tick_interval_secs),
    ));

    // 6. Input pump.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let encoded = match serde_json::from_str::<Command>(line) {
            Ok(command) => {
                let Some(reply) = handle.submit(command.clone()).await else {
                    warn!("session stopped before the input ended");
                    break;
                };
                serde_json::to_string(&ReplyLine::Outcome {
                    command: command.name(),
                    session_reply: &reply,
                })?
            }
            Err(err) => {
                warn!(error = %err, "unreadable command line");
                serde_json::to_string(&ReplyLine::Invalid {
                    error: err.to_string(),
                })?
            }
        };
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await.context("writing a reply")?;
    }

    // 7. Shutdown.
    drop(handle);
    let summary = session
        .await
        .context("session task failed")?
        .context("final save failed")?;
    info!(
        commands = summary.commands,
        ticks = summary.ticks,
        "cadence stopped"
    );
    Ok(())
}

/// Load the configuration file, or defaults when it does not exist.
fn load_config(path: &Path) -> Result<(GameConfig, bool), CliError> {
    if path.exists() {
        Ok((GameConfig::from_file(path)?, true))
    } else {
        Ok((GameConfig::parse("")?, false))
    }
}

/// The configured catalog file, or the built-in catalog.
fn load_catalog(config: &GameConfig) -> Result<Catalog, CliError> {
    if let Some(path) = &config.persistence.catalog_path {
        return Ok(Catalog::from_file(path)?);
    }
    let catalog = Catalog::builtin();
    catalog.validate()?;
    Ok(catalog)
}

fn init_logging(config: &GameConfig) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    let installed = if config.logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CliError::Logging {
        message: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cadence_types::CommandOutcome;

    use super::*;

    #[test]
    fn outcome_lines_are_tagged_and_flattened() {
        let reply = SessionReply {
            outcome: CommandOutcome::accepted(),
            notifications: Vec::new(),
        };
        let line = serde_json::to_value(ReplyLine::Outcome {
            command: "feed_pet",
            session_reply: &reply,
        })
        .unwrap();
        assert_eq!(line.get("reply").unwrap(), "outcome");
        assert_eq!(line.get("command").unwrap(), "feed_pet");
        let outcome = line.get("outcome").unwrap();
        assert_eq!(outcome.get("success").unwrap(), true);
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let (config, found) = load_config(Path::new("no-such-cadence-config.yaml")).unwrap();
        assert!(!found);
        assert_eq!(config, GameConfig::parse("").unwrap());
    }
}
