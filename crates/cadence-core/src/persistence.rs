//! Save blob encoding and the storage medium behind it.
//!
//! A save is one JSON document of the [`PlayerAggregate`]. Fields missing
//! from older saves are backfilled from the default aggregate by serde; a
//! blob that cannot be parsed at all is logged as a fault and replaced by
//! a fresh aggregate so the game stays playable.
//!
//! A parsed blob may still disagree with the rules (hand-edited saves,
//! older tables). [`restore_invariants`] brings derived fields back in line
//! before a session starts.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cadence_catalog::Catalog;
use cadence_progression::{ProgressionConfig, level_for};
use cadence_types::{METER_MAX, PlayerAggregate};
use tracing::{error, info, warn};

/// Errors raised by a [`SaveStore`].
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading or writing the medium failed.
    #[error("save I/O failed for {path}: {source}")]
    Io {
        /// Location of the save.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The aggregate could not be encoded.
    #[error("failed to encode save: {source}")]
    Encode {
        /// The underlying serializer error.
        #[from]
        source: serde_json::Error,
    },

    /// The in-memory medium's lock was poisoned.
    #[error("save store lock poisoned: {message}")]
    Poisoned {
        /// Description of the poisoning.
        message: String,
    },
}

/// A key-value medium holding one save blob.
pub trait SaveStore: Send + Sync {
    /// The stored blob, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the medium cannot be read.
    fn load(&self) -> Result<Option<String>, PersistError>;

    /// Replace the stored blob.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the medium cannot be written.
    fn save(&self, blob: &str) -> Result<(), PersistError>;
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Serialize an aggregate to its save blob.
///
/// # Errors
///
/// Returns [`PersistError::Encode`] if serialization fails.
pub fn encode(aggregate: &PlayerAggregate) -> Result<String, PersistError> {
    Ok(serde_json::to_string(aggregate)?)
}

/// Parse a save blob, falling back to the default aggregate.
pub fn decode(blob: &str) -> PlayerAggregate {
    match serde_json::from_str(blob) {
        Ok(aggregate) => aggregate,
        Err(err) => {
            error!(error = %err, bytes = blob.len(), "unparsable save, starting fresh");
            PlayerAggregate::default()
        }
    }
}

/// Load the aggregate from a store.
///
/// A missing save, an unreadable medium and an unparsable blob all yield
/// the default aggregate.
pub fn load_aggregate(store: &dyn SaveStore) -> PlayerAggregate {
    match store.load() {
        Ok(Some(blob)) => {
            let aggregate = decode(&blob);
            info!(
                level = aggregate.economy.level,
                currency = aggregate.economy.currency,
                "save loaded"
            );
            aggregate
        }
        Ok(None) => {
            info!("no save found, starting fresh");
            PlayerAggregate::default()
        }
        Err(err) => {
            warn!(error = %err, "save unreadable, starting fresh");
            PlayerAggregate::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn clamp_meter(meter: &mut u32, repairs: &mut u32) {
    if *meter > METER_MAX {
        *meter = METER_MAX;
        *repairs = repairs.saturating_add(1);
    }
}

/// Repair derived fields a loaded aggregate may carry out of range.
///
/// Recomputes the player level from lifetime XP, clamps pet and family
/// meters to `0..=METER_MAX`, clamps pet levels to `1..=max_level` and
/// drops an active pet the player does not own. Returns the number of
/// fields changed.
pub fn restore_invariants(
    aggregate: &mut PlayerAggregate,
    catalog: &Catalog,
    config: &ProgressionConfig,
) -> u32 {
    let mut repairs = 0_u32;

    let level = level_for(&catalog.xp_thresholds, aggregate.economy.xp);
    if aggregate.economy.level != level {
        aggregate.economy.level = level;
        repairs = repairs.saturating_add(1);
    }

    let max_level = config.pets.max_level.max(1);
    for pet in aggregate.pets.instances.values_mut() {
        clamp_meter(&mut pet.hunger, &mut repairs);
        clamp_meter(&mut pet.happiness, &mut repairs);
        let level = pet.level.clamp(1, max_level);
        if pet.level != level {
            pet.level = level;
            repairs = repairs.saturating_add(1);
        }
    }

    let pets = &mut aggregate.pets;
    if pets
        .active
        .as_ref()
        .is_some_and(|id| !pets.owned.contains(id) || !pets.instances.contains_key(id))
    {
        pets.active = None;
        repairs = repairs.saturating_add(1);
    }

    let family = &mut aggregate.family;
    clamp_meter(&mut family.marriage_happiness, &mut repairs);
    if let Some(child) = family.child.as_mut() {
        for meter in [
            &mut child.hunger,
            &mut child.cleanliness,
            &mut child.affection,
            &mut child.happiness,
            &mut child.sleepiness,
        ] {
            clamp_meter(meter, &mut repairs);
        }
    }

    if repairs > 0 {
        warn!(repairs, level = aggregate.economy.level, "save repaired on load");
    }
    repairs
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// A save file on disk, replaced atomically through a sibling temp file.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    path: PathBuf,
}

impl FileSaveStore {
    /// A store writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the save file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SaveStore for FileSaveStore {
    fn load(&self) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn save(&self, blob: &str) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, blob).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

/// A save held in memory, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySaveStore {
    blob: Mutex<Option<String>>,
    writes: Mutex<u64>,
}

impl MemorySaveStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with `blob`.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
            writes: Mutex::new(0),
        }
    }

    /// Number of successful writes.
    pub fn writes(&self) -> u64 {
        self.writes.lock().map_or(0, |w| *w)
    }
}

fn poisoned(err: &impl std::fmt::Display) -> PersistError {
    PersistError::Poisoned {
        message: err.to_string(),
    }
}

impl SaveStore for MemorySaveStore {
    fn load(&self) -> Result<Option<String>, PersistError> {
        let blob = self.blob.lock().map_err(|e| poisoned(&e))?;
        Ok(blob.clone())
    }

    fn save(&self, blob: &str) -> Result<(), PersistError> {
        *self.blob.lock().map_err(|e| poisoned(&e))? = Some(blob.to_owned());
        let mut writes = self.writes.lock().map_err(|e| poisoned(&e))?;
        *writes = writes.saturating_add(1);
        Ok(())
    }
}
