//! Cross-session progress: unlocked Classic levels, per-level checkpoints, and
//! the Survival & Hardcore high scores
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the progress file, relative to the current directory
pub(crate) const DEFAULT_PROGRESS_FILE: &str = "progress.json";

/// The persisted progress record
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Progress {
    /// Highest Classic level the player may start from
    #[serde(alias = "MaxUnlockedLevel")]
    pub(crate) max_unlocked_level: u32,

    /// Snake length & score recorded on completing each Classic level, keyed
    /// by level number
    #[serde(alias = "LevelData")]
    pub(crate) level_data: BTreeMap<u32, Checkpoint>,

    #[serde(alias = "HardcoreHighScore")]
    pub(crate) hardcore_high_score: u32,

    #[serde(alias = "SurvivalHighScore")]
    pub(crate) survival_high_score: u32,
}

impl Default for Progress {
    fn default() -> Progress {
        Progress {
            max_unlocked_level: 1,
            level_data: BTreeMap::new(),
            hardcore_high_score: 0,
            survival_high_score: 0,
        }
    }
}

/// State of the snake at the moment a Classic level was completed
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Checkpoint {
    #[serde(alias = "SnakeLength")]
    pub(crate) snake_length: u32,
    #[serde(alias = "Score")]
    pub(crate) score: u32,
}

/// A place where a [`Progress`] record can be kept
pub(crate) trait Storage {
    /// Read the stored record.  Returns `Ok(None)` if nothing has been stored
    /// yet.
    fn read(&self) -> Result<Option<Progress>, LoadError>;

    /// Replace the stored record with `progress`
    fn write(&mut self, progress: &Progress) -> Result<(), SaveError>;
}

/// Progress stored as a JSON document on disk
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub(crate) fn new<P: Into<PathBuf>>(path: P) -> FileStorage {
        FileStorage { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileStorage {
    fn default() -> FileStorage {
        FileStorage::new(DEFAULT_PROGRESS_FILE)
    }
}

impl Storage for FileStorage {
    fn read(&self) -> Result<Option<Progress>, LoadError> {
        let src = match fs_err::read(&self.path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LoadError::read(e)),
        };
        serde_json::from_slice(&src)
            .map(Some)
            .map_err(LoadError::deserialize)
    }

    fn write(&mut self, progress: &Progress) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string_pretty(progress).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(&self.path, &src).map_err(SaveError::write)?;
        Ok(())
    }
}

/// Progress kept in memory only.  Reads & writes can be made to fail in order
/// to exercise the fallback paths.
#[cfg(test)]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MemoryStorage {
    pub(crate) record: Option<Progress>,
    pub(crate) fail_reads: bool,
    pub(crate) fail_writes: bool,
    pub(crate) writes: usize,
}

#[cfg(test)]
impl MemoryStorage {
    pub(crate) fn with_record(record: Progress) -> MemoryStorage {
        MemoryStorage {
            record: Some(record),
            ..MemoryStorage::default()
        }
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<Progress>, LoadError> {
        if self.fail_reads {
            Err(LoadError::read(std::io::Error::other("simulated read failure")))
        } else {
            Ok(self.record.clone())
        }
    }

    fn write(&mut self, progress: &Progress) -> Result<(), SaveError> {
        if self.fail_writes {
            return Err(SaveError::write(std::io::Error::other(
                "simulated write failure",
            )));
        }
        self.record = Some(progress.clone());
        self.writes += 1;
        Ok(())
    }
}

/// The progress record together with the storage it is persisted to.
///
/// None of the methods here fail: problems reading or writing the storage are
/// logged and otherwise ignored, as losing progress should never interrupt a
/// game.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ProgressStore<S = FileStorage> {
    storage: S,
    record: Progress,
}

impl<S: Storage> ProgressStore<S> {
    /// Create a store backed by `storage` and load its record
    pub(crate) fn open(storage: S) -> ProgressStore<S> {
        let mut store = ProgressStore {
            storage,
            record: Progress::default(),
        };
        store.load();
        store
    }

    /// Replace the in-memory record with the stored one.  If nothing is stored
    /// or the record cannot be read, a fresh record with only level 1
    /// unlocked is used instead.
    pub(crate) fn load(&mut self) -> &Progress {
        self.record = match self.storage.read() {
            Ok(Some(mut record)) => {
                record.max_unlocked_level = record.max_unlocked_level.max(1);
                record
            }
            Ok(None) => Progress::default(),
            Err(e) => {
                tracing::warn!(error = %ErrorChain(&e), "Using fresh progress record");
                Progress::default()
            }
        };
        &self.record
    }

    /// Write the in-memory record to storage
    pub(crate) fn save(&mut self) {
        if let Err(e) = self.storage.write(&self.record) {
            tracing::warn!(error = %ErrorChain(&e), "Progress was not saved");
        }
    }

    pub(crate) fn record(&self) -> &Progress {
        &self.record
    }

    pub(crate) fn max_unlocked_level(&self) -> u32 {
        self.record.max_unlocked_level
    }

    pub(crate) fn checkpoint(&self, level: u32) -> Option<Checkpoint> {
        self.record.level_data.get(&level).copied()
    }

    /// Remember the state of the snake on completing Classic level `level`.
    /// The record is not saved.
    pub(crate) fn record_checkpoint(&mut self, level: u32, checkpoint: Checkpoint) {
        self.record.level_data.insert(level, checkpoint);
    }

    /// If `level` is higher than the highest unlocked level, unlock it and
    /// save.  Returns `true` if the record changed.
    pub(crate) fn update_max_unlocked_level(&mut self, level: u32) -> bool {
        if level > self.record.max_unlocked_level {
            self.record.max_unlocked_level = level;
            self.save();
            true
        } else {
            false
        }
    }

    /// If `score` beats the Hardcore high score, record it and save.  Returns
    /// `true` on a new high score.
    pub(crate) fn record_hardcore_score(&mut self, score: u32) -> bool {
        if score > self.record.hardcore_high_score {
            self.record.hardcore_high_score = score;
            self.save();
            true
        } else {
            false
        }
    }

    /// If `score` beats the Survival high score, record it and save.  Returns
    /// `true` on a new high score.
    pub(crate) fn record_survival_score(&mut self, score: u32) -> bool {
        if score > self.record.survival_high_score {
            self.record.survival_high_score = score;
            self.save();
            true
        } else {
            false
        }
    }

    pub(crate) fn into_storage(self) -> S {
        self.storage
    }
}

/// Display an error followed by each of its sources
#[derive(Clone, Copy, Debug)]
pub(crate) struct ErrorChain<'a>(pub(crate) &'a (dyn std::error::Error + 'static));

impl std::fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(e) = source {
            write!(f, ": {e}")?;
            source = e.source();
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("Failed to save progress to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize progress")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write progress file")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read progress from disk")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to read progress file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize progress")]
    Deserialize(#[source] serde_json::Error),
}
