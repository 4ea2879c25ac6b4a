//! Stash of drafts whose submission failed in transit.
//!
//! When the remote service cannot be reached the user's input is kept here
//! rather than thrown away, so it can be re-submitted later on request.
//! Drafts are stored as JSON lines under an exclusive file lock. Records are
//! never stored locally; only the raw drafts are.

use crate::draft::Draft;
use crate::Result;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File name of the stash inside the data directory
pub const STASH_FILE: &str = "pending_drafts.jsonl";

/// A draft waiting for a manual retry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StashedDraft {
    pub id: Uuid,
    pub stashed_at: DateTime<Utc>,
    pub draft: Draft,
}

/// JSONL-backed draft stash with file locking
pub struct DraftStash {
    path: PathBuf,
}

impl DraftStash {
    /// Create a stash backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The stash inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STASH_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a draft, returning its stash id
    pub fn push(&self, draft: &Draft) -> Result<Uuid> {
        self.ensure_parent_dir()?;

        let entry = StashedDraft {
            id: Uuid::new_v4(),
            stashed_at: Utc::now(),
            draft: draft.clone(),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(&entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::info!("Stashed {} draft {}", draft.label(), entry.id);
        Ok(entry.id)
    }

    /// All stashed drafts, oldest first
    ///
    /// Lines that fail to parse are logged and skipped.
    pub fn list(&self) -> Result<Vec<StashedDraft>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;
        let entries = read_entries(&file);
        file.unlock()?;

        let entries = entries?;
        tracing::debug!("Read {} stashed drafts", entries.len());
        Ok(entries)
    }

    /// Remove the given drafts, returning how many were removed
    pub fn remove(&self, ids: &[Uuid]) -> Result<usize> {
        if !self.path.exists() || ids.is_empty() {
            return Ok(0);
        }

        let file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        file.lock_exclusive()?;

        let result = rewrite_without(&file, ids);

        file.unlock()?;

        let removed = result?;
        tracing::debug!("Removed {} stashed drafts", removed);
        Ok(removed)
    }
}

fn read_entries(file: &File) -> Result<Vec<StashedDraft>> {
    let reader = BufReader::new(file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<StashedDraft>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Failed to parse stashed draft at line {}: {}", line_num + 1, e);
            }
        }
    }

    Ok(entries)
}

fn rewrite_without(mut file: &File, ids: &[Uuid]) -> Result<usize> {
    use std::io::{Seek, SeekFrom};

    let entries = read_entries(file)?;
    let before = entries.len();
    let kept: Vec<_> = entries.into_iter().filter(|e| !ids.contains(&e.id)).collect();

    let mut contents = String::new();
    for entry in &kept {
        contents.push_str(&serde_json::to_string(entry)?);
        contents.push('\n');
    }

    file.seek(SeekFrom::Start(0))?;
    file.set_len(0)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    Ok(before - kept.len())
}
