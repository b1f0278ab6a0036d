use super::files::{atomic_write, backup_file, read_file};
use super::migration::{Document, StoredSchema, CURRENT_VERSION};
use crate::domain::Task;
use anyhow::{Context, Result};
use std::cell::Cell;
use std::path::{Path, PathBuf};

/// Persistence collaborator for the task collection
pub trait TaskStore {
    /// Write the whole collection
    fn save(&self, tasks: &[Task]) -> Result<()>;

    /// Read the collection; a missing store is an empty collection
    fn load(&self) -> Result<Vec<Task>>;
}

/// JSON file store, written in the current schema and read in any known one.
///
/// The first write over a file in an older or unreadable layout copies it
/// to a timestamped backup first.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    checked_backup: Cell<bool>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            checked_backup: Cell::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and detect the stored layout without upgrading it.
    /// Returns `None` when there is nothing stored yet.
    pub fn read_schema(&self) -> Result<Option<StoredSchema>> {
        let content = read_file(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse task file: {}", self.path.display()))?;
        let schema = StoredSchema::detect(value)
            .with_context(|| format!("Unreadable task file: {}", self.path.display()))?;
        Ok(Some(schema))
    }

    /// Back up the file unless it is missing, empty or already current.
    /// Only the first call per store does any work.
    pub fn backup_if_outdated(&self) -> Result<Option<PathBuf>> {
        if self.checked_backup.replace(true) {
            return Ok(None);
        }
        let outdated = match self.read_schema() {
            Ok(Some(schema)) => schema.version() != CURRENT_VERSION,
            Ok(None) => false,
            Err(_) => true,
        };
        if !outdated {
            return Ok(None);
        }
        let backup = backup_file(&self.path)?;
        if let Some(backup) = &backup {
            tracing::info!(backup = %backup.display(), "backed up task file before rewriting");
        }
        Ok(backup)
    }
}

impl TaskStore for JsonStore {
    fn save(&self, tasks: &[Task]) -> Result<()> {
        self.backup_if_outdated()?;
        let json = serde_json::to_string_pretty(&Document::from_tasks(tasks))?;
        atomic_write(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    fn load(&self) -> Result<Vec<Task>> {
        let tasks = match self.read_schema()? {
            Some(schema) => schema.into_current().into_tasks(),
            None => Vec::new(),
        };
        tracing::info!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }
}
