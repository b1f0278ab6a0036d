use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the store directory, local or in the home directory
pub const STORE_DIR_NAME: &str = ".eisenhower";
pub const TASKS_FILE_NAME: &str = "tasks.json";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const LOG_FILE_NAME: &str = "eisenhower.log";

/// Get the store directory - checks for a local .eisenhower first, then falls back to ~/.eisenhower
pub fn get_store_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;

    if let Some(local_dir) = find_local_store(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(STORE_DIR_NAME))
}

/// Find a local store directory by walking up the directory tree
pub fn find_local_store(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let store_dir = current.join(STORE_DIR_NAME);
        if store_dir.is_dir() {
            return Some(store_dir);
        }

        current = current.parent()?;
    }
}

/// Ensure the store directory exists
pub fn ensure_store_dir() -> Result<PathBuf> {
    let dir = get_store_dir()?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Create a directory (and parents) if missing
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Initialize a local store directory inside `dir`
pub fn init_local_store(dir: &Path) -> Result<PathBuf> {
    let store_dir = dir.join(STORE_DIR_NAME);

    if store_dir.exists() {
        anyhow::bail!("Store directory already exists: {}", store_dir.display());
    }

    fs::create_dir_all(&store_dir)
        .with_context(|| format!("Failed to create directory: {}", store_dir.display()))?;

    Ok(store_dir)
}

/// Resolve the task file: an explicit path wins, otherwise tasks.json in the store directory
pub fn resolve_tasks_file(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(ensure_store_dir()?.join(TASKS_FILE_NAME)),
    }
}

/// Directory holding the task file (settings and logs live next to it)
pub fn sibling_dir(tasks_file: &Path) -> PathBuf {
    match tasks_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = sibling_dir(path);

    let mut temp_file = NamedTempFile::new_in(&dir).context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return empty string if file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Create a backup of a file with timestamp
pub fn backup_file<P: AsRef<Path>>(path: P) -> Result<Option<PathBuf>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = path.with_extension(format!("bak.{}.json", timestamp));

    fs::copy(path, &backup_path)
        .with_context(|| format!("Failed to backup file: {}", path.display()))?;

    Ok(Some(backup_path))
}
