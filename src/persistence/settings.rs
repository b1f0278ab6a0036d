use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_snooze_days() -> i64 {
    7
}

/// User settings stored in settings.json next to the task file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// How far the snooze key pushes a task
    #[serde(default = "default_snooze_days")]
    pub snooze_days: i64,
    /// Due date the schedule key sets, in days from today
    #[serde(default)]
    pub schedule_days: i64,
    /// Show the completed bucket on startup
    #[serde(default)]
    pub show_completed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snooze_days: default_snooze_days(),
            schedule_days: 0,
            show_completed: false,
        }
    }
}

/// Load settings, falling back to defaults when the file doesn't exist
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Invalid settings file: {}", path.display()))?;
    Ok(settings)
}

pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_settings() {
        let temp_dir = tempdir().unwrap();
        let settings = load_settings(temp_dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.snooze_days, 7);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "show_completed": true }"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert!(settings.show_completed);
        assert_eq!(settings.snooze_days, 7);
        assert_eq!(settings.schedule_days, 0);
    }

    #[test]
    fn test_save_and_load_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let settings = Settings {
            snooze_days: 3,
            schedule_days: 2,
            show_completed: true,
        };
        save_settings(&path, &settings).unwrap();

        assert_eq!(load_settings(&path).unwrap(), settings);
    }
}
