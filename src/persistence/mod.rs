pub mod files;
pub mod migration;
pub mod serializer;
pub mod settings;

pub use files::{
    atomic_write, ensure_dir, init_local_store, resolve_tasks_file, sibling_dir,
    LOG_FILE_NAME, SETTINGS_FILE_NAME,
};
pub use migration::CURRENT_VERSION;
pub use serializer::{JsonStore, TaskStore};
pub use settings::{load_settings, save_settings, Settings};
