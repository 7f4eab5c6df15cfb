//! Path utilities for determining data storage locations.
//!
//! Data is stored in `~/.todo-keeper/`. Project configuration lives next to
//! the project in `.todo-keeper/config.yaml`.

use std::path::{Path, PathBuf};

/// The base directory name for todo-keeper data.
pub const DATA_DIR_NAME: &str = ".todo-keeper";

/// The database filename.
pub const DATABASE_FILENAME: &str = "storage.sqlite3";

/// Get the base data directory.
///
/// Returns `~/.todo-keeper/` or `None` if the home directory cannot be
/// determined.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

/// Get the default database path, `~/.todo-keeper/storage.sqlite3`.
///
/// Falls back to `<base_dir>/.todo-keeper/storage.sqlite3` when there is no
/// home directory.
#[must_use]
pub fn default_db_path(base_dir: &Path) -> PathBuf {
    data_dir().unwrap_or_else(|| base_dir.join(DATA_DIR_NAME)).join(DATABASE_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_returns_home_based_path() {
        if let Some(home) = dirs::home_dir() {
            let data = data_dir().unwrap();
            assert_eq!(data, home.join(".todo-keeper"));
        }
    }

    #[test]
    fn test_default_db_path_ends_with_filename() {
        let path = default_db_path(Path::new("/some/project"));
        assert!(path.ends_with(Path::new(DATA_DIR_NAME).join(DATABASE_FILENAME)));
    }
}
