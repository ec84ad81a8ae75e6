//! Path management for tripsplit
//!
//! ## Path Resolution Order
//!
//! 1. `TRIPSPLIT_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/tripsplit` on Linux,
//!    `~/Library/Application Support/tripsplit` on macOS, `%APPDATA%\tripsplit`
//!    on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::TripsplitError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "TRIPSPLIT_DATA_DIR";

/// Manages all paths used by tripsplit
#[derive(Debug, Clone)]
pub struct TripsplitPaths {
    /// Base directory for all tripsplit data
    base_dir: PathBuf,
}

impl TripsplitPaths {
    /// Create a new TripsplitPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// override variable is not set.
    pub fn new() -> Result<Self, TripsplitError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create TripsplitPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to expenses.json
    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Get the path to members.json (family directory)
    pub fn members_file(&self) -> PathBuf {
        self.data_dir().join("members.json")
    }

    /// Get the path to contacts.json
    pub fn contacts_file(&self) -> PathBuf {
        self.data_dir().join("contacts.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), TripsplitError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TripsplitError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TripsplitError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if tripsplit has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, TripsplitError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| TripsplitError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("tripsplit"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripsplitPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripsplitPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().exists());
        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripsplitPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
        assert_eq!(
            paths.expenses_file(),
            temp_dir.path().join("data").join("expenses.json")
        );
        assert_eq!(
            paths.contacts_file(),
            temp_dir.path().join("data").join("contacts.json")
        );
    }
}
