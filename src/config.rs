//! Optional `jobtrack.toml` configuration
//!
//! The only setting today is the default database path; CLI flags always
//! win over the config file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JobtrackConfig {
    pub database: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("jobtrack.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("applications.db")
}

/// Load the config file if it exists; a missing file is not an error
pub fn load_config(path: Option<&Path>) -> Result<Option<JobtrackConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: JobtrackConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}

/// Resolve the store path: explicit flag, then config file, then default
pub fn resolve_database_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(config) = load_config(None)? {
        if let Some(database) = config.database {
            return Ok(PathBuf::from(database));
        }
    }
    Ok(default_database_path())
}

/// Create the store file's parent directories if needed
pub fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("jobtrack.toml");
        assert!(load_config(Some(&missing)).unwrap().is_none());
    }

    #[test]
    fn test_load_config_reads_database_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobtrack.toml");
        std::fs::write(&path, "database = \"/tmp/apps.db\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.database.as_deref(), Some("/tmp/apps.db"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobtrack.toml");
        std::fs::write(&path, "database = [not toml").unwrap();
        assert!(matches!(
            load_config(Some(&path)).unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn test_ensure_db_dir_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("deep").join("apps.db");
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().exists());
    }
}
