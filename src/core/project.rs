//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents a PQT project
///
/// A project is a directory containing a `.pqt/` marker (config) and a
/// `data/` directory holding the three table files.
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .pqt/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            let pqt_dir = current.join(".pqt");
            if pqt_dir.is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let pqt_dir = root.join(".pqt");
        if pqt_dir.exists() {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }

        Self::create_structure(&root)?;
        Ok(Self { root })
    }

    /// Force initialization even if .pqt/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::create_structure(&root)?;
        Ok(Self { root })
    }

    fn create_structure(root: &Path) -> Result<(), ProjectError> {
        let pqt_dir = root.join(".pqt");
        std::fs::create_dir_all(&pqt_dir).map_err(|e| ProjectError::IoError(e.to_string()))?;

        let config_path = pqt_dir.join("config.yaml");
        if !config_path.exists() {
            std::fs::write(&config_path, Self::default_config())
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        std::fs::create_dir_all(root.join("data"))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# PQT Project Configuration

# Default recipient for `--email` without an address
# mail_to: ""

# SMTP transport for report/order e-mails.
# The password is read from the PQT_SMTP_PASSWORD environment variable.
# smtp:
#   host: "smtp.example.com"
#   port: 587
#   username: ""
#   from: "PQT Reports <reports@example.com>"
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .pqt directory
    pub fn pqt_dir(&self) -> PathBuf {
        self.root.join(".pqt")
    }

    /// Get the data directory holding the table files
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }
}

/// Project-related errors
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("No PQT project found (searched from {searched_from} upward). Run `pqt init` first.")]
    NotFound { searched_from: PathBuf },

    #[error("A PQT project already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        assert!(project.pqt_dir().is_dir());
        assert!(project.data_dir().is_dir());
        assert!(project.pqt_dir().join("config.yaml").is_file());
    }

    #[test]
    fn test_init_twice_fails() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();
        assert!(matches!(
            Project::init(tmp.path()),
            Err(ProjectError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();
        let sub = tmp.path().join("data");
        let project = Project::discover_from(&sub).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_discover_not_found() {
        let tmp = tempdir().unwrap();
        assert!(matches!(
            Project::discover_from(tmp.path()),
            Err(ProjectError::NotFound { .. })
        ));
    }
}
