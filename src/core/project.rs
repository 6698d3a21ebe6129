//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

const MARKER_DIR: &str = ".droneforge";
const BUILDS_DIR: &str = "builds";
/// Suffix of stored build files
pub const BUILD_SUFFIX: &str = ".drone.yaml";

/// Represents a DroneForge project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .droneforge/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(MARKER_DIR).is_dir() {
                log::debug!("found project at {}", current.display());
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
        let root = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());

        if root.join(MARKER_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::create_layout(root)
    }

    /// Initialize even if .droneforge/ exists; the config is rewritten,
    /// stored builds are left alone
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());
        Self::create_layout(root)
    }

    fn create_layout(root: PathBuf) -> Result<Self, ProjectError> {
        let marker = root.join(MARKER_DIR);
        std::fs::create_dir_all(&marker).map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(marker.join("config.yaml"), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::create_dir_all(root.join(BUILDS_DIR))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# DroneForge project configuration

# Default author recorded on new builds (can be overridden by global config)
# author: ""

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto

# Milliseconds between progress ticks in `test run --live`
# tick_ms: 100

# Default test conditions (flags on `test run` take precedence)
# wind_speed: 20
# temperature: 25
# altitude: 50
# humidity: 40
# precision: 5
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .droneforge configuration directory
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(MARKER_DIR)
    }

    /// Directory holding stored builds
    pub fn builds_dir(&self) -> PathBuf {
        self.root.join(BUILDS_DIR)
    }

    /// Path of the file for a named build
    pub fn build_path(&self, name: &str) -> PathBuf {
        self.builds_dir().join(format!("{}{}", name, BUILD_SUFFIX))
    }

    /// Iterate stored build files, sorted by path
    pub fn iter_build_files(&self) -> impl Iterator<Item = PathBuf> {
        walkdir::WalkDir::new(self.builds_dir())
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().to_string_lossy().ends_with(BUILD_SUFFIX))
            .map(|e| e.path().to_path_buf())
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a DroneForge project (searched from {searched_from:?}). Run 'droneforge init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("DroneForge project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.config_dir().is_dir());
        assert!(project.config_dir().join("config.yaml").exists());
        assert!(project.builds_dir().is_dir());
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
    }

    #[test]
    fn test_init_force_keeps_builds() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(project.build_path("racer"), "name: racer\n").unwrap();

        let project = Project::init_force(tmp.path()).unwrap();
        assert!(project.build_path("racer").exists());
    }

    #[test]
    fn test_project_discover_finds_marker_dir() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_marker_dir() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }

    #[test]
    fn test_build_files_are_filtered_and_sorted() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(project.build_path("zeta"), "").unwrap();
        std::fs::write(project.build_path("alpha"), "").unwrap();
        std::fs::write(project.builds_dir().join("notes.txt"), "").unwrap();

        let names: Vec<String> = project
            .iter_build_files()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha.drone.yaml", "zeta.drone.yaml"]);
    }
}
