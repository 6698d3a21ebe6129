//! Build persistence: YAML files under `builds/`, JSON for exchange

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::project::{Project, BUILD_SUFFIX};
use crate::entities::build::Build;
use crate::yaml::YamlSyntaxError;

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("build '{0}' not found (run `droneforge build list` to see stored builds)")]
    NotFound(String),

    #[error("build '{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid build name '{0}': use letters, digits, '-' and '_'")]
    InvalidName(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("failed to serialize build: {0}")]
    Serialize(String),

    #[error("invalid JSON build: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Check a build name is usable as a file stem
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

pub fn exists(project: &Project, name: &str) -> bool {
    project.build_path(name).is_file()
}

/// Parse build YAML, reporting syntax problems against `filename`
pub fn parse(text: &str, filename: &str) -> Result<Build, StoreError> {
    serde_yml::from_str(text)
        .map_err(|e| StoreError::Syntax(YamlSyntaxError::from_serde_error(&e, text, filename)))
}

fn read(project: &Project, name: &str) -> Result<(String, PathBuf), StoreError> {
    validate_name(name)?;
    let path = project.build_path(name);
    if !path.is_file() {
        return Err(StoreError::NotFound(name.to_string()));
    }
    let text = std::fs::read_to_string(&path).map_err(io_error(&path))?;
    Ok((text, path))
}

/// Load a stored build, failing on malformed content
pub fn load(project: &Project, name: &str) -> Result<Build, StoreError> {
    let (text, path) = read(project, name)?;
    parse(&text, &path.to_string_lossy())
}

/// Load a stored build; malformed content yields an empty build with the
/// default palette instead of an error
pub fn load_or_empty(project: &Project, name: &str) -> Result<Build, StoreError> {
    let (text, path) = read(project, name)?;
    match parse(&text, &path.to_string_lossy()) {
        Ok(build) => Ok(build),
        Err(StoreError::Syntax(e)) => {
            log::warn!(
                "build '{}' could not be read ({}); using an empty build",
                name,
                e.message()
            );
            Ok(Build::new(name, None))
        }
        Err(other) => Err(other),
    }
}

/// Write a build to `builds/<name>.drone.yaml`, replacing any previous file
pub fn save(project: &Project, build: &Build) -> Result<PathBuf, StoreError> {
    validate_name(&build.name)?;
    let dir = project.builds_dir();
    std::fs::create_dir_all(&dir).map_err(io_error(&dir))?;

    let yaml = serde_yml::to_string(build).map_err(|e| StoreError::Serialize(e.to_string()))?;
    let path = project.build_path(&build.name);
    std::fs::write(&path, yaml).map_err(io_error(&path))?;
    log::debug!("saved build '{}' to {}", build.name, path.display());
    Ok(path)
}

/// Save a build that must not exist yet
pub fn create(project: &Project, build: &Build) -> Result<PathBuf, StoreError> {
    validate_name(&build.name)?;
    if exists(project, &build.name) {
        return Err(StoreError::AlreadyExists(build.name.clone()));
    }
    save(project, build)
}

/// Names of stored builds, sorted
pub fn list(project: &Project) -> Vec<String> {
    project
        .iter_build_files()
        .filter_map(|path| {
            path.file_name()
                .map(|n| n.to_string_lossy())
                .and_then(|n| n.strip_suffix(BUILD_SUFFIX).map(str::to_string))
        })
        .collect()
}

pub fn to_json(build: &Build) -> Result<String, StoreError> {
    serde_json::to_string_pretty(build).map_err(|e| StoreError::Serialize(e.to_string()))
}

pub fn from_json(text: &str) -> Result<Build, StoreError> {
    Ok(serde_json::from_str(text)?)
}

/// Read an exchange file, JSON or YAML by extension
pub fn import_file(path: &Path) -> Result<Build, StoreError> {
    let text = std::fs::read_to_string(path).map_err(io_error(path))?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        from_json(&text)
    } else {
        parse(&text, &path.to_string_lossy())
    }
}
