//! Errors raised while loading, saving or resolving analysis profiles.

use crate::validation::ValidationError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Profile loading and saving errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A profile file could not be read.
    #[error("cannot read profile '{}': {source}", path.display())]
    ReadFile {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A profile file could not be written.
    #[error("cannot write profile '{}': {source}", path.display())]
    WriteFile {
        /// File that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A directory for profiles could not be created.
    #[error("cannot create directory '{}': {source}", path.display())]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the profile layout.
    #[error("malformed profile: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The profile could not be rendered as TOML.
    #[error("cannot serialize profile: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// No built-in profile has this name.
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    /// The profile parsed but holds unusable settings.
    #[error("invalid profile: {0}")]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    /// Read failure on `path`.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Write failure on `path`.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Directory creation failure on `path`.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// The file or directory involved, for I/O failures.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ReadFile { path, .. }
            | Self::WriteFile { path, .. }
            | Self::CreateDir { path, .. } => Some(path),
            _ => None,
        }
    }
}
