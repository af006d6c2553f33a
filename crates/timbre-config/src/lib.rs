//! Analysis profiles for the timbre toolkit.
//!
//! A profile is a TOML file describing how each transform is parameterised.
//! Every section is optional and falls back to the `music` defaults.
//!
//! # Features
//!
//! - **Profiles**: load, save and validate [`AnalysisConfig`] files
//! - **Built-ins**: `music` and `speech` via [`AnalysisConfig::profile`]
//! - **Validation**: every violation reported at once
//! - **Paths**: platform-specific config and profile directories
//!
//! # Example
//!
//! ```rust,no_run
//! use timbre_config::{AnalysisConfig, default_config_path};
//!
//! let config = if default_config_path().is_file() {
//!     AnalysisConfig::load(default_config_path()).unwrap()
//! } else {
//!     AnalysisConfig::profile("speech").unwrap()
//! };
//!
//! let sample_rate = 16000.0;
//! println!(
//!     "{}: {}-sample windows every {} samples",
//!     config.name,
//!     config.stft.window_length(sample_rate),
//!     config.stft.step_length(sample_rate),
//! );
//! ```

mod config;
mod error;

/// Platform-specific paths for configuration and profiles.
pub mod paths;

/// Profile validation.
pub mod validation;

pub use config::{
    AnalysisConfig, BUILTIN_PROFILES, CqtSettings, MdctSettings, MdctWindow, MelSettings,
    StftSettings,
};
pub use error::ConfigError;
pub use paths::{
    default_config_path, ensure_user_config_dir, find_profile, list_user_profiles,
    profile_name_from_path, user_config_dir, user_profiles_dir,
};
pub use validation::{ValidationError, ValidationResult, validate_config, validate_window};
