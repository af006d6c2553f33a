//! Analysis profiles.
//!
//! A profile bundles the parameters of every transform the CLI runs: STFT
//! framing, mel filterbank size, constant-Q layout and MDCT window. Lengths
//! that depend on the sampling rate are stored as durations and resolved per
//! file with [`StftSettings::window_length`] and [`StftSettings::step_length`].

use crate::error::ConfigError;
use crate::validation::validate_config;
use serde::{Deserialize, Serialize};
use std::path::Path;
use timbre_analysis::{Window, kbd_window};

/// STFT framing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StftSettings {
    /// Window name, any of [`Window::ALL`] by its lowercase name.
    pub window: String,
    /// Window duration in seconds.
    pub window_duration: f64,
    /// Fraction of each window shared with the next frame.
    pub overlap: f64,
}

impl Default for StftSettings {
    fn default() -> Self {
        Self {
            window: Window::Hamming.name().to_string(),
            window_duration: 0.04,
            overlap: 0.5,
        }
    }
}

impl StftSettings {
    /// Parsed window type.
    pub fn window(&self) -> Result<Window, ConfigError> {
        Ok(crate::validation::validate_window("stft.window", &self.window)?)
    }

    /// Window length in samples: the next power of two at or above
    /// `window_duration · sample_rate`.
    pub fn window_length(&self, sample_rate: f64) -> usize {
        let samples = (self.window_duration * sample_rate).ceil().max(1.0) as usize;
        samples.next_power_of_two()
    }

    /// Step length in samples, at least one.
    pub fn step_length(&self, sample_rate: f64) -> usize {
        let length = self.window_length(sample_rate) as f64;
        ((length * (1.0 - self.overlap)).round() as usize).max(1)
    }

    /// Periodic window coefficients for `sample_rate`.
    pub fn coefficients(&self, sample_rate: f64) -> Result<Vec<f64>, ConfigError> {
        Ok(self.window()?.coefficients(self.window_length(sample_rate)))
    }
}

/// Mel filterbank and MFCC settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MelSettings {
    /// Number of triangular filters.
    pub filters: usize,
    /// Number of cepstral coefficients kept, excluding the 0th.
    pub coefficients: usize,
}

impl Default for MelSettings {
    fn default() -> Self {
        Self {
            filters: 40,
            coefficients: 20,
        }
    }
}

/// Constant-Q transform settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CqtSettings {
    /// Channels per octave.
    pub octave_resolution: usize,
    /// Centre frequency of the lowest channel in Hz.
    pub min_frequency: f64,
    /// Upper frequency bound in Hz.
    pub max_frequency: f64,
    /// Output frame rate.
    pub frames_per_second: f64,
}

impl Default for CqtSettings {
    fn default() -> Self {
        Self {
            octave_resolution: 12,
            min_frequency: 55.0,
            max_frequency: 3520.0,
            frames_per_second: 25.0,
        }
    }
}

/// Windows that satisfy the Princen-Bradley condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MdctWindow {
    /// Kaiser-Bessel-derived window.
    #[default]
    Kbd,
    /// Vorbis power-sine window.
    Vorbis,
    /// Sine window.
    Sine,
}

/// MDCT settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdctSettings {
    /// Window length in samples; twice the number of coefficients per frame.
    pub window_length: usize,
    /// Window family.
    pub window: MdctWindow,
    /// Kaiser alpha, used only by [`MdctWindow::Kbd`].
    pub kbd_alpha: f64,
}

impl Default for MdctSettings {
    fn default() -> Self {
        Self {
            window_length: 2048,
            window: MdctWindow::Kbd,
            kbd_alpha: 5.0,
        }
    }
}

impl MdctSettings {
    /// Window coefficients.
    pub fn coefficients(&self) -> Vec<f64> {
        match self.window {
            MdctWindow::Kbd => kbd_window(self.window_length, self.kbd_alpha),
            MdctWindow::Vorbis => Window::Vorbis.coefficients(self.window_length),
            MdctWindow::Sine => Window::Sine.coefficients(self.window_length),
        }
    }
}

/// A complete analysis profile.
///
/// # Example
///
/// ```rust
/// use timbre_config::AnalysisConfig;
///
/// let config = AnalysisConfig::from_toml(r#"
///     name = "bright"
///     [stft]
///     window = "hann"
///     overlap = 0.75
/// "#).unwrap();
///
/// assert_eq!(config.stft.window_length(22050.0), 1024);
/// assert_eq!(config.stft.step_length(22050.0), 256);
/// assert_eq!(config.mel.filters, 40);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Profile name.
    pub name: String,
    /// STFT framing, also used by the mel and MFCC commands.
    pub stft: StftSettings,
    /// Mel filterbank and MFCC.
    pub mel: MelSettings,
    /// Constant-Q transform and chromagram.
    pub cqt: CqtSettings,
    /// MDCT.
    pub mdct: MdctSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            name: "music".to_string(),
            stft: StftSettings::default(),
            mel: MelSettings::default(),
            cqt: CqtSettings::default(),
            mdct: MdctSettings::default(),
        }
    }
}

/// Names accepted by [`AnalysisConfig::profile`].
pub const BUILTIN_PROFILES: [&str; 2] = ["music", "speech"];

impl AnalysisConfig {
    /// Built-in profile by name.
    ///
    /// `music` is the default profile. `speech` uses 25 ms windows, 13
    /// cepstral coefficients and a constant-Q range covering the voice.
    pub fn profile(name: &str) -> Result<Self, ConfigError> {
        match name {
            "music" => Ok(Self::default()),
            "speech" => Ok(Self {
                name: "speech".to_string(),
                stft: StftSettings {
                    window: Window::Hamming.name().to_string(),
                    window_duration: 0.025,
                    overlap: 0.5,
                },
                mel: MelSettings {
                    filters: 26,
                    coefficients: 13,
                },
                cqt: CqtSettings {
                    octave_resolution: 24,
                    min_frequency: 80.0,
                    max_frequency: 4000.0,
                    frames_per_second: 100.0,
                },
                mdct: MdctSettings {
                    window_length: 512,
                    window: MdctWindow::Sine,
                    kbd_alpha: 4.0,
                },
            }),
            other => Err(ConfigError::ProfileNotFound(other.to_string())),
        }
    }

    /// Load and validate a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a profile from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::create_dir(parent, e))?;
            }
        }

        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Check every setting, reporting all violations at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(validate_config(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use timbre_analysis::is_princen_bradley;

    #[test]
    fn defaults_match_documented_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.stft.window().unwrap(), Window::Hamming);
        assert_eq!(config.mel.coefficients, 20);
        assert_eq!(config.cqt.octave_resolution, 12);
        assert_eq!(config.mdct.window, MdctWindow::Kbd);
    }

    #[test]
    fn window_length_rounds_up_to_power_of_two() {
        let stft = StftSettings::default();
        // 0.04 s at 44.1 kHz is 1764 samples
        assert_eq!(stft.window_length(44100.0), 2048);
        assert_eq!(stft.step_length(44100.0), 1024);
        // exactly 1024 samples stays put
        let exact = StftSettings {
            window_duration: 0.0625,
            ..StftSettings::default()
        };
        assert_eq!(exact.window_length(16384.0), 1024);
    }

    #[test]
    fn step_length_never_zero() {
        let stft = StftSettings {
            window_duration: 0.0,
            overlap: 0.9,
            ..StftSettings::default()
        };
        assert_eq!(stft.window_length(8000.0), 1);
        assert_eq!(stft.step_length(8000.0), 1);
    }

    #[test]
    fn mdct_windows_are_princen_bradley() {
        for window in [MdctWindow::Kbd, MdctWindow::Vorbis, MdctWindow::Sine] {
            let settings = MdctSettings {
                window_length: 256,
                window,
                kbd_alpha: 4.0,
            };
            let coeffs = settings.coefficients();
            assert_eq!(coeffs.len(), 256);
            assert!(is_princen_bradley(&coeffs, 1e-9), "{window:?}");
        }
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = AnalysisConfig::from_toml("[mel]\nfilters = 64\n").unwrap();
        assert_eq!(config.mel.filters, 64);
        assert_eq!(config.mel.coefficients, 20);
        assert_eq!(config.stft, StftSettings::default());
    }

    #[test]
    fn mdct_window_names_are_lowercase() {
        let config = AnalysisConfig::from_toml("[mdct]\nwindow = \"vorbis\"\n").unwrap();
        assert_eq!(config.mdct.window, MdctWindow::Vorbis);
        assert!(AnalysisConfig::from_toml("[mdct]\nwindow = \"Vorbis\"\n").is_err());
    }

    #[test]
    fn invalid_values_fail_to_load() {
        let err = AnalysisConfig::from_toml("[stft]\nwindow = \"gauss\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn builtin_profiles() {
        for name in BUILTIN_PROFILES {
            let config = AnalysisConfig::profile(name).unwrap();
            assert_eq!(config.name, name);
            config.validate().unwrap();
        }
        assert!(matches!(
            AnalysisConfig::profile("podcast"),
            Err(ConfigError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn save_load_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("speech.toml");

        let config = AnalysisConfig::profile("speech").unwrap();
        config.save(&path).unwrap();

        assert_eq!(AnalysisConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn load_missing_file() {
        let err = AnalysisConfig::load("/nonexistent/timbre.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
