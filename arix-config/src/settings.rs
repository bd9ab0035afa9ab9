//! This module handles the startup [`Settings`], read once from an optional RON file.
//!
//! Settings are never written back. Any field missing from the file takes its default value.

use crate::{ConfigError, TreeConfig};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, info, instrument};

/// Everything that can be configured at startup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The window to render into.
    pub window: WindowSettings,

    /// The text-generation service used for greetings.
    pub greeting: GreetingSettings,

    /// The tree config at the start of the session.
    pub tree: TreeConfig,

    /// How densely to thread the pearl garland.
    pub garland: GarlandDensity,

    /// A seed for the random decoration layout. A fresh layout is made every run if this is
    /// `None`.
    pub seed: Option<u64>,
}

impl Settings {
    /// Load the settings from the given RON file, or use the defaults if the file doesn't exist.
    #[instrument]
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(?path, "No settings file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_ron(&text)?;
        debug!(?settings, "Loaded settings");

        Ok(settings)
    }

    /// Parse the settings from a RON string.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }
}

/// The settings of the window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// The title of the window.
    pub title: String,

    /// The initial width in logical pixels.
    pub width: f32,

    /// The initial height in logical pixels.
    pub height: f32,

    /// The font file for the overlay text. Relative paths are looked up in the asset folder.
    pub font: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Arix Signature Collection".to_string(),
            width: 1280.,
            height: 800.,
            font: "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string(),
        }
    }
}

/// The settings of the greeting text service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingSettings {
    /// The base URL of the text-generation API.
    pub endpoint: String,

    /// The model identifier to ask for.
    pub model: String,

    /// The tone label embedded in the prompt.
    pub tone: String,
}

impl Default for GreetingSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            tone: "Royal".to_string(),
        }
    }
}

/// How many beads to thread onto the pearl garland.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GarlandDensity {
    /// The dense default of 150 beads, whatever count was asked for.
    #[default]
    Fixed,

    /// Exactly this many beads.
    Count(usize),
}

impl GarlandDensity {
    /// The number of beads in the dense default garland.
    pub const DENSE_BEAD_COUNT: usize = 150;

    /// The number of beads to place.
    pub const fn bead_count(self) -> usize {
        match self {
            Self::Fixed => Self::DENSE_BEAD_COUNT,
            Self::Count(count) => count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Theme;

    #[test]
    fn partial_settings_test() {
        let settings = Settings::from_ron(
            r#"(
                greeting: (model: "gemini-2.0-flash"),
                tree: (is_rotating: false, ornament_colour: (192, 192, 192)),
                garland: Count(60),
                seed: Some(7),
            )"#,
        )
        .unwrap();

        assert_eq!(settings.greeting.model, "gemini-2.0-flash");
        assert_eq!(settings.greeting.tone, "Royal");
        assert!(!settings.tree.is_rotating);
        assert_eq!(settings.tree.active_theme(), Some(Theme::FrostSilver));
        assert_eq!(settings.tree.light_colour, TreeConfig::default().light_colour);
        assert_eq!(settings.garland.bead_count(), 60);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.window, WindowSettings::default());
    }

    #[test]
    fn empty_settings_test() {
        assert_eq!(Settings::from_ron("()").unwrap(), Settings::default());
        assert_eq!(Settings::default().garland.bead_count(), 150);
    }

    #[test]
    fn bad_settings_test() {
        assert!(matches!(
            Settings::from_ron("(seed: \"seven\")"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn hex_colour_settings_test() {
        let settings = Settings::from_ron(
            r##"(tree: (ornament_colour: "#B76E79", light_colour: "ffb7c5"))"##,
        )
        .unwrap();
        assert_eq!(settings.tree.active_theme(), Some(Theme::VelvetRose));
        assert_eq!(settings.tree.light_colour, Theme::VelvetRose.light_colour());

        let written = ron::to_string(&settings.tree).unwrap();
        assert!(written.contains("\"#B76E79\""), "{written}");
        assert!(written.contains("\"#FFB7C5\""), "{written}");
        assert_eq!(
            Settings::from_ron(&format!("(tree: {written})")).unwrap().tree,
            settings.tree
        );

        let error = Settings::from_ron(r##"(tree: (ornament_colour: "#GGGGGG"))"##).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
        assert!(error.to_string().contains("#GGGGGG"), "{error}");
    }

    #[test]
    fn settings_file_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arix-settings.ron");

        let mut settings = Settings::default();
        settings.window.title = "Test Tree".to_string();
        settings.tree.apply_theme(Theme::FrostSilver);
        settings.garland = GarlandDensity::Count(60);
        settings.seed = Some(42);
        fs::write(&path, ron::to_string(&settings).unwrap()).unwrap();

        assert_eq!(Settings::from_file_or_default(&path).unwrap(), settings);
    }

    #[test]
    fn unreadable_file_test() {
        // A directory exists but can't be read as a file
        let dir = tempfile::tempdir().unwrap();
        let error = Settings::from_file_or_default(dir.path()).unwrap_err();

        assert!(matches!(&error, ConfigError::Read { path, .. } if path == dir.path()));
    }

    #[test]
    fn missing_file_test() {
        let settings =
            Settings::from_file_or_default(Path::new("/nonexistent/arix/settings.ron")).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
