//! This module handles the [`TreeConfig`] record and the [`Theme`]s that can be applied to it.

use crate::RGBArray;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// The silver ornament colour, which also decides the garland colour.
const SILVER: RGBArray = [0xC0, 0xC0, 0xC0];

/// The colour of the garland for silver ornaments.
const GARLAND_WHITE: RGBArray = [0xFF, 0xFF, 0xFF];

/// The colour of the garland for every other ornament colour.
const GARLAND_GOLD: RGBArray = [0xF4, 0xCF, 0x57];

/// A colour theme for the ornaments and lights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Theme {
    /// Gold ornaments with gold lights.
    #[strum(serialize = "Royal Gold")]
    RoyalGold,

    /// Dusky pink ornaments with pale pink lights.
    #[strum(serialize = "Velvet Rose")]
    VelvetRose,

    /// Silver ornaments with near-white lights.
    #[strum(serialize = "Frost Silver")]
    FrostSilver,
}

impl Theme {
    /// The colour of the ornaments in this theme.
    pub const fn ornament_colour(self) -> RGBArray {
        match self {
            Self::RoyalGold => [0xD4, 0xAF, 0x37],
            Self::VelvetRose => [0xB7, 0x6E, 0x79],
            Self::FrostSilver => SILVER,
        }
    }

    /// The colour of the lights in this theme.
    pub const fn light_colour(self) -> RGBArray {
        match self {
            Self::RoyalGold => [0xD4, 0xAF, 0x37],
            Self::VelvetRose => [0xFF, 0xB7, 0xC5],
            Self::FrostSilver => [0xE0, 0xE0, 0xE0],
        }
    }
}

/// The configuration of the tree, mutated by the overlay controls and read by the renderer every
/// frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Whether the tree spins and the camera auto-rotates.
    pub is_rotating: bool,

    /// The colour of the ornaments.
    #[serde(with = "crate::colour::hex")]
    pub ornament_colour: RGBArray,

    /// The colour of the fairy lights, the star, the sparkles, and the accent light.
    #[serde(with = "crate::colour::hex")]
    pub light_colour: RGBArray,

    /// A scalar on the brightness of the star and the bloom.
    pub intensity: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        let theme = Theme::RoyalGold;
        Self {
            is_rotating: true,
            ornament_colour: theme.ornament_colour(),
            light_colour: theme.light_colour(),
            intensity: 1.5,
        }
    }
}

impl TreeConfig {
    /// Start or stop the rotation.
    pub fn toggle_rotation(&mut self) {
        self.is_rotating = !self.is_rotating;
    }

    /// Switch between dim lights (0.5) and a high beam (2.0).
    pub fn toggle_intensity(&mut self) {
        self.intensity = if self.intensity > 1. { 0.5 } else { 2. };
    }

    /// Set the ornament and light colours from the given theme.
    pub fn apply_theme(&mut self, theme: Theme) {
        self.ornament_colour = theme.ornament_colour();
        self.light_colour = theme.light_colour();
    }

    /// Find the theme whose ornament colour matches this config, if there is one.
    pub fn active_theme(&self) -> Option<Theme> {
        Theme::iter().find(|theme| theme.ornament_colour() == self.ornament_colour)
    }

    /// The colour of the pearl garland, which is white for silver ornaments and gold otherwise.
    pub fn garland_colour(&self) -> RGBArray {
        if self.ornament_colour == SILVER {
            GARLAND_WHITE
        } else {
            GARLAND_GOLD
        }
    }

    /// The label of the intensity toggle, describing what pressing it will do.
    pub fn intensity_label(&self) -> &'static str {
        if self.intensity > 1. {
            "Dim Lights"
        } else {
            "High Beam"
        }
    }
}
