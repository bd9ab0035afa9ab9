//! This crate provides the configuration record for the tree, the colour themes that the overlay
//! can switch between, and the startup settings loaded from a RON file.

mod colour;
mod error;
mod settings;
mod tree_config;

pub use self::{
    colour::{hex_colour, parse_hex_colour, RGBArray},
    error::ConfigError,
    settings::{GarlandDensity, GreetingSettings, Settings, WindowSettings},
    tree_config::{Theme, TreeConfig},
};
