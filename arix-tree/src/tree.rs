//! This module describes the decorated tree: its conical layers, its base, and every set of
//! decorations hung on it.

use crate::placement::{
    helix, scatter_fairy_lights, sparkles, spiral, ConeProfile, HelixParams, Instance, Sparkle,
    SpiralParams,
};
use arix_config::{GarlandDensity, RGBArray, TreeConfig};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;
use tracing::{debug, instrument};

/// The colour of the foliage.
pub const EMERALD: RGBArray = [0x00, 0x42, 0x25];

/// The colour of the base of the tree.
pub const BASE_COLOUR: RGBArray = [0x1A, 0x1A, 0x1A];

/// The height of every conical layer of foliage.
pub const LAYER_HEIGHT: f32 = 1.5;

/// The position of the tree in the frame of the scene group.
pub const TREE_OFFSET: Vec3 = Vec3::new(0., -2., 0.);

/// The position of the scene group that holds the tree.
pub const SCENE_OFFSET: Vec3 = Vec3::new(0., -1., 0.);

/// The foliage layers, from the bottom up.
pub const TREE_LAYERS: [TreeLayer; 4] = [
    TreeLayer::new(0., 2.5),
    TreeLayer::new(1.2, 2.),
    TreeLayer::new(2.4, 1.5),
    TreeLayer::new(3.4, 1.),
];

/// The number of primary ornaments.
const PRIMARY_ORNAMENTS: usize = 18;

/// The number of secondary ornaments, offset half a turn from the primaries.
const SECONDARY_ORNAMENTS: usize = 15;

/// The number of fairy lights.
const FAIRY_LIGHTS: usize = 80;

/// The number of sparkle particles.
const SPARKLES: usize = 80;

/// The side length of the cube that the sparkles float in.
const SPARKLE_SCALE: f32 = 7.;

/// One cone of foliage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeLayer {
    /// The height of the centre of the cone.
    pub y: f32,

    /// The radius at the bottom of the cone.
    pub radius: f32,
}

impl TreeLayer {
    /// Create a layer at the given height with the given radius.
    pub const fn new(y: f32, radius: f32) -> Self {
        Self { y, radius }
    }
}

/// The cylindrical base that the tree stands in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeBase {
    /// The centre of the cylinder.
    pub position: Vec3,

    /// The radius at the top.
    pub radius_top: f32,

    /// The radius at the bottom.
    pub radius_bottom: f32,

    /// The height of the cylinder.
    pub height: f32,

    /// The colour of the base.
    pub colour: RGBArray,
}

impl Default for TreeBase {
    fn default() -> Self {
        Self {
            position: Vec3::new(0., -0.8, 0.),
            radius_top: 0.5,
            radius_bottom: 0.7,
            height: 1.,
            colour: BASE_COLOUR,
        }
    }
}

/// A set of identical spheres sharing one mesh and one material.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceSet {
    /// Where each sphere goes.
    pub instances: Vec<Instance>,

    /// The radius of each sphere.
    pub size: f32,

    /// The colour of every sphere.
    pub colour: RGBArray,
}

/// The star on top of the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    /// The position of the centre of the star.
    pub position: Vec3,

    /// The radius of the octahedron.
    pub radius: f32,

    /// The colour of the star and its light.
    pub colour: RGBArray,

    /// How strongly the star glows.
    pub emissive_strength: f32,

    /// The intensity of the light inside the star.
    pub light_intensity: f32,

    /// The range of the light inside the star.
    pub light_range: f32,
}

impl Star {
    /// The star for the given config.
    pub fn for_config(config: &TreeConfig) -> Self {
        Self {
            position: Vec3::new(0., 4.3, 0.),
            radius: 0.45,
            colour: config.light_colour,
            emissive_strength: config.intensity * 3.,
            light_intensity: 2.,
            light_range: 5.,
        }
    }
}

/// The whole decorated tree, in the tree's local frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DecoratedTree {
    /// The large ornaments.
    pub primary_ornaments: InstanceSet,

    /// The smaller ornaments, interleaved with the primaries.
    pub secondary_ornaments: InstanceSet,

    /// The pearl garland wrapped around the tree.
    pub garland: InstanceSet,

    /// The small glowing lights scattered over the tree.
    pub fairy_lights: InstanceSet,

    /// The floating sparkles around the tree.
    pub sparkles: Vec<Sparkle>,

    /// The colour of the sparkles.
    pub sparkle_colour: RGBArray,

    /// The star on top.
    pub star: Star,

    /// The base.
    pub base: TreeBase,
}

impl DecoratedTree {
    /// Decorate the tree for the given config.
    #[instrument(skip(rng))]
    pub fn new<R: Rng + ?Sized>(config: &TreeConfig, density: GarlandDensity, rng: &mut R) -> Self {
        let primary_spiral = SpiralParams {
            count: PRIMARY_ORNAMENTS,
            y_start: -0.5,
            y_end: 3.,
            radius_start: 2.4,
            radius_end: 0.8,
            phase_offset: 0.,
            random_rotation: true,
        };
        let secondary_spiral = SpiralParams {
            count: SECONDARY_ORNAMENTS,
            phase_offset: PI,
            ..primary_spiral
        };
        let garland_helix = HelixParams {
            density,
            radius_start: 2.6,
            radius_end: 0.4,
            y_start: -0.6,
            y_end: 3.8,
            turns: 4.5,
        };

        let tree = Self {
            primary_ornaments: InstanceSet {
                instances: spiral(&primary_spiral, rng),
                size: 0.14,
                colour: config.ornament_colour,
            },
            secondary_ornaments: InstanceSet {
                instances: spiral(&secondary_spiral, rng),
                size: 0.1,
                colour: config.ornament_colour,
            },
            garland: InstanceSet {
                instances: helix(&garland_helix),
                size: 0.04,
                colour: config.garland_colour(),
            },
            fairy_lights: InstanceSet {
                instances: scatter_fairy_lights(FAIRY_LIGHTS, &ConeProfile::default(), rng),
                size: 0.03,
                colour: config.light_colour,
            },
            sparkles: sparkles(SPARKLES, SPARKLE_SCALE, rng),
            sparkle_colour: config.light_colour,
            star: Star::for_config(config),
            base: TreeBase::default(),
        };
        debug!(
            instances = tree.instance_count(),
            "Finished decorating the tree"
        );

        tree
    }

    /// Update every colour and the star to match the config, keeping all the positions.
    ///
    /// None of the placement parameters depend on colours, so the layout doesn't need to be
    /// recomputed when the theme or intensity change.
    pub fn recolour(&mut self, config: &TreeConfig) {
        self.primary_ornaments.colour = config.ornament_colour;
        self.secondary_ornaments.colour = config.ornament_colour;
        self.garland.colour = config.garland_colour();
        self.fairy_lights.colour = config.light_colour;
        self.sparkle_colour = config.light_colour;
        self.star = Star::for_config(config);
    }

    /// All the sets of spheres hung on the tree.
    pub fn instance_sets(&self) -> [&InstanceSet; 4] {
        [
            &self.primary_ornaments,
            &self.secondary_ornaments,
            &self.garland,
            &self.fairy_lights,
        ]
    }

    /// The total number of spheres hung on the tree.
    pub fn instance_count(&self) -> usize {
        self.instance_sets()
            .iter()
            .map(|set| set.instances.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arix_config::Theme;
    use float_cmp::approx_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn decorated_tree_test() {
        let mut rng = StdRng::seed_from_u64(12345);
        let config = TreeConfig::default();
        let tree = DecoratedTree::new(&config, GarlandDensity::Fixed, &mut rng);

        assert_eq!(tree.primary_ornaments.instances.len(), 18);
        assert_eq!(tree.secondary_ornaments.instances.len(), 15);
        assert_eq!(tree.garland.instances.len(), 150);
        assert_eq!(tree.fairy_lights.instances.len(), 80);
        assert_eq!(tree.sparkles.len(), 80);
        assert_eq!(tree.instance_count(), 18 + 15 + 150 + 80);

        assert_eq!(tree.primary_ornaments.colour, config.ornament_colour);
        assert_eq!(tree.garland.colour, [0xF4, 0xCF, 0x57]);
        assert_eq!(tree.fairy_lights.colour, config.light_colour);
        assert!(approx_eq!(f32, tree.star.emissive_strength, 4.5));

        // Nothing should poke out above the star
        for set in tree.instance_sets() {
            for instance in &set.instances {
                assert!(instance.position.y < tree.star.position.y);
            }
        }
    }

    #[test]
    fn recolour_test() {
        let mut rng = StdRng::seed_from_u64(12345);
        let mut config = TreeConfig::default();
        let mut tree = DecoratedTree::new(&config, GarlandDensity::Fixed, &mut rng);
        let before = tree.clone();

        config.apply_theme(Theme::FrostSilver);
        config.toggle_intensity();
        tree.recolour(&config);

        assert_eq!(tree.primary_ornaments.colour, [0xC0, 0xC0, 0xC0]);
        assert_eq!(tree.secondary_ornaments.colour, [0xC0, 0xC0, 0xC0]);
        assert_eq!(tree.garland.colour, [0xFF, 0xFF, 0xFF]);
        assert_eq!(tree.fairy_lights.colour, [0xE0, 0xE0, 0xE0]);
        assert_eq!(tree.sparkle_colour, [0xE0, 0xE0, 0xE0]);
        assert!(approx_eq!(f32, tree.star.emissive_strength, 1.5));

        assert_eq!(tree.primary_ornaments.instances, before.primary_ornaments.instances);
        assert_eq!(tree.fairy_lights.instances, before.fairy_lights.instances);
        assert_eq!(tree.sparkles, before.sparkles);
    }

    #[test]
    fn tree_layers_test() {
        let tip = |layer: &TreeLayer| layer.y + LAYER_HEIGHT / 2.;
        let bottom = |layer: &TreeLayer| layer.y - LAYER_HEIGHT / 2.;

        for pair in TREE_LAYERS.windows(2) {
            assert!(pair[1].y > pair[0].y);
            assert!(pair[1].radius < pair[0].radius);
            // Each layer overlaps the one above it
            assert!(tip(&pair[0]) > bottom(&pair[1]));
        }
    }
}
