//! This module declares the fixed lighting, camera, and post-processing around the tree, with the
//! parts that depend on the [`TreeConfig`] filled in from it.

use crate::tree::{TreeBase, EMERALD, SCENE_OFFSET, TREE_OFFSET};
use arix_config::{RGBArray, TreeConfig};
use glam::{Quat, Vec3};
use std::f32::consts::PI;

/// The warm white of the key light.
const KEY_LIGHT_COLOUR: RGBArray = [0xFF, 0xF0, 0xD6];

/// The near-black green of the floor.
const GROUND_COLOUR: RGBArray = [0x05, 0x0D, 0x0A];

/// The gap between the bottom of the base and the floor, so their faces don't fight.
const GROUND_GAP: f32 = 0.01;

/// The camera looking at the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSpec {
    /// The starting position of the camera.
    pub eye: Vec3,

    /// The point the camera orbits around.
    pub target: Vec3,

    /// The vertical field of view in degrees.
    pub fov_degrees: f32,
}

/// A light that shines equally in all directions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLightSpec {
    /// The position of the light.
    pub position: Vec3,

    /// The colour of the light.
    pub colour: RGBArray,

    /// The intensity on the same scale as [`TreeConfig::intensity`].
    pub intensity: f32,

    /// The distance the light reaches, or `None` for the renderer's default.
    pub range: Option<f32>,
}

/// A cone of light pointed at the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLightSpec {
    /// The position of the light.
    pub position: Vec3,

    /// The colour of the light.
    pub colour: RGBArray,

    /// The intensity on the same scale as [`TreeConfig::intensity`].
    pub intensity: f32,

    /// The half-angle of the cone, in radians.
    pub angle: f32,

    /// Whether the light casts shadows.
    pub shadows: bool,
}

/// The glow applied to bright parts of the image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomSpec {
    /// The brightness above which things start to glow.
    pub threshold: f32,

    /// How strongly things glow.
    pub intensity: f32,
}

/// The background stars.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarfieldSpec {
    /// The number of stars.
    pub count: usize,

    /// The distance of the nearest stars.
    pub radius: f32,

    /// The thickness of the shell of stars.
    pub depth: f32,
}

/// The dark floor under the tree that catches the key light's shadows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundSpec {
    /// The height of the floor in world space.
    pub height: f32,

    /// The side length of the square floor.
    pub size: f32,

    /// The colour of the floor.
    pub colour: RGBArray,

    /// How rough the floor is, from 0 (mirror) to 1.
    pub roughness: f32,
}

impl GroundSpec {
    /// A floor just under the given base.
    pub fn under(base: &TreeBase) -> Self {
        let base_bottom = (SCENE_OFFSET + TREE_OFFSET + base.position).y - base.height / 2.;

        Self {
            height: base_bottom - GROUND_GAP,
            size: 40.,
            colour: GROUND_COLOUR,
            roughness: 0.3,
        }
    }
}

/// The limits on where the user can orbit the camera to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitLimits {
    /// The smallest angle from straight up, in radians.
    pub min_polar: f32,

    /// The largest angle from straight up, in radians.
    pub max_polar: f32,

    /// The closest the camera can get to the target.
    pub min_distance: f32,

    /// The furthest the camera can get from the target.
    pub max_distance: f32,

    /// Whether the camera slowly orbits by itself.
    pub auto_rotate: bool,
}

impl OrbitLimits {
    /// Move `eye` to the nearest position within the limits around `target`.
    pub fn clamp(&self, eye: Vec3, target: Vec3) -> Vec3 {
        let offset = eye - target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return target + Vec3::Z * self.min_distance;
        }

        let polar = (offset.y / distance)
            .clamp(-1., 1.)
            .acos()
            .clamp(self.min_polar, self.max_polar);
        let azimuth = offset.x.atan2(offset.z);
        let distance = distance.clamp(self.min_distance, self.max_distance);

        target
            + Vec3::new(
                polar.sin() * azimuth.sin(),
                polar.cos(),
                polar.sin() * azimuth.cos(),
            ) * distance
    }
}

/// Rotate `eye` around the vertical axis through `target` by `angle` radians.
pub fn orbit_around(eye: Vec3, target: Vec3, angle: f32) -> Vec3 {
    target + Quat::from_rotation_y(angle) * (eye - target)
}

/// Everything around the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLayout {
    /// The camera.
    pub camera: CameraSpec,

    /// The brightness of the ambient light.
    pub ambient_intensity: f32,

    /// The main light, casting shadows.
    pub key_light: SpotLightSpec,

    /// A dim green light from behind.
    pub fill_light: PointLightSpec,

    /// A light in the theme colour in front of the base.
    pub accent_light: PointLightSpec,

    /// The glow.
    pub bloom: BloomSpec,

    /// The orbit limits.
    pub orbit: OrbitLimits,

    /// The background stars.
    pub stars: StarfieldSpec,

    /// The floor.
    pub ground: GroundSpec,
}

impl SceneLayout {
    /// The scene for the given config.
    pub fn for_config(config: &TreeConfig) -> Self {
        Self {
            camera: CameraSpec {
                eye: Vec3::new(0., 1., 9.),
                target: Vec3::ZERO,
                fov_degrees: 35.,
            },
            ambient_intensity: 0.2,
            key_light: SpotLightSpec {
                position: Vec3::new(10., 10., 10.),
                colour: KEY_LIGHT_COLOUR,
                intensity: 2.,
                angle: 0.15,
                shadows: true,
            },
            fill_light: PointLightSpec {
                position: Vec3::new(-5., 5., -5.),
                colour: EMERALD,
                intensity: 1.,
                range: None,
            },
            accent_light: PointLightSpec {
                position: Vec3::new(0., -2., 3.),
                colour: config.light_colour,
                intensity: 1.5,
                range: Some(6.),
            },
            bloom: BloomSpec {
                threshold: 0.8,
                intensity: config.intensity * 1.5,
            },
            orbit: OrbitLimits {
                min_polar: PI / 2.5,
                max_polar: PI / 1.8,
                min_distance: 5.,
                max_distance: 12.,
                auto_rotate: config.is_rotating,
            },
            stars: StarfieldSpec {
                count: 5000,
                radius: 100.,
                depth: 50.,
            },
            ground: GroundSpec::under(&TreeBase::default()),
        }
    }
}
