//! This module places the decorative instances on and around the tree.
//!
//! Each function is a one-shot generator over fixed parameters. The random ones take an RNG so
//! that a seeded layout can be reproduced, but nothing depends on the exact random values.

use crate::lerp;
use arix_config::GarlandDensity;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};
use tracing::{instrument, trace};

/// The number of radians swept by a spiral from start to end (five full turns).
const SPIRAL_SWEEP: f32 = 10. * PI;

/// How far the garland sits outside the radius of its helix.
const GARLAND_RADIAL_OFFSET: f32 = 0.1;

/// One decorative element placed in the tree's local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    /// The position of the centre of the instance.
    pub position: Vec3,

    /// Optional Euler angles (XYZ, in radians) for a bit of visual variety.
    pub rotation: Option<Vec3>,
}

impl Instance {
    /// An instance at the given position with no rotation.
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: None,
        }
    }
}

/// One sample along a parametric curve around the vertical axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSample {
    /// The angle around the vertical axis, in radians.
    pub angle: f32,

    /// The height of the sample.
    pub height: f32,

    /// The distance from the vertical axis.
    pub radius: f32,
}

impl CurveSample {
    /// Convert the sample to a cartesian position.
    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.angle.cos(),
            self.height,
            self.radius * self.angle.sin(),
        )
    }
}

/// The parameters of a spiral of ornaments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpiralParams {
    /// How many ornaments to place.
    pub count: usize,

    /// The height of the first ornament.
    pub y_start: f32,

    /// The height that the spiral approaches at its end.
    pub y_end: f32,

    /// The radius of the first ornament.
    pub radius_start: f32,

    /// The radius that the spiral approaches at its end.
    pub radius_end: f32,

    /// An angle added to every ornament, used to interleave several spirals.
    pub phase_offset: f32,

    /// Whether to give each ornament a random rotation.
    pub random_rotation: bool,
}

impl SpiralParams {
    /// The samples along this spiral, without any randomness.
    pub fn samples(&self) -> impl Iterator<Item = CurveSample> + '_ {
        (0..self.count).map(move |i| {
            let t = i as f32 / self.count as f32;
            CurveSample {
                angle: t.mul_add(SPIRAL_SWEEP, self.phase_offset),
                height: lerp(self.y_start, self.y_end, t),
                radius: lerp(self.radius_start, self.radius_end, t),
            }
        })
    }
}

/// Place ornaments along a spiral of five turns.
#[instrument(skip(rng))]
pub fn spiral<R: Rng + ?Sized>(params: &SpiralParams, rng: &mut R) -> Vec<Instance> {
    params
        .samples()
        .map(|sample| Instance {
            position: sample.position(),
            rotation: params
                .random_rotation
                .then(|| Vec3::new(rng.gen::<f32>() * PI, rng.gen::<f32>() * PI, 0.)),
        })
        .collect()
}

/// The parameters of a garland wrapped around the tree as a helix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HelixParams {
    /// How many beads to thread.
    pub density: GarlandDensity,

    /// The radius of the helix at the bottom.
    pub radius_start: f32,

    /// The radius of the helix at the top.
    pub radius_end: f32,

    /// The height of the bottom of the helix.
    pub y_start: f32,

    /// The height of the top of the helix.
    pub y_end: f32,

    /// The number of full turns around the tree.
    pub turns: f32,
}

impl HelixParams {
    /// The samples along this helix, including the outward offset of the garland.
    pub fn samples(&self) -> impl Iterator<Item = CurveSample> + '_ {
        let count = self.density.bead_count();
        (0..count).map(move |i| {
            let t = i as f32 / count as f32;
            CurveSample {
                angle: t * TAU * self.turns,
                height: lerp(self.y_start, self.y_end, t),
                radius: lerp(self.radius_start, self.radius_end, t) + GARLAND_RADIAL_OFFSET,
            }
        })
    }
}

/// Place beads along a helix.
#[instrument]
pub fn helix(params: &HelixParams) -> Vec<Instance> {
    params
        .samples()
        .map(|sample| Instance::at(sample.position()))
        .collect()
}

/// A rough cone used to scatter fairy lights over the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConeProfile {
    /// The lowest height of a light.
    pub y_min: f32,

    /// The highest height of a light, where the cone comes to a point.
    pub y_max: f32,

    /// The radius of the cone at `y_min`.
    pub base_radius: f32,

    /// The smallest factor applied to the radius, which puts some lights inside the tree.
    pub depth_min: f32,

    /// The largest factor applied to the radius.
    pub depth_max: f32,
}

impl Default for ConeProfile {
    fn default() -> Self {
        Self {
            y_min: -0.5,
            y_max: 3.5,
            base_radius: 2.3,
            depth_min: 0.8,
            depth_max: 1.1,
        }
    }
}

impl ConeProfile {
    /// The radius of the cone at the given height, falling off linearly from the base.
    pub fn radius_at(&self, y: f32) -> f32 {
        let progress = (y - self.y_min) / (self.y_max - self.y_min);
        (1. - progress) * self.base_radius
    }
}

/// Scatter fairy lights randomly over the given cone.
///
/// Both `y_min..y_max` and `depth_min..depth_max` in the profile must be non-empty ranges.
#[instrument(skip(rng))]
pub fn scatter_fairy_lights<R: Rng + ?Sized>(
    count: usize,
    profile: &ConeProfile,
    rng: &mut R,
) -> Vec<Instance> {
    debug_assert!(
        profile.y_min < profile.y_max,
        "A cone profile needs y_min below y_max"
    );
    debug_assert!(
        profile.depth_min < profile.depth_max,
        "A cone profile needs depth_min below depth_max"
    );

    (0..count)
        .map(|_| {
            let height = rng.gen_range(profile.y_min..profile.y_max);
            let radius =
                profile.radius_at(height) * rng.gen_range(profile.depth_min..profile.depth_max);
            let angle = rng.gen_range(0.0..TAU);
            trace!(?height, ?radius, ?angle, "Fairy light");

            Instance::at(
                CurveSample {
                    angle,
                    height,
                    radius,
                }
                .position(),
            )
        })
        .collect()
}

/// A floating sparkle particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sparkle {
    /// The position of the sparkle.
    pub position: Vec3,

    /// The phase of the sparkle's twinkle, in radians.
    pub phase: f32,
}

/// Scatter sparkles uniformly through a cube with side length `scale`, centred on the origin.
#[instrument(skip(rng))]
pub fn sparkles<R: Rng + ?Sized>(count: usize, scale: f32, rng: &mut R) -> Vec<Sparkle> {
    (0..count)
        .map(|_| Sparkle {
            position: (rng.gen::<Vec3>() - Vec3::splat(0.5)) * scale,
            phase: rng.gen_range(0.0..TAU),
        })
        .collect()
}

/// Place background stars in a spherical shell from `radius` to `radius + depth`.
#[instrument(skip(rng))]
pub fn starfield<R: Rng + ?Sized>(count: usize, radius: f32, depth: f32, rng: &mut R) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let distance = depth.mul_add(rng.gen::<f32>(), radius);

            // Uniform over the sphere, not bunched at the poles
            let polar = (1. - 2. * rng.gen::<f32>()).acos();
            let azimuth = rng.gen_range(0.0..TAU);

            Vec3::new(
                polar.sin() * azimuth.cos(),
                polar.cos(),
                polar.sin() * azimuth.sin(),
            ) * distance
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn ornament_spiral(count: usize) -> SpiralParams {
        SpiralParams {
            count,
            y_start: -0.5,
            y_end: 3.,
            radius_start: 2.4,
            radius_end: 0.8,
            phase_offset: 0.,
            random_rotation: true,
        }
    }

    #[test]
    fn spiral_test() {
        let mut rng = StdRng::seed_from_u64(12345);

        for count in [1, 2, 15, 18, 100] {
            let params = ornament_spiral(count);
            let instances = spiral(&params, &mut rng);
            let samples: Vec<CurveSample> = params.samples().collect();
            assert_eq!(instances.len(), count);
            assert_eq!(samples.len(), count);

            let step = SPIRAL_SWEEP / count as f32;
            for pair in samples.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                assert!(b.angle > a.angle);
                assert!(approx_eq!(f32, b.angle - a.angle, step, epsilon = 1e-4));
                assert!(b.height > a.height);
                assert!(b.radius < a.radius);
            }

            for (instance, sample) in instances.iter().zip(&samples) {
                assert!((-0.5..=3.).contains(&sample.height));
                assert!((0.8..=2.4).contains(&sample.radius));
                assert!(approx_eq!(f32, instance.position.y, sample.height));

                let horizontal = instance.position.x.hypot(instance.position.z);
                assert!(approx_eq!(f32, horizontal, sample.radius, epsilon = 1e-4));

                let rotation = instance.rotation.unwrap();
                assert!((0.0..=PI).contains(&rotation.x));
                assert!((0.0..=PI).contains(&rotation.y));
                assert_eq!(rotation.z, 0.);
            }

            assert!(approx_eq!(f32, samples[0].height, -0.5));
            assert!(approx_eq!(f32, samples[0].radius, 2.4));
            assert_eq!(instances[0].position, Vec3::new(2.4, -0.5, 0.));
        }
    }

    #[test]
    fn spiral_phase_offset_test() {
        let mut rng = StdRng::seed_from_u64(12345);
        let params = SpiralParams {
            phase_offset: PI,
            random_rotation: false,
            ..ornament_spiral(15)
        };
        let instances = spiral(&params, &mut rng);

        assert!(instances.iter().all(|instance| instance.rotation.is_none()));
        assert!(approx_eq!(f32, instances[0].position.x, -2.4, epsilon = 1e-5));
        assert!(approx_eq!(f32, instances[0].position.z, 0., epsilon = 1e-5));
    }

    #[test]
    fn empty_spiral_test() {
        let mut rng = StdRng::seed_from_u64(12345);
        assert!(spiral(&ornament_spiral(0), &mut rng).is_empty());
    }

    #[test]
    fn helix_test() {
        let params = HelixParams {
            density: GarlandDensity::Fixed,
            radius_start: 2.6,
            radius_end: 0.4,
            y_start: -0.6,
            y_end: 3.8,
            turns: 4.5,
        };

        let beads = helix(&params);
        assert_eq!(beads.len(), 150);
        assert!(approx_eq!(f32, beads[0].position.x, 2.7));
        assert!(approx_eq!(f32, beads[0].position.y, -0.6));

        let samples: Vec<CurveSample> = params.samples().collect();
        let step = TAU * 4.5 / 150.;
        for pair in samples.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(approx_eq!(f32, b.angle - a.angle, step, epsilon = 1e-4));
            assert!(b.radius < a.radius);
            assert!(b.radius > 0.4);
        }

        let sparse = helix(&HelixParams {
            density: GarlandDensity::Count(40),
            ..params
        });
        assert_eq!(sparse.len(), 40);
    }

    #[test]
    fn scatter_fairy_lights_test() {
        let mut rng = StdRng::seed_from_u64(12345);
        let profile = ConeProfile::default();
        let lights = scatter_fairy_lights(500, &profile, &mut rng);
        assert_eq!(lights.len(), 500);

        for light in lights {
            let Vec3 { x, y, z } = light.position;
            assert!((profile.y_min..profile.y_max).contains(&y));

            let radius = x.hypot(z);
            let base = profile.radius_at(y);
            assert!(radius <= base * 1.1 + 1e-5);
            assert!(radius >= base * 0.8 - 1e-5);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "needs y_min below y_max")]
    fn scatter_fairy_lights_flat_profile_test() {
        let profile = ConeProfile {
            y_max: -0.5,
            ..ConeProfile::default()
        };
        scatter_fairy_lights(10, &profile, &mut StdRng::seed_from_u64(1));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "needs depth_min below depth_max")]
    fn scatter_fairy_lights_inverted_depth_test() {
        let profile = ConeProfile {
            depth_min: 1.1,
            depth_max: 0.8,
            ..ConeProfile::default()
        };
        scatter_fairy_lights(10, &profile, &mut StdRng::seed_from_u64(1));
    }

    #[test]
    fn cone_profile_test() {
        let profile = ConeProfile::default();
        assert!(approx_eq!(f32, profile.radius_at(-0.5), 2.3));
        assert!(approx_eq!(f32, profile.radius_at(1.5), 1.15));
        assert!(approx_eq!(f32, profile.radius_at(3.5), 0.));
    }

    #[test]
    fn sparkles_test() {
        let mut rng = StdRng::seed_from_u64(12345);
        let sparkles = sparkles(80, 7., &mut rng);
        assert_eq!(sparkles.len(), 80);

        for sparkle in sparkles {
            assert!(sparkle.position.abs().max_element() <= 3.5);
            assert!((0.0..TAU).contains(&sparkle.phase));
        }
    }

    #[test]
    fn starfield_test() {
        let mut rng = StdRng::seed_from_u64(12345);
        let stars = starfield(1000, 100., 50., &mut rng);
        assert_eq!(stars.len(), 1000);

        for star in &stars {
            let distance = star.length();
            assert!((99.99..=150.01).contains(&distance));
        }

        // Roughly as many stars above the horizon as below
        let above = stars.iter().filter(|star| star.y > 0.).count();
        assert!((400..=600).contains(&above));
    }
}
