//! This module computes the per-frame motion of the tree as pure functions of elapsed time.
//!
//! The renderer evaluates these once per frame. None of them keep any state between frames.

use glam::Vec3;
use std::f32::consts::TAU;

/// How fast the tree spins while rotation is enabled, in radians per second.
const TREE_SPIN_SPEED: f32 = 0.15;

/// How fast the star spins (in the opposite direction to the tree), in radians per second.
const STAR_SPIN_SPEED: f32 = 0.5;

/// How far the star rocks side to side, in radians.
const STAR_ROCK: f32 = 0.1;

/// How much the star pulses, as a proportion of its size.
const STAR_PULSE: f32 = 0.05;

/// The speed of the gentle float of the whole tree.
const FLOAT_SPEED: f32 = 2.;

/// How much the tree tilts while floating.
const FLOAT_ROTATION_INTENSITY: f32 = 0.05;

/// How far the tree bobs up and down while floating.
const FLOAT_INTENSITY: f32 = 0.1;

/// The speed of the camera auto-rotation, where 1 is one full orbit per minute.
const AUTO_ROTATE_SPEED: f32 = 0.5;

/// The peak opacity of a sparkle.
pub const SPARKLE_OPACITY: f32 = 0.6;

/// The twinkle speed of the sparkles, in cycles per second.
const SPARKLE_SPEED: f32 = 0.3;

/// The yaw of the tree after it has spent `spin_seconds` seconds rotating.
///
/// The renderer should only accumulate `spin_seconds` while rotation is enabled, so that stopping
/// and restarting the rotation carries on from where it left off.
pub fn tree_yaw(spin_seconds: f32) -> f32 {
    spin_seconds * TREE_SPIN_SPEED
}

/// The pose of the star relative to its resting position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarPose {
    /// Rotation about the vertical axis.
    pub yaw: f32,

    /// Rotation about the viewing axis.
    pub roll: f32,

    /// Uniform scale.
    pub scale: f32,
}

/// The pose of the star at the given elapsed time in seconds.
pub fn star_pose(elapsed: f32) -> StarPose {
    StarPose {
        yaw: -STAR_SPIN_SPEED * elapsed,
        roll: elapsed.sin() * STAR_ROCK,
        scale: (2. * elapsed).sin().mul_add(STAR_PULSE, 1.),
    }
}

/// The offset of the tree while it floats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatPose {
    /// The Euler angles (XYZ) of the tilt.
    pub rotation: Vec3,

    /// The vertical offset.
    pub lift: f32,
}

/// The floating pose of the tree at the given elapsed time, where `phase` shifts the cycle.
pub fn float_pose(elapsed: f32, phase: f32) -> FloatPose {
    let angle = (elapsed + phase) / 4. * FLOAT_SPEED;
    let (sin, cos) = angle.sin_cos();

    FloatPose {
        rotation: Vec3::new(cos / 8., sin / 8., sin / 20.) * FLOAT_ROTATION_INTENSITY,
        lift: sin / 10. * FLOAT_INTENSITY,
    }
}

/// How far the camera auto-rotates around the tree in `delta` seconds, in radians.
pub fn auto_rotate_angle(delta: f32) -> f32 {
    TAU / 60. * AUTO_ROTATE_SPEED * delta
}

/// The opacity of a sparkle with the given phase at the given elapsed time.
pub fn sparkle_alpha(elapsed: f32, phase: f32) -> f32 {
    let wave = (elapsed * SPARKLE_SPEED).mul_add(TAU, phase).sin();
    wave.mul_add(0.5, 0.5) * SPARKLE_OPACITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn tree_yaw_test() {
        assert_eq!(tree_yaw(0.), 0.);
        assert!(approx_eq!(f32, tree_yaw(10.), 1.5));
        assert!(approx_eq!(f32, tree_yaw(4.) + tree_yaw(6.), tree_yaw(10.)));
    }

    #[test]
    fn star_pose_test() {
        let rest = star_pose(0.);
        assert_eq!(rest.yaw, 0.);
        assert_eq!(rest.roll, 0.);
        assert_eq!(rest.scale, 1.);

        let pose = star_pose(FRAC_PI_2);
        assert!(approx_eq!(f32, pose.yaw, -FRAC_PI_2 * 0.5));
        assert!(approx_eq!(f32, pose.roll, 0.1));
        assert!(approx_eq!(f32, pose.scale, 1., epsilon = 1e-6));

        for i in 0..1000 {
            let pose = star_pose(i as f32 * 0.037);
            assert!((0.95..=1.05).contains(&pose.scale));
            assert!(pose.roll.abs() <= 0.1);
        }
    }

    #[test]
    fn float_pose_test() {
        for i in 0..1000 {
            let pose = float_pose(i as f32 * 0.05, 1.3);
            assert!(pose.lift.abs() <= 0.01 + f32::EPSILON);
            assert!(pose.rotation.abs().max_element() <= 0.05 / 8. + f32::EPSILON);
        }
    }

    #[test]
    fn auto_rotate_angle_test() {
        // Half a full orbit per minute
        assert!(approx_eq!(f32, auto_rotate_angle(60.), TAU / 2.));
        assert_eq!(auto_rotate_angle(0.), 0.);
    }

    #[test]
    fn sparkle_alpha_test() {
        for i in 0..1000 {
            let alpha = sparkle_alpha(i as f32 * 0.01, 0.7);
            assert!((0.0..=SPARKLE_OPACITY + f32::EPSILON).contains(&alpha));
        }
    }
}
