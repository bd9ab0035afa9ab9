//! This module contains the per-frame systems that move the tree and follow the config.

use crate::bevy_setup::{
    colour, emissive, to_bevy, to_glam, AccentLight, ActiveConfig, DecorationMaterials,
    Decorations, FloatingGroup, SparkleMarker, StarLight, StarMarker, TreeSpin, BLOOM_SCALE,
};
use arix_config::hex_colour;
use arix_tree::{
    animation::{auto_rotate_angle, float_pose, sparkle_alpha, star_pose, tree_yaw},
    scene::orbit_around,
    SceneLayout,
};
use bevy::{core_pipeline::bloom::BloomSettings, prelude::*, time::Stopwatch};
use smooth_bevy_cameras::LookTransform;
use tracing::{debug, instrument};
use tracing_unwrap::OptionExt;

/// The time that the tree has spent spinning. Paused while rotation is off.
#[derive(Resource, Default)]
pub struct SpinClock(Stopwatch);

/// A random offset into the floating cycle, so that every session floats differently.
#[derive(Resource, Clone, Copy, Debug)]
pub struct FloatPhase(pub f32);

/// Spin the tree while rotation is enabled.
pub(super) fn spin_tree(
    time: Res<Time>,
    config: Res<ActiveConfig>,
    mut clock: ResMut<SpinClock>,
    mut query: Query<&mut Transform, With<TreeSpin>>,
) {
    if config.is_rotating {
        clock.0.tick(time.delta());
    }

    let rotation = Quat::from_rotation_y(tree_yaw(clock.0.elapsed_secs()));
    for mut transform in query.iter_mut() {
        transform.rotation = rotation;
    }
}

/// Bob the tree gently up and down.
pub(super) fn float_tree(
    time: Res<Time>,
    phase: Res<FloatPhase>,
    mut query: Query<&mut Transform, With<FloatingGroup>>,
) {
    let pose = float_pose(time.elapsed_seconds(), phase.0);
    for mut transform in query.iter_mut() {
        transform.translation.y = pose.lift;
        transform.rotation = Quat::from_euler(
            EulerRot::XYZ,
            pose.rotation.x,
            pose.rotation.y,
            pose.rotation.z,
        );
    }
}

/// Spin, rock, and pulse the star.
pub(super) fn animate_star(time: Res<Time>, mut query: Query<&mut Transform, With<StarMarker>>) {
    let pose = star_pose(time.elapsed_seconds());
    for mut transform in query.iter_mut() {
        transform.rotation = Quat::from_euler(EulerRot::XYZ, 0., pose.yaw, pose.roll);
        transform.scale = Vec3::splat(pose.scale);
    }
}

/// Twinkle the sparkles in the light colour.
pub(super) fn animate_sparkles(
    time: Res<Time>,
    config: Res<ActiveConfig>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    query: Query<(&SparkleMarker, &Handle<StandardMaterial>)>,
) {
    let elapsed = time.elapsed_seconds();
    for (&SparkleMarker(phase), handle) in query.iter() {
        if let Some(material) = materials.get_mut(handle) {
            let mut base_color = colour(config.light_colour);
            base_color.set_a(sparkle_alpha(elapsed, phase));
            material.base_color = base_color;
        }
    }
}

/// Auto-rotate the camera while rotation is enabled, and keep it within the orbit limits.
pub(super) fn orbit_camera(
    time: Res<Time>,
    config: Res<ActiveConfig>,
    mut query: Query<&mut LookTransform>,
) {
    let limits = SceneLayout::for_config(&config).orbit;

    for mut look in query.iter_mut() {
        let target = to_glam(look.target);
        let mut eye = to_glam(look.eye);

        if limits.auto_rotate {
            eye = orbit_around(eye, target, auto_rotate_angle(time.delta_seconds()));
        }

        look.eye = to_bevy(limits.clamp(eye, target));
    }
}

/// Recolour the decorations and lights whenever the config changes. The decorations stay where
/// they are.
#[allow(clippy::too_many_arguments)]
#[instrument(skip_all)]
pub(super) fn apply_tree_config(
    config: Res<ActiveConfig>,
    mut decorations: ResMut<Decorations>,
    handles: Option<Res<DecorationMaterials>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut accent_lights: Query<&mut PointLight, (With<AccentLight>, Without<StarLight>)>,
    mut star_lights: Query<&mut PointLight, (With<StarLight>, Without<AccentLight>)>,
    mut bloom: Query<&mut BloomSettings>,
) {
    // The materials are only inserted once the tree has been added to the world
    let Some(handles) = handles else {
        return;
    };
    if !config.is_changed() && !handles.is_added() {
        return;
    }
    debug!(
        ornaments = %hex_colour(config.ornament_colour),
        lights = %hex_colour(config.light_colour),
        intensity = config.intensity,
        "Applying tree config"
    );

    decorations.recolour(&config);
    let layout = SceneLayout::for_config(&config);

    let ornaments = materials.get_mut(&handles.ornaments).unwrap_or_log();
    ornaments.base_color = colour(decorations.primary_ornaments.colour);

    let garland = materials.get_mut(&handles.garland).unwrap_or_log();
    garland.base_color = colour(decorations.garland.colour);
    garland.emissive = emissive(decorations.garland.colour, 0.2);

    let fairy_lights = materials.get_mut(&handles.fairy_lights).unwrap_or_log();
    fairy_lights.base_color = colour(decorations.fairy_lights.colour);
    fairy_lights.emissive = emissive(decorations.fairy_lights.colour, 3.);

    let star = decorations.star;
    let star_material = materials.get_mut(&handles.star).unwrap_or_log();
    star_material.base_color = colour(star.colour);
    star_material.emissive = emissive(star.colour, star.emissive_strength);

    for mut light in star_lights.iter_mut() {
        light.color = colour(star.colour);
    }
    for mut light in accent_lights.iter_mut() {
        light.color = colour(layout.accent_light.colour);
    }
    for mut settings in bloom.iter_mut() {
        settings.intensity = layout.bloom.intensity * BLOOM_SCALE;
    }
}
