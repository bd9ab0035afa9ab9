//! This module handles things to setup bevy for the tree scene.

use arix_config::{RGBArray, TreeConfig};
use arix_tree::{
    mesh::{frustum, octahedron, MeshData},
    placement::starfield,
    tree::{InstanceSet, EMERALD, LAYER_HEIGHT, SCENE_OFFSET, TREE_LAYERS, TREE_OFFSET},
    DecoratedTree, SceneLayout,
};
use bevy::{
    core_pipeline::bloom::BloomSettings,
    prelude::*,
    render::{mesh::Indices, render_resource::PrimitiveTopology},
};
use rand::rngs::StdRng;
use smooth_bevy_cameras::controllers::orbit::{OrbitCameraBundle, OrbitCameraController};
use tracing::debug;

/// Converts the intensity scale of [`SceneLayout`] lights into lumens.
pub(super) const LUMENS_PER_UNIT: f32 = 400.;

/// Converts the intensity of [`arix_tree::scene::BloomSpec`] into Bevy's bloom intensity.
pub(super) const BLOOM_SCALE: f32 = 0.2;

/// The tree config for this session, changed by the overlay controls.
#[derive(Resource, Deref, DerefMut)]
pub struct ActiveConfig(pub TreeConfig);

/// The layout of the decorations on the tree.
#[derive(Resource, Deref, DerefMut)]
pub struct Decorations(pub DecoratedTree);

/// The RNG used for anything random in the scene, seeded from the settings if possible.
#[derive(Resource)]
pub struct SeededRng(pub StdRng);

/// The materials shared by each set of decorations, so that recolouring them is one asset change
/// per set.
#[derive(Resource)]
pub(super) struct DecorationMaterials {
    pub(super) ornaments: Handle<StandardMaterial>,
    pub(super) garland: Handle<StandardMaterial>,
    pub(super) fairy_lights: Handle<StandardMaterial>,
    pub(super) star: Handle<StandardMaterial>,
}

/// The group that spins the tree.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct TreeSpin;

/// The group that floats gently up and down.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct FloatingGroup;

/// The star on top of the tree.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct StarMarker;

/// The light inside the star.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct StarLight;

/// The light in the theme colour in front of the base.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct AccentLight;

/// A sparkle with its twinkle phase.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct SparkleMarker(pub(super) f32);

/// Convert a vector from the tree crates into a Bevy vector.
pub(super) fn to_bevy(v: glam::Vec3) -> Vec3 {
    Vec3::from_array(v.to_array())
}

/// Convert a Bevy vector into a vector for the tree crates.
pub(super) fn to_glam(v: Vec3) -> glam::Vec3 {
    glam::Vec3::from_array(v.to_array())
}

/// Convert an sRGB colour into a Bevy colour.
pub(super) fn colour([r, g, b]: RGBArray) -> Color {
    Color::rgb_u8(r, g, b)
}

/// An emissive colour of the given strength.
pub(super) fn emissive(rgb: RGBArray, strength: f32) -> Color {
    let linear = colour(rgb).as_rgba_linear();
    Color::rgb_linear(
        linear.r() * strength,
        linear.g() * strength,
        linear.b() * strength,
    )
}

/// Turn generated vertex data into a Bevy mesh.
fn into_mesh(data: MeshData) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.uvs);
    mesh.set_indices(Some(Indices::U32(data.indices)));
    mesh
}

/// A sphere mesh for a set of decorations.
fn sphere_mesh(radius: f32, detail: usize) -> Mesh {
    Mesh::from(shape::UVSphere {
        radius,
        sectors: detail,
        stacks: detail,
    })
}

/// Setup the Bevy world with a camera, lights, the floor, and background stars.
pub(super) fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<ActiveConfig>,
    mut rng: ResMut<SeededRng>,
) {
    let layout = SceneLayout::for_config(&config);

    // Hold LControl to orbit the camera
    commands
        .spawn((
            Camera3dBundle {
                camera: Camera {
                    hdr: true,
                    ..default()
                },
                projection: Projection::Perspective(PerspectiveProjection {
                    fov: layout.camera.fov_degrees.to_radians(),
                    ..default()
                }),
                ..default()
            },
            BloomSettings {
                intensity: layout.bloom.intensity * BLOOM_SCALE,
                threshold: layout.bloom.threshold,
                ..default()
            },
        ))
        .insert(OrbitCameraBundle::new(
            OrbitCameraController {
                mouse_rotate_sensitivity: Vec2::splat(0.25),
                mouse_translate_sensitivity: Vec2::ZERO,
                smoothing_weight: 0.1,
                ..default()
            },
            to_bevy(layout.camera.eye),
            to_bevy(layout.camera.target),
            Vec3::Y,
        ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: layout.ambient_intensity,
    });

    let key = layout.key_light;
    commands.spawn(SpotLightBundle {
        spot_light: SpotLight {
            color: colour(key.colour),
            intensity: key.intensity * LUMENS_PER_UNIT,
            range: 40.,
            outer_angle: key.angle,
            inner_angle: 0.,
            shadows_enabled: key.shadows,
            ..default()
        },
        transform: Transform::from_translation(to_bevy(key.position))
            .looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    let fill = layout.fill_light;
    commands.spawn(PointLightBundle {
        point_light: PointLight {
            color: colour(fill.colour),
            intensity: fill.intensity * LUMENS_PER_UNIT,
            shadows_enabled: false,
            ..default()
        },
        transform: Transform::from_translation(to_bevy(fill.position)),
        ..default()
    });

    let accent = layout.accent_light;
    commands.spawn((
        PointLightBundle {
            point_light: PointLight {
                color: colour(accent.colour),
                intensity: accent.intensity * LUMENS_PER_UNIT,
                range: accent.range.unwrap_or(20.),
                shadows_enabled: false,
                ..default()
            },
            transform: Transform::from_translation(to_bevy(accent.position)),
            ..default()
        },
        AccentLight,
    ));

    // Floor
    let ground = layout.ground;
    commands.spawn(PbrBundle {
        mesh: meshes.add(Mesh::from(shape::Plane { size: ground.size })),
        material: materials.add(StandardMaterial {
            base_color: colour(ground.colour),
            perceptual_roughness: ground.roughness,
            ..default()
        }),
        transform: Transform::from_xyz(0., ground.height, 0.),
        ..default()
    });

    // Background stars all share one mesh and one material
    let star_mesh = meshes.add(sphere_mesh(0.15, 4));
    let star_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });

    debug!("Adding stars to the sky");
    for position in starfield(
        layout.stars.count,
        layout.stars.radius,
        layout.stars.depth,
        &mut rng.0,
    ) {
        commands.spawn(PbrBundle {
            mesh: star_mesh.clone(),
            material: star_material.clone(),
            transform: Transform::from_translation(to_bevy(position)),
            ..default()
        });
    }
    debug!("Finished adding stars to the sky");
}

/// Spawn a set of decorations as children of the given builder, all sharing one mesh.
fn spawn_instance_set(
    builder: &mut ChildBuilder,
    meshes: &mut Assets<Mesh>,
    set: &InstanceSet,
    material: &Handle<StandardMaterial>,
    detail: usize,
) {
    let mesh = meshes.add(sphere_mesh(set.size, detail));

    for instance in &set.instances {
        let mut transform = Transform::from_translation(to_bevy(instance.position));
        if let Some(rotation) = instance.rotation {
            transform.rotation = Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
        }

        builder.spawn(PbrBundle {
            mesh: mesh.clone(),
            material: material.clone(),
            transform,
            ..default()
        });
    }
}

/// Add the decorated tree to the world.
pub(super) fn add_tree_to_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    tree: Res<Decorations>,
) {
    let leaf_material = materials.add(StandardMaterial {
        base_color: colour(EMERALD),
        emissive: emissive(EMERALD, 0.1),
        perceptual_roughness: 0.7,
        metallic: 0.1,
        ..default()
    });
    let base_material = materials.add(StandardMaterial {
        base_color: colour(tree.base.colour),
        perceptual_roughness: 0.8,
        ..default()
    });

    let decoration_materials = DecorationMaterials {
        ornaments: materials.add(StandardMaterial {
            base_color: colour(tree.primary_ornaments.colour),
            perceptual_roughness: 0.1,
            metallic: 1.,
            reflectance: 1.,
            ..default()
        }),
        garland: materials.add(StandardMaterial {
            base_color: colour(tree.garland.colour),
            emissive: emissive(tree.garland.colour, 0.2),
            perceptual_roughness: 0.2,
            metallic: 0.8,
            ..default()
        }),
        fairy_lights: materials.add(StandardMaterial {
            base_color: colour(tree.fairy_lights.colour),
            emissive: emissive(tree.fairy_lights.colour, 3.),
            ..default()
        }),
        star: materials.add(StandardMaterial {
            base_color: colour(tree.star.colour),
            emissive: emissive(tree.star.colour, tree.star.emissive_strength),
            ..default()
        }),
    };

    let layer_meshes: Vec<Handle<Mesh>> = TREE_LAYERS
        .iter()
        .map(|layer| meshes.add(into_mesh(frustum(layer.radius, 0., LAYER_HEIGHT, 64))))
        .collect();
    let base_mesh = meshes.add(into_mesh(frustum(
        tree.base.radius_bottom,
        tree.base.radius_top,
        tree.base.height,
        32,
    )));
    let star_mesh = meshes.add(into_mesh(octahedron(tree.star.radius)));
    let sparkle_mesh = meshes.add(sphere_mesh(0.03, 6));

    debug!(instances = tree.instance_count(), "Adding tree to world");
    commands
        .spawn(SpatialBundle {
            transform: Transform::from_translation(to_bevy(SCENE_OFFSET)),
            ..default()
        })
        .with_children(|scene| {
            scene
                .spawn((
                    SpatialBundle {
                        transform: Transform::from_translation(to_bevy(TREE_OFFSET)),
                        ..default()
                    },
                    TreeSpin,
                ))
                .with_children(|spin| {
                    spin.spawn((SpatialBundle::default(), FloatingGroup))
                        .with_children(|floating| {
                            for (layer, mesh) in TREE_LAYERS.iter().zip(&layer_meshes) {
                                floating.spawn(PbrBundle {
                                    mesh: mesh.clone(),
                                    material: leaf_material.clone(),
                                    transform: Transform::from_xyz(0., layer.y, 0.),
                                    ..default()
                                });
                            }

                            spawn_instance_set(
                                floating,
                                &mut meshes,
                                &tree.primary_ornaments,
                                &decoration_materials.ornaments,
                                16,
                            );
                            spawn_instance_set(
                                floating,
                                &mut meshes,
                                &tree.secondary_ornaments,
                                &decoration_materials.ornaments,
                                16,
                            );
                            spawn_instance_set(
                                floating,
                                &mut meshes,
                                &tree.garland,
                                &decoration_materials.garland,
                                8,
                            );
                            spawn_instance_set(
                                floating,
                                &mut meshes,
                                &tree.fairy_lights,
                                &decoration_materials.fairy_lights,
                                8,
                            );

                            floating
                                .spawn((
                                    PbrBundle {
                                        mesh: star_mesh.clone(),
                                        material: decoration_materials.star.clone(),
                                        transform: Transform::from_translation(to_bevy(
                                            tree.star.position,
                                        )),
                                        ..default()
                                    },
                                    StarMarker,
                                ))
                                .with_children(|star| {
                                    star.spawn((
                                        PointLightBundle {
                                            point_light: PointLight {
                                                color: colour(tree.star.colour),
                                                intensity: tree.star.light_intensity
                                                    * LUMENS_PER_UNIT,
                                                range: tree.star.light_range,
                                                shadows_enabled: false,
                                                ..default()
                                            },
                                            ..default()
                                        },
                                        StarLight,
                                    ));
                                });

                            // Each sparkle has its own material so it can twinkle on its own
                            for sparkle in &tree.sparkles {
                                floating.spawn((
                                    PbrBundle {
                                        mesh: sparkle_mesh.clone(),
                                        material: materials.add(StandardMaterial {
                                            base_color: colour(tree.sparkle_colour),
                                            alpha_mode: AlphaMode::Blend,
                                            unlit: true,
                                            ..default()
                                        }),
                                        transform: Transform::from_translation(to_bevy(
                                            sparkle.position,
                                        )),
                                        ..default()
                                    },
                                    SparkleMarker(sparkle.phase),
                                ));
                            }
                        });

                    spin.spawn(PbrBundle {
                        mesh: base_mesh.clone(),
                        material: base_material.clone(),
                        transform: Transform::from_translation(to_bevy(tree.base.position)),
                        ..default()
                    });
                });
        });
    debug!("Finished adding tree to world");

    commands.insert_resource(decoration_materials);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_test() {
        let v = glam::Vec3::new(1., -2., 3.5);
        assert_eq!(to_glam(to_bevy(v)), v);
    }

    #[test]
    fn emissive_test() {
        assert_eq!(emissive([0, 0, 0], 3.), Color::rgb_linear(0., 0., 0.));

        let bright = emissive([255, 255, 255], 3.);
        assert!((bright.r() - 3.).abs() < 1e-4);
        assert!((bright.g() - 3.).abs() < 1e-4);
        assert!((bright.b() - 3.).abs() < 1e-4);
    }

    #[test]
    fn into_mesh_test() {
        let mesh = into_mesh(octahedron(0.45));
        assert_eq!(mesh.count_vertices(), 24);
        assert_eq!(mesh.indices().map(|indices| indices.len()), Some(24));
    }
}
