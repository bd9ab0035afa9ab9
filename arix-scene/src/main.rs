//! This crate provides the binary that renders the decorated tree in a window, with keyboard
//! controls for the theme, rotation, and lights, and a dialog to write greeting cards.

mod animate;
mod bevy_setup;
mod greeting_task;
mod logging;
mod overlay;

use self::{
    animate::{
        animate_sparkles, animate_star, apply_tree_config, float_tree, orbit_camera, spin_tree,
        FloatPhase, SpinClock,
    },
    bevy_setup::{add_tree_to_world, setup, ActiveConfig, Decorations, SeededRng},
    greeting_task::GreetingRuntime,
    overlay::{
        overlay_input, receive_greetings, setup_overlay, update_overlay, GreetingDialog,
        OverlayConfig,
    },
};
use arix_config::Settings;
use arix_greeting::GreetingService;
use arix_tree::DecoratedTree;
use bevy::{log::LogPlugin, prelude::*, DefaultPlugins};
use clap::Parser;
use color_eyre::eyre::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use smooth_bevy_cameras::{controllers::orbit::OrbitCameraPlugin, LookTransformPlugin};
use std::{path::PathBuf, sync::Arc};
use tracing::{info, instrument};

/// Render the Arix Signature Tree.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// A RON file of startup settings. Defaults are used if it doesn't exist.
    #[arg(long, default_value = "arix-settings.ron")]
    settings: PathBuf,

    /// A seed for the decoration layout, overriding the one in the settings.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init_tracing();

    let args = Args::parse();
    let mut settings = Settings::from_file_or_default(&args.settings)
        .wrap_err_with(|| format!("Unable to load settings from {:?}", args.settings))?;
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    let greetings = GreetingRuntime::new(
        Arc::new(GreetingService::from_env(&settings.greeting)),
        settings.greeting.tone.clone(),
    )
    .wrap_err("Unable to start the async runtime for greetings")?;

    run_scene(settings, greetings);
    Ok(())
}

/// Run the scene with Bevy until the window is closed.
#[instrument(skip_all)]
fn run_scene(settings: Settings, greetings: GreetingRuntime) {
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let tree = DecoratedTree::new(&settings.tree, settings.garland, &mut rng);
    let float_phase = FloatPhase(rng.gen_range(0.0..1000.));
    let overlay = OverlayConfig {
        font: settings.window.font.clone(),
        title: settings.window.title.clone(),
    };

    info!("Starting bevy app");
    App::new()
        .insert_resource(Msaa { samples: 4 })
        .insert_resource(ClearColor(Color::rgb_u8(0x02, 0x0A, 0x06)))
        .insert_resource(ActiveConfig(settings.tree.clone()))
        .insert_resource(Decorations(tree))
        .insert_resource(SeededRng(rng))
        .insert_resource(float_phase)
        .insert_resource(SpinClock::default())
        .insert_resource(GreetingDialog::default())
        .insert_resource(overlay)
        .insert_resource(greetings)
        .add_plugins(
            DefaultPlugins
                .build()
                .disable::<LogPlugin>()
                .set(WindowPlugin {
                    window: WindowDescriptor {
                        title: settings.window.title.clone(),
                        width: settings.window.width,
                        height: settings.window.height,
                        ..default()
                    },
                    ..default()
                }),
        )
        .add_plugin(LookTransformPlugin)
        .add_plugin(OrbitCameraPlugin::default())
        .add_startup_system(setup)
        .add_startup_system(add_tree_to_world)
        .add_startup_system(setup_overlay)
        .add_system(overlay_input)
        .add_system(receive_greetings)
        .add_system(update_overlay)
        .add_system(apply_tree_config)
        .add_system(spin_tree)
        .add_system(float_tree)
        .add_system(animate_star)
        .add_system(animate_sparkles)
        .add_system(orbit_camera)
        .run();
}

