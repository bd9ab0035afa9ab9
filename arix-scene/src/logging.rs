//! This module sets up logging with `tracing`.

use tracing_subscriber::{filter::LevelFilter, fmt::Layer, prelude::*, EnvFilter};
use tracing_unwrap::ResultExt;

/// Initialise a subscriber for tracing to log to `stdout`, filtered by `RUST_LOG`.
///
/// Bevy's own log plugin is disabled, so this subscriber sees Bevy's logs too. The renderer's are
/// very noisy, so they're limited to warnings unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
        .add_directive("wgpu=warn".parse().expect_or_log("Directive should be valid"))
        .add_directive("naga=warn".parse().expect_or_log("Directive should be valid"));

    let subscriber = tracing_subscriber::registry().with(
        Layer::new()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_filter(filter),
    );

    tracing::subscriber::set_global_default(subscriber)
        .expect_or_log("Setting the global default for tracing should be okay");
}
