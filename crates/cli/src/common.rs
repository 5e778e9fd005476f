//! Helpers shared by the command-line binaries.

use std::path::Path;

use anyhow::{Context, anyhow};
use orrery::bodies::{BodyId, System, load_system};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log to stderr so that stdout stays free for data; filtered by `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
}

pub fn load_catalog(path: &Path) -> anyhow::Result<System> {
    load_system(path).with_context(|| format!("failed to load catalog {}", path.display()))
}

/// Body by name, ignoring case.
pub fn find_body(system: &System, name: &str) -> anyhow::Result<BodyId> {
    system
        .find_ignore_case(name)
        .ok_or_else(|| anyhow!("unknown body '{name}'"))
}
