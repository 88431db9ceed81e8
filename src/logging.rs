use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::prelude::*;

/// Install a stderr subscriber at the given level for the current thread,
/// returning a guard that restores the previous subscriber on drop.
///
/// Providers only emit events; whether anything listens is up to the
/// embedding application, which may just as well install its own subscriber
/// and ignore this helper.
pub fn setup_logging(level: &str) -> anyhow::Result<DefaultGuard> {
    let level = LevelFilter::from_str(level)?;
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let subscriber = tracing_subscriber::registry().with(level).with(layer);
    Ok(tracing::subscriber::set_default(subscriber))
}
