// Structured logging setup for the hydra binary.

use crate::errors::{HydraError, HydraResult};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parse a level name such as "info" or "DEBUG".
pub fn parse_level(level: &str) -> HydraResult<Level> {
    level
        .parse::<Level>()
        .map_err(|_| HydraError::config(format!("unknown log level '{level}'")))
}

/// Install the global fmt subscriber. Only the first call has any effect.
pub fn init_tracing(level: &str) -> HydraResult<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(level)?)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
    Ok(())
}
