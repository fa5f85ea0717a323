//! Engine error types.

use thiserror::Error;

/// Errors surfaced to the host.
///
/// Gameplay rule violations (not enough mass, action on cooldown, a cell that
/// is not covered) are never errors; they simply skip the action.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No controllers detected")]
    NoControllers,

    #[error("Invalid color palette: {0}")]
    Palette(#[from] serde_json::Error),
}
