//! Error types for the Strider behavior core.

use thiserror::Error;

use crate::types::{Role, StateId};

/// Top-level error type for all Strider operations.
///
/// Runtime configuration faults (a missing adapter, an empty waypoint list)
/// are not errors: they are logged and the affected update is skipped. This
/// type covers what must be rejected up front.
#[derive(Error, Debug)]
pub enum StriderError {
    /// The role registry has no policy for a role the character was given.
    #[error("Role registry has no policy for {0:?}")]
    MissingRole(Role),

    /// The state registry has no behavior for a state id.
    #[error("State registry has no behavior for {0:?}")]
    MissingState(StateId),

    /// A registered behavior reports a different id than the key it was
    /// registered under.
    #[error("State behavior registered as {registered:?} reports itself as {reported:?}")]
    MismatchedState {
        /// Key used when registering.
        registered: StateId,
        /// Id reported by the behavior.
        reported: StateId,
    },

    /// A rest area id does not exist in the registry.
    #[error("Rest area not found: {0}")]
    UnknownRestArea(crate::RestAreaId),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, StriderError>;
