//! Error types for folder construction and stream termination.
//!
//! Errors travel in-band on streams (`Emission::Error`) and terminate the
//! stream that carries them, so every variant is `Clone`.

use thiserror::Error;

use crate::types::NodeId;

/// Errors surfaced by the folder core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FolderError {
    /// The event source adapter refused to provide interactions for a scope.
    #[error("event source unavailable for scope {scope}")]
    SourceUnavailable { scope: String },

    /// The identity generator produced an id that is already live.
    #[error("identity {0} is already live")]
    IdentityCollision(NodeId),

    /// A proxy stream was asked to imitate a second source.
    #[error("proxy stream is already bound to a source")]
    ProxyAlreadyBound,
}
