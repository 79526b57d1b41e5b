//! Error types for the glcanvas core.

use thiserror::Error;

/// Errors produced by graphics-context operations.
///
/// Every error is local to a single call; none is fatal to the surface.
/// `IncompleteFramebuffer` in particular leaves the surface in a degraded
/// but usable state.
#[derive(Debug, Clone, Error)]
pub enum ContextError {
    /// A caller supplied an argument the operation cannot accept.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),

    /// The driver rejected the attachment configuration after a resize.
    /// The surface stays allocated; rendering may be degraded.
    #[error("framebuffer incomplete: status 0x{status:04X}")]
    IncompleteFramebuffer {
        /// The raw status returned by the completeness check.
        status: u32,
    },

    /// The operation needs a capability the active profile does not have.
    #[error("missing capability: {0}")]
    MissingCapability(&'static str),

    /// An enum value outside the operation's accepted set.
    #[error("invalid enum: 0x{value:04X}")]
    InvalidEnum {
        /// The rejected enum value.
        value: u32,
    },

    /// The driver failed to hand out a framebuffer, renderbuffer, or
    /// texture handle.
    #[error("failed to allocate GPU resource: {0}")]
    ResourceAllocation(String),
}
