//! GL-facing half of the crate: driver seam, capability probing, format
//! translation, framebuffer allocation, multisample resolve, and the
//! context facade tying them together.
//!
//! # Module overview
//!
//! - [`api`] -- The narrow `GlApi` driver trait and its glow-backed adapter.
//! - [`capabilities`] -- Profile flag + extension set probed once at creation.
//! - [`formats`] -- Desktop/ES format translation strategies (pure).
//! - [`targets`] -- FBO/renderbuffer/texture ownership and reshape.
//! - [`resolve`] -- Multisample color blit into the resolve framebuffer.
//! - [`context`] -- The `GraphicsContext` facade and its public operations.

pub mod api;
pub mod capabilities;
pub mod context;
pub mod formats;
pub mod resolve;
pub mod targets;

#[cfg(test)]
pub(crate) mod fake;

// Re-export key types at the gl module level for convenience.
pub use api::{GlApi, GlowApi, ShaderPrecision};
pub use capabilities::Capabilities;
pub use context::{GraphicsContext, NativeContext};
pub use formats::{ColorFormats, ProfileFormats};
pub use targets::{DepthStencilBuffers, DrawingBuffers};
