//! Requested surface configuration and its capability-driven validation.
//!
//! [`SurfaceAttributes`] is what the embedder asks for when it creates a
//! canvas surface. The request is immutable once the surface exists, but
//! validation may downgrade it first: flags the active driver profile
//! cannot honor are forced off rather than rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gl::capabilities::Capabilities;

/// Requested logical configuration for a canvas surface.
///
/// Defaults follow the usual canvas-context contract: color with alpha,
/// a depth buffer, no stencil, antialiasing on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceAttributes {
    /// Whether the color buffer carries an alpha channel.
    pub alpha: bool,
    /// Whether a depth buffer is requested.
    pub depth: bool,
    /// Whether a stencil buffer is requested.
    pub stencil: bool,
    /// Whether the surface should be multisampled.
    pub antialias: bool,
}

impl Default for SurfaceAttributes {
    fn default() -> Self {
        Self {
            alpha: true,
            depth: true,
            stencil: false,
            antialias: true,
        }
    }
}

impl SurfaceAttributes {
    /// Builds attributes from a JSON object, falling back to the default
    /// for each missing or mistyped key.
    pub fn from_params(params: &Value) -> Self {
        let defaults = Self::default();
        Self {
            alpha: param_bool(params, "alpha", defaults.alpha),
            depth: param_bool(params, "depth", defaults.depth),
            stencil: param_bool(params, "stencil", defaults.stencil),
            antialias: param_bool(params, "antialias", defaults.antialias),
        }
    }

    /// Downgrades the request to what the active profile can honor.
    ///
    /// - A stencil buffer needs the packed depth-stencil extension. With it,
    ///   depth is forced on (the packed buffer carries both); without it,
    ///   stencil is dropped. A stencil-without-depth request therefore never
    ///   reaches the allocator.
    /// - Antialiasing needs both the multisample-framebuffer and the
    ///   framebuffer-blit capabilities, else it is forced off.
    pub fn validate(&mut self, capabilities: &Capabilities) {
        if self.stencil {
            if capabilities.packed_depth_stencil() {
                self.depth = true;
            } else {
                self.stencil = false;
            }
        }
        if self.antialias
            && !(capabilities.multisample_framebuffer() && capabilities.multisample_blit())
        {
            self.antialias = false;
        }
    }
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing
/// or wrong type.
fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}
