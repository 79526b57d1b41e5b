//! Driver capability probe: profile classification plus extension set.
//!
//! Probed once when the owning context is created and consulted on every
//! allocation and format decision afterwards. All queries are pure reads;
//! a missing extension is an ordinary `false`, never an error.

use std::collections::HashSet;

use super::api::GlApi;

/// Read-only classification of the active driver.
///
/// Distinguishes ES-style contexts from desktop ones and answers extension
/// queries. The derived helpers encode which concrete extension names
/// stand for each capability on each profile.
#[derive(Debug, Clone)]
pub struct Capabilities {
    es_profile: bool,
    extensions: HashSet<String>,
}

impl Capabilities {
    /// Builds capabilities from an already-known profile flag and
    /// extension set.
    pub fn new(es_profile: bool, extensions: HashSet<String>) -> Self {
        Self {
            es_profile,
            extensions,
        }
    }

    /// Probes the driver's extension strings through the api.
    ///
    /// The profile flag comes from the embedder: whether a context is
    /// ES-style is decided at context creation, not discoverable from the
    /// extension list.
    pub fn probe<A: GlApi>(api: &A, es_profile: bool) -> Self {
        Self::new(es_profile, api.supported_extensions())
    }

    /// Returns true if the active context follows ES semantics.
    pub fn is_es_profile(&self) -> bool {
        self.es_profile
    }

    /// Returns true if the named extension is advertised.
    pub fn supports(&self, name: &str) -> bool {
        self.extensions.contains(name)
    }

    /// Whether a single renderbuffer can hold packed depth+stencil storage.
    pub fn packed_depth_stencil(&self) -> bool {
        if self.es_profile {
            self.supports("GL_OES_packed_depth_stencil")
        } else {
            self.supports("GL_EXT_packed_depth_stencil")
        }
    }

    /// Whether multisample renderbuffer storage is available.
    pub fn multisample_framebuffer(&self) -> bool {
        self.supports("GL_EXT_framebuffer_multisample")
            || self.supports("GL_ANGLE_framebuffer_multisample")
    }

    /// Whether framebuffer-to-framebuffer blits are available.
    pub fn multisample_blit(&self) -> bool {
        self.supports("GL_EXT_framebuffer_blit") || self.supports("GL_ANGLE_framebuffer_blit")
    }

    /// Whether pixels can be read back directly in BGRA order.
    pub fn bgra_read_format(&self) -> bool {
        self.supports("GL_EXT_read_format_bgra")
    }
}
