//! Desktop/ES format translation strategies.
//!
//! Desktop GL and ES disagree on which internal formats a renderbuffer or
//! texture accepts, on whether uniform limits are counted in components or
//! vectors, and on whether shader precision is natively queryable. Each
//! profile's answers live in one strategy ([`DesktopFormats`] /
//! [`EsFormats`]), selected once at context creation via [`for_profile`].
//! Every method is a pure function of its arguments.

use super::api::ShaderPrecision;
use crate::error::ContextError;

// Tokens from legacy formats and extensions that glow does not re-export.
pub const BGRA: u32 = 0x80E1;
pub const ALPHA: u32 = 0x1906;
pub const LUMINANCE: u32 = 0x1909;
pub const LUMINANCE_ALPHA: u32 = 0x190A;
pub const HALF_FLOAT_OES: u32 = 0x8D61;
pub const ALPHA16F_EXT: u32 = 0x881C;
pub const LUMINANCE16F_EXT: u32 = 0x881E;
pub const LUMINANCE_ALPHA16F_EXT: u32 = 0x881F;
pub const MAX_VARYING_FLOATS: u32 = 0x8B4B;

/// Concrete color-buffer formats chosen for a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorFormats {
    /// Internal storage format (e.g. `RGBA8`).
    pub internal: u32,
    /// Wire format for texture uploads and readback (e.g. `RGBA`).
    pub transfer: u32,
    /// Component data type for the wire format.
    pub data_type: u32,
}

/// How an integer state query maps onto the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerQuery {
    /// The pname to hand to the driver.
    pub driver_pname: u32,
    /// Divisor applied to the raw result (4 for component-counted limits
    /// reported as vector counts, 1 otherwise).
    pub divisor: i32,
}

/// Whether a shader precision query goes to the driver or is synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionQuery {
    /// The driver answers natively.
    Native,
    /// The profile has no native query; report these values.
    Synthesized(ShaderPrecision),
}

/// Format decisions that differ between desktop and ES profiles.
///
/// Object-safe so a context can hold the selected strategy as
/// `&'static dyn ProfileFormats`.
pub trait ProfileFormats {
    /// Color internal/transfer/data-type triple for a surface with or
    /// without an alpha channel.
    fn color_formats(&self, alpha: bool) -> ColorFormats;

    /// Translates a requested renderbuffer internal format into one the
    /// driver accepts.
    fn renderbuffer_format(&self, requested: u32, packed_depth_stencil: bool) -> u32;

    /// Internal format for the surface's depth-stencil storage.
    fn depth_stencil_format(&self, packed_depth_stencil: bool) -> u32;

    /// Translates a texture upload's internal format and data type.
    /// Returns the `(internal_format, data_type)` pair to submit.
    fn tex_image_formats(
        &self,
        internal_format: u32,
        transfer_format: u32,
        data_type: u32,
    ) -> (u32, u32);

    /// Maps an integer state query onto the driver's pname and result
    /// divisor.
    fn integer_query(&self, pname: u32) -> IntegerQuery;

    /// Decides how to answer a shader precision query for the given
    /// precision type.
    fn shader_precision(&self, precision_type: u32) -> Result<PrecisionQuery, ContextError>;
}

/// Returns the strategy for the given profile flag.
pub fn for_profile(es_profile: bool) -> &'static dyn ProfileFormats {
    if es_profile {
        &EsFormats
    } else {
        &DesktopFormats
    }
}

/// Strategy for desktop GL contexts.
pub struct DesktopFormats;

/// Strategy for ES-compliant contexts.
pub struct EsFormats;

impl ProfileFormats for DesktopFormats {
    fn color_formats(&self, alpha: bool) -> ColorFormats {
        if alpha {
            ColorFormats {
                internal: glow::RGBA8,
                transfer: glow::RGBA,
                data_type: glow::UNSIGNED_BYTE,
            }
        } else {
            ColorFormats {
                internal: glow::RGB8,
                transfer: glow::RGB,
                data_type: glow::UNSIGNED_BYTE,
            }
        }
    }

    fn renderbuffer_format(&self, requested: u32, packed_depth_stencil: bool) -> u32 {
        match requested {
            glow::DEPTH_STENCIL => self.depth_stencil_format(packed_depth_stencil),
            glow::DEPTH_COMPONENT16 => glow::DEPTH_COMPONENT,
            glow::RGBA4 | glow::RGB5_A1 => glow::RGBA,
            glow::RGB565 => glow::RGB,
            other => other,
        }
    }

    fn depth_stencil_format(&self, packed_depth_stencil: bool) -> u32 {
        if packed_depth_stencil {
            glow::DEPTH24_STENCIL8
        } else {
            glow::DEPTH_COMPONENT
        }
    }

    fn tex_image_formats(
        &self,
        internal_format: u32,
        transfer_format: u32,
        data_type: u32,
    ) -> (u32, u32) {
        if data_type == glow::FLOAT {
            let internal = match transfer_format {
                glow::RGBA => glow::RGBA32F,
                glow::RGB => glow::RGB32F,
                _ => internal_format,
            };
            (internal, data_type)
        } else if data_type == HALF_FLOAT_OES {
            let internal = match transfer_format {
                glow::RGBA => glow::RGBA16F,
                glow::RGB => glow::RGB16F,
                LUMINANCE => LUMINANCE16F_EXT,
                ALPHA => ALPHA16F_EXT,
                LUMINANCE_ALPHA => LUMINANCE_ALPHA16F_EXT,
                _ => internal_format,
            };
            (internal, glow::HALF_FLOAT)
        } else {
            (internal_format, data_type)
        }
    }

    fn integer_query(&self, pname: u32) -> IntegerQuery {
        // Desktop GL reports uniform and varying limits in components;
        // callers expect vector counts (four components per vector).
        match pname {
            glow::MAX_FRAGMENT_UNIFORM_VECTORS => IntegerQuery {
                driver_pname: glow::MAX_FRAGMENT_UNIFORM_COMPONENTS,
                divisor: 4,
            },
            glow::MAX_VERTEX_UNIFORM_VECTORS => IntegerQuery {
                driver_pname: glow::MAX_VERTEX_UNIFORM_COMPONENTS,
                divisor: 4,
            },
            glow::MAX_VARYING_VECTORS => IntegerQuery {
                driver_pname: MAX_VARYING_FLOATS,
                divisor: 4,
            },
            other => IntegerQuery {
                driver_pname: other,
                divisor: 1,
            },
        }
    }

    fn shader_precision(&self, precision_type: u32) -> Result<PrecisionQuery, ContextError> {
        match precision_type {
            glow::LOW_INT | glow::MEDIUM_INT | glow::HIGH_INT => {
                // A 32-bit two's-complement integer format.
                Ok(PrecisionQuery::Synthesized(ShaderPrecision {
                    range: [31, 30],
                    precision: 0,
                }))
            }
            glow::LOW_FLOAT | glow::MEDIUM_FLOAT | glow::HIGH_FLOAT => {
                // An IEEE 754 single-precision floating-point format.
                Ok(PrecisionQuery::Synthesized(ShaderPrecision {
                    range: [127, 127],
                    precision: 23,
                }))
            }
            other => Err(ContextError::InvalidEnum { value: other }),
        }
    }
}

impl ProfileFormats for EsFormats {
    fn color_formats(&self, alpha: bool) -> ColorFormats {
        if alpha {
            ColorFormats {
                internal: glow::RGBA,
                transfer: glow::RGBA,
                data_type: glow::UNSIGNED_BYTE,
            }
        } else {
            ColorFormats {
                internal: glow::RGB,
                transfer: glow::RGB,
                data_type: glow::UNSIGNED_SHORT_5_6_5,
            }
        }
    }

    fn renderbuffer_format(&self, requested: u32, _packed_depth_stencil: bool) -> u32 {
        // ES accepts the logical formats directly.
        requested
    }

    fn depth_stencil_format(&self, packed_depth_stencil: bool) -> u32 {
        if packed_depth_stencil {
            glow::DEPTH24_STENCIL8
        } else {
            glow::DEPTH_COMPONENT16
        }
    }

    fn tex_image_formats(
        &self,
        internal_format: u32,
        _transfer_format: u32,
        data_type: u32,
    ) -> (u32, u32) {
        (internal_format, data_type)
    }

    fn integer_query(&self, pname: u32) -> IntegerQuery {
        IntegerQuery {
            driver_pname: pname,
            divisor: 1,
        }
    }

    fn shader_precision(&self, precision_type: u32) -> Result<PrecisionQuery, ContextError> {
        match precision_type {
            glow::LOW_INT
            | glow::MEDIUM_INT
            | glow::HIGH_INT
            | glow::LOW_FLOAT
            | glow::MEDIUM_FLOAT
            | glow::HIGH_FLOAT => Ok(PrecisionQuery::Native),
            other => Err(ContextError::InvalidEnum { value: other }),
        }
    }
}
