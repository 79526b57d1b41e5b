#![deny(unsafe_code)]
//! Off-screen render-target management and pixel readback for GPU-backed
//! canvas surfaces.
//!
//! Provides the [`GraphicsContext`] facade over a narrow GL driver seam
//! ([`GlApi`]), surface configuration ([`SurfaceAttributes`]), capability
//! probing ([`Capabilities`]), desktop/ES format translation, multisample
//! resolve, and byte-order-normalizing pixel readback.

pub mod attributes;
pub mod error;
pub mod gl;
pub mod pixel;
pub mod rect;

pub use attributes::SurfaceAttributes;
pub use error::ContextError;
pub use gl::api::{GlApi, GlowApi, ShaderPrecision};
pub use gl::capabilities::Capabilities;
pub use gl::context::{GraphicsContext, NativeContext};
pub use rect::IntRect;
