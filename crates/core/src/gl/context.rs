//! The graphics-context facade: one object owning the driver api, the
//! probed capabilities, the selected format strategy, the validated
//! surface attributes, the drawing buffers, and the bound-framebuffer
//! bookkeeping.
//!
//! All operations run on the thread that owns the GL context; there is no
//! internal locking and no reentrancy protection. Every public entry
//! point makes the owning context current before issuing driver calls.

use std::collections::VecDeque;

use glam::UVec2;

use super::api::{GlApi, GlowApi, ShaderPrecision};
use super::capabilities::Capabilities;
use super::formats::{self, PrecisionQuery, ProfileFormats};
use super::resolve::resolve_multisampling;
use super::targets::DrawingBuffers;
use crate::attributes::SurfaceAttributes;
use crate::error::ContextError;
use crate::pixel;
use crate::rect::IntRect;

/// A GPU-backed canvas surface context.
///
/// Generic over the driver seam so the whole subsystem can run against a
/// fake driver in tests; production code uses [`NativeContext`].
pub struct GraphicsContext<A: GlApi> {
    api: A,
    capabilities: Capabilities,
    formats: &'static dyn ProfileFormats,
    attributes: SurfaceAttributes,
    buffers: DrawingBuffers<A>,
    bound_fbo: A::Framebuffer,
    synthetic_errors: VecDeque<u32>,
}

/// The production context over a glow-backed driver.
pub type NativeContext = GraphicsContext<GlowApi>;

impl<A: GlApi> GraphicsContext<A> {
    /// Creates a context: probes capabilities, validates the requested
    /// attributes against them, selects the profile's format strategy,
    /// and allocates the drawing-buffer handles.
    ///
    /// The primary framebuffer is bound on return. Call
    /// [`GraphicsContext::reshape`] before drawing.
    ///
    /// # Errors
    ///
    /// `ContextError::ResourceAllocation` if the driver refuses to hand
    /// out an object handle.
    pub fn new(
        api: A,
        es_profile: bool,
        requested: SurfaceAttributes,
    ) -> Result<Self, ContextError> {
        api.make_current();
        let capabilities = Capabilities::probe(&api, es_profile);
        let mut attributes = requested;
        attributes.validate(&capabilities);
        let formats = formats::for_profile(es_profile);
        let buffers = DrawingBuffers::new(&api, &capabilities, &attributes, formats)?;
        let bound_fbo = buffers.fbo();
        Ok(Self {
            api,
            capabilities,
            formats,
            attributes,
            buffers,
            bound_fbo,
            synthetic_errors: VecDeque::new(),
        })
    }

    /// Resizes the surface to `size` pixels.
    ///
    /// Returns whether the framebuffer binding in effect before the call
    /// is no longer current and must be re-established by the caller. On
    /// return the surface's drawing buffer is bound.
    ///
    /// # Errors
    ///
    /// `ContextError::InvalidValue` for a zero dimension;
    /// `ContextError::IncompleteFramebuffer` when the driver rejects the
    /// attachment configuration (the surface stays allocated and the
    /// final-binding contract still holds).
    pub fn reshape(&mut self, size: UVec2) -> Result<bool, ContextError> {
        if size.x == 0 || size.y == 0 {
            return Err(ContextError::InvalidValue(
                "surface dimensions must be non-zero",
            ));
        }
        self.api.make_current();
        let result = self.buffers.reshape(
            &self.api,
            &self.capabilities,
            &self.attributes,
            self.formats,
            size,
            Some(self.bound_fbo),
        );
        self.bound_fbo = self.buffers.drawing_fbo();
        result
    }

    /// Resolves the multisample color buffer into the primary framebuffer
    /// over `rect` (or the whole surface when `rect` is empty).
    ///
    /// A no-op for non-antialiased surfaces. Leaves the read and draw
    /// framebuffer bindings modified; callers manage binding state around
    /// this call.
    ///
    /// # Errors
    ///
    /// `ContextError::MissingCapability` on ES profiles, where blit-based
    /// resolve is unavailable.
    pub fn resolve_if_needed(&mut self, rect: IntRect) -> Result<(), ContextError> {
        self.api.make_current();
        if !self.attributes.antialias {
            return Ok(());
        }
        if self.capabilities.is_es_profile() {
            return Err(ContextError::MissingCapability(
                "blit-based multisample resolve",
            ));
        }
        if let Some(ms_fbo) = self.buffers.multisample_fbo() {
            resolve_multisampling(
                &self.api,
                ms_fbo,
                self.buffers.fbo(),
                rect,
                self.buffers.size(),
            );
        }
        Ok(())
    }

    /// Reads a pixel rectangle from the bound surface into `pixels` using
    /// the caller's transfer format and type.
    ///
    /// If the multisample framebuffer is the current drawing target, the
    /// requested rectangle is resolved first and the read happens against
    /// the primary framebuffer; the multisample binding is re-established
    /// afterwards, so the call leaves binding state exactly as it found it.
    #[allow(clippy::too_many_arguments)]
    pub fn read_pixels(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        data_type: u32,
        pixels: &mut [u8],
    ) {
        self.api.make_current();
        // Driver ordering workaround: all prior rendering must land before
        // the read.
        self.api.flush();
        let multisample_bound = self
            .buffers
            .multisample_fbo()
            .filter(|ms_fbo| self.attributes.antialias && self.bound_fbo == *ms_fbo);
        if let Some(ms_fbo) = multisample_bound {
            resolve_multisampling(
                &self.api,
                ms_fbo,
                self.buffers.fbo(),
                IntRect::new(x, y, width, height),
                self.buffers.size(),
            );
            self.api
                .bind_framebuffer(glow::FRAMEBUFFER, Some(self.buffers.fbo()));
            self.api.flush();
        }
        self.api
            .read_pixels(x, y, width, height, format, data_type, pixels);
        if let Some(ms_fbo) = multisample_bound {
            self.api.bind_framebuffer(glow::FRAMEBUFFER, Some(ms_fbo));
        }
    }

    /// Reads a pixel rectangle and delivers it in BGRA byte order.
    ///
    /// Reads natively in BGRA when the profile allows it (desktop, or ES
    /// with the BGRA read-format extension); otherwise reads forward RGBA
    /// and swizzles in place.
    pub fn read_pixels_to_bgra(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        pixels: &mut [u8],
    ) {
        self.api.make_current();
        let read_bgra =
            !self.capabilities.is_es_profile() || self.capabilities.bgra_read_format();
        if read_bgra {
            self.api
                .read_pixels(x, y, width, height, formats::BGRA, glow::UNSIGNED_BYTE, pixels);
        } else {
            self.api
                .read_pixels(x, y, width, height, glow::RGBA, glow::UNSIGNED_BYTE, pixels);
            pixel::rgba_to_bgra_in_place(pixels);
        }
    }

    /// Returns the value of an integer state variable, translating
    /// vector-count queries on profiles that report component counts.
    pub fn get_integer(&self, pname: u32) -> i32 {
        self.api.make_current();
        let query = self.formats.integer_query(pname);
        self.api.get_integer(query.driver_pname) / query.divisor
    }

    /// Returns the range and precision of a shader numeric format,
    /// synthesizing IEEE-754-consistent values on profiles without a
    /// native query.
    ///
    /// # Errors
    ///
    /// `ContextError::InvalidEnum` for an unrecognized precision type (an
    /// `INVALID_ENUM` is also queued for the error-polling interface);
    /// `ContextError::MissingCapability` if a native query is expected
    /// but the driver has no entry point for it.
    pub fn get_shader_precision_format(
        &mut self,
        shader_type: u32,
        precision_type: u32,
    ) -> Result<ShaderPrecision, ContextError> {
        self.api.make_current();
        match self.formats.shader_precision(precision_type) {
            Ok(PrecisionQuery::Synthesized(precision)) => Ok(precision),
            Ok(PrecisionQuery::Native) => self
                .api
                .shader_precision_format(shader_type, precision_type)
                .ok_or(ContextError::MissingCapability(
                    "native shader precision query",
                )),
            Err(err) => {
                self.synthesize_error(glow::INVALID_ENUM);
                Err(err)
            }
        }
    }

    /// Uploads a two-dimensional texture image, translating the internal
    /// format and data type for the active profile.
    ///
    /// # Errors
    ///
    /// `ContextError::InvalidValue` when `width` and `height` are non-zero
    /// but `pixels` is absent; an `INVALID_VALUE` is queued and no driver
    /// call is made.
    #[allow(clippy::too_many_arguments)]
    pub fn tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: u32,
        width: i32,
        height: i32,
        border: i32,
        format: u32,
        data_type: u32,
        pixels: Option<&[u8]>,
    ) -> Result<(), ContextError> {
        if width != 0 && height != 0 && pixels.is_none() {
            self.synthesize_error(glow::INVALID_VALUE);
            return Err(ContextError::InvalidValue(
                "non-zero texture dimensions require pixel data",
            ));
        }
        self.api.make_current();
        let (driver_internal, driver_type) =
            self.formats
                .tex_image_formats(internal_format, format, data_type);
        self.api.tex_image_2d(
            target,
            level,
            driver_internal as i32,
            width,
            height,
            border,
            format,
            driver_type,
            pixels,
        );
        Ok(())
    }

    /// Allocates storage for the bound renderbuffer, translating the
    /// internal format for the active profile.
    pub fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32) {
        self.api.make_current();
        let driver_format = self
            .formats
            .renderbuffer_format(internal_format, self.capabilities.packed_depth_stencil());
        self.api
            .renderbuffer_storage(target, driver_format, width, height);
    }

    /// Sets the depth range mapping.
    pub fn depth_range(&self, near: f32, far: f32) {
        self.api.make_current();
        self.api.depth_range(near, far);
    }

    /// Sets the depth clear value.
    pub fn clear_depth(&self, depth: f32) {
        self.api.make_current();
        self.api.clear_depth(depth);
    }

    /// Binds `framebuffer` for drawing, or the surface's drawing buffer
    /// for `None`.
    pub fn bind_framebuffer(&mut self, framebuffer: Option<A::Framebuffer>) {
        self.api.make_current();
        let target = framebuffer.unwrap_or_else(|| self.buffers.drawing_fbo());
        if target != self.bound_fbo {
            self.api.bind_framebuffer(glow::FRAMEBUFFER, Some(target));
            self.bound_fbo = target;
        }
    }

    /// Queues a GL error for the error-polling interface.
    pub fn synthesize_error(&mut self, error: u32) {
        self.synthetic_errors.push_back(error);
    }

    /// Returns the oldest pending error: queued synthetic errors first,
    /// then the driver's own error flag.
    pub fn get_error(&mut self) -> u32 {
        if let Some(error) = self.synthetic_errors.pop_front() {
            return error;
        }
        self.api.make_current();
        self.api.get_error()
    }

    /// The validated surface attributes (requested flags the profile
    /// could not honor have been forced off).
    pub fn attributes(&self) -> &SurfaceAttributes {
        &self.attributes
    }

    /// The probed driver capabilities.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> UVec2 {
        self.buffers.size()
    }

    /// Sample count in use; 0 when the surface is not multisampled.
    pub fn sample_count(&self) -> i32 {
        self.buffers.sample_count()
    }

    /// The color texture backing the primary framebuffer.
    pub fn color_texture(&self) -> A::Texture {
        self.buffers.color_texture()
    }

    /// The color texture handed to the page compositor.
    pub fn compositor_texture(&self) -> A::Texture {
        self.buffers.compositor_texture()
    }

    /// The framebuffer currently bound for drawing, as tracked by this
    /// context.
    pub fn bound_framebuffer(&self) -> A::Framebuffer {
        self.bound_fbo
    }

    /// Returns a reference to the underlying driver api.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Deletes every GPU object owned by the surface.
    pub fn destroy(&self) {
        self.api.make_current();
        self.buffers.destroy(&self.api);
    }
}
