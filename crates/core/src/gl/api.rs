//! The narrow driver surface this subsystem needs, and its glow adapter.
//!
//! [`GlApi`] exists so the allocator, resolver, and readback paths can be
//! driven against a recording fake in tests; [`GlowApi`] is the production
//! implementation over a [`glow::Context`]. The trait mirrors GL call
//! shapes one-to-one (no batching, no state caching), so each method maps
//! to exactly one driver invocation.

use std::collections::HashSet;
use std::fmt;

/// Range and precision of a shader numeric format, as reported by
/// `GetShaderPrecisionFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderPrecision {
    /// Log2 of the minimum and maximum representable magnitude.
    pub range: [i32; 2],
    /// Number of bits of precision.
    pub precision: i32,
}

/// The GL entry points consumed by this crate.
///
/// Handle types are opaque and stable: a handle created once stays valid
/// for the owning context's lifetime; only the storage behind it is
/// replaced on resize. All methods are synchronous driver invocations
/// against whatever context is current; callers are responsible for
/// invoking [`GlApi::make_current`] first.
pub trait GlApi {
    /// Framebuffer object handle.
    type Framebuffer: Copy + Eq + fmt::Debug;
    /// Renderbuffer object handle.
    type Renderbuffer: Copy + Eq + fmt::Debug;
    /// Texture object handle.
    type Texture: Copy + Eq + fmt::Debug;

    /// Ensures the owning GL context is active on the calling thread.
    ///
    /// The default is a no-op for embedders whose context is permanently
    /// current on one thread.
    fn make_current(&self) {}

    /// The extension strings advertised by the driver.
    fn supported_extensions(&self) -> HashSet<String>;

    /// Creates a framebuffer object.
    fn create_framebuffer(&self) -> Result<Self::Framebuffer, String>;

    /// Creates a renderbuffer object.
    fn create_renderbuffer(&self) -> Result<Self::Renderbuffer, String>;

    /// Creates a texture object.
    fn create_texture(&self) -> Result<Self::Texture, String>;

    /// Deletes a framebuffer object.
    fn delete_framebuffer(&self, framebuffer: Self::Framebuffer);

    /// Deletes a renderbuffer object.
    fn delete_renderbuffer(&self, renderbuffer: Self::Renderbuffer);

    /// Deletes a texture object.
    fn delete_texture(&self, texture: Self::Texture);

    /// Binds `framebuffer` (or the default framebuffer for `None`) to
    /// `target` (`FRAMEBUFFER`, `READ_FRAMEBUFFER`, or `DRAW_FRAMEBUFFER`).
    fn bind_framebuffer(&self, target: u32, framebuffer: Option<Self::Framebuffer>);

    /// Binds `renderbuffer` to `target` (`RENDERBUFFER`).
    fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<Self::Renderbuffer>);

    /// Binds `texture` to `target`.
    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>);

    /// Allocates single-sample storage for the bound renderbuffer.
    fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32);

    /// Allocates multisample storage for the bound renderbuffer.
    fn renderbuffer_storage_multisample(
        &self,
        target: u32,
        samples: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    );

    /// Attaches a renderbuffer to an attachment point of the bound
    /// framebuffer.
    fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<Self::Renderbuffer>,
    );

    /// Attaches a texture level to an attachment point of the bound
    /// framebuffer.
    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<Self::Texture>,
        level: i32,
    );

    /// Specifies a two-dimensional texture image. `None` pixels allocate
    /// storage without supplying data.
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        border: i32,
        format: u32,
        data_type: u32,
        pixels: Option<&[u8]>,
    );

    /// Returns the completeness status of the framebuffer bound to `target`.
    fn check_framebuffer_status(&self, target: u32) -> u32;

    /// Copies a block of pixels from the read framebuffer to the draw
    /// framebuffer.
    #[allow(clippy::too_many_arguments)]
    fn blit_framebuffer(
        &self,
        src_x0: i32,
        src_y0: i32,
        src_x1: i32,
        src_y1: i32,
        dst_x0: i32,
        dst_y0: i32,
        dst_x1: i32,
        dst_y1: i32,
        mask: u32,
        filter: u32,
    );

    /// Reads a rectangle of pixels from the bound read framebuffer into
    /// `pixels`.
    #[allow(clippy::too_many_arguments)]
    fn read_pixels(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        data_type: u32,
        pixels: &mut [u8],
    );

    /// Returns the value of an integer state variable.
    fn get_integer(&self, pname: u32) -> i32;

    /// Returns and clears the driver's oldest error flag.
    fn get_error(&self) -> u32;

    /// Queries the driver's native shader precision format, or `None`
    /// where the driver has no native query.
    fn shader_precision_format(
        &self,
        shader_type: u32,
        precision_type: u32,
    ) -> Option<ShaderPrecision>;

    /// Forces completion ordering of previously issued GL commands.
    fn flush(&self);

    /// Sets the depth range mapping.
    fn depth_range(&self, near: f32, far: f32);

    /// Sets the depth clear value.
    fn clear_depth(&self, depth: f32);
}

/// Production [`GlApi`] over a [`glow::Context`].
///
/// glow contexts are created against an already-current native or WebGL
/// context, so `make_current` keeps the trait's no-op default; embedders
/// that juggle several contexts on one thread should wrap this adapter
/// with their own current-context management.
pub struct GlowApi {
    gl: glow::Context,
}

impl GlowApi {
    /// Wraps a glow context.
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Returns a reference to the underlying `glow::Context`.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Consumes this adapter and returns the underlying `glow::Context`.
    pub fn into_gl(self) -> glow::Context {
        self.gl
    }
}

#[allow(unsafe_code)]
impl GlApi for GlowApi {
    type Framebuffer = glow::Framebuffer;
    type Renderbuffer = glow::Renderbuffer;
    type Texture = glow::Texture;

    fn supported_extensions(&self) -> HashSet<String> {
        use glow::HasContext;
        self.gl.supported_extensions().clone()
    }

    fn create_framebuffer(&self) -> Result<Self::Framebuffer, String> {
        use glow::HasContext;
        // SAFETY: glow wraps raw GL calls as unsafe; object creation takes
        // no pointers and returns a driver-owned handle.
        unsafe { self.gl.create_framebuffer() }
    }

    fn create_renderbuffer(&self) -> Result<Self::Renderbuffer, String> {
        use glow::HasContext;
        // SAFETY: as create_framebuffer.
        unsafe { self.gl.create_renderbuffer() }
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        use glow::HasContext;
        // SAFETY: as create_framebuffer.
        unsafe { self.gl.create_texture() }
    }

    fn delete_framebuffer(&self, framebuffer: Self::Framebuffer) {
        use glow::HasContext;
        // SAFETY: handles passed here were created by this context.
        unsafe { self.gl.delete_framebuffer(framebuffer) }
    }

    fn delete_renderbuffer(&self, renderbuffer: Self::Renderbuffer) {
        use glow::HasContext;
        // SAFETY: as delete_framebuffer.
        unsafe { self.gl.delete_renderbuffer(renderbuffer) }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        use glow::HasContext;
        // SAFETY: as delete_framebuffer.
        unsafe { self.gl.delete_texture(texture) }
    }

    fn bind_framebuffer(&self, target: u32, framebuffer: Option<Self::Framebuffer>) {
        use glow::HasContext;
        // SAFETY: binding takes valid enum targets and context-owned handles.
        unsafe { self.gl.bind_framebuffer(target, framebuffer) }
    }

    fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<Self::Renderbuffer>) {
        use glow::HasContext;
        // SAFETY: as bind_framebuffer.
        unsafe { self.gl.bind_renderbuffer(target, renderbuffer) }
    }

    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>) {
        use glow::HasContext;
        // SAFETY: as bind_framebuffer.
        unsafe { self.gl.bind_texture(target, texture) }
    }

    fn renderbuffer_storage(&self, target: u32, internal_format: u32, width: i32, height: i32) {
        use glow::HasContext;
        // SAFETY: storage allocation takes scalar parameters only.
        unsafe {
            self.gl
                .renderbuffer_storage(target, internal_format, width, height)
        }
    }

    fn renderbuffer_storage_multisample(
        &self,
        target: u32,
        samples: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    ) {
        use glow::HasContext;
        // SAFETY: as renderbuffer_storage.
        unsafe {
            self.gl
                .renderbuffer_storage_multisample(target, samples, internal_format, width, height)
        }
    }

    fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<Self::Renderbuffer>,
    ) {
        use glow::HasContext;
        // SAFETY: attachment wiring takes enum targets and owned handles.
        unsafe {
            self.gl
                .framebuffer_renderbuffer(target, attachment, renderbuffer_target, renderbuffer)
        }
    }

    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        texture_target: u32,
        texture: Option<Self::Texture>,
        level: i32,
    ) {
        use glow::HasContext;
        // SAFETY: as framebuffer_renderbuffer.
        unsafe {
            self.gl
                .framebuffer_texture_2d(target, attachment, texture_target, texture, level)
        }
    }

    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        border: i32,
        format: u32,
        data_type: u32,
        pixels: Option<&[u8]>,
    ) {
        use glow::HasContext;
        // SAFETY: the pixel slice, when present, lives for the duration of
        // the call and the driver copies out of it synchronously.
        unsafe {
            self.gl.tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                border,
                format,
                data_type,
                glow::PixelUnpackData::Slice(pixels),
            )
        }
    }

    fn check_framebuffer_status(&self, target: u32) -> u32 {
        use glow::HasContext;
        // SAFETY: pure status query.
        unsafe { self.gl.check_framebuffer_status(target) }
    }

    fn blit_framebuffer(
        &self,
        src_x0: i32,
        src_y0: i32,
        src_x1: i32,
        src_y1: i32,
        dst_x0: i32,
        dst_y0: i32,
        dst_x1: i32,
        dst_y1: i32,
        mask: u32,
        filter: u32,
    ) {
        use glow::HasContext;
        // SAFETY: blit takes scalar rectangle coordinates only.
        unsafe {
            self.gl.blit_framebuffer(
                src_x0, src_y0, src_x1, src_y1, dst_x0, dst_y0, dst_x1, dst_y1, mask, filter,
            )
        }
    }

    fn read_pixels(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        data_type: u32,
        pixels: &mut [u8],
    ) {
        use glow::HasContext;
        // SAFETY: the destination slice outlives the synchronous read and
        // the caller sizes it for width * height * bytes-per-pixel.
        unsafe {
            self.gl.read_pixels(
                x,
                y,
                width,
                height,
                format,
                data_type,
                glow::PixelPackData::Slice(Some(pixels)),
            )
        }
    }

    fn get_integer(&self, pname: u32) -> i32 {
        use glow::HasContext;
        // SAFETY: pure state query.
        unsafe { self.gl.get_parameter_i32(pname) }
    }

    fn get_error(&self) -> u32 {
        use glow::HasContext;
        // SAFETY: pure error-flag query.
        unsafe { self.gl.get_error() }
    }

    fn shader_precision_format(
        &self,
        shader_type: u32,
        precision_type: u32,
    ) -> Option<ShaderPrecision> {
        use glow::HasContext;
        // SAFETY: pure precision query; glow returns None where the driver
        // has no native entry point.
        let format = unsafe {
            self.gl
                .get_shader_precision_format(shader_type, precision_type)
        }?;
        Some(ShaderPrecision {
            range: [format.range_min, format.range_max],
            precision: format.precision,
        })
    }

    fn flush(&self) {
        use glow::HasContext;
        // SAFETY: takes no arguments.
        unsafe { self.gl.flush() }
    }

    fn depth_range(&self, near: f32, far: f32) {
        use glow::HasContext;
        // SAFETY: scalar state set.
        unsafe { self.gl.depth_range_f32(near, far) }
    }

    fn clear_depth(&self, depth: f32) {
        use glow::HasContext;
        // SAFETY: scalar state set.
        unsafe { self.gl.clear_depth_f32(depth) }
    }
}
