//! Ownership and resizing of the surface's framebuffers, renderbuffers,
//! and textures.
//!
//! [`DrawingBuffers`] creates every GL object handle exactly once, at
//! context creation; a reshape replaces only the storage behind the
//! handles, so ids handed out to the embedder stay stable for the
//! context's lifetime.

use glam::UVec2;
use tracing::{debug, warn};

use super::api::GlApi;
use super::capabilities::Capabilities;
use super::formats::{ColorFormats, ProfileFormats};
use crate::attributes::SurfaceAttributes;
use crate::error::ContextError;

/// Samples are capped here even when the driver reports more.
pub const MAX_SAMPLE_COUNT: i32 = 8;

/// The multisample half of a surface: its own FBO, a multisample color
/// renderbuffer, and (when depth or stencil was requested) a multisample
/// depth-stencil renderbuffer. Only built on non-ES profiles.
#[derive(Debug)]
pub struct MultisampleBuffers<A: GlApi> {
    pub fbo: A::Framebuffer,
    pub color: A::Renderbuffer,
    pub depth_stencil: Option<A::Renderbuffer>,
}

/// Depth/stencil storage for the non-multisampled path.
///
/// Exactly one shape is ever active for a surface: a single packed
/// renderbuffer serving both attachment points, or two separate
/// renderbuffers. The separate shape exists only on ES profiles without
/// packed depth-stencil support.
#[derive(Debug)]
pub enum DepthStencilBuffers<A: GlApi> {
    /// No depth or stencil storage.
    None,
    /// One packed depth+stencil renderbuffer.
    Packed(A::Renderbuffer),
    /// Separate 16-bit depth and 8-bit stencil renderbuffers. Each is
    /// attached only if the corresponding attribute survived validation.
    Separate {
        depth: A::Renderbuffer,
        stencil: A::Renderbuffer,
    },
}

/// The GPU-owned resources behind one canvas surface.
///
/// The primary FBO renders into `color_texture`; `compositor_texture` is
/// the second color texture handed to the page compositor. When
/// antialiasing is active on a non-ES profile, drawing instead targets the
/// multisample FBO and is resolved into the primary one.
#[derive(Debug)]
pub struct DrawingBuffers<A: GlApi> {
    fbo: A::Framebuffer,
    color_texture: A::Texture,
    compositor_texture: A::Texture,
    multisample: Option<MultisampleBuffers<A>>,
    depth_stencil: DepthStencilBuffers<A>,
    size: UVec2,
    color_formats: ColorFormats,
    sample_count: i32,
}

impl<A: GlApi> DrawingBuffers<A> {
    /// Allocates every handle the validated attributes call for and leaves
    /// the primary FBO bound.
    ///
    /// Storage is not allocated here; the first `reshape` does that.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::ResourceAllocation` if the driver refuses to
    /// hand out a handle.
    pub fn new(
        api: &A,
        capabilities: &Capabilities,
        attributes: &SurfaceAttributes,
        formats: &dyn ProfileFormats,
    ) -> Result<Self, ContextError> {
        let fbo = api
            .create_framebuffer()
            .map_err(ContextError::ResourceAllocation)?;
        let color_texture = api
            .create_texture()
            .map_err(ContextError::ResourceAllocation)?;
        let compositor_texture = api
            .create_texture()
            .map_err(ContextError::ResourceAllocation)?;

        let multisample = if attributes.antialias && !capabilities.is_es_profile() {
            let ms_fbo = api
                .create_framebuffer()
                .map_err(ContextError::ResourceAllocation)?;
            let color = api
                .create_renderbuffer()
                .map_err(ContextError::ResourceAllocation)?;
            let depth_stencil = if attributes.depth || attributes.stencil {
                Some(
                    api.create_renderbuffer()
                        .map_err(ContextError::ResourceAllocation)?,
                )
            } else {
                None
            };
            Some(MultisampleBuffers {
                fbo: ms_fbo,
                color,
                depth_stencil,
            })
        } else {
            None
        };

        let depth_stencil = if !attributes.antialias && (attributes.depth || attributes.stencil) {
            if capabilities.is_es_profile() && !capabilities.packed_depth_stencil() {
                DepthStencilBuffers::Separate {
                    depth: api
                        .create_renderbuffer()
                        .map_err(ContextError::ResourceAllocation)?,
                    stencil: api
                        .create_renderbuffer()
                        .map_err(ContextError::ResourceAllocation)?,
                }
            } else {
                DepthStencilBuffers::Packed(
                    api.create_renderbuffer()
                        .map_err(ContextError::ResourceAllocation)?,
                )
            }
        } else {
            DepthStencilBuffers::None
        };

        api.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));

        Ok(Self {
            fbo,
            color_texture,
            compositor_texture,
            multisample,
            depth_stencil,
            size: UVec2::ZERO,
            color_formats: formats.color_formats(attributes.alpha),
            sample_count: 0,
        })
    }

    /// Reallocates all storage for the given pixel size and rewires the
    /// attachments.
    ///
    /// Returns whether the framebuffer binding in effect before the call
    /// is no longer current. On return, the surface's drawing buffer is
    /// bound: the multisample FBO when antialiasing is active on a non-ES
    /// profile, the primary FBO otherwise.
    ///
    /// # Errors
    ///
    /// `ContextError::IncompleteFramebuffer` if the driver rejects the
    /// attachment configuration. The final-binding contract above still
    /// holds; the surface is degraded, not destroyed.
    pub fn reshape(
        &mut self,
        api: &A,
        capabilities: &Capabilities,
        attributes: &SurfaceAttributes,
        formats: &dyn ProfileFormats,
        size: UVec2,
        bound: Option<A::Framebuffer>,
    ) -> Result<bool, ContextError> {
        let width = size.x as i32;
        let height = size.y as i32;
        let color = formats.color_formats(attributes.alpha);
        self.color_formats = color;
        let depth_stencil_format =
            formats.depth_stencil_format(capabilities.packed_depth_stencil());

        let mut must_restore_fbo = false;
        let mut current = bound;
        let mut incomplete: Option<u32> = None;

        // Resize the multisample FBO.
        let multisample = self
            .multisample
            .as_ref()
            .map(|ms| (ms.fbo, ms.color, ms.depth_stencil));
        if let Some((ms_fbo, ms_color, ms_depth_stencil)) = multisample {
            let max_samples = api.get_integer(glow::MAX_SAMPLES);
            self.sample_count = MAX_SAMPLE_COUNT.min(max_samples);
            if current != Some(ms_fbo) {
                api.bind_framebuffer(glow::FRAMEBUFFER, Some(ms_fbo));
                current = Some(ms_fbo);
                must_restore_fbo = true;
            }
            api.bind_renderbuffer(glow::RENDERBUFFER, Some(ms_color));
            api.renderbuffer_storage_multisample(
                glow::RENDERBUFFER,
                self.sample_count,
                color.internal,
                width,
                height,
            );
            api.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::RENDERBUFFER,
                Some(ms_color),
            );
            if let Some(renderbuffer) = ms_depth_stencil {
                api.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
                api.renderbuffer_storage_multisample(
                    glow::RENDERBUFFER,
                    self.sample_count,
                    depth_stencil_format,
                    width,
                    height,
                );
                if attributes.stencil {
                    api.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER,
                        glow::STENCIL_ATTACHMENT,
                        glow::RENDERBUFFER,
                        Some(renderbuffer),
                    );
                }
                if attributes.depth {
                    api.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER,
                        glow::DEPTH_ATTACHMENT,
                        glow::RENDERBUFFER,
                        Some(renderbuffer),
                    );
                }
            }
            api.bind_renderbuffer(glow::RENDERBUFFER, None);
            let status = api.check_framebuffer_status(glow::FRAMEBUFFER);
            if status != glow::FRAMEBUFFER_COMPLETE {
                warn!(status, "multisample framebuffer incomplete after reshape");
                incomplete.get_or_insert(status);
            }
        }

        // Resize the primary FBO.
        if current != Some(self.fbo) {
            api.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            current = Some(self.fbo);
            must_restore_fbo = true;
        }

        api.bind_texture(glow::TEXTURE_2D, Some(self.color_texture));
        api.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            color.internal as i32,
            width,
            height,
            0,
            color.transfer,
            color.data_type,
            None,
        );
        api.framebuffer_texture_2d(
            glow::FRAMEBUFFER,
            glow::COLOR_ATTACHMENT0,
            glow::TEXTURE_2D,
            Some(self.color_texture),
            0,
        );

        api.bind_texture(glow::TEXTURE_2D, Some(self.compositor_texture));
        api.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            color.internal as i32,
            width,
            height,
            0,
            color.transfer,
            color.data_type,
            None,
        );
        api.bind_texture(glow::TEXTURE_2D, None);

        match &self.depth_stencil {
            DepthStencilBuffers::Packed(renderbuffer) => {
                api.bind_renderbuffer(glow::RENDERBUFFER, Some(*renderbuffer));
                api.renderbuffer_storage(glow::RENDERBUFFER, depth_stencil_format, width, height);
                if attributes.stencil {
                    api.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER,
                        glow::STENCIL_ATTACHMENT,
                        glow::RENDERBUFFER,
                        Some(*renderbuffer),
                    );
                }
                if attributes.depth {
                    api.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER,
                        glow::DEPTH_ATTACHMENT,
                        glow::RENDERBUFFER,
                        Some(*renderbuffer),
                    );
                }
                api.bind_renderbuffer(glow::RENDERBUFFER, None);
            }
            DepthStencilBuffers::Separate { depth, stencil } => {
                if attributes.stencil {
                    api.bind_renderbuffer(glow::RENDERBUFFER, Some(*stencil));
                    api.renderbuffer_storage(
                        glow::RENDERBUFFER,
                        glow::STENCIL_INDEX8,
                        width,
                        height,
                    );
                    api.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER,
                        glow::STENCIL_ATTACHMENT,
                        glow::RENDERBUFFER,
                        Some(*stencil),
                    );
                }
                if attributes.depth {
                    api.bind_renderbuffer(glow::RENDERBUFFER, Some(*depth));
                    api.renderbuffer_storage(
                        glow::RENDERBUFFER,
                        glow::DEPTH_COMPONENT16,
                        width,
                        height,
                    );
                    api.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER,
                        glow::DEPTH_ATTACHMENT,
                        glow::RENDERBUFFER,
                        Some(*depth),
                    );
                }
                api.bind_renderbuffer(glow::RENDERBUFFER, None);
            }
            DepthStencilBuffers::None => {}
        }

        let status = api.check_framebuffer_status(glow::FRAMEBUFFER);
        if status != glow::FRAMEBUFFER_COMPLETE {
            warn!(status, "framebuffer incomplete after reshape");
            incomplete.get_or_insert(status);
        }

        // Leave the surface's drawing buffer bound.
        if let Some((ms_fbo, _, _)) = multisample {
            api.bind_framebuffer(glow::FRAMEBUFFER, Some(ms_fbo));
            if bound == Some(ms_fbo) {
                must_restore_fbo = false;
            }
        }

        self.size = size;
        debug!(
            width,
            height,
            samples = self.sample_count,
            "reshaped drawing buffers"
        );

        match incomplete {
            Some(status) => Err(ContextError::IncompleteFramebuffer { status }),
            None => Ok(must_restore_fbo),
        }
    }

    /// The primary (resolve target) framebuffer.
    pub fn fbo(&self) -> A::Framebuffer {
        self.fbo
    }

    /// The framebuffer the embedder's drawing should target.
    pub fn drawing_fbo(&self) -> A::Framebuffer {
        match &self.multisample {
            Some(multisample) => multisample.fbo,
            None => self.fbo,
        }
    }

    /// The multisample framebuffer, when one exists.
    pub fn multisample_fbo(&self) -> Option<A::Framebuffer> {
        self.multisample.as_ref().map(|multisample| multisample.fbo)
    }

    /// The color texture attached to the primary FBO.
    pub fn color_texture(&self) -> A::Texture {
        self.color_texture
    }

    /// The second color texture handed to the page compositor.
    pub fn compositor_texture(&self) -> A::Texture {
        self.compositor_texture
    }

    /// The active depth/stencil storage shape.
    pub fn depth_stencil(&self) -> &DepthStencilBuffers<A> {
        &self.depth_stencil
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Sample count chosen at the last reshape; 0 before the first reshape
    /// or when the surface is not multisampled.
    pub fn sample_count(&self) -> i32 {
        self.sample_count
    }

    /// The color formats chosen for the surface.
    pub fn color_formats(&self) -> ColorFormats {
        self.color_formats
    }

    /// Deletes every owned GL object. Handles are invalid afterwards.
    pub fn destroy(&self, api: &A) {
        api.delete_framebuffer(self.fbo);
        api.delete_texture(self.color_texture);
        api.delete_texture(self.compositor_texture);
        if let Some(multisample) = &self.multisample {
            api.delete_framebuffer(multisample.fbo);
            api.delete_renderbuffer(multisample.color);
            if let Some(renderbuffer) = multisample.depth_stencil {
                api.delete_renderbuffer(renderbuffer);
            }
        }
        match &self.depth_stencil {
            DepthStencilBuffers::Packed(renderbuffer) => api.delete_renderbuffer(*renderbuffer),
            DepthStencilBuffers::Separate { depth, stencil } => {
                api.delete_renderbuffer(*depth);
                api.delete_renderbuffer(*stencil);
            }
            DepthStencilBuffers::None => {}
        }
    }
}
