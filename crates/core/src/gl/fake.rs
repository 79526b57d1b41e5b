//! Recording fake driver used by the allocator, resolver, and readback
//! tests.
//!
//! `FakeGl` implements [`GlApi`] over plain interior-mutable state: it
//! hands out sequential ids, remembers bindings, storage allocations,
//! attachments, blits, and reads, and lets a test preload extension
//! strings, integer state, a completeness status, and canned readback
//! bytes. No GPU anywhere.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::api::{GlApi, ShaderPrecision};

/// What a fake framebuffer attachment point holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeAttachment {
    Renderbuffer(u32),
    Texture(u32),
}

/// One renderbuffer storage allocation. `samples` is 0 for single-sample
/// storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageCall {
    pub samples: i32,
    pub internal_format: u32,
    pub width: i32,
    pub height: i32,
}

/// One recorded `tex_image_2d` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexImageCall {
    pub target: u32,
    pub level: i32,
    pub internal_format: i32,
    pub width: i32,
    pub height: i32,
    pub border: i32,
    pub format: u32,
    pub data_type: u32,
    pub has_pixels: bool,
}

/// One recorded blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitCall {
    pub src: [i32; 4],
    pub dst: [i32; 4],
    pub mask: u32,
    pub filter: u32,
}

/// One recorded pixel read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadCall {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub format: u32,
    pub data_type: u32,
}

#[derive(Debug, Default)]
struct FakeState {
    next_id: u32,
    extensions: HashSet<String>,
    integers: HashMap<u32, i32>,
    bound_framebuffers: HashMap<u32, Option<u32>>,
    bound_renderbuffer: Option<u32>,
    bound_texture: Option<u32>,
    renderbuffer_storage: HashMap<u32, StorageCall>,
    attachments: HashMap<(u32, u32), FakeAttachment>,
    tex_images: Vec<TexImageCall>,
    blits: Vec<BlitCall>,
    reads: Vec<ReadCall>,
    read_data: Vec<u8>,
    framebuffer_status: u32,
    flush_count: usize,
    make_current_count: usize,
    native_precision: Option<ShaderPrecision>,
    driver_error: u32,
}

/// In-memory [`GlApi`] implementation that records every call.
#[derive(Debug)]
pub struct FakeGl {
    state: RefCell<FakeState>,
}

impl FakeGl {
    pub fn new() -> Self {
        let fake = Self {
            state: RefCell::new(FakeState::default()),
        };
        fake.state.borrow_mut().framebuffer_status = glow::FRAMEBUFFER_COMPLETE;
        fake.state.borrow_mut().driver_error = glow::NO_ERROR;
        fake
    }

    pub fn with_extensions(extensions: &[&str]) -> Self {
        let fake = Self::new();
        for name in extensions {
            fake.add_extension(name);
        }
        fake
    }

    pub fn add_extension(&self, name: &str) {
        self.state.borrow_mut().extensions.insert(name.to_string());
    }

    pub fn set_integer(&self, pname: u32, value: i32) {
        self.state.borrow_mut().integers.insert(pname, value);
    }

    pub fn set_framebuffer_status(&self, status: u32) {
        self.state.borrow_mut().framebuffer_status = status;
    }

    pub fn set_read_data(&self, data: Vec<u8>) {
        self.state.borrow_mut().read_data = data;
    }

    pub fn set_native_precision(&self, precision: ShaderPrecision) {
        self.state.borrow_mut().native_precision = Some(precision);
    }

    pub fn set_driver_error(&self, error: u32) {
        self.state.borrow_mut().driver_error = error;
    }

    // -- Inspection --

    pub fn bound_framebuffer(&self, target: u32) -> Option<u32> {
        self.state
            .borrow()
            .bound_framebuffers
            .get(&target)
            .copied()
            .flatten()
    }

    pub fn bound_renderbuffer(&self) -> Option<u32> {
        self.state.borrow().bound_renderbuffer
    }

    pub fn bound_texture(&self) -> Option<u32> {
        self.state.borrow().bound_texture
    }

    pub fn storage_for(&self, renderbuffer: u32) -> Option<StorageCall> {
        self.state
            .borrow()
            .renderbuffer_storage
            .get(&renderbuffer)
            .copied()
    }

    pub fn attachment(&self, framebuffer: u32, point: u32) -> Option<FakeAttachment> {
        self.state
            .borrow()
            .attachments
            .get(&(framebuffer, point))
            .copied()
    }

    pub fn tex_images(&self) -> Vec<TexImageCall> {
        self.state.borrow().tex_images.clone()
    }

    pub fn blits(&self) -> Vec<BlitCall> {
        self.state.borrow().blits.clone()
    }

    pub fn reads(&self) -> Vec<ReadCall> {
        self.state.borrow().reads.clone()
    }

    pub fn flush_count(&self) -> usize {
        self.state.borrow().flush_count
    }

    pub fn make_current_count(&self) -> usize {
        self.state.borrow().make_current_count
    }
}

impl Default for FakeGl {
    fn default() -> Self {
        Self::new()
    }
}

impl GlApi for FakeGl {
    type Framebuffer = u32;
    type Renderbuffer = u32;
    type Texture = u32;

    fn make_current(&self) {
        self.state.borrow_mut().make_current_count += 1;
    }

    fn supported_extensions(&self) -> HashSet<String> {
        self.state.borrow().extensions.clone()
    }

    fn create_framebuffer(&self) -> Result<Self::Framebuffer, String> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        Ok(state.next_id)
    }

    fn create_renderbuffer(&self) -> Result<Self::Renderbuffer, String> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        Ok(state.next_id)
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        Ok(state.next_id)
    }

    fn delete_framebuffer(&self, _framebuffer: Self::Framebuffer) {}

    fn delete_renderbuffer(&self, _renderbuffer: Self::Renderbuffer) {}

    fn delete_texture(&self, _texture: Self::Texture) {}

    fn bind_framebuffer(&self, target: u32, framebuffer: Option<Self::Framebuffer>) {
        let mut state = self.state.borrow_mut();
        state.bound_framebuffers.insert(target, framebuffer);
        // The FRAMEBUFFER target aliases both the read and draw bindings.
        if target == glow::FRAMEBUFFER {
            state
                .bound_framebuffers
                .insert(glow::READ_FRAMEBUFFER, framebuffer);
            state
                .bound_framebuffers
                .insert(glow::DRAW_FRAMEBUFFER, framebuffer);
        }
    }

    fn bind_renderbuffer(&self, _target: u32, renderbuffer: Option<Self::Renderbuffer>) {
        self.state.borrow_mut().bound_renderbuffer = renderbuffer;
    }

    fn bind_texture(&self, _target: u32, texture: Option<Self::Texture>) {
        self.state.borrow_mut().bound_texture = texture;
    }

    fn renderbuffer_storage(&self, _target: u32, internal_format: u32, width: i32, height: i32) {
        let mut state = self.state.borrow_mut();
        if let Some(renderbuffer) = state.bound_renderbuffer {
            state.renderbuffer_storage.insert(
                renderbuffer,
                StorageCall {
                    samples: 0,
                    internal_format,
                    width,
                    height,
                },
            );
        }
    }

    fn renderbuffer_storage_multisample(
        &self,
        _target: u32,
        samples: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    ) {
        let mut state = self.state.borrow_mut();
        if let Some(renderbuffer) = state.bound_renderbuffer {
            state.renderbuffer_storage.insert(
                renderbuffer,
                StorageCall {
                    samples,
                    internal_format,
                    width,
                    height,
                },
            );
        }
    }

    fn framebuffer_renderbuffer(
        &self,
        target: u32,
        attachment: u32,
        _renderbuffer_target: u32,
        renderbuffer: Option<Self::Renderbuffer>,
    ) {
        let mut state = self.state.borrow_mut();
        let Some(Some(framebuffer)) = state.bound_framebuffers.get(&target).copied() else {
            return;
        };
        match renderbuffer {
            Some(renderbuffer) => {
                state.attachments.insert(
                    (framebuffer, attachment),
                    FakeAttachment::Renderbuffer(renderbuffer),
                );
            }
            None => {
                state.attachments.remove(&(framebuffer, attachment));
            }
        }
    }

    fn framebuffer_texture_2d(
        &self,
        target: u32,
        attachment: u32,
        _texture_target: u32,
        texture: Option<Self::Texture>,
        _level: i32,
    ) {
        let mut state = self.state.borrow_mut();
        let Some(Some(framebuffer)) = state.bound_framebuffers.get(&target).copied() else {
            return;
        };
        match texture {
            Some(texture) => {
                state
                    .attachments
                    .insert((framebuffer, attachment), FakeAttachment::Texture(texture));
            }
            None => {
                state.attachments.remove(&(framebuffer, attachment));
            }
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
        self.state.borrow_mut().tex_images.push(TexImageCall {
            target,
            level,
            internal_format,
            width,
            height,
            border,
            format,
            data_type,
            has_pixels: pixels.is_some(),
        });
    }

    fn check_framebuffer_status(&self, _target: u32) -> u32 {
        self.state.borrow().framebuffer_status
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
        self.state.borrow_mut().blits.push(BlitCall {
            src: [src_x0, src_y0, src_x1, src_y1],
            dst: [dst_x0, dst_y0, dst_x1, dst_y1],
            mask,
            filter,
        });
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
        let mut state = self.state.borrow_mut();
        state.reads.push(ReadCall {
            x,
            y,
            width,
            height,
            format,
            data_type,
        });
        let count = state.read_data.len().min(pixels.len());
        pixels[..count].copy_from_slice(&state.read_data[..count]);
    }

    fn get_integer(&self, pname: u32) -> i32 {
        self.state.borrow().integers.get(&pname).copied().unwrap_or(0)
    }

    fn get_error(&self) -> u32 {
        self.state.borrow().driver_error
    }

    fn shader_precision_format(
        &self,
        _shader_type: u32,
        _precision_type: u32,
    ) -> Option<ShaderPrecision> {
        self.state.borrow().native_precision
    }

    fn flush(&self) {
        self.state.borrow_mut().flush_count += 1;
    }

    fn depth_range(&self, _near: f32, _far: f32) {}

    fn clear_depth(&self, _depth: f32) {}
}
