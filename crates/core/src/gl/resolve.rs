//! Multisample resolve: blitting the multisample color buffer into the
//! resolve framebuffer.

use glam::UVec2;

use super::api::GlApi;
use crate::rect::IntRect;

/// Blits the color contents of `read_fbo` into `draw_fbo` over `rect`,
/// or over the full surface bounds when `rect` is empty.
///
/// Source and destination rectangles are identical (no scaling) and the
/// blit is color-only with linear filtering. The read and draw framebuffer
/// bindings are left pointing at the two FBOs afterwards; callers manage
/// binding state around this call.
pub fn resolve_multisampling<A: GlApi>(
    api: &A,
    read_fbo: A::Framebuffer,
    draw_fbo: A::Framebuffer,
    rect: IntRect,
    surface_size: UVec2,
) {
    api.bind_framebuffer(glow::READ_FRAMEBUFFER, Some(read_fbo));
    api.bind_framebuffer(glow::DRAW_FRAMEBUFFER, Some(draw_fbo));

    let region = if rect.is_empty() {
        IntRect::from_size(surface_size)
    } else {
        rect
    };

    api.blit_framebuffer(
        region.x(),
        region.y(),
        region.max_x(),
        region.max_y(),
        region.x(),
        region.y(),
        region.max_x(),
        region.max_y(),
        glow::COLOR_BUFFER_BIT,
        glow::LINEAR,
    );
}
