//! Pure in-place pixel byte-order conversion.
//!
//! This module is deliberately free of any GL dependency so the conversion
//! contract can be tested on plain byte buffers: given pixels in forward
//! RGBA byte order, produce the same pixels in BGRA order. The readback
//! path uses it when the driver cannot read reverse-order formats natively.

/// Converts a buffer of RGBA8 pixels to BGRA8 in place.
///
/// Swaps bytes 0 and 2 of every 4-byte group; bytes 1 (green) and 3 (alpha)
/// are untouched. Applying the conversion twice restores the original
/// buffer. Trailing bytes beyond the last complete 4-byte group are left
/// unmodified.
pub fn rgba_to_bgra_in_place(pixels: &mut [u8]) {
    for group in pixels.chunks_exact_mut(4) {
        group.swap(0, 2);
    }
}
