//! RGBA8 pixel helpers shared by the framebuffer and sprites.

use flowfield_core::Srgb;

/// An RGBA pixel with 8 bits per channel.
pub type Rgba = [u8; 4];

/// Converts a color to an opaque RGBA pixel.
pub fn opaque(color: Srgb) -> Rgba {
    let [r, g, b] = color.to_rgb8();
    [r, g, b, 255]
}

/// Composites `src` over `dst` (straight alpha).
pub fn blend_over(dst: Rgba, src: Rgba) -> Rgba {
    match src[3] {
        255 => src,
        0 => dst,
        a => {
            let a = u32::from(a);
            let inv = 255 - a;
            let mix = |s: u8, d: u8| ((u32::from(s) * a + u32::from(d) * inv + 127) / 255) as u8;
            let out_a = a + (u32::from(dst[3]) * inv + 127) / 255;
            [
                mix(src[0], dst[0]),
                mix(src[1], dst[1]),
                mix(src[2], dst[2]),
                out_a.min(255) as u8,
            ]
        }
    }
}
