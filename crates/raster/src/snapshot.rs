//! PNG export of a [`Framebuffer`].
//!
//! Feature-gated behind `png` (default on) so the raster context can be used
//! without pulling in the `image` crate.

use std::path::Path;

use flowfield_core::SimError;

use crate::framebuffer::Framebuffer;

/// Writes the framebuffer as an RGBA PNG.
///
/// Returns `SimError::InvalidDimensions` if the dimensions overflow `u32`,
/// or `SimError::Io` on write failure.
pub fn write_png(frame: &Framebuffer, path: &Path) -> Result<(), SimError> {
    let w = u32::try_from(frame.width()).map_err(|_| SimError::InvalidDimensions)?;
    let h = u32::try_from(frame.height()).map_err(|_| SimError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, frame.data().to_vec())
        .ok_or_else(|| SimError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| SimError::Io(format!("{}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), width = w, height = h, "frame written");
    Ok(())
}
