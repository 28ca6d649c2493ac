//! RGBA textures stretched over particle rectangles.

use flowfield_core::{SimError, Srgb};

use crate::pixel::Rgba;

/// An owned RGBA8 texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Sprite {
    /// Wraps raw RGBA bytes.
    ///
    /// Returns `SimError::InvalidDimensions` for an empty sprite and
    /// `SimError::DimensionMismatch` if `data` is not `width * height * 4`
    /// bytes long.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDimensions);
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(SimError::InvalidDimensions)?;
        if data.len() != expected {
            return Err(SimError::DimensionMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A filled disc with a one-texel soft edge, transparent outside.
    pub fn disc(diameter: usize, color: Srgb) -> Result<Self, SimError> {
        let [r, g, b] = color.to_rgb8();
        let radius = diameter as f64 / 2.0;
        let mut data = Vec::with_capacity(diameter.saturating_mul(diameter).saturating_mul(4));
        for y in 0..diameter {
            for x in 0..diameter {
                let dx = x as f64 + 0.5 - radius;
                let dy = y as f64 + 0.5 - radius;
                let coverage = (radius - (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0);
                data.extend_from_slice(&[r, g, b, (coverage * 255.0).round() as u8]);
            }
        }
        Self::from_rgba(diameter, diameter, data)
    }

    /// Decodes an image file into a sprite.
    ///
    /// Returns `SimError::Io` if the file cannot be read or decoded.
    #[cfg(feature = "png")]
    pub fn load(path: &std::path::Path) -> Result<Self, SimError> {
        let img = image::open(path)
            .map_err(|e| SimError::Io(format!("{}: {e}", path.display())))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        tracing::debug!(path = %path.display(), width = w, height = h, "sprite loaded");
        Self::from_rgba(w as usize, h as usize, img.into_raw())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The texel at `(x, y)`; coordinates are clamped to the sprite.
    pub fn texel(&self, x: usize, y: usize) -> Rgba {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let i = (y * self.width + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}
