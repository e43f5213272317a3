// Format-agnostic wall texture. Decoding goes through the `image` crate,
// the renderer only ever sees packed 0x00RRGGBB texels.

use std::path::Path;

use log::debug;

use crate::renderer::Rgba;

/// CPU-side storage: 32-bit **RGB** (0x00RRGGBB) in row-major order.
///
/// Always at least 1×1; every constructor enforces it.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    w: usize,
    h: usize,
    pixels: Vec<Rgba>,
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: Rgba = 0x00_A0A0A0;
        const DARK: Rgba = 0x00_505050;
        let mut pix = vec![0; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
            }
        }
        Texture {
            w: 8,
            h: 8,
            pixels: pix,
        }
    }
}

/// Things that can go wrong when building a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("cannot decode image: {0}")]
    Image(#[from] image::ImageError),

    /// Zero-sized image, or pixel count not matching `w * h`.
    #[error("bad texture dimensions {w}x{h} for {len} pixels")]
    BadSize { w: usize, h: usize, len: usize },
}

impl Texture {
    /// Wrap already-packed texels.
    pub fn from_pixels(w: usize, h: usize, pixels: Vec<Rgba>) -> Result<Self, TextureError> {
        if w == 0 || h == 0 || pixels.len() != w * h {
            return Err(TextureError::BadSize {
                w,
                h,
                len: pixels.len(),
            });
        }
        Ok(Self { w, h, pixels })
    }

    /// Single-colour texture, handy for tests and debug views.
    pub fn solid(w: usize, h: usize, colour: Rgba) -> Self {
        Self {
            w: w.max(1),
            h: h.max(1),
            pixels: vec![colour; w.max(1) * h.max(1)],
        }
    }

    /// Decode any PNG/JPEG/BMP file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path.as_ref())?.to_rgb8();
        let (w, h) = (img.width() as usize, img.height() as usize);
        let pixels = img
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();
        debug!("texture {} loaded: {w}x{h}", path.as_ref().display());
        Self::from_pixels(w, h, pixels)
    }

    #[inline]
    pub fn w(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn h(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Row-major lookup. Out-of-range coordinates are a caller bug; they
    /// are clamped to the edge instead of panicking.
    #[inline]
    pub fn texel(&self, u: usize, v: usize) -> Rgba {
        self.pixels[v.min(self.h - 1) * self.w + u.min(self.w - 1)]
    }
}
