use super::Rgba;

/// Screen and lens settings for the software renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Horizontal field of view in degrees; also sets the clip rays.
    pub hfov_deg: f32,
    /// Pixels per unit of `x / depth`.
    pub focal_length: f32,
    pub shading: Shading,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            hfov_deg: 90.0,
            focal_length: 200.0,
            shading: Shading::default(),
        }
    }
}

impl RenderConfig {
    /// Config whose focal length matches `hfov_deg` across `width`:
    ///
    /// ```text
    /// focal = w / (2 * tan(fov/2))
    /// ```
    pub fn with_fov(width: usize, height: usize, hfov_deg: f32) -> Self {
        Self {
            width,
            height,
            hfov_deg,
            focal_length: width as f32 * 0.5 / (hfov_deg.to_radians() * 0.5).tan(),
            shading: Shading::default(),
        }
    }
}

/// Flat colours for everything that is not textured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shading {
    /// Band between two sectors' ceilings or floors.
    pub step: Rgba,
    /// Blue added per unit of ceiling height.
    pub ceil_per_unit: f32,
    /// Green added per unit of floor height, on top of `floor_base`.
    pub floor_per_unit: f32,
    pub floor_base: Rgba,
    /// Frame clear colour.
    pub clear: Rgba,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            step: 0x00_AA0000,
            ceil_per_unit: 30.0,
            floor_per_unit: 16.0,
            floor_base: 0x00_282828,
            clear: 0x00_000000,
        }
    }
}

impl Shading {
    #[inline]
    pub fn ceiling(&self, ceil_h: f32) -> Rgba {
        channel(self.ceil_per_unit * ceil_h)
    }

    #[inline]
    pub fn floor(&self, floor_h: f32) -> Rgba {
        let g = ((self.floor_base >> 8) & 0xFF) as f32 + self.floor_per_unit * floor_h;
        (self.floor_base & 0x00_FF00FF) | (channel(g) << 8)
    }
}

#[inline]
fn channel(v: f32) -> Rgba {
    v.clamp(0.0, 255.0) as Rgba
}

/// Per-frame constants derived from a [`RenderConfig`].
#[derive(Clone, Copy, Debug)]
pub struct View {
    pub w: usize,
    pub h: usize,
    pub half_w: f32, // pre-derived for speed
    pub half_h: f32, // pre-derived for speed
    pub focal: f32,
    /// Slope of the field-of-view boundary rays in camera space.
    pub tan_half_fov: f32,
}

impl From<&RenderConfig> for View {
    fn from(cfg: &RenderConfig) -> Self {
        Self {
            w: cfg.width,
            h: cfg.height,
            half_w: cfg.width as f32 * 0.5,
            half_h: cfg.height as f32 * 0.5,
            focal: cfg.focal_length,
            tan_half_fov: (cfg.hfov_deg.to_radians() * 0.5).tan(),
        }
    }
}
