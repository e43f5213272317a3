//! Per-column painting and the occlusion envelope.
//!
//! Every screen column keeps an inclusive range `high ..= low` of rows that
//! nothing has drawn yet. Walls paint only inside that range and then shrink
//! it: a solid wall closes the column, a portal pulls `high` down to the lower
//! of the two ceilings and `low` up to the higher of the two floors.

use crate::{
    renderer::{Rgba, Surface},
    world::Texture,
};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Clip bands                               */
/*───────────────────────────────────────────────────────────────────────*/

/// Open vertical range per column. `high > low` means closed.
#[derive(Clone, Debug, Default)]
pub struct ClipBands {
    high: Vec<i32>,
    low: Vec<i32>,
    height: i32,
}

impl ClipBands {
    /// Reopen every column for a `width × height` frame. Reuses storage.
    pub fn reset(&mut self, width: usize, height: usize) {
        self.height = height as i32;
        self.high.clear();
        self.high.resize(width, 0);
        self.low.clear();
        self.low.resize(width, self.height - 1);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.high.len()
    }

    #[inline]
    pub fn high(&self, x: i32) -> i32 {
        self.high[x as usize]
    }

    #[inline]
    pub fn low(&self, x: i32) -> i32 {
        self.low[x as usize]
    }

    #[inline]
    pub fn is_open(&self, x: i32) -> bool {
        self.high(x) <= self.low(x)
    }

    /// Columns that can still receive pixels.
    pub fn open_columns(&self) -> usize {
        self.high
            .iter()
            .zip(&self.low)
            .filter(|(h, l)| h <= l)
            .count()
    }

    /// Raise the top of the open range to `row`; never lowers it.
    #[inline]
    pub fn narrow_top(&mut self, x: i32, row: i32) {
        let high = &mut self.high[x as usize];
        *high = (*high).max(row.clamp(0, self.height));
    }

    /// Lower the bottom of the open range to `row`; never raises it.
    #[inline]
    pub fn narrow_bottom(&mut self, x: i32, row: i32) {
        let low = &mut self.low[x as usize];
        *low = (*low).min(row.clamp(-1, self.height - 1));
    }

    /// Nothing may draw into column `x` for the rest of the frame.
    #[inline]
    pub fn close(&mut self, x: i32) {
        self.high[x as usize] = self.height;
        self.low[x as usize] = -1;
    }
}

/*───────────────────────────────────────────────────────────────────────*/
/*                               Columns                                 */
/*───────────────────────────────────────────────────────────────────────*/

/// Ceiling and floor rows of a sector at one column, before rounding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rows {
    pub top: f32,
    pub bottom: f32,
}

impl Rows {
    /// First covered row below the ceiling and last covered row above the
    /// floor, clamped to `-1 ..= height` so later `± 1` cannot overflow.
    #[inline]
    fn pixels(&self, height: i32) -> (i32, i32) {
        let clamp = |y: f32| y.clamp(-1.0, height as f32) as i32;
        (clamp(self.top.ceil()), clamp(self.bottom.floor()))
    }
}

/// Everything needed to paint one column of one wall.
#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub x: i32,
    pub rows: Rows,
    /// Texture column, already perspective corrected.
    pub u: f32,
    pub ceil: Rgba,
    pub floor: Rgba,
}

impl Column {
    /// Ceiling strip above `ct` and floor strip below `cb`, inside the open
    /// range. Returns the rounded wall rows.
    fn strips<S: Surface + ?Sized>(&self, surface: &mut S, bands: &ClipBands) -> (i32, i32) {
        let (high, low) = (bands.high(self.x), bands.low(self.x));
        let (ct, cb) = self.rows.pixels(bands.height);
        surface.vline(self.x, high, (ct - 1).min(low), self.ceil);
        surface.vline(self.x, (cb + 1).max(high), low, self.floor);
        (ct, cb)
    }
}

/// Textured wall column, then close it.
pub fn draw_solid<S: Surface + ?Sized>(
    surface: &mut S,
    bands: &mut ClipBands,
    texture: &Texture,
    col: &Column,
) {
    let x = col.x;
    if !bands.is_open(x) {
        return;
    }
    let (ct, cb) = col.strips(surface, bands);

    let y0 = ct.max(bands.high(x));
    let y1 = cb.min(bands.low(x));
    let Rows { top, bottom } = col.rows;
    let span = (bottom - top).max(f32::EPSILON);
    let v_max = (texture.h() - 1) as f32;
    let u = col.u.max(0.0) as usize;
    for y in y0..=y1 {
        let v = ((y as f32 - top) / span * v_max).max(0.0) as usize;
        surface.plot(x, y, texture.texel(u, v));
    }

    bands.close(x);
}

/// Window into `neighbour`: paint strips and step bands, then narrow the
/// open range to what stays visible through the portal.
pub fn draw_portal<S: Surface + ?Sized>(
    surface: &mut S,
    bands: &mut ClipBands,
    col: &Column,
    neighbour: Rows,
    step: Rgba,
) {
    let x = col.x;
    if !bands.is_open(x) {
        return;
    }
    let (ct, cb) = col.strips(surface, bands);
    let (nct, ncb) = neighbour.pixels(bands.height);

    // neighbour ceiling lower on screen: upper step
    if nct > ct {
        let (high, low) = (bands.high(x), bands.low(x));
        surface.vline(x, ct.max(high), (nct - 1).min(low), step);
        bands.narrow_top(x, nct);
    } else {
        bands.narrow_top(x, ct);
    }

    // neighbour floor higher on screen: lower step
    if ncb < cb {
        let (high, low) = (bands.high(x), bands.low(x));
        surface.vline(x, (ncb + 1).max(high), cb.min(low), step);
        bands.narrow_bottom(x, ncb);
    } else {
        bands.narrow_bottom(x, cb);
    }
}
