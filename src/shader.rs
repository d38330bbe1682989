//! Shaders
//!
//! A shader supplies the source pixels for a fill. The canvas hands it the
//! CTM through [`Shader::set_context`] before a draw; the shader composes
//! that with its own local matrix and inverts the product to map device
//! samples back into its local space. `set_context` failing (a singular
//! transform) tells the canvas to skip the draw. Every `shade_row` output
//! pixel is premultiplied, sampled at device centers (x + 0.5 + i, y + 0.5).

use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::geometry::Point;
use crate::pixel::{multiply, Pixel};
use crate::transform::Matrix;

/// How a shader coordinate outside its natural domain is brought back in
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TileMode {
    /// Pin to the nearest edge
    Clamp,
    /// Wrap with period dim
    Repeat,
    /// Reflect with period 2*dim
    Mirror,
}

/// Per-pixel source of premultiplied colors
pub trait Shader {
    /// Whether every pixel this shader can produce has alpha 255
    fn is_opaque(&self) -> bool;
    /// Install the draw's CTM; returns false when the combined transform
    /// cannot be inverted, in which case the draw must be skipped
    fn set_context(&mut self, ctm: &Matrix) -> bool;
    /// Fill `row` with source pixels for the device run starting at (x, y)
    ///
    /// `set_context` must have succeeded for the current draw first.
    fn shade_row(&mut self, x: i32, y: i32, row: &mut [Pixel]);
}

fn clamp_coord(x: f32, bound: i32) -> i32 {
    (x.floor() as i32).max(0).min(bound - 1)
}

fn repeat_coord(mut x: f32, bound: i32) -> i32 {
    let b = bound as f32;
    while x < 0.0 {
        x += b;
    }
    while x >= b {
        x -= b;
    }
    x.floor() as i32
}

fn mirror_coord(x: f32, bound: i32) -> i32 {
    let b = bound as f32;
    let period = 2.0 * b;
    let mut x = x % period;
    if x < 0.0 {
        x += period;
    }
    let folded = if x < b { x } else { period - x };
    (folded.floor() as i32).min(bound - 1)
}

fn tile_coord(x: f32, bound: i32, mode: TileMode) -> i32 {
    match mode {
        TileMode::Clamp => clamp_coord(x, bound),
        TileMode::Repeat => repeat_coord(x, bound),
        TileMode::Mirror => mirror_coord(x, bound),
    }
}

/// Samples a bitmap through the inverse CTM with a tile mode
pub struct BitmapShader<'a> {
    src: &'a Bitmap,
    local: Matrix,
    tile: TileMode,
    inverse: Matrix,
}

impl<'a> BitmapShader<'a> {
    pub fn new(src: &'a Bitmap, local: Matrix, tile: TileMode) -> Self {
        BitmapShader { src, local, tile, inverse: Matrix::identity() }
    }
}

impl Shader for BitmapShader<'_> {
    fn is_opaque(&self) -> bool {
        self.src.is_opaque()
    }

    fn set_context(&mut self, ctm: &Matrix) -> bool {
        match (*ctm * self.local).invert() {
            Some(inv) => {
                self.inverse = inv;
                true
            }
            None => false,
        }
    }

    fn shade_row(&mut self, x: i32, y: i32, row: &mut [Pixel]) {
        let (w, h) = (self.src.width() as i32, self.src.height() as i32);
        for (i, out) in row.iter_mut().enumerate() {
            let device = Point::new(x as f32 + 0.5 + i as f32, y as f32 + 0.5);
            let local = self.inverse.map_point(device);
            let sx = tile_coord(local.x, w, self.tile);
            let sy = tile_coord(local.y, h, self.tile);
            *out = self.src.get(sx as usize, sy as usize);
        }
    }
}

/// Linear gradient between two points over a list of color stops
///
/// The local matrix maps the unit x axis onto p0->p1, so the inverse's x
/// coordinate is the gradient parameter t.
pub struct LinearGradient {
    colors: Vec<Color>,
    local: Matrix,
    tile: TileMode,
    inverse: Matrix,
}

impl LinearGradient {
    /// Build a gradient; `None` when no colors are given
    pub fn new(p0: Point, p1: Point, colors: &[Color], tile: TileMode) -> Option<Self> {
        if colors.is_empty() {
            return None;
        }
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        Some(LinearGradient {
            colors: colors.to_vec(),
            local: Matrix::new(dx, -dy, p0.x, dy, dx, p0.y),
            tile,
            inverse: Matrix::identity(),
        })
    }
}

impl Shader for LinearGradient {
    fn is_opaque(&self) -> bool {
        self.colors.iter().all(|c| c.a == 1.0)
    }

    fn set_context(&mut self, ctm: &Matrix) -> bool {
        match (*ctm * self.local).invert() {
            Some(inv) => {
                self.inverse = inv;
                true
            }
            None => false,
        }
    }

    fn shade_row(&mut self, x: i32, y: i32, row: &mut [Pixel]) {
        let n = self.colors.len();
        for (i, out) in row.iter_mut().enumerate() {
            let device = Point::new(x as f32 + 0.5 + i as f32, y as f32 + 0.5);
            let t = self.inverse.map_point(device).x;
            let t = match self.tile {
                TileMode::Clamp => t.clamp(0.0, 1.0),
                TileMode::Repeat => t - t.floor(),
                TileMode::Mirror => {
                    let f = t.floor();
                    let r = t - f;
                    if f as i64 % 2 == 0 {
                        r
                    } else {
                        1.0 - r
                    }
                }
            };
            let scaled = t * (n - 1) as f32;
            let index = scaled.floor() as usize;
            let w = scaled - index as f32;
            let color = if w == 0.0 || index + 1 >= n {
                self.colors[index.min(n - 1)]
            } else {
                self.colors[index] * (1.0 - w) + self.colors[index + 1] * w
            };
            *out = color.to_pixel();
        }
    }
}

/// Interpolates three vertex colors across a triangle
///
/// The local matrix maps barycentric (u, v) onto the triangle, so the
/// inverse turns device pixels into (u, v); the color is iterated across a
/// row by a constant delta from the inverse's first column.
pub struct TriColorShader {
    c0: Color,
    c1: Color,
    c2: Color,
    local: Matrix,
    inverse: Matrix,
}

impl TriColorShader {
    pub fn new(pts: &[Point; 3], colors: &[Color; 3]) -> Self {
        let u = pts[1] - pts[0];
        let v = pts[2] - pts[0];
        TriColorShader {
            c0: colors[0],
            c1: colors[1],
            c2: colors[2],
            local: Matrix::new(u.x, v.x, pts[0].x, u.y, v.y, pts[0].y),
            inverse: Matrix::identity(),
        }
    }
}

impl Shader for TriColorShader {
    fn is_opaque(&self) -> bool {
        self.c0.a == 1.0 && self.c1.a == 1.0 && self.c2.a == 1.0
    }

    fn set_context(&mut self, ctm: &Matrix) -> bool {
        match (*ctm * self.local).invert() {
            Some(inv) => {
                self.inverse = inv;
                true
            }
            None => false,
        }
    }

    fn shade_row(&mut self, x: i32, y: i32, row: &mut [Pixel]) {
        let dc1 = self.c1 - self.c0;
        let dc2 = self.c2 - self.c0;
        let start = self.inverse.map_point(Point::new(x as f32 + 0.5, y as f32 + 0.5));
        let mut c = dc1 * start.x + dc2 * start.y + self.c0;
        let dc = dc1 * self.inverse.a + dc2 * self.inverse.d;
        for out in row.iter_mut() {
            *out = c.to_pixel();
            c = c + dc;
        }
    }
}

/// Wraps a shader with an extra local transform
pub struct ProxyShader<'a> {
    real: &'a mut dyn Shader,
    extra: Matrix,
}

impl<'a> ProxyShader<'a> {
    pub fn new(real: &'a mut dyn Shader, extra: Matrix) -> Self {
        ProxyShader { real, extra }
    }
}

impl Shader for ProxyShader<'_> {
    fn is_opaque(&self) -> bool {
        self.real.is_opaque()
    }

    fn set_context(&mut self, ctm: &Matrix) -> bool {
        self.real.set_context(&(*ctm * self.extra))
    }

    fn shade_row(&mut self, x: i32, y: i32, row: &mut [Pixel]) {
        self.real.shade_row(x, y, row);
    }
}

/// Multiplies the outputs of two shaders component-wise
pub struct CompositeShader<'a> {
    first: &'a mut dyn Shader,
    second: &'a mut dyn Shader,
}

impl<'a> CompositeShader<'a> {
    pub fn new(first: &'a mut dyn Shader, second: &'a mut dyn Shader) -> Self {
        CompositeShader { first, second }
    }
}

impl Shader for CompositeShader<'_> {
    fn is_opaque(&self) -> bool {
        self.first.is_opaque() && self.second.is_opaque()
    }

    fn set_context(&mut self, ctm: &Matrix) -> bool {
        self.first.set_context(ctm) && self.second.set_context(ctm)
    }

    fn shade_row(&mut self, x: i32, y: i32, row: &mut [Pixel]) {
        let mut a = vec![Pixel::default(); row.len()];
        let mut b = vec![Pixel::default(); row.len()];
        self.first.shade_row(x, y, &mut a);
        self.second.shade_row(x, y, &mut b);
        for ((out, pa), pb) in row.iter_mut().zip(a).zip(b) {
            *out = multiply(pa, pb);
        }
    }
}
