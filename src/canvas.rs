//! Canvas
//!
//! The canvas ties the pipeline together: it owns the CTM stack, borrows
//! the destination bitmap, and for every draw maps the geometry, builds and
//! clips edges, scan converts, and blends each span through the paint.
//! Draw order is deterministic: rows top to bottom, pixels left to right.

use std::ops::{Deref, DerefMut};

use log::trace;

use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::edge;
use crate::geometry::{Point, Rect};
use crate::path::{self, Path, Segment};
use crate::pixel::{blend, BlendMode, Pixel};
use crate::scan;
use crate::shader::{CompositeShader, ProxyShader, Shader, TriColorShader};
use crate::transform::Matrix;

/// What to draw with: a color or a shader, plus a blend mode
///
/// The default paint is opaque black over SrcOver. A paint with a shader
/// borrows it mutably for the paint's lifetime; the shader's context is set
/// by the draw call that uses it.
pub struct Paint<'a> {
    pub color: Color,
    pub blend: BlendMode,
    pub shader: Option<&'a mut dyn Shader>,
}

impl<'a> Paint<'a> {
    pub fn new() -> Paint<'a> {
        Paint { color: Color::black(), blend: BlendMode::SrcOver, shader: None }
    }
    pub fn with_color(color: Color) -> Paint<'a> {
        Paint { color, ..Paint::new() }
    }
    pub fn with_shader(shader: &'a mut dyn Shader) -> Paint<'a> {
        Paint { shader: Some(shader), ..Paint::new() }
    }
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
    pub fn blend_mode(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }
}

impl Default for Paint<'_> {
    fn default() -> Self {
        Paint::new()
    }
}

/// Drawing facade over a borrowed bitmap
pub struct Canvas<'a> {
    device: &'a mut Bitmap,
    width: i32,
    height: i32,
    ctm: Matrix,
    saves: Vec<Matrix>,
}

impl<'a> Canvas<'a> {
    /// Create a canvas drawing into the bitmap
    pub fn new(device: &'a mut Bitmap) -> Canvas<'a> {
        let width = device.width() as i32;
        let height = device.height() as i32;
        // one implicit save keeps the stack non-empty for balanced callers
        Canvas { device, width, height, ctm: Matrix::identity(), saves: vec![Matrix::identity()] }
    }

    /// The current transformation matrix
    pub fn ctm(&self) -> &Matrix {
        &self.ctm
    }

    /// Push a copy of the CTM
    ///
    /// Calls nest; each restore pops back to the matching save's CTM.
    pub fn save(&mut self) {
        self.saves.push(self.ctm);
    }

    /// Pop back to the CTM of the matching save
    ///
    /// Restoring more times than saved is a caller error; extra restores
    /// are ignored.
    pub fn restore(&mut self) {
        if let Some(m) = self.saves.pop() {
            self.ctm = m;
        }
    }

    /// Save, returning a guard that restores when dropped
    pub fn save_scope(&mut self) -> SaveScope<'_, 'a> {
        self.save();
        SaveScope { canvas: self }
    }

    /// Preconcatenate a matrix onto the CTM: CTM' = CTM * m
    pub fn concat(&mut self, m: &Matrix) {
        self.ctm = self.ctm * *m;
    }
    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.concat(&Matrix::translate(tx, ty));
    }
    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.concat(&Matrix::scale(sx, sy));
    }
    pub fn rotate(&mut self, radians: f32) {
        self.concat(&Matrix::rotate(radians));
    }

    /// Fill the whole device with the paint
    pub fn draw_paint(&mut self, paint: &mut Paint<'_>) {
        let bounds = Rect::from_wh(self.width as f32, self.height as f32);
        self.draw_rect(&bounds, paint);
    }

    /// Fill a rectangle
    ///
    /// A pixel is covered when its center is inside: center > min edge and
    /// center <= max edge, after the CTM is applied.
    pub fn draw_rect(&mut self, rect: &Rect, paint: &mut Paint<'_>) {
        let pts = [
            Point::new(rect.left, rect.top),
            Point::new(rect.right, rect.top),
            Point::new(rect.right, rect.bottom),
            Point::new(rect.left, rect.bottom),
        ];
        self.draw_convex_polygon(&pts, paint);
    }

    /// Fill a convex polygon given as its corner points
    pub fn draw_convex_polygon(&mut self, pts: &[Point], paint: &mut Paint<'_>) {
        if pts.len() < 3 {
            return;
        }
        if !self.prepare_shader(paint) {
            trace!("convex polygon skipped, shader context not invertible");
            return;
        }
        let mut mapped = pts.to_vec();
        self.ctm.map_points(&mut mapped);

        let mut edges = Vec::new();
        for i in 0..mapped.len() {
            let next = mapped[(i + 1) % mapped.len()];
            edge::clip_segment(mapped[i], next, self.width, self.height, &mut edges);
        }
        if edges.is_empty() {
            return;
        }
        edge::sort_edges(&mut edges);

        let device = &mut *self.device;
        let mut row = Vec::new();
        scan::scan_convex(&edges, |x0, x1, y| blit_span(device, paint, &mut row, x0, x1, y));
    }

    /// Fill a path with the non-zero winding rule
    ///
    /// Curves are flattened to chords before edge building.
    pub fn draw_path(&mut self, path: &Path, paint: &mut Paint<'_>) {
        if !self.prepare_shader(paint) {
            trace!("path skipped, shader context not invertible");
            return;
        }
        let mut transformed = path.clone();
        transformed.transform(&self.ctm);

        let mut edges = Vec::new();
        for seg in transformed.edger() {
            match seg {
                Segment::Line([p0, p1]) => {
                    edge::clip_segment(p0, p1, self.width, self.height, &mut edges);
                }
                Segment::Quad(q) => {
                    let k = path::quad_segments(&q);
                    let mut prev = q[0];
                    for i in 1..k {
                        let next = path::eval_quad(&q, i as f32 / k as f32);
                        edge::clip_segment(prev, next, self.width, self.height, &mut edges);
                        prev = next;
                    }
                    edge::clip_segment(prev, q[2], self.width, self.height, &mut edges);
                }
                Segment::Cubic(c) => {
                    let k = path::cubic_segments(&c);
                    let mut prev = c[0];
                    for i in 1..k {
                        let next = path::eval_cubic(&c, i as f32 / k as f32);
                        edge::clip_segment(prev, next, self.width, self.height, &mut edges);
                        prev = next;
                    }
                    edge::clip_segment(prev, c[3], self.width, self.height, &mut edges);
                }
            }
        }
        if edges.is_empty() {
            return;
        }
        edge::sort_edges(&mut edges);
        trace!("filling path with {} edges", edges.len());

        let device = &mut *self.device;
        let mut row = Vec::new();
        scan::scan_nonzero(&mut edges, |x0, x1, y| blit_span(device, paint, &mut row, x0, x1, y));
    }

    /// Fill one triangle with optional per-vertex colors and texture coords
    ///
    /// Colors alone shade barycentrically; texture coords alone re-map the
    /// paint's shader through the triangle; both multiply the two together.
    /// Texture coords are ignored when the paint has no shader.
    pub fn draw_triangle(
        &mut self,
        pts: &[Point; 3],
        colors: Option<&[Color; 3]>,
        texs: Option<&[Point; 3]>,
        paint: &mut Paint<'_>,
    ) {
        let blend = paint.blend;
        let texs = if paint.shader.is_some() { texs } else { None };
        match (colors, texs) {
            (None, None) => self.draw_convex_polygon(pts, paint),
            (Some(colors), None) => {
                let mut tri = TriColorShader::new(pts, colors);
                let mut p = Paint::with_shader(&mut tri).blend_mode(blend);
                self.draw_convex_polygon(pts, &mut p);
            }
            (None, Some(texs)) => {
                let extra = match tex_transform(pts, texs) {
                    Some(m) => m,
                    None => return,
                };
                if let Some(real) = paint.shader.as_deref_mut() {
                    let mut proxy = ProxyShader::new(real, extra);
                    let mut p = Paint::with_shader(&mut proxy).blend_mode(blend);
                    self.draw_convex_polygon(pts, &mut p);
                }
            }
            (Some(colors), Some(texs)) => {
                let extra = match tex_transform(pts, texs) {
                    Some(m) => m,
                    None => return,
                };
                if let Some(real) = paint.shader.as_deref_mut() {
                    let mut tri = TriColorShader::new(pts, colors);
                    let mut proxy = ProxyShader::new(real, extra);
                    let mut composite = CompositeShader::new(&mut tri, &mut proxy);
                    let mut p = Paint::with_shader(&mut composite).blend_mode(blend);
                    self.draw_convex_polygon(pts, &mut p);
                }
            }
        }
    }

    /// Draw a mesh of triangles over a shared vertex pool
    ///
    /// `indices` is walked in triples; colors and texture coords, when
    /// given, are indexed the same way as the vertices.
    pub fn draw_mesh(
        &mut self,
        verts: &[Point],
        colors: Option<&[Color]>,
        texs: Option<&[Point]>,
        indices: &[usize],
        paint: &mut Paint<'_>,
    ) {
        for tri in indices.chunks_exact(3) {
            let pts = [verts[tri[0]], verts[tri[1]], verts[tri[2]]];
            let tri_colors = colors.map(|c| [c[tri[0]], c[tri[1]], c[tri[2]]]);
            let tri_texs = texs.map(|t| [t[tri[0]], t[tri[1]], t[tri[2]]]);
            self.draw_triangle(&pts, tri_colors.as_ref(), tri_texs.as_ref(), paint);
        }
    }

    /// Draw a quad tessellated into a mesh
    ///
    /// Corners are ordered top-left, top-right, bottom-right, bottom-left.
    /// `level` subdivides each side into level + 1 cells; every cell splits
    /// into two triangles on its top-right to bottom-left diagonal, so the
    /// mesh holds 2 * (level + 1)^2 triangles. Corner attributes are
    /// interpolated bilinearly.
    pub fn draw_quad(
        &mut self,
        verts: &[Point; 4],
        colors: Option<&[Color; 4]>,
        texs: Option<&[Point; 4]>,
        level: usize,
        paint: &mut Paint<'_>,
    ) {
        let (corners, mesh_colors, mesh_texs, indices) = tessellate_quad(verts, colors, texs, level);
        self.draw_mesh(&corners, mesh_colors.as_deref(), mesh_texs.as_deref(), &indices, paint);
    }

    fn prepare_shader(&self, paint: &mut Paint<'_>) -> bool {
        match paint.shader.as_deref_mut() {
            Some(shader) => shader.set_context(&self.ctm),
            None => true,
        }
    }
}

/// Blend one span of source into the device at row y
fn blit_span(device: &mut Bitmap, paint: &mut Paint<'_>, row: &mut Vec<Pixel>, x0: i32, x1: i32, y: i32) {
    if x1 <= x0 {
        return;
    }
    debug_assert!(x0 >= 0 && y >= 0, "span ({}, {}) at {} underflows", x0, x1, y);
    debug_assert!(
        x1 as usize <= device.width() && (y as usize) < device.height(),
        "span ({}, {}) at {} overflows",
        x0,
        x1,
        y
    );
    let (x0, x1, y) = (x0 as usize, x1 as usize, y as usize);
    match paint.shader.as_deref_mut() {
        Some(shader) => {
            row.clear();
            row.resize(x1 - x0, Pixel::default());
            shader.shade_row(x0 as i32, y as i32, row);
            for (i, &src) in row.iter().enumerate() {
                let x = x0 + i;
                let dst = device.get(x, y);
                device.set(x, y, blend(src, dst, paint.blend));
            }
        }
        None => {
            let src = paint.color.to_pixel();
            for x in x0..x1 {
                let dst = device.get(x, y);
                device.set(x, y, blend(src, dst, paint.blend));
            }
        }
    }
}

/// Affine taking the paint shader from texture space into point space
fn tex_transform(pts: &[Point; 3], texs: &[Point; 3]) -> Option<Matrix> {
    let p = triangle_basis(pts);
    let t = triangle_basis(texs);
    Some(p * t.invert()?)
}

fn triangle_basis(pts: &[Point; 3]) -> Matrix {
    let u = pts[1] - pts[0];
    let v = pts[2] - pts[0];
    Matrix::new(u.x, v.x, pts[0].x, u.y, v.y, pts[0].y)
}

fn bilerp_point(p: &[Point; 4], u: f32, v: f32) -> Point {
    p[0] * ((1.0 - u) * (1.0 - v)) + p[1] * (u * (1.0 - v)) + p[2] * (u * v) + p[3] * ((1.0 - u) * v)
}

fn bilerp_color(c: &[Color; 4], u: f32, v: f32) -> Color {
    c[0] * ((1.0 - u) * (1.0 - v)) + c[1] * (u * (1.0 - v)) + c[2] * (u * v) + c[3] * ((1.0 - u) * v)
}

type QuadMesh = (Vec<Point>, Option<Vec<Color>>, Option<Vec<Point>>, Vec<usize>);

fn tessellate_quad(
    verts: &[Point; 4],
    colors: Option<&[Color; 4]>,
    texs: Option<&[Point; 4]>,
    level: usize,
) -> QuadMesh {
    let side = level + 2;
    let mut corners = Vec::with_capacity(side * side);
    let mut mesh_colors = colors.map(|_| Vec::with_capacity(side * side));
    let mut mesh_texs = texs.map(|_| Vec::with_capacity(side * side));

    for yi in 0..side {
        let v = yi as f32 / (level + 1) as f32;
        for xi in 0..side {
            let u = xi as f32 / (level + 1) as f32;
            corners.push(bilerp_point(verts, u, v));
            if let (Some(out), Some(c)) = (mesh_colors.as_mut(), colors) {
                out.push(bilerp_color(c, u, v));
            }
            if let (Some(out), Some(t)) = (mesh_texs.as_mut(), texs) {
                out.push(bilerp_point(t, u, v));
            }
        }
    }

    let mut indices = Vec::with_capacity(6 * (level + 1) * (level + 1));
    for row in 0..=level {
        for col in 0..=level {
            let tl = row * side + col;
            let tr = tl + 1;
            let bl = tl + side;
            let br = bl + 1;
            indices.extend_from_slice(&[tl, tr, bl, tr, br, bl]);
        }
    }

    (corners, mesh_colors, mesh_texs, indices)
}

/// Restores the canvas CTM when dropped
///
/// Returned by [`Canvas::save_scope`]; dereferences to the canvas so draw
/// calls go straight through.
pub struct SaveScope<'s, 'dev> {
    canvas: &'s mut Canvas<'dev>,
}

impl<'s, 'dev> Deref for SaveScope<'s, 'dev> {
    type Target = Canvas<'dev>;
    fn deref(&self) -> &Canvas<'dev> {
        &*self.canvas
    }
}

impl<'s, 'dev> DerefMut for SaveScope<'s, 'dev> {
    fn deref_mut(&mut self) -> &mut Canvas<'dev> {
        &mut *self.canvas
    }
}

impl Drop for SaveScope<'_, '_> {
    fn drop(&mut self) {
        self.canvas.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_round_trips_the_ctm() {
        let mut bmp = Bitmap::new(4, 4);
        let mut canvas = Canvas::new(&mut bmp);
        let before = *canvas.ctm();
        canvas.save();
        canvas.translate(5.0, 5.0);
        canvas.save();
        canvas.scale(2.0, 2.0);
        canvas.restore();
        canvas.restore();
        assert_eq!(*canvas.ctm(), before);
    }

    #[test]
    fn first_restore_is_safe() {
        let mut bmp = Bitmap::new(4, 4);
        let mut canvas = Canvas::new(&mut bmp);
        canvas.rotate(1.0);
        canvas.restore();
        assert_eq!(*canvas.ctm(), Matrix::identity());
    }

    #[test]
    fn save_scope_restores_on_drop() {
        let mut bmp = Bitmap::new(4, 4);
        let mut canvas = Canvas::new(&mut bmp);
        {
            let mut scoped = canvas.save_scope();
            scoped.translate(3.0, 0.0);
            assert_ne!(*scoped.ctm(), Matrix::identity());
        }
        assert_eq!(*canvas.ctm(), Matrix::identity());
    }

    #[test]
    fn quad_tessellation_counts() {
        let verts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        for level in 0..4 {
            let (corners, _, _, indices) = tessellate_quad(&verts, None, None, level);
            assert_eq!(corners.len(), (level + 2) * (level + 2));
            assert_eq!(indices.len() / 3, 2 * (level + 1) * (level + 1));
        }
    }

    #[test]
    fn quad_tessellation_level0_diagonal() {
        let verts = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        let (corners, _, _, indices) = tessellate_quad(&verts, None, None, 0);
        // row-major grid: 0 = TL, 1 = TR, 2 = BL, 3 = BR
        assert_eq!(corners[1], Point::new(2.0, 0.0));
        assert_eq!(corners[2], Point::new(0.0, 2.0));
        // both triangles share the TR -> BL diagonal
        assert_eq!(indices, vec![0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn quad_tessellation_interpolates_attributes() {
        let verts = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        let colors = [
            Color::rgb(1.0, 0.0, 0.0),
            Color::rgb(0.0, 1.0, 0.0),
            Color::rgb(0.0, 0.0, 1.0),
            Color::white(),
        ];
        let (corners, mesh_colors, _, _) = tessellate_quad(&verts, Some(&colors), None, 1);
        let mesh_colors = mesh_colors.unwrap();
        // center of a 3x3 grid is the bilinear average of all four corners
        assert_eq!(corners[4], Point::new(2.0, 2.0));
        let center = mesh_colors[4];
        assert!((center.r - 0.5).abs() < 1e-6);
        assert!((center.g - 0.5).abs() < 1e-6);
        assert!((center.b - 0.5).abs() < 1e-6);
        assert!((center.a - 1.0).abs() < 1e-6);
    }
}
