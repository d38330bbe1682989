//! easel - a software 2D rasterizer
//!
//! Vector drawing commands in, pixels out. The pipeline is classical:
//! a draw call maps its control points through the current transform, the
//! segments are clipped to the device and turned into edge records, a scan
//! converter walks the edges row by row, and every resulting span is shaded
//! and blended into the destination bitmap.
//!
//! There is no anti-aliasing and no stroking: fills are hard-edged, a pixel
//! is covered exactly when its center falls inside the outline.
//!
//! # Drawing
//!
//! A [`Canvas`] borrows a [`Bitmap`] and draws with a [`Paint`]:
//!
//!     use easel::{Bitmap, Canvas, Color, Paint, Point};
//!
//!     let mut bitmap = Bitmap::new(100, 100);
//!     let mut canvas = Canvas::new(&mut bitmap);
//!
//!     let triangle = [
//!         Point::new(10.0, 10.0),
//!         Point::new(90.0, 10.0),
//!         Point::new(50.0, 90.0),
//!     ];
//!     let mut paint = Paint::with_color(Color::rgb(1.0, 0.0, 0.0));
//!     canvas.draw_convex_polygon(&triangle, &mut paint);
//!
//! Rectangles and convex polygons take the fast two-edge scan; [`Path`]s
//! with Bezier curves are flattened and filled with the non-zero winding
//! rule via [`Canvas::draw_path`]. Meshes and tessellated quads
//! ([`Canvas::draw_mesh`], [`Canvas::draw_quad`]) interpolate per-vertex
//! colors and texture coordinates across their triangles.
//!
//! # Shaders
//!
//! A [`Paint`] carries either a solid color or a [`Shader`]: bitmap
//! sampling with clamp/repeat/mirror tiling ([`BitmapShader`]), linear
//! gradients ([`LinearGradient`]), barycentric triangle colors
//! ([`TriColorShader`]), and the [`ProxyShader`]/[`CompositeShader`]
//! combinators. Shader output and all blending run on premultiplied
//! ARGB pixels with the full Porter-Duff table ([`BlendMode`]).
//!
//! # Transforms
//!
//! The canvas keeps a 2x3 affine CTM with a save/restore stack;
//! [`Canvas::save_scope`] hands out a guard that restores on drop.

pub mod bitmap;
pub mod canvas;
pub mod color;
pub mod edge;
pub mod geometry;
pub mod path;
pub mod pixel;
pub mod ppm;
pub mod scan;
pub mod shader;
pub mod transform;

pub use crate::bitmap::Bitmap;
pub use crate::canvas::{Canvas, Paint, SaveScope};
pub use crate::color::Color;
pub use crate::edge::Edge;
pub use crate::geometry::{Point, Rect};
pub use crate::path::{Direction, Path, Segment, Verb};
pub use crate::pixel::{blend, BlendMode, Pixel};
pub use crate::shader::{
    BitmapShader, CompositeShader, LinearGradient, ProxyShader, Shader, TileMode, TriColorShader,
};
pub use crate::transform::Matrix;
