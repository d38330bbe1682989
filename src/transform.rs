//! Affine transforms
//!
//! A [`Matrix`] is the 2x3 affine [[a b c], [d e f], [0 0 1]], row major.
//! The canvas keeps one as its CTM; shaders invert the product of the CTM
//! and their local matrix to map device samples back into their own space.

use std::ops::Mul;

use crate::geometry::Point;

/// 2x3 affine transform
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    /// Create from the six coefficients, row major
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Matrix { a, b, c, d, e, f }
    }
    /// Identity transform
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }
    /// Translation by (tx, ty)
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, tx, 0.0, 1.0, ty)
    }
    /// Scale by (sx, sy) about the origin
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }
    /// Rotation about the origin
    ///
    /// angle is in radians
    pub fn rotate(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, -sin, 0.0, sin, cos, 0.0)
    }

    /// Invert the transform
    ///
    /// Returns `None` when the linear part is singular.
    pub fn invert(&self) -> Option<Matrix> {
        let det = self.b * self.d - self.a * self.e;
        if det == 0.0 {
            return None;
        }
        let inv = 1.0 / det;
        Some(Matrix::new(
            -self.e * inv,
            self.b * inv,
            (-self.b * self.f + self.e * self.c) * inv,
            self.d * inv,
            -self.a * inv,
            (-self.c * self.d + self.a * self.f) * inv,
        ))
    }

    /// Map a single point
    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.c,
            self.d * p.x + self.e * p.y + self.f,
        )
    }

    /// Map points in place
    pub fn map_points(&self, pts: &mut [Point]) {
        for p in pts.iter_mut() {
            *p = self.map_point(*p);
        }
    }
}

impl Default for Matrix {
    fn default() -> Matrix {
        Matrix::identity()
    }
}

impl Mul for Matrix {
    type Output = Matrix;
    /// Concatenation: (self * rhs) maps a point through rhs, then self
    fn mul(self, m: Matrix) -> Matrix {
        Matrix::new(
            self.a * m.a + self.b * m.d,
            self.a * m.b + self.b * m.e,
            self.a * m.c + self.b * m.f + self.c,
            self.d * m.a + self.e * m.d,
            self.d * m.b + self.e * m.e,
            self.d * m.c + self.e * m.f + self.f,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(p: Point, q: Point) {
        assert!((p.x - q.x).abs() < 1e-5 && (p.y - q.y).abs() < 1e-5, "{:?} != {:?}", p, q);
    }

    #[test]
    fn identity_maps_points_unchanged() {
        let p = Point::new(3.5, -2.25);
        assert_eq!(Matrix::identity().map_point(p), p);
    }

    #[test]
    fn basic_constructors() {
        let p = Point::new(2.0, 3.0);
        assert_eq!(Matrix::translate(10.0, 20.0).map_point(p), Point::new(12.0, 23.0));
        assert_eq!(Matrix::scale(2.0, -1.0).map_point(p), Point::new(4.0, -3.0));
        let r = Matrix::rotate(std::f32::consts::FRAC_PI_2);
        assert_close(r.map_point(Point::new(1.0, 0.0)), Point::new(0.0, 1.0));
    }

    #[test]
    fn concat_applies_right_first() {
        let m = Matrix::translate(10.0, 0.0) * Matrix::scale(2.0, 2.0);
        assert_eq!(m.map_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
    }

    #[test]
    fn invert_round_trips() {
        let m = Matrix::translate(3.0, -4.0) * Matrix::rotate(0.7) * Matrix::scale(2.0, 0.5);
        let inv = m.invert().unwrap();
        let round = m * inv;
        let id = Matrix::identity();
        for (got, want) in [
            (round.a, id.a),
            (round.b, id.b),
            (round.c, id.c),
            (round.d, id.d),
            (round.e, id.e),
            (round.f, id.f),
        ] {
            assert!((got - want).abs() < 1e-5, "{} != {}", got, want);
        }
    }

    #[test]
    fn invert_singular_fails() {
        assert!(Matrix::scale(0.0, 1.0).invert().is_none());
        assert!(Matrix::new(1.0, 2.0, 0.0, 2.0, 4.0, 0.0).invert().is_none());
    }

    #[test]
    fn map_points_in_place() {
        let m = Matrix::translate(1.0, 1.0);
        let mut pts = [Point::new(0.0, 0.0), Point::new(5.0, 5.0)];
        m.map_points(&mut pts);
        assert_eq!(pts, [Point::new(1.0, 1.0), Point::new(6.0, 6.0)]);
    }
}
