//! Basic geometric types: points, rectangles and affine matrices

use crate::error::{PdfError, Result};
use crate::format::NumberFormat;

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0)
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// A rectangle defined by two points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rectangle {
    /// Lower-left corner
    pub lower_left: Point,
    /// Upper-right corner
    pub upper_right: Point,
}

impl Rectangle {
    /// Create a new rectangle from two points
    pub fn new(lower_left: Point, upper_right: Point) -> Self {
        Self {
            lower_left,
            upper_right,
        }
    }

    /// Create a rectangle from position and size
    pub fn from_position_and_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            lower_left: Point::new(x, y),
            upper_right: Point::new(x + width, y + height),
        }
    }

    /// Get the width
    pub fn width(&self) -> f64 {
        self.upper_right.x - self.lower_left.x
    }

    /// Get the height
    pub fn height(&self) -> f64 {
        self.upper_right.y - self.lower_left.y
    }

    /// Get the center point
    pub fn center(&self) -> Point {
        Point::new(
            (self.lower_left.x + self.upper_right.x) / 2.0,
            (self.lower_left.y + self.upper_right.y) / 2.0,
        )
    }

    pub(crate) fn to_array(self) -> [f64; 4] {
        [
            self.lower_left.x,
            self.lower_left.y,
            self.upper_right.x,
            self.upper_right.y,
        ]
    }
}

/// Affine transform `[sx shy shx sy tx ty]`.
///
/// `a.multiply(&b)` yields the transform that applies `b` first and `a`
/// second, so a point `p` maps to `a(b(p))`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    pub sx: f64,
    pub shy: f64,
    pub shx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

/// Result of [`Matrix::decompose`]; recomposes as
/// `translate * rotate * skew * scale` applied right to left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposition {
    pub scale: Matrix,
    pub translate: Matrix,
    pub rotate: Matrix,
    pub skew: Matrix,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(sx: f64, shy: f64, shx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
        }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Counter-clockwise rotation by `radians`.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Mirror across the x axis.
    pub fn flip_y() -> Self {
        Self::new(1.0, 0.0, 0.0, -1.0, 0.0, 0.0)
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.sx, self.shy, self.shx, self.sy, self.tx, self.ty]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn multiply(&self, first: &Matrix) -> Matrix {
        let m1 = first;
        let m2 = self;
        Matrix {
            sx: m1.sx * m2.sx + m1.shy * m2.shx,
            shy: m1.sx * m2.shy + m1.shy * m2.sy,
            shx: m1.shx * m2.sx + m1.sy * m2.shx,
            sy: m1.shx * m2.shy + m1.sy * m2.sy,
            tx: m1.tx * m2.sx + m1.ty * m2.shx + m2.tx,
            ty: m1.tx * m2.shy + m1.ty * m2.sy + m2.ty,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.sx * self.sy - self.shy * self.shx
    }

    pub fn inverse(&self) -> Result<Matrix> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(PdfError::InvalidArgument(
                "matrix is not invertible".to_string(),
            ));
        }
        let sx = self.sy / det;
        let shy = -self.shy / det;
        let shx = -self.shx / det;
        let sy = self.sx / det;
        Ok(Matrix {
            sx,
            shy,
            shx,
            sy,
            tx: -(self.tx * sx + self.ty * shx),
            ty: -(self.tx * shy + self.ty * sy),
        })
    }

    pub fn decompose(&self) -> Decomposition {
        let (mut a, mut b, mut c, mut d) = (self.sx, self.shy, self.shx, self.sy);

        let mut scale_x = (a * a + b * b).sqrt();
        a /= scale_x;
        b /= scale_x;

        let mut shear = a * c + b * d;
        c -= a * shear;
        d -= b * shear;

        let scale_y = (c * c + d * d).sqrt();
        shear /= scale_y;

        if a * (d / scale_y) < b * (c / scale_y) {
            a = -a;
            b = -b;
            shear = -shear;
            scale_x = -scale_x;
        }

        Decomposition {
            scale: Matrix::scaling(scale_x, scale_y),
            translate: Matrix::translation(self.tx, self.ty),
            rotate: Matrix::new(a, b, -b, a, 0.0, 0.0),
            skew: Matrix::new(1.0, 0.0, shear, 1.0, 0.0, 0.0),
        }
    }

    pub fn apply_to_point(&self, point: Point) -> Point {
        Point::new(
            point.x * self.sx + point.y * self.shx + self.tx,
            point.x * self.shy + point.y * self.sy + self.ty,
        )
    }

    /// Bounding box of the transformed rectangle.
    pub fn apply_to_rectangle(&self, rect: Rectangle) -> Rectangle {
        let corners = [
            self.apply_to_point(rect.lower_left),
            self.apply_to_point(Point::new(rect.upper_right.x, rect.lower_left.y)),
            self.apply_to_point(rect.upper_right),
            self.apply_to_point(Point::new(rect.lower_left.x, rect.upper_right.y)),
        ];
        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        Rectangle::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Operands for `cm`, `Tm` or a `/Matrix` entry.
    pub fn to_pdf_string(&self, fmt: &NumberFormat) -> String {
        self.to_array()
            .iter()
            .map(|v| fmt.hpf(*v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    fn assert_matrix_close(a: &Matrix, b: &Matrix) {
        for (x, y) in a.to_array().iter().zip(b.to_array().iter()) {
            assert_close(*x, *y);
        }
    }

    #[test]
    fn test_point() {
        let p = Point::new(10.0, 20.0);
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 20.0);
        assert_eq!(Point::origin(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_rectangle() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), Point::new(110.0, 120.0));
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.height(), 100.0);
        assert_eq!(rect.center(), Point::new(60.0, 70.0));

        let rect = Rectangle::from_position_and_size(10.0, 20.0, 50.0, 30.0);
        assert_eq!(rect.to_array(), [10.0, 20.0, 60.0, 50.0]);
    }

    #[test]
    fn test_multiply_applies_argument_first() {
        let scale = Matrix::scaling(2.0, 2.0);
        let translate = Matrix::translation(10.0, 0.0);

        // translate first, then scale
        let m = scale.multiply(&translate);
        assert_eq!(m.apply_to_point(Point::new(1.0, 1.0)), Point::new(22.0, 2.0));

        // scale first, then translate
        let m = translate.multiply(&scale);
        assert_eq!(m.apply_to_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
    }

    #[test]
    fn test_inverse() {
        let m = Matrix::new(2.0, 0.5, -1.0, 3.0, 7.0, -4.0);
        let inv = m.inverse().unwrap();
        assert_matrix_close(&m.multiply(&inv), &Matrix::identity());

        let singular = Matrix::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0);
        assert!(singular.inverse().is_err());
    }

    #[test]
    fn test_decompose_recomposes() {
        let m = Matrix::translation(5.0, 6.0)
            .multiply(&Matrix::rotation(0.3))
            .multiply(&Matrix::scaling(2.0, 3.0));
        let d = m.decompose();

        let recomposed = d
            .translate
            .multiply(&d.rotate)
            .multiply(&d.skew)
            .multiply(&d.scale);
        assert_matrix_close(&recomposed, &m);
        assert_close(d.scale.sx, 2.0);
        assert_close(d.scale.sy, 3.0);
        assert_close(d.skew.shx, 0.0);
    }

    #[test]
    fn test_apply_to_rectangle() {
        let rect = Rectangle::from_position_and_size(0.0, 0.0, 10.0, 20.0);
        let rotated = Matrix::rotation(std::f64::consts::FRAC_PI_2).apply_to_rectangle(rect);
        assert_close(rotated.lower_left.x, -20.0);
        assert_close(rotated.upper_right.x, 0.0);
        assert_close(rotated.upper_right.y, 10.0);
    }

    #[test]
    fn test_to_pdf_string() {
        let fmt = NumberFormat::default();
        let m = Matrix::new(2.834645669, 0.0, 0.0, -2.834645669, 0.0, 841.89);
        assert_eq!(m.to_pdf_string(&fmt), "2.83465 0. 0. -2.83465 0. 841.89");
    }
}
