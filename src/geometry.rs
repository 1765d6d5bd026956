//! Coordinate spaces of the canvas.
//!
//! Nodes and edges live in **canvas space**, which never changes with pan or
//! zoom. Pointer events arrive in **viewport space** (raw window pixels). The
//! [`ViewTransform`] maps one onto the other:
//!
//! ```text
//! viewport = origin + canvas * scale + translate
//! canvas   = (viewport - origin - translate) / scale
//! ```

use serde::{Deserialize, Serialize};

/// A 2D point or vector. Which space it lives in depends on context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Smallest scale the canvas may be zoomed out to.
pub const MIN_SCALE: f32 = 0.2;
/// Largest scale the canvas may be zoomed in to.
pub const MAX_SCALE: f32 = 2.0;

/// Translation (viewport pixels) plus uniform scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform { x: 0.0, y: 0.0, scale: 1.0 };

    pub const fn new(x: f32, y: f32, scale: f32) -> Self {
        Self { x, y, scale }
    }

    /// Canvas point to its position relative to the viewport's top-left corner.
    pub fn apply(&self, canvas: Point) -> Point {
        Point::new(canvas.x * self.scale + self.x, canvas.y * self.scale + self.y)
    }
}

/// Clamp a scale into `[min, max]`.
///
/// NaN collapses to `min` so a bad wheel delta can never poison the transform.
pub fn clamp_scale(scale: f32, min: f32, max: f32) -> f32 {
    if scale.is_nan() {
        return min;
    }
    scale.clamp(min, max)
}

/// Bounding box of the viewport element on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewportRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

/// Map a raw pointer position into canvas space.
///
/// `viewport` is `None` until the host has laid the canvas out; that case
/// yields [`Point::ZERO`] rather than an error.
pub fn to_canvas_space(
    pointer_x: f32,
    pointer_y: f32,
    viewport: Option<&ViewportRect>,
    transform: &ViewTransform,
) -> Point {
    let Some(rect) = viewport else {
        return Point::ZERO;
    };
    let scale = if transform.scale > 0.0 { transform.scale } else { 1.0 };
    Point::new(
        (pointer_x - rect.left - transform.x) / scale,
        (pointer_y - rect.top - transform.y) / scale,
    )
}

/// Map a canvas point to raw pointer coordinates. Inverse of [`to_canvas_space`].
pub fn to_viewport_space(
    canvas: Point,
    viewport: Option<&ViewportRect>,
    transform: &ViewTransform,
) -> Point {
    let origin = viewport.map(ViewportRect::origin).unwrap_or(Point::ZERO);
    transform.apply(canvas) + origin
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Point, expected: Point) {
        let diff = actual.distance_sq(expected).sqrt();
        assert!(diff < 1e-3, "expected {expected:?}, got {actual:?}");
    }

    // ========================================================================
    // to_canvas_space()
    // ========================================================================

    #[test]
    fn test_identity_transform_subtracts_origin() {
        let rect = ViewportRect::new(256.0, 64.0, 800.0, 600.0);
        let p = to_canvas_space(300.0, 100.0, Some(&rect), &ViewTransform::IDENTITY);
        assert_eq!(p, Point::new(44.0, 36.0));
    }

    #[test]
    fn test_translation_and_scale() {
        let rect = ViewportRect::new(0.0, 0.0, 800.0, 600.0);
        let t = ViewTransform::new(100.0, 50.0, 2.0);
        let p = to_canvas_space(300.0, 250.0, Some(&rect), &t);
        assert_eq!(p, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_unmeasured_viewport_is_zero() {
        let t = ViewTransform::new(10.0, 20.0, 1.5);
        assert_eq!(to_canvas_space(400.0, 300.0, None, &t), Point::ZERO);
    }

    #[test]
    fn test_zero_scale_does_not_divide_by_zero() {
        let rect = ViewportRect::default();
        let t = ViewTransform::new(0.0, 0.0, 0.0);
        let p = to_canvas_space(10.0, 10.0, Some(&rect), &t);
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    // ========================================================================
    // Inverse property
    // ========================================================================

    #[test]
    fn test_forward_then_inverse_returns_canvas_point() {
        let rect = ViewportRect::new(240.0, 56.0, 1024.0, 768.0);
        let transforms = [
            ViewTransform::IDENTITY,
            ViewTransform::new(-320.0, 75.5, 0.2),
            ViewTransform::new(12.0, -900.0, 2.0),
            ViewTransform::new(33.3, 44.4, 1.44),
        ];
        let points = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 150.0),
            Point::new(-250.0, 812.5),
            Point::new(1050.0, -64.0),
        ];
        for t in transforms {
            for p in points {
                let screen = to_viewport_space(p, Some(&rect), &t);
                let back = to_canvas_space(screen.x, screen.y, Some(&rect), &t);
                assert_close(back, p);
            }
        }
    }

    // ========================================================================
    // clamp_scale()
    // ========================================================================

    #[test]
    fn test_clamp_scale_bounds() {
        assert_eq!(clamp_scale(0.05, MIN_SCALE, MAX_SCALE), MIN_SCALE);
        assert_eq!(clamp_scale(7.0, MIN_SCALE, MAX_SCALE), MAX_SCALE);
        assert_eq!(clamp_scale(1.3, MIN_SCALE, MAX_SCALE), 1.3);
    }

    #[test]
    fn test_clamp_scale_is_idempotent() {
        for s in [-1.0, 0.0, 0.2, 0.7, 2.0, 9.0] {
            let once = clamp_scale(s, MIN_SCALE, MAX_SCALE);
            assert_eq!(clamp_scale(once, MIN_SCALE, MAX_SCALE), once);
        }
    }

    #[test]
    fn test_clamp_scale_nan() {
        assert_eq!(clamp_scale(f32::NAN, MIN_SCALE, MAX_SCALE), MIN_SCALE);
    }
}
