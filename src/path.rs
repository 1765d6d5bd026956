use crate::geometry::Point;

/// Cubic bezier curve between two anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start anchor
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End anchor
}

impl CubicBezier {
    /// Curve of a committed edge.
    ///
    /// Both control points sit at the height of their anchor, pushed out
    /// horizontally by `curvature * |dx|`. The curve therefore leaves the
    /// source and enters the target horizontally, and bows outward when the
    /// target lies to the left of the source.
    pub fn edge(start: Point, end: Point, curvature: f32) -> Self {
        let offset = (end.x - start.x).abs() * curvature;
        Self::with_offset(start, end, offset)
    }

    /// Curve of the live connection preview: a fixed control offset.
    pub fn preview(start: Point, end: Point, offset: f32) -> Self {
        Self::with_offset(start, end, offset)
    }

    fn with_offset(start: Point, end: Point, offset: f32) -> Self {
        CubicBezier {
            p0: start,
            p1: start.offset(offset, 0.0),
            p2: end.offset(-offset, 0.0),
            p3: end,
        }
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.p0.x + 3.0 * mt2 * t * self.p1.x + 3.0 * mt * t2 * self.p2.x + t3 * self.p3.x;
        let y = mt3 * self.p0.y + 3.0 * mt2 * t * self.p1.y + 3.0 * mt * t2 * self.p2.y + t3 * self.p3.y;

        Point::new(x, y)
    }

    /// Unnormalized tangent at parameter t.
    pub fn derivative(&self, t: f32) -> Point {
        let mt = 1.0 - t;
        let a = 3.0 * mt * mt;
        let b = 6.0 * mt * t;
        let c = 3.0 * t * t;
        Point::new(
            a * (self.p1.x - self.p0.x) + b * (self.p2.x - self.p1.x) + c * (self.p3.x - self.p2.x),
            a * (self.p1.y - self.p0.y) + b * (self.p2.y - self.p1.y) + c * (self.p3.y - self.p2.y),
        )
    }

    /// Point at `t = 0.5`, where edge labels are centered.
    pub fn midpoint(&self) -> Point {
        self.eval(0.5)
    }

    /// Apply the view transform to every control point.
    pub fn scaled(&self, scale: f32, translate: Point) -> Self {
        let map = |p: Point| Point::new(p.x * scale + translate.x, p.y * scale + translate.y);
        CubicBezier { p0: map(self.p0), p1: map(self.p1), p2: map(self.p2), p3: map(self.p3) }
    }

    /// SVG path commands, e.g. `"M 10 20 C 60 20 90 80 140 80"`.
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
        )
    }
}

/// Generate SVG path command for a committed edge between two anchors.
pub fn generate_edge_path(start: Point, end: Point, curvature: f32) -> String {
    CubicBezier::edge(start, end, curvature).to_svg()
}

/// Generate SVG path command for the dashed connection preview.
pub fn generate_preview_path(start: Point, end: Point, offset: f32) -> String {
    CubicBezier::preview(start, end, offset).to_svg()
}

/// Triangle of an arrowhead whose tip touches `tip`, pointing along `direction`.
///
/// Returns `[tip, left, right]`, with `length` measured from the tip back to
/// the base and the base `width` wide.
pub fn arrowhead(tip: Point, direction: Point, length: f32, width: f32) -> [Point; 3] {
    let len = direction.distance_sq(Point::ZERO).sqrt();
    let (ux, uy) = if len > f32::EPSILON {
        (direction.x / len, direction.y / len)
    } else {
        (1.0, 0.0)
    };
    let base = Point::new(tip.x - ux * length, tip.y - uy * length);
    let half = width / 2.0;
    // Perpendicular to the direction
    let (px, py) = (-uy * half, ux * half);
    [tip, Point::new(base.x + px, base.y + py), Point::new(base.x - px, base.y - py)]
}

/// SVG commands for a closed arrowhead triangle.
pub fn arrowhead_path(points: &[Point; 3]) -> String {
    format!(
        "M {} {} L {} {} L {} {} Z",
        points[1].x, points[1].y, points[0].x, points[0].y, points[2].x, points[2].y
    )
}

/// Calculate squared distance from a point to a line segment
fn distance_to_line_segment_sq(point: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let ap = point - a;

    let ab_len_sq = ab.x * ab.x + ab.y * ab.y;

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.x * ap.x + ap.y * ap.y;
    }

    // Project point onto line, clamped to segment
    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0);

    let closest = Point::new(a.x + t * ab.x, a.y + t * ab.y);
    point.distance_sq(closest)
}

/// Calculate the minimum distance from a point to a cubic bezier curve
///
/// Samples the curve at regular intervals and measures against each chord.
pub fn distance_to_bezier(point: Point, bezier: &CubicBezier, num_samples: usize) -> f32 {
    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev_point = bezier.eval(0.0);

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr_point = bezier.eval(t);

        let dist_sq = distance_to_line_segment_sq(point, prev_point, curr_point);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
        }

        prev_point = curr_point;
    }

    min_dist_sq.sqrt()
}
