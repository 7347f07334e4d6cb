//! Contour geometry: minimum enclosing circles and polygon moments.

use imageproc::contours::{BorderType, Contour};
use nalgebra::Matrix2;

/// Circle in canonical pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    fn from_diameter(a: [f64; 2], b: [f64; 2]) -> Self {
        let cx = 0.5 * (a[0] + b[0]);
        let cy = 0.5 * (a[1] + b[1]);
        let r = 0.5 * ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
        Self { cx, cy, r }
    }

    fn circumscribed(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Self {
        let bx = b[0] - a[0];
        let by = b[1] - a[1];
        let cx = c[0] - a[0];
        let cy = c[1] - a[1];
        let d = 2.0 * (bx * cy - by * cx);
        if d.abs() < 1e-12 {
            // Collinear: the widest pair spans the circle.
            let candidates = [
                Self::from_diameter(a, b),
                Self::from_diameter(a, c),
                Self::from_diameter(b, c),
            ];
            return candidates
                .into_iter()
                .fold(candidates[0], |best, c| if c.r > best.r { c } else { best });
        }
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        Self {
            cx: a[0] + ux,
            cy: a[1] + uy,
            r: (ux * ux + uy * uy).sqrt(),
        }
    }

    fn contains(&self, p: [f64; 2]) -> bool {
        let dx = p[0] - self.cx;
        let dy = p[1] - self.cy;
        (dx * dx + dy * dy).sqrt() <= self.r + 1e-7 * self.r.max(1.0)
    }
}

/// Smallest circle enclosing all points (incremental Welzl construction).
pub(crate) fn min_enclosing_circle(points: &[[f64; 2]]) -> Option<Circle> {
    let first = *points.first()?;
    let mut c = Circle {
        cx: first[0],
        cy: first[1],
        r: 0.0,
    };
    for i in 1..points.len() {
        if c.contains(points[i]) {
            continue;
        }
        c = Circle {
            cx: points[i][0],
            cy: points[i][1],
            r: 0.0,
        };
        for j in 0..i {
            if c.contains(points[j]) {
                continue;
            }
            c = Circle::from_diameter(points[i], points[j]);
            for k in 0..j {
                if !c.contains(points[k]) {
                    c = Circle::circumscribed(points[i], points[j], points[k]);
                }
            }
        }
    }
    Some(c)
}

/// Axis-aligned bounds `(min_x, min_y, max_x, max_y)` of a point set.
pub(crate) fn bounds(points: &[[f64; 2]]) -> Option<[f64; 4]> {
    let first = points.first()?;
    let mut b = [first[0], first[1], first[0], first[1]];
    for p in &points[1..] {
        b[0] = b[0].min(p[0]);
        b[1] = b[1].min(p[1]);
        b[2] = b[2].max(p[0]);
        b[3] = b[3].max(p[1]);
    }
    Some(b)
}

/// `true` when the enclosing radius of a point set cannot fall inside
/// `(r_min, r_max)`, judged from its bounding box alone.
///
/// The enclosing radius lies between half the longer side and half the
/// diagonal, so this rejects most contours before the O(n) circle fit.
pub(crate) fn radius_out_of_reach(points: &[[f64; 2]], r_min: f64, r_max: f64) -> bool {
    let Some([x0, y0, x1, y1]) = bounds(points) else {
        return true;
    };
    let w = x1 - x0;
    let h = y1 - y0;
    let lower = 0.5 * w.max(h);
    let upper = 0.5 * (w * w + h * h).sqrt();
    lower >= r_max || upper <= r_min
}

/// Area-weighted shape statistics of a closed polygon.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PolygonMoments {
    pub area: f64,
    pub cx: f64,
    pub cy: f64,
    /// Ratio of the minor to the major eigenvalue of the second central
    /// moments; 1 for a circle, 0 for a line.
    pub inertia_ratio: f64,
}

/// Green's-theorem moments of a closed polygon.
///
/// Returns `None` for degenerate (zero-area) polygons.
pub(crate) fn polygon_moments(points: &[[f64; 2]]) -> Option<PolygonMoments> {
    if points.len() < 3 {
        return None;
    }
    let (mut m00, mut m10, mut m01) = (0.0f64, 0.0f64, 0.0f64);
    let (mut m20, mut m11, mut m02) = (0.0f64, 0.0f64, 0.0f64);
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        let (x0, y0, x1, y1) = (p[0], p[1], q[0], q[1]);
        let a = x0 * y1 - x1 * y0;
        m00 += a;
        m10 += a * (x0 + x1);
        m01 += a * (y0 + y1);
        m20 += a * (x0 * x0 + x0 * x1 + x1 * x1);
        m02 += a * (y0 * y0 + y0 * y1 + y1 * y1);
        m11 += a * (x0 * y1 + 2.0 * x0 * y0 + 2.0 * x1 * y1 + x1 * y0);
    }
    m00 /= 2.0;
    if m00.abs() < 1e-9 {
        return None;
    }
    m10 /= 6.0;
    m01 /= 6.0;
    m20 /= 12.0;
    m02 /= 12.0;
    m11 /= 24.0;

    // Orientation only flips the sign of every raw moment.
    let cx = m10 / m00;
    let cy = m01 / m00;
    let mu20 = m20 / m00 - cx * cx;
    let mu02 = m02 / m00 - cy * cy;
    let mu11 = m11 / m00 - cx * cy;

    let eig = Matrix2::new(mu20, mu11, mu11, mu02).symmetric_eigenvalues();
    let (lo, hi) = if eig[0] <= eig[1] {
        (eig[0], eig[1])
    } else {
        (eig[1], eig[0])
    };
    let inertia_ratio = if hi > 1e-12 { (lo / hi).max(0.0) } else { 0.0 };

    Some(PolygonMoments {
        area: m00.abs(),
        cx,
        cy,
        inertia_ratio,
    })
}

/// Outer-border contour point lists, converted to `f64`.
pub(crate) fn outer_contours(binary: &image::GrayImage) -> Vec<Vec<[f64; 2]>> {
    let contours: Vec<Contour<i32>> = imageproc::contours::find_contours(binary);
    contours
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .map(|c| contour_points(&c))
        .collect()
}

/// Every contour (outer and hole borders), converted to `f64`.
pub(crate) fn all_contours(binary: &image::GrayImage) -> Vec<Vec<[f64; 2]>> {
    let contours: Vec<Contour<i32>> = imageproc::contours::find_contours(binary);
    contours.iter().map(contour_points).collect()
}

fn contour_points(c: &Contour<i32>) -> Vec<[f64; 2]> {
    c.points.iter().map(|p| [p.x as f64, p.y as f64]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn circle_points(cx: f64, cy: f64, r: f64, n: usize) -> Vec<[f64; 2]> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64 * std::f64::consts::TAU;
                [cx + r * t.cos(), cy + r * t.sin()]
            })
            .collect()
    }

    #[test]
    fn enclosing_circle_of_sampled_circle() {
        let pts = circle_points(40.0, 25.0, 12.0, 90);
        let c = min_enclosing_circle(&pts).unwrap();
        assert_relative_eq!(c.cx, 40.0, epsilon = 1e-6);
        assert_relative_eq!(c.cy, 25.0, epsilon = 1e-6);
        assert_relative_eq!(c.r, 12.0, epsilon = 1e-6);
    }

    #[test]
    fn enclosing_circle_contains_interior_points() {
        let mut pts = circle_points(0.0, 0.0, 5.0, 16);
        pts.push([1.0, 1.0]);
        pts.push([-2.0, 0.5]);
        let c = min_enclosing_circle(&pts).unwrap();
        assert!(pts.iter().all(|&p| c.contains(p)));
        assert_relative_eq!(c.r, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn enclosing_circle_of_collinear_points() {
        let pts = vec![[0.0, 0.0], [2.0, 0.0], [10.0, 0.0], [4.0, 0.0]];
        let c = min_enclosing_circle(&pts).unwrap();
        assert_relative_eq!(c.cx, 5.0, epsilon = 1e-9);
        assert_relative_eq!(c.r, 5.0, epsilon = 1e-9);
        assert!(min_enclosing_circle(&[]).is_none());
    }

    #[test]
    fn square_moments() {
        let sq = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let m = polygon_moments(&sq).unwrap();
        assert_relative_eq!(m.area, 100.0, epsilon = 1e-9);
        assert_relative_eq!(m.cx, 5.0, epsilon = 1e-9);
        assert_relative_eq!(m.cy, 5.0, epsilon = 1e-9);
        assert_relative_eq!(m.inertia_ratio, 1.0, epsilon = 1e-9);

        // Clockwise ordering yields the same statistics.
        let mut rev = sq.clone();
        rev.reverse();
        let m2 = polygon_moments(&rev).unwrap();
        assert_relative_eq!(m2.area, 100.0, epsilon = 1e-9);
        assert_relative_eq!(m2.cx, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn elongated_rectangle_has_low_inertia() {
        let rect = vec![[0.0, 0.0], [40.0, 0.0], [40.0, 4.0], [0.0, 4.0]];
        let m = polygon_moments(&rect).unwrap();
        // Variances scale with the squared side lengths: (4/40)^2.
        assert_relative_eq!(m.inertia_ratio, 0.01, epsilon = 1e-9);
    }

    #[test]
    fn bounding_box_prefilter() {
        let big = circle_points(0.0, 0.0, 50.0, 32);
        assert!(radius_out_of_reach(&big, 15.0, 30.0));
        let tiny = circle_points(0.0, 0.0, 3.0, 32);
        assert!(radius_out_of_reach(&tiny, 15.0, 30.0));
        let ok = circle_points(0.0, 0.0, 20.0, 32);
        assert!(!radius_out_of_reach(&ok, 15.0, 30.0));
    }
}
