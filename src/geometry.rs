//! Exact circle geometry: pairwise intersections, segment and overlap areas,
//! and the area of the region shared by an arbitrary group of circles.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::f64::consts::PI;

/// Absolute tolerance for every containment and overlap boundary test.
pub const SMALL: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }
}

/// A boundary crossing between circles `parents.0` and `parents.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionPoint {
    pub point: Point,
    pub parents: (usize, usize),
}

impl IntersectionPoint {
    fn has_parent(&self, index: usize) -> bool {
        self.parents.0 == index || self.parents.1 == index
    }
}

/// Boundary segment of `circle` running from `p2` to `p1`; `width` is the
/// sagitta of its chord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub circle: Circle,
    pub width: f64,
    pub p1: Point,
    pub p2: Point,
}

#[derive(Debug, Clone, Default)]
pub struct IntersectionArea {
    pub area: f64,
    pub arc_area: f64,
    pub polygon_area: f64,
    /// Bounding arcs in walk order; enough to trace the region outline.
    pub arcs: Vec<Arc>,
    pub inner_points: Vec<IntersectionPoint>,
    pub intersection_points: Vec<IntersectionPoint>,
}

pub fn distance(p1: Point, p2: Point) -> f64 {
    ((p1.x - p2.x) * (p1.x - p2.x) + (p1.y - p2.y) * (p1.y - p2.y)).sqrt()
}

/// Area of the circular segment cut off by a chord with sagitta `width`.
pub fn circle_area(r: f64, width: f64) -> f64 {
    r * r * (1.0 - width / r).acos() - (r - width) * (width * (2.0 * r - width)).sqrt()
}

/// Overlap area of two circles whose centers are `d` apart.
pub fn circle_overlap(r1: f64, r2: f64, d: f64) -> f64 {
    if d >= r1 + r2 {
        return 0.0;
    }

    if d <= (r1 - r2).abs() {
        let r = r1.min(r2);
        return PI * r * r;
    }

    let w1 = r1 - (d * d - r2 * r2 + r1 * r1) / (2.0 * d);
    let w2 = r2 - (d * d - r1 * r1 + r2 * r2) / (2.0 * d);
    circle_area(r1, w1.clamp(0.0, 2.0 * r1)) + circle_area(r2, w2.clamp(0.0, 2.0 * r2))
}

/// Boundary crossings of two circles.
///
/// Tangent and coincident circles report no crossings, so they fall into the
/// same disjoint/contained handling as every other non-crossing pair.
pub fn circle_circle_intersection(c1: &Circle, c2: &Circle) -> Vec<Point> {
    let d = distance(c1.center(), c2.center());
    let r1 = c1.radius;
    let r2 = c2.radius;

    if d >= r1 + r2 || d <= (r1 - r2).abs() {
        return Vec::new();
    }

    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let x0 = c1.x + a * (c2.x - c1.x) / d;
    let y0 = c1.y + a * (c2.y - c1.y) / d;
    let rx = -(c2.y - c1.y) * (h / d);
    let ry = -(c2.x - c1.x) * (h / d);

    vec![Point::new(x0 + rx, y0 - ry), Point::new(x0 - rx, y0 + ry)]
}

pub fn contained_in_circles(point: Point, circles: &[Circle]) -> bool {
    circles
        .iter()
        .all(|circle| distance(point, circle.center()) <= circle.radius + SMALL)
}

pub fn get_center(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let n = points.len() as f64;
    Point::new(sx / n, sy / n)
}

fn intersection_points(circles: &[Circle]) -> Vec<IntersectionPoint> {
    let mut ret = Vec::new();
    for i in 0..circles.len() {
        for j in (i + 1)..circles.len() {
            for point in circle_circle_intersection(&circles[i], &circles[j]) {
                ret.push(IntersectionPoint {
                    point,
                    parents: (i, j),
                });
            }
        }
    }
    ret
}

/// Area of the region inside every circle in `circles`.
pub fn intersection_area(circles: &[Circle]) -> IntersectionArea {
    let intersection_points = intersection_points(circles);
    let mut inner_points: Vec<IntersectionPoint> = intersection_points
        .iter()
        .filter(|p| contained_in_circles(p.point, circles))
        .copied()
        .collect();

    let mut arc_area = 0.0;
    let mut polygon_area = 0.0;
    let mut arcs = Vec::new();

    if inner_points.len() > 1 {
        // walking the points in angular order around their centroid visits
        // the polygon edges in sequence
        let points: Vec<Point> = inner_points.iter().map(|p| p.point).collect();
        let center = get_center(&points);
        let angle = |p: &IntersectionPoint| (p.point.x - center.x).atan2(p.point.y - center.y);
        inner_points.sort_by(|a, b| angle(b).partial_cmp(&angle(a)).unwrap_or(Ordering::Equal));

        let mut p2 = inner_points[inner_points.len() - 1];
        for &p1 in &inner_points {
            polygon_area += (p2.point.x + p1.point.x) * (p1.point.y - p2.point.y);

            let mid = Point::new(
                (p1.point.x + p2.point.x) / 2.0,
                (p1.point.y + p2.point.y) / 2.0,
            );
            let mut arc: Option<Arc> = None;

            for index in [p1.parents.0, p1.parents.1] {
                if !p2.has_parent(index) {
                    continue;
                }
                let circle = circles[index];
                let a1 = (p1.point.x - circle.x).atan2(p1.point.y - circle.y);
                let a2 = (p2.point.x - circle.x).atan2(p2.point.y - circle.y);
                let mut angle_diff = a2 - a1;
                if angle_diff < 0.0 {
                    angle_diff += 2.0 * PI;
                }

                // sagitta: from the chord midpoint to the arc midpoint
                let a = a2 - angle_diff / 2.0;
                let width = distance(
                    mid,
                    Point::new(
                        circle.x + circle.radius * a.sin(),
                        circle.y + circle.radius * a.cos(),
                    ),
                )
                .min(circle.radius * 2.0);

                // innermost boundary: smallest sagitta, first one on ties
                if arc.is_none_or(|best| best.width > width) {
                    arc = Some(Arc {
                        circle,
                        width,
                        p1: p1.point,
                        p2: p2.point,
                    });
                }
            }

            if let Some(arc) = arc {
                arc_area += circle_area(arc.circle.radius, arc.width);
                arcs.push(arc);
                p2 = p1;
            }
        }
        polygon_area = (polygon_area / 2.0).abs();
    } else if let Some(smallest) = circles
        .iter()
        .copied()
        .reduce(|best, c| if c.radius < best.radius { c } else { best })
    {
        // no usable crossings: either nested or disjoint
        let disjoint = circles.iter().any(|circle| {
            distance(circle.center(), smallest.center()) > (smallest.radius - circle.radius).abs()
        });

        if !disjoint {
            arc_area = smallest.area();
            arcs.push(Arc {
                circle: smallest,
                width: smallest.radius * 2.0,
                p1: Point::new(smallest.x, smallest.y + smallest.radius),
                p2: Point::new(smallest.x - SMALL, smallest.y + smallest.radius),
            });
        }
    }

    IntersectionArea {
        area: arc_area + polygon_area,
        arc_area,
        polygon_area,
        arcs,
        inner_points,
        intersection_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn segment_area_endpoints() {
        assert_eq!(circle_area(10.0, 0.0), 0.0);
        assert_close(circle_area(10.0, 10.0), PI * 100.0 / 2.0, 1e-9);
        assert_close(circle_area(10.0, 20.0), PI * 100.0, 1e-9);
    }

    #[test]
    fn overlap_of_far_circles_is_zero() {
        assert_eq!(circle_overlap(10.0, 10.0, 200.0), 0.0);
    }

    #[test]
    fn overlap_of_nested_circles_is_smaller_area() {
        assert_close(circle_overlap(10.0, 10.0, 0.0), PI * 100.0, 1e-9);
        assert_close(circle_overlap(10.0, 5.0, 5.0), PI * 25.0, 1e-9);
    }

    #[test]
    fn crossing_points_lie_on_both_circles() {
        let c1 = Circle::new(0.0, 0.0, 10.0);
        let c2 = Circle::new(10.0, 0.0, 10.0);
        let points = circle_circle_intersection(&c1, &c2);
        assert_eq!(points.len(), 2);
        for p in &points {
            assert_close(distance(*p, c1.center()), 10.0, 1e-9);
            assert_close(distance(*p, c2.center()), 10.0, 1e-9);
            assert_close(p.x, 5.0, 1e-9);
        }
        assert_close(points[0].y, -points[1].y, 1e-9);
    }

    #[test]
    fn no_crossings_for_contained_or_disjoint() {
        let contained = circle_circle_intersection(
            &Circle::new(0.0, 3.0, 10.0),
            &Circle::new(3.0, 0.0, 20.0),
        );
        assert!(contained.is_empty());
        let apart = circle_circle_intersection(
            &Circle::new(0.0, 0.0, 10.0),
            &Circle::new(21.0, 0.0, 10.0),
        );
        assert!(apart.is_empty());
    }

    #[test]
    fn tangent_circles_have_no_crossings() {
        let points = circle_circle_intersection(
            &Circle::new(0.0, 0.0, 1.0),
            &Circle::new(2.0, 0.0, 1.0),
        );
        assert!(points.is_empty());
        let coincident = circle_circle_intersection(
            &Circle::new(1.0, 1.0, 1.0),
            &Circle::new(1.0, 1.0, 1.0),
        );
        assert!(coincident.is_empty());
    }

    #[test]
    fn two_circle_area_matches_closed_form() {
        let circles = [Circle::new(0.0, 0.0, 1.0), Circle::new(1.2, 0.3, 0.8)];
        let d = distance(circles[0].center(), circles[1].center());
        let exact = circle_overlap(1.0, 0.8, d);
        let stats = intersection_area(&circles);
        assert_close(stats.area, exact, 1e-9);
        assert_eq!(stats.arcs.len(), 2);
        assert_eq!(stats.inner_points.len(), 2);
    }

    #[test]
    fn pairwise_disjoint_group_has_zero_area() {
        let circles = [
            Circle::new(0.909, 0.905, 0.548),
            Circle::new(0.765, 0.382, 0.703),
            Circle::new(0.63, 0.019, 0.449),
            Circle::new(0.21, 0.755, 0.656),
            Circle::new(0.276, 0.723, 1.145),
            Circle::new(0.141, 0.585, 0.419),
        ];
        assert_eq!(intersection_area(&circles).area, 0.0);
    }

    #[test]
    fn fully_covered_smallest_circle() {
        let circles = [
            Circle::new(0.426, 0.882, 0.944),
            Circle::new(0.24, 0.685, 0.992),
            Circle::new(0.01, 0.909, 1.161),
            Circle::new(0.54, 0.475, 0.41),
        ];
        let stats = intersection_area(&circles);
        assert_close(stats.area, PI * 0.41 * 0.41, 1e-4);
        assert_eq!(stats.arcs.len(), 1);
    }

    #[test]
    fn four_circle_regression() {
        let circles = [
            Circle::new(9.154829758385864, 0.0, 8.481629223064205),
            Circle::new(5.806079662851866, 7.4438023223126795, 15.274853405932202),
            Circle::new(9.484491297623553, 4.064806303558571, 10.280023453913834),
            Circle::new(10.56492833796709, 3.0723147554880175, 8.812923024107548),
        ];
        assert_close(intersection_area(&circles).area, 10.96362, 0.005);

        let small = [
            Circle::new(0.501, 0.32, 0.629),
            Circle::new(0.945, 0.022, 1.015),
            Circle::new(0.021, 0.863, 0.261),
            Circle::new(0.528, 0.09, 0.676),
        ];
        assert!(intersection_area(&small).area - 0.0008914 < 0.0001);
    }

    #[test]
    fn large_circles_do_not_produce_nan() {
        let circles = [
            Circle::new(-0.0014183481763938425, 0.0006071174738860746, 510.3115834996166),
            Circle::new(875.0163281608848, 0.0007003612396158774, 465.1793581792228),
            Circle::new(462.7394999567192, 387.9359963330729, 172.62633992134658),
        ];
        assert!(!intersection_area(&circles).area.is_nan());
    }

    #[test]
    fn empty_group_has_zero_area() {
        let stats = intersection_area(&[]);
        assert_eq!(stats.area, 0.0);
        assert!(stats.arcs.is_empty());
    }

    #[test]
    fn containment_uses_tolerance() {
        let circles = [Circle::new(0.0, 0.0, 1.0)];
        assert!(contained_in_circles(Point::new(1.0 + 5e-11, 0.0), &circles));
        assert!(!contained_in_circles(Point::new(1.0 + 1e-9, 0.0), &circles));
    }
}
