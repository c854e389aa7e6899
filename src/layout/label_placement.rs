//! Label anchors for Venn regions. Each anchor is the point that sits
//! deepest inside the region's circles while staying clear of every other
//! circle; the fallbacks below cover regions too thin or too nested for the
//! margin search to land inside.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::geometry::{Circle, Point, SMALL, distance, get_center, intersection_area};
use crate::ir::{Region, Solution, TextCentre};
use crate::optimize::{Minimizer, NelderMead, NelderMeadOptions};

/// Where regions with no visible area are parked.
const DISJOINT_ANCHOR: (f64, f64) = (0.0, -1000.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelOptions {
    pub max_iterations: usize,
    pub min_error_delta: f64,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            min_error_delta: 1e-10,
        }
    }
}

impl From<&LayoutConfig> for LabelOptions {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            max_iterations: config.label_max_iterations,
            min_error_delta: config.label_min_error_delta,
        }
    }
}

impl LabelOptions {
    pub fn minimizer(&self) -> NelderMead {
        NelderMead::new(NelderMeadOptions {
            max_iterations: self.max_iterations,
            min_error_delta: self.min_error_delta,
            ..NelderMeadOptions::default()
        })
    }
}

/// Signed distance from `current` to the nearest boundary it must respect.
/// Positive inside every interior circle and outside every exterior one.
fn circle_margin(current: Point, interior: &[Circle], exterior: &[Circle]) -> f64 {
    let inside = interior
        .iter()
        .map(|c| c.radius - distance(c.center(), current));
    let outside = exterior
        .iter()
        .map(|c| distance(c.center(), current) - c.radius);
    inside.chain(outside).fold(f64::INFINITY, f64::min)
}

/// For every set, the sets whose circle fully contains it.
fn containing_circles(solution: &Solution) -> HashMap<&str, Vec<&str>> {
    let entries: Vec<(&str, &Circle)> = solution.iter().map(|(id, c)| (id.as_str(), c)).collect();
    let mut ret: HashMap<&str, Vec<&str>> = entries.iter().map(|(id, _)| (*id, Vec::new())).collect();

    for (i, (id_a, a)) in entries.iter().enumerate() {
        for (id_b, b) in &entries[i + 1..] {
            let d = distance(a.center(), b.center());
            if d + b.radius <= a.radius + SMALL {
                ret.entry(*id_b).or_default().push(*id_a);
            } else if d + a.radius <= b.radius + SMALL {
                ret.entry(*id_a).or_default().push(*id_b);
            }
        }
    }
    ret
}

/// One label anchor per region, keyed by [`Region::key`].
pub fn compute_text_centres(solution: &Solution, regions: &[Region]) -> BTreeMap<String, TextCentre> {
    compute_text_centres_with(solution, regions, &LabelOptions::default().minimizer())
}

pub fn compute_text_centres_with<M: Minimizer>(
    solution: &Solution,
    regions: &[Region],
    minimizer: &M,
) -> BTreeMap<String, TextCentre> {
    let containing = containing_circles(solution);
    let mut ret = BTreeMap::new();

    for region in regions {
        let members: HashSet<&str> = region.sets.iter().map(String::as_str).collect();
        // circles that swallow one of ours can't be avoided, so don't try
        let exclude: HashSet<&str> = region
            .sets
            .iter()
            .filter_map(|set| containing.get(set.as_str()))
            .flatten()
            .copied()
            .collect();

        let mut interior = Vec::new();
        let mut exterior = Vec::new();
        for (id, circle) in solution {
            if members.contains(id.as_str()) {
                interior.push(*circle);
            } else if !exclude.contains(id.as_str()) {
                exterior.push(*circle);
            }
        }

        // an intersection with a set that was never drawn has no area
        let all_drawn = region.sets.iter().all(|set| solution.contains_key(set));
        let centre = if interior.is_empty() || !all_drawn {
            disjoint_anchor()
        } else {
            text_centre(&interior, &exterior, minimizer)
        };
        if centre.disjoint && region.size > 0.0 {
            log::warn!("area {:?} not represented on screen", region.sets);
        }
        ret.insert(region.key(), centre);
    }
    ret
}

fn disjoint_anchor() -> TextCentre {
    TextCentre {
        x: DISJOINT_ANCHOR.0,
        y: DISJOINT_ANCHOR.1,
        disjoint: true,
    }
}

/// Label anchor inside every `interior` circle and outside every `exterior`
/// circle.
pub fn compute_text_centre(interior: &[Circle], exterior: &[Circle]) -> TextCentre {
    if interior.is_empty() {
        return disjoint_anchor();
    }
    text_centre(interior, exterior, &LabelOptions::default().minimizer())
}

fn text_centre<M: Minimizer>(interior: &[Circle], exterior: &[Circle], minimizer: &M) -> TextCentre {
    // sample around each interior circle and keep the roomiest point
    let mut points = Vec::with_capacity(interior.len() * 5);
    for c in interior {
        let half = c.radius / 2.0;
        points.push(Point::new(c.x, c.y));
        points.push(Point::new(c.x + half, c.y));
        points.push(Point::new(c.x - half, c.y));
        points.push(Point::new(c.x, c.y + half));
        points.push(Point::new(c.x, c.y - half));
    }
    let mut initial = points[0];
    let mut margin = circle_margin(initial, interior, exterior);
    for &p in &points[1..] {
        let m = circle_margin(p, interior, exterior);
        if m >= margin {
            initial = p;
            margin = m;
        }
    }

    let solution = minimizer.minimize(
        |p| -circle_margin(Point::new(p[0], p[1]), interior, exterior),
        &[initial.x, initial.y],
    );
    let candidate = Point::new(solution.x[0], solution.x[1]);

    let valid = interior
        .iter()
        .all(|c| distance(candidate, c.center()) <= c.radius)
        && exterior
            .iter()
            .all(|c| distance(candidate, c.center()) >= c.radius);
    if valid {
        return TextCentre::new(candidate.x, candidate.y);
    }

    if interior.len() == 1 {
        return TextCentre::new(interior[0].x, interior[0].y);
    }

    let stats = intersection_area(interior);
    match stats.arcs.as_slice() {
        [] => disjoint_anchor(),
        [arc] => TextCentre::new(arc.circle.x, arc.circle.y),
        _ if !exterior.is_empty() => text_centre(interior, &[], minimizer),
        arcs => {
            // rarely reached; the average of the boundary points can land
            // outside strongly concave regions
            let points: Vec<Point> = arcs.iter().map(|a| a.p1).collect();
            let centre = get_center(&points);
            TextCentre::new(centre.x, centre.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::Minimum;

    fn solution(circles: &[(&str, Circle)]) -> Solution {
        circles.iter().map(|(id, c)| (id.to_string(), *c)).collect()
    }

    #[test]
    fn lone_circle_anchor_is_its_center() {
        let centre = compute_text_centre(&[Circle::new(0.0, 0.0, 1.0)], &[]);
        assert!(centre.x.abs() < 1e-3, "{centre:?}");
        assert!(centre.y.abs() < 1e-3, "{centre:?}");
        assert!(!centre.disjoint);
    }

    #[test]
    fn anchor_avoids_exterior_circle() {
        let interior = Circle::new(0.0, 0.0, 1.0);
        let exterior = Circle::new(0.0, 1.0, 1.0);
        let centre = compute_text_centre(&[interior], &[exterior]);
        let p = Point::new(centre.x, centre.y);
        assert!(distance(p, interior.center()) < interior.radius);
        assert!(distance(p, exterior.center()) > exterior.radius);
        assert!(centre.x.abs() < 1e-3);
        assert!((centre.y + 0.5).abs() < 1e-3, "{centre:?}");
    }

    #[test]
    fn disjoint_interior_is_flagged() {
        let centre = compute_text_centre(
            &[Circle::new(0.0, 0.0, 1.0), Circle::new(5.0, 0.0, 1.0)],
            &[],
        );
        assert!(centre.disjoint);
        assert_eq!((centre.x, centre.y), DISJOINT_ANCHOR);
    }

    #[test]
    fn overlap_anchor_sits_in_the_lens() {
        let a = Circle::new(0.0, 0.0, 1.0);
        let b = Circle::new(1.0, 0.0, 1.0);
        let centre = compute_text_centre(&[a, b], &[]);
        assert!((centre.x - 0.5).abs() < 1e-3, "{centre:?}");
        assert!(centre.y.abs() < 1e-3, "{centre:?}");
    }

    /// Always answers with a point far outside any test region.
    struct Astray;

    impl Minimizer for Astray {
        fn minimize<F: FnMut(&[f64]) -> f64>(&self, _objective: F, initial: &[f64]) -> Minimum {
            Minimum {
                x: vec![1e6; initial.len()],
                fx: 0.0,
                iterations: 0,
            }
        }
    }

    #[test]
    fn covered_single_circle_falls_back_to_its_center() {
        let centre = compute_text_centre(&[Circle::new(0.0, 0.0, 1.0)], &[Circle::new(0.0, 0.0, 2.0)]);
        assert_eq!((centre.x, centre.y), (0.0, 0.0));
        assert!(!centre.disjoint);

        let centre = text_centre(&[Circle::new(2.0, 3.0, 1.0)], &[], &Astray);
        assert_eq!((centre.x, centre.y), (2.0, 3.0));
    }

    #[test]
    fn covered_nested_pair_falls_back_to_inner_center() {
        let interior = [Circle::new(0.0, 0.0, 3.0), Circle::new(0.5, 0.0, 0.5)];
        let exterior = [Circle::new(0.5, 0.0, 0.6)];
        let centre = compute_text_centre(&interior, &exterior);
        assert_eq!((centre.x, centre.y), (0.5, 0.0));
        assert!(!centre.disjoint);

        let centre = text_centre(&interior, &[], &Astray);
        assert_eq!((centre.x, centre.y), (0.5, 0.0));
    }

    #[test]
    fn covered_lens_retries_without_exterior() {
        let interior = [Circle::new(0.0, 0.0, 1.0), Circle::new(1.0, 0.0, 1.0)];
        let exterior = [Circle::new(0.5, 0.0, 0.95)];
        let centre = compute_text_centre(&interior, &exterior);
        assert!(!centre.disjoint);
        assert!((centre.x - 0.5).abs() < 1e-3, "{centre:?}");
        assert!(centre.y.abs() < 1e-3, "{centre:?}");
    }

    #[test]
    fn failed_search_uses_arc_centroid() {
        let interior = [Circle::new(0.0, 0.0, 1.0), Circle::new(1.0, 0.0, 1.0)];
        for exterior in [vec![], vec![Circle::new(0.5, 0.0, 0.95)]] {
            let centre = text_centre(&interior, &exterior, &Astray);
            assert!(!centre.disjoint);
            assert!((centre.x - 0.5).abs() < 1e-9, "{centre:?}");
            assert!(centre.y.abs() < 1e-9, "{centre:?}");
        }
    }

    #[test]
    fn label_search_keeps_default_vertex_tolerance() {
        let options = LabelOptions::default().minimizer().options;
        assert_eq!(options.max_iterations, 500);
        assert_eq!(options.min_error_delta, 1e-10);
        assert_eq!(options.min_tolerance, NelderMeadOptions::default().min_tolerance);
    }

    #[test]
    fn containment_scan_finds_enclosing_circles() {
        let sol = solution(&[
            ("big", Circle::new(0.0, 0.0, 5.0)),
            ("small", Circle::new(1.0, 0.0, 1.0)),
            ("other", Circle::new(20.0, 0.0, 1.0)),
        ]);
        let containing = containing_circles(&sol);
        assert_eq!(containing["small"], vec!["big"]);
        assert!(containing["big"].is_empty());
        assert!(containing["other"].is_empty());
    }

    #[test]
    fn nested_region_ignores_its_container() {
        let sol = solution(&[
            ("big", Circle::new(0.0, 0.0, 5.0)),
            ("small", Circle::new(1.0, 0.0, 1.0)),
        ]);
        let regions = vec![
            Region::new(["big"], 25.0 * std::f64::consts::PI),
            Region::new(["small"], std::f64::consts::PI),
        ];
        let centres = compute_text_centres(&sol, &regions);
        let small = centres["small"];
        assert!(!small.disjoint);
        assert!(distance(Point::new(small.x, small.y), Point::new(1.0, 0.0)) < 1.0);

        let big = centres["big"];
        assert!(distance(Point::new(big.x, big.y), Point::new(1.0, 0.0)) > 1.0);
        assert!(distance(Point::new(big.x, big.y), Point::new(0.0, 0.0)) < 5.0);
    }

    #[test]
    fn regions_are_keyed_by_joined_sets() {
        let sol = solution(&[
            ("a", Circle::new(0.0, 0.0, 1.0)),
            ("b", Circle::new(1.2, 0.0, 1.0)),
        ]);
        let regions = vec![
            Region::new(["a"], 1.0),
            Region::new(["b"], 1.0),
            Region::new(["a", "b"], 0.3),
            Region::new(["a", "missing"], 0.3),
        ];
        let centres = compute_text_centres(&sol, &regions);
        assert_eq!(centres.len(), 4);
        let ab = centres["a,b"];
        assert!(!ab.disjoint);
        assert!(ab.x > 0.2 && ab.x < 1.0, "{ab:?}");
        let a = centres["a"];
        assert!(a.x < 0.2, "{a:?}");
        assert!(centres["a,missing"].disjoint);
    }
}
