use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::f64::consts::PI;

use crate::geometry::{Circle, SMALL, Point, circle_circle_intersection, circle_overlap};
use crate::ir::Region;
use crate::optimize::{BisectOptions, bisect};

use super::{IndexedRegion, indexed_loss, radius_for_size};

/// Center distance at which circles of radius `r1` and `r2` overlap by
/// `overlap`.
pub fn distance_from_intersect_area(r1: f64, r2: f64, overlap: f64) -> f64 {
    let smaller = r1.min(r2);
    if smaller * smaller * PI <= overlap + SMALL {
        return (r1 - r2).abs();
    }

    bisect(
        |d| circle_overlap(r1, r2, d) - overlap,
        (r1 - r2).abs(),
        r1 + r2,
        BisectOptions::default(),
    )
}

/// Appends a zero-size region for every pair of single sets that has no
/// pairwise region yet.
pub fn add_missing_areas(regions: &[Region]) -> Vec<Region> {
    let mut ret = regions.to_vec();
    let mut ids: BTreeSet<&str> = BTreeSet::new();
    let mut pairs: HashSet<(&str, &str)> = HashSet::new();
    for region in regions {
        match region.sets.as_slice() {
            [id] => {
                ids.insert(id.as_str());
            }
            [a, b] => {
                pairs.insert((a.as_str(), b.as_str()));
                pairs.insert((b.as_str(), a.as_str()));
            }
            _ => {}
        }
    }

    let ids: Vec<&str> = ids.into_iter().collect();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            if !pairs.contains(&(*a, *b)) {
                ret.push(Region::new([*a, *b], 0.0));
            }
        }
    }
    ret
}

#[derive(Debug, Clone, Copy)]
struct Overlap {
    set: usize,
    size: f64,
    weight: f64,
}

fn by_size_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Places circles one at a time, each at the candidate position that best
/// satisfies its pairwise overlaps with the circles already placed.
///
/// `sizes[i]` is the area of set `i`; `regions` must already include the
/// zero-size pairs from [`add_missing_areas`].
pub(crate) fn greedy_positions(sizes: &[f64], regions: &[IndexedRegion]) -> Vec<Circle> {
    let n = sizes.len();
    let mut circles: Vec<Circle> = sizes
        .iter()
        .map(|&size| Circle::new(0.0, 0.0, radius_for_size(size)))
        .collect();
    if n < 2 {
        return circles;
    }

    let mut set_overlaps: Vec<Vec<Overlap>> = vec![Vec::new(); n];
    for region in regions.iter().filter(|r| r.sets.len() == 2) {
        let (left, right) = (region.sets[0], region.sets[1]);
        // nested circles shouldn't drive the placement order
        let weight = if region.size + SMALL >= sizes[left].min(sizes[right]) {
            0.0
        } else {
            1.0
        };
        set_overlaps[left].push(Overlap {
            set: right,
            size: region.size,
            weight,
        });
        set_overlaps[right].push(Overlap {
            set: left,
            size: region.size,
            weight,
        });
    }

    let mut order: Vec<(usize, f64)> = set_overlaps
        .iter()
        .enumerate()
        .map(|(set, overlaps)| (set, overlaps.iter().map(|o| o.size * o.weight).sum()))
        .collect();
    order.sort_by(|a, b| by_size_desc(a.1, b.1));

    let mut positioned = vec![false; n];
    positioned[order[0].0] = true;

    for &(set, _) in &order[1..] {
        let mut overlap: Vec<Overlap> = set_overlaps[set]
            .iter()
            .filter(|o| positioned[o.set])
            .copied()
            .collect();
        overlap.sort_by(|a, b| by_size_desc(a.size, b.size));

        let radius = circles[set].radius;
        let mut points: Vec<Point> = Vec::new();
        for (j, first) in overlap.iter().enumerate() {
            let p1 = circles[first.set];
            let d1 = distance_from_intersect_area(radius, p1.radius, first.size);

            // axis-aligned samples read best for two and three sets
            points.push(Point::new(p1.x + d1, p1.y));
            points.push(Point::new(p1.x - d1, p1.y));
            points.push(Point::new(p1.x, p1.y + d1));
            points.push(Point::new(p1.x, p1.y - d1));

            for second in &overlap[j + 1..] {
                let p2 = circles[second.set];
                let d2 = distance_from_intersect_area(radius, p2.radius, second.size);
                points.extend(circle_circle_intersection(
                    &Circle::new(p1.x, p1.y, d1),
                    &Circle::new(p2.x, p2.y, d2),
                ));
            }
        }

        if points.is_empty() {
            log::debug!("no placed partner for set {set}, leaving it at the origin");
        }

        let mut best_loss = f64::INFINITY;
        let mut best_point = points.first().copied().unwrap_or_default();
        for point in &points {
            circles[set].x = point.x;
            circles[set].y = point.y;
            positioned[set] = true;
            let loss = indexed_loss(&circles, regions, Some(&positioned));
            if loss < best_loss {
                best_loss = loss;
                best_point = *point;
            }
        }

        circles[set].x = best_point.x;
        circles[set].y = best_point.y;
        positioned[set] = true;
    }

    circles
}

/// Greedy initial layout for `regions`, keyed by set id.
pub fn greedy_layout(regions: &[Region]) -> crate::ir::Solution {
    let regions = add_missing_areas(regions);
    let problem = super::Problem::new(&regions);
    let circles = greedy_positions(&problem.sizes, &problem.regions);
    problem.ids.into_iter().zip(circles).collect()
}
