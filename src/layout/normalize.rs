use std::cmp::Ordering;

use crate::geometry::{Circle, distance};
use crate::ir::Solution;

use super::disjoint_cluster;

type NamedCircle = (String, Circle);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    fn of<'a>(circles: impl IntoIterator<Item = &'a Circle>) -> Self {
        let mut bounds = Bounds {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        };
        for c in circles {
            bounds.x_min = bounds.x_min.min(c.x - c.radius);
            bounds.x_max = bounds.x_max.max(c.x + c.radius);
            bounds.y_min = bounds.y_min.min(c.y - c.radius);
            bounds.y_max = bounds.y_max.max(c.y + c.radius);
        }
        bounds
    }

    fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Rotates and mirrors one cluster into a canonical frame: the largest
/// circle at the origin, the second largest at angle `orientation`.
fn orientate_circles(circles: &mut [NamedCircle], orientation: f64) {
    circles.sort_by(|a, b| b.1.radius.partial_cmp(&a.1.radius).unwrap_or(Ordering::Equal));

    let Some((_, largest)) = circles.first().cloned() else {
        return;
    };
    for (_, c) in circles.iter_mut() {
        c.x -= largest.x;
        c.y -= largest.y;
    }

    if circles.len() == 2 {
        // a nested second circle sits against the rim instead of wherever
        // the optimizer left it
        let (first, second) = (circles[0].1, circles[1].1);
        if distance(first.center(), second.center()) < (second.radius - first.radius).abs() {
            circles[1].1.x = first.x + first.radius - second.radius - 1e-10;
            circles[1].1.y = first.y;
        }
    }

    if circles.len() > 1 {
        let second = circles[1].1;
        let rotation = second.x.atan2(second.y) - orientation;
        let (s, c) = rotation.sin_cos();
        for (_, circle) in circles.iter_mut() {
            let (x, y) = (circle.x, circle.y);
            circle.x = c * x - s * y;
            circle.y = s * x + c * y;
        }
    }

    // mirror when the third circle lands on the far side of the line
    // through the first two
    if circles.len() > 2 {
        let third = circles[2].1;
        let mut angle = third.x.atan2(third.y) - orientation;
        while angle < 0.0 {
            angle += 2.0 * std::f64::consts::PI;
        }
        while angle > 2.0 * std::f64::consts::PI {
            angle -= 2.0 * std::f64::consts::PI;
        }
        if angle > std::f64::consts::PI {
            let second = circles[1].1;
            let slope = second.y / (1e-10 + second.x);
            for (_, circle) in circles.iter_mut() {
                let d = (circle.x + slope * circle.y) / (1.0 + slope * slope);
                circle.x = 2.0 * d - circle.x;
                circle.y = 2.0 * d * slope - circle.y;
            }
        }
    }
}

/// Packs clusters into one plane, largest first, the rest laid out in
/// rows of three around it so no two clusters overlap.
pub(crate) fn pack_clusters(clusters: Vec<Vec<NamedCircle>>) -> Vec<NamedCircle> {
    let mut sized: Vec<(Vec<NamedCircle>, Bounds)> = clusters
        .into_iter()
        .filter(|cluster| !cluster.is_empty())
        .map(|cluster| {
            let bounds = Bounds::of(cluster.iter().map(|(_, c)| c));
            (cluster, bounds)
        })
        .collect();
    sized.sort_by(|a, b| {
        let area_a = a.1.width() * a.1.height();
        let area_b = b.1.width() * b.1.height();
        area_b.partial_cmp(&area_a).unwrap_or(Ordering::Equal)
    });

    let mut remaining = sized.into_iter();
    let Some((mut circles, mut placed)) = remaining.next() else {
        return Vec::new();
    };
    let spacing = placed.width() / 50.0;

    let add_cluster = |circles: &mut Vec<NamedCircle>,
                           placed: &Bounds,
                           (cluster, bounds): (Vec<NamedCircle>, Bounds),
                           right: bool,
                           bottom: bool| {
        let x_offset = if right {
            placed.x_max - bounds.x_min + spacing
        } else {
            let centering = bounds.width() / 2.0 - placed.width() / 2.0;
            placed.x_max - bounds.x_max + centering.min(0.0)
        };
        let y_offset = if bottom {
            placed.y_max - bounds.y_min + spacing
        } else {
            let centering = bounds.height() / 2.0 - placed.height() / 2.0;
            placed.y_max - bounds.y_max + centering.min(0.0)
        };
        for (id, mut circle) in cluster {
            circle.x += x_offset;
            circle.y += y_offset;
            circles.push((id, circle));
        }
    };

    loop {
        let mut added = false;
        for (right, bottom) in [(true, false), (false, true), (true, true)] {
            if let Some(next) = remaining.next() {
                add_cluster(&mut circles, &placed, next, right, bottom);
                added = true;
            }
        }
        if !added {
            break;
        }
        placed = Bounds::of(circles.iter().map(|(_, c)| c));
    }

    circles
}

/// Removes the arbitrary rotation and translation left by the optimizer so
/// equivalent inputs come out looking the same.
pub fn normalize_solution(solution: &Solution, orientation: f64) -> Solution {
    let named: Vec<NamedCircle> = solution.iter().map(|(id, c)| (id.clone(), *c)).collect();
    let circles: Vec<Circle> = named.iter().map(|(_, c)| *c).collect();

    let clusters: Vec<Vec<NamedCircle>> = disjoint_cluster(&circles)
        .into_iter()
        .map(|members| {
            let mut cluster: Vec<NamedCircle> =
                members.into_iter().map(|i| named[i].clone()).collect();
            orientate_circles(&mut cluster, orientation);
            cluster
        })
        .collect();

    let packed = pack_clusters(clusters);
    if packed.is_empty() {
        return Solution::new();
    }
    let n = packed.len() as f64;
    let cx = packed.iter().map(|(_, c)| c.x).sum::<f64>() / n;
    let cy = packed.iter().map(|(_, c)| c.y).sum::<f64>() / n;
    packed
        .into_iter()
        .map(|(id, c)| (id, Circle::new(c.x - cx, c.y - cy, c.radius)))
        .collect()
}

/// Uniformly scales and centers `solution` inside a `width` x `height` box
/// inset by `padding` on every side.
pub fn scale_solution(solution: &Solution, width: f64, height: f64, padding: f64) -> Solution {
    let width = width - 2.0 * padding;
    let height = height - 2.0 * padding;
    let bounds = Bounds::of(solution.values());

    if solution.is_empty() || bounds.width() == 0.0 || bounds.height() == 0.0 {
        log::warn!("not scaling solution: zero size detected");
        return solution.clone();
    }

    let scaling = (width / bounds.width()).min(height / bounds.height());
    let x_offset = (width - bounds.width() * scaling) / 2.0;
    let y_offset = (height - bounds.height() * scaling) / 2.0;

    solution
        .iter()
        .map(|(id, c)| {
            (
                id.clone(),
                Circle::new(
                    padding + x_offset + (c.x - bounds.x_min) * scaling,
                    padding + y_offset + (c.y - bounds.y_min) * scaling,
                    scaling * c.radius,
                ),
            )
        })
        .collect()
}
