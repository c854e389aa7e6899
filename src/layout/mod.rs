//! Turns desired region sizes into one circle per set.
//!
//! Sets are first split into clusters that request no overlap with each
//! other. Each cluster gets a greedy seed layout which the minimizer then
//! refines; the refined clusters are packed side by side.

mod cluster;
mod greedy;
mod label_placement;
mod normalize;
pub mod path;

pub use cluster::disjoint_cluster;
pub use greedy::{add_missing_areas, distance_from_intersect_area, greedy_layout};
pub use label_placement::{
    LabelOptions, compute_text_centre, compute_text_centres, compute_text_centres_with,
};
pub use normalize::{normalize_solution, scale_solution};

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::config::LayoutConfig;
use crate::geometry::{Circle, circle_overlap, distance, intersection_area};
use crate::ir::{Region, Solution};
use crate::optimize::{Minimizer, NelderMead, NelderMeadOptions};

use cluster::region_clusters;
use greedy::greedy_positions;
use normalize::pack_clusters;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub max_iterations: usize,
    pub min_error_delta: f64,
    pub min_tolerance: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            min_error_delta: 1e-6,
            min_tolerance: 1e-5,
        }
    }
}

impl From<&LayoutConfig> for LayoutOptions {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            min_error_delta: config.min_error_delta,
            min_tolerance: config.min_tolerance,
        }
    }
}

impl LayoutOptions {
    pub fn minimizer(&self) -> NelderMead {
        NelderMead::new(NelderMeadOptions {
            max_iterations: self.max_iterations,
            min_error_delta: self.min_error_delta,
            min_tolerance: self.min_tolerance,
            ..NelderMeadOptions::default()
        })
    }
}

/// A region with its sets resolved to indices into a [`Problem`].
#[derive(Debug, Clone)]
pub(crate) struct IndexedRegion {
    pub(crate) sets: Vec<usize>,
    pub(crate) size: f64,
}

/// Set ids, their areas and the regions that mention only known sets.
#[derive(Debug, Clone)]
pub(crate) struct Problem {
    pub(crate) ids: Vec<String>,
    pub(crate) sizes: Vec<f64>,
    pub(crate) regions: Vec<IndexedRegion>,
}

impl Problem {
    pub(crate) fn new(regions: &[Region]) -> Self {
        let mut ids = Vec::new();
        let mut sizes = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for region in regions.iter().filter(|r| r.is_single()) {
            let id = region.sets[0].as_str();
            if index.contains_key(id) {
                log::warn!("set '{id}' is sized more than once, keeping the first");
                continue;
            }
            index.insert(id, ids.len());
            ids.push(id.to_string());
            sizes.push(region.size);
        }

        let mut indexed = Vec::new();
        for region in regions.iter().filter(|r| r.sets.len() > 1) {
            let sets: Option<Vec<usize>> = region
                .sets
                .iter()
                .map(|set| index.get(set.as_str()).copied())
                .collect();
            match sets {
                Some(sets) => indexed.push(IndexedRegion {
                    sets,
                    size: region.size,
                }),
                None => log::warn!(
                    "dropping region {:?}: not every set has its own size",
                    region.sets
                ),
            }
        }

        Self {
            ids,
            sizes,
            regions: indexed,
        }
    }

    /// Restricts the problem to `members`, renumbering sets in that order.
    fn subset(&self, members: &[usize]) -> Problem {
        let local: HashMap<usize, usize> = members
            .iter()
            .enumerate()
            .map(|(local, &global)| (global, local))
            .collect();
        let regions = self
            .regions
            .iter()
            .filter_map(|region| {
                let sets: Option<Vec<usize>> =
                    region.sets.iter().map(|s| local.get(s).copied()).collect();
                sets.map(|sets| IndexedRegion {
                    sets,
                    size: region.size,
                })
            })
            .collect();
        Problem {
            ids: members.iter().map(|&i| self.ids[i].clone()).collect(),
            sizes: members.iter().map(|&i| self.sizes[i]).collect(),
            regions,
        }
    }

    /// Adds a zero-size region for every pair of sets without one.
    fn with_missing_pairs(mut self) -> Self {
        let n = self.ids.len();
        let mut seen = vec![vec![false; n]; n];
        for region in self.regions.iter().filter(|r| r.sets.len() == 2) {
            let (a, b) = (region.sets[0], region.sets[1]);
            seen[a][b] = true;
            seen[b][a] = true;
        }
        for a in 0..n {
            for b in (a + 1)..n {
                if !seen[a][b] {
                    self.regions.push(IndexedRegion {
                        sets: vec![a, b],
                        size: 0.0,
                    });
                }
            }
        }
        self
    }
}

/// Squared area residuals over the multi-set regions. With `positioned`,
/// regions touching an unplaced circle are skipped.
pub(crate) fn indexed_loss(
    circles: &[Circle],
    regions: &[IndexedRegion],
    positioned: Option<&[bool]>,
) -> f64 {
    let mut output = 0.0;
    for region in regions {
        if positioned.is_some_and(|placed| !region.sets.iter().all(|&s| placed[s])) {
            continue;
        }
        let realized = match region.sets.as_slice() {
            [_] => continue,
            [a, b] => {
                let (left, right) = (circles[*a], circles[*b]);
                circle_overlap(left.radius, right.radius, distance(left.center(), right.center()))
            }
            sets => {
                let group: Vec<Circle> = sets.iter().map(|&s| circles[s]).collect();
                intersection_area(&group).area
            }
        };
        output += (realized - region.size) * (realized - region.size);
    }
    output
}

/// Sum of squared differences between requested and realized region areas.
///
/// Single-set regions compare against the circle's own area; regions that
/// name a set missing from `solution` are skipped.
pub fn loss_function(solution: &Solution, regions: &[Region]) -> f64 {
    let mut output = 0.0;
    for region in regions {
        let circles: Option<Vec<Circle>> = region
            .sets
            .iter()
            .map(|set| solution.get(set).copied())
            .collect();
        let Some(circles) = circles else {
            continue;
        };
        let realized = match circles.as_slice() {
            [] => continue,
            [single] => single.area(),
            [left, right] => {
                circle_overlap(left.radius, right.radius, distance(left.center(), right.center()))
            }
            group => intersection_area(group).area,
        };
        output += (realized - region.size) * (realized - region.size);
    }
    output
}

/// Lays out one circle per set so that overlap areas approximate `regions`.
pub fn compute_layout(regions: &[Region]) -> Solution {
    let options = LayoutOptions::default();
    compute_layout_with(regions, &options.minimizer())
}

/// [`compute_layout`] with a caller-supplied minimizer for the refinement
/// step.
pub fn compute_layout_with<M: Minimizer>(regions: &[Region], minimizer: &M) -> Solution {
    let usable: Vec<Region> = regions
        .iter()
        .filter(|r| !r.sets.is_empty() && r.size.is_finite() && r.size >= 0.0)
        .cloned()
        .collect();
    if usable.len() < regions.len() {
        log::debug!(
            "ignoring {} empty or unsized regions",
            regions.len() - usable.len()
        );
    }

    let problem = Problem::new(&usable);
    let clusters = region_clusters(&problem.ids, &usable);

    let mut laid_out: Vec<Vec<(String, Circle)>> = Vec::with_capacity(clusters.len());
    for members in &clusters {
        let cluster = problem.subset(members).with_missing_pairs();
        let seed = greedy_positions(&cluster.sizes, &cluster.regions);
        let circles = refine(&seed, &cluster.regions, minimizer);
        laid_out.push(cluster.ids.into_iter().zip(circles).collect());
    }

    pack_clusters(laid_out).into_iter().collect()
}

/// Moves circle centers to minimize [`indexed_loss`]; radii stay fixed.
fn refine<M: Minimizer>(seed: &[Circle], regions: &[IndexedRegion], minimizer: &M) -> Vec<Circle> {
    if seed.len() < 2 {
        return seed.to_vec();
    }

    let initial: Vec<f64> = seed.iter().flat_map(|c| [c.x, c.y]).collect();
    let mut current = seed.to_vec();
    let result = minimizer.minimize(
        |values| {
            for (circle, xy) in current.iter_mut().zip(values.chunks_exact(2)) {
                circle.x = xy[0];
                circle.y = xy[1];
            }
            indexed_loss(&current, regions, None)
        },
        &initial,
    );

    let seed_loss = indexed_loss(seed, regions, None);
    if result.fx > seed_loss {
        return seed.to_vec();
    }
    seed.iter()
        .zip(result.x.chunks_exact(2))
        .map(|(circle, xy)| Circle::new(xy[0], xy[1], circle.radius))
        .collect()
}

/// Radius of a circle whose area is `size`.
pub fn radius_for_size(size: f64) -> f64 {
    (size / PI).sqrt()
}
