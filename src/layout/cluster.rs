use std::collections::HashMap;

use crate::geometry::{Circle, SMALL, distance};
use crate::ir::Region;

/// Disjoint-set forest over `0..n`.
#[derive(Debug, Clone)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    pub(crate) fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra] = rb;
        }
    }

    /// Members grouped by root, groups ordered by their first member.
    pub(crate) fn groups(&mut self) -> Vec<Vec<usize>> {
        let mut slot: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in 0..self.parent.len() {
            let root = self.find(i);
            let idx = *slot.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[idx].push(i);
        }
        groups
    }
}

/// Groups circle indices into clusters of transitively overlapping circles.
pub fn disjoint_cluster(circles: &[Circle]) -> Vec<Vec<usize>> {
    let mut uf = UnionFind::new(circles.len());
    for i in 0..circles.len() {
        for j in (i + 1)..circles.len() {
            let max_distance = circles[i].radius + circles[j].radius;
            if distance(circles[i].center(), circles[j].center()) + SMALL < max_distance {
                uf.union(j, i);
            }
        }
    }
    uf.groups()
}

/// Groups `ids` by the overlaps requested in `regions`: two sets share a
/// cluster when some multi-set region naming both has a nonzero size.
pub(crate) fn region_clusters(ids: &[String], regions: &[Region]) -> Vec<Vec<usize>> {
    let index: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();
    let mut uf = UnionFind::new(ids.len());
    for region in regions {
        if region.sets.len() < 2 || region.size <= 0.0 {
            continue;
        }
        let members: Vec<usize> = region
            .sets
            .iter()
            .filter_map(|set| index.get(set.as_str()).copied())
            .collect();
        for pair in members.windows(2) {
            uf.union(pair[0], pair[1]);
        }
    }
    uf.groups()
}
