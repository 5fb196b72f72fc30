//! Connected component labeling with 8-connectivity
//!
//! Output labels are compacted: background is 0 and components are numbered
//! 1..=k in the order their first pixel appears in a row-major scan.

use crate::config::LabelingMethod;
use crate::models::{GrayGrid, LabelGrid};
use std::collections::HashMap;

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Labels every foreground component of a binary grid
pub struct ComponentLabeler;

impl ComponentLabeler {
    /// Label the non-zero pixels of `binary`, returning the label grid and the component count
    pub fn label(binary: &GrayGrid, method: LabelingMethod) -> (LabelGrid, usize) {
        let mut labels = match method {
            LabelingMethod::Sweep => Self::label_sweep(binary),
            LabelingMethod::UnionFind => Self::label_union_find(binary),
        };
        let count = compact_labels(&mut labels);
        log::debug!("labeled {} components ({:?})", count, method);
        (labels, count)
    }

    /// Give every foreground pixel its own index, then propagate minimum labels
    /// with alternating top-down and bottom-up sweeps until nothing changes
    fn label_sweep(binary: &GrayGrid) -> LabelGrid {
        let mut next = 0u32;
        let mut labels = binary.map(|v| {
            if v > 0 {
                next += 1;
                next
            } else {
                0
            }
        });

        let mut iterations = 0usize;
        loop {
            // both sweeps always run
            let down = Self::sweep(&mut labels, false);
            let up = Self::sweep(&mut labels, true);
            iterations += 1;
            if !(down || up) {
                break;
            }
        }
        log::trace!("sweep labeling converged after {} iterations", iterations);

        labels
    }

    /// One pass replacing each label with the smallest non-zero label in its 3x3 neighbourhood
    fn sweep(labels: &mut LabelGrid, reverse: bool) -> bool {
        let (width, height) = labels.dimensions();
        let mut changed = false;

        let mut visit = |x: usize, y: usize| {
            let current = labels[(x, y)];
            if current == 0 {
                return;
            }
            let mut min = current;
            for (dx, dy) in NEIGHBOURS {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let n = labels[(nx as usize, ny as usize)];
                if n != 0 && n < min {
                    min = n;
                }
            }
            if min != current {
                labels[(x, y)] = min;
                changed = true;
            }
        };

        if reverse {
            for y in (0..height).rev() {
                for x in (0..width).rev() {
                    visit(x, y);
                }
            }
        } else {
            for y in 0..height {
                for x in 0..width {
                    visit(x, y);
                }
            }
        }

        changed
    }

    /// Two-pass labeling: provisional labels from the already visited neighbours,
    /// equivalences merged with union-find, then resolved to their roots
    fn label_union_find(binary: &GrayGrid) -> LabelGrid {
        let (width, height) = binary.dimensions();
        let mut labels = LabelGrid::new(width, height);
        let mut uf = UnionFind::new(1);
        let mut next_label = 1u32;

        // First pass: label components
        for y in 0..height {
            for x in 0..width {
                if binary[(x, y)] == 0 {
                    continue;
                }

                let mut neighbor_labels = [0u32; 4];
                let mut found = 0;
                // left, upper-left, up, upper-right
                for (dx, dy) in [(-1isize, 0isize), (-1, -1), (0, -1), (1, -1)] {
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx < 0 || ny < 0 || nx >= width as isize {
                        continue;
                    }
                    let l = labels[(nx as usize, ny as usize)];
                    if l != 0 {
                        neighbor_labels[found] = l;
                        found += 1;
                    }
                }

                let neighbors = &neighbor_labels[..found];
                match neighbors.iter().min() {
                    None => {
                        labels[(x, y)] = next_label;
                        uf.push();
                        next_label += 1;
                    }
                    Some(&min_label) => {
                        labels[(x, y)] = min_label;
                        for &l in neighbors {
                            if l != min_label {
                                uf.union(min_label, l);
                            }
                        }
                    }
                }
            }
        }

        // Second pass: resolve equivalences
        for label in labels.as_mut_slice() {
            if *label != 0 {
                *label = uf.find(*label);
            }
        }

        labels
    }
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
        }
    }

    fn push(&mut self) {
        let id = self.parent.len() as u32;
        self.parent.push(id);
    }

    fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        // path compression
        let mut cur = x;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x != root_y {
            // keep the smaller label as root
            let (lo, hi) = if root_x < root_y {
                (root_x, root_y)
            } else {
                (root_y, root_x)
            };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Remap labels to `0..=k` in order of first appearance, returns `k`
pub fn compact_labels(labels: &mut LabelGrid) -> usize {
    let mut remap: HashMap<u32, u32> = HashMap::new();
    remap.insert(0, 0);
    for label in labels.as_mut_slice() {
        let next = remap.len() as u32;
        *label = *remap.entry(*label).or_insert(next);
    }
    remap.len() - 1
}
