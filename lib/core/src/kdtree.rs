//! Exact k-d tree
//!
//! One point per node, split on the axis of widest spread with the median
//! point as pivot. Search walks the tree with an explicit stack, near side
//! first, and only visits the far side while its splitting plane is no
//! farther than the current k-th best; equality still visits so that lower
//! row numbers can win ties.

use smallvec::SmallVec;
use std::cmp::Ordering;

use crate::index::{check_query, Neighbor, NeighborSearch, TopK};
use crate::{FeatureTable, FeatureVector, Result};

const NONE: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Node {
    row: usize,
    axis: usize,
    left: usize,
    right: usize,
}

#[derive(Debug, Clone)]
pub struct KdTreeIndex {
    dim: usize,
    vecs: Vec<f32>,
    nodes: Vec<Node>,
    root: usize,
}

impl KdTreeIndex {
    pub fn build(table: &FeatureTable) -> Self {
        let dim = table.dim();
        let mut vecs = Vec::with_capacity(table.len() * dim);
        for row in table {
            vecs.extend_from_slice(row.features.as_slice());
        }

        let mut tree = Self {
            dim,
            vecs,
            nodes: Vec::with_capacity(table.len()),
            root: NONE,
        };
        let mut rows: Vec<usize> = (0..table.len()).collect();
        tree.root = tree.build_node(&mut rows);
        tree
    }

    #[inline]
    fn point(&self, row: usize) -> &[f32] {
        let start = row * self.dim;
        &self.vecs[start..start + self.dim]
    }

    fn widest_axis(&self, rows: &[usize]) -> usize {
        let mut best_axis = 0;
        let mut best_spread = f32::NEG_INFINITY;
        for axis in 0..self.dim {
            let mut lo = f32::INFINITY;
            let mut hi = f32::NEG_INFINITY;
            for &row in rows {
                let v = self.point(row)[axis];
                lo = lo.min(v);
                hi = hi.max(v);
            }
            if hi - lo > best_spread {
                best_spread = hi - lo;
                best_axis = axis;
            }
        }
        best_axis
    }

    fn build_node(&mut self, rows: &mut [usize]) -> usize {
        if rows.is_empty() {
            return NONE;
        }

        let axis = self.widest_axis(rows);
        let mid = rows.len() / 2;
        {
            let vecs = &self.vecs;
            let dim = self.dim;
            rows.select_nth_unstable_by(mid, |&a, &b| {
                let va = vecs[a * dim + axis];
                let vb = vecs[b * dim + axis];
                va.partial_cmp(&vb).unwrap_or(Ordering::Equal).then(a.cmp(&b))
            });
        }

        let row = rows[mid];
        let id = self.nodes.len();
        self.nodes.push(Node {
            row,
            axis,
            left: NONE,
            right: NONE,
        });

        let (lower, upper) = rows.split_at_mut(mid);
        let left = self.build_node(lower);
        let right = self.build_node(&mut upper[1..]);
        self.nodes[id].left = left;
        self.nodes[id].right = right;
        id
    }

    fn search(&self, query: &[f32], top: &mut TopK) {
        // (node, lower bound on the squared distance to anything under it)
        let mut stack: SmallVec<[(usize, f32); 32]> = SmallVec::new();
        if self.root != NONE {
            stack.push((self.root, 0.0));
        }

        while let Some((node, plane)) = stack.pop() {
            if top.bound().is_some_and(|worst| plane > worst) {
                continue;
            }
            let n = self.nodes[node];
            let point = self.point(n.row);
            top.push(crate::simd::squared_l2_simd(query, point), n.row);

            let diff = query[n.axis] - point[n.axis];
            let (near, far) = if diff < 0.0 {
                (n.left, n.right)
            } else {
                (n.right, n.left)
            };

            // far goes below near so the near side is searched first
            if far != NONE {
                stack.push((far, plane.max(diff * diff)));
            }
            if near != NONE {
                stack.push((near, plane));
            }
        }
    }
}

impl NeighborSearch for KdTreeIndex {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn query(&self, query: &FeatureVector, k: usize) -> Result<Vec<Neighbor>> {
        check_query(self.dim, self.nodes.len(), query, k)?;
        let mut top = TopK::new(k);
        self.search(query.as_slice(), &mut top);
        Ok(top.into_neighbors())
    }
}
