use crate::index::{check_query, Neighbor, NeighborSearch, TopK};
use crate::{FeatureTable, FeatureVector, Result};

/// Exact, row-major linear index
#[derive(Debug, Clone)]
pub struct LinearIndex {
    dim: usize,
    rows: usize,
    vecs: Vec<f32>, // concatenated rows of length `dim`
}

impl LinearIndex {
    pub fn build(table: &FeatureTable) -> Self {
        let dim = table.dim();
        let mut vecs = Vec::with_capacity(table.len() * dim);
        for row in table {
            vecs.extend_from_slice(row.features.as_slice());
        }
        Self {
            dim,
            rows: table.len(),
            vecs,
        }
    }

    #[inline]
    fn row(&self, i: usize) -> &[f32] {
        let start = i * self.dim;
        &self.vecs[start..start + self.dim]
    }
}

impl NeighborSearch for LinearIndex {
    fn len(&self) -> usize {
        self.rows
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn query(&self, query: &FeatureVector, k: usize) -> Result<Vec<Neighbor>> {
        check_query(self.dim, self.rows, query, k)?;
        let q = query.as_slice();
        let mut top = TopK::new(k);
        for i in 0..self.rows {
            top.push(crate::simd::squared_l2_simd(q, self.row(i)), i);
        }
        Ok(top.into_neighbors())
    }
}
