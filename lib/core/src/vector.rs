use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A player-season's distances to each cluster centroid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FeatureVector {
    data: Vec<f32>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Compute L2 (Euclidean) distance
    #[inline]
    pub fn l2_distance(&self, other: &FeatureVector) -> f32 {
        crate::simd::l2_distance_simd(&self.data, &other.data)
    }

    /// Squared L2 distance, used for ranking without the square root
    #[inline]
    pub fn squared_l2_distance(&self, other: &FeatureVector) -> f32 {
        crate::simd::squared_l2_simd(&self.data, &other.data)
    }

    /// Check that every component is a finite, non-negative centroid distance.
    /// `row` is only used to locate the offending entry in the error.
    pub fn validate(&self, row: usize) -> Result<()> {
        if self.data.is_empty() {
            return Err(Error::malformed(row, "feature vector is empty"));
        }
        for (axis, value) in self.data.iter().enumerate() {
            if !value.is_finite() {
                return Err(Error::malformed(
                    row,
                    format!("feature {} is not a finite number", axis),
                ));
            }
            if *value < 0.0 {
                return Err(Error::malformed(
                    row,
                    format!("feature {} is negative ({})", axis, value),
                ));
            }
        }
        Ok(())
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

impl<const D: usize> From<[f32; D]> for FeatureVector {
    fn from(data: [f32; D]) -> Self {
        Self::from_slice(&data)
    }
}
