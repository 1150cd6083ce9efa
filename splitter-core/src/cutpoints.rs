//! Conversion of relative weights into cut-points over the hash space.
use num_bigint::BigUint;
use num_traits::{FromPrimitive, ToPrimitive};

use crate::config::ConfigError;

/// Inclusive upper end of a partition's interval in hash space
#[derive(Debug, Clone, PartialEq)]
pub struct CutPoint {
    value: f64,
    bound: BigUint,
}

impl CutPoint {
    fn new(value: f64, max_value: &BigUint) -> Self {
        // floor() clamped to the space, values past f64 range saturate at max
        let bound = BigUint::from_f64(value.floor())
            .filter(|bound| bound <= max_value)
            .unwrap_or_else(|| max_value.clone());
        Self { value, bound }
    }

    fn pinned(max_value: &BigUint) -> Self {
        Self {
            value: max_value.to_f64().unwrap_or(f64::INFINITY),
            bound: max_value.clone(),
        }
    }

    /// The scaled cumulative weight
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Largest integer hash value at or below this cut-point
    pub fn bound(&self) -> &BigUint {
        &self.bound
    }
}

/// Cumulative cut-points, one per weight, in weight order.
///
/// With weights `[0.2, 0.3, 0.5]` and a space of `0..=M` the cut-points are
/// `[0.2M, 0.5M, M]`, meaning partition 0 owns `[0, 0.2M]`, partition 1 owns
/// `(0.2M, 0.5M]` and partition 2 owns `(0.5M, M]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CutPointTable {
    weights: Vec<f64>,
    points: Vec<CutPoint>,
    max_value: BigUint,
}

impl CutPointTable {
    /// Scale the running sum of `weights` onto `0..=max_value`.
    ///
    /// A weight of zero yields a cut-point equal to its predecessor and
    /// thereby an empty partition. The cut-point of the last partition with
    /// a non-zero weight, and every one after it, is pinned to `max_value`,
    /// so the top of the space is always owned by a live partition.
    pub fn build(weights: &[f64], max_value: &BigUint) -> Result<Self, ConfigError> {
        if weights.len() < 2 {
            return Err(ConfigError::TooFewWeights(weights.len()));
        }
        if let Some((index, weight)) = weights
            .iter()
            .copied()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || *w < 0.0)
        {
            return Err(ConfigError::InvalidWeight { index, weight });
        }
        let total: f64 = weights.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(ConfigError::NonPositiveWeightSum(total));
        }

        // the sum is positive, so some weight is too
        let last_live = weights.iter().rposition(|w| *w > 0.0).unwrap_or(0);
        let max = max_value.to_f64().unwrap_or(f64::INFINITY);
        let points: Vec<CutPoint> = weights
            .iter()
            .scan(0.0, |cumulative, w| {
                *cumulative += w;
                Some(*cumulative)
            })
            .enumerate()
            .map(|(index, cumulative)| {
                if index >= last_live {
                    CutPoint::pinned(max_value)
                } else {
                    CutPoint::new(max * cumulative / total, max_value)
                }
            })
            .collect();

        Ok(Self {
            weights: weights.to_vec(),
            points,
            max_value: max_value.clone(),
        })
    }

    /// Cut-points in partition order
    pub fn points(&self) -> &[CutPoint] {
        &self.points
    }

    /// The weights this table was built from
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Largest value of the hash space
    pub fn max_value(&self) -> &BigUint {
        &self.max_value
    }

    /// Number of partitions
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true for a successfully built table
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True if partition `index` has a weight of zero and can never be chosen
    pub fn is_degenerate(&self, index: usize) -> bool {
        self.weights.get(index).is_some_and(|w| *w == 0.0)
    }
}
