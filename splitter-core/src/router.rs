//! Ordered range lookup from hash values to partitions.
use num_bigint::BigUint;
use thiserror::Error;

use crate::cutpoints::CutPointTable;

/// Simple range map with O(log n) lookups and O(n) insertions.
///
/// Every item owns the half-open range `(previous point, own point]`, the
/// first item owns everything up to and including its point:
///
/// ```text
/// points      -> [20, 50, 100]
/// items       -> [ a,  b,   c]
/// [0 - 20]    -> a
/// (20 - 50]   -> b
/// (50 - 100]  -> c
/// ```
///
/// ```
/// use data_splitter::router::PartitionRouter;
///
/// let mut router = PartitionRouter::new();
/// router.insert(50, 'b');
/// router.insert(20, 'a');
/// router.insert(100, 'c');
/// assert_eq!(router.lookup(&20), Some(&'a'));
/// assert_eq!(router.lookup(&21), Some(&'b'));
/// assert_eq!(router.lookup(&101), None);
/// ```
#[derive(Debug, Clone)]
pub struct PartitionRouter<K, V> {
    points: Vec<K>,
    items: Vec<V>,
}

impl<K, V> Default for PartitionRouter<K, V> {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            items: Vec::new(),
        }
    }
}

impl<K: PartialOrd, V> PartitionRouter<K, V> {
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item` owning the range ending at `point`.
    /// Items with an equal point keep their insertion order.
    pub fn insert(&mut self, point: K, item: V) {
        let index = self.points.partition_point(|p| *p <= point);
        self.points.insert(index, point);
        self.items.insert(index, item);
    }

    /// Item owning the range containing `value`, `None` if `value` lies
    /// above the last point
    pub fn lookup(&self, value: &K) -> Option<&V> {
        let index = self.points.partition_point(|p| p < value);
        self.items.get(index)
    }

    /// Highest point of the router
    pub fn last_point(&self) -> Option<&K> {
        self.points.last()
    }

    /// Number of ranges
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no range was inserted yet
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points and items in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.points.iter().zip(self.items.iter())
    }
}

impl PartitionRouter<BigUint, usize> {
    /// Route over the cut-points of `table`.
    /// Partitions with a weight of zero are left out and never chosen.
    pub fn from_table(table: &CutPointTable) -> Self {
        let mut router = Self::new();
        for (partition, point) in table.points().iter().enumerate() {
            if !table.is_degenerate(partition) {
                router.insert(point.bound().clone(), partition);
            }
        }
        router
    }

    /// Partition index for the hash `value`
    pub fn route(&self, value: &BigUint) -> Result<usize, RouterError> {
        self.lookup(value)
            .copied()
            .ok_or_else(|| RouterError::Overflow {
                value: value.clone(),
                last: self.last_point().cloned(),
            })
    }
}

/// Internal invariant violations of the router
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    /// The hash value is larger than the largest cut-point.
    /// This is a bug if the router was built for the same hash space.
    #[error("Hash value {value} lies above the last cut-point {last:?}")]
    Overflow {
        /// value which could not be routed
        value: BigUint,
        /// largest cut-point of the router, `None` if it has none
        last: Option<BigUint>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn big(value: u32) -> BigUint {
        BigUint::from(value)
    }

    fn router_for(
        weights: &[f64],
        max_value: u32,
    ) -> (CutPointTable, PartitionRouter<BigUint, usize>) {
        let table = CutPointTable::build(weights, &big(max_value)).unwrap();
        let router = PartitionRouter::from_table(&table);
        (table, router)
    }

    #[test]
    fn ranges_are_closed_at_the_top() {
        let mut router = PartitionRouter::new();
        router.insert(0.2, "a");
        router.insert(0.5, "b");
        router.insert(1.0, "c");
        assert_eq!(router.lookup(&0.0), Some(&"a"));
        assert_eq!(router.lookup(&0.1), Some(&"a"));
        assert_eq!(router.lookup(&0.2), Some(&"a"));
        assert_eq!(router.lookup(&0.3), Some(&"b"));
        assert_eq!(router.lookup(&1.0), Some(&"c"));
        assert_eq!(router.lookup(&1.1), None);
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let mut router = PartitionRouter::new();
        router.insert(big(100), 2usize);
        router.insert(big(20), 0);
        router.insert(big(50), 1);
        let points: Vec<&BigUint> = router.iter().map(|(p, _)| p).collect();
        assert_eq!(points, vec![&big(20), &big(50), &big(100)]);
        assert_eq!(router.route(&big(21)), Ok(1));
    }

    #[test]
    fn equal_points_keep_insertion_order() {
        let mut router = PartitionRouter::new();
        router.insert(big(10), 0usize);
        router.insert(big(10), 1);
        router.insert(big(20), 2);
        assert_eq!(router.route(&big(10)), Ok(0));
        assert_eq!(router.route(&big(11)), Ok(2));
    }

    /// a value exactly on a cut-point belongs to the range ending there
    #[test]
    fn boundary_tie_break() {
        let (_, router) = router_for(&[0.2, 0.3, 0.5], 1000);
        assert_eq!(router.route(&big(0)), Ok(0));
        assert_eq!(router.route(&big(200)), Ok(0));
        assert_eq!(router.route(&big(201)), Ok(1));
        assert_eq!(router.route(&big(500)), Ok(1));
        assert_eq!(router.route(&big(501)), Ok(2));
        assert_eq!(router.route(&big(1000)), Ok(2));
    }

    #[test]
    fn zero_weight_is_skipped() {
        let (_, router) = router_for(&[0.0, 1.0, 0.0, 1.0], 100);
        assert_eq!(router.len(), 2);
        assert_eq!(router.route(&big(0)), Ok(1));
        assert_eq!(router.route(&big(50)), Ok(1));
        assert_eq!(router.route(&big(51)), Ok(3));
    }

    /// the top of the space goes to the last live partition
    #[test]
    fn trailing_zero_weight_keeps_max_routable() {
        let (_, router) = router_for(&[0.59, 0.88, 0.85, 0.0], 255);
        assert_eq!(router.route(&big(254)), Ok(2));
        assert_eq!(router.route(&big(255)), Ok(2));

        let (_, router) = router_for(&[0.472, 0.38, 0.21, 0.0, 0.0], u32::MAX);
        assert_eq!(router.route(&big(u32::MAX)), Ok(2));
    }

    #[test]
    fn overflow() {
        let (_, router) = router_for(&[1.0, 1.0], 255);
        assert_eq!(
            router.route(&big(256)),
            Err(RouterError::Overflow {
                value: big(256),
                last: Some(big(255))
            })
        );
        let empty: PartitionRouter<BigUint, usize> = PartitionRouter::new();
        assert_eq!(
            empty.route(&big(0)),
            Err(RouterError::Overflow {
                value: big(0),
                last: None
            })
        );
    }

    proptest! {
    /// every value of the space lands in the interval enclosing it
    #[test]
    fn routes_into_enclosing_interval(
        weights in prop::collection::vec(0.0f64..10.0, 2..12),
        value in any::<u32>(),
    ) {
        prop_assume!(weights.iter().sum::<f64>() > 0.0);
        let (table, router) = router_for(&weights, u32::MAX);
        let value = big(value);

        let partition = router.route(&value).unwrap();
        prop_assert!(!table.is_degenerate(partition));
        let bounds: Vec<&BigUint> = table.points().iter().map(|p| p.bound()).collect();
        prop_assert!(&value <= bounds[partition]);
        // no earlier live partition could have taken it
        for earlier in 0..partition {
            if !table.is_degenerate(earlier) {
                prop_assert!(bounds[earlier] < &value);
            }
        }
    }

    /// with exact zeros among the weights the whole one byte space,
    /// including its maximum, is routed to live partitions
    #[test]
    fn zero_weights_cover_whole_space(
        weights in prop::collection::vec(prop_oneof![Just(0.0), 0.0f64..10.0], 2..12),
    ) {
        prop_assume!(weights.iter().sum::<f64>() > 0.0);
        let (table, router) = router_for(&weights, 255);
        for value in 0..=255u32 {
            let routed = router.route(&big(value));
            prop_assert!(routed.is_ok(), "{} not routed: {:?}", value, routed);
            let partition = routed.unwrap();
            prop_assert!(!table.is_degenerate(partition));
        }
    }
    }
}
