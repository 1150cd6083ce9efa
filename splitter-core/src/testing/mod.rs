use rand::{rngs::StdRng, Rng, SeedableRng};

mod vec_sink;

pub use vec_sink::{FailingSink, VecSink};

/// One fresh [VecSink] per partition
pub fn vec_sinks(partitions: usize) -> Vec<VecSink> {
    (0..partitions).map(|_| VecSink::new()).collect()
}

/// `count` distinct, newline terminated, tab separated records.
/// The same seed always gives the same input
pub fn random_input(seed: u64, count: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::new();
    for i in 0..count {
        let value: u64 = rng.gen();
        let score: f32 = rng.gen();
        out.extend_from_slice(format!("{i}\t{value:x}\t{score}\n").as_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::PartitionSink;

    #[test]
    fn test_vec_collector() {
        let col = VecSink::new();
        let mut col_a = col.clone();

        for i in 0..5u8 {
            col_a.write_record(&[i]).unwrap();
        }
        col_a.close().unwrap();

        // the original one should see these values
        assert_eq!(col.records(), (0..5u8).map(|i| vec![i]).collect::<Vec<_>>());
        assert_eq!(col.closed(), 1);
    }

    #[test]
    fn random_input_is_reproducible() {
        assert_eq!(random_input(1, 50), random_input(1, 50));
        assert_ne!(random_input(1, 50), random_input(2, 50));
        let lines = random_input(3, 10);
        assert_eq!(lines.iter().filter(|b| **b == b'\n').count(), 10);
    }
}
