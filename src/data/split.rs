//! Train/test splitting

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Number of held-out items for `n` items and a `test_size` fraction.
///
/// Rounds to the nearest count, then keeps at least one item on each side
/// whenever `n >= 2`.
pub fn test_count(n: usize, test_size: f32) -> usize {
    if n < 2 {
        return 0;
    }
    let raw = (n as f32 * test_size).round() as usize;
    raw.clamp(1, n - 1)
}

/// Shuffle with a seeded RNG, then split into (train, test)
pub fn train_test_split<T>(items: Vec<T>, test_size: f32, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut items = items;
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let n_test = test_count(items.len(), test_size);
    let test = items.split_off(items.len() - n_test);
    (items, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sizes() {
        let data: Vec<usize> = (0..188).collect();
        let (train, test) = train_test_split(data, 0.2, 42);

        assert_eq!(test.len(), 38);
        assert_eq!(train.len(), 150);

        let mut all: Vec<usize> = train.iter().chain(&test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..188).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_deterministic() {
        let a = train_test_split((0..50).collect::<Vec<_>>(), 0.3, 7);
        let b = train_test_split((0..50).collect::<Vec<_>>(), 0.3, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_small_inputs() {
        assert_eq!(test_count(0, 0.2), 0);
        assert_eq!(test_count(1, 0.5), 0);
        assert_eq!(test_count(2, 0.01), 1);
        assert_eq!(test_count(3, 0.99), 2);
    }
}
