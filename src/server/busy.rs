// src/server/busy.rs

pub const BUSY_ITERATIONS: u32 = 1_000_000;
const BUSY_SEED: f64 = 0.0001;

/// Synthetic CPU load for the autoscaling demo: `n += sqrt(n)` repeated
/// `iterations` times from a fixed seed.
pub fn busy_work(iterations: u32) -> f64 {
    let mut n = BUSY_SEED;
    for _ in 0..iterations {
        n += std::hint::black_box(n).sqrt();
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_iterations_returns_seed() {
        assert_eq!(busy_work(0), BUSY_SEED);
    }

    #[test]
    fn first_iteration_adds_square_root() {
        assert_eq!(busy_work(1), BUSY_SEED + BUSY_SEED.sqrt());
    }

    #[test]
    fn full_run_is_deterministic() {
        let first = busy_work(BUSY_ITERATIONS);
        assert_eq!(first, busy_work(BUSY_ITERATIONS));
        assert!(first > busy_work(BUSY_ITERATIONS - 1));
    }
}
