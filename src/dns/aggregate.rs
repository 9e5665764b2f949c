//! Probe sample aggregation.
//!
//! Reduces the per-probe latency samples for one resolver into a single
//! estimate. The rule is deliberately conservative: with two samples it keeps
//! the larger one (under-reporting latency is worse than over-reporting), and
//! with three or more it takes the middle value so a single outlier probe
//! cannot drag the result.

/// Combine up to four probe samples into one latency estimate.
///
/// - 0 samples: `None`, no signal.
/// - 1 sample: that sample.
/// - 2 samples: the larger of the two.
/// - 3+ samples: sort ascending and take index `len / 2` (the middle value
///   for three samples, the upper-middle value for four).
#[must_use]
pub fn combine(samples: &[u32]) -> Option<u32> {
    match samples {
        [] => None,
        [only] => Some(*only),
        [a, b] => Some((*a).max(*b)),
        _ => {
            let mut sorted = samples.to_vec();
            sorted.sort_unstable();
            Some(sorted[sorted.len() / 2])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_none() {
        assert_eq!(combine(&[]), None);
    }

    #[test]
    fn test_single_sample_passes_through() {
        assert_eq!(combine(&[17]), Some(17));
        assert_eq!(combine(&[0]), Some(0));
    }

    #[test]
    fn test_two_samples_take_larger() {
        assert_eq!(combine(&[50, 40]), Some(50));
        assert_eq!(combine(&[40, 50]), Some(50));
        assert_eq!(combine(&[30, 30]), Some(30));
    }

    #[test]
    fn test_three_samples_take_middle() {
        assert_eq!(combine(&[30, 10, 70]), Some(30));
        assert_eq!(combine(&[1, 2, 3]), Some(2));
    }

    #[test]
    fn test_four_samples_take_upper_middle() {
        assert_eq!(combine(&[10, 20, 30, 40]), Some(30));
        assert_eq!(combine(&[40, 10, 30, 20]), Some(30));
    }

    #[test]
    fn test_outlier_resistance() {
        // One wildly slow probe must not dominate the estimate.
        assert_eq!(combine(&[20, 22, 5000]), Some(22));
        assert_eq!(combine(&[18, 20, 22, 5000]), Some(22));
    }
}
