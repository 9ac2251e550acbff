//! Second-order Difference Histogram PRI estimator.
//!
//! Unlike CDIF, each rank gets a fresh histogram and a rank-adaptive,
//! per-bin exponential threshold. At rank 1, more than one above-threshold
//! bin signals ambiguity between interleaved sources and the estimator
//! advances to higher ranks instead of guessing.

use crate::histogram::{bin_center, bin_index, num_bins};

pub struct SDIF {
    x: f64,
    k: f64,
}

impl SDIF {
    /// `x` and `k` are both intended in `(0, 1)`; out-of-range values are
    /// logged and used as-is.
    pub fn new(x: f64, k: f64) -> Self {
        if !(0.0..=1.0).contains(&x) {
            log::warn!("`x` should be between (0, 1), but got {x}");
        }
        if !(0.0..=1.0).contains(&k) {
            log::warn!("`k` should be between (0, 1), but got {k}");
        }
        SDIF { x, k }
    }

    pub fn run(&self, toas: &[f64], max_rank: u32, bin_width: f64) -> Option<f64> {
        if toas.len() < 2 {
            return None;
        }

        let duration = toas[toas.len() - 1] - toas[0];
        let bin_num = num_bins(duration, bin_width);

        for rank in 1..=max_rank as usize {
            log::debug!("rank {rank}");
            let mut hist = vec![0u64; bin_num];
            let n_minus_rank = toas.len().saturating_sub(rank);
            for j in 0..n_minus_rank {
                let dtoa = toas[j + rank] - toas[j];
                let idx = bin_index(dtoa, 0.0, bin_width);
                if idx < bin_num {
                    hist[idx] += 1;
                }
            }

            let mut candidates = Vec::new();
            for i in 0..bin_num {
                let center = bin_center(i, 0.0, bin_width);
                let tau = self.x * n_minus_rank as f64
                    * (-center / (self.k * bin_num as f64)).exp();
                log::debug!("for pri {center}: threshold is {tau}, stat value is {}", hist[i]);
                if hist[i] as f64 > tau {
                    candidates.push(center);
                }
            }

            if candidates.is_empty() || (rank == 1 && candidates.len() > 1) {
                continue;
            }
            return Some(candidates[0]);
        }
        None
    }
}
