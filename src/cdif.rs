//! Cumulative Difference Histogram PRI estimator.
//!
//! Accumulates rank-r differences into a histogram whose accumulator is
//! pre-loaded with a negative threshold, so a positive bin value means
//! "above threshold". A bin only qualifies if its own subharmonic check
//! (`2i`, `2i+1`) also fires, which guards against locking onto a harmonic
//! of the true PRI.

use crate::histogram::{bin_center, bin_index, num_bins};

pub struct CDIF {
    k: f64,
}

impl CDIF {
    /// `k` is the threshold coefficient, intended in `(0, 1)`. Out-of-range
    /// values are logged and used as-is.
    pub fn new(k: f64) -> Self {
        if !(0.0..=1.0).contains(&k) {
            log::warn!("`k` should be between (0, 1), but got {k}");
        }
        CDIF { k }
    }

    /// Estimate a PRI from `toas`, scanning ranks `1..=max_rank` on bins of
    /// width `bin_width`. Returns `None` if fewer than two pulses are given
    /// or no rank turns up a qualifying bin.
    pub fn run(&self, toas: &[f64], max_rank: u32, bin_width: f64) -> Option<f64> {
        if toas.len() < 2 {
            return None;
        }

        let duration = toas[toas.len() - 1] - toas[0];
        let bin_num = num_bins(duration, bin_width);
        let mut hist = vec![0.0f64; bin_num];
        for (i, h) in hist.iter_mut().enumerate() {
            let center = bin_center(i, 0.0, bin_width);
            *h = -self.k * duration / center;
        }

        for rank in 1..=max_rank as usize {
            log::debug!("rank {rank}");
            for j in 0..toas.len().saturating_sub(rank) {
                let dtoa = toas[j + rank] - toas[j];
                let idx = bin_index(dtoa, 0.0, bin_width);
                if idx < bin_num {
                    hist[idx] += 1.0;
                }
            }

            for i in 0..bin_num {
                let sub_a = hist.get(2 * i).copied().unwrap_or(0.0) > 0.0;
                let sub_b = hist.get(2 * i + 1).copied().unwrap_or(0.0) > 0.0;
                if hist[i] > 0.0 && (sub_a || sub_b) {
                    return Some(bin_center(i, 0.0, bin_width));
                }
            }
        }
        None
    }
}
