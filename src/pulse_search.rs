//! Pulse-Search: chain extraction at a known PRI with a miss-rate budget.
//!
//! Walks a sliding target grid from each unclaimed starting pulse,
//! re-syncing the target to every accepted TOA (rather than the nominal
//! grid) so a PRI that differs slightly from the hypothesis does not drift
//! the chain apart. A missed target slot advances the grid without
//! consuming the current TOA, so it can still match the next slot.

pub struct PulseSearcher {
    thr: usize,
    toler: f64,
    allow_miss_rate: f64,
}

impl PulseSearcher {
    /// `thr` is the minimum chain length to keep, `toler` the per-slot
    /// acceptance window, `allow_miss_rate` intended in `[0, 1]`.
    pub fn new(thr: usize, toler: f64, allow_miss_rate: f64) -> Self {
        if !(0.0..=1.0).contains(&allow_miss_rate) {
            log::warn!("`allow_miss_rate` should be between (0, 1), but got {allow_miss_rate}");
        }
        if toler < 0.0 {
            log::warn!("`toler` must be a positive number, but got {toler}");
        }
        PulseSearcher {
            thr,
            toler,
            allow_miss_rate,
        }
    }

    /// Extract the chain of pulses spaced at `pri` from `toas`.
    pub fn run(&self, pri: f64, toas: &[f64]) -> Option<(Vec<usize>, Vec<usize>)> {
        if toas.len() < self.thr {
            return None;
        }

        let mut mask = vec![false; toas.len()];
        let end_toa = toas[toas.len() - 1];
        let mut pulse_count = 0usize;
        let mut cache: Vec<usize> = Vec::new();

        for start_idx in 0..toas.len() {
            if mask[start_idx] {
                continue;
            }

            let start = toas[start_idx];
            let max_num = (end_toa - start) / pri;
            let allow_miss_num = (max_num * self.allow_miss_rate).round() as i64;

            if max_num < self.thr as f64 || (toas.len() - pulse_count) < self.thr {
                break;
            }

            cache.clear();
            cache.push(start_idx);
            let mut target = start + pri;
            let mut idx = start_idx + 1;
            let mut miss_num = 0i64;

            while idx < toas.len() && target < end_toa + self.toler {
                if mask[idx] {
                    idx += 1;
                    continue;
                }

                let toa = toas[idx];
                if toa > target + self.toler {
                    target += pri;
                    miss_num += 1;
                    if miss_num > allow_miss_num {
                        break;
                    }
                    continue;
                }
                if toa > target - self.toler {
                    target = toa + pri;
                    cache.push(idx);
                }
                idx += 1;
            }

            if cache.len() >= self.thr {
                for &i in &cache {
                    mask[i] = true;
                }
                pulse_count += cache.len();
            }
        }

        if pulse_count == 0 {
            return None;
        }

        let mut extracted = Vec::with_capacity(pulse_count);
        let mut remaining = Vec::with_capacity(toas.len() - pulse_count);
        for (i, &m) in mask.iter().enumerate() {
            if m {
                extracted.push(i);
            } else {
                remaining.push(i);
            }
        }
        Some((extracted, remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s4_scenario_matches_frozen_partition() {
        // spec.md S4
        let toas = [0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 10.5, 12.0, 14.0];
        let ps = PulseSearcher::new(3, 0.1, 0.0);
        let (extracted, remaining) = ps.run(2.0, &toas).expect("expected a result");
        assert_eq!(extracted, vec![0, 1, 2, 3, 4, 5, 7, 8]);
        assert_eq!(remaining, vec![6]);
    }

    #[test]
    fn s6_scenario_returns_none() {
        let toas = [0.0, 1.0, 2.0];
        let ps = PulseSearcher::new(3, 0.0, 0.0);
        assert_eq!(ps.run(5.0, &toas), None);
    }

    #[test]
    fn partition_law_holds() {
        let toas: Vec<f64> = (0..20).map(|i| i as f64 * 5.0).collect();
        let ps = PulseSearcher::new(3, 0.1, 0.0);
        let (extracted, remaining) = ps.run(5.0, &toas).expect("expected a result");
        let mut all: Vec<usize> = extracted.iter().chain(remaining.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..toas.len()).collect::<Vec<_>>());
        assert!(extracted.is_sorted());
        assert!(remaining.is_sorted());
    }

    #[test]
    fn miss_tolerance_recovers_most_of_a_dropped_grid() {
        let pri = 5.0;
        let k = 40;
        let full: Vec<f64> = (0..=k).map(|i| i as f64 * pri).collect();
        // drop every 5th pulse (f = 0.2), keep endpoints
        let toas: Vec<f64> = full
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 5 != 0 || *i == 0 || *i == k)
            .map(|(_, &t)| t)
            .collect();

        let allow_miss_rate = 0.25;
        let ps = PulseSearcher::new(3, 0.1, allow_miss_rate);
        let (extracted, _remaining) = ps.run(pri, &toas).expect("expected a result");
        let f = 1.0 - (toas.len() as f64 / full.len() as f64);
        assert!(extracted.len() as f64 >= (1.0 - f) * k as f64 * 0.8);
    }
}
