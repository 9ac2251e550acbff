//! Pulse-Correlation: PRI-free chain extraction via pair-histogram search.
//!
//! Every in-range pulse pair is deposited into a run of adjacent bins
//! (smeared across `merge_num` neighbors below its own bin), then the
//! densest bins are searched, in order, for a maximal chain of pairs that
//! share a head-to-tail spacing. A 32-bit label is recycled across chain
//! attempts so the membership mask never needs to be resized.

use std::collections::BinaryHeap;

use crate::histogram::{bin_index, num_bins};

#[derive(Clone, Copy, Debug)]
pub struct PulsePair {
    pub head: usize,
    pub tail: usize,
}

type Bin = Vec<PulsePair>;

/// Max-heap entry keyed by bin length; `idx` is the bin's position in the
/// histogram so the winning bin can be looked up after the heap pop.
struct HeapEntry {
    len: usize,
    idx: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.len.cmp(&other.len)
    }
}

pub struct PulseCorrelation {
    min_chain: usize,
    thr: usize,
}

impl PulseCorrelation {
    /// Chains shorter than `min_chain` pairs are discarded; an extraction
    /// is only returned once its total pulse count exceeds `thr`.
    pub fn new(min_chain: usize, thr: usize) -> Self {
        PulseCorrelation { min_chain, thr }
    }

    fn build_histogram(
        &self,
        toas: &[f64],
        range: (f64, f64),
        bin_width: f64,
        merge_num: usize,
    ) -> Vec<Bin> {
        let (r0, r1) = range;
        let duration = toas[toas.len() - 1] - toas[0];
        let bin_num = num_bins(duration, bin_width);
        let mut hist: Vec<Bin> = vec![Vec::new(); bin_num];

        for head in 0..toas.len() - 1 {
            for tail in head + 1..toas.len() {
                let dtoa = toas[tail] - toas[head];
                if dtoa < r0 {
                    continue;
                }
                if dtoa > r1 {
                    break;
                }
                let idx = bin_index(dtoa, r0, bin_width);
                if idx >= bin_num {
                    continue;
                }
                let max_offset = idx.min(merge_num);
                for offset in 0..max_offset {
                    hist[idx - offset].push(PulsePair { head, tail });
                }
            }
        }
        hist
    }

    /// Scan `bin`'s pairs in insertion order, seeding a fresh chain at each
    /// unmasked starting pair and extending it while the tail of one pair
    /// matches the head of the next. Returns the total pulse count
    /// committed across all chains found in this bin.
    fn search_chains(&self, label: u32, bin: &Bin, mask: &mut [u32]) -> usize {
        let mut total = 0usize;
        if bin.len() <= self.min_chain {
            return 0;
        }

        let mut cache: Vec<usize> = Vec::new();
        for i in 0..bin.len() {
            let start = bin[i];
            if is_masked(mask, start.head) || is_masked(mask, start.tail) {
                continue;
            }

            cache.clear();
            cache.push(start.head);
            cache.push(start.tail);

            for pair in bin.iter().skip(i + 1) {
                if is_masked(mask, pair.head) || is_masked(mask, pair.tail) {
                    continue;
                }
                let target = *cache.last().unwrap();
                if pair.head < target {
                    continue;
                }
                if pair.head > target {
                    break;
                }
                cache.push(pair.tail);
            }

            if cache.len() > self.min_chain {
                for &idx in &cache {
                    mask[idx] |= 1 << label;
                }
                total += cache.len();
            }
        }
        total
    }

    /// Extract the most strongly correlated pulse chain without a known
    /// PRI. Returns ascending `(extracted, remaining)` index partitions.
    pub fn run(
        &self,
        toas: &[f64],
        range: (f64, f64),
        bin_width: f64,
        merge_num: usize,
    ) -> Option<(Vec<usize>, Vec<usize>)> {
        if toas.len() < 2 || toas.len() < self.thr {
            return None;
        }

        let mut mask = vec![0u32; toas.len()];
        let hist = self.build_histogram(toas, range, bin_width, merge_num);

        let mut heap: BinaryHeap<HeapEntry> = hist
            .iter()
            .enumerate()
            .map(|(idx, b)| HeapEntry { len: b.len(), idx })
            .collect();

        let mut label = 0u32;
        while let Some(entry) = heap.pop() {
            if entry.len < self.min_chain {
                break;
            }
            let bin = &hist[entry.idx];
            let size = self.search_chains(label, bin, &mut mask);
            if size > self.thr {
                let mut extracted = Vec::with_capacity(size);
                let mut remaining = Vec::with_capacity(toas.len() - size);
                for i in 0..toas.len() {
                    if mask[i] & (1 << label) != 0 {
                        extracted.push(i);
                    } else {
                        remaining.push(i);
                    }
                }
                return Some((extracted, remaining));
            }

            label += 1;
            if label == 32 {
                label = 0;
                mask.iter_mut().for_each(|m| *m = 0);
            }
        }
        None
    }
}

fn is_masked(mask: &[u32], idx: usize) -> bool {
    mask[idx] != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_pulses_returns_none() {
        let pc = PulseCorrelation::new(2, 3);
        assert_eq!(pc.run(&[1.0, 2.0], (0.5, 4.0), 0.25, 2), None);
    }

    #[test]
    fn s5_scenario_separates_one_progression() {
        // spec.md S5: two interleaved arithmetic progressions
        let mut toas = vec![0.0, 3.0, 6.0, 9.0, 12.0, 15.0, 0.7, 1.9, 3.1, 4.3];
        toas.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let pc = PulseCorrelation::new(3, 3);
        let result = pc.run(&toas, (0.5, 4.0), 0.25, 2);
        assert!(result.is_some());
        let (extracted, remaining) = result.unwrap();

        // partition law
        let mut all: Vec<usize> = extracted.iter().chain(remaining.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..toas.len()).collect::<Vec<_>>());
        assert!(extracted.is_sorted());
        assert!(remaining.is_sorted());
        assert!(extracted.len() >= 3);
    }

    #[test]
    fn partition_law_holds_on_random_like_input() {
        let toas: Vec<f64> = (0..30).map(|i| i as f64 * 2.0).collect();
        let pc = PulseCorrelation::new(2, 3);
        if let Some((extracted, remaining)) = pc.run(&toas, (1.0, 5.0), 0.5, 2) {
            let mut all: Vec<usize> = extracted.iter().chain(remaining.iter()).copied().collect();
            all.sort_unstable();
            assert_eq!(all, (0..toas.len()).collect::<Vec<_>>());
            let mut dedup = all.clone();
            dedup.dedup();
            assert_eq!(dedup.len(), all.len());
        }
    }

    #[test]
    fn bin_smaller_than_min_chain_cannot_search() {
        let pc = PulseCorrelation::new(5, 1);
        let bin = vec![PulsePair { head: 0, tail: 1 }, PulsePair { head: 1, tail: 2 }];
        let mut mask = vec![0u32; 3];
        assert_eq!(pc.search_chains(0, &bin, &mut mask), 0);
    }
}
