/*
 * This file is a part of hashtab
 *
 * Copyright (c) 2026, The hashtab Authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! Non-destructive introspection, ported from the original's debug-only
//! `hashtabDump`/`hashtabHistogram`/`hashtabLongestProbingChain`. These are
//! safe to call in production: they only read bucket metadata.

use crate::cursor::next_cursor;
use crate::sizing::exp_to_mask;
use crate::table::HashTab;
use crate::vtable::{TableElement, TableHooks};

/// Per-bucket occupancy, one entry per bucket across both tables (table 0
/// first). `None` marks an empty-but-everfull bucket -- the typed
/// equivalent of the original's `'X'` histogram character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketOccupancy {
    Count(u32),
    EmptyEverfull,
}

impl<T: TableElement, S: std::hash::BuildHasher, M: TableHooks> HashTab<T, S, M> {
    pub fn probe_histogram(&self) -> Vec<BucketOccupancy> {
        let mut out = Vec::new();
        for table in [0usize, 1usize] {
            let Some(buckets) = self.tables[table].as_ref() else {
                continue;
            };
            for b in buckets {
                if b.popcount() == 0 && b.everfull() {
                    out.push(BucketOccupancy::EmptyEverfull);
                } else {
                    out.push(BucketOccupancy::Count(b.popcount()));
                }
            }
        }
        out
    }

    /// Longest run of consecutive everfull buckets in cursor order, across
    /// both tables. A long chain means probing has degraded and a rehash
    /// would help; this is primarily useful in tests that force collisions.
    pub fn longest_probe_chain(&self) -> usize {
        let mut maxlen = 0usize;
        for table in [0usize, 1usize] {
            let exp = self.bucket_exp[table];
            let Some(buckets) = self.tables[table].as_ref() else {
                continue;
            };
            if exp.is_none() {
                continue;
            }
            let mask = exp_to_mask(exp);
            let mut cursor = 0usize;
            let mut chainlen = 0usize;
            loop {
                let b = &buckets[cursor];
                if b.everfull() {
                    chainlen += 1;
                    maxlen = maxlen.max(chainlen);
                } else {
                    chainlen = 0;
                }
                cursor = next_cursor(cursor, mask);
                if cursor == 0 {
                    break;
                }
            }
        }
        maxlen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Context;
    use crate::vtable::Set;

    #[test]
    fn empty_table_has_no_probe_chain() {
        let t: HashTab<Set<u32>> = HashTab::new(Context::new());
        assert_eq!(t.longest_probe_chain(), 0);
        assert!(t.probe_histogram().is_empty());
    }

    #[test]
    fn histogram_length_matches_bucket_count() {
        let mut t: HashTab<Set<u32>> = HashTab::new(Context::new());
        for i in 0..40u32 {
            t.add(Set(i));
        }
        let total_buckets: usize = [0usize, 1usize]
            .iter()
            .map(|&i| t.tables[i].as_ref().map_or(0, |b| b.len()))
            .sum();
        assert_eq!(t.probe_histogram().len(), total_buckets);
    }

    /// A hasher that always returns the same value, forcing every key into
    /// the same bucket's probe chain regardless of resize.
    #[derive(Clone, Default)]
    struct ConstantHasherState;
    struct ConstantHasher;
    impl std::hash::Hasher for ConstantHasher {
        fn finish(&self) -> u64 {
            42
        }
        fn write(&mut self, _bytes: &[u8]) {}
    }
    impl std::hash::BuildHasher for ConstantHasherState {
        type Hasher = ConstantHasher;
        fn build_hasher(&self) -> ConstantHasher {
            ConstantHasher
        }
    }

    #[test]
    fn colliding_hashes_produce_a_single_growing_probe_chain() {
        let mut t: HashTab<Set<u32>, ConstantHasherState> =
            HashTab::with_hasher(ConstantHasherState, Context::new());
        for i in 0..(crate::bucket::SLOTS as u32 + 3) {
            t.add(Set(i));
        }
        assert!(t.longest_probe_chain() >= 1, "first bucket must be everfull once overflowed");
    }

    #[test]
    fn probe_chain_never_exceeds_total_bucket_count() {
        let mut t: HashTab<Set<u32>> = HashTab::new(Context::new());
        for i in 0..8u32 {
            t.add(Set(i));
        }
        let total_buckets: usize = [0usize, 1usize]
            .iter()
            .map(|&i| t.tables[i].as_ref().map_or(0, |b| b.len()))
            .sum();
        assert!(t.longest_probe_chain() <= total_buckets);
    }
}
