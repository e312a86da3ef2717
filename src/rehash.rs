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

//! Resize and incremental rehash: allocating the destination table,
//! migrating one source bucket at a time, and the expand/shrink threshold
//! gates that drive it automatically from `insert`/`delete`.

use crate::bucket::Bucket;
use crate::cursor::{next_cursor, prev_cursor};
use crate::error::{Error, HashtabResult};
use crate::policy::ResizePolicy;
use crate::sizing::{
    exp_to_mask, next_bucket_exp, num_buckets, MAX_FILL_PERCENT_HARD, MAX_FILL_PERCENT_SOFT,
    MIN_FILL_PERCENT_HARD, MIN_FILL_PERCENT_SOFT,
};
use crate::table::HashTab;
use crate::vtable::{TableElement, TableHooks};

impl<T: TableElement, S: std::hash::BuildHasher, M: TableHooks> HashTab<T, S, M> {
    /// Migrates the contents of one source bucket (`tables[0][rehash_idx]`)
    /// into the destination table, then advances `rehash_idx`. If the whole
    /// source table has been drained, finalizes the rehash.
    pub(crate) fn rehash_step(&mut self) {
        debug_assert!(self.is_rehashing());
        let idx = self.rehash_idx.expect("rehash_idx must be set while rehashing");
        let src_mask = exp_to_mask(self.bucket_exp[0]);

        // When shrinking, we can sometimes avoid recomputing the hash: if the
        // bucket immediately preceding `idx` in cursor order has never been
        // full, no element that hashes to `idx` can have probed away from
        // it, so `idx` itself is a valid routing hash. The stored hash
        // fragment is never touched by this shortcut -- it was captured from
        // the real hash at insertion time and is simply carried over.
        let shrinking = self.bucket_exp[1] < self.bucket_exp[0];
        let predecessor_everfull = {
            let prev = prev_cursor(idx, src_mask);
            self.tables[0].as_ref().unwrap()[prev].everfull()
        };
        let can_synthesize = shrinking && !predecessor_everfull;

        let drained: Vec<(u8, T)> = self.tables[0].as_mut().unwrap()[idx].drain().collect();
        for (h2, elem) in drained {
            let hash = if can_synthesize {
                idx as u64
            } else {
                self.hash_key(elem.key())
            };
            let (bucket_idx, pos) = self.find_bucket_for_insert(hash);
            self.tables[1].as_mut().unwrap()[bucket_idx].insert_at(pos, h2, elem);
            self.used[0] -= 1;
            self.used[1] += 1;
        }

        let next = next_cursor(idx, src_mask);
        self.rehash_idx = Some(next);
        log::trace!("rehash_step: bucket {idx} migrated, cursor now {next}");
        if next == 0 {
            self.rehashing_completed();
        }
    }

    fn rehashing_completed(&mut self) {
        log::debug!(
            "rehash completed: {} buckets, {} elements",
            num_buckets(self.bucket_exp[1]),
            self.used[1]
        );
        self.metadata.rehashing_completed();
        self.tables[0] = self.tables[1].take();
        self.bucket_exp[0] = self.bucket_exp[1];
        self.used[0] = self.used[1];
        self.tables[1] = None;
        self.used[1] = 0;
        self.bucket_exp[1] = None;
        self.rehash_idx = None;
    }

    /// Allocates a new table sized for `min_capacity` and begins an
    /// incremental rehash into it, fast-forwarding any rehash already in
    /// progress first (the design never carries three tables at once).
    /// Returns `Ok(false)` if no resize was needed (target size unchanged).
    pub(crate) fn resize(&mut self, min_capacity: usize) -> HashtabResult<bool> {
        let exp = next_bucket_exp(min_capacity);
        let buckets = num_buckets(exp);
        let new_capacity = buckets.saturating_mul(crate::bucket::SLOTS);
        if exp.is_some() && new_capacity < min_capacity {
            return Err(Error::CapacityOverflow);
        }

        let old_exp = self.bucket_exp[if self.is_rehashing() { 1 } else { 0 }];
        if exp == old_exp {
            return Ok(false);
        }

        while self.is_rehashing() {
            self.rehash_step();
        }

        log::debug!(
            "resize: {} -> {} buckets ({} elements live)",
            num_buckets(old_exp),
            buckets,
            self.used[0]
        );

        let mut new_table: Vec<Bucket<T>> = Vec::new();
        new_table.try_reserve_exact(buckets)?;
        new_table.resize_with(buckets, Bucket::empty);

        self.bucket_exp[1] = exp;
        self.tables[1] = Some(new_table);
        self.used[1] = 0;
        self.rehash_idx = Some(0);
        self.metadata.rehashing_started();

        if self.tables[0].is_none() || self.used[0] == 0 {
            self.rehashing_completed();
        }
        Ok(true)
    }

    /// Grows the table to hold at least `size` elements if it doesn't
    /// already. Returns `true` if a resize was performed.
    pub fn expand(&mut self, size: usize) -> HashtabResult<bool> {
        if size < self.size() {
            return Ok(false);
        }
        self.resize(size)
    }

    pub(crate) fn expand_if_needed(&mut self) {
        let min_capacity = self.used[0] + self.used[1] + 1;
        let active = if self.is_rehashing() { 1 } else { 0 };
        let current_capacity = num_buckets(self.bucket_exp[active]) * crate::bucket::SLOTS;
        let max_fill_percent = if self.context.resize_policy() == ResizePolicy::Avoid {
            MAX_FILL_PERCENT_HARD
        } else {
            MAX_FILL_PERCENT_SOFT
        };
        if min_capacity * 100 <= current_capacity * max_fill_percent {
            return;
        }
        // An allocation failure here is treated as fatal, matching the
        // original's infallible `resize` call from the insert path.
        self.resize(min_capacity).expect("failed to grow table");
    }

    pub(crate) fn shrink_if_needed(&mut self) {
        if self.is_rehashing() || self.context.resize_policy() == ResizePolicy::Forbid {
            return;
        }
        let current_capacity = num_buckets(self.bucket_exp[0]) * crate::bucket::SLOTS;
        let min_fill_percent = if self.context.resize_policy() == ResizePolicy::Avoid {
            MIN_FILL_PERCENT_HARD
        } else {
            MIN_FILL_PERCENT_SOFT
        };
        if self.used[0] * 100 > current_capacity * min_fill_percent {
            return;
        }
        let _ = self.resize(self.used[0]);
    }
}
