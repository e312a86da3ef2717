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

//! The table descriptor: two physical bucket arrays, one of which may be an
//! in-progress rehash destination, plus the bookkeeping needed to drive
//! incremental rehashing and pause/resume semantics.

use crate::bucket::Bucket;
use crate::policy::Context;
use crate::siphash::SeededState;
use crate::vtable::{TableElement, TableHooks};

// Dropping a `HashTab` drops every `Vec<Bucket<T>>` in `tables`, which in
// turn drops each slot's `Option<T>` in place -- the typed replacement for
// an injected element-destructor callback.
pub struct HashTab<T, S = SeededState, M = ()>
where
    T: TableElement,
    M: TableHooks,
{
    pub(crate) tables: [Option<Vec<Bucket<T>>>; 2],
    pub(crate) used: [usize; 2],
    pub(crate) bucket_exp: [Option<u32>; 2],
    pub(crate) rehash_idx: Option<usize>,
    pub(crate) pause_rehash: u32,
    pub(crate) pause_auto_shrink: u32,
    pub(crate) hasher: S,
    pub(crate) context: Context,
    pub(crate) metadata: M,
}

impl<T: TableElement> HashTab<T, SeededState, ()> {
    /// Creates an empty table using the default seeded-SipHash hasher, keyed
    /// from `context`, and no metadata.
    pub fn new(context: Context) -> Self {
        let hasher = SeededState::new(context.clone());
        HashTab::with_hasher_and_metadata(hasher, context, ())
    }
}

impl<T: TableElement, S: std::hash::BuildHasher> HashTab<T, S, ()> {
    pub fn with_hasher(hasher: S, context: Context) -> Self {
        HashTab::with_hasher_and_metadata(hasher, context, ())
    }
}

impl<T: TableElement, S: std::hash::BuildHasher, M: TableHooks> HashTab<T, S, M> {
    pub fn with_hasher_and_metadata(hasher: S, context: Context, metadata: M) -> Self {
        HashTab {
            tables: [None, None],
            used: [0, 0],
            bucket_exp: [None, None],
            rehash_idx: None,
            pause_rehash: 0,
            pause_auto_shrink: 0,
            hasher,
            context,
            metadata,
        }
    }

    /// Total number of elements stored in either table.
    pub fn size(&self) -> usize {
        self.used[0] + self.used[1]
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn is_rehashing(&self) -> bool {
        self.rehash_idx.is_some()
    }

    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut M {
        &mut self.metadata
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Pauses automatic shrinking. Call before deleting many elements to
    /// avoid repeated shrink resizes; call [`Self::resume_auto_shrink`]
    /// afterwards.
    pub fn pause_auto_shrink(&mut self) {
        self.pause_auto_shrink += 1;
    }

    pub fn resume_auto_shrink(&mut self) {
        self.pause_auto_shrink = self.pause_auto_shrink.saturating_sub(1);
        if self.pause_auto_shrink == 0 {
            self.shrink_if_needed();
        }
    }

    pub fn pause_rehash(&mut self) {
        self.pause_rehash += 1;
    }

    pub fn resume_rehash(&mut self) {
        self.pause_rehash = self.pause_rehash.saturating_sub(1);
    }

    pub fn is_rehash_paused(&self) -> bool {
        self.pause_rehash > 0
    }

    pub(crate) fn hash_key<K: std::hash::Hash + ?Sized>(&self, key: &K) -> u64 {
        crate::siphash::hash_one(&self.hasher, key)
    }
}
