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

//! Probing: finding a matching element for lookup, and finding a free slot
//! for insertion. Both probe in cursor order, not index order, so that
//! probe, scan and rehash migration all agree on which buckets form one
//! element's probe chain.

use std::borrow::Borrow;

use crate::bucket::high_bits;
use crate::cursor::next_cursor;
use crate::policy::ResizePolicy;
use crate::sizing::exp_to_mask;
use crate::table::HashTab;
use crate::vtable::{TableElement, TableHooks};

/// Location of a matching slot: which physical table, which bucket, which
/// position within the bucket.
pub(crate) struct Found {
    pub(crate) table: usize,
    pub(crate) bucket: usize,
    pub(crate) pos: usize,
}

impl<T: TableElement, S: std::hash::BuildHasher, M: TableHooks> HashTab<T, S, M> {
    /// Find-for-lookup: probes the rehash destination table first (newer,
    /// typically shorter probe chains), then the primary table. As a side
    /// effect, performs one rehash step if a rehash is in progress and the
    /// resize policy permits lookups to do so.
    pub(crate) fn find_bucket<Q>(&mut self, hash: u64, key: &Q) -> Option<Found>
    where
        T::Key: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        if self.size() == 0 {
            return None;
        }
        let h2 = high_bits(hash);

        if self.is_rehashing() && self.context.resize_policy() == ResizePolicy::Allow {
            self.rehash_step();
        }

        // Check the rehashing destination table first: it's newer and
        // typically has fewer everfull buckets, so lookups there need less
        // probing.
        for table in [1usize, 0usize] {
            if self.used[table] == 0 {
                continue;
            }
            let mask = exp_to_mask(self.bucket_exp[table]);
            let buckets = match self.tables[table].as_ref() {
                Some(b) => b,
                None => continue,
            };
            let mut bucket_idx = (hash as usize) & mask;
            loop {
                let b = &buckets[bucket_idx];
                for pos in b.candidates(h2) {
                    let elem = b.slot(pos).expect("candidate position is occupied");
                    if elem.key().borrow() == key {
                        return Some(Found { table, bucket: bucket_idx, pos });
                    }
                }
                if crate::compiler::likely(!b.everfull()) {
                    break;
                }
                bucket_idx = next_cursor(bucket_idx, mask);
            }
        }
        None
    }

    /// Find-for-insert: always targets the rehash destination table if one
    /// is in progress, else the primary table. Termination is guaranteed
    /// because `expand_if_needed` has already ensured fill is below 100%.
    pub(crate) fn find_bucket_for_insert(&self, hash: u64) -> (usize, usize) {
        let table = if self.is_rehashing() { 1 } else { 0 };
        let buckets = self.tables[table]
            .as_ref()
            .expect("target table must be allocated before insert");
        let mask = exp_to_mask(self.bucket_exp[table]);
        let mut bucket_idx = (hash as usize) & mask;
        loop {
            if let Some(pos) = buckets[bucket_idx].first_free() {
                return (bucket_idx, pos);
            }
            bucket_idx = next_cursor(bucket_idx, mask);
        }
    }

    /// Inserts `elem` at the given hash's slot. The caller must have already
    /// confirmed no element with the same key exists.
    pub(crate) fn insert_unchecked(&mut self, hash: u64, elem: T) {
        self.expand_if_needed();
        // If resize policy is Avoid, perform a rehash step here even though
        // lookups don't -- this ensures rehashing finishes before the table
        // needs to resize again.
        if self.is_rehashing() && self.context.resize_policy() == ResizePolicy::Avoid {
            self.rehash_step();
        }
        let table = if self.is_rehashing() { 1 } else { 0 };
        let (bucket_idx, pos) = self.find_bucket_for_insert(hash);
        let h2 = high_bits(hash);
        self.tables[table]
            .as_mut()
            .expect("target table must be allocated before insert")[bucket_idx]
            .insert_at(pos, h2, elem);
        self.used[table] += 1;
    }

    /// Returns a reference to the element matching `key`, if any.
    pub fn find<Q>(&mut self, key: &Q) -> Option<&T>
    where
        T::Key: Borrow<Q>,
        Q: std::hash::Hash + Eq + ?Sized,
    {
        let hash = self.hash_key(key);
        let found = self.find_bucket(hash, key)?;
        self.tables[found.table].as_ref().unwrap()[found.bucket].slot(found.pos)
    }

    /// Adds `elem`. Returns `true` if inserted, `false` if an element with
    /// the same key already exists (in which case `elem` is dropped).
    pub fn add(&mut self, elem: T) -> bool {
        self.add_raw(elem).is_ok()
    }

    /// Adds `elem`. On success returns `Ok(())`. On duplicate key, `elem` is
    /// dropped and `Err` holds a reference to the element already stored
    /// under that key (not the rejected argument) -- for map semantics,
    /// where the stored value may differ from the one just passed in, these
    /// are not interchangeable.
    pub fn add_raw(&mut self, elem: T) -> Result<(), &T> {
        let hash = self.hash_key(elem.key());
        if let Some(found) = self.find_bucket(hash, elem.key()) {
            let existing = self.tables[found.table].as_ref().unwrap()[found.bucket]
                .slot(found.pos)
                .expect("found position is occupied");
            return Err(existing);
        }
        self.insert_unchecked(hash, elem);
        Ok(())
    }

    /// Adds `elem`, replacing any existing element with the same key.
    /// Returns `true` if a new element was inserted, `false` if an existing
    /// one was overwritten (and dropped).
    pub fn replace(&mut self, elem: T) -> bool {
        let hash = self.hash_key(elem.key());
        if let Some(found) = self.find_bucket(hash, elem.key()) {
            let slot = self.tables[found.table].as_mut().unwrap()[found.bucket].slot_mut(found.pos).unwrap();
            *slot = elem;
            false
        } else {
            self.insert_unchecked(hash, elem);
            true
        }
    }

    /// Removes and returns the element matching `key`, if any. Does not
    /// clear the containing bucket's `everfull` bit. May trigger a shrink
    /// unless automatic shrinking is paused.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<T>
    where
        T::Key: Borrow<Q>,
        Q: std::hash::Hash + Eq + ?Sized,
    {
        let hash = self.hash_key(key);
        let found = self.find_bucket(hash, key)?;
        let removed = self.tables[found.table].as_mut().unwrap()[found.bucket].remove_at(found.pos);
        self.used[found.table] -= 1;
        if self.pause_auto_shrink == 0 {
            self.shrink_if_needed();
        }
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Context;
    use crate::vtable::Set;

    #[test]
    fn add_then_find_roundtrips() {
        let mut t: HashTab<Set<String>> = HashTab::new(Context::new());
        assert!(t.add(Set("alpha".to_string())));
        assert_eq!(t.find("alpha"), Some(&Set("alpha".to_string())));
        assert_eq!(t.find("beta"), None);
    }

    #[test]
    fn add_rejects_duplicate_key() {
        let mut t: HashTab<Set<u32>> = HashTab::new(Context::new());
        assert!(t.add(Set(1)));
        assert!(!t.add(Set(1)));
        assert_eq!(t.size(), 1);
    }

    #[test]
    fn add_raw_returns_existing_on_duplicate() {
        let mut t: HashTab<Set<u32>> = HashTab::new(Context::new());
        assert!(t.add_raw(Set(1)).is_ok());
        assert_eq!(t.add_raw(Set(1)), Err(&Set(1)));
    }

    #[test]
    fn add_raw_returns_the_stored_value_not_the_rejected_argument() {
        #[derive(Debug, PartialEq)]
        struct Entry {
            key: u32,
            value: &'static str,
        }
        impl TableElement for Entry {
            type Key = u32;
            fn key(&self) -> &u32 {
                &self.key
            }
        }

        let mut t: HashTab<Entry> = HashTab::new(Context::new());
        assert!(t.add_raw(Entry { key: 1, value: "first" }).is_ok());
        let err = t
            .add_raw(Entry { key: 1, value: "second" })
            .expect_err("duplicate key must be rejected");
        assert_eq!(err.value, "first", "must return the stored element, not the rejected one");
    }

    #[test]
    fn replace_overwrites_without_growing_size() {
        let mut t: HashTab<Set<u32>> = HashTab::new(Context::new());
        assert!(t.replace(Set(5)));
        assert!(!t.replace(Set(5)));
        assert_eq!(t.size(), 1);
    }

    #[test]
    fn delete_then_insert_again_succeeds() {
        let mut t: HashTab<Set<u32>> = HashTab::new(Context::new());
        t.add(Set(9));
        assert_eq!(t.delete(&9), Some(Set(9)));
        assert_eq!(t.find(&9), None);
        assert!(t.add(Set(9)));
        assert_eq!(t.size(), 1);
    }

    #[test]
    fn sixteen_keys_insert_and_find() {
        let mut t: HashTab<Set<u32>> = HashTab::new(Context::new());
        for i in 0..16u32 {
            assert!(t.add(Set(i)));
        }
        assert_eq!(t.size(), 16);
        for i in 0..16u32 {
            assert_eq!(t.find(&i), Some(&Set(i)));
        }
    }
}
