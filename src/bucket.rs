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

//! The bucket layout, modeling one cache line's worth of metadata and
//! element slots.
//!
//! Bucket layout, 64-bit version, 7 elements per bucket:
//!
//! ```text
//!     1 bit     7 bits    [1 byte] x 7  [8 bytes] x 7 = 64 bytes
//!     everfull  presence  hashes        elements
//! ```
//!
//! `everfull` is a shared tombstone: once set it is never cleared except
//! when the bucket is recycled by a full rehash. It is what tells a prober
//! whether to continue to the next bucket in cursor order.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(target_pointer_width = "64")] {
        /// Number of element slots per bucket, chosen so the bucket models
        /// one 64-byte cache line on a 64-bit pointer width.
        pub(crate) const SLOTS: usize = 7;
    } else {
        /// Number of element slots per bucket on 32-bit pointer widths.
        pub(crate) const SLOTS: usize = 12;
    }
}

/// Top 8 bits of a 64-bit hash, stored per slot as a cheap prefilter before
/// the full key comparison.
#[inline]
pub(crate) fn high_bits(hash: u64) -> u8 {
    (hash >> 56) as u8
}

pub(crate) struct Bucket<T> {
    everfull: bool,
    presence: u16,
    hashes: [u8; SLOTS],
    slots: [Option<T>; SLOTS],
}

impl<T> Bucket<T> {
    pub(crate) fn empty() -> Self {
        Bucket {
            everfull: false,
            presence: 0,
            hashes: [0; SLOTS],
            slots: std::array::from_fn(|_| None),
        }
    }

    #[inline]
    pub(crate) fn everfull(&self) -> bool {
        self.everfull
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.presence == (1u16 << SLOTS) - 1
    }

    #[inline]
    pub(crate) fn occupied(&self, pos: usize) -> bool {
        self.presence & (1 << pos) != 0
    }

    #[inline]
    pub(crate) fn hash_fragment(&self, pos: usize) -> u8 {
        self.hashes[pos]
    }

    #[inline]
    pub(crate) fn slot(&self, pos: usize) -> Option<&T> {
        self.slots[pos].as_ref()
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, pos: usize) -> Option<&mut T> {
        self.slots[pos].as_mut()
    }

    /// Candidate slots for a lookup: occupied and matching the hash fragment.
    pub(crate) fn candidates(&self, h2: u8) -> impl Iterator<Item = usize> + '_ {
        (0..SLOTS).filter(move |&pos| self.occupied(pos) && self.hashes[pos] == h2)
    }

    /// First free slot, if any.
    pub(crate) fn first_free(&self) -> Option<usize> {
        (0..SLOTS).find(|&pos| !self.occupied(pos))
    }

    /// Inserts into `pos`, which must currently be free, and updates `everfull`.
    pub(crate) fn insert_at(&mut self, pos: usize, h2: u8, elem: T) {
        debug_assert!(!self.occupied(pos));
        self.slots[pos] = Some(elem);
        self.hashes[pos] = h2;
        self.presence |= 1 << pos;
        self.everfull |= self.is_full();
    }

    /// Removes and returns the element at `pos`, which must be occupied.
    /// Does not clear `everfull` -- that bit is sticky by design.
    pub(crate) fn remove_at(&mut self, pos: usize) -> T {
        debug_assert!(self.occupied(pos));
        self.presence &= !(1 << pos);
        self.slots[pos].take().expect("slot was occupied")
    }

    /// Clears presence for every slot, draining and returning the elements.
    /// Leaves `everfull` untouched; the caller is migrating the bucket's
    /// contents elsewhere, not recycling the bucket itself.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (u8, T)> + '_ {
        let presence = self.presence;
        self.presence = 0;
        (0..SLOTS).filter_map(move |pos| {
            if presence & (1 << pos) != 0 {
                Some((self.hashes[pos], self.slots[pos].take().expect("slot was occupied")))
            } else {
                None
            }
        })
    }

    /// Occupancy count, used by diagnostics.
    pub(crate) fn popcount(&self) -> u32 {
        self.presence.count_ones()
    }
}
