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

//! Stateless cursor-driven scanning. A full scan starts with cursor 0; each
//! call returns the cursor to resume from, and 0 means the cycle is
//! complete. Elements present for the whole cycle are guaranteed to be
//! yielded at least once, even across a resize that happens mid-scan;
//! elements inserted or deleted mid-cycle may be yielded 0 or 1 times, and
//! callers must tolerate the rare duplicate.
//!
//! `scan` takes `FnMut(&T)`, `scan_mut` takes `FnMut(&mut T)` -- two typed
//! entry points standing in for a boolean "emit reference" flag.

use crate::cursor::next_cursor;
use crate::sizing::exp_to_mask;
use crate::table::HashTab;
use crate::vtable::{TableElement, TableHooks};

impl<T: TableElement, S: std::hash::BuildHasher, M: TableHooks> HashTab<T, S, M> {
    pub fn scan(&mut self, cursor: usize, mut f: impl FnMut(&T)) -> usize {
        if self.size() == 0 {
            return 0;
        }
        self.pause_rehash();
        let mut cursor = cursor;

        loop {
            let mut in_probe_sequence = false;

            if !self.is_rehashing() {
                let mask = exp_to_mask(self.bucket_exp[0]);
                let b = &self.tables[0].as_ref().unwrap()[cursor & mask];
                for pos in 0..crate::bucket::SLOTS {
                    if b.occupied(pos) {
                        f(b.slot(pos).unwrap());
                    }
                }
                in_probe_sequence |= b.everfull();
                cursor = next_cursor(cursor, mask);
            } else {
                let (small, large) = if self.bucket_exp[0] <= self.bucket_exp[1] { (0, 1) } else { (1, 0) };
                let mask_small = exp_to_mask(self.bucket_exp[small]);
                let mask_large = exp_to_mask(self.bucket_exp[large]);

                let b = &self.tables[small].as_ref().unwrap()[cursor & mask_small];
                for pos in 0..crate::bucket::SLOTS {
                    if b.occupied(pos) {
                        f(b.slot(pos).unwrap());
                    }
                }
                in_probe_sequence |= b.everfull();

                loop {
                    let b = &self.tables[large].as_ref().unwrap()[cursor & mask_large];
                    for pos in 0..crate::bucket::SLOTS {
                        if b.occupied(pos) {
                            f(b.slot(pos).unwrap());
                        }
                    }
                    in_probe_sequence |= b.everfull();
                    cursor = next_cursor(cursor, mask_large);
                    if cursor & (mask_small ^ mask_large) == 0 {
                        break;
                    }
                }
            }

            if !in_probe_sequence {
                break;
            }
        }

        self.resume_rehash();
        cursor
    }

    pub fn scan_mut(&mut self, cursor: usize, mut f: impl FnMut(&mut T)) -> usize {
        if self.size() == 0 {
            return 0;
        }
        self.pause_rehash();
        let mut cursor = cursor;

        loop {
            let mut in_probe_sequence = false;

            if !self.is_rehashing() {
                let mask = exp_to_mask(self.bucket_exp[0]);
                let b = &mut self.tables[0].as_mut().unwrap()[cursor & mask];
                for pos in 0..crate::bucket::SLOTS {
                    if b.occupied(pos) {
                        f(b.slot_mut(pos).unwrap());
                    }
                }
                in_probe_sequence |= b.everfull();
                cursor = next_cursor(cursor, mask);
            } else {
                let (small, large) = if self.bucket_exp[0] <= self.bucket_exp[1] { (0, 1) } else { (1, 0) };
                let mask_small = exp_to_mask(self.bucket_exp[small]);
                let mask_large = exp_to_mask(self.bucket_exp[large]);

                let b = &mut self.tables[small].as_mut().unwrap()[cursor & mask_small];
                for pos in 0..crate::bucket::SLOTS {
                    if b.occupied(pos) {
                        f(b.slot_mut(pos).unwrap());
                    }
                }
                in_probe_sequence |= b.everfull();

                loop {
                    let b = &mut self.tables[large].as_mut().unwrap()[cursor & mask_large];
                    for pos in 0..crate::bucket::SLOTS {
                        if b.occupied(pos) {
                            f(b.slot_mut(pos).unwrap());
                        }
                    }
                    in_probe_sequence |= b.everfull();
                    cursor = next_cursor(cursor, mask_large);
                    if cursor & (mask_small ^ mask_large) == 0 {
                        break;
                    }
                }
            }

            if !in_probe_sequence {
                break;
            }
        }

        self.resume_rehash();
        cursor
    }
}
