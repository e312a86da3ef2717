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

//! The default hash function, a seeded SipHash-1-3 keyed from a [`Context`].
//! `std`'s `RandomState` deliberately re-randomizes its seed per process and
//! exposes no way to pin it, which doesn't fit a table whose seed must be
//! settable once at startup and shared by every shard in a layered store.

use std::hash::{BuildHasher, Hasher};

use siphasher::sip::SipHasher13;

use crate::policy::Context;

/// A [`BuildHasher`] whose key is read from a shared [`Context`] at the
/// moment each hasher is constructed, rather than generated randomly.
#[derive(Clone)]
pub struct SeededState {
    context: Context,
}

impl SeededState {
    pub fn new(context: Context) -> Self {
        SeededState { context }
    }
}

impl BuildHasher for SeededState {
    type Hasher = SipHasher13;

    fn build_hasher(&self) -> Self::Hasher {
        let seed = self.context.hash_seed();
        let mut k0 = [0u8; 8];
        let mut k1 = [0u8; 8];
        k0.copy_from_slice(&seed[0..8]);
        k1.copy_from_slice(&seed[8..16]);
        SipHasher13::new_with_keys(u64::from_ne_bytes(k0), u64::from_ne_bytes(k1))
    }
}

/// Hashes `key` with `state`, the way every lookup/insert path does it.
pub(crate) fn hash_one<S: BuildHasher, K: std::hash::Hash + ?Sized>(state: &S, key: &K) -> u64 {
    let mut hasher = state.build_hasher();
    key.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Context;

    #[test]
    fn same_seed_gives_same_hash() {
        let ctx = Context::new();
        ctx.set_hash_seed([3u8; 16]);
        let state = SeededState::new(ctx);
        assert_eq!(hash_one(&state, "hello"), hash_one(&state, "hello"));
    }

    #[test]
    fn different_seeds_usually_give_different_hashes() {
        let ctx_a = Context::new();
        ctx_a.set_hash_seed([1u8; 16]);
        let ctx_b = Context::new();
        ctx_b.set_hash_seed([2u8; 16]);
        let a = SeededState::new(ctx_a);
        let b = SeededState::new(ctx_b);
        assert_ne!(hash_one(&a, "hello"), hash_one(&b, "hello"));
    }
}
