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

//! Bucket-count sizing. We want to pick a number of buckets given a desired
//! capacity without an expensive division. Division by a power of two is
//! cheap, so we multiply by an integer factor and divide by a power-of-two
//! divisor, chosen so the resulting fill factor lands at or below the soft
//! expand threshold.

use cfg_if::cfg_if;

use crate::bucket::SLOTS;

cfg_if! {
    if #[cfg(target_pointer_width = "64")] {
        const BUCKET_FACTOR: usize = 3;
        const BUCKET_DIVISOR: usize = 16;
    } else {
        const BUCKET_FACTOR: usize = 7;
        const BUCKET_DIVISOR: usize = 64;
    }
}

pub(crate) const MAX_FILL_PERCENT_SOFT: usize = 77;
pub(crate) const MAX_FILL_PERCENT_HARD: usize = 90;
pub(crate) const MIN_FILL_PERCENT_SOFT: usize = 13;
pub(crate) const MIN_FILL_PERCENT_HARD: usize = 3;

const _: () = assert!(100 * BUCKET_DIVISOR / BUCKET_FACTOR / SLOTS <= MAX_FILL_PERCENT_SOFT);
const _: () = assert!(MAX_FILL_PERCENT_SOFT <= MAX_FILL_PERCENT_HARD);
const _: () = assert!(MAX_FILL_PERCENT_HARD < 100);

#[inline]
pub(crate) fn num_buckets(exp: Option<u32>) -> usize {
    match exp {
        None => 0,
        Some(exp) => 1usize << exp,
    }
}

#[inline]
pub(crate) fn exp_to_mask(exp: Option<u32>) -> usize {
    match exp {
        None => 0,
        Some(exp) => (1usize << exp) - 1,
    }
}

/// Smallest `exp` such that `1 << exp` buckets hold `min_capacity` elements
/// at or below the soft max fill factor. `None` denotes zero buckets.
pub(crate) fn next_bucket_exp(min_capacity: usize) -> Option<u32> {
    if min_capacity == 0 {
        return None;
    }
    // Saturate rather than let `* BUCKET_FACTOR` wrap, mirroring the
    // original's `if (min_buckets >= SIZE_MAX / 2) return ...` clamp before
    // it ever takes `__builtin_clzl` of a wrapped value.
    let scaled = min_capacity.saturating_mul(BUCKET_FACTOR);
    // ceil(x / y) = (x - 1) / y + 1
    let min_buckets = (scaled - 1) / BUCKET_DIVISOR + 1;
    if min_buckets >= usize::MAX / 2 {
        return Some(usize::BITS - 1);
    }
    Some(usize::BITS - (min_buckets - 1).leading_zeros())
}
