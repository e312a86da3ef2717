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

//! An open-addressing hash table with cache-line-sized buckets, incremental
//! rehashing across two physical tables, and stateless cursor-driven
//! scanning.
//!
//! ## Acknowledgements
//!
//! The cache-line aware open addressing scheme is inspired by tricks used
//! in Swiss tables. The incremental rehashing using two tables, and the
//! reverse-bit-increment scan cursor, were designed for a chaining hash
//! table by Salvatore Sanfilippo and Pieter Noordhuis respectively, and
//! later adapted to an open addressing scheme by Viktor Söderqvist.

mod bucket;
mod compiler;
mod cursor;
mod error;
mod policy;
mod probe;
mod rehash;
mod scan;
mod siphash;
mod sizing;
mod stats;
mod table;
mod vtable;

pub use error::{Error, HashtabResult};
pub use policy::{Context, ResizePolicy};
pub use siphash::SeededState;
pub use stats::BucketOccupancy;
pub use table::HashTab;
pub use vtable::{Set, TableElement, TableHooks};
