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

//! Per-element-type customization points. Where the original injects a
//! `hashtabType` full of function pointers (hash, compare, destructor,
//! rehashing callbacks), this port splits that into a trait per concern so
//! each is checked at compile time instead of dispatched through a vtable.

use std::hash::Hash;

/// Extracts the key by which an element is hashed and compared. Implement
/// this on a wrapper struct for map semantics (key + value), or use
/// [`Set`] to store bare keys with set semantics.
pub trait TableElement {
    type Key: Hash + Eq;

    fn key(&self) -> &Self::Key;
}

/// Wraps a bare key so it can be stored directly, giving set semantics:
/// the element *is* the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Set<K>(pub K);

impl<K: Hash + Eq> TableElement for Set<K> {
    type Key = K;

    fn key(&self) -> &K {
        &self.0
    }
}

/// Lifecycle hooks invoked when a table begins or completes an incremental
/// rehash. Implement on the table's metadata type to react to these events;
/// the default no-op impl on `()` covers tables with no metadata.
pub trait TableHooks {
    fn rehashing_started(&mut self) {}
    fn rehashing_completed(&mut self) {}
}

impl TableHooks for () {}
