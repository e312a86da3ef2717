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

//! Process-wide-ish configuration, passed explicitly rather than hidden
//! behind a bare global: the hash seed and the resize policy that a `HashTab`
//! consults on every mutation.
//!
//! A single [`Context`] can be cloned cheaply and shared across every shard
//! of a layered store so that one resize policy switch (e.g. while a
//! copy-on-write fork is running) takes effect everywhere at once.

use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc, OnceLock,
};

use parking_lot::RwLock;

/// Controls how aggressively a table resizes and whether lookups are
/// permitted to perform incremental rehash steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResizePolicy {
    /// Rehash as needed for optimal performance. Default.
    Allow = 0,
    /// Avoid moving memory when possible; used while a copy-on-write fork
    /// is alive. Lookups never perform rehash steps, only inserts do.
    Avoid = 1,
    /// Never resize or rehash. Used in a non-mutating child process.
    Forbid = 2,
}

impl ResizePolicy {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ResizePolicy::Allow,
            1 => ResizePolicy::Avoid,
            _ => ResizePolicy::Forbid,
        }
    }
}

struct Inner {
    seed: RwLock<[u8; 16]>,
    policy: AtomicU8,
}

/// Shared, cheaply-clonable configuration for one or more tables.
#[derive(Clone)]
pub struct Context(Arc<Inner>);

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Context(Arc::new(Inner {
            seed: RwLock::new([0; 16]),
            policy: AtomicU8::new(ResizePolicy::Allow as u8),
        }))
    }

    /// Sets the 16-byte hash seed. Intended to be called once at startup,
    /// before any table sharing this context is populated; changing it
    /// afterwards invalidates previously-computed hash fragments the same
    /// way the original's process-wide seed swap does.
    pub fn set_hash_seed(&self, seed: [u8; 16]) {
        *self.0.seed.write() = seed;
    }

    pub fn hash_seed(&self) -> [u8; 16] {
        *self.0.seed.read()
    }

    pub fn set_resize_policy(&self, policy: ResizePolicy) {
        self.0.policy.store(policy as u8, Ordering::Relaxed);
    }

    pub fn resize_policy(&self) -> ResizePolicy {
        ResizePolicy::from_u8(self.0.policy.load(Ordering::Relaxed))
    }

    /// A process-wide singleton, for callers who want the ergonomics of the
    /// original's implicit global instead of passing a `Context` around.
    pub fn global() -> &'static Context {
        static GLOBAL: OnceLock<Context> = OnceLock::new();
        GLOBAL.get_or_init(Context::new)
    }
}
