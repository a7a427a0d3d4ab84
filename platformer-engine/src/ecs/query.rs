// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Signature queries
//!
//! A query is a tuple of component types, e.g. `(Position, Velocity)`.
//! Running it snapshots the ids of every entity whose component set covers
//! the tuple, then hands them out one at a time through a [`QueryCursor`].
//!
//! The snapshot is what makes mid-iteration mutation safe: entities created
//! while a cursor is live are not in its snapshot, and each candidate is
//! re-checked against the pool right before it is yielded, so an entity that
//! was destroyed or disabled by an earlier callback is skipped instead of
//! visited.

use crate::ecs::{Component, Entity, EntityPool, Signature};
use crate::pool::VecGuard;

/// Which component mask a query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFilter {
    /// Components must be attached and enabled
    Enabled,
    /// Components must be attached; the enabled mask is ignored
    Attached,
}

/// A tuple of component types that can be queried
pub trait Query {
    /// Signature of this query in `pool`, or `None` if one of the component
    /// types was never registered (in which case nothing can match)
    fn signature(pool: &EntityPool) -> Option<Signature>;
}

macro_rules! impl_query {
    ($($T:ident),+) => {
        impl<$($T: Component),+> Query for ($($T,)+) {
            fn signature(pool: &EntityPool) -> Option<Signature> {
                let mut signature = Signature::EMPTY;
                $(signature.insert(pool.kind_of::<$T>()?);)+
                Some(signature)
            }
        }
    };
}

impl_query!(A);
impl_query!(A, B);
impl_query!(A, B, C);
impl_query!(A, B, C, D);
impl_query!(A, B, C, D, E);
impl_query!(A, B, C, D, E, F);

/// Lazy, finite, non-restartable sequence of matching entities
///
/// The cursor owns its snapshot and does not borrow the pool between steps,
/// so the caller may mutate the pool freely between calls to
/// [`next`](QueryCursor::next).
pub struct QueryCursor {
    ids: VecGuard<Entity>,
    position: usize,
    signature: Signature,
    filter: QueryFilter,
}

impl QueryCursor {
    pub(crate) fn new(ids: VecGuard<Entity>, signature: Signature, filter: QueryFilter) -> Self {
        QueryCursor {
            ids,
            position: 0,
            signature,
            filter,
        }
    }

    /// Advance to the next candidate that still matches in `pool`
    pub fn next(&mut self, pool: &EntityPool) -> Option<Entity> {
        while let Some(&entity) = self.ids.get(self.position) {
            self.position += 1;
            if pool.matches(entity, self.signature, self.filter) {
                return Some(entity);
            }
        }
        None
    }

    /// Number of candidates not yet examined
    pub fn remaining(&self) -> usize {
        self.ids.len() - self.position
    }

    /// Size of the snapshot taken when the query started
    pub fn snapshot_len(&self) -> usize {
        self.ids.len()
    }
}
