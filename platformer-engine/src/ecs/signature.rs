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
//! Component signatures
//!
//! Every registered component type is assigned a small integer kind. An
//! entity's attached and enabled component sets are bitsets over those kinds,
//! and a query matches when its signature is a subset of the entity's.

use crate::ecs::Component;
use crate::error::{EcsError, EcsResult};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

/// Maximum number of distinct component kinds a pool can register
pub const MAX_COMPONENT_KINDS: usize = 64;

/// Dense identifier assigned to a component type on registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKind(u8);

impl ComponentKind {
    /// Raw bit position of this kind
    pub fn bit(&self) -> u8 {
        self.0
    }
}

/// Bitset of component kinds
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature(u64);

impl Signature {
    /// The empty signature
    pub const EMPTY: Signature = Signature(0);

    /// Signature containing a single kind
    pub fn of(kind: ComponentKind) -> Self {
        Signature(1u64 << kind.0)
    }

    /// Add a kind
    pub fn insert(&mut self, kind: ComponentKind) {
        self.0 |= 1u64 << kind.0;
    }

    /// Remove a kind
    pub fn remove(&mut self, kind: ComponentKind) {
        self.0 &= !(1u64 << kind.0);
    }

    /// Whether the kind is present
    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.0 & (1u64 << kind.0) != 0
    }

    /// Whether every kind in `other` is also in `self`
    pub fn is_superset_of(&self, other: Signature) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no kind is present
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of kinds present
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the kinds present, lowest bit first
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> {
        let bits = self.0;
        (0..MAX_COMPONENT_KINDS as u8)
            .filter(move |bit| bits & (1u64 << bit) != 0)
            .map(ComponentKind)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#b})", self.0)
    }
}

/// Maps component types to kinds for one pool
#[derive(Debug, Default)]
pub(crate) struct KindRegistry {
    kinds: HashMap<TypeId, ComponentKind>,
    names: Vec<&'static str>,
}

impl KindRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Kind for `C`, assigning the next free bit on first use
    pub(crate) fn register<C: Component>(&mut self) -> EcsResult<(ComponentKind, bool)> {
        let type_id = TypeId::of::<C>();
        if let Some(&kind) = self.kinds.get(&type_id) {
            return Ok((kind, false));
        }
        if self.names.len() >= MAX_COMPONENT_KINDS {
            return Err(EcsError::ComponentKindLimit {
                limit: MAX_COMPONENT_KINDS,
            });
        }
        let kind = ComponentKind(self.names.len() as u8);
        self.kinds.insert(type_id, kind);
        self.names.push(std::any::type_name::<C>());
        log::trace!("registered component kind {} as bit {}", std::any::type_name::<C>(), kind.0);
        Ok((kind, true))
    }

    /// Kind for `C` if it has been registered
    pub(crate) fn kind_of<C: Component>(&self) -> Option<ComponentKind> {
        self.kinds.get(&TypeId::of::<C>()).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}
