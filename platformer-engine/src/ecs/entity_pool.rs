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
//! Entity pool
//!
//! The pool is the central container for all ECS data: it allocates entity
//! ids, owns one dense storage per component kind, tracks which kinds are
//! attached and enabled on each entity, and answers signature queries.
//!
//! # Deferred destruction
//!
//! [`destroy`](EntityPool::destroy) only marks an entity. The entity stops
//! matching queries immediately, but its components stay readable and its
//! index stays reserved until [`sweep`](EntityPool::sweep) runs at the end of
//! the frame. This keeps query snapshots valid while callbacks spawn and
//! destroy other entities.

use crate::ecs::component::ErasedStorage;
use crate::ecs::query::{Query, QueryCursor, QueryFilter};
use crate::ecs::signature::KindRegistry;
use crate::ecs::{Component, ComponentKind, ComponentStorage, DenseStorage, Entity, LifecycleEvent, Signature};
use crate::error::{EcsError, EcsResult};
use crate::pool::{PoolConfig, PoolStats, VecPool};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Free,
    Alive,
    PendingDestroy,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    state: SlotState,
    attached: Signature,
    enabled: Signature,
}

/// Owns entities and their components
pub struct EntityPool {
    slots: Vec<Slot>,
    free: VecDeque<u32>,
    /// Live and pending entities in creation order
    order: Vec<Entity>,
    pending: Vec<Entity>,
    alive: usize,
    kinds: KindRegistry,
    /// Indexed by `ComponentKind::bit`
    storages: Vec<Box<dyn ErasedStorage>>,
    snapshots: VecPool<Entity>,
    events: Vec<LifecycleEvent>,
}

impl EntityPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create an empty pool whose query snapshots use the given buffer pool
    /// configuration
    pub fn with_config(config: PoolConfig) -> Self {
        EntityPool {
            slots: Vec::new(),
            free: VecDeque::new(),
            order: Vec::new(),
            pending: Vec::new(),
            alive: 0,
            kinds: KindRegistry::new(),
            storages: Vec::new(),
            snapshots: VecPool::with_config(config),
            events: Vec::new(),
        }
    }

    // ── Component kinds ─────────────────────────────────────────────────

    /// Register a component type, returning its kind
    ///
    /// Registration happens implicitly on the first [`set`](Self::set);
    /// calling this up front only fixes the bit order.
    pub fn register<C: Component>(&mut self) -> EcsResult<ComponentKind> {
        let (kind, fresh) = self.kinds.register::<C>()?;
        if fresh {
            debug_assert_eq!(kind.bit() as usize, self.storages.len());
            self.storages.push(Box::new(DenseStorage::<C>::new()));
        }
        Ok(kind)
    }

    /// Kind assigned to `C`, if registered
    pub fn kind_of<C: Component>(&self) -> Option<ComponentKind> {
        self.kinds.kind_of::<C>()
    }

    fn storage<C: Component>(&self) -> Option<&DenseStorage<C>> {
        let kind = self.kind_of::<C>()?;
        self.storages[kind.bit() as usize]
            .as_any()
            .downcast_ref::<DenseStorage<C>>()
    }

    fn storage_mut<C: Component>(&mut self) -> Option<&mut DenseStorage<C>> {
        let kind = self.kind_of::<C>()?;
        self.storages[kind.bit() as usize]
            .as_any_mut()
            .downcast_mut::<DenseStorage<C>>()
    }

    // ── Entity lifecycle ────────────────────────────────────────────────

    /// Create a new entity with no components
    pub fn create(&mut self) -> Entity {
        let index = match self.free.pop_front() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    state: SlotState::Free,
                    attached: Signature::EMPTY,
                    enabled: Signature::EMPTY,
                });
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.state = SlotState::Alive;
        let entity = Entity::new(index, slot.generation);

        self.order.push(entity);
        self.alive += 1;
        self.events.push(LifecycleEvent::Spawned(entity));
        log::trace!("spawned {}", entity);
        entity
    }

    /// Mark an entity for removal at the next sweep
    ///
    /// Returns `true` if the entity was alive and is now marked, `false` if
    /// it was already marked or is stale. The entity stops matching queries
    /// immediately; its components stay readable until the sweep.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        match self.slot_mut(entity) {
            Some(slot) if slot.state == SlotState::Alive => {
                slot.state = SlotState::PendingDestroy;
                self.pending.push(entity);
                self.alive -= 1;
                log::trace!("marked {} for destruction", entity);
                true
            }
            _ => false,
        }
    }

    /// Free every entity marked by [`destroy`](Self::destroy)
    ///
    /// Storage rows are released, indices are recycled with a bumped
    /// generation, and a [`LifecycleEvent::Destroyed`] is emitted per entity.
    /// Must not be called from inside a query callback.
    pub fn sweep(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }

        let pending = std::mem::take(&mut self.pending);
        for &entity in &pending {
            let index = entity.index() as usize;
            let attached = self.slots[index].attached;
            for kind in attached.kinds() {
                self.storages[kind.bit() as usize].remove_entity(entity);
            }

            let slot = &mut self.slots[index];
            slot.generation = slot.generation.wrapping_add(1);
            slot.state = SlotState::Free;
            slot.attached = Signature::EMPTY;
            slot.enabled = Signature::EMPTY;
            self.free.push_back(entity.index());
            self.events.push(LifecycleEvent::Destroyed(entity));
        }

        let slots = &self.slots;
        self.order
            .retain(|e| slots[e.index() as usize].generation == e.generation());

        log::debug!("swept {} entities, {} alive", pending.len(), self.alive);
        pending.len()
    }

    /// Whether the entity exists and is not marked for destruction
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.slot(entity)
            .map_or(false, |slot| slot.state == SlotState::Alive)
    }

    /// Whether the entity is marked and waiting for the next sweep
    pub fn is_pending_destroy(&self, entity: Entity) -> bool {
        self.slot(entity)
            .map_or(false, |slot| slot.state == SlotState::PendingDestroy)
    }

    /// Number of alive entities (excluding those pending destruction)
    pub fn len(&self) -> usize {
        self.alive
    }

    /// Whether there are no alive entities
    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// Alive entities in creation order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.order.iter().copied().filter(move |&e| self.is_alive(e))
    }

    /// Take the lifecycle events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Destroy and sweep every entity
    pub fn clear(&mut self) {
        let all: Vec<Entity> = self.entities().collect();
        for entity in all {
            self.destroy(entity);
        }
        self.sweep();
    }

    fn slot(&self, entity: Entity) -> Option<&Slot> {
        self.slots
            .get(entity.index() as usize)
            .filter(|slot| slot.generation == entity.generation() && slot.state != SlotState::Free)
    }

    fn slot_mut(&mut self, entity: Entity) -> Option<&mut Slot> {
        self.slots
            .get_mut(entity.index() as usize)
            .filter(|slot| slot.generation == entity.generation() && slot.state != SlotState::Free)
    }

    // ── Components ──────────────────────────────────────────────────────

    /// Attach (or overwrite) a component
    ///
    /// A newly attached component starts enabled; overwriting keeps the
    /// current enabled state.
    pub fn set<C: Component>(&mut self, entity: Entity, value: C) -> EcsResult<()> {
        if self.slot(entity).is_none() {
            return Err(EcsError::DeadEntity(entity));
        }
        let kind = self.register::<C>()?;

        if let Some(storage) = self.storage_mut::<C>() {
            storage.insert(entity, value);
        }
        if let Some(slot) = self.slot_mut(entity) {
            if !slot.attached.contains(kind) {
                slot.attached.insert(kind);
                slot.enabled.insert(kind);
            }
        }
        Ok(())
    }

    /// Borrow a component
    ///
    /// Fails with [`EcsError::NotFound`] when the entity does not carry `C`.
    /// Entities pending destruction are still readable.
    pub fn get<C: Component>(&self, entity: Entity) -> EcsResult<&C> {
        self.storage::<C>()
            .and_then(|storage| storage.get(entity))
            .ok_or_else(|| not_found::<C>(entity))
    }

    /// Mutably borrow a component
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> EcsResult<&mut C> {
        self.storage_mut::<C>()
            .and_then(|storage| storage.get_mut(entity))
            .ok_or_else(|| not_found::<C>(entity))
    }

    /// Whether the component is attached (enabled or not)
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        match (self.kind_of::<C>(), self.slot(entity)) {
            (Some(kind), Some(slot)) => slot.attached.contains(kind),
            _ => false,
        }
    }

    /// Detach a component, returning its value
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        let kind = self.kind_of::<C>()?;
        let slot = self.slot_mut(entity)?;
        slot.attached.remove(kind);
        slot.enabled.remove(kind);
        self.storage_mut::<C>()?.remove(entity)
    }

    /// Make an attached component visible to queries again
    pub fn enable<C: Component>(&mut self, entity: Entity) -> EcsResult<()> {
        self.set_enabled::<C>(entity, true)
    }

    /// Hide an attached component from queries without removing its data
    pub fn disable<C: Component>(&mut self, entity: Entity) -> EcsResult<()> {
        self.set_enabled::<C>(entity, false)
    }

    /// Whether the component is attached and enabled
    pub fn is_enabled<C: Component>(&self, entity: Entity) -> bool {
        match (self.kind_of::<C>(), self.slot(entity)) {
            (Some(kind), Some(slot)) => slot.enabled.contains(kind),
            _ => false,
        }
    }

    fn set_enabled<C: Component>(&mut self, entity: Entity, enabled: bool) -> EcsResult<()> {
        let kind = self.kind_of::<C>().ok_or_else(|| not_found::<C>(entity))?;
        let slot = self.slot_mut(entity).ok_or(EcsError::DeadEntity(entity))?;
        if !slot.attached.contains(kind) {
            return Err(not_found::<C>(entity));
        }
        if enabled {
            slot.enabled.insert(kind);
        } else {
            slot.enabled.remove(kind);
        }
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Start a query over attached-and-enabled components
    pub fn query<Q: Query>(&self) -> QueryCursor {
        self.snapshot::<Q>(QueryFilter::Enabled)
    }

    /// Start a query over attached components, ignoring the enabled mask
    pub fn query_attached<Q: Query>(&self) -> QueryCursor {
        self.snapshot::<Q>(QueryFilter::Attached)
    }

    fn snapshot<Q: Query>(&self, filter: QueryFilter) -> QueryCursor {
        let mut ids = self.snapshots.acquire();
        let signature = match Q::signature(self) {
            Some(signature) => {
                ids.extend(
                    self.order
                        .iter()
                        .copied()
                        .filter(|&e| self.matches(e, signature, filter)),
                );
                signature
            }
            None => Signature::EMPTY,
        };
        QueryCursor::new(ids, signature, filter)
    }

    /// Run `f` for every entity whose enabled components cover `Q`
    ///
    /// The callback gets the pool back and may create, destroy, enable or
    /// disable entities. Entities created during the call are not visited;
    /// an entity that stops matching before its turn is skipped.
    pub fn each<Q: Query>(&mut self, mut f: impl FnMut(&mut EntityPool, Entity)) {
        let mut cursor = self.query::<Q>();
        while let Some(entity) = cursor.next(self) {
            f(self, entity);
        }
    }

    /// Like [`each`](Self::each) but matching attached components
    pub fn each_attached<Q: Query>(&mut self, mut f: impl FnMut(&mut EntityPool, Entity)) {
        let mut cursor = self.query_attached::<Q>();
        while let Some(entity) = cursor.next(self) {
            f(self, entity);
        }
    }

    /// Fallible [`each`](Self::each): stops at the first error and returns it
    pub fn try_each<Q: Query>(
        &mut self,
        mut f: impl FnMut(&mut EntityPool, Entity) -> EcsResult<()>,
    ) -> EcsResult<()> {
        let mut cursor = self.query::<Q>();
        while let Some(entity) = cursor.next(self) {
            f(self, entity)?;
        }
        Ok(())
    }

    /// Whether `entity` is alive and its mask covers `signature`
    pub fn matches(&self, entity: Entity, signature: Signature, filter: QueryFilter) -> bool {
        match self.slot(entity) {
            Some(slot) if slot.state == SlotState::Alive => {
                let mask = match filter {
                    QueryFilter::Enabled => slot.enabled,
                    QueryFilter::Attached => slot.attached,
                };
                mask.is_superset_of(signature)
            }
            _ => false,
        }
    }

    /// Statistics of the snapshot buffer pool
    pub fn snapshot_stats(&self) -> PoolStats {
        self.snapshots.stats()
    }
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EntityPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityPool")
            .field("alive", &self.alive)
            .field("pending", &self.pending.len())
            .field("kinds", &self.kinds.len())
            .finish()
    }
}

fn not_found<C: Component>(entity: Entity) -> EcsError {
    EcsError::NotFound {
        entity,
        component: short_type_name::<C>(),
    }
}

fn short_type_name<C>() -> &'static str {
    let full = std::any::type_name::<C>();
    full.rsplit("::").next().unwrap_or(full)
}
