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
//! Component storage and management
//!
//! Components are data containers that can be attached to entities.
//! Each component kind gets its own dense storage, addressed by entity
//! through a hash index, so `get`/`insert`/`remove` are O(1) on average.

use crate::ecs::Entity;
use std::any::Any;
use std::collections::HashMap;

/// Trait that all components must implement
///
/// Components should be plain data structures without behavior.
pub trait Component: 'static + Send + Sync {}

/// Storage interface for components
pub trait ComponentStorage: Send + Sync {
    /// The component type this storage manages
    type Component: Component;

    /// Insert a component for the given entity, replacing any previous value
    fn insert(&mut self, entity: Entity, component: Self::Component);

    /// Remove a component for the given entity
    fn remove(&mut self, entity: Entity) -> Option<Self::Component>;

    /// Get a reference to a component for the given entity
    fn get(&self, entity: Entity) -> Option<&Self::Component>;

    /// Get a mutable reference to a component for the given entity
    fn get_mut(&mut self, entity: Entity) -> Option<&mut Self::Component>;

    /// Check if an entity has this component
    fn contains(&self, entity: Entity) -> bool;
}

/// Dense component storage
///
/// Components are packed contiguously in a `Vec`; a sparse map translates
/// an [`Entity`] to its row. Removal swaps the last row into the hole, so
/// the dense array never has gaps and row order is not stable across
/// removals.
///
/// # Example
///
/// ```
/// use platformer_engine::ecs::{Entity, ComponentStorage, DenseStorage};
/// use platformer_engine::game::components::Position;
///
/// let mut storage = DenseStorage::<Position>::new();
/// let entity = Entity::new(1, 0);
///
/// storage.insert(entity, Position::new(1.0, 2.0));
/// assert!(storage.contains(entity));
/// assert_eq!(storage.get(entity).unwrap().x, 1.0);
/// ```
pub struct DenseStorage<T: Component> {
    /// Mapping from Entity to dense array index
    entity_to_index: HashMap<Entity, usize>,
    /// Mapping from dense array index back to Entity (for swap_remove)
    index_to_entity: Vec<Entity>,
    components: Vec<T>,
}

impl<T: Component> DenseStorage<T> {
    /// Create a new empty storage
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new storage with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        DenseStorage {
            entity_to_index: HashMap::with_capacity(capacity),
            index_to_entity: Vec::with_capacity(capacity),
            components: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of components stored
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the storage is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Get all entities that have components in this storage, in row order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.index_to_entity.iter().copied()
    }
}

impl<T: Component> Default for DenseStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage for DenseStorage<T> {
    type Component = T;

    fn insert(&mut self, entity: Entity, component: Self::Component) {
        if let Some(&index) = self.entity_to_index.get(&entity) {
            self.components[index] = component;
        } else {
            let new_index = self.components.len();
            self.components.push(component);
            self.entity_to_index.insert(entity, new_index);
            self.index_to_entity.push(entity);

            debug_assert_eq!(self.entity_to_index.len(), self.index_to_entity.len());
            debug_assert_eq!(self.entity_to_index.len(), self.components.len());
        }
    }

    fn remove(&mut self, entity: Entity) -> Option<Self::Component> {
        let index = self.entity_to_index.remove(&entity)?;
        let component = self.components.swap_remove(index);
        self.index_to_entity.swap_remove(index);

        // The former last row now lives at `index`
        if let Some(&moved) = self.index_to_entity.get(index) {
            self.entity_to_index.insert(moved, index);
        }

        debug_assert_eq!(self.entity_to_index.len(), self.index_to_entity.len());
        debug_assert_eq!(self.entity_to_index.len(), self.components.len());

        Some(component)
    }

    fn get(&self, entity: Entity) -> Option<&Self::Component> {
        let index = self.entity_to_index.get(&entity)?;
        Some(&self.components[*index])
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut Self::Component> {
        let index = self.entity_to_index.get(&entity)?;
        Some(&mut self.components[*index])
    }

    fn contains(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }
}

/// Type-erased view of a storage, used by the pool to hold one storage per
/// component kind and to free rows during a sweep without knowing `T`.
pub(crate) trait ErasedStorage: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn remove_entity(&mut self, entity: Entity) -> bool;
}

impl<T: Component> ErasedStorage for DenseStorage<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct TestComponent {
        x: f32,
        y: f32,
    }

    impl Component for TestComponent {}

    #[test]
    fn test_dense_storage_basic() {
        let mut storage = DenseStorage::<TestComponent>::new();
        let entity = Entity::new(1, 0);

        let comp = TestComponent { x: 10.0, y: 20.0 };
        storage.insert(entity, comp);

        assert!(storage.contains(entity));
        assert_eq!(storage.get(entity).unwrap().x, 10.0);
        assert_eq!(storage.get(entity).unwrap().y, 20.0);

        let removed = storage.remove(entity);
        assert_eq!(removed, Some(comp));
        assert!(!storage.contains(entity));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_dense_storage_remove_middle_keeps_index_consistent() {
        let mut storage = DenseStorage::<TestComponent>::new();
        let e1 = Entity::new(1, 0);
        let e2 = Entity::new(2, 0);
        let e3 = Entity::new(3, 0);

        storage.insert(e1, TestComponent { x: 1.0, y: 2.0 });
        storage.insert(e2, TestComponent { x: 3.0, y: 4.0 });
        storage.insert(e3, TestComponent { x: 5.0, y: 6.0 });

        storage.remove(e2);
        assert_eq!(storage.len(), 2);
        assert!(!storage.contains(e2));

        // e3 was swapped into e2's row and must still resolve correctly
        assert_eq!(storage.get(e3).unwrap().x, 5.0);
        assert_eq!(storage.get(e1).unwrap().x, 1.0);

        storage.remove(e3);
        assert_eq!(storage.get(e1).unwrap().y, 2.0);
    }

    #[test]
    fn test_dense_storage_update_in_place() {
        let mut storage = DenseStorage::<TestComponent>::new();
        let entity = Entity::new(1, 0);

        storage.insert(entity, TestComponent { x: 1.0, y: 2.0 });
        storage.insert(entity, TestComponent { x: 10.0, y: 20.0 });
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(entity).unwrap().x, 10.0);
    }

    #[test]
    fn test_dense_storage_get_mut() {
        let mut storage = DenseStorage::<TestComponent>::new();
        let entity = Entity::new(1, 0);

        storage.insert(entity, TestComponent { x: 1.0, y: 2.0 });
        if let Some(comp) = storage.get_mut(entity) {
            comp.x = 100.0;
        }
        assert_eq!(storage.get(entity).unwrap().x, 100.0);
    }

    #[test]
    fn test_dense_storage_entity_generations() {
        let mut storage = DenseStorage::<TestComponent>::new();
        let gen0 = Entity::new(1, 0);
        let gen1 = Entity::new(1, 1);

        storage.insert(gen0, TestComponent { x: 1.0, y: 2.0 });
        assert!(storage.contains(gen0));
        assert!(!storage.contains(gen1));

        storage.remove(gen0);
        storage.insert(gen1, TestComponent { x: 10.0, y: 20.0 });
        assert!(!storage.contains(gen0));
        assert!(storage.contains(gen1));
    }

    #[test]
    fn test_dense_storage_rapid_creation_destruction() {
        let mut storage = DenseStorage::<TestComponent>::new();

        for i in 0..100 {
            storage.insert(Entity::new(i, 0), TestComponent { x: i as f32, y: 0.0 });
        }
        for i in (1..100).step_by(2) {
            storage.remove(Entity::new(i, 0));
        }
        assert_eq!(storage.len(), 50);

        for i in (0..100).step_by(2) {
            let entity = Entity::new(i, 0);
            assert_eq!(storage.get(entity).unwrap().x, i as f32);
        }
    }

    #[test]
    fn test_erased_storage_downcast_and_remove() {
        let mut storage: Box<dyn ErasedStorage> = Box::new(DenseStorage::<TestComponent>::new());
        let entity = Entity::new(4, 0);

        storage
            .as_any_mut()
            .downcast_mut::<DenseStorage<TestComponent>>()
            .unwrap()
            .insert(entity, TestComponent { x: 1.0, y: 1.0 });

        assert!(storage.remove_entity(entity));
        assert!(!storage.remove_entity(entity));
        let typed = storage.as_any().downcast_ref::<DenseStorage<TestComponent>>().unwrap();
        assert!(typed.is_empty());
    }
}
