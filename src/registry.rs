//! Identity-keyed storage for mesh entities.
//!
//! The registry owns every entity it stores. Code outside the registry keeps
//! the entity's [`Index`] and resolves it through [`EntityRegistry::get`] or
//! [`EntityRegistry::get_mut`] when it needs the entity back. Entities that
//! must outlive the registry can be stored as `Rc<RefCell<T>>`.

use std::cell::RefCell;
use std::collections::btree_map::{self, BTreeMap, Entry};
use std::iter::FusedIterator;
use std::rc::Rc;

use crate::error::RegistryError;
use crate::Index;

/// An entity that carries its own identity.
pub trait Entity {
    fn id(&self) -> Index;
}

// Shared handles (`Rc<RefCell<Node<DIM>>>`) key by the entity they point to.
impl<T: Entity + ?Sized> Entity for Rc<T> {
    fn id(&self) -> Index {
        (**self).id()
    }
}

impl<T: Entity> Entity for RefCell<T> {
    fn id(&self) -> Index {
        self.borrow().id()
    }
}

/// Store of entities keyed by [`Index`], iterated in ascending index order.
///
/// Insertion never overwrites: a second entity under an index already in use
/// is rejected and the registry is left untouched.
#[derive(Debug, Clone)]
pub struct EntityRegistry<T> {
    entities: BTreeMap<Index, T>,
}

impl<T> Default for EntityRegistry<T> {
    fn default() -> Self {
        Self { entities: BTreeMap::new() }
    }
}

impl<T> EntityRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entity` under its own index.
    ///
    /// Returns `false` if the index is already taken.
    pub fn insert(&mut self, entity: T) -> bool
    where
        T: Entity,
    {
        let id = entity.id();
        self.insert_with_id(id, entity)
    }

    /// Insert `entity` under `id`, which need not match the entity's own index.
    ///
    /// Returns `false` if `id` is already taken.
    pub fn insert_with_id(&mut self, id: Index, entity: T) -> bool {
        match self.entities.entry(id) {
            Entry::Occupied(_) => {
                tracing::warn!(id, "duplicate entity id, insertion rejected");
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(entity);
                tracing::debug!(id, "entity inserted");
                true
            }
        }
    }

    pub fn size(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: Index) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn get(&self, id: Index) -> Result<&T, RegistryError> {
        self.entities.get(&id).ok_or(RegistryError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: Index) -> Result<&mut T, RegistryError> {
        self.entities.get_mut(&id).ok_or(RegistryError::NotFound(id))
    }

    /// `(index, entity)` pairs in ascending index order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.entities.iter() }
    }

    /// Apply `op` to every stored entity, in ascending index order.
    pub fn for_each<F>(&mut self, mut op: F)
    where
        F: FnMut(&mut T),
    {
        for entity in self.entities.values_mut() {
            op(entity);
        }
    }
}

/// Iterator over the entries of an [`EntityRegistry`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: btree_map::Iter<'a, Index, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Index, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(id, entity)| (*id, entity))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(id, entity)| (*id, entity))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a EntityRegistry<T> {
    type Item = (Index, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
