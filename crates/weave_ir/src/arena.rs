//! Dense, id-indexed storage for the shared records of a generation model.
//!
//! Records are only ever appended, so an id handed out by [`Arena::alloc`]
//! stays valid for the life of the arena.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Trait for opaque id types used as arena keys.
pub trait ArenaId: Copy {
    /// Creates an id from a raw `u32` index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw `u32` index.
    fn as_raw(self) -> u32;
}

/// An append-only container addressed by typed ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arena<I: ArenaId, T> {
    items: Vec<T>,
    #[serde(skip)]
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Appends a record and returns its id.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_raw(self.items.len() as u32);
        self.items.push(item);
        id
    }

    /// Returns the id the next [`alloc`](Self::alloc) will hand out.
    pub fn next_id(&self) -> I {
        I::from_raw(self.items.len() as u32)
    }

    /// Returns the record with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id was not handed out by this arena.
    pub fn get(&self, id: I) -> &T {
        &self.items[id.as_raw() as usize]
    }

    /// Returns the record with the given id, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the id was not handed out by this arena.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.as_raw() as usize]
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the arena holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates `(id, &record)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_raw(i as u32), item))
    }

    /// Iterates records in allocation order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::WireId;

    #[test]
    fn alloc_hands_out_sequential_ids() {
        let mut arena: Arena<WireId, &str> = Arena::new();
        assert_eq!(arena.next_id().as_raw(), 0);
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_eq!(a.as_raw(), 0);
        assert_eq!(b.as_raw(), 1);
        assert_eq!(arena[b], "b");
        assert_eq!(arena.next_id().as_raw(), 2);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn index_mut_updates_in_place() {
        let mut arena: Arena<WireId, String> = Arena::new();
        let id = arena.alloc("clk".to_string());
        arena[id].push_str("_i");
        assert_eq!(arena.get(id), "clk_i");
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut arena: Arena<WireId, u32> = Arena::default();
        assert!(arena.is_empty());
        arena.alloc(7);
        arena.alloc(9);
        assert_eq!(serde_json::to_string(&arena).unwrap(), "[7,9]");
        let back: Arena<WireId, u32> = serde_json::from_str("[7,9]").unwrap();
        let pairs: Vec<_> = back.iter().map(|(id, v)| (id.as_raw(), *v)).collect();
        assert_eq!(pairs, vec![(0, 7), (1, 9)]);
    }
}
