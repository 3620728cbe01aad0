use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// A fixed-size array with one `Value` per `Key`, which can only be indexed by `Key`.
///
/// The per-variable arrays of a [`crate::formula::Formula`] live in this structure, so they
/// cannot be indexed with a literal code or a clause position by accident.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct KeyedVec<Key, Value> {
    key: PhantomData<Key>,
    elements: Vec<Value>,
}

impl<Key, Value: Clone> Clone for KeyedVec<Key, Value> {
    fn clone(&self) -> Self {
        Self {
            key: PhantomData,
            elements: self.elements.clone(),
        }
    }
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        Self {
            key: PhantomData,
            elements: Vec::default(),
        }
    }
}

impl<Key: StorageKey, Value: Clone> KeyedVec<Key, Value> {
    /// One copy of `value` for each of the first `len` keys.
    pub(crate) fn filled(len: usize, value: Value) -> Self {
        Self {
            key: PhantomData,
            elements: vec![value; len],
        }
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = Key> {
        (0..self.elements.len()).map(Key::create_from_index)
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, key: Key) -> &Self::Output {
        &self.elements[key.index()]
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedVec<Key, Value> {
    fn index_mut(&mut self, key: Key) -> &mut Self::Output {
        &mut self.elements[key.index()]
    }
}

/// A key which maps onto a dense 0-based position.
pub(crate) trait StorageKey {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}
