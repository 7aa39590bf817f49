//! Observable ordered collections.

use std::fmt;
use std::marker::PhantomData;

use super::binding::Binding;
use super::property::{Observable, Value};
use super::runtime::{self, ObservableId};

/// Failures of positional list edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error("index {index} out of bounds for list of length {len}")]
    OutOfBounds { index: usize, len: usize },
}

/// An ordered collection that notifies listeners with the whole new contents
/// after each effective edit. Edits that leave the contents unchanged are
/// silent.
pub struct ObservableList<T: 'static> {
    id: ObservableId,
    _marker: PhantomData<T>,
}

impl<T> Clone for ObservableList<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ObservableList<T> {}

impl<T> PartialEq for ObservableList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for ObservableList<T> {}

impl<T> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableList").field("id", &self.id).finish()
    }
}

impl<T: Value> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Value> ObservableList<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            id: runtime::create_source(items),
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.with(Vec::is_empty)
    }

    /// Clone of the item at `index`, if any.
    pub fn get_at(&self, index: usize) -> Option<T> {
        self.with(|items| items.get(index).cloned())
    }

    pub fn first(&self) -> Option<T> {
        self.get_at(0)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.with(|items| items.contains(item))
    }

    /// Index of the first item equal to `item`.
    pub fn position(&self, item: &T) -> Option<usize> {
        self.with(|items| items.iter().position(|candidate| candidate == item))
    }

    pub fn push(&self, item: T) {
        self.edit(|items| items.push(item));
    }

    pub fn insert(&self, index: usize, item: T) -> Result<(), ListError> {
        self.edit(|items| {
            if index > items.len() {
                return Err(ListError::OutOfBounds {
                    index,
                    len: items.len(),
                });
            }
            items.insert(index, item);
            Ok(())
        })
    }

    /// Remove and return the item at `index`. Out of range yields `None`.
    pub fn remove(&self, index: usize) -> Option<T> {
        self.edit(|items| (index < items.len()).then(|| items.remove(index)))
    }

    /// Remove the first item equal to `item`. Returns whether one was found.
    pub fn remove_item(&self, item: &T) -> bool {
        self.edit(|items| match items.iter().position(|candidate| candidate == item) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        })
    }

    /// Replace the item at `index`, returning the previous one.
    pub fn set(&self, index: usize, item: T) -> Result<T, ListError> {
        self.edit(|items| {
            let len = items.len();
            items
                .get_mut(index)
                .map(|slot| std::mem::replace(slot, item))
                .ok_or(ListError::OutOfBounds { index, len })
        })
    }

    pub fn set_all(&self, items: impl IntoIterator<Item = T>) {
        let replacement: Vec<T> = items.into_iter().collect();
        self.edit(|items| *items = replacement);
    }

    pub fn clear(&self) {
        self.edit(Vec::clear);
    }

    pub fn retain(&self, keep: impl FnMut(&T) -> bool) {
        self.edit(|items| items.retain(keep));
    }

    /// Derive a value from the current contents.
    pub fn binding<R: Value>(&self, f: impl Fn(&[T]) -> R + 'static) -> Binding<R> {
        self.map(move |items| f(items))
    }

    fn edit<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        runtime::mutate(self.id, f)
    }
}

impl<T: Value> Observable<Vec<T>> for ObservableList<T> {
    fn id(&self) -> ObservableId {
        self.id
    }
}

impl<T: Value> FromIterator<T> for ObservableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
