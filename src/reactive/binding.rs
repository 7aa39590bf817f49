//! Read-only derived values.
//!
//! A [`Binding`] recomputes from its declared dependencies. It is computed
//! once on creation, invalidated when a dependency changes and recomputed on
//! the next read, or immediately when somebody listens to it.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::list::ObservableList;
use super::logic::and_all;
use super::property::{Observable, Property, Value};
use super::runtime::{self, ObservableId};

/// A read-only observable computed from other observables.
pub struct Binding<T: 'static> {
    id: ObservableId,
    _marker: PhantomData<T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Binding<T> {}

impl<T> PartialEq for Binding<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Binding<T> {}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("id", &self.id).finish()
    }
}

impl<T: Value> Binding<T> {
    /// Derive a value from `dependencies`. `compute` must read only the
    /// observables whose ids it declares.
    pub fn new(dependencies: &[ObservableId], compute: impl Fn() -> T + 'static) -> Self {
        Self {
            id: runtime::create_derived::<T>(dependencies, runtime::compute_fn(compute)),
            _marker: PhantomData,
        }
    }

    /// A binding that never changes.
    pub fn constant(value: T) -> Self {
        Self::new(&[], move || value.clone())
    }

    /// Detach from all dependencies. The binding keeps its last value and
    /// never notifies again.
    pub fn dispose(&self) {
        runtime::detach(self.id);
    }

    /// Whether the cached value is current. Derived values nobody listens to
    /// are only recomputed on read.
    pub fn is_valid(&self) -> bool {
        runtime::is_valid(self.id)
    }
}

impl<T: Value> Observable<T> for Binding<T> {
    fn id(&self) -> ObservableId {
        self.id
    }
}

/// Free-function form of [`Binding::new`].
pub fn binding<T: Value>(
    dependencies: &[ObservableId],
    compute: impl Fn() -> T + 'static,
) -> Binding<T> {
    Binding::new(dependencies, compute)
}

/// `true` while every item of `list` maps to a `true` observable.
///
/// While the list is empty the result is `default`. The per-item
/// observables are re-selected whenever the list changes, and the previous
/// conjunction is disposed.
pub fn boolean_list_binding<T, B, F>(
    list: ObservableList<T>,
    default: bool,
    item: F,
) -> Binding<bool>
where
    T: Value,
    B: Observable<bool>,
    F: Fn(&T) -> B + 'static,
{
    let facade = Property::new(default);
    let chain: Rc<Cell<Option<Binding<bool>>>> = Rc::new(Cell::new(None));

    let rebind = Rc::new(move || {
        if let Some(previous) = chain.take() {
            previous.dispose();
        }
        let items = list.get();
        if items.is_empty() {
            facade.unbind();
            if let Err(err) = facade.set(default) {
                tracing::warn!(%err, "could not reset empty list binding");
            }
            return;
        }
        tracing::trace!(items = items.len(), "rebinding list conjunction");
        let parts: Vec<B> = items.iter().map(&item).collect();
        let all = and_all(&parts);
        if let Err(err) = facade.clean_bind(&all) {
            tracing::warn!(%err, "could not rebind list binding");
        }
        chain.set(Some(all));
    });

    rebind();
    let on_list_change = rebind.clone();
    list.on_change(move |_| on_list_change());

    facade.map(|value| *value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
