//! Writable observable values and the common observable surface.
//!
//! [`Property`] is a writable value that can also be bound to mirror another
//! observable. [`Observable`] is the read side shared by properties, derived
//! [`Binding`]s and [`ObservableList`](super::ObservableList)s.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use super::binding::Binding;
use super::runtime::{self, ListenerId, ObservableId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures of property writes and bindings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("cannot set a bound property; unbind it first")]
    Bound,
    #[error("property is already bound to another observable")]
    AlreadyBound,
    #[error("a property cannot be bound to itself")]
    SelfBinding,
    #[error("binding would create a dependency cycle")]
    Cycle,
}

// ---------------------------------------------------------------------------
// Value + Observable
// ---------------------------------------------------------------------------

/// Anything an observable can hold: cloned out on read, compared on write so
/// unchanged writes stay silent.
pub trait Value: Clone + PartialEq + 'static {}

impl<T: Clone + PartialEq + 'static> Value for T {}

/// Read side of every observable handle.
///
/// Handles are `Copy` ids into the thread-local runtime; cloning one never
/// clones the value.
pub trait Observable<T: Value>: Copy + 'static {
    /// Runtime id of the underlying node. Pass ids to
    /// [`binding`](super::binding) to declare dependencies.
    fn id(&self) -> ObservableId;

    /// Current value, recomputed first if a dependency changed.
    fn get(&self) -> T {
        runtime::read(self.id())
    }

    /// Borrow the current value. `f` must not touch other observables.
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        runtime::with(self.id(), f)
    }

    /// Call `f` with the new value after every change.
    fn on_change(&self, mut f: impl FnMut(&T) + 'static) -> Subscription {
        self.add_listener(move |_, new| f(new))
    }

    /// Call `f` with `(old, new)` after every change.
    fn add_listener(&self, mut f: impl FnMut(&T, &T) + 'static) -> Subscription {
        let id = runtime::add_listener(
            self.id(),
            Box::new(move |old: &dyn Any, new: &dyn Any| {
                if let (Some(old), Some(new)) = (old.downcast_ref::<T>(), new.downcast_ref::<T>()) {
                    f(old, new);
                }
            }),
        );
        Subscription(id)
    }

    /// Derive a value from this one.
    fn map<R: Value>(&self, f: impl Fn(&T) -> R + 'static) -> Binding<R> {
        let this = *self;
        Binding::new(&[this.id()], move || f(&this.get()))
    }

    /// `true` while both observables hold equal values.
    fn is_equal_to<O: Observable<T>>(&self, other: &O) -> Binding<bool> {
        let (this, other) = (*self, *other);
        Binding::new(&[this.id(), other.id()], move || this.get() == other.get())
    }

    /// `true` while this observable holds `value`.
    fn is_equal_to_value(&self, value: T) -> Binding<bool> {
        self.map(move |current| *current == value)
    }

    /// `true` while the observables hold different values.
    fn is_not_equal_to<O: Observable<T>>(&self, other: &O) -> Binding<bool> {
        let (this, other) = (*self, *other);
        Binding::new(&[this.id(), other.id()], move || this.get() != other.get())
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Registration of a change listener. Dropping it keeps the listener alive;
/// call [`dispose`](Self::dispose) to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(ListenerId);

impl Subscription {
    /// Unregister the listener. Disposing twice is a no-op.
    pub fn dispose(self) {
        runtime::remove_listener(self.0);
    }

    pub fn is_active(&self) -> bool {
        runtime::listener_exists(self.0)
    }
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

/// A writable observable value.
///
/// ```
/// use gilt_bind::reactive::{Observable, Property};
///
/// let name = Property::new(String::from("draft"));
/// let upper = name.map(|s| s.to_uppercase());
/// name.set("final".into()).unwrap();
/// assert_eq!(upper.get(), "FINAL");
/// ```
pub struct Property<T: 'static> {
    id: ObservableId,
    _marker: PhantomData<T>,
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Property<T> {}

impl<T> PartialEq for Property<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Property<T> {}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property").field("id", &self.id).finish()
    }
}

impl<T: Value + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Value> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            id: runtime::create_source(value),
            _marker: PhantomData,
        }
    }

    /// Store `value`. Listeners fire only if it differs from the current one.
    pub fn set(&self, value: T) -> Result<(), BindError> {
        runtime::write(self.id, value)
    }

    /// Mutate the value in place.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> Result<(), BindError> {
        runtime::modify(self.id, f)
    }

    /// Mirror `source` until [`unbind`](Self::unbind). Fails if this property
    /// is already bound or if `source` depends on it.
    pub fn bind<O: Observable<T>>(&self, source: &O) -> Result<(), BindError> {
        let source = *source;
        runtime::bind(
            self.id,
            source.id(),
            runtime::compute_fn(move || source.get()),
        )
    }

    /// Stop mirroring, keeping the last value. Returns whether a binding was
    /// removed.
    pub fn unbind(&self) -> bool {
        runtime::unbind(self.id)
    }

    /// Drop any existing binding, then bind to `source`.
    pub fn clean_bind<O: Observable<T>>(&self, source: &O) -> Result<(), BindError> {
        self.unbind();
        self.bind(source)
    }

    pub fn is_bound(&self) -> bool {
        runtime::is_bound(self.id)
    }
}

impl<T: Value> Property<Option<T>> {
    /// Fill an empty property with `creator()`. A present value is kept and
    /// `creator` is not called.
    pub fn assign_if_none(&self, creator: impl FnOnce() -> T) -> Result<(), BindError> {
        if self.with(Option::is_some) {
            return Ok(());
        }
        self.set(Some(creator()))
    }
}

impl<T: Value> Observable<T> for Property<T> {
    fn id(&self) -> ObservableId {
        self.id
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// Wrap any value in a fresh [`Property`].
pub trait IntoProperty: Value + Sized {
    fn into_property(self) -> Property<Self> {
        Property::new(self)
    }
}

impl<T: Value> IntoProperty for T {}

pub fn boolean_property(value: bool) -> Property<bool> {
    Property::new(value)
}

pub fn int_property(value: i32) -> Property<i32> {
    Property::new(value)
}

pub fn long_property(value: i64) -> Property<i64> {
    Property::new(value)
}

pub fn float_property(value: f32) -> Property<f32> {
    Property::new(value)
}

pub fn double_property(value: f64) -> Property<f64> {
    Property::new(value)
}

pub fn string_property(value: impl Into<String>) -> Property<String> {
    Property::new(value.into())
}

/// A property over any other value type, `None` included.
pub fn object_property<T: Value>(value: T) -> Property<T> {
    Property::new(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
