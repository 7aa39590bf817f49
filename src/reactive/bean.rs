//! Adapters that expose plain Rust state as observables.
//!
//! [`BeanProperty`] wraps a field of a shared struct behind a getter and an
//! optional setter. [`map_entry_property`] tracks one key of a shared map.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use super::binding::Binding;
use super::property::{BindError, Observable, Property, Value};

/// Failures building or writing a [`BeanProperty`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BeanError {
    #[error("bean property needs a getter or a name")]
    MissingAccessor,
    #[error("bean property `{name}` has no getter")]
    MissingGetter { name: String },
    #[error("bean property `{name}` is read-only")]
    ReadOnly { name: String },
    #[error(transparent)]
    Bind(#[from] BindError),
}

type Getter<S, T> = Rc<dyn Fn(&S) -> T>;
type Setter<S, T> = Rc<dyn Fn(&mut S, T)>;

/// A property backed by a field of a shared struct.
///
/// Writes go through the setter into the struct. The observable view only
/// learns about changes made through [`set`](Self::set) or announced with
/// [`refresh`](Self::refresh).
pub struct BeanProperty<S: 'static, T: Value> {
    bean: Rc<RefCell<S>>,
    name: String,
    getter: Getter<S, T>,
    setter: Option<Setter<S, T>>,
    value: Property<T>,
    view: Binding<T>,
}

impl<S, T: Value> Clone for BeanProperty<S, T> {
    fn clone(&self) -> Self {
        Self {
            bean: Rc::clone(&self.bean),
            name: self.name.clone(),
            getter: Rc::clone(&self.getter),
            setter: self.setter.clone(),
            value: self.value,
            view: self.view,
        }
    }
}

impl<S, T: Value> fmt::Debug for BeanProperty<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanProperty")
            .field("name", &self.name)
            .field("read_only", &self.setter.is_none())
            .finish()
    }
}

impl<S, T: Value> BeanProperty<S, T> {
    pub fn builder(bean: Rc<RefCell<S>>) -> BeanPropertyBuilder<S, T> {
        BeanPropertyBuilder {
            bean,
            name: None,
            getter: None,
            setter: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bean(&self) -> &Rc<RefCell<S>> {
        &self.bean
    }

    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }

    /// Read straight from the struct.
    pub fn get(&self) -> T {
        (self.getter)(&self.bean.borrow())
    }

    /// Write through the setter, then notify observers.
    pub fn set(&self, value: T) -> Result<(), BeanError> {
        let setter = self.setter.as_ref().ok_or_else(|| BeanError::ReadOnly {
            name: self.name.clone(),
        })?;
        setter(&mut self.bean.borrow_mut(), value);
        self.refresh()
    }

    /// Re-read the struct and notify observers if the field changed behind
    /// this property's back.
    pub fn refresh(&self) -> Result<(), BeanError> {
        let current = self.get();
        self.value.set(current)?;
        Ok(())
    }

    /// Observable view of the field.
    pub fn observable(&self) -> Binding<T> {
        self.view
    }
}

/// Builder for [`BeanProperty`]. A getter is required. Without a setter the
/// property is read-only.
pub struct BeanPropertyBuilder<S: 'static, T: Value> {
    bean: Rc<RefCell<S>>,
    name: Option<String>,
    getter: Option<Getter<S, T>>,
    setter: Option<Setter<S, T>>,
}

impl<S, T: Value> BeanPropertyBuilder<S, T> {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn getter(mut self, getter: impl Fn(&S) -> T + 'static) -> Self {
        self.getter = Some(Rc::new(getter));
        self
    }

    pub fn setter(mut self, setter: impl Fn(&mut S, T) + 'static) -> Self {
        self.setter = Some(Rc::new(setter));
        self
    }

    pub fn build(self) -> Result<BeanProperty<S, T>, BeanError> {
        let getter = match (self.getter, &self.name) {
            (Some(getter), _) => getter,
            (None, Some(name)) => return Err(BeanError::MissingGetter { name: name.clone() }),
            (None, None) => return Err(BeanError::MissingAccessor),
        };
        let name = self.name.unwrap_or_else(|| "value".to_string());
        let value = Property::new(getter(&self.bean.borrow()));
        let view = value.map(T::clone);
        tracing::debug!(%name, "bean property created");
        Ok(BeanProperty {
            bean: self.bean,
            name,
            getter,
            setter: self.setter,
            value,
            view,
        })
    }
}

/// Track `key` of a shared map. Setting the property writes the entry back,
/// and `None` removes it.
pub fn map_entry_property<K, V>(map: &Rc<RefCell<HashMap<K, V>>>, key: K) -> Property<Option<V>>
where
    K: Eq + Hash + Clone + 'static,
    V: Value,
{
    let property = Property::new(map.borrow().get(&key).cloned());
    let map = Rc::clone(map);
    property.on_change(move |value| {
        let mut map = map.borrow_mut();
        match value {
            Some(value) => {
                map.insert(key.clone(), value.clone());
            }
            None => {
                map.remove(&key);
            }
        }
    });
    property
}
