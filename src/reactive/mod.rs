//! Reactive state: properties, derived bindings, observable lists.
//!
//! Single-threaded, synchronous, with a thread-local runtime. Handles are
//! `Copy` ids, so closures capture them freely.
//!
//! - [`Property`]: writable value that can be bound to another observable.
//! - [`Binding`]: read-only value derived from declared dependencies.
//! - [`ObservableList`]: ordered collection, notifies with its new contents.
//! - [`boolean_list_binding`]: conjunction over a changing list of items.
//! - [`NumberExpr`], [`BoolExpr`], [`StringExpr`]: the binding algebra.
//! - [`BeanProperty`], [`map_entry_property`]: adapters for plain state.

pub mod bean;
pub mod binding;
pub mod list;
pub mod logic;
pub mod numeric;
pub mod property;
pub(crate) mod runtime;
pub mod text;

pub use bean::{map_entry_property, BeanError, BeanProperty, BeanPropertyBuilder};
pub use binding::{binding, boolean_list_binding, Binding};
pub use list::{ListError, ObservableList};
pub use logic::{and_all, or_any, BoolExpr};
pub use numeric::{arithmetic, ArithOp, NumberExpr, Numeric, NumericKind, Promote, Promoted};
pub use property::{
    boolean_property, double_property, float_property, int_property, long_property,
    object_property, string_property, BindError, IntoProperty, Observable, Property, Subscription,
    Value,
};
pub use runtime::ObservableId;
pub use text::StringExpr;
