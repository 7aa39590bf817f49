//! Thread-local reactive runtime: node arena, invalidation, notification.
//!
//! Every observable value lives in a slot of the [`Runtime`] arena and is
//! addressed by a `Copy` [`ObservableId`]. Values are type-erased and downcast
//! on access. There is one runtime per thread, which matches the UI model:
//! everything observable belongs to the thread that created it.
//!
//! Propagation is invalidation based. A write marks every transitive dependent
//! invalid exactly once, then re-reads only the nodes somebody listens to.
//! Derived nodes nobody listens to stay invalid until the next read.

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};
use smallvec::{smallvec, SmallVec};

use super::property::BindError;

new_key_type! {
    /// Identifies an observable node inside the runtime.
    pub struct ObservableId;
    /// Identifies a registered change listener.
    pub struct ListenerId;
}

const MISSING_NODE: &str = "observable does not belong to this thread's runtime";
const TYPE_MISMATCH: &str = "observable type mismatch";

pub(crate) type Compute = Rc<dyn Fn() -> Box<dyn Any>>;
pub(crate) type ListenerFn = Box<dyn FnMut(&dyn Any, &dyn Any)>;

/// Erase a typed recompute function.
pub(crate) fn compute_fn<T: 'static>(f: impl Fn() -> T + 'static) -> Compute {
    Rc::new(move || Box::new(f()) as Box<dyn Any>)
}

// ---------------------------------------------------------------------------
// Value operations
// ---------------------------------------------------------------------------

/// Type-specific operations captured when a node is created, so the runtime
/// can compare and copy values it only knows as `dyn Any`.
#[derive(Clone, Copy)]
pub(crate) struct ValueOps {
    differs: fn(&dyn Any, &dyn Any) -> bool,
    duplicate: fn(&dyn Any) -> Box<dyn Any>,
}

impl ValueOps {
    pub(crate) fn of<T: Clone + PartialEq + 'static>() -> Self {
        Self {
            differs: differs::<T>,
            duplicate: duplicate::<T>,
        }
    }
}

fn differs<T: PartialEq + 'static>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a != b,
        _ => true,
    }
}

fn duplicate<T: Clone + 'static>(value: &dyn Any) -> Box<dyn Any> {
    Box::new(value.downcast_ref::<T>().expect(TYPE_MISMATCH).clone())
}

// ---------------------------------------------------------------------------
// Runtime internals
// ---------------------------------------------------------------------------

struct Node {
    value: Box<dyn Any>,
    ops: ValueOps,
    /// Recompute function for derived nodes and bound properties.
    compute: Option<Compute>,
    /// `false` while a dependency changed and the value was not re-read yet.
    valid: bool,
    dependencies: SmallVec<[ObservableId; 4]>,
    dependents: SmallVec<[ObservableId; 4]>,
    /// Registration order is dispatch order.
    listeners: Vec<ListenerId>,
    /// Source a property mirrors, if bound.
    bound_to: Option<ObservableId>,
}

struct ListenerState {
    owner: ObservableId,
    /// Taken out while the callback runs, so a listener is never re-entered
    /// and the runtime is not borrowed across user code.
    callback: Option<ListenerFn>,
}

struct Runtime {
    nodes: SlotMap<ObservableId, Node>,
    listeners: SlotMap<ListenerId, ListenerState>,
}

impl Runtime {
    fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            listeners: SlotMap::with_key(),
        }
    }
}

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

// ---------------------------------------------------------------------------
// Node creation
// ---------------------------------------------------------------------------

/// Create a plain source node holding `value`.
pub(crate) fn create_source<T: Clone + PartialEq + 'static>(value: T) -> ObservableId {
    RUNTIME.with(|rt| {
        rt.borrow_mut().nodes.insert(Node {
            value: Box::new(value),
            ops: ValueOps::of::<T>(),
            compute: None,
            valid: true,
            dependencies: SmallVec::new(),
            dependents: SmallVec::new(),
            listeners: Vec::new(),
            bound_to: None,
        })
    })
}

/// Create a derived node recomputed from `compute` whenever one of
/// `dependencies` changes. The first value is computed eagerly.
pub(crate) fn create_derived<T: Clone + PartialEq + 'static>(
    dependencies: &[ObservableId],
    compute: Compute,
) -> ObservableId {
    for &dep in dependencies {
        ensure_valid(dep);
    }
    let value = compute();
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let id = rt.nodes.insert(Node {
            value,
            ops: ValueOps::of::<T>(),
            compute: Some(compute),
            valid: true,
            dependencies: dependencies.iter().copied().collect(),
            dependents: SmallVec::new(),
            listeners: Vec::new(),
            bound_to: None,
        });
        for &dep in dependencies {
            if let Some(node) = rt.nodes.get_mut(dep) {
                node.dependents.push(id);
            }
        }
        id
    })
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Recompute `id` if it was invalidated. Declared dependencies are validated
/// first so their own invalidations keep reaching this node.
pub(crate) fn ensure_valid(id: ObservableId) {
    let pending = RUNTIME.with(|rt| {
        let rt = rt.borrow();
        match rt.nodes.get(id) {
            Some(node) if !node.valid => node
                .compute
                .clone()
                .map(|compute| (compute, node.dependencies.clone())),
            _ => None,
        }
    });
    let Some((compute, dependencies)) = pending else {
        return;
    };
    for dep in dependencies {
        ensure_valid(dep);
    }
    let value = compute();
    RUNTIME.with(|rt| {
        if let Some(node) = rt.borrow_mut().nodes.get_mut(id) {
            node.value = value;
            node.valid = true;
        }
    });
    tracing::trace!(?id, "recomputed observable");
}

/// Read a clone of the current value.
pub(crate) fn read<T: Clone + 'static>(id: ObservableId) -> T {
    with(id, T::clone)
}

/// Read by reference. `f` runs while the runtime is borrowed, so it must not
/// read or write other observables.
pub(crate) fn with<T: 'static, R>(id: ObservableId, f: impl FnOnce(&T) -> R) -> R {
    ensure_valid(id);
    RUNTIME.with(|rt| {
        let rt = rt.borrow();
        let node = rt.nodes.get(id).expect(MISSING_NODE);
        f(node.value.downcast_ref::<T>().expect(TYPE_MISMATCH))
    })
}

/// Whether the cached value of `id` is current.
pub(crate) fn is_valid(id: ObservableId) -> bool {
    RUNTIME.with(|rt| rt.borrow().nodes.get(id).is_some_and(|node| node.valid))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Replace the value of a source node and notify if it changed.
pub(crate) fn write<T: 'static>(id: ObservableId, value: T) -> Result<(), BindError> {
    let old = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let node = rt.nodes.get_mut(id).expect(MISSING_NODE);
        if node.bound_to.is_some() {
            return Err(BindError::Bound);
        }
        let value: Box<dyn Any> = Box::new(value);
        if !(node.ops.differs)(&*node.value, &*value) {
            return Ok(None);
        }
        Ok(Some(std::mem::replace(&mut node.value, value)))
    })?;
    if let Some(old) = old {
        propagate(id, old);
    }
    Ok(())
}

/// Mutate the value of a source node in place and notify if it changed.
/// `f` runs while the runtime is borrowed.
pub(crate) fn modify<T: 'static, R>(
    id: ObservableId,
    f: impl FnOnce(&mut T) -> R,
) -> Result<R, BindError> {
    if is_bound(id) {
        return Err(BindError::Bound);
    }
    Ok(mutate(id, f))
}

/// [`modify`] for nodes that can never be bound, such as lists.
pub(crate) fn mutate<T: 'static, R>(id: ObservableId, f: impl FnOnce(&mut T) -> R) -> R {
    let (result, old) = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let node = rt.nodes.get_mut(id).expect(MISSING_NODE);
        let before = (node.ops.duplicate)(&*node.value);
        let result = f(node.value.downcast_mut::<T>().expect(TYPE_MISMATCH));
        let changed = (node.ops.differs)(&*before, &*node.value);
        (result, changed.then_some(before))
    });
    if let Some(old) = old {
        propagate(id, old);
    }
    result
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// Make `target` mirror `source` through `compute`.
pub(crate) fn bind(
    target: ObservableId,
    source: ObservableId,
    compute: Compute,
) -> Result<(), BindError> {
    if target == source {
        return Err(BindError::SelfBinding);
    }
    if depends_on(source, target) {
        return Err(BindError::Cycle);
    }
    let old = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let node = rt.nodes.get_mut(target).expect(MISSING_NODE);
        if node.bound_to.is_some() {
            return Err(BindError::AlreadyBound);
        }
        node.bound_to = Some(source);
        node.compute = Some(compute);
        node.dependencies = smallvec![source];
        node.valid = false;
        let old = (node.ops.duplicate)(&*node.value);
        if let Some(src) = rt.nodes.get_mut(source) {
            src.dependents.push(target);
        }
        Ok(old)
    })?;
    propagate(target, old);
    Ok(())
}

/// Stop mirroring. The last mirrored value stays. Returns whether `target`
/// was bound.
pub(crate) fn unbind(target: ObservableId) -> bool {
    ensure_valid(target);
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let node = rt.nodes.get_mut(target).expect(MISSING_NODE);
        let Some(source) = node.bound_to.take() else {
            return false;
        };
        node.compute = None;
        node.dependencies.clear();
        node.valid = true;
        if let Some(src) = rt.nodes.get_mut(source) {
            src.dependents.retain(|d| *d != target);
        }
        true
    })
}

/// Whether `target` currently mirrors another observable.
pub(crate) fn is_bound(target: ObservableId) -> bool {
    RUNTIME.with(|rt| {
        rt.borrow()
            .nodes
            .get(target)
            .is_some_and(|node| node.bound_to.is_some())
    })
}

/// Freeze a derived node at its current value and detach it from its
/// dependencies. Listeners stay registered but never fire again.
pub(crate) fn detach(id: ObservableId) {
    ensure_valid(id);
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let Some(node) = rt.nodes.get_mut(id) else {
            return;
        };
        node.compute = None;
        node.bound_to = None;
        node.valid = true;
        let dependencies = std::mem::take(&mut node.dependencies);
        for dep in dependencies {
            if let Some(dep) = rt.nodes.get_mut(dep) {
                dep.dependents.retain(|d| *d != id);
            }
        }
    });
}

/// Whether `from` reads `target`, directly or transitively.
fn depends_on(from: ObservableId, target: ObservableId) -> bool {
    RUNTIME.with(|rt| {
        let rt = rt.borrow();
        let mut stack = vec![from];
        let mut seen = Vec::new();
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if seen.contains(&current) {
                continue;
            }
            seen.push(current);
            if let Some(node) = rt.nodes.get(current) {
                stack.extend(node.dependencies.iter().copied());
            }
        }
        false
    })
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// Register a change listener on `owner`. The node is revalidated first so
/// the next invalidation pass reaches it.
pub(crate) fn add_listener(owner: ObservableId, callback: ListenerFn) -> ListenerId {
    ensure_valid(owner);
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let id = rt.listeners.insert(ListenerState {
            owner,
            callback: Some(callback),
        });
        rt.nodes.get_mut(owner).expect(MISSING_NODE).listeners.push(id);
        id
    })
}

/// Unregister a listener. Idempotent.
pub(crate) fn remove_listener(id: ListenerId) {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        if let Some(state) = rt.listeners.remove(id) {
            if let Some(node) = rt.nodes.get_mut(state.owner) {
                node.listeners.retain(|l| *l != id);
            }
        }
    });
}

pub(crate) fn listener_exists(id: ListenerId) -> bool {
    RUNTIME.with(|rt| rt.borrow().listeners.contains_key(id))
}

// ---------------------------------------------------------------------------
// Propagation
// ---------------------------------------------------------------------------

/// Invalidate everything downstream of `root`, then deliver change
/// notifications to observed nodes. `old_root` is the value `root` held
/// before the change.
fn propagate(root: ObservableId, old_root: Box<dyn Any>) {
    let observed = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let mut observed: Vec<(ObservableId, Box<dyn Any>)> = Vec::new();
        let mut queue: VecDeque<ObservableId> = VecDeque::new();
        if let Some(node) = rt.nodes.get(root) {
            if !node.listeners.is_empty() {
                observed.push((root, old_root));
            }
            queue.extend(node.dependents.iter().copied());
        }
        while let Some(id) = queue.pop_front() {
            let Some(node) = rt.nodes.get_mut(id) else {
                continue;
            };
            // Already invalid means everything below it is too.
            if !node.valid {
                continue;
            }
            node.valid = false;
            if !node.listeners.is_empty() {
                observed.push((id, (node.ops.duplicate)(&*node.value)));
            }
            queue.extend(node.dependents.iter().copied());
        }
        observed
    });

    for (id, old) in observed {
        deliver(id, old);
    }
}

/// Re-read an observed node and fire its listeners if the value changed.
fn deliver(id: ObservableId, old: Box<dyn Any>) {
    ensure_valid(id);
    let snapshot = RUNTIME.with(|rt| {
        let rt = rt.borrow();
        let node = rt.nodes.get(id)?;
        if !(node.ops.differs)(&*old, &*node.value) {
            return None;
        }
        Some(((node.ops.duplicate)(&*node.value), node.listeners.clone()))
    });
    let Some((new, listeners)) = snapshot else {
        return;
    };
    for listener in listeners {
        call_listener(listener, &*old, &*new);
    }
}

fn call_listener(id: ListenerId, old: &dyn Any, new: &dyn Any) {
    let callback = RUNTIME.with(|rt| {
        rt.borrow_mut()
            .listeners
            .get_mut(id)
            .and_then(|state| state.callback.take())
    });
    // Disposed during this pass, or currently running further up the stack.
    let Some(mut callback) = callback else {
        return;
    };

    callback(old, new);

    RUNTIME.with(|rt| {
        if let Some(state) = rt.borrow_mut().listeners.get_mut(id) {
            state.callback = Some(callback);
        }
    });
}

// ---------------------------------------------------------------------------
// Test helper: reset the thread-local runtime between tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) fn reset_runtime() {
    RUNTIME.with(|rt| {
        *rt.borrow_mut() = Runtime::new();
    });
}

#[cfg(test)]
pub(crate) fn node_count() -> usize {
    RUNTIME.with(|rt| rt.borrow().nodes.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
