//! Small standalone helpers: write-once cells and weak handles.

pub mod single_assign;
pub mod weak;

pub use single_assign::{
    single_assign, AssignError, SingleAssign, SyncSingleAssign, ThreadSafetyMode,
    UnsyncSingleAssign,
};
pub use weak::{weak, WeakHandle};
