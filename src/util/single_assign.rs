//! Write-once cells.
//!
//! A single-assign cell starts empty, accepts exactly one value, and fails
//! loudly on a read before assignment or on a second assignment.
//! [`SyncSingleAssign`] is safe to share between threads; the first of
//! several racing writers wins. [`UnsyncSingleAssign`] is for one thread.

use std::cell::OnceCell;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    #[error("value has not been assigned yet")]
    Unassigned,
    #[error("value has already been assigned")]
    AlreadyAssigned,
}

/// How a cell created by [`single_assign`] guards concurrent access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadSafetyMode {
    #[default]
    Synchronized,
    None,
}

/// Shared interface of write-once cells.
pub trait SingleAssign<T> {
    /// The assigned value, or [`AssignError::Unassigned`].
    fn get(&self) -> Result<&T, AssignError>;

    /// Assign the value. Fails with [`AssignError::AlreadyAssigned`] and
    /// keeps the first value if one is present.
    fn set(&self, value: T) -> Result<(), AssignError>;

    fn is_initialized(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Synchronized
// ---------------------------------------------------------------------------

pub struct SyncSingleAssign<T> {
    cell: OnceLock<T>,
}

impl<T> SyncSingleAssign<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }
}

impl<T> Default for SyncSingleAssign<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SingleAssign<T> for SyncSingleAssign<T> {
    fn get(&self) -> Result<&T, AssignError> {
        self.cell.get().ok_or(AssignError::Unassigned)
    }

    fn set(&self, value: T) -> Result<(), AssignError> {
        self.cell.set(value).map_err(|_| AssignError::AlreadyAssigned)
    }

    fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for SyncSingleAssign<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SyncSingleAssign").field(&self.cell.get()).finish()
    }
}

// ---------------------------------------------------------------------------
// Unsynchronized
// ---------------------------------------------------------------------------

pub struct UnsyncSingleAssign<T> {
    cell: OnceCell<T>,
}

impl<T> UnsyncSingleAssign<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }
}

impl<T> Default for UnsyncSingleAssign<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SingleAssign<T> for UnsyncSingleAssign<T> {
    fn get(&self) -> Result<&T, AssignError> {
        self.cell.get().ok_or(AssignError::Unassigned)
    }

    fn set(&self, value: T) -> Result<(), AssignError> {
        self.cell.set(value).map_err(|_| AssignError::AlreadyAssigned)
    }

    fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for UnsyncSingleAssign<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UnsyncSingleAssign").field(&self.cell.get()).finish()
    }
}

/// Create an empty cell of the requested flavor.
pub fn single_assign<T: 'static>(mode: ThreadSafetyMode) -> Box<dyn SingleAssign<T>> {
    match mode {
        ThreadSafetyMode::Synchronized => Box::new(SyncSingleAssign::new()),
        ThreadSafetyMode::None => Box::new(UnsyncSingleAssign::new()),
    }
}
