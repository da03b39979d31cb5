// ── Record lifecycle and shared handles ──
//
// Every record handed out by the store lives behind a `Shared<T>` handle.
// The store publishes updates through the handle instead of replacing it,
// so anyone holding a handle sees the new field values and, once the row is
// retired, an `InternalState::Deleted` tag instead of a dangling object.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

/// Membership tag carried by every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InternalState {
    /// Built by a collaborator, not yet admitted by the store.
    #[default]
    New,
    /// Currently a row of its table.
    Stored,
    /// Retired by the store; the object is frozen at its last values.
    Deleted,
}

/// Access to the lifecycle tag of a record.
pub trait Lifecycle {
    fn internal_state(&self) -> InternalState;

    fn set_internal_state(&mut self, state: InternalState);
}

/// A keyed record that can live in a store table.
pub trait Record: Lifecycle + Clone + Send + Sync + 'static {
    type Key: Clone + Eq + Hash + fmt::Debug + Send + Sync;

    fn key(&self) -> Self::Key;

    /// Copy every field of `incoming` into `self`, keeping `self`'s
    /// lifecycle tag. This is how updates reach outstanding handles.
    fn merge(&mut self, incoming: Self);
}

// ── Shared handle ───────────────────────────────────────────────────

/// Handle to a store-owned record.
///
/// Cloning the handle is cheap and yields the same underlying object.
/// Reads never take a lock: [`Shared::read`] returns the values current at
/// the time of the call, and the store publishes each change as a new
/// value behind the same handle. Holding a read value never blocks the
/// store.
pub struct Shared<T>(Arc<ArcSwap<T>>);

impl<T> Shared<T> {
    pub(crate) fn new(record: T) -> Self {
        Self(Arc::new(ArcSwap::from_pointee(record)))
    }

    /// Current field values.
    pub fn read(&self) -> Arc<T> {
        self.0.load_full()
    }

    /// Whether both handles point at the same stored object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> Shared<T> {
    /// Detached copy of the current field values.
    pub fn snapshot(&self) -> T {
        T::clone(&self.0.load())
    }

    /// Apply `change` to a copy of the current values and publish it.
    ///
    /// Only called with the store mutex held, so writers never race each
    /// other and readers are never waited on.
    pub(crate) fn update<R>(&self, change: impl FnOnce(&mut T) -> R) -> R {
        let mut next = self.snapshot();
        let out = change(&mut next);
        self.0.store(Arc::new(next));
        out
    }
}

impl<T: Lifecycle> Shared<T> {
    pub fn internal_state(&self) -> InternalState {
        self.0.load().internal_state()
    }

    /// `true` once the store has retired this object.
    pub fn is_deleted(&self) -> bool {
        self.internal_state() == InternalState::Deleted
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&**self.0.load()).finish()
    }
}

impl<T: Serialize> Serialize for Shared<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.load().serialize(serializer)
    }
}

/// Implements [`Lifecycle`] for records with an `internal_state` field.
macro_rules! impl_lifecycle {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::model::lifecycle::Lifecycle for $ty {
                fn internal_state(&self) -> $crate::model::lifecycle::InternalState {
                    self.internal_state
                }

                fn set_internal_state(&mut self, state: $crate::model::lifecycle::InternalState) {
                    self.internal_state = state;
                }
            }
        )+
    };
}

pub(crate) use impl_lifecycle;
