// ── Generic keyed table ──
//
// Insertion-ordered storage for one record kind. Lives inside the store's
// single mutex, so it carries no synchronization of its own.

use std::hash::Hash;

use indexmap::{Equivalent, IndexMap};
use tracing::trace;

use crate::model::{InternalState, Record, Shared};

pub(crate) struct Table<T: Record> {
    rows: IndexMap<T::Key, Shared<T>>,
}

impl<T: Record> Table<T> {
    pub(crate) fn new() -> Self {
        Self {
            rows: IndexMap::new(),
        }
    }

    /// Insert a new row, or merge into the existing object for the same
    /// key. Returns the stored handle and whether the key was new.
    pub(crate) fn upsert(&mut self, mut record: T) -> (Shared<T>, bool) {
        let key = record.key();

        if let Some(existing) = self.rows.get(&key) {
            existing.update(|row| row.merge(record));
            trace!(?key, "merged into existing row");
            return (existing.clone(), false);
        }

        record.set_internal_state(InternalState::Stored);
        let handle = Shared::new(record);
        self.rows.insert(key.clone(), handle.clone());
        trace!(?key, "inserted row");
        (handle, true)
    }

    /// Remove a row and retire its object. Later rows keep their order.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<Shared<T>>
    where
        Q: ?Sized + Hash + Equivalent<T::Key>,
    {
        let removed = self.rows.shift_remove(key)?;
        removed.update(|row| row.set_internal_state(InternalState::Deleted));
        Some(removed)
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&Shared<T>>
    where
        Q: ?Sized + Hash + Equivalent<T::Key>,
    {
        self.rows.get(key)
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<T::Key>,
    {
        self.rows.contains_key(key)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Shared<T>> {
        self.rows.values()
    }

    /// Handles to every row, in insertion order.
    pub(crate) fn handles(&self) -> Vec<Shared<T>> {
        self.rows.values().cloned().collect()
    }

    /// Handles to the rows matching `pred`, in insertion order.
    pub(crate) fn handles_where(&self, pred: impl Fn(&T) -> bool) -> Vec<Shared<T>> {
        self.rows
            .values()
            .filter(|handle| pred(&*handle.read()))
            .cloned()
            .collect()
    }

    /// Keys of the rows matching `pred`. Collected up front so callers can
    /// delete them without mutating the table mid-iteration.
    pub(crate) fn keys_where(&self, pred: impl Fn(&T) -> bool) -> Vec<T::Key> {
        self.rows
            .iter()
            .filter(|(_, handle)| pred(&*handle.read()))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{AlertLevel, SystemOption};

    #[test]
    fn upsert_reports_new_keys() {
        let mut table: Table<AlertLevel> = Table::new();
        let (_, is_new) = table.upsert(AlertLevel::new(1, "home"));
        assert!(is_new);

        let (_, is_new) = table.upsert(AlertLevel::new(1, "away"));
        assert!(!is_new);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn upsert_merges_into_first_handle() {
        let mut table: Table<AlertLevel> = Table::new();
        let (first, _) = table.upsert(AlertLevel::new(1, "home"));
        let (second, _) = table.upsert(AlertLevel::new(1, "away"));

        assert!(first.ptr_eq(&second));
        assert_eq!(first.read().name, "away");
        assert_eq!(first.internal_state(), InternalState::Stored);
    }

    #[test]
    fn remove_retires_object_and_keeps_order() {
        let mut table: Table<SystemOption> = Table::new();
        table.upsert(SystemOption::new("a", "1"));
        table.upsert(SystemOption::new("b", "2"));
        table.upsert(SystemOption::new("c", "3"));

        let removed = table.remove("b").unwrap();
        assert!(removed.is_deleted());
        assert!(table.get("b").is_none());

        let keys: Vec<String> = table.iter().map(|h| h.read().option_type.clone()).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn remove_missing_key_is_none() {
        let mut table: Table<AlertLevel> = Table::new();
        assert!(table.remove(&9u32).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn keys_where_filters_rows() {
        let mut table: Table<AlertLevel> = Table::new();
        for level in 1..=4 {
            table.upsert(AlertLevel::new(level, format!("l{level}")));
        }
        assert_eq!(table.keys_where(|l| l.level % 2 == 0), vec![2, 4]);
        assert_eq!(table.handles_where(|l| l.level > 3).len(), 1);
    }
}
