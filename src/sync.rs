//! Coarse thread safety: a collection handle and a map handle over one
//! multiset, sharing one lock.
//!
//! Each call locks for its own duration only. Compound operations go
//! through [`SyncCollection::with`] / [`SyncMap::with`] so they run under a
//! single acquisition.

use crate::backing::BackingMap;
use crate::error::Result;
use crate::multiset::Multiset;
use crate::view::MapView;
use hashbrown::HashMap;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

type Shared<T, M> = Arc<Mutex<Multiset<T, M>>>;

/// Element-level handle of a synchronized multiset.
pub struct SyncCollection<T, M = HashMap<T, usize>> {
    shared: Shared<T, M>,
}

/// Map-level handle of a synchronized multiset.
pub struct SyncMap<T, M = HashMap<T, usize>> {
    shared: Shared<T, M>,
}

impl<T, M: BackingMap<T>> Multiset<T, M> {
    /// Move into a lock and hand back both handles.
    pub fn synchronized(self) -> (SyncCollection<T, M>, SyncMap<T, M>) {
        log::debug!(
            "synchronized multiset: {} distinct, {} total",
            self.distinct_len(),
            self.len()
        );
        let shared = Arc::new(Mutex::new(self));
        (
            SyncCollection {
                shared: Arc::clone(&shared),
            },
            SyncMap { shared },
        )
    }
}

impl<T, M> Clone for SyncCollection<T, M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, M> Clone for SyncMap<T, M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, M: BackingMap<T>> SyncCollection<T, M> {
    pub fn lock(&self) -> MutexGuard<'_, Multiset<T, M>> {
        self.shared.lock()
    }

    /// Run `f` under the lock.
    pub fn with<R, F: FnOnce(&mut Multiset<T, M>) -> R>(&self, f: F) -> R {
        let mut guard = self.shared.lock();
        f(&mut *guard)
    }

    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().is_empty()
    }

    pub fn contains(&self, element: &T) -> bool {
        self.shared.lock().contains(element)
    }

    pub fn multiplicity(&self, element: &T) -> usize {
        self.shared.lock().multiplicity(element)
    }

    pub fn insert(&self, element: T) -> Result<usize> {
        self.shared.lock().insert(element)
    }

    pub fn add(&self, element: T, delta: isize) -> Result<()> {
        self.shared.lock().add(element, delta).map(|_| ())
    }

    pub fn remove(&self, element: &T) -> Result<bool> {
        self.shared.lock().remove(element)
    }

    pub fn poll(&self) -> Result<T>
    where
        T: Clone,
    {
        self.shared.lock().poll()
    }

    pub fn clear(&self) -> Result<()> {
        self.shared.lock().clear()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.shared.lock().to_vec()
    }

    /// The map handle guarded by the same lock.
    pub fn map(&self) -> SyncMap<T, M> {
        SyncMap {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn same_lock(&self, map: &SyncMap<T, M>) -> bool {
        Arc::ptr_eq(&self.shared, &map.shared)
    }
}

impl<T, M: BackingMap<T>> SyncMap<T, M> {
    /// Run `f` on the map view under the lock.
    pub fn with<R, F: FnOnce(&mut MapView<'_, T, M>) -> R>(&self, f: F) -> R {
        let mut guard = self.shared.lock();
        f(&mut guard.as_map())
    }

    /// Number of distinct elements.
    pub fn len(&self) -> usize {
        self.shared.lock().distinct_len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().is_empty()
    }

    pub fn get(&self, element: &T) -> Option<usize> {
        self.with(|map| map.get(element))
    }

    pub fn contains_key(&self, element: &T) -> bool {
        self.shared.lock().contains(element)
    }

    pub fn put(&self, element: T, multiplicity: usize) -> Result<Option<usize>> {
        self.with(|map| map.put(element, multiplicity))
    }

    pub fn remove(&self, element: &T) -> Result<Option<usize>> {
        self.with(|map| map.remove(element))
    }

    pub fn keys(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.shared.lock().distinct().cloned().collect()
    }

    /// The collection handle guarded by the same lock.
    pub fn collection(&self) -> SyncCollection<T, M> {
        SyncCollection {
            shared: Arc::clone(&self.shared),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handles_share_one_lock_and_state() {
        let (set, map) = Multiset::<&str>::new().synchronized();
        assert!(set.same_lock(&map));
        assert!(map.collection().same_lock(&set.map()));
        set.insert("a").unwrap();
        set.insert("a").unwrap();
        assert_eq!(map.get(&"a"), Some(2));
        assert_eq!(map.put("b", 3), Ok(None));
        assert_eq!(set.len(), 5);
        assert_eq!(map.len(), 2);
    }

    /// Invariant: concurrent inserts through clones lose no update.
    #[test]
    fn concurrent_inserts_are_serialized() {
        let (set, map) = Multiset::<u32>::new().synchronized();
        let workers: Vec<_> = (0..4)
            .map(|t| {
                let set = set.clone();
                thread::spawn(move || {
                    for i in 0..250 {
                        set.insert((t * 250 + i) % 10).unwrap();
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        assert_eq!(set.len(), 1000);
        assert_eq!(map.get(&7), Some(100));
        let total = map.with(|view| view.values().sum::<usize>());
        assert_eq!(total, 1000);
    }
}
