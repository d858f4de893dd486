//! Live views of a multiset as a map and as a set of distinct elements.
//!
//! Views borrow the multiset mutably and translate every call into a
//! multiset operation, so the cached total never drifts. Neither view can
//! insert a bare entry or element: there is no method for it.

use crate::backing::BackingMap;
use crate::cursor::EntryCursor;
use crate::error::Result;
use crate::multiset::Multiset;

/// Element -> multiplicity map over a multiset. `put` sets the absolute
/// multiplicity; putting 0 drops the element.
pub struct MapView<'a, T, M: BackingMap<T>> {
    set: &'a mut Multiset<T, M>,
}

impl<'a, T, M: BackingMap<T>> MapView<'a, T, M> {
    /// Number of keys, i.e. distinct elements.
    pub fn len(&self) -> usize {
        self.set.distinct_len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn get(&self, element: &T) -> Option<usize> {
        match self.set.multiplicity(element) {
            0 => None,
            m => Some(m),
        }
    }

    pub fn contains_key(&self, element: &T) -> bool {
        self.set.contains(element)
    }

    /// Sum of all values.
    pub fn total(&self) -> usize {
        self.set.len()
    }

    pub fn put(&mut self, element: T, multiplicity: usize) -> Result<Option<usize>> {
        let old = self.set.set_multiplicity(element, multiplicity)?;
        Ok((old > 0).then_some(old))
    }

    pub fn remove(&mut self, element: &T) -> Result<Option<usize>> {
        let old = self.set.remove_element(element)?;
        Ok((old > 0).then_some(old))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.set.clear()
    }

    pub fn iter(&self) -> M::Iter<'_> {
        self.set.entries()
    }

    pub fn keys(&self) -> impl Iterator<Item = &T> + '_ {
        self.set.distinct()
    }

    pub fn values(&self) -> impl Iterator<Item = usize> + '_ {
        self.set.entries().map(|(_, m)| m)
    }

    pub fn entry_set(&mut self) -> EntrySet<'_, T, M> {
        EntrySet {
            set: &mut *self.set,
        }
    }

    pub fn key_set(&mut self) -> SetView<'_, T, M> {
        SetView {
            set: &mut *self.set,
        }
    }

    pub fn cursor(&mut self) -> EntryCursor<'_, T, M>
    where
        T: Clone,
    {
        self.set.entry_cursor()
    }
}

/// The `(element, multiplicity)` pairs of a multiset.
pub struct EntrySet<'a, T, M: BackingMap<T>> {
    set: &'a mut Multiset<T, M>,
}

impl<'a, T, M: BackingMap<T>> EntrySet<'a, T, M> {
    pub fn len(&self) -> usize {
        self.set.distinct_len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn contains(&self, element: &T, multiplicity: usize) -> bool {
        multiplicity > 0 && self.set.multiplicity(element) == multiplicity
    }

    pub fn contains_all<'e, I>(&self, entries: I) -> bool
    where
        I: IntoIterator<Item = (&'e T, usize)>,
        T: 'e,
    {
        entries
            .into_iter()
            .all(|(element, m)| self.contains(element, m))
    }

    /// Drop `element` only if its multiplicity is exactly `multiplicity`.
    pub fn remove(&mut self, element: &T, multiplicity: usize) -> Result<bool> {
        if !self.contains(element, multiplicity) {
            return Ok(false);
        }
        self.set.remove_element(element)?;
        Ok(true)
    }

    pub fn retain<F>(&mut self, keep: F) -> Result<bool>
    where
        F: FnMut(&T, usize) -> bool,
    {
        self.set.retain(keep)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.set.clear()
    }

    pub fn iter(&self) -> M::Iter<'_> {
        self.set.entries()
    }

    pub fn cursor(&mut self) -> EntryCursor<'_, T, M>
    where
        T: Clone,
    {
        self.set.entry_cursor()
    }
}

/// The distinct elements of a multiset. Removing an element removes all of
/// its instances.
pub struct SetView<'a, T, M: BackingMap<T>> {
    set: &'a mut Multiset<T, M>,
}

impl<'a, T, M: BackingMap<T>> SetView<'a, T, M> {
    pub fn len(&self) -> usize {
        self.set.distinct_len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn contains(&self, element: &T) -> bool {
        self.set.contains(element)
    }

    pub fn contains_all<'e, I>(&self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        self.set.contains_all(elements)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.set.distinct()
    }

    pub fn remove(&mut self, element: &T) -> Result<bool> {
        Ok(self.set.remove_element(element)? > 0)
    }

    pub fn remove_all<'e, I>(&mut self, elements: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        self.set.remove_all_of(elements)
    }

    pub fn retain<F>(&mut self, mut keep: F) -> Result<bool>
    where
        F: FnMut(&T) -> bool,
    {
        self.set.retain(|element, _| keep(element))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.set.clear()
    }

    pub fn cursor(&mut self) -> EntryCursor<'_, T, M>
    where
        T: Clone,
    {
        self.set.entry_cursor()
    }
}

impl<T, M: BackingMap<T>> Multiset<T, M> {
    pub fn as_map(&mut self) -> MapView<'_, T, M> {
        MapView { set: self }
    }

    pub fn as_set(&mut self) -> SetView<'_, T, M> {
        SetView { set: self }
    }
}
