//! Cursors: iteration that can modify the multiset it walks.
//!
//! A cursor holds the multiset mutably and walks a snapshot of its distinct
//! elements taken at creation. Only the cursor can change the multiset
//! while it is alive, and it accounts for its own changes, so the snapshot
//! stays accurate.

use crate::backing::BackingMap;
use crate::error::{MultisetError, Result};
use crate::multiset::Multiset;

/// Yields every element as often as its multiplicity. [`remove`] takes away
/// one instance of the element last yielded.
///
/// [`remove`]: ElementCursor::remove
pub struct ElementCursor<'a, T, M: BackingMap<T>> {
    set: &'a mut Multiset<T, M>,
    pending: std::vec::IntoIter<(T, usize)>,
    /// Element being repeated and how many more times to yield it.
    current: Option<(T, usize)>,
    removable: bool,
}

impl<'a, T: Clone, M: BackingMap<T>> ElementCursor<'a, T, M> {
    pub(crate) fn new(set: &'a mut Multiset<T, M>) -> Self {
        let pending: Vec<(T, usize)> = set
            .entries()
            .map(|(element, m)| (element.clone(), m))
            .collect();
        Self {
            set,
            pending: pending.into_iter(),
            current: None,
            removable: false,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&T> {
        let exhausted = !matches!(self.current, Some((_, left)) if left > 0);
        if exhausted {
            self.current = self.pending.next();
        }
        let (element, left) = self.current.as_mut()?;
        *left -= 1;
        self.removable = true;
        Some(&*element)
    }

    /// Remove one instance of the element last returned by `next`.
    ///
    /// Fails with [`MultisetError::IllegalState`] before the first `next`
    /// and when called twice for the same element.
    pub fn remove(&mut self) -> Result<()> {
        if !self.removable {
            return Err(MultisetError::IllegalState);
        }
        let Some((element, _)) = self.current.as_ref() else {
            return Err(MultisetError::IllegalState);
        };
        self.set.remove(element)?;
        self.removable = false;
        Ok(())
    }
}

/// Walks the distinct elements with their live multiplicity. The current
/// entry can be rewritten with [`set_value`] or dropped with [`remove`].
///
/// [`set_value`]: EntryCursor::set_value
/// [`remove`]: EntryCursor::remove
pub struct EntryCursor<'a, T, M: BackingMap<T>> {
    set: &'a mut Multiset<T, M>,
    pending: std::vec::IntoIter<T>,
    current: Option<T>,
}

impl<'a, T: Clone, M: BackingMap<T>> EntryCursor<'a, T, M> {
    pub(crate) fn new(set: &'a mut Multiset<T, M>) -> Self {
        let pending: Vec<T> = set.distinct().cloned().collect();
        Self {
            set,
            pending: pending.into_iter(),
            current: None,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(&T, usize)> {
        self.current = self.pending.next();
        let element = self.current.as_ref()?;
        Some((element, self.set.multiplicity(element)))
    }

    /// Set the multiplicity of the current entry, returning the old one.
    ///
    /// Zero is refused with [`MultisetError::InvalidMultiplicity`]: drop the
    /// entry with [`remove`](Self::remove) instead.
    pub fn set_value(&mut self, multiplicity: usize) -> Result<usize> {
        let Some(element) = self.current.as_ref() else {
            return Err(MultisetError::IllegalState);
        };
        if multiplicity == 0 {
            return Err(MultisetError::InvalidMultiplicity { multiplicity });
        }
        if !self.set.contains(element) {
            return Err(MultisetError::IllegalState);
        }
        self.set.set_multiplicity(element.clone(), multiplicity)
    }

    /// Drop the current entry entirely, returning its multiplicity.
    pub fn remove(&mut self) -> Result<usize> {
        let Some(element) = self.current.as_ref() else {
            return Err(MultisetError::IllegalState);
        };
        if !self.set.contains(element) {
            return Err(MultisetError::IllegalState);
        }
        self.set.remove_element(element)
    }
}

impl<T: Clone, M: BackingMap<T>> Multiset<T, M> {
    /// Cursor over every element instance.
    pub fn cursor(&mut self) -> ElementCursor<'_, T, M> {
        ElementCursor::new(self)
    }

    /// Cursor over the distinct entries.
    pub fn entry_cursor(&mut self) -> EntryCursor<'_, T, M> {
        EntryCursor::new(self)
    }
}
