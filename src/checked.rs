//! Checked: a validating backing-map adapter.
//!
//! Inserting a new element runs the validator first and is refused with
//! [`MultisetError::Rejected`] when it returns false. Only new elements are
//! checked: entries already present when the adapter is built are not
//! re-validated, and their counts can still change.

use crate::backing::BackingMap;
use crate::error::{MultisetError, Result};

pub struct Checked<M, P> {
    inner: M,
    validator: P,
}

impl<M, P> Checked<M, P> {
    pub fn new(inner: M, validator: P) -> Self {
        Self { inner, validator }
    }

    pub fn get_ref(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: Clone, P: Clone> Clone for Checked<M, P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            validator: self.validator.clone(),
        }
    }
}

impl<M: core::fmt::Debug, P> core::fmt::Debug for Checked<M, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Checked")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<T, M, P> BackingMap<T> for Checked<M, P>
where
    M: BackingMap<T>,
    P: Fn(&T) -> bool,
{
    type Iter<'a>
        = M::Iter<'a>
    where
        Self: 'a,
        T: 'a;

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get(&self, element: &T) -> Option<usize> {
        self.inner.get(element)
    }

    fn insert(&mut self, element: T, multiplicity: usize) -> Result<Option<usize>> {
        if !(self.validator)(&element) {
            return Err(MultisetError::Rejected);
        }
        self.inner.insert(element, multiplicity)
    }

    fn update(&mut self, element: &T, multiplicity: usize) -> Result<Option<usize>> {
        self.inner.update(element, multiplicity)
    }

    fn remove(&mut self, element: &T) -> Result<Option<usize>> {
        self.inner.remove(element)
    }

    fn clear(&mut self) -> Result<()> {
        self.inner.clear()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.inner.iter()
    }

    fn retain<F>(&mut self, f: F) -> Result<()>
    where
        F: FnMut(&T, &mut usize) -> bool,
    {
        self.inner.retain(f)
    }

    fn accepts(&self, element: &T) -> bool {
        self.inner.accepts(element)
    }

    fn is_read_only(&self) -> bool {
        self.inner.is_read_only()
    }
}
