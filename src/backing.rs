//! BackingMap: the element -> multiplicity storage a multiset delegates to.
//!
//! The multiset engine only needs lookup, insert, remove, retain and
//! iteration. Implementations never see a zero multiplicity: the engine
//! removes an entry instead of storing 0.

use crate::error::{MultisetError, Result};
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::{self, HashMap};
use std::collections::btree_map::{self, BTreeMap};

/// Storage collaborator of a [`Multiset`](crate::Multiset).
///
/// Mutators are fallible so that adapters (read-only, validating,
/// collection-observing) can refuse a change before anything is modified.
pub trait BackingMap<T> {
    /// Iterator over `(element, multiplicity)` pairs in the map's natural order.
    type Iter<'a>: Iterator<Item = (&'a T, usize)>
    where
        Self: 'a,
        T: 'a;

    /// Number of distinct elements.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, element: &T) -> Option<usize>;

    fn contains(&self, element: &T) -> bool {
        self.get(element).is_some()
    }

    /// Store `multiplicity` for `element`, returning the previous one.
    fn insert(&mut self, element: T, multiplicity: usize) -> Result<Option<usize>>;

    /// Overwrite the multiplicity of an element already present, returning
    /// the previous one. Absent elements are left absent (`Ok(None)`).
    fn update(&mut self, element: &T, multiplicity: usize) -> Result<Option<usize>>;

    fn remove(&mut self, element: &T) -> Result<Option<usize>>;

    fn clear(&mut self) -> Result<()>;

    fn iter(&self) -> Self::Iter<'_>;

    /// Keep the entries for which `f` returns true. `f` may rewrite the
    /// multiplicity of kept entries in place.
    fn retain<F>(&mut self, f: F) -> Result<()>
    where
        F: FnMut(&T, &mut usize) -> bool;

    /// Whether this map could ever hold `element`. Elements it cannot hold
    /// are reported absent by every read.
    fn accepts(&self, _element: &T) -> bool {
        true
    }

    /// Whether every mutator refuses to act.
    fn is_read_only(&self) -> bool {
        false
    }
}

/// Adapts a `(&T, &usize)` iterator into `(&T, usize)` pairs.
#[derive(Clone, Debug)]
pub struct Counts<I>(I);

impl<I> Counts<I> {
    pub(crate) fn new(inner: I) -> Self {
        Counts(inner)
    }
}

impl<'a, T: 'a, I> Iterator for Counts<I>
where
    I: Iterator<Item = (&'a T, &'a usize)>,
{
    type Item = (&'a T, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(element, m)| (element, *m))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T, S> BackingMap<T> for HashMap<T, usize, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    type Iter<'a>
        = Counts<hash_map::Iter<'a, T, usize>>
    where
        Self: 'a,
        T: 'a;

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn get(&self, element: &T) -> Option<usize> {
        HashMap::get(self, element).copied()
    }

    fn insert(&mut self, element: T, multiplicity: usize) -> Result<Option<usize>> {
        Ok(HashMap::insert(self, element, multiplicity))
    }

    fn update(&mut self, element: &T, multiplicity: usize) -> Result<Option<usize>> {
        Ok(HashMap::get_mut(self, element).map(|m| core::mem::replace(m, multiplicity)))
    }

    fn remove(&mut self, element: &T) -> Result<Option<usize>> {
        Ok(HashMap::remove(self, element))
    }

    fn clear(&mut self) -> Result<()> {
        HashMap::clear(self);
        Ok(())
    }

    fn iter(&self) -> Self::Iter<'_> {
        Counts::new(HashMap::iter(self))
    }

    fn retain<F>(&mut self, f: F) -> Result<()>
    where
        F: FnMut(&T, &mut usize) -> bool,
    {
        HashMap::retain(self, f);
        Ok(())
    }
}

impl<T: Ord> BackingMap<T> for BTreeMap<T, usize> {
    type Iter<'a>
        = Counts<btree_map::Iter<'a, T, usize>>
    where
        Self: 'a,
        T: 'a;

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn get(&self, element: &T) -> Option<usize> {
        BTreeMap::get(self, element).copied()
    }

    fn insert(&mut self, element: T, multiplicity: usize) -> Result<Option<usize>> {
        Ok(BTreeMap::insert(self, element, multiplicity))
    }

    fn update(&mut self, element: &T, multiplicity: usize) -> Result<Option<usize>> {
        Ok(BTreeMap::get_mut(self, element).map(|m| core::mem::replace(m, multiplicity)))
    }

    fn remove(&mut self, element: &T) -> Result<Option<usize>> {
        Ok(BTreeMap::remove(self, element))
    }

    fn clear(&mut self) -> Result<()> {
        BTreeMap::clear(self);
        Ok(())
    }

    fn iter(&self) -> Self::Iter<'_> {
        Counts::new(BTreeMap::iter(self))
    }

    fn retain<F>(&mut self, f: F) -> Result<()>
    where
        F: FnMut(&T, &mut usize) -> bool,
    {
        BTreeMap::retain(self, f);
        Ok(())
    }
}

/// Borrowed, read-only adapter. Backs unmodifiable views that share the
/// storage of another multiset.
#[derive(Debug)]
pub struct ReadOnly<'r, M> {
    inner: &'r M,
}

impl<'r, M> ReadOnly<'r, M> {
    pub fn new(inner: &'r M) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &'r M {
        self.inner
    }
}

impl<M> Clone for ReadOnly<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for ReadOnly<'_, M> {}

impl<'r, T, M> BackingMap<T> for ReadOnly<'r, M>
where
    M: BackingMap<T>,
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

    fn insert(&mut self, _element: T, _multiplicity: usize) -> Result<Option<usize>> {
        Err(MultisetError::Unsupported { operation: "insert" })
    }

    fn update(&mut self, _element: &T, _multiplicity: usize) -> Result<Option<usize>> {
        Err(MultisetError::Unsupported { operation: "update" })
    }

    fn remove(&mut self, _element: &T) -> Result<Option<usize>> {
        Err(MultisetError::Unsupported { operation: "remove" })
    }

    fn clear(&mut self) -> Result<()> {
        Err(MultisetError::Unsupported { operation: "clear" })
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.inner.iter()
    }

    fn retain<F>(&mut self, _f: F) -> Result<()>
    where
        F: FnMut(&T, &mut usize) -> bool,
    {
        Err(MultisetError::Unsupported { operation: "retain" })
    }

    fn accepts(&self, element: &T) -> bool {
        self.inner.accepts(element)
    }

    fn is_read_only(&self) -> bool {
        true
    }
}
