//! Multiset: the counting layer over a [`BackingMap`].
//!
//! The multiset owns its backing map and a cached total. Every mutator
//! computes the new multiplicity first, checks it, and then makes exactly one
//! backing-map call, so a refused change leaves both the map and the total
//! untouched.

use crate::backing::{BackingMap, ReadOnly};
use crate::checked::Checked;
use crate::error::{MultisetError, Result};
use crate::observed::{ElementCollection, Observed};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::{BitAnd, BitOr, Sub};
use hashbrown::{HashMap, HashSet};
use std::collections::hash_map::DefaultHasher;

/// A bag of elements, each carrying a positive multiplicity.
///
/// `M` is the element -> multiplicity storage; it defaults to a hashbrown
/// `HashMap`. `len()` is the sum of all multiplicities, `distinct_len()` the
/// number of distinct elements.
pub struct Multiset<T, M = HashMap<T, usize>> {
    map: M,
    len: usize,
    unmodifiable: bool,
    _element: PhantomData<T>,
}

impl<T: Eq + Hash> Multiset<T> {
    pub fn new() -> Self {
        Self::from_parts(HashMap::new(), 0, false)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(HashMap::with_capacity(capacity), 0, false)
    }

    /// The canonical empty multiset. It is unmodifiable: every mutator fails.
    pub fn empty() -> Self {
        Self::from_parts(HashMap::new(), 0, true)
    }

    /// Build from distinct elements, asking `multiplicity` for each count.
    /// A count of zero leaves the element out; a repeated element takes the
    /// count of its last occurrence.
    pub fn from_distinct<I, F>(elements: I, mut multiplicity: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> usize,
    {
        let mut result = Self::new();
        for element in elements {
            let m = multiplicity(&element);
            let previous = if m == 0 {
                result.map.remove(&element)
            } else {
                result.map.insert(element, m)
            };
            result.len = result.len - previous.unwrap_or(0) + m;
        }
        result.check_len();
        result
    }
}

impl<T: Clone + Eq + Hash> Multiset<T> {
    /// Owned, modifiable, hash-backed copy of any multiset.
    pub fn from_multiset<N: BackingMap<T>>(other: &Multiset<T, N>) -> Self {
        let mut map = HashMap::with_capacity(other.distinct_len());
        for (element, m) in other.entries() {
            map.insert(element.clone(), m);
        }
        Self::from_parts(map, other.len, false)
    }
}

impl<T, S> Multiset<T, HashMap<T, usize, S>>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::from_parts(HashMap::with_hasher(hash_builder), 0, false)
    }

    /// Infallible increment on owned hash storage. Zero is ignored.
    pub(crate) fn push_n(&mut self, element: T, n: usize) {
        if n == 0 {
            return;
        }
        *self.map.entry(element).or_insert(0) += n;
        self.len += n;
    }

    /// Collector combiner: adds the smaller multiset into the larger one and
    /// returns the larger. The result is always modifiable.
    pub fn combine(self, other: Self) -> Self {
        let (mut larger, smaller) = if self.map.len() < other.map.len() {
            (other, self)
        } else {
            (self, other)
        };
        larger.unmodifiable = false;
        for (element, m) in smaller.map {
            larger.push_n(element, m);
        }
        larger.check_len();
        larger
    }
}

impl<T, M: BackingMap<T>> Multiset<T, M> {
    pub(crate) fn from_parts(map: M, len: usize, unmodifiable: bool) -> Self {
        Self {
            map,
            len,
            unmodifiable,
            _element: PhantomData,
        }
    }

    /// Adopt `map` as storage without copying it. The total is computed once
    /// here; changing `map` behind the multiset's back afterwards is not
    /// detected.
    ///
    /// Fails with [`MultisetError::InvalidMultiplicity`] if any stored count
    /// is zero. A read-only map yields an unmodifiable multiset.
    pub fn wrap(map: M) -> Result<Self> {
        let mut len = 0usize;
        for (_, m) in map.iter() {
            if m == 0 {
                return Err(MultisetError::InvalidMultiplicity { multiplicity: m });
            }
            len += m;
        }
        let unmodifiable = map.is_read_only();
        log::debug!(
            "wrapped backing map: {} distinct, {} total, read-only={}",
            map.len(),
            len,
            unmodifiable
        );
        Ok(Self::from_parts(map, len, unmodifiable))
    }

    /// [`wrap`](Self::wrap) whatever `supplier` builds.
    pub fn wrap_with<F: FnOnce() -> M>(supplier: F) -> Result<Self> {
        Self::wrap(supplier())
    }

    /// Insert every item of `iter` into storage built by `supplier`.
    pub fn collect_into<I, F>(iter: I, supplier: F) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        F: FnOnce() -> M,
    {
        let mut result = Self::wrap_with(supplier)?;
        for element in iter {
            result.insert(element)?;
        }
        Ok(result)
    }

    pub fn backing(&self) -> &M {
        &self.map
    }

    pub fn into_backing(self) -> M {
        self.map
    }

    #[inline]
    fn ensure_modifiable(&self, operation: &'static str) -> Result<()> {
        if self.unmodifiable {
            return Err(MultisetError::Unsupported { operation });
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn check_len(&self) {
        debug_assert_eq!(
            self.len,
            self.map.iter().map(|(_, m)| m).sum::<usize>(),
            "cached len out of step with backing map"
        );
    }

    pub(crate) fn reset_len(&mut self) {
        self.len = self.map.iter().map(|(_, m)| m).sum();
    }

    /// Move `element` from `old` to `new` with one backing-map call.
    fn apply(&mut self, element: T, old: usize, new: usize) -> Result<()> {
        if old > 0 {
            return self.apply_present(&element, old, new);
        }
        if new > 0 {
            self.map.insert(element, new)?;
            self.len += new;
        }
        self.check_len();
        Ok(())
    }

    /// [`apply`](Self::apply) for an element known to be present.
    fn apply_present(&mut self, element: &T, old: usize, new: usize) -> Result<()> {
        if new == old {
            return Ok(());
        }
        if new == 0 {
            self.map.remove(element)?;
        } else {
            self.map.update(element, new)?;
        }
        self.len = self.len - old + new;
        self.check_len();
        Ok(())
    }

    // ----- queries -----

    /// Total number of elements, counting multiplicity.
    #[inline]
    pub fn len(&self) -> usize {
        self.check_len();
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct elements.
    #[inline]
    pub fn distinct_len(&self) -> usize {
        self.map.len()
    }

    /// Zero for absent elements and for elements the backing map cannot hold.
    pub fn multiplicity(&self, element: &T) -> usize {
        if !self.map.accepts(element) {
            return 0;
        }
        self.map.get(element).unwrap_or(0)
    }

    #[inline]
    pub fn contains(&self, element: &T) -> bool {
        self.multiplicity(element) > 0
    }

    /// Whether every element of `elements` is present (ignoring counts).
    pub fn contains_all<'e, I>(&self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        elements.into_iter().all(|element| self.contains(element))
    }

    pub fn is_submultiset_of<N: BackingMap<T>>(&self, other: &Multiset<T, N>) -> bool {
        if self.len > other.len {
            return false;
        }
        self.entries()
            .all(|(element, m)| m <= other.multiplicity(element))
    }

    pub fn is_unmodifiable(&self) -> bool {
        self.unmodifiable
    }

    // ----- mutation -----

    /// Add one instance of `element`, returning its new multiplicity.
    pub fn insert(&mut self, element: T) -> Result<usize> {
        self.ensure_modifiable("insert")?;
        let old = self.multiplicity(&element);
        self.apply(element, old, old + 1)?;
        Ok(old + 1)
    }

    /// Add a signed `delta` to the multiplicity of `element`.
    ///
    /// A zero delta does nothing. A negative delta larger than the present
    /// multiplicity fails with [`MultisetError::NotRemovable`].
    pub fn add(&mut self, element: T, delta: isize) -> Result<&mut Self> {
        self.ensure_modifiable("add")?;
        if delta == 0 {
            return Ok(self);
        }
        let old = self.multiplicity(&element);
        let amount = delta.unsigned_abs();
        let new = if delta > 0 {
            old + amount
        } else if amount <= old {
            old - amount
        } else {
            return Err(MultisetError::NotRemovable {
                requested: amount,
                present: old,
            });
        };
        self.apply(element, old, new)?;
        Ok(self)
    }

    /// Set the multiplicity of `element`, returning the previous one.
    /// Zero removes the element.
    pub fn set_multiplicity(&mut self, element: T, multiplicity: usize) -> Result<usize> {
        self.ensure_modifiable("set_multiplicity")?;
        let old = self.multiplicity(&element);
        if old != multiplicity {
            self.apply(element, old, multiplicity)?;
        }
        Ok(old)
    }

    /// Compare-and-set: apply `multiplicity` only if the current multiplicity
    /// equals `expected`.
    pub fn set_multiplicity_if(
        &mut self,
        element: T,
        expected: usize,
        multiplicity: usize,
    ) -> Result<bool> {
        self.ensure_modifiable("set_multiplicity")?;
        let old = self.multiplicity(&element);
        if old != expected {
            return Ok(false);
        }
        self.apply(element, old, multiplicity)?;
        Ok(true)
    }

    /// Remove one instance of `element`. False if it was not present.
    pub fn remove(&mut self, element: &T) -> Result<bool> {
        self.ensure_modifiable("remove")?;
        let old = self.multiplicity(element);
        if old == 0 {
            return Ok(false);
        }
        self.apply_present(element, old, old - 1)?;
        Ok(true)
    }

    /// Remove every instance of `element`, returning how many there were.
    pub fn remove_element(&mut self, element: &T) -> Result<usize> {
        self.ensure_modifiable("remove_element")?;
        let old = self.multiplicity(element);
        if old > 0 {
            self.apply_present(element, old, 0)?;
        }
        Ok(old)
    }

    /// Remove and return one instance of the first element in the backing
    /// map's iteration order.
    pub fn poll(&mut self) -> Result<T>
    where
        T: Clone,
    {
        self.ensure_modifiable("poll")?;
        let (element, m) = match self.map.iter().next() {
            Some((element, m)) => (element.clone(), m),
            None => return Err(MultisetError::Empty),
        };
        self.apply_present(&element, m, m - 1)?;
        Ok(element)
    }

    /// Like [`poll`](Self::poll), but hands the element to `consumer` and
    /// returns false instead of failing when empty.
    pub fn poll_with<F: FnOnce(T)>(&mut self, consumer: F) -> Result<bool>
    where
        T: Clone,
    {
        self.ensure_modifiable("poll")?;
        if self.is_empty() {
            return Ok(false);
        }
        consumer(self.poll()?);
        Ok(true)
    }

    /// Replace each present multiplicity `m` of `e` with `f(e, m)`; zero
    /// removes the element. Absent elements are not visited.
    pub fn set_multiplicities<F>(&mut self, mut f: F) -> Result<bool>
    where
        F: FnMut(&T, usize) -> usize,
    {
        self.ensure_modifiable("set_multiplicities")?;
        let mut changed = false;
        let mut len = self.len;
        self.map.retain(|element, m| {
            let new = f(element, *m);
            if new != *m {
                len = len - *m + new;
                *m = new;
                changed = true;
            }
            new != 0
        })?;
        self.len = len;
        log::trace!("set_multiplicities: changed={}, len={}", changed, len);
        self.check_len();
        Ok(changed)
    }

    /// Keep only the distinct elements for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F) -> Result<bool>
    where
        F: FnMut(&T, usize) -> bool,
    {
        self.set_multiplicities(|element, m| if keep(element, m) { m } else { 0 })
    }

    pub fn clear(&mut self) -> Result<()> {
        self.ensure_modifiable("clear")?;
        if self.len > 0 {
            self.map.clear()?;
            self.len = 0;
        }
        Ok(())
    }

    /// Add every element of `other` with its multiplicity.
    pub fn add_all<N: BackingMap<T>>(&mut self, other: &Multiset<T, N>) -> Result<bool>
    where
        T: Clone,
    {
        self.ensure_modifiable("add_all")?;
        for (element, m) in other.entries() {
            let old = self.multiplicity(element);
            self.apply(element.clone(), old, old + m)?;
        }
        Ok(!other.is_empty())
    }

    /// Drop every distinct element that is present in `other`.
    pub fn remove_all<N: BackingMap<T>>(&mut self, other: &Multiset<T, N>) -> Result<bool> {
        self.ensure_modifiable("remove_all")?;
        if other.is_empty() {
            return Ok(false);
        }
        log::trace!("remove_all: {} distinct to drop", other.distinct_len());
        self.retain(|element, _| !other.contains(element))
    }

    /// Drop every distinct element yielded by `elements`.
    pub fn remove_all_of<'e, I>(&mut self, elements: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        self.ensure_modifiable("remove_all")?;
        let mut changed = false;
        for element in elements {
            changed |= self.remove_element(element)? > 0;
        }
        Ok(changed)
    }

    /// Keep only the distinct elements that are present in `other`.
    pub fn retain_all<N: BackingMap<T>>(&mut self, other: &Multiset<T, N>) -> Result<bool> {
        self.retain(|element, _| other.contains(element))
    }

    // ----- iteration -----

    /// Every element, repeated as often as its multiplicity.
    pub fn iter(&self) -> Iter<'_, T, M> {
        Iter {
            entries: self.map.iter(),
            current: None,
            remaining: self.len,
        }
    }

    /// `(element, multiplicity)` snapshots of the distinct elements.
    pub fn entries(&self) -> M::Iter<'_> {
        self.map.iter()
    }

    pub fn distinct(&self) -> impl Iterator<Item = &T> + '_ {
        self.map.iter().map(|(element, _)| element)
    }

    pub fn for_each_entry<F: FnMut(&T, usize)>(&self, mut f: F) {
        for (element, m) in self.entries() {
            f(element, m);
        }
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    pub fn to_set(&self) -> HashSet<T>
    where
        T: Clone + Eq + Hash,
    {
        self.distinct().cloned().collect()
    }

    /// Elements with multiplicity, with the distinct entries ordered by
    /// `compare`.
    pub fn to_sorted_vec<F>(&self, mut compare: F) -> Vec<T>
    where
        T: Clone,
        F: FnMut(&(&T, usize), &(&T, usize)) -> Ordering,
    {
        let mut entries: Vec<(&T, usize)> = self.entries().collect();
        entries.sort_by(|a, b| compare(a, b));
        entries
            .into_iter()
            .flat_map(|(element, m)| core::iter::repeat(element).take(m).cloned())
            .collect()
    }

    /// Format each distinct entry with `f` and join the pieces.
    pub fn join_entries<F>(&self, mut f: F, delimiter: &str, prefix: &str, suffix: &str) -> String
    where
        F: FnMut(&T, usize) -> String,
    {
        let mut out = String::from(prefix);
        for (i, (element, m)) in self.entries().enumerate() {
            if i > 0 {
                out.push_str(delimiter);
            }
            out.push_str(&f(element, m));
        }
        out.push_str(suffix);
        out
    }

    // ----- decorators -----

    /// Consume into an unmodifiable multiset over the same storage.
    pub fn into_unmodifiable(mut self) -> Self {
        if !self.unmodifiable {
            log::debug!("multiset made unmodifiable: {} total", self.len);
            self.unmodifiable = true;
        }
        self
    }

    /// Unmodifiable view sharing this multiset's storage.
    pub fn as_unmodifiable(&self) -> Multiset<T, ReadOnly<'_, M>> {
        Multiset::from_parts(ReadOnly::new(&self.map), self.len, true)
    }

    /// Refuse every newly inserted element for which `validator` is false.
    /// Elements already present are kept as they are.
    pub fn into_checked<P>(self, validator: P) -> Multiset<T, Checked<M, P>>
    where
        P: Fn(&T) -> bool,
    {
        log::debug!("checked multiset over {} distinct", self.map.len());
        Multiset::from_parts(Checked::new(self.map, validator), self.len, self.unmodifiable)
    }
}

impl<T, M, P> Multiset<T, Checked<M, P>>
where
    M: BackingMap<T>,
    P: Fn(&T) -> bool,
{
    /// Wrap `map` behind `validator`. Existing entries are not validated.
    pub fn checked(map: M, validator: P) -> Result<Self> {
        Self::wrap(Checked::new(map, validator))
    }
}

impl<T, C> Multiset<T, Observed<T, C>>
where
    T: Eq + Hash + Clone,
    C: ElementCollection<T>,
{
    /// Count the elements of a sequence. Changes made through the multiset
    /// are projected onto the sequence, one element at a time.
    pub fn wrap_collection(collection: C) -> Self {
        let len = collection.len();
        let observed = Observed::new(collection);
        log::debug!(
            "wrapped collection: {} distinct, {} total",
            BackingMap::len(&observed),
            len
        );
        Self::from_parts(observed, len, false)
    }

    pub fn collection(&self) -> &C {
        self.map.collection()
    }
}

// ----- algebra -----

impl<T, M> Multiset<T, M>
where
    T: Clone + Eq + Hash,
    M: BackingMap<T>,
{
    /// For every element in either operand, combine the two multiplicities
    /// with `op`. Zero results are left out.
    pub fn merge<N, F>(&self, other: &Multiset<T, N>, mut op: F) -> Multiset<T>
    where
        N: BackingMap<T>,
        F: FnMut(usize, usize) -> usize,
    {
        log::trace!(
            "merge: {} and {} distinct",
            self.distinct_len(),
            other.distinct_len()
        );
        let mut result = Multiset::with_capacity(self.distinct_len().max(other.distinct_len()));
        for (element, m) in self.entries() {
            result.push_n(element.clone(), op(m, other.multiplicity(element)));
        }
        for (element, m) in other.entries() {
            if !self.contains(element) {
                result.push_n(element.clone(), op(0, m));
            }
        }
        result.check_len();
        result
    }

    /// [`merge`](Self::merge) over operands of two element types that both
    /// convert into `S`.
    pub fn merge_as<S, U, N, F>(&self, other: &Multiset<U, N>, op: F) -> Multiset<S>
    where
        S: Clone + Eq + Hash,
        T: Into<S>,
        U: Clone + Into<S>,
        N: BackingMap<U>,
        F: FnMut(usize, usize) -> usize,
    {
        let left: Multiset<S> = self
            .entries()
            .map(|(element, m)| (Into::<S>::into(element.clone()), m))
            .collect();
        let right: Multiset<S> = other
            .entries()
            .map(|(element, m)| (Into::<S>::into(element.clone()), m))
            .collect();
        left.merge(&right, op)
    }

    /// Multiplicities add.
    pub fn union<N: BackingMap<T>>(&self, other: &Multiset<T, N>) -> Multiset<T> {
        self.merge(other, |a, b| a + b)
    }

    pub fn union_as<S, U, N>(&self, other: &Multiset<U, N>) -> Multiset<S>
    where
        S: Clone + Eq + Hash,
        T: Into<S>,
        U: Clone + Into<S>,
        N: BackingMap<U>,
    {
        self.merge_as(other, |a, b| a + b)
    }

    /// Multiplicities take the minimum.
    pub fn intersect<N: BackingMap<T>>(&self, other: &Multiset<T, N>) -> Multiset<T> {
        self.merge(other, usize::min)
    }

    /// Copy of `self` without any element that is present in `other`.
    pub fn minus<N: BackingMap<T>>(&self, other: &Multiset<T, N>) -> Multiset<T> {
        let mut result = Multiset::from_multiset(self);
        if !other.is_empty() {
            result.map.retain(|element, _| !other.contains(element));
            result.reset_len();
        }
        result
    }

    /// Multiplicities of `other` taken off those of `self`, stopping at zero.
    pub fn subtract<N: BackingMap<T>>(&self, other: &Multiset<T, N>) -> Multiset<T> {
        self.merge(other, usize::saturating_sub)
    }
}

impl<'a, 'b, T, M, N> BitOr<&'b Multiset<T, N>> for &'a Multiset<T, M>
where
    T: Clone + Eq + Hash,
    M: BackingMap<T>,
    N: BackingMap<T>,
{
    type Output = Multiset<T>;

    fn bitor(self, rhs: &'b Multiset<T, N>) -> Multiset<T> {
        self.union(rhs)
    }
}

impl<'a, 'b, T, M, N> BitAnd<&'b Multiset<T, N>> for &'a Multiset<T, M>
where
    T: Clone + Eq + Hash,
    M: BackingMap<T>,
    N: BackingMap<T>,
{
    type Output = Multiset<T>;

    fn bitand(self, rhs: &'b Multiset<T, N>) -> Multiset<T> {
        self.intersect(rhs)
    }
}

impl<'a, 'b, T, M, N> Sub<&'b Multiset<T, N>> for &'a Multiset<T, M>
where
    T: Clone + Eq + Hash,
    M: BackingMap<T>,
    N: BackingMap<T>,
{
    type Output = Multiset<T>;

    fn sub(self, rhs: &'b Multiset<T, N>) -> Multiset<T> {
        self.minus(rhs)
    }
}

// ----- iterators -----

/// Elements of a multiset, each repeated as often as its multiplicity.
pub struct Iter<'a, T: 'a, M: BackingMap<T> + 'a> {
    entries: M::Iter<'a>,
    current: Option<(&'a T, usize)>,
    remaining: usize,
}

impl<'a, T: 'a, M: BackingMap<T> + 'a> Iterator for Iter<'a, T, M> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            match self.current {
                Some((element, left)) if left > 0 => {
                    self.current = Some((element, left - 1));
                    self.remaining -= 1;
                    return Some(element);
                }
                _ => self.current = Some(self.entries.next()?),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, M: BackingMap<T> + 'a> ExactSizeIterator for Iter<'a, T, M> {}
impl<'a, T: 'a, M: BackingMap<T> + 'a> FusedIterator for Iter<'a, T, M> {}

impl<'a, T: 'a, M: BackingMap<T>> IntoIterator for &'a Multiset<T, M> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owned `(element, multiplicity)` pairs.
impl<T, M> IntoIterator for Multiset<T, M>
where
    M: BackingMap<T> + IntoIterator<Item = (T, usize)>,
{
    type Item = (T, usize);
    type IntoIter = M::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

// ----- construction from iterators -----

impl<T, S> FromIterator<T> for Multiset<T, HashMap<T, usize, S>>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut result = Self::with_hasher(S::default());
        for element in iter {
            result.push_n(element, 1);
        }
        result
    }
}

/// Pairs with the same element add up; zero counts are skipped.
impl<T, S> FromIterator<(T, usize)> for Multiset<T, HashMap<T, usize, S>>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (T, usize)>>(iter: I) -> Self {
        let mut result = Self::with_hasher(S::default());
        for (element, m) in iter {
            result.push_n(element, m);
        }
        result
    }
}

/// # Panics
///
/// Panics if an insert is refused (unmodifiable multiset, rejected element).
/// Use [`Multiset::insert`] to handle those cases.
impl<T, M: BackingMap<T>> Extend<T> for Multiset<T, M> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            if let Err(err) = self.insert(element) {
                panic!("cannot extend multiset: {err}");
            }
        }
    }
}

// ----- std traits -----

impl<T, M: BackingMap<T> + Default> Default for Multiset<T, M> {
    fn default() -> Self {
        Self::from_parts(M::default(), 0, false)
    }
}

impl<T, M: BackingMap<T> + Clone> Clone for Multiset<T, M> {
    fn clone(&self) -> Self {
        Self::from_parts(self.map.clone(), self.len, self.map.is_read_only())
    }
}

/// Equal when both hold the same elements with the same multiplicities,
/// whatever the backing maps.
impl<T, M, N> PartialEq<Multiset<T, N>> for Multiset<T, M>
where
    M: BackingMap<T>,
    N: BackingMap<T>,
{
    fn eq(&self, other: &Multiset<T, N>) -> bool {
        self.len == other.len
            && self.map.len() == other.map.len()
            && self
                .entries()
                .all(|(element, m)| other.multiplicity(element) == m)
    }
}

impl<T, M: BackingMap<T>> Eq for Multiset<T, M> {}

/// `len XOR` an order-independent sum of per-entry hashes, so that equal
/// multisets hash alike whatever the iteration order of their storage.
impl<T: Hash, M: BackingMap<T>> Hash for Multiset<T, M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let entries = self.entries().fold(0u64, |acc, (element, m)| {
            let mut h = DefaultHasher::new();
            element.hash(&mut h);
            m.hash(&mut h);
            acc.wrapping_add(h.finish())
        });
        state.write_u64(self.len as u64 ^ entries);
    }
}

impl<T: fmt::Debug, M: BackingMap<T>> fmt::Debug for Multiset<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

/// `[a, a, b]`
impl<T: fmt::Display, M: BackingMap<T>> fmt::Display for Multiset<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, element) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{element}")?;
        }
        f.write_str("]")
    }
}
