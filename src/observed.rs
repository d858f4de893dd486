//! Observed: backs a multiset with a plain element collection.
//!
//! A sequence such as `Vec<T>` has no per-element count, so the adapter keeps
//! a count index beside it and projects every multiplicity change onto the
//! collection, one element at a time: raising a count by `n` appends `n`
//! clones, lowering it removes `n` equal elements, dropping an element
//! removes every equal one. After any change made through the multiset the
//! index and the collection agree on every multiplicity.
//!
//! Only sequence types implement [`ElementCollection`]; set-like and
//! multiset-like containers cannot be wrapped since their own duplicate
//! handling would contradict the projected counts.

use crate::backing::{BackingMap, Counts};
use crate::error::Result;
use core::hash::Hash;
use hashbrown::hash_map::{self, HashMap};
use std::collections::VecDeque;

/// A sequence of elements that may contain duplicates.
pub trait ElementCollection<T> {
    type Elements<'a>: Iterator<Item = &'a T>
    where
        Self: 'a,
        T: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn elements(&self) -> Self::Elements<'_>;

    fn push_element(&mut self, element: T);

    /// Remove one element equal to `element`; false if none was found.
    fn remove_one(&mut self, element: &T) -> bool;

    /// Remove every element equal to `element`, returning how many went.
    fn remove_every(&mut self, element: &T) -> usize;

    fn clear_elements(&mut self);
}

impl<T: PartialEq> ElementCollection<T> for Vec<T> {
    type Elements<'a>
        = core::slice::Iter<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn elements(&self) -> Self::Elements<'_> {
        self.as_slice().iter()
    }

    fn push_element(&mut self, element: T) {
        self.push(element);
    }

    fn remove_one(&mut self, element: &T) -> bool {
        match self.iter().position(|e| e == element) {
            Some(at) => {
                self.remove(at);
                true
            }
            None => false,
        }
    }

    fn remove_every(&mut self, element: &T) -> usize {
        let before = Vec::len(self);
        self.retain(|e| e != element);
        before - Vec::len(self)
    }

    fn clear_elements(&mut self) {
        self.clear();
    }
}

impl<T: PartialEq> ElementCollection<T> for VecDeque<T> {
    type Elements<'a>
        = std::collections::vec_deque::Iter<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn elements(&self) -> Self::Elements<'_> {
        VecDeque::iter(self)
    }

    fn push_element(&mut self, element: T) {
        self.push_back(element);
    }

    fn remove_one(&mut self, element: &T) -> bool {
        match self.iter().position(|e| e == element) {
            Some(at) => self.remove(at).is_some(),
            None => false,
        }
    }

    fn remove_every(&mut self, element: &T) -> usize {
        let before = VecDeque::len(self);
        self.retain(|e| e != element);
        before - VecDeque::len(self)
    }

    fn clear_elements(&mut self) {
        self.clear();
    }
}

/// Count index kept in step with a wrapped collection.
#[derive(Clone, Debug)]
pub struct Observed<T, C> {
    counts: HashMap<T, usize>,
    collection: C,
}

impl<T, C> Observed<T, C>
where
    T: Eq + Hash + Clone,
    C: ElementCollection<T>,
{
    /// Index the current contents of `collection`.
    pub fn new(collection: C) -> Self {
        let mut counts = HashMap::new();
        for element in collection.elements() {
            *counts.entry(element.clone()).or_insert(0) += 1;
        }
        Self { counts, collection }
    }
}

impl<T, C> Observed<T, C> {
    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn into_collection(self) -> C {
        self.collection
    }
}

/// Apply one multiplicity change of `element` to the collection.
fn project<T, C>(collection: &mut C, element: &T, old: usize, new: usize)
where
    T: Clone,
    C: ElementCollection<T>,
{
    if new == 0 {
        collection.remove_every(element);
    } else if new > old {
        for _ in old..new {
            collection.push_element(element.clone());
        }
    } else {
        for _ in new..old {
            collection.remove_one(element);
        }
    }
}

impl<T, C> BackingMap<T> for Observed<T, C>
where
    T: Eq + Hash + Clone,
    C: ElementCollection<T>,
{
    type Iter<'a>
        = Counts<hash_map::Iter<'a, T, usize>>
    where
        Self: 'a,
        T: 'a;

    fn len(&self) -> usize {
        self.counts.len()
    }

    fn get(&self, element: &T) -> Option<usize> {
        self.counts.get(element).copied()
    }

    fn insert(&mut self, element: T, multiplicity: usize) -> Result<Option<usize>> {
        let old = self.counts.get(&element).copied().unwrap_or(0);
        project(&mut self.collection, &element, old, multiplicity);
        Ok(self.counts.insert(element, multiplicity))
    }

    fn update(&mut self, element: &T, multiplicity: usize) -> Result<Option<usize>> {
        let Some(m) = self.counts.get_mut(element) else {
            return Ok(None);
        };
        project(&mut self.collection, element, *m, multiplicity);
        Ok(Some(core::mem::replace(m, multiplicity)))
    }

    fn remove(&mut self, element: &T) -> Result<Option<usize>> {
        let old = self.counts.remove(element);
        if old.is_some() {
            self.collection.remove_every(element);
        }
        Ok(old)
    }

    fn clear(&mut self) -> Result<()> {
        self.counts.clear();
        self.collection.clear_elements();
        Ok(())
    }

    fn iter(&self) -> Self::Iter<'_> {
        Counts::new(self.counts.iter())
    }

    fn retain<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&T, &mut usize) -> bool,
    {
        let collection = &mut self.collection;
        self.counts.retain(|element, m| {
            let old = *m;
            let keep = f(element, m);
            let new = if keep { *m } else { 0 };
            if new != old {
                project(collection, element, old, new);
            }
            keep
        });
        Ok(())
    }
}
