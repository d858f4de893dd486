//! Parallel collection. Each rayon worker folds into its own multiset and
//! the partial results meet through [`Multiset::combine`], which is
//! commutative and associative, so the split points never matter.

use crate::multiset::Multiset;
use core::hash::Hash;
use rayon::prelude::*;

impl<T: Eq + Hash + Send> FromParallelIterator<T> for Multiset<T> {
    fn from_par_iter<I>(par_iter: I) -> Self
    where
        I: IntoParallelIterator<Item = T>,
    {
        par_iter
            .into_par_iter()
            .fold(Multiset::new, |mut partial, element| {
                partial.push_n(element, 1);
                partial
            })
            .reduce(Multiset::new, Multiset::combine)
    }
}

/// # Panics
///
/// Panics on an unmodifiable multiset, as [`Extend`] does.
impl<T: Eq + Hash + Send> ParallelExtend<T> for Multiset<T> {
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = T>,
    {
        assert!(
            !self.is_unmodifiable(),
            "cannot extend multiset: unsupported operation on unmodifiable multiset: par_extend"
        );
        let collected: Multiset<T> = par_iter.into_par_iter().collect();
        let this = core::mem::take(self);
        *self = this.combine(collected);
    }
}
