//! multibag: a multiset (bag) over any element -> multiplicity map, with
//! live views, set algebra and decorators.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the counting invariant in one place and let storage,
//!   validation, sharing and locking be layered around it.
//! - Layers:
//!   - BackingMap<T>: the storage contract (lookup, insert, update,
//!     remove, retain, iterate). Implemented by hashbrown `HashMap`
//!     (default), `BTreeMap` (ordered), and the adapters `ReadOnly`
//!     (borrowed, refuses writes), `Checked` (validates new elements) and
//!     `Observed` (projects counts onto a plain `Vec`/`VecDeque`).
//!   - Multiset<T, M>: owns a backing map plus the cached total; every
//!     mutation goes through it.
//!   - Views and cursors: `MapView`, `EntrySet`, `SetView`,
//!     `ElementCursor`, `EntryCursor` borrow the multiset mutably and
//!     translate into multiset operations.
//!   - SyncCollection / SyncMap: two handles over one multiset behind one
//!     `parking_lot` mutex.
//!
//! Constraints
//! - `len() == sum of multiplicities` after every mutation; checked with
//!   `debug_assert!`, never reported as an error.
//! - No zero multiplicity is ever stored: setting 0 removes the element.
//! - A refused mutation changes nothing: the new count is computed and
//!   checked before the single backing-map call that applies it.
//! - Reads never fail. An element the backing map cannot hold
//!   (`BackingMap::accepts` is false) has multiplicity 0.
//! - Single-threaded core; the synchronized handles are the only locking.
//!
//! Unmodifiable multisets
//! - Unmodifiability is a flag. It is set for `Multiset::empty()`, by
//!   `into_unmodifiable`, and whenever the backing map reports
//!   `is_read_only()` (e.g. the `as_unmodifiable` view). Every mutator
//!   checks the flag first, so even a call that would change nothing
//!   fails with `Unsupported`.
//!
//! Overflow semantics
//! - Multiplicities and the total are `usize`. Exceeding `usize::MAX`
//!   instances is not supported; arithmetic overflow panics in debug
//!   builds like any other `usize` overflow.
//!
//! Notes and non-goals
//! - Views are created per call and hold `&mut Multiset`; there is no
//!   cached view object and no way to insert a bare map entry or a bare
//!   set element through them.
//! - `minus` drops every element present in the other operand; the
//!   count-by-count difference is `subtract`.
//! - Wrapping a map adopts it; changing it afterwards through another
//!   path desynchronizes the cached total and is not detected.
//! - Features: `serde` (map-shaped round trip, re-validated on load),
//!   `rayon` (`FromParallelIterator` / `ParallelExtend`).

pub mod backing;
pub mod checked;
pub mod cursor;
pub mod error;
pub mod multiset;
mod multiset_proptest;
pub mod observed;
#[cfg(feature = "rayon")]
mod par;
#[cfg(feature = "serde")]
mod persist;
pub mod sync;
pub mod view;

// Public surface
pub use backing::{BackingMap, ReadOnly};
pub use checked::Checked;
pub use cursor::{ElementCursor, EntryCursor};
pub use error::{MultisetError, Result};
pub use multiset::{Iter, Multiset};
pub use observed::{ElementCollection, Observed};
pub use sync::{SyncCollection, SyncMap};
pub use view::{EntrySet, MapView, SetView};

/// Build a [`Multiset`] from a list of elements, each counted once per
/// occurrence.
///
/// ```
/// let ms = multibag::multiset!['a', 'b', 'a'];
/// assert_eq!(ms.multiplicity(&'a'), 2);
/// assert_eq!(ms.len(), 3);
/// ```
#[macro_export]
macro_rules! multiset {
    () => {
        $crate::Multiset::new()
    };
    ($($element:expr),+ $(,)?) => {
        <$crate::Multiset<_> as ::core::iter::FromIterator<_>>::from_iter([$($element),+])
    };
}
