//! Error taxonomy for multiset mutations.
//!
//! Reads never fail: an element the backing map cannot hold simply has
//! multiplicity zero. Every write-path violation is reported before any
//! state is touched.

use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MultisetError {
    /// A multiplicity of zero where a positive count is required.
    #[error("illegal multiplicity: {multiplicity}")]
    InvalidMultiplicity { multiplicity: usize },

    /// An entry was supplied without any multiplicity at all.
    #[error("element is mapped to no multiplicity")]
    MissingMultiplicity,

    #[error("multiset is empty")]
    Empty,

    /// Removing more instances of an element than are present.
    #[error("element could not be removed: {requested} requested, {present} present")]
    NotRemovable { requested: usize, present: usize },

    #[error("unsupported operation on unmodifiable multiset: {operation}")]
    Unsupported { operation: &'static str },

    /// A checked multiset's validator refused the element.
    #[error("element rejected by checked multiset")]
    Rejected,

    /// Cursor removal or update without a current element.
    #[error("no current element: call next() first")]
    IllegalState,
}

pub type Result<T, E = MultisetError> = core::result::Result<T, E>;
