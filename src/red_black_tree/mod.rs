//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.
//!
//! A single engine, `RbTree`, implements the tree. `RedBlackMap`, `RedBlackSet` and
//! `RedBlackMultiset` are thin wrappers that differ only in their payload and in whether
//! duplicate keys are kept.
//!
//! None of the containers are internally synchronized. A tree shared between threads must be
//! protected by a lock owned by the caller.

mod map;
mod multiset;
mod node;
mod set;
mod tree;

pub use self::map::{RedBlackMap, RedBlackMapIntoIter, RedBlackMapIter, RedBlackMapIterMut};
pub use self::multiset::{RedBlackMultiset, RedBlackMultisetIntoIter, RedBlackMultisetIter};
pub use self::set::{RedBlackSet, RedBlackSetIntoIter, RedBlackSetIter};
pub use self::tree::{IntoIter, Iter, IterMut, Position, RbTree};

use std::collections::TryReserveError;
use std::error;
use std::fmt;
use std::result;

/// Decides whether a tree keeps more than one node per key.
pub trait KeyPolicy {
    const ALLOW_DUPLICATES: bool;
}

/// Policy of maps and sets: inserting an existing key leaves the tree unchanged.
#[derive(Debug)]
pub enum UniqueKeys {}

/// Policy of multisets: equal keys are kept in insertion order after any existing equal keys.
#[derive(Debug)]
pub enum DuplicateKeys {}

impl KeyPolicy for UniqueKeys {
    const ALLOW_DUPLICATES: bool = false;
}

impl KeyPolicy for DuplicateKeys {
    const ALLOW_DUPLICATES: bool = true;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    KeyNotFound,
    AllocationFailed(TryReserveError),
    InvariantViolated(String),
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Error {
        Error::AllocationFailed(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::KeyNotFound | Error::InvariantViolated(_) => None,
            Error::AllocationFailed(error) => Some(error),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
            Error::AllocationFailed(error) => write!(f, "node allocation failed: {}", error),
            Error::InvariantViolated(message) => {
                write!(f, "red black tree invariant violated: {}", message)
            },
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
