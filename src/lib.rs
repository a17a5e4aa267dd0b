//! Ordered associative containers built on a single red black tree engine.
//!
//! `red_black_tree` holds the engine and the map, set and multiset built on it. `arena` is the
//! generational node allocator that the engine stores its nodes in.

mod entry;
pub mod arena;
pub mod red_black_tree;
