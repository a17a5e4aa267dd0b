use crate::arena::{Handle, TypedArena};
use crate::entry::Entry;
use crate::red_black_tree::node::{Color, Node, Side};
use crate::red_black_tree::{Error, KeyPolicy, Result, UniqueKeys};
use log::{debug, trace, warn};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::mem;
use std::sync::atomic::{self, AtomicUsize};
use std::vec;

const DEFAULT_CHUNK_SIZE: usize = 64;

static NEXT_TREE_ID: AtomicUsize = AtomicUsize::new(0);

fn next_tree_id() -> usize {
    NEXT_TREE_ID.fetch_add(1, atomic::Ordering::Relaxed)
}

fn violation<V>(message: &str) -> Result<V> {
    Err(Error::InvariantViolated(String::from(message)))
}

/// A position in a `RbTree`: either a node or the end position one past the maximum.
///
/// Positions do not borrow the tree. They stay valid while other nodes are inserted or erased and
/// are invalidated only when the node they refer to is erased or the tree is cleared. Every use of
/// a position is checked against the tree it came from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Position {
    tree_id: usize,
    node: Option<Handle>,
}

impl Position {
    /// Returns `true` if this is the end position.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }
}

/// The red black tree engine shared by every ordered container in this crate.
///
/// Nodes live in a `TypedArena` owned by the tree. Children and parents are handles into that
/// arena, so the parent links never own anything and dropping the tree drops the arena in one
/// go. `P` decides whether equal keys are rejected (`UniqueKeys`) or kept (`DuplicateKeys`).
///
/// # Examples
///
/// ```
/// use ordered_collections::red_black_tree::{DuplicateKeys, RbTree};
///
/// let mut tree: RbTree<u32, (), DuplicateKeys> = RbTree::new();
/// for key in vec![5, 3, 5, 5, 1] {
///     tree.insert(key, ());
/// }
///
/// assert_eq!(tree.len(), 5);
/// assert_eq!(tree.count(&5), 3);
/// assert!(tree.check_invariants().is_ok());
/// ```
pub struct RbTree<T, U, P = UniqueKeys> {
    id: usize,
    arena: TypedArena<Node<T, U>>,
    root: Option<Handle>,
    _marker: PhantomData<P>,
}

impl<T, U, P> RbTree<T, U, P> {
    /// Constructs a new, empty tree.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty tree whose node arena grows `chunk_size` nodes at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RbTree {
            id: next_tree_id(),
            arena: TypedArena::new(chunk_size),
            root: None,
            _marker: PhantomData,
        }
    }

    fn position(&self, node: Option<Handle>) -> Position {
        Position {
            tree_id: self.id,
            node,
        }
    }

    fn check_owner(&self, position: &Position) {
        assert!(
            position.tree_id == self.id,
            "Error: position does not belong to this tree or was invalidated by `clear`.",
        );
    }

    // Returns the node of a position, panicking if the position is foreign or stale.
    fn resolve(&self, position: Position) -> Option<Handle> {
        self.check_owner(&position);
        if let Some(handle) = position.node {
            assert!(
                self.arena.get(&handle).is_some(),
                "Error: position refers to an erased node.",
            );
        }
        position.node
    }

    fn is_red(&self, link: Option<Handle>) -> bool {
        link.map_or(false, |handle| self.arena[handle].is_red())
    }

    fn side_of(&self, child: Handle, parent: Handle) -> Side {
        if self.arena[parent].left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    // Points the link that referred to `old` at `new`. Does not touch `new`'s parent link.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(old, parent);
                self.arena[parent].set_child(side, new);
            },
        }
    }

    fn transplant(&mut self, old: Handle, new: Option<Handle>) {
        let parent = self.arena[old].parent;
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.arena[new].parent = parent;
        }
    }

    // Moves `node` down towards `side`; its child on the opposite side takes its place.
    fn rotate(&mut self, node: Handle, side: Side) {
        let child = self.arena[node]
            .child(side.opposite())
            .expect("Expected rotated child node to be `Some`.");
        let middle = self.arena[child].child(side);

        self.arena[node].set_child(side.opposite(), middle);
        if let Some(middle) = middle {
            self.arena[middle].parent = Some(node);
        }

        self.transplant(node, Some(child));
        self.arena[child].set_child(side, Some(node));
        self.arena[node].parent = Some(child);
    }

    fn rotate_left(&mut self, node: Handle) {
        self.rotate(node, Side::Left);
    }

    fn rotate_right(&mut self, node: Handle) {
        self.rotate(node, Side::Right);
    }

    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(parent) = self.arena[node].parent {
            if !self.arena[parent].is_red() {
                break;
            }
            // a red node is never the root
            let grandparent = self.arena[parent]
                .parent
                .expect("Expected red node to have a parent.");
            let side = self.side_of(parent, grandparent);
            let uncle = self.arena[grandparent].child(side.opposite());

            match uncle {
                Some(uncle) if self.arena[uncle].is_red() => {
                    self.arena[parent].color = Color::Black;
                    self.arena[uncle].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    node = grandparent;
                },
                _ => {
                    let mut parent = parent;
                    if self.arena[parent].child(side.opposite()) == Some(node) {
                        match side {
                            Side::Left => self.rotate_left(parent),
                            Side::Right => self.rotate_right(parent),
                        }
                        parent = node;
                    }
                    self.arena[parent].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    match side {
                        Side::Left => self.rotate_right(grandparent),
                        Side::Right => self.rotate_left(grandparent),
                    }
                    break;
                },
            }
        }

        if let Some(root) = self.root {
            self.arena[root].color = Color::Black;
        }
    }

    // `node` is the link that carries the extra black. When it is a sentinel, `parent` locates it.
    fn remove_fixup(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        while node != self.root && !self.is_red(node) {
            let curr_parent = match parent {
                Some(curr_parent) => curr_parent,
                None => break,
            };
            let side = if self.arena[curr_parent].left == node {
                Side::Left
            } else {
                Side::Right
            };
            let mut sibling = self.arena[curr_parent]
                .child(side.opposite())
                .expect("Expected doubly black node to have a sibling.");

            if self.arena[sibling].is_red() {
                self.arena[sibling].color = Color::Black;
                self.arena[curr_parent].color = Color::Red;
                self.rotate(curr_parent, side);
                sibling = self.arena[curr_parent]
                    .child(side.opposite())
                    .expect("Expected doubly black node to have a sibling.");
            }

            let near = self.arena[sibling].child(side);
            let far = self.arena[sibling].child(side.opposite());

            if !self.is_red(near) && !self.is_red(far) {
                self.arena[sibling].color = Color::Red;
                node = Some(curr_parent);
                parent = self.arena[curr_parent].parent;
                continue;
            }

            if !self.is_red(far) {
                if let Some(near) = near {
                    self.arena[near].color = Color::Black;
                }
                self.arena[sibling].color = Color::Red;
                self.rotate(sibling, side.opposite());
                sibling = self.arena[curr_parent]
                    .child(side.opposite())
                    .expect("Expected doubly black node to have a sibling.");
            }

            self.arena[sibling].color = self.arena[curr_parent].color;
            self.arena[curr_parent].color = Color::Black;
            if let Some(far) = self.arena[sibling].child(side.opposite()) {
                self.arena[far].color = Color::Black;
            }
            self.rotate(curr_parent, side);
            node = self.root;
            break;
        }

        if let Some(node) = node {
            self.arena[node].color = Color::Black;
        }
    }

    // A node with two children is replaced by its in-order successor, which also inherits the
    // removed node's color. The successor's old slot is then the one that is physically removed,
    // so the fixup only ever deals with a node that had at most one child.
    fn remove_node(&mut self, node: Handle) -> Entry<T, U> {
        let Node { left, right, parent, color, .. } = self.arena[node];
        let (removed_color, replacement, replacement_parent) = match (left, right) {
            (None, _) => {
                self.transplant(node, right);
                (color, right, parent)
            },
            (_, None) => {
                self.transplant(node, left);
                (color, left, parent)
            },
            (Some(left), Some(right)) => {
                let successor = self.extreme(right, Side::Left);
                let successor_color = self.arena[successor].color;
                let replacement = self.arena[successor].right;
                let replacement_parent = if successor == right {
                    successor
                } else {
                    let successor_parent = self.arena[successor].parent;
                    self.transplant(successor, replacement);
                    self.arena[successor].right = Some(right);
                    self.arena[right].parent = Some(successor);
                    successor_parent.expect("Expected successor to have a parent.")
                };
                self.transplant(node, Some(successor));
                self.arena[successor].left = Some(left);
                self.arena[left].parent = Some(successor);
                self.arena[successor].color = color;
                (successor_color, replacement, Some(replacement_parent))
            },
        };

        if removed_color == Color::Black {
            self.remove_fixup(replacement, replacement_parent);
        }

        self.arena.free(&node).entry
    }

    fn extreme(&self, mut node: Handle, side: Side) -> Handle {
        while let Some(child) = self.arena[node].child(side) {
            node = child;
        }
        node
    }

    // In-order successor when `side` is `Right`, predecessor when it is `Left`.
    fn step(&self, node: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.arena[node].child(side) {
            return Some(self.extreme(child, side.opposite()));
        }

        let mut curr = node;
        while let Some(parent) = self.arena[curr].parent {
            if self.arena[parent].child(side) != Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    fn min_link(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    fn max_link(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    fn handles(&self) -> Vec<Handle> {
        let mut ret = Vec::with_capacity(self.len());
        let mut curr = self.min_link();
        while let Some(handle) = curr {
            ret.push(handle);
            curr = self.step(handle, Side::Right);
        }
        ret
    }

    /// Returns the number of entries in the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns a theoretical upper bound on the number of entries given the size of the address
    /// space. The bound is not enforced.
    pub fn max_size(&self) -> usize {
        TypedArena::<Node<T, U>>::max_len()
    }

    /// Removes every entry. All positions into the tree are invalidated.
    pub fn clear(&mut self) {
        trace!("clearing tree of {} entries", self.len());
        self.arena.clear();
        self.root = None;
        self.id = next_tree_id();
    }

    /// Exchanges the contents of two trees in constant time. Positions follow their nodes.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Returns the position of the minimum entry, or the end position if the tree is empty.
    pub fn begin(&self) -> Position {
        self.position(self.min_link())
    }

    /// Returns the end position, one past the maximum entry.
    pub fn end(&self) -> Position {
        self.position(None)
    }

    /// Returns the position after `position`. The position after the maximum entry and after the
    /// end position is the end position.
    ///
    /// # Panics
    ///
    /// Panics if `position` belongs to another tree or refers to an erased node.
    pub fn next(&self, position: Position) -> Position {
        let node = self.resolve(position);
        self.position(node.and_then(|node| self.step(node, Side::Right)))
    }

    /// Returns the position before `position`. The position before the end position is the
    /// maximum entry; the position before the minimum entry is the end position.
    ///
    /// # Panics
    ///
    /// Panics if `position` belongs to another tree or refers to an erased node.
    pub fn prev(&self, position: Position) -> Position {
        match self.resolve(position) {
            None => self.position(self.max_link()),
            Some(node) => self.position(self.step(node, Side::Left)),
        }
    }

    /// Returns the entry at `position`, or `None` for the end position or an erased node.
    ///
    /// # Panics
    ///
    /// Panics if `position` belongs to another tree.
    pub fn get_at(&self, position: Position) -> Option<(&T, &U)> {
        self.check_owner(&position);
        position
            .node
            .and_then(|node| self.arena.get(&node))
            .map(|node| node.entry.as_pair())
    }

    /// Returns the entry at `position` with a mutable value, or `None` for the end position or an
    /// erased node.
    ///
    /// # Panics
    ///
    /// Panics if `position` belongs to another tree.
    pub fn get_at_mut(&mut self, position: Position) -> Option<(&T, &mut U)> {
        self.check_owner(&position);
        match position.node {
            Some(node) => self.arena.get_mut(&node).map(|node| node.entry.as_pair_mut()),
            None => None,
        }
    }

    /// Removes the entry at `position` and returns it. Positions of other entries stay valid.
    ///
    /// # Panics
    ///
    /// Panics if `position` is the end position, belongs to another tree, or refers to an erased
    /// node.
    pub fn remove_at(&mut self, position: Position) -> (T, U) {
        let node = self
            .resolve(position)
            .expect("Error: cannot remove the end position.");
        self.remove_node(node).into_pair()
    }

    /// Returns the minimum entry.
    pub fn first(&self) -> Option<(&T, &U)> {
        self.min_link().map(|node| self.arena[node].entry.as_pair())
    }

    /// Returns the maximum entry.
    pub fn last(&self) -> Option<(&T, &U)> {
        self.max_link().map(|node| self.arena[node].entry.as_pair())
    }

    /// Returns an in-order iterator over the tree.
    pub fn iter(&self) -> Iter<'_, T, U, P> {
        Iter {
            tree: self,
            front: self.min_link(),
            back: self.max_link(),
            remaining: self.len(),
        }
    }

    /// Returns an in-order iterator over the half-open run `[start, end)`. `start` must not come
    /// after `end`.
    ///
    /// # Panics
    ///
    /// Panics if either position belongs to another tree or refers to an erased node.
    pub fn range_between(&self, start: Position, end: Position) -> Iter<'_, T, U, P> {
        let front = self.resolve(start);
        let end = self.resolve(end);
        if front.is_none() || front == end {
            return Iter {
                tree: self,
                front: None,
                back: None,
                remaining: 0,
            };
        }

        let mut remaining = 0;
        let mut curr = front;
        while let Some(node) = curr {
            if curr == end {
                break;
            }
            remaining += 1;
            curr = self.step(node, Side::Right);
        }

        let back = match end {
            None => self.max_link(),
            Some(end) => self.step(end, Side::Left),
        };
        Iter {
            tree: self,
            front,
            back,
            remaining,
        }
    }

    /// Returns an in-order iterator over the tree that yields mutable values.
    ///
    /// Every entry is ranked and collected before the first one is yielded, so creating the
    /// iterator takes O(n) time and memory.
    pub fn iter_mut(&mut self) -> IterMut<'_, T, U> {
        let chunk_size = self.arena.chunk_size();
        let mut ranks = vec![None; self.arena.capacity()];
        for (rank, handle) in self.handles().into_iter().enumerate() {
            ranks[handle.slot(chunk_size)] = Some(rank);
        }

        let mut entries = Vec::new();
        entries.resize_with(self.len(), || None);
        for (handle, node) in self.arena.iter_mut() {
            if let Some(rank) = ranks[handle.slot(chunk_size)] {
                entries[rank] = Some(node.entry.as_pair_mut());
            }
        }

        IterMut {
            inner: entries.into_iter().flatten().collect::<Vec<_>>().into_iter(),
        }
    }
}

impl<T, U, P> RbTree<T, U, P>
where
    P: KeyPolicy,
{
    fn lower_bound_link<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut ret = None;
        let mut curr = self.root;
        while let Some(node) = curr {
            let Node { ref entry, left, right, .. } = self.arena[node];
            if entry.key.borrow() < key {
                curr = right;
            } else {
                ret = Some(node);
                curr = left;
            }
        }
        ret
    }

    fn upper_bound_link<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut ret = None;
        let mut curr = self.root;
        while let Some(node) = curr {
            let Node { ref entry, left, right, .. } = self.arena[node];
            if key < entry.key.borrow() {
                ret = Some(node);
                curr = left;
            } else {
                curr = right;
            }
        }
        ret
    }

    fn floor_link<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut ret = None;
        let mut curr = self.root;
        while let Some(node) = curr {
            let Node { ref entry, left, right, .. } = self.arena[node];
            if entry.key.borrow() <= key {
                ret = Some(node);
                curr = right;
            } else {
                curr = left;
            }
        }
        ret
    }

    // Returns the first node of the run of keys equal to `key`.
    fn find_link<Q>(&self, key: &Q) -> Option<Handle>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.lower_bound_link(key)
            .filter(|&node| self.arena[node].entry.key.borrow() == key)
    }

    fn try_insert_handle(&mut self, key: T, value: U) -> Result<(Handle, bool)>
    where
        T: Ord,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut curr = self.root;
        while let Some(node) = curr {
            let entry = &self.arena[node].entry;
            side = match key.cmp(&entry.key) {
                Ordering::Less => Side::Left,
                Ordering::Equal if !P::ALLOW_DUPLICATES => return Ok((node, false)),
                _ => Side::Right,
            };
            parent = Some(node);
            curr = self.arena[node].child(side);
        }

        let new_node = self
            .arena
            .try_allocate(Node::new(key, value, parent))
            .map_err(|error| {
                warn!("failed to allocate a node for a tree of {} entries: {}", self.len(), error);
                error
            })?;
        match parent {
            None => self.root = Some(new_node),
            Some(parent) => self.arena[parent].set_child(side, Some(new_node)),
        }
        self.insert_fixup(new_node);
        Ok((new_node, true))
    }

    fn insert_handle(&mut self, key: T, value: U) -> (Handle, bool)
    where
        T: Ord,
    {
        match self.try_insert_handle(key, value) {
            Ok(ret) => ret,
            Err(error) => panic!("Error: {}.", error),
        }
    }

    /// Inserts an entry, returning its position and whether a new node was created. With unique
    /// keys an existing equal key leaves the tree unchanged and its position is returned. With
    /// duplicate keys the new entry is placed after every existing equal key.
    ///
    /// # Panics
    ///
    /// Panics if memory for the node cannot be allocated.
    pub fn insert(&mut self, key: T, value: U) -> (Position, bool)
    where
        T: Ord,
    {
        let (node, inserted) = self.insert_handle(key, value);
        (self.position(Some(node)), inserted)
    }

    /// Like `insert`, but returns `Error::AllocationFailed` instead of panicking if memory for
    /// the node cannot be allocated. The tree is unchanged on failure.
    pub fn try_insert(&mut self, key: T, value: U) -> Result<(Position, bool)>
    where
        T: Ord,
    {
        let (node, inserted) = self.try_insert_handle(key, value)?;
        Ok((self.position(Some(node)), inserted))
    }

    /// Inserts every entry of `iter` in order, returning the result of each insertion.
    pub fn insert_many<I>(&mut self, iter: I) -> Vec<(Position, bool)>
    where
        T: Ord,
        I: IntoIterator<Item = (T, U)>,
    {
        iter.into_iter()
            .map(|(key, value)| self.insert(key, value))
            .collect()
    }

    /// Inserts an entry, or replaces the value of the existing entry with an equal key. Returns
    /// the entry's position and whether a new node was created.
    pub fn insert_or_assign(&mut self, key: T, value: U) -> (Position, bool)
    where
        T: Ord,
    {
        match self.find_link(&key) {
            Some(node) => {
                self.arena[node].entry.value = value;
                (self.position(Some(node)), false)
            },
            None => self.insert(key, value),
        }
    }

    /// Returns a mutable reference to the value of `key`, inserting the value returned by
    /// `default` first if the key is absent.
    pub fn get_or_insert_with<F>(&mut self, key: T, default: F) -> &mut U
    where
        T: Ord,
        F: FnOnce() -> U,
    {
        let node = match self.find_link(&key) {
            Some(node) => node,
            None => self.insert_handle(key, default()).0,
        };
        &mut self.arena[node].entry.value
    }

    /// Removes an entry with a key equal to `key` and returns it. With duplicate keys the first
    /// entry of the run is removed.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(T, U)>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_link(key)
            .map(|node| self.remove_node(node).into_pair())
    }

    /// Returns the position of an entry with a key equal to `key`, or the end position. With
    /// duplicate keys the first entry of the run is returned.
    pub fn find<Q>(&self, key: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(self.find_link(key))
    }

    /// Returns `true` if an entry with a key equal to `key` exists.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_link(key).is_some()
    }

    /// Returns the number of entries with a key equal to `key`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (start, end) = self.equal_range(key);
        self.range_between(start, end).len()
    }

    /// Returns the position of the first entry whose key is not less than `key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(self.lower_bound_link(key))
    }

    /// Returns the position of the first entry whose key is greater than `key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position(self.upper_bound_link(key))
    }

    /// Returns `(lower_bound(key), upper_bound(key))`.
    pub fn equal_range<Q>(&self, key: &Q) -> (Position, Position)
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Returns the value of an entry with a key equal to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&U>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_link(key)
            .map(|node| &self.arena[node].entry.value)
    }

    /// Returns the value of an entry with a key equal to `key` mutably.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut U>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.find_link(key) {
            Some(node) => Some(&mut self.arena[node].entry.value),
            None => None,
        }
    }

    /// Returns the greatest key that is less than or equal to `key`.
    pub fn floor<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.floor_link(key)
            .map(|node| &self.arena[node].entry.key)
    }

    /// Returns the least key that is greater than or equal to `key`.
    pub fn ceil<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.lower_bound_link(key)
            .map(|node| &self.arena[node].entry.key)
    }

    /// Moves entries of `other` into `self`. With unique keys, entries whose key already exists
    /// in `self` stay in `other`; with duplicate keys every entry moves and `other` ends empty.
    pub fn merge(&mut self, other: &mut Self)
    where
        T: Ord,
    {
        let mut moved = 0;
        for node in other.handles() {
            if !P::ALLOW_DUPLICATES && self.find_link(&other.arena[node].entry.key).is_some() {
                continue;
            }
            let Entry { key, value } = other.remove_node(node);
            self.insert_handle(key, value);
            moved += 1;
        }
        debug!(
            "merged {} entries into tree of {}; {} left behind",
            moved,
            self.len(),
            other.len(),
        );
    }

    /// Walks the whole tree and checks every red black tree invariant: ordered keys (strictly
    /// increasing with unique keys), consistent parent links, a black root, no red node with a
    /// red child, and the same number of black nodes on every root-to-leaf path. Returns that
    /// number on success and `Error::InvariantViolated` describing the first violation otherwise.
    ///
    /// This is a debugging aid: it takes O(n log n) time and a correct tree never fails it.
    pub fn check_invariants(&self) -> Result<usize>
    where
        T: Ord,
    {
        let root = match self.root {
            Some(root) => root,
            None if self.is_empty() => return Ok(0),
            None => {
                return Err(Error::InvariantViolated(format!(
                    "empty root with {} entries",
                    self.len(),
                )))
            },
        };
        match self.arena.get(&root) {
            None => return violation("dangling root link"),
            Some(node) if node.parent.is_some() => {
                return violation("root has a parent")
            },
            Some(node) if node.is_red() => return violation("root is red"),
            Some(_) => {},
        }

        let mut black_height = None;
        let mut count = 0;
        let mut prev: Option<Handle> = None;
        let mut curr = self.min_link();
        while let Some(handle) = curr {
            count += 1;
            let node = &self.arena[handle];
            for &side in &[Side::Left, Side::Right] {
                match node.child(side) {
                    Some(child) => {
                        let child_node = match self.arena.get(&child) {
                            Some(child_node) => child_node,
                            None => return violation("dangling child link"),
                        };
                        if child_node.parent != Some(handle) {
                            return violation("child does not link back to its parent");
                        }
                        if node.is_red() && child_node.is_red() {
                            return violation("red node has a red child");
                        }
                    },
                    None => {
                        let mut blacks = 0;
                        let mut up = Some(handle);
                        while let Some(ancestor) = up {
                            if !self.arena[ancestor].is_red() {
                                blacks += 1;
                            }
                            up = self.arena[ancestor].parent;
                        }
                        match black_height {
                            None => black_height = Some(blacks),
                            Some(expected) if expected != blacks => {
                                return Err(Error::InvariantViolated(format!(
                                    "black height {} differs from {}",
                                    blacks, expected,
                                )));
                            },
                            Some(_) => {},
                        }
                    },
                }
            }

            if let Some(prev) = prev {
                match self.arena[prev].entry.key.cmp(&node.entry.key) {
                    Ordering::Greater => return violation("keys out of order"),
                    Ordering::Equal if !P::ALLOW_DUPLICATES => {
                        return violation("duplicate key in a unique tree")
                    },
                    _ => {},
                }
            }
            prev = Some(handle);
            curr = self.step(handle, Side::Right);
        }

        if count != self.len() {
            return Err(Error::InvariantViolated(format!(
                "reached {} of {} entries",
                count,
                self.len(),
            )));
        }
        Ok(black_height.unwrap_or(0))
    }
}

impl<T, U, P> Clone for RbTree<T, U, P>
where
    T: Clone,
    U: Clone,
{
    fn clone(&self) -> Self {
        RbTree {
            id: next_tree_id(),
            arena: self.arena.clone(),
            root: self.root,
            _marker: PhantomData,
        }
    }
}

impl<T, U, P> Default for RbTree<T, U, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U, P> fmt::Debug for RbTree<T, U, P>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T, U, P> FromIterator<(T, U)> for RbTree<T, U, P>
where
    T: Ord,
    P: KeyPolicy,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
    {
        let mut tree = RbTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T, U, P> Extend<(T, U)> for RbTree<T, U, P>
where
    T: Ord,
    P: KeyPolicy,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (T, U)>,
    {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<T, U, P> IntoIterator for RbTree<T, U, P> {
    type IntoIter = IntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        let handles = self.handles();
        IntoIter {
            arena: self.arena,
            handles: handles.into_iter(),
        }
    }
}

impl<'a, T, U, P> IntoIterator for &'a RbTree<T, U, P>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = Iter<'a, T, U, P>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, U, P> IntoIterator for &'a mut RbTree<T, U, P>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = IterMut<'a, T, U>;
    type Item = (&'a T, &'a mut U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An owning iterator for `RbTree<T, U, P>`.
///
/// This iterator traverses the entries of the tree in-order and yields owned entries.
pub struct IntoIter<T, U> {
    arena: TypedArena<Node<T, U>>,
    handles: vec::IntoIter<Handle>,
}

impl<T, U> Iterator for IntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.handles.next()?;
        Some(self.arena.free(&handle).entry.into_pair())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.handles.size_hint()
    }
}

impl<T, U> DoubleEndedIterator for IntoIter<T, U> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let handle = self.handles.next_back()?;
        Some(self.arena.free(&handle).entry.into_pair())
    }
}

impl<T, U> ExactSizeIterator for IntoIter<T, U> {}

/// An iterator for `RbTree<T, U, P>`.
///
/// This iterator traverses the entries of the tree in-order and yields immutable references.
pub struct Iter<'a, T, U, P = UniqueKeys> {
    tree: &'a RbTree<T, U, P>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, T, U, P> Iterator for Iter<'a, T, U, P>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let handle = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = tree.step(handle, Side::Right);
        }
        self.remaining -= 1;
        Some(tree.arena[handle].entry.as_pair())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, U, P> DoubleEndedIterator for Iter<'a, T, U, P>
where
    T: 'a,
    U: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let handle = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = tree.step(handle, Side::Left);
        }
        self.remaining -= 1;
        Some(tree.arena[handle].entry.as_pair())
    }
}

impl<'a, T, U, P> ExactSizeIterator for Iter<'a, T, U, P>
where
    T: 'a,
    U: 'a,
{
}

impl<'a, T, U, P> Clone for Iter<'a, T, U, P> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

/// A mutable iterator for `RbTree<T, U, P>`.
///
/// This iterator traverses the entries of the tree in-order and yields mutable values.
pub struct IterMut<'a, T, U> {
    inner: vec::IntoIter<(&'a T, &'a mut U)>,
}

impl<'a, T, U> Iterator for IterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a mut U);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T, U> DoubleEndedIterator for IterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<'a, T, U> ExactSizeIterator for IterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
}
