use crate::red_black_tree::tree::{IntoIter, Iter, Position, RbTree};
use crate::red_black_tree::{DuplicateKeys, Result};
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;

/// An ordered multiset implemented using a red black tree.
///
/// Unlike `RedBlackSet`, a multiset keeps every inserted key. Keys that compare equal form a
/// contiguous run in iteration order, and within a run keys appear in the order they were
/// inserted.
///
/// # Examples
///
/// ```
/// use ordered_collections::red_black_tree::RedBlackMultiset;
///
/// let mut multiset = RedBlackMultiset::new();
/// for key in vec![5, 3, 5, 5, 1] {
///     multiset.insert(key);
/// }
///
/// assert_eq!(multiset.len(), 5);
/// assert_eq!(multiset.count(&5), 3);
/// assert_eq!(multiset.equal_range_iter(&5).count(), 3);
/// assert_eq!(multiset.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5, &5, &5]);
///
/// assert_eq!(multiset.remove(&5), Some(5));
/// assert_eq!(multiset.count(&5), 2);
/// ```
#[derive(Clone)]
pub struct RedBlackMultiset<T> {
    tree: RbTree<T, (), DuplicateKeys>,
}

impl<T> RedBlackMultiset<T> {
    /// Constructs a new, empty `RedBlackMultiset<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMultiset;
    ///
    /// let multiset: RedBlackMultiset<u32> = RedBlackMultiset::new();
    /// ```
    pub fn new() -> Self {
        RedBlackMultiset {
            tree: RbTree::new(),
        }
    }

    /// Constructs a new, empty `RedBlackMultiset<T>` whose nodes are allocated `chunk_size` at a
    /// time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackMultiset {
            tree: RbTree::with_chunk_size(chunk_size),
        }
    }

    /// Inserts a key into the multiset and returns its position. Equal keys are placed after any
    /// existing equal keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMultiset;
    ///
    /// let mut multiset = RedBlackMultiset::new();
    /// let first = multiset.insert(1);
    /// let second = multiset.insert(1);
    /// assert_eq!(multiset.next(first), second);
    /// assert_eq!(multiset.len(), 2);
    /// ```
    pub fn insert(&mut self, key: T) -> Position
    where
        T: Ord,
    {
        self.tree.insert(key, ()).0
    }

    /// Inserts a key into the multiset like `insert`, but returns `Error::AllocationFailed`
    /// instead of panicking if the node cannot be allocated.
    pub fn try_insert(&mut self, key: T) -> Result<Position>
    where
        T: Ord,
    {
        self.tree.try_insert(key, ()).map(|(position, _)| position)
    }

    /// Inserts every key of an iterator in order and returns the position of each key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMultiset;
    ///
    /// let mut multiset = RedBlackMultiset::new();
    /// let positions = multiset.insert_many(vec![2, 2, 1]);
    /// assert_eq!(multiset.get_at(positions[2]), Some(&1));
    /// assert_eq!(multiset.len(), 3);
    /// ```
    pub fn insert_many<I>(&mut self, iter: I) -> Vec<Position>
    where
        T: Ord,
        I: IntoIterator<Item = T>,
    {
        iter.into_iter().map(|key| self.insert(key)).collect()
    }

    /// Removes the first key equal to a particular key and returns it. Returns `None` if no such
    /// key exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMultiset;
    ///
    /// let mut multiset: RedBlackMultiset<u32> = vec![1, 1].into_iter().collect();
    /// assert_eq!(multiset.remove(&1), Some(1));
    /// assert_eq!(multiset.remove(&1), Some(1));
    /// assert_eq!(multiset.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.remove(key).map(|pair| pair.0)
    }

    /// Removes every key equal to a particular key and returns how many were removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMultiset;
    ///
    /// let mut multiset: RedBlackMultiset<u32> = vec![2, 1, 2, 3, 2].into_iter().collect();
    /// assert_eq!(multiset.remove_all(&2), 3);
    /// assert_eq!(multiset.remove_all(&2), 0);
    /// assert_eq!(multiset.iter().collect::<Vec<&u32>>(), vec![&1, &3]);
    /// ```
    pub fn remove_all<V>(&mut self, key: &V) -> usize
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let (mut position, end) = self.tree.equal_range(key);
        let mut removed = 0;
        while position != end {
            let next = self.tree.next(position);
            self.tree.remove_at(position);
            position = next;
            removed += 1;
        }
        removed
    }

    /// Removes the key at a position and returns it. Positions of other keys remain valid.
    ///
    /// # Panics
    ///
    /// Panics if the position is the end position, comes from another multiset, or refers to a
    /// key that was already removed.
    pub fn remove_at(&mut self, position: Position) -> T {
        self.tree.remove_at(position).0
    }

    /// Checks if a key exists in the multiset.
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.contains(key)
    }

    /// Returns the number of keys equal to a particular key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMultiset;
    ///
    /// let multiset: RedBlackMultiset<u32> = vec![1, 2, 2].into_iter().collect();
    /// assert_eq!(multiset.count(&0), 0);
    /// assert_eq!(multiset.count(&1), 1);
    /// assert_eq!(multiset.count(&2), 2);
    /// ```
    pub fn count<V>(&self, key: &V) -> usize
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.count(key)
    }

    /// Returns the position of the first key equal to a particular key, or the end position if
    /// the key does not exist in the multiset.
    pub fn find<V>(&self, key: &V) -> Position
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.find(key)
    }

    /// Returns the position of the first key that is not less than a particular key.
    pub fn lower_bound<V>(&self, key: &V) -> Position
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.lower_bound(key)
    }

    /// Returns the position of the first key that is greater than a particular key.
    pub fn upper_bound<V>(&self, key: &V) -> Position
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.upper_bound(key)
    }

    /// Returns the half-open run of positions `[lower_bound(key), upper_bound(key))` holding the
    /// keys equal to a particular key. The run is empty if both positions are equal.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMultiset;
    ///
    /// let multiset: RedBlackMultiset<u32> = vec![1, 2, 2, 3].into_iter().collect();
    /// let (start, end) = multiset.equal_range(&2);
    /// assert_eq!(multiset.get_at(start), Some(&2));
    /// assert_eq!(multiset.get_at(end), Some(&3));
    ///
    /// let (start, end) = multiset.equal_range(&0);
    /// assert_eq!(start, end);
    /// ```
    pub fn equal_range<V>(&self, key: &V) -> (Position, Position)
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.equal_range(key)
    }

    /// Returns an iterator over the keys equal to a particular key.
    pub fn equal_range_iter<V>(&self, key: &V) -> RedBlackMultisetIter<'_, T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let (start, end) = self.tree.equal_range(key);
        RedBlackMultisetIter {
            iter: self.tree.range_between(start, end),
        }
    }

    /// Returns the number of elements in the multiset.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the multiset is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns a theoretical upper bound on the number of elements in the multiset.
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Clears the multiset, removing all values. Every position into the multiset is
    /// invalidated.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Swaps the contents of two multisets in constant time.
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// Moves every key of `other` into `self`, leaving `other` empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMultiset;
    ///
    /// let mut n: RedBlackMultiset<u32> = vec![1, 2].into_iter().collect();
    /// let mut m: RedBlackMultiset<u32> = vec![2, 3].into_iter().collect();
    /// n.merge(&mut m);
    /// assert_eq!(n.iter().collect::<Vec<&u32>>(), vec![&1, &2, &2, &3]);
    /// assert!(m.is_empty());
    /// ```
    pub fn merge(&mut self, other: &mut Self)
    where
        T: Ord,
    {
        self.tree.merge(&mut other.tree);
    }

    /// Returns a key in the multiset that is less than or equal to a particular key. Returns
    /// `None` if such a key does not exist.
    pub fn floor<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.floor(key)
    }

    /// Returns a key in the multiset that is greater than or equal to a particular key. Returns
    /// `None` if such a key does not exist.
    pub fn ceil<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.ceil(key)
    }

    /// Returns the minimum key of the multiset. Returns `None` if the multiset is empty.
    pub fn min(&self) -> Option<&T> {
        self.tree.first().map(|(key, _)| key)
    }

    /// Returns the maximum key of the multiset. Returns `None` if the multiset is empty.
    pub fn max(&self) -> Option<&T> {
        self.tree.last().map(|(key, _)| key)
    }

    /// Returns the position of the minimum key, or the end position if the multiset is empty.
    pub fn begin(&self) -> Position {
        self.tree.begin()
    }

    /// Returns the end position, one past the maximum key.
    pub fn end(&self) -> Position {
        self.tree.end()
    }

    /// Returns the position after a position.
    pub fn next(&self, position: Position) -> Position {
        self.tree.next(position)
    }

    /// Returns the position before a position.
    pub fn prev(&self, position: Position) -> Position {
        self.tree.prev(position)
    }

    /// Returns the key at a position, or `None` for the end position or a removed key.
    pub fn get_at(&self, position: Position) -> Option<&T> {
        self.tree.get_at(position).map(|pair| pair.0)
    }

    /// Returns an iterator over the multiset. The iterator will yield keys using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMultiset;
    ///
    /// let multiset: RedBlackMultiset<u32> = vec![3, 1, 3].into_iter().collect();
    ///
    /// let mut iterator = multiset.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackMultisetIter<'_, T> {
        RedBlackMultisetIter {
            iter: self.tree.iter(),
        }
    }
}

impl<T> IntoIterator for RedBlackMultiset<T> {
    type IntoIter = RedBlackMultisetIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        RedBlackMultisetIntoIter {
            iter: self.tree.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a RedBlackMultiset<T>
where
    T: 'a,
{
    type IntoIter = RedBlackMultisetIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackMultiset<T>`.
///
/// This iterator traverses the elements of the multiset in-order and yields owned keys.
pub struct RedBlackMultisetIntoIter<T> {
    iter: IntoIter<T, ()>,
}

impl<T> Iterator for RedBlackMultisetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> DoubleEndedIterator for RedBlackMultisetIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(key, _)| key)
    }
}

impl<T> ExactSizeIterator for RedBlackMultisetIntoIter<T> {}

/// An iterator for `RedBlackMultiset<T>`.
///
/// This iterator traverses the elements of the multiset in-order and yields immutable
/// references.
pub struct RedBlackMultisetIter<'a, T> {
    iter: Iter<'a, T, (), DuplicateKeys>,
}

impl<'a, T> Iterator for RedBlackMultisetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for RedBlackMultisetIter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(key, _)| key)
    }
}

impl<'a, T> ExactSizeIterator for RedBlackMultisetIter<'a, T>
where
    T: 'a,
{
}

impl<T> Default for RedBlackMultiset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for RedBlackMultiset<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        RedBlackMultiset {
            tree: iter.into_iter().map(|key| (key, ())).collect(),
        }
    }
}

impl<T> Extend<T> for RedBlackMultiset<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.tree.extend(iter.into_iter().map(|key| (key, ())));
    }
}

impl<T> PartialEq for RedBlackMultiset<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> Eq for RedBlackMultiset<T> where T: Eq {}

impl<T> fmt::Debug for RedBlackMultiset<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
