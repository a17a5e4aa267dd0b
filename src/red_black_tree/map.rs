use crate::red_black_tree::tree::{IntoIter, Iter, IterMut, Position, RbTree};
use crate::red_black_tree::{Error, Result, UniqueKeys};
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Index;

/// An ordered map implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree. Every node is colored red or black,
/// no red node has a red child, and every path from a node to a leaf passes through the same
/// number of black nodes. Together these guarantee that the height of the tree is logarithmic in
/// the number of keys.
///
/// Keys are unique: inserting a key that already exists leaves the map unchanged.
///
/// # Examples
///
/// ```
/// use ordered_collections::red_black_tree::RedBlackMap;
///
/// let mut map = RedBlackMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some(&0));
/// assert_eq!(map.ceil(&2), Some(&3));
///
/// *map.get_mut(&0).unwrap() = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
#[derive(Clone)]
pub struct RedBlackMap<T, U> {
    tree: RbTree<T, U, UniqueKeys>,
}

impl<T, U> RedBlackMap<T, U> {
    /// Constructs a new, empty `RedBlackMap<T, U>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = RedBlackMap::new();
    /// ```
    pub fn new() -> Self {
        RedBlackMap {
            tree: RbTree::new(),
        }
    }

    /// Constructs a new, empty `RedBlackMap<T, U>` whose nodes are allocated `chunk_size` at a
    /// time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = RedBlackMap::with_chunk_size(1024);
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackMap {
            tree: RbTree::with_chunk_size(chunk_size),
        }
    }

    /// Inserts a key-value pair into the map. Returns the position of the entry with that key and
    /// `true` if a new entry was created. If the key already exists, the map is unchanged and
    /// `false` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// assert_eq!(map.insert(1, 1).1, true);
    /// assert_eq!(map.insert(1, 2).1, false);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> (Position, bool)
    where
        T: Ord,
    {
        self.tree.insert(key, value)
    }

    /// Inserts a key-value pair into the map like `insert`, but returns
    /// `Error::AllocationFailed` instead of panicking if the node cannot be allocated. The map is
    /// unchanged on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// let (position, inserted) = map.try_insert(1, 1).unwrap();
    /// assert!(inserted);
    /// assert_eq!(map.get_at(position), Some((&1, &1)));
    /// ```
    pub fn try_insert(&mut self, key: T, value: U) -> Result<(Position, bool)>
    where
        T: Ord,
    {
        self.tree.try_insert(key, value)
    }

    /// Inserts a key-value pair into the map, replacing the value if the key already exists.
    /// Returns the position of the entry and `true` if a new entry was created.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// assert_eq!(map.insert_or_assign(1, 1).1, true);
    /// assert_eq!(map.insert_or_assign(1, 2).1, false);
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert_or_assign(&mut self, key: T, value: U) -> (Position, bool)
    where
        T: Ord,
    {
        self.tree.insert_or_assign(key, value)
    }

    /// Returns a mutable reference to the value associated with a key, inserting the result of
    /// `default` first if the key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// *map.get_or_insert_with("apples", || 0) += 3;
    /// *map.get_or_insert_with("apples", || 0) += 2;
    /// assert_eq!(map.get("apples"), Some(&5));
    /// ```
    pub fn get_or_insert_with<F>(&mut self, key: T, default: F) -> &mut U
    where
        T: Ord,
        F: FnOnce() -> U,
    {
        self.tree.get_or_insert_with(key, default)
    }

    /// Inserts every key-value pair of an iterator in order and returns the result of each
    /// insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// let results = map.insert_many(vec![(1, 'a'), (2, 'b'), (1, 'c')]);
    /// let inserted: Vec<bool> = results.iter().map(|result| result.1).collect();
    /// assert_eq!(inserted, vec![true, true, false]);
    /// assert_eq!(map.get_at(results[2].0), Some((&1, &'a')));
    /// ```
    pub fn insert_many<I>(&mut self, iter: I) -> Vec<(Position, bool)>
    where
        T: Ord,
        I: IntoIterator<Item = (T, U)>,
    {
        self.tree.insert_many(iter)
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<(T, U)>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.remove(key)
    }

    /// Removes the key-value pair at a position and returns it. Positions of other entries remain
    /// valid.
    ///
    /// # Panics
    ///
    /// Panics if the position is the end position, comes from another map, or refers to an entry
    /// that was already removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// let position = map.find(&2);
    /// assert_eq!(map.remove_at(map.begin()), (1, 1));
    /// assert_eq!(map.get_at(position), Some((&2, &2)));
    /// ```
    pub fn remove_at(&mut self, position: Position) -> (T, U) {
        self.tree.remove_at(position)
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.contains(key)
    }

    /// Returns an immutable reference to the value associated with a particular key. It will
    /// return `None` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get<V>(&self, key: &V) -> Option<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.get(key)
    }

    /// Returns a mutable reference to the value associated with a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut<V>(&mut self, key: &V) -> Option<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.get_mut(key)
    }

    /// Returns an immutable reference to the value associated with a particular key, or
    /// `Error::KeyNotFound` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::{Error, RedBlackMap};
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.at(&1), Ok(&1));
    /// assert_eq!(map.at(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn at<V>(&self, key: &V) -> Result<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value associated with a particular key, or
    /// `Error::KeyNotFound` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::{Error, RedBlackMap};
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// *map.at_mut(&1).unwrap() = 3;
    /// assert_eq!(map.at(&1), Ok(&3));
    /// assert!(map.at_mut(&2).is_err());
    /// ```
    pub fn at_mut<V>(&mut self, key: &V) -> Result<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the position of the entry with a particular key, or the end position if the key
    /// does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get_at(map.find(&1)), Some((&1, &1)));
    /// assert_eq!(map.find(&2), map.end());
    /// ```
    pub fn find<V>(&self, key: &V) -> Position
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.find(key)
    }

    /// Returns the position of the first entry whose key is not less than a particular key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = vec![(1, 1), (3, 3)].into_iter().collect();
    /// assert_eq!(map.get_at(map.lower_bound(&2)), Some((&3, &3)));
    /// assert_eq!(map.get_at(map.lower_bound(&3)), Some((&3, &3)));
    /// assert_eq!(map.lower_bound(&4), map.end());
    /// ```
    pub fn lower_bound<V>(&self, key: &V) -> Position
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.lower_bound(key)
    }

    /// Returns the position of the first entry whose key is greater than a particular key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = vec![(1, 1), (3, 3)].into_iter().collect();
    /// assert_eq!(map.get_at(map.upper_bound(&1)), Some((&3, &3)));
    /// assert_eq!(map.upper_bound(&3), map.end());
    /// ```
    pub fn upper_bound<V>(&self, key: &V) -> Position
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.upper_bound(key)
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = RedBlackMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns a theoretical upper bound on the number of elements in the map.
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Clears the map, removing all values. Every position into the map is invalidated.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Swaps the contents of two maps in constant time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut n = RedBlackMap::new();
    /// n.insert(1, 1);
    /// let mut m = RedBlackMap::new();
    /// m.swap(&mut n);
    /// assert!(n.is_empty());
    /// assert_eq!(m.get(&1), Some(&1));
    /// ```
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// Moves every entry of `other` whose key does not exist in `self` into `self`. Entries with
    /// keys that exist in both maps remain in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut n: RedBlackMap<u32, u32> = vec![(2, 0), (3, 0), (4, 0)].into_iter().collect();
    /// let mut m: RedBlackMap<u32, u32> = vec![(1, 1), (2, 1), (3, 1)].into_iter().collect();
    /// n.merge(&mut m);
    ///
    /// assert_eq!(n.iter().map(|(key, _)| *key).collect::<Vec<u32>>(), vec![1, 2, 3, 4]);
    /// assert_eq!(m.iter().map(|(key, _)| *key).collect::<Vec<u32>>(), vec![2, 3]);
    /// ```
    pub fn merge(&mut self, other: &mut Self)
    where
        T: Ord,
    {
        self.tree.merge(&mut other.tree);
    }

    /// Returns a key in the map that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.floor(&0), None);
    /// assert_eq!(map.floor(&2), Some(&1));
    /// ```
    pub fn floor<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.floor(key)
    }

    /// Returns a key in the map that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.ceil(&0), Some(&1));
    /// assert_eq!(map.ceil(&2), None);
    /// ```
    pub fn ceil<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.ceil(key)
    }

    /// Returns the minimum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.tree.first().map(|(key, _)| key)
    }

    /// Returns the maximum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.tree.last().map(|(key, _)| key)
    }

    /// Returns the position of the minimum entry, or the end position if the map is empty.
    pub fn begin(&self) -> Position {
        self.tree.begin()
    }

    /// Returns the end position, one past the maximum entry.
    pub fn end(&self) -> Position {
        self.tree.end()
    }

    /// Returns the position after a position. Stepping past the maximum entry yields the end
    /// position.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = vec![(1, 1), (2, 4)].into_iter().collect();
    /// let position = map.next(map.begin());
    /// assert_eq!(map.get_at(position), Some((&2, &4)));
    /// assert_eq!(map.next(position), map.end());
    /// ```
    pub fn next(&self, position: Position) -> Position {
        self.tree.next(position)
    }

    /// Returns the position before a position. Stepping back from the end position yields the
    /// maximum entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = vec![(1, 1), (2, 4)].into_iter().collect();
    /// assert_eq!(map.get_at(map.prev(map.end())), Some((&2, &4)));
    /// ```
    pub fn prev(&self, position: Position) -> Position {
        self.tree.prev(position)
    }

    /// Returns the entry at a position, or `None` for the end position or a removed entry.
    pub fn get_at(&self, position: Position) -> Option<(&T, &U)> {
        self.tree.get_at(position)
    }

    /// Returns the entry at a position with a mutable value, or `None` for the end position or a
    /// removed entry.
    pub fn get_at_mut(&mut self, position: Position) -> Option<(&T, &mut U)> {
        self.tree.get_at_mut(position)
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&3, &3)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackMapIter<'_, T, U> {
        RedBlackMapIter {
            iter: self.tree.iter(),
        }
    }

    /// Returns a mutable iterator over the map. The iterator will yield key-value pairs using
    /// in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    ///
    /// for (key, value) in &mut map {
    ///     *value += 1;
    /// }
    ///
    /// let mut iterator = map.iter_mut();
    /// assert_eq!(iterator.next(), Some((&1, &mut 2)));
    /// assert_eq!(iterator.next(), Some((&3, &mut 4)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter_mut(&mut self) -> RedBlackMapIterMut<'_, T, U> {
        RedBlackMapIterMut {
            iter: self.tree.iter_mut(),
        }
    }
}

impl<T, U> IntoIterator for RedBlackMap<T, U> {
    type IntoIter = RedBlackMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        RedBlackMapIntoIter {
            iter: self.tree.into_iter(),
        }
    }
}

impl<'a, T, U> IntoIterator for &'a RedBlackMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = RedBlackMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, U> IntoIterator for &'a mut RedBlackMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = RedBlackMapIterMut<'a, T, U>;
    type Item = (&'a T, &'a mut U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An owning iterator for `RedBlackMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields owned entries.
pub struct RedBlackMapIntoIter<T, U> {
    iter: IntoIter<T, U>,
}

impl<T, U> Iterator for RedBlackMapIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T, U> DoubleEndedIterator for RedBlackMapIntoIter<T, U> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back()
    }
}

impl<T, U> ExactSizeIterator for RedBlackMapIntoIter<T, U> {}

/// An iterator for `RedBlackMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields immutable references.
pub struct RedBlackMapIter<'a, T, U> {
    iter: Iter<'a, T, U, UniqueKeys>,
}

impl<'a, T, U> Iterator for RedBlackMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, T, U> DoubleEndedIterator for RedBlackMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back()
    }
}

impl<'a, T, U> ExactSizeIterator for RedBlackMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
}

/// A mutable iterator for `RedBlackMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields mutable references.
pub struct RedBlackMapIterMut<'a, T, U> {
    iter: IterMut<'a, T, U>,
}

impl<'a, T, U> Iterator for RedBlackMapIterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a mut U);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, T, U> DoubleEndedIterator for RedBlackMapIterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back()
    }
}

impl<'a, T, U> ExactSizeIterator for RedBlackMapIterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
}

impl<T, U> Default for RedBlackMap<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> FromIterator<(T, U)> for RedBlackMap<T, U>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
    {
        RedBlackMap {
            tree: RbTree::from_iter(iter),
        }
    }
}

impl<T, U> Extend<(T, U)> for RedBlackMap<T, U>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (T, U)>,
    {
        self.tree.extend(iter);
    }
}

impl<T, U> PartialEq for RedBlackMap<T, U>
where
    T: PartialEq,
    U: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, U> Eq for RedBlackMap<T, U>
where
    T: Eq,
    U: Eq,
{
}

impl<T, U> fmt::Debug for RedBlackMap<T, U>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, T, U, V> Index<&'a V> for RedBlackMap<T, U>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    type Output = U;

    fn index(&self, key: &V) -> &Self::Output {
        self.get(key).expect("Error: key does not exist.")
    }
}

#[cfg(test)]
mod tests {
    use super::RedBlackMap;
    use crate::red_black_tree::Error;

    #[test]
    fn test_len_empty() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert!(map.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert_eq!(map.min(), None);
        assert_eq!(map.max(), None);
    }

    #[test]
    fn test_insert() {
        let mut map = RedBlackMap::new();
        assert_eq!(map.insert(1, 1).1, true);
        assert!(map.contains_key(&1));
        assert_eq!(map.get(&1), Some(&1));
    }

    #[test]
    fn test_insert_existing_key() {
        let mut map = RedBlackMap::new();
        let (position, _) = map.insert(1, 1);
        assert_eq!(map.insert(1, 3), (position, false));
        assert_eq!(map.get(&1), Some(&1));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_or_assign() {
        let mut map = RedBlackMap::new();
        for key in 1..10 {
            map.insert_or_assign(key, key * 10);
        }
        for key in 1..10 {
            assert_eq!(map.insert_or_assign(key, key * 100).1, false);
        }
        assert_eq!(map.len(), 9);
        assert_eq!(map.get(&4), Some(&400));
    }

    #[test]
    fn test_remove() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        assert_eq!(map.remove(&1), Some((1, 1)));
        assert!(!map.contains_key(&1));
    }

    #[test]
    fn test_remove_at_third_entry() {
        let mut map: RedBlackMap<u32, u32> = (1..7).map(|key| (key, key * 10)).collect();
        let position = map.next(map.next(map.begin()));
        assert_eq!(map.remove_at(position), (3, 30));
        assert_eq!(map.iter().map(|(key, _)| *key).collect::<Vec<u32>>(), vec![1, 2, 4, 5, 6]);
    }

    #[test]
    #[should_panic]
    fn test_remove_at_end_of_empty_map() {
        let mut map: RedBlackMap<u32, u32> = RedBlackMap::new();
        let begin = map.begin();
        map.remove_at(begin);
    }

    #[test]
    fn test_at() {
        let map: RedBlackMap<i32, f64> = vec![
            (0, 0.3),
            (-100, -100.3),
            (100, 100.3),
            (-50, -50.3),
            (50, 50.3),
            (-75, -75.3),
            (75, 75.3),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.at(&-100), Ok(&-100.3));
        assert_eq!(map.at(&75), Ok(&75.3));
        assert_eq!(map.at(&25), Err(Error::KeyNotFound));
        assert_eq!(map.at(&-25), Err(Error::KeyNotFound));
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut map = RedBlackMap::new();
        *map.get_or_insert_with(1, || 0) += 1;
        *map.get_or_insert_with(1, || 0) += 1;
        *map.get_or_insert_with(2, || 5) += 1;
        assert_eq!(map.get(&1), Some(&2));
        assert_eq!(map.get(&2), Some(&6));
    }

    #[test]
    fn test_min_max() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.min(), Some(&1));
        assert_eq!(map.max(), Some(&5));
    }

    #[test]
    fn test_get_mut() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        {
            let value = map.get_mut(&1);
            *value.unwrap() = 3;
        }
        assert_eq!(map.get(&1), Some(&3));
    }

    #[test]
    fn test_floor_ceil() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.floor(&0), None);
        assert_eq!(map.floor(&2), Some(&1));
        assert_eq!(map.floor(&4), Some(&3));
        assert_eq!(map.floor(&6), Some(&5));

        assert_eq!(map.ceil(&0), Some(&1));
        assert_eq!(map.ceil(&2), Some(&3));
        assert_eq!(map.ceil(&4), Some(&5));
        assert_eq!(map.ceil(&6), None);
    }

    #[test]
    fn test_merge() {
        let mut n: RedBlackMap<u32, u32> = vec![(2, 0), (3, 0), (4, 0)].into_iter().collect();
        let mut m: RedBlackMap<u32, u32> = vec![(1, 1), (2, 1), (3, 1)].into_iter().collect();
        n.merge(&mut m);

        assert_eq!(
            n.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &1), (&2, &0), (&3, &0), (&4, &0)],
        );
        assert_eq!(m.iter().collect::<Vec<(&u32, &u32)>>(), vec![(&2, &1), (&3, &1)]);
    }

    #[test]
    fn test_merge_empty() {
        let mut n: RedBlackMap<u32, u32> = vec![(1, 1)].into_iter().collect();
        let mut m = RedBlackMap::new();
        n.merge(&mut m);
        assert_eq!(n.len(), 1);
        m.merge(&mut n);
        assert_eq!(m.len(), 1);
        assert!(n.is_empty());
    }

    #[test]
    fn test_clone_and_eq() {
        let mut n: RedBlackMap<u32, u32> = vec![(1, 1), (2, 2)].into_iter().collect();
        let m = n.clone();
        assert_eq!(n, m);
        n.insert_or_assign(2, 3);
        assert_ne!(n, m);
        assert_eq!(m.get(&2), Some(&2));
    }

    #[test]
    fn test_index() {
        let map: RedBlackMap<String, u32> = vec![(String::from("a"), 1)].into_iter().collect();
        assert_eq!(map["a"], 1);
    }

    #[test]
    #[should_panic]
    fn test_index_missing_key() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        let _ = map[&1];
    }

    #[test]
    fn test_iter_len() {
        let mut map: RedBlackMap<u32, u32> = (0..5).map(|key| (key, key)).collect();
        let mut iter = map.iter();
        iter.next();
        assert_eq!(iter.len(), 4);
        assert_eq!(map.iter_mut().len(), 5);

        let mut into_iter = map.into_iter();
        into_iter.next_back();
        assert_eq!(into_iter.size_hint(), (4, Some(4)));
    }

    #[test]
    fn test_into_iter() {
        let mut map = RedBlackMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.into_iter().collect::<Vec<(u32, u32)>>(),
            vec![(1, 2), (3, 4), (5, 6)],
        );
    }

    #[test]
    fn test_iter() {
        let mut map = RedBlackMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.iter().rev().collect::<Vec<(&u32, &u32)>>(),
            vec![(&5, &6), (&3, &4), (&1, &2)],
        );
    }

    #[test]
    fn test_iter_mut() {
        let mut map = RedBlackMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        for (_, value) in &mut map {
            *value += 1;
        }

        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &3), (&3, &5), (&5, &7)],
        );
    }
}
