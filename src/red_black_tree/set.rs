use crate::red_black_tree::map::{RedBlackMap, RedBlackMapIntoIter, RedBlackMapIter};
use crate::red_black_tree::tree::Position;
use crate::red_black_tree::Result;
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;

/// An ordered set implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree. Every node is colored red or black,
/// no red node has a red child, and every path from a node to a leaf passes through the same
/// number of black nodes.
///
/// # Examples
///
/// ```
/// use ordered_collections::red_black_tree::RedBlackSet;
///
/// let mut set = RedBlackSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert!(set.contains(&0));
/// assert!(!set.contains(&1));
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.ceil(&2), Some(&3));
///
/// assert_eq!(set.remove(&0), Some(0));
/// assert_eq!(set.remove(&1), None);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct RedBlackSet<T> {
    map: RedBlackMap<T, ()>,
}

impl<T> RedBlackSet<T> {
    /// Constructs a new, empty `RedBlackSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::new();
    /// ```
    pub fn new() -> Self {
        RedBlackSet {
            map: RedBlackMap::new(),
        }
    }

    /// Constructs a new, empty `RedBlackSet<T>` whose nodes are allocated `chunk_size` at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        RedBlackSet {
            map: RedBlackMap::with_chunk_size(chunk_size),
        }
    }

    /// Inserts a key into the set. Returns the position of the key and `true` if the key was not
    /// already in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// let (position, inserted) = set.insert(1);
    /// assert!(inserted);
    /// assert_eq!(set.insert(1), (position, false));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> (Position, bool)
    where
        T: Ord,
    {
        self.map.insert(key, ())
    }

    /// Inserts a key into the set like `insert`, but returns `Error::AllocationFailed` instead of
    /// panicking if the node cannot be allocated.
    pub fn try_insert(&mut self, key: T) -> Result<(Position, bool)>
    where
        T: Ord,
    {
        self.map.try_insert(key, ())
    }

    /// Inserts every key of an iterator in order and returns the result of each insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// let inserted: Vec<bool> = set
    ///     .insert_many(vec![3, 1, 3])
    ///     .into_iter()
    ///     .map(|(_, inserted)| inserted)
    ///     .collect();
    /// assert_eq!(inserted, vec![true, true, false]);
    /// ```
    pub fn insert_many<I>(&mut self, iter: I) -> Vec<(Position, bool)>
    where
        T: Ord,
        I: IntoIterator<Item = T>,
    {
        self.map.insert_many(iter.into_iter().map(|key| (key, ())))
    }

    /// Removes a key from the set. If the key exists in the set, it will return the associated
    /// key. Otherwise it will return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.remove(key).map(|pair| pair.0)
    }

    /// Removes the key at a position and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the position is the end position, comes from another set, or refers to a key
    /// that was already removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set: RedBlackSet<u32> = vec![1, 2, 3].into_iter().collect();
    /// let position = set.next(set.begin());
    /// assert_eq!(set.remove_at(position), 2);
    /// ```
    pub fn remove_at(&mut self, position: Position) -> T {
        self.map.remove_at(position).0
    }

    /// Checks if a key exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Returns the number of keys equal to a particular key, which is either zero or one.
    pub fn count<V>(&self, key: &V) -> usize
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        if self.contains(key) {
            1
        } else {
            0
        }
    }

    /// Returns the position of a particular key, or the end position if the key does not exist in
    /// the set.
    pub fn find<V>(&self, key: &V) -> Position
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.find(key)
    }

    /// Returns the position of the first key that is not less than a particular key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = vec![1, 3].into_iter().collect();
    /// assert_eq!(set.get_at(set.lower_bound(&2)), Some(&3));
    /// assert_eq!(set.lower_bound(&4), set.end());
    /// ```
    pub fn lower_bound<V>(&self, key: &V) -> Position
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.lower_bound(key)
    }

    /// Returns the position of the first key that is greater than a particular key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = vec![1, 3].into_iter().collect();
    /// assert_eq!(set.get_at(set.upper_bound(&1)), Some(&3));
    /// assert_eq!(set.upper_bound(&3), set.end());
    /// ```
    pub fn upper_bound<V>(&self, key: &V) -> Position
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.upper_bound(key)
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = RedBlackSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns a theoretical upper bound on the number of elements in the set.
    pub fn max_size(&self) -> usize {
        self.map.max_size()
    }

    /// Clears the set, removing all values. Every position into the set is invalidated.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Swaps the contents of two sets in constant time.
    pub fn swap(&mut self, other: &mut Self) {
        self.map.swap(&mut other.map);
    }

    /// Moves every key of `other` that does not exist in `self` into `self`. Keys that exist in
    /// both sets remain in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut n: RedBlackSet<u32> = vec![1, 2].into_iter().collect();
    /// let mut m: RedBlackSet<u32> = vec![2, 3].into_iter().collect();
    /// n.merge(&mut m);
    /// assert_eq!(n.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
    /// assert_eq!(m.iter().collect::<Vec<&u32>>(), vec![&2]);
    /// ```
    pub fn merge(&mut self, other: &mut Self)
    where
        T: Ord,
    {
        self.map.merge(&mut other.map);
    }

    /// Returns a key in the set that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.floor(key)
    }

    /// Returns a key in the set that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert_eq!(set.ceil(&0), Some(&1));
    /// assert_eq!(set.ceil(&2), None);
    /// ```
    pub fn ceil<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.ceil(key)
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.map.min()
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.map.max()
    }

    /// Returns the position of the minimum key, or the end position if the set is empty.
    pub fn begin(&self) -> Position {
        self.map.begin()
    }

    /// Returns the end position, one past the maximum key.
    pub fn end(&self) -> Position {
        self.map.end()
    }

    /// Returns the position after a position.
    pub fn next(&self, position: Position) -> Position {
        self.map.next(position)
    }

    /// Returns the position before a position.
    pub fn prev(&self, position: Position) -> Position {
        self.map.prev(position)
    }

    /// Returns the key at a position, or `None` for the end position or a removed key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet<u32> = vec![1, 2].into_iter().collect();
    /// assert_eq!(set.get_at(set.prev(set.end())), Some(&2));
    /// assert_eq!(set.get_at(set.end()), None);
    /// ```
    pub fn get_at(&self, position: Position) -> Option<&T> {
        self.map.get_at(position).map(|pair| pair.0)
    }

    /// Returns an iterator over the set. The iterator will yield keys using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackSetIter<'_, T> {
        RedBlackSetIter {
            map_iter: self.map.iter(),
        }
    }
}

impl<T> IntoIterator for RedBlackSet<T> {
    type IntoIter = RedBlackSetIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        RedBlackSetIntoIter {
            map_iter: self.map.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a RedBlackSet<T>
where
    T: 'a,
{
    type IntoIter = RedBlackSetIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned keys.
pub struct RedBlackSetIntoIter<T> {
    map_iter: RedBlackMapIntoIter<T, ()>,
}

impl<T> Iterator for RedBlackSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.map_iter.size_hint()
    }
}

impl<T> DoubleEndedIterator for RedBlackSetIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map_iter.next_back().map(|(key, _)| key)
    }
}

impl<T> ExactSizeIterator for RedBlackSetIntoIter<T> {}

/// An iterator for `RedBlackSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct RedBlackSetIter<'a, T> {
    map_iter: RedBlackMapIter<'a, T, ()>,
}

impl<'a, T> Iterator for RedBlackSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.map_iter.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for RedBlackSetIter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map_iter.next_back().map(|(key, _)| key)
    }
}

impl<'a, T> ExactSizeIterator for RedBlackSetIter<'a, T>
where
    T: 'a,
{
}

impl<T> Default for RedBlackSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for RedBlackSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        RedBlackSet {
            map: iter.into_iter().map(|key| (key, ())).collect(),
        }
    }
}

impl<T> Extend<T> for RedBlackSet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.map.extend(iter.into_iter().map(|key| (key, ())));
    }
}

impl<T> fmt::Debug for RedBlackSet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::RedBlackSet;

    #[test]
    fn test_len_empty() {
        let set: RedBlackSet<u32> = RedBlackSet::new();
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let set: RedBlackSet<u32> = RedBlackSet::new();
        assert!(set.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let set: RedBlackSet<u32> = RedBlackSet::new();
        assert_eq!(set.min(), None);
        assert_eq!(set.max(), None);
    }

    #[test]
    fn test_insert() {
        let mut set = RedBlackSet::new();
        assert!(set.insert(1).1);
        assert!(set.contains(&1));
        assert_eq!(set.count(&1), 1);
        assert_eq!(set.count(&2), 0);
    }

    #[test]
    fn test_insert_existing() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        assert!(!set.insert(1).1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        assert_eq!(set.remove(&1), Some(1));
        assert!(!set.contains(&1));
    }

    #[test]
    fn test_min_max() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(5);

        assert_eq!(set.min(), Some(&1));
        assert_eq!(set.max(), Some(&5));
    }

    #[test]
    fn test_floor_ceil() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(5);

        assert_eq!(set.floor(&0), None);
        assert_eq!(set.floor(&2), Some(&1));
        assert_eq!(set.floor(&4), Some(&3));
        assert_eq!(set.floor(&6), Some(&5));

        assert_eq!(set.ceil(&0), Some(&1));
        assert_eq!(set.ceil(&2), Some(&3));
        assert_eq!(set.ceil(&4), Some(&5));
        assert_eq!(set.ceil(&6), None);
    }

    #[test]
    fn test_positions() {
        let set: RedBlackSet<u32> = vec![4, 2, 6].into_iter().collect();
        let mut keys = Vec::new();
        let mut position = set.begin();
        while position != set.end() {
            keys.push(*set.get_at(position).unwrap());
            position = set.next(position);
        }
        assert_eq!(keys, vec![2, 4, 6]);
        assert_eq!(set.prev(set.begin()), set.end());
    }

    #[test]
    fn test_string_keys() {
        let mut set = RedBlackSet::new();
        set.insert(String::from("b"));
        set.insert(String::from("a"));
        assert!(set.contains("a"));
        assert_eq!(set.remove("b"), Some(String::from("b")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_swap() {
        let mut n: RedBlackSet<u32> = vec![1].into_iter().collect();
        let mut m: RedBlackSet<u32> = vec![2, 3].into_iter().collect();
        let position = m.begin();
        n.swap(&mut m);
        assert_eq!(n.len(), 2);
        assert_eq!(n.get_at(position), Some(&2));
        assert_eq!(m.iter().collect::<Vec<&u32>>(), vec![&1]);
    }

    #[test]
    fn test_debug() {
        let set: RedBlackSet<u32> = vec![2, 1].into_iter().collect();
        assert_eq!(format!("{:?}", set), "{1, 2}");
    }

    #[test]
    fn test_iter_len() {
        let set: RedBlackSet<u32> = vec![3, 1, 2].into_iter().collect();
        assert_eq!(set.iter().len(), 3);
        assert_eq!(set.into_iter().skip(1).len(), 2);
    }

    #[test]
    fn test_into_iter() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.into_iter().collect::<Vec<u32>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_iter() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.iter().rev().collect::<Vec<&u32>>(), vec![&5, &3, &1]);
    }
}
