//! Fast, but limited allocator with generational handles.

use log::trace;
use std::collections::TryReserveError;
use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object allocated in a `TypedArena<T>`.
///
/// Every handle records the generation of the block it was issued for. Freeing a block bumps its
/// generation, so a handle to a freed object never resolves to a later object that reuses the
/// same block.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    chunk_index: usize,
    block_index: usize,
    generation: u64,
}

impl Handle {
    /// Returns the position of the handle's block across all chunks of an arena with
    /// `chunk_size` blocks per chunk. It is always less than the arena's capacity.
    pub fn slot(&self, chunk_size: usize) -> usize {
        self.chunk_index * chunk_size + self.block_index
    }
}

#[derive(Clone)]
enum Block<T> {
    Occupied { generation: u64, value: T },
    Vacant(Option<Handle>),
}

/// A fast, but limited allocator that only allocates a single type of object.
///
/// All objects inside the arena will be destroyed when the typed arena is destroyed. This typed
/// arena also supports deallocation of objects once they are allocated and yields both mutable and
/// immutable references to objects. The underlying container is simply a `Vec` of chunks so the
/// code itself uses no unsafe code. When the typed arena is full, it will allocate another chunk
/// of objects so no object is ever moved after it is allocated.
///
/// # Examples
///
/// ```
/// use ordered_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert_eq!(arena.get(&x), None);
/// ```
#[derive(Clone)]
pub struct TypedArena<T> {
    head: Option<Handle>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    size: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn block(&self, handle: &Handle) -> Option<&Block<T>> {
        self.chunks
            .get(handle.chunk_index)
            .and_then(|chunk| chunk.get(handle.block_index))
    }

    /// Constructs a new, empty `TypedArena<T>` with a specific number of objects per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::TypedArena;
    ///
    /// // creates a new TypedArena<T> that contains a maximum of 1024 u32's per chunk
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Error: chunk size must be positive.");
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            size: 0,
            capacity: 0,
        }
    }

    /// Ensures that the next allocation will not need to allocate memory. Returns an error and
    /// leaves the arena unchanged if a new chunk could not be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::TypedArena;
    ///
    /// let mut arena: TypedArena<u32> = TypedArena::new(16);
    /// assert!(arena.try_reserve().is_ok());
    /// assert_eq!(arena.capacity(), 16);
    /// ```
    pub fn try_reserve(&mut self) -> Result<(), TryReserveError> {
        if self.head.is_some() || self.size < self.capacity {
            return Ok(());
        }

        self.chunks.try_reserve(1)?;
        let mut chunk = Vec::new();
        chunk.try_reserve_exact(self.chunk_size)?;
        self.chunks.push(chunk);
        self.capacity += self.chunk_size;
        trace!(
            "arena grew to {} chunks ({} blocks)",
            self.chunks.len(),
            self.capacity,
        );
        Ok(())
    }

    /// Allocates an object in the typed arena and returns a `Handle`, or returns an error if the
    /// memory for a new chunk could not be allocated. The arena is unchanged on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.try_allocate(0).unwrap();
    /// assert_eq!(arena[x], 0);
    /// ```
    pub fn try_allocate(&mut self, value: T) -> Result<Handle, TryReserveError> {
        self.try_reserve()?;
        self.size += 1;

        match self.head.take() {
            None => {
                let chunk_index = self.chunks.len() - 1;
                let last_chunk = &mut self.chunks[chunk_index];
                last_chunk.push(Block::Occupied {
                    generation: 0,
                    value,
                });
                Ok(Handle {
                    chunk_index,
                    block_index: last_chunk.len() - 1,
                    generation: 0,
                })
            },
            Some(handle) => {
                let vacant_block = mem::replace(
                    &mut self.chunks[handle.chunk_index][handle.block_index],
                    Block::Occupied {
                        generation: handle.generation,
                        value,
                    },
                );

                match vacant_block {
                    Block::Vacant(next_handle) => {
                        self.head = next_handle;
                        Ok(handle)
                    },
                    Block::Occupied { .. } => panic!("Expected a vacant block."),
                }
            },
        }
    }

    /// Allocates an object in the typed arena and returns a `Handle`. The `Handle` can later be
    /// used to retrieve mutable and immutable references to the object, and to deallocate the
    /// object.
    ///
    /// # Panics
    ///
    /// Panics if the memory for a new chunk could not be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        match self.try_allocate(value) {
            Ok(handle) => handle,
            Err(error) => panic!("Error: arena allocation failed: {}.", error),
        }
    }

    /// Deallocates an object in the typed arena and returns the object.
    ///
    /// # Panics
    ///
    /// Panics if handle corresponds to an invalid, vacant, or previously freed value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(&x), 0);
    /// ```
    pub fn free(&mut self, handle: &Handle) -> T {
        if self.get(handle).is_none() {
            panic!("Error: attempting to free invalid block.");
        }
        let old_block = mem::replace(
            &mut self.chunks[handle.chunk_index][handle.block_index],
            Block::Vacant(self.head.take()),
        );
        match old_block {
            Block::Vacant(_) => panic!("Error: attempting to free vacant block."),
            Block::Occupied { generation, value } => {
                self.size -= 1;
                self.head = Some(Handle {
                    chunk_index: handle.chunk_index,
                    block_index: handle.block_index,
                    generation: generation.wrapping_add(1),
                });
                value
            },
        }
    }

    /// Returns an immutable reference to an object in the typed arena. Returns `None` if the
    /// handle does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn get(&self, handle: &Handle) -> Option<&T> {
        match self.block(handle) {
            Some(Block::Occupied { generation, value }) if *generation == handle.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the typed arena. Returns `None` if the handle
    /// does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get_mut(&x), Some(&mut 0));
    /// ```
    pub fn get_mut(&mut self, handle: &Handle) -> Option<&mut T> {
        let block = self
            .chunks
            .get_mut(handle.chunk_index)
            .and_then(|chunk| chunk.get_mut(handle.block_index));
        match block {
            Some(Block::Occupied { generation, value }) if *generation == handle.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    /// Returns an iterator over every live object in the arena in allocation-slot order, together
    /// with its handle.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> + '_ {
        self.chunks
            .iter_mut()
            .enumerate()
            .flat_map(|(chunk_index, chunk)| {
                chunk
                    .iter_mut()
                    .enumerate()
                    .filter_map(move |(block_index, block)| match block {
                        Block::Occupied { generation, value } => {
                            let handle = Handle {
                                chunk_index,
                                block_index,
                                generation: *generation,
                            };
                            Some((handle, value))
                        },
                        Block::Vacant(_) => None,
                    })
            })
    }

    /// Destroys every object in the arena and releases its chunks.
    pub fn clear(&mut self) {
        trace!("clearing arena of {} objects", self.size);
        self.head = None;
        self.chunks.clear();
        self.size = 0;
        self.capacity = 0;
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of objects the arena can hold before it allocates another chunk.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of objects per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns a theoretical upper bound on the number of objects an arena can hold given the
    /// size of the address space. The bound is not enforced.
    pub fn max_len() -> usize {
        let block_size = mem::size_of::<Block<T>>().max(1);
        isize::MAX as usize / block_size
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(&handle).expect("Error: handle out of bounds.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(&handle).expect("Error: handle out of bounds.")
    }
}

#[cfg(test)]
mod tests {
    use super::Handle;
    use super::TypedArena;

    #[test]
    #[should_panic]
    fn test_new_zero_chunk_size() {
        let _arena: TypedArena<u32> = TypedArena::new(0);
    }

    #[test]
    #[should_panic]
    fn test_free_invalid_block() {
        let mut arena: TypedArena<u32> = TypedArena::new(1024);
        arena.free(&Handle {
            chunk_index: 0,
            block_index: 0,
            generation: 0,
        });
    }

    #[test]
    #[should_panic]
    fn test_free_vacant_block() {
        let mut arena = TypedArena::new(1024);
        arena.allocate(0);
        arena.free(&Handle {
            chunk_index: 0,
            block_index: 1,
            generation: 0,
        });
    }

    #[test]
    #[should_panic]
    fn test_free_twice() {
        let mut arena = TypedArena::new(1024);
        let handle = arena.allocate(0);
        arena.free(&handle);
        arena.free(&handle);
    }

    #[test]
    fn test_allocate() {
        let mut arena = TypedArena::new(1024);
        assert_eq!(
            arena.allocate(0),
            Handle {
                chunk_index: 0,
                block_index: 0,
                generation: 0,
            },
        );
        assert_eq!(
            arena.allocate(0),
            Handle {
                chunk_index: 0,
                block_index: 1,
                generation: 0,
            },
        );
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_allocate_multiple_chunks() {
        let mut arena = TypedArena::new(2);
        arena.allocate(0);
        arena.allocate(0);
        assert_eq!(
            arena.allocate(0),
            Handle {
                chunk_index: 1,
                block_index: 0,
                generation: 0,
            },
        );
        assert_eq!(arena.capacity(), 4);
    }

    #[test]
    fn test_free_reuses_block_with_new_generation() {
        let mut arena = TypedArena::new(1024);
        let handle = arena.allocate(0);
        assert_eq!(arena.free(&handle), 0);
        assert!(arena.is_empty());

        let reused = arena.allocate(1);
        assert_eq!(
            reused,
            Handle {
                chunk_index: 0,
                block_index: 0,
                generation: 1,
            },
        );
        assert_eq!(arena.get(&handle), None);
        assert_eq!(arena.get(&reused), Some(&1));
    }

    #[test]
    fn test_try_reserve_only_when_full() {
        let mut arena = TypedArena::new(1);
        assert_eq!(arena.try_reserve(), Ok(()));
        assert_eq!(arena.capacity(), 1);
        assert_eq!(arena.try_reserve(), Ok(()));
        assert_eq!(arena.capacity(), 1);

        let handle = arena.try_allocate(0).unwrap();
        arena.free(&handle);
        assert_eq!(arena.try_reserve(), Ok(()));
        assert_eq!(arena.capacity(), 1);
    }

    #[test]
    fn test_try_allocate_failure_leaves_arena_unchanged() {
        let mut arena: TypedArena<u64> = TypedArena::new(usize::MAX / 2);
        assert!(arena.try_allocate(1).is_err());
        assert!(arena.try_reserve().is_err());
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.capacity(), 0);
        assert!(arena.chunks.is_empty());
        assert_eq!(arena.head, None);
    }

    #[test]
    fn test_handle_slot() {
        let mut arena = TypedArena::new(2);
        let handles: Vec<Handle> = (0..5).map(|value| arena.allocate(value)).collect();
        let slots: Vec<usize> = handles.iter().map(|handle| handle.slot(2)).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4]);
        assert!(slots.iter().all(|&slot| slot < arena.capacity()));
    }

    #[test]
    fn test_get_invalid_block() {
        let arena: TypedArena<u32> = TypedArena::new(1024);
        assert_eq!(
            arena.get(&Handle {
                chunk_index: 0,
                block_index: 0,
                generation: 0,
            }),
            None,
        );
    }

    #[test]
    fn test_get_mut() {
        let mut arena = TypedArena::new(1024);
        let handle = arena.allocate(0);
        *arena.get_mut(&handle).unwrap() = 1;
        assert_eq!(arena.get(&handle), Some(&1));
    }

    #[test]
    fn test_get_mut_stale_handle() {
        let mut arena = TypedArena::new(1024);
        let handle = arena.allocate(0);
        arena.free(&handle);
        arena.allocate(2);
        assert_eq!(arena.get_mut(&handle), None);
    }

    #[test]
    fn test_iter_mut_skips_vacant_blocks() {
        let mut arena = TypedArena::new(2);
        let a = arena.allocate(1);
        let b = arena.allocate(2);
        let c = arena.allocate(3);
        arena.free(&b);

        for (_, value) in arena.iter_mut() {
            *value *= 10;
        }

        let handles: Vec<_> = arena.iter_mut().map(|(handle, _)| handle).collect();
        assert_eq!(handles, vec![a, c]);
        assert_eq!(arena[a], 10);
        assert_eq!(arena[c], 30);
    }

    #[test]
    fn test_clone_preserves_handles() {
        let mut arena = TypedArena::new(4);
        let handle = arena.allocate(String::from("a"));
        let copy = arena.clone();
        arena[handle].push('b');
        assert_eq!(copy[handle], "a");
        assert_eq!(arena[handle], "ab");
    }

    #[test]
    fn test_clear() {
        let mut arena = TypedArena::new(4);
        let handle = arena.allocate(0);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.capacity(), 0);
        assert_eq!(arena.get(&handle), None);
    }
}
