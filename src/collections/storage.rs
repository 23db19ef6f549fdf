//! Storage utilities.
//!
//! This module provides [BaseArena], a vector-backed arena with a free list,
//! and the traits used to wrap one or more arenas in a high-level container.
//! All IR entities (functions, blocks, instructions and memory slots) are
//! stored this way, so references between them are plain indices and the
//! control flow graph never forms ownership cycles.
//!
//! - [ArenaPtr]: A typed handle that can be dereferenced through its arena.
//! - [ArenaDeref]: Dereferencing a handle.
//! - [ArenaAlloc]: Allocating a value.
//! - [ArenaFree]: Freeing a value.
//!
//! # Examples
//!
//! ```rust
//! use orzdse::collections::storage::*;
//!
//! struct Node {
//!     this: BaseArenaPtr<Node>,
//!     value: i32,
//! }
//!
//! let mut arena = BaseArena::default();
//!
//! let a = arena.alloc_with(|this| Node { this, value: 1 });
//! let b = arena.alloc_with(|this| Node { this, value: 2 });
//!
//! assert_ne!(a, b);
//! assert_eq!(arena.try_deref(a).unwrap().this, a);
//! assert_eq!(arena.try_deref(b).unwrap().value, 2);
//!
//! arena.free(a);
//! assert!(arena.try_deref(a).is_none());
//!
//! // the freed slot is reused
//! let c = arena.alloc_with(|this| Node { this, value: 3 });
//! assert_eq!(a, c);
//! ```

use std::{
    collections::VecDeque,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

/// Dereference a handle into a value stored in the arena.
pub trait ArenaDeref<T, Ptr>
where
    Ptr: ArenaPtr<T = T, A = Self>,
{
    /// Try to dereference a pointer.
    ///
    /// # Returns
    ///
    /// - `Some(&T)` if the pointer refers to an occupied slot.
    /// - `None` if the pointer is out of bounds or the slot is vacant.
    fn try_deref(&self, ptr: Ptr) -> Option<&T>;

    /// Try to dereference a pointer mutably.
    ///
    /// # See Also
    ///
    /// - [ArenaDeref::try_deref]
    fn try_deref_mut(&mut self, ptr: Ptr) -> Option<&mut T>;
}

/// Allocate values in the arena.
pub trait ArenaAlloc<T, Ptr>: ArenaDeref<T, Ptr>
where
    Ptr: ArenaPtr<T = T, A = Self>,
{
    /// Allocate a value with a closure accepting the future pointer.
    ///
    /// The pointer is reserved first and handed to the closure, so the value
    /// can store its own handle.
    fn alloc_with<F>(&mut self, f: F) -> Ptr
    where
        F: FnOnce(Ptr) -> T;

    /// Allocate a value in the arena.
    fn alloc(&mut self, val: T) -> Ptr { self.alloc_with(|_| val) }
}

/// Free values in the arena.
pub trait ArenaFree<T, Ptr>: ArenaAlloc<T, Ptr>
where
    Ptr: ArenaPtr<T = T, A = Self>,
{
    /// Free a value in the arena.
    ///
    /// # Panics
    ///
    /// Panics on double free or on an out-of-bounds pointer.
    fn free(&mut self, ptr: Ptr);
}

/// A handle that can be dereferenced through the corresponding arena.
pub trait ArenaPtr: Copy + Sized + Eq {
    /// The type of dereferenced value.
    type T;

    /// The type of the corresponding arena.
    type A: ArenaDeref<Self::T, Self>;

    /// Try to dereference the pointer.
    fn try_deref(self, arena: &Self::A) -> Option<&Self::T>;

    /// Try to dereference the pointer mutably.
    fn try_deref_mut(self, arena: &mut Self::A) -> Option<&mut Self::T>;

    /// Dereference the pointer.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is dangling.
    fn deref(self, arena: &Self::A) -> &Self::T {
        self.try_deref(arena).expect("the arena pointer is invalid")
    }

    /// Dereference the pointer mutably.
    ///
    /// # Panics
    ///
    /// Panics if the pointer is dangling.
    fn deref_mut(self, arena: &mut Self::A) -> &mut Self::T {
        self.try_deref_mut(arena)
            .expect("the arena pointer is invalid")
    }
}

/// A pointer to an object in a [BaseArena].
pub struct BaseArenaPtr<T> {
    id: usize,
    _marker: PhantomData<T>,
}

impl<T> fmt::Debug for BaseArenaPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BaseArenaPtr({})", self.id)
    }
}

impl<T> PartialEq for BaseArenaPtr<T> {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl<T> Eq for BaseArenaPtr<T> {}

impl<T> Hash for BaseArenaPtr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state); }
}

impl<T> From<usize> for BaseArenaPtr<T> {
    fn from(id: usize) -> Self {
        BaseArenaPtr {
            id,
            _marker: PhantomData,
        }
    }
}

// `derive(Clone)` would require `T: Clone`.
#[allow(clippy::non_canonical_clone_impl)]
impl<T> Clone for BaseArenaPtr<T> {
    fn clone(&self) -> Self {
        BaseArenaPtr {
            id: self.id,
            _marker: PhantomData,
        }
    }
}

impl<T> Copy for BaseArenaPtr<T> {}

impl<T> BaseArenaPtr<T> {
    /// The index of the object in the arena.
    pub fn id(self) -> usize { self.id }
}

impl<T> ArenaPtr for BaseArenaPtr<T> {
    type A = BaseArena<T>;
    type T = T;

    fn try_deref(self, arena: &BaseArena<T>) -> Option<&T> { arena.try_deref(self) }

    fn try_deref_mut(self, arena: &mut BaseArena<T>) -> Option<&mut T> { arena.try_deref_mut(self) }
}

/// An entry in [BaseArena].
pub enum BaseArenaEntry<T> {
    /// The slot is vacant, either never used or freed.
    Vacant,
    /// The slot holds a live value.
    Occupied(T),
}

/// A simple arena implemented with a vector and a free list.
pub struct BaseArena<T> {
    /// The pool of entries.
    pool: Vec<BaseArenaEntry<T>>,
    /// Indices of vacant entries, reused in FIFO order.
    free: VecDeque<usize>,
}

impl<T> Default for BaseArena<T> {
    fn default() -> Self {
        BaseArena {
            pool: Vec::new(),
            free: VecDeque::new(),
        }
    }
}

impl<T> ArenaAlloc<T, BaseArenaPtr<T>> for BaseArena<T> {
    fn alloc_with<F>(&mut self, f: F) -> BaseArenaPtr<T>
    where
        F: FnOnce(BaseArenaPtr<T>) -> T,
    {
        let index = match self.free.pop_front() {
            Some(index) => index,
            None => {
                self.pool.push(BaseArenaEntry::Vacant);
                self.pool.len() - 1
            }
        };
        let ptr = BaseArenaPtr::from(index);
        self.pool[index] = BaseArenaEntry::Occupied(f(ptr));
        ptr
    }
}

impl<T> ArenaFree<T, BaseArenaPtr<T>> for BaseArena<T> {
    fn free(&mut self, ptr: BaseArenaPtr<T>) {
        if let BaseArenaEntry::Vacant = self.pool[ptr.id()] {
            panic!("the arena pointer is invalid, double free may occur")
        }
        self.pool[ptr.id()] = BaseArenaEntry::Vacant;
        self.free.push_back(ptr.id());
    }
}

impl<T> ArenaDeref<T, BaseArenaPtr<T>> for BaseArena<T> {
    fn try_deref(&self, ptr: BaseArenaPtr<T>) -> Option<&T> {
        match self.pool.get(ptr.id())? {
            BaseArenaEntry::Vacant => None,
            BaseArenaEntry::Occupied(val) => Some(val),
        }
    }

    fn try_deref_mut(&mut self, ptr: BaseArenaPtr<T>) -> Option<&mut T> {
        match self.pool.get_mut(ptr.id())? {
            BaseArenaEntry::Vacant => None,
            BaseArenaEntry::Occupied(val) => Some(val),
        }
    }
}

impl<T> BaseArena<T> {
    /// Iterate over the occupied entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (BaseArenaPtr<T>, &T)> {
        self.pool
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                BaseArenaEntry::Vacant => None,
                BaseArenaEntry::Occupied(val) => Some((BaseArenaPtr::from(index), val)),
            })
    }

    /// The number of occupied entries.
    pub fn len(&self) -> usize { self.pool.len() - self.free.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Bind a typed handle `$ptr` (a newtype over [BaseArenaPtr]) to the field
/// `$field` of the container `$arena`.
#[macro_export]
macro_rules! impl_arena {
    ($arena:ty, $value:ty, $ptr:path, $field:ident) => {
        impl $crate::collections::storage::ArenaPtr for $ptr {
            type A = $arena;
            type T = $value;

            fn try_deref(self, arena: &Self::A) -> Option<&Self::T> {
                $crate::collections::storage::ArenaDeref::try_deref(arena, self)
            }

            fn try_deref_mut(self, arena: &mut Self::A) -> Option<&mut Self::T> {
                $crate::collections::storage::ArenaDeref::try_deref_mut(arena, self)
            }
        }

        impl $crate::collections::storage::ArenaAlloc<$value, $ptr> for $arena {
            fn alloc_with<F>(&mut self, f: F) -> $ptr
            where
                F: FnOnce($ptr) -> $value,
            {
                $ptr($crate::collections::storage::ArenaAlloc::alloc_with(
                    &mut self.$field,
                    |ptr| f($ptr(ptr)),
                ))
            }
        }

        impl $crate::collections::storage::ArenaDeref<$value, $ptr> for $arena {
            fn try_deref(&self, ptr: $ptr) -> Option<&$value> {
                $crate::collections::storage::ArenaDeref::try_deref(&self.$field, ptr.0)
            }

            fn try_deref_mut(&mut self, ptr: $ptr) -> Option<&mut $value> {
                $crate::collections::storage::ArenaDeref::try_deref_mut(&mut self.$field, ptr.0)
            }
        }

        impl $crate::collections::storage::ArenaFree<$value, $ptr> for $arena {
            fn free(&mut self, ptr: $ptr) {
                $crate::collections::storage::ArenaFree::free(&mut self.$field, ptr.0)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::{ArenaAlloc, ArenaDeref, ArenaFree, BaseArena};

    #[test]
    fn test_base_arena_reuse() {
        let mut arena = BaseArena::default();

        let a = arena.alloc(1);
        let b = arena.alloc(2);
        let c = arena.alloc(3);
        assert_eq!(arena.len(), 3);
        assert!(!arena.is_empty());

        arena.free(b);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.try_deref(b), None);

        let d = arena.alloc(4);
        assert_eq!(b, d);
        assert_eq!(arena.try_deref(d), Some(&4));

        let values: Vec<i32> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![1, 4, 3]);

        *arena.try_deref_mut(a).unwrap() = 10;
        assert_eq!(arena.try_deref(a), Some(&10));
        assert_eq!(arena.try_deref(c), Some(&3));
    }

    #[test]
    #[should_panic]
    fn test_base_arena_double_free() {
        let mut arena = BaseArena::default();
        let a = arena.alloc(1);
        arena.free(a);
        arena.free(a);
    }
}
