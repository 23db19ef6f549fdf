//! # Arena-based Linked List
//!
//! Instructions in a block and blocks in a function are kept in intrusive
//! doubly linked lists. The links live in the node data itself, and both the
//! nodes and the containers are addressed by arena handles, so unlinking a
//! node is O(1) and never invalidates any other handle.

use super::storage::ArenaPtr;

/// A container of a linked list, e.g., a block containing instructions.
///
/// The container shares a common arena with its nodes.
pub trait LinkedListContainerPtr<NodePtr>: ArenaPtr
where
    NodePtr: LinkedListNodePtr<A = Self::A, ContainerPtr = Self>,
{
    /// Get the head of the linked list.
    ///
    /// The head and the tail are either both [None] or both [Some].
    fn head(self, arena: &Self::A) -> Option<NodePtr>;

    /// Get the tail of the linked list.
    fn tail(self, arena: &Self::A) -> Option<NodePtr>;

    /// Set the head of the linked list.
    ///
    /// Low-level operation, use [push_back](LinkedListContainerPtr::push_back)
    /// or [push_front](LinkedListContainerPtr::push_front) instead.
    fn set_head(self, arena: &mut Self::A, head: Option<NodePtr>);

    /// Set the tail of the linked list.
    fn set_tail(self, arena: &mut Self::A, tail: Option<NodePtr>);

    /// Push a node to the front of the linked list.
    ///
    /// # Panics
    ///
    /// Panics if the node is already in a container.
    fn push_front(self, arena: &mut Self::A, node: NodePtr) {
        assert!(
            node.container(arena).is_none(),
            "the node is already in another container"
        );

        if let Some(head) = self.head(arena) {
            head.insert_before(arena, node);
        } else {
            self.set_head(arena, Some(node));
            self.set_tail(arena, Some(node));
            node.set_container(arena, Some(self));
        }
    }

    /// Push a node to the back of the linked list.
    ///
    /// # Panics
    ///
    /// Panics if the node is already in a container.
    fn push_back(self, arena: &mut Self::A, node: NodePtr) {
        assert!(
            node.container(arena).is_none(),
            "the node is already in another container"
        );

        if let Some(tail) = self.tail(arena) {
            tail.insert_after(arena, node);
        } else {
            self.set_head(arena, Some(node));
            self.set_tail(arena, Some(node));
            node.set_container(arena, Some(self));
        }
    }

    /// Get a double-ended iterator over the nodes.
    ///
    /// The list must not be modified while the iterator is alive, which the
    /// shared borrow of the arena already guarantees.
    fn iter(self, arena: &Self::A) -> LinkedListIterator<NodePtr> {
        LinkedListIterator {
            arena,
            curr_front: self.head(arena),
            curr_back: self.tail(arena),
            done: self.head(arena).is_none(),
        }
    }
}

/// The iterator of a linked list.
///
/// This iterator is a double-ended iterator, the front and the back cursors
/// stop when they meet.
pub struct LinkedListIterator<'a, T: LinkedListNodePtr> {
    arena: &'a T::A,
    /// The next node to yield from the front.
    curr_front: Option<T>,
    /// The next node to yield from the back.
    curr_back: Option<T>,
    /// Set once the two cursors crossed.
    done: bool,
}

impl<'a, T: LinkedListNodePtr> Iterator for LinkedListIterator<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let curr = self.curr_front?;
        if Some(curr) == self.curr_back {
            self.done = true;
        }
        self.curr_front = curr.next(self.arena);
        Some(curr)
    }
}

impl<'a, T: LinkedListNodePtr> DoubleEndedIterator for LinkedListIterator<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let curr = self.curr_back?;
        if Some(curr) == self.curr_front {
            self.done = true;
        }
        self.curr_back = curr.prev(self.arena);
        Some(curr)
    }
}

/// Interfaces for linked list nodes.
///
/// A node belongs to at most one container at a time. The setters are
/// low-level, use the `insert-` methods and
/// [unlink](LinkedListNodePtr::unlink) to manipulate the list.
pub trait LinkedListNodePtr: ArenaPtr {
    /// The type of the container of the node.
    type ContainerPtr: LinkedListContainerPtr<Self, A = Self::A>;

    fn next(self, arena: &Self::A) -> Option<Self>;

    fn prev(self, arena: &Self::A) -> Option<Self>;

    fn set_next(self, arena: &mut Self::A, next: Option<Self>);

    fn set_prev(self, arena: &mut Self::A, prev: Option<Self>);

    fn container(self, arena: &Self::A) -> Option<Self::ContainerPtr>;

    fn set_container(self, arena: &mut Self::A, container: Option<Self::ContainerPtr>);

    /// Insert a node after the current node.
    ///
    /// # Panics
    ///
    /// - Panics if the current node does not belong to a container.
    /// - Panics if the node to insert already belongs to a container.
    fn insert_after(self, arena: &mut Self::A, node: Self) {
        let container = self
            .container(arena)
            .expect("cannot insert after a node without container");
        assert!(
            node.container(arena).is_none(),
            "cannot insert a node that already belongs to a container"
        );

        if let Some(next) = self.next(arena) {
            next.set_prev(arena, Some(node));
            node.set_next(arena, Some(next));
        }

        node.set_prev(arena, Some(self));
        self.set_next(arena, Some(node));

        if container.tail(arena) == Some(self) {
            container.set_tail(arena, Some(node));
        }

        node.set_container(arena, Some(container));
    }

    /// Insert a node before the current node.
    ///
    /// # Panics
    ///
    /// - Panics if the current node does not belong to a container.
    /// - Panics if the node to insert already belongs to a container.
    fn insert_before(self, arena: &mut Self::A, node: Self) {
        let container = self
            .container(arena)
            .expect("cannot insert before a node without container");
        assert!(
            node.container(arena).is_none(),
            "cannot insert a node that already belongs to a container"
        );

        if let Some(prev) = self.prev(arena) {
            prev.set_next(arena, Some(node));
            node.set_prev(arena, Some(prev));
        }

        node.set_next(arena, Some(self));
        self.set_prev(arena, Some(node));

        if container.head(arena) == Some(self) {
            container.set_head(arena, Some(node));
        }

        node.set_container(arena, Some(container));
    }

    /// Unlink the current node from its container.
    ///
    /// The node is not freed. Unlinking a detached node does nothing.
    fn unlink(self, arena: &mut Self::A) {
        let prev = self.prev(arena);
        let next = self.next(arena);

        if let Some(prev) = prev {
            prev.set_next(arena, next);
        }

        if let Some(next) = next {
            next.set_prev(arena, prev);
        }

        if let Some(container) = self.container(arena) {
            if container.head(arena) == Some(self) {
                container.set_head(arena, next);
            }

            if container.tail(arena) == Some(self) {
                container.set_tail(arena, prev);
            }
        }

        self.set_prev(arena, None);
        self.set_next(arena, None);
        self.set_container(arena, None);
    }
}
