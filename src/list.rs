extern crate alloc;

use alloc::boxed::Box;
use alloc::fmt;
use core::mem;
use core::ptr::{self, NonNull};

/// A node in the recency list.
///
/// Holds a value and pointers to the neighbouring nodes. Not meant to be used
/// directly by consumers of [`RecencyList`].
pub(crate) struct Node<T> {
    /// The stored value. Uses MaybeUninit so the sentinel nodes can exist
    /// without a value.
    val: mem::MaybeUninit<T>,
    /// Pointer to the node on the least-recent side.
    prev: *mut Node<T>,
    /// Pointer to the node on the most-recent side.
    next: *mut Node<T>,
}

impl<T> Node<T> {
    fn new(val: T) -> Self {
        Node {
            val: mem::MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Creates a sentinel node without initializing the value.
    fn new_sigil() -> Self {
        Node {
            val: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Returns a reference to the stored value.
    ///
    /// # Safety
    ///
    /// Must only be called on non-sentinel nodes, whose value is initialized.
    pub(crate) unsafe fn value(&self) -> &T {
        // SAFETY: caller guarantees this is a non-sentinel node
        unsafe { self.val.assume_init_ref() }
    }

    /// Consumes a detached node and returns its value.
    ///
    /// # Safety
    ///
    /// Must only be called on non-sentinel nodes, whose value is initialized.
    pub(crate) unsafe fn into_value(self: Box<Self>) -> T {
        // SAFETY: caller guarantees this is a non-sentinel node
        unsafe { self.val.assume_init() }
    }
}

/// A doubly linked list ordering values by recency of touch.
///
/// The head side holds the value that has gone longest without being touched
/// (the eviction candidate); the tail side holds the most recently touched
/// value. All operations are O(1). Sentinel nodes at both ends keep the
/// pointer surgery uniform.
///
/// The list is unbounded: one instance backs each frequency bucket, and the
/// cache facade is the only place entry capacity is enforced.
pub(crate) struct RecencyList<T> {
    /// Current number of values in the list.
    len: usize,
    /// Pointer to the head sentinel (least-recent side).
    head: *mut Node<T>,
    /// Pointer to the tail sentinel (most-recent side).
    tail: *mut Node<T>,
}

impl<T> RecencyList<T> {
    /// Creates an empty list with linked sentinel nodes.
    pub(crate) fn new() -> RecencyList<T> {
        let head = Box::into_raw(Box::new(Node::new_sigil()));
        let tail = Box::into_raw(Box::new(Node::new_sigil()));

        let list = RecencyList { len: 0, head, tail };

        // SAFETY: head and tail are newly allocated, valid pointers
        unsafe {
            (*list.head).next = list.tail;
            (*list.tail).prev = list.head;
        }

        list
    }

    /// Returns the current number of values in the list.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list holds no values.
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends a value at the most-recent end and returns a pointer to its
    /// node.
    pub(crate) fn push_back(&mut self, v: T) -> *mut Node<T> {
        // SAFETY: Box::into_raw never returns null
        let node = unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Node::new(v)))) };
        // SAFETY: node is newly allocated and not part of any list yet
        unsafe { self.attach_back(node.as_ptr()) };
        node.as_ptr()
    }

    /// Removes and returns the least-recent node, or `None` if the list is
    /// empty.
    pub(crate) fn pop_front(&mut self) -> Option<Box<Node<T>>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: head is a valid sentinel and the list is non-empty, so the
        // node after it is a real node
        let next = unsafe { (*self.head).next };
        if next == self.tail {
            return None;
        }
        // SAFETY: next is a real node in this list
        unsafe {
            self.detach(next);
        }
        self.len -= 1;
        // SAFETY: next was just detached and is no longer reachable
        unsafe { Some(Box::from_raw(next)) }
    }

    /// Detaches a node from the list and returns ownership of it.
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer to a non-sentinel node currently linked
    /// into this list.
    pub(crate) unsafe fn remove(&mut self, node: *mut Node<T>) -> Option<Box<Node<T>>> {
        if self.is_empty() || node.is_null() || node == self.head || node == self.tail {
            return None;
        }
        // SAFETY: caller guarantees node is a live member of this list
        unsafe {
            self.detach(node);
            self.len -= 1;
            Some(Box::from_raw(node))
        }
    }

    /// Links a detached node in at the most-recent end.
    ///
    /// Used both for fresh nodes and for nodes migrating from another list
    /// (a frequency bump moves a node between buckets without reallocating).
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer to a node that is not currently linked
    /// into any list.
    pub(crate) unsafe fn attach_back(&mut self, node: *mut Node<T>) {
        // SAFETY: tail is a valid sentinel; caller guarantees node is valid
        // and unlinked
        unsafe {
            (*node).next = self.tail;
            (*node).prev = (*self.tail).prev;
            (*(*node).prev).next = node;
            (*self.tail).prev = node;
        }
        self.len += 1;
    }

    /// Unlinks a node from its neighbours without deallocating it.
    ///
    /// # Safety
    ///
    /// `node` must be a valid non-sentinel node currently linked into this
    /// list.
    unsafe fn detach(&mut self, node: *mut Node<T>) {
        // SAFETY: node is a live member, so its prev and next are valid
        unsafe {
            (*(*node).prev).next = (*node).next;
            (*(*node).next).prev = (*node).prev;
        }
    }

    /// Removes all values from the list.
    pub(crate) fn clear(&mut self) {
        while let Some(node) = self.pop_front() {
            // SAFETY: pop_front only yields non-sentinel nodes
            drop(unsafe { node.into_value() });
        }
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        RecencyList::new()
    }
}

impl<T> Drop for RecencyList<T> {
    fn drop(&mut self) {
        self.clear();

        // SAFETY: head and tail were allocated in `new` and are only freed
        // here
        unsafe {
            if !self.head.is_null() {
                let _ = Box::from_raw(self.head);
                self.head = ptr::null_mut();
            }
            if !self.tail.is_null() {
                let _ = Box::from_raw(self.tail);
                self.tail = ptr::null_mut();
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RecencyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecencyList")
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    #[test]
    fn test_new_is_empty() {
        let list = RecencyList::<u32>::new();
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert!(!list.head.is_null());
        assert!(!list.tail.is_null());
    }

    #[test]
    fn test_push_back_pop_front_order() {
        let mut list = RecencyList::<u32>::new();
        list.push_back(10);
        list.push_back(20);
        list.push_back(30);
        assert_eq!(list.len(), 3);

        // Oldest pushed value comes out first
        let first = list.pop_front().unwrap();
        assert_eq!(unsafe { first.into_value() }, 10);
        let second = list.pop_front().unwrap();
        assert_eq!(unsafe { second.into_value() }, 20);
        let third = list.pop_front().unwrap();
        assert_eq!(unsafe { third.into_value() }, 30);
        assert!(list.pop_front().is_none());
    }

    #[test]
    fn test_remove_middle_node() {
        let mut list = RecencyList::<u32>::new();
        let _a = list.push_back(1);
        let b = list.push_back(2);
        let _c = list.push_back(3);

        let removed = unsafe { list.remove(b) }.unwrap();
        assert_eq!(unsafe { removed.into_value() }, 2);
        assert_eq!(list.len(), 2);

        let first = list.pop_front().unwrap();
        assert_eq!(unsafe { first.into_value() }, 1);
        let second = list.pop_front().unwrap();
        assert_eq!(unsafe { second.into_value() }, 3);
    }

    #[test]
    fn test_remove_rejects_sentinels_and_null() {
        let mut list = RecencyList::<u32>::new();
        list.push_back(1);
        assert!(unsafe { list.remove(ptr::null_mut()) }.is_none());
        let head = list.head;
        let tail = list.tail;
        assert!(unsafe { list.remove(head) }.is_none());
        assert!(unsafe { list.remove(tail) }.is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_cross_list_node_transfer() {
        let mut bucket1 = RecencyList::<u32>::new();
        let mut bucket2 = RecencyList::<u32>::new();

        let node = bucket1.push_back(10);
        bucket1.push_back(20);
        assert_eq!(bucket1.len(), 2);

        // Detach from one list and attach to the other, as a frequency bump
        // does
        let detached = unsafe { bucket1.remove(node) }.unwrap();
        unsafe { bucket2.attach_back(Box::into_raw(detached)) };
        assert_eq!(bucket1.len(), 1);
        assert_eq!(bucket2.len(), 1);

        let moved = bucket2.pop_front().unwrap();
        assert_eq!(unsafe { moved.into_value() }, 10);
    }

    #[test]
    fn test_clear_and_reuse() {
        let mut list = RecencyList::<String>::new();
        list.push_back(String::from("a"));
        list.push_back(String::from("b"));
        assert_eq!(list.len(), 2);

        list.clear();
        assert!(list.is_empty());

        list.push_back(String::from("c"));
        assert_eq!(list.len(), 1);
        let node = list.pop_front().unwrap();
        assert_eq!(unsafe { node.into_value() }, "c");
    }

    #[test]
    fn test_value_accessor() {
        let mut list = RecencyList::<String>::new();
        let node = list.push_back(String::from("key"));
        // SAFETY: node is a live non-sentinel node
        unsafe {
            assert_eq!((*node).value(), "key");
        }
    }
}
