//! Links, the sentinel list head, and raw traversal

use alloc::boxed::Box;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};

use static_assertions::{assert_eq_align, assert_eq_size};

use crate::ListError;

/// Embeddable list link
///
/// Same shape as Linux's `struct list_head`: a forward and a backward pointer
/// to other links. A link never owns its neighbours.
///
/// A link is in one of three states:
///
/// - *detached*: both pointers null, as built by [`Link::new`]
/// - *isolated*: both pointers refer to the link itself, after [`Link::init`]
/// - *linked*: a member of a ring of two or more links
#[repr(C)]
pub struct Link {
    next: *mut Link,
    prev: *mut Link,
}

assert_eq_size!(Link, [usize; 2]);
assert_eq_align!(Link, usize);

impl Link {
    /// Byte offset of the forward pointer.
    pub const NEXT_OFFSET: usize = core::mem::offset_of!(Link, next);
    /// Byte offset of the backward pointer.
    pub const PREV_OFFSET: usize = core::mem::offset_of!(Link, prev);

    /// Create a detached link.
    pub const fn new() -> Self {
        Self {
            next: ptr::null_mut(),
            prev: ptr::null_mut(),
        }
    }

    /// Make this link isolated (pointing at itself).
    ///
    /// Only meaningful once the link is at its final address. Calling this on a
    /// linked link leaves its former neighbours pointing at it.
    pub fn init(&mut self) {
        let this = self as *mut Link;
        self.next = this;
        self.prev = this;
    }

    /// True if the link has never been initialised.
    pub fn is_detached(&self) -> bool {
        self.next.is_null()
    }

    /// True if the link points at itself.
    pub fn is_isolated(&self) -> bool {
        ptr::eq(self.next, self)
    }

    /// True if the link participates in a ring with other links.
    pub fn is_linked(&self) -> bool {
        !self.is_detached() && !self.is_isolated()
    }

    /// Forward neighbour, or `None` while detached.
    pub fn next(&self) -> Option<NonNull<Link>> {
        NonNull::new(self.next)
    }

    /// Backward neighbour, or `None` while detached.
    pub fn prev(&self) -> Option<NonNull<Link>> {
        NonNull::new(self.prev)
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("next", &self.next)
            .field("prev", &self.prev)
            .finish()
    }
}

/// Splice `new` between two adjacent links.
///
/// # Safety
/// All pointers must be valid and `prev.next == next`.
unsafe fn splice(new: *mut Link, prev: *mut Link, next: *mut Link) {
    (*next).prev = new;
    (*new).next = next;
    (*new).prev = prev;
    (*prev).next = new;
}

/// Sentinel link representing a whole list
///
/// The sentinel lives on the heap so its address stays put when the
/// `ListHead` value moves. Dropping the head frees only the sentinel; the
/// links reachable from it belong to their records.
///
/// The sentinel's address stays inside this crate, so it cannot be passed to
/// another list's [`ListHead::insert_tail`]:
///
/// ```compile_fail
/// let head = ringlet_list::ListHead::new();
/// let _ = head.sentinel();
/// ```
pub struct ListHead {
    sentinel: NonNull<Link>,
}

impl ListHead {
    /// Create an empty list: a sentinel whose `next` and `prev` are itself.
    pub fn new() -> Self {
        let sentinel = NonNull::from(Box::leak(Box::new(Link::new())));
        // SAFETY: freshly allocated and exclusively owned
        unsafe { (*sentinel.as_ptr()).init() };
        Self { sentinel }
    }

    /// Address of the sentinel link.
    pub(crate) fn sentinel(&self) -> NonNull<Link> {
        self.sentinel
    }

    /// True when the list holds no links besides the sentinel.
    pub fn is_empty(&self) -> bool {
        let head = self.sentinel().as_ptr();
        // SAFETY: the sentinel is valid for the lifetime of self
        unsafe { (*head).next == head }
    }

    /// Number of links in the list. Walks the ring.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// First link after the sentinel.
    pub fn first(&self) -> Option<NonNull<Link>> {
        self.iter().next()
    }

    /// Last link before the sentinel.
    pub fn last(&self) -> Option<NonNull<Link>> {
        let head = self.sentinel().as_ptr();
        // SAFETY: the sentinel is valid for the lifetime of self
        let prev = unsafe { (*head).prev };
        if prev == head {
            None
        } else {
            NonNull::new(prev)
        }
    }

    /// True if `link` is the first entry of this list.
    pub fn is_first(&self, link: NonNull<Link>) -> bool {
        self.first() == Some(link)
    }

    /// True if `link` is the last entry of this list.
    pub fn is_last(&self, link: NonNull<Link>) -> bool {
        self.last() == Some(link)
    }

    /// Append `node` at the tail, between the current last link and the
    /// sentinel.
    ///
    /// `node` must be detached or isolated. A link that already belongs to a
    /// list is refused with [`ListError::AlreadyLinked`] and nothing changes.
    ///
    /// # Safety
    /// `node` must point to a valid link that stays at the same address, and is
    /// not otherwise accessed mutably, for as long as it is a member of this
    /// list. It must not be the sentinel of any other `ListHead`: an empty
    /// list's sentinel is isolated and would be spliced in.
    pub unsafe fn insert_tail(&mut self, node: NonNull<Link>) -> Result<(), ListError> {
        let head = self.sentinel.as_ptr();
        let new = node.as_ptr();

        if new == head {
            return Err(ListError::SentinelInsert);
        }
        let next = (*new).next;
        if !next.is_null() && next != new {
            return Err(ListError::AlreadyLinked);
        }

        splice(new, (*head).prev, head);
        debug_assert!(self.check_invariants().is_ok());
        Ok(())
    }

    /// Walk the ring from the sentinel and verify that it is closed and that
    /// every `next`/`prev` pair is symmetric.
    ///
    /// Returns the number of non-sentinel links.
    pub fn check_invariants(&self) -> Result<usize, ListError> {
        let head = self.sentinel.as_ptr();
        let mut cur = head;
        let mut visited = 0;

        // A revisited link would need two different predecessors, which the
        // symmetry check rejects, so the walk ends at the sentinel or fails.
        loop {
            // SAFETY: cur is the sentinel or a link reached through checked
            // pointers of a list whose members are valid by insert contract
            let next = unsafe { (*cur).next };
            if next.is_null() || unsafe { (*next).prev } != cur {
                return Err(ListError::Corrupted { visited });
            }
            if next == head {
                return Ok(visited);
            }
            visited += 1;
            cur = next;
        }
    }

    /// Iterate over the links in insertion order, excluding the sentinel.
    ///
    /// Each step reads the `next` pointer of the link yielded before it, so the
    /// yielded link must stay valid and keep its pointers until the following
    /// call. Use [`ListHead::iter_safe`] when the visited link may go away.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            head: self.sentinel.as_ptr(),
            cur: self.sentinel.as_ptr(),
            _marker: PhantomData,
        }
    }

    /// Iterate over the links, reading each link's successor before yielding
    /// it.
    ///
    /// The caller may release or rewrite the yielded link before advancing;
    /// the successor must remain valid.
    pub fn iter_safe(&self) -> IterSafe<'_> {
        let head = self.sentinel.as_ptr();
        IterSafe {
            head,
            // SAFETY: the sentinel is valid for the lifetime of self
            next: unsafe { (*head).next },
            _marker: PhantomData,
        }
    }
}

impl Default for ListHead {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ListHead {
    fn drop(&mut self) {
        // SAFETY: allocated by Box in new() and never freed elsewhere
        drop(unsafe { Box::from_raw(self.sentinel.as_ptr()) });
    }
}

impl fmt::Debug for ListHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListHead")
            .field("sentinel", &self.sentinel)
            .field("len", &self.len())
            .finish()
    }
}

/// Raw traversal; see [`ListHead::iter`].
pub struct Iter<'a> {
    head: *mut Link,
    cur: *mut Link,
    _marker: PhantomData<&'a ListHead>,
}

impl Iterator for Iter<'_> {
    type Item = NonNull<Link>;

    fn next(&mut self) -> Option<NonNull<Link>> {
        // SAFETY: cur is the sentinel or a member link of a borrowed list
        let next = unsafe { (*self.cur).next };
        if next == self.head {
            return None;
        }
        self.cur = next;
        NonNull::new(next)
    }
}

impl FusedIterator for Iter<'_> {}

/// Removal-safe raw traversal; see [`ListHead::iter_safe`].
pub struct IterSafe<'a> {
    head: *mut Link,
    next: *mut Link,
    _marker: PhantomData<&'a ListHead>,
}

impl Iterator for IterSafe<'_> {
    type Item = NonNull<Link>;

    fn next(&mut self) -> Option<NonNull<Link>> {
        if self.next == self.head {
            return None;
        }
        let cur = self.next;
        // SAFETY: cur has not been yielded yet, so it is still a valid member
        self.next = unsafe { (*cur).next };
        NonNull::new(cur)
    }
}

impl FusedIterator for IterSafe<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ptr_of(link: &mut Link) -> NonNull<Link> {
        NonNull::from(link)
    }

    #[test]
    fn test_list_init() {
        let head = ListHead::new();
        let sentinel = head.sentinel().as_ptr();
        assert!(head.is_empty());
        unsafe {
            assert_eq!((*sentinel).next, sentinel);
            assert_eq!((*sentinel).prev, sentinel);
        }
        assert_eq!(head.iter().count(), 0);
        assert_eq!(head.iter_safe().count(), 0);
        assert_eq!(head.check_invariants(), Ok(0));
    }

    #[test]
    fn test_link_states() {
        let mut link = Link::new();
        assert!(link.is_detached());
        assert!(!link.is_linked());
        assert_eq!(link.next(), None);

        link.init();
        assert!(link.is_isolated());
        assert!(!link.is_linked());
        assert_eq!(link.next(), Some(ptr_of(&mut link)));
    }

    #[test]
    fn test_list_add_tail() {
        let mut head = ListHead::new();
        let mut entry1 = Link::new();
        let mut entry2 = Link::new();
        let p1 = ptr_of(&mut entry1);
        let p2 = ptr_of(&mut entry2);

        unsafe {
            head.insert_tail(p1).unwrap();
            assert_eq!(head.last(), Some(p1));

            head.insert_tail(p2).unwrap();
            assert_eq!(head.last(), Some(p2));
            assert_eq!((*p1.as_ptr()).next, p2.as_ptr());
        }
        assert!(head.is_first(p1));
        assert!(head.is_last(p2));
        assert!(!head.is_empty());
    }

    #[test]
    fn test_multiple_entries() {
        let mut head = ListHead::new();
        let mut e1 = Link::new();
        let mut e2 = Link::new();
        let mut e3 = Link::new();
        let (p1, p2, p3) = (ptr_of(&mut e1), ptr_of(&mut e2), ptr_of(&mut e3));
        let h = head.sentinel().as_ptr();

        unsafe {
            head.insert_tail(p1).unwrap();
            head.insert_tail(p2).unwrap();
            head.insert_tail(p3).unwrap();

            // head -> e1 -> e2 -> e3 -> head
            assert_eq!((*h).next, p1.as_ptr());
            assert_eq!((*p1.as_ptr()).next, p2.as_ptr());
            assert_eq!((*p2.as_ptr()).next, p3.as_ptr());
            assert_eq!((*p3.as_ptr()).next, h);

            assert_eq!((*h).prev, p3.as_ptr());
            assert_eq!((*p3.as_ptr()).prev, p2.as_ptr());
            assert_eq!((*p2.as_ptr()).prev, p1.as_ptr());
            assert_eq!((*p1.as_ptr()).prev, h);
        }

        let order: Vec<_> = head.iter().collect();
        assert_eq!(order, [p1, p2, p3]);
        assert_eq!(head.len(), 3);
        assert_eq!(head.check_invariants(), Ok(3));
    }

    #[test]
    fn test_isolated_link_accepted() {
        let mut head = ListHead::new();
        let mut entry = Link::new();
        entry.init();
        let p = ptr_of(&mut entry);

        unsafe { head.insert_tail(p).unwrap() };
        assert_eq!(head.len(), 1);
    }

    #[test]
    fn test_relink_rejected() {
        let mut first = ListHead::new();
        let mut second = ListHead::new();
        let mut a = Link::new();
        let mut b = Link::new();
        let (pa, pb) = (ptr_of(&mut a), ptr_of(&mut b));

        unsafe {
            first.insert_tail(pa).unwrap();
            first.insert_tail(pb).unwrap();

            assert_eq!(first.insert_tail(pa), Err(ListError::AlreadyLinked));
            assert_eq!(second.insert_tail(pb), Err(ListError::AlreadyLinked));
        }

        assert_eq!(first.check_invariants(), Ok(2));
        assert_eq!(second.check_invariants(), Ok(0));
    }

    #[test]
    fn test_sole_member_relink_rejected() {
        let mut first = ListHead::new();
        let mut second = ListHead::new();
        let mut a = Link::new();
        let pa = ptr_of(&mut a);

        unsafe {
            first.insert_tail(pa).unwrap();
            assert_eq!(second.insert_tail(pa), Err(ListError::AlreadyLinked));
        }
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_sentinel_insert_rejected() {
        let mut head = ListHead::new();
        let sentinel = head.sentinel();
        assert_eq!(
            unsafe { head.insert_tail(sentinel) },
            Err(ListError::SentinelInsert)
        );
        assert!(head.is_empty());
    }

    #[test]
    fn test_other_list_sentinel_unreachable_from_members() {
        // The only way to reach another list's sentinel through public API is
        // a member's neighbour pointer, and then that sentinel is linked.
        let mut first = ListHead::new();
        let mut second = ListHead::new();
        let mut a = Link::new();
        let pa = ptr_of(&mut a);

        unsafe {
            second.insert_tail(pa).unwrap();
            let foreign = (*pa.as_ptr()).next().unwrap();
            assert_eq!(foreign, second.sentinel());
            assert_eq!(first.insert_tail(foreign), Err(ListError::AlreadyLinked));
        }
        assert!(first.is_empty());
        assert_eq!(second.check_invariants(), Ok(1));
    }

    #[test]
    fn test_corruption_detected() {
        let mut head = ListHead::new();
        let mut a = Link::new();
        let mut b = Link::new();
        let (pa, pb) = (ptr_of(&mut a), ptr_of(&mut b));

        unsafe {
            head.insert_tail(pa).unwrap();
            head.insert_tail(pb).unwrap();
            (*pb.as_ptr()).prev = head.sentinel().as_ptr();
        }
        assert_eq!(
            head.check_invariants(),
            Err(ListError::Corrupted { visited: 1 })
        );
    }

    #[test]
    fn test_iter_safe_tolerates_rewritten_link() {
        let mut head = ListHead::new();
        let mut links = [Link::new(), Link::new(), Link::new()];
        let ptrs: Vec<_> = links.iter_mut().map(ptr_of).collect();
        for &p in &ptrs {
            unsafe { head.insert_tail(p).unwrap() };
        }

        let mut seen = Vec::new();
        for link in head.iter_safe() {
            seen.push(link);
            // Scribble over the visited link; the walk already holds its successor.
            unsafe {
                (*link.as_ptr()).next = ptr::null_mut();
                (*link.as_ptr()).prev = ptr::null_mut();
            }
        }
        assert_eq!(seen, ptrs);
    }

    #[test]
    fn test_head_moves_without_breaking_ring() {
        let mut head = ListHead::new();
        let mut a = Link::new();
        let pa = ptr_of(&mut a);
        unsafe { head.insert_tail(pa).unwrap() };

        let moved = Box::new(head);
        assert_eq!(moved.check_invariants(), Ok(1));
        assert_eq!(moved.first(), Some(pa));
    }
}
