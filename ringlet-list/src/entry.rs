//! Typed traversal: recovering records from their embedded links

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::{Iter, IterSafe, Link, ListError, ListHead};

/// A record type that embeds a [`Link`] at a fixed offset.
///
/// Implement it with [`list_entry!`](crate::list_entry), which computes the
/// offset from the type's layout at compile time and checks that the named
/// field really is a `Link`.
///
/// # Safety
/// `LINK_OFFSET` must be the byte offset of a `Link` field inside `Self`.
pub unsafe trait ListEntry: Sized {
    /// Byte offset of the embedded link.
    const LINK_OFFSET: usize;
}

/// Implement [`ListEntry`] for a record type and its link field.
///
/// ```
/// use ringlet_list::{list_entry, Link, ListEntry};
///
/// #[repr(C)]
/// struct Job {
///     id: u64,
///     queue: Link,
/// }
///
/// list_entry!(Job, queue);
/// assert_eq!(<Job as ListEntry>::LINK_OFFSET, 8);
/// ```
#[macro_export]
macro_rules! list_entry {
    ($type:ty, $field:ident) => {
        const _: fn(&$type) -> &$crate::Link = |entry| &entry.$field;

        unsafe impl $crate::ListEntry for $type {
            const LINK_OFFSET: usize = ::core::mem::offset_of!($type, $field);
        }
    };
}

/// Recover the record that owns `link`.
///
/// # Safety
/// `link` must be the embedded link of a live `T`, obtained from a pointer to
/// that `T`. Passing a sentinel or a link of another type is undefined.
pub unsafe fn entry_of<T: ListEntry>(link: NonNull<Link>) -> NonNull<T> {
    NonNull::new_unchecked(link.as_ptr().cast::<u8>().sub(T::LINK_OFFSET).cast::<T>())
}

/// Embedded link of a record.
pub fn link_of<T: ListEntry>(entry: &T) -> &Link {
    // SAFETY: ListEntry guarantees a Link at LINK_OFFSET inside T
    unsafe { &*raw_link_of(NonNull::from(entry)).as_ptr() }
}

/// Like [`link_of`], but keeps the provenance of the record pointer so the
/// link can later be turned back into the record.
fn raw_link_of<T: ListEntry>(entry: NonNull<T>) -> NonNull<Link> {
    // SAFETY: LINK_OFFSET lies inside T, so the result is in bounds and non-null
    unsafe { NonNull::new_unchecked(entry.as_ptr().cast::<u8>().add(T::LINK_OFFSET).cast()) }
}

/// A list of `T` records linked through their embedded [`Link`].
///
/// The list never owns its records. Whoever allocates a record keeps
/// ownership and must keep it alive and in place while it is linked.
pub struct TypedList<T: ListEntry> {
    head: ListHead,
    _marker: PhantomData<*const T>,
}

impl<T: ListEntry> TypedList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            head: ListHead::new(),
            _marker: PhantomData,
        }
    }

    /// The untyped list underneath.
    pub fn head(&self) -> &ListHead {
        &self.head
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty()
    }

    pub fn len(&self) -> usize {
        self.head.len()
    }

    /// Append a record at the tail.
    ///
    /// Fails with [`ListError::AlreadyLinked`] if the record's link is already
    /// a member of a list.
    ///
    /// # Safety
    /// `entry` must point to a valid `T` that outlives its membership, does not
    /// move while linked, and is not mutably accessed while the list is
    /// iterated.
    pub unsafe fn push_back(&mut self, entry: NonNull<T>) -> Result<(), ListError> {
        self.head.insert_tail(raw_link_of(entry))
    }

    /// Records in insertion order.
    pub fn iter(&self) -> Entries<'_, T> {
        Entries {
            links: self.head.iter(),
            _marker: PhantomData,
        }
    }

    /// Records in insertion order, each successor read before its predecessor
    /// is yielded. The yielded record may be released before advancing.
    pub fn iter_safe(&self) -> EntriesSafe<'_, T> {
        EntriesSafe {
            links: self.head.iter_safe(),
            _marker: PhantomData,
        }
    }
}

impl<T: ListEntry> Default for TypedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ListEntry> fmt::Debug for TypedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedList").field("head", &self.head).finish()
    }
}

impl<'a, T: ListEntry> IntoIterator for &'a TypedList<T> {
    type Item = &'a T;
    type IntoIter = Entries<'a, T>;

    fn into_iter(self) -> Entries<'a, T> {
        self.iter()
    }
}

/// Typed traversal; see [`TypedList::iter`].
pub struct Entries<'a, T> {
    links: Iter<'a>,
    _marker: PhantomData<&'a T>,
}

impl<'a, T: ListEntry> Iterator for Entries<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        // SAFETY: every non-sentinel link was pushed from a live T
        self.links
            .next()
            .map(|link| unsafe { &*entry_of::<T>(link).as_ptr() })
    }
}

impl<T: ListEntry> FusedIterator for Entries<'_, T> {}

/// Removal-safe typed traversal; see [`TypedList::iter_safe`].
pub struct EntriesSafe<'a, T> {
    links: IterSafe<'a>,
    _marker: PhantomData<&'a T>,
}

impl<T: ListEntry> Iterator for EntriesSafe<'_, T> {
    type Item = NonNull<T>;

    fn next(&mut self) -> Option<NonNull<T>> {
        // SAFETY: every non-sentinel link was pushed from a live T
        self.links.next().map(|link| unsafe { entry_of::<T>(link) })
    }
}

impl<T: ListEntry> FusedIterator for EntriesSafe<'_, T> {}
