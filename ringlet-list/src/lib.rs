//! Intrusive circular doubly-linked list
//!
//! The link pointers live inside each record as a [`Link`] field instead of in
//! a separate wrapper node. A list is represented by a heap-allocated sentinel
//! link ([`ListHead`]) that carries no payload; an empty list is a sentinel
//! whose `next` and `prev` both point at itself.
//!
//! Two traversal layers are provided:
//!
//! - raw traversal over links ([`ListHead::iter`], [`ListHead::iter_safe`])
//! - typed traversal over records ([`TypedList`]), which recovers the owning
//!   record from its embedded link using the fixed offset declared by
//!   [`ListEntry`]
//!
//! ```
//! use core::ptr::NonNull;
//! use ringlet_list::{list_entry, Link, TypedList};
//!
//! #[repr(C)]
//! struct Item {
//!     value: u32,
//!     link: Link,
//! }
//!
//! list_entry!(Item, link);
//!
//! let mut a = Item { value: 1, link: Link::new() };
//! let mut b = Item { value: 2, link: Link::new() };
//! let mut list = TypedList::<Item>::new();
//! unsafe {
//!     list.push_back(NonNull::from(&mut a)).unwrap();
//!     list.push_back(NonNull::from(&mut b)).unwrap();
//! }
//! let values: Vec<u32> = list.iter().map(|item| item.value).collect();
//! assert_eq!(values, [1, 2]);
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod entry;
mod error;
mod link;

pub use entry::{entry_of, link_of, Entries, EntriesSafe, ListEntry, TypedList};
pub use error::ListError;
pub use link::{Iter, IterSafe, Link, ListHead};
