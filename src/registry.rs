//! The record store: owns company records and the list that orders them.

use std::convert::Infallible;
use std::fmt;

use ringlet_list::{Entries, TypedList};
use ringlet_mm::{free, try_alloc, Allocator, Global};
use tracing::{debug, error};

use crate::company::{Company, CompanyName};
use crate::error::Result;

/// Companies in insertion order.
///
/// The registry allocates each record, links it at the tail of its list and
/// keeps it until the registry itself is dropped. There is no per-record
/// removal.
pub struct Registry<A: Allocator = Global> {
    list: TypedList<Company>,
    allocator: A,
}

impl Registry<Global> {
    pub fn new() -> Self {
        Self::with_allocator(Global)
    }
}

impl Default for Registry<Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Allocator> Registry<A> {
    pub fn with_allocator(allocator: A) -> Self {
        Self {
            list: TypedList::new(),
            allocator,
        }
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Allocate a company, link it at the tail, and return it.
    ///
    /// If allocation fails the list is left untouched.
    pub fn create(&mut self, id: i32, name: CompanyName) -> Result<&Company> {
        let record = try_alloc(&self.allocator, Company::new(id, name)).map_err(|e| {
            error!(id, error = %e, "company allocation failed");
            e
        })?;

        // SAFETY: record is a fresh allocation owned by this registry; it stays
        // in place until drop, which unlinks nothing and frees every record
        unsafe {
            (*record.as_ptr()).link.init();
            if let Err(e) = self.list.push_back(record) {
                free(&self.allocator, record);
                return Err(e.into());
            }
        }

        debug!(id, name = %name, len = self.list.len(), "company linked");
        // SAFETY: linked records live as long as the registry
        Ok(unsafe { record.as_ref() })
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Companies in the order they were created.
    pub fn iter(&self) -> Entries<'_, Company> {
        self.list.iter()
    }

    /// Visit every company with its 1-based ordinal, stopping at the first
    /// error.
    pub fn try_for_each<E, F>(&self, mut visit: F) -> std::result::Result<(), E>
    where
        F: FnMut(usize, &Company) -> std::result::Result<(), E>,
    {
        self.iter()
            .enumerate()
            .try_for_each(|(index, company)| visit(index + 1, company))
    }

    /// Visit every company with its 1-based ordinal.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(usize, &Company),
    {
        let _ = self.try_for_each::<Infallible, _>(|ordinal, company| {
            visit(ordinal, company);
            Ok(())
        });
    }
}

impl<A: Allocator> Drop for Registry<A> {
    fn drop(&mut self) {
        for record in self.list.iter_safe() {
            // SAFETY: every linked record came from try_alloc on this
            // allocator, and iter_safe has already read its successor
            unsafe { free(&self.allocator, record) };
        }
    }
}

impl<A: Allocator> fmt::Debug for Registry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("len", &self.len()).finish()
    }
}
