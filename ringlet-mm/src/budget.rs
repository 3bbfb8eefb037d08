//! Allocation budgets for exercising out-of-memory paths

use alloc::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

use crate::{AllocError, Allocator, Global};

/// Wraps an allocator and refuses every request once `budget` allocations
/// have been granted. Also tracks how many blocks are still live.
#[derive(Debug)]
pub struct Budgeted<A = Global> {
    inner: A,
    remaining: Cell<usize>,
    live: Cell<usize>,
}

impl Budgeted<Global> {
    pub fn new(budget: usize) -> Self {
        Self::with_inner(Global, budget)
    }
}

impl<A: Allocator> Budgeted<A> {
    pub fn with_inner(inner: A, budget: usize) -> Self {
        Self {
            inner,
            remaining: Cell::new(budget),
            live: Cell::new(0),
        }
    }

    /// Allocations still allowed.
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }

    /// Blocks allocated and not yet returned.
    pub fn live(&self) -> usize {
        self.live.get()
    }
}

impl<A: Allocator> Allocator for Budgeted<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let remaining = self.remaining.get();
        if remaining == 0 {
            return Err(AllocError::from(layout));
        }
        let ptr = self.inner.allocate(layout)?;
        self.remaining.set(remaining - 1);
        self.live.set(self.live.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.live.set(self.live.get() - 1);
        self.inner.deallocate(ptr, layout);
    }
}
