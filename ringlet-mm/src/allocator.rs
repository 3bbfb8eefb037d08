//! Fallible allocator interface

use alloc::alloc::{alloc, dealloc, Layout};
use core::ptr::{self, NonNull};

/// An allocation request could not be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("failed to allocate {size} bytes (align {align})")]
pub struct AllocError {
    pub size: usize,
    pub align: usize,
}

impl From<Layout> for AllocError {
    fn from(layout: Layout) -> Self {
        Self {
            size: layout.size(),
            align: layout.align(),
        }
    }
}

/// Source of record memory
pub trait Allocator {
    /// Allocate a block for `layout`, or report why not.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Return a block to the allocator.
    ///
    /// # Safety
    /// `ptr` must come from `allocate` on this allocator with the same layout,
    /// and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }
}

/// The process heap.
#[derive(Debug, Clone, Copy, Default)]
pub struct Global;

impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            // Zero-sized blocks need no memory, only an aligned address
            return NonNull::new(layout.align() as *mut u8).ok_or(AllocError::from(layout));
        }
        // SAFETY: layout has non-zero size
        NonNull::new(unsafe { alloc(layout) }).ok_or(AllocError::from(layout))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            dealloc(ptr.as_ptr(), layout);
        }
    }
}

/// Move `value` into a fresh allocation from `allocator`.
///
/// On failure `value` is dropped and nothing is allocated.
pub fn try_alloc<T, A: Allocator + ?Sized>(allocator: &A, value: T) -> Result<NonNull<T>, AllocError> {
    let ptr = allocator.allocate(Layout::new::<T>())?.cast::<T>();
    // SAFETY: the block is sized and aligned for T
    unsafe { ptr.as_ptr().write(value) };
    Ok(ptr)
}

/// Drop the value at `ptr` and return its memory to `allocator`.
///
/// # Safety
/// `ptr` must come from [`try_alloc`] on the same allocator and must not be
/// used afterwards.
pub unsafe fn free<T, A: Allocator + ?Sized>(allocator: &A, ptr: NonNull<T>) {
    ptr::drop_in_place(ptr.as_ptr());
    allocator.deallocate(ptr.cast(), Layout::new::<T>());
}
