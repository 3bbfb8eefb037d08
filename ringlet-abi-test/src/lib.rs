//! Layout tests for ringlet links and records
//!
//! The list recovers a record from its link by a fixed byte offset, so the
//! offsets the crates compute must agree with the actual type layouts. This
//! crate checks them independently with `memoffset` and `static_assertions`.

use core::mem::{align_of, size_of};

#[doc(hidden)]
pub use memoffset;

/// Verify at compile time that a type has the expected size.
#[macro_export]
macro_rules! verify_size {
    ($rust_type:ty, $expected_size:expr) => {
        const _: () = {
            const SIZE: usize = ::core::mem::size_of::<$rust_type>();
            const EXPECTED: usize = $expected_size;

            assert!(SIZE == EXPECTED, "Size mismatch");
        };
    };
}

/// Verify at compile time that a field sits at the expected offset.
#[macro_export]
macro_rules! verify_offset {
    ($type:ty, $field:ident, $expected_offset:expr) => {
        const _: () = {
            const OFFSET: usize = $crate::memoffset::offset_of!($type, $field);
            const EXPECTED: usize = $expected_offset;

            assert!(OFFSET == EXPECTED, "Offset mismatch");
        };
    };
}

/// Outcome of comparing a type's layout with the expected one.
#[derive(Debug, PartialEq, Eq)]
pub struct LayoutReport {
    pub type_name: &'static str,
    pub size_match: bool,
    pub align_match: bool,
}

impl LayoutReport {
    pub fn is_match(&self) -> bool {
        self.size_match && self.align_match
    }
}

/// Compare the size and alignment of `T` with expected values.
pub fn verify_layout<T>(
    type_name: &'static str,
    expected_size: usize,
    expected_align: usize,
) -> LayoutReport {
    LayoutReport {
        type_name,
        size_match: size_of::<T>() == expected_size,
        align_match: align_of::<T>() == expected_align,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_report() {
        let report = verify_layout::<u64>("u64", 8, align_of::<u64>());
        assert!(report.is_match());

        let report = verify_layout::<u64>("u64", 4, align_of::<u64>());
        assert!(!report.is_match());
    }
}
