//! Company record layout tests
//!
//! `Company` is `#[repr(C)]`: a 4-byte id, 40 bytes of name storage plus a
//! length byte, then the link at the next pointer-aligned offset.

use memoffset::offset_of;
use ringlet::{Company, CompanyName, NAME_CAPACITY};
use ringlet_abi_test::{verify_layout, verify_offset, verify_size};
use ringlet_list::{Link, ListEntry};
use static_assertions::*;

const WORD: usize = core::mem::size_of::<usize>();

const fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) / align * align
}

const LINK_AT: usize = align_up(4 + NAME_CAPACITY + 1, WORD);

verify_size!(CompanyName, NAME_CAPACITY + 1);
verify_offset!(Company, id, 0);
verify_offset!(Company, name, 4);
verify_offset!(Company, link, LINK_AT);
verify_size!(Company, LINK_AT + 2 * WORD);

assert_eq_align!(Company, Link);
const_assert_eq!(<Company as ListEntry>::LINK_OFFSET, LINK_AT);

#[test]
fn test_link_offset_matches_memoffset() {
    assert_eq!(<Company as ListEntry>::LINK_OFFSET, offset_of!(Company, link));
}

#[test]
fn test_link_is_last_field() {
    assert_eq!(
        offset_of!(Company, link) + core::mem::size_of::<Link>(),
        core::mem::size_of::<Company>()
    );
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_company_layout_64bit() {
    // 4 + 41 = 45, rounded up to 48
    assert_eq!(offset_of!(Company, link), 48);
    assert!(verify_layout::<Company>("Company", 64, 8).is_match());
}
