//! The company record and its bounded name field.

use std::fmt;

use ringlet_list::{list_entry, Link};

use crate::error::{Error, Result};

/// Bytes of inline storage for a company name.
pub const NAME_CAPACITY: usize = 40;

/// A company name stored inline in at most [`NAME_CAPACITY`] bytes of UTF-8.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CompanyName {
    bytes: [u8; NAME_CAPACITY],
    len: u8,
}

impl CompanyName {
    /// Store `name`, refusing it if it does not fit.
    pub fn new(name: &str) -> Result<Self> {
        if name.len() > NAME_CAPACITY {
            return Err(Error::InputTooLong {
                len: name.len(),
                capacity: NAME_CAPACITY,
            });
        }
        Ok(Self::copy_from(name))
    }

    /// Store the longest prefix of `name` that fits without splitting a
    /// character.
    pub fn truncated(name: &str) -> Self {
        let mut end = name.len().min(NAME_CAPACITY);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        Self::copy_from(&name[..end])
    }

    fn copy_from(name: &str) -> Self {
        let mut bytes = [0; NAME_CAPACITY];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        Self {
            bytes,
            len: name.len() as u8,
        }
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: bytes[..len] is always copied whole from a &str, cut on a
        // char boundary
        unsafe { std::str::from_utf8_unchecked(&self.bytes[..self.len()]) }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for CompanyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for CompanyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CompanyName {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        Self::new(name)
    }
}

/// A company record.
///
/// The embedded `link` threads the record onto a [`Registry`]'s list; the
/// record owns it and both are released together.
///
/// [`Registry`]: crate::Registry
#[repr(C)]
#[derive(Debug)]
pub struct Company {
    pub id: i32,
    pub name: CompanyName,
    pub link: Link,
}

list_entry!(Company, link);

impl Company {
    /// Build an unlinked record.
    pub fn new(id: i32, name: CompanyName) -> Self {
        Self {
            id,
            name,
            link: Link::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_at_capacity() {
        let exact = "x".repeat(NAME_CAPACITY);
        let name = CompanyName::new(&exact).unwrap();
        assert_eq!(name.as_str(), exact);
        assert_eq!(name.len(), NAME_CAPACITY);
    }

    #[test]
    fn test_name_over_capacity_rejected() {
        let long = "x".repeat(NAME_CAPACITY + 1);
        match CompanyName::new(&long) {
            Err(Error::InputTooLong { len, capacity }) => {
                assert_eq!(len, NAME_CAPACITY + 1);
                assert_eq!(capacity, NAME_CAPACITY);
            }
            other => panic!("expected InputTooLong, got {other:?}"),
        }
    }

    #[test]
    fn test_truncation_keeps_prefix() {
        let long = format!("{}tail", "a".repeat(NAME_CAPACITY));
        let name = CompanyName::truncated(&long);
        assert_eq!(name.as_str(), "a".repeat(NAME_CAPACITY));
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        // 39 ASCII bytes followed by a two-byte character straddling the limit
        let long = format!("{}é", "a".repeat(NAME_CAPACITY - 1));
        let name = CompanyName::truncated(&long);
        assert_eq!(name.len(), NAME_CAPACITY - 1);
        assert!(name.as_str().chars().all(|c| c == 'a'));
    }

    #[test]
    fn test_short_name_untouched_by_truncation() {
        assert_eq!(CompanyName::truncated("gamma").as_str(), "gamma");
    }

    #[test]
    fn test_empty_name() {
        let name = CompanyName::try_from("").unwrap();
        assert!(name.is_empty());
        assert_eq!(name.to_string(), "");
    }

    #[test]
    fn test_new_company_is_detached() {
        let company = Company::new(1, CompanyName::new("alpha").unwrap());
        assert!(company.link.is_detached());
        assert_eq!(format!("{:?}", company.name), "\"alpha\"");
    }
}
