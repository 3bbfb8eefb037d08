//! Human-readable rendering of records.

use std::io::{self, Write};

use ringlet_mm::Allocator;

use crate::company::Company;
use crate::registry::Registry;

/// One line for one record: ordinal, identifier, and name.
pub fn render_record(ordinal: usize, company: &Company) -> String {
    format!("{} payload is: {}  and  {}", ordinal, company.id, company.name)
}

/// Write every record of `registry` to `out`, one line each, in insertion
/// order.
pub fn print_all<A: Allocator, W: Write>(registry: &Registry<A>, out: &mut W) -> io::Result<()> {
    registry.try_for_each(|ordinal, company| writeln!(out, "{}", render_record(ordinal, company)))
}
