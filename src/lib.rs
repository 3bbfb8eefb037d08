//! ringlet: company records kept in insertion order on an intrusive list
//!
//! Each [`Company`] embeds the link that threads it onto the list, so the
//! list needs no node allocations of its own. A [`Registry`] owns the list
//! sentinel and the records; it is the single context object every operation
//! goes through.
//!
//! ## Architecture
//! ```text
//! stdin --> Prompter --> Registry::create --> TypedList<Company> (ringlet-list)
//!                             |
//!                             +--> try_alloc (ringlet-mm)
//!
//! Registry::try_for_each --> render_record --> stdout
//! ```

pub mod bootstrap;
pub mod company;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod registry;

pub use company::{Company, CompanyName, NAME_CAPACITY};
pub use config::{Config, ConfigError, OverflowPolicy};
pub use error::{Error, Result};
pub use input::{Prompter, MAX_LINE};
pub use output::{print_all, render_record};
pub use registry::Registry;
