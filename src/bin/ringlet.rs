//! ringlet: read company records and print them back in insertion order
//!
//! Prompts for an identifier and a name for each record on stdin, links every
//! record onto one intrusive list, then prints one line per record.
//!
//! ## Configuration
//! - RINGLET_CONFIG: YAML config file (default: ringlet.yaml, optional)
//! - RINGLET_RECORDS: number of records to read (default: 3)
//! - RINGLET_NAME_OVERFLOW: `reject` or `truncate` over-long names (default: reject)
//! - RINGLET_LOG: tracing filter (default: warn), written to stderr

use std::io::{self, Write};

use tracing::{error, info};

use ringlet::bootstrap::init_tracing;
use ringlet::{print_all, Config, Prompter, Registry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::load().inspect_err(|e| error!(error = %e, "invalid configuration"))?;
    info!(
        records = config.records,
        name_overflow = ?config.name_overflow,
        "ringlet started"
    );

    let mut registry = Registry::new();
    {
        let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock(), config.name_overflow);
        prompter
            .fill(&mut registry, config.records)
            .inspect_err(|e| error!(error = %e, "failed to read companies"))?;
    }

    let mut out = io::stdout().lock();
    print_all(&registry, &mut out)?;
    out.flush()?;

    info!(records = registry.len(), "ringlet finished");
    Ok(())
}
