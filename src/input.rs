//! Prompt-driven reading of company records.

use std::collections::VecDeque;
use std::io::{self, BufRead, Read, Write};

use ringlet_mm::Allocator;
use tracing::warn;

use crate::company::{CompanyName, NAME_CAPACITY};
use crate::config::OverflowPolicy;
use crate::error::{Error, Result};
use crate::registry::Registry;

const ID_PROMPT: &str = "enter serial number for company";
const NAME_PROMPT: &str = "enter name of company";

/// Longest input line read in one go: a full name, an `i32` identifier and
/// some whitespace.
pub const MAX_LINE: usize = NAME_CAPACITY + 24;

/// Reads whitespace-delimited tokens from `reader`, writing a prompt to
/// `writer` before each field.
///
/// Tokens may be spread over any number of lines: several fields on one line
/// and blank lines between fields are both accepted. No line is read past
/// [`MAX_LINE`] bytes; what follows on an overlong line is skipped unread.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
    pending: VecDeque<String>,
    policy: OverflowPolicy,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W, policy: OverflowPolicy) -> Self {
        Self {
            reader,
            writer,
            pending: VecDeque::new(),
            policy,
        }
    }

    /// Give back the writer, e.g. to inspect prompts in tests.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{}", text)?;
        self.writer.flush()?;
        Ok(())
    }

    fn next_token(&mut self, what: &'static str) -> Result<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let mut line = Vec::new();
            let read = (&mut self.reader)
                .take(MAX_LINE as u64)
                .read_until(b'\n', &mut line)?;
            if read == 0 {
                return Err(Error::UnexpectedEof(what));
            }
            if line.last() != Some(&b'\n') {
                let skipped = self.skip_rest_of_line()?;
                if skipped > 0 {
                    let len = read + skipped;
                    match self.policy {
                        OverflowPolicy::Reject => {
                            return Err(Error::InputTooLong {
                                len,
                                capacity: MAX_LINE,
                            })
                        }
                        OverflowPolicy::Truncate => {
                            warn!(len, limit = MAX_LINE, "input line truncated")
                        }
                    }
                }
            }
            self.pending
                .extend(decode(&line)?.split_whitespace().map(str::to_owned));
        }
    }

    /// Consume input up to and including the next newline without keeping
    /// it. Returns the number of bytes dropped before the newline.
    fn skip_rest_of_line(&mut self) -> Result<usize> {
        let mut skipped = 0;
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(skipped);
            }
            let (used, done) = match buf.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (buf.len(), false),
            };
            self.reader.consume(used);
            if done {
                return Ok(skipped + used - 1);
            }
            skipped += used;
        }
    }

    /// Prompt for and read a company identifier.
    pub fn read_id(&mut self) -> Result<i32> {
        self.prompt(ID_PROMPT)?;
        let token = self.next_token("company id")?;
        token.parse().map_err(|_| Error::InvalidId(token))
    }

    /// Prompt for and read a company name, bounded by [`NAME_CAPACITY`].
    pub fn read_name(&mut self) -> Result<CompanyName> {
        self.prompt(NAME_PROMPT)?;
        let token = self.next_token("company name")?;
        match self.policy {
            OverflowPolicy::Reject => CompanyName::new(&token),
            OverflowPolicy::Truncate => {
                let name = CompanyName::truncated(&token);
                if name.len() < token.len() {
                    warn!(
                        len = token.len(),
                        capacity = NAME_CAPACITY,
                        kept = %name,
                        "company name truncated"
                    );
                }
                Ok(name)
            }
        }
    }

    /// Read one identifier and one name.
    pub fn read_company(&mut self) -> Result<(i32, CompanyName)> {
        let id = self.read_id()?;
        let name = self.read_name()?;
        Ok((id, name))
    }

    /// Read `count` companies into `registry`, in order.
    pub fn fill<A: Allocator>(&mut self, registry: &mut Registry<A>, count: usize) -> Result<()> {
        for _ in 0..count {
            let (id, name) = self.read_company()?;
            registry.create(id, name)?;
        }
        Ok(())
    }
}

/// Decode a line as UTF-8, dropping a character cut short by [`MAX_LINE`].
fn decode(line: &[u8]) -> Result<&str> {
    let valid = match std::str::from_utf8(line) {
        Ok(text) => return Ok(text),
        Err(err) if err.error_len().is_none() => err.valid_up_to(),
        Err(err) => return Err(io::Error::new(io::ErrorKind::InvalidData, err).into()),
    };
    std::str::from_utf8(&line[..valid])
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
}
