//! Incremental writer for streamed tokens.

use std::io::{self, Write};

/// Writes tokens as they arrive, flushing after each one.
pub struct TokenWriter<W: Write> {
    out: W,
    bytes: usize,
    at_line_start: bool,
}

impl TokenWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TokenWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bytes: 0,
            at_line_start: true,
        }
    }

    pub fn write_token(&mut self, token: &str) -> io::Result<()> {
        if token.is_empty() {
            return Ok(());
        }
        self.out.write_all(token.as_bytes())?;
        self.out.flush()?;
        self.bytes += token.len();
        self.at_line_start = token.ends_with('\n');
        Ok(())
    }

    /// Bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.bytes
    }

    /// Terminate the current line unless the output already ends with one.
    pub fn finish_line(&mut self) -> io::Result<()> {
        if !self.at_line_start {
            self.out.write_all(b"\n")?;
            self.out.flush()?;
            self.at_line_start = true;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
