//! Isolated output capture for a single render.
//!
//! A [`Capture`] is the only place a template writes to. It is created right
//! before execution and owned by that one render call, so a failing template
//! can never leak partial output into anything the caller sees: the text
//! only leaves the buffer through [`Capture::finish`]. Dropping a capture
//! (on an error path or during a panic unwind) discards it.

use std::io;

use crate::error::{Result, ViewError};

/// In-memory writer that collects one template's output.
#[derive(Debug, Default)]
pub struct Capture {
    buf: Vec<u8>,
}

impl Capture {
    /// Opens a fresh, empty capture scope.
    pub fn begin() -> Self {
        Self::default()
    }

    /// Number of bytes captured so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Closes the scope and returns the captured text.
    ///
    /// `name` is only used to label the error if the output is not UTF-8.
    pub fn finish(self, name: &str) -> Result<String> {
        String::from_utf8(self.buf).map_err(|e| ViewError::execution(name, e.to_string()))
    }

    /// Closes the scope, dropping whatever was written.
    pub fn discard(self) {}
}

impl io::Write for Capture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
