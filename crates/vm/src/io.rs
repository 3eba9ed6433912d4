//! I/O boundary between the VM and the outside world.
//!
//! Input is line oriented: every READ consumes one line. A missing or
//! unparsable line yields `None`, which the VM stores as `nil`.

use ipp_common::value::{format_hex_float, parse_float, parse_int};
use std::io::{self, BufRead, Write};

/// Source of values for READ.
pub trait InputReader {
    fn read_int(&mut self) -> Option<i64>;
    fn read_bool(&mut self) -> Option<bool>;
    fn read_string(&mut self) -> Option<String>;
    fn read_float(&mut self) -> Option<f64>;
}

/// Sink for WRITE and DPRINT.
///
/// Strings arrive with escapes already decoded. The typed methods default
/// to the textual forms used by WRITE.
pub trait OutputWriter {
    fn write_string(&mut self, text: &str) -> io::Result<()>;

    fn write_int(&mut self, value: i64) -> io::Result<()> {
        self.write_string(&value.to_string())
    }

    fn write_bool(&mut self, value: bool) -> io::Result<()> {
        self.write_string(if value { "true" } else { "false" })
    }

    fn write_float(&mut self, value: f64) -> io::Result<()> {
        self.write_string(&format_hex_float(value))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reads one value per line from a buffered reader.
pub struct LineReader<R> {
    inner: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.inner.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
        }
    }
}

impl<R: BufRead> InputReader for LineReader<R> {
    fn read_int(&mut self) -> Option<i64> {
        self.next_line().and_then(|l| parse_int(&l))
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.next_line()
            .map(|l| l.trim().eq_ignore_ascii_case("true"))
    }

    fn read_string(&mut self) -> Option<String> {
        self.next_line()
    }

    fn read_float(&mut self) -> Option<f64> {
        self.next_line().and_then(|l| parse_float(&l))
    }
}

/// Writes output to any `io::Write`.
pub struct StreamWriter<W> {
    inner: W,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> OutputWriter for StreamWriter<W> {
    fn write_string(&mut self, text: &str) -> io::Result<()> {
        self.inner.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
