use std::fmt::Display;
use std::io::{self, Write};

/// The two channels of a run: discovered strings go to `out`, diagnostics to `err`.
pub struct Output<O, E> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> Output<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn class_entered(&mut self, class_name: &str) -> io::Result<()> {
        writeln!(self.err, ">> CLASS: {class_name}")
    }

    pub fn string(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b"\n")
    }

    pub fn failure(&mut self, label: &str, error: impl Display) -> io::Result<()> {
        writeln!(self.err, ">> ERROR: {label}: {error}")
    }

    pub fn diagnostic(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.err, "{line}")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}
