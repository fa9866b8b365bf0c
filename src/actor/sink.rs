//! Line sinks: where the render actor writes finished lines.

use crossbeam_channel::Sender;
use std::io::{self, Write};

/// Destination for rendered lines. Owned by the render actor, so writes
/// never interleave.
pub trait LineSink: Send {
    /// Write one complete line. An error is fatal for the bar.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Writes each line plus `\n` to any writer and flushes it.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    /// Wrap a writer.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> LineSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        // One buffer, one write: a line never reaches the reader in pieces.
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        self.writer.write_all(&buf)?;
        self.writer.flush()
    }
}

impl LineSink for Sender<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.send(line.to_string())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "line receiver dropped"))
    }
}
