//! Output sinks for text published by the dispatcher.
//!
//! The help command does not print to the console. It opens a sink, writes one
//! NUL-terminated frame per line and closes the sink again, so an external
//! reader process can pick the text up. The traits here mirror a one-shot,
//! write-only connection: [`Open`] produces a [`Stream`], frames are pushed
//! with [`Write`] and the stream is consumed by [`Close`].
//!
//! Two sinks ship with the crate:
//!
//! - [`MemorySink`]: fixed-capacity buffer, `no_std` friendly, handy for tests
//!   and for boards that forward help text over their own transport
//! - [`fifo::FifoSink`] (feature `std`, unix hosts): a named pipe on the host filesystem
//!
//! ```rust
//! use vboard::sink::{MemorySink, Open, Write, Close, write_frame};
//!
//! let mut sink: MemorySink<64> = MemorySink::new();
//! let mut stream = sink.open().unwrap();
//! write_frame(&mut stream, "hello\n").unwrap();
//! stream.close().unwrap();
//!
//! assert_eq!(sink.frames().collect::<Vec<_>>(), ["hello\n"]);
//! ```

#![deny(unsafe_code)]

use heapless::Vec;

/// Named-pipe sink for hosts with a filesystem.
#[cfg(all(feature = "std", unix))]
pub mod fifo;

/// Terminator written after every frame.
pub const FRAME_TERMINATOR: u8 = 0;

/// A common error type for sink operations.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// No destination has been configured for the sink.
    Unconfigured,
    /// The destination could not be opened.
    Open,
    /// The destination did not become ready within the configured bound.
    Timeout,
    /// An error occurred during a write operation.
    Write,
    /// The sink ran out of space.
    Overflow,
    /// The destination could not be closed cleanly.
    Close,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            Error::Unconfigured => "sink destination not configured",
            Error::Open => "sink destination could not be opened",
            Error::Timeout => "sink destination not ready in time",
            Error::Write => "write to sink failed",
            Error::Overflow => "sink is full",
            Error::Close => "sink could not be closed",
        };
        f.write_str(text)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Unconfigured => defmt::write!(f, "Unconfigured"),
            Error::Open => defmt::write!(f, "Open"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::Write => defmt::write!(f, "Write"),
            Error::Overflow => defmt::write!(f, "Overflow"),
            Error::Close => defmt::write!(f, "Close"),
        }
    }
}

/// Byte-oriented output half of a sink stream.
pub trait Write {
    /// Write some bytes, returning how many were accepted
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error>;
    /// Flush buffered bytes to the destination
    fn flush(&mut self) -> Result<(), Error>;

    /// Write the whole buffer, retrying partial writes.
    fn write_all(&mut self, mut buf: &[u8]) -> Result<(), Error> {
        while !buf.is_empty() {
            match self.write(buf)? {
                0 => return Err(Error::Write),
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }
}

/// Consuming close of a sink stream.
pub trait Close {
    /// Close the stream
    fn close(self) -> Result<(), Error>;
}

/// A write-only stream towards an external reader.
pub trait Stream: Write + Close {}

impl<T: Write + Close> Stream for T {}

/// A sink that can be opened for one publication at a time.
pub trait Open {
    /// Stream returned by [`open`](Open::open)
    type Stream<'a>: Stream
    where
        Self: 'a;

    /// Open the destination for writing
    fn open(&mut self) -> Result<Self::Stream<'_>, Error>;
}

/// Write `text` followed by [`FRAME_TERMINATOR`].
pub fn write_frame<W: Write + ?Sized>(stream: &mut W, text: &str) -> Result<(), Error> {
    stream.write_all(text.as_bytes())?;
    stream.write_all(&[FRAME_TERMINATOR])
}

/// In-memory sink with a fixed capacity of `N` bytes.
///
/// Every session appends to the same buffer; [`frames`](MemorySink::frames)
/// splits it back into the published frames.
#[derive(Debug, Default)]
pub struct MemorySink<const N: usize> {
    data: Vec<u8, N>,
    sessions: usize,
}

impl<const N: usize> MemorySink<N> {
    /// Create an empty sink
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            sessions: 0,
        }
    }

    /// Raw bytes written so far, terminators included
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of times the sink has been opened
    pub fn sessions(&self) -> usize {
        self.sessions
    }

    /// Iterate over the NUL-terminated frames written so far.
    ///
    /// Frames that are not valid UTF-8 are skipped.
    pub fn frames(&self) -> impl Iterator<Item = &str> + '_ {
        self.data
            .split(|&b| b == FRAME_TERMINATOR)
            .filter(|frame| !frame.is_empty())
            .filter_map(|frame| core::str::from_utf8(frame).ok())
    }

    /// Drop everything written so far
    pub fn clear(&mut self) {
        self.data.clear();
        self.sessions = 0;
    }
}

/// Stream over a [`MemorySink`] buffer.
#[derive(Debug)]
pub struct MemoryStream<'a, const N: usize> {
    data: &'a mut Vec<u8, N>,
}

impl<const N: usize> Write for MemoryStream<'_, N> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.data
            .extend_from_slice(buf)
            .map_err(|_| Error::Overflow)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl<const N: usize> Close for MemoryStream<'_, N> {
    fn close(self) -> Result<(), Error> {
        Ok(())
    }
}

impl<const N: usize> Open for MemorySink<N> {
    type Stream<'a>
        = MemoryStream<'a, N>
    where
        Self: 'a;

    fn open(&mut self) -> Result<Self::Stream<'_>, Error> {
        self.sessions += 1;
        Ok(MemoryStream {
            data: &mut self.data,
        })
    }
}
