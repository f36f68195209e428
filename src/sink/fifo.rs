//! Named-pipe (FIFO) sink.
//!
//! A blocking write-only open on a FIFO waits for a reader forever. The sink
//! opens with `O_NONBLOCK` instead, which fails with `ENXIO` while nobody
//! reads, and retries until [`FifoSink::timeout`] expires. A zero timeout
//! makes exactly one attempt. Once open, `O_NONBLOCK` is cleared again so
//! frames are written with ordinary blocking semantics. Nothing outlives a
//! failed open.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use vboard::sink::fifo::FifoSink;
//!
//! let mut sink = FifoSink::new("/tmp/pipe_rx", Duration::from_millis(500));
//! sink.set_path("/run/vboard/help").unwrap();
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write as _};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::fcntl::{FcntlArg, OFlag, fcntl};

use super::{Close, Error, Open, Write};

/// Default FIFO the companion reader script listens on.
pub const DEFAULT_FIFO_PATH: &str = "/tmp/pipe_rx";

/// Default bound on waiting for a reader.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Pause between open attempts while no reader is attached.
const RETRY_INTERVAL: Duration = Duration::from_millis(5);

/// Sink writing to a named pipe at a configurable path.
#[derive(Debug, Clone)]
pub struct FifoSink {
    path: Option<PathBuf>,
    timeout: Duration,
}

impl Default for FifoSink {
    fn default() -> Self {
        Self::new(DEFAULT_FIFO_PATH, DEFAULT_TIMEOUT)
    }
}

impl FifoSink {
    /// Create a sink for `path`. An empty path leaves the sink unconfigured.
    pub fn new(path: impl AsRef<Path>, timeout: Duration) -> Self {
        let path = path.as_ref();
        Self {
            path: (!path.as_os_str().is_empty()).then(|| path.to_path_buf()),
            timeout,
        }
    }

    /// Replace the FIFO path.
    ///
    /// An empty path is rejected and the previous path is kept.
    pub fn set_path(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            warn!("ignoring empty fifo path");
            return Err(Error::Unconfigured);
        }
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Current FIFO path, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Bound on waiting for the reader end
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Change the bound on waiting for the reader end
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }
}

/// Open write-only handle on the FIFO.
#[derive(Debug)]
pub struct FifoStream {
    file: File,
}

impl Write for FifoStream {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.file.write(buf).map_err(|_| Error::Write)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.file.flush().map_err(|_| Error::Write)
    }
}

impl Close for FifoStream {
    fn close(mut self) -> Result<(), Error> {
        self.file.flush().map_err(|_| Error::Close)
    }
}

impl Open for FifoSink {
    type Stream<'a> = FifoStream;

    fn open(&mut self) -> Result<Self::Stream<'_>, Error> {
        let path = self.path.as_deref().ok_or(Error::Unconfigured)?;
        let deadline = Instant::now() + self.timeout;

        loop {
            match open_nonblocking(path) {
                Ok(file) => {
                    set_blocking(&file)?;
                    return Ok(FifoStream { file });
                }
                Err(err) if err.raw_os_error() == Some(Errno::ENXIO as i32) => {
                    let now = Instant::now();
                    if now >= deadline {
                        warn!("fifo reader did not attach in time");
                        return Err(Error::Timeout);
                    }
                    thread::sleep(RETRY_INTERVAL.min(deadline - now));
                }
                Err(_) => {
                    warn!("fifo open failed");
                    return Err(Error::Open);
                }
            }
        }
    }
}

/// Write-only open that fails with `ENXIO` instead of waiting for a reader.
fn open_nonblocking(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .custom_flags(OFlag::O_NONBLOCK.bits())
        .open(path)
}

fn set_blocking(file: &File) -> Result<(), Error> {
    let fd = file.as_raw_fd();
    let mut flags = fcntl(fd, FcntlArg::F_GETFL)
        .map(OFlag::from_bits_truncate)
        .map_err(|_| Error::Open)?;
    flags.remove(OFlag::O_NONBLOCK);
    fcntl(fd, FcntlArg::F_SETFL(flags)).map_err(|_| Error::Open)?;
    Ok(())
}
