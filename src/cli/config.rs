//! Dispatcher options.
//!
//! Options are plain data with sensible defaults and can be loaded from a
//! small JSON document where every field is optional:
//!
//! ```rust
//! use vboard::cli::Options;
//!
//! let options = Options::from_json(r#"{"fifo_path":"/run/vboard/help","sink_timeout_ms":250}"#).unwrap();
//! assert_eq!(options.program.as_str(), "vboard");
//! assert_eq!(options.fifo_path.as_str(), "/run/vboard/help");
//! assert_eq!(options.sink_timeout().as_millis(), 250);
//! ```

use core::time::Duration;

use heapless::String;
use serde::Deserialize;

use super::Error;

/// Maximum length of the program-name literal.
pub const MAX_PROGRAM_LEN: usize = 16;
/// Maximum length of the help sink path.
pub const MAX_PATH_LEN: usize = 128;

/// Program word every command line must start with.
pub const DEFAULT_PROGRAM: &str = "vboard";
/// Help sink path used when none is configured.
pub const DEFAULT_FIFO_PATH: &str = "/tmp/pipe_rx";
/// Bound on opening the help sink, in milliseconds.
pub const DEFAULT_SINK_TIMEOUT_MS: u32 = 1000;

/// Options for a [`Cli`](super::Cli).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Program word expected as the first token of every line.
    pub program: String<MAX_PROGRAM_LEN>,
    /// Path of the named pipe help output is written to.
    pub fifo_path: String<MAX_PATH_LEN>,
    /// How long to wait for the help sink to open.
    pub sink_timeout_ms: u32,
}

impl Default for Options {
    fn default() -> Self {
        let mut program = String::new();
        let _ = program.push_str(DEFAULT_PROGRAM);
        let mut fifo_path = String::new();
        let _ = fifo_path.push_str(DEFAULT_FIFO_PATH);

        Self {
            program,
            fifo_path,
            sink_timeout_ms: DEFAULT_SINK_TIMEOUT_MS,
        }
    }
}

impl Options {
    /// Parse options from JSON. Missing fields keep their defaults.
    ///
    /// Fails with [`Error::InvalidOptions`] on malformed JSON, trailing
    /// non-whitespace input, oversized strings or an empty program name.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let (options, used) =
            serde_json_core::from_str::<Options>(json).map_err(|_| Error::InvalidOptions)?;
        if !json[used..].trim().is_empty() || options.program.is_empty() {
            return Err(Error::InvalidOptions);
        }
        Ok(options)
    }

    /// Replace the program word.
    pub fn with_program(mut self, program: &str) -> Result<Self, Error> {
        if program.is_empty() {
            return Err(Error::InvalidOptions);
        }
        self.program = String::try_from(program).map_err(|_| Error::InvalidOptions)?;
        Ok(self)
    }

    /// Replace the help sink path.
    pub fn with_fifo_path(mut self, path: &str) -> Result<Self, Error> {
        self.fifo_path = String::try_from(path).map_err(|_| Error::InvalidOptions)?;
        Ok(self)
    }

    /// Replace the help sink timeout.
    pub fn with_sink_timeout(mut self, timeout: Duration) -> Self {
        self.sink_timeout_ms = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        self
    }

    /// Help sink timeout as a [`Duration`]
    pub fn sink_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.sink_timeout_ms))
    }

    /// Build the named-pipe sink described by these options.
    #[cfg(all(feature = "std", unix))]
    pub fn fifo_sink(&self) -> crate::sink::fifo::FifoSink {
        crate::sink::fifo::FifoSink::new(self.fifo_path.as_str(), self.sink_timeout())
    }
}
