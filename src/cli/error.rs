//! Error types for dispatch and registration

use crate::sink;

/// Errors reported by the command dispatcher and its registration API.
///
/// Dispatch failures are also echoed to the console output; see
/// [`Error::message`]. Registration failures are only returned.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The program word or command token was missing or unknown.
    CommandNotFound,
    /// The line ran out of tokens before the command's arity was satisfied.
    BadArguments {
        /// Arguments the command declares.
        expected: usize,
        /// Arguments present on the line.
        found: usize,
    },
    /// A raw command index outside the command table.
    InvalidCommand(usize),
    /// A registration call without a handler.
    MissingHandler,
    /// The help sink could not be written.
    Sink(sink::Error),
    /// Options could not be parsed or do not fit their buffers.
    InvalidOptions,
}

impl Error {
    /// Console text reported for this error.
    pub fn message(&self) -> &'static str {
        match self {
            Error::CommandNotFound => "Command Not Found",
            Error::BadArguments { .. } => "Bad Argument(s)",
            Error::InvalidCommand(_) => "Invalid Command Id",
            Error::MissingHandler => "Missing Handler",
            Error::Sink(_) => "Help Output Unavailable",
            Error::InvalidOptions => "Invalid Options",
        }
    }
}

impl From<sink::Error> for Error {
    fn from(err: sink::Error) -> Self {
        Error::Sink(err)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::BadArguments { expected, found } => {
                write!(f, "{} (expected {}, found {})", self.message(), expected, found)
            }
            Error::InvalidCommand(index) => write!(f, "{} ({})", self.message(), index),
            Error::Sink(err) => write!(f, "{}: {}", self.message(), err),
            _ => f.write_str(self.message()),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::CommandNotFound => defmt::write!(f, "CommandNotFound"),
            Error::BadArguments { expected, found } => {
                defmt::write!(f, "BadArguments({}/{})", found, expected)
            }
            Error::InvalidCommand(index) => defmt::write!(f, "InvalidCommand({})", index),
            Error::MissingHandler => defmt::write!(f, "MissingHandler"),
            Error::Sink(err) => defmt::write!(f, "Sink({})", err),
            Error::InvalidOptions => defmt::write!(f, "InvalidOptions"),
        }
    }
}
