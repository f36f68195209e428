//! # vboard - ECU diagnostic console dispatcher
//!
//! Command-table dispatcher for the `vboard` diagnostic tool that talks to
//! vehicle ECUs. A caller feeds raw text lines such as `vboard -i 10,200,0`;
//! the dispatcher tokenizes them, resolves the command by name or alias,
//! extracts the command's fixed number of arguments and invokes the handler
//! bound to it. The library is designed for embedded systems and supports
//! `no_std` environments with an allocator.
//!
//! ## Features
//!
//! ### Command dispatch
//! - Fixed table of built-in commands with names, short aliases and arity
//! - Lazy tokenizer over spaces, newlines, commas, semicolons and parentheses
//! - Runtime handler binding with closures, by typed id or raw index
//!
//! ### Help publication
//! - Formatted listing of every command, one NUL-terminated frame per line
//! - Pluggable sinks: in-memory buffer, or a named pipe on hosts with `std`
//! - Bounded wait for the pipe reader instead of blocking forever
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! vboard = "0.1.0"
//! ```
//!
//! ### Dispatching lines
//!
//! ```rust
//! use vboard::cli::{Cli, CommandId, Dispatch};
//! use vboard::sink::MemorySink;
//!
//! let mut cli = Cli::new(MemorySink::<4096>::new());
//! cli.bind(CommandId::FwUpgrade, |_argc, argv: &[&str]| {
//!     let (image, address) = (argv[0], argv[1]);
//!     assert_eq!((image, address), ("/fw/ecu.bin", "0x22"));
//! });
//!
//! assert_eq!(
//!     cli.dispatch("vboard -fw /fw/ecu.bin 0x22"),
//!     Ok(Dispatch::Invoked(CommandId::FwUpgrade))
//! );
//! ```
//!
//! ### Publishing help to a named pipe
//!
//! ```rust,no_run
//! use vboard::cli::{Cli, Options};
//!
//! let options = Options::default().with_fifo_path("/tmp/pipe_rx").unwrap();
//! let mut cli = Cli::from_options(options);
//! cli.set_output_function(|text| print!("{}", text));
//!
//! // Blocks for at most the configured sink timeout if nobody reads the pipe.
//! let _ = cli.dispatch("vboard -h");
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable the named-pipe sink on unix hosts (default: enabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate alloc;

#[macro_use]
mod fmt;

/// Command table, tokenizer, registry and dispatcher.
///
/// Holds everything needed to turn a console line into a handler call.
pub mod cli;

/// Output sinks the `help` command publishes to.
pub mod sink;
