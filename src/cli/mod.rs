//! Command-line dispatcher for the vboard diagnostic console.
//!
//! A [`Cli`] owns everything a dispatch needs: the [`Registry`] of commands
//! and their handlers, the [`Options`] it was built with, the sink the `help`
//! command publishes to, and the console output function errors and default
//! handlers print through.
//!
//! # Line syntax
//!
//! ```text
//! vboard <command-name-or-alias> <arg1>,<arg2>,...
//! ```
//!
//! Tokens are separated by spaces, newlines, commas, semicolons and
//! parentheses. The first token must be the program word (`vboard` by
//! default), the second a command name or alias, and the command's declared
//! number of arguments must follow. Extra tokens are ignored.
//!
//! # Dispatch pipeline
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │  Tokenizer   │───▶│  Program     │───▶│  Registry    │───▶│  Argument    │
//! │              │    │  word check  │    │  lookup      │    │  extraction  │
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────────┘
//!                                                                     │
//!                                                                     ▼
//!                                                             ┌──────────────┐
//!                                                             │   Handler    │
//!                                                             └──────────────┘
//! ```
//!
//! Every failure ends the dispatch: the error's message is printed to the
//! console and the error is returned. Nothing is retried.
//!
//! # Usage
//!
//! ```rust
//! use vboard::cli::{Cli, CommandId, Dispatch, Error};
//! use vboard::sink::MemorySink;
//!
//! let mut cli = Cli::new(MemorySink::<4096>::new());
//! cli.set_output_function(|text| print!("{}", text));
//!
//! cli.bind(CommandId::SetInstance, |argc, argv: &[&str]| {
//!     assert_eq!(argc, 3);
//!     assert_eq!(argv, ["10", "200", "0"]);
//! });
//!
//! assert_eq!(cli.dispatch("vboard -i 10,200,0"), Ok(Dispatch::Invoked(CommandId::SetInstance)));
//! assert_eq!(
//!     cli.dispatch("vboard -i 10,200"),
//!     Err(Error::BadArguments { expected: 3, found: 2 })
//! );
//! assert_eq!(cli.dispatch("reboot now"), Err(Error::CommandNotFound));
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt::Write as _;

use crate::sink::Open;

pub mod command;
pub mod config;
mod error;
pub mod help;
pub mod registry;
pub mod tokenizer;


pub use command::{COMMAND_COUNT, COMMANDS, CommandDescriptor, CommandId, Line, MAX_ARGS};
pub use config::Options;
pub use error::Error;
pub use registry::{Binding, CommandHandler, Registry};
pub use tokenizer::Tokens;

/// Function signature for console output.
///
/// Receives dispatch error messages and the output of the default echo
/// handler, newline included.
pub type OutputFn = fn(&str);

/// Arguments extracted for one handler call.
pub type ArgumentVector<'a> = heapless::Vec<&'a str, MAX_ARGS>;

/// Successful outcome of [`Cli::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The line held no tokens; nothing ran.
    Empty,
    /// The handler bound to this command ran.
    Invoked(CommandId),
}

/// Dispatcher context: registry, options, help sink and console output.
pub struct Cli<S> {
    options: Options,
    registry: Registry,
    sink: S,
    output_fn: Option<OutputFn>,
}

impl<S> core::fmt::Debug for Cli<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cli")
            .field("options", &self.options)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl<S: Open> Cli<S> {
    /// Create a dispatcher with default [`Options`] publishing help to `sink`.
    pub fn new(sink: S) -> Self {
        Self::with_options(Options::default(), sink)
    }

    /// Create a dispatcher with explicit options.
    pub fn with_options(options: Options, sink: S) -> Self {
        Self {
            options,
            registry: Registry::new(),
            sink,
            output_fn: None,
        }
    }

    /// Set the console output function.
    ///
    /// Without one, dispatch errors are still returned but nothing is printed.
    pub fn set_output_function(&mut self, output_fn: OutputFn) {
        self.output_fn = Some(output_fn);
    }

    /// Options this dispatcher runs with
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The command registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the command registry
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// The help sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the help sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Resolve a command name or alias.
    pub fn lookup(&self, token: &str) -> Option<&'static CommandDescriptor> {
        self.registry.lookup(token)
    }

    /// Bind a closure to `id`. See [`Registry::bind`].
    pub fn bind<F>(&mut self, id: CommandId, handler: F)
    where
        F: FnMut(usize, &[&str]) + 'static,
    {
        self.registry.bind(id, handler);
    }

    /// Bind a handler by raw index. See [`Registry::register_callback`].
    pub fn register_callback(
        &mut self,
        index: usize,
        handler: Option<Box<dyn CommandHandler>>,
    ) -> Result<(), Error> {
        self.registry.register_callback(index, handler)
    }

    /// Restore the default binding of `id`.
    pub fn reset(&mut self, id: CommandId) {
        self.registry.reset(id);
    }

    /// The full help listing as one string.
    pub fn render_help(&self) -> String {
        self.registry.render_help()
    }

    /// Parse `line` and run the matching handler.
    ///
    /// Returns [`Dispatch::Empty`] for a line without tokens. On failure the
    /// error's [`message`](Error::message) is printed to the console before
    /// the error is returned; no handler runs for a line that fails to parse.
    pub fn dispatch(&mut self, line: &str) -> Result<Dispatch, Error> {
        let result = self.run(line);
        if let Err(err) = &result {
            self.output(err.message());
            self.output("\n");
        }
        result
    }

    fn run(&mut self, line: &str) -> Result<Dispatch, Error> {
        let mut tokens = Tokens::new(line);

        let Some(program) = tokens.next() else {
            return Ok(Dispatch::Empty);
        };
        if program != self.options.program.as_str() {
            trace!("unknown program word");
            return Err(Error::CommandNotFound);
        }

        let descriptor = tokens
            .next()
            .and_then(|token| self.registry.lookup(token))
            .ok_or(Error::CommandNotFound)?;

        let args = extract_arguments(&mut tokens, descriptor.argc)?;
        self.invoke(descriptor, &args)?;

        Ok(Dispatch::Invoked(descriptor.id))
    }

    fn invoke(&mut self, descriptor: &CommandDescriptor, args: &[&str]) -> Result<(), Error> {
        let Self {
            registry,
            sink,
            output_fn,
            ..
        } = self;

        match registry.binding_mut(descriptor.id) {
            Binding::Custom(handler) => handler.call(args.len(), args),
            Binding::Echo => echo(*output_fn, descriptor.name, args),
            Binding::Help => help::publish(sink).inspect_err(|err| {
                warn!("help publication failed: {}", err);
            })?,
        }
        Ok(())
    }

    fn output(&self, text: &str) {
        if let Some(output_fn) = self.output_fn {
            output_fn(text);
        }
    }
}

#[cfg(all(feature = "std", unix))]
impl Cli<crate::sink::fifo::FifoSink> {
    /// Create a dispatcher publishing help to the FIFO named in `options`.
    pub fn from_options(options: Options) -> Self {
        let sink = options.fifo_sink();
        Self::with_options(options, sink)
    }

    /// Point help output at another named pipe.
    ///
    /// An empty or oversized path is rejected and the current path is kept.
    pub fn set_fifo_stream(&mut self, path: &str) -> Result<(), Error> {
        let fifo_path = heapless::String::try_from(path).map_err(|_| Error::InvalidOptions)?;
        self.sink.set_path(path)?;
        self.options.fifo_path = fifo_path;
        Ok(())
    }
}

/// Take exactly `argc` tokens from `tokens`.
fn extract_arguments<'a>(
    tokens: &mut Tokens<'a>,
    argc: usize,
) -> Result<ArgumentVector<'a>, Error> {
    let mut args = ArgumentVector::new();
    for token in tokens.by_ref().take(argc) {
        args.push(token).map_err(|_| Error::BadArguments {
            expected: argc,
            found: MAX_ARGS + 1,
        })?;
    }

    if args.len() < argc {
        warn!("argument underflow: {} of {}", args.len(), argc);
        return Err(Error::BadArguments {
            expected: argc,
            found: args.len(),
        });
    }
    Ok(args)
}

/// Default handler: print `name: arg1,arg2,...`.
fn echo(output_fn: Option<OutputFn>, name: &str, args: &[&str]) {
    let Some(output_fn) = output_fn else {
        return;
    };

    let mut line = Line::new();
    let _ = write!(line, "{}:", name);
    for (i, arg) in args.iter().enumerate() {
        let _ = write!(line, "{}{}", if i == 0 { " " } else { "," }, arg);
    }
    let _ = line.push('\n');
    output_fn(&line);
}
