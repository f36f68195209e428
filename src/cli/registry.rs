//! Command registry: name/alias resolution and handler bindings.
//!
//! The registry pairs the static [`COMMANDS`] table with one [`Binding`] per
//! [`CommandId`]. Fresh registries bind every command to its default: the
//! `help` command publishes the listing, every other command echoes its name
//! and arguments. Embedders replace defaults with their own handlers.
//!
//! ```rust
//! use vboard::cli::{CommandId, Registry};
//!
//! let mut registry = Registry::new();
//! assert_eq!(registry.lookup("-i"), registry.lookup("set_instance"));
//!
//! registry.bind(CommandId::SetInstance, |argc, argv: &[&str]| {
//!     assert_eq!(argc, argv.len());
//! });
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use heapless::FnvIndexMap;

use super::command::{COMMAND_COUNT, COMMANDS, CommandDescriptor, CommandId, help_lines};
use super::Error;

/// Entries in the name/alias map: a power of two holding a name and an
/// alias per command.
const LOOKUP_CAPACITY: usize = 16;

/// A command implementation.
///
/// Handlers receive the argument count and exactly that many argument
/// tokens. Any `FnMut(usize, &[&str])` closure is a handler.
pub trait CommandHandler {
    /// Run the command
    fn call(&mut self, argc: usize, argv: &[&str]);
}

impl<F> CommandHandler for F
where
    F: FnMut(usize, &[&str]),
{
    fn call(&mut self, argc: usize, argv: &[&str]) {
        self(argc, argv)
    }
}

/// What runs when a command is dispatched.
pub enum Binding {
    /// Print the command name and its arguments to the console.
    Echo,
    /// Publish the command listing to the help sink.
    Help,
    /// A handler supplied by the embedder.
    Custom(Box<dyn CommandHandler>),
}

impl Binding {
    /// Binding a fresh registry assigns to `id`
    pub fn default_for(id: CommandId) -> Self {
        match id {
            CommandId::Help => Binding::Help,
            _ => Binding::Echo,
        }
    }

    /// Whether this is a handler supplied by the embedder
    pub fn is_custom(&self) -> bool {
        matches!(self, Binding::Custom(_))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Echo => f.write_str("Echo"),
            Binding::Help => f.write_str("Help"),
            Binding::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// The command table with its current handler bindings.
pub struct Registry {
    lookup: FnvIndexMap<&'static str, CommandId, LOOKUP_CAPACITY>,
    bindings: [Binding; COMMAND_COUNT],
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("bindings", &self.bindings)
            .finish()
    }
}

impl Registry {
    /// Create a registry with every command bound to its default.
    pub fn new() -> Self {
        let mut lookup = FnvIndexMap::new();
        for descriptor in COMMANDS.iter() {
            for key in [descriptor.name, descriptor.alias] {
                let previous = lookup.insert(key, descriptor.id);
                debug_assert!(matches!(previous, Ok(None)), "duplicate command key {key}");
            }
        }

        Self {
            lookup,
            bindings: core::array::from_fn(|index| Binding::default_for(CommandId::ALL[index])),
        }
    }

    /// All descriptors in table order
    pub fn descriptors(&self) -> &'static [CommandDescriptor] {
        &COMMANDS
    }

    /// Resolve a primary name or alias (exact, case-sensitive).
    pub fn lookup(&self, token: &str) -> Option<&'static CommandDescriptor> {
        self.lookup.get(token).map(|id| id.descriptor())
    }

    /// Bind a closure to `id`, replacing the current binding.
    pub fn bind<F>(&mut self, id: CommandId, handler: F)
    where
        F: FnMut(usize, &[&str]) + 'static,
    {
        self.bind_handler(id, Box::new(handler));
    }

    /// Bind a boxed handler to `id`, replacing the current binding.
    pub fn bind_handler(&mut self, id: CommandId, handler: Box<dyn CommandHandler>) {
        debug!("rebinding {}", id);
        self.bindings[id.index()] = Binding::Custom(handler);
    }

    /// Bind a handler by raw command index.
    ///
    /// Fails with [`Error::InvalidCommand`] when `index` is not below
    /// [`COMMAND_COUNT`] and with [`Error::MissingHandler`] when `handler` is
    /// `None`. The registry is left untouched on failure.
    pub fn register_callback(
        &mut self,
        index: usize,
        handler: Option<Box<dyn CommandHandler>>,
    ) -> Result<(), Error> {
        let id = CommandId::try_from(index)?;
        let handler = handler.ok_or(Error::MissingHandler)?;
        self.bind_handler(id, handler);
        Ok(())
    }

    /// Restore the default binding of `id`.
    pub fn reset(&mut self, id: CommandId) {
        self.bindings[id.index()] = Binding::default_for(id);
    }

    /// Current binding of `id`
    pub fn binding(&self, id: CommandId) -> &Binding {
        &self.bindings[id.index()]
    }

    pub(crate) fn binding_mut(&mut self, id: CommandId) -> &mut Binding {
        &mut self.bindings[id.index()]
    }

    /// The full help listing as one string: header, then one line per
    /// command in table order.
    pub fn render_help(&self) -> String {
        help_lines().fold(String::new(), |mut text, line| {
            text.push_str(&line);
            text
        })
    }
}
