//! Built-in command table.
//!
//! Every [`CommandId`] owns exactly one [`CommandDescriptor`] in [`COMMANDS`],
//! stored at the id's index. Names and aliases are unique across the table.

use core::fmt::Write as _;

use heapless::String;

/// Number of built-in commands. Not a valid [`CommandId`] index.
pub const COMMAND_COUNT: usize = 8;

/// Largest argument count declared by any built-in command.
pub const MAX_ARGS: usize = 4;

/// Width of the right-aligned name column in help output.
pub const NAME_COLUMN_WIDTH: usize = 20;

/// Capacity of a single formatted output line.
pub const LINE_BUFFER_SIZE: usize = 512;

/// Header frame published before the command listing.
pub const HELP_HEADER: &str = "Available Commands:\n";

/// One formatted output line.
pub type Line = String<LINE_BUFFER_SIZE>;

/// Stable identifier of a built-in command, usable as a table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CommandId {
    /// Set the instance of an ECU.
    SetInstance = 0,
    /// Send an SPN periodically.
    DiagnosticSpn,
    /// Force an SPN value.
    ForceSpn,
    /// Set a value of the board's own SPN.
    SetOwnSpn,
    /// Upgrade the firmware of a node.
    FwUpgrade,
    /// Upgrade the firmware of a node without version check.
    FwUpgradeForce,
    /// Abort a running firmware upgrade.
    FwUpgradeAbort,
    /// Publish the command listing.
    Help,
}

impl CommandId {
    /// All ids in table order.
    pub const ALL: [CommandId; COMMAND_COUNT] = [
        CommandId::SetInstance,
        CommandId::DiagnosticSpn,
        CommandId::ForceSpn,
        CommandId::SetOwnSpn,
        CommandId::FwUpgrade,
        CommandId::FwUpgradeForce,
        CommandId::FwUpgradeAbort,
        CommandId::Help,
    ];

    /// Position of this id in the command table
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Id stored at `index`, if any
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Descriptor of this command
    pub fn descriptor(self) -> &'static CommandDescriptor {
        &COMMANDS[self.index()]
    }
}

impl TryFrom<usize> for CommandId {
    type Error = super::Error;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(super::Error::InvalidCommand(index))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandId {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.descriptor().name)
    }
}

/// Static description of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Id the descriptor is stored under.
    pub id: CommandId,
    /// Primary name, e.g. `set_instance`.
    pub name: &'static str,
    /// Short alias, e.g. `-i`.
    pub alias: &'static str,
    /// Exact number of arguments extracted for the handler.
    pub argc: usize,
    /// Help text shown by `help`.
    pub help: &'static str,
}

impl CommandDescriptor {
    /// Whether `token` is this command's name or alias (case-sensitive).
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.alias == token
    }

    /// Format the help entry for this command.
    ///
    /// The name is right-aligned in a [`NAME_COLUMN_WIDTH`] column, followed by
    /// the alias in parentheses and the help text. Text beyond
    /// [`LINE_BUFFER_SIZE`] is cut off.
    pub fn help_line(&self) -> Line {
        let mut line = Line::new();
        // Overflow only truncates the line.
        let _ = write!(
            line,
            "{:>width$} ({}) - {}\n",
            self.name,
            self.alias,
            self.help,
            width = NAME_COLUMN_WIDTH
        );
        line
    }
}

/// The built-in command table, indexed by [`CommandId`].
pub static COMMANDS: [CommandDescriptor; COMMAND_COUNT] = [
    CommandDescriptor {
        id: CommandId::SetInstance,
        name: "set_instance",
        alias: "-i",
        argc: 3,
        help: "Set a instance of an ECU. vboard -i <type>,<identity>,<instance>.\n\
               \t\ta) vboard -i 10,200,0.\n\
               \t\tb) vboard -i 10,0:5,2:7.",
    },
    CommandDescriptor {
        id: CommandId::DiagnosticSpn,
        name: "diag_spn",
        alias: "-d",
        argc: 4,
        help: "Send a spn at set period. vboard -d <da>,<spn>,<period>,<-e/-d>.\n\
               \t\ta) vboard -d 22,2838,200,-e (da = 22, spn = 2838, period = 200, enable).",
    },
    CommandDescriptor {
        id: CommandId::ForceSpn,
        name: "force_spn",
        alias: "-f",
        argc: 4,
        help: "Force a spn value. vboard -f <da>,<spn>,<value>,<-e/-d>.\n\
               \t\ta) vboard -f 22,2838,xxxx,-e (da = 22, spn = 2838, value = xxxx, enable).",
    },
    CommandDescriptor {
        id: CommandId::SetOwnSpn,
        name: "set_own_spn",
        alias: "-s",
        argc: 3,
        help: "Set own spn value. vboard -s <spn>,<spn_value>,<value_type>.\n\
               \t\ta) vboard -s 520198,1200,-lld. For integers values.\n\
               \t\tb) vboard -s 520198,126.55,-f. For float values.\n\
               \t\tc) vboard -s 520198,-735.28,-lf. For double values.\n\
               \t\td) vboard -s 520198,654090,-r. For raw values.",
    },
    CommandDescriptor {
        id: CommandId::FwUpgrade,
        name: "fw_upgrade",
        alias: "-fw",
        argc: 2,
        help: "Upgrade the firmware of a specific ecu/node. \
               vboard -fw </path_to_fw/binary.bin> <address>.",
    },
    CommandDescriptor {
        id: CommandId::FwUpgradeForce,
        name: "fw_upgrade_force",
        alias: "-fwf",
        argc: 2,
        help: "Upgrade the firmware of a specific ecu/node without version check. \
               vboard -fwf </path_to_fw/binary.bin> <address>.",
    },
    CommandDescriptor {
        id: CommandId::FwUpgradeAbort,
        name: "fw_upgrade_abort",
        alias: "-fwa",
        argc: 0,
        help: "Upgrade firmware abort.",
    },
    CommandDescriptor {
        id: CommandId::Help,
        name: "help",
        alias: "-h",
        argc: 0,
        help: "Display this help.",
    },
];

/// Header followed by one help line per command, in table order.
pub(crate) fn help_lines() -> impl Iterator<Item = Line> {
    let mut header = Line::new();
    let _ = header.push_str(HELP_HEADER);
    core::iter::once(header).chain(COMMANDS.iter().map(CommandDescriptor::help_line))
}
