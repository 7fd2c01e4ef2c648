/*!
Error types for the three things that can go wrong: a conflicting registration
while the command tree is being built, a flag value that doesn't parse as its
declared kind, and a command line that doesn't fit the tree at all.
*/

use joinery::JoinableIterator;

/**
A flag, positional value, or subcommand couldn't be registered because it
conflicts with something already registered on the same subcommand. When this
is returned, the tree is unchanged.
*/
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RegistrationError {
    /// Positions are 1-based
    #[error("{kind} {name:?} can't be registered at position 0; positions start at 1")]
    ZeroPosition { kind: &'static str, name: String },

    /// A sibling at the same position already uses this name
    #[error(
        "subcommand {name:?} conflicts with subcommand {existing:?} \
        at position {position} of {parent:?}"
    )]
    DuplicateSubcommand {
        parent: String,
        name: String,
        existing: String,
        position: usize,
    },

    /// A positional value was registered where a subcommand already is
    #[error(
        "positional value {name:?} can't use position {position} of {parent:?}; \
        subcommand {existing:?} is already there"
    )]
    PositionTakenBySubcommand {
        parent: String,
        name: String,
        existing: String,
        position: usize,
    },

    /// Something was registered where a positional value already is
    #[error(
        "{kind} {name:?} can't use position {position} of {parent:?}; \
        positional value {existing:?} is already there"
    )]
    PositionTakenByPositional {
        kind: &'static str,
        parent: String,
        name: String,
        existing: String,
        position: usize,
    },

    /// Two flags on the same subcommand share a short or long name
    #[error("flag name {name:?} is already used by another flag of {parent:?}")]
    DuplicateFlag { parent: String, name: String },

    /// A flag needs at least one of a short or long name
    #[error("a flag of {parent:?} has neither a short nor a long name")]
    UnnamedFlag { parent: String },
}

/**
A flag's value failed to parse as the flag's declared kind. This is returned
from parsing as an ordinary error; it never terminates the process on its own.
*/
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("flag {flag}: failed to parse {value:?}: {message}")]
pub struct CoercionError {
    /// The flag, as `--long` or `-s`
    pub flag: String,

    /// The offending raw string
    pub value: String,

    /// Why it failed to parse
    pub message: String,
}

/**
The command line doesn't fit the command tree. These are always fatal: when
parsing with [`Parser::parse`][crate::Parser::parse], they're printed along
with the relevant usage message and the process exits with code 2.
*/
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum UsageError {
    /// A flag that takes a value was the last token
    #[error("flag {flag} requires a value, but none was given")]
    MissingValue { flag: String },

    /// A positional token landed on a position where only subcommands live,
    /// and it didn't name any of them
    #[error(
        "unrecognized subcommand {argument:?} at depth {depth}; available subcommands: {}",
        .available.iter().join_with(", ")
    )]
    UnknownSubcommand {
        argument: String,
        depth: usize,
        available: Vec<String>,
    },

    /// A positional token landed on a position with nothing registered
    #[error("unexpected argument {argument:?}")]
    UnexpectedArgument { argument: String },

    /// A required global positional value was never given
    #[error("required argument <{name}> at position {position} was omitted")]
    MissingGlobalPositional { name: String, position: usize },

    /// A required positional value of a subcommand was never given
    #[error("required argument <{name}> at position {position} of {subcommand:?} was omitted")]
    MissingPositional {
        subcommand: String,
        name: String,
        position: usize,
    },
}
