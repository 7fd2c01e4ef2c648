use core::fmt;

use crate::{command::Subcommand, errors::UsageError};

/**
The path from the root to a subcommand, as a list of child indices. The empty
path is the root itself.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CommandPath(Vec<usize>);

impl CommandPath {
    #[inline]
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub(crate) fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    /// Every subcommand along this path, starting with `root` itself. Stops
    /// early if the path doesn't fit the tree.
    pub fn resolve<'t, 'a>(
        &self,
        root: &'t Subcommand<'a>,
    ) -> impl Iterator<Item = &'t Subcommand<'a>> + Clone {
        let mut indices = self.0.iter();

        core::iter::successors(Some(root), move |&node| {
            indices
                .next()
                .and_then(|&index| node.subcommands().get(index))
        })
    }

    /// The subcommand at the end of this path
    #[must_use]
    pub fn target<'t, 'a>(&self, root: &'t Subcommand<'a>) -> &'t Subcommand<'a> {
        self.resolve(root).last().unwrap_or(root)
    }
}

/**
The result of matching a command line against a command tree. Nothing in the
engine prints or exits; that's left to [`Parser::parse`][crate::Parser::parse],
which maps each outcome to [`exit_code`][Outcome::exit_code].
*/
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// Every token was matched and every required value was present
    Parsed,

    /// `-h` or `--help` was given. `command` is the deepest subcommand that
    /// was reached, whose help should be shown.
    HelpRequested { command: CommandPath },

    /// `-v` or `--version` was given
    VersionRequested,

    /// The command line doesn't fit the tree. `command` is the subcommand
    /// whose help should accompany the error.
    Usage {
        command: CommandPath,
        error: UsageError,
    },
}

impl Outcome {
    /// The exit code the process should terminate with, or `None` if it
    /// should keep running.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Outcome::Parsed => None,
            Outcome::HelpRequested { .. } | Outcome::VersionRequested => Some(0),
            Outcome::Usage { .. } => Some(2),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_parsed(&self) -> bool {
        matches!(self, Outcome::Parsed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Parsed => f.write_str("parsed successfully"),
            Outcome::HelpRequested { .. } => f.write_str("usage message was requested"),
            Outcome::VersionRequested => f.write_str("version was requested"),
            Outcome::Usage { error, .. } => fmt::Display::fmt(error, f),
        }
    }
}
