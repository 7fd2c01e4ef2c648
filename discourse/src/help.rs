/*!
Collaborators for rendering help and version messages. The [`Parser`]
doesn't format anything itself; it assembles a [`HelpContext`] describing the
relevant subcommand and hands it to a [`HelpPrinter`].

[`Parser`]: crate::Parser
*/

use std::io;

use crate::{
    command::{Flag, Subcommand},
    outcome::CommandPath,
    parser::Settings,
};

/// Everything a [`HelpPrinter`] needs to describe one subcommand.
#[derive(Debug, Clone)]
pub struct HelpContext<'t, 'a> {
    /// The root of the tree; its name is the program name, and its flags are
    /// the global flags.
    pub root: &'t Subcommand<'a>,

    /// The subcommand being described. This is `root` itself for top-level
    /// help.
    pub command: &'t Subcommand<'a>,

    /// The name of every subcommand from the root to `command`, inclusive
    pub chain: Vec<&'t str>,

    pub version: Option<&'t str>,
    pub settings: Settings,
}

impl<'t, 'a> HelpContext<'t, 'a> {
    /// Build the context for the subcommand at `path`.
    #[must_use]
    pub fn new(
        root: &'t Subcommand<'a>,
        path: &CommandPath,
        version: Option<&'t str>,
        settings: Settings,
    ) -> Self {
        let chain: Vec<&Subcommand<'a>> = path.resolve(root).collect();

        Self {
            root,
            command: chain.last().copied().unwrap_or(root),
            chain: chain.iter().map(|command| command.name()).collect(),
            version,
            settings,
        }
    }

    #[inline]
    #[must_use]
    pub fn program(&self) -> &'t str {
        self.root.name()
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        core::ptr::eq(self.root, self.command)
    }

    /// The global flags, if `command` isn't the root. At the root, these are
    /// the same as the command's own flags.
    #[must_use]
    pub fn globals(&self) -> &'t [Flag<'a>] {
        match self.is_root() {
            true => Default::default(),
            false => self.root.flags(),
        }
    }

    /// True if `-h` and `--help` are handled by the parser
    #[inline]
    #[must_use]
    pub fn help_flag(&self) -> bool {
        self.settings.show_help_with_h_flag
    }

    /// True if `-v` and `--version` are handled by the parser
    #[inline]
    #[must_use]
    pub fn version_flag(&self) -> bool {
        self.settings.show_version_with_v_flag && self.version.is_some()
    }
}

/**
Renders help and version messages. Implement this to replace the
[`DefaultHelpPrinter`][crate::DefaultHelpPrinter] with your own formatting.
*/
pub trait HelpPrinter {
    /// Write help for `context.command`. If there's a `message` (usually a
    /// usage error), it's included as well.
    fn print_help(
        &self,
        out: &mut dyn io::Write,
        context: &HelpContext<'_, '_>,
        message: Option<&str>,
    ) -> io::Result<()>;

    #[expect(unused_variables)]
    fn print_version(&self, out: &mut dyn io::Write, program: &str, version: &str) -> io::Result<()> {
        writeln!(out, "Version: {version}")
    }
}
