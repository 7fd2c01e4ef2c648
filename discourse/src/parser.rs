use std::{env, io, process};

use tracing::{Span, debug, warn};

use crate::{
    command::{Flag, PositionalValue, Subcommand},
    engine::{Level, Session},
    errors::{CoercionError, RegistrationError},
    help::{HelpContext, HelpPrinter},
    outcome::{CommandPath, Outcome},
    printers::DefaultHelpPrinter,
};

/// Switches for the reserved help and version flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Settings {
    /// Treat `-h` and `--help` as a request for help on the deepest matched
    /// subcommand.
    pub show_help_with_h_flag: bool,

    /// Treat `-v` and `--version` as a request for the version. This only
    /// has an effect if the parser has a version.
    pub show_version_with_v_flag: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_help_with_h_flag: true,
            show_version_with_v_flag: true,
        }
    }
}

/**
The top level of a command tree. The parser owns the root [`Subcommand`],
whose flags and positional values are global: flags registered here are
recognized at every level of nesting.

```
use discourse::{Flag, Parser, PositionalValue, Subcommand};

let mut verbose = false;
let mut target = String::new();

{
    let mut parser = Parser::new("deploy");
    parser.add_flag(Flag::new("v", "verbose", &mut verbose)).unwrap();
    parser
        .add_subcommand(Subcommand::new("push"), 1)
        .unwrap()
        .add_positional(PositionalValue::new("TARGET", 1, &mut target).required())
        .unwrap();

    let outcome = parser.try_parse(["push", "-v", "staging"]).unwrap();
    assert!(outcome.is_parsed());
}

assert!(verbose);
assert_eq!(target, "staging");
```
*/
pub struct Parser<'a> {
    root: Subcommand<'a>,
    version: Option<String>,
    settings: Settings,
    trailing: Vec<String>,
    span: Span,
    printer: Box<dyn HelpPrinter>,
}

impl<'a> Parser<'a> {
    /// Create a parser for a program called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            root: Subcommand::new(name),
            version: None,
            settings: Settings::default(),
            trailing: Vec::new(),
            span: Span::none(),
            printer: Box::new(DefaultHelpPrinter::default()),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.root.description = description.into();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_help_prepend(mut self, text: impl Into<String>) -> Self {
        self.root.help_prepend = text.into();
        self
    }

    #[must_use]
    pub fn with_help_append(mut self, text: impl Into<String>) -> Self {
        self.root.help_append = text.into();
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn show_help_with_h_flag(mut self, enabled: bool) -> Self {
        self.settings.show_help_with_h_flag = enabled;
        self
    }

    #[must_use]
    pub fn show_version_with_v_flag(mut self, enabled: bool) -> Self {
        self.settings.show_version_with_v_flag = enabled;
        self
    }

    /// Replace the [`DefaultHelpPrinter`].
    #[must_use]
    pub fn with_help_printer(mut self, printer: impl HelpPrinter + 'static) -> Self {
        self.printer = Box::new(printer);
        self
    }

    /**
    Parent every event the parser emits to `span`. By default the parser
    emits events with no parent, which most subscribers will ignore at the
    default level; passing a span lets a caller group and filter them.
    */
    #[must_use]
    pub fn trace_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.root.name()
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// The root of the command tree
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Subcommand<'a> {
        &self.root
    }

    /// Register a global flag.
    pub fn add_flag(&mut self, flag: Flag<'a>) -> Result<(), RegistrationError> {
        self.root.add_flag(flag)
    }

    /// Register a global positional value.
    pub fn add_positional(
        &mut self,
        positional: PositionalValue<'a>,
    ) -> Result<(), RegistrationError> {
        self.root.add_positional(positional)
    }

    /// Register a top-level subcommand.
    pub fn add_subcommand(
        &mut self,
        subcommand: Subcommand<'a>,
        position: usize,
    ) -> Result<&mut Subcommand<'a>, RegistrationError> {
        self.root.add_subcommand(subcommand, position)
    }

    /// Find a top-level subcommand by name or short name.
    #[must_use]
    pub fn subcommand(&self, name: &str) -> Option<&Subcommand<'a>> {
        self.root.subcommand(name)
    }

    /// Check if `name` is the name of a global flag.
    #[must_use]
    pub fn flag_exists(&self, name: &str) -> bool {
        self.root.flag_exists(name)
    }

    /// Set a global flag as if it had been passed on the command line.
    pub fn set_value_for_key(&mut self, key: &str, value: &str) -> Result<bool, CoercionError> {
        self.root.set_value_for_key(key, value)
    }

    /// Every token that appeared after a `--` terminator in the most recent
    /// parse, verbatim.
    #[inline]
    #[must_use]
    pub fn trailing_arguments(&self) -> &[String] {
        &self.trailing
    }

    /**
    Parse `args`, which should exclude the program name, writing every
    matched flag and positional value into its storage. This never prints
    and never exits: help and version requests, as well as usage errors,
    are reported in the returned [`Outcome`]. Flag values that fail to parse
    are returned as an error.
    */
    pub fn try_parse<I>(&mut self, args: I) -> Result<Outcome, CoercionError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        debug!(parent: &self.span, ?args, "parsing");

        self.root.reset();
        self.root.used = true;

        let Subcommand {
            name,
            flags,
            positionals,
            subcommands,
            ..
        } = &mut self.root;

        let mut session = Session {
            args: &args,
            globals: flags,
            global_positionals: positionals,
            trailing: &mut self.trailing,
            settings: self.settings,
            has_version: self.version.is_some(),
            span: &self.span,
            path: CommandPath::root(),
        };

        session.descend(Level::root(name, subcommands), 1)
    }

    /**
    Parse `args` like [`try_parse`][Self::try_parse], then act on the
    outcome: help is printed to stderr and the process exits with 0; the
    version is printed to stdout and the process exits with 0; usage errors
    are printed to stderr along with the relevant help, and the process exits
    with 2.
    */
    pub fn parse<I>(&mut self, args: I) -> Result<(), CoercionError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let outcome = self.try_parse(args)?;

        if let Err(error) = self.report(&outcome) {
            warn!(parent: &self.span, %error, "failed to print usage message");
        }

        match outcome.exit_code() {
            Some(code) => process::exit(code),
            None => Ok(()),
        }
    }

    /// [`parse`][Self::parse] the process's own arguments. Arguments that
    /// aren't valid UTF-8 are converted lossily.
    pub fn parse_env(&mut self) -> Result<(), CoercionError> {
        let args: Vec<String> = env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        self.parse(args)
    }

    /// Print the outcome of a parse, if it calls for printing anything.
    pub fn report(&self, outcome: &Outcome) -> io::Result<()> {
        match outcome {
            Outcome::Parsed => Ok(()),
            Outcome::HelpRequested { command } => {
                self.write_help(&mut io::stderr().lock(), command, None)
            }
            Outcome::VersionRequested => self.write_version(&mut io::stdout().lock()),
            Outcome::Usage { command, error } => {
                let message = error.to_string();
                self.write_help(&mut io::stderr().lock(), command, Some(&message))
            }
        }
    }

    /// Print help for the whole program to stderr.
    pub fn show_help(&self) -> io::Result<()> {
        self.write_help(&mut io::stderr().lock(), &CommandPath::root(), None)
    }

    /// Print help for the whole program to stderr, along with a message.
    pub fn show_help_with_message(&self, message: &str) -> io::Result<()> {
        self.write_help(&mut io::stderr().lock(), &CommandPath::root(), Some(message))
    }

    /// Write help for the subcommand at `command` into `out`.
    pub fn write_help(
        &self,
        out: &mut dyn io::Write,
        command: &CommandPath,
        message: Option<&str>,
    ) -> io::Result<()> {
        let context = self.help_context(command);
        self.printer.print_help(out, &context, message)?;
        out.flush()
    }

    /// Write the version into `out`, if there is one.
    pub fn write_version(&self, out: &mut dyn io::Write) -> io::Result<()> {
        match self.version {
            None => Ok(()),
            Some(ref version) => {
                self.printer.print_version(out, self.name(), version)?;
                out.flush()
            }
        }
    }

    #[must_use]
    pub fn help_context(&self, command: &CommandPath) -> HelpContext<'_, 'a> {
        HelpContext::new(
            &self.root,
            command,
            self.version.as_deref(),
            self.settings,
        )
    }
}
