/*!
The matching engine. Each level of the command tree rescans the complete
command line: first to apply every flag that the level knows about (its own
flags, plus the root's global flags) and collect the positional tokens, then
to match those positional tokens against its subcommands and positional
values.

Positional tokens are addressed relative to the subcommand that owns them.
The root is at depth 1; when the positional token at (1-based) index `p` is
considered at depth `d`, its position relative to the current subcommand is
`p - d + 1`. Tokens with a relative position below 1 belong to an ancestor
and are skipped. When a subcommand matches, matching continues inside it, at
a depth advanced by the number of tokens this level handled.
*/

use core::ops::ControlFlow;

use discourse_parser::{Arg, ArgAccess, ArgumentsParser, Visitor};
use tracing::{Span, debug, trace};

use crate::{
    command::{Flag, PositionalValue, Subcommand},
    errors::{CoercionError, UsageError},
    outcome::{CommandPath, Outcome},
    parser::Settings,
};

/// Everything that stays the same as the engine descends through the tree
pub(crate) struct Session<'p, 'a> {
    pub args: &'p [String],
    pub globals: &'p mut [Flag<'a>],
    pub global_positionals: &'p mut [PositionalValue<'a>],
    pub trailing: &'p mut Vec<String>,
    pub settings: Settings,
    pub has_version: bool,
    pub span: &'p Span,
    pub path: CommandPath,
}

/// The parts of one subcommand that the engine matches against
pub(crate) struct Level<'l, 'a> {
    name: &'l str,
    flags: &'l mut [Flag<'a>],

    // `None` at the root, whose positional values are the global ones
    positionals: Option<&'l mut [PositionalValue<'a>]>,
    subcommands: &'l mut [Subcommand<'a>],
}

impl<'l, 'a> Level<'l, 'a> {
    /// The root level. Its flags and positional values are the global ones,
    /// which live in the [`Session`].
    pub fn root(name: &'l str, subcommands: &'l mut [Subcommand<'a>]) -> Self {
        Self {
            name,
            flags: Default::default(),
            positionals: None,
            subcommands,
        }
    }

    fn nested(node: &'l mut Subcommand<'a>) -> Self {
        Self {
            name: &node.name,
            flags: &mut node.flags,
            positionals: Some(&mut node.positionals),
            subcommands: &mut node.subcommands,
        }
    }
}

/// The positional tokens from one scan of the command line
#[derive(Debug, Default)]
struct Scan<'p> {
    positionals: Vec<&'p str>,
    help_requested: bool,
}

/// Reserved flag keys that are currently active
#[derive(Debug, Clone, Copy)]
struct Reserved {
    help: bool,
    version: bool,
}

/// Reasons a scan stops early
#[derive(Debug)]
enum Interrupt {
    Version,
    Usage(UsageError),
}

type Step = Result<ControlFlow<Interrupt>, CoercionError>;

impl<'p, 'a> Session<'p, 'a> {
    fn usage(&self, error: UsageError) -> Outcome {
        debug!(parent: self.span, %error, "usage error");

        Outcome::Usage {
            command: self.path.clone(),
            error,
        }
    }

    /**
    Scan the full command line, applying every flag that's either in `flags`
    or global, and collecting the positional tokens. Tokens after a `--`
    terminator are collected as trailing arguments instead; these are
    collected again from scratch by every scan.
    */
    fn scan(
        &mut self,
        flags: &mut [Flag<'a>],
    ) -> Result<ControlFlow<Outcome, Scan<'p>>, CoercionError> {
        let reserved = Reserved {
            help: self.settings.show_help_with_h_flag,
            version: self.settings.show_version_with_v_flag && self.has_version,
        };

        self.trailing.clear();

        let args = self.args;
        let mut scan = Scan::default();
        let mut parser = ArgumentsParser::new(args.iter().map(String::as_str));

        loop {
            let visitor = ScanVisitor {
                index: parser.consumed(),
                flags: &mut *flags,
                globals: &mut *self.globals,
                scan: &mut scan,
                trailing: &mut *self.trailing,
                reserved,
                span: self.span,
            };

            match parser.next_arg(visitor) {
                None => break,
                Some(step) => match step? {
                    ControlFlow::Continue(()) => {}
                    ControlFlow::Break(Interrupt::Version) => {
                        debug!(parent: self.span, "version requested");
                        return Ok(ControlFlow::Break(Outcome::VersionRequested));
                    }
                    ControlFlow::Break(Interrupt::Usage(error)) => {
                        return Ok(ControlFlow::Break(self.usage(error)));
                    }
                },
            }
        }

        Ok(ControlFlow::Continue(scan))
    }

    /// Match the command line against `level`, found at `depth`, and then
    /// against whatever subcommand of it matches.
    pub fn descend(&mut self, mut level: Level<'_, 'a>, depth: usize) -> Result<Outcome, CoercionError> {
        let span = self.span;
        debug!(parent: span, command = level.name, depth, "matching subcommand");

        let scan = match self.scan(level.flags)? {
            ControlFlow::Break(outcome) => return Ok(outcome),
            ControlFlow::Continue(scan) => scan,
        };

        let mut parsed = 0;

        for (index, &token) in scan.positionals.iter().enumerate() {
            let Some(relative) = (index + 2).checked_sub(depth).filter(|&relative| relative >= 1)
            else {
                trace!(parent: span, token, "skipping token owned by a parent");
                continue;
            };

            parsed += 1;

            if let Some(child_index) = level
                .subcommands
                .iter()
                .position(|child| child.position == relative && child.is_named(token))
            {
                let child = &mut level.subcommands[child_index];
                child.used = true;

                debug!(parent: span, subcommand = %child.name, relative, "descending");
                self.path.push(child_index);
                return self.descend(Level::nested(child), depth + parsed);
            }

            let slots = match level.positionals.as_deref_mut() {
                Some(slots) => slots,
                None => &mut *self.global_positionals,
            };

            if let Some(slot) = slots.iter_mut().find(|slot| slot.position() == relative) {
                trace!(parent: span, name = slot.name(), token, relative, "positional value");
                slot.assign(token);
                continue;
            }

            let error = if level.subcommands.iter().any(|child| child.position == relative) {
                UsageError::UnknownSubcommand {
                    argument: token.to_owned(),
                    depth: relative,
                    available: level
                        .subcommands
                        .iter()
                        .filter(|child| !child.hidden)
                        .map(|child| child.name.clone())
                        .collect(),
                }
            } else {
                UsageError::UnexpectedArgument {
                    argument: token.to_owned(),
                }
            };

            return Ok(self.usage(error));
        }

        if scan.help_requested {
            debug!(parent: span, command = level.name, "help requested");

            return Ok(Outcome::HelpRequested {
                command: self.path.clone(),
            });
        }

        if let Some(slot) = self
            .global_positionals
            .iter()
            .find(|slot| slot.is_required() && !slot.found())
        {
            let error = UsageError::MissingGlobalPositional {
                name: slot.name().to_owned(),
                position: slot.position(),
            };

            return Ok(self.usage(error));
        }

        if let Some(slot) = level
            .positionals
            .iter()
            .flat_map(|slots| slots.iter())
            .find(|slot| slot.is_required() && !slot.found())
        {
            let error = UsageError::MissingPositional {
                subcommand: level.name.to_owned(),
                name: slot.name().to_owned(),
                position: slot.position(),
            };

            return Ok(self.usage(error));
        }

        debug!(parent: span, command = level.name, "matched");
        Ok(Outcome::Parsed)
    }
}

/// Visitor for a single token, which applies flags in place and collects
/// positional and trailing tokens.
struct ScanVisitor<'s, 'p, 'a> {
    index: usize,
    flags: &'s mut [Flag<'a>],
    globals: &'s mut [Flag<'a>],
    scan: &'s mut Scan<'p>,
    trailing: &'s mut Vec<String>,
    reserved: Reserved,
    span: &'s Span,
}

/// Find a flag by key: first the current subcommand's, then the global ones.
fn resolve<'f, 'a>(
    flags: &'f mut [Flag<'a>],
    globals: &'f mut [Flag<'a>],
    key: &str,
) -> Option<&'f mut Flag<'a>> {
    match flags.iter_mut().find(|flag| flag.has_name(key)) {
        Some(flag) => Some(flag),
        None => globals.iter_mut().find(|flag| flag.has_name(key)),
    }
}

fn write(flag: &mut Flag<'_>, index: usize, raw: &str, span: &Span) -> Result<(), CoercionError> {
    if flag.assign_at(index, raw)? {
        trace!(parent: span, flag = %flag.display_name(), value = raw, index, "assigned");
    }

    Ok(())
}

impl<'p> Visitor<'p> for ScanVisitor<'_, 'p, '_> {
    type Value = Step;

    fn visit_positional(self, argument: &'p Arg) -> Step {
        self.scan.positionals.push(argument.as_str());
        Ok(ControlFlow::Continue(()))
    }

    fn visit_trailing(self, argument: &'p Arg) -> Step {
        self.trailing.push(argument.as_str().to_owned());
        Ok(ControlFlow::Continue(()))
    }

    fn visit_flag_with_value(self, key: &'p Arg, value: &'p Arg) -> Step {
        let key = key.as_str();

        match resolve(self.flags, self.globals, key) {
            Some(flag) => write(flag, self.index, value.as_str(), self.span)?,
            None => trace!(parent: self.span, flag = key, "dropping unrecognized flag"),
        }

        Ok(ControlFlow::Continue(()))
    }

    fn visit_flag(self, key: &'p Arg, argument: impl ArgAccess<'p>) -> Step {
        let key = key.as_str();

        if self.reserved.version && matches!(key, "v" | "version") {
            return Ok(ControlFlow::Break(Interrupt::Version));
        }

        if self.reserved.help && matches!(key, "h" | "help") {
            self.scan.help_requested = true;
            return Ok(ControlFlow::Continue(()));
        }

        let Some(flag) = resolve(self.flags, self.globals, key) else {
            // We can't know if an unrecognized flag takes a value, so assume
            // it does. A later level that recognizes it will rescan anyway.
            let skipped = argument.take();
            trace!(parent: self.span, flag = key, ?skipped, "dropping unrecognized flag");
            return Ok(ControlFlow::Continue(()));
        };

        if flag.kind().is_boolean() {
            let value = argument
                .take_if(|arg| *arg == "true" || *arg == "false")
                .map_or("true", |arg| arg.as_str());

            write(flag, self.index, value, self.span)?;
        } else {
            match argument.take() {
                Some(value) => write(flag, self.index, value.as_str(), self.span)?,
                None => {
                    return Ok(ControlFlow::Break(Interrupt::Usage(
                        UsageError::MissingValue {
                            flag: flag.display_name(),
                        },
                    )));
                }
            }
        }

        Ok(ControlFlow::Continue(()))
    }
}
