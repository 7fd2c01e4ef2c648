use core::fmt::{self, Display};
use std::io::{self, Write as _};

use indent_write::io::IndentWriter;
use joinery::JoinableIterator;
use lazy_format::lazy_format;

use crate::{
    command::{Flag, PositionalValue},
    help::{HelpContext, HelpPrinter},
};

/// Item descriptions are aligned to this column, relative to the section
const COLUMN: usize = 24;

/**
A plain help printer with aligned descriptions. The layout is:

```text
DESCRIPTION

Usage:
  program subcommand <ARG> [OPTIONS]

Subcommands:
  name (short)            description

Arguments:
  <ARG>                   description

Options:
  -f, --foo <string>      description

Global options:
  -g, --global            description
```
*/
#[derive(Debug, Clone, Copy)]
pub struct DefaultHelpPrinter {
    width: usize,
}

impl DefaultHelpPrinter {
    /// Wrap descriptions to fit within `width` columns
    #[must_use]
    pub fn with_width(width: usize) -> Self {
        Self { width }
    }

    fn description_width(&self) -> usize {
        self.width.saturating_sub(COLUMN + 2).max(20)
    }

    /// Describe an item by printing the item, followed by the aligned
    /// description. If the item is too wide, the description starts on the
    /// following line instead.
    fn describe(
        &self,
        out: &mut (impl io::Write + ?Sized),
        item: impl Display,
        description: &str,
    ) -> io::Result<()> {
        /// Helper type that counts the bytes that flow through it. We use this
        /// to detect if we need any newlines here in `describe`
        struct IoByteCounter<'a, T: io::Write + ?Sized> {
            inner: &'a mut T,
            count: &'a mut usize,
        }

        impl<T: io::Write + ?Sized> io::Write for IoByteCounter<'_, T> {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                let n = self.inner.write(buf)?;
                *self.count += n;
                Ok(n)
            }

            fn flush(&mut self) -> io::Result<()> {
                self.inner.flush()
            }
        }

        let mut count = 0;

        {
            let mut out = IoByteCounter {
                inner: &mut *out,
                count: &mut count,
            };
            write!(out, "{item}")?;
        }

        if description.is_empty() {
            return writeln!(out);
        }

        let lines = textwrap::wrap(description, self.description_width());
        let mut lines = lines.iter();

        match COLUMN.checked_sub(count).filter(|&space| space >= 2) {
            Some(space) => {
                if let Some(first) = lines.next() {
                    writeln!(out, "{:space$}{first}", "")?;
                }
            }
            None => writeln!(out)?,
        }

        lines.try_for_each(|line| writeln!(out, "{:width$}{line}", "", width = COLUMN))
    }
}

impl Default for DefaultHelpPrinter {
    fn default() -> Self {
        Self::with_width(80)
    }
}

/// A word in a usage synopsis
#[derive(Debug, Clone, Copy)]
enum Word<'t, 'a> {
    Literal(&'t str),
    Positional(&'t PositionalValue<'a>),
    Command,
    Options,
}

impl Display for Word<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Word::Literal(word) => f.write_str(word),
            Word::Positional(positional) => Display::fmt(&placeholder(positional), f),
            Word::Command => f.write_str("[COMMAND]"),
            Word::Options => f.write_str("[OPTIONS]"),
        }
    }
}

/// A row in the options section
#[derive(Debug, Clone, Copy)]
enum OptionRow<'t, 'a> {
    Flag(&'t Flag<'a>),
    Help,
    Version,
}

fn placeholder(positional: &PositionalValue<'_>) -> impl Display {
    lazy_format!(match (positional.is_required()) {
        true => ("<{name}>", name = positional.name()),
        false => ("[{name}]", name = positional.name()),
    })
}

fn flag_tags(flag: &Flag<'_>) -> impl Display {
    let tags = lazy_format!(match ((flag.short(), flag.long())) {
        (short, "") => "-{short}",
        ("", long) => "    --{long}",
        (short, long) => "-{short}, --{long}",
    });

    let kind = flag.kind();

    lazy_format!(match ((kind.is_boolean(), kind.is_sequence())) {
        (true, false) => "{tags}",
        (true, true) => "{tags}...",
        (false, false) => ("{tags} <{name}>", name = kind.value.name()),
        (false, true) => ("{tags} <{name}>...", name = kind.value.name()),
    })
}

fn synopsis<'t, 'a>(context: &HelpContext<'t, 'a>) -> Vec<Word<'t, 'a>> {
    let command = context.command;

    let mut positions: Vec<usize> = command
        .positionals()
        .iter()
        .map(|positional| positional.position())
        .chain(
            command
                .subcommands()
                .iter()
                .filter(|subcommand| !subcommand.is_hidden())
                .map(|subcommand| subcommand.position()),
        )
        .collect();

    positions.sort_unstable();
    positions.dedup();

    let any_options = !command.flags().is_empty()
        || !context.globals().is_empty()
        || context.help_flag()
        || context.version_flag();

    context
        .chain
        .iter()
        .map(|&name| Word::Literal(name))
        .chain(positions.into_iter().map(|position| {
            match command
                .positionals()
                .iter()
                .find(|positional| positional.position() == position)
            {
                Some(positional) => Word::Positional(positional),
                None => Word::Command,
            }
        }))
        .chain(any_options.then_some(Word::Options))
        .collect()
}

/// Write a section by writing a newline, then the `header`, then an
/// indented `body`.
fn section<O: io::Write + ?Sized, T>(
    out: &mut O,
    header: &str,
    body: impl FnOnce(IndentWriter<&mut O>) -> io::Result<T>,
) -> io::Result<T> {
    writeln!(out, "\n{header}:")?;
    body(IndentWriter::new("  ", out))
}

/// Write an optional section, only if the iterator is not empty.
/// Otherwise identical to `section`.
fn maybe_section<O: io::Write + ?Sized, I: IntoIterator>(
    out: &mut O,
    header: &str,
    items: I,
    body: impl Fn(&mut IndentWriter<&mut O>, I::Item) -> io::Result<()>,
) -> io::Result<()> {
    let mut items = items.into_iter();

    match items.next() {
        None => Ok(()),
        Some(first) => section(out, header, |mut out| {
            body(&mut out, first)?;
            items.try_for_each(|item| body(&mut out, item))
        }),
    }
}

impl HelpPrinter for DefaultHelpPrinter {
    fn print_help(
        &self,
        out: &mut dyn io::Write,
        context: &HelpContext<'_, '_>,
        message: Option<&str>,
    ) -> io::Result<()> {
        let command = context.command;
        let description = textwrap::fill(command.description(), self.width);

        let mut preamble = [command.help_prepend(), message.unwrap_or_default(), description.as_str()]
            .into_iter()
            .filter(|text| !text.is_empty())
            .peekable();

        if preamble.peek().is_some() {
            preamble.try_for_each(|text| writeln!(out, "{text}"))?;
            writeln!(out)?;
        }

        writeln!(out, "Usage:")?;
        writeln!(
            IndentWriter::new("  ", &mut *out),
            "{}",
            synopsis(context).iter().join_with(" ")
        )?;

        let subcommands = command
            .subcommands()
            .iter()
            .filter(|subcommand| !subcommand.is_hidden());

        maybe_section(out, "Subcommands", subcommands, |out, subcommand| {
            let name = lazy_format!(match (subcommand.short_name()) {
                "" => ("{name}", name = subcommand.name()),
                short => ("{name} ({short})", name = subcommand.name()),
            });

            self.describe(out, name, subcommand.description())
        })?;

        let mut positionals: Vec<&PositionalValue<'_>> = command.positionals().iter().collect();
        positionals.sort_by_key(|positional| positional.position());

        maybe_section(out, "Arguments", positionals, |out, positional| {
            self.describe(out, placeholder(positional), positional.description())
        })?;

        let options = command
            .flags()
            .iter()
            .map(OptionRow::Flag)
            .chain(context.help_flag().then_some(OptionRow::Help))
            .chain(context.version_flag().then_some(OptionRow::Version));

        maybe_section(out, "Options", options, |out, row| match row {
            OptionRow::Flag(flag) => self.describe(out, flag_tags(flag), flag.description()),
            OptionRow::Help => self.describe(out, "-h, --help", "Show this help message"),
            OptionRow::Version => self.describe(out, "-v, --version", "Show the version"),
        })?;

        maybe_section(out, "Global options", context.globals(), |out, flag| {
            self.describe(out, flag_tags(flag), flag.description())
        })?;

        match command.help_append() {
            "" => Ok(()),
            append => writeln!(out, "\n{append}"),
        }
    }
}
