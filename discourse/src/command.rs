/*!
The command tree: [`Subcommand`]s, the [`Flag`]s and [`PositionalValue`]s
registered on them, and the rules that keep registration consistent.

Every flag and positional value writes through a `&'a mut` borrow of storage
owned by the caller. Once parsing is finished and the tree is dropped, the
caller reads its values directly out of that storage.
*/

use core::fmt;

use crate::{
    errors::{CoercionError, RegistrationError},
    value::{FlagKind, Target},
};

/**
A named flag, like `-o` or `--output`, along with the caller-owned storage it
writes into. The [kind][FlagKind] of the flag is derived from the type of the
storage: `bool` is a boolean flag, `Vec<u32>` collects every occurrence as an
unsigned integer, and so on.
*/
pub struct Flag<'a> {
    short: String,
    long: String,
    description: String,
    kind: FlagKind,
    target: &'a mut dyn Target,

    // Token indices that were written to this flag during the current parse.
    // Every nesting level rescans the whole command line, so this is how we
    // make sure each occurrence is applied exactly once.
    writes: Vec<usize>,
    present: bool,
}

impl<'a> Flag<'a> {
    /// Create a new flag. Either of `short` or `long` may be empty, but not
    /// both; names are given without their leading dashes.
    #[must_use]
    pub fn new<T: Target>(short: &str, long: &str, target: &'a mut T) -> Self {
        Self {
            short: short.to_owned(),
            long: long.to_owned(),
            description: String::new(),
            kind: target.kind(),
            target,
            writes: Vec::new(),
            present: false,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn short(&self) -> &str {
        &self.short
    }

    #[inline]
    #[must_use]
    pub fn long(&self) -> &str {
        &self.long
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    /// True if this flag was set during the most recent parse, either from
    /// the command line or with [`Subcommand::set_value_for_key`].
    #[inline]
    #[must_use]
    pub fn present(&self) -> bool {
        self.present
    }

    /// Check if `name` is this flag's short or long name. The empty name
    /// never matches.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        !name.is_empty() && (name == self.short || name == self.long)
    }

    /// The flag as the user would type it, preferring the long name
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.long.is_empty() {
            false => format!("--{}", self.long),
            true => format!("-{}", self.short),
        }
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        [self.short.as_str(), self.long.as_str()]
            .into_iter()
            .filter(|name| !name.is_empty())
    }

    /// Parse `raw` into this flag's storage
    pub(crate) fn assign(&mut self, raw: &str) -> Result<(), CoercionError> {
        self.target.assign(raw).map_err(|message| CoercionError {
            flag: self.display_name(),
            value: raw.to_owned(),
            message,
        })?;

        self.present = true;
        Ok(())
    }

    /// Parse `raw` into this flag's storage, unless the token at `index` was
    /// already applied to this flag. Returns true if a write happened.
    pub(crate) fn assign_at(&mut self, index: usize, raw: &str) -> Result<bool, CoercionError> {
        if self.writes.contains(&index) {
            return Ok(false);
        }

        self.assign(raw)?;
        self.writes.push(index);
        Ok(true)
    }

    pub(crate) fn reset(&mut self) {
        self.writes.clear();
        self.present = false;
    }
}

impl fmt::Debug for Flag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("short", &self.short)
            .field("long", &self.long)
            .field("kind", &self.kind)
            .field("present", &self.present)
            .finish_non_exhaustive()
    }
}

/**
A positional value: a bare token at a specific position relative to the
subcommand that owns it, written verbatim into a `String`.
*/
#[derive(Debug)]
pub struct PositionalValue<'a> {
    name: String,
    position: usize,
    required: bool,
    description: String,
    found: bool,
    target: &'a mut String,
}

impl<'a> PositionalValue<'a> {
    /// Positions start at 1, and are relative to the owning subcommand: the
    /// first token after the subcommand's own name is position 1.
    #[must_use]
    pub fn new(name: impl Into<String>, position: usize, target: &'a mut String) -> Self {
        Self {
            name: name.into(),
            position,
            required: false,
            description: String::new(),
            found: false,
            target,
        }
    }

    /// Make parsing fail with a usage error if this value is omitted.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// True if a token was written to this value during the most recent parse
    #[inline]
    #[must_use]
    pub fn found(&self) -> bool {
        self.found
    }

    pub(crate) fn assign(&mut self, token: &str) {
        token.clone_into(self.target);
        self.found = true;
    }

    pub(crate) fn reset(&mut self) {
        self.found = false;
    }
}

/**
A node in the command tree. A subcommand is matched by name (or short name)
when a positional token appears at its registered position, relative to its
parent. Once matched, its own flags become active and its own positional
values and subcommands are matched against the tokens that follow.
*/
#[derive(Debug)]
pub struct Subcommand<'a> {
    pub(crate) name: String,
    pub(crate) short_name: String,
    pub(crate) description: String,
    pub(crate) position: usize,
    pub(crate) subcommands: Vec<Subcommand<'a>>,
    pub(crate) flags: Vec<Flag<'a>>,
    pub(crate) positionals: Vec<PositionalValue<'a>>,
    pub(crate) help_prepend: String,
    pub(crate) help_append: String,
    pub(crate) used: bool,
    pub(crate) hidden: bool,
}

impl<'a> Subcommand<'a> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: String::new(),
            description: String::new(),
            position: 0,
            subcommands: Vec::new(),
            flags: Vec::new(),
            positionals: Vec::new(),
            help_prepend: String::new(),
            help_append: String::new(),
            used: false,
            hidden: false,
        }
    }

    /// An alternative name that also matches this subcommand
    #[must_use]
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = short_name.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Text printed before everything else in this subcommand's help
    #[must_use]
    pub fn with_help_prepend(mut self, text: impl Into<String>) -> Self {
        self.help_prepend = text.into();
        self
    }

    /// Text printed after everything else in this subcommand's help
    #[must_use]
    pub fn with_help_append(mut self, text: impl Into<String>) -> Self {
        self.help_append = text.into();
        self
    }

    /// Hidden subcommands can still be used, but they're left out of help
    /// listings and error suggestions.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The position of this subcommand relative to its parent; 0 until it's
    /// been registered.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// True if this subcommand was reached during the most recent parse
    #[inline]
    #[must_use]
    pub fn used(&self) -> bool {
        self.used
    }

    #[inline]
    #[must_use]
    pub fn help_prepend(&self) -> &str {
        &self.help_prepend
    }

    #[inline]
    #[must_use]
    pub fn help_append(&self) -> &str {
        &self.help_append
    }

    #[inline]
    #[must_use]
    pub fn subcommands(&self) -> &[Subcommand<'a>] {
        &self.subcommands
    }

    #[inline]
    #[must_use]
    pub fn flags(&self) -> &[Flag<'a>] {
        &self.flags
    }

    #[inline]
    #[must_use]
    pub fn positionals(&self) -> &[PositionalValue<'a>] {
        &self.positionals
    }

    /// Find a direct child subcommand by its name or short name
    #[must_use]
    pub fn subcommand(&self, name: &str) -> Option<&Subcommand<'a>> {
        self.subcommands.iter().find(|child| child.is_named(name))
    }

    /// Check if `name` is the short or long name of one of this subcommand's
    /// own flags.
    #[must_use]
    pub fn flag_exists(&self, name: &str) -> bool {
        self.flags.iter().any(|flag| flag.has_name(name))
    }

    /**
    Parse `value` into the flag named `key`, exactly as if it had been given
    on the command line as `--key=value`. Returns false if there is no such
    flag on this subcommand.
    */
    pub fn set_value_for_key(&mut self, key: &str, value: &str) -> Result<bool, CoercionError> {
        match self.flags.iter_mut().find(|flag| flag.has_name(key)) {
            None => Ok(false),
            Some(flag) => flag.assign(value).map(|()| true),
        }
    }

    pub(crate) fn is_named(&self, token: &str) -> bool {
        !token.is_empty() && (token == self.name || token == self.short_name)
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        [self.name.as_str(), self.short_name.as_str()]
            .into_iter()
            .filter(|name| !name.is_empty())
    }

    /**
    Register `subcommand` as a child of this one, at the given `position`.
    Siblings may share a position, as long as none of their names overlap,
    but a child may not share a position with a positional value. Returns
    the newly registered child, so that its own flags and children can be
    added.
    */
    pub fn add_subcommand(
        &mut self,
        mut subcommand: Subcommand<'a>,
        position: usize,
    ) -> Result<&mut Subcommand<'a>, RegistrationError> {
        if position == 0 {
            return Err(RegistrationError::ZeroPosition {
                kind: "subcommand",
                name: subcommand.name,
            });
        }

        if let Some(positional) = self.positional_at(position) {
            return Err(RegistrationError::PositionTakenByPositional {
                kind: "subcommand",
                parent: self.name.clone(),
                name: subcommand.name,
                existing: positional.name.clone(),
                position,
            });
        }

        if let Some(existing) = self.subcommands.iter().find(|other| {
            other.position == position && other.names().any(|name| subcommand.is_named(name))
        }) {
            return Err(RegistrationError::DuplicateSubcommand {
                parent: self.name.clone(),
                name: subcommand.name,
                existing: existing.name.clone(),
                position,
            });
        }

        subcommand.position = position;
        let index = self.subcommands.len();
        self.subcommands.push(subcommand);
        Ok(&mut self.subcommands[index])
    }

    /// Register a flag on this subcommand. Its short and long names must not
    /// overlap with any flag already registered here.
    pub fn add_flag(&mut self, flag: Flag<'a>) -> Result<(), RegistrationError> {
        if flag.names().next().is_none() {
            return Err(RegistrationError::UnnamedFlag {
                parent: self.name.clone(),
            });
        }

        let duplicate = flag
            .names()
            .find(|&name| self.flag_exists(name))
            .map(str::to_owned);

        if let Some(name) = duplicate {
            return Err(RegistrationError::DuplicateFlag {
                parent: self.name.clone(),
                name,
            });
        }

        self.flags.push(flag);
        Ok(())
    }

    /// Register a positional value on this subcommand. Its position must not
    /// be used by any other positional value or subcommand registered here.
    pub fn add_positional(
        &mut self,
        positional: PositionalValue<'a>,
    ) -> Result<(), RegistrationError> {
        let position = positional.position;

        if position == 0 {
            return Err(RegistrationError::ZeroPosition {
                kind: "positional value",
                name: positional.name,
            });
        }

        if let Some(existing) = self.positional_at(position) {
            return Err(RegistrationError::PositionTakenByPositional {
                kind: "positional value",
                parent: self.name.clone(),
                name: positional.name,
                existing: existing.name.clone(),
                position,
            });
        }

        if let Some(existing) = self.subcommand_at(position) {
            return Err(RegistrationError::PositionTakenBySubcommand {
                parent: self.name.clone(),
                name: positional.name,
                existing: existing.name.clone(),
                position,
            });
        }

        self.positionals.push(positional);
        Ok(())
    }

    fn positional_at(&self, position: usize) -> Option<&PositionalValue<'a>> {
        self.positionals
            .iter()
            .find(|positional| positional.position == position)
    }

    fn subcommand_at(&self, position: usize) -> Option<&Subcommand<'a>> {
        self.subcommands
            .iter()
            .find(|child| child.position == position)
    }

    /// Clear everything recorded by a previous parse: `used`, `found` and
    /// `present`. Storage is left as-is.
    pub(crate) fn reset(&mut self) {
        self.used = false;
        self.flags.iter_mut().for_each(Flag::reset);
        self.positionals
            .iter_mut()
            .for_each(PositionalValue::reset);
        self.subcommands.iter_mut().for_each(Subcommand::reset);
    }
}
