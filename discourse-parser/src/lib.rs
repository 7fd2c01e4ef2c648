#![no_std]

/*!
Low-level classification of command-line tokens. Takes care of distinctions
between flags, flags with attached values, positionals, and the `--`
terminator. No type handling happens here, and this crate has no idea which
flags actually exist; that's left to the [`Visitor`]. Usually this is too low
level to use directly.
*/

mod arg;

pub use arg::Arg;

/**
The [`ArgumentsParser`] type operates by passing the tokens it classifies into
a [`Visitor`], to be handled.
 */
pub trait Visitor<'arg> {
    type Value;

    /// A positional token, such as a subcommand name or a positional value.
    fn visit_positional(self, argument: &'arg Arg) -> Self::Value;

    /// A token that appeared after a `--` terminator. These are never
    /// interpreted; they're handed along verbatim.
    fn visit_trailing(self, argument: &'arg Arg) -> Self::Value;

    /// A flag that definitely has a value, because it was given as
    /// `--key=value` or `-k=value`. The dashes have been stripped.
    fn visit_flag_with_value(self, key: &'arg Arg, value: &'arg Arg) -> Self::Value;

    /// A flag without an attached value, such as `--key` or `-k`. The dashes
    /// have been stripped. The visitor decides if the flag takes its value
    /// from the following token.
    fn visit_flag(self, key: &'arg Arg, argument: impl ArgAccess<'arg>) -> Self::Value;
}

/**
[`ArgAccess`] allows a visitor to decide if a given flag consumes the token
that follows it, based on the identity of the flag.

Consider `--foo bar`. Is this a pair of parameters (the boolean flag `--foo`
and the positional parameter `bar`) or a single flag `--foo` with the value
`bar`? The [`ArgumentsParser`] can't independently classify a given token, so
instead, a visitor can inspect and request the following token via this trait
only for flags that need it.
*/
pub trait ArgAccess<'arg>: Sized {
    /// Look at the following token without consuming it.
    fn peek(&self) -> Option<&'arg Arg>;

    /**
    Consume the following token, verbatim. This should only be called by
    flags that take a value; flags that don't should simply drop the
    [`ArgAccess`], so that the next token can correctly be classified
    independently.

    This returns [`None`] if all of the tokens have been exhausted.
    */
    fn take(self) -> Option<&'arg Arg>;

    /// Consume the following token only if it satisfies `predicate`.
    fn take_if(self, predicate: impl FnOnce(&'arg Arg) -> bool) -> Option<&'arg Arg> {
        match self.peek() {
            Some(arg) if predicate(arg) => self.take(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ready,
    Trailing,
}

/**
An `ArgumentsParser` is the main entry point into `discourse_parser`. It
classifies one token in each call to [`next_arg`][Self::next_arg], sending the
result to the given [`Visitor`].

[discourse-parser][crate] operates entirely on borrowed data, because we
assume that command-line arguments can be loaded early on in `main` and then
handled in a borrowed form for the rest of the program. The ubiquitous `'arg`
lifetime refers to this borrowed command line data.
*/
#[derive(Debug, Clone)]
pub struct ArgumentsParser<'arg, I> {
    state: State,
    args: I,
    lookahead: Option<&'arg Arg>,
    consumed: usize,
}

impl<'arg, I> ArgumentsParser<'arg, I>
where
    I: Iterator<Item = &'arg str>,
{
    /**
    Create a new [`ArgumentsParser`] from an iterator of tokens. This list
    should *exclude* the name of the program, which is commonly passed as the
    first argument in the list.
     */
    #[inline]
    #[must_use]
    pub fn new(args: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            state: State::Ready,
            args: args.into_iter(),
            lookahead: None,
            consumed: 0,
        }
    }

    /// The number of tokens consumed so far. Before a call to
    /// [`next_arg`][Self::next_arg], this is the index of the token it will
    /// classify.
    #[inline]
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// True once a `--` terminator has been seen.
    #[inline]
    #[must_use]
    pub fn is_trailing(&self) -> bool {
        self.state == State::Trailing
    }

    fn next_token(&mut self) -> Option<&'arg Arg> {
        let arg = match self.lookahead.take() {
            Some(arg) => arg,
            None => Arg::new(self.args.next()?),
        };

        self.consumed += 1;
        Some(arg)
    }

    fn peek_token(&mut self) -> Option<&'arg Arg> {
        if self.lookahead.is_none() {
            self.lookahead = self.args.next().map(Arg::new);
        }

        self.lookahead
    }

    /// Create an `ArgAccess` over the token following a flag
    #[inline]
    fn following_arg(&mut self) -> FollowingArgAccess<'_, 'arg, I> {
        debug_assert_eq!(self.state, State::Ready);

        let next = self.peek_token();
        FollowingArgAccess { next, parent: self }
    }

    pub fn next_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        let arg = self.next_token()?;

        if self.state == State::Trailing {
            return Some(visitor.visit_trailing(arg));
        }

        match arg.as_str() {
            "--" => {
                self.state = State::Trailing;
                self.next_arg(visitor)
            }
            // A lone dash conventionally means stdin; it's a positional.
            "-" => Some(visitor.visit_positional(arg)),
            token => Some(match strip_dashes(token) {
                None => visitor.visit_positional(arg),
                Some(flag) => match split_once(flag, b'=') {
                    Some((key, value)) => {
                        visitor.visit_flag_with_value(Arg::new(key), Arg::new(value))
                    }
                    None => visitor.visit_flag(Arg::new(flag), self.following_arg()),
                },
            }),
        }
    }
}

/// ArgAccess implementation that gets the next token from the list, exactly
/// as it was given, even if it looks like a flag or a terminator.
struct FollowingArgAccess<'a, 'arg, I> {
    next: Option<&'arg Arg>,
    parent: &'a mut ArgumentsParser<'arg, I>,
}

impl<'arg, I> ArgAccess<'arg> for FollowingArgAccess<'_, 'arg, I>
where
    I: Iterator<Item = &'arg str>,
{
    #[inline]
    fn peek(&self) -> Option<&'arg Arg> {
        self.next
    }

    fn take(self) -> Option<&'arg Arg> {
        debug_assert!(self.parent.lookahead == self.next);

        self.next?;
        self.parent.next_token()
    }
}

/// Remove one or two leading dashes; `None` if there were none.
fn strip_dashes(token: &str) -> Option<&str> {
    token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
}

fn split_once(input: &str, delimiter: u8) -> Option<(&str, &str)> {
    // The delimiter is ASCII, so both halves remain valid UTF-8
    memchr::memchr(delimiter, input.as_bytes()).map(|i| (&input[..i], &input[i + 1..]))
}
