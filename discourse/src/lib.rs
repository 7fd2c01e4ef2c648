/*!
A command line arguments parser for trees of positional subcommands, with
typed, repeatable flags.

A [`Parser`] owns a tree of [`Subcommand`]s. Each subcommand has its own
[`Flag`]s and [`PositionalValue`]s, and each of those writes through a
mutable borrow of storage you own, so once parsing is done and the parser is
dropped, your variables simply hold the parsed values. The type of the
storage decides how a flag is parsed: a `u16` flag only accepts unsigned
16-bit integers, a `Vec<Duration>` flag collects every occurrence as a
duration like `1h30m`, and a `bool` flag doesn't need a value at all.

Subcommands are matched by position: a subcommand registered at position 1 is
matched by the first positional token after its parent. Flags may appear
anywhere, and flags registered on the parser itself are global, recognized
at every level. Everything after a `--` terminator is collected verbatim as
[trailing arguments][Parser::trailing_arguments].

```
use std::time::Duration;

use discourse::{Flag, Outcome, Parser, PositionalValue, Subcommand};

let mut timeouts: Vec<Duration> = Vec::new();
let mut host = String::new();

{
    let mut parser = Parser::new("probe");

    parser
        .add_subcommand(Subcommand::new("ping"), 1)
        .unwrap()
        .add_positional(PositionalValue::new("HOST", 1, &mut host).required())
        .unwrap();

    parser
        .add_flag(Flag::new("t", "timeout", &mut timeouts))
        .unwrap();

    let outcome = parser
        .try_parse(["-t", "1s", "ping", "example.com", "--timeout=500ms"])
        .unwrap();

    assert_eq!(outcome, Outcome::Parsed);
    assert!(parser.subcommand("ping").unwrap().used());
}

assert_eq!(host, "example.com");
assert_eq!(timeouts, [Duration::from_secs(1), Duration::from_millis(500)]);
```

Most of the time you'll want [`Parser::parse`] or [`Parser::parse_env`]
instead of [`Parser::try_parse`]; these print help, version, and usage
errors, then exit the process when the command line calls for it.
*/

mod command;
mod engine;
pub mod errors;
pub mod help;
mod impls;
mod outcome;
mod parser;
mod printers;
pub mod value;

pub use command::{Flag, PositionalValue, Subcommand};
pub use discourse_parser::Arg;
pub use errors::{CoercionError, RegistrationError, UsageError};
pub use help::{HelpContext, HelpPrinter};
pub use impls::{AddressError, HardwareAddr, HexBytes, IpMask};
pub use outcome::{CommandPath, Outcome};
pub use parser::{Parser, Settings};
pub use printers::DefaultHelpPrinter;
pub use value::{FlagKind, Repetition, Target, ValueKind};
