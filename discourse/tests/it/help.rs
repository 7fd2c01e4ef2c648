use std::io;

use discourse::{HelpContext, HelpPrinter, Outcome};
use expect_test::expect;

use crate::Netctl;

/// Parse `args`, then render whatever help the outcome calls for
fn help(storage: &mut Netctl, args: &str) -> String {
    let mut parser = storage.parser();
    let mut out = Vec::new();

    let written = match parser.try_parse(args.split_ascii_whitespace()).unwrap() {
        Outcome::HelpRequested { command } => parser.write_help(&mut out, &command, None),
        Outcome::Usage { command, error } => {
            parser.write_help(&mut out, &command, Some(&error.to_string()))
        }
        other => panic!("expected help, got {other:?}"),
    };

    written.unwrap();

    String::from_utf8(out).unwrap()
}

#[test]
fn root_help() {
    let mut storage = Netctl::default();

    expect![[r#"
            Inspect and configure network links

            Usage:
              netctl [COMMAND] [OPTIONS]

            Subcommands:
              link (l)                Manage links
              route                   Manage routes

            Options:
              -c, --config <string>   Path to the configuration file
                  --verbose           Log more details
              -t, --tag <string>...   Attach a tag; may be repeated
              -h, --help              Show this help message
              -v, --version           Show the version
        "#]]
    .assert_eq(&help(&mut storage, "--help"));
}

#[test]
fn subcommand_help() {
    let mut storage = Netctl::default();

    expect![[r#"
            Manage links

            Usage:
              netctl link <DEVICE> [PEER] [OPTIONS]

            Arguments:
              <DEVICE>                Device name
              [PEER]

            Options:
                  --mtu <uint16>      Maximum transmission unit
              -a, --address <ip>...   Address to assign; may be repeated
              -u, --up                Bring the link up
              -h, --help              Show this help message
              -v, --version           Show the version

            Global options:
              -c, --config <string>   Path to the configuration file
                  --verbose           Log more details
              -t, --tag <string>...   Attach a tag; may be repeated
        "#]]
    .assert_eq(&help(&mut storage, "link -h"));
}

#[test]
fn usage_error_help() {
    let mut storage = Netctl::default();

    expect![[r#"
            required argument <DESTINATION> at position 1 of "add" was omitted

            Usage:
              netctl route add <DESTINATION> [OPTIONS]

            Arguments:
              <DESTINATION>           Network to route

            Options:
              -m, --mask <mask>       Netmask of the destination
              -h, --help              Show this help message
              -v, --version           Show the version

            Global options:
              -c, --config <string>   Path to the configuration file
                  --verbose           Log more details
              -t, --tag <string>...   Attach a tag; may be repeated

            Routes are added to the main table.
        "#]]
    .assert_eq(&help(&mut storage, "route add"));
}

#[test]
fn version_message() {
    let mut storage = Netctl::default();
    let parser = storage.parser();
    let mut out = Vec::new();

    parser.write_version(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Version: 1.2.0\n");
}

struct ChainPrinter;

impl HelpPrinter for ChainPrinter {
    fn print_help(
        &self,
        out: &mut dyn io::Write,
        context: &HelpContext<'_, '_>,
        message: Option<&str>,
    ) -> io::Result<()> {
        writeln!(
            out,
            "{} ({})",
            context.chain.join(" "),
            message.unwrap_or("no message")
        )
    }

    fn print_version(&self, out: &mut dyn io::Write, program: &str, version: &str) -> io::Result<()> {
        writeln!(out, "{program} {version}")
    }
}

#[test]
fn custom_printer() {
    let mut storage = Netctl::default();
    let mut parser = storage.parser().with_help_printer(ChainPrinter);
    let mut out = Vec::new();

    let Outcome::Usage { command, error } = parser.try_parse(["route", "add"]).unwrap() else {
        panic!("expected a usage error");
    };

    parser
        .write_help(&mut out, &command, Some(&error.to_string()))
        .unwrap();
    parser.write_version(&mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "netctl route add (required argument <DESTINATION> at position 1 of \"add\" was omitted)\n\
        netctl 1.2.0\n"
    );
}
