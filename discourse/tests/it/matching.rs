use discourse::{Flag, Outcome, Parser, PositionalValue, Subcommand, UsageError};

use crate::{Netctl, parse, usage};

#[test]
fn nested_positionals_are_relative() {
    let mut storage = Netctl::default();

    assert_eq!(
        parse(&mut storage, "route add 10.0.0.0 -m /8"),
        Ok(Outcome::Parsed)
    );
    assert_eq!(storage.destination, "10.0.0.0");
    assert_eq!(storage.mask.prefix_len(), Some(8));
}

#[test]
fn positional_before_subcommand() {
    let mut region = String::new();
    let mut target = String::new();

    {
        let mut parser = Parser::new("ship");
        parser
            .add_positional(PositionalValue::new("REGION", 1, &mut region))
            .unwrap();
        parser
            .add_subcommand(Subcommand::new("deploy"), 2)
            .unwrap()
            .add_positional(PositionalValue::new("TARGET", 1, &mut target).required())
            .unwrap();

        assert_eq!(
            parser.try_parse(["eu", "deploy", "prod"]),
            Ok(Outcome::Parsed)
        );
        assert!(parser.subcommand("deploy").unwrap().used());
        assert!(parser.root().positionals()[0].found());
    }

    assert_eq!(region, "eu");
    assert_eq!(target, "prod");
}

#[test]
fn short_names() {
    let mut storage = Netctl::default();

    {
        let mut parser = storage.parser();
        assert_eq!(parser.try_parse(["l", "eth1"]), Ok(Outcome::Parsed));
        assert!(parser.subcommand("link").unwrap().used());
    }

    assert_eq!(storage.device, "eth1");
}

#[test]
fn used_is_reset_between_parses() {
    let mut storage = Netctl::default();
    let mut parser = storage.parser();

    assert_eq!(parser.try_parse(["route", "flush"]), Ok(Outcome::Parsed));
    assert!(parser.root().used());

    let route = parser.subcommand("route").unwrap();
    assert!(route.used());
    assert!(route.subcommand("flush").unwrap().used());
    assert!(!route.subcommand("add").unwrap().used());
    assert!(!parser.subcommand("link").unwrap().used());

    assert_eq!(parser.try_parse(["link", "eth0"]), Ok(Outcome::Parsed));
    assert!(!parser.subcommand("route").unwrap().used());
    assert!(parser.subcommand("link").unwrap().used());
}

#[test]
fn hidden_subcommands_still_match() {
    let mut storage = Netctl::default();
    let mut parser = storage.parser();

    assert_eq!(parser.try_parse(["debug"]), Ok(Outcome::Parsed));
    assert!(parser.subcommand("debug").unwrap().used());
}

#[test]
fn unknown_subcommand_lists_visible_siblings() {
    let mut storage = Netctl::default();

    assert_eq!(
        usage(parse(&mut storage, "rout")),
        (
            vec![],
            UsageError::UnknownSubcommand {
                argument: "rout".to_owned(),
                depth: 1,
                available: vec!["link".to_owned(), "route".to_owned()],
            }
        )
    );

    assert_eq!(
        usage(parse(&mut storage, "route list")),
        (
            vec![1],
            UsageError::UnknownSubcommand {
                argument: "list".to_owned(),
                depth: 1,
                available: vec!["add".to_owned(), "flush".to_owned()],
            }
        )
    );
}

#[test]
fn unexpected_arguments() {
    let mut storage = Netctl::default();

    assert_eq!(
        usage(parse(&mut storage, "route flush extra")),
        (
            vec![1, 1],
            UsageError::UnexpectedArgument {
                argument: "extra".to_owned()
            }
        )
    );

    assert_eq!(
        usage(parse(&mut storage, "link eth0 peer0 extra")),
        (
            vec![0],
            UsageError::UnexpectedArgument {
                argument: "extra".to_owned()
            }
        )
    );
}

#[test]
fn missing_required_positional() {
    let mut storage = Netctl::default();

    assert_eq!(
        usage(parse(&mut storage, "link --mtu 1500")),
        (
            vec![0],
            UsageError::MissingPositional {
                subcommand: "link".to_owned(),
                name: "DEVICE".to_owned(),
                position: 1,
            }
        )
    );

    // The flag was still applied before validation failed
    assert_eq!(storage.mtu, 1500);
}

#[test]
fn missing_global_positional() {
    let mut file = String::new();

    {
        let mut parser = Parser::new("cat");
        parser
            .add_positional(PositionalValue::new("FILE", 1, &mut file).required())
            .unwrap();

        assert_eq!(
            usage(parser.try_parse(Vec::<String>::new())),
            (
                vec![],
                UsageError::MissingGlobalPositional {
                    name: "FILE".to_owned(),
                    position: 1,
                }
            )
        );

        assert_eq!(parser.try_parse(["notes.txt"]), Ok(Outcome::Parsed));
    }

    assert_eq!(file, "notes.txt");
}

#[test]
fn help_targets_deepest_subcommand() {
    let mut storage = Netctl::default();

    for (args, expected) in [
        ("-h", vec![]),
        ("link -h", vec![0]),
        ("-h link", vec![0]),
        ("link eth0 --help", vec![0]),
        ("route add --help", vec![1, 0]),
    ] {
        match parse(&mut storage, args) {
            Ok(Outcome::HelpRequested { command }) => {
                assert_eq!(command.indices(), expected, "{args}")
            }
            other => panic!("{args}: expected a help request, got {other:?}"),
        }
    }
}

#[test]
fn help_skips_validation() {
    let mut storage = Netctl::default();

    // DEVICE is required, but help was asked for
    assert!(matches!(
        parse(&mut storage, "link --help"),
        Ok(Outcome::HelpRequested { .. })
    ));
}

#[test]
fn help_flag_can_be_disabled() {
    let mut storage = Netctl::default();

    let outcome = storage
        .parser()
        .show_help_with_h_flag(false)
        .try_parse(["link", "eth0", "-h"]);

    assert_eq!(outcome, Ok(Outcome::Parsed));
}

#[test]
fn version() {
    let mut storage = Netctl::default();

    assert_eq!(
        parse(&mut storage, "link eth0 -v"),
        Ok(Outcome::VersionRequested)
    );
    assert_eq!(
        parse(&mut storage, "--version link"),
        Ok(Outcome::VersionRequested)
    );

    let outcome = storage
        .parser()
        .show_version_with_v_flag(false)
        .try_parse(["link", "eth0", "-v"]);

    assert_eq!(outcome, Ok(Outcome::Parsed));
}

#[test]
fn version_flag_needs_a_version() {
    let mut verbose = false;

    {
        let mut parser = Parser::new("quiet");
        parser
            .add_flag(Flag::new("v", "verbose", &mut verbose))
            .unwrap();

        assert_eq!(parser.try_parse(["-v"]), Ok(Outcome::Parsed));
    }

    assert!(verbose);
}

#[test]
fn terminator_collects_trailing_arguments() {
    let mut storage = Netctl::default();

    {
        let mut parser = storage.parser();

        assert_eq!(
            parser.try_parse(["link", "eth0", "--", "--mtu", "5", "x", "--"]),
            Ok(Outcome::Parsed)
        );
        assert_eq!(parser.trailing_arguments(), ["--mtu", "5", "x", "--"]);

        assert_eq!(parser.try_parse(["link", "eth0"]), Ok(Outcome::Parsed));
        assert!(parser.trailing_arguments().is_empty());
    }

    assert_eq!(storage.mtu, 0);
    assert_eq!(storage.peer, "");
}

#[test]
fn value_flag_takes_terminator_verbatim() {
    let mut storage = Netctl::default();

    {
        let mut parser = storage.parser();
        assert_eq!(
            parser.try_parse(["-c", "--", "link", "eth0"]),
            Ok(Outcome::Parsed)
        );
        assert!(parser.trailing_arguments().is_empty());
    }

    assert_eq!(storage.config, "--");
    assert_eq!(storage.device, "eth0");
}

#[test]
fn unknown_flags_are_dropped() {
    let mut storage = Netctl::default();

    assert_eq!(
        parse(&mut storage, "link eth0 --bogus=1 --also"),
        Ok(Outcome::Parsed)
    );
    assert_eq!(storage.device, "eth0");
    assert_eq!(storage.peer, "");
}

#[test]
fn unknown_flag_consumes_following_token() {
    let mut storage = Netctl::default();

    assert_eq!(
        usage(parse(&mut storage, "--bogus link eth0")),
        (
            vec![],
            UsageError::UnknownSubcommand {
                argument: "eth0".to_owned(),
                depth: 1,
                available: vec!["link".to_owned(), "route".to_owned()],
            }
        )
    );
}
