mod help;
mod matching;

use std::{net::IpAddr, time::Duration};

use discourse::{
    CoercionError, Flag, IpMask, Outcome, Parser, PositionalValue, Subcommand, UsageError,
};

/// Storage for every flag and positional value of the `netctl` test tree
#[derive(Debug, Default)]
struct Netctl {
    config: String,
    verbose: bool,
    tags: Vec<String>,

    mtu: u16,
    addresses: Vec<IpAddr>,
    up: bool,
    device: String,
    peer: String,

    timeout: Duration,
    destination: String,
    mask: IpMask,
}

impl Netctl {
    /**
    ```text
    netctl [-c CONFIG] [--verbose] [-t TAG]...
        link|l <DEVICE> [PEER] [--mtu N] [-a ADDR]... [-u]
        route [--timeout D]
            add <DESTINATION> [-m MASK]
            flush
        debug (hidden)
    ```
    */
    fn parser(&mut self) -> Parser<'_> {
        let mut parser = Parser::new("netctl")
            .with_description("Inspect and configure network links")
            .with_version("1.2.0");

        parser
            .add_flag(
                Flag::new("c", "config", &mut self.config)
                    .with_description("Path to the configuration file"),
            )
            .unwrap();
        parser
            .add_flag(Flag::new("", "verbose", &mut self.verbose).with_description("Log more details"))
            .unwrap();
        parser
            .add_flag(
                Flag::new("t", "tag", &mut self.tags)
                    .with_description("Attach a tag; may be repeated"),
            )
            .unwrap();

        let link = parser
            .add_subcommand(
                Subcommand::new("link")
                    .with_short_name("l")
                    .with_description("Manage links"),
                1,
            )
            .unwrap();

        link.add_flag(Flag::new("", "mtu", &mut self.mtu).with_description("Maximum transmission unit"))
            .unwrap();
        link.add_flag(
            Flag::new("a", "address", &mut self.addresses)
                .with_description("Address to assign; may be repeated"),
        )
        .unwrap();
        link.add_flag(Flag::new("u", "up", &mut self.up).with_description("Bring the link up"))
            .unwrap();
        link.add_positional(
            PositionalValue::new("DEVICE", 1, &mut self.device)
                .required()
                .with_description("Device name"),
        )
        .unwrap();
        link.add_positional(PositionalValue::new("PEER", 2, &mut self.peer))
            .unwrap();

        let route = parser
            .add_subcommand(Subcommand::new("route").with_description("Manage routes"), 1)
            .unwrap();

        route
            .add_flag(Flag::new("", "timeout", &mut self.timeout))
            .unwrap();

        let add = route
            .add_subcommand(
                Subcommand::new("add").with_help_append("Routes are added to the main table."),
                1,
            )
            .unwrap();

        add.add_positional(
            PositionalValue::new("DESTINATION", 1, &mut self.destination)
                .required()
                .with_description("Network to route"),
        )
        .unwrap();
        add.add_flag(
            Flag::new("m", "mask", &mut self.mask).with_description("Netmask of the destination"),
        )
        .unwrap();

        route.add_subcommand(Subcommand::new("flush"), 1).unwrap();

        parser
            .add_subcommand(Subcommand::new("debug").hidden(), 1)
            .unwrap();

        parser
    }
}

fn parse(storage: &mut Netctl, args: &str) -> Result<Outcome, CoercionError> {
    storage.parser().try_parse(args.split_ascii_whitespace())
}

/// Unpack a usage error into the path of the subcommand it belongs to, and
/// the error itself.
fn usage(outcome: Result<Outcome, CoercionError>) -> (Vec<usize>, UsageError) {
    match outcome {
        Ok(Outcome::Usage { command, error }) => (command.indices().to_vec(), error),
        other => panic!("expected a usage error, got {other:?}"),
    }
}

#[test]
fn smoke() {
    let mut storage = Netctl::default();

    let outcome = parse(
        &mut storage,
        "-c /etc/netctl.toml link eth0 peer0 --mtu 9000 -a 10.0.0.1 --address=fe80::1 -u",
    );

    assert_eq!(outcome, Ok(Outcome::Parsed));
    assert_eq!(storage.config, "/etc/netctl.toml");
    assert_eq!(storage.device, "eth0");
    assert_eq!(storage.peer, "peer0");
    assert_eq!(storage.mtu, 9000);
    assert_eq!(
        storage.addresses,
        [
            "10.0.0.1".parse::<IpAddr>().unwrap(),
            "fe80::1".parse::<IpAddr>().unwrap()
        ]
    );
    assert!(storage.up);
    assert!(!storage.verbose);
}

#[test]
fn empty_command_line() {
    let mut storage = Netctl::default();

    assert_eq!(parse(&mut storage, ""), Ok(Outcome::Parsed));
    assert_eq!(storage.config, "");
    assert!(storage.tags.is_empty());
}

#[test]
fn exit_codes() {
    let mut storage = Netctl::default();

    assert_eq!(parse(&mut storage, "link eth0").unwrap().exit_code(), None);
    assert_eq!(parse(&mut storage, "--help").unwrap().exit_code(), Some(0));
    assert_eq!(parse(&mut storage, "--version").unwrap().exit_code(), Some(0));
    assert_eq!(parse(&mut storage, "link").unwrap().exit_code(), Some(2));
}
