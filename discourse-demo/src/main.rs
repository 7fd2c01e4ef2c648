use std::{io, net::IpAddr, time::Duration};

use anyhow::Context;
use discourse::{Flag, HardwareAddr, HexBytes, IpMask, Parser, PositionalValue, Subcommand};
use lazy_format::lazy_format;
use tracing::{debug_span, info};

#[derive(Debug, Default)]
struct Arguments {
    config: String,
    verbose: bool,
    tags: Vec<String>,

    device: String,
    peer: String,
    mtu: u16,
    addresses: Vec<IpAddr>,
    hardware: HardwareAddr,
    up: bool,

    timeout: Duration,
    destination: String,
    mask: IpMask,
    key: HexBytes,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Link,
    RouteAdd,
    RouteFlush,
    Nothing,
}

fn build(args: &mut Arguments) -> anyhow::Result<Parser<'_>> {
    let mut parser = Parser::new("netctl")
        .with_description("A small demonstration of discourse: inspect and configure network links")
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_help_append("Set RUST_LOG=discourse=trace to watch the parser work.")
        .trace_span(debug_span!("arguments"));

    parser.add_flag(
        Flag::new("c", "config", &mut args.config).with_description("Path to the configuration file"),
    )?;
    parser.add_flag(Flag::new("", "verbose", &mut args.verbose).with_description("Log more details"))?;
    parser.add_flag(
        Flag::new("t", "tag", &mut args.tags).with_description("Attach a tag; may be repeated"),
    )?;

    let link = parser.add_subcommand(
        Subcommand::new("link")
            .with_short_name("l")
            .with_description("Show or change a network link"),
        1,
    )?;

    link.add_positional(
        PositionalValue::new("DEVICE", 1, &mut args.device)
            .required()
            .with_description("The link to change, like eth0"),
    )?;
    link.add_positional(
        PositionalValue::new("PEER", 2, &mut args.peer).with_description("The other end of a veth pair"),
    )?;
    link.add_flag(Flag::new("", "mtu", &mut args.mtu).with_description("Maximum transmission unit"))?;
    link.add_flag(
        Flag::new("a", "address", &mut args.addresses)
            .with_description("An address to assign; may be repeated"),
    )?;
    link.add_flag(Flag::new("", "hw", &mut args.hardware).with_description("Hardware address"))?;
    link.add_flag(Flag::new("u", "up", &mut args.up).with_description("Bring the link up"))?;

    let route = parser.add_subcommand(Subcommand::new("route").with_description("Manage routes"), 1)?;

    route.add_flag(
        Flag::new("", "timeout", &mut args.timeout).with_description("How long to wait, like 1m30s"),
    )?;

    let add = route.add_subcommand(Subcommand::new("add").with_description("Add a route"), 1)?;
    add.add_positional(
        PositionalValue::new("DESTINATION", 1, &mut args.destination)
            .required()
            .with_description("Destination network"),
    )?;
    add.add_flag(Flag::new("m", "mask", &mut args.mask).with_description("Destination netmask, like /24"))?;
    add.add_flag(Flag::new("k", "key", &mut args.key).with_description("Authentication key, in hex"))?;

    route.add_subcommand(Subcommand::new("flush").with_description("Remove every route"), 1)?;

    Ok(parser)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = Arguments::default();

    let (command, trailing) = {
        let mut parser = build(&mut args).context("failed to build the command tree")?;
        parser.parse_env().context("invalid command line")?;

        let used = |path: &[&str]| {
            let mut node = parser.root();

            path.iter().all(|&name| match node.subcommand(name) {
                Some(child) if child.used() => {
                    node = child;
                    true
                }
                _ => false,
            })
        };

        let command = if used(&["link"]) {
            Command::Link
        } else if used(&["route", "add"]) {
            Command::RouteAdd
        } else if used(&["route", "flush"]) {
            Command::RouteFlush
        } else {
            Command::Nothing
        };

        (command, parser.trailing_arguments().to_vec())
    };

    info!(?command, verbose = args.verbose, config = %args.config, "parsed arguments");

    let tags = lazy_format!(" #{tag}" for tag in &args.tags);

    match command {
        Command::Link => {
            let state = lazy_format!(match (args.up) {
                true => "up",
                false => "unchanged",
            });

            println!("link {}{tags}: {state}, mtu {}", args.device, args.mtu);

            if !args.peer.is_empty() {
                println!("  peer {}", args.peer);
            }

            if !args.hardware.octets().is_empty() {
                println!("  hardware address {}", args.hardware);
            }

            for address in &args.addresses {
                println!("  address {address}");
            }
        }
        Command::RouteAdd => {
            let mask = lazy_format!(match (args.mask.prefix_len()) {
                Some(len) => "/{len}",
                None => (" mask {mask}", mask = args.mask),
            });

            println!("route {}{mask}{tags}", args.destination);

            if !args.key.is_empty() {
                println!("  authenticated with {} byte key", args.key.len());
            }
        }
        Command::RouteFlush => println!("flushing routes{tags}, waiting {:?}", args.timeout),
        Command::Nothing => println!("nothing to do{tags}"),
    }

    if !trailing.is_empty() {
        println!("extra arguments: {trailing:?}");
    }

    Ok(())
}
