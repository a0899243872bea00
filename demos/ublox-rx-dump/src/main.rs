use std::{
    fmt::Write as _,
    process::ExitCode,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{value_parser, Arg, ArgAction};
use log::{error, info};
use ublox_rx::{DumpOutcome, Message, Protocol, Receiver, RxError, RxOptions};

const PROTOCOLS: [Protocol; 4] = [
    Protocol::Ubx,
    Protocol::Nmea,
    Protocol::Rtcm3,
    Protocol::Garbage,
];

fn command() -> clap::Command {
    clap::Command::new(clap::crate_name!())
        .about(clap::crate_description!())
        .arg_required_else_help(true)
        .arg(
            Arg::new("port")
                .value_name("port")
                .short('p')
                .long("port")
                .required_unless_present("list")
                .help("Receiver port: ser://<device>[@<baud>], tcp://<host>:<port> or a device path"),
        )
        .arg(
            Arg::new("no-probe")
                .short('n')
                .long("no-probe")
                .action(ArgAction::SetTrue)
                .help("Do not search the baud rate and do not probe for the receiver"),
        )
        .arg(
            Arg::new("hexdump")
                .short('x')
                .long("hexdump")
                .action(ArgAction::SetTrue)
                .help("Output a hex dump of each message"),
        )
        .arg(
            Arg::new("duration")
                .short('d')
                .long("duration")
                .value_name("seconds")
                .value_parser(value_parser!(u64))
                .help("Stop after this many seconds, runs forever by default"),
        )
        .arg(
            Arg::new("count")
                .short('c')
                .long("count")
                .value_parser(value_parser!(u32))
                .help("Stop after this many messages"),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .action(ArgAction::SetTrue)
                .help("List the serial ports found on this machine"),
        )
}

struct DumpArgs {
    port: String,
    no_probe: bool,
    hexdump: bool,
    duration: Option<Duration>,
    count: Option<u32>,
}

fn main() -> ExitCode {
    env_logger::init();
    let matches = command().get_matches();

    if matches.get_flag("list") {
        return match list_ports() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!("{:#}", err);
                DumpOutcome::OtherFailure.into()
            },
        };
    }

    let Some(port) = matches.get_one::<String>("port").cloned() else {
        return DumpOutcome::OtherFailure.into();
    };
    let args = DumpArgs {
        port,
        no_probe: matches.get_flag("no-probe"),
        hexdump: matches.get_flag("hexdump"),
        duration: matches
            .get_one::<u64>("duration")
            .map(|s| Duration::from_secs(*s)),
        count: matches.get_one::<u32>("count").copied(),
    };

    let outcome = match dump(&args) {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("{:#}", err);
            match err.downcast_ref::<RxError>() {
                Some(RxError::ReceiverNotFound { .. }) => DumpOutcome::ReceiverNotFound,
                _ => DumpOutcome::OtherFailure,
            }
        },
    };
    outcome.into()
}

fn list_ports() -> Result<()> {
    let ports = serialport::available_ports().context("Could not enumerate serial ports")?;
    for port in ports {
        println!("ser://{}", port.port_name);
    }
    Ok(())
}

fn dump(args: &DumpArgs) -> Result<DumpOutcome> {
    let mut options = RxOptions::default();
    if args.no_probe {
        options.autobaud = false;
        options.detect = false;
    }
    let mut rx = Receiver::connect(&args.port, options)?;
    if let Some(version) = rx.version() {
        info!("Connected to {} ({})", args.port, version);
    }

    let started = Instant::now();
    let mut received = 0u32;
    let mut last: Option<DateTime<Utc>> = None;
    println!("Dumping received data...");
    loop {
        if args.duration.is_some_and(|d| started.elapsed() >= d)
            || args.count.is_some_and(|c| received >= c)
        {
            break;
        }
        let Some(msg) = rx.get_next_message(Duration::from_millis(100))? else {
            continue;
        };
        received += 1;
        print_message(&msg, millis_since(last, msg.received()), args.hexdump);
        last = Some(msg.received());
    }

    let stats = *rx.stats();
    rx.close();
    for protocol in PROTOCOLS {
        let s = stats.get(protocol);
        println!(
            "stats {:<8} count {:6} ({:5.1}%)  size {:10} ({:5.1}%)",
            protocol.as_str(),
            s.count,
            percent(u64::from(s.count), u64::from(stats.total.count)),
            s.bytes,
            percent(s.bytes, stats.total.bytes)
        );
    }
    println!(
        "stats Total    count {:6} (100.0%)  size {:10} (100.0%)",
        stats.total.count, stats.total.bytes
    );

    Ok(if received == 0 {
        DumpOutcome::NoData
    } else {
        DumpOutcome::Success
    })
}

/// Milliseconds between the previous message and this one, 0 for the first
fn millis_since(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    last.map_or(0, |last| (now - last).num_milliseconds())
}

fn print_message(msg: &Message, dt: i64, hexdump: bool) {
    println!(
        "message {:4}, dt {:4}, size {:4}, {:<8} {:<20} {}",
        msg.seq(),
        dt,
        msg.size(),
        msg.protocol().as_str(),
        msg.name(),
        msg.info().as_deref().unwrap_or("n/a")
    );
    if hexdump {
        print!("{}", hex_dump(msg.data()));
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 1e2
    }
}

fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();
    for (ix, line) in data.chunks(16).enumerate() {
        let _ = write!(out, "    0x{:04x} {:05}  ", ix * 16, ix * 16);
        for i in 0..16 {
            match line.get(i) {
                Some(b) => {
                    let _ = write!(out, "{:02x} ", b);
                },
                None => out.push_str("   "),
            }
        }
        out.push_str(" |");
        out.extend(line.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        out.push_str("|\n");
    }
    out
}
