//! `rm-serial`: inspect and build host/board serial packets.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rm_serial_packet::PacketKind;
use rm_serial_tool::{
    decode_hex, encode_json, split_capture, ChecksumKind, ToolConfig, ToolResult,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rm-serial", version, about = "Inspect and build host/board serial packets")]
struct Cli {
    /// YAML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured checksum routine.
    #[arg(long, global = true)]
    checksum: Option<ChecksumKind>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode one packet given as hex and print it as JSON.
    Decode {
        /// Packet bytes in hex; spaces are ignored.
        hex: String,
    },

    /// Read packet JSON, encode it, seal the checksum and print hex.
    Encode {
        /// Packet kind to build.
        kind: KindArg,
        /// JSON file, or `-` / nothing for stdin.
        input: Option<PathBuf>,
    },

    /// Split a raw binary capture into packets and print one JSON line each.
    Split {
        /// Capture file.
        capture: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Receive,
    Send,
    Twist,
}

impl From<KindArg> for PacketKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Receive => PacketKind::Receive,
            KindArg::Send => PacketKind::Send,
            KindArg::Twist => PacketKind::Twist,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> ToolResult<()> {
    let mut config = ToolConfig::load(cli.config.as_deref())?;
    if let Some(checksum) = cli.checksum {
        config.checksum = checksum;
    }

    match cli.command {
        Command::Decode { hex } => {
            let packet = decode_hex(&hex, &config)?;
            println!("{}", serde_json::to_string_pretty(&packet)?);
        }

        Command::Encode { kind, input } => {
            let json = read_input(input.as_deref())?;
            let bytes = encode_json(&json, kind.into(), &config)?;
            println!("{}", hex::encode(bytes));
        }

        Command::Split { capture } => {
            let data = std::fs::read(&capture)?;
            let report = split_capture(&data, &config)?;
            for packet in &report.packets {
                println!("{}", serde_json::to_string(packet)?);
            }
            tracing::info!(
                "{} packets, {} rejected frames, {} bytes discarded, {} bytes incomplete",
                report.packets.len(),
                report.rejected,
                report.discarded,
                report.incomplete
            );
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> ToolResult<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
