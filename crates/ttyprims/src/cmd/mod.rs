use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::device::{parse_control_char, parse_number};
use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod attrs;
pub mod doctor;
pub mod modem;
pub mod read;
pub mod set;
pub mod version;
pub mod write;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the terminal attributes of a device.
    Attrs(AttrsArgs),
    /// Apply terminal attributes and verify them.
    Set(SetArgs),
    /// Read from a device with a timeout.
    Read(ReadArgs),
    /// Write bytes to a device.
    Write(WriteArgs),
    /// Show or change modem control lines.
    Modem(ModemArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Attrs(args) => attrs::run(args, format),
        Command::Set(args) => set::run(args, format),
        Command::Read(args) => read::run(args, format),
        Command::Write(args) => write::run(args, format),
        Command::Modem(args) => modem::run(args, format),
        Command::Doctor(args) => doctor::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DeviceArgs {
    /// Terminal device path (e.g. /dev/ttyUSB0).
    pub device: PathBuf,
    /// Open the device with O_NONBLOCK.
    #[arg(long)]
    pub nonblock: bool,
}

#[derive(Args, Debug)]
pub struct AttrsArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// Also print the 48-byte wire encoding as hex.
    #[arg(long)]
    pub wire: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ParityArg {
    None,
    Odd,
    Even,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FlowArg {
    None,
    Software,
    Hardware,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// Switch to raw binary mode (VMIN=1, VTIME=0) first.
    #[arg(long)]
    pub raw: bool,
    /// Data bits per character.
    #[arg(long, value_parser = clap::value_parser!(u8).range(5..=8))]
    pub data_bits: Option<u8>,
    /// Parity mode.
    #[arg(long, value_enum)]
    pub parity: Option<ParityArg>,
    /// Stop bits.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub stop_bits: Option<u8>,
    /// Flow control.
    #[arg(long, value_enum)]
    pub flow: Option<FlowArg>,
    /// Replace the input flags (hex, octal or decimal).
    #[arg(long, value_parser = parse_number)]
    pub iflag: Option<u32>,
    /// Replace the output flags.
    #[arg(long, value_parser = parse_number)]
    pub oflag: Option<u32>,
    /// Replace the control flags.
    #[arg(long, value_parser = parse_number)]
    pub cflag: Option<u32>,
    /// Replace the local flags.
    #[arg(long, value_parser = parse_number)]
    pub lflag: Option<u32>,
    /// Set one control character, e.g. `6=1` or `0=^C`. Repeatable.
    #[arg(long = "cc", value_name = "INDEX=VALUE", value_parser = parse_control_char)]
    pub control_chars: Vec<(usize, u8)>,
}

impl SetArgs {
    pub fn has_line_settings(&self) -> bool {
        self.data_bits.is_some()
            || self.parity.is_some()
            || self.stop_bits.is_some()
            || self.flow.is_some()
    }
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// Wait at most this long for data (e.g. 5s, 500ms). 0 reads immediately.
    #[arg(long, default_value = "1s")]
    pub timeout: String,
    /// Maximum bytes per read.
    #[arg(long, default_value_t = 4096, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,
    /// Keep reading until interrupted or end of stream.
    #[arg(long)]
    pub follow: bool,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// String payload.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        self == Switch::On
    }
}

#[derive(Args, Debug)]
pub struct ModemArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// Assert or clear Data Terminal Ready.
    #[arg(long, value_enum)]
    pub dtr: Option<Switch>,
    /// Assert or clear Request To Send.
    #[arg(long, value_enum)]
    pub rts: Option<Switch>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}
