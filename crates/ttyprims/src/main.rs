#[cfg(not(unix))]
compile_error!("the ttyprims CLI requires a Unix target");

mod cmd;
mod device;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "ttyprims", version, about = "Timed tty I/O and terminal configuration")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        env = "TTYPRIMS_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::debug!(code = err.code, "command failed");
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_subcommand() {
        let cli = Cli::try_parse_from([
            "ttyprims",
            "set",
            "/dev/ttyS0",
            "--raw",
            "--cc",
            "6=1",
            "--cc",
            "5=0",
            "--cflag",
            "0x8bd",
        ])
        .expect("set args should parse");

        let Command::Set(args) = cli.command else {
            panic!("expected set command");
        };
        assert!(args.raw);
        assert_eq!(args.control_chars, vec![(6, 1), (5, 0)]);
        assert_eq!(args.cflag, Some(0x8bd));
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "ttyprims",
            "write",
            "/dev/ttyS0",
            "--file",
            "payload.bin",
            "--data",
            "hello",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_read_with_global_format() {
        let cli = Cli::try_parse_from([
            "ttyprims",
            "read",
            "/dev/ttyS0",
            "--timeout",
            "250ms",
            "--format",
            "raw",
            "--nonblock",
        ])
        .expect("read args should parse");

        assert_eq!(cli.format, Some(OutputFormat::Raw));
        let Command::Read(args) = cli.command else {
            panic!("expected read command");
        };
        assert!(args.device.nonblock);
        assert_eq!(args.count, 4096);
    }

    #[test]
    fn modem_switches_parse() {
        let cli = Cli::try_parse_from(["ttyprims", "modem", "/dev/ttyS0", "--dtr", "off"])
            .expect("modem args should parse");
        let Command::Modem(args) = cli.command else {
            panic!("expected modem command");
        };
        assert_eq!(args.dtr, Some(cmd::Switch::Off));
        assert!(args.rts.is_none());
    }
}
