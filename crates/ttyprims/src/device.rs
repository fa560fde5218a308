//! Opening devices and parsing command-line values.

use std::fs::OpenOptions;
use std::os::fd::OwnedFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::time::Duration;

use tracing::debug;
use ttyprims_termios::NCCS;

use crate::exit::{io_error, CliError, CliResult};

/// Open a terminal device read/write without making it the controlling tty.
pub fn open_device(path: &Path, nonblock: bool) -> CliResult<OwnedFd> {
    let mut flags = libc::O_NOCTTY;
    if nonblock {
        flags |= libc::O_NONBLOCK;
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(flags)
        .open(path)
        .map_err(|err| io_error(&format!("open {}", path.display()), err))?;

    debug!(path = %path.display(), nonblock, "device opened");
    Ok(OwnedFd::from(file))
}

/// Parse `5s`, `150ms` or a bare number of seconds. Zero is allowed.
pub fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("timeout must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::usage(format!("invalid timeout value: {input}")))?;

    let timeout = if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    };
    if timeout.as_millis() > u128::from(u32::MAX) {
        return Err(CliError::usage(format!("timeout too large: {input}")));
    }
    Ok(timeout)
}

/// Parse a numeric argument written in hex (`0x..`), octal (`0o..`) or decimal.
pub fn parse_number(input: &str) -> Result<u32, String> {
    let input = input.trim();
    let parsed = if let Some(hex) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)
    } else if let Some(oct) = input.strip_prefix("0o") {
        u32::from_str_radix(oct, 8)
    } else {
        input.parse()
    };
    parsed.map_err(|err| format!("invalid number {input:?}: {err}"))
}

/// Parse `INDEX=VALUE` for one control-character slot.
///
/// `VALUE` is numeric or caret notation (`^C`, `^?`).
pub fn parse_control_char(input: &str) -> Result<(usize, u8), String> {
    let (index, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=VALUE, got {input:?}"))?;

    let index = parse_number(index)? as usize;
    if index >= NCCS {
        return Err(format!("control character index {index} out of range 0..{NCCS}"));
    }

    let value = match value.as_bytes() {
        [b'^', b'?'] => 0x7f,
        [b'^', c] if c.is_ascii_alphabetic() || (b'@'..=b'_').contains(c) => {
            c.to_ascii_uppercase() & 0x1f
        }
        _ => {
            let value = parse_number(value)?;
            u8::try_from(value).map_err(|_| format!("control character value {value} exceeds 255"))?
        }
    };
    Ok((index, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timeout_seconds_and_millis() {
        assert_eq!(parse_timeout("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_timeout("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_timeout("3").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_timeout("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn parse_timeout_rejects_invalid_values() {
        assert!(parse_timeout("").is_err());
        assert!(parse_timeout("soon").is_err());
        assert!(parse_timeout("5000000s").is_err());
    }

    #[test]
    fn numbers_accept_common_radixes() {
        assert_eq!(parse_number("0x8bd"), Ok(0x8bd));
        assert_eq!(parse_number("0o17"), Ok(0o17));
        assert_eq!(parse_number("42"), Ok(42));
        assert!(parse_number("0xzz").is_err());
    }

    #[test]
    fn control_chars_accept_caret_notation() {
        assert_eq!(parse_control_char("0=^C"), Ok((0, 0x03)));
        assert_eq!(parse_control_char("2=^?"), Ok((2, 0x7f)));
        assert_eq!(parse_control_char("6=1"), Ok((6, 1)));
        assert_eq!(parse_control_char("0x5=0x10"), Ok((5, 0x10)));
    }

    #[test]
    fn control_chars_reject_bad_slots() {
        assert!(parse_control_char("32=1").is_err());
        assert!(parse_control_char("1=256").is_err());
        assert!(parse_control_char("1").is_err());
    }
}
