use std::fmt;
use std::io;

use ttyprims_io::IoError;
use ttyprims_termios::TermiosError;

// Exit codes follow sysexits/coreutils conventions.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DEVICE_ERROR: i32 = 3;
pub const HEALTH_CHECK_FAILED: i32 = 30;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => FAILURE,
        io::ErrorKind::InvalidInput => USAGE,
        _ => DEVICE_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn tty_io_error(context: &str, err: IoError) -> CliError {
    match err {
        IoError::ReadTimeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        IoError::InvalidArgument(_) => CliError::new(USAGE, format!("{context}: {err}")),
        IoError::ReadFailure(source)
        | IoError::WriteFailure(source)
        | IoError::SelectFailure(source) => io_error(context, source),
    }
}

pub fn termios_error(context: &str, err: TermiosError) -> CliError {
    match err {
        TermiosError::InvalidArguments { stage, source } => {
            io_error(&format!("{context}: {stage}"), source)
        }
        TermiosError::Truncated { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        TermiosError::InvalidIFlag { .. }
        | TermiosError::InvalidOFlag { .. }
        | TermiosError::InvalidCFlag { .. }
        | TermiosError::InvalidLFlag { .. }
        | TermiosError::InvalidCCs { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}
