use ttyprims_termios::{TermiosError, TerminalAttributes, ATTRIBUTES_WIRE_SIZE, NCCS};

/// Negative result codes of `tty_read`.
///
/// A non-negative return from `tty_read` is a byte count, so there is no
/// success variant. `tty_write` reports every failure as `-1`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtyIoResult {
    InvalidArgument = -1,
    SelectFailure = -2,
    ReadTimeout = -3,
    ReadFailure = -4,
}

/// Status codes of the terminal-configuration entry points.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtyTioResult {
    Success = 0,
    InvalidArguments = -1,
    InvalidIFlag = -2,
    InvalidOFlag = -3,
    InvalidCFlag = -4,
    InvalidLFlag = -5,
    InvalidCCs = -6,
}

impl From<&TermiosError> for TtyTioResult {
    fn from(err: &TermiosError) -> Self {
        match err {
            TermiosError::InvalidArguments { .. } | TermiosError::Truncated { .. } => {
                TtyTioResult::InvalidArguments
            }
            TermiosError::InvalidIFlag { .. } => TtyTioResult::InvalidIFlag,
            TermiosError::InvalidOFlag { .. } => TtyTioResult::InvalidOFlag,
            TermiosError::InvalidCFlag { .. } => TtyTioResult::InvalidCFlag,
            TermiosError::InvalidLFlag { .. } => TtyTioResult::InvalidLFlag,
            TermiosError::InvalidCCs { .. } => TtyTioResult::InvalidCCs,
        }
    }
}

#[allow(dead_code)]
pub const TTY_IO_ERR_INVALID_ARGUMENT: i32 = TtyIoResult::InvalidArgument as i32;
#[allow(dead_code)]
pub const TTY_IO_ERR_SELECT_FAILURE: i32 = TtyIoResult::SelectFailure as i32;
#[allow(dead_code)]
pub const TTY_IO_ERR_READ_TIMEOUT: i32 = TtyIoResult::ReadTimeout as i32;
#[allow(dead_code)]
pub const TTY_IO_ERR_READ_FAILURE: i32 = TtyIoResult::ReadFailure as i32;

#[allow(dead_code)]
pub const TTY_TIO_SUCCESS: TtyTioResult = TtyTioResult::Success;
#[allow(dead_code)]
pub const TTY_TIO_ERR_INVALID_ARGUMENTS: TtyTioResult = TtyTioResult::InvalidArguments;
#[allow(dead_code)]
pub const TTY_TIO_ERR_INVALID_IFLAG: TtyTioResult = TtyTioResult::InvalidIFlag;
#[allow(dead_code)]
pub const TTY_TIO_ERR_INVALID_OFLAG: TtyTioResult = TtyTioResult::InvalidOFlag;
#[allow(dead_code)]
pub const TTY_TIO_ERR_INVALID_CFLAG: TtyTioResult = TtyTioResult::InvalidCFlag;
#[allow(dead_code)]
pub const TTY_TIO_ERR_INVALID_LFLAG: TtyTioResult = TtyTioResult::InvalidLFlag;
#[allow(dead_code)]
pub const TTY_TIO_ERR_INVALID_CCS: TtyTioResult = TtyTioResult::InvalidCCs;

/// Length of the control-character table at the boundary.
pub const TTY_NCCS: u32 = NCCS as u32;
/// Size of the little-endian attribute encoding.
pub const TTY_ATTRIBUTES_WIRE_SIZE: u32 = ATTRIBUTES_WIRE_SIZE as u32;

/// Terminal attributes as laid out for C callers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtyTermios {
    pub iflag: u32,
    pub oflag: u32,
    pub cflag: u32,
    pub lflag: u32,
    pub cc: [u8; NCCS],
}

impl Default for TtyTermios {
    fn default() -> Self {
        TerminalAttributes::default().into()
    }
}

impl From<TerminalAttributes> for TtyTermios {
    fn from(attrs: TerminalAttributes) -> Self {
        Self {
            iflag: attrs.input_flags,
            oflag: attrs.output_flags,
            cflag: attrs.control_flags,
            lflag: attrs.local_flags,
            cc: attrs.control_chars,
        }
    }
}

impl From<TtyTermios> for TerminalAttributes {
    fn from(raw: TtyTermios) -> Self {
        Self {
            input_flags: raw.iflag,
            output_flags: raw.oflag,
            control_flags: raw.cflag,
            local_flags: raw.lflag,
            control_chars: raw.cc,
        }
    }
}
