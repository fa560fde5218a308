use std::fmt;

/// Step of an attribute update that failed at the OS level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the current attributes.
    Get,
    /// Discarding queued input.
    Flush,
    /// Applying the new attributes.
    Set,
    /// Reading the attributes back for verification.
    Readback,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Get => "tcgetattr",
            Stage::Flush => "tcflush",
            Stage::Set => "tcsetattr",
            Stage::Readback => "tcgetattr (readback)",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while configuring terminal attributes.
///
/// The mismatch variants are reported in a fixed order: input, output,
/// control, local, control characters. Only the first mismatching group is
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum TermiosError {
    /// An attribute call failed at the OS level.
    #[error("{stage} failed: {source}")]
    InvalidArguments {
        stage: Stage,
        source: std::io::Error,
    },

    /// The input flags did not take effect.
    #[error("input flags rejected (requested {requested:#x}, got {actual:#x})")]
    InvalidIFlag { requested: u32, actual: u32 },

    /// The output flags did not take effect.
    #[error("output flags rejected (requested {requested:#x}, got {actual:#x})")]
    InvalidOFlag { requested: u32, actual: u32 },

    /// The control flags did not take effect.
    #[error("control flags rejected (requested {requested:#x}, got {actual:#x})")]
    InvalidCFlag { requested: u32, actual: u32 },

    /// The local flags did not take effect.
    #[error("local flags rejected (requested {requested:#x}, got {actual:#x})")]
    InvalidLFlag { requested: u32, actual: u32 },

    /// The control-character table did not take effect.
    #[error("control character {index} rejected (requested {requested}, got {actual})")]
    InvalidCCs {
        index: usize,
        requested: u8,
        actual: u8,
    },

    /// An encoded attribute set was shorter than the wire size.
    #[error("attribute encoding truncated ({len} bytes, need {expected})")]
    Truncated { len: usize, expected: usize },
}

impl TermiosError {
    /// Code for a successful, verified update.
    pub const SUCCESS: i32 = 0;
    /// Code for an OS-level attribute failure or malformed input.
    pub const INVALID_ARGUMENTS: i32 = -1;
    /// Code for rejected input flags.
    pub const INVALID_IFLAG: i32 = -2;
    /// Code for rejected output flags.
    pub const INVALID_OFLAG: i32 = -3;
    /// Code for rejected control flags.
    pub const INVALID_CFLAG: i32 = -4;
    /// Code for rejected local flags.
    pub const INVALID_LFLAG: i32 = -5;
    /// Code for a rejected control-character table.
    pub const INVALID_CCS: i32 = -6;

    /// The signed code for this error in the terminal-config namespace.
    pub fn code(&self) -> i32 {
        match self {
            TermiosError::InvalidArguments { .. } | TermiosError::Truncated { .. } => {
                Self::INVALID_ARGUMENTS
            }
            TermiosError::InvalidIFlag { .. } => Self::INVALID_IFLAG,
            TermiosError::InvalidOFlag { .. } => Self::INVALID_OFLAG,
            TermiosError::InvalidCFlag { .. } => Self::INVALID_CFLAG,
            TermiosError::InvalidLFlag { .. } => Self::INVALID_LFLAG,
            TermiosError::InvalidCCs { .. } => Self::INVALID_CCS,
        }
    }

    /// True when the OS accepted the call but a group read back differently.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            TermiosError::InvalidIFlag { .. }
                | TermiosError::InvalidOFlag { .. }
                | TermiosError::InvalidCFlag { .. }
                | TermiosError::InvalidLFlag { .. }
                | TermiosError::InvalidCCs { .. }
        )
    }

    pub(crate) fn os(stage: Stage) -> Self {
        TermiosError::InvalidArguments {
            stage,
            source: std::io::Error::last_os_error(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TermiosError>;
