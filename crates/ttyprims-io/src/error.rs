/// Errors that can occur in timed tty I/O operations.
///
/// These share one code namespace ([`IoError::code`]) that is distinct from
/// the terminal-configuration codes in `ttyprims-termios`.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The handle cannot be used for the requested operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The readiness wait itself failed (distinct from a timeout).
    #[error("readiness wait failed: {0}")]
    SelectFailure(std::io::Error),

    /// The wait expired with no data ready.
    #[error("read timed out after {0:?}")]
    ReadTimeout(std::time::Duration),

    /// The underlying read primitive reported an error.
    #[error("read failed: {0}")]
    ReadFailure(std::io::Error),

    /// The underlying write primitive reported an error.
    #[error("write failed: {0}")]
    WriteFailure(std::io::Error),
}

impl IoError {
    /// Code reported across the C boundary for an invalid handle or buffer.
    pub const INVALID_ARGUMENT: i32 = -1;
    /// Code for a failed readiness wait.
    pub const SELECT_FAILURE: i32 = -2;
    /// Code for an expired readiness wait.
    pub const READ_TIMEOUT: i32 = -3;
    /// Code for a failed read.
    pub const READ_FAILURE: i32 = -4;
    /// Raw result of a failed `write(2)`.
    pub const WRITE_FAILURE: i32 = -1;

    /// The signed code for this error in the I/O namespace.
    ///
    /// A write failure reports the primitive's own `-1`, so it shares its
    /// value with [`IoError::INVALID_ARGUMENT`]; callers tell them apart by
    /// which operation they issued.
    pub fn code(&self) -> i32 {
        match self {
            IoError::InvalidArgument(_) => Self::INVALID_ARGUMENT,
            IoError::SelectFailure(_) => Self::SELECT_FAILURE,
            IoError::ReadTimeout(_) => Self::READ_TIMEOUT,
            IoError::ReadFailure(_) => Self::READ_FAILURE,
            IoError::WriteFailure(_) => Self::WRITE_FAILURE,
        }
    }

    /// The OS error behind this failure, if any.
    pub fn os_error(&self) -> Option<&std::io::Error> {
        match self {
            IoError::SelectFailure(err) | IoError::ReadFailure(err) | IoError::WriteFailure(err) => {
                Some(err)
            }
            IoError::InvalidArgument(_) | IoError::ReadTimeout(_) => None,
        }
    }
}

impl From<IoError> for std::io::Error {
    fn from(err: IoError) -> Self {
        match err {
            IoError::InvalidArgument(msg) => std::io::Error::new(std::io::ErrorKind::InvalidInput, msg),
            IoError::ReadTimeout(timeout) => std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("read timed out after {timeout:?}"),
            ),
            IoError::SelectFailure(err) | IoError::ReadFailure(err) | IoError::WriteFailure(err) => err,
        }
    }
}

pub type Result<T> = std::result::Result<T, IoError>;
