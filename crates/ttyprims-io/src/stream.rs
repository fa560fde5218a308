use std::io::{Read, Write};
use std::os::fd::{AsFd, BorrowedFd};
use std::time::Duration;

use crate::timed;

/// Smallest read timeout a stream will wait for.
///
/// A configured zero would otherwise mean "block per open mode", which is the
/// job of `None`.
pub const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// Configuration for a [`TtyStream`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamConfig {
    /// Bound on how long a read waits for data. `None` leaves blocking to the
    /// handle's open mode.
    pub read_timeout: Option<Duration>,
}

/// A borrowed tty handle exposed as `Read + Write`.
///
/// Every `read` is one timed read and every `write` is one unconditional
/// write; there is no buffering. The handle stays owned by the caller.
#[derive(Debug)]
pub struct TtyStream<'fd> {
    fd: BorrowedFd<'fd>,
    config: StreamConfig,
}

impl<'fd> TtyStream<'fd> {
    /// Wrap a borrowed handle with default configuration.
    pub fn new(fd: BorrowedFd<'fd>) -> Self {
        Self::with_config(fd, StreamConfig::default())
    }

    /// Wrap a borrowed handle with explicit configuration.
    pub fn with_config(fd: BorrowedFd<'fd>, config: StreamConfig) -> Self {
        let mut stream = Self {
            fd,
            config: StreamConfig::default(),
        };
        stream.set_read_timeout(config.read_timeout);
        stream
    }

    /// Set the read timeout. Zero is raised to [`MIN_READ_TIMEOUT`].
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) {
        self.config.read_timeout = timeout.map(|t| t.max(MIN_READ_TIMEOUT));
    }

    /// Current read timeout.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.config.read_timeout
    }

    /// Current stream configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }
}

impl Read for TtyStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let timeout = self.config.read_timeout.unwrap_or(Duration::ZERO);
        timed::read(self.fd, buf, timeout).map_err(Into::into)
    }
}

impl Write for TtyStream<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        timed::write(self.fd, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl AsFd for TtyStream<'_> {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd
    }
}
