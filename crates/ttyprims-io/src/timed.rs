use std::mem::MaybeUninit;
use std::os::fd::{AsFd, AsRawFd, RawFd};
use std::ptr;
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::{IoError, Result};

/// Exclusive upper bound on descriptor values a readiness wait can represent.
pub const MAX_WAITABLE_FD: RawFd = libc::FD_SETSIZE as RawFd;

/// Read up to `buf.len()` bytes from `fd`, waiting at most `timeout` for data.
///
/// A zero `timeout` issues the read directly, so blocking follows the open
/// mode of the handle. A non-zero `timeout` first waits for readability on this
/// one descriptor and returns [`IoError::ReadTimeout`] without consuming
/// anything if nothing arrives in time.
///
/// `Ok(0)` is passed through unchanged (end of stream, or no data on a
/// handle configured with `VMIN=0`).
///
/// ## Errors
///
/// * `InvalidArgument` if `timeout` is non-zero and `fd` is at or above
///   [`MAX_WAITABLE_FD`]. No read is attempted.
/// * `SelectFailure` if the wait fails, including interruption by a signal.
/// * `ReadTimeout` if the wait expires.
/// * `ReadFailure` if `read(2)` fails.
pub fn read(fd: impl AsFd, buf: &mut [u8], timeout: Duration) -> Result<usize> {
    let fd = fd.as_fd().as_raw_fd();
    trace!(fd, len = buf.len(), ?timeout, "tty read");

    if !timeout.is_zero() {
        wait_readable(fd, timeout)?;
    }

    read_direct(fd, buf)
}

/// Write `buf` to `fd` with a single `write(2)` call.
///
/// Short writes are returned as-is; nothing is retried.
pub fn write(fd: impl AsFd, buf: &[u8]) -> Result<usize> {
    let fd = fd.as_fd().as_raw_fd();
    trace!(fd, len = buf.len(), "tty write");

    // SAFETY: `buf` is valid for reads of `buf.len()` bytes and `fd` is borrowed
    // from an open descriptor for the duration of the call.
    let written = unsafe { libc::write(fd, buf.as_ptr().cast::<libc::c_void>(), buf.len()) };
    if written < 0 {
        return Err(IoError::WriteFailure(std::io::Error::last_os_error()));
    }
    Ok(written as usize)
}

fn read_direct(fd: RawFd, buf: &mut [u8]) -> Result<usize> {
    // SAFETY: `buf` is valid for writes of `buf.len()` bytes and `fd` is borrowed
    // from an open descriptor for the duration of the call.
    let read = unsafe { libc::read(fd, buf.as_mut_ptr().cast::<libc::c_void>(), buf.len()) };
    if read < 0 {
        return Err(IoError::ReadFailure(std::io::Error::last_os_error()));
    }
    Ok(read as usize)
}

fn wait_readable(fd: RawFd, timeout: Duration) -> Result<()> {
    if !(0..MAX_WAITABLE_FD).contains(&fd) {
        return Err(IoError::InvalidArgument(format!(
            "descriptor {fd} outside readiness wait range (max {})",
            MAX_WAITABLE_FD - 1
        )));
    }

    let mut readfds = MaybeUninit::<libc::fd_set>::uninit();
    // SAFETY: FD_ZERO fully initializes the set, and `fd` is within
    // [0, FD_SETSIZE) so FD_SET stays inside it.
    let mut readfds = unsafe {
        libc::FD_ZERO(readfds.as_mut_ptr());
        let mut set = readfds.assume_init();
        libc::FD_SET(fd, &mut set);
        set
    };
    let mut tv = to_timeval(timeout);

    // SAFETY: all pointers refer to live stack values; unused sets are null.
    let ready = unsafe {
        libc::select(
            fd + 1,
            &mut readfds,
            ptr::null_mut(),
            ptr::null_mut(),
            &mut tv,
        )
    };

    if ready < 0 {
        let err = std::io::Error::last_os_error();
        debug!(fd, error = %err, "readiness wait failed");
        return Err(IoError::SelectFailure(err));
    }
    if ready == 0 {
        debug!(fd, ?timeout, "read timed out");
        return Err(IoError::ReadTimeout(timeout));
    }
    Ok(())
}

/// Split `timeout` into whole seconds and remaining microseconds.
///
/// Sub-microsecond timeouts round up to one microsecond so a non-zero timeout
/// never degrades into an immediate poll.
fn to_timeval(timeout: Duration) -> libc::timeval {
    let mut tv = libc::timeval {
        tv_sec: libc::time_t::try_from(timeout.as_secs()).unwrap_or(libc::time_t::MAX),
        tv_usec: timeout.subsec_micros() as libc::suseconds_t,
    };
    if tv.tv_sec == 0 && tv.tv_usec == 0 && !timeout.is_zero() {
        tv.tv_usec = 1;
    }
    tv
}

#[cfg(test)]
mod tests {
    use std::os::fd::{FromRawFd, OwnedFd};
    use std::time::Instant;

    use super::*;

    fn pipe() -> (OwnedFd, OwnedFd) {
        let mut fds = [0; 2];
        // SAFETY: `fds` is a valid two-element array for pipe(2) to fill.
        let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
        assert_eq!(rc, 0, "pipe should be creatable");
        // SAFETY: pipe(2) succeeded, so both descriptors are open and owned here.
        unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) }
    }

    #[test]
    fn zero_timeout_reads_available_bytes() {
        let (rx, tx) = pipe();
        assert_eq!(write(&tx, b"ping").unwrap(), 4);

        let mut buf = [0u8; 8];
        let n = read(&rx, &mut buf, Duration::ZERO).unwrap();
        assert_eq!(&buf[..n], b"ping");
    }

    #[test]
    fn bounded_read_times_out_without_data() {
        let (rx, _tx) = pipe();
        let mut buf = [0u8; 8];

        let start = Instant::now();
        let err = read(&rx, &mut buf, Duration::from_millis(80)).unwrap_err();
        let elapsed = start.elapsed();

        assert!(matches!(err, IoError::ReadTimeout(t) if t == Duration::from_millis(80)));
        assert!(elapsed >= Duration::from_millis(70), "returned early: {elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "overran timeout: {elapsed:?}");
    }

    #[test]
    fn bounded_read_returns_ready_data() {
        let (rx, tx) = pipe();
        write(&tx, b"abc").unwrap();

        let mut buf = [0u8; 3];
        let n = read(&rx, &mut buf, Duration::from_millis(500)).unwrap();
        assert_eq!(&buf[..n], b"abc");
    }

    #[test]
    fn closed_writer_reads_as_end_of_stream() {
        let (rx, tx) = pipe();
        drop(tx);

        let mut buf = [0u8; 4];
        assert_eq!(read(&rx, &mut buf, Duration::from_millis(100)).unwrap(), 0);
        assert_eq!(read(&rx, &mut buf, Duration::ZERO).unwrap(), 0);
    }

    #[test]
    fn read_on_write_end_is_read_failure() {
        let (_rx, tx) = pipe();
        let mut buf = [0u8; 4];
        let err = read(&tx, &mut buf, Duration::ZERO).unwrap_err();
        assert!(matches!(err, IoError::ReadFailure(_)));
        assert_eq!(err.code(), IoError::READ_FAILURE);
    }

    #[test]
    fn write_to_closed_pipe_is_write_failure() {
        let (rx, tx) = pipe();
        drop(rx);
        let err = write(&tx, b"lost").unwrap_err();
        assert!(matches!(err, IoError::WriteFailure(ref e) if e.raw_os_error() == Some(libc::EPIPE)));
    }

    #[test]
    fn timeval_splits_seconds_and_micros() {
        let tv = to_timeval(Duration::from_millis(1_500));
        assert_eq!(tv.tv_sec, 1);
        assert_eq!(tv.tv_usec, 500_000);

        let tv = to_timeval(Duration::from_nanos(10));
        assert_eq!((tv.tv_sec, tv.tv_usec), (0, 1));
    }
}
