use std::time::Duration;

use crate::types::TtyIoResult;
use crate::{args, error};

/// Read up to `count` bytes into `buf[offset..offset + count]`.
///
/// With a non-zero `timeout_ms` the call first waits for the handle to become
/// readable; a zero timeout reads directly. Returns the number of bytes read
/// (0 at end of stream) or a negative [`TtyIoResult`] code.
///
/// # Safety
/// `fd` must be open for the duration of the call. If `count > 0`, `buf` must
/// be writable for `buf_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn tty_read(
    fd: i32,
    buf: *mut u8,
    buf_len: u32,
    offset: u32,
    count: u32,
    timeout_ms: u32,
) -> i32 {
    crate::ffi_boundary(TtyIoResult::ReadFailure as i32, || {
        error::clear_error_state();

        let fd = {
            // SAFETY: The caller keeps `fd` open for the call.
            match unsafe { args::fd_arg(fd) } {
                Some(fd) => fd,
                None => return TtyIoResult::InvalidArgument as i32,
            }
        };
        let window = {
            // SAFETY: We validate the window against `buf_len` in the helper.
            match unsafe { args::window_mut(buf, buf_len, offset, count) } {
                Some(window) => window,
                None => return TtyIoResult::InvalidArgument as i32,
            }
        };

        let timeout = Duration::from_millis(u64::from(timeout_ms));
        match ttyprims_io::read(fd, window, timeout) {
            Ok(n) => i32::try_from(n)
                .unwrap_or_else(|_| error::io_invalid_argument("read length exceeds i32")),
            Err(err) => error::map_io_error(&err),
        }
    })
}

/// Write `buf[offset..offset + count]` with a single `write(2)`.
///
/// Returns the number of bytes written, which may be short, or `-1`.
///
/// # Safety
/// `fd` must be open for the duration of the call. If `count > 0`, `buf` must
/// be readable for `buf_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn tty_write(
    fd: i32,
    buf: *const u8,
    buf_len: u32,
    offset: u32,
    count: u32,
) -> i32 {
    crate::ffi_boundary(-1, || {
        error::clear_error_state();

        let fd = {
            // SAFETY: The caller keeps `fd` open for the call.
            match unsafe { args::fd_arg(fd) } {
                Some(fd) => fd,
                None => return -1,
            }
        };
        let window = {
            // SAFETY: We validate the window against `buf_len` in the helper.
            match unsafe { args::window_ref(buf, buf_len, offset, count) } {
                Some(window) => window,
                None => return -1,
            }
        };

        match ttyprims_io::write(fd, window) {
            Ok(n) => i32::try_from(n).unwrap_or(-1),
            Err(err) => {
                error::map_io_error(&err);
                -1
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

    use super::*;

    fn pipe() -> (OwnedFd, OwnedFd) {
        let mut fds = [0; 2];
        // SAFETY: `fds` is a valid two-element out-array.
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        // SAFETY: pipe succeeded; both descriptors are owned here.
        unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) }
    }

    #[test]
    fn write_then_read_at_offsets() {
        let (rx, tx) = pipe();
        let payload = *b"..hello..";

        // SAFETY: `payload` is live for the call and 9 bytes long.
        let written = unsafe { tty_write(tx.as_raw_fd(), payload.as_ptr(), 9, 2, 5) };
        assert_eq!(written, 5);

        let mut buf = [0u8; 10];
        // SAFETY: `buf` is live for the call and 10 bytes long.
        let read = unsafe { tty_read(rx.as_raw_fd(), buf.as_mut_ptr(), 10, 3, 7, 200) };
        assert_eq!(read, 5);
        assert_eq!(&buf[3..8], b"hello");
        assert_eq!(&buf[..3], &[0, 0, 0]);
    }

    #[test]
    fn idle_read_times_out() {
        let (rx, _tx) = pipe();
        let mut buf = [0u8; 4];
        // SAFETY: `buf` is live for the call.
        let rc = unsafe { tty_read(rx.as_raw_fd(), buf.as_mut_ptr(), 4, 0, 4, 20) };
        assert_eq!(rc, TtyIoResult::ReadTimeout as i32);
    }

    #[test]
    fn bad_arguments_are_rejected_before_io() {
        let (rx, tx) = pipe();
        let mut buf = [0u8; 4];

        // SAFETY: windows that overrun `buf` are rejected before any access.
        let rc = unsafe { tty_read(rx.as_raw_fd(), buf.as_mut_ptr(), 4, 2, 3, 0) };
        assert_eq!(rc, TtyIoResult::InvalidArgument as i32);
        // SAFETY: negative descriptors are rejected before any access.
        let rc = unsafe { tty_read(-1, buf.as_mut_ptr(), 4, 0, 4, 0) };
        assert_eq!(rc, TtyIoResult::InvalidArgument as i32);
        // SAFETY: a null buffer with a non-empty window is rejected.
        let rc = unsafe { tty_write(tx.as_raw_fd(), std::ptr::null(), 4, 0, 4) };
        assert_eq!(rc, -1);
    }

    #[test]
    fn read_on_write_end_reports_read_failure() {
        let (_rx, tx) = pipe();
        let mut buf = [0u8; 4];
        // SAFETY: `buf` is live for the call.
        let rc = unsafe { tty_read(tx.as_raw_fd(), buf.as_mut_ptr(), 4, 0, 4, 0) };
        assert_eq!(rc, TtyIoResult::ReadFailure as i32);
    }
}
