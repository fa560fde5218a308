use std::os::fd::BorrowedFd;

use bytes::BytesMut;
use ttyprims_termios::{
    decode_attributes, device_control, encode_attributes, get_attributes, set_attributes,
    TerminalAttributes, NCCS,
};

use crate::types::{TtyTermios, TtyTioResult, TTY_ATTRIBUTES_WIRE_SIZE};
use crate::{args, error};

fn apply(fd: BorrowedFd<'_>, desired: &TerminalAttributes) -> TtyTioResult {
    match set_attributes(fd, desired) {
        Ok(()) => TtyTioResult::Success,
        Err(err) => error::map_termios_error(&err),
    }
}

fn fetch(fd: BorrowedFd<'_>) -> Result<TerminalAttributes, TtyTioResult> {
    get_attributes(fd).map_err(|err| error::map_termios_error(&err))
}

/// Apply terminal attributes and verify them by reading them back.
///
/// `cc` must point to exactly [`crate::TTY_NCCS`] control characters.
///
/// # Safety
/// `fd` must be open for the duration of the call and `cc` must be readable
/// for `cc_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn tty_tc_set_attr(
    fd: i32,
    iflag: u32,
    oflag: u32,
    cflag: u32,
    lflag: u32,
    cc: *const u8,
    cc_len: u32,
) -> TtyTioResult {
    crate::ffi_boundary(TtyTioResult::InvalidArguments, || {
        error::clear_error_state();

        if cc_len as usize != NCCS {
            return error::tio_invalid_arguments(format!(
                "cc_len must be {NCCS}, got {cc_len}"
            ));
        }
        let fd = {
            // SAFETY: The caller keeps `fd` open for the call.
            match unsafe { args::fd_arg(fd) } {
                Some(fd) => fd,
                None => return TtyTioResult::InvalidArguments,
            }
        };
        let cc = {
            // SAFETY: We validate pointer/length pairing in helper.
            match unsafe { args::bytes_arg(cc, cc_len, "cc") } {
                Some(cc) => cc,
                None => return TtyTioResult::InvalidArguments,
            }
        };

        let mut control_chars = [0u8; NCCS];
        control_chars.copy_from_slice(cc);
        let desired = TerminalAttributes {
            input_flags: iflag,
            output_flags: oflag,
            control_flags: cflag,
            local_flags: lflag,
            control_chars,
        };
        apply(fd, &desired)
    })
}

/// Read the current terminal attributes into `out`.
///
/// # Safety
/// `fd` must be open for the duration of the call and `out` must be a valid
/// writable pointer.
#[no_mangle]
pub unsafe extern "C" fn tty_tc_get_attr(fd: i32, out: *mut TtyTermios) -> TtyTioResult {
    crate::ffi_boundary(TtyTioResult::InvalidArguments, || {
        error::clear_error_state();

        if out.is_null() {
            return error::tio_invalid_arguments("out cannot be null");
        }
        let fd = {
            // SAFETY: The caller keeps `fd` open for the call.
            match unsafe { args::fd_arg(fd) } {
                Some(fd) => fd,
                None => return TtyTioResult::InvalidArguments,
            }
        };

        match fetch(fd) {
            Ok(attrs) => {
                // SAFETY: `out` is non-null and the caller guarantees it is writable.
                unsafe { out.write(TtyTermios::from(attrs)) };
                TtyTioResult::Success
            }
            Err(code) => code,
        }
    })
}

/// Apply attributes given in the little-endian wire encoding.
///
/// # Safety
/// `fd` must be open for the duration of the call and `data` must be readable
/// for `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn tty_tc_set_attr_wire(fd: i32, data: *const u8, len: u32) -> TtyTioResult {
    crate::ffi_boundary(TtyTioResult::InvalidArguments, || {
        error::clear_error_state();

        let fd = {
            // SAFETY: The caller keeps `fd` open for the call.
            match unsafe { args::fd_arg(fd) } {
                Some(fd) => fd,
                None => return TtyTioResult::InvalidArguments,
            }
        };
        let data = {
            // SAFETY: We validate pointer/length pairing in helper.
            match unsafe { args::bytes_arg(data, len, "data") } {
                Some(data) => data,
                None => return TtyTioResult::InvalidArguments,
            }
        };

        match decode_attributes(data) {
            Ok(desired) => apply(fd, &desired),
            Err(err) => error::map_termios_error(&err),
        }
    })
}

/// Write the current attributes in wire encoding to `out`.
///
/// `out_len` must be at least [`crate::TTY_ATTRIBUTES_WIRE_SIZE`].
///
/// # Safety
/// `fd` must be open for the duration of the call and `out` must be writable
/// for `out_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn tty_tc_get_attr_wire(fd: i32, out: *mut u8, out_len: u32) -> TtyTioResult {
    crate::ffi_boundary(TtyTioResult::InvalidArguments, || {
        error::clear_error_state();

        if out.is_null() || out_len < TTY_ATTRIBUTES_WIRE_SIZE {
            return error::tio_invalid_arguments(format!(
                "out must hold at least {TTY_ATTRIBUTES_WIRE_SIZE} bytes"
            ));
        }
        let fd = {
            // SAFETY: The caller keeps `fd` open for the call.
            match unsafe { args::fd_arg(fd) } {
                Some(fd) => fd,
                None => return TtyTioResult::InvalidArguments,
            }
        };

        let attrs = match fetch(fd) {
            Ok(attrs) => attrs,
            Err(code) => return code,
        };
        let mut wire = BytesMut::new();
        encode_attributes(&attrs, &mut wire);

        // SAFETY: `out` is non-null and writable for at least the wire size.
        unsafe { std::ptr::copy_nonoverlapping(wire.as_ptr(), out, wire.len()) };
        TtyTioResult::Success
    })
}

/// Issue a device-control request and return the raw `ioctl(2)` result.
///
/// `flag` is passed by address as a C `int`, which suits the modem-line
/// requests (`TIOCMBIS`, `TIOCMBIC`). On failure the OS error text is
/// available from `tty_last_error`.
///
/// # Safety
/// `fd` must be open for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn tty_ioctl(fd: i32, command: u32, flag: i32) -> i32 {
    crate::ffi_boundary(-1, || {
        error::clear_error_state();

        let fd = {
            // SAFETY: The caller keeps `fd` open for the call.
            match unsafe { args::fd_arg(fd) } {
                Some(fd) => fd,
                None => return -1,
            }
        };

        let rc = device_control(fd, command, flag);
        if rc == -1 {
            let os = std::io::Error::last_os_error();
            error::set_error_message(format!("ioctl {command:#x} failed: {os}"));
        }
        rc
    })
}

#[cfg(test)]
mod tests {
    use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

    use super::*;
    use crate::types::TTY_NCCS;

    fn openpty() -> (OwnedFd, OwnedFd) {
        let mut master = -1;
        let mut slave = -1;
        // SAFETY: out-pointers are valid; name, termios and winsize are optional.
        let rc = unsafe {
            libc::openpty(
                &mut master,
                &mut slave,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(rc, 0, "openpty should succeed");
        // SAFETY: openpty succeeded, so both descriptors are open and owned here.
        unsafe { (OwnedFd::from_raw_fd(master), OwnedFd::from_raw_fd(slave)) }
    }

    fn current(fd: i32) -> TtyTermios {
        let mut out = TtyTermios::default();
        // SAFETY: `out` is a valid writable TtyTermios.
        assert_eq!(unsafe { tty_tc_get_attr(fd, &mut out) }, TtyTioResult::Success);
        out
    }

    #[test]
    fn set_then_get_round_trips_through_struct() {
        let (_master, slave) = openpty();
        let fd = slave.as_raw_fd();

        let mut attrs = TerminalAttributes::from(current(fd));
        attrs.make_raw();
        attrs.control_chars[libc::VMIN] = 2;
        attrs.control_chars[libc::VTIME] = 5;
        let raw = TtyTermios::from(attrs);

        // SAFETY: `raw.cc` is live and TTY_NCCS bytes long.
        let rc = unsafe {
            tty_tc_set_attr(
                fd,
                raw.iflag,
                raw.oflag,
                raw.cflag,
                raw.lflag,
                raw.cc.as_ptr(),
                TTY_NCCS,
            )
        };
        assert_eq!(rc, TtyTioResult::Success);
        assert_eq!(current(fd), raw);
    }

    #[test]
    fn wire_form_round_trips() {
        let (_master, slave) = openpty();
        let fd = slave.as_raw_fd();

        let mut wire = [0u8; TTY_ATTRIBUTES_WIRE_SIZE as usize];
        // SAFETY: `wire` is writable for its full length.
        let rc = unsafe { tty_tc_get_attr_wire(fd, wire.as_mut_ptr(), wire.len() as u32) };
        assert_eq!(rc, TtyTioResult::Success);

        let mut attrs = decode_attributes(&wire).unwrap();
        attrs.make_raw();
        let mut encoded = BytesMut::new();
        encode_attributes(&attrs, &mut encoded);

        // SAFETY: `encoded` is readable for its full length.
        let rc = unsafe { tty_tc_set_attr_wire(fd, encoded.as_ptr(), encoded.len() as u32) };
        assert_eq!(rc, TtyTioResult::Success);
        assert_eq!(TerminalAttributes::from(current(fd)), attrs);
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        let (_master, slave) = openpty();
        let fd = slave.as_raw_fd();
        let cc = [0u8; NCCS];

        // SAFETY: length mismatch is rejected before `cc` is read.
        let rc = unsafe { tty_tc_set_attr(fd, 0, 0, 0, 0, cc.as_ptr(), 20) };
        assert_eq!(rc, TtyTioResult::InvalidArguments);

        let short = [0u8; 8];
        // SAFETY: `short` is readable for 8 bytes.
        let rc = unsafe { tty_tc_set_attr_wire(fd, short.as_ptr(), 8) };
        assert_eq!(rc, TtyTioResult::InvalidArguments);

        let mut small = [0u8; 16];
        // SAFETY: undersized output is rejected before any write.
        let rc = unsafe { tty_tc_get_attr_wire(fd, small.as_mut_ptr(), 16) };
        assert_eq!(rc, TtyTioResult::InvalidArguments);

        // SAFETY: null output is rejected.
        let rc = unsafe { tty_tc_get_attr(fd, std::ptr::null_mut()) };
        assert_eq!(rc, TtyTioResult::InvalidArguments);
    }

    #[test]
    fn non_terminal_handle_fails_with_invalid_arguments() {
        let mut fds = [0; 2];
        // SAFETY: `fds` is a valid two-element out-array.
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        // SAFETY: pipe succeeded; both descriptors are owned here.
        let (rx, _tx) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };

        let mut out = TtyTermios::default();
        // SAFETY: `out` is a valid writable TtyTermios.
        let rc = unsafe { tty_tc_get_attr(rx.as_raw_fd(), &mut out) };
        assert_eq!(rc, TtyTioResult::InvalidArguments);
    }

    #[test]
    fn ioctl_passes_through_raw_result() {
        let (_master, slave) = openpty();
        let fd = slave.as_raw_fd();

        // SAFETY: the descriptor is open for the call.
        assert_eq!(unsafe { tty_ioctl(fd, libc::FIONREAD as u32, 0) }, 0);
        // SAFETY: as above; unknown requests fail without side effects.
        assert_eq!(unsafe { tty_ioctl(fd, 0xdead_beef, 0) }, -1);
        // SAFETY: negative descriptors are rejected before the syscall.
        assert_eq!(unsafe { tty_ioctl(-1, libc::FIONREAD as u32, 0) }, -1);
    }
}
