//! ttyprims-ffi: C-ABI exports for timed tty I/O and terminal configuration.
//!
//! Descriptors are borrowed for the duration of each call; nothing here opens
//! or closes a device. Every entry point records a human-readable message
//! retrievable with [`tty_last_error`] when it fails.

mod error;
mod types;

#[cfg(unix)]
mod args;
#[cfg(unix)]
mod io;
#[cfg(unix)]
mod termios;

use std::panic::AssertUnwindSafe;

#[cfg(unix)]
pub use io::{tty_read, tty_write};
#[cfg(unix)]
pub use termios::{
    tty_ioctl, tty_tc_get_attr, tty_tc_get_attr_wire, tty_tc_set_attr, tty_tc_set_attr_wire,
};
pub use types::{
    TtyIoResult, TtyTermios, TtyTioResult, TTY_ATTRIBUTES_WIRE_SIZE, TTY_IO_ERR_INVALID_ARGUMENT,
    TTY_IO_ERR_READ_FAILURE, TTY_IO_ERR_READ_TIMEOUT, TTY_IO_ERR_SELECT_FAILURE, TTY_NCCS,
    TTY_TIO_ERR_INVALID_ARGUMENTS, TTY_TIO_ERR_INVALID_CCS, TTY_TIO_ERR_INVALID_CFLAG,
    TTY_TIO_ERR_INVALID_IFLAG, TTY_TIO_ERR_INVALID_LFLAG, TTY_TIO_ERR_INVALID_OFLAG,
    TTY_TIO_SUCCESS,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

/// Clear this thread's last-error message.
#[no_mangle]
pub extern "C" fn tty_clear_error() {
    ffi_boundary((), error::clear_error_state);
}

/// Message describing the most recent failure on this thread.
///
/// The pointer stays valid until the next `tty_*` call on the same thread.
/// Returns an empty string when the last call succeeded.
#[no_mangle]
pub extern "C" fn tty_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}
