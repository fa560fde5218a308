use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use ttyprims_io::IoError;
use ttyprims_termios::TermiosError;

use crate::types::{TtyIoResult, TtyTioResult};

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::default();
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let sanitized = message.into().replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(sanitized).unwrap_or_default();
    });
}

/// Record an argument rejected before reaching the device.
pub(crate) fn io_invalid_argument(message: impl Into<String>) -> i32 {
    set_error_message(message);
    TtyIoResult::InvalidArgument as i32
}

pub(crate) fn tio_invalid_arguments(message: impl Into<String>) -> TtyTioResult {
    set_error_message(message);
    TtyTioResult::InvalidArguments
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

pub(crate) fn map_io_error(err: &IoError) -> i32 {
    set_error_message(err.to_string());
    err.code()
}

pub(crate) fn map_termios_error(err: &TermiosError) -> TtyTioResult {
    set_error_message(err.to_string());
    TtyTioResult::from(err)
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}
