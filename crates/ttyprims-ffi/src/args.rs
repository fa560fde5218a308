use std::os::fd::BorrowedFd;

use crate::error;

/// Borrow a caller-supplied descriptor for the duration of one call.
///
/// Records an error message and returns `None` for negative values.
///
/// # Safety
/// A non-negative `fd` must stay open until the returned borrow is dropped.
pub(crate) unsafe fn fd_arg<'a>(fd: i32) -> Option<BorrowedFd<'a>> {
    if fd < 0 {
        error::set_error_message(format!("handle {fd} is not a valid descriptor"));
        return None;
    }

    // SAFETY: `fd` is non-negative and the caller keeps it open for the call.
    Some(unsafe { BorrowedFd::borrow_raw(fd) })
}

/// Validate a `(buf, buf_len, offset, count)` window and return its range.
///
/// Records an error message and returns `None` when the window does not fit.
fn window(
    is_null: bool,
    buf_len: u32,
    offset: u32,
    count: u32,
) -> Option<std::ops::Range<usize>> {
    if count > i32::MAX as u32 {
        error::set_error_message(format!("count {count} exceeds {}", i32::MAX));
        return None;
    }
    let end = match offset.checked_add(count) {
        Some(end) if end <= buf_len => end,
        _ => {
            error::set_error_message(format!(
                "offset {offset} + count {count} exceeds buffer length {buf_len}"
            ));
            return None;
        }
    };
    if is_null && count > 0 {
        error::set_error_message("buf cannot be null when count > 0");
        return None;
    }

    Some(offset as usize..end as usize)
}

/// Convert a writable buffer window into a mutable slice.
///
/// # Safety
/// If `count > 0`, `buf` must be non-null and writable for `buf_len` bytes.
pub(crate) unsafe fn window_mut<'a>(
    buf: *mut u8,
    buf_len: u32,
    offset: u32,
    count: u32,
) -> Option<&'a mut [u8]> {
    let range = window(buf.is_null(), buf_len, offset, count)?;
    if range.is_empty() {
        return Some(&mut []);
    }

    // SAFETY: The window lies inside `buf_len` bytes the caller owns for the call.
    Some(unsafe { std::slice::from_raw_parts_mut(buf.add(range.start), range.len()) })
}

/// Convert a readable buffer window into a slice.
///
/// # Safety
/// If `count > 0`, `buf` must be non-null and readable for `buf_len` bytes.
pub(crate) unsafe fn window_ref<'a>(
    buf: *const u8,
    buf_len: u32,
    offset: u32,
    count: u32,
) -> Option<&'a [u8]> {
    let range = window(buf.is_null(), buf_len, offset, count)?;
    if range.is_empty() {
        return Some(&[]);
    }

    // SAFETY: The window lies inside `buf_len` bytes the caller owns for the call.
    Some(unsafe { std::slice::from_raw_parts(buf.add(range.start), range.len()) })
}

/// Convert an optional byte pointer + length into a slice.
///
/// # Safety
/// If `len > 0`, `data` must be non-null and readable for `len` bytes.
pub(crate) unsafe fn bytes_arg<'a>(data: *const u8, len: u32, name: &str) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if data.is_null() {
        error::set_error_message(format!("{name} cannot be null when len > 0"));
        return None;
    }

    // SAFETY: Pointer and length are validated above and owned by caller for the call duration.
    Some(unsafe { std::slice::from_raw_parts(data, len as usize) })
}
