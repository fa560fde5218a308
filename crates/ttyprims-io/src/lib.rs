//! Timeout-bounded tty I/O.
//!
//! Single-call read and write primitives over a caller-owned, already-open
//! character device:
//! - [`read`] waits at most a given timeout for data, then reads once
//! - [`write`] writes once, returning short writes unchanged
//!
//! This is the lowest I/O layer of ttyprims. Handles are borrowed for each
//! call; opening and closing devices is the caller's business.

pub mod error;

#[cfg(unix)]
pub mod stream;
#[cfg(unix)]
pub mod timed;

pub use error::{IoError, Result};

#[cfg(unix)]
pub use stream::{StreamConfig, TtyStream, MIN_READ_TIMEOUT};
#[cfg(unix)]
pub use timed::{read, write, MAX_WAITABLE_FD};
