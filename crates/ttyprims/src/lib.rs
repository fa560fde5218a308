//! Timed tty I/O and verified terminal configuration with permissive licensing.
//!
//! ttyprims wraps an already-open terminal handle: reads bounded by a
//! timeout, single-call writes, and attribute changes that are read back and
//! checked group by group before they are reported as applied.
//!
//! # Crate Structure
//!
//! - [`io`]: Timeout-bounded reads, writes and the [`io::TtyStream`] adapter
//! - [`termios`]: Attribute get/set/verify, line settings and modem lines

/// Re-export timed I/O types.
pub mod io {
    pub use ttyprims_io::*;
}

/// Re-export terminal configuration types.
pub mod termios {
    pub use ttyprims_termios::*;
}
