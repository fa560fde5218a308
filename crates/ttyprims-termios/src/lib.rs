//! Verified terminal-attribute configuration for tty devices.
//!
//! [`set_attributes`] applies the four termios flag groups and the
//! control-character table to an open handle, then reads them back and reports
//! the first group that did not take effect. [`device_control`] passes
//! device-specific commands straight through to `ioctl(2)`.
//!
//! # Modules
//!
//! - [`attrs`]: The [`TerminalAttributes`] value type
//! - [`config`]: Get, set and verify attributes
//! - [`control`]: Device-control passthrough and modem lines
//! - [`line`]: Framing and flow control as attributes
//! - [`codec`]: Fixed-width little-endian encoding of attributes

pub mod attrs;
pub mod codec;
pub mod error;

#[cfg(unix)]
pub mod config;
#[cfg(unix)]
pub mod control;
#[cfg(unix)]
pub mod line;

pub use attrs::{TerminalAttributes, NCCS};
pub use codec::{decode_attributes, encode_attributes, ATTRIBUTES_WIRE_SIZE};
pub use error::{Result, Stage, TermiosError};

#[cfg(unix)]
pub use attrs::{control_char_name, flag_bits};
#[cfg(unix)]
pub use config::{get_attributes, set_attributes, verify};
#[cfg(unix)]
pub use control::{
    clear_modem_lines, device_control, modem_lines, set_dtr, set_modem_lines, set_rts, ModemLines,
};
#[cfg(unix)]
pub use line::{DataBits, FlowControl, LineSettings, Parity, StopBits};
