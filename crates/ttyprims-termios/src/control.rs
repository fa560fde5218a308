use std::io;
use std::ops::BitOr;
use std::os::fd::{AsFd, AsRawFd, RawFd};

use tracing::trace;

/// Issue `command` against `fd` with a single integer argument.
///
/// The argument is handed to `ioctl(2)` by address as a C `int`, the
/// convention of the modem-line commands (`TIOCMBIS`, `TIOCMBIC`,
/// `TIOCMSET`). The primitive's return value comes back unmodified, so a
/// negative result means failure and the reason is in
/// [`io::Error::last_os_error`]. `command` is not validated.
pub fn device_control(fd: impl AsFd, command: u32, flag: i32) -> i32 {
    let fd = fd.as_fd().as_raw_fd();
    let mut arg: libc::c_int = flag;
    trace!(fd, command = format_args!("{command:#x}"), flag, "device control");
    ioctl_int(fd, command, &mut arg)
}

fn ioctl_int(fd: RawFd, command: u32, arg: &mut libc::c_int) -> libc::c_int {
    // SAFETY: `arg` is a valid, writable int for the duration of the call and
    // `fd` is borrowed from an open descriptor. Commands that take no pointer
    // ignore it.
    unsafe { libc::ioctl(fd, command as _, arg as *mut libc::c_int) }
}

fn check(rc: libc::c_int) -> io::Result<()> {
    if rc < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

/// A set of modem control and status lines (`TIOCM_*` bits).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModemLines(i32);

impl ModemLines {
    /// Data terminal ready.
    pub const DTR: Self = Self(libc::TIOCM_DTR);
    /// Request to send.
    pub const RTS: Self = Self(libc::TIOCM_RTS);
    /// Clear to send.
    pub const CTS: Self = Self(libc::TIOCM_CTS);
    /// Data set ready.
    pub const DSR: Self = Self(libc::TIOCM_DSR);
    /// Ring indicator.
    pub const RI: Self = Self(libc::TIOCM_RI);
    /// Carrier detect.
    pub const CD: Self = Self(libc::TIOCM_CD);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> i32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Names of the lines present in this set.
    pub fn names(self) -> Vec<&'static str> {
        [
            (Self::DTR, "DTR"),
            (Self::RTS, "RTS"),
            (Self::CTS, "CTS"),
            (Self::DSR, "DSR"),
            (Self::RI, "RI"),
            (Self::CD, "CD"),
        ]
        .into_iter()
        .filter(|(line, _)| self.contains(*line))
        .map(|(_, name)| name)
        .collect()
    }
}

impl BitOr for ModemLines {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Raise the given modem lines.
pub fn set_modem_lines(fd: impl AsFd, lines: ModemLines) -> io::Result<()> {
    check(device_control(fd, libc::TIOCMBIS as u32, lines.bits()))
}

/// Drop the given modem lines.
pub fn clear_modem_lines(fd: impl AsFd, lines: ModemLines) -> io::Result<()> {
    check(device_control(fd, libc::TIOCMBIC as u32, lines.bits()))
}

/// Read the current state of the modem lines.
pub fn modem_lines(fd: impl AsFd) -> io::Result<ModemLines> {
    let mut bits: libc::c_int = 0;
    check(ioctl_int(
        fd.as_fd().as_raw_fd(),
        libc::TIOCMGET as u32,
        &mut bits,
    ))?;
    Ok(ModemLines(bits))
}

pub fn set_dtr(fd: impl AsFd, level: bool) -> io::Result<()> {
    if level {
        set_modem_lines(fd, ModemLines::DTR)
    } else {
        clear_modem_lines(fd, ModemLines::DTR)
    }
}

pub fn set_rts(fd: impl AsFd, level: bool) -> io::Result<()> {
    if level {
        set_modem_lines(fd, ModemLines::RTS)
    } else {
        clear_modem_lines(fd, ModemLines::RTS)
    }
}
