use std::mem::MaybeUninit;
use std::os::fd::{AsFd, AsRawFd, RawFd};

use tracing::{debug, trace};

use crate::attrs::TerminalAttributes;
use crate::error::{Result, Stage, TermiosError};

/// Read the live attributes of `fd`.
pub fn get_attributes(fd: impl AsFd) -> Result<TerminalAttributes> {
    let tio = tcgetattr(fd.as_fd().as_raw_fd(), Stage::Get)?;
    Ok(TerminalAttributes::from_termios(&tio))
}

/// Apply `desired` to `fd` and confirm that every group took effect.
///
/// The flag groups and control characters of `desired` are laid over the
/// device's current settings, so speed and other fields the driver holds are
/// kept. Queued input is discarded, the result is applied immediately, and
/// the attributes are read back and compared.
///
/// ## Errors
///
/// * `InvalidArguments` if getting, flushing, setting or reading back fails.
/// * The first mismatching group, checked in the order input, output,
///   control, local, control characters.
pub fn set_attributes(fd: impl AsFd, desired: &TerminalAttributes) -> Result<()> {
    let fd = fd.as_fd().as_raw_fd();
    trace!(fd, ?desired, "set terminal attributes");

    let mut tio = tcgetattr(fd, Stage::Get)?;
    desired.overlay_onto(&mut tio);

    // SAFETY: `fd` is borrowed from an open descriptor for the call.
    if unsafe { libc::tcflush(fd, libc::TCIFLUSH) } != 0 {
        return Err(TermiosError::os(Stage::Flush));
    }

    // SAFETY: `tio` is a fully initialized termios read from this descriptor.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tio) } != 0 {
        return Err(TermiosError::os(Stage::Set));
    }

    let applied = tcgetattr(fd, Stage::Readback)?;
    verify(desired, &TerminalAttributes::from_termios(&applied)).inspect_err(|err| {
        debug!(fd, error = %err, "terminal attributes did not take effect");
    })
}

/// Compare requested attributes against a readback.
///
/// Groups are checked in a fixed order (input, output, control, local,
/// control characters) and only the first mismatch is reported.
pub fn verify(desired: &TerminalAttributes, actual: &TerminalAttributes) -> Result<()> {
    if desired.input_flags != actual.input_flags {
        return Err(TermiosError::InvalidIFlag {
            requested: desired.input_flags,
            actual: actual.input_flags,
        });
    }
    if desired.output_flags != actual.output_flags {
        return Err(TermiosError::InvalidOFlag {
            requested: desired.output_flags,
            actual: actual.output_flags,
        });
    }
    if desired.control_flags != actual.control_flags {
        return Err(TermiosError::InvalidCFlag {
            requested: desired.control_flags,
            actual: actual.control_flags,
        });
    }
    if desired.local_flags != actual.local_flags {
        return Err(TermiosError::InvalidLFlag {
            requested: desired.local_flags,
            actual: actual.local_flags,
        });
    }

    let mismatch = desired
        .control_chars
        .iter()
        .zip(actual.control_chars.iter())
        .position(|(want, got)| want != got);
    if let Some(index) = mismatch {
        return Err(TermiosError::InvalidCCs {
            index,
            requested: desired.control_chars[index],
            actual: actual.control_chars[index],
        });
    }

    Ok(())
}

fn tcgetattr(fd: RawFd, stage: Stage) -> Result<libc::termios> {
    let mut tio = MaybeUninit::<libc::termios>::uninit();
    // SAFETY: `tio` is a valid out-pointer; `fd` is borrowed for the call.
    if unsafe { libc::tcgetattr(fd, tio.as_mut_ptr()) } != 0 {
        return Err(TermiosError::os(stage));
    }
    // SAFETY: tcgetattr succeeded and filled the structure.
    Ok(unsafe { tio.assume_init() })
}

#[cfg(test)]
mod tests {
    use std::os::fd::{FromRawFd, OwnedFd};

    use super::*;

    fn sample() -> TerminalAttributes {
        let mut attrs = TerminalAttributes {
            input_flags: 0x0100,
            output_flags: 0x0005,
            control_flags: 0x08b0,
            local_flags: 0x8a3b,
            ..TerminalAttributes::default()
        };
        attrs.control_chars[0] = 3;
        attrs.control_chars[6] = 1;
        attrs
    }

    #[test]
    fn identical_attributes_verify() {
        assert!(verify(&sample(), &sample()).is_ok());
    }

    #[test]
    fn first_mismatch_wins_in_group_order() {
        let desired = sample();
        let mut actual = sample();
        actual.control_chars[6] = 0;
        actual.local_flags ^= 0x8;
        actual.output_flags ^= 0x1;
        actual.input_flags ^= 0x2;

        let err = verify(&desired, &actual).unwrap_err();
        assert!(matches!(
            err,
            TermiosError::InvalidIFlag {
                requested: 0x0100,
                actual: 0x0102
            }
        ));

        actual.input_flags = desired.input_flags;
        assert_eq!(verify(&desired, &actual).unwrap_err().code(), -3);

        actual.output_flags = desired.output_flags;
        assert_eq!(verify(&desired, &actual).unwrap_err().code(), -5);

        actual.local_flags = desired.local_flags;
        let err = verify(&desired, &actual).unwrap_err();
        assert!(matches!(
            err,
            TermiosError::InvalidCCs {
                index: 6,
                requested: 1,
                actual: 0
            }
        ));
    }

    #[test]
    fn control_flag_mismatch_reported_before_local() {
        let desired = sample();
        let mut actual = sample();
        actual.control_flags = 0;
        actual.local_flags = 0;
        assert_eq!(
            verify(&desired, &actual).unwrap_err().code(),
            TermiosError::INVALID_CFLAG
        );
    }

    #[test]
    fn non_tty_descriptor_fails_at_get() {
        let mut fds = [0; 2];
        // SAFETY: `fds` is a valid two-element array for pipe(2) to fill.
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        // SAFETY: pipe(2) succeeded, so both descriptors are open and owned here.
        let (rx, _tx) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };

        let err = set_attributes(&rx, &sample()).unwrap_err();
        assert!(matches!(
            err,
            TermiosError::InvalidArguments {
                stage: Stage::Get,
                ..
            }
        ));
        assert!(matches!(
            get_attributes(&rx),
            Err(TermiosError::InvalidArguments { .. })
        ));
    }
}
