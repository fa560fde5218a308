/// Length of the control-character table carried by [`TerminalAttributes`].
///
/// Fixed across platforms so the table has one size at every boundary.
/// Entries past the platform's native `NCCS` always read back as zero.
pub const NCCS: usize = 32;

#[cfg(unix)]
const _: () = assert!(libc::NCCS <= NCCS);

/// The configurable line-discipline state of a terminal device.
///
/// Four flag groups plus the control-character table. Other platform fields
/// (speed words, line discipline number) are not part of the value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalAttributes {
    /// Input modes (`c_iflag`).
    pub input_flags: u32,
    /// Output modes (`c_oflag`).
    pub output_flags: u32,
    /// Control modes (`c_cflag`).
    pub control_flags: u32,
    /// Local modes (`c_lflag`).
    pub local_flags: u32,
    /// Control characters (`c_cc`), zero-padded to [`NCCS`].
    pub control_chars: [u8; NCCS],
}

#[cfg(unix)]
impl TerminalAttributes {
    /// Capture the four flag groups and the control characters of `tio`.
    pub fn from_termios(tio: &libc::termios) -> Self {
        let mut control_chars = [0u8; NCCS];
        control_chars[..libc::NCCS].copy_from_slice(&tio.c_cc);

        Self {
            input_flags: flag_bits(tio.c_iflag),
            output_flags: flag_bits(tio.c_oflag),
            control_flags: flag_bits(tio.c_cflag),
            local_flags: flag_bits(tio.c_lflag),
            control_chars,
        }
    }

    /// Write the four flag groups and the control characters into `tio`,
    /// leaving every other field as it was.
    pub fn overlay_onto(&self, tio: &mut libc::termios) {
        tio.c_iflag = libc::tcflag_t::from(self.input_flags);
        tio.c_oflag = libc::tcflag_t::from(self.output_flags);
        tio.c_cflag = libc::tcflag_t::from(self.control_flags);
        tio.c_lflag = libc::tcflag_t::from(self.local_flags);
        tio.c_cc.copy_from_slice(&self.control_chars[..libc::NCCS]);
    }

    /// Switch to raw, byte-oriented mode: no input translation, no output
    /// processing, no echo or signals, 8 data bits, reads return after one
    /// byte.
    pub fn make_raw(&mut self) {
        self.input_flags &= !flag_bits(
            libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON,
        );
        self.output_flags &= !flag_bits(libc::OPOST);
        self.local_flags &=
            !flag_bits(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
        self.control_flags &= !flag_bits(libc::CSIZE | libc::PARENB);
        self.control_flags |= flag_bits(libc::CS8);
        self.control_chars[libc::VMIN] = 1;
        self.control_chars[libc::VTIME] = 0;
    }
}

/// Narrow a `tcflag_t` value to the `u32` flag words used here.
///
/// Every defined flag bit fits in 32 bits, including on platforms where
/// `tcflag_t` is wider.
#[cfg(unix)]
#[allow(clippy::unnecessary_cast)]
pub fn flag_bits(flag: libc::tcflag_t) -> u32 {
    flag as u32
}

/// POSIX name of a control-character slot, e.g. `VMIN`.
#[cfg(unix)]
pub fn control_char_name(index: usize) -> Option<&'static str> {
    const NAMES: &[(usize, &str)] = &[
        (libc::VINTR, "VINTR"),
        (libc::VQUIT, "VQUIT"),
        (libc::VERASE, "VERASE"),
        (libc::VKILL, "VKILL"),
        (libc::VEOF, "VEOF"),
        (libc::VTIME, "VTIME"),
        (libc::VMIN, "VMIN"),
        (libc::VSTART, "VSTART"),
        (libc::VSTOP, "VSTOP"),
        (libc::VSUSP, "VSUSP"),
        (libc::VEOL, "VEOL"),
    ];
    NAMES
        .iter()
        .find(|(slot, _)| *slot == index)
        .map(|(_, name)| *name)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn overlay_keeps_untouched_fields() {
        // SAFETY: termios is plain old data; all-zero is a valid value.
        let mut tio: libc::termios = unsafe { std::mem::zeroed() };
        tio.c_line = 3;

        let mut attrs = TerminalAttributes {
            input_flags: flag_bits(libc::IXON),
            output_flags: flag_bits(libc::OPOST),
            control_flags: flag_bits(libc::CS8 | libc::CREAD),
            local_flags: flag_bits(libc::ICANON),
            ..TerminalAttributes::default()
        };
        attrs.control_chars[libc::VMIN] = 4;
        attrs.overlay_onto(&mut tio);

        assert_eq!(tio.c_line, 3);
        assert_eq!(tio.c_iflag, libc::IXON);
        assert_eq!(tio.c_cc[libc::VMIN], 4);
        assert_eq!(TerminalAttributes::from_termios(&tio), attrs);
    }

    #[test]
    fn table_past_native_length_reads_back_zero() {
        // SAFETY: termios is plain old data; all-zero is a valid value.
        let mut tio: libc::termios = unsafe { std::mem::zeroed() };
        tio.c_cc = [7; libc::NCCS];

        let attrs = TerminalAttributes::from_termios(&tio);
        assert!(attrs.control_chars[..libc::NCCS].iter().all(|&c| c == 7));
        assert!(attrs.control_chars[libc::NCCS..].iter().all(|&c| c == 0));
    }

    #[test]
    fn make_raw_clears_canonical_processing() {
        let mut attrs = TerminalAttributes {
            input_flags: flag_bits(libc::ICRNL | libc::IXON | libc::IXOFF),
            output_flags: flag_bits(libc::OPOST | libc::ONLCR),
            control_flags: flag_bits(libc::CS7 | libc::PARENB | libc::CREAD),
            local_flags: flag_bits(libc::ICANON | libc::ECHO | libc::ISIG),
            ..TerminalAttributes::default()
        };
        attrs.control_chars[libc::VTIME] = 9;
        attrs.make_raw();

        assert_eq!(attrs.input_flags, flag_bits(libc::IXOFF));
        assert_eq!(attrs.output_flags, flag_bits(libc::ONLCR));
        assert_eq!(attrs.local_flags, 0);
        assert_eq!(attrs.control_flags, flag_bits(libc::CS8 | libc::CREAD));
        assert_eq!(attrs.control_chars[libc::VMIN], 1);
        assert_eq!(attrs.control_chars[libc::VTIME], 0);
    }

    #[test]
    fn default_is_all_zero() {
        let attrs = TerminalAttributes::default();
        assert_eq!(attrs.input_flags | attrs.output_flags, 0);
        assert_eq!(attrs.control_flags | attrs.local_flags, 0);
        assert_eq!(attrs.control_chars, [0; NCCS]);
    }

    #[test]
    fn flag_bits_keeps_every_defined_bit() {
        let all = libc::CSIZE | libc::CSTOPB | libc::CREAD | libc::PARENB | libc::HUPCL;
        assert_eq!(u64::from(flag_bits(all)), u64::from(all));
        assert_eq!(flag_bits(libc::CS8) & flag_bits(libc::CSIZE), flag_bits(libc::CS8));
    }

    #[test]
    fn names_common_slots() {
        assert_eq!(control_char_name(libc::VMIN), Some("VMIN"));
        assert_eq!(control_char_name(libc::VTIME), Some("VTIME"));
        assert_eq!(control_char_name(NCCS + 1), None);
    }
}
