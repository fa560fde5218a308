//! Serial framing and flow control expressed as terminal attributes.

use crate::attrs::{flag_bits, TerminalAttributes, NCCS};

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    /// Map a bit count (5-8) to a variant.
    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            5 => Some(DataBits::Five),
            6 => Some(DataBits::Six),
            7 => Some(DataBits::Seven),
            8 => Some(DataBits::Eight),
            _ => None,
        }
    }

    fn mask(self) -> u32 {
        match self {
            DataBits::Five => flag_bits(libc::CS5),
            DataBits::Six => flag_bits(libc::CS6),
            DataBits::Seven => flag_bits(libc::CS7),
            DataBits::Eight => flag_bits(libc::CS8),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl Parity {
    fn mask(self) -> u32 {
        match self {
            Parity::None => 0,
            Parity::Odd => flag_bits(libc::PARENB | libc::PARODD),
            Parity::Even => flag_bits(libc::PARENB),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

impl StopBits {
    fn mask(self) -> u32 {
        match self {
            StopBits::One => 0,
            StopBits::Two => flag_bits(libc::CSTOPB),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    None,
    /// XON/XOFF in both directions.
    Software,
    /// RTS/CTS.
    Hardware,
}

/// Character framing and flow control for a serial line.
///
/// Speed is deliberately absent: [`LineSettings::apply_to`] keeps whatever
/// speed bits the base attributes already carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSettings {
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
        }
    }
}

impl LineSettings {
    /// Build a raw binary attribute set for these settings on top of `base`.
    ///
    /// Control flags outside the framing and flow-control bits are copied from
    /// `base`. Receiver and local mode are always enabled; output and local
    /// processing are off; reads wait for at least one byte.
    pub fn apply_to(&self, base: &TerminalAttributes) -> TerminalAttributes {
        let managed = flag_bits(
            libc::CSIZE
                | libc::PARENB
                | libc::PARODD
                | libc::CSTOPB
                | libc::CRTSCTS
                | libc::CLOCAL
                | libc::CREAD,
        );

        let mut control_flags = (base.control_flags & !managed)
            | flag_bits(libc::CLOCAL | libc::CREAD)
            | self.data_bits.mask()
            | self.parity.mask()
            | self.stop_bits.mask();
        let mut input_flags = 0;

        match self.flow_control {
            FlowControl::None => {}
            FlowControl::Software => input_flags |= flag_bits(libc::IXON | libc::IXOFF),
            FlowControl::Hardware => control_flags |= flag_bits(libc::CRTSCTS),
        }

        let mut control_chars = [0u8; NCCS];
        control_chars[libc::VMIN] = 1;

        TerminalAttributes {
            input_flags,
            output_flags: 0,
            control_flags,
            local_flags: 0,
            control_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_eight_n_one_without_flow_control() {
        let base = TerminalAttributes::default();
        let attrs = LineSettings::default().apply_to(&base);

        assert_eq!(
            attrs.control_flags,
            flag_bits(libc::CLOCAL | libc::CREAD | libc::CS8)
        );
        assert_eq!(attrs.input_flags, 0);
        assert_eq!(attrs.output_flags, 0);
        assert_eq!(attrs.local_flags, 0);
        assert_eq!(attrs.control_chars[libc::VMIN], 1);
        assert_eq!(attrs.control_chars.iter().filter(|&&c| c != 0).count(), 1);
    }

    #[test]
    fn framing_and_flow_bits_are_composed() {
        let settings = LineSettings {
            data_bits: DataBits::Seven,
            parity: Parity::Odd,
            stop_bits: StopBits::Two,
            flow_control: FlowControl::Hardware,
        };
        let attrs = settings.apply_to(&TerminalAttributes::default());
        let expected = flag_bits(
            libc::CLOCAL
                | libc::CREAD
                | libc::CS7
                | libc::PARENB
                | libc::PARODD
                | libc::CSTOPB
                | libc::CRTSCTS,
        );
        assert_eq!(attrs.control_flags, expected);

        let software = LineSettings {
            flow_control: FlowControl::Software,
            parity: Parity::Even,
            ..LineSettings::default()
        }
        .apply_to(&TerminalAttributes::default());
        assert_eq!(software.input_flags, flag_bits(libc::IXON | libc::IXOFF));
        assert_eq!(software.control_flags & flag_bits(libc::PARODD), 0);
        assert_ne!(software.control_flags & flag_bits(libc::PARENB), 0);
    }

    #[test]
    fn unmanaged_control_bits_survive_from_base() {
        let base = TerminalAttributes {
            control_flags: flag_bits(libc::HUPCL | libc::CS5 | libc::PARENB | libc::CRTSCTS),
            local_flags: flag_bits(libc::ECHO),
            ..TerminalAttributes::default()
        };
        let attrs = LineSettings::default().apply_to(&base);

        assert_ne!(attrs.control_flags & flag_bits(libc::HUPCL), 0);
        assert_eq!(attrs.control_flags & flag_bits(libc::PARENB | libc::CRTSCTS), 0);
        assert_eq!(attrs.control_flags & flag_bits(libc::CSIZE), flag_bits(libc::CS8));
        assert_eq!(attrs.local_flags, 0);
    }

    #[test]
    fn data_bits_from_count() {
        assert_eq!(DataBits::from_count(7), Some(DataBits::Seven));
        assert_eq!(DataBits::from_count(9), None);
    }
}
