use bytes::{Buf, BufMut, BytesMut};

use crate::attrs::{TerminalAttributes, NCCS};
use crate::error::{Result, TermiosError};

/// Encoded size of a [`TerminalAttributes`]: four flag words plus the table.
pub const ATTRIBUTES_WIRE_SIZE: usize = 4 * 4 + NCCS;

/// Encode attributes into the fixed-width wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────┬──────────┬──────────┬──────────────┐
/// │ iflag    │ oflag    │ cflag    │ lflag    │ cc[32]       │
/// │ (4B LE)  │ (4B LE)  │ (4B LE)  │ (4B LE)  │ (32 x u8)    │
/// └──────────┴──────────┴──────────┴──────────┴──────────────┘
/// ```
pub fn encode_attributes(attrs: &TerminalAttributes, dst: &mut BytesMut) {
    dst.reserve(ATTRIBUTES_WIRE_SIZE);
    dst.put_u32_le(attrs.input_flags);
    dst.put_u32_le(attrs.output_flags);
    dst.put_u32_le(attrs.control_flags);
    dst.put_u32_le(attrs.local_flags);
    dst.put_slice(&attrs.control_chars);
}

/// Decode attributes from the first [`ATTRIBUTES_WIRE_SIZE`] bytes of `src`.
///
/// Trailing bytes are ignored.
pub fn decode_attributes(mut src: &[u8]) -> Result<TerminalAttributes> {
    if src.len() < ATTRIBUTES_WIRE_SIZE {
        return Err(TermiosError::Truncated {
            len: src.len(),
            expected: ATTRIBUTES_WIRE_SIZE,
        });
    }

    let input_flags = src.get_u32_le();
    let output_flags = src.get_u32_le();
    let control_flags = src.get_u32_le();
    let local_flags = src.get_u32_le();
    let mut control_chars = [0u8; NCCS];
    src.copy_to_slice(&mut control_chars);

    Ok(TerminalAttributes {
        input_flags,
        output_flags,
        control_flags,
        local_flags,
        control_chars,
    })
}
