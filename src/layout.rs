//! Positions of the RFC 4122 sub-fields.
//!
//! Every constant here is part of the wire format. Fields prefixed with `MSB_`/`LSB_` are
//! expressed in coordinates of the two halves of a UUID; the rest are expressed in
//! coordinates of the value they decompose (a 60-bit timestamp or a clock sequence).

use crate::bits::Field;

/// Lower 32 bits of a timestamp.
pub(crate) const TIME_LOW: Field = Field::new(0x0000_0000_ffff_ffff, 0);
/// Middle 16 bits of a timestamp.
pub(crate) const TIME_MID: Field = Field::new(0x0000_ffff_0000_0000, 32);
/// Upper 12 bits of a 60-bit timestamp.
pub(crate) const TIME_HIGH: Field = Field::new(0x0fff_0000_0000_0000, 48);

/// Low byte of a clock sequence.
pub(crate) const CLOCK_SEQ_LOW: Field = Field::new(0x00ff, 0);
/// Upper six bits of a 14-bit clock sequence.
pub(crate) const CLOCK_SEQ_HIGH: Field = Field::new(0x3f00, 8);
/// The two variant bits sharing a byte with `CLOCK_SEQ_HIGH`.
pub(crate) const CLOCK_SEQ_RESERVED: Field = Field::new(0xc000, 14);
/// `clock_seq_hi_and_reserved`: `CLOCK_SEQ_HIGH` together with `CLOCK_SEQ_RESERVED`.
pub(crate) const CLOCK_SEQ_HIGH_AND_RESERVED: Field = Field::new(0xff00, 8);

/// 4-bit version nibble of the high word.
pub(crate) const VERSION: Field = Field::new(0xf000, 12);

/// `time_low` slot of the high word. SQUUIDs reuse it for the POSIX time.
pub(crate) const MSB_TIME_LOW: Field = Field::new(0xffff_ffff_0000_0000, 32);
/// `time_mid` slot of the high word.
pub(crate) const MSB_TIME_MID: Field = Field::new(0x0000_0000_ffff_0000, 16);
/// `time_hi` slot of the high word, below the version nibble.
pub(crate) const MSB_TIME_HIGH: Field = Field::new(0x0000_0000_0000_0fff, 0);

/// Top byte of the low word: `clock_seq_hi_and_reserved`.
pub(crate) const LSB_BYTE_56: Field = Field::new(0xff00_0000_0000_0000, 56);
/// Second byte of the low word: `clock_seq_low`.
pub(crate) const LSB_BYTE_48: Field = Field::new(0x00ff_0000_0000_0000, 48);
/// The 14-bit clock sequence as stored in the low word.
pub(crate) const LSB_CLOCK_SEQ: Field = Field::new(0x3fff_0000_0000_0000, 48);
/// 48-bit node id.
pub(crate) const LSB_NODE: Field = Field::new(0x0000_ffff_ffff_ffff, 0);
/// Two-bit RFC 4122 variant at the top of the low word.
pub(crate) const LSB_VARIANT: Field = Field::new(0xc000_0000_0000_0000, 62);
/// Three-bit window used to tell the variant families apart.
pub(crate) const LSB_VARIANT_WIDE: Field = Field::new(0xe000_0000_0000_0000, 61);

/// Value of the variant bits for RFC 4122 UUIDs (`10`).
pub(crate) const RFC_4122_VARIANT: u64 = 0b10;

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits a timestamp into non-overlapping fields
    #[test]
    fn splits_a_timestamp_into_non_overlapping_fields() {
        let fields = [TIME_LOW, TIME_MID, TIME_HIGH];
        let mut union = 0;
        for f in fields {
            assert_eq!(union & f.mask(), 0);
            union |= f.mask();
        }
        assert_eq!(union, (1 << 60) - 1);

        let ts = 0x0123_4567_89ab_cdef & ((1 << 60) - 1);
        assert_eq!(TIME_LOW.read(ts), 0x89ab_cdef);
        assert_eq!(TIME_MID.read(ts), 0x4567);
        assert_eq!(TIME_HIGH.read(ts), 0x123);
    }

    /// Covers the high word with time fields and version
    #[test]
    fn covers_the_high_word_with_time_fields_and_version() {
        let fields = [MSB_TIME_LOW, MSB_TIME_MID, VERSION, MSB_TIME_HIGH];
        let mut union = 0;
        for f in fields {
            assert_eq!(union & f.mask(), 0);
            union |= f.mask();
        }
        assert_eq!(union, u64::MAX);
    }

    /// Covers the low word with clock sequence, variant and node
    #[test]
    fn covers_the_low_word_with_clock_sequence_variant_and_node() {
        let fields = [LSB_VARIANT, LSB_CLOCK_SEQ, LSB_NODE];
        let mut union = 0;
        for f in fields {
            assert_eq!(union & f.mask(), 0);
            union |= f.mask();
        }
        assert_eq!(union, u64::MAX);
        assert_eq!(LSB_BYTE_56.mask() | LSB_BYTE_48.mask(), !LSB_NODE.mask());
    }

    /// Places the clock sequence bytes in clock_seq_hi_and_reserved
    #[test]
    fn places_the_clock_sequence_bytes_in_clock_seq_hi_and_reserved() {
        let seq = 0x2abc;
        assert_eq!(CLOCK_SEQ_LOW.read(seq), 0xbc);
        assert_eq!(CLOCK_SEQ_HIGH.read(seq), 0x2a);

        let reserved = CLOCK_SEQ_RESERVED.write(seq, RFC_4122_VARIANT);
        assert_eq!(CLOCK_SEQ_HIGH_AND_RESERVED.read(reserved), 0xaa);
        assert_eq!(
            CLOCK_SEQ_HIGH_AND_RESERVED.mask(),
            CLOCK_SEQ_HIGH.mask() | CLOCK_SEQ_RESERVED.mask()
        );
    }
}
