//! Masked reads and writes over 64-bit words.

/// A contiguous run of bits inside a 64-bit word, described by its mask and the position of the
/// mask's lowest set bit.
///
/// Fields are only built in `const` context, so a mask that does not agree with its offset is
/// rejected at compile time rather than when a UUID is encoded.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct Field {
    mask: u64,
    offset: u32,
}

impl Field {
    /// Creates a field from a `mask` and its `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `mask` is zero or `offset` is not the index of the lowest set bit of `mask`.
    pub const fn new(mask: u64, offset: u32) -> Self {
        assert!(mask != 0, "field mask must not be empty");
        assert!(
            mask.trailing_zeros() == offset,
            "field offset must point at the lowest set bit of the mask"
        );
        Self { mask, offset }
    }

    #[cfg(test)]
    pub const fn mask(self) -> u64 {
        self.mask
    }

    /// Extracts the field from `word`, shifted down to bit zero.
    pub const fn read(self, word: u64) -> u64 {
        (self.mask >> self.offset) & (word >> self.offset)
    }

    /// Returns `word` with the field replaced by `value`. Bits of `value` that do not fit in the
    /// field are discarded.
    pub const fn write(self, word: u64, value: u64) -> u64 {
        (word & !self.mask) | (self.mask & (value << self.offset))
    }
}
