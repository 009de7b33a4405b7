//! Sub-byte field packing.
//!
//! The board firmware declares its flag bytes as C bit fields. Their layout is
//! pinned here instead of being left to a compiler: every field is an explicit
//! `(offset, width)` pair inside one byte, offset counted from the least
//! significant bit.

/// A contiguous run of bits inside a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    offset: u8,
    width: u8,
}

impl BitField {
    /// Create a field. Panics at compile time (in const context) if the field
    /// would spill past bit 7.
    pub const fn new(offset: u8, width: u8) -> Self {
        assert!(width > 0 && offset + width <= 8, "bit field must fit in one byte");
        BitField { offset, width }
    }

    /// Bit offset from the LSB.
    pub const fn offset(&self) -> u8 {
        self.offset
    }

    /// Width in bits.
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Largest value the field can hold.
    pub const fn max_value(&self) -> u8 {
        ((1u16 << self.width) - 1) as u8
    }

    /// Mask of the field's bits in position.
    pub const fn mask(&self) -> u8 {
        self.max_value() << self.offset
    }

    /// Extract the field from a packed byte.
    pub const fn get(&self, byte: u8) -> u8 {
        (byte >> self.offset) & self.max_value()
    }

    /// Extract a one-bit field as a flag.
    pub const fn get_flag(&self, byte: u8) -> bool {
        self.get(byte) != 0
    }

    /// Store `value` into `byte`, truncating it to the field width and leaving
    /// the other bits untouched.
    pub const fn set(&self, byte: u8, value: u8) -> u8 {
        (byte & !self.mask()) | ((value & self.max_value()) << self.offset)
    }

    /// Store a flag.
    pub const fn set_flag(&self, byte: u8, flag: bool) -> u8 {
        self.set(byte, flag as u8)
    }
}
