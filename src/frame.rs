//! 16-bit SPI frames.
//!
//! ```text
//!  15  | 14 13 12 | 11 ............ 0
//!  R/W | address  | data
//! ```
//!
//! R/W is 1 for a read and 0 for a write. On a read the data bits we send are
//! ignored and the chip returns the register contents in the same bits.

use crate::registers::{Register, VALUE_MASK};

/// Set in bit 15 for a read
const READ_BIT: u16 = 1 << 15;
const ADDRESS_SHIFT: u16 = 12;
const ADDRESS_MASK: u16 = 0b111;

/// One decoded SPI frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// True for a read request
    pub read: bool,
    /// Register address, 0..=7
    pub address: u8,
    /// 12-bit payload
    pub payload: u16,
}

impl Frame {
    /// A read request for `register`. The payload is zero.
    pub const fn read(register: Register) -> Frame {
        Frame {
            read: true,
            address: register.address(),
            payload: 0,
        }
    }

    /// A write of `value` to `register`.
    ///
    /// Values wider than 12 bits are truncated.
    pub const fn write(register: Register, value: u16) -> Frame {
        Frame {
            read: false,
            address: register.address(),
            payload: value & VALUE_MASK,
        }
    }

    /// Pack into the word sent on the wire.
    pub const fn to_word(self) -> u16 {
        let mut word = (self.address as u16 & ADDRESS_MASK) << ADDRESS_SHIFT;
        word |= self.payload & VALUE_MASK;
        if self.read {
            word |= READ_BIT;
        }
        word
    }

    /// Unpack a word received from, or destined for, the wire.
    pub const fn from_word(word: u16) -> Frame {
        Frame {
            read: (word & READ_BIT) != 0,
            address: ((word >> ADDRESS_SHIFT) & ADDRESS_MASK) as u8,
            payload: word & VALUE_MASK,
        }
    }
}
