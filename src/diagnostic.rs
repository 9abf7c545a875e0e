//! Compare register contents against a wanted configuration.
//!
//! Reserved and read-only bits are masked out, so a register only fails if a
//! field we actually configure differs.

use crate::log::Logger;
use crate::registers::{mask, Register, RegisterBank};

/// True if `a` and `b` agree on every bit set in `mask`.
#[inline]
pub fn matches_under_mask(a: u16, b: u16, mask: u16) -> bool {
    (a & mask) == (b & mask)
}

/// Check a single register's `actual` contents against `desired`.
pub fn check_register(register: Register, actual: u16, desired: u16) -> bool {
    match register {
        Register::Ctrl => {
            matches_under_mask(actual, desired, mask::CTRL_DTIME_ISGAIN)
                && matches_under_mask(actual, desired, mask::CTRL_ENBL)
        }
        Register::Torque => matches_under_mask(actual, desired, mask::TORQUE),
        Register::Off => {
            // PWMMODE must be set whatever the desired value says
            matches_under_mask(actual, desired, mask::OFF_TOFF)
                && matches_under_mask(actual, mask::OFF_PWMMODE, mask::OFF_PWMMODE)
        }
        Register::Blank => matches_under_mask(actual, desired, mask::BLANK_TBLANK),
        Register::Decay => {
            matches_under_mask(actual, desired, mask::DECAY_TDECAY)
                && matches_under_mask(actual, desired, mask::DECAY_DECMOD)
        }
        Register::Drive => actual == desired,
        Register::Status => matches_under_mask(actual, desired, mask::STATUS_FLAGS),
    }
}

/// Check every register in `actual` against `desired`.
///
/// Every register is checked, and each mismatch is reported to `logger`, even
/// after the first failure.
pub fn check_all<L: Logger>(
    actual: &RegisterBank,
    desired: &RegisterBank,
    logger: &mut L,
) -> bool {
    let mut all_ok = true;
    for register in Register::ALL {
        let got = actual.get(register);
        let want = desired.get(register);
        if check_register(register, got, want) {
            logger.info(format_args!("{} ok (0x{:03x})", register.name(), got));
        } else {
            logger.error(format_args!(
                "{} mismatch: read 0x{:03x}, expected 0x{:03x}",
                register.name(),
                got,
                want
            ));
            all_ok = false;
        }
    }
    all_ok
}
