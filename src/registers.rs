//! The DRV8704 register map.
//!
//! Every register is 12 bits wide. Field positions and masks come from the
//! DRV8704 datasheet, section 7.6.

//
// Public Types
//

/// The set of registers in the DRV8704.
///
/// Address 0x5 is reserved on the chip and deliberately has no variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Dead time, sense gain and H-bridge enable
    Ctrl = 0x0,
    /// Torque (current regulation DAC)
    Torque = 0x1,
    /// Fixed off time and PWM mode
    Off = 0x2,
    /// Current-trip blanking time
    Blank = 0x3,
    /// Decay time and decay mode
    Decay = 0x4,
    /// Gate drive strength and OCP settings
    Drive = 0x6,
    /// Fault flags
    Status = 0x7,
}

/// An address that does not name a DRV8704 register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidAddress(pub u8);

/// A numeric setting that falls outside the field's allowed values.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidParameter(pub u16);

/// Current sense amplifier gain (`ISGAIN`, CTRL bits 9..8).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IsGain {
    /// Gain of 5
    Gain5 = 0b00,
    /// Gain of 10
    Gain10 = 0b01,
    /// Gain of 20
    Gain20 = 0b10,
    /// Gain of 40
    Gain40 = 0b11,
}

/// Dead time between high-side and low-side switching (`DTIME`, CTRL bits
/// 11..10).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeadTime {
    /// 410 ns
    Ns410 = 0b00,
    /// 460 ns
    Ns460 = 0b01,
    /// 670 ns
    Ns670 = 0b10,
    /// 880 ns
    Ns880 = 0b11,
}

/// Current decay mode (`DECMOD`, DECAY bits 10..8).
///
/// The codes the DRV8704 marks as reserved are not representable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecayMode {
    /// Force slow decay at all times
    Slow = 0b000,
    /// Force fast decay at all times
    Fast = 0b010,
    /// Mixed decay, with the fast portion set by TDECAY
    Mixed = 0b011,
    /// Auto mixed decay
    Auto = 0b101,
}

/// A snapshot of all seven DRV8704 registers.
///
/// This is used both for what the chip currently holds and for what we want
/// it to hold. Values are always kept to 12 bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterBank {
    values: [u16; NUM_REGISTERS],
}

/// Decoded STATUS register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    raw: u16,
}

//
// Public Data
//

/// Number of addressable registers (the reserved slot is not counted).
pub const NUM_REGISTERS: usize = 7;

/// Largest value a register can hold.
pub const VALUE_MASK: u16 = 0x0FFF;

/// Field masks, in register bit positions.
pub mod mask {
    /// CTRL: dead time, bits 11..10
    pub const CTRL_DTIME: u16 = 0b11 << 10;
    /// CTRL: sense amplifier gain, bits 9..8
    pub const CTRL_ISGAIN: u16 = 0b11 << 8;
    /// CTRL: dead time and gain together, as compared by the diagnostics
    pub const CTRL_DTIME_ISGAIN: u16 = CTRL_DTIME | CTRL_ISGAIN;
    /// CTRL: H-bridge enable, bit 0
    pub const CTRL_ENBL: u16 = 1 << 0;
    /// TORQUE: torque DAC, bits 7..0
    pub const TORQUE: u16 = 0xFF;
    /// OFF: fixed off time, bits 7..0
    pub const OFF_TOFF: u16 = 0xFF;
    /// OFF: PWM mode, bit 8. Must read back as set.
    pub const OFF_PWMMODE: u16 = 1 << 8;
    /// BLANK: blanking time, bits 7..0
    pub const BLANK_TBLANK: u16 = 0xFF;
    /// DECAY: decay time, bits 7..0
    pub const DECAY_TDECAY: u16 = 0xFF;
    /// DECAY: decay mode, bits 10..8
    pub const DECAY_DECMOD: u16 = 0b111 << 8;
    /// STATUS: the six fault flags, bits 5..0
    pub const STATUS_FLAGS: u16 = 0x3F;
}

//
// impls on Public Types
//

impl Register {
    /// Every register, in address order.
    pub const ALL: [Register; NUM_REGISTERS] = [
        Register::Ctrl,
        Register::Torque,
        Register::Off,
        Register::Blank,
        Register::Decay,
        Register::Drive,
        Register::Status,
    ];

    /// The 3-bit address used on the wire.
    pub const fn address(self) -> u8 {
        self as u8
    }

    /// The datasheet name of this register.
    pub const fn name(self) -> &'static str {
        match self {
            Register::Ctrl => "CTRL",
            Register::Torque => "TORQUE",
            Register::Off => "OFF",
            Register::Blank => "BLANK",
            Register::Decay => "DECAY",
            Register::Drive => "DRIVE",
            Register::Status => "STATUS",
        }
    }

    /// Position in a [`RegisterBank`]. Skips the reserved address.
    const fn slot(self) -> usize {
        match self {
            Register::Ctrl => 0,
            Register::Torque => 1,
            Register::Off => 2,
            Register::Blank => 3,
            Register::Decay => 4,
            Register::Drive => 5,
            Register::Status => 6,
        }
    }
}

impl TryFrom<u8> for Register {
    type Error = InvalidAddress;

    fn try_from(address: u8) -> Result<Self, Self::Error> {
        match address {
            0x0 => Ok(Register::Ctrl),
            0x1 => Ok(Register::Torque),
            0x2 => Ok(Register::Off),
            0x3 => Ok(Register::Blank),
            0x4 => Ok(Register::Decay),
            0x6 => Ok(Register::Drive),
            0x7 => Ok(Register::Status),
            _ => Err(InvalidAddress(address)),
        }
    }
}

impl IsGain {
    /// The gain as a plain number.
    pub const fn gain(self) -> u16 {
        match self {
            IsGain::Gain5 => 5,
            IsGain::Gain10 => 10,
            IsGain::Gain20 => 20,
            IsGain::Gain40 => 40,
        }
    }

    pub(crate) const fn bits(self) -> u16 {
        (self as u16) << 8
    }
}

impl TryFrom<u16> for IsGain {
    type Error = InvalidParameter;

    /// Convert a gain of 5, 10, 20 or 40.
    fn try_from(gain: u16) -> Result<Self, Self::Error> {
        match gain {
            5 => Ok(IsGain::Gain5),
            10 => Ok(IsGain::Gain10),
            20 => Ok(IsGain::Gain20),
            40 => Ok(IsGain::Gain40),
            _ => Err(InvalidParameter(gain)),
        }
    }
}

impl DeadTime {
    /// The dead time in nanoseconds.
    pub const fn nanoseconds(self) -> u16 {
        match self {
            DeadTime::Ns410 => 410,
            DeadTime::Ns460 => 460,
            DeadTime::Ns670 => 670,
            DeadTime::Ns880 => 880,
        }
    }

    pub(crate) const fn bits(self) -> u16 {
        (self as u16) << 10
    }
}

impl TryFrom<u16> for DeadTime {
    type Error = InvalidParameter;

    /// Convert a dead time of 410, 460, 670 or 880 nanoseconds.
    fn try_from(ns: u16) -> Result<Self, Self::Error> {
        match ns {
            410 => Ok(DeadTime::Ns410),
            460 => Ok(DeadTime::Ns460),
            670 => Ok(DeadTime::Ns670),
            880 => Ok(DeadTime::Ns880),
            _ => Err(InvalidParameter(ns)),
        }
    }
}

impl DecayMode {
    pub(crate) const fn bits(self) -> u16 {
        (self as u16) << 8
    }

    /// Decode the DECMOD field of a DECAY register value.
    ///
    /// Returns `None` for the reserved codes.
    pub fn from_register(value: u16) -> Option<DecayMode> {
        match (value & mask::DECAY_DECMOD) >> 8 {
            0b000 => Some(DecayMode::Slow),
            0b010 => Some(DecayMode::Fast),
            0b011 => Some(DecayMode::Mixed),
            0b101 => Some(DecayMode::Auto),
            _ => None,
        }
    }
}

impl RegisterBank {
    /// The register contents the DRV8704 is expected to hold after power-up.
    pub const DEFAULTS: RegisterBank = RegisterBank {
        values: [
            // CTRL - 410 ns dead time, gain 40, bridge enabled
            0x301,
            // TORQUE - full scale
            0x0FF,
            // OFF - PWM mode, 24 us off time
            0x130,
            // BLANK - 2.56 us blanking
            0x080,
            // DECAY - slow decay, 8 us decay time
            0x010,
            // DRIVE - gate drive and OCP settings
            0xFA5,
            // STATUS - no faults
            0x000,
        ],
    };

    /// A bank with every register set to zero.
    pub const fn zeroed() -> RegisterBank {
        RegisterBank {
            values: [0; NUM_REGISTERS],
        }
    }

    /// Get the value held for `register`.
    pub fn get(&self, register: Register) -> u16 {
        self.values[register.slot()]
    }

    /// Set the value held for `register`, truncated to 12 bits.
    pub fn set(&mut self, register: Register, value: u16) {
        self.values[register.slot()] = value & VALUE_MASK;
    }

    /// Builder-style version of [`RegisterBank::set`].
    pub fn with(mut self, register: Register, value: u16) -> RegisterBank {
        self.set(register, value);
        self
    }

    /// Iterate over `(register, value)` pairs in address order.
    pub fn iter(&self) -> impl Iterator<Item = (Register, u16)> + '_ {
        Register::ALL.iter().map(move |r| (*r, self.get(*r)))
    }
}

impl Default for RegisterBank {
    fn default() -> RegisterBank {
        RegisterBank::DEFAULTS
    }
}

impl Status {
    /// Wrap a raw STATUS register value.
    pub const fn new(raw: u16) -> Status {
        Status {
            raw: raw & mask::STATUS_FLAGS,
        }
    }

    /// The raw fault flags.
    #[inline]
    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// True if any fault flag is set.
    #[inline]
    pub fn any_fault(&self) -> bool {
        self.raw != 0
    }

    /// Overtemperature shutdown.
    #[inline]
    pub fn ots(&self) -> bool {
        (self.raw & (1 << 0)) != 0
    }

    /// Channel A overcurrent shutdown.
    #[inline]
    pub fn aocp(&self) -> bool {
        (self.raw & (1 << 1)) != 0
    }

    /// Channel B overcurrent shutdown.
    #[inline]
    pub fn bocp(&self) -> bool {
        (self.raw & (1 << 2)) != 0
    }

    /// Channel A pre-driver fault.
    #[inline]
    pub fn apdf(&self) -> bool {
        (self.raw & (1 << 3)) != 0
    }

    /// Channel B pre-driver fault.
    #[inline]
    pub fn bpdf(&self) -> bool {
        (self.raw & (1 << 4)) != 0
    }

    /// Undervoltage lockout.
    #[inline]
    pub fn uvlo(&self) -> bool {
        (self.raw & (1 << 5)) != 0
    }
}
