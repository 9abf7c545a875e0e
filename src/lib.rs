//! # DRV8704 Driver
//!
//! This is a driver for the Texas Instruments DRV8704 dual H-bridge gate
//! driver.
//!
//! Specifically, this driver is for setting the registers in the DRV8704 over
//! SPI - it does not generate the PWM or direction signals that actually
//! drive the bridges.
//!
//! Every SPI transaction is a single 16-bit word (see [`frame`]). Unlike
//! write-only parts, the DRV8704 lets us read every register back, so:
//!
//! * every write is confirmed by reading the register straight back
//! * every setter reads the register first and only changes its own field
//! * after power-up, [`Drv8704::reg_diagnostic`] can compare the whole chip
//!   against a wanted configuration and light a fault LED on mismatch
//!
//! # Example
//!
//! You might setup the driver like this:
//!
//! ```rust
//! # use embedded_hal::blocking::spi::Transfer;
//! # use embedded_hal::digital::v2::OutputPin;
//! # struct Spi;
//! # impl Transfer<u8> for Spi {
//! #     type Error = ();
//! #     fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], ()> {
//! #         Ok(words)
//! #     }
//! # }
//! # struct Pin;
//! # impl OutputPin for Pin {
//! #     type Error = ();
//! #     fn set_low(&mut self) -> Result<(), ()> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), ()> { Ok(()) }
//! # }
//! # let (spi, cs, fault_led) = (Spi, Pin, Pin);
//! use drv8704::log::{LevelFilter, LogLevel, NoopLogger};
//!
//! let logger = LevelFilter::new(NoopLogger, LogLevel::Error);
//! let mut drv = drv8704::Drv8704::new(spi, cs, fault_led, logger);
//! if !drv.power_up_check()? {
//!     // Chip didn't come up with its defaults; the fault LED is now on
//! }
//! drv.set_isgain(drv8704::IsGain::Gain20)?;
//! drv.set_decay_mode(drv8704::DecayMode::Mixed)?;
//! if !drv.set_torque(128)? {
//!     // Chip didn't confirm the write
//! }
//! # Ok::<(), drv8704::Error<(), ()>>(())
//! ```
//!
//! The SPI bus must be set up as [`MODE`] at [`SPI_FREQUENCY_HZ`] with 8-bit
//! words.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod diagnostic;
pub mod frame;
pub mod log;
pub mod registers;

use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;

pub use frame::Frame;
pub use log::{LevelFilter, LogLevel, Logger};
pub use registers::{
    DeadTime, DecayMode, InvalidParameter, IsGain, Register, RegisterBank, Status,
};

//
// Public Types
//

/// Which level on the chip-select pin selects the DRV8704.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CsPolarity {
    /// SCS high while a transaction is in progress, as on the DRV8704
    ActiveHigh,
    /// SCS low while a transaction is in progress
    ActiveLow,
}

/// Board-level settings for the driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Chip-select polarity. Check this against your board's wiring.
    pub cs_polarity: CsPolarity,
}

/// Driver errors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SpiE, PinE> {
    /// The SPI transfer failed
    Spi(SpiE),
    /// The chip-select or fault LED pin could not be driven
    Pin(PinE),
    /// A numeric setting was outside the values the field allows
    InvalidParameter(u16),
}

/// Represents a DRV8704 on an SPI bus, with its chip-select line and a fault
/// LED.
pub struct Drv8704<SPI, CS, LED, L> {
    spi: SPI,
    cs: CS,
    fault_led: LED,
    logger: L,
    config: Config,
}

//
// Public Data
//

/// The SPI mode the DRV8704 expects.
pub const MODE: embedded_hal::spi::Mode = embedded_hal::spi::MODE_0;

/// The SPI clock rate used with the DRV8704.
pub const SPI_FREQUENCY_HZ: u32 = 140_000;

//
// impls on Public Types
//

impl Default for Config {
    fn default() -> Config {
        Config {
            cs_polarity: CsPolarity::ActiveHigh,
        }
    }
}

impl<SpiE, PinE> From<InvalidParameter> for Error<SpiE, PinE> {
    fn from(e: InvalidParameter) -> Self {
        Error::InvalidParameter(e.0)
    }
}

impl<SPI, CS, LED, L, SpiE, PinE> Drv8704<SPI, CS, LED, L>
where
    SPI: Transfer<u8, Error = SpiE>,
    CS: OutputPin<Error = PinE>,
    LED: OutputPin<Error = PinE>,
    L: Logger,
{
    /// Create a new DRV8704 driver with the default [`Config`].
    ///
    /// No SPI or pin activity happens here. Chip-select must already be
    /// deasserted; the fault LED is driven by the first
    /// [`Drv8704::reg_diagnostic`].
    pub fn new(spi: SPI, cs: CS, fault_led: LED, logger: L) -> Self {
        Self::with_config(spi, cs, fault_led, logger, Config::default())
    }

    /// Create a new DRV8704 driver with a specific [`Config`].
    pub fn with_config(spi: SPI, cs: CS, fault_led: LED, logger: L, config: Config) -> Self {
        Drv8704 {
            spi,
            cs,
            fault_led,
            logger,
            config,
        }
    }

    /// Give back the bus, the pins and the logger.
    pub fn release(self) -> (SPI, CS, LED, L) {
        (self.spi, self.cs, self.fault_led, self.logger)
    }

    /// Get the logger, e.g. to change its level.
    pub fn logger_mut(&mut self) -> &mut L {
        &mut self.logger
    }

    /// Read one register.
    ///
    /// Returns the 12-bit register contents.
    pub fn read_register(&mut self, register: Register) -> Result<u16, Error<SpiE, PinE>> {
        let response = self.transfer(Frame::read(register))?;
        Ok(Frame::from_word(response).payload)
    }

    /// Write one register, then read it back.
    ///
    /// `value` is truncated to 12 bits. Returns `Ok(true)` if the chip holds
    /// the value we wrote, and `Ok(false)` if it holds something else. The
    /// write is not retried.
    pub fn write_register(
        &mut self,
        register: Register,
        value: u16,
    ) -> Result<bool, Error<SpiE, PinE>> {
        let frame = Frame::write(register, value);
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Setting DRV8704 {} to 0x{:03x}",
            register.name(),
            frame.payload
        );
        self.transfer(frame)?;
        let confirmation = self.read_register(register)?;
        if confirmation != frame.payload {
            self.logger.error(format_args!(
                "{} write not confirmed: wrote 0x{:03x}, read 0x{:03x}",
                register.name(),
                frame.payload,
                confirmation
            ));
            return Ok(false);
        }
        Ok(true)
    }

    /// Read every register.
    pub fn read_all(&mut self) -> Result<RegisterBank, Error<SpiE, PinE>> {
        let mut bank = RegisterBank::zeroed();
        for register in Register::ALL {
            bank.set(register, self.read_register(register)?);
        }
        Ok(bank)
    }

    /// Read every register and compare it against `desired`.
    ///
    /// Each register that does not match is logged as an error. The fault LED
    /// is turned on if anything failed and off if everything matched.
    /// Returns `Ok(true)` if everything matched.
    pub fn reg_diagnostic(&mut self, desired: &RegisterBank) -> Result<bool, Error<SpiE, PinE>> {
        let actual = self.read_all()?;
        let ok = diagnostic::check_all(&actual, desired, &mut self.logger);
        if ok {
            self.fault_led.set_low().map_err(Error::Pin)?;
            self.logger
                .global(format_args!("DRV8704 registers match configuration"));
        } else {
            self.fault_led.set_high().map_err(Error::Pin)?;
            self.logger
                .global(format_args!("DRV8704 registers do not match configuration"));
        }
        Ok(ok)
    }

    /// Check the chip holds its power-on defaults.
    ///
    /// See [`RegisterBank::DEFAULTS`] and [`Drv8704::reg_diagnostic`].
    pub fn power_up_check(&mut self) -> Result<bool, Error<SpiE, PinE>> {
        self.reg_diagnostic(&RegisterBank::DEFAULTS)
    }

    /// Turn the H-bridges on or off (`ENBL`).
    pub fn set_bridge(&mut self, on: bool) -> Result<bool, Error<SpiE, PinE>> {
        let bits = if on { registers::mask::CTRL_ENBL } else { 0 };
        self.update_field(Register::Ctrl, registers::mask::CTRL_ENBL, bits)
    }

    /// Set the current sense amplifier gain.
    pub fn set_isgain(&mut self, gain: IsGain) -> Result<bool, Error<SpiE, PinE>> {
        self.update_field(Register::Ctrl, registers::mask::CTRL_ISGAIN, gain.bits())
    }

    /// Set the dead time between high-side and low-side switching.
    pub fn set_dead_time(&mut self, dead_time: DeadTime) -> Result<bool, Error<SpiE, PinE>> {
        self.update_field(Register::Ctrl, registers::mask::CTRL_DTIME, dead_time.bits())
    }

    /// Set the torque DAC output, which scales the chopping current.
    pub fn set_torque(&mut self, torque: u8) -> Result<bool, Error<SpiE, PinE>> {
        self.update_field(Register::Torque, registers::mask::TORQUE, torque as u16)
    }

    /// Set the fixed off time, in steps of 500 ns.
    ///
    /// The PWMMODE bit is left as it is.
    pub fn set_off_time(&mut self, toff: u8) -> Result<bool, Error<SpiE, PinE>> {
        self.update_field(Register::Off, registers::mask::OFF_TOFF, toff as u16)
    }

    /// Set the current-trip blanking time, in steps of 20 ns.
    pub fn set_blanking_time(&mut self, tblank: u8) -> Result<bool, Error<SpiE, PinE>> {
        self.update_field(Register::Blank, registers::mask::BLANK_TBLANK, tblank as u16)
    }

    /// Set the mixed decay transition time, in steps of 500 ns.
    pub fn set_decay_time(&mut self, tdecay: u8) -> Result<bool, Error<SpiE, PinE>> {
        self.update_field(Register::Decay, registers::mask::DECAY_TDECAY, tdecay as u16)
    }

    /// Set the current decay mode.
    pub fn set_decay_mode(&mut self, mode: DecayMode) -> Result<bool, Error<SpiE, PinE>> {
        self.update_field(Register::Decay, registers::mask::DECAY_DECMOD, mode.bits())
    }

    /// Read the fault flags.
    pub fn status(&mut self) -> Result<Status, Error<SpiE, PinE>> {
        Ok(Status::new(self.read_register(Register::Status)?))
    }

    /// Clear all latched fault flags.
    pub fn clear_status(&mut self) -> Result<bool, Error<SpiE, PinE>> {
        self.write_register(Register::Status, 0)
    }

    /// Replace the bits of `register` selected by `mask` with `bits`, leaving
    /// the rest as the chip currently has them.
    fn update_field(
        &mut self,
        register: Register,
        mask: u16,
        bits: u16,
    ) -> Result<bool, Error<SpiE, PinE>> {
        let current = self.read_register(register)?;
        // Clear the bits we want to change, then set them, but only in the
        // cleared section
        let outgoing = (current & !mask) | (bits & mask);
        self.write_register(register, outgoing)
    }

    /// Exchange one word with the chip, with chip-select held for the
    /// duration.
    ///
    /// Chip-select is released even if the transfer fails.
    fn transfer(&mut self, frame: Frame) -> Result<u16, Error<SpiE, PinE>> {
        let mut buffer = frame.to_word().to_be_bytes();
        self.select()?;
        let result = self
            .spi
            .transfer(&mut buffer)
            .map(|rx| u16::from_be_bytes([rx[0], rx[1]]));
        let released = self.deselect();
        let response = result.map_err(Error::Spi)?;
        released?;
        Ok(response)
    }

    fn select(&mut self) -> Result<(), Error<SpiE, PinE>> {
        match self.config.cs_polarity {
            CsPolarity::ActiveHigh => self.cs.set_high(),
            CsPolarity::ActiveLow => self.cs.set_low(),
        }
        .map_err(Error::Pin)
    }

    fn deselect(&mut self) -> Result<(), Error<SpiE, PinE>> {
        match self.config.cs_polarity {
            CsPolarity::ActiveHigh => self.cs.set_low(),
            CsPolarity::ActiveLow => self.cs.set_high(),
        }
        .map_err(Error::Pin)
    }
}

impl<SPI, CS, LED, L> Drv8704<SPI, CS, LED, L> {
    /// Get the logger.
    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// The configuration this driver was built with.
    pub fn config(&self) -> Config {
        self.config
    }
}

//
// End of file
//
