//! Shared helpers for driving a `Drv8704` against mocked SPI and pins.

#![allow(dead_code)]

use core::fmt;

use drv8704::{Frame, Logger, Register};
use embedded_hal_mock::eh0::digital::{State as PinState, Transaction as PinTransaction};

/// Keeps every log message, prefixed with its kind.
#[derive(Debug, Default)]
pub struct CaptureLogger {
    pub lines: Vec<String>,
}

impl CaptureLogger {
    pub fn errors(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.starts_with("ERROR"))
            .map(|l| l.as_str())
            .collect()
    }
}

impl Logger for CaptureLogger {
    fn info(&mut self, args: fmt::Arguments) {
        self.lines.push(format!("INFO: {}", args));
    }

    fn error(&mut self, args: fmt::Arguments) {
        self.lines.push(format!("ERROR: {}", args));
    }

    fn global(&mut self, args: fmt::Arguments) {
        self.lines.push(format!("GLOBAL: {}", args));
    }
}

/// The bytes sent and the bytes received for one SPI transaction.
pub type Exchange = (Vec<u8>, Vec<u8>);

/// Build an `embedded-hal-mock` SPI mock from lists of [`Exchange`]s, in
/// order.
macro_rules! spi_mock {
    ($($exchanges:expr),* $(,)?) => {{
        let exchanges: Vec<$crate::common::Exchange> = [$($exchanges),*].concat();
        let expectations: Vec<_> = exchanges
            .into_iter()
            .map(|(w, r)| embedded_hal_mock::eh0::spi::Transaction::transfer(w, r))
            .collect();
        embedded_hal_mock::eh0::spi::Mock::new(&expectations)
    }};
}

/// A read of `register` that returns `value`.
pub fn read(register: Register, value: u16) -> Vec<Exchange> {
    let request = Frame::read(register).to_word().to_be_bytes().to_vec();
    let response = (value & 0x0FFF).to_be_bytes().to_vec();
    vec![(request, response)]
}

/// A write of `value` to `register`. The chip answers with zeroes.
pub fn write(register: Register, value: u16) -> Vec<Exchange> {
    let request = Frame::write(register, value).to_word().to_be_bytes().to_vec();
    vec![(request, vec![0x00, 0x00])]
}

/// A write followed by its confirmation read returning `readback`.
pub fn confirmed_write(register: Register, value: u16, readback: u16) -> Vec<Exchange> {
    [write(register, value), read(register, readback)].concat()
}

/// A read-modify-write: read `current`, write `outgoing`, read it back.
pub fn modify(register: Register, current: u16, outgoing: u16) -> Vec<Exchange> {
    [read(register, current), confirmed_write(register, outgoing, outgoing)].concat()
}

/// Chip-select activity for an active-high driver doing `transfers`
/// transactions.
pub fn cs_active_high(transfers: usize) -> Vec<PinTransaction> {
    let mut expectations = Vec::new();
    for _ in 0..transfers {
        expectations.push(PinTransaction::set(PinState::High));
        expectations.push(PinTransaction::set(PinState::Low));
    }
    expectations
}

/// Fault LED activity, one entry per diagnostic run.
pub fn led(states: &[PinState]) -> Vec<PinTransaction> {
    states.iter().cloned().map(PinTransaction::set).collect()
}
