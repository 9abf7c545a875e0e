//! Power-up register diagnostics and the fault LED.

#[macro_use]
mod common;

use common::{cs_active_high, led, read, CaptureLogger, Exchange};
use drv8704::log::{LevelFilter, LogLevel};
use drv8704::{Drv8704, Register, RegisterBank};
use embedded_hal_mock::eh0::digital::{Mock as PinMock, State as PinState};

/// Reads of every register, in address order, returning `bank`.
fn read_bank(bank: &RegisterBank) -> Vec<Exchange> {
    bank.iter()
        .flat_map(|(register, value)| read(register, value))
        .collect()
}

#[test]
fn read_all_skips_the_reserved_address() {
    let spi = spi_mock!(
        vec![(vec![0x80, 0x00], vec![0x03, 0x01])],
        vec![(vec![0x90, 0x00], vec![0x00, 0xFF])],
        vec![(vec![0xA0, 0x00], vec![0x01, 0x30])],
        vec![(vec![0xB0, 0x00], vec![0x00, 0x80])],
        vec![(vec![0xC0, 0x00], vec![0x00, 0x10])],
        vec![(vec![0xE0, 0x00], vec![0x0F, 0xA5])],
        vec![(vec![0xF0, 0x00], vec![0x00, 0x00])],
    );
    let cs = PinMock::new(&cs_active_high(7));
    let fault_led = PinMock::new(&led(&[]));
    let mut drv = Drv8704::new(spi, cs, fault_led, CaptureLogger::default());

    assert_eq!(drv.read_all().unwrap(), RegisterBank::DEFAULTS);

    let (mut spi, mut cs, mut fault_led, _) = drv.release();
    spi.done();
    cs.done();
    fault_led.done();
}

#[test]
fn matching_chip_turns_the_fault_led_off() {
    let spi = spi_mock!(read_bank(&RegisterBank::DEFAULTS));
    let cs = PinMock::new(&cs_active_high(7));
    let fault_led = PinMock::new(&led(&[PinState::Low]));
    let mut drv = Drv8704::new(spi, cs, fault_led, CaptureLogger::default());

    assert!(drv.power_up_check().unwrap());
    assert!(drv.logger().errors().is_empty());
    assert_eq!(
        drv.logger().lines.last().map(String::as_str),
        Some("GLOBAL: DRV8704 registers match configuration")
    );

    let (mut spi, mut cs, mut fault_led, _) = drv.release();
    spi.done();
    cs.done();
    fault_led.done();
}

#[test]
fn off_mismatch_turns_the_fault_led_on() {
    let desired = RegisterBank::DEFAULTS.with(Register::Off, 0x030);
    let actual = RegisterBank::DEFAULTS.with(Register::Off, 0x131);
    let spi = spi_mock!(read_bank(&actual));
    let cs = PinMock::new(&cs_active_high(7));
    let fault_led = PinMock::new(&led(&[PinState::High]));
    let mut drv = Drv8704::new(spi, cs, fault_led, CaptureLogger::default());

    assert!(!drv.reg_diagnostic(&desired).unwrap());
    assert_eq!(
        drv.logger().errors(),
        ["ERROR: OFF mismatch: read 0x131, expected 0x030"]
    );

    let (mut spi, mut cs, mut fault_led, _) = drv.release();
    spi.done();
    cs.done();
    fault_led.done();
}

#[test]
fn every_mismatching_register_is_logged() {
    let actual = RegisterBank::DEFAULTS
        .with(Register::Ctrl, 0x300)
        .with(Register::Drive, 0xFA4)
        .with(Register::Status, 0x001);
    let spi = spi_mock!(read_bank(&actual));
    let cs = PinMock::new(&cs_active_high(7));
    let fault_led = PinMock::new(&led(&[PinState::High]));
    let mut drv = Drv8704::new(spi, cs, fault_led, CaptureLogger::default());

    assert!(!drv.power_up_check().unwrap());
    let errors = drv.logger().errors();
    assert_eq!(errors.len(), 3);
    assert!(errors[0].starts_with("ERROR: CTRL"));
    assert!(errors[1].starts_with("ERROR: DRIVE"));
    assert!(errors[2].starts_with("ERROR: STATUS"));

    let (mut spi, mut cs, mut fault_led, _) = drv.release();
    spi.done();
    cs.done();
    fault_led.done();
}

#[test]
fn log_level_filters_diagnostic_output() {
    let actual = RegisterBank::DEFAULTS.with(Register::Torque, 0x080);
    let spi = spi_mock!(read_bank(&actual), read_bank(&actual));
    let cs = PinMock::new(&cs_active_high(14));
    let fault_led = PinMock::new(&led(&[PinState::High, PinState::High]));
    let logger = LevelFilter::new(CaptureLogger::default(), LogLevel::Error);
    let mut drv = Drv8704::new(spi, cs, fault_led, logger);

    // The mismatch and the summary, but no per-register info lines
    assert!(!drv.power_up_check().unwrap());
    assert_eq!(
        drv.logger().inner().lines,
        [
            "ERROR: TORQUE mismatch: read 0x080, expected 0x0ff",
            "GLOBAL: DRV8704 registers do not match configuration",
        ]
    );

    // Off still lets the summary through
    drv.logger_mut().set_level(LogLevel::Off);
    assert!(!drv.power_up_check().unwrap());
    assert_eq!(
        drv.logger().inner().lines[2..],
        ["GLOBAL: DRV8704 registers do not match configuration"]
    );

    let (mut spi, mut cs, mut fault_led, _) = drv.release();
    spi.done();
    cs.done();
    fault_led.done();
}
