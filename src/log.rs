//! Levelled logging for driver diagnostics.
//!
//! The driver is handed a [`Logger`] when it is built. Messages come in three
//! flavours: `info` for chatter, `error` for register mismatches and `global`
//! for messages the application always wants to see. A [`LevelFilter`] never
//! drops global messages.

use core::fmt;

/// Somewhere to send diagnostic messages.
pub trait Logger {
    /// An informational message.
    fn info(&mut self, args: fmt::Arguments);

    /// An error message.
    fn error(&mut self, args: fmt::Arguments);

    /// A global message.
    fn global(&mut self, args: fmt::Arguments);
}

/// How much gets through a [`LevelFilter`].
///
/// Each level lets through everything the levels before it do. Global
/// messages get through at every level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogLevel {
    /// Nothing except global messages
    Off,
    /// Errors and global messages
    Error,
    /// Everything
    Info,
}

/// Wraps a [`Logger`] and drops info and error messages below the current
/// level.
#[derive(Debug, Clone)]
pub struct LevelFilter<L> {
    inner: L,
    level: LogLevel,
}

/// Discards everything.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoopLogger;

/// Sends messages to `defmt`.
#[cfg(feature = "defmt")]
#[derive(Debug, Copy, Clone, Default)]
pub struct DefmtLogger;

impl<L> LevelFilter<L> {
    /// Wrap `inner`, letting through messages at `level` and above.
    pub fn new(inner: L, level: LogLevel) -> LevelFilter<L> {
        LevelFilter { inner, level }
    }

    /// Change the filter level.
    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    /// The current filter level.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Get the wrapped logger.
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// Unwrap the logger.
    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: Logger> Logger for LevelFilter<L> {
    fn info(&mut self, args: fmt::Arguments) {
        if self.level >= LogLevel::Info {
            self.inner.info(args);
        }
    }

    fn error(&mut self, args: fmt::Arguments) {
        if self.level >= LogLevel::Error {
            self.inner.error(args);
        }
    }

    fn global(&mut self, args: fmt::Arguments) {
        self.inner.global(args);
    }
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn info(&mut self, args: fmt::Arguments) {
        (**self).info(args)
    }

    fn error(&mut self, args: fmt::Arguments) {
        (**self).error(args)
    }

    fn global(&mut self, args: fmt::Arguments) {
        (**self).global(args)
    }
}

impl Logger for NoopLogger {
    fn info(&mut self, _args: fmt::Arguments) {}

    fn error(&mut self, _args: fmt::Arguments) {}

    fn global(&mut self, _args: fmt::Arguments) {}
}

#[cfg(feature = "defmt")]
impl Logger for DefmtLogger {
    fn info(&mut self, args: fmt::Arguments) {
        defmt::info!("{}", defmt::Display2Format(&args));
    }

    fn error(&mut self, args: fmt::Arguments) {
        defmt::error!("{}", defmt::Display2Format(&args));
    }

    fn global(&mut self, args: fmt::Arguments) {
        defmt::println!("{}", defmt::Display2Format(&args));
    }
}
