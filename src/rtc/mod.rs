//! Real-time clock access
//!
//! [`Rtc`] is the seam between the watch and the clock chip. [`ds3231::Ds3231`]
//! implements it over I2C, [`time_source::TimeSource`] builds the formatted
//! strings and alarm handling on top of any implementation.

pub mod ds3231;
pub mod format;
pub mod time_source;

#[cfg(test)]
pub(crate) mod fake;

pub use ds3231::Ds3231;
pub use time_source::TimeSource;

use core::fmt;

/// Wall-clock date and time as stored in the chip
///
/// Fields are taken as given, no calendar validation happens anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        DateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }
}

impl fmt::Display for DateTime {
    /// ISO 8601 style, `2025-10-20T17:30:00`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// The two DS3231 alarm channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alarm {
    One,
    Two,
}

impl Alarm {
    /// Bit of this alarm in both the control (AxIE) and status (AxF) register
    pub(crate) const fn mask(self) -> u8 {
        match self {
            Alarm::One => 0x01,
            Alarm::Two => 0x02,
        }
    }
}

/// Driver error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// I2C bus error, includes a missing chip (NACK on the address)
    I2c(E),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "RTC bus error: {:?}", e),
        }
    }
}

/// Operations the watch needs from a battery-backed clock chip
pub trait Rtc {
    type Error: fmt::Debug;

    /// Check that the chip answers on the bus
    fn probe(&mut self) -> Result<(), Self::Error>;

    /// The oscillator stopped at some point, so the stored time is suspect
    fn lost_power(&mut self) -> Result<bool, Self::Error>;

    fn now(&mut self) -> Result<DateTime, Self::Error>;

    /// Write a new time and clear the lost-power indication
    fn adjust(&mut self, datetime: &DateTime) -> Result<(), Self::Error>;

    /// Program alarm 1 to fire whenever the seconds roll over to 00 and route it to INT
    fn set_alarm_minute_boundary(&mut self) -> Result<(), Self::Error>;

    /// Disable the interrupt of both alarms
    fn disable_alarms(&mut self) -> Result<(), Self::Error>;

    fn clear_alarm_flags(&mut self) -> Result<(), Self::Error>;

    /// Clear one alarm flag, which releases the INT line for that alarm
    fn clear_alarm_flag(&mut self, alarm: Alarm) -> Result<(), Self::Error>;

    fn alarm_fired(&mut self, alarm: Alarm) -> Result<bool, Self::Error>;

    /// Die temperature in degrees Celsius
    fn temperature(&mut self) -> Result<f32, Self::Error>;
}
