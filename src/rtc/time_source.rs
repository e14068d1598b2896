//! Clock session on top of an [`Rtc`]
//!
//! Every operation is gated on a successful [`TimeSource::begin`]. Until then,
//! or when the chip stops answering later, callers get sentinels (`false`,
//! `"ERR"`, `0`, `0.0`) instead of errors so the render loop never has to care.

use embedded_hal::delay::DelayNs;

use super::format::{format_date, format_time};
use super::{Alarm, DateTime, Rtc};
use crate::serial::{self, ParseError, SerialRx};

/// Returned by string accessors while the clock is unusable
pub const ERROR_TEXT: &str = "ERR";

/// Result of the interactive clock setup
#[derive(Debug, Clone, PartialEq)]
pub enum SetupOutcome {
    /// The clock now holds this time
    Set(DateTime),
    /// No complete line arrived in time, the chip time is unchanged
    TimedOut,
    /// The serial port reported an error, the chip time is unchanged
    ReadFailed,
    /// A line arrived but could not be parsed, the chip time is unchanged
    Invalid(ParseError),
    /// The line was fine but the clock could not be written
    Unavailable,
}

pub struct TimeSource<R> {
    rtc: R,
    initialized: bool,
    alarm_armed: bool,
}

impl<R: Rtc> TimeSource<R> {
    pub fn new(rtc: R) -> Self {
        TimeSource {
            rtc,
            initialized: false,
            alarm_armed: false,
        }
    }

    /// Probe the chip and mark the session usable
    ///
    /// A stopped oscillator is reported but the time is left as it is; setting
    /// it is up to [`Self::setup_via_serial`] or [`Self::set_time`].
    pub fn begin(&mut self) -> bool {
        if let Err(e) = self.rtc.probe() {
            log::error!("ERROR: DS3231 RTC not found! ({:?})", e);
            log::error!("Check wiring: VCC to 3V3, GND to GND, SDA to D4 (GPIO5), SCL to D9 (GPIO8)");
            self.initialized = false;
            return false;
        }

        match self.rtc.lost_power() {
            Ok(true) => log::warn!("WARNING: RTC lost power, time may be incorrect!"),
            Ok(false) => {}
            Err(e) => log::warn!("Could not read RTC status: {:?}", e),
        }

        self.initialized = true;
        log::info!("RTC initialized successfully");
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn alarm_armed(&self) -> bool {
        self.alarm_armed
    }

    /// Make the chip pull INT low at every `hh:mm:00`
    ///
    /// Both alarms are disabled and their flags cleared first, so calling this
    /// again leaves the registers exactly as one call does.
    pub fn arm_minute_alarm(&mut self) -> bool {
        if !self.initialized {
            return false;
        }

        let result = self
            .rtc
            .disable_alarms()
            .and_then(|_| self.rtc.clear_alarm_flags())
            .and_then(|_| self.rtc.set_alarm_minute_boundary());

        match result {
            Ok(()) => {
                self.alarm_armed = true;
                log::info!("RTC alarm configured for minute-based wake-up");
                true
            }
            Err(e) => {
                log::error!("Failed to configure minute alarm: {:?}", e);
                false
            }
        }
    }

    /// Release the INT line after a wake
    pub fn clear_alarm_flag(&mut self) {
        if !self.initialized {
            return;
        }
        if let Err(e) = self.rtc.clear_alarm_flag(Alarm::One) {
            log::warn!("Failed to clear alarm flag: {:?}", e);
        }
    }

    pub fn alarm_fired(&mut self) -> bool {
        if !self.initialized {
            return false;
        }
        self.rtc.alarm_fired(Alarm::One).unwrap_or_else(|e| {
            log::warn!("Failed to read alarm flag: {:?}", e);
            false
        })
    }

    /// Current time, `None` when the clock is unusable
    pub fn now(&mut self) -> Option<DateTime> {
        if !self.initialized {
            return None;
        }
        match self.rtc.now() {
            Ok(dt) => Some(dt),
            Err(e) => {
                log::warn!("Failed to read RTC time: {:?}", e);
                None
            }
        }
    }

    /// `"6:24 AM"`, or `"6:24"` without the meridiem
    pub fn formatted_time(&mut self, include_ampm: bool) -> String {
        self.now()
            .map(|dt| format_time(dt.hour, dt.minute, include_ampm))
            .unwrap_or_else(|| ERROR_TEXT.to_string())
    }

    /// `"Oct 20"`
    pub fn formatted_date(&mut self) -> String {
        self.now()
            .map(|dt| format_date(dt.month, dt.day))
            .unwrap_or_else(|| ERROR_TEXT.to_string())
    }

    /// Write a new time as given, no validation
    pub fn set_time(&mut self, datetime: DateTime) -> bool {
        if !self.initialized {
            return false;
        }
        match self.rtc.adjust(&datetime) {
            Ok(()) => {
                log::info!("RTC time set to: {}", datetime);
                true
            }
            Err(e) => {
                log::error!("Failed to set RTC time: {:?}", e);
                false
            }
        }
    }

    pub fn current_minute(&mut self) -> u8 {
        self.now().map(|dt| dt.minute).unwrap_or(0)
    }

    pub fn temperature(&mut self) -> f32 {
        if !self.initialized {
            return 0.0;
        }
        self.rtc.temperature().unwrap_or_else(|e| {
            log::warn!("Failed to read RTC temperature: {:?}", e);
            0.0
        })
    }

    /// Offer to set the clock from one serial line within `timeout_ms`
    pub fn setup_via_serial<S, D>(&mut self, serial: &mut S, delay: &mut D, timeout_ms: u32) -> SetupOutcome
    where
        S: SerialRx,
        D: DelayNs,
    {
        log::info!("=== RTC Time Setup ===");
        log::info!("Enter current time in format: YYYY,MM,DD,HH,MM,SS");
        log::info!("Example: 2025,10,20,17,30,0  (Oct 20, 2025, 5:30:00 PM)");
        log::info!("Waiting {} seconds for input...", timeout_ms / 1000);

        let line = match serial::read_line(serial, delay, timeout_ms) {
            Ok(Some(line)) => line,
            Ok(None) => {
                log::info!("Timeout - using current RTC time");
                self.log_current_time();
                return SetupOutcome::TimedOut;
            }
            Err(e) => {
                log::error!("Serial read failed ({:?}) - using current RTC time", e);
                self.log_current_time();
                return SetupOutcome::ReadFailed;
            }
        };

        let datetime = match serial::parse_time_line(&line) {
            Ok(dt) => dt,
            Err(e) => {
                log::warn!("Invalid format ({}) - using current RTC time", e);
                return SetupOutcome::Invalid(e);
            }
        };

        if self.set_time(datetime) {
            log::info!("RTC time set successfully!");
            self.log_current_time();
            SetupOutcome::Set(datetime)
        } else {
            log::error!("Failed to set RTC time");
            SetupOutcome::Unavailable
        }
    }

    fn log_current_time(&mut self) {
        match self.now() {
            Some(dt) => log::info!(
                "Current RTC time: {} {}",
                format_time(dt.hour, dt.minute, true),
                format_date(dt.month, dt.day)
            ),
            None => log::info!("Current RTC time: {}", ERROR_TEXT),
        }
    }
}
