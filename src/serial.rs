//! Line-oriented serial input for setting the clock
//!
//! The host sends one ASCII line `YYYY,MM,DD,HH,MM,SS` terminated by `\n` or
//! `\r`. Reading is a bounded poll so the watch always boots, with or without
//! a terminal attached.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::config::{SERIAL_LINE_MAX, SERIAL_POLL_INTERVAL_MS};
use crate::rtc::DateTime;

/// Non-blocking byte source
pub trait SerialRx {
    type Error: fmt::Debug;

    /// Next received byte, `None` when nothing is pending
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;
}

/// Collects bytes until a line terminator
///
/// Empty lines (for example the `\n` of a `\r\n` pair) are skipped. Characters
/// past [`SERIAL_LINE_MAX`] are dropped.
#[derive(Debug, Default)]
pub struct LineBuffer {
    line: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        LineBuffer {
            line: String::with_capacity(SERIAL_LINE_MAX),
        }
    }

    /// Feed one byte, returns the finished line on a terminator
    pub fn push(&mut self, byte: u8) -> Option<String> {
        match byte {
            b'\n' | b'\r' => {
                if self.line.is_empty() {
                    None
                } else {
                    Some(core::mem::take(&mut self.line))
                }
            }
            _ => {
                if self.line.len() < SERIAL_LINE_MAX {
                    self.line.push(char::from(byte));
                }
                None
            }
        }
    }

    pub fn pending(&self) -> &str {
        &self.line
    }
}

/// Why a time line was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer than six comma separated fields
    TooFewFields(usize),
    /// Field at this position is not an integer in range for its type
    InvalidField(usize),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::TooFewFields(n) => write!(f, "expected 6 fields, got {}", n),
            ParseError::InvalidField(i) => write!(f, "field {} is not a valid number", i + 1),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse `YYYY,MM,DD,HH,MM,SS`
///
/// Whitespace around fields is allowed and fields after the sixth are ignored.
/// Values are not checked against the calendar.
pub fn parse_time_line(line: &str) -> Result<DateTime, ParseError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 6 {
        return Err(ParseError::TooFewFields(fields.len()));
    }

    let year = fields[0]
        .parse::<u16>()
        .map_err(|_| ParseError::InvalidField(0))?;
    let mut rest = [0u8; 5];
    for (i, slot) in rest.iter_mut().enumerate() {
        *slot = fields[i + 1]
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidField(i + 1))?;
    }
    let [month, day, hour, minute, second] = rest;

    Ok(DateTime::new(year, month, day, hour, minute, second))
}

/// Wait up to `timeout_ms` for one non-empty line
///
/// Drains whatever is pending, then sleeps [`SERIAL_POLL_INTERVAL_MS`]. Returns
/// `Ok(None)` on timeout.
pub fn read_line<S, D>(serial: &mut S, delay: &mut D, timeout_ms: u32) -> Result<Option<String>, S::Error>
where
    S: SerialRx,
    D: DelayNs,
{
    let mut buffer = LineBuffer::new();
    let polls = timeout_ms.div_ceil(SERIAL_POLL_INTERVAL_MS);

    for _ in 0..polls {
        while let Some(byte) = serial.read_byte()? {
            if let Some(line) = buffer.push(byte) {
                return Ok(Some(line));
            }
        }
        delay.delay_ms(SERIAL_POLL_INTERVAL_MS);
    }

    if !buffer.pending().is_empty() {
        log::debug!("Discarding unterminated input {:?}", buffer.pending());
    }
    Ok(None)
}

#[cfg(test)]
pub(crate) mod mock {
    use super::SerialRx;
    use core::convert::Infallible;
    use std::collections::VecDeque;

    use embedded_hal::delay::DelayNs;

    /// Bytes become readable once `after_polls` empty reads have happened
    pub(crate) struct ScriptedSerial {
        bytes: VecDeque<u8>,
        after_polls: usize,
        polls: usize,
    }

    impl ScriptedSerial {
        pub fn new(input: &str) -> Self {
            Self::delayed(input, 0)
        }

        pub fn delayed(input: &str, after_polls: usize) -> Self {
            ScriptedSerial {
                bytes: input.bytes().collect(),
                after_polls,
                polls: 0,
            }
        }

        pub fn silent() -> Self {
            Self::new("")
        }
    }

    impl SerialRx for ScriptedSerial {
        type Error = Infallible;

        fn read_byte(&mut self) -> Result<Option<u8>, Infallible> {
            if self.polls < self.after_polls {
                self.polls += 1;
                return Ok(None);
            }
            Ok(self.bytes.pop_front())
        }
    }

    /// Hands out `input`, then fails every read
    pub(crate) struct FailingSerial {
        bytes: VecDeque<u8>,
    }

    #[derive(Debug, PartialEq)]
    pub(crate) struct RxFault;

    impl FailingSerial {
        pub fn after(input: &str) -> Self {
            FailingSerial {
                bytes: input.bytes().collect(),
            }
        }
    }

    impl SerialRx for FailingSerial {
        type Error = RxFault;

        fn read_byte(&mut self) -> Result<Option<u8>, RxFault> {
            self.bytes.pop_front().map(Some).ok_or(RxFault)
        }
    }

    /// Sums up requested delays instead of sleeping
    #[derive(Default)]
    pub(crate) struct RecordingDelay {
        pub total_ns: u64,
        pub calls: usize,
    }

    impl RecordingDelay {
        pub fn total_ms(&self) -> u64 {
            self.total_ns / 1_000_000
        }
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
            self.calls += 1;
        }
    }
}
