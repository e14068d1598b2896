//! DS3231 Real-Time Clock Driver
//!
//! Register-level driver over `embedded_hal::i2c::I2c`.
//! - I2C address: 0x68
//! - Time and date: BCD registers 0x00..=0x06, written in 24 hour mode
//! - Alarm 1: registers 0x07..=0x0A, mask bit 7 of each byte (A1M1..A1M4)
//! - Control 0x0E (INTCN, A2IE, A1IE), status 0x0F (OSF, A2F, A1F)
//! - Temperature: 0x11 (signed integer part) and 0x12 (quarter degrees in bits 7:6)

use embedded_hal::i2c::I2c;

use super::{Alarm, DateTime, Error, Rtc};

/// Fixed I2C address of the DS3231
pub const ADDRESS: u8 = 0x68;

/// Register addresses
pub mod registers {
    pub const SECONDS: u8 = 0x00;
    pub const ALARM1_SECONDS: u8 = 0x07;
    pub const CONTROL: u8 = 0x0E;
    pub const STATUS: u8 = 0x0F;
    pub const TEMP_MSB: u8 = 0x11;
}

/// Control and status register bits
pub mod bits {
    /// Control: alarms drive INT instead of the square wave output
    pub const INTCN: u8 = 0x04;
    /// Control: square wave rate select
    pub const RS_MASK: u8 = 0x18;
    /// Status: oscillator stopped since the flag was last cleared
    pub const OSF: u8 = 0x80;
    /// Hours: 12 hour mode
    pub const HOUR_12H: u8 = 0x40;
    /// Hours: PM in 12 hour mode
    pub const HOUR_PM: u8 = 0x20;
    /// Alarm byte: ignore this field when matching
    pub const ALARM_MASK: u8 = 0x80;
}

/// DS3231 driver owning its I2C bus
pub struct Ds3231<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds3231<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Ds3231 { i2c }
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(ADDRESS, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(ADDRESS, &[reg, value]).map_err(Error::I2c)
    }

    fn update_register(
        &mut self,
        reg: u8,
        f: impl FnOnce(u8) -> u8,
    ) -> Result<(), Error<I2C::Error>> {
        let value = self.read_register(reg)?;
        self.write_register(reg, f(value))
    }
}

impl<I2C: I2c> Rtc for Ds3231<I2C> {
    type Error = Error<I2C::Error>;

    fn probe(&mut self) -> Result<(), Self::Error> {
        self.read_register(registers::STATUS).map(|_| ())
    }

    fn lost_power(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read_register(registers::STATUS)? & bits::OSF != 0)
    }

    fn now(&mut self) -> Result<DateTime, Self::Error> {
        let mut buf = [0u8; 7];
        self.i2c
            .write_read(ADDRESS, &[registers::SECONDS], &mut buf)
            .map_err(Error::I2c)?;

        Ok(DateTime {
            second: bcd_to_dec(buf[0] & 0x7F),
            minute: bcd_to_dec(buf[1] & 0x7F),
            hour: decode_hour(buf[2]),
            // buf[3] is the weekday, derived data
            day: bcd_to_dec(buf[4] & 0x3F),
            month: bcd_to_dec(buf[5] & 0x1F),
            year: 2000 + u16::from(bcd_to_dec(buf[6])),
        })
    }

    fn adjust(&mut self, dt: &DateTime) -> Result<(), Self::Error> {
        let weekday = match day_of_week(dt.year, dt.month, dt.day) {
            0 => 7,
            d => d,
        };
        let frame = [
            registers::SECONDS,
            dec_to_bcd(dt.second),
            dec_to_bcd(dt.minute),
            dec_to_bcd(dt.hour),
            dec_to_bcd(weekday),
            dec_to_bcd(dt.day),
            dec_to_bcd(dt.month),
            dec_to_bcd((dt.year % 100) as u8),
        ];
        self.i2c.write(ADDRESS, &frame).map_err(Error::I2c)?;

        self.update_register(registers::STATUS, |s| s & !bits::OSF)
    }

    fn set_alarm_minute_boundary(&mut self) -> Result<(), Self::Error> {
        // A1M1 = 0 (seconds must match 00), A1M2..A1M4 = 1 (don't care)
        let frame = [
            registers::ALARM1_SECONDS,
            0x00,
            bits::ALARM_MASK,
            bits::ALARM_MASK,
            bits::ALARM_MASK | 0x01,
        ];
        self.i2c.write(ADDRESS, &frame).map_err(Error::I2c)?;

        self.update_register(registers::CONTROL, |c| {
            (c & !bits::RS_MASK) | bits::INTCN | Alarm::One.mask()
        })
    }

    fn disable_alarms(&mut self) -> Result<(), Self::Error> {
        self.update_register(registers::CONTROL, |c| {
            c & !(Alarm::One.mask() | Alarm::Two.mask())
        })
    }

    fn clear_alarm_flags(&mut self) -> Result<(), Self::Error> {
        self.update_register(registers::STATUS, |s| {
            s & !(Alarm::One.mask() | Alarm::Two.mask())
        })
    }

    fn clear_alarm_flag(&mut self, alarm: Alarm) -> Result<(), Self::Error> {
        self.update_register(registers::STATUS, |s| s & !alarm.mask())
    }

    fn alarm_fired(&mut self, alarm: Alarm) -> Result<bool, Self::Error> {
        Ok(self.read_register(registers::STATUS)? & alarm.mask() != 0)
    }

    fn temperature(&mut self) -> Result<f32, Self::Error> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(ADDRESS, &[registers::TEMP_MSB], &mut buf)
            .map_err(Error::I2c)?;
        Ok(f32::from(buf[0] as i8) + f32::from(buf[1] >> 6) * 0.25)
    }
}

fn bcd_to_dec(bcd: u8) -> u8 {
    ((bcd >> 4) * 10) + (bcd & 0x0F)
}

/// Values above 99 do not fit BCD and wrap like the register would
fn dec_to_bcd(value: u8) -> u8 {
    let v = u16::from(value);
    (v + 6 * (v / 10)) as u8
}

fn decode_hour(raw: u8) -> u8 {
    if raw & bits::HOUR_12H != 0 {
        let hour = bcd_to_dec(raw & 0x1F) % 12;
        if raw & bits::HOUR_PM != 0 {
            hour + 12
        } else {
            hour
        }
    } else {
        bcd_to_dec(raw & 0x3F)
    }
}

/// Sakamoto's method, 0 = Sunday
///
/// Out-of-range months are clamped so unvalidated input cannot index past the table.
fn day_of_week(year: u16, month: u8, day: u8) -> u8 {
    const OFFSETS: [u32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let month = month.clamp(1, 12);
    let mut y = u32::from(year);
    if month < 3 {
        y = y.saturating_sub(1);
    }
    ((y + y / 4 - y / 100 + y / 400 + OFFSETS[usize::from(month - 1)] + u32::from(day)) % 7) as u8
}
