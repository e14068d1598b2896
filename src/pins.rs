//! Pin definitions for the XIAO ESP32-S3 wiring
//!
//! This module contains all GPIO pin assignments used in the hardware configuration.
//! The silkscreen labels (D0..D10) are noted next to the GPIO numbers.

/// Pin configuration constants for the e-paper display, the RTC and the serial console
pub struct Pins;

impl Pins {
    // SPI Display pins
    /// Chip Select pin for SPI display (D1)
    pub const EPD_CS: u8 = 2;
    /// Data/Command control pin, high for data, low for command (D3)
    pub const EPD_DC: u8 = 4;
    /// Reset pin for display (D0)
    pub const EPD_RST: u8 = 1;
    /// Busy status pin, high while the display is busy (D5)
    pub const EPD_BUSY: u8 = 6;
    /// SPI Clock pin (D8)
    pub const EPD_SCK: u8 = 7;
    /// SPI Master Out Slave In (D10)
    pub const EPD_MOSI: u8 = 9;

    // DS3231 pins
    /// I2C data (D4)
    pub const RTC_SDA: u8 = 5;
    /// I2C clock (D9)
    pub const RTC_SCL: u8 = 8;
    /// Open drain alarm output, pulled low while an alarm flag is set (D2)
    pub const RTC_INT: u8 = 3;

    // Serial console used for the one-time clock setup
    /// UART0 transmit
    pub const UART_TX: u8 = 43;
    /// UART0 receive
    pub const UART_RX: u8 = 44;
}
