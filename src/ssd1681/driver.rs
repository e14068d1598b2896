//! SSD1681 Display Driver Implementation
//!
//! This module contains the main driver implementation for the SSD1681 e-paper display controller.
//! It provides the functions the watch needs: initialization, full and partial updates, and sleep.
//!
//! ## Architecture
//!
//! ### Initialization Functions
//! - `new()` - Create the driver and run the init sequence
//! - `init()` - Hardware reset, software reset and panel configuration
//!
//! ### Display Update Functions
//! - `update_full()` - Write both RAM banks and run the full waveform
//! - `update_partial()` - Write the new image and run the differential waveform
//!
//! ### Power Management
//! - `sleep()` - Power off the analog stage and enter deep sleep mode 1
//!
//! ## Critical Implementation Details
//!
//! ### Two RAM banks
//!
//! `0x24` holds the image to show, `0x26` the image currently on the glass. The partial
//! waveform only drives pixels that differ between the two, so after every update both
//! banks must hold the same picture or the next partial update ghosts.
//!
//! ### Sleep and wake
//!
//! Deep sleep mode 1 keeps RAM content but can only be left through a hardware reset.
//! The next update after `sleep()` therefore runs `init()` first. RAM survives this, so
//! a partial update after wake still has a valid baseline.
//!
//! ### BUSY Pin Wait
//!
//! After `MASTER_ACTIVATE` the controller holds BUSY high until the waveform finished.
//! A full update takes about two seconds, a partial one well under a second.

pub use display_interface::DisplayError;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::display::{EpdPanel, Frame, Refresh};
use crate::ssd1681::interface::DisplayInterface;
use crate::ssd1681::{cmd::Cmd, flag::Flag, BUFFER_SIZE, HEIGHT, WIDTH};

/// SPI transfers are split so no single write blocks the bus for the whole frame
const WRITE_CHUNK_SIZE: usize = 1000;

/// SSD1681 E-Paper Display Driver
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `BSY` - BUSY input pin (HIGH when display is busy)
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for timing
pub struct Ssd1681<SPI, BSY, DC, RST, DELAY> {
    /// The display interface
    pub interface: DisplayInterface<SPI, BSY, DC, RST, DELAY>,
    /// Controller is in deep sleep and needs a reset before the next command
    asleep: bool,
    /// Both RAM banks hold the picture on the glass
    baseline_valid: bool,
}

impl<SPI, BSY, DC, RST, DELAY> Ssd1681<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    /// Create and initialize the display driver
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Result<Self, DisplayError> {
        let interface = DisplayInterface::new(spi, busy, dc, rst, delay);
        let mut ssd1681 = Ssd1681 {
            interface,
            asleep: false,
            baseline_valid: false,
        };
        ssd1681.init()?;
        Ok(ssd1681)
    }

    /// Reset the controller and configure it for the 200x200 panel
    ///
    /// # Initialization Sequence
    ///
    /// 1. **Hardware Reset** - RST pulse
    /// 2. **Software Reset** (0x12) - Reset controller registers, RAM is kept
    /// 3. **Driver Output Control** (0x01) - 200 gate lines
    /// 4. **Border Waveform** (0x3C) - Follow LUT
    /// 5. **Temperature Sensor** (0x18) - Use internal sensor
    /// 6. **Data Entry Mode** and RAM window - full frame, X+ Y+
    pub fn init(&mut self) -> Result<(), DisplayError> {
        log::debug!("SSD1681 init");

        self.interface.reset()?;
        self.interface.wait_busy_low();

        self.interface.cmd(Cmd::SW_RESET)?;
        self.interface.delay.delay_ms(10);
        self.interface.wait_busy_low();

        self.interface.cmd_with_data(
            Cmd::DRIVER_CONTROL,
            &[
                Flag::DRIVER_OUTPUT_MUX_LSB,
                Flag::DRIVER_OUTPUT_MUX_MSB,
                Flag::DRIVER_OUTPUT_GATE_SCAN_FROM_G0,
            ],
        )?;
        self.interface
            .cmd_with_data(Cmd::BORDER_WAVEFORM_CONTROL, &[Flag::BORDER_WAVEFORM_FOLLOW_LUT1])?;
        self.interface
            .cmd_with_data(Cmd::TEMP_CONTROL, &[Flag::INTERNAL_TEMP_SENSOR])?;
        self.use_full_frame()?;

        self.asleep = false;
        Ok(())
    }

    /// Show `buffer` with the full waveform
    ///
    /// Writes the image into both RAM banks so a later partial update has a baseline.
    ///
    /// # Buffer Format
    ///
    /// - Each byte represents 8 horizontal pixels, MSB first
    /// - Total size: (200 / 8) × 200 = 5000 bytes
    /// - bit 1 = white, bit 0 = black
    pub fn update_full(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        self.check_buffer(buffer)?;
        self.wake_if_asleep()?;

        log::info!("Full refresh");
        self.write_ram(Cmd::WRITE_PREVIOUS_DATA, buffer)?;
        self.write_ram(Cmd::WRITE_BW_DATA, buffer)?;
        self.trigger_display_update(Flag::DISPLAY_UPDATE_FULL)?;

        self.baseline_valid = true;
        Ok(())
    }

    /// Show `buffer` with the fast differential waveform
    ///
    /// Falls back to [`Self::update_full`] while the controller has no baseline image,
    /// which is the case for the first frame after power-up.
    pub fn update_partial(&mut self, buffer: &[u8]) -> Result<(), DisplayError> {
        if !self.baseline_valid {
            log::info!("No baseline image in controller RAM, upgrading to full refresh");
            return self.update_full(buffer);
        }
        self.check_buffer(buffer)?;
        self.wake_if_asleep()?;

        log::info!("Partial refresh");
        self.write_ram(Cmd::WRITE_BW_DATA, buffer)?;
        self.trigger_display_update(Flag::DISPLAY_UPDATE_PARTIAL)?;

        // Sync the previous-image bank with what is now on the glass
        self.write_ram(Cmd::WRITE_PREVIOUS_DATA, buffer)?;
        Ok(())
    }

    /// Put device into deep sleep mode to save power
    ///
    /// RAM content is retained, the next update resets and re-initializes the controller.
    pub fn sleep(&mut self) -> Result<(), DisplayError> {
        if self.asleep {
            return Ok(());
        }
        log::debug!("Putting display into deep sleep mode");
        self.trigger_display_update(Flag::POWER_OFF)?;
        self.interface
            .cmd_with_data(Cmd::DEEP_SLEEP_MODE, &[Flag::DEEP_SLEEP_MODE_1])?;
        self.asleep = true;
        Ok(())
    }

    fn wake_if_asleep(&mut self) -> Result<(), DisplayError> {
        if self.asleep {
            log::debug!("Waking display from deep sleep");
            self.init()?;
        }
        Ok(())
    }

    fn check_buffer(&self, buffer: &[u8]) -> Result<(), DisplayError> {
        if buffer.len() != BUFFER_SIZE {
            log::error!(
                "Frame buffer has {} bytes, the panel needs {}",
                buffer.len(),
                BUFFER_SIZE
            );
            return Err(DisplayError::OutOfBoundsError);
        }
        Ok(())
    }

    /// Trigger display update with specified control value and wait for completion
    fn trigger_display_update(&mut self, ctrl2_value: u8) -> Result<(), DisplayError> {
        self.interface
            .cmd_with_data(Cmd::DISPLAY_UPDATE_CTRL2, &[ctrl2_value])?;
        self.interface.cmd(Cmd::MASTER_ACTIVATE)?;
        self.interface.wait_busy_low();
        Ok(())
    }

    /// Point the RAM window and counters at the whole panel
    fn use_full_frame(&mut self) -> Result<(), DisplayError> {
        self.set_ram_area(0, 0, u32::from(WIDTH) - 1, u32::from(HEIGHT) - 1)?;
        self.set_ram_counter(0, 0)
    }

    fn set_ram_area(
        &mut self,
        start_x: u32,
        start_y: u32,
        end_x: u32,
        end_y: u32,
    ) -> Result<(), DisplayError> {
        self.interface
            .cmd_with_data(Cmd::DATA_ENTRY_MODE, &[Flag::DATA_ENTRY_INCRY_INCRX])?;

        // X is addressed in bytes of 8 pixels
        self.interface.cmd_with_data(
            Cmd::SET_RAMX_START_END,
            &[(start_x >> 3) as u8, (end_x >> 3) as u8],
        )?;

        // Y window, little endian
        self.interface.cmd_with_data(
            Cmd::SET_RAMY_START_END,
            &[
                start_y as u8,
                (start_y >> 8) as u8,
                end_y as u8,
                (end_y >> 8) as u8,
            ],
        )?;
        Ok(())
    }

    fn set_ram_counter(&mut self, x: u32, y: u32) -> Result<(), DisplayError> {
        self.interface
            .cmd_with_data(Cmd::SET_RAMX_COUNTER, &[(x >> 3) as u8])?;
        self.interface
            .cmd_with_data(Cmd::SET_RAMY_COUNTER, &[y as u8, (y >> 8) as u8])?;
        Ok(())
    }

    /// Write a whole frame into one RAM bank
    fn write_ram(&mut self, bank: u8, buffer: &[u8]) -> Result<(), DisplayError> {
        self.set_ram_counter(0, 0)?;
        self.interface.cmd(bank)?;
        for chunk in buffer.chunks(WRITE_CHUNK_SIZE) {
            self.interface.data(chunk)?;
        }
        Ok(())
    }
}

impl<SPI, BSY, DC, RST, DELAY> EpdPanel for Ssd1681<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    type Error = DisplayError;

    fn present(&mut self, frame: &Frame, refresh: Refresh) -> Result<(), Self::Error> {
        match refresh {
            Refresh::Full => self.update_full(frame.buffer()),
            Refresh::Partial => self.update_partial(frame.buffer()),
        }
    }
}
