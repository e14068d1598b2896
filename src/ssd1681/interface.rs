//! Display interface using SPI
use display_interface::DisplayError;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use crate::config::EPD_BUSY_TIMEOUT_MS;

const RESET_DELAY_MS: u32 = 10;
const BUSY_POLL_MS: u32 = 1;

/// The connection to the SSD1681: SPI plus the three control lines
///
pub struct DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// SPI device
    spi: SPI,
    /// High for busy, Wait until display is ready!
    busy: BSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting
    rst: RST,
    /// Delay provider for reset pulses and busy polling
    pub delay: DELAY,
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY> {
    /// Create the interface, no bus traffic happens here
    pub fn new(spi: SPI, busy: BSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            delay,
        }
    }
}

impl<SPI, BSY, DC, RST, DELAY> DisplayInterface<SPI, BSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    RST: OutputPin,
    DC: OutputPin,
    BSY: InputPin,
    DELAY: DelayNs,
{
    /// Basic function for sending commands
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;

        // Transfer the command over spi with error handling
        match self.spi.write(&[command]) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("SPI write error for command 0x{:02X}: {:?}", command, e);
                Err(DisplayError::BusWriteError)
            }
        }
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(data)
            .map_err(|_| DisplayError::BusWriteError)
    }

    /// Basic function for sending a command and the data belonging to it.
    pub(crate) fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Wait for busy pin to go LOW, giving up after [`EPD_BUSY_TIMEOUT_MS`]
    ///
    /// Returns `false` on timeout. The caller keeps going either way; a stuck BUSY line
    /// shows up as a stale picture rather than a hung watch.
    pub fn wait_busy_low(&mut self) -> bool {
        let max_attempts = EPD_BUSY_TIMEOUT_MS / BUSY_POLL_MS;

        for _ in 0..max_attempts {
            match self.busy.is_high() {
                Ok(false) => return true,
                Ok(true) => self.delay.delay_ms(BUSY_POLL_MS),
                Err(_) => {
                    // Error reading pin - bail out to avoid infinite loop
                    log::error!("Error reading BUSY pin state - assuming not busy to continue");
                    return true;
                }
            }
        }

        log::error!(
            "Timeout waiting for BUSY pin to go LOW after {} ms",
            EPD_BUSY_TIMEOUT_MS
        );
        false
    }

    /// Hardware reset pulse on the RST line
    pub(crate) fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }
}
