//! Firmware entry point for the XIAO ESP32-S3
//!
//! Wiring is listed in [`epaper_watch::Pins`]. On any other target this binary
//! only prints a hint, the library and the `preview` tool are what runs there.

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("epaper-watch is firmware for the ESP32-S3, build it with the espidf target.");
    eprintln!("On this host try: cargo run --features preview --bin preview");
}

#[cfg(target_os = "espidf")]
mod firmware {
    use anyhow::Context;

    use esp_idf_svc::hal::delay::{Delay, FreeRtos, NON_BLOCK};
    use esp_idf_svc::hal::gpio::{self, Input, InputPin, PinDriver, Pull};
    use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::hal::spi;
    use esp_idf_svc::hal::uart::{self, UartDriver};
    use esp_idf_svc::sys::{
        esp, esp_light_sleep_start, esp_sleep_enable_gpio_wakeup, gpio_int_type_t_GPIO_INTR_LOW_LEVEL,
        gpio_wakeup_enable, EspError,
    };

    use epaper_watch::config::{
        WakeMode, EPD_SPI_BAUDRATE_HZ, FULL_REFRESH_INTERVAL, MINUTE_POLL_INTERVAL_MS,
        RTC_I2C_BAUDRATE_HZ, SERIAL_SETUP_TIMEOUT_MS, WAKE_MODE,
    };
    use epaper_watch::rtc::{Ds3231, TimeSource};
    use epaper_watch::serial::SerialRx;
    use epaper_watch::ssd1681::Ssd1681;
    use epaper_watch::watchface::catalog;
    use epaper_watch::app::start_wake_source;
    use epaper_watch::{Pins, Watch};

    const CONSOLE_BAUDRATE: u32 = 115_200;

    /// UART receiver polled without blocking
    struct UartRx<'d>(UartDriver<'d>);

    impl SerialRx for UartRx<'_> {
        type Error = EspError;

        fn read_byte(&mut self) -> Result<Option<u8>, EspError> {
            let mut byte = [0u8; 1];
            match self.0.read(&mut byte, NON_BLOCK)? {
                0 => Ok(None),
                _ => Ok(Some(byte[0])),
            }
        }
    }

    // https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
    pub fn run() -> anyhow::Result<()> {
        // It is necessary to call this function once. Otherwise some patches to the runtime
        // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
        esp_idf_svc::sys::link_patches();

        // Bind the log crate to the ESP Logging facilities
        esp_idf_svc::log::EspLogger::initialize_default();

        log::info!("E-paper watch starting");

        let peripherals = Peripherals::take().context("Could not take peripherals")?;
        let pins = peripherals.pins;

        // DS3231 on I2C0
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            pins.gpio5, // SDA - Pins::RTC_SDA
            pins.gpio8, // SCL - Pins::RTC_SCL
            &I2cConfig::new().baudrate(RTC_I2C_BAUDRATE_HZ.Hz().into()),
        )
        .context("Could not create I2C driver")?;

        let mut time = TimeSource::new(Ds3231::new(i2c));
        time.begin();

        // One chance to set the clock from a terminal
        let uart = UartDriver::new(
            peripherals.uart0,
            pins.gpio43, // TX - Pins::UART_TX
            pins.gpio44, // RX - Pins::UART_RX
            Option::<gpio::AnyIOPin>::None,
            Option::<gpio::AnyIOPin>::None,
            &uart::config::Config::default().baudrate(CONSOLE_BAUDRATE.Hz()),
        )
        .context("Could not create UART driver")?;
        let mut serial = UartRx(uart);
        let outcome = time.setup_via_serial(&mut serial, &mut FreeRtos, SERIAL_SETUP_TIMEOUT_MS);
        log::info!("Clock setup: {:?}", outcome);

        if time.is_initialized() {
            log::info!("RTC temperature: {:.2} C", time.temperature());
        }

        let mut rtc_int = PinDriver::input(pins.gpio3).context("Failed to set INT pin as input")?; // Pins::RTC_INT
        rtc_int
            .set_pull(Pull::Up)
            .context("Failed to enable INT pull-up")?;

        let wake_mode = start_wake_source(&mut time, WAKE_MODE);
        log::info!("Wake source: {:?}", wake_mode);

        log::info!("Configuring SPI for the e-paper panel");
        let spi = spi::SpiDeviceDriver::new_single(
            peripherals.spi2,
            pins.gpio7,                     // SCK - Pins::EPD_SCK
            pins.gpio9,                     // MOSI - Pins::EPD_MOSI
            Option::<gpio::AnyIOPin>::None, // No MISO needed for display
            Some(pins.gpio2),               // CS - Pins::EPD_CS
            &spi::SpiDriverConfig::new(),
            &spi::SpiConfig::new().baudrate(EPD_SPI_BAUDRATE_HZ.Hz().into()),
        )
        .context("Could not create SPI device driver")?;

        let epd = Ssd1681::new(
            spi,
            PinDriver::input(pins.gpio6).context("Failed to set busy pin as input")?, // Pins::EPD_BUSY
            PinDriver::output(pins.gpio4).context("Failed to set dc pin as output")?, // Pins::EPD_DC
            PinDriver::output(pins.gpio1).context("Failed to set rst pin as output")?, // Pins::EPD_RST
            Delay::default(),
        )
        .map_err(|e| anyhow::anyhow!("Could not create EPD driver: {:?}", e))?;

        let face = catalog::selected();
        log::info!("Watchface: {}", face.name);

        let mut watch = Watch::new(time, epd, face, FULL_REFRESH_INTERVAL);
        if let Err(e) = watch.redraw() {
            log::error!("Initial render failed: {:?}", e);
        }

        loop {
            match wake_mode {
                WakeMode::Alarm => {
                    if let Err(e) = watch.panel_mut().sleep() {
                        log::warn!("Failed to put display to sleep: {:?}", e);
                    }
                    sleep_until_alarm(&rtc_int)?;
                    if let Err(e) = watch.on_wake() {
                        log::error!("Render failed, retrying next minute: {:?}", e);
                    }
                }
                WakeMode::Poll => {
                    FreeRtos::delay_ms(MINUTE_POLL_INTERVAL_MS);
                    if let Err(e) = watch.poll() {
                        log::error!("Render failed, retrying next minute: {:?}", e);
                    }
                }
            }
        }
    }

    /// Light sleep until the DS3231 pulls INT low
    ///
    /// INT is level triggered, an alarm that fired while we were rendering wakes
    /// us right away.
    fn sleep_until_alarm<P: InputPin>(rtc_int: &PinDriver<'_, P, Input>) -> anyhow::Result<()> {
        log::debug!("Light sleep until RTC INT (GPIO{}) goes low", Pins::RTC_INT);
        unsafe {
            esp!(gpio_wakeup_enable(rtc_int.pin(), gpio_int_type_t_GPIO_INTR_LOW_LEVEL))?;
            esp!(esp_sleep_enable_gpio_wakeup())?;
            esp!(esp_light_sleep_start())?;
        }
        Ok(())
    }
}
