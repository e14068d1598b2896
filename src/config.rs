//! Compile-time configuration
//!
//! Everything here is fixed at build time. The only knob read from the build
//! environment is `WATCHFACE`, which picks the catalog entry shown after boot
//! (for example `WATCHFACE=giraffe1 cargo build --release`).

/// Panel width in pixels
pub const SCREEN_WIDTH: u32 = 200;

/// Panel height in pixels
pub const SCREEN_HEIGHT: u32 = 200;

/// Horizontal gap between time and date in the single line layout
pub const SINGLE_LINE_GUTTER: i32 = 6;

/// How long the startup gate waits for a `YYYY,MM,DD,HH,MM,SS` line
pub const SERIAL_SETUP_TIMEOUT_MS: u32 = 15_000;

/// Sleep between two polls of the serial receiver
pub const SERIAL_POLL_INTERVAL_MS: u32 = 10;

/// Longest accepted serial line, further characters are dropped
pub const SERIAL_LINE_MAX: usize = 64;

/// Every n-th frame uses the slow full waveform to clear partial refresh ghosting
pub const FULL_REFRESH_INTERVAL: u32 = 30;

/// SPI clock for the SSD1681
pub const EPD_SPI_BAUDRATE_HZ: u32 = 4_000_000;

/// I2C clock for the DS3231
pub const RTC_I2C_BAUDRATE_HZ: u32 = 100_000;

/// Upper bound for a single BUSY wait, a full refresh takes about two seconds
pub const EPD_BUSY_TIMEOUT_MS: u32 = 10_000;

/// Compile-time watchface selection, see [`crate::watchface::catalog::selected`]
pub const WATCHFACE: Option<&str> = option_env!("WATCHFACE");

/// How the firmware finds out that a new minute has started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeMode {
    /// Light sleep until the DS3231 pulls its INT line low
    Alarm,
    /// Stay awake and compare the RTC minute every [`MINUTE_POLL_INTERVAL_MS`]
    Poll,
}

/// Wake source used by the firmware loop
pub const WAKE_MODE: WakeMode = WakeMode::Alarm;

/// Interval between RTC reads when [`WakeMode::Poll`] is active
pub const MINUTE_POLL_INTERVAL_MS: u32 = 1_000;
