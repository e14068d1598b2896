/// Flags and register values for the SSD1681 controller.
///
/// Only the values this driver sends are listed; the datasheet has many more.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Driver Output Control (0x01): gate lines - 1 = 199, LSB then MSB, then scan options
    pub const DRIVER_OUTPUT_MUX_LSB: u8 = 0xC7;
    pub const DRIVER_OUTPUT_MUX_MSB: u8 = 0x00;
    pub const DRIVER_OUTPUT_GATE_SCAN_FROM_G0: u8 = 0x00;

    // Data Entry Mode (0x11) flags
    pub const DATA_ENTRY_INCRY_INCRX: u8 = 0x03; // Y increment, X increment

    // Deep Sleep Mode (0x10) flags
    pub const DEEP_SLEEP_MODE_1: u8 = 0x01; // RAM is retained

    // Temperature Sensor Control (0x18) flags
    pub const INTERNAL_TEMP_SENSOR: u8 = 0x80;

    // Border Waveform Control (0x3C): follow LUT, LUT1
    pub const BORDER_WAVEFORM_FOLLOW_LUT1: u8 = 0x05;

    // Display Update Control 2 (0x22) sequences
    pub const DISPLAY_UPDATE_FULL: u8 = 0xF7; // Clock+analog on, load temp+LUT, display mode 1, power off
    pub const DISPLAY_UPDATE_PARTIAL: u8 = 0xFC; // Clock+analog on, display mode 2, stay powered
    pub const POWER_OFF: u8 = 0x83;
}
