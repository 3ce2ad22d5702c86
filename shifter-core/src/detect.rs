//! Startup probes: accessory handle detection and mode switches.
//!
//! Both run exactly once, after the settle delay and before the poll loop
//! starts. Nothing here is re-evaluated at runtime; plugging or unplugging
//! the handle mid-session is not supported.

use embedded_hal::digital::InputPin;

use crate::sampler::actuated;
use crate::types::ModeFlags;

/// Analog window (10-bit scale) the probed line sits in when the handle
/// is plugged in.
///
/// Bounds are exclusive. An absent handle leaves the line at one of the
/// rails, which falls outside the window on both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccessoryWindow {
    pub low: u16,
    pub high: u16,
}

impl AccessoryWindow {
    pub const DEFAULT: Self = Self {
        low: 300,
        high: 600,
    };

    #[inline]
    #[must_use]
    pub const fn contains(&self, level: u16) -> bool {
        level > self.low && level < self.high
    }
}

impl Default for AccessoryWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Rescale a 12-bit ADC sample (0..=4095) to the 10-bit range the window uses.
#[inline]
#[must_use]
pub const fn scale_12_to_10_bit(sample: u16) -> u16 {
    (sample & 0x0FFF) >> 2
}

/// Decide from one 10-bit analog reading whether the accessory handle is present.
#[inline]
#[must_use]
pub fn detect(level: u16, window: &AccessoryWindow) -> bool {
    window.contains(level)
}

/// Read an optional mode switch. A board without the switch, or a line
/// that cannot be read, leaves the feature disabled.
pub fn switch_enabled<P: InputPin>(pin: Option<&mut P>) -> bool {
    pin.map(|p| actuated(p).unwrap_or(false)).unwrap_or(false)
}

/// Assemble the startup mode from the optional mode switches and the
/// accessory probe result.
pub fn read_mode<P: InputPin>(
    reverse_switch: Option<&mut P>,
    sequential_switch: Option<&mut P>,
    accessory_present: bool,
) -> ModeFlags {
    ModeFlags::new(
        switch_enabled(reverse_switch),
        switch_enabled(sequential_switch),
        accessory_present,
    )
}
