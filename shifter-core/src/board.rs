//! Board configuration.
//!
//! One [`BoardConfig`] value describes a physical build: which GPIOs the
//! switches sit on, whether the optional mode switches are fitted and the
//! timing contract of the poll loop. The decoding rules never look at it.

use crate::detect::AccessoryWindow;
use crate::heartbeat::DEFAULT_PERIOD_TICKS;

/// GPIO numbers of every switch line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMap {
    pub front: u8,
    pub left: u8,
    pub right: u8,
    pub back: u8,
    pub reverse: u8,
    /// Also the analog probe line used for accessory detection.
    pub range: u8,
    pub split: u8,
    pub engine_brake: u8,
    /// `None` when the board has no reverse-enable switch.
    pub enable_reverse: Option<u8>,
    /// `None` when the board has no sequential-mode switch.
    pub enable_sequential: Option<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    pub name: &'static str,
    pub pins: PinMap,
    pub accessory_window: AccessoryWindow,
    /// Delay between power-up and the accessory probe.
    pub settle_delay_ms: u64,
    /// Poll period; also the only debounce there is.
    pub poll_interval_ms: u64,
    /// Period of the keep-alive timer tick.
    pub tick_interval_ms: u64,
    /// Ticks between forced reports.
    pub keep_alive_ticks: u32,
}

impl BoardConfig {
    #[inline]
    #[must_use]
    pub const fn has_reverse_switch(&self) -> bool {
        self.pins.enable_reverse.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn has_sequential_switch(&self) -> bool {
        self.pins.enable_sequential.is_some()
    }
}

/// Raspberry Pi Pico (RP2040).
///
/// The range line doubles as the accessory probe, so it sits on an
/// ADC-capable pin (GPIO 26).
pub const PICO: BoardConfig = BoardConfig {
    name: "Raspberry Pi Pico",
    pins: PinMap {
        front: 3,
        left: 4,
        right: 5,
        back: 6,
        reverse: 7,
        range: 26,
        split: 27,
        engine_brake: 28,
        enable_reverse: Some(11),
        enable_sequential: Some(12),
    },
    accessory_window: AccessoryWindow::DEFAULT,
    settle_delay_ms: 2000,
    poll_interval_ms: 20,
    tick_interval_ms: 1,
    keep_alive_ticks: DEFAULT_PERIOD_TICKS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pico_timing_contract() {
        assert_eq!(PICO.poll_interval_ms, 20);
        assert_eq!(PICO.settle_delay_ms, 2000);
        assert_eq!(PICO.keep_alive_ticks, 20);
    }

    #[test]
    fn test_mode_switch_presence() {
        assert!(PICO.has_reverse_switch());
        assert!(PICO.has_sequential_switch());

        let bare = BoardConfig {
            pins: PinMap {
                enable_reverse: None,
                enable_sequential: None,
                ..PICO.pins
            },
            ..PICO
        };
        assert!(!bare.has_reverse_switch());
        assert!(!bare.has_sequential_switch());
    }

    #[test]
    fn test_probe_pin_is_adc_capable() {
        assert!((26..=29).contains(&PICO.pins.range));
    }
}
