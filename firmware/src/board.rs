//! Startup wiring for the Pico build: pull-ups, accessory probe, mode switches.

use defmt::{debug, info, warn};
use embassy_rp::adc::{Adc, AdcPin, Async, Channel};
use embassy_rp::gpio::{Input, Pin, Pull};
use embassy_rp::Peri;
use shifter_core::{detect, read_mode, scale_12_to_10_bit, AccessoryWindow, BoardConfig, ModeFlags};

/// Configure a switch line as a pulled-up input (switch to ground).
pub fn pull_up(pin: Peri<'static, impl Pin>) -> Input<'static> {
    Input::new(pin, Pull::Up)
}

/// Sample the accessory probe line once and decide whether the handle is plugged in.
///
/// The pin is only borrowed: once this returns the caller reconfigures it
/// as a regular digital input. A failed conversion counts as "absent".
pub async fn probe_accessory<'p>(
    adc: &mut Adc<'_, Async>,
    pin: Peri<'p, impl AdcPin + 'p>,
    window: &AccessoryWindow,
) -> bool {
    let mut channel = Channel::new_pin(pin, Pull::None);
    match adc.read(&mut channel).await {
        Ok(sample) => {
            let level = scale_12_to_10_bit(sample);
            debug!("Accessory probe: raw={} level={}", sample, level);
            detect(level, window)
        }
        Err(_) => {
            warn!("Accessory probe conversion failed, assuming no handle");
            false
        }
    }
}

/// Read the mode switches the board has fitted; missing ones read as disabled.
pub fn read_mode_switches(
    board: &BoardConfig,
    reverse: &mut Input<'_>,
    sequential: &mut Input<'_>,
    accessory_present: bool,
) -> ModeFlags {
    read_mode(
        board.has_reverse_switch().then_some(reverse),
        board.has_sequential_switch().then_some(sequential),
        accessory_present,
    )
}

/// Log the startup configuration.
pub fn log_mode(mode: &ModeFlags) {
    if mode.accessory_present {
        info!("OK: Handle detected");
    } else {
        info!("INFO: Truck shifter handle not connected");
    }
    if mode.reverse_enabled {
        info!("OK: Reverse gear is enabled");
    } else {
        info!("INFO: Reverse gear is disabled");
    }
    if mode.sequential_enabled {
        info!("OK: The current gear output is sequential");
    } else {
        info!("INFO: The current gear output is H-shifter");
    }
    info!("{} live buttons", mode.live_buttons());
}
