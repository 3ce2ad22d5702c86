//! H-pattern shifter to USB HID gamepad firmware for RP2040.
//!
//! The firmware samples the shifter's center-off limit switches every
//! 20 ms, decodes them into gear buttons and reports changes to the host
//! as a 12-button USB HID gamepad.
//!
//! # Hardware Configuration
//!
//! Every switch goes from its GPIO to ground; internal pull-ups are used.
//!
//! | Function            | GPIO | Description |
//! |---------------------|------|-------------|
//! | Front               | 3    | Lever forward (gears 1/3/5) |
//! | Left                | 4    | Left lane (gears 1/2) |
//! | Right               | 5    | Right lane (gears 5/6) |
//! | Back                | 6    | Lever back (gears 2/4/6) |
//! | Reverse             | 7    | Reverse engage request |
//! | Range               | 26   | Handle range switch, also the ADC presence probe |
//! | Split               | 27   | Handle split switch |
//! | Engine brake        | 28   | Handle engine brake button |
//! | Enable reverse      | 11   | Mode switch, read once at boot |
//! | Enable sequential   | 12   | Mode switch, read once at boot |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime:
//!
//! - **USB Task**: Manages the USB device stack
//! - **Shifter Task**: Runs one [`ShifterBridge`](shifter_core::ShifterBridge) cycle every poll interval
//! - **Tick Task** (`heartbeat` only): Runs on an interrupt executor and
//!   advances the shared [`TickCounter`](shifter_core::TickCounter)
//!
//! # Modules
//!
//! - [`board`]: Pin setup, accessory probe, mode switches
//! - [`usb_output`]: USB HID output ([`UsbHidOutput`], [`ShifterReport`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`heartbeat`**: Force a full report every 20 timer ticks
//! - **`packed-report`**: Send one packed report per change instead of per-button updates
//! - **`reverse-interlock`**: Keep gear 1 released while reverse is latched

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features");

// Re-export core types for convenience
pub use shifter_core::{
    AccessoryPins, BoardConfig, BridgeError, Button, ButtonSink, ButtonVector, GearDecoder,
    KeepAlive, LeverPins, ModeFlags, ReportMode, ShifterBridge, SwitchSampler, TickCounter, PICO,
};

pub mod board;
pub mod usb_output;

pub use usb_output::{configure_usb_hid, ShifterReport, UsbHidOutput};
