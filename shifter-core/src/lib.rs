//! Platform-agnostic H-shifter decoding and HID change reporting.
//!
//! This crate holds all the policy of the shifter firmware without any
//! platform-specific dependencies. It can be used both in embedded
//! `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! One poll cycle flows through the modules in this order:
//!
//! - [`sampler`]: GPIO switches to [`RawInputs`] ([`SwitchSampler`])
//! - [`decoder`]: [`RawInputs`] to a [`ButtonVector`], tracking the [`ReverseLatch`]
//! - [`differ`]: changed slots against the last report ([`OutputDiffer`])
//! - [`output`]: HID sink trait ([`ButtonSink`])
//! - [`bridge`]: runs the cycle end to end ([`ShifterBridge`])
//!
//! Startup-only pieces live in [`detect`] (accessory probe, mode switches)
//! and [`board`] ([`BoardConfig`]). [`heartbeat`] provides the tick counter
//! and keep-alive policy for the timer-driven variant.
//!
//! # Button order
//!
//! | idx | button | idx | button |
//! |-----|--------|-----|--------|
//! | 0 | gear 1 | 6 | reverse |
//! | 1 | gear 2 | 7 | range |
//! | 2 | gear 3 | 8 | split |
//! | 3 | gear 4 | 9 | engine brake |
//! | 4 | gear 5 | 10 | sequential + |
//! | 5 | gear 6 | 11 | sequential - |
//!
//! # Example
//!
//! ```rust
//! use shifter_core::{decode, Button, ModeFlags, RawInputs, ReverseLatch};
//!
//! let mode = ModeFlags::new(true, false, false);
//! let mut latch = ReverseLatch::Disarmed;
//!
//! // Lever pushed forward in the left lane
//! let raw = RawInputs { front: true, left: true, ..RawInputs::IDLE };
//! let buttons = decode(&raw, &mode, &mut latch);
//! assert!(buttons.get(Button::Gear1));
//! assert!(!buttons.get(Button::Gear3));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod board;
pub mod bridge;
pub mod decoder;
pub mod detect;
pub mod differ;
pub mod heartbeat;
pub mod input;
pub mod output;
pub mod sampler;
pub mod types;

// Re-export main types at crate root
pub use board::{BoardConfig, PinMap, PICO};
pub use bridge::{BridgeError, CycleReport, ShifterBridge};
pub use decoder::{decode, GearDecoder, ReverseLatch};
pub use detect::{detect, read_mode, scale_12_to_10_bit, AccessoryWindow};
pub use differ::{report, ButtonChange, ButtonChanges, OutputDiffer};
pub use heartbeat::{KeepAlive, TickCounter};
pub use input::{InputError, SwitchSource};
pub use output::{ButtonSink, OutputError, ReportMode};
pub use sampler::{AccessoryPins, LeverPins, SwitchSampler};
pub use types::{Button, ButtonVector, ModeFlags, RawInputs};
