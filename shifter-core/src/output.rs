//! Button sink trait and error types.

use core::future::Future;

use crate::types::{Button, ButtonVector};

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// USB/communication I/O error.
    Io,
    /// Device not ready (e.g., USB not enumerated).
    NotReady,
}

/// Which transport surface the poll loop drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportMode {
    /// One `set_button` per changed slot.
    #[default]
    PerButton,
    /// One packed report whenever anything changed.
    Packed,
}

/// Async trait for HID button sinks.
///
/// Two surfaces are offered: per-button updates and a raw packed report
/// (bit `i` = HID button `i`). Framing and endpoint handling belong to
/// the implementation.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ButtonSink {
    /// Update a single button.
    fn set_button(
        &mut self,
        button: Button,
        pressed: bool,
    ) -> impl Future<Output = Result<(), OutputError>>;

    /// Send every button at once.
    fn send_report(&mut self, buttons: ButtonVector) -> impl Future<Output = Result<(), OutputError>>;

    /// Check if the output is ready to accept data.
    fn is_ready(&self) -> bool;
}
