//! Switch source trait and error types.

use crate::types::RawInputs;

/// Error type for switch reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// A GPIO read failed.
    Pin,
}

/// Source of raw switch readings, sampled once per poll cycle.
///
/// Implementations must not block: a read returns the current line levels
/// immediately. Debouncing is left to the poll interval.
pub trait SwitchSource {
    /// Read every configured switch and return the actuated set.
    fn sample(&mut self) -> Result<RawInputs, InputError>;
}
