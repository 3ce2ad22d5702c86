//! Gear decoding and the reverse latch.
//!
//! The lever closes up to two of four center-off switches at a time:
//!
//! ```text
//!        1   3   5          front
//!        |   |   |
//!  left -+---+---+- right
//!        |   |   |
//!        2   4   6          back
//! ```
//!
//! The side gears are switch pairs, the middle gears are a lone front or
//! back switch. Rules are evaluated in a fixed order and a side gear
//! "claims" the front/back switch it uses, so the middle gear on that end
//! cannot fire in the same cycle. The order is the tie-break for
//! impossible combinations (front+left+right yields gear 1, not gear 5)
//! and must not be reordered.

use crate::types::{Button, ButtonVector, ModeFlags, RawInputs};

/// Reverse latch state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReverseLatch {
    #[default]
    Disarmed,
    Armed,
}

impl ReverseLatch {
    #[inline]
    #[must_use]
    pub const fn is_armed(self) -> bool {
        matches!(self, ReverseLatch::Armed)
    }
}

/// Decode one cycle of raw inputs into the logical button vector.
///
/// Arms `latch` when reverse is engaged and disarms it once the lever
/// returns to neutral. The latch is not consulted by the rules themselves.
pub fn decode(raw: &RawInputs, mode: &ModeFlags, latch: &mut ReverseLatch) -> ButtonVector {
    decode_with(raw, mode, latch, false)
}

fn decode_with(
    raw: &RawInputs,
    mode: &ModeFlags,
    latch: &mut ReverseLatch,
    reverse_interlock: bool,
) -> ButtonVector {
    let mut out = ButtonVector::NONE;
    let mut front_claimed = false;
    let mut back_claimed = false;

    // Side gears
    if raw.front && raw.left {
        // An armed interlock hands the position to reverse but still claims front.
        out.set(Button::Gear1, !(reverse_interlock && latch.is_armed()));
        front_claimed = true;
    }
    if raw.left && raw.back {
        out.set(Button::Gear2, true);
        back_claimed = true;
    }
    if raw.front && raw.right && !front_claimed {
        out.set(Button::Gear5, true);
        front_claimed = true;
    }
    if raw.right && raw.back && !back_claimed {
        out.set(Button::Gear6, true);
        back_claimed = true;
    }

    // Sequential duplicates the middle lane, it does not replace it.
    if mode.sequential_enabled {
        if raw.front && !front_claimed {
            out.set(Button::SeqMinus, true);
        }
        if raw.back && !back_claimed {
            out.set(Button::SeqPlus, true);
        }
    }

    // Middle gears
    if raw.front && !front_claimed {
        out.set(Button::Gear3, true);
    }
    if raw.back && !back_claimed {
        out.set(Button::Gear4, true);
    }

    if mode.reverse_enabled && raw.reverse && raw.left && raw.front {
        out.set(Button::GearR, true);
        *latch = ReverseLatch::Armed;
    }

    if !raw.any_base() {
        *latch = ReverseLatch::Disarmed;
    }

    if mode.accessory_present {
        out.set(Button::Range, raw.range);
        out.set(Button::Split, raw.split);
        out.set(Button::EngineBrake, raw.engine_brake);
    }

    out
}

/// Stateful decoder owning the mode and the reverse latch for the poll loop.
#[derive(Clone, Debug)]
pub struct GearDecoder {
    mode: ModeFlags,
    latch: ReverseLatch,
    reverse_interlock: bool,
}

impl GearDecoder {
    #[must_use]
    pub const fn new(mode: ModeFlags) -> Self {
        Self {
            mode,
            latch: ReverseLatch::Disarmed,
            reverse_interlock: false,
        }
    }

    /// Suppress gear 1 while the reverse latch is armed.
    ///
    /// Reverse shares the front+left position with gear 1; with the
    /// interlock on, only the first cycle of a reverse engagement also
    /// shows gear 1. The front switch stays claimed while gear 1 is held
    /// back, so a latched reverse never reads as gear 3 (or sequential
    /// minus) instead.
    #[must_use]
    pub const fn with_reverse_interlock(mut self, enabled: bool) -> Self {
        self.reverse_interlock = enabled;
        self
    }

    pub fn decode(&mut self, raw: &RawInputs) -> ButtonVector {
        decode_with(raw, &self.mode, &mut self.latch, self.reverse_interlock)
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> &ModeFlags {
        &self.mode
    }

    #[inline]
    #[must_use]
    pub fn latch(&self) -> ReverseLatch {
        self.latch
    }
}
