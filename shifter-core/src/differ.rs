//! Change-only reporting against the last vector sent to the host.

use core::iter::FusedIterator;

use crate::types::{Button, ButtonVector, ModeFlags};

/// One slot whose value differs from the previous report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonChange {
    pub button: Button,
    pub pressed: bool,
}

/// Lazy, ascending sequence of changed slots.
///
/// The comparison is done up front; iteration only walks the set bits of
/// the change mask.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct ButtonChanges {
    pending: u16,
    values: ButtonVector,
}

impl ButtonChanges {
    /// A sequence with nothing in it.
    pub const EMPTY: Self = Self {
        pending: 0,
        values: ButtonVector::NONE,
    };

    /// Changes needed to go from `prev` to `new`.
    #[inline]
    pub fn between(prev: ButtonVector, new: ButtonVector) -> Self {
        Self {
            pending: (prev ^ new).bits(),
            values: new,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pending == 0
    }

    /// Packed mask of the slots still to be yielded.
    #[inline]
    #[must_use]
    pub const fn mask(&self) -> u16 {
        self.pending
    }
}

impl Iterator for ButtonChanges {
    type Item = ButtonChange;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending == 0 {
            return None;
        }
        let index = self.pending.trailing_zeros() as usize;
        self.pending &= self.pending - 1;
        let button = Button::from_index(index)?;
        Some(ButtonChange {
            button,
            pressed: self.values.get(button),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.pending.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ButtonChanges {}

impl FusedIterator for ButtonChanges {}

/// Compare `new` against `prev`, then commit `new` into `prev`.
///
/// `prev` is overwritten whether or not anything changed.
pub fn report(new: ButtonVector, prev: &mut ButtonVector) -> ButtonChanges {
    let changes = ButtonChanges::between(*prev, new);
    *prev = new;
    changes
}

/// Owns the last reported vector for the poll loop.
#[derive(Clone, Debug, Default)]
pub struct OutputDiffer {
    prev: ButtonVector,
}

impl OutputDiffer {
    /// Start from "nothing pressed", which is what the host assumes after enumeration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            prev: ButtonVector::NONE,
        }
    }

    #[inline]
    #[must_use]
    pub fn previous(&self) -> ButtonVector {
        self.prev
    }

    pub fn report(&mut self, new: ButtonVector) -> ButtonChanges {
        report(new, &mut self.prev)
    }

    /// Replace the committed vector with what the host actually holds.
    ///
    /// Used after a failed send so that exactly the undelivered changes
    /// are produced again next cycle.
    pub fn restore(&mut self, prev: ButtonVector) {
        self.prev = prev;
    }

    /// Updates to send once before the first cycle.
    ///
    /// Without the accessory handle its three slots are pinned to released;
    /// they are announced once here and never change afterwards.
    pub fn initial_report(mode: &ModeFlags) -> ButtonChanges {
        if mode.accessory_present {
            return ButtonChanges::EMPTY;
        }
        let pinned = Button::ACCESSORY
            .into_iter()
            .map(ButtonVector::from)
            .fold(ButtonVector::NONE, |acc, b| acc | b);
        ButtonChanges {
            pending: pinned.bits(),
            values: ButtonVector::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    fn changes(iter: ButtonChanges) -> Vec<(usize, bool)> {
        iter.map(|c| (c.button.index(), c.pressed)).collect()
    }

    #[test]
    fn test_reports_only_changed_slots_in_order() {
        let mut prev = ButtonVector::from(Button::Gear3) | ButtonVector::from(Button::Split);
        let new = ButtonVector::from(Button::Gear1) | ButtonVector::from(Button::Split);

        let out = changes(report(new, &mut prev));
        assert_eq!(out, [(0, true), (2, false)]);
        assert_eq!(prev, new);
    }

    #[test]
    fn test_same_vector_twice_is_empty_second_time() {
        let mut differ = OutputDiffer::new();
        let v = ButtonVector::from(Button::Gear4) | ButtonVector::from(Button::SeqPlus);

        assert_eq!(differ.report(v).len(), 2);
        let second = differ.report(v);
        assert!(second.is_empty());
        assert_eq!(second.count(), 0);
    }

    #[test]
    fn test_prev_committed_even_without_changes() {
        let mut prev = ButtonVector::from(Button::Gear5);
        let out = report(prev, &mut prev);
        assert!(out.is_empty());
        assert_eq!(prev, ButtonVector::from(Button::Gear5));
    }

    #[test]
    fn test_restore_replays_changes() {
        let mut differ = OutputDiffer::new();
        let snapshot = differ.previous();
        let v = ButtonVector::from(Button::GearR);

        assert_eq!(differ.report(v).len(), 1);
        differ.restore(snapshot);
        assert_eq!(changes(differ.report(v)), [(6, true)]);
    }

    #[test]
    fn test_restore_partial_delivery_replays_only_the_rest() {
        let mut differ = OutputDiffer::new();
        let snapshot = differ.previous();
        let v = ButtonVector::from(Button::Gear3) | ButtonVector::from(Button::SeqMinus);

        let mut delivered = snapshot;
        let first = differ.report(v).next().unwrap();
        delivered.set(first.button, first.pressed);
        differ.restore(delivered);

        assert_eq!(changes(differ.report(ButtonVector::NONE)), [(2, false)]);
    }

    #[test]
    fn test_size_hint_is_exact() {
        let mut iter = ButtonChanges::between(ButtonVector::NONE, ButtonVector::from_bits(0b1011));
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }

    #[test]
    fn test_initial_report_without_accessory() {
        let out = changes(OutputDiffer::initial_report(&ModeFlags::H_PATTERN));
        assert_eq!(out, [(7, false), (8, false), (9, false)]);
    }

    #[test]
    fn test_initial_report_with_accessory_is_empty() {
        assert!(OutputDiffer::initial_report(&ModeFlags::new(false, false, true)).is_empty());
    }
}
