//! Core shifter types: Button, ButtonVector, RawInputs, ModeFlags.

use core::ops::{BitOr, BitXor};

/// Logical button slot reported to the host.
///
/// The discriminant is the HID button index. Host-side profiles bind to
/// these indices, so the order must never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Button {
    Gear1 = 0,
    Gear2 = 1,
    Gear3 = 2,
    Gear4 = 3,
    Gear5 = 4,
    Gear6 = 5,
    GearR = 6,
    Range = 7,
    Split = 8,
    EngineBrake = 9,
    SeqPlus = 10,
    SeqMinus = 11,
}

impl Button {
    /// Number of button slots in every report.
    pub const COUNT: usize = 12;

    /// All slots in HID index order.
    pub const ALL: [Button; Self::COUNT] = [
        Button::Gear1,
        Button::Gear2,
        Button::Gear3,
        Button::Gear4,
        Button::Gear5,
        Button::Gear6,
        Button::GearR,
        Button::Range,
        Button::Split,
        Button::EngineBrake,
        Button::SeqPlus,
        Button::SeqMinus,
    ];

    /// Slots driven by the accessory handle.
    pub const ACCESSORY: [Button; 3] = [Button::Range, Button::Split, Button::EngineBrake];

    /// HID button index (0-based).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Single-bit mask of this slot in a packed report.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> u16 {
        1 << (self as u16)
    }
}

/// Full logical button vector for one cycle, packed as a bitfield.
///
/// Bit `i` holds the state of the button with HID index `i`. Bits above
/// [`Button::COUNT`] are always clear.
///
/// # Example
///
/// ```
/// use shifter_core::{Button, ButtonVector};
///
/// let mut buttons = ButtonVector::NONE;
/// buttons.set(Button::Gear3, true);
/// assert!(buttons.get(Button::Gear3));
/// assert_eq!(buttons.bits(), 0b100);
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonVector(u16);

impl ButtonVector {
    /// Mask of every valid slot.
    pub const MASK: u16 = (1 << Button::COUNT) - 1;

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Build a vector from a packed bitfield, dropping bits past the last slot.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn get(self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }

    #[inline]
    pub fn set(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.0 |= button.mask();
        } else {
            self.0 &= !button.mask();
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of pressed slots.
    #[inline]
    #[must_use]
    pub const fn pressed_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate `(button, pressed)` pairs in HID index order.
    pub fn iter(self) -> impl Iterator<Item = (Button, bool)> {
        Button::ALL.into_iter().map(move |b| (b, self.get(b)))
    }
}

impl From<Button> for ButtonVector {
    fn from(button: Button) -> Self {
        Self(button.mask())
    }
}

impl BitOr for ButtonVector {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitXor for ButtonVector {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

/// Switch readings for one poll cycle, after active-low inversion.
///
/// `true` means the switch is actuated.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawInputs {
    pub front: bool,
    pub left: bool,
    pub right: bool,
    pub back: bool,
    /// Momentary reverse-engage request.
    pub reverse: bool,
    pub range: bool,
    pub split: bool,
    pub engine_brake: bool,
}

impl RawInputs {
    /// Nothing actuated (lever centered, accessory idle).
    pub const IDLE: Self = Self {
        front: false,
        left: false,
        right: false,
        back: false,
        reverse: false,
        range: false,
        split: false,
        engine_brake: false,
    };

    /// True when any of the four base lever switches is actuated.
    #[inline]
    #[must_use]
    pub const fn any_base(&self) -> bool {
        self.front || self.left || self.right || self.back
    }
}

/// Behaviour selected once at startup.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeFlags {
    /// Reverse gear can be engaged.
    pub reverse_enabled: bool,
    /// Central gears also drive the sequential +/- buttons.
    pub sequential_enabled: bool,
    /// Accessory handle (range/split/engine brake) detected at boot.
    pub accessory_present: bool,
}

impl ModeFlags {
    /// Plain H-pattern, no reverse, no accessory.
    pub const H_PATTERN: Self = Self::new(false, false, false);

    #[must_use]
    pub const fn new(reverse_enabled: bool, sequential_enabled: bool, accessory_present: bool) -> Self {
        Self {
            reverse_enabled,
            sequential_enabled,
            accessory_present,
        }
    }

    /// Number of slots that can ever be pressed under this configuration (6-12).
    #[must_use]
    pub const fn live_buttons(&self) -> usize {
        let mut count = 6;
        if self.reverse_enabled {
            count += 1;
        }
        if self.sequential_enabled {
            count += 2;
        }
        if self.accessory_present {
            count += 3;
        }
        count
    }

    /// Whether `button` can ever be pressed under this configuration.
    #[must_use]
    pub const fn is_live(&self, button: Button) -> bool {
        match button {
            Button::GearR => self.reverse_enabled,
            Button::SeqPlus | Button::SeqMinus => self.sequential_enabled,
            Button::Range | Button::Split | Button::EngineBrake => self.accessory_present,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_indices_follow_hid_order() {
        for (i, button) in Button::ALL.iter().enumerate() {
            assert_eq!(button.index(), i);
            assert_eq!(Button::from_index(i), Some(*button));
        }
        assert_eq!(Button::from_index(Button::COUNT), None);
        assert_eq!(Button::GearR.index(), 6);
        assert_eq!(Button::SeqMinus.index(), 11);
    }

    #[test]
    fn test_button_vector_set_clear() {
        let mut buttons = ButtonVector::NONE;
        buttons.set(Button::Split, true);
        assert!(buttons.get(Button::Split));
        assert_eq!(buttons.bits(), 1 << 8);
        buttons.set(Button::Split, false);
        assert!(buttons.is_empty());
    }

    #[test]
    fn test_button_vector_from_bits_masks_unused_slots() {
        let buttons = ButtonVector::from_bits(0xFFFF);
        assert_eq!(buttons.bits(), 0x0FFF);
        assert_eq!(buttons.pressed_count(), 12);
    }

    #[test]
    fn test_button_vector_iter_reports_every_slot() {
        let buttons = ButtonVector::from(Button::Gear1) | ButtonVector::from(Button::SeqPlus);
        let pressed: u32 = buttons.iter().filter(|(_, p)| *p).count() as u32;
        assert_eq!(buttons.iter().count(), Button::COUNT);
        assert_eq!(pressed, 2);
    }

    #[test]
    fn test_live_buttons_range() {
        assert_eq!(ModeFlags::H_PATTERN.live_buttons(), 6);
        assert_eq!(ModeFlags::new(true, true, true).live_buttons(), 12);
        assert_eq!(ModeFlags::new(true, false, false).live_buttons(), 7);
    }

    #[test]
    fn test_is_live_gates_optional_slots() {
        let mode = ModeFlags::new(false, true, false);
        assert!(mode.is_live(Button::Gear4));
        assert!(mode.is_live(Button::SeqMinus));
        assert!(!mode.is_live(Button::GearR));
        assert!(!mode.is_live(Button::Range));
    }

    #[test]
    fn test_raw_inputs_any_base() {
        assert!(!RawInputs::IDLE.any_base());
        let raw = RawInputs {
            reverse: true,
            range: true,
            ..RawInputs::IDLE
        };
        assert!(!raw.any_base());
        let raw = RawInputs {
            right: true,
            ..RawInputs::IDLE
        };
        assert!(raw.any_base());
    }
}
