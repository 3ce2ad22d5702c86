//! GPIO-backed switch sampler.
//!
//! Every switch is wired between its GPIO and ground with the internal
//! pull-up enabled, so an electrically low line means "actuated".

use embedded_hal::digital::InputPin;

use crate::input::{InputError, SwitchSource};
use crate::types::RawInputs;

/// The five lever switches every shifter has.
pub struct LeverPins<P> {
    pub front: P,
    pub left: P,
    pub right: P,
    pub back: P,
    pub reverse: P,
}

/// Accessory handle lines, only wired up once the handle was detected.
pub struct AccessoryPins<P> {
    pub range: P,
    pub split: P,
    pub engine_brake: P,
}

/// Reads the lever (and optionally accessory) switches each cycle.
pub struct SwitchSampler<P> {
    lever: LeverPins<P>,
    accessory: Option<AccessoryPins<P>>,
}

impl<P: InputPin> SwitchSampler<P> {
    /// Sampler without accessory lines; accessory inputs always read idle.
    #[must_use]
    pub fn new(lever: LeverPins<P>) -> Self {
        Self {
            lever,
            accessory: None,
        }
    }

    #[must_use]
    pub fn with_accessory(lever: LeverPins<P>, accessory: AccessoryPins<P>) -> Self {
        Self {
            lever,
            accessory: Some(accessory),
        }
    }
}

impl<P: InputPin> SwitchSource for SwitchSampler<P> {
    fn sample(&mut self) -> Result<RawInputs, InputError> {
        let mut raw = RawInputs {
            front: actuated(&mut self.lever.front)?,
            left: actuated(&mut self.lever.left)?,
            right: actuated(&mut self.lever.right)?,
            back: actuated(&mut self.lever.back)?,
            reverse: actuated(&mut self.lever.reverse)?,
            ..RawInputs::IDLE
        };

        if let Some(accessory) = self.accessory.as_mut() {
            raw.range = actuated(&mut accessory.range)?;
            raw.split = actuated(&mut accessory.split)?;
            raw.engine_brake = actuated(&mut accessory.engine_brake)?;
        }

        Ok(raw)
    }
}

/// Active-low read of a pulled-up line.
#[inline]
pub fn actuated<P: InputPin>(pin: &mut P) -> Result<bool, InputError> {
    pin.is_low().map_err(|_| InputError::Pin)
}
