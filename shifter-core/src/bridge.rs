//! ShifterBridge: one poll cycle from switches to the HID sink.

use core::future::Future;

use crate::decoder::GearDecoder;
use crate::differ::{ButtonChanges, OutputDiffer};
use crate::heartbeat::{KeepAlive, TickCounter};
use crate::input::{InputError, SwitchSource};
use crate::output::{ButtonSink, OutputError, ReportMode};
use crate::types::ButtonVector;

/// Runs sample -> decode -> diff -> send, one cycle per call.
///
/// [`run`](Self::run) loops forever with caller-supplied pacing. Single
/// cycles are available through [`run_cycle`](Self::run_cycle),
/// [`process_one`](Self::process_one) and [`process_at`](Self::process_at).
///
/// # Error Handling
///
/// A failed send drops the rest of the report. The differ keeps exactly
/// the changes the sink accepted, so only the undelivered ones are retried
/// on the next cycle. A failed switch read skips the cycle entirely and
/// leaves the last report standing.
pub struct ShifterBridge<S, O> {
    source: S,
    output: O,
    decoder: GearDecoder,
    differ: OutputDiffer,
    mode: ReportMode,
    keep_alive: Option<KeepAlive>,
    ticks: Option<&'static TickCounter>,
    announced: bool,
}

/// What a cycle sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Decoded vector for this cycle.
    pub buttons: ButtonVector,
    /// Number of slots that changed.
    pub changed: usize,
    /// A keep-alive report was forced.
    pub forced: bool,
}

impl<S: SwitchSource, O: ButtonSink> ShifterBridge<S, O> {
    /// Create a new bridge from a switch source, a sink and the startup decoder.
    pub fn new(source: S, output: O, decoder: GearDecoder) -> Self {
        Self {
            source,
            output,
            decoder,
            differ: OutputDiffer::new(),
            mode: ReportMode::PerButton,
            keep_alive: None,
            ticks: None,
            announced: false,
        }
    }

    #[must_use]
    pub fn with_report_mode(mut self, mode: ReportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Force a full report whenever the keep-alive falls due on `ticks`.
    ///
    /// Only [`run_cycle`](Self::run_cycle) and [`run`](Self::run) read
    /// `ticks`; [`process_at`](Self::process_at) takes the time explicitly.
    #[must_use]
    pub fn with_keep_alive(mut self, keep_alive: KeepAlive, ticks: &'static TickCounter) -> Self {
        self.keep_alive = Some(keep_alive);
        self.ticks = Some(ticks);
        self
    }

    /// Announce the slots that are fixed for this session.
    ///
    /// If this fails the next cycle tries again before sampling.
    pub async fn start(&mut self) -> Result<usize, BridgeError> {
        let changes = OutputDiffer::initial_report(self.decoder.mode());
        let count = changes.len();
        if count > 0 {
            let values = self.differ.previous();
            let mut delivered = values;
            self.emit(changes, values, &mut delivered)
                .await
                .map_err(BridgeError::Output)?;
        }
        self.announced = true;
        Ok(count)
    }

    /// Run the bridge forever.
    ///
    /// `pace` sees every cycle result and returns the future to await
    /// before the next one (the poll interval).
    pub async fn run<F, P>(&mut self, mut pace: F) -> !
    where
        F: FnMut(Result<CycleReport, BridgeError>) -> P,
        P: Future<Output = ()>,
    {
        loop {
            let result = self.run_cycle().await;
            pace(result).await;
        }
    }

    /// Run one cycle, reading the keep-alive clock if one is attached.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, BridgeError> {
        match self.ticks {
            Some(ticks) => self.process_at(ticks.now()).await,
            None => self.process_one().await,
        }
    }

    /// Run one cycle without keep-alive.
    pub async fn process_one(&mut self) -> Result<CycleReport, BridgeError> {
        self.cycle(None).await
    }

    /// Run one cycle at tick `now`, forcing a report if the keep-alive is due.
    pub async fn process_at(&mut self, now: u32) -> Result<CycleReport, BridgeError> {
        self.cycle(Some(now)).await
    }

    async fn cycle(&mut self, now: Option<u32>) -> Result<CycleReport, BridgeError> {
        if !self.announced {
            self.start().await?;
        }

        let raw = self.source.sample().map_err(BridgeError::Input)?;
        let buttons = self.decoder.decode(&raw);

        let mut delivered = self.differ.previous();
        let changes = self.differ.report(buttons);
        let changed = changes.len();

        let forced = match (now, self.keep_alive) {
            (Some(now), Some(keep_alive)) => keep_alive.due(now),
            _ => false,
        };

        let sent = if forced {
            let sent = self.output.send_report(buttons).await;
            if sent.is_ok() {
                delivered = buttons;
            }
            sent
        } else if changed > 0 {
            self.emit(changes, buttons, &mut delivered).await
        } else {
            Ok(())
        };

        if let Err(e) = sent {
            self.differ.restore(delivered);
            return Err(BridgeError::Output(e));
        }

        if let (Some(now), Some(keep_alive)) = (now, self.keep_alive.as_mut()) {
            if forced || changed > 0 {
                keep_alive.mark(now);
            }
        }

        Ok(CycleReport {
            buttons,
            changed,
            forced,
        })
    }

    /// Send `changes`, folding every accepted one into `delivered`.
    async fn emit(
        &mut self,
        changes: ButtonChanges,
        buttons: ButtonVector,
        delivered: &mut ButtonVector,
    ) -> Result<(), OutputError> {
        match self.mode {
            ReportMode::PerButton => {
                for change in changes {
                    self.output.set_button(change.button, change.pressed).await?;
                    delivered.set(change.button, change.pressed);
                }
            }
            ReportMode::Packed => {
                self.output.send_report(buttons).await?;
                *delivered = buttons;
            }
        }
        Ok(())
    }

    /// Get the decoder (mode flags and reverse latch).
    pub fn decoder(&self) -> &GearDecoder {
        &self.decoder
    }

    /// Last vector the sink accepted.
    pub fn reported(&self) -> ButtonVector {
        self.differ.previous()
    }

    /// Get a reference to the output sink.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Get a mutable reference to the output sink.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}

/// Error type for bridge operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Error from the switch source.
    Input(InputError),
    /// Error from the output sink.
    Output(OutputError),
}
