//! USB HID button-box output implementation.

use defmt::Format;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{HidWriter, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::Builder;
use shifter_core::{Button, ButtonSink, ButtonVector, OutputError};
use usbd_hid::descriptor::generator_prelude::*;
use usbd_hid::descriptor::{gen_hid_descriptor, SerializedDescriptor};

/// USB HID gamepad report: one bit per logical button, padded to 16 bits.
///
/// Bit `i` is HID button `i + 1` on the host.
#[gen_hid_descriptor(
    (collection = APPLICATION, usage_page = GENERIC_DESKTOP, usage = GAMEPAD) = {
        (usage_page = BUTTON, usage_min = BUTTON_1, usage_max = 0x0C) = {
            #[packed_bits 12] #[item_settings data,variable,absolute] buttons=input;
        };
    }
)]
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Format)]
pub struct ShifterReport {
    pub buttons: u16,
}

impl ShifterReport {
    /// Size of the report in bytes.
    pub const SIZE: usize = 2;

    /// Convert the report to bytes.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        self.buttons.to_le_bytes()
    }

    /// Nothing pressed.
    #[must_use]
    pub const fn neutral() -> Self {
        Self { buttons: 0 }
    }
}

impl From<ButtonVector> for ShifterReport {
    fn from(buttons: ButtonVector) -> Self {
        Self {
            buttons: buttons.bits(),
        }
    }
}

type UsbDriver<'d> = Driver<'d, USB>;

/// USB HID button output.
///
/// Wraps an embassy-usb HID writer. Per-button updates are applied to the
/// last delivered report and the whole report is written each time. The
/// held report only changes once a write succeeds.
pub struct UsbHidOutput<'d> {
    writer: HidWriter<'d, UsbDriver<'d>, { ShifterReport::SIZE }>,
    report: ShifterReport,
    ready: bool,
}

impl<'d> UsbHidOutput<'d> {
    /// Create a new USB HID output from the given HID writer.
    pub fn new(writer: HidWriter<'d, UsbDriver<'d>, { ShifterReport::SIZE }>) -> Self {
        Self {
            writer,
            report: ShifterReport::neutral(),
            ready: false,
        }
    }

    /// Wait until the device is ready (USB enumerated).
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
        self.ready = true;
    }

    async fn write(&mut self, report: ShifterReport) -> Result<(), OutputError> {
        if !self.ready {
            return Err(OutputError::NotReady);
        }
        match self.writer.write(&report.as_bytes()).await {
            Ok(()) => {
                self.report = report;
                Ok(())
            }
            Err(EndpointError::Disabled) => Err(OutputError::NotReady),
            Err(_) => Err(OutputError::Io),
        }
    }
}

impl ButtonSink for UsbHidOutput<'_> {
    async fn set_button(&mut self, button: Button, pressed: bool) -> Result<(), OutputError> {
        let mut buttons = ButtonVector::from_bits(self.report.buttons);
        buttons.set(button, pressed);
        self.write(ShifterReport::from(buttons)).await
    }

    async fn send_report(&mut self, buttons: ButtonVector) -> Result<(), OutputError> {
        self.write(ShifterReport::from(buttons)).await
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Configure the USB HID class in the USB builder.
///
/// Returns the HID writer for use by the application.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, UsbDriver<'d>>,
    state: &'d mut State<'d>,
) -> HidWriter<'d, UsbDriver<'d>, { ShifterReport::SIZE }> {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: ShifterReport::desc(),
        request_handler: None,
        poll_ms: 1,
        max_packet_size: 8,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}
