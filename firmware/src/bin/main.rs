#![no_std]
#![no_main]

use defmt::{debug, error, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::Input;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_time::Timer;
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use h_shifter::board::{log_mode, probe_accessory, pull_up, read_mode_switches};
use h_shifter::{
    configure_usb_hid, AccessoryPins, BoardConfig, ButtonSink, GearDecoder, LeverPins, ReportMode,
    ShifterBridge, SwitchSampler, UsbHidOutput, PICO,
};
use static_cell::StaticCell;

#[cfg(feature = "heartbeat")]
use embassy_executor::InterruptExecutor;
#[cfg(feature = "heartbeat")]
use embassy_rp::interrupt;
#[cfg(feature = "heartbeat")]
use embassy_rp::interrupt::{InterruptExt, Priority};
#[cfg(feature = "heartbeat")]
use embassy_time::{Duration, Ticker};
#[cfg(feature = "heartbeat")]
use h_shifter::{KeepAlive, TickCounter};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => embassy_rp::adc::InterruptHandler;
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Board this binary is wired for; GPIO numbers below must match it.
const BOARD: BoardConfig = PICO;

type Bridge = ShifterBridge<SwitchSampler<Input<'static>>, UsbHidOutput<'static>>;

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();

/// Ticks written by the timer executor, read by the shifter task.
#[cfg(feature = "heartbeat")]
static TICKS: TickCounter = TickCounter::new();

#[cfg(feature = "heartbeat")]
static EXECUTOR_TICK: InterruptExecutor = InterruptExecutor::new();

#[cfg(feature = "heartbeat")]
#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_TICK.on_interrupt()
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("H-shifter starting on {}...", BOARD.name);

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Rust Shifter");
    usb_config.product = Some("H-Shifter");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    let hid_state = HID_STATE.init(State::new());
    let hid_writer = configure_usb_hid(&mut builder, hid_state);
    let usb_device = builder.build();

    // Enumerate while the switches settle
    spawner.spawn(usb_task(usb_device).unwrap());

    // --- Switch Setup ---
    let lever = LeverPins {
        front: pull_up(p.PIN_3),
        left: pull_up(p.PIN_4),
        right: pull_up(p.PIN_5),
        back: pull_up(p.PIN_6),
        reverse: pull_up(p.PIN_7),
    };
    let mut enable_reverse = pull_up(p.PIN_11);
    let mut enable_sequential = pull_up(p.PIN_12);

    Timer::after_millis(BOARD.settle_delay_ms).await;

    // --- Accessory Probe ---
    let mut adc = Adc::new(p.ADC, Irqs, AdcConfig::default());
    let mut range_pin = p.PIN_26;
    let accessory_present =
        probe_accessory(&mut adc, range_pin.reborrow(), &BOARD.accessory_window).await;

    let mode = read_mode_switches(
        &BOARD,
        &mut enable_reverse,
        &mut enable_sequential,
        accessory_present,
    );
    log_mode(&mode);

    let sampler = if accessory_present {
        SwitchSampler::with_accessory(
            lever,
            AccessoryPins {
                range: pull_up(range_pin),
                split: pull_up(p.PIN_27),
                engine_brake: pull_up(p.PIN_28),
            },
        )
    } else {
        SwitchSampler::new(lever)
    };

    let decoder =
        GearDecoder::new(mode).with_reverse_interlock(cfg!(feature = "reverse-interlock"));
    let report_mode = if cfg!(feature = "packed-report") {
        ReportMode::Packed
    } else {
        ReportMode::PerButton
    };

    #[allow(unused_mut)]
    let mut bridge = ShifterBridge::new(sampler, UsbHidOutput::new(hid_writer), decoder)
        .with_report_mode(report_mode);

    #[cfg(feature = "heartbeat")]
    {
        interrupt::SWI_IRQ_1.set_priority(Priority::P2);
        let tick_spawner = EXECUTOR_TICK.start(interrupt::SWI_IRQ_1);
        tick_spawner.spawn(tick_task(&TICKS, BOARD.tick_interval_ms).unwrap());
        bridge = bridge.with_keep_alive(KeepAlive::new(BOARD.keep_alive_ticks), &TICKS);
        info!("Keep-alive every {} ticks", BOARD.keep_alive_ticks);
    }

    spawner.spawn(shifter_task(bridge).unwrap());

    info!("H-shifter initialized");
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Shifter task - one sample/decode/report cycle per poll interval.
#[embassy_executor::task]
async fn shifter_task(mut bridge: Bridge) {
    if !bridge.output().is_ready() {
        bridge.output_mut().wait_ready().await;
    }
    info!("USB HID ready, polling switches...");

    if let Err(e) = bridge.start().await {
        warn!("Initial report failed, retrying on the first cycle: {:?}", e);
    }

    bridge
        .run(|result| {
            match result {
                Ok(cycle) if cycle.changed > 0 => {
                    debug!(
                        "Buttons {=u16:#x} ({} changed, {} held)",
                        cycle.buttons.bits(),
                        cycle.changed,
                        cycle.buttons.pressed_count()
                    );
                }
                Ok(_) => {}
                // Undelivered changes go out next cycle
                Err(e) => error!("Cycle dropped: {:?}", e),
            }
            Timer::after_millis(BOARD.poll_interval_ms)
        })
        .await;
}

/// Tick task - advances the keep-alive counter from the interrupt executor.
#[cfg(feature = "heartbeat")]
#[embassy_executor::task]
async fn tick_task(ticks: &'static TickCounter, period_ms: u64) {
    let mut ticker = Ticker::every(Duration::from_millis(period_ms));
    loop {
        ticker.next().await;
        ticks.tick();
    }
}
