//! Firmware entry point: bring up the peripherals, spawn the producer
//! tasks, and run the UI dispatch loop with the home screen
//! pre-selected.

#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Pin, Pull};
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::peripherals::TWISPI0;
use embassy_nrf::pwm::SimplePwm;
use embassy_nrf::saadc::{ChannelConfig, Config as SaadcConfig, Saadc};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, saadc};

use eload_panel::hal::CurrentRange;
use eload_panel::panel::display::OledPanel;
use eload_panel::panel::flash::{self, FlashStore, PanelFlash};
use eload_panel::panel::power::{self, LoadControl};
use eload_panel::panel::{inputs, next_event, now_ticks};
use eload_panel::{SamplePacer, Ui};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    TWISPI0 => twim::InterruptHandler<TWISPI0>;
});

// GPIO map (nRF52840-DK defaults; adjust for the production PCB):
//
//   Encoder phase A  → P0.11
//   Encoder phase B  → P0.12
//   Encoder button   → P0.24
//   Thermal alert    → P0.25
//   I²C SDA / SCL    → P0.26 / P0.27
//   DAC PWM          → P0.13
//   Trim PWM         → P0.14
//   Range strap      → P0.15 (tied low on low-range builds)
//   AIN0 / AIN1 / AIN2 → voltage sense / current sense / current set

type PanelUi = Ui<LoadControl, OledPanel<Twim<'static, TWISPI0>>, FlashStore>;

#[embassy_executor::task]
async fn ui_task(mut ui: PanelUi) -> ! {
    let mut pacer = SamplePacer::new();
    loop {
        let event = next_event(&mut pacer).await;
        ui.handle_event(event);
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("eload-panel starting");

    // Settings first: everything else reads the live block.
    let mut panel_flash = PanelFlash::new(Nvmc::new(p.NVMC));
    let settings = flash::load_or_default(&mut panel_flash).await;
    spawner.must_spawn(flash::flash_writer_task(panel_flash));

    // Display.
    let twim = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let display = OledPanel::new(twim);

    // Power stage: ADC sampler plus the PWM-driven control lines.
    let saadc = Saadc::new(
        p.SAADC,
        Irqs,
        SaadcConfig::default(),
        [
            ChannelConfig::single_ended(p.P0_02),
            ChannelConfig::single_ended(p.P0_03),
            ChannelConfig::single_ended(p.P0_04),
        ],
    );
    spawner.must_spawn(power::sampler_task(saadc));

    let range = {
        let strap = Input::new(p.P0_15.degrade(), Pull::Up);
        if strap.is_low() {
            CurrentRange::Low
        } else {
            CurrentRange::Full
        }
    };
    let pwm = SimplePwm::new_2ch(p.PWM0, p.P0_13, p.P0_14);
    let power_stage = LoadControl::new(pwm, range);

    // Input producers.
    spawner.must_spawn(inputs::encoder_task(p.P0_11.degrade(), p.P0_12.degrade()));
    spawner.must_spawn(inputs::button_task(p.P0_24.degrade()));
    spawner.must_spawn(inputs::thermal_watch_task(p.P0_25.degrade()));

    // The consumer task: dispatch loop over the event queue.
    let ui = Ui::new(power_stage, display, FlashStore, settings, now_ticks());
    spawner.must_spawn(ui_task(ui));
}
