//! Request/reply service task

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::uart::BufferedUart;

use busside_core::{DeviceConfig, Peripherals, Service, DEFAULT_CONFIG};
use busside_drivers::{Blinker, EhOutput, SoftSerial};
use busside_hal_rp2040::{HwWatchdog, TimerClock, UartLink};

use crate::board::CandidateBank;

/// Device configuration
static CONFIG: DeviceConfig = DEFAULT_CONFIG;

/// Host link type
pub type HostUart = UartLink<BufferedUart>;

/// Peripherals owned by the service
pub type BoardPeripherals =
    Peripherals<CandidateBank, SoftSerial<TimerClock>, TimerClock, HwWatchdog, Blinker<EhOutput<Output<'static>>>>;

/// Service task - owns the host link and every probe peripheral
#[embassy_executor::task]
pub async fn service_task(link: HostUart, peripherals: BoardPeripherals) -> ! {
    info!("Service task started");
    let mut service = Service::new(link, peripherals, &CONFIG);
    service.run()
}
