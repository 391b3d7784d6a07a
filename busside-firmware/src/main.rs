//! BUSSide - Hardware Bus Auditing Bridge Firmware
//!
//! Main firmware binary for RP2040-based probes. The probe is clipped onto
//! an unknown board, characterizes its debug UART without prior knowledge
//! and answers requests from the host auditing tool.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_rp::watchdog::Watchdog;
use embassy_rp::Peri;
use embassy_time::Duration;
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use busside_core::Peripherals;
use busside_drivers::{Blinker, EhOutput, SoftSerial};
use busside_hal_rp2040::{HwWatchdog, TimerClock, UartLink};

mod board;
mod tasks;

// Heap allocator for request and reply payloads
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 96KB (a maximum-size request and its echo fit together)
const HEAP_SIZE: usize = 96 * 1024;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("BUSSide bridge starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Host link on UART0 (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = board::HOST_BAUD;
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 1024]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let link = UartLink::new(uart.into_buffered(Irqs, tx_buf, rx_buf));
    info!("Host UART at {} baud", board::HOST_BAUD);

    // Candidate lines, in board::CANDIDATE_GPIOS order
    let bank = board::candidate_bank([
        Peri::<AnyPin>::from(p.PIN_2),
        Peri::<AnyPin>::from(p.PIN_3),
        Peri::<AnyPin>::from(p.PIN_4),
        Peri::<AnyPin>::from(p.PIN_5),
        Peri::<AnyPin>::from(p.PIN_6),
        Peri::<AnyPin>::from(p.PIN_7),
        Peri::<AnyPin>::from(p.PIN_8),
        Peri::<AnyPin>::from(p.PIN_9),
        Peri::<AnyPin>::from(p.PIN_10),
    ]);
    info!("Candidate lines on GPIO {}", board::CANDIDATE_GPIOS);

    let watchdog = HwWatchdog::start(
        Watchdog::new(p.WATCHDOG),
        Duration::from_millis(board::WATCHDOG_TIMEOUT_MS),
    );
    info!("Watchdog armed ({} ms)", board::WATCHDOG_TIMEOUT_MS);

    let led = Blinker::new(EhOutput::new(Output::new(p.PIN_25, Level::Low)));

    let peripherals = Peripherals {
        bank,
        serial: SoftSerial::new(TimerClock, board::SOFT_SERIAL_BAUD),
        clock: TimerClock,
        watchdog,
        indicator: led,
    };

    spawner.spawn(tasks::service_task(link, peripherals)).unwrap();
}

fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
