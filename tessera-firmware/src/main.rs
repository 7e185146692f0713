//! Tessera - Desktop LED Matrix Firmware
//!
//! Main firmware binary for an RP2040 driving a 64 × 8 WS2812 matrix. The
//! matrix shows either a Game of Life or a live audio bar visualization fed
//! over MQTT. Wi-Fi and MQTT run on a coprocessor reached over UART0.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::Pio;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tessera_core::config::{parse_config, Config};
use tessera_core::Device;

use crate::port::{ChannelPort, FrameSink};
use crate::ws2812::Ws2812;

// Heap allocator for JSON decoding
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 16KB
const HEAP_SIZE: usize = 16 * 1024;

/// Coprocessor link baud rate
const NET_BAUD: u32 = 115_200;

/// UART ring buffer size, room for one full frame plus slack
const UART_BUF_SIZE: usize = 2048;

/// Embedded configuration (compiled into firmware)
/// Edit display.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../display.toml");

mod channels;
mod port;
mod tasks;
mod ws2812;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; UART_BUF_SIZE]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; UART_BUF_SIZE]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tessera firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // UART0 to the network coprocessor (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = NET_BAUD;

    let tx_buf = TX_BUF.init([0u8; UART_BUF_SIZE]);
    let rx_buf = RX_BUF.init([0u8; UART_BUF_SIZE]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for coprocessor link");

    // PIO0 SM0 drives the strip data line on GPIO16
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let strip = Ws2812::new(&mut common, sm0, p.PIN_16);

    info!("PIO WS2812 output initialized");

    let device = unwrap!(Device::new(&config, FrameSink, ChannelPort));

    spawner.spawn(tasks::net_rx_task(rx)).unwrap();
    spawner.spawn(tasks::net_tx_task(tx)).unwrap();
    spawner.spawn(tasks::led_task(strip)).unwrap();
    spawner.spawn(tasks::device_task(device)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Parse the embedded display.toml
///
/// build.rs already validated the file, so failure here means the two
/// parsers disagree. Fall back to defaults rather than stay dark.
fn load_config() -> Config {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Configuration loaded: mode={:?} interval={}ms",
                config.display.mode, config.display.frame_interval_ms
            );
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            Config::default()
        }
    }
}
