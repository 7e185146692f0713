//! Coprocessor UART receive task
//!
//! Parses report frames from the network coprocessor. Connectivity events
//! go to the device loop; console lines and acknowledgements are handled
//! here.

use cortex_m::peripheral::SCB;
use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use tessera_core::net::NetEvent;
use tessera_protocol::{ConsoleCommand, FrameParser, NetReport};

use crate::channels::NET_EVENTS;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Network RX task - receives and parses frames from the coprocessor
#[embassy_executor::task]
pub async fn net_rx_task(mut rx: BufferedUartRx) {
    info!("Network RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match NetReport::from_frame(&frame) {
                            Ok(report) => handle_report(report).await,
                            Err(e) => warn!("Failed to parse report: {:?}", e),
                        },
                        Ok(None) => {}
                        Err(e) => warn!("Frame parse error: {:?}", e),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => warn!("UART read error: {:?}", e),
        }
    }
}

/// Route a parsed report
async fn handle_report(report: NetReport) {
    match report {
        NetReport::Console { text } => handle_console(&text),
        NetReport::Ack { packet_id } => trace!("Broker ACK for packet {}", packet_id),
        report => {
            if let Some(event) = NetEvent::from_report(report) {
                NET_EVENTS.send(event).await;
            }
        }
    }
}

/// Handle a line typed into the remote console
fn handle_console(text: &str) {
    match ConsoleCommand::parse(text) {
        ConsoleCommand::Restart => {
            warn!("Restart requested from console");
            SCB::sys_reset();
        }
        ConsoleCommand::Echo(line) => info!("Console: {}", line),
    }
}
