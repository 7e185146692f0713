//! Coprocessor UART transmit task
//!
//! Writes command frames queued by the device loop.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::NET_COMMANDS;

/// Network TX task - sends queued frames to the coprocessor
#[embassy_executor::task]
pub async fn net_tx_task(mut tx: BufferedUartTx) {
    info!("Network TX task started");

    loop {
        let frame = NET_COMMANDS.receive().await;

        let bytes = match frame.encode_to_vec() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode frame: {:?}", e);
                continue;
            }
        };

        if let Err(e) = tx.write_all(&bytes).await {
            warn!("Failed to send frame: {:?}", e);
        } else {
            trace!("TX: {} bytes", bytes.len());
        }
    }
}
