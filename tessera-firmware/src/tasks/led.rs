//! LED output task
//!
//! Shifts the latest frame out to the WS2812 strip.

use defmt::*;
use embassy_rp::peripherals::PIO0;

use crate::channels::LED_FRAME;
use crate::ws2812::Ws2812;

/// LED task - writes each signalled frame to the strip
#[embassy_executor::task]
pub async fn led_task(mut strip: Ws2812<'static, PIO0, 0>) {
    info!("LED task started");

    loop {
        let words = LED_FRAME.wait().await;
        strip.write(&words).await;
    }
}
