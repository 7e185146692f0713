//! Device loop task
//!
//! The single cooperative context that owns the [`Device`]. Each pass
//! renders a due frame, then handles pending network events, then fires
//! due retry timers. It sleeps until the next frame or retry deadline, or
//! until an event arrives.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};

use tessera_core::net::{ConnectionState, DropReason};
use tessera_core::{Device, Dispatch};

use crate::channels::NET_EVENTS;
use crate::port::{ChannelPort, FrameSink};

/// Device wired to the board sink and coprocessor port
pub type MatrixDevice = Device<FrameSink, ChannelPort>;

/// Device task - runs the render/connectivity loop forever
#[embassy_executor::task]
pub async fn device_task(mut device: MatrixDevice) {
    info!(
        "Device task started: mode={:?} brightness={}",
        device.mode(),
        device.brightness()
    );

    let start = Instant::now();
    let now_ms = || start.elapsed().as_millis() as u32;

    log_dispatch(device.start(now_ms()));

    loop {
        let wait_ms = device.next_wake_in(now_ms());
        let pending = match select(Timer::after_millis(wait_ms as u64), NET_EVENTS.receive()).await
        {
            Either::First(()) => None,
            Either::Second(event) => Some(event),
        };

        let now = now_ms();
        let events = pending
            .into_iter()
            .chain(core::iter::from_fn(|| NET_EVENTS.try_receive().ok()));

        let report = device.poll(now, events, |event, dispatch| {
            trace!("Event: {:?}", event);
            log_dispatch(dispatch);
        });

        if let Some(e) = report.flush_error {
            warn!("Frame flush failed: {:?}", e);
        } else if report.rendered {
            trace!("Frame {}", device.frames().frames());
        }
        if report.discarded > 0 {
            debug!("{} of {} events discarded", report.discarded, report.events);
        }
        if let Some(dispatch) = report.retry {
            debug!("Retry timer fired");
            log_dispatch(dispatch);
        }
    }
}

fn log_dispatch(dispatch: Dispatch) {
    match dispatch {
        Dispatch::Link(ConnectionState::Connecting) => info!("Wi-Fi connecting"),
        Dispatch::Link(ConnectionState::Connected) => info!("Wi-Fi connected"),
        Dispatch::Link(ConnectionState::Disconnected) => warn!("Wi-Fi lost, retry armed"),
        Dispatch::Session(ConnectionState::Connecting) => info!("MQTT connecting"),
        Dispatch::Session(ConnectionState::Connected) => {
            info!("MQTT connected, presence published and data topic subscribed")
        }
        Dispatch::Session(ConnectionState::Disconnected) => warn!("MQTT disconnected"),
        Dispatch::Updated(columns) => trace!("Bar data: {} columns", columns),
        Dispatch::Rejected(e) => warn!("Bar data rejected: {:?}", e),
        Dispatch::Dropped(DropReason::Fragmented { declared, received }) => {
            warn!("Packet loss: declared {} bytes, received {}", declared, received)
        }
        Dispatch::Dropped(DropReason::NoSession) => debug!("Message without session dropped"),
        Dispatch::Ignored => {}
        Dispatch::PortFailed { layer, error } => {
            warn!("{:?} request not sent ({:?}), retry armed", layer, error)
        }
    }
}
