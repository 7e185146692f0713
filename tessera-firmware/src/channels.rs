//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use tessera_core::net::NetEvent;
use tessera_core::surface::PIXEL_COUNT;
use tessera_protocol::Frame;

/// Channel capacity for inbound network events
const EVENT_CHANNEL_SIZE: usize = 4;

/// Channel capacity for outbound coprocessor frames
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Link/session events and messages reported by the coprocessor
pub static NET_EVENTS: Channel<CriticalSectionRawMutex, NetEvent, EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Encoded commands waiting to go out to the coprocessor
pub static NET_COMMANDS: Channel<CriticalSectionRawMutex, Frame, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Latest frame in strip order as WS2812 GRB words; a newer frame replaces
/// one not yet shifted out
pub static LED_FRAME: Signal<CriticalSectionRawMutex, [u32; PIXEL_COUNT]> = Signal::new();
