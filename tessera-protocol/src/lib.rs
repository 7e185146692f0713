//! Tessera network protocol
//!
//! The LED matrix controller (RP2040) has no radio of its own. A Wi-Fi/MQTT
//! coprocessor owns the network stack and talks to the controller over UART
//! using the frame format below. This crate defines that link, plus the
//! payload formats carried across the MQTT session.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌───────┬────────────┬──────┬──────────────┬──────────┐
//! │ START │ LENGTH     │ TYPE │ PAYLOAD      │ CHECKSUM │
//! │ 1B    │ 2B (LE)    │ 1B   │ 0–1536B      │ 1B       │
//! └───────┴────────────┴──────┴──────────────┴──────────┘
//! ```
//!
//! The controller issues [`NetCommand`]s and receives [`NetReport`]s. Bar
//! data arriving on the data topic is JSON and decoded by [`BarFrame`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod console;
pub mod frame;
pub mod messages;
pub mod payload;
pub mod session;

pub use console::ConsoleCommand;
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{NetCommand, NetReport, MAX_CONSOLE_LEN, MAX_DATA_LEN};
pub use payload::{BarFrame, BarSource, DecodeError};
pub use session::{
    encode_presence, topic, EncodeError, PresencePayload, Qos, Topic, DATA_TOPIC, DEVICE_NAME,
    MAX_DEVICE_NAME_LEN, MAX_PRESENCE_LEN, MAX_TOPIC_LEN, PRESENCE_TOPIC,
};
