//! MQTT session vocabulary: topics, QoS levels and the presence announcement

use heapless::{String, Vec};
use serde::Serialize;

/// Maximum topic length carried over the coprocessor link
pub const MAX_TOPIC_LEN: usize = 64;

/// Maximum device name length, in bytes
pub const MAX_DEVICE_NAME_LEN: usize = 64;

/// Bytes of `{"device_name":""}` around the name
const PRESENCE_OVERHEAD: usize = 18;

/// Maximum encoded presence announcement
///
/// Sized for a name of [`MAX_DEVICE_NAME_LEN`] bytes where every byte is a
/// control character escaped as `\u00XX`.
pub const MAX_PRESENCE_LEN: usize = PRESENCE_OVERHEAD + 6 * MAX_DEVICE_NAME_LEN;

/// Topic the device announces itself on (retained)
pub const PRESENCE_TOPIC: &str = "connected/device";

/// Topic carrying bar visualization frames
pub const DATA_TOPIC: &str = "data/service/audio_vis";

/// Device name used in the presence announcement
pub const DEVICE_NAME: &str = "device/desktop_led_matrix";

/// Owned topic string
pub type Topic = String<MAX_TOPIC_LEN>;

/// Encoded presence announcement
pub type PresencePayload = Vec<u8, MAX_PRESENCE_LEN>;

/// MQTT delivery guarantee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Qos {
    /// Fire and forget
    #[default]
    AtMostOnce,
    /// Acknowledged delivery, may duplicate
    AtLeastOnce,
    /// Assured single delivery
    ExactlyOnce,
}

impl Qos {
    /// Parse from the wire byte (0, 1 or 2)
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Qos::AtMostOnce),
            1 => Some(Qos::AtLeastOnce),
            2 => Some(Qos::ExactlyOnce),
            _ => None,
        }
    }

    /// Wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            Qos::AtMostOnce => 0,
            Qos::AtLeastOnce => 1,
            Qos::ExactlyOnce => 2,
        }
    }
}

/// Errors building outbound payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Serialization failed
    Serialize,
    /// Encoded payload does not fit its buffer
    TooLong,
}

#[derive(Serialize)]
struct Presence<'a> {
    device_name: &'a str,
}

/// Build the presence announcement `{"device_name":"..."}`
pub fn encode_presence(device_name: &str) -> Result<PresencePayload, EncodeError> {
    let json = serde_json::to_vec(&Presence { device_name }).map_err(|_| EncodeError::Serialize)?;
    Vec::from_slice(&json).map_err(|_| EncodeError::TooLong)
}

/// Build an owned topic, failing if it exceeds [`MAX_TOPIC_LEN`]
pub fn topic(name: &str) -> Result<Topic, EncodeError> {
    let mut topic = Topic::new();
    topic.push_str(name).map_err(|_| EncodeError::TooLong)?;
    Ok(topic)
}
