//! Message types for the coprocessor link
//!
//! Message types are divided into two categories:
//! - Controller → Coprocessor: connection requests, publish/subscribe
//! - Coprocessor → Controller: link/session reports, inbound messages, console text

use heapless::{String, Vec};

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use crate::session::{Qos, Topic, MAX_TOPIC_LEN};

// Message type IDs: Coprocessor → Controller
pub const MSG_LINK_UP: u8 = 0x01;
pub const MSG_LINK_DOWN: u8 = 0x02;
pub const MSG_SESSION_UP: u8 = 0x03;
pub const MSG_SESSION_DOWN: u8 = 0x04;
pub const MSG_MESSAGE: u8 = 0x05;
pub const MSG_CONSOLE: u8 = 0x06;
pub const MSG_ACK: u8 = 0x07;

// Message type IDs: Controller → Coprocessor
pub const MSG_BEGIN_CONNECT: u8 = 0x40;
pub const MSG_CONNECT_SESSION: u8 = 0x41;
pub const MSG_PUBLISH: u8 = 0x42;
pub const MSG_SUBSCRIBE: u8 = 0x43;

/// Maximum inbound message body carried in one report
///
/// Whatever a message frame has left after the topic length byte, the topic
/// and the declared length.
pub const MAX_DATA_LEN: usize = MAX_PAYLOAD_SIZE - 1 - MAX_TOPIC_LEN - 2;

/// Maximum console line length
pub const MAX_CONSOLE_LEN: usize = 128;

/// Commands from the controller to the coprocessor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetCommand<'a> {
    /// Join the configured Wi-Fi network
    BeginConnect,
    /// Open the MQTT session
    ConnectSession,
    /// Publish a message
    Publish {
        topic: &'a str,
        qos: Qos,
        retain: bool,
        payload: &'a [u8],
    },
    /// Subscribe to a topic
    Subscribe { topic: &'a str, qos: Qos },
}

impl<'a> NetCommand<'a> {
    /// Encode this command into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            NetCommand::BeginConnect => Ok(Frame::empty(MSG_BEGIN_CONNECT)),
            NetCommand::ConnectSession => Ok(Frame::empty(MSG_CONNECT_SESSION)),
            NetCommand::Publish {
                topic,
                qos,
                retain,
                payload,
            } => {
                // Payload: [qos][retain][topic_len][topic...][body...]
                let mut buf = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                push(&mut buf, &[qos.to_byte(), *retain as u8])?;
                push_topic(&mut buf, topic)?;
                push(&mut buf, payload)?;
                Frame::new(MSG_PUBLISH, &buf)
            }
            NetCommand::Subscribe { topic, qos } => {
                // Payload: [qos][topic_len][topic...]
                let mut buf = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                push(&mut buf, &[qos.to_byte()])?;
                push_topic(&mut buf, topic)?;
                Frame::new(MSG_SUBSCRIBE, &buf)
            }
        }
    }
}

/// Reports from the coprocessor to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetReport {
    /// Wi-Fi associated and addressed
    LinkUp,
    /// Wi-Fi lost (also sent for a failed join)
    LinkDown,
    /// MQTT session established
    SessionUp { session_present: bool },
    /// MQTT session closed or connect failed
    SessionDown { reason: u8 },
    /// Inbound publish
    ///
    /// `declared_len` is the total message length announced by the broker;
    /// `data` holds what was actually delivered in this report.
    Message {
        topic: Topic,
        declared_len: u16,
        data: Vec<u8, MAX_DATA_LEN>,
    },
    /// Line typed into the remote console
    Console { text: String<MAX_CONSOLE_LEN> },
    /// Publish/subscribe acknowledged by the broker
    Ack { packet_id: u16 },
}

impl NetReport {
    /// Parse a report from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_LINK_UP => Ok(NetReport::LinkUp),
            MSG_LINK_DOWN => Ok(NetReport::LinkDown),
            MSG_SESSION_UP => {
                let flag = *payload.first().ok_or(FrameError::InvalidFrame)?;
                Ok(NetReport::SessionUp {
                    session_present: flag != 0,
                })
            }
            MSG_SESSION_DOWN => {
                let reason = *payload.first().ok_or(FrameError::InvalidFrame)?;
                Ok(NetReport::SessionDown { reason })
            }
            MSG_MESSAGE => {
                // Payload: [topic_len][topic...][declared lo][declared hi][data...]
                let (topic, rest) = split_topic(payload)?;
                if rest.len() < 2 {
                    return Err(FrameError::InvalidFrame);
                }
                let declared_len = u16::from_le_bytes([rest[0], rest[1]]);
                let data = Vec::from_slice(&rest[2..]).map_err(|_| FrameError::PayloadTooLarge)?;
                Ok(NetReport::Message {
                    topic,
                    declared_len,
                    data,
                })
            }
            MSG_CONSOLE => {
                let text = core::str::from_utf8(payload).map_err(|_| FrameError::InvalidFrame)?;
                let mut line = String::new();
                line.push_str(text)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Ok(NetReport::Console { text: line })
            }
            MSG_ACK => match payload {
                [lo, hi, ..] => Ok(NetReport::Ack {
                    packet_id: u16::from_le_bytes([*lo, *hi]),
                }),
                _ => Err(FrameError::InvalidFrame),
            },
            _ => Err(FrameError::UnknownType),
        }
    }

    /// Encode this report into a frame (for the coprocessor side or simulation)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            NetReport::LinkUp => Ok(Frame::empty(MSG_LINK_UP)),
            NetReport::LinkDown => Ok(Frame::empty(MSG_LINK_DOWN)),
            NetReport::SessionUp { session_present } => {
                Frame::new(MSG_SESSION_UP, &[*session_present as u8])
            }
            NetReport::SessionDown { reason } => Frame::new(MSG_SESSION_DOWN, &[*reason]),
            NetReport::Message {
                topic,
                declared_len,
                data,
            } => {
                let mut buf = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                push_topic(&mut buf, topic)?;
                push(&mut buf, &declared_len.to_le_bytes())?;
                push(&mut buf, data)?;
                Frame::new(MSG_MESSAGE, &buf)
            }
            NetReport::Console { text } => Frame::new(MSG_CONSOLE, text.as_bytes()),
            NetReport::Ack { packet_id } => Frame::new(MSG_ACK, &packet_id.to_le_bytes()),
        }
    }
}

fn push(buf: &mut Vec<u8, MAX_PAYLOAD_SIZE>, bytes: &[u8]) -> Result<(), FrameError> {
    buf.extend_from_slice(bytes)
        .map_err(|_| FrameError::PayloadTooLarge)
}

fn push_topic(buf: &mut Vec<u8, MAX_PAYLOAD_SIZE>, topic: &str) -> Result<(), FrameError> {
    if topic.len() > MAX_TOPIC_LEN {
        return Err(FrameError::PayloadTooLarge);
    }
    push(buf, &[topic.len() as u8])?;
    push(buf, topic.as_bytes())
}

fn split_topic(payload: &[u8]) -> Result<(Topic, &[u8]), FrameError> {
    let (&len, rest) = payload.split_first().ok_or(FrameError::InvalidFrame)?;
    let len = len as usize;
    if len > MAX_TOPIC_LEN || rest.len() < len {
        return Err(FrameError::InvalidFrame);
    }
    let name = core::str::from_utf8(&rest[..len]).map_err(|_| FrameError::InvalidFrame)?;
    let mut topic = Topic::new();
    topic
        .push_str(name)
        .map_err(|_| FrameError::InvalidFrame)?;
    Ok((topic, &rest[len..]))
}
