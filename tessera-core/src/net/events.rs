//! Events driving the connectivity state machine

use heapless::Vec;
use tessera_protocol::{NetReport, Topic, MAX_DATA_LEN};

/// Inbound publish as delivered by the session transport
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InboundMessage {
    /// Topic the message was published on
    pub topic: Topic,
    /// Total length announced for the message
    pub declared_len: usize,
    /// Bytes actually delivered
    pub payload: Vec<u8, MAX_DATA_LEN>,
}

impl InboundMessage {
    /// Build a message whose declared length matches its payload
    pub fn complete(topic: Topic, payload: &[u8]) -> Option<Self> {
        Some(Self {
            topic,
            declared_len: payload.len(),
            payload: Vec::from_slice(payload).ok()?,
        })
    }

    /// Bytes actually delivered
    pub fn received_len(&self) -> usize {
        self.payload.len()
    }

    /// Check if the whole message arrived in this delivery
    pub fn is_complete(&self) -> bool {
        self.declared_len == self.received_len()
    }
}

/// Link and session events, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetEvent {
    /// Network link established
    LinkUp,
    /// Network link lost or join failed
    LinkDown,
    /// Session established
    SessionUp { session_present: bool },
    /// Session closed or connect failed
    SessionDown,
    /// Message received on a subscribed topic
    Message(InboundMessage),
}

impl NetEvent {
    /// Convert a coprocessor report into a state machine event
    ///
    /// Console lines and acknowledgements are not connectivity events and
    /// return `None`.
    pub fn from_report(report: NetReport) -> Option<Self> {
        match report {
            NetReport::LinkUp => Some(NetEvent::LinkUp),
            NetReport::LinkDown => Some(NetEvent::LinkDown),
            NetReport::SessionUp { session_present } => {
                Some(NetEvent::SessionUp { session_present })
            }
            NetReport::SessionDown { .. } => Some(NetEvent::SessionDown),
            NetReport::Message {
                topic,
                declared_len,
                data,
            } => Some(NetEvent::Message(InboundMessage {
                topic,
                declared_len: declared_len as usize,
                payload: data,
            })),
            NetReport::Console { .. } | NetReport::Ack { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_protocol::{topic, DATA_TOPIC};

    #[test]
    fn test_partial_delivery_is_incomplete() {
        let message = InboundMessage {
            topic: topic(DATA_TOPIC).unwrap(),
            declared_len: 10,
            payload: Vec::from_slice(b"0123456").unwrap(),
        };
        assert_eq!(message.received_len(), 7);
        assert!(!message.is_complete());
    }

    #[test]
    fn test_from_report_message() {
        let report = NetReport::Message {
            topic: topic(DATA_TOPIC).unwrap(),
            declared_len: 3,
            data: Vec::from_slice(b"abc").unwrap(),
        };
        match NetEvent::from_report(report) {
            Some(NetEvent::Message(message)) => assert!(message.is_complete()),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_from_report_skips_console() {
        let report = NetReport::Ack { packet_id: 1 };
        assert_eq!(NetEvent::from_report(report), None);
        assert_eq!(
            NetEvent::from_report(NetReport::SessionDown { reason: 4 }),
            Some(NetEvent::SessionDown)
        );
    }
}
