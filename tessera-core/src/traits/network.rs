//! Network transport port
//!
//! Outbound half of the link provider and session transport. Inbound
//! traffic arrives as [`NetEvent`](crate::net::NetEvent)s.

use tessera_protocol::Qos;

/// Errors that can occur handing a request to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError {
    /// Outbound queue full, request not sent
    QueueFull,
    /// Request could not be encoded for the transport
    Encode,
}

/// Requests the connectivity state machine issues to the transport
pub trait NetworkPort {
    /// Start joining the network (answered by link-up or link-down)
    fn begin_connect(&mut self) -> Result<(), PortError>;

    /// Open the messaging session (answered by session-up or session-down)
    fn connect_session(&mut self) -> Result<(), PortError>;

    /// Publish a message
    fn publish(&mut self, topic: &str, qos: Qos, retain: bool, payload: &[u8])
        -> Result<(), PortError>;

    /// Subscribe to a topic
    fn subscribe(&mut self, topic: &str, qos: Qos) -> Result<(), PortError>;
}
