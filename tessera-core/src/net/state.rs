//! Connection states

/// State of one connectivity layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// Not connected, possibly waiting on a retry timer
    #[default]
    Disconnected,
    /// Attempt in flight
    Connecting,
    /// Up
    Connected,
}

impl ConnectionState {
    /// Check if this layer is up
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

/// Connectivity layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layer {
    /// Network reachability (Wi-Fi)
    Link,
    /// Messaging session (MQTT) on top of the link
    Session,
}
