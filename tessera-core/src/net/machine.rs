//! Link/session connectivity state machine
//!
//! The link must be up before a session is attempted, and losing the link
//! takes the session down with it. Every transition is driven by a
//! [`NetEvent`] or by a retry timer firing in [`Connectivity::poll_timers`].

use tessera_protocol::{encode_presence, topic, EncodeError, PresencePayload, Qos, Topic};

use super::events::NetEvent;
use super::state::{ConnectionState, Layer};
use super::timer::RetryTimer;
use crate::config::NetConfig;
use crate::traits::{NetworkPort, PortError};

/// Why an inbound message was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DropReason {
    /// Fewer (or more) bytes arrived than the message declared
    Fragmented { declared: usize, received: usize },
    /// Message arrived while no session was up
    NoSession,
}

/// Result of handling one event or timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome<'e> {
    /// Link layer moved to this state
    Link(ConnectionState),
    /// Session layer moved to this state
    Session(ConnectionState),
    /// Complete message on the data topic
    Data(&'e [u8]),
    /// Message dropped
    Dropped(DropReason),
    /// Event had no effect
    Ignored,
    /// Transport refused a request; the layer is disconnected and its
    /// retry is armed
    PortFailed { layer: Layer, error: PortError },
}

/// Connectivity state for both layers plus their retry timers
#[derive(Debug, Clone)]
pub struct Connectivity {
    link: ConnectionState,
    session: ConnectionState,
    link_retry: RetryTimer,
    session_retry: RetryTimer,
    presence_topic: Topic,
    data_topic: Topic,
    presence: PresencePayload,
}

impl Connectivity {
    /// Create a disconnected machine from configuration
    ///
    /// The presence announcement is serialized once here.
    pub fn new(config: &NetConfig) -> Result<Self, EncodeError> {
        Ok(Self {
            link: ConnectionState::Disconnected,
            session: ConnectionState::Disconnected,
            link_retry: RetryTimer::new(config.link_retry_ms),
            session_retry: RetryTimer::new(config.session_retry_ms),
            presence_topic: topic(&config.presence_topic)?,
            data_topic: topic(&config.data_topic)?,
            presence: encode_presence(&config.device_name)?,
        })
    }

    /// Link layer state
    pub fn link(&self) -> ConnectionState {
        self.link
    }

    /// Session layer state
    pub fn session(&self) -> ConnectionState {
        self.session
    }

    /// Link retry timer
    pub fn link_retry(&self) -> &RetryTimer {
        &self.link_retry
    }

    /// Session retry timer
    pub fn session_retry(&self) -> &RetryTimer {
        &self.session_retry
    }

    /// Serialized presence announcement
    pub fn presence(&self) -> &[u8] {
        &self.presence
    }

    /// Start the first link attempt
    pub fn start<P: NetworkPort>(&mut self, now_ms: u32, port: &mut P) -> Outcome<'static> {
        self.connect_link(now_ms, port)
    }

    /// Apply one event
    pub fn handle<'e, P: NetworkPort>(
        &mut self,
        event: &'e NetEvent,
        now_ms: u32,
        port: &mut P,
    ) -> Outcome<'e> {
        match event {
            NetEvent::LinkUp => {
                if self.link.is_connected() {
                    return Outcome::Ignored;
                }
                self.link = ConnectionState::Connected;
                self.link_retry.cancel();
                match self.connect_session(now_ms, port) {
                    Outcome::PortFailed { layer, error } => Outcome::PortFailed { layer, error },
                    _ => Outcome::Link(ConnectionState::Connected),
                }
            }
            NetEvent::LinkDown => {
                self.link = ConnectionState::Disconnected;
                self.session = ConnectionState::Disconnected;
                self.session_retry.cancel();
                self.link_retry.arm(now_ms);
                Outcome::Link(ConnectionState::Disconnected)
            }
            NetEvent::SessionUp { .. } => {
                if !self.link.is_connected() || self.session.is_connected() {
                    return Outcome::Ignored;
                }
                self.session = ConnectionState::Connected;
                self.session_retry.cancel();
                match self.announce(port) {
                    Ok(()) => Outcome::Session(ConnectionState::Connected),
                    Err(error) => self.fail(Layer::Session, error, now_ms),
                }
            }
            NetEvent::SessionDown => {
                self.session = ConnectionState::Disconnected;
                if self.link.is_connected() {
                    self.session_retry.arm(now_ms);
                }
                Outcome::Session(ConnectionState::Disconnected)
            }
            NetEvent::Message(message) => {
                if !self.session.is_connected() {
                    return Outcome::Dropped(DropReason::NoSession);
                }
                if !message.is_complete() {
                    return Outcome::Dropped(DropReason::Fragmented {
                        declared: message.declared_len,
                        received: message.received_len(),
                    });
                }
                if message.topic == self.data_topic {
                    Outcome::Data(message.payload.as_slice())
                } else {
                    Outcome::Ignored
                }
            }
        }
    }

    /// Fire any due retry timer
    ///
    /// At most one layer is retried per call. The session timer is only ever
    /// pending while the link is up, so the two never fire together.
    pub fn poll_timers<P: NetworkPort>(
        &mut self,
        now_ms: u32,
        port: &mut P,
    ) -> Option<Outcome<'static>> {
        if self.link_retry.poll(now_ms) {
            return Some(self.connect_link(now_ms, port));
        }
        if self.session_retry.poll(now_ms) && self.link.is_connected() {
            return Some(self.connect_session(now_ms, port));
        }
        None
    }

    /// Milliseconds until the next retry fires, if any is pending
    pub fn time_until_retry(&self, now_ms: u32) -> Option<u32> {
        match (
            self.link_retry.remaining_ms(now_ms),
            self.session_retry.remaining_ms(now_ms),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn connect_link<P: NetworkPort>(&mut self, now_ms: u32, port: &mut P) -> Outcome<'static> {
        self.link = ConnectionState::Connecting;
        match port.begin_connect() {
            Ok(()) => Outcome::Link(ConnectionState::Connecting),
            Err(error) => self.fail(Layer::Link, error, now_ms),
        }
    }

    fn connect_session<P: NetworkPort>(&mut self, now_ms: u32, port: &mut P) -> Outcome<'static> {
        self.session = ConnectionState::Connecting;
        match port.connect_session() {
            Ok(()) => Outcome::Session(ConnectionState::Connecting),
            Err(error) => self.fail(Layer::Session, error, now_ms),
        }
    }

    fn announce<P: NetworkPort>(&mut self, port: &mut P) -> Result<(), PortError> {
        port.publish(&self.presence_topic, Qos::ExactlyOnce, true, &self.presence)?;
        port.subscribe(&self.data_topic, Qos::AtMostOnce)
    }

    fn fail(&mut self, layer: Layer, error: PortError, now_ms: u32) -> Outcome<'static> {
        match layer {
            Layer::Link => {
                self.link = ConnectionState::Disconnected;
                self.link_retry.arm(now_ms);
            }
            Layer::Session => {
                self.session = ConnectionState::Disconnected;
                self.session_retry.arm(now_ms);
            }
        }
        Outcome::PortFailed { layer, error }
    }
}
