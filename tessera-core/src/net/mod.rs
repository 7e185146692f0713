//! Connectivity state machine
//!
//! Two layers: the network link and the messaging session riding on it.
//! Each layer recovers from loss with a fixed-delay one-shot retry timer.
//! There is no backoff; under a sustained outage the retries simply repeat.

pub mod events;
pub mod machine;
pub mod state;
pub mod timer;

pub use events::{InboundMessage, NetEvent};
pub use machine::{Connectivity, DropReason, Outcome};
pub use state::{ConnectionState, Layer};
pub use timer::RetryTimer;

/// Default delay before a link reconnect attempt
pub const LINK_RETRY_MS: u32 = 2000;

/// Default delay before a session reconnect attempt
pub const SESSION_RETRY_MS: u32 = 2000;
