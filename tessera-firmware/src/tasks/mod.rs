//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod device;
pub mod led;
pub mod net_rx;
pub mod net_tx;

pub use device::{device_task, MatrixDevice};
pub use led::led_task;
pub use net_rx::net_rx_task;
pub use net_tx::net_tx_task;
