//! Board-agnostic core logic for the Tessera LED matrix
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Toroidal pixel grid and colour types
//! - Render modes (Game of Life automaton, bar visualizer)
//! - Frame scheduler
//! - Link/session connectivity state machine with retry timers
//! - Inbound bar data bridge
//! - Configuration types and parser
//! - Output sink and network port traits
//!
//! [`Device`] ties these together into the single cooperative context the
//! firmware run loop drives.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod device;
pub mod net;
pub mod render;
pub mod scheduler;
pub mod surface;
pub mod traits;

pub use device::{Device, Dispatch, PollReport};
