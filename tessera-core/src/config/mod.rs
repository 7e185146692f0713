//! Configuration types and parser
//!
//! The firmware embeds a `display.toml` and parses it at boot with
//! [`parse_config`]. Anything not set in the file keeps its default.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
