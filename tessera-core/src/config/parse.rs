//! Minimal TOML parser for device configuration
//!
//! Handles only the subset `display.toml` uses. It does NOT support the
//! full TOML grammar.
//!
//! Supported features:
//! - `[display]` and `[network]` section headers
//! - Key = value pairs (string, integer)
//! - Comments (# ...), including trailing comments
//!
//! NOT supported:
//! - Arrays and tables as values
//! - Multi-line strings and escapes
//! - Dotted keys

use heapless::String;
use tessera_protocol::BarSource;

use super::types::{Config, DisplayConfig, NetConfig};
use crate::render::RenderMode;
use crate::surface::Rgb;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not recognized in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// String longer than its field allows
    TooLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Network,
}

/// Parse TOML configuration, starting from defaults
pub fn parse_config(input: &str) -> Result<Config, ParseError> {
    let mut config = Config::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        match section {
            Section::Display => apply_display(&mut config.display, key, value)?,
            Section::Network => apply_network(&mut config.network, key, value)?,
            Section::Root => return Err(ParseError::UnknownKey),
        }
    }

    Ok(config)
}

fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let line = strip_comment(line);
    let name = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?;
    match name.trim() {
        "display" => Ok(Section::Display),
        "network" => Ok(Section::Network),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_display(display: &mut DisplayConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "mode" => {
            display.mode =
                RenderMode::from_name(parse_string(value)?).ok_or(ParseError::InvalidValue)?
        }
        "frame_interval_ms" => display.frame_interval_ms = parse_int(value)?,
        "brightness" => display.brightness = parse_int(value)?,
        "alive_color" => display.palette.on = parse_color(value)?,
        "dead_color" => display.palette.off = parse_color(value)?,
        "bar_source" => display.bar_source = parse_bar_source(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_network(network: &mut NetConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "link_retry_ms" => network.link_retry_ms = parse_int(value)?,
        "session_retry_ms" => network.session_retry_ms = parse_int(value)?,
        "device_name" => network.device_name = parse_bounded(value)?,
        "presence_topic" => network.presence_topic = parse_bounded(value)?,
        "data_topic" => network.data_topic = parse_bounded(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn strip_comment(text: &str) -> &str {
    // A '#' inside a quoted string is not a comment
    let mut in_string = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return text[..i].trim(),
            _ => {}
        }
    }
    text.trim()
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(&line[eq_pos + 1..]);

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

fn parse_bounded<const N: usize>(value: &str) -> Result<String<N>, ParseError> {
    let mut out = String::new();
    out.push_str(parse_string(value)?)
        .map_err(|_| ParseError::TooLong)?;
    Ok(out)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_color(value: &str) -> Result<Rgb, ParseError> {
    Rgb::from_hex(parse_string(value)?).ok_or(ParseError::InvalidValue)
}

fn parse_bar_source(value: &str) -> Result<BarSource, ParseError> {
    match parse_string(value)? {
        "fast" => Ok(BarSource::Fast),
        "slow" => Ok(BarSource::Slow),
        _ => Err(ParseError::InvalidValue),
    }
}
