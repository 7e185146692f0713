//! Configuration type definitions

use heapless::String;
use tessera_protocol::{
    BarSource, Topic, DATA_TOPIC, DEVICE_NAME, MAX_DEVICE_NAME_LEN, PRESENCE_TOPIC,
};

use crate::net::{LINK_RETRY_MS, SESSION_RETRY_MS};
use crate::render::{Palette, RenderMode};
use crate::scheduler::DEFAULT_FRAME_INTERVAL_MS;

/// Maximum device name length
pub const MAX_NAME_LEN: usize = MAX_DEVICE_NAME_LEN;

/// Default global brightness
pub const DEFAULT_BRIGHTNESS: u8 = 5;

/// Display and render settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Active render mode, fixed for the lifetime of the device
    pub mode: RenderMode,
    /// Minimum time between frames
    pub frame_interval_ms: u32,
    /// Global output brightness (0-255)
    pub brightness: u8,
    /// Lit and unlit pixel colours
    pub palette: Palette,
    /// Payload field feeding the bar visualizer
    pub bar_source: BarSource,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            brightness: DEFAULT_BRIGHTNESS,
            palette: Palette::default(),
            bar_source: BarSource::default(),
        }
    }
}

/// Connectivity settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetConfig {
    /// Delay before retrying the link
    pub link_retry_ms: u32,
    /// Delay before retrying the session
    pub session_retry_ms: u32,
    /// Name sent in the presence announcement
    pub device_name: String<MAX_NAME_LEN>,
    /// Topic the presence announcement is published on
    pub presence_topic: Topic,
    /// Topic carrying bar data
    pub data_topic: Topic,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            link_retry_ms: LINK_RETRY_MS,
            session_retry_ms: SESSION_RETRY_MS,
            device_name: bounded(DEVICE_NAME),
            presence_topic: bounded(PRESENCE_TOPIC),
            data_topic: bounded(DATA_TOPIC),
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub display: DisplayConfig,
    pub network: NetConfig,
}

impl Config {
    /// Create a configuration with every value at its default
    pub fn new() -> Self {
        Self::default()
    }
}

fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Rgb;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.display.mode, RenderMode::Bars);
        assert_eq!(config.display.frame_interval_ms, 80);
        assert_eq!(config.display.brightness, 5);
        assert_eq!(config.display.palette.on, Rgb::WHEAT);
        assert_eq!(config.display.palette.off, Rgb::BLACK);
        assert_eq!(config.display.bar_source, BarSource::Fast);
        assert_eq!(config.network.link_retry_ms, 2000);
        assert_eq!(config.network.session_retry_ms, 2000);
        assert_eq!(config.network.device_name.as_str(), "device/desktop_led_matrix");
        assert_eq!(config.network.presence_topic.as_str(), "connected/device");
        assert_eq!(config.network.data_topic.as_str(), "data/service/audio_vis");
    }
}
