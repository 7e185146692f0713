//! Board implementations of the core output traits
//!
//! Both hand work off to other tasks through the static channels and never
//! block the device loop.

use tessera_core::surface::{strip_order, Surface, MATRIX_HEIGHT, MATRIX_WIDTH, PIXEL_COUNT};
use tessera_core::traits::{NetworkPort, PixelSink, PortError, SinkError};
use tessera_protocol::{NetCommand, Qos};

use crate::channels::{LED_FRAME, NET_COMMANDS};

/// Network port backed by the coprocessor UART link
pub struct ChannelPort;

impl ChannelPort {
    fn send(&mut self, command: NetCommand<'_>) -> Result<(), PortError> {
        let frame = command.to_frame().map_err(|_| PortError::Encode)?;
        NET_COMMANDS
            .try_send(frame)
            .map_err(|_| PortError::QueueFull)
    }
}

impl NetworkPort for ChannelPort {
    fn begin_connect(&mut self) -> Result<(), PortError> {
        self.send(NetCommand::BeginConnect)
    }

    fn connect_session(&mut self) -> Result<(), PortError> {
        self.send(NetCommand::ConnectSession)
    }

    fn publish(
        &mut self,
        topic: &str,
        qos: Qos,
        retain: bool,
        payload: &[u8],
    ) -> Result<(), PortError> {
        self.send(NetCommand::Publish {
            topic,
            qos,
            retain,
            payload,
        })
    }

    fn subscribe(&mut self, topic: &str, qos: Qos) -> Result<(), PortError> {
        self.send(NetCommand::Subscribe { topic, qos })
    }
}

/// Pixel sink feeding the WS2812 output task
pub struct FrameSink;

impl PixelSink<MATRIX_WIDTH, MATRIX_HEIGHT> for FrameSink {
    fn flush(&mut self, frame: &Surface, brightness: u8) -> Result<(), SinkError> {
        let mut words = [0u32; PIXEL_COUNT];
        for (word, color) in words.iter_mut().zip(strip_order(frame, brightness)) {
            *word = color.to_grb_word();
        }
        LED_FRAME.signal(words);
        Ok(())
    }
}
