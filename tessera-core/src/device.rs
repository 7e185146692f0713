//! Device context
//!
//! Owns every piece of runtime state: the surface, the automaton, the bar
//! data bridge, the frame scheduler and the connectivity machine, plus the
//! output sink and network port. The firmware drives it from a single
//! cooperative loop; handlers run to completion and nothing here locks.

use tessera_protocol::{DecodeError, EncodeError};

use crate::bridge::InboundDataBridge;
use crate::config::Config;
use crate::net::{ConnectionState, Connectivity, DropReason, Layer, NetEvent, Outcome};
use crate::render::{Automaton, BarVisualizer, Palette, RenderMode};
use crate::scheduler::FrameScheduler;
use crate::surface::{Surface, MATRIX_HEIGHT, MATRIX_WIDTH};
use crate::traits::{NetworkPort, PixelSink, PortError, SinkError};

/// What handling one event or retry did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// Link layer moved to this state
    Link(ConnectionState),
    /// Session layer moved to this state
    Session(ConnectionState),
    /// Bar data accepted; this many columns updated
    Updated(usize),
    /// Bar data could not be decoded; magnitudes unchanged
    Rejected(DecodeError),
    /// Message dropped before decoding
    Dropped(DropReason),
    /// Event had no effect
    Ignored,
    /// Transport refused a request; retry armed
    PortFailed { layer: Layer, error: PortError },
}

/// Summary of one [`Device::poll`] pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollReport {
    /// A frame was rendered this pass
    pub rendered: bool,
    /// Flushing the rendered frame failed
    pub flush_error: Option<SinkError>,
    /// Events handled
    pub events: usize,
    /// Events that updated the magnitude vector
    pub updated: usize,
    /// Events dropped or rejected
    pub discarded: usize,
    /// Retry fired this pass
    pub retry: Option<Dispatch>,
}

/// LED matrix device
pub struct Device<S, N, const W: usize = MATRIX_WIDTH, const H: usize = MATRIX_HEIGHT> {
    surface: Surface<W, H>,
    automaton: Automaton<W, H>,
    bridge: InboundDataBridge<W>,
    frames: FrameScheduler,
    net: Connectivity,
    mode: RenderMode,
    palette: Palette,
    brightness: u8,
    sink: S,
    port: N,
}

impl<S, N, const W: usize, const H: usize> Device<S, N, W, H>
where
    S: PixelSink<W, H>,
    N: NetworkPort,
{
    /// Create a device from configuration
    ///
    /// The automaton is seeded and painted but nothing is flushed until the
    /// first frame tick.
    pub fn new(config: &Config, sink: S, port: N) -> Result<Self, EncodeError> {
        let display = &config.display;
        let mut device = Self {
            surface: Surface::filled(display.palette.off),
            automaton: Automaton::seeded(),
            bridge: InboundDataBridge::new(display.bar_source),
            frames: FrameScheduler::new(display.frame_interval_ms),
            net: Connectivity::new(&config.network)?,
            mode: display.mode,
            palette: display.palette,
            brightness: display.brightness,
            sink,
            port,
        };
        if device.mode == RenderMode::Life {
            device.automaton.paint(&mut device.surface, &device.palette);
        }
        Ok(device)
    }

    /// Start the first link attempt
    pub fn start(&mut self, now_ms: u32) -> Dispatch {
        let outcome = self.net.start(now_ms, &mut self.port);
        self.settle(outcome)
    }

    /// Render and flush a frame if one is due
    ///
    /// Returns whether a frame was rendered.
    pub fn tick(&mut self, now_ms: u32) -> Result<bool, SinkError> {
        if !self.frames.tick(now_ms) {
            return Ok(false);
        }
        self.render();
        self.sink.flush(&self.surface, self.brightness)?;
        Ok(true)
    }

    /// Paint the active mode onto the surface
    pub fn render(&mut self) {
        match self.mode {
            RenderMode::Life => self.automaton.advance(&mut self.surface, &self.palette),
            RenderMode::Bars => {
                BarVisualizer::render(self.bridge.magnitudes(), &mut self.surface, &self.palette)
            }
        }
    }

    /// Handle one network event
    pub fn dispatch(&mut self, event: &NetEvent, now_ms: u32) -> Dispatch {
        let outcome = self.net.handle(event, now_ms, &mut self.port);
        self.settle(outcome)
    }

    /// Fire a due retry timer, if any
    pub fn poll_timers(&mut self, now_ms: u32) -> Option<Dispatch> {
        let outcome = self.net.poll_timers(now_ms, &mut self.port)?;
        Some(self.settle(outcome))
    }

    /// One pass of the run loop: frame tick, then pending events, then
    /// retry timers
    ///
    /// `on_event` sees each event together with what handling it did.
    pub fn poll<I, F>(&mut self, now_ms: u32, events: I, mut on_event: F) -> PollReport
    where
        I: IntoIterator<Item = NetEvent>,
        F: FnMut(&NetEvent, Dispatch),
    {
        let mut report = PollReport::default();

        match self.tick(now_ms) {
            Ok(rendered) => report.rendered = rendered,
            Err(error) => {
                report.rendered = true;
                report.flush_error = Some(error);
            }
        }

        for event in events {
            report.events += 1;
            let dispatch = self.dispatch(&event, now_ms);
            match dispatch {
                Dispatch::Updated(_) => report.updated += 1,
                Dispatch::Rejected(_) | Dispatch::Dropped(_) => report.discarded += 1,
                _ => {}
            }
            on_event(&event, dispatch);
        }

        report.retry = self.poll_timers(now_ms);
        report
    }

    /// Milliseconds until the loop next has work: a frame or a retry
    pub fn next_wake_in(&self, now_ms: u32) -> u32 {
        let frame = self.frames.time_until_due(now_ms);
        match self.net.time_until_retry(now_ms) {
            Some(retry) => frame.min(retry),
            None => frame,
        }
    }

    /// Current surface
    pub fn surface(&self) -> &Surface<W, H> {
        &self.surface
    }

    /// Current bar magnitudes
    pub fn magnitudes(&self) -> &[f32; W] {
        self.bridge.magnitudes()
    }

    /// Game of Life state
    pub fn automaton(&self) -> &Automaton<W, H> {
        &self.automaton
    }

    /// Connectivity state
    pub fn connectivity(&self) -> &Connectivity {
        &self.net
    }

    /// Frame scheduler
    pub fn frames(&self) -> &FrameScheduler {
        &self.frames
    }

    /// Active render mode
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Global brightness
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Output sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Network port
    pub fn port(&self) -> &N {
        &self.port
    }

    fn settle(&mut self, outcome: Outcome<'_>) -> Dispatch {
        match outcome {
            Outcome::Link(state) => Dispatch::Link(state),
            Outcome::Session(state) => Dispatch::Session(state),
            Outcome::Data(raw) => match self.bridge.ingest(raw) {
                Ok(columns) => Dispatch::Updated(columns),
                Err(error) => Dispatch::Rejected(error),
            },
            Outcome::Dropped(reason) => Dispatch::Dropped(reason),
            Outcome::Ignored => Dispatch::Ignored,
            Outcome::PortFailed { layer, error } => Dispatch::PortFailed { layer, error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::InboundMessage;
    use crate::surface::Rgb;
    use tessera_protocol::{topic, Qos, DATA_TOPIC};

    #[derive(Default)]
    struct MockSink {
        frames: Vec<Surface<4, 8>>,
        brightness: Vec<u8>,
        fail: bool,
    }

    impl PixelSink<4, 8> for MockSink {
        fn flush(&mut self, frame: &Surface<4, 8>, brightness: u8) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError::Busy);
            }
            self.frames.push(frame.clone());
            self.brightness.push(brightness);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockPort {
        connects: usize,
        sessions: usize,
        published: usize,
        subscribed: usize,
    }

    impl NetworkPort for MockPort {
        fn begin_connect(&mut self) -> Result<(), PortError> {
            self.connects += 1;
            Ok(())
        }

        fn connect_session(&mut self) -> Result<(), PortError> {
            self.sessions += 1;
            Ok(())
        }

        fn publish(&mut self, _: &str, _: Qos, _: bool, _: &[u8]) -> Result<(), PortError> {
            self.published += 1;
            Ok(())
        }

        fn subscribe(&mut self, _: &str, _: Qos) -> Result<(), PortError> {
            self.subscribed += 1;
            Ok(())
        }
    }

    type TestDevice = Device<MockSink, MockPort, 4, 8>;

    fn device(mode: RenderMode) -> TestDevice {
        let mut config = Config::new();
        config.display.mode = mode;
        Device::new(&config, MockSink::default(), MockPort::default()).unwrap()
    }

    fn online(mode: RenderMode) -> TestDevice {
        let mut device = device(mode);
        device.start(0);
        device.dispatch(&NetEvent::LinkUp, 0);
        device.dispatch(&NetEvent::SessionUp { session_present: false }, 0);
        device
    }

    fn data(payload: &[u8]) -> NetEvent {
        NetEvent::Message(InboundMessage::complete(topic(DATA_TOPIC).unwrap(), payload).unwrap())
    }

    #[test]
    fn test_tick_respects_interval() {
        let mut device = device(RenderMode::Bars);
        assert_eq!(device.tick(40), Ok(false));
        assert_eq!(device.tick(80), Ok(true));
        assert_eq!(device.tick(159), Ok(false));
        assert_eq!(device.tick(160), Ok(true));
        assert_eq!(device.sink().frames.len(), 2);
        assert_eq!(device.sink().brightness, vec![5, 5]);
    }

    #[test]
    fn test_bars_follow_inbound_data() {
        let mut device = online(RenderMode::Bars);
        assert_eq!(device.port().published, 1);
        assert_eq!(device.port().subscribed, 1);

        let dispatch = device.dispatch(&data(br#"{"fast_bar_values": [1.0, -1.0]}"#), 10);
        assert_eq!(dispatch, Dispatch::Updated(2));

        device.tick(80).unwrap();
        let frame = &device.sink().frames[0];
        assert!(frame.column(0).iter().all(|&c| c == Rgb::WHEAT));
        assert!(frame.column(1).iter().all(|&c| c == Rgb::BLACK));
        // Untouched columns hold 0.0, which lights the bottom row
        assert_eq!(frame.get(2, 7), Rgb::WHEAT);
        assert_eq!(frame.get(2, 6), Rgb::BLACK);
    }

    #[test]
    fn test_fragmented_message_leaves_vector_unchanged() {
        let mut device = online(RenderMode::Bars);
        device.dispatch(&data(br#"{"fast_bar_values": [0.5, 0.5, 0.5, 0.5]}"#), 10);

        let raw = br#"{"fast_bar_values": [1.0, 1.0, 1.0, 1.0]}"#;
        let fragment = NetEvent::Message(InboundMessage {
            topic: topic(DATA_TOPIC).unwrap(),
            declared_len: raw.len(),
            payload: heapless::Vec::from_slice(&raw[..12]).unwrap(),
        });
        assert_eq!(
            device.dispatch(&fragment, 20),
            Dispatch::Dropped(DropReason::Fragmented {
                declared: raw.len(),
                received: 12
            })
        );
        assert_eq!(device.magnitudes(), &[0.5; 4]);
    }

    #[test]
    fn test_malformed_data_rejected() {
        let mut device = online(RenderMode::Bars);
        device.dispatch(&data(br#"{"fast_bar_values": [0.25]}"#), 10);
        assert_eq!(
            device.dispatch(&data(b"not json"), 20),
            Dispatch::Rejected(DecodeError::Malformed)
        );
        assert_eq!(device.magnitudes(), &[0.25, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_life_advances_once_per_frame() {
        let mut device = device(RenderMode::Life);
        device.tick(80).unwrap();
        device.tick(100).unwrap();
        device.tick(160).unwrap();
        assert_eq!(device.automaton().generation(), 2);
        assert_eq!(device.sink().frames.len(), 2);
    }

    #[test]
    fn test_flush_error_reported() {
        let mut device = device(RenderMode::Bars);
        let sink = MockSink {
            fail: true,
            ..Default::default()
        };
        device.sink = sink;
        assert_eq!(device.tick(80), Err(SinkError::Busy));
        // The interval restarted even though the flush failed
        assert_eq!(device.tick(100), Ok(false));
    }

    #[test]
    fn test_poll_runs_tick_events_and_timers() {
        let mut device = device(RenderMode::Bars);
        device.start(0);

        let mut seen = Vec::new();
        let report = device.poll(100, [NetEvent::LinkDown], |_, d| seen.push(d));
        assert!(report.rendered);
        assert_eq!(report.events, 1);
        assert_eq!(report.retry, None);
        assert_eq!(seen, vec![Dispatch::Link(ConnectionState::Disconnected)]);

        seen.clear();
        let report = device.poll(2100, [NetEvent::LinkDown, data(b"{}")], |_, d| seen.push(d));
        assert_eq!(report.events, 2);
        assert_eq!(report.discarded, 1);
        assert_eq!(
            seen,
            vec![
                Dispatch::Link(ConnectionState::Disconnected),
                Dispatch::Dropped(DropReason::NoSession),
            ]
        );
        // The second link-down re-armed the retry at 2100
        assert_eq!(report.retry, None);

        let report = device.poll(4100, core::iter::empty(), |_, _| {
            panic!("no events were queued")
        });
        assert_eq!(report.retry, Some(Dispatch::Link(ConnectionState::Connecting)));
        assert_eq!(device.port().connects, 2);
    }

    #[test]
    fn test_poll_reports_flush_error() {
        let mut device = device(RenderMode::Bars);
        device.sink.fail = true;
        let report = device.poll(80, core::iter::empty(), |_, _| {});
        assert!(report.rendered);
        assert_eq!(report.flush_error, Some(SinkError::Busy));
        assert_eq!(report.events, 0);
    }

    #[test]
    fn test_next_wake_in() {
        let mut device = device(RenderMode::Bars);
        assert_eq!(device.next_wake_in(30), 50);

        device.dispatch(&NetEvent::LinkDown, 40);
        device.tick(80).unwrap();
        assert_eq!(device.next_wake_in(100), 60);

        device.tick(1990).unwrap();
        assert_eq!(device.next_wake_in(2000), 40);
        assert_eq!(device.next_wake_in(2030), 10);
    }
}
