#![forbid(unsafe_code)]

//! Host-driven frame driver.
//!
//! [`StepRunner`] bundles a [`FieldEngine`], a [`HostWindow`] and a
//! [`DeterministicClock`]. The embedding environment pushes events, advances
//! time and calls [`step`](StepRunner::step) once per animation frame:
//!
//! ```ignore
//! let mut runner = StepRunner::new(EngineConfig::default(), 1280.0, 720.0);
//! runner.mount();
//! runner.pointer_move(400.0, 300.0);
//! runner.advance_time(Duration::from_millis(16));
//! let result = runner.step();
//! ```

use core::time::Duration;

use driftfield_core::event::{HostEvent, PointerEvent};
use driftfield_runtime::{EngineConfig, EngineState, FieldEngine, Frame, HostClock, Theme};

use crate::{DeterministicClock, HostWindow};

/// Outcome of one [`StepRunner::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// A frame was composed.
    pub rendered: bool,
    /// Listener invocations from events flushed this step.
    pub delivered: usize,
    /// Frames composed so far, including this one.
    pub frame_idx: u64,
}

/// Drives one engine against an in-process window and clock.
pub struct StepRunner {
    engine: FieldEngine,
    window: HostWindow,
    clock: DeterministicClock,
    last_frame: Option<Frame>,
    frame_idx: u64,
}

impl core::fmt::Debug for StepRunner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StepRunner")
            .field("state", &self.engine.state())
            .field("window", &self.window)
            .field("now", &self.clock.now_mono())
            .field("frame_idx", &self.frame_idx)
            .finish()
    }
}

impl StepRunner {
    /// Create an unmounted runner over a window of the given size.
    #[must_use]
    pub fn new(config: EngineConfig, width: f64, height: f64) -> Self {
        Self {
            engine: FieldEngine::new(config),
            window: HostWindow::new(width, height),
            clock: DeterministicClock::new(),
            last_frame: None,
            frame_idx: 0,
        }
    }

    /// Start with `theme` instead of the default.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.engine = std::mem::take(&mut self.engine).with_theme(theme);
        self
    }

    /// Mount the engine at the current clock time.
    pub fn mount(&mut self) {
        let now = self.clock.now_mono();
        self.engine.mount(&mut self.window, now);
    }

    /// Unmount the engine and drop any queued events.
    pub fn unmount(&mut self) {
        self.engine.unmount(&mut self.window);
        self.window.clear_queue();
        self.last_frame = None;
    }

    /// Queue `event`, stamped with the current clock time.
    pub fn push_event(&mut self, event: HostEvent) {
        let now = self.clock.now_mono();
        self.window.push_event(event, now);
    }

    /// Queue a pointer move.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.push_event(HostEvent::PointerMove(PointerEvent::new(x, y)));
    }

    /// Queue a window resize.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.push_event(HostEvent::Resize { width, height });
    }

    /// Parse and queue one JSON-encoded event. Returns whether an event was
    /// queued.
    #[cfg(feature = "input-parser")]
    pub fn push_encoded_input(
        &mut self,
        json: &str,
    ) -> Result<bool, crate::input_parser::InputParseError> {
        match crate::input_parser::parse_host_event(json)? {
            Some(event) => {
                self.push_event(event);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Advance the clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the clock to `now`.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Switch theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.engine.set_theme(theme);
    }

    /// Deliver queued events and compose a frame for the current time.
    pub fn step(&mut self) -> StepResult {
        let delivered = self.window.flush();
        let now = self.clock.now_mono();
        let frame = self.engine.frame(now);
        let rendered = frame.is_some();
        if let Some(frame) = frame {
            self.frame_idx += 1;
            self.last_frame = Some(frame);
        }
        StepResult {
            rendered,
            delivered,
            frame_idx: self.frame_idx,
        }
    }

    /// Current clock time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now_mono()
    }

    /// Engine lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    /// Most recently composed frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Frames composed so far.
    #[must_use]
    pub const fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    /// The driven engine.
    #[must_use]
    pub const fn engine(&self) -> &FieldEngine {
        &self.engine
    }

    /// The window the engine listens on.
    #[must_use]
    pub const fn window(&self) -> &HostWindow {
        &self.window
    }
}

impl Drop for StepRunner {
    fn drop(&mut self) {
        self.engine.unmount(&mut self.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FRAME: Duration = Duration::from_millis(16);

    fn ready_runner() -> StepRunner {
        let mut runner = StepRunner::new(EngineConfig::default(), 1200.0, 800.0);
        runner.mount();
        runner.set_time(Duration::from_millis(100));
        assert!(runner.step().rendered);
        runner
    }

    #[test]
    fn measuring_steps_do_not_render() {
        let mut runner = StepRunner::new(EngineConfig::default(), 1200.0, 800.0);
        runner.mount();
        assert_eq!(runner.state(), EngineState::Measuring);
        runner.advance_time(FRAME);
        let result = runner.step();
        assert_eq!(
            result,
            StepResult {
                rendered: false,
                delivered: 0,
                frame_idx: 0
            }
        );
        assert!(runner.last_frame().is_none());
    }

    #[test]
    fn queued_events_flush_on_step() {
        let mut runner = ready_runner();
        runner.pointer_move(600.0, 400.0);
        runner.pointer_move(610.0, 405.0);
        assert_eq!(runner.window().queued(), 2);

        runner.advance_time(FRAME);
        let result = runner.step();
        assert!(result.rendered);
        assert_eq!(result.delivered, 2);
        assert_eq!(result.frame_idx, 2);
        assert_eq!(runner.window().queued(), 0);
        assert_eq!(runner.engine().pointer().generation, 1);
    }

    #[test]
    fn unmount_discards_queue_and_detaches() {
        let mut runner = ready_runner();
        runner.pointer_move(1.0, 1.0);
        runner.unmount();
        assert_eq!(runner.state(), EngineState::Unmounted);
        assert_eq!(runner.window().listener_count(), 0);
        assert_eq!(runner.window().queued(), 0);
        runner.advance_time(FRAME);
        assert!(!runner.step().rendered);
    }

    #[test]
    fn theme_before_mount() {
        let mut runner =
            StepRunner::new(EngineConfig::default(), 1200.0, 800.0).with_theme(Theme::Light);
        runner.mount();
        assert_eq!(runner.engine().theme(), Theme::Light);
    }

    #[cfg(feature = "input-parser")]
    #[test]
    fn encoded_input_is_queued() {
        let mut runner = ready_runner();
        assert_eq!(
            runner.push_encoded_input(r#"{"kind":"pointer","x":5,"y":6}"#),
            Ok(true)
        );
        assert_eq!(runner.push_encoded_input(r#"{"kind":"key"}"#), Ok(false));
        assert!(runner.push_encoded_input("nope").is_err());
        assert_eq!(runner.window().queued(), 1);
    }
}
