//! Start/stop frame scheduler driving the compositor once per redraw.
//!
//! The loop never runs frames itself. It asks a [`FrameRequester`] (the
//! window) for the next redraw and gates the redraw callback, so stopping the
//! loop turns any redraw already in flight into a no-op.

use std::time::Instant;

use tracing::{debug, warn};

/// Frames slower than this are reported.
pub const SLOW_FRAME_TIME: f64 = 0.25;

/// Something that can schedule one future frame callback.
pub trait FrameRequester {
    fn request_frame(&self);
}

impl FrameRequester for winit::window::Window {
    fn request_frame(&self) {
        self.request_redraw();
    }
}

/// Scheduler handle owned by the compositor host.
#[derive(Debug, Default)]
pub struct FrameLoop {
    running: bool,
    pending: bool,
    previous_time: Option<Instant>,
    frame_count: u64,
}

impl FrameLoop {
    /// Creates a stopped loop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start requesting frames. No-op if already running.
    pub fn start(&mut self, requester: &dyn FrameRequester) {
        if self.running {
            return;
        }
        debug!("frame loop started");
        self.running = true;
        self.previous_time = None;
        self.request_next(requester);
    }

    /// Stop the loop and cancel any outstanding request.
    pub fn stop(&mut self) {
        if self.running {
            debug!(frames = self.frame_count, "frame loop stopped");
        }
        self.running = false;
        self.pending = false;
    }

    /// Ask for the next frame unless one is already outstanding.
    pub fn request_next(&mut self, requester: &dyn FrameRequester) {
        if self.running && !self.pending {
            self.pending = true;
            requester.request_frame();
        }
    }

    /// Called from the redraw callback. Returns `false` when the loop is
    /// stopped and the frame must be skipped.
    pub fn begin_frame(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.pending = false;

        let now = Instant::now();
        if let Some(previous) = self.previous_time {
            self.record_frame_time(now.duration_since(previous).as_secs_f64());
        }
        self.previous_time = Some(now);
        self.frame_count += 1;
        true
    }

    /// Returns `true` when the frame was slow enough to report.
    fn record_frame_time(&self, frame_time: f64) -> bool {
        let slow = frame_time > SLOW_FRAME_TIME;
        if slow {
            warn!(
                frame = self.frame_count,
                "Frame time {:.1}ms exceeds {:.1}ms",
                frame_time * 1000.0,
                SLOW_FRAME_TIME * 1000.0
            );
        }
        slow
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a frame has been requested and not yet begun.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Frames begun since creation.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingRequester {
        requests: Cell<u32>,
    }

    impl FrameRequester for CountingRequester {
        fn request_frame(&self) {
            self.requests.set(self.requests.get() + 1);
        }
    }

    #[test]
    fn test_new_loop_is_stopped() {
        let mut frame_loop = FrameLoop::new();
        assert!(!frame_loop.is_running());
        assert!(!frame_loop.begin_frame());
        assert_eq!(frame_loop.frame_count(), 0);
    }

    #[test]
    fn test_start_requests_one_frame() {
        let requester = CountingRequester::default();
        let mut frame_loop = FrameLoop::new();
        frame_loop.start(&requester);
        frame_loop.start(&requester);
        assert_eq!(requester.requests.get(), 1);
        assert!(frame_loop.is_pending());
    }

    #[test]
    fn test_requests_do_not_stack() {
        let requester = CountingRequester::default();
        let mut frame_loop = FrameLoop::new();
        frame_loop.start(&requester);
        frame_loop.request_next(&requester);
        frame_loop.request_next(&requester);
        assert_eq!(requester.requests.get(), 1);

        assert!(frame_loop.begin_frame());
        frame_loop.request_next(&requester);
        assert_eq!(requester.requests.get(), 2);
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let requester = CountingRequester::default();
        let mut frame_loop = FrameLoop::new();
        frame_loop.start(&requester);
        frame_loop.stop();
        assert!(!frame_loop.is_pending());
        // A redraw delivered after stop is ignored.
        assert!(!frame_loop.begin_frame());
        assert_eq!(frame_loop.frame_count(), 0);

        frame_loop.request_next(&requester);
        assert_eq!(requester.requests.get(), 1);
    }

    #[test]
    fn test_restart_after_stop() {
        let requester = CountingRequester::default();
        let mut frame_loop = FrameLoop::new();
        frame_loop.start(&requester);
        assert!(frame_loop.begin_frame());
        frame_loop.stop();
        frame_loop.start(&requester);
        assert!(frame_loop.begin_frame());
        assert_eq!(frame_loop.frame_count(), 2);
        assert_eq!(requester.requests.get(), 2);
    }

    #[test]
    fn test_slow_frames_reported() {
        let frame_loop = FrameLoop::new();
        assert!(!frame_loop.record_frame_time(0.016));
        assert!(frame_loop.record_frame_time(1.0));
    }
}
