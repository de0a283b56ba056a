//! Frame scheduling driven by an external clock.

/// Decides when the next frame is due.
///
/// Stopped until [`start`](Self::start) is called. Time is passed in by the
/// caller, so tests drive it with a manual clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderLoop {
    interval_ms: u64,
    next_frame_ms: Option<u64>,
}

impl RenderLoop {
    /// Create a stopped loop targeting `frame_rate` frames per second.
    pub fn new(frame_rate: u32) -> Self {
        Self {
            interval_ms: (1000 / u64::from(frame_rate.max(1))).max(1),
            next_frame_ms: None,
        }
    }

    /// Start the loop. The first frame is due immediately.
    pub fn start(&mut self, now_ms: u64) {
        self.next_frame_ms = Some(now_ms);
    }

    /// Stop the loop. No frames are reported until it is started again.
    pub fn stop(&mut self) {
        self.next_frame_ms = None;
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Report whether a frame is due at `now_ms`, scheduling the next one if so.
    ///
    /// At most one frame is reported per call. After a stall longer than one
    /// interval the schedule is re-anchored at `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let Some(due) = self.next_frame_ms else {
            return false;
        };
        if now_ms < due {
            return false;
        }
        let next = if now_ms - due >= self.interval_ms {
            now_ms + self.interval_ms
        } else {
            due + self.interval_ms
        };
        self.next_frame_ms = Some(next);
        true
    }

    /// Milliseconds until the next frame, or `None` when stopped.
    pub fn time_until_next(&self, now_ms: u64) -> Option<u64> {
        self.next_frame_ms.map(|due| due.saturating_sub(now_ms))
    }
}
