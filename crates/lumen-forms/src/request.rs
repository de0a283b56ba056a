//! Fake asynchronous request with a fixed delay.

/// A request that completes `delay_ms` after it is started.
///
/// At most one can be in flight; starting again while pending is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedRequest {
    delay_ms: u64,
    started_ms: Option<u64>,
}

impl SimulatedRequest {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            started_ms: None,
        }
    }

    /// Start the request. Returns false if one is already pending.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.started_ms.is_some() {
            return false;
        }
        self.started_ms = Some(now_ms);
        true
    }

    pub fn is_pending(&self) -> bool {
        self.started_ms.is_some()
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.started_ms {
            Some(started) if now_ms.saturating_sub(started) >= self.delay_ms => {
                self.started_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before completion, `None` when idle.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.started_ms
            .map(|started| (started + self.delay_ms).saturating_sub(now_ms))
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completes_once_after_delay() {
        let mut req = SimulatedRequest::new(1500);
        assert!(!req.poll(0));
        assert!(req.start(100));
        assert!(!req.poll(1599));
        assert_eq!(req.remaining_ms(1599), Some(1));
        assert!(req.poll(1600));
        assert!(!req.poll(1700));
        assert!(!req.is_pending());
    }

    #[test]
    fn test_restart_refused_while_pending() {
        let mut req = SimulatedRequest::new(1500);
        assert!(req.start(0));
        assert!(!req.start(10));
        assert!(req.poll(1500));
        assert!(req.start(2000));
    }

    #[test]
    fn test_zero_delay_completes_on_first_poll() {
        let mut req = SimulatedRequest::new(0);
        req.start(5);
        assert!(req.poll(5));
    }
}
