use std::time::{Duration, Instant};

/// Single-shot deadline, checked cooperatively by the event loop.
///
/// There is no background thread: whoever drives the loop asks for the
/// deadline, waits until it is due, and calls [`SingleShot::fire`]. Callers
/// pass `now` explicitly, which keeps the state machine deterministic.
#[derive(Debug, Default)]
pub struct SingleShot {
    deadline: Option<Instant>,
}

impl SingleShot {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm and report true if the deadline has passed. Returns false when
    /// idle or not yet due; firing consumes the shot.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_after_the_deadline() {
        let t0 = Instant::now();
        let mut shot = SingleShot::new();
        shot.arm(t0, Duration::from_millis(250));

        assert!(!shot.fire(t0 + Duration::from_millis(249)));
        assert!(shot.is_armed());
        assert!(shot.fire(t0 + Duration::from_millis(250)));
        assert!(!shot.is_armed());
    }

    #[test]
    fn firing_consumes_the_shot() {
        let t0 = Instant::now();
        let mut shot = SingleShot::new();
        shot.arm(t0, Duration::from_millis(10));

        assert!(shot.fire(t0 + Duration::from_millis(20)));
        assert!(!shot.fire(t0 + Duration::from_millis(30)));
    }

    #[test]
    fn cancel_disarms() {
        let t0 = Instant::now();
        let mut shot = SingleShot::new();
        shot.arm(t0, Duration::from_millis(10));
        shot.cancel();

        assert!(!shot.is_armed());
        assert!(shot.deadline().is_none());
        assert!(!shot.fire(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn idle_shot_never_fires() {
        let mut shot = SingleShot::new();
        assert!(!shot.fire(Instant::now()));
    }
}
