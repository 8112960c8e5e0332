//! Self-dismissing notifications driven by the frame clock.

/// A payload that is visible for a fixed duration after it is shown. Showing
/// a new payload replaces the old one and restarts the timer.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedNotice<T> {
    duration: f64,
    current: Option<(T, f64)>,
}

impl<T> TimedNotice<T> {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration: duration_secs,
            current: None,
        }
    }

    pub fn show(&mut self, payload: T, now: f64) {
        self.current = Some((payload, now + self.duration));
    }

    pub fn visible(&self, now: f64) -> Option<&T> {
        match &self.current {
            Some((payload, until)) if now < *until => Some(payload),
            _ => None,
        }
    }

    /// Seconds until the notice hides, for scheduling a repaint.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.current
            .as_ref()
            .map(|(_, until)| until - now)
            .filter(|r| *r > 0.0)
    }

    /// Drop an expired payload.
    pub fn tick(&mut self, now: f64) {
        if matches!(&self.current, Some((_, until)) if now >= *until) {
            self.current = None;
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_duration() {
        let mut n = TimedNotice::new(3.0);
        assert_eq!(n.visible(0.0), None);
        n.show(5, 10.0);
        assert_eq!(n.visible(10.0), Some(&5));
        assert_eq!(n.visible(12.9), Some(&5));
        assert_eq!(n.visible(13.0), None);
        n.tick(13.0);
        assert_eq!(n.remaining(13.0), None);
    }

    #[test]
    fn newer_events_supersede() {
        let mut n = TimedNotice::new(3.0);
        n.show("first", 0.0);
        n.show("second", 2.0);
        assert_eq!(n.visible(4.0), Some(&"second"));
        assert_eq!(n.visible(5.0), None);
        assert!((n.remaining(4.0).unwrap() - 1.0).abs() < 1e-9);
    }
}
