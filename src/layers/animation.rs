//! Timed entrance animations for revealed markers
//!
//! Revealing a category can play an entrance animation on each marker for a
//! fixed duration. The manager only tracks when each animation has to be
//! cleared; the owner advances it from its update loop and applies the
//! clears to the surface. Dropping the manager (or calling
//! [`AnimationManager::cancel_all`]) discards pending clears, so nothing can
//! fire against a torn-down widget.

use crate::core::constants::REVEAL_ANIMATION_MS;
use crate::layers::marker::MarkerId;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct PendingClear {
    marker: MarkerId,
    remaining: Duration,
}

#[derive(Debug, Clone)]
pub struct AnimationManager {
    duration: Duration,
    pending: Vec<PendingClear>,
}

impl AnimationManager {
    pub fn new() -> Self {
        Self::with_duration(Duration::from_millis(REVEAL_ANIMATION_MS))
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            duration,
            pending: Vec::new(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Starts (or restarts) the countdown for clearing `marker`'s animation.
    pub fn schedule_clear(&mut self, marker: MarkerId) {
        match self.pending.iter_mut().find(|p| p.marker == marker) {
            Some(pending) => pending.remaining = self.duration,
            None => self.pending.push(PendingClear {
                marker,
                remaining: self.duration,
            }),
        }
    }

    /// Advances every countdown and returns the markers whose animation is due
    /// to be cleared, in scheduling order.
    pub fn update(&mut self, elapsed: Duration) -> Vec<MarkerId> {
        let mut due = Vec::new();
        self.pending.retain_mut(|pending| {
            pending.remaining = pending.remaining.saturating_sub(elapsed);
            if pending.remaining.is_zero() {
                due.push(pending.marker);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn cancel(&mut self, marker: MarkerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.marker != marker);
        self.pending.len() != before
    }

    /// Drops every pending clear, returning how many were discarded.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn is_animating(&self, marker: MarkerId) -> bool {
        self.pending.iter().any(|p| p.marker == marker)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for AnimationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_duration() {
        assert_eq!(AnimationManager::new().duration(), Duration::from_millis(1400));
    }

    #[test]
    fn test_clear_after_duration() {
        let mut animations = AnimationManager::new();
        animations.schedule_clear(MarkerId(1));

        assert!(animations.update(Duration::from_millis(1000)).is_empty());
        assert!(animations.is_animating(MarkerId(1)));

        assert_eq!(animations.update(Duration::from_millis(400)), vec![MarkerId(1)]);
        assert!(!animations.is_animating(MarkerId(1)));
    }

    #[test]
    fn test_reschedule_restarts_countdown() {
        let mut animations = AnimationManager::new();
        animations.schedule_clear(MarkerId(1));
        animations.update(Duration::from_millis(1000));
        animations.schedule_clear(MarkerId(1));

        assert!(animations.update(Duration::from_millis(1000)).is_empty());
        assert_eq!(animations.pending_count(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut animations = AnimationManager::new();
        animations.schedule_clear(MarkerId(1));
        animations.schedule_clear(MarkerId(2));

        assert!(animations.cancel(MarkerId(1)));
        assert!(!animations.cancel(MarkerId(1)));
        assert_eq!(animations.cancel_all(), 1);
        assert!(animations.update(Duration::from_secs(5)).is_empty());
    }
}
