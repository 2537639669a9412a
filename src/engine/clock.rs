use std::time::Instant;

/// Milliseconds since the clock's origin.
pub type Millis = u64;

pub trait Clock {
    fn now(&self) -> Millis;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Simulated time for tests. Clones share the same timeline.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct ManualClock(std::rc::Rc<std::cell::Cell<Millis>>);

#[cfg(test)]
impl ManualClock {
    pub fn advance(&self, ms: Millis) {
        self.0.set(self.0.get() + ms);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

/// A single-shot deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub id: TimerId,
    pub due_at: Millis,
}

/// Holds at most one pending [`Timer`]. Arming replaces whatever was pending,
/// so a superseded deadline can never fire.
#[derive(Debug, Default)]
pub struct TimerSlot {
    pending: Option<Timer>,
    armed: u64,
}

impl TimerSlot {
    pub fn arm(&mut self, now: Millis, delay: Millis) -> Timer {
        self.armed += 1;
        let timer = Timer {
            id: TimerId(self.armed),
            due_at: now.saturating_add(delay),
        };
        self.pending = Some(timer);
        timer
    }

    pub fn cancel(&mut self) -> Option<Timer> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<Timer> {
        self.pending
    }

    /// Removes and returns the pending timer once its deadline has passed.
    pub fn take_due(&mut self, now: Millis) -> Option<Timer> {
        match self.pending {
            Some(timer) if now >= timer.due_at => self.pending.take(),
            _ => None,
        }
    }

    /// Total number of timers ever armed in this slot.
    pub fn armed_count(&self) -> u64 {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rearming_supersedes_the_old_deadline() {
        let mut slot = TimerSlot::default();
        let first = slot.arm(0, 100);
        let second = slot.arm(50, 100);
        assert_ne!(first.id, second.id);
        assert_eq!(slot.take_due(100), None);
        assert_eq!(slot.take_due(150), Some(second));
        assert_eq!(slot.pending(), None);
        assert_eq!(slot.armed_count(), 2);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut slot = TimerSlot::default();
        slot.arm(0, 10);
        assert!(slot.cancel().is_some());
        assert_eq!(slot.take_due(1_000), None);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::default();
        let other = clock.clone();
        clock.advance(250);
        assert_eq!(other.now(), 250);
    }
}
