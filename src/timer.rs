/// Countdown state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Counting,
    Expired,
}

/// One-second countdown driven by an external tick source.
///
/// The timer never schedules anything itself; whoever owns it delivers
/// `tick()` once per elapsed second while it is counting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timer {
    remaining: u32,
    state: TimerState,
}

impl Timer {
    pub fn new(secs: u32) -> Self {
        let mut timer = Self {
            remaining: 0,
            state: TimerState::Stopped,
        };
        timer.arm(secs);
        timer
    }

    pub fn arm(&mut self, secs: u32) {
        self.remaining = secs;
        self.state = TimerState::Stopped;
    }

    /// Starts counting. Idempotent once counting or expired.
    pub fn start(&mut self) {
        if self.state == TimerState::Stopped {
            self.state = TimerState::Counting;
        }
    }

    /// Consumes one second. Returns true when this tick expired the timer.
    pub fn tick(&mut self) -> bool {
        if self.state != TimerState::Counting {
            return false;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Expired;
            return true;
        }

        false
    }

    /// Stops counting; the caller re-arms. Expired timers stay expired.
    pub fn cancel(&mut self) {
        if self.state == TimerState::Counting {
            self.state = TimerState::Stopped;
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }
}
