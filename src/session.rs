use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::classifier::{classify, CharState};
use crate::error::{InvalidDuration, SessionError};
use crate::stats::{self, LiveStats, TestStats};
use crate::time_series::WpmHistory;
use crate::timer::Timer;

/// Lifecycle stage of a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// Supported test lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TestDuration {
    Fifteen,
    #[default]
    Thirty,
    Sixty,
}

impl TestDuration {
    pub const ALL: [TestDuration; 3] = [
        TestDuration::Fifteen,
        TestDuration::Thirty,
        TestDuration::Sixty,
    ];

    pub fn secs(self) -> u32 {
        match self {
            TestDuration::Fifteen => 15,
            TestDuration::Thirty => 30,
            TestDuration::Sixty => 60,
        }
    }

    /// Next longer duration, wrapping around.
    pub fn next(self) -> Self {
        match self {
            TestDuration::Fifteen => TestDuration::Thirty,
            TestDuration::Thirty => TestDuration::Sixty,
            TestDuration::Sixty => TestDuration::Fifteen,
        }
    }

    /// Next shorter duration, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            TestDuration::Fifteen => TestDuration::Sixty,
            TestDuration::Thirty => TestDuration::Fifteen,
            TestDuration::Sixty => TestDuration::Thirty,
        }
    }
}

impl TryFrom<u32> for TestDuration {
    type Error = InvalidDuration;

    fn try_from(secs: u32) -> Result<Self, Self::Error> {
        match secs {
            15 => Ok(TestDuration::Fifteen),
            30 => Ok(TestDuration::Thirty),
            60 => Ok(TestDuration::Sixty),
            other => Err(InvalidDuration(other.to_string())),
        }
    }
}

impl From<TestDuration> for u32 {
    fn from(d: TestDuration) -> Self {
        d.secs()
    }
}

impl FromStr for TestDuration {
    type Err = InvalidDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('s').unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .map_err(|_| InvalidDuration(s.to_string()))
            .and_then(TestDuration::try_from)
    }
}

impl fmt::Display for TestDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.secs())
    }
}

/// The text to type. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetText(Vec<char>);

impl TargetText {
    pub fn new(text: &str) -> Result<Self, SessionError> {
        if text.is_empty() {
            return Err(SessionError::EmptyTarget);
        }
        Ok(Self(text.chars().collect()))
    }

    /// Stand-in used when a vocabulary yields nothing.
    pub(crate) fn pangram() -> Self {
        Self("the quick brown fox jumps over the lazy dog".chars().collect())
    }

    pub fn chars(&self) -> &[char] {
        &self.0
    }

    pub fn get(&self, idx: usize) -> Option<char> {
        self.0.get(idx).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TargetText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// What the user has typed so far; grows and shrinks at the end only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedBuffer(Vec<char>);

impl TypedBuffer {
    pub fn push(&mut self, c: char) {
        self.0.push(c);
    }

    pub fn pop(&mut self) -> Option<char> {
        self.0.pop()
    }

    pub fn chars(&self) -> &[char] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Knobs that survive a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub duration: TestDuration,
    pub word_count: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration: TestDuration::default(),
            word_count: 150,
        }
    }
}

/// One test instance. Replaced wholesale on reset.
#[derive(Debug, Clone)]
pub struct TestSession {
    target: TargetText,
    typed: TypedBuffer,
    phase: Phase,
    started_at: Option<Instant>,
    duration: TestDuration,
    timer: Timer,
    history: WpmHistory,
}

impl TestSession {
    pub fn new(target: TargetText, duration: TestDuration) -> Self {
        Self {
            target,
            typed: TypedBuffer::default(),
            phase: Phase::Idle,
            started_at: None,
            duration,
            timer: Timer::new(duration.secs()),
            history: WpmHistory::new(),
        }
    }

    /// Idle -> Running. Records the start instant and starts the timer.
    pub(crate) fn begin(&mut self, now: Instant) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Running;
        self.started_at = Some(now);
        self.timer.start();
    }

    pub(crate) fn push_char(&mut self, c: char, now: Instant) {
        self.typed.push(c);
        self.sample(now);
    }

    /// Removes the last typed char; false when there was nothing to remove.
    pub(crate) fn pop_char(&mut self, now: Instant) -> bool {
        if self.typed.pop().is_none() {
            return false;
        }
        self.sample(now);
        true
    }

    fn sample(&mut self, now: Instant) {
        let elapsed = self.elapsed_secs(now);
        let wpm = self.live_stats(now).wpm;
        self.history.record(elapsed, wpm as f64);
    }

    /// Applies one second. Returns true when this tick finished the test.
    pub(crate) fn tick(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        if self.timer.tick() {
            self.phase = Phase::Finished;
            return true;
        }
        false
    }

    pub(crate) fn cancel_timer(&mut self) {
        self.timer.cancel();
    }

    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        self.started_at
            .map(|start| now.saturating_duration_since(start).as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Seconds the timer has consumed so far.
    pub fn consumed_secs(&self) -> u32 {
        self.duration.secs().saturating_sub(self.timer.remaining())
    }

    /// Stats at `now`. Once finished, elapsed time stops at what the timer consumed.
    pub fn live_stats(&self, now: Instant) -> LiveStats {
        let elapsed = match self.phase {
            Phase::Finished => f64::from(self.consumed_secs()),
            _ => self.elapsed_secs(now),
        };
        stats::live_stats(self.target.chars(), self.typed.chars(), elapsed)
    }

    pub fn final_stats(&self) -> Result<TestStats, SessionError> {
        if self.phase != Phase::Finished {
            return Err(SessionError::NotFinished { phase: self.phase });
        }

        Ok(stats::final_stats(
            self.target.chars(),
            self.typed.chars(),
            self.duration.secs(),
            self.timer.remaining(),
            &self.history,
        ))
    }

    pub fn char_states(&self) -> Vec<CharState> {
        classify(self.target.chars(), self.typed.chars())
    }

    pub fn target(&self) -> &TargetText {
        &self.target
    }

    pub fn typed(&self) -> &TypedBuffer {
        &self.typed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn duration(&self) -> TestDuration {
        self.duration
    }

    pub fn remaining_secs(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn history(&self) -> &WpmHistory {
        &self.history
    }
}
