use std::fmt;

use crate::classifier::CharState;
use crate::error::SessionError;
use crate::feedback::{KeystrokeFeedback, Silent};
use crate::runtime::{Clock, Key};
use crate::session::{Phase, SessionConfig, TestDuration, TestSession};
use crate::stats::{LiveStats, TestStats};
use crate::time_series::WpmHistory;
use crate::word_generator::TextSource;

/// What a keystroke did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// First character: the test is now running.
    Started,
    Typed,
    Erased,
    Ignored,
}

/// Handed to persistence when a test finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedTest {
    pub duration: TestDuration,
    pub stats: TestStats,
}

/// Point-in-time copy of everything the UI draws.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    pub target: Vec<char>,
    pub typed: Vec<char>,
    pub states: Vec<CharState>,
    pub cursor: usize,
    pub remaining_secs: u32,
    pub duration: TestDuration,
    pub live: LiveStats,
}

/// Drives one live [`TestSession`] through Idle -> Running -> Finished.
pub struct Controller {
    config: SessionConfig,
    source: Box<dyn TextSource>,
    clock: Box<dyn Clock>,
    feedback: Box<dyn KeystrokeFeedback>,
    session: TestSession,
    /// Set when a late keystroke found the timer already due to expire.
    expired: Option<CompletedTest>,
}

impl Controller {
    pub fn new(
        config: SessionConfig,
        mut source: Box<dyn TextSource>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let session = TestSession::new(source.generate(config.word_count), config.duration);
        Self {
            config,
            source,
            clock,
            feedback: Box::new(Silent),
            session,
            expired: None,
        }
    }

    pub fn with_feedback(mut self, feedback: Box<dyn KeystrokeFeedback>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Applies a keystroke.
    ///
    /// One-second boundaries strictly before the keystroke are applied first.
    /// If that expires the timer the key is dropped and the finished test is
    /// handed out by the next [`Controller::poll`]. A key landing exactly on
    /// the final boundary is still scored.
    pub fn on_key(&mut self, key: Key) -> KeyOutcome {
        if self.session.phase() == Phase::Running {
            let elapsed = self.session.elapsed_secs(self.clock.now());
            let passed = (elapsed.ceil() as u32).saturating_sub(1);
            if let Some(done) = self.advance_to(passed) {
                self.expired = Some(done);
                return KeyOutcome::Ignored;
            }
        }

        let phase = self.session.phase();
        match (phase, key) {
            (Phase::Finished, _) | (_, Key::Other) | (Phase::Idle, Key::Backspace) => {
                KeyOutcome::Ignored
            }
            (Phase::Idle | Phase::Running, Key::Char(c)) => {
                let expected = self.session.target().get(self.session.typed().len());
                self.feedback.keystroke(expected != Some(c));

                let now = self.clock.now();
                let outcome = if phase == Phase::Idle {
                    self.session.begin(now);
                    log::debug!("test started ({})", self.session.duration());
                    KeyOutcome::Started
                } else {
                    KeyOutcome::Typed
                };
                self.session.push_char(c, now);
                outcome
            }
            (Phase::Running, Key::Backspace) => {
                let now = self.clock.now();
                if self.session.pop_char(now) {
                    self.feedback.keystroke(false);
                    KeyOutcome::Erased
                } else {
                    KeyOutcome::Ignored
                }
            }
        }
    }

    /// Applies a single one-second tick.
    pub fn tick(&mut self) -> Option<CompletedTest> {
        if !self.session.tick() {
            return None;
        }

        let stats = self.session.final_stats().ok()?;
        log::info!(
            "test finished: {} wpm, {}% accuracy, {} consistency ({})",
            stats.wpm,
            stats.accuracy,
            stats.consistency,
            self.session.duration()
        );
        Some(CompletedTest {
            duration: self.session.duration(),
            stats,
        })
    }

    /// Applies every tick the clock says is due since the test started.
    pub fn poll(&mut self) -> Option<CompletedTest> {
        if let Some(done) = self.expired.take() {
            return Some(done);
        }
        if self.session.phase() != Phase::Running {
            return None;
        }

        let elapsed = self.session.elapsed_secs(self.clock.now()).floor() as u32;
        self.advance_to(elapsed)
    }

    /// Ticks until the timer has consumed `elapsed_secs`.
    fn advance_to(&mut self, elapsed_secs: u32) -> Option<CompletedTest> {
        let due = elapsed_secs.saturating_sub(self.session.consumed_secs());
        for _ in 0..due {
            if let Some(done) = self.tick() {
                return Some(done);
            }
        }
        None
    }

    /// Throws the current session away and starts a fresh Idle one.
    pub fn reset(&mut self, new_duration: Option<TestDuration>) {
        self.session.cancel_timer();
        if let Some(duration) = new_duration {
            self.config.duration = duration;
        }
        self.expired = None;
        let target = self.source.generate(self.config.word_count);
        self.session = TestSession::new(target, self.config.duration);
        log::debug!("session reset ({})", self.config.duration);
    }

    pub fn snapshot(&self) -> Snapshot {
        let session = &self.session;
        Snapshot {
            phase: session.phase(),
            target: session.target().chars().to_vec(),
            typed: session.typed().chars().to_vec(),
            states: session.char_states(),
            cursor: session.typed().len(),
            remaining_secs: session.remaining_secs(),
            duration: session.duration(),
            live: session.live_stats(self.clock.now()),
        }
    }

    /// Final stats of a finished test. Repeatable.
    pub fn finalize(&self) -> Result<TestStats, SessionError> {
        self.session.final_stats()
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn duration(&self) -> TestDuration {
        self.config.duration
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn history(&self) -> &WpmHistory {
        self.session.history()
    }

    pub fn session(&self) -> &TestSession {
        &self.session
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
