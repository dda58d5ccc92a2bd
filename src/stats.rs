use serde::{Deserialize, Serialize};

use crate::time_series::WpmHistory;
use crate::util::{mean, percent, round_u32, std_dev};

/// Characters per "word" in every WPM figure.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Elapsed-time floor for final stats, so an instant finish still divides.
const MIN_ELAPSED_MINUTES: f64 = 1.0 / 60.0;

/// In-progress numbers shown while typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LiveStats {
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: u32,
}

/// Summary of a finished test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestStats {
    pub wpm: u32,
    pub raw_wpm: u32,
    pub accuracy: u32,
    pub errors: u32,
    pub correct_chars: u32,
    pub incorrect_chars: u32,
    pub total_chars: u32,
    pub consistency: u32,
}

/// Positions where the typed character matches the target.
pub fn correct_chars(target: &[char], typed: &[char]) -> usize {
    target
        .iter()
        .zip(typed.iter())
        .filter(|(expected, actual)| expected == actual)
        .count()
}

/// Typed positions that do not match, extra characters included.
pub fn incorrect_chars(target: &[char], typed: &[char]) -> usize {
    typed
        .iter()
        .enumerate()
        .filter(|&(i, actual)| target.get(i) != Some(actual))
        .count()
}

/// `chars / 5` per minute, rounded. Zero when no time has passed.
pub fn wpm(chars: usize, minutes: f64) -> u32 {
    if minutes <= 0.0 {
        return 0;
    }
    round_u32(chars as f64 / CHARS_PER_WORD / minutes)
}

pub fn live_stats(target: &[char], typed: &[char], elapsed_secs: f64) -> LiveStats {
    let correct = correct_chars(target, typed);

    LiveStats {
        wpm: wpm(correct, elapsed_secs / 60.0),
        accuracy: percent(correct, typed.len(), 100),
        errors: incorrect_chars(target, typed) as u32,
    }
}

/// Final scoring. Elapsed time is taken from the timer
/// (`duration - remaining`), not from the wall clock.
pub fn final_stats(
    target: &[char],
    typed: &[char],
    duration_secs: u32,
    remaining_secs: u32,
    history: &WpmHistory,
) -> TestStats {
    let correct = correct_chars(target, typed);
    let incorrect = incorrect_chars(target, typed);

    let elapsed_secs = duration_secs.saturating_sub(remaining_secs);
    let minutes = (elapsed_secs as f64 / 60.0).max(MIN_ELAPSED_MINUTES);

    TestStats {
        wpm: wpm(correct, minutes),
        raw_wpm: wpm(typed.len(), minutes),
        accuracy: percent(correct, typed.len(), 100),
        errors: incorrect as u32,
        correct_chars: correct as u32,
        incorrect_chars: incorrect as u32,
        total_chars: typed.len() as u32,
        consistency: consistency(&history.wpm_values()),
    }
}

/// 100 minus the coefficient of variation (in percent), clamped to 0..=100.
pub fn consistency(samples: &[f64]) -> u32 {
    if samples.len() <= 1 {
        return 100;
    }

    let (Some(sample_mean), Some(deviation)) = (mean(samples), std_dev(samples)) else {
        return 100;
    };

    if sample_mean == 0.0 {
        return if deviation > 0.0 { 0 } else { 100 };
    }

    round_u32(100.0 - (deviation / sample_mean) * 100.0).min(100)
}
