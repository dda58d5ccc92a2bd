use itertools::{EitherOrBoth, Itertools};

/// How a single position of the test renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharState {
    /// Target character the cursor has not reached yet.
    Unreached,
    Correct,
    Incorrect,
    /// Typed character past the end of the target.
    Extra,
}

impl CharState {
    pub fn is_error(self) -> bool {
        matches!(self, CharState::Incorrect | CharState::Extra)
    }
}

/// Classifies every position of `max(target.len(), typed.len())`.
///
/// Comparison is exact `char` equality.
pub fn classify(target: &[char], typed: &[char]) -> Vec<CharState> {
    target
        .iter()
        .zip_longest(typed.iter())
        .map(|pair| match pair {
            EitherOrBoth::Both(expected, actual) if expected == actual => CharState::Correct,
            EitherOrBoth::Both(_, _) => CharState::Incorrect,
            EitherOrBoth::Left(_) => CharState::Unreached,
            EitherOrBoth::Right(_) => CharState::Extra,
        })
        .collect()
}
