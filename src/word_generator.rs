use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::language::Language;
use crate::session::TargetText;

/// Produces the target text for a new test.
pub trait TextSource {
    fn generate(&mut self, word_count: usize) -> TargetText;
}

/// Samples words without replacement from a vocabulary.
#[derive(Debug, Clone)]
pub struct WordGenerator<R: Rng> {
    language: Language,
    rng: R,
}

impl WordGenerator<StdRng> {
    pub fn from_entropy(language: Language) -> Self {
        Self::new(language, StdRng::from_entropy())
    }

    /// Reproducible generator for tests.
    pub fn seeded(language: Language, seed: u64) -> Self {
        Self::new(language, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> WordGenerator<R> {
    pub fn new(language: Language, rng: R) -> Self {
        Self { language, rng }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Up to `count` distinct vocabulary entries in random order.
    pub fn sample_words(&mut self, count: usize) -> Vec<&str> {
        let mut words: Vec<&str> = self.language.words.iter().map(String::as_str).collect();
        words.shuffle(&mut self.rng);
        words.truncate(count.max(1));
        words
    }
}

impl<R: Rng> TextSource for WordGenerator<R> {
    fn generate(&mut self, word_count: usize) -> TargetText {
        let text = self.sample_words(word_count).join(" ");
        TargetText::new(&text).unwrap_or_else(|_| fallback_text())
    }
}

/// Always yields the same prompt.
#[derive(Debug, Clone)]
pub struct FixedText {
    text: TargetText,
}

impl FixedText {
    pub fn new(text: TargetText) -> Self {
        Self { text }
    }
}

impl TextSource for FixedText {
    fn generate(&mut self, _word_count: usize) -> TargetText {
        self.text.clone()
    }
}

fn fallback_text() -> TargetText {
    log::warn!("vocabulary produced an empty prompt, using fallback text");
    TargetText::pangram()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn generator(seed: u64) -> WordGenerator<StdRng> {
        WordGenerator::seeded(Language::english(), seed)
    }

    #[test]
    fn test_generates_requested_word_count() {
        let text = generator(7).generate(25).to_string();
        assert_eq!(text.split(' ').count(), 25);
        assert!(!text.starts_with(' ') && !text.ends_with(' '));
        assert!(!text.contains("  "));
    }

    #[test]
    fn test_samples_without_replacement() {
        let text = generator(11).generate(150).to_string();
        let words: Vec<&str> = text.split(' ').collect();
        let unique: HashSet<&str> = words.iter().copied().collect();
        assert_eq!(unique.len(), words.len());
    }

    #[test]
    fn test_same_seed_same_text() {
        assert_eq!(generator(42).generate(10), generator(42).generate(10));
    }

    #[test]
    fn test_zero_words_still_non_empty() {
        let text = generator(1).generate(0);
        assert!(!text.is_empty());
        assert!(!text.to_string().contains(' '));
    }

    #[test]
    fn test_word_count_beyond_vocabulary_uses_everything() {
        let lang = Language::from_words("tiny", &["ab", "cd", "ef"]);
        let mut gen = WordGenerator::seeded(lang, 3);
        let text = gen.generate(10).to_string();
        let mut words: Vec<&str> = text.split(' ').collect();
        words.sort();
        assert_eq!(words, vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn test_fixed_text_ignores_word_count() {
        let mut source = FixedText::new(TargetText::new("hi there").unwrap());
        assert_eq!(source.generate(99).to_string(), "hi there");
        assert_eq!(source.generate(1).to_string(), "hi there");
    }
}
