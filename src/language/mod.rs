use include_dir::{include_dir, Dir};
use serde::Deserialize;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Vocabulary the text generator samples from.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    /// Loads `src/lang/<name>.json` from the binary.
    pub fn load(name: &str) -> Option<Self> {
        let file = LANG_DIR.get_file(format!("{name}.json"))?;
        let contents = file.contents_utf8()?;

        match serde_json::from_str::<Language>(contents) {
            Ok(lang) if !lang.words.is_empty() => Some(lang),
            Ok(_) => {
                log::warn!("language {name} has no words");
                None
            }
            Err(err) => {
                log::warn!("language {name} failed to parse: {err}");
                None
            }
        }
    }

    /// The built-in English list.
    pub fn english() -> Self {
        Self::load("english").unwrap_or_else(|| Self::from_words("english", FALLBACK_WORDS))
    }

    pub fn from_words(name: &str, words: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            size: words.len() as u32,
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }
}

const FALLBACK_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "it", "for", "not", "on",
    "with", "as", "you", "do", "at", "this", "but",
];
