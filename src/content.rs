use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

static WORDS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/words");

#[derive(Debug, Error)]
pub enum WordListError {
    #[error("word list {0} not found")]
    NotFound(String),
    #[error("failed to read word list: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse word list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("word list {0} has no words")]
    Empty(String),
    #[error("answer {0:?} must be non-empty uppercase A-Z")]
    InvalidAnswer(String),
}

/// A prompt shown to the player and the English word they must spell.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Word {
    pub prompt: String,
    pub answer: String,
}

impl Word {
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }
}

/// Non-empty, validated list of words to draw rounds from.
#[derive(Clone, Debug)]
pub struct WordList {
    name: String,
    words: Vec<Word>,
}

#[derive(Deserialize)]
struct RawWordList {
    name: String,
    words: Vec<Word>,
}

impl WordList {
    pub fn new(name: impl Into<String>, words: Vec<Word>) -> Result<Self, WordListError> {
        let name = name.into();
        if words.is_empty() {
            return Err(WordListError::Empty(name));
        }

        for word in &words {
            let valid = !word.answer.is_empty()
                && word.answer.chars().all(|c| c.is_ascii_uppercase());
            if !valid {
                return Err(WordListError::InvalidAnswer(word.answer.clone()));
            }
        }

        Ok(Self { name, words })
    }

    /// The list compiled into the binary.
    pub fn builtin() -> Result<Self, WordListError> {
        read_embedded("default.json")
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, WordListError> {
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes)
    }

    /// Parse a JSON list, then check it like [`WordList::new`] does.
    pub fn from_json(bytes: &[u8]) -> Result<Self, WordListError> {
        let raw: RawWordList = serde_json::from_slice(bytes)?;
        WordList::new(raw.name, raw.words)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn read_embedded(file_name: &str) -> Result<WordList, WordListError> {
    let file = WORDS_DIR
        .get_file(file_name)
        .ok_or_else(|| WordListError::NotFound(file_name.to_string()))?;

    WordList::from_json(file.contents())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_list() {
        let list = WordList::builtin().unwrap();

        assert_eq!(list.name(), "default");
        assert_eq!(list.len(), 10);
        assert!(list
            .words()
            .iter()
            .any(|w| w.answer == "CAT" && w.prompt == "貓"));
    }

    #[test]
    fn test_missing_embedded_file() {
        assert_matches!(
            read_embedded("nonexistent.json"),
            Err(WordListError::NotFound(_))
        );
    }

    #[test]
    fn test_deserialization() {
        let json_data = r#"
        {
            "name": "test",
            "words": [{ "prompt": "狗", "answer": "DOG" }]
        }
        "#;

        let list = WordList::from_json(json_data.as_bytes()).unwrap();
        assert_eq!(list.name(), "test");
        assert_eq!(list.words(), &[Word::new("狗", "DOG")]);
    }

    #[test]
    fn test_empty_list_rejected() {
        let json_data = r#"{ "name": "empty", "words": [] }"#;
        assert_matches!(
            WordList::from_json(json_data.as_bytes()),
            Err(WordListError::Empty(name)) if name == "empty"
        );
        assert_matches!(
            WordList::new("empty", vec![]),
            Err(WordListError::Empty(_))
        );
    }

    #[test]
    fn test_invalid_answers_rejected() {
        assert_matches!(
            WordList::new("bad", vec![Word::new("狗", "dog")]),
            Err(WordListError::InvalidAnswer(a)) if a == "dog"
        );
        assert_matches!(
            WordList::new("bad", vec![Word::new("空", "")]),
            Err(WordListError::InvalidAnswer(_))
        );
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(
            &path,
            r#"{ "name": "custom", "words": [{ "prompt": "書", "answer": "BOOK" }] }"#,
        )
        .unwrap();

        let list = WordList::from_path(&path).unwrap();
        assert_eq!(list.name(), "custom");
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_from_path_reports_validation_errors() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, r#"{ "name": "x", "words": [] }"#).unwrap();
        assert_matches!(
            WordList::from_path(&empty),
            Err(WordListError::Empty(name)) if name == "x"
        );

        let lower = dir.path().join("lower.json");
        std::fs::write(
            &lower,
            r#"{ "name": "x", "words": [{ "prompt": "書", "answer": "book" }] }"#,
        )
        .unwrap();
        assert_matches!(
            WordList::from_path(&lower),
            Err(WordListError::InvalidAnswer(a)) if a == "book"
        );

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert_matches!(WordList::from_path(&broken), Err(WordListError::Parse(_)));
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempdir().unwrap();
        assert_matches!(
            WordList::from_path(dir.path().join("nope.json")),
            Err(WordListError::Io(_))
        );
    }
}
