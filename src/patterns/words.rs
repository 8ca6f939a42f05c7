//! Word lists and their compiled matchers.

use std::collections::HashSet;
use std::path::Path;

use aho_corasick::AhoCorasick;

use crate::common::{parse_list, read_list_file};
use crate::error::ResourceWarning;

/// Shorter words produce too many false positives.
pub const MIN_WORD_LEN: usize = 4;

const BUILTIN_DICTIONARY: &str = include_str!("../../assets/dictionary.txt");
const BUILTIN_CONTEXT: &str = include_str!("../../assets/context.txt");

/// Dictionary words and contextual (brand, tech, pop-culture) terms.
#[derive(Debug, Clone, Default)]
pub struct WordLists {
    dictionary: Vec<String>,
    context: Vec<String>,
}

impl WordLists {
    pub fn builtin() -> Self {
        Self::new(parse_list(BUILTIN_DICTIONARY), parse_list(BUILTIN_CONTEXT))
    }

    /// Lowercases, drops words shorter than `MIN_WORD_LEN` and duplicates.
    pub fn new<D, C>(dictionary: D, context: C) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self {
            dictionary: normalize_words(dictionary),
            context: normalize_words(context),
        }
    }

    /// Configured files replace the bundled lists. A file that cannot be
    /// loaded yields an empty list plus a warning.
    pub fn load(
        dictionary_path: Option<&Path>,
        context_path: Option<&Path>,
    ) -> (Self, Vec<ResourceWarning>) {
        let mut warnings = Vec::new();
        let builtin = Self::builtin();

        let dictionary = match dictionary_path {
            Some(path) => load_words(path, "dictionary", &mut warnings),
            None => builtin.dictionary,
        };
        let context = match context_path {
            Some(path) => load_words(path, "context terms", &mut warnings),
            None => builtin.context,
        };

        (Self { dictionary, context }, warnings)
    }

    pub fn dictionary(&self) -> &[String] {
        &self.dictionary
    }

    pub fn context(&self) -> &[String] {
        &self.context
    }
}

fn normalize_words<I>(words: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| w.chars().count() >= MIN_WORD_LEN)
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

fn load_words(path: &Path, resource: &'static str, warnings: &mut Vec<ResourceWarning>) -> Vec<String> {
    match read_list_file(path) {
        Ok(content) => {
            let words = normalize_words(parse_list(&content));
            #[cfg(feature = "tracing")]
            tracing::info!("Word list loaded: {} {} entries from {:?}", words.len(), resource, path);
            words
        }
        Err(error) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("Word list unavailable ({}), continuing without it: {}", resource, error);
            warnings.push(ResourceWarning { resource, error });
            Vec::new()
        }
    }
}

/// A word occurrence: byte range in the haystack and the list word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordHit {
    pub start: usize,
    pub end: usize,
    pub word: usize,
}

/// Case-insensitive multi-word matcher, overlapping hits included.
#[derive(Debug, Clone)]
pub struct WordMatcher {
    automaton: Option<AhoCorasick>,
    words: Vec<String>,
}

impl WordMatcher {
    pub fn new(words: &[String]) -> Result<Self, aho_corasick::BuildError> {
        let automaton = if words.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .ascii_case_insensitive(true)
                    .build(words)?,
            )
        };
        Ok(Self {
            automaton,
            words: words.to_vec(),
        })
    }

    pub fn find(&self, haystack: &str) -> Vec<WordHit> {
        let Some(automaton) = &self.automaton else {
            return Vec::new();
        };
        automaton
            .find_overlapping_iter(haystack)
            .map(|m| WordHit {
                start: m.start(),
                end: m.end(),
                word: m.pattern().as_usize(),
            })
            .collect()
    }

    pub fn word(&self, index: usize) -> &str {
        &self.words[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_lists_filter_short_words() {
        let lists = WordLists::builtin();
        assert!(lists.dictionary().iter().any(|w| w == "password"));
        assert!(lists.context().iter().any(|w| w == "google"));
        assert!(lists.dictionary().iter().all(|w| w.chars().count() >= MIN_WORD_LEN));
    }

    #[test]
    fn test_new_lowercases_and_dedups() {
        let lists = WordLists::new(["Dragon", "dragon", "cat"], Vec::<String>::new());
        assert_eq!(lists.dictionary(), &["dragon".to_string()]);
    }

    #[test]
    fn test_load_missing_file_degrades_to_empty() {
        let (lists, warnings) = WordLists::load(Some(Path::new("/nonexistent/words.txt")), None);
        assert!(lists.dictionary().is_empty());
        assert!(!lists.context().is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].resource, "dictionary");
    }

    #[test]
    fn test_load_custom_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "acme").unwrap();
        writeln!(temp_file, "initech").unwrap();
        let (lists, warnings) = WordLists::load(None, Some(temp_file.path()));
        assert!(warnings.is_empty());
        assert_eq!(lists.context(), &["acme".to_string(), "initech".to_string()]);
    }

    #[test]
    fn test_matcher_overlapping_case_insensitive() {
        let words = vec!["password".to_string(), "word".to_string()];
        let matcher = WordMatcher::new(&words).unwrap();
        let hits = matcher.find("MyPASSWORD");
        let found: Vec<&str> = hits.iter().map(|h| matcher.word(h.word)).collect();
        assert!(found.contains(&"password"));
        assert!(found.contains(&"word"));
        assert_eq!(hits.iter().find(|h| matcher.word(h.word) == "password").unwrap().start, 2);
    }

    #[test]
    fn test_empty_matcher() {
        let matcher = WordMatcher::new(&[]).unwrap();
        assert!(matcher.find("anything").is_empty());
    }
}
