//! Exact-phrase aspect matcher.
//!
//! Phrases are tokenized with the same tokenizer as the documents and
//! compared token by token, case-insensitively. There is no fuzzy or
//! synonym matching.

use std::collections::HashSet;

use tracing::debug;

use crate::{AspectConfig, AspectMatch, Document};

struct Pattern {
    tokens: Vec<String>,
    phrase: String,
    aspect: String,
    category: Option<String>,
}

/// Phrase matcher compiled once from an [`AspectConfig`].
pub struct PhraseMatcher {
    patterns: Vec<Pattern>,
}

impl PhraseMatcher {
    pub fn new(config: &AspectConfig) -> Self {
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut patterns = Vec::new();

        // BTreeMap order: a phrase claimed by two aspects goes to the first by name.
        for (name, data) in &config.aspects {
            for phrase in data.phrases_or(name) {
                let tokens: Vec<String> = Document::parse(phrase)
                    .token_texts()
                    .map(str::to_lowercase)
                    .collect();
                if tokens.is_empty() || !seen.insert(tokens.clone()) {
                    continue;
                }
                patterns.push(Pattern {
                    tokens,
                    phrase: phrase.to_string(),
                    aspect: name.clone(),
                    category: data.category.clone(),
                });
            }
        }

        // Stable sort: at equal token_start, shorter matches come first.
        patterns.sort_by_key(|p| p.tokens.len());

        debug!(patterns = patterns.len(), "compiled phrase matcher");
        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// `(phrase, aspect, category)` for every compiled pattern.
    pub fn phrases(&self) -> impl Iterator<Item = (&str, &str, Option<&str>)> {
        self.patterns
            .iter()
            .map(|p| (p.phrase.as_str(), p.aspect.as_str(), p.category.as_deref()))
    }

    /// All occurrences in `doc`, overlapping ones included, ordered by
    /// `(token_start, token_end)`.
    pub fn find(&self, doc: &Document) -> Vec<AspectMatch> {
        let lowered: Vec<String> = doc.token_texts().map(str::to_lowercase).collect();
        let mut matches = Vec::new();

        for start in 0..lowered.len() {
            for pattern in &self.patterns {
                let end = start + pattern.tokens.len();
                if end > lowered.len() || lowered[start..end] != pattern.tokens[..] {
                    continue;
                }
                let chars = doc.char_span(start..end);
                matches.push(AspectMatch {
                    text: doc.span_text(start..end).to_string(),
                    aspect: pattern.aspect.clone(),
                    start: chars.start,
                    end: chars.end,
                    token_start: start,
                    token_end: end,
                    category: pattern.category.clone(),
                });
            }
        }

        matches
    }

    /// Tokenize `text` and match it, returning the matches with the document
    /// they index into.
    pub fn match_text(&self, text: &str) -> (Vec<AspectMatch>, Document) {
        let doc = Document::parse(text);
        let matches = self.find(&doc);
        (matches, doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AspectConfig {
        AspectConfig::from_txt_str("hardware: camera, battery\ninterface: screen\n").unwrap()
    }

    #[test]
    fn matches_with_offsets_and_categories() {
        let matcher = PhraseMatcher::new(&config());
        let (aspects, doc) = matcher.match_text("I love the camera but hate the battery life");

        assert_eq!(doc.text(), "I love the camera but hate the battery life");
        assert_eq!(aspects.len(), 2);

        let camera = &aspects[0];
        assert_eq!(camera.text, "camera");
        assert_eq!(camera.aspect, "camera");
        assert_eq!((camera.start, camera.end), (11, 17));
        assert_eq!((camera.token_start, camera.token_end), (3, 4));
        assert_eq!(camera.category.as_deref(), Some("hardware"));

        let battery = &aspects[1];
        assert_eq!(battery.text, "battery");
        assert_eq!((battery.start, battery.end), (31, 38));
        assert_eq!((battery.token_start, battery.token_end), (7, 8));
        assert_eq!(battery.category.as_deref(), Some("hardware"));
    }

    #[test]
    fn no_matches() {
        let matcher = PhraseMatcher::new(&config());
        let (aspects, doc) = matcher.match_text("This is a simple sentence with no relevant terms");
        assert!(aspects.is_empty());
        assert!(!doc.is_empty());
    }

    #[test]
    fn case_insensitive_keeps_surface_text() {
        let matcher = PhraseMatcher::new(&config());
        let (aspects, _) = matcher.match_text("The CAMERA is great");
        assert_eq!(aspects.len(), 1);
        assert_eq!(aspects[0].text, "CAMERA");
        assert_eq!(aspects[0].aspect, "camera");
    }

    #[test]
    fn repeated_aspect_yields_each_occurrence() {
        let matcher = PhraseMatcher::new(&config());
        let (aspects, _) = matcher.match_text("camera good, camera bad");
        let starts: Vec<usize> = aspects.iter().map(|a| a.token_start).collect();
        assert_eq!(starts, vec![0, 3]);
    }

    #[test]
    fn multiword_and_overlapping_phrases() {
        let config = AspectConfig::from_yaml_str(
            "aspects:\n  battery:\n    phrases: [battery life]\n  power:\n    phrases: [battery]\n",
        )
        .unwrap();
        let matcher = PhraseMatcher::new(&config);
        let (aspects, _) = matcher.match_text("the battery life is short");

        assert_eq!(aspects.len(), 2);
        assert_eq!(aspects[0].aspect, "power");
        assert_eq!((aspects[0].token_start, aspects[0].token_end), (1, 2));
        assert_eq!(aspects[1].aspect, "battery");
        assert_eq!(aspects[1].text, "battery life");
        assert_eq!((aspects[1].token_start, aspects[1].token_end), (1, 3));
    }

    #[test]
    fn phrase_must_match_whole_tokens() {
        let matcher = PhraseMatcher::new(&config());
        let (aspects, _) = matcher.match_text("cameras and screensavers");
        assert!(aspects.is_empty());
    }

    #[test]
    fn duplicate_phrase_goes_to_first_aspect() {
        let config = AspectConfig::from_json_str(
            r#"{"aspects": {
                "b_display": {"phrases": ["screen"]},
                "a_screen": {"phrases": ["Screen"]}
            }}"#,
        )
        .unwrap();
        let matcher = PhraseMatcher::new(&config);
        assert_eq!(matcher.len(), 1);
        let (aspects, _) = matcher.match_text("nice screen");
        assert_eq!(aspects.len(), 1);
        assert_eq!(aspects[0].aspect, "a_screen");
        assert_eq!(matcher.phrases().next(), Some(("Screen", "a_screen", None)));
    }
}
