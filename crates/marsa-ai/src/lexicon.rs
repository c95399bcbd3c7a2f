//! Lexicon-based polarity scoring (VADER-style).
//!
//! Each word found in the valence lexicon contributes its mean valence,
//! adjusted by the rules below, and the sum is squashed into a compound
//! score in `[-1, 1]`:
//!
//! - booster / dampener words within three tokens before a word shift its
//!   valence by ±0.293 (decaying with distance),
//! - a negation within three tokens before a word flips and damps it (×-0.74),
//! - an ALL-CAPS word in mixed-case text gains ±0.733,
//! - "but" halves the valence of words before it and boosts those after it (×1.5),
//! - `!` and `?` amplify the sum away from zero.
//!
//! [`VaderLexicon`] applies these rules to the compact built-in lexicon or to
//! a lexicon file. [`ReferenceVader`] is the published VADER scorer with its
//! full ~7,500-entry lexicon and emoji table, and is the default for corpora.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::info;

/// A source of compound polarity scores in `[-1, 1]`.
pub trait LexiconScorer {
    fn compound(&self, text: &str) -> anyhow::Result<f32>;
}

const B_INCR: f32 = 0.293;
const B_DECR: f32 = -0.293;
const C_INCR: f32 = 0.733;
const N_SCALAR: f32 = -0.74;
const NORMALIZATION_ALPHA: f32 = 15.0;
const EXCLAIM_INCR: f32 = 0.292;
const QUESTION_INCR: f32 = 0.18;
const QUESTION_MAX: f32 = 0.96;
const BUT_BEFORE: f32 = 0.5;
const BUT_AFTER: f32 = 1.5;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neednt", "neither", "never", "no", "nobody",
    "none", "nope", "nor", "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "wasnt",
    "werent", "without", "wont", "wouldnt", "rarely", "seldom", "despite",
];

const BOOSTERS: &[(&str, f32)] = &[
    ("absolutely", B_INCR),
    ("amazingly", B_INCR),
    ("awfully", B_INCR),
    ("completely", B_INCR),
    ("considerably", B_INCR),
    ("decidedly", B_INCR),
    ("deeply", B_INCR),
    ("enormously", B_INCR),
    ("entirely", B_INCR),
    ("especially", B_INCR),
    ("exceptionally", B_INCR),
    ("extremely", B_INCR),
    ("fabulously", B_INCR),
    ("greatly", B_INCR),
    ("highly", B_INCR),
    ("hugely", B_INCR),
    ("incredibly", B_INCR),
    ("intensely", B_INCR),
    ("majorly", B_INCR),
    ("more", B_INCR),
    ("most", B_INCR),
    ("particularly", B_INCR),
    ("purely", B_INCR),
    ("quite", B_INCR),
    ("really", B_INCR),
    ("remarkably", B_INCR),
    ("so", B_INCR),
    ("substantially", B_INCR),
    ("thoroughly", B_INCR),
    ("totally", B_INCR),
    ("tremendously", B_INCR),
    ("truly", B_INCR),
    ("unbelievably", B_INCR),
    ("utterly", B_INCR),
    ("very", B_INCR),
    ("almost", B_DECR),
    ("barely", B_DECR),
    ("hardly", B_DECR),
    ("less", B_DECR),
    ("marginally", B_DECR),
    ("occasionally", B_DECR),
    ("partly", B_DECR),
    ("scarcely", B_DECR),
    ("slightly", B_DECR),
    ("somewhat", B_DECR),
];

/// Compact English valence lexicon (mean ratings on the -4..4 VADER scale).
const BUILTIN_VALENCES: &[(&str, f32)] = &[
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("brilliant", 2.8),
    ("clean", 1.7),
    ("cool", 1.3),
    ("easy", 1.9),
    ("enjoy", 2.2),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("favorite", 2.0),
    ("fine", 0.8),
    ("fun", 2.3),
    ("glad", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("impressive", 2.3),
    ("like", 2.0),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("nice", 1.8),
    ("ok", 1.2),
    ("okay", 0.9),
    ("perfect", 2.7),
    ("pleased", 1.9),
    ("recommend", 1.5),
    ("satisfied", 1.8),
    ("smooth", 1.8),
    ("solid", 0.9),
    ("strong", 2.3),
    ("superb", 3.1),
    ("thanks", 1.9),
    ("useful", 1.9),
    ("win", 2.8),
    ("wonderful", 2.7),
    ("worth", 0.9),
    ("angry", -2.3),
    ("annoying", -1.8),
    ("awful", -2.0),
    ("bad", -2.5),
    ("boring", -1.3),
    ("broke", -1.8),
    ("broken", -2.1),
    ("bug", -1.5),
    ("buggy", -1.9),
    ("crap", -1.6),
    ("dead", -3.3),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("dislike", -1.6),
    ("fail", -2.5),
    ("failed", -2.3),
    ("fails", -1.8),
    ("frustrating", -1.9),
    ("garbage", -2.0),
    ("hate", -2.7),
    ("hated", -3.2),
    ("horrible", -2.5),
    ("issue", -0.8),
    ("lag", -1.2),
    ("mediocre", -1.0),
    ("poor", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("sad", -2.1),
    ("slow", -1.0),
    ("stupid", -2.4),
    ("sucks", -1.5),
    ("terrible", -2.1),
    ("ugly", -2.3),
    ("unhappy", -1.8),
    ("useless", -1.8),
    ("waste", -1.8),
    ("weak", -1.9),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

/// VADER-style lexicon scorer.
pub struct VaderLexicon {
    valences: HashMap<String, f32>,
    boosters: HashMap<&'static str, f32>,
}

impl VaderLexicon {
    /// Scorer over the built-in compact lexicon.
    pub fn builtin() -> Self {
        let valences = BUILTIN_VALENCES
            .iter()
            .map(|&(w, v)| (w.to_string(), v))
            .collect();
        Self::with_valences(valences)
    }

    /// Load a full `vader_lexicon.txt` (tab-separated `word  mean  stddev  ratings`).
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading lexicon {}", path.display()))?;
        let lexicon = Self::parse(&raw)?;
        info!(
            path = %path.display(),
            entries = lexicon.len(),
            "loaded sentiment lexicon"
        );
        Ok(lexicon)
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut valences = HashMap::new();
        for (idx, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let word = fields.next().unwrap_or_default().trim();
            let mean = fields
                .next()
                .ok_or_else(|| anyhow::anyhow!("lexicon line {}: missing valence", idx + 1))?;
            let mean: f32 = mean
                .trim()
                .parse()
                .with_context(|| format!("lexicon line {}: bad valence {mean:?}", idx + 1))?;
            valences.insert(word.to_lowercase(), mean);
        }
        anyhow::ensure!(!valences.is_empty(), "lexicon has no entries");
        Ok(Self::with_valences(valences))
    }

    fn with_valences(valences: HashMap<String, f32>) -> Self {
        Self {
            valences,
            boosters: BOOSTERS.iter().copied().collect(),
        }
    }

    /// Number of lexicon entries.
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }

    /// Compound polarity of `text` in `[-1, 1]`.
    pub fn polarity(&self, text: &str) -> f32 {
        let words: Vec<&str> = text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\''))
            .filter(|w| w.chars().count() > 1)
            .collect();
        if words.is_empty() {
            return 0.0;
        }

        let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let cap_diff = is_cap_differential(&words);

        let mut sentiments = Vec::with_capacity(words.len());
        for (i, word) in lowered.iter().enumerate() {
            if self.boosters.contains_key(word.as_str()) {
                sentiments.push(0.0);
                continue;
            }
            let Some(&base) = self.valences.get(word) else {
                sentiments.push(0.0);
                continue;
            };

            let mut valence = base;
            if cap_diff && is_all_caps(words[i]) {
                valence += C_INCR.copysign(base);
            }

            for (distance, decay) in [(1usize, 1.0f32), (2, 0.95), (3, 0.9)] {
                if i < distance {
                    break;
                }
                let prev = &lowered[i - distance];
                if let Some(&boost) = self.boosters.get(prev.as_str()) {
                    let mut shift = if valence < 0.0 { -boost } else { boost };
                    if cap_diff && is_all_caps(words[i - distance]) {
                        shift += C_INCR.copysign(shift);
                    }
                    valence += shift * decay;
                }
                if is_negation(prev) {
                    valence *= N_SCALAR;
                }
            }

            sentiments.push(valence);
        }

        if let Some(but) = lowered.iter().position(|w| w == "but") {
            for (i, s) in sentiments.iter_mut().enumerate() {
                if i < but {
                    *s *= BUT_BEFORE;
                } else if i > but {
                    *s *= BUT_AFTER;
                }
            }
        }

        let mut sum: f32 = sentiments.iter().sum();
        let emphasis = punctuation_emphasis(text);
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }

        normalize(sum)
    }
}

/// The published VADER analyzer, full lexicon included.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceVader;

impl LexiconScorer for ReferenceVader {
    fn compound(&self, text: &str) -> anyhow::Result<f32> {
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let compound = scores
            .get("compound")
            .copied()
            .ok_or_else(|| anyhow::anyhow!("vader returned no compound score"))?;
        Ok(compound as f32)
    }
}

impl Default for VaderLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LexiconScorer for VaderLexicon {
    fn compound(&self, text: &str) -> anyhow::Result<f32> {
        Ok(self.polarity(text))
    }
}

fn is_negation(word: &str) -> bool {
    let stripped: String = word.chars().filter(|&c| c != '\'' && c != '’').collect();
    NEGATIONS.contains(&stripped.as_str()) || word.ends_with("n't")
}

fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

/// True when some, but not all, words are ALL CAPS.
fn is_cap_differential(words: &[&str]) -> bool {
    let caps = words.iter().filter(|w| is_all_caps(w)).count();
    caps > 0 && caps < words.len()
}

fn punctuation_emphasis(text: &str) -> f32 {
    let exclaims = text.matches('!').count().min(4) as f32;
    let questions = text.matches('?').count();
    let question_amp = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f32 * QUESTION_INCR,
        _ => QUESTION_MAX,
    };
    exclaims * EXCLAIM_INCR + question_amp
}

/// Squash an unbounded valence sum into `[-1, 1]`.
fn normalize(score: f32) -> f32 {
    let norm = score / (score * score + NORMALIZATION_ALPHA).sqrt();
    norm.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn score(text: &str) -> f32 {
        VaderLexicon::builtin().polarity(text)
    }

    #[test]
    fn single_word_matches_vader_normalization() {
        // 1.9 / sqrt(1.9² + 15)
        assert!((score("good") - 0.4404).abs() < 1e-3);
    }

    #[test]
    fn neutral_text_scores_zero() {
        assert_eq!(score("the phone arrived on tuesday"), 0.0);
        assert_eq!(score(""), 0.0);
        assert_eq!(score("!!!"), 0.0);
    }

    #[test]
    fn polarity_signs() {
        assert!(score("the camera is great") > 0.05);
        assert!(score("the battery is terrible") < -0.05);
    }

    #[test]
    fn negation_flips() {
        assert!(score("the camera is not great") < 0.0);
        assert!(score("the camera isn't great") < 0.0);
        assert!(score("never bad") > 0.0);
    }

    #[test]
    fn boosters_and_dampeners() {
        assert!(score("very good") > score("good"));
        assert!(score("slightly good") < score("good"));
        assert!(score("very bad") < score("bad"));
    }

    #[test]
    fn caps_emphasis_in_mixed_case() {
        assert!(score("the screen is GREAT") > score("the screen is great"));
        // All caps text has no differential.
        assert_eq!(score("GREAT"), score("great"));
    }

    #[test]
    fn exclamation_amplifies() {
        assert!(score("great!!!") > score("great"));
        assert!(score("awful!!") < score("awful"));
    }

    #[test]
    fn but_shifts_weight_to_second_clause() {
        assert!(score("the camera is good but the battery is terrible") < 0.0);
        assert!(score("the battery is bad but the camera is great") > 0.0);
    }

    #[test]
    fn compound_is_bounded() {
        let s = score("BEST BEST BEST love love love amazing awesome!!!! wonderful");
        assert!(s <= 1.0 && s > 0.9);
        let s = score("worst worst hate hate awful horrible terrible!!!!");
        assert!((-1.0..-0.9).contains(&s));
    }

    #[test]
    fn parse_vader_lexicon_format() {
        let lex = VaderLexicon::parse("superb\t3.1\t0.5\t[3, 3]\nmeh\t-0.3\t0.4\t[0, -1]\n").unwrap();
        assert_eq!(lex.len(), 2);
        assert!(lex.polarity("superb") > 0.6);
        assert!(lex.polarity("meh") < 0.0);
        assert_eq!(lex.polarity("good"), 0.0);
    }

    #[test]
    fn parse_rejects_bad_valence() {
        assert!(VaderLexicon::parse("word\tnot-a-number\n").is_err());
        assert!(VaderLexicon::parse("word\n").is_err());
        assert!(VaderLexicon::parse("\n\n").is_err());
    }

    #[test]
    fn from_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vader_lexicon.txt");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "splendid\t2.8\t0.6\t[3, 3, 2]").unwrap();
        drop(f);

        let lex = VaderLexicon::from_file(&path).unwrap();
        assert_eq!(lex.len(), 1);
        assert!(lex.compound("splendid").unwrap() > 0.5);
    }

    #[test]
    fn from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(VaderLexicon::from_file(&dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn reference_vader_covers_everyday_review_words() {
        let vader = ReferenceVader;
        let died = vader.compound("battery died").unwrap();
        assert!(died < -0.4, "battery died -> {died}");
        assert!(vader.compound("the screen is disappointing").unwrap() < -0.05);
        assert!(vader.compound("amazing camera").unwrap() > 0.05);
        assert_eq!(vader.compound("arrived on tuesday").unwrap(), 0.0);

        // The compact list has no entry for "died".
        assert_eq!(score("battery died"), 0.0);
    }
}
