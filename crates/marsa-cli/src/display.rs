//! Terminal rendering: per-comment result cards and the compiled vocabulary.

use std::collections::BTreeMap;

use marsa_core::{AspectSentimentResult, PhraseMatcher};

const MAX_CONTEXT_CHARS: usize = 60;
const UNCATEGORISED: &str = "(none)";

/// Print one comment's result as a vertical card.
pub fn print_result_card(index: usize, result: &AspectSentimentResult) {
    println!("=== #{} ===", index + 1);
    println!("{}", result.original_or_text());
    if result.original_text.as_deref().is_some_and(|o| o != result.text) {
        println!("  {:<12} {}", "cleaned", result.text);
    }
    println!();

    if result.aspects.is_empty() {
        println!("  (no aspects found)");
        println!();
        return;
    }

    let counts = result.label_counts();
    println!(
        "Aspects ({}: {} positive, {} negative, {} neutral)",
        result.aspects.len(),
        counts.positive,
        counts.negative,
        counts.neutral
    );
    for a in &result.aspects {
        let m = &a.aspect_match;
        print!("  {:<20} {:<9}", m.aspect, a.sentiment);
        match a.confidence {
            Some(c) => print!(" {:>5.1}%", c * 100.0),
            None => print!(" {:>6}", "-"),
        }
        if let Some(cat) = &m.category {
            print!("  [{cat}]");
        }
        println!();
        if let Some(ctx) = &a.context_used {
            println!("      \"{}\"", truncate(ctx, MAX_CONTEXT_CHARS));
        }
    }
    println!();
}

/// Print the phrases compiled from a vocabulary, grouped by category.
pub fn print_vocabulary(matcher: &PhraseMatcher) {
    let mut by_category: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
    for (phrase, aspect, category) in matcher.phrases() {
        by_category
            .entry(category.unwrap_or(UNCATEGORISED))
            .or_default()
            .push((aspect, phrase));
    }

    println!("{} phrases", matcher.len());
    println!();
    for (category, mut entries) in by_category {
        entries.sort_unstable();
        println!("{category}");
        for (aspect, phrase) in entries {
            println!("  {:<20} {}", aspect, phrase);
        }
        println!();
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_strings_untouched() {
        assert_eq!(truncate("battery life", 60), "battery life");
    }

    #[test]
    fn truncate_long_strings_on_char_boundary() {
        let s = "é".repeat(80);
        let t = truncate(&s, 10);
        assert_eq!(t.chars().count(), 10);
        assert!(t.ends_with("..."));
    }
}
