//! Comment normalisation applied before tokenization.

use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\.\S+").expect("url pattern is valid"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+@\w+\.com").expect("email pattern is valid"));

// Pictographs plus the joiners, variation selectors and skin-tone modifiers
// that glue multi-codepoint emoji together.
static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Extended_Pictographic}\p{Emoji_Modifier}\x{200D}\x{FE0E}\x{FE0F}\x{20E3}]")
        .expect("emoji pattern is valid")
});

static SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("space pattern is valid"));

/// Lowercase, strip URLs, `@….com` emails and emoji, collapse whitespace.
pub fn clean_input(text: &str) -> String {
    let text = text.to_lowercase();
    let text = URL_RE.replace_all(&text, "");
    let text = EMAIL_RE.replace_all(&text, "");
    let text = EMOJI_RE.replace_all(&text, "");
    let text = SPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(clean_input("  The CAMERA Is Great  "), "the camera is great");
    }

    #[test]
    fn strips_urls() {
        assert_eq!(
            clean_input("see https://example.com/review and www.shop.example for more"),
            "see and for more"
        );
    }

    #[test]
    fn strips_emails() {
        assert_eq!(clean_input("mail support@vendor.com now"), "mail now");
    }

    #[test]
    fn strips_emoji() {
        assert_eq!(clean_input("love the camera 😍😍 👍🏽"), "love the camera");
        assert_eq!(clean_input("battery ❤️ life"), "battery life");
    }

    #[test]
    fn keeps_punctuation() {
        assert_eq!(clean_input("Great battery!!! Bad screen?"), "great battery!!! bad screen?");
    }

    #[test]
    fn empty_input() {
        assert_eq!(clean_input(""), "");
        assert_eq!(clean_input("🙂"), "");
    }
}
