// Noise filtering: accessory/repair/used listings never qualify.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractor::dictionaries::STOP_WORDS;
use crate::extractor::normalize_text;

static STOPWORD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    STOP_WORDS
        .iter()
        .map(|w| {
            let word = normalize_text(w);
            Regex::new(&format!(r"\b{}\b", regex::escape(&word))).unwrap()
        })
        .collect()
});

/// Word-boundary match of the noise vocabulary against normalized text.
pub fn contains_stopwords(text: &str) -> bool {
    let text = normalize_text(text);
    STOPWORD_PATTERNS.iter().any(|p| p.is_match(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessory_titles_are_noise() {
        assert!(contains_stopwords("Чехол для iPhone 16 Pro"));
        assert!(contains_stopwords("Silicone Case iPhone 15"));
        assert!(contains_stopwords("Ремонт iPad Air, замена дисплея"));
    }

    #[test]
    fn used_listings_are_noise() {
        assert!(contains_stopwords("iPhone 14 128gb б/у"));
        assert!(contains_stopwords("MacBook Air M1 refurbished"));
    }

    #[test]
    fn device_titles_pass() {
        assert!(!contains_stopwords("iPhone 16 Pro Max 256GB Desert Titanium"));
        assert!(!contains_stopwords("MacBook Air M2 13 512GB Midnight"));
    }
}
