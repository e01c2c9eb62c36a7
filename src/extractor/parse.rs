// Canonical attribute extraction from noisy product text.
//
// Pure and total: any input maps to a `CanonicalAttributes`, unrecognized
// text yields an empty record. Pattern precedence lives in explicit
// ordered tables (see dictionaries.rs) rather than in match arms.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractor::dictionaries::{
    COLORS, IPAD_SIZES, IPHONE_MODELS, MACBOOK_SIZES, STORAGE,
};
use crate::model::{CanonicalAttributes, Category};

static IPHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\biphone\b").unwrap());
static MACBOOK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bmacbook\b").unwrap());
static IPAD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bipad\b").unwrap());
static AIRPODS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bair\s*pods\b").unwrap());

static IPHONE_MODEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({})\b", IPHONE_MODELS.join("|"))).unwrap()
});

static LINE_PRO_MAX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bpro\s*max\b").unwrap());
static LINE_PRO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bpro\b").unwrap());
static LINE_PLUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bplus\b").unwrap());
static LINE_MINI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bmini\b").unwrap());
static LINE_AIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bair\b").unwrap());

// Normalization splits letter/digit runs, so "m4" arrives as "m 4".
static CHIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bm\s?([1-5])\b").unwrap());

static IPAD_PRO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bipad\s*pro\b").unwrap());
static IPAD_AIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bipad\s*air\b").unwrap());
static IPAD_MINI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bipad\s*mini\b").unwrap());

static AIRPODS_MAX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bair\s*pods\s*max\b").unwrap());
static AIRPODS_PRO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bair\s*pods\s*pro\b").unwrap());
static AIRPODS_PRO_MODEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bpro\s*([23])\b").unwrap());
static AIRPODS_ORDINAL_EN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([23])\s*(?:nd|rd|th)\b").unwrap());
static AIRPODS_GEN_EN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([23])\s*gen(?:eration)?\b").unwrap());
static AIRPODS_GEN_RU_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([23])\s*(?:-?\s*го)?\s*поколен(?:ие|ия)\b").unwrap());
static AIRPODS_MODEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bair\s*pods\s*(?:gen\s*)?([2-4])\b|\b([2-4])\s*gen\b").unwrap()
});

static RAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(8|16|24|36|48)\s*gb\b").unwrap());

static NUMBER_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2}(?:[.,]\d+)?)\b").unwrap());
static UNIT_TAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(gb|гб|tb|тб)\b").unwrap());

/// Lowercases, folds "ё" to "е" (retailers and users mix the spellings),
/// and splits glued letter/digit runs so "iphone16pro" and "iPhone 16 Pro"
/// scan identically.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase().replace('ё', "е");
    let mut out = String::with_capacity(lowered.len() + 8);
    let mut prev: Option<char> = None;
    for c in lowered.chars() {
        if let Some(p) = prev {
            let transition = (p.is_alphabetic() && c.is_ascii_digit())
                || (p.is_ascii_digit() && c.is_alphabetic());
            if transition {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Fixed priority: ipad before iphone before macbook before airpods.
/// A case listing saying "для iphone и ipad" resolves to the device the
/// earliest keyword names.
fn detect_category(text: &str) -> Option<Category> {
    if IPAD_RE.is_match(text) {
        return Some(Category::Ipad);
    }
    if IPHONE_RE.is_match(text) {
        return Some(Category::Iphone);
    }
    if MACBOOK_RE.is_match(text) {
        return Some(Category::Macbook);
    }
    if AIRPODS_RE.is_match(text) {
        return Some(Category::Airpods);
    }
    None
}

fn capture_one(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Screen size as a bare number within the category's allowed set.
///
/// Exclusions: a number followed by a capacity unit is storage, not a
/// size; a number preceded by a standalone chip letter ("m", Latin or
/// Cyrillic, possibly space-separated after normalization) is a chip
/// generation; a number running into any other letter is part of a word.
fn extract_size(text: &str, allowed: &[u32]) -> Option<String> {
    for caps in NUMBER_TOKEN_RE.captures_iter(text) {
        let m = match caps.get(1) {
            Some(m) => m,
            None => continue,
        };

        let head = &text[..m.start()];
        let mut before = head.chars().rev();
        let prev = before.next();
        let candidate = match prev {
            Some(' ') => before.next(),
            other => other,
        };
        // The chip letter must be a whole token; "premium 13" and
        // "слим 13" are sizes, not m-series generations.
        if matches!(candidate, Some('m') | Some('м'))
            && !before.next().is_some_and(|c| c.is_alphanumeric())
        {
            continue;
        }

        let tail = &text[m.end()..];
        if UNIT_TAIL_RE.is_match(tail) {
            continue;
        }
        if tail.chars().next().is_some_and(|c| c.is_alphabetic()) {
            continue;
        }

        let token = m.as_str().replace(',', ".");
        let Ok(value) = token.parse::<f64>() else {
            continue;
        };
        let int_part = value as u32;
        if allowed.contains(&int_part) {
            return Some(int_part.to_string());
        }
    }
    None
}

fn extract_storage(text: &str) -> Option<String> {
    for (key, synonyms) in STORAGE {
        if synonyms.iter().any(|s| text.contains(s)) {
            return Some((*key).to_string());
        }
    }
    None
}

// First key in table order with a substring hit wins; declaration order
// is the precedence rule (see dictionaries.rs).
fn extract_color(text: &str) -> Option<String> {
    for (key, synonyms) in COLORS {
        if synonyms.iter().any(|s| text.contains(s)) {
            return Some((*key).to_string());
        }
    }
    None
}

fn extract_iphone(text: &str, attrs: &mut CanonicalAttributes) {
    attrs.model = capture_one(&IPHONE_MODEL_RE, text);

    // Most specific line first: "pro" alone must not mask "pro max".
    attrs.line = if LINE_PRO_MAX_RE.is_match(text) {
        Some("pro max".to_string())
    } else if LINE_PRO_RE.is_match(text) {
        Some("pro".to_string())
    } else if LINE_PLUS_RE.is_match(text) {
        Some("plus".to_string())
    } else if LINE_MINI_RE.is_match(text) {
        Some("mini".to_string())
    } else {
        None
    };
}

fn extract_macbook(text: &str, attrs: &mut CanonicalAttributes) {
    attrs.line = if LINE_PRO_RE.is_match(text) {
        Some("pro".to_string())
    } else if LINE_AIR_RE.is_match(text) {
        Some("air".to_string())
    } else {
        None
    };

    if let Some(generation) = capture_one(&CHIP_RE, text) {
        let chip = format!("m{generation}");
        attrs.chip = Some(chip.clone());
        attrs.model = Some(chip);
    }

    attrs.size = extract_size(text, MACBOOK_SIZES);
}

fn extract_ipad(text: &str, attrs: &mut CanonicalAttributes) {
    attrs.line = if IPAD_PRO_RE.is_match(text) {
        Some("pro".to_string())
    } else if IPAD_AIR_RE.is_match(text) {
        Some("air".to_string())
    } else if IPAD_MINI_RE.is_match(text) {
        Some("mini".to_string())
    } else {
        Some("ipad".to_string())
    };

    attrs.size = extract_size(text, IPAD_SIZES);
    attrs.chip = capture_one(&CHIP_RE, text).map(|generation| format!("m{generation}"));
}

fn extract_airpods(text: &str, attrs: &mut CanonicalAttributes) {
    let line = if AIRPODS_MAX_RE.is_match(text) {
        "max"
    } else if AIRPODS_PRO_RE.is_match(text) {
        "pro"
    } else {
        "airpods"
    };
    attrs.line = Some(line.to_string());

    if line == "pro" {
        for re in [
            &*AIRPODS_PRO_MODEL_RE,
            &*AIRPODS_ORDINAL_EN_RE,
            &*AIRPODS_GEN_EN_RE,
            &*AIRPODS_GEN_RU_RE,
        ] {
            if let Some(model) = capture_one(re, text) {
                attrs.model = Some(model);
                break;
            }
        }
    } else if line == "airpods" {
        if let Some(caps) = AIRPODS_MODEL_RE.captures(text) {
            attrs.model = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string());
        }
    }
}

/// Extracts canonical attributes from free-form product text. Never fails;
/// unrecognized text yields an empty record with no category.
pub fn extract(text: &str) -> CanonicalAttributes {
    let text = normalize_text(text);
    let mut attrs = CanonicalAttributes::default();

    let Some(category) = detect_category(&text) else {
        return attrs;
    };
    attrs.category = Some(category);

    attrs.ram = capture_one(&RAM_RE, &text);

    match category {
        Category::Iphone => extract_iphone(&text, &mut attrs),
        Category::Macbook => extract_macbook(&text, &mut attrs),
        Category::Ipad => extract_ipad(&text, &mut attrs),
        Category::Airpods => extract_airpods(&text, &mut attrs),
    }

    attrs.storage = extract_storage(&text);
    attrs.color = extract_color(&text);

    attrs
}
