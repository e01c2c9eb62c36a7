// Core structs: canonical attributes, listings, search outcomes.
use serde::Serialize;
use thiserror::Error;

/// Device category recognized in free-form product text.
///
/// Detection priority is fixed (ipad before iphone) so that accessory
/// titles mentioning several devices resolve to the device actually sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Iphone,
    Macbook,
    Ipad,
    Airpods,
}

impl Category {
    pub fn keyword(&self) -> &'static str {
        match self {
            Category::Iphone => "iphone",
            Category::Macbook => "macbook",
            Category::Ipad => "ipad",
            Category::Airpods => "airpods",
        }
    }
}

/// Normalized, category-typed representation of a product description.
///
/// `category` is the discriminating key: every other field is interpreted
/// in its context (the `line` vocabulary for an iPhone differs from an
/// iPad's). An unrecognized text yields `category = None` with every other
/// field unset; such a record never satisfies a category-specific match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalAttributes {
    pub category: Option<Category>,
    /// Numeric generation for phones/airpods, chip identifier for macbook.
    pub model: Option<String>,
    pub line: Option<String>,
    /// Canonical storage tier token, e.g. "256gb".
    pub storage: Option<String>,
    /// RAM in gigabytes, without unit.
    pub ram: Option<String>,
    /// Screen size in inches, category-restricted.
    pub size: Option<String>,
    /// Lowercase chip token, "m1".."m5".
    pub chip: Option<String>,
    /// Canonical color key, e.g. "desert_titanium".
    pub color: Option<String>,
}

impl CanonicalAttributes {
    /// Number of populated descriptive fields, used as the final
    /// tie-break when score and price are equal.
    pub fn specificity(&self) -> usize {
        [
            &self.model,
            &self.line,
            &self.storage,
            &self.size,
            &self.chip,
            &self.color,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }
}

/// Price as delivered by a retailer: already an integer, or raw text
/// the digits still have to be pulled out of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PriceTag {
    Number(u64),
    Text(String),
}

impl PriceTag {
    /// Integer value, concatenating digit runs for textual prices
    /// ("12 990 ₽" -> 12990). `None` when no digits are present.
    pub fn as_int(&self) -> Option<u64> {
        match self {
            PriceTag::Number(n) => Some(*n),
            PriceTag::Text(s) => {
                let digits: String = s.chars().filter(char::is_ascii_digit).collect();
                if digits.is_empty() {
                    return None;
                }
                digits.parse().ok()
            }
        }
    }
}

/// One retailer listing. `attrs` is lazily computed from `title` by the
/// selector and cached here; it is an internal artifact and never leaves
/// the process (stripped before caching and serialization).
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub shop: String,
    pub title: String,
    pub price: PriceTag,
    pub url: String,
    #[serde(skip)]
    pub attrs: Option<CanonicalAttributes>,
}

impl Listing {
    pub fn new(shop: &str, title: String, price: PriceTag, url: String) -> Self {
        Self {
            shop: shop.to_string(),
            title,
            price,
            url,
            attrs: None,
        }
    }
}

/// Aggregation outcome stored in the result cache. The "no result"
/// sentinel is cached like a success so a query known to have no matches
/// does not trigger repeated full fan-outs within the TTL window.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Found(Vec<Listing>),
    Empty,
}

/// Caller-visible reply. Nothing from an individual source or listing
/// ever escalates past these three states.
#[derive(Debug, Clone)]
pub enum SearchReply {
    Found(Vec<Listing>),
    Empty,
    Hint,
}

impl From<SearchOutcome> for SearchReply {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Found(items) => SearchReply::Found(items),
            SearchOutcome::Empty => SearchReply::Empty,
        }
    }
}

pub const HINT_MESSAGE: &str = "Уточните, пожалуйста, ваш запрос";
pub const NONE_MESSAGE: &str = "Ничего не найдено";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}
