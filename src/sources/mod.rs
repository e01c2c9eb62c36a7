// Retail sources: one scraper per shop behind a common async contract.

pub mod client;

pub mod applegod;
pub mod applemarket;
pub mod i_shop;
pub mod macapples;
pub mod techmart;

pub use applegod::AppleGod;
pub use applemarket::AppleMarket;
pub use i_shop::IShop;
pub use macapples::MacApples;
pub use techmart::Techmart;

use crate::model::{Listing, SourceError};

/// One retailer. Safe to query concurrently with the other sources.
///
/// "No results" is an empty list, never an error; errors mean the shop
/// could not be reached or answered with garbage, and the aggregator
/// treats that as the source being temporarily empty.
#[async_trait::async_trait]
pub trait RetailSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns up to `limit` listings for the normalized query, paginating
    /// internally. Page order is preserved and URLs are deduplicated
    /// within the source.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Listing>, SourceError>;
}

/// Shop pages cap: every source stops after this many result pages.
pub(crate) const MAX_PAGES: u32 = 2;

/// Concatenated digits of a price node's text ("79 990 ₽" -> 79990).
pub(crate) fn digits(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
