// Techmart search results (OpenCart storefront).

use std::collections::HashSet;

use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::warn;

use crate::model::{Listing, PriceTag, SourceError};
use crate::sources::{digits, RetailSource, MAX_PAGES};

const BASE_URL: &str = "https://techmart.ru/index.php";
const SHOP: &str = "Techmart";

static CARD_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#productlist div.product__item").unwrap());
static TITLE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.product__title[href]").unwrap());
static PRICE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("p.product__price").unwrap());

pub struct Techmart {
    client: Client,
}

impl Techmart {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    // Sync on purpose: `Html` is not Send and must not live across awaits.
    fn parse_page(html: &str) -> Vec<Listing> {
        let document = Html::parse_document(html);
        let mut listings = Vec::new();

        for card in document.select(&CARD_SEL) {
            let Some(title_node) = card.select(&TITLE_SEL).next() else {
                continue;
            };
            let title = title_node.text().collect::<String>().trim().to_string();
            let url = title_node.value().attr("href").unwrap_or("").to_string();

            let Some(price_node) = card.select(&PRICE_SEL).next() else {
                continue;
            };
            let Some(price) = digits(&price_node.text().collect::<String>()) else {
                continue;
            };

            listings.push(Listing::new(SHOP, title, PriceTag::Number(price), url));
        }

        listings
    }
}

#[async_trait::async_trait]
impl RetailSource for Techmart {
    fn name(&self) -> &'static str {
        SHOP
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Listing>, SourceError> {
        let mut results: Vec<Listing> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page: u32 = 1;

        while results.len() < limit && page <= MAX_PAGES {
            let page_param = page.to_string();
            let response = self
                .client
                .get(BASE_URL)
                .query(&[
                    ("route", "product/search"),
                    ("search", query),
                    ("page", page_param.as_str()),
                ])
                .send()
                .await?;

            if !response.status().is_success() {
                if results.is_empty() {
                    return Err(SourceError::Status(response.status()));
                }
                warn!(shop = SHOP, status = %response.status(), "dropping remaining pages");
                break;
            }

            let body = response.text().await?;
            let cards = Self::parse_page(&body);
            if cards.is_empty() {
                break;
            }

            for card in cards {
                if results.len() >= limit {
                    break;
                }
                if !seen.insert(card.url.clone()) {
                    continue;
                }
                results.push(card);
            }

            page += 1;
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cards_with_title_and_price() {
        let html = r#"
            <div id="productlist">
              <div class="product__item">
                <a class="product__title" href="/iphone-16-pro">iPhone 16 Pro 256GB</a>
                <p class="product__price">105 990 ₽</p>
              </div>
              <div class="product__item">
                <a class="product__title" href="/no-price">iPhone 16</a>
              </div>
            </div>
        "#;
        let listings = Techmart::parse_page(html);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].shop, "Techmart");
        assert_eq!(listings[0].title, "iPhone 16 Pro 256GB");
        assert_eq!(listings[0].price, PriceTag::Number(105_990));
        assert_eq!(listings[0].url, "/iphone-16-pro");
    }

    #[test]
    fn empty_page_yields_no_listings() {
        assert!(Techmart::parse_page("<html><body></body></html>").is_empty());
    }
}
