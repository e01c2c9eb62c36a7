// i-Shop search results (Bitrix storefront, PAGEN_2 pagination).

use std::collections::HashSet;

use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::warn;

use crate::model::{Listing, PriceTag, SourceError};
use crate::sources::{digits, RetailSource, MAX_PAGES};

const BASE_URL: &str = "https://i-shop.ru/search/";
const SHOP: &str = "IShop";

static CARD_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div.catalog-card[data-entity="item"]"#).unwrap());
static TITLE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.catalog-card__name[href]").unwrap());
static PRICE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.catalog-card__price").unwrap());

pub struct IShop {
    client: Client,
}

impl IShop {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn parse_page(html: &str) -> Vec<Listing> {
        let document = Html::parse_document(html);
        let mut listings = Vec::new();

        for card in document.select(&CARD_SEL) {
            let Some(title_node) = card.select(&TITLE_SEL).next() else {
                continue;
            };
            let title = title_node.text().collect::<String>().trim().to_string();
            let href = title_node.value().attr("href").unwrap_or("");
            let url = format!("https://i-shop.ru{href}");

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
impl RetailSource for IShop {
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
                .query(&[("q", query), ("s", ""), ("PAGEN_2", page_param.as_str())])
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
    fn parses_card_and_deduplicates_nothing_within_a_page() {
        let html = r#"
            <div class="catalog-card" data-entity="item">
              <a class="catalog-card__name" href="/catalog/airpods-pro-2/">AirPods Pro 2</a>
              <div class="catalog-card__price">19 990 руб.</div>
            </div>
            <div class="catalog-card" data-entity="item">
              <a class="catalog-card__name" href="/catalog/ipad-10/">iPad 10 64GB</a>
              <div class="catalog-card__price">32 490 руб.</div>
            </div>
        "#;
        let listings = IShop::parse_page(html);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].price, PriceTag::Number(19_990));
        assert_eq!(listings[1].url, "https://i-shop.ru/catalog/ipad-10/");
    }
}
