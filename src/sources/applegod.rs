// AppleGod search results (Bitrix storefront, PAGEN_4 pagination).

use std::collections::HashSet;

use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::warn;

use crate::model::{Listing, PriceTag, SourceError};
use crate::sources::{RetailSource, MAX_PAGES};

const BASE_URL: &str = "https://applegod.ru/search/";
const SHOP: &str = "AppleGod";

static CARD_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.products__card.card-product").unwrap());
static TITLE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".card-product__title a[href]").unwrap());
static PRICE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[itemprop="price"]"#).unwrap());

pub struct AppleGod {
    client: Client,
}

impl AppleGod {
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
            let Some(price_node) = card.select(&PRICE_SEL).next() else {
                continue;
            };

            let title = title_node.text().collect::<String>().trim().to_string();
            let href = title_node.value().attr("href").unwrap_or("");
            let url = format!("https://applegod.ru{href}");

            // The price meta carries a decimal string ("89990.00").
            let Some(price) = price_node
                .value()
                .attr("content")
                .and_then(|c| c.parse::<f64>().ok())
                .map(|p| p as u64)
            else {
                continue;
            };

            listings.push(Listing::new(SHOP, title, PriceTag::Number(price), url));
        }

        listings
    }
}

#[async_trait::async_trait]
impl RetailSource for AppleGod {
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
                .query(&[("q", query), ("PAGEN_4", page_param.as_str())])
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
