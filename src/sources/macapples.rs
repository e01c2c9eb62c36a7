// MacApples search results.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::warn;

use crate::model::{Listing, PriceTag, SourceError};
use crate::sources::{RetailSource, MAX_PAGES};

const BASE_URL: &str = "https://macapples.ru/search";
const SHOP: &str = "MacApples";

static CARD_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.single-product.grid-v.single-product-v2").unwrap());
static TITLE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#".pro-title a[itemprop="name"][href]"#).unwrap());
static PRICE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[itemprop="price"]"#).unwrap());

pub struct MacApples {
    client: Client,
}

impl MacApples {
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
            let url = format!("https://macapples.ru/{}", href.trim_start_matches('/'));

            let Some(price) = card
                .select(&PRICE_SEL)
                .next()
                .and_then(|n| n.value().attr("content"))
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
impl RetailSource for MacApples {
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
                .query(&[("query", query), ("page", page_param.as_str())])
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
