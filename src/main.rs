mod api;
mod cache;
mod config;
mod extractor;
mod matcher;
mod model;
mod query;
mod service;
mod sources;

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use cache::ResultCache;
use config::load_config;
use service::SearchService;
use sources::client::{build_client, build_insecure_client};
use sources::{AppleGod, AppleMarket, IShop, MacApples, RetailSource, Techmart};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration from file (defaults when absent)
    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let client = match build_client() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };
    // apple-market.ru serves a broken certificate chain
    let insecure_client = match build_insecure_client() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let sources: Vec<Arc<dyn RetailSource>> = vec![
        Arc::new(AppleMarket::new(insecure_client)),
        Arc::new(AppleGod::new(client.clone())),
        Arc::new(IShop::new(client.clone())),
        Arc::new(MacApples::new(client.clone())),
        Arc::new(Techmart::new(client)),
    ];
    info!("Registered {} retail sources", sources.len());

    let cache = ResultCache::new(
        config.cache_capacity,
        Duration::from_secs(config.cache_ttl_seconds),
    );
    let service = Arc::new(SearchService::new(sources, cache, config.per_source_limit));

    let app = api::router(service);

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", config.listen_addr, e);
            return;
        }
    };
    info!("Listening on {}", config.listen_addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
