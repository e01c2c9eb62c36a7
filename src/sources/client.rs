// Shared HTTP client for the retail scrapers.

use std::time::Duration;

use reqwest::Client;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(15))
        .pool_max_idle_per_host(20)
        .build()
}

/// Variant for shops serving broken certificate chains (apple-market.ru).
pub fn build_insecure_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(15))
        .pool_max_idle_per_host(20)
        .danger_accept_invalid_certs(true)
        .build()
}
