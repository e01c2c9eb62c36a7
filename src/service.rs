// Search aggregation: classify, consult the cache, fan out to every
// source concurrently, pick one winner per source, sort by price.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::matcher::select_best;
use crate::model::{Listing, SearchOutcome, SearchReply};
use crate::query::{classify, Classified};
use crate::sources::RetailSource;

pub struct SearchService {
    sources: Vec<Arc<dyn RetailSource>>,
    cache: ResultCache,
    per_source_limit: usize,
}

impl SearchService {
    pub fn new(
        sources: Vec<Arc<dyn RetailSource>>,
        cache: ResultCache,
        per_source_limit: usize,
    ) -> Self {
        Self {
            sources,
            cache,
            per_source_limit,
        }
    }

    /// Answers a raw free-text query.
    ///
    /// Ambiguous queries return a hint without touching the cache or any
    /// source. Cache hits are returned verbatim. On a miss every source
    /// runs concurrently; a failed source contributes nothing and never
    /// aborts its siblings. The empty outcome is cached like a success so
    /// a query known to be fruitless does not fan out again within the
    /// TTL window.
    pub async fn search(&self, raw_query: &str) -> SearchReply {
        let (attrs, normalized) = match classify(raw_query) {
            Classified::Hint => return SearchReply::Hint,
            Classified::Query { attrs, normalized } => (attrs, normalized),
        };

        let cache_key = format!("v1::{}", normalized.trim().to_lowercase());
        if let Some(outcome) = self.cache.get(&cache_key) {
            debug!(key = %cache_key, "cache hit");
            return outcome.into();
        }

        info!(query = %normalized, sources = self.sources.len(), "dispatching search");

        let mut tasks: FuturesUnordered<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let query = normalized.clone();
                let limit = self.per_source_limit;
                async move {
                    match source.search(&query, limit).await {
                        Ok(items) => Some(items),
                        Err(e) => {
                            warn!(source = source.name(), error = %e, "source failed");
                            None
                        }
                    }
                }
            })
            .collect();

        let mut winners: Vec<Listing> = Vec::new();
        while let Some(result) = tasks.next().await {
            let Some(mut items) = result else {
                continue;
            };
            if let Some(mut best) = select_best(&mut items, &attrs) {
                best.attrs = None;
                winners.push(best);
            }
        }

        if winners.is_empty() {
            self.cache.put(cache_key, SearchOutcome::Empty);
            return SearchReply::Empty;
        }

        winners.sort_by_key(|w| w.price.as_int().unwrap_or(u64::MAX));

        self.cache
            .put(cache_key, SearchOutcome::Found(winners.clone()));
        SearchReply::Found(winners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PriceTag, SourceError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StaticSource {
        name: &'static str,
        listings: Vec<Listing>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn new(name: &'static str, listings: Vec<Listing>) -> Arc<Self> {
            Arc::new(Self {
                name,
                listings,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl RetailSource for StaticSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<Listing>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.listings.clone())
        }
    }

    struct FailingSource {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RetailSource for FailingSource {
        fn name(&self) -> &'static str {
            "Broken"
        }

        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<Listing>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::Status(reqwest::StatusCode::BAD_GATEWAY))
        }
    }

    fn listing(shop: &str, title: &str, price: u64) -> Listing {
        Listing::new(
            shop,
            title.to_string(),
            PriceTag::Number(price),
            format!("https://{shop}/item"),
        )
    }

    fn service(sources: Vec<Arc<dyn RetailSource>>) -> SearchService {
        SearchService::new(
            sources,
            ResultCache::new(512, Duration::from_secs(300)),
            30,
        )
    }

    #[tokio::test]
    async fn winners_are_sorted_by_price_across_sources() {
        let a = StaticSource::new("A", vec![listing("A", "iPhone 16 256GB", 90_000)]);
        let b = StaticSource::new("B", vec![listing("B", "iPhone 16 256GB", 82_000)]);
        let sources: Vec<Arc<dyn RetailSource>> = vec![a, b];
        let svc = service(sources);

        match svc.search("iphone 16 256gb").await {
            SearchReply::Found(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].shop, "B");
                assert_eq!(items[1].shop, "A");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn equivalent_queries_share_one_cache_entry() {
        let source = StaticSource::new("A", vec![listing("A", "iPhone 16 Pro 256GB", 99_000)]);
        let sources: Vec<Arc<dyn RetailSource>> = vec![source.clone()];
        let svc = service(sources);

        assert!(matches!(
            svc.search("iphone16pro256gb").await,
            SearchReply::Found(_)
        ));
        assert!(matches!(
            svc.search("iPhone 16 Pro 256 GB").await,
            SearchReply::Found(_)
        ));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn failing_source_does_not_abort_the_others() {
        let broken: Arc<dyn RetailSource> = Arc::new(FailingSource {
            calls: AtomicUsize::new(0),
        });
        let healthy = StaticSource::new("A", vec![listing("A", "iPhone 16 256GB", 85_000)]);
        let sources: Vec<Arc<dyn RetailSource>> = vec![broken, healthy];
        let svc = service(sources);

        match svc.search("iphone 16 256gb").await {
            SearchReply::Found(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].shop, "A");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fruitless_query_caches_the_empty_sentinel() {
        let source = StaticSource::new("A", vec![listing("A", "iPad Pro 11 M4 256GB", 99_000)]);
        let sources: Vec<Arc<dyn RetailSource>> = vec![source.clone()];
        let svc = service(sources);

        assert!(matches!(
            svc.search("iphone 16 256gb").await,
            SearchReply::Empty
        ));
        assert!(matches!(
            svc.search("iphone 16 256gb").await,
            SearchReply::Empty
        ));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn hint_short_circuits_before_any_source() {
        let source = StaticSource::new("A", vec![]);
        let sources: Vec<Arc<dyn RetailSource>> = vec![source.clone()];
        let svc = service(sources);

        assert!(matches!(svc.search("iphone").await, SearchReply::Hint));
        assert!(matches!(svc.search("x").await, SearchReply::Hint));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn winners_carry_no_internal_attributes() {
        let source = StaticSource::new("A", vec![listing("A", "iPhone 16 256GB", 85_000)]);
        let sources: Vec<Arc<dyn RetailSource>> = vec![source];
        let svc = service(sources);

        match svc.search("iphone 16 256gb").await {
            SearchReply::Found(items) => assert!(items[0].attrs.is_none()),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
