//! Suggestions and fuzzy search over cases and sellers.
//!
//! Searching can run inline or on a [`SearchWorker`] thread. Every request
//! sent to the worker carries a generation number; only the response for
//! the newest generation is ever surfaced, so a slow answer to an old query
//! can never overwrite the suggestions for the current one.

use super::fixture::FixtureProvider;
use crate::model::{CaseId, SellerId};
use crossbeam::channel::{unbounded, Receiver, Sender};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::sync::Arc;
use std::thread;

/// Upper bound on hits returned for one query.
pub const MAX_HITS: usize = 8;

/// An entity matched by a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchHit {
    Case { id: CaseId, title: String },
    Seller { id: SellerId, name: String },
}

impl SearchHit {
    pub fn label(&self) -> String {
        match self {
            SearchHit::Case { id, title } => format!("{}  {}", id, title),
            SearchHit::Seller { id, name } => format!("{}  {}", id, name),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SearchHit::Case { .. } => "Case",
            SearchHit::Seller { .. } => "Seller",
        }
    }
}

/// Search collaborator.
pub trait SearchProvider: Send + Sync {
    /// Suggested query phrasings for a partial query.
    fn suggest(&self, query: &str) -> Vec<String>;
    /// Entities matching `query`, best match first.
    fn search(&self, query: &str) -> Vec<SearchHit>;
}

/// The three canned phrasings offered under the search box.
pub fn suggestions_for(query: &str) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    vec![
        format!("All violations from \"{}\" in last 30 days", query),
        format!("Missing MRP cases containing \"{}\"", query),
        format!("Seller compliance history for \"{}\"", query),
    ]
}

fn best_score(matcher: &SkimMatcherV2, pattern: &str, fields: &[&str]) -> Option<i64> {
    fields
        .iter()
        .filter_map(|field| matcher.fuzzy_match(field, pattern))
        .max()
}

impl SearchProvider for FixtureProvider {
    fn suggest(&self, query: &str) -> Vec<String> {
        suggestions_for(query)
    }

    fn search(&self, query: &str) -> Vec<SearchHit> {
        let pattern = query.trim();
        if pattern.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default().ignore_case();
        let mut scored: Vec<(i64, SearchHit)> = Vec::new();

        for case in self.cases() {
            let fields = [
                case.id.as_str(),
                case.title.as_str(),
                case.seller_name.as_str(),
                case.violation_type.as_str(),
            ];
            if let Some(score) = best_score(&matcher, pattern, &fields) {
                scored.push((
                    score,
                    SearchHit::Case {
                        id: case.id.clone(),
                        title: case.title.clone(),
                    },
                ));
            }
        }

        for seller in self.sellers() {
            let fields = [
                seller.id.as_str(),
                seller.name.as_str(),
                seller.business_name.as_str(),
            ];
            if let Some(score) = best_score(&matcher, pattern, &fields) {
                scored.push((
                    score,
                    SearchHit::Seller {
                        id: seller.id.clone(),
                        name: seller.name.clone(),
                    },
                ));
            }
        }

        // Higher score first; label keeps equal scores in a fixed order.
        scored.sort_by(|(sa, ha), (sb, hb)| sb.cmp(sa).then_with(|| ha.label().cmp(&hb.label())));
        scored
            .into_iter()
            .take(MAX_HITS)
            .map(|(_, hit)| hit)
            .collect()
    }
}

/// Hands out increasing generation numbers and remembers the newest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchGeneration {
    latest: u64,
}

impl SearchGeneration {
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKind {
    Suggest,
    Search,
}

#[derive(Debug, Clone)]
struct SearchRequest {
    generation: u64,
    kind: SearchKind,
    query: String,
}

/// Answer to one request, tagged with the request's generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub generation: u64,
    pub query: String,
    pub suggestions: Vec<String>,
    pub hits: Vec<SearchHit>,
}

fn answer(provider: &dyn SearchProvider, request: SearchRequest) -> SearchResponse {
    let (suggestions, hits) = match request.kind {
        SearchKind::Suggest => (provider.suggest(&request.query), Vec::new()),
        SearchKind::Search => (Vec::new(), provider.search(&request.query)),
    };
    SearchResponse {
        generation: request.generation,
        query: request.query,
        suggestions,
        hits,
    }
}

/// Runs search requests on a background thread.
pub struct SearchWorker {
    requests: Option<Sender<SearchRequest>>,
    responses: Receiver<SearchResponse>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SearchWorker {
    pub fn spawn(provider: Arc<dyn SearchProvider>) -> Self {
        let (request_tx, request_rx) = unbounded::<SearchRequest>();
        let (response_tx, response_rx) = unbounded();

        let handle = thread::Builder::new()
            .name("scrutineye-search".into())
            .spawn(move || {
                for request in request_rx {
                    if response_tx.send(answer(provider.as_ref(), request)).is_err() {
                        break;
                    }
                }
                tracing::debug!("Search worker stopped");
            })
            .map_err(|e| tracing::warn!(error = %e, "Failed to spawn search worker"))
            .ok();

        Self {
            requests: Some(request_tx),
            responses: response_rx,
            handle,
        }
    }

    fn send(&self, generation: u64, kind: SearchKind, query: &str) {
        if let Some(tx) = &self.requests {
            let request = SearchRequest {
                generation,
                kind,
                query: query.to_string(),
            };
            if tx.send(request).is_err() {
                tracing::warn!(generation, "Search worker is gone; dropping request");
            }
        }
    }

    /// Every response that has arrived since the last call.
    pub fn try_drain(&self) -> Vec<SearchResponse> {
        self.responses.try_iter().collect()
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// How the top bar runs searches.
pub enum SearchBackend {
    /// Answer on the calling thread.
    Inline(Arc<dyn SearchProvider>),
    /// Answer on a worker thread, collected by [`SearchBackend::poll`].
    Threaded(SearchWorker),
}

impl SearchBackend {
    /// Sends a request. Inline backends answer immediately.
    pub fn submit(&self, generation: u64, kind: SearchKind, query: &str) -> Option<SearchResponse> {
        match self {
            SearchBackend::Inline(provider) => Some(answer(
                provider.as_ref(),
                SearchRequest {
                    generation,
                    kind,
                    query: query.to_string(),
                },
            )),
            SearchBackend::Threaded(worker) => {
                worker.send(generation, kind, query);
                None
            }
        }
    }

    pub fn poll(&self) -> Vec<SearchResponse> {
        match self {
            SearchBackend::Inline(_) => Vec::new(),
            SearchBackend::Threaded(worker) => worker.try_drain(),
        }
    }
}

/// Keeps only the response belonging to the newest generation.
pub fn latest_response(
    generation: &SearchGeneration,
    responses: impl IntoIterator<Item = SearchResponse>,
) -> Option<SearchResponse> {
    responses.into_iter().fold(None, |kept, response| {
        if generation.is_current(response.generation) {
            Some(response)
        } else {
            tracing::trace!(
                stale = response.generation,
                latest = generation.latest(),
                "Discarding stale search response"
            );
            kept
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::seed::seed_fixture;
    use chrono::{TimeZone, Utc};
    use std::time::{Duration, Instant};

    fn provider() -> Arc<FixtureProvider> {
        let anchor = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        Arc::new(FixtureProvider::new(seed_fixture(anchor)).unwrap())
    }

    #[test]
    fn test_suggestions_embed_query() {
        let suggestions = suggestions_for("techmart");
        assert_eq!(
            suggestions,
            vec![
                "All violations from \"techmart\" in last 30 days",
                "Missing MRP cases containing \"techmart\"",
                "Seller compliance history for \"techmart\"",
            ]
        );
        assert!(suggestions_for("   ").is_empty());
    }

    #[test]
    fn test_search_finds_case_and_seller() {
        let hits = provider().search("techmart");
        assert!(hits.iter().any(|h| matches!(h, SearchHit::Seller { id, .. } if id.as_str() == "SELL-2025-7834")));
        assert!(hits.iter().any(|h| matches!(h, SearchHit::Case { id, .. } if id.as_str() == "VIO-2025-001247")));
    }

    #[test]
    fn test_search_by_case_id() {
        let hits = provider().search("VIO-2025-001249");
        assert!(matches!(&hits[0], SearchHit::Case { id, .. } if id.as_str() == "VIO-2025-001249"));
    }

    #[test]
    fn test_empty_query_has_no_hits() {
        assert!(provider().search("").is_empty());
    }

    #[test]
    fn test_generation_tracking() {
        let mut generation = SearchGeneration::default();
        let first = generation.next();
        let second = generation.next();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn test_stale_responses_are_discarded() {
        let mut generation = SearchGeneration::default();
        let old = generation.next();
        let new = generation.next();
        let response = |g: u64, q: &str| SearchResponse {
            generation: g,
            query: q.into(),
            suggestions: suggestions_for(q),
            hits: vec![],
        };

        // The newer answer arrives first and the older one straggles in after.
        let kept = latest_response(&generation, vec![response(new, "tech"), response(old, "te")]);
        assert_eq!(kept.unwrap().query, "tech");

        let kept = latest_response(&generation, vec![response(old, "te")]);
        assert!(kept.is_none());
    }

    #[test]
    fn test_worker_answers_requests() {
        let worker = SearchWorker::spawn(provider());
        worker.send(1, SearchKind::Search, "babycare");

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut responses = Vec::new();
        while responses.is_empty() && Instant::now() < deadline {
            responses = worker.try_drain();
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].generation, 1);
        assert!(!responses[0].hits.is_empty());
    }

    #[test]
    fn test_inline_backend_answers_immediately() {
        let backend = SearchBackend::Inline(provider());
        let response = backend.submit(3, SearchKind::Suggest, "mrp").unwrap();
        assert_eq!(response.generation, 3);
        assert_eq!(response.suggestions.len(), 3);
        assert!(backend.poll().is_empty());
    }
}
