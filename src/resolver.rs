//! Artist resolution: one free-text search term to at most one artist record.
//!
//! Candidates come from the primary artists of a page of search hits and are
//! picked by a three-tier policy:
//!
//! 1. **Exact**: trimmed, lowercased name equals the trimmed, lowercased term.
//!    First such candidate in hit order wins.
//! 2. **Fuzzy**: best sequence-ratio match of the *raw* term against the
//!    candidate names, accepted at `FUZZY_CUTOFF` or above.
//! 3. **Fallback**: the first candidate.
//!
//! No hits or no usable candidates is `Ok(None)`, not an error. Transport
//! failures are returned to the caller untouched.

use log::debug;

use crate::error::TransportError;
use crate::gateway::JsonFetch;
use crate::json_path::lookup_array;
use crate::models::{ArtistId, ArtistRecord, Candidate, MatchTier};
use crate::similarity::{best_close_match, DEFAULT_CUTOFF};

/// Search results requested per term.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Minimum similarity ratio for the fuzzy tier.
pub const FUZZY_CUTOFF: f64 = DEFAULT_CUTOFF;

/// Case-insensitive, whitespace-trimmed form used by the exact tier.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Primary artists of `hits` that carry both an id and a name, in hit order.
pub fn extract_candidates(search_body: &serde_json::Value) -> Vec<Candidate> {
    lookup_array(search_body, &["response", "hits"])
        .iter()
        .filter_map(Candidate::from_hit)
        .collect()
}

/// Apply the matching policy to `candidates` for `search_term`.
pub fn select_candidate<'a>(
    search_term: &str,
    candidates: &'a [Candidate],
) -> Option<(&'a Candidate, MatchTier)> {
    let first = candidates.first()?;

    let wanted = normalize_name(search_term);
    if let Some(exact) = candidates.iter().find(|c| normalize_name(&c.name) == wanted) {
        return Some((exact, MatchTier::Exact));
    }

    let names = candidates.iter().map(|c| c.name.as_str());
    if let Some(matched) = best_close_match(search_term, names, FUZZY_CUTOFF) {
        if let Some(fuzzy) = candidates.iter().find(|c| c.name == matched) {
            return Some((fuzzy, MatchTier::Fuzzy));
        }
    }

    Some((first, MatchTier::Fallback))
}

/// Resolves search terms through a `JsonFetch` implementation.
pub struct ArtistResolver<F> {
    api: F,
    page_size: u32,
}

impl<F: JsonFetch> ArtistResolver<F> {
    pub fn new(api: F) -> Self {
        Self {
            api,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Best-matching artist for `search_term`, using the configured page size.
    pub fn resolve(&self, search_term: &str) -> Result<Option<ArtistRecord>, TransportError> {
        self.resolve_with_page_size(search_term, self.page_size)
    }

    pub fn resolve_with_page_size(
        &self,
        search_term: &str,
        page_size: u32,
    ) -> Result<Option<ArtistRecord>, TransportError> {
        let per_page = page_size.to_string();
        let body = self
            .api
            .fetch("/search", &[("q", search_term), ("per_page", per_page.as_str())])?;

        let candidates = extract_candidates(&body);
        let Some((candidate, tier)) = select_candidate(search_term, &candidates) else {
            debug!("'{}': no usable search hits", search_term);
            return Ok(None);
        };

        debug!(
            "'{}': {} match '{}' (id {}) among {} candidates",
            search_term,
            tier,
            candidate.name,
            candidate.id,
            candidates.len()
        );
        self.fetch_artist(candidate.id)
    }

    /// `response.artist` of `/artists/{id}`; `None` when the body lacks it.
    pub fn fetch_artist(&self, id: ArtistId) -> Result<Option<ArtistRecord>, TransportError> {
        let body = self.api.fetch(&format!("/artists/{}", id), &[])?;
        Ok(ArtistRecord::from_response(&body))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::TransportCause;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Scripted `JsonFetch`: fixed responses per path, every call recorded.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        responses: HashMap<String, Result<Value, u16>>,
        pub calls: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl FakeApi {
        pub fn new() -> Self {
            Self::default()
        }

        /// Search response for `term` built from `(id, name)` primary artists.
        pub fn with_search(mut self, term: &str, hits: &[(u64, &str)]) -> Self {
            let hits: Vec<Value> = hits
                .iter()
                .map(|(id, name)| json!({"result": {"primary_artist": {"id": id, "name": name}}}))
                .collect();
            self.responses.insert(
                format!("/search?q={}", term),
                Ok(json!({"meta": {"status": 200}, "response": {"hits": hits}})),
            );
            self
        }

        pub fn with_search_body(mut self, term: &str, body: Value) -> Self {
            self.responses.insert(format!("/search?q={}", term), Ok(body));
            self
        }

        pub fn with_body(mut self, path: &str, body: Value) -> Self {
            self.responses.insert(path.to_string(), Ok(body));
            self
        }

        pub fn with_artist(mut self, id: u64, artist: Value) -> Self {
            self.responses.insert(
                format!("/artists/{}", id),
                Ok(json!({"meta": {"status": 200}, "response": {"artist": artist}})),
            );
            self
        }

        pub fn failing(mut self, key: &str, status: u16) -> Self {
            self.responses.insert(key.to_string(), Err(status));
            self
        }

        pub fn paths(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(p, _)| p.clone()).collect()
        }
    }

    impl JsonFetch for FakeApi {
        fn fetch(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, TransportError> {
            self.calls.borrow_mut().push((
                path.to_string(),
                query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ));
            let key = match query.iter().find(|(k, _)| *k == "q") {
                Some((_, term)) => format!("{}?q={}", path, term),
                None => path.to_string(),
            };
            match self.responses.get(&key) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(code)) => Err(TransportError::new(path, TransportCause::Status { code: *code })),
                None => Err(TransportError::new(path, TransportCause::Status { code: 404 })),
            }
        }
    }

    fn candidates(pairs: &[(u64, &str)]) -> Vec<Candidate> {
        pairs.iter().map(|(id, name)| Candidate::new(*id, *name)).collect()
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  The Beatles \n"), "the beatles");
        assert_eq!(normalize_name("Beyoncé"), "beyoncé");
        assert_eq!(normalize_name("AC/DC"), "ac/dc");
    }

    #[test]
    fn test_exact_tier_case_insensitive() {
        let c = candidates(&[(1, "The Beatles"), (2, "Beatles Tribute")]);
        let (picked, tier) = select_candidate("the beatles", &c).unwrap();
        assert_eq!(picked.id, 1);
        assert_eq!(tier, MatchTier::Exact);
    }

    #[test]
    fn test_exact_tier_first_in_hit_order() {
        let c = candidates(&[(5, "Other"), (7, "seal"), (9, "SEAL")]);
        let (picked, tier) = select_candidate(" Seal ", &c).unwrap();
        assert_eq!(picked.id, 7);
        assert_eq!(tier, MatchTier::Exact);
    }

    #[test]
    fn test_exact_tier_beats_better_fuzzy_position() {
        let c = candidates(&[(1, "Radio Head"), (2, "radiohead")]);
        let (picked, tier) = select_candidate("Radiohead", &c).unwrap();
        assert_eq!(picked.id, 2);
        assert_eq!(tier, MatchTier::Exact);
    }

    #[test]
    fn test_fuzzy_tier_picks_highest_ratio() {
        let c = candidates(&[(1, "Radiohead Tribute Band"), (2, "Radio Head")]);
        let (picked, tier) = select_candidate("Radiohead", &c).unwrap();
        assert_eq!(picked.id, 2);
        assert_eq!(tier, MatchTier::Fuzzy);
    }

    #[test]
    fn test_fuzzy_tier_uses_raw_term() {
        // Case and padding of the raw term count against the ratio.
        let c = candidates(&[(1, "Panic! at the Disco"), (2, "Fall Out Boy")]);
        let (picked, tier) = select_candidate("   FALL OUT BOY!!   ", &c).unwrap();
        assert_eq!(picked.id, 1);
        assert_eq!(tier, MatchTier::Fallback);

        let (picked, tier) = select_candidate("Fall Out Boys", &c).unwrap();
        assert_eq!(picked.id, 2);
        assert_eq!(tier, MatchTier::Fuzzy);
    }

    #[test]
    fn test_fuzzy_duplicate_names_take_first() {
        let c = candidates(&[(1, "Coldplay"), (2, "Radio Head"), (3, "Radio Head")]);
        let (picked, tier) = select_candidate("Radiohead", &c).unwrap();
        assert_eq!(picked.id, 2);
        assert_eq!(tier, MatchTier::Fuzzy);
    }

    #[test]
    fn test_fallback_tier_first_candidate() {
        let c = candidates(&[(1, "Coldplay"), (2, "Kanye West")]);
        let (picked, tier) = select_candidate("Radiohead", &c).unwrap();
        assert_eq!(picked.id, 1);
        assert_eq!(tier, MatchTier::Fallback);
    }

    #[test]
    fn test_no_candidates() {
        assert!(select_candidate("anything", &[]).is_none());
    }

    #[test]
    fn test_extract_candidates_drops_incomplete_hits() {
        let body = json!({"response": {"hits": [
            {"result": {"primary_artist": {"id": 1, "name": "A"}}},
            {"result": {"primary_artist": {"id": 2}}},
            {"result": {"primary_artist": null}},
            {"result": {}},
            {"index": "song"},
            {"result": {"primary_artist": {"id": 3, "name": "C"}}}
        ]}});
        assert_eq!(extract_candidates(&body), candidates(&[(1, "A"), (3, "C")]));
    }

    #[test]
    fn test_resolve_requests_search_then_artist() {
        let api = FakeApi::new()
            .with_search("the beatles", &[(1, "The Beatles"), (2, "Beatles Tribute")])
            .with_artist(1, json!({"name": "The Beatles", "id": 1, "followers_count": 42}));
        let resolver = ArtistResolver::new(&api);
        let record = resolver.resolve("the beatles").unwrap().unwrap();
        assert_eq!(record.id(), Some(1));
        assert_eq!(record.followers_count(), Some(42));

        let calls = api.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "/search");
        assert_eq!(
            calls[0].1,
            vec![
                ("q".to_string(), "the beatles".to_string()),
                ("per_page".to_string(), "5".to_string())
            ]
        );
        assert_eq!(calls[1].0, "/artists/1");
        assert!(calls[1].1.is_empty());
    }

    #[test]
    fn test_resolve_fuzzy_fetches_best_ratio_candidate() {
        let api = FakeApi::new()
            .with_search("Radiohead", &[(1, "Radiohead Tribute Band"), (2, "Radio Head")])
            .with_artist(2, json!({"name": "Radio Head", "id": 2, "followers_count": 9}));
        let resolver = ArtistResolver::new(&api);
        let record = resolver.resolve("Radiohead").unwrap().unwrap();
        assert_eq!(record.id(), Some(2));
        assert_eq!(api.paths(), vec!["/search", "/artists/2"]);
    }

    #[test]
    fn test_resolve_fallback_fetches_first_candidate() {
        let api = FakeApi::new()
            .with_search("Radiohead", &[(1, "Coldplay"), (2, "Kanye West")])
            .with_artist(1, json!({"name": "Coldplay", "id": 1}));
        let resolver = ArtistResolver::new(&api);
        let record = resolver.resolve("Radiohead").unwrap().unwrap();
        assert_eq!(record.name(), Some("Coldplay"));
        assert_eq!(api.paths(), vec!["/search", "/artists/1"]);
    }

    #[test]
    fn test_resolve_skips_hit_with_empty_name() {
        let api = FakeApi::new()
            .with_search("Radiohead", &[(1, ""), (2, "Coldplay")])
            .with_artist(2, json!({"name": "Coldplay", "id": 2}));
        let resolver = ArtistResolver::new(&api);
        let record = resolver.resolve("Radiohead").unwrap().unwrap();
        assert_eq!(record.id(), Some(2));
        assert_eq!(api.paths(), vec!["/search", "/artists/2"]);
    }

    #[test]
    fn test_resolve_custom_page_size() {
        let api = FakeApi::new().with_search("U2", &[]);
        let resolver = ArtistResolver::new(&api).with_page_size(20);
        assert_eq!(resolver.page_size(), 20);
        resolver.resolve("U2").unwrap();
        assert_eq!(api.calls.borrow()[0].1[1], ("per_page".to_string(), "20".to_string()));
    }

    #[test]
    fn test_resolve_no_hits_makes_one_call() {
        let api = FakeApi::new().with_search("zzzz", &[]);
        let resolver = ArtistResolver::new(&api);
        assert!(resolver.resolve("zzzz").unwrap().is_none());
        assert_eq!(api.paths(), vec!["/search"]);
    }

    #[test]
    fn test_resolve_missing_hits_path() {
        let api = FakeApi::new().with_search_body("zzzz", json!({"meta": {"status": 200}}));
        let resolver = ArtistResolver::new(&api);
        assert!(resolver.resolve("zzzz").unwrap().is_none());
        assert_eq!(api.paths(), vec!["/search"]);
    }

    #[test]
    fn test_resolve_hits_without_candidates() {
        let body = json!({"response": {"hits": [{"result": {"primary_artist": {"name": "No Id"}}}]}});
        let api = FakeApi::new().with_search_body("x", body);
        let resolver = ArtistResolver::new(&api);
        assert!(resolver.resolve("x").unwrap().is_none());
        assert_eq!(api.paths(), vec!["/search"]);
    }

    #[test]
    fn test_resolve_detail_without_artist() {
        let api = FakeApi::new()
            .with_search("Seal", &[(7, "Seal")])
            .with_body("/artists/7", json!({"response": {}}));
        let resolver = ArtistResolver::new(&api);
        assert!(resolver.resolve("Seal").unwrap().is_none());
        assert_eq!(api.paths(), vec!["/search", "/artists/7"]);
    }

    #[test]
    fn test_resolve_search_failure_propagates() {
        let api = FakeApi::new().failing("/search?q=Seal", 503);
        let resolver = ArtistResolver::new(&api);
        let err = resolver.resolve("Seal").unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.path, "/search");
    }

    #[test]
    fn test_resolve_detail_failure_propagates() {
        let api = FakeApi::new()
            .with_search("Seal", &[(7, "Seal")])
            .failing("/artists/7", 500);
        let resolver = ArtistResolver::new(&api);
        let err = resolver.resolve("Seal").unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.path, "/artists/7");
    }
}
