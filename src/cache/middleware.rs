//! Read-through response cache
//!
//! [`cache_page`] wraps a handler: it fingerprints the request, answers from
//! the cache when it can, and otherwise runs the handler and stores the body.
//!
//! The cache is never allowed to fail a request. A lookup error counts as a
//! miss and a store error only loses the entry; both are logged at `warn`.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, warn};

use super::{fingerprint, CacheBackend};

/// Response header reporting whether the body came from the cache.
pub const X_CACHE: &str = "x-cache";

/// Cache handle and policy shared by the middleware.
#[derive(Clone)]
pub struct ResponseCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
    key_prefix: Arc<str>,
}

impl ResponseCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration, key_prefix: &str) -> Self {
        Self {
            backend,
            ttl,
            key_prefix: Arc::from(key_prefix),
        }
    }

    pub fn key_for(&self, method: &Method, uri: &axum::http::Uri) -> String {
        fingerprint(&self.key_prefix, method, uri)
    }

    /// Cached body for `key`; cache failures read as a miss.
    async fn lookup(&self, key: &str) -> Option<String> {
        match self.backend.get(key).await {
            Ok(hit) => hit,
            Err(err) => {
                warn!(
                    backend = self.backend.name(),
                    "response cache lookup failed, serving uncached: {}", err
                );
                None
            }
        }
    }

    async fn store(&self, key: &str, body: &str) {
        if let Err(err) = self.backend.set(key, body, self.ttl).await {
            warn!(
                backend = self.backend.name(),
                "response cache store failed: {}", err
            );
        }
    }

    fn cache_control(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("max-age={}", self.ttl.as_secs()))
            .unwrap_or_else(|_| HeaderValue::from_static("max-age=0"))
    }
}

/// Middleware memoizing successful `GET` responses.
///
/// Other methods go straight to the inner handler. Only `200 OK` bodies are
/// stored.
pub async fn cache_page(
    State(cache): State<ResponseCache>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = cache.key_for(request.method(), request.uri());

    if let Some(body) = cache.lookup(&key).await {
        debug!(%key, "response cache hit");
        return cached_response(body, &cache);
    }
    debug!(%key, "response cache miss");

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("failed to buffer response body: {}", err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match std::str::from_utf8(&bytes) {
        Ok(text) => cache.store(&key, text).await,
        Err(_) => warn!(%key, "response body is not UTF-8, not caching"),
    }

    parts
        .headers
        .insert(header::CACHE_CONTROL, cache.cache_control());
    parts
        .headers
        .insert(X_CACHE, HeaderValue::from_static("MISS"));
    Response::from_parts(parts, Body::from(bytes))
}

fn cached_response(body: String, cache: &ResponseCache) -> Response {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::CACHE_CONTROL, cache.cache_control());
    headers.insert(X_CACHE, HeaderValue::from_static("HIT"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use axum::{middleware, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn app(cache: ResponseCache, calls: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/items/",
                get(move || {
                    let calls = calls.clone();
                    async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst);
                        format!("{{\"n\":{}}}", n)
                    }
                })
                .post(|| async { StatusCode::CREATED }),
            )
            .route(
                "/missing/",
                get(|| async { (StatusCode::NOT_FOUND, "nope") }),
            )
            .layer(middleware::from_fn_with_state(cache, cache_page))
    }

    async fn call(app: &Router, method: Method, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let x_cache = response
            .headers()
            .get(X_CACHE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, x_cache, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn response_cache() -> ResponseCache {
        ResponseCache::new(Arc::new(MemoryCache::new(100)), Duration::from_secs(900), "t")
    }

    #[tokio::test]
    async fn test_second_get_is_served_from_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app(response_cache(), calls.clone());

        let first = call(&app, Method::GET, "/items/").await;
        let second = call(&app, Method::GET, "/items/").await;

        assert_eq!(first.1.as_deref(), Some("MISS"));
        assert_eq!(second.1.as_deref(), Some("HIT"));
        assert_eq!(first.2, second.2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_get_passes_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app(response_cache(), calls.clone());

        let (status, x_cache, _) = call(&app, Method::POST, "/items/").await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(x_cache.is_none());
    }

    #[tokio::test]
    async fn test_error_responses_not_cached() {
        let backend = Arc::new(MemoryCache::new(100));
        let cache = ResponseCache::new(backend.clone(), Duration::from_secs(900), "t");
        let app = app(cache, Arc::new(AtomicUsize::new(0)));

        let (status, _, _) = call(&app, Method::GET, "/missing/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_entry_recomputed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = ResponseCache::new(
            Arc::new(MemoryCache::new(100)),
            Duration::from_millis(50),
            "t",
        );
        let app = app(cache, calls.clone());

        call(&app, Method::GET, "/items/").await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        let (_, x_cache, body) = call(&app, Method::GET, "/items/").await;

        assert_eq!(x_cache.as_deref(), Some("MISS"));
        assert_eq!(body, "{\"n\":1}");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
