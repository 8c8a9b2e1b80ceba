use std::collections::HashSet;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use parking_lot::Mutex;
use rstest::rstest;

use dgdrive::{DriveError, GatewayEndpoint, GatewayFetcher, GatewayResolver, HttpGatewayFetcher, Result};

/// Fetcher that fails for any URL under a "down" base and records every call
struct ScriptedFetcher {
    down: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    fn new(down: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            down: Mutex::new(down.iter().map(|s| s.to_string()).collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn set_down(&self, base: &str, down: bool) {
        let mut set = self.down.lock();
        if down {
            set.insert(base.to_string());
        } else {
            set.remove(base);
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl GatewayFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        self.calls.lock().push(url.to_string());
        let failing = self.down.lock().iter().any(|base| url.starts_with(base.as_str()));
        if failing {
            Err(DriveError::Gateway(format!("GET {} returned 504", url)))
        } else {
            Ok(Bytes::from(format!("content of {}", url)))
        }
    }
}

fn resolver(bases: &[&str], fetcher: Arc<ScriptedFetcher>) -> GatewayResolver {
    let endpoints = bases
        .iter()
        .map(|b| GatewayEndpoint::new(b).unwrap())
        .collect();
    GatewayResolver::new(endpoints, fetcher).unwrap()
}

#[tokio::test]
async fn test_fallback_sticks_to_working_gateway() {
    let fetcher = ScriptedFetcher::new(&["https://a/"]);
    let resolver = resolver(&["https://a/", "https://b/"], fetcher.clone());

    let retrieved = resolver.fetch_with_fallback("QmX").await.unwrap();
    assert_eq!(retrieved.url, "https://b/QmX");
    assert_eq!(retrieved.endpoint_index, 1);
    assert_eq!(retrieved.attempts, 2);
    assert_eq!(resolver.current_index(), 1);
    assert_eq!(resolver.resolve_url("QmX"), "https://b/QmX");

    // The next fetch starts at b and does not touch a
    fetcher.set_down("https://a/", false);
    let again = resolver.fetch_with_fallback("QmY").await.unwrap();
    assert_eq!(again.url, "https://b/QmY");
    assert_eq!(again.attempts, 1);

    // Only once b fails does the resolver wrap back to a
    fetcher.set_down("https://b/", true);
    let wrapped = resolver.fetch_with_fallback("QmZ").await.unwrap();
    assert_eq!(wrapped.url, "https://a/QmZ");
    assert_eq!(resolver.current_index(), 0);

    assert_eq!(
        fetcher.calls(),
        vec![
            "https://a/QmX",
            "https://b/QmX",
            "https://b/QmY",
            "https://b/QmZ",
            "https://a/QmZ",
        ]
    );
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
#[case(7)]
#[tokio::test]
async fn test_exhaustion_after_one_pass(#[case] len: usize) {
    let bases: Vec<String> = (0..len).map(|i| format!("https://gw{}.example/ipfs/", i)).collect();
    let base_refs: Vec<&str> = bases.iter().map(String::as_str).collect();
    let fetcher = ScriptedFetcher::new(&base_refs);
    let resolver = resolver(&base_refs, fetcher.clone());

    let err = resolver.fetch_with_fallback("QmGone").await.unwrap_err();
    match err {
        DriveError::GatewayUnavailable { content_id, attempts } => {
            assert_eq!(content_id, "QmGone");
            assert_eq!(attempts, len);
        }
        other => panic!("expected GatewayUnavailable, got {:?}", other),
    }

    let calls = fetcher.calls();
    assert_eq!(calls.len(), len);
    let distinct: HashSet<&String> = calls.iter().collect();
    assert_eq!(distinct.len(), len);
}

#[tokio::test]
async fn test_exhaustion_starts_from_preferred_gateway() {
    let fetcher = ScriptedFetcher::new(&["https://a/"]);
    let resolver = resolver(&["https://a/", "https://b/", "https://c/"], fetcher.clone());
    resolver.fetch_with_fallback("QmFirst").await.unwrap();
    assert_eq!(resolver.current_index(), 1);

    fetcher.set_down("https://b/", true);
    fetcher.set_down("https://c/", true);
    assert!(resolver.fetch_with_fallback("QmSecond").await.is_err());

    let calls = fetcher.calls();
    assert_eq!(
        &calls[2..],
        &["https://b/QmSecond", "https://c/QmSecond", "https://a/QmSecond"]
    );
    // A failed pass leaves the preference where it was
    assert_eq!(resolver.current_index(), 1);
}

#[tokio::test]
async fn test_single_endpoint() {
    let fetcher = ScriptedFetcher::new(&[]);
    let resolver = resolver(&["https://only/ipfs/"], fetcher.clone());

    let ok = resolver.fetch_with_fallback("QmOne").await.unwrap();
    assert_eq!(ok.url, "https://only/ipfs/QmOne");

    fetcher.set_down("https://only/", true);
    let err = resolver.fetch_with_fallback("QmOne").await.unwrap_err();
    assert!(matches!(err, DriveError::GatewayUnavailable { attempts: 1, .. }));
    assert_eq!(fetcher.calls().len(), 2);
}

#[test]
fn test_resolve_url_is_stable() {
    let fetcher = ScriptedFetcher::new(&[]);
    let resolver = resolver(&["https://a/", "https://b/"], fetcher.clone());

    let first = resolver.resolve_url("QmStable");
    for _ in 0..5 {
        assert_eq!(resolver.resolve_url("QmStable"), first);
    }
    assert_eq!(first, "https://a/QmStable");
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_reset_returns_to_first_gateway() {
    let fetcher = ScriptedFetcher::new(&["https://a/"]);
    let resolver = resolver(&["https://a/", "https://b/"], fetcher);

    resolver.fetch_with_fallback("QmX").await.unwrap();
    assert_eq!(resolver.current_index(), 1);

    resolver.reset();
    assert_eq!(resolver.current_index(), 0);
    assert_eq!(resolver.resolve_url("QmX"), "https://a/QmX");
}

#[test]
fn test_empty_endpoint_list_rejected() {
    let fetcher = ScriptedFetcher::new(&[]);
    assert!(matches!(
        GatewayResolver::new(Vec::new(), fetcher),
        Err(DriveError::Config(_))
    ));
    assert!(GatewayEndpoint::new("not a url").is_err());
}

#[tokio::test]
async fn test_concurrent_fetches_agree_on_preference() {
    let fetcher = ScriptedFetcher::new(&["https://a/"]);
    let resolver = Arc::new(resolver(&["https://a/", "https://b/"], fetcher));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.fetch_with_fallback(&format!("Qm{}", i)).await })
        })
        .collect();

    for handle in handles {
        let retrieved = handle.await.unwrap().unwrap();
        assert!(retrieved.url.starts_with("https://b/"));
    }
    assert_eq!(resolver.current_index(), 1);
}

async fn gateway_handler(req: Request<Body>) -> std::result::Result<Response<Body>, Infallible> {
    let resp = match req.uri().path() {
        "/ipfs/QmPresent" => Response::new(Body::from("hello from the gateway")),
        _ => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::empty())
            .unwrap(),
    };
    Ok(resp)
}

fn spawn_gateway() -> SocketAddr {
    let make_svc = make_service_fn(|_conn| async { Ok::<_, Infallible>(service_fn(gateway_handler)) });
    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}

#[tokio::test]
async fn test_http_fetcher_reads_body() {
    let addr = spawn_gateway();
    let fetcher = HttpGatewayFetcher::new(Duration::from_secs(5)).unwrap();

    let bytes = fetcher
        .fetch(&format!("http://{}/ipfs/QmPresent", addr))
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"hello from the gateway");
}

#[tokio::test]
async fn test_http_fetcher_rejects_error_status() {
    let addr = spawn_gateway();
    let fetcher = HttpGatewayFetcher::new(Duration::from_secs(5)).unwrap();

    let err = fetcher
        .fetch(&format!("http://{}/ipfs/QmMissing", addr))
        .await
        .unwrap_err();
    assert!(matches!(err, DriveError::Gateway(_)));
}

#[tokio::test]
async fn test_http_fallback_to_live_gateway() {
    let addr = spawn_gateway();
    // Nothing listens on port 9 of the loopback interface
    let endpoints = vec![
        GatewayEndpoint::new("http://127.0.0.1:9/ipfs/").unwrap(),
        GatewayEndpoint::new(&format!("http://{}/ipfs/", addr)).unwrap(),
    ];
    let fetcher = Arc::new(HttpGatewayFetcher::new(Duration::from_secs(5)).unwrap());
    let resolver = GatewayResolver::new(endpoints, fetcher).unwrap();

    let retrieved = resolver.fetch_with_fallback("QmPresent").await.unwrap();
    assert_eq!(retrieved.endpoint_index, 1);
    assert_eq!(&retrieved.bytes[..], b"hello from the gateway");
}
