//! Failure classification of the GIPHY client against a local stub server.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use gif_search::{
    Aggregator, GifError, GifProvider, GiphyClient, Operation, ProviderConfig, Severity,
    RATE_LIMIT_ERROR,
};

/// Canned reply: status line and JSON body.
type Reply = (&'static str, &'static str);

const SEARCH_OK: &str = r#"{
    "data": [
        {"id": "a1", "url": "https://giphy.com/gifs/a1", "title": "First",
         "images": {"fixed_height": {"url": "https://media.giphy.com/a1.gif", "width": "200", "height": "150"}}},
        {"id": "b2", "url": "https://giphy.com/gifs/b2", "title": "Second"}
    ],
    "pagination": {"total_count": 2, "count": 2, "offset": 0},
    "meta": {"status": 200, "msg": "OK"}
}"#;

const RANDOM_OK: &str = r#"{"data": {"id": "rnd", "title": "Random"}, "meta": {"status": 200}}"#;

const OK: &str = "200 OK";
const TOO_MANY: &str = "429 Too Many Requests";

/// Serves `respond(n, request)` for the n-th request (0-based) and counts requests.
async fn serve<F>(respond: F) -> (SocketAddr, Arc<AtomicUsize>)
where
    F: Fn(usize, &str) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let respond = respond.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let read = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..read]);
                let (status, body) = respond(n, &request);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, hits)
}

fn client_for(addr: SocketAddr) -> GiphyClient {
    GiphyClient::new(
        ProviderConfig::default()
            .with_api_key("test-key")
            .with_base_url(format!("http://{}/v1/gifs", addr))
            .with_timeout(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_search_success_parses_page() {
    let (addr, hits) = serve(|_, _| (OK, SEARCH_OK)).await;
    let page = client_for(addr).search("cats", 0, 20).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(page.len(), 2);
    assert_eq!(page.total_count, 2);
    assert_eq!(page.items[0].id, "a1");
    assert_eq!(page.items[0].fixed_height().unwrap().height, "150");
}

#[tokio::test]
async fn test_429_is_rate_limited() {
    let (addr, _) = serve(|_, _| (TOO_MANY, "{}")).await;
    let err = client_for(addr).trending(20).await.unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_server_error_is_provider_error() {
    let (addr, _) = serve(|_, _| ("500 Internal Server Error", "{}")).await;
    let err = client_for(addr).search("cats", 0, 20).await.unwrap_err();
    assert!(matches!(
        err,
        GifError::Provider {
            operation: Operation::Search,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Failed search: error: 500 Internal Server Error");
}

#[tokio::test]
async fn test_malformed_json_is_provider_error() {
    let (addr, _) = serve(|_, _| (OK, "<html>not json</html>")).await;
    let err = client_for(addr).trending(20).await.unwrap_err();
    assert!(matches!(
        err,
        GifError::Provider {
            operation: Operation::Trending,
            ..
        }
    ));
}

#[tokio::test]
async fn test_network_failure_is_provider_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let err = client_for(addr).random(1).await.unwrap_err();
    assert!(matches!(
        err,
        GifError::Provider {
            operation: Operation::Random,
            ..
        }
    ));
}

#[tokio::test]
async fn test_random_fans_out() {
    let (addr, hits) = serve(|_, _| (OK, RANDOM_OK)).await;
    let gifs = client_for(addr).random(3).await.unwrap();
    assert_eq!(gifs.len(), 3);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_random_fails_if_any_call_fails() {
    let (addr, _) = serve(|n, _| if n == 1 { (TOO_MANY, "{}") } else { (OK, RANDOM_OK) }).await;
    let err = client_for(addr).random(3).await.unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_missing_key_never_reaches_server() {
    let (addr, hits) = serve(|_, _| (OK, SEARCH_OK)).await;
    let client = GiphyClient::new(
        ProviderConfig::default().with_base_url(format!("http://{}/v1/gifs", addr)),
    )
    .unwrap();

    assert!(client.search("cats", 0, 20).await.unwrap_err().is_configuration());
    assert!(client.trending(20).await.unwrap_err().is_configuration());
    assert!(client.random(3).await.unwrap_err().is_configuration());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_aggregator_falls_back_to_cache_on_429() {
    let (addr, hits) = serve(|n, _| if n == 0 { (OK, SEARCH_OK) } else { (TOO_MANY, "{}") }).await;
    let aggregator = Aggregator::new(client_for(addr));

    let first = aggregator.search("cats", true).await;
    assert_eq!(first.ids(), vec!["a1", "b2"]);
    assert!(!first.has_more);

    let second = aggregator.search("cats", true).await;
    assert_eq!(second.ids(), vec!["a1", "b2"]);
    assert!(!second.has_more);
    assert_eq!(second.error.unwrap().severity, Severity::Info);

    let other = aggregator.search("dogs", true).await;
    assert!(other.is_empty());
    assert_eq!(other.error.unwrap().message, RATE_LIMIT_ERROR);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_initial_sample_falls_back_over_http() {
    let (addr, _) = serve(|_, request| {
        if request.starts_with("GET /v1/gifs/random") {
            (TOO_MANY, "{}")
        } else {
            (OK, SEARCH_OK)
        }
    })
    .await;
    let aggregator = Aggregator::new(client_for(addr));

    let state = aggregator.load_initial().await;
    assert_eq!(state.ids(), vec!["a1", "b2"]);
    assert!(!state.has_more);
    assert!(state.error.is_none());
}
