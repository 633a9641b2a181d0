// crates/network/tests/network_tests.rs
//! Integration tests against a local HTTP listener

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storyreel_core::{AppError, StorySource};
use storyreel_network::{Client, ClientConfig, HttpStorySource, NetworkError, RetryPolicy};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const BODY: &str = r#"{"storyCollections":[{"name":"Harbour","stories":[{"id":7,"name":"Dee","profile_picture_url":"https://i.pravatar.cc/300?u=7"}]}]}"#;

/// Serves one canned response per connection; `statuses` are used in order,
/// the last one repeating. Returns the base URL and a request counter.
async fn serve(statuses: Vec<u16>, body: &'static str) -> (String, Arc<AtomicUsize>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let status = statuses[n.min(statuses.len() - 1)];

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(read) => request.extend_from_slice(&buf[..read]),
                }
            }

            let payload = if status == 200 { body } else { "" };
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                payload.len(),
                payload
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{}", addr), hits)
}

fn fast_client(max_attempts: usize) -> Client {
    Client::with_config(ClientConfig {
        timeout: Duration::from_secs(5),
        user_agent: "StoryReelTest/1.0".to_string(),
        max_redirects: 0,
        retry_policy: RetryPolicy::new(max_attempts)
            .with_initial_delay(Duration::from_millis(5))
            .with_jitter(false),
    })
    .expect("Failed to create client")
}

#[tokio::test]
async fn test_http_source_fetches_collections() {
    let (base, hits) = serve(vec![200], BODY).await;
    let source = HttpStorySource::new(fast_client(1), &base).unwrap();

    let collections = source.fetch_story_collections().await.unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0].display_name, "Harbour");
    assert_eq!(collections[0].stories[0].id, 7);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let (base, hits) = serve(vec![503, 503, 200], BODY).await;
    let source = HttpStorySource::new(fast_client(3), &base).unwrap();

    let collections = source.fetch_story_collections().await.unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retries_give_up_after_max_attempts() {
    let (base, hits) = serve(vec![500], BODY).await;
    let client = fast_client(2);

    let result = client.get(&format!("{}/stories", base)).await;
    assert!(matches!(result, Err(NetworkError::Status { status: 500, .. })));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let (base, hits) = serve(vec![404], BODY).await;
    let source = HttpStorySource::new(fast_client(5), &base).unwrap();

    let error = source.fetch_story_collections().await.unwrap_err();
    assert!(matches!(error, AppError::HttpStatus { status: 404, .. }));
    assert_eq!(error.user_message(), "Stories could not be loaded.");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let (base, _) = serve(vec![200], "{\"storyCollections\": 5}").await;
    let source = HttpStorySource::new(fast_client(1), &base).unwrap();

    let error = source.fetch_story_collections().await.unwrap_err();
    assert!(matches!(error, AppError::InvalidStoryResponse { .. }));
}

#[tokio::test]
async fn test_get_bytes() {
    let (base, _) = serve(vec![200], "plain bytes").await;
    let bytes = fast_client(1)
        .get_bytes(&format!("{}/image.jpg", base))
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"plain bytes");
}
