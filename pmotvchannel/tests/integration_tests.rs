//! Integration tests for pmotvchannel

use pmotvchannel::{ChannelClient, FetchError, LoadError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn acme_payload() -> serde_json::Value {
    json!({
        "data": {
            "channel": {
                "name": "Acme TV",
                "social_links": {}
            },
            "url": "https://cdn/stream.m3u8",
            "background": "https://cdn/bg.jpg"
        }
    })
}

async fn client() -> ChannelClient {
    ChannelClient::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_resolve_channel() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/channel/acme/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(acme_payload()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (channel, source) = client()
        .await
        .resolve("acme", &format!("{}/api", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(channel.name, "Acme TV");
    assert!(channel.social_links.is_empty());
    assert_eq!(channel.background_image_url.as_deref(), Some("https://cdn/bg.jpg"));
    assert_eq!(source.stream_url, "https://cdn/stream.m3u8");
    assert_eq!(source.poster_image_url.as_deref(), Some("https://cdn/bg.jpg"));
}

#[tokio::test]
async fn test_missing_data_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/channel/ghost/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "not found"})))
        .mount(&mock_server)
        .await;

    let err = client()
        .await
        .resolve("ghost", &format!("{}/api", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Unavailable(FetchError::MissingData)));
    assert!(err.channel().is_none());
}

#[tokio::test]
async fn test_error_status_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = client()
        .await
        .resolve("acme", &format!("{}/api", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Unavailable(FetchError::Status(503))));
}

#[tokio::test]
async fn test_malformed_body_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let err = client()
        .await
        .resolve("acme", &format!("{}/api", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Unavailable(FetchError::Json(_))));
}

#[tokio::test]
async fn test_network_error_is_unavailable() {
    // Nothing listens on port 1
    let err = client()
        .await
        .resolve("acme", "http://127.0.0.1:1/api")
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Unavailable(FetchError::Http(_))));
}

#[tokio::test]
async fn test_channel_without_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/channel/acme/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "channel": {"name": "Acme TV", "social_links": {"youtube": "https://yt/acme"}}
            }
        })))
        .mount(&mock_server)
        .await;

    let err = client()
        .await
        .resolve("acme", &format!("{}/api", mock_server.uri()))
        .await
        .unwrap_err();

    let channel = err.channel().expect("channel identity kept");
    assert_eq!(channel.name, "Acme TV");
    assert_eq!(channel.social_links["youtube"], "https://yt/acme");
}

#[tokio::test]
async fn test_relative_background_uses_asset_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/channel/acme/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "channel": {"name": "Acme TV"},
                "url": "https://cdn/stream.m3u8",
                "background": "/storage/backgrounds/acme.jpg"
            }
        })))
        .mount(&mock_server)
        .await;

    let client = ChannelClient::builder()
        .asset_base_url("https://assets.example.com")
        .build()
        .await
        .unwrap();

    let (channel, source) = client
        .resolve("acme", &format!("{}/api", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(
        channel.background_image_url.as_deref(),
        Some("https://assets.example.com/storage/backgrounds/acme.jpg")
    );
    assert_eq!(source.poster_image_url, channel.background_image_url);
}

#[tokio::test]
async fn test_request_timeout_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(acme_payload())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = ChannelClient::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .await
        .unwrap();

    let err = client
        .resolve("acme", &format!("{}/api", mock_server.uri()))
        .await
        .unwrap_err();

    match err {
        LoadError::Unavailable(FetchError::Http(e)) => assert!(e.is_timeout()),
        other => panic!("unexpected error: {other:?}"),
    }
}
