use newsdesk::feed::{FeedClient, FeedOrigin, FeedPoller};
use newsdesk::fetcher::FetchError;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn listing() -> serde_json::Value {
    json!({"kind": "Listing", "data": {"children": [
        {"kind": "t3", "data": {
            "id": "1abcd",
            "title": "Storm hits coast",
            "selftext": "",
            "url": "https://news.example.com/storm",
            "subreddit_name_prefixed": "r/worldnews",
            "created_utc": 1_700_000_000.0
        }},
        {"kind": "t3", "data": {
            "id": "1abce",
            "title": "Ask: what is happening?",
            "selftext": "Several towns lost power. Crews are responding. More later.",
            "url": "https://www.reddit.com/r/worldnews/comments/1abce/ask/",
            "subreddit_name_prefixed": "r/worldnews",
            "created_utc": 1_700_000_100.0
        }}
    ]}})
}

fn feed_client(server: &MockServer) -> FeedClient {
    FeedClient::new(
        reqwest::Client::new(),
        format!("{}/r/worldnews/new.json", server.uri()),
        format!("{}/posts", server.uri()),
    )
}

#[tokio::test]
async fn test_live_feed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/worldnews/new.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let snapshot = feed_client(&server)
        .load(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(snapshot.origin, FeedOrigin::Live);
    assert_eq!(snapshot.articles.len(), 2);

    let link_post = &snapshot.articles[0];
    assert!(!link_post.has_body());
    assert_eq!(
        link_post.summary,
        "Storm hits coast. Read full details in the source link."
    );

    let self_post = &snapshot.articles[1];
    assert!(self_post.has_body());
    assert_eq!(
        self_post.summary,
        "Several towns lost power. Crews are responding."
    );
}

#[tokio::test]
async fn test_falls_back_to_placeholder_posts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/worldnews/new.json"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"userId": 1, "id": 1, "title": "sunt aut facere", "body": "quia et suscipit. suscipit recusandae. nostrum rerum."},
            {"userId": 1, "id": 2, "title": "qui est esse", "body": ""}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = feed_client(&server)
        .load(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(snapshot.origin, FeedOrigin::Placeholder);
    let ids: Vec<&str> = snapshot.articles.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(
        snapshot.articles[0].url,
        format!("{}/posts/1", server.uri())
    );
    assert_eq!(
        snapshot.articles[0].summary,
        "quia et suscipit. suscipit recusandae."
    );
    assert!(!snapshot.articles[1].has_body());
}

#[tokio::test]
async fn test_both_sources_down() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/worldnews/new.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let result = feed_client(&server).load(&CancellationToken::new()).await;

    match result {
        Err(FetchError::Http { status, .. }) => assert_eq!(status.as_u16(), 502),
        other => panic!("expected placeholder http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancelled_load_does_not_fall_back() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = feed_client(&server).load(&cancel).await;
    assert!(matches!(result, Err(FetchError::Cancelled)));
}

#[tokio::test]
async fn test_poller_emits_snapshots_until_shutdown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/worldnews/new.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .mount(&server)
        .await;

    let (sender, mut receiver) = mpsc::channel(4);
    let shutdown = CancellationToken::new();
    let poller = FeedPoller::new(feed_client(&server), Duration::from_millis(50));
    let handle = tokio::spawn(poller.run(sender, shutdown.clone()));

    for _ in 0..2 {
        let snapshot = tokio::time::timeout(Duration::from_secs(5), receiver.recv())
            .await
            .expect("poller should deliver a snapshot")
            .expect("channel open");
        assert_eq!(snapshot.articles.len(), 2);
    }

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("poller should stop after shutdown")
        .unwrap();
}

#[tokio::test]
async fn test_poller_stops_when_receiver_dropped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/r/worldnews/new.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .mount(&server)
        .await;

    let (sender, receiver) = mpsc::channel(1);
    drop(receiver);

    let poller = FeedPoller::new(feed_client(&server), Duration::from_millis(20));
    tokio::time::timeout(
        Duration::from_secs(5),
        poller.run(sender, CancellationToken::new()),
    )
    .await
    .expect("poller should notice the dropped receiver");
}
