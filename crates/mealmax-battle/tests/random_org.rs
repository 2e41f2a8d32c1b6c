//! Tests for the random.org client against a local stub server.
//!
//! Each test serves canned responses with Axum on `127.0.0.1:0` and points
//! [`RandomOrgClient`] at it, so no external network access is needed.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use mealmax_battle::{
    BattleModel, RandomOrgClient, RandomOrgConfig, RandomSource, RandomSourceError,
};
use mealmax_db::{MealRepository, MemoryMealStore};
use mealmax_types::Difficulty;

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/")
}

fn client(url: &str, timeout: Duration) -> RandomOrgClient {
    let config = RandomOrgConfig::default()
        .with_url(url)
        .with_timeout(timeout);
    RandomOrgClient::new(&config).unwrap()
}

#[tokio::test]
async fn fetches_plain_text_fraction() {
    let url = serve(Router::new().route("/", get(|| async { "0.42\n" }))).await;

    let value = client(&url, Duration::from_secs(5))
        .fetch_fraction()
        .await
        .unwrap();

    assert!((value - 0.42).abs() < f64::EPSILON);
}

#[tokio::test]
async fn non_numeric_body_is_malformed() {
    let url = serve(Router::new().route("/", get(|| async { "invalid_response\n" }))).await;

    let err = client(&url, Duration::from_secs(5))
        .fetch_fraction()
        .await
        .unwrap_err();

    assert!(matches!(err, RandomSourceError::Malformed(body) if body == "invalid_response"));
}

#[tokio::test]
async fn slow_server_times_out() {
    let router = Router::new().route(
        "/",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            "0.50"
        }),
    );
    let url = serve(router).await;

    let err = client(&url, Duration::from_millis(100))
        .fetch_fraction()
        .await
        .unwrap_err();

    assert!(matches!(err, RandomSourceError::Timeout { timeout_ms: 100 }));
}

#[tokio::test]
async fn error_status_is_unavailable() {
    let router = Router::new().route(
        "/",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "try later") }),
    );
    let url = serve(router).await;

    let err = client(&url, Duration::from_secs(5))
        .fetch_fraction()
        .await
        .unwrap_err();

    assert!(matches!(err, RandomSourceError::Unavailable(_)));
}

#[tokio::test]
async fn refused_connection_is_unavailable() {
    // Bind and immediately drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/"), Duration::from_secs(5))
        .fetch_fraction()
        .await
        .unwrap_err();

    assert!(matches!(err, RandomSourceError::Unavailable(_)));
}

#[tokio::test]
async fn battle_uses_a_fresh_draw_each_time() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // First draw keeps the nominal result, second flips it.
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let router = Router::new().route(
        "/",
        get(move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    "0.15\n"
                } else {
                    "0.90\n"
                }
            }
        }),
    );
    let url = serve(router).await;

    let store = MemoryMealStore::new();
    let pizza = store
        .create_meal("Pizza", "Italian", 10.0, Difficulty::Low)
        .await
        .unwrap();
    let sushi = store
        .create_meal("Sushi", "Japanese", 15.0, Difficulty::Med)
        .await
        .unwrap();

    let mut model = BattleModel::new(client(&url, Duration::from_secs(5)), store);
    model.stage(pizza.clone()).unwrap();
    model.stage(sushi.clone()).unwrap();
    assert_eq!(model.resolve().await.unwrap(), "Sushi");

    // Sushi (118) is now first; Pizza (67) second. Draw 0.90 >= 0.51 flips.
    model.stage(pizza).unwrap();
    assert_eq!(model.resolve().await.unwrap(), "Pizza");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
