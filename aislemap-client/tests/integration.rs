//! Client requests against a one-shot local HTTP server.

use aislemap_client::{ClientError, ProductQuery, Session, StoreMapClient};
use aislemap_core::{
    Category, ChangeSet, ProductId, ProductLocationFilter, ProductToLocate, Subcategory,
    SubmissionState,
};
use chrono::{TimeZone, Utc};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves a single request with `status` and `body`, returning the raw
/// request text.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            raw.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&raw).to_string()
    });

    (base_url, handle)
}

fn session() -> Session {
    Session {
        session_id: Some("s3ss10n".to_string()),
        csrf_token: Some("t0k3n".to_string()),
    }
}

fn product(id: i64) -> ProductToLocate {
    ProductToLocate {
        id: ProductId(id),
        name: "Rye bread".to_string(),
        vendor: "Bakers".to_string(),
        vendor_details_url: String::new(),
        date_started: None,
        date_ended: None,
        details_url: String::new(),
        subcategory: Subcategory {
            id: 3,
            name: "Bread".to_string(),
            description: String::new(),
            visible: true,
            parent: Category {
                id: 1,
                name: "Bakery".to_string(),
                description: String::new(),
                visible: true,
            },
        },
        location: None,
    }
}

#[tokio::test]
async fn product_list_sends_query_and_cookies() {
    let body = r#"{"products": [], "page": 1, "totalPages": 0, "filter": "all"}"#;
    let (base_url, server) = serve_once("200 OK", body).await;
    let client = StoreMapClient::new(&base_url)
        .unwrap()
        .with_session(session());

    let query = ProductQuery {
        filter: ProductLocationFilter::Missing,
        name: " rye ".to_string(),
        ..ProductQuery::default()
    };
    let valid_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let page = client.get_products(&query, &valid_at).await.unwrap();
    assert_eq!(page.filter, ProductLocationFilter::All);

    let request = server.await.unwrap();
    let request_line = request.lines().next().unwrap();
    let expected = "GET /api/maps/m/locations/?q=rye&validAt=2024-05-01T08%3A00%3A00.000Z";
    assert!(request_line.starts_with(expected));
    assert!(request_line.contains("&filter=missing"));
    assert!(request.contains("sessionid=s3ss10n"));
}

#[tokio::test]
async fn submission_posts_token_and_settles() {
    let body = r#"{"success": true, "message": "Changes saved to 1 location."}"#;
    let (base_url, server) = serve_once("200 OK", body).await;
    let client = StoreMapClient::new(&base_url)
        .unwrap()
        .with_session(session());

    let mut set = ChangeSet::new();
    set.track(&product(9)).unwrap().revert_auto = true;
    let date = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

    let response = client.submit_change_set(&mut set, &date).await.unwrap();
    assert!(response.success);
    assert_eq!(set.state(), SubmissionState::Settled { success: true });
    assert!(set.is_empty());

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/maps/m/locations/"));
    assert!(request.to_lowercase().contains("x-csrftoken: t0k3n"));
    assert!(request.contains(r#""revert_auto":true"#));
    assert!(request.contains(r#""date":"2024-05-01T08:00:00.000Z""#));
}

#[tokio::test]
async fn partial_failure_keeps_only_automatic_placements() {
    let body = r#"{"success": false, "message": "No automatic location.", "warning": true}"#;
    let (base_url, server) = serve_once("500 Internal Server Error", body).await;
    let client = StoreMapClient::new(&base_url)
        .unwrap()
        .with_session(session());

    let mut set = ChangeSet::new();
    set.track(&product(9)).unwrap().revert_auto = true;
    set.track(&product(10)).unwrap().delete_location = true;
    let date = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

    let response = client.submit_change_set(&mut set, &date).await.unwrap();
    assert!(!response.success);
    assert!(response.warning);
    assert_eq!(set.state(), SubmissionState::Settled { success: false });
    let kept = set.get(ProductId(9)).unwrap();
    assert!(kept.revert_auto);
    assert!(set.get(ProductId(10)).is_none());
    server.await.unwrap();
}

#[tokio::test]
async fn failure_without_warning_keeps_every_change() {
    let body = r#"{"success": false, "message": "Invalid location change data."}"#;
    let (base_url, server) = serve_once("400 Bad Request", body).await;
    let client = StoreMapClient::new(&base_url)
        .unwrap()
        .with_session(session());

    let mut set = ChangeSet::new();
    set.track(&product(9)).unwrap().revert_auto = true;
    set.track(&product(10)).unwrap().delete_location = true;
    let date = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

    let response = client.submit_change_set(&mut set, &date).await.unwrap();
    assert!(!response.success);
    assert_eq!(set.state(), SubmissionState::Settled { success: false });
    assert_eq!(set.dirty().count(), 2);
    server.await.unwrap();
}

#[tokio::test]
async fn cancelled_submission_unlocks_the_change_set() {
    // Accepted by the OS backlog, never answered.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/", listener.local_addr().unwrap());
    let client = StoreMapClient::new(&base_url)
        .unwrap()
        .with_session(session());

    let mut set = ChangeSet::new();
    set.track(&product(9)).unwrap().delete_location = true;
    let date = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

    let submit = client.submit_change_set(&mut set, &date);
    let outcome = tokio::time::timeout(Duration::from_millis(200), submit).await;
    assert!(outcome.is_err());

    assert_eq!(set.state(), SubmissionState::Settled { success: false });
    assert!(set.is_dirty());
    assert!(set.track(&product(10)).is_ok());
    drop(listener);
}

#[tokio::test]
async fn error_status_without_body_is_an_api_error() {
    let (base_url, server) = serve_once("404 Not Found", r#"{"error": "Not found"}"#).await;
    let client = StoreMapClient::new(&base_url).unwrap();

    let result = client.get_aisle_structure().await;
    match result {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not found");
        }
        other => panic!("expected API error, got {other:?}"),
    }
    server.await.unwrap();
}
