//! HTTP contract tests for the Wavedrop backend client.
//!
//! A mock server stands in for the backend; every test pins the request
//! shape the real backend expects.

use std::sync::{Arc, Mutex};
use wavedrop_client::{ClientConfig, WavedropClient};
use wavedrop_core::{
    AuthService, FeedFilter, NewAudioRecord, SignedUrl, StorageService, UserId, WavedropError,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> WavedropClient {
    WavedropClient::new(ClientConfig::new(server.uri(), "anon-key")).expect("valid config")
}

fn audio_row_json(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": format!("Upload {id}"),
        "filename": format!("u1/{id}.wav"),
        "size": 12_582_912u64,
        "duration": 94,
        "user_id": "u1",
        "created_at": "2025-11-02T09:30:00Z"
    })
}

// =============================================================================
// Feed Queries
// =============================================================================

#[tokio::test]
async fn list_requests_a_window_ordered_newest_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/audios"))
        .and(query_param("select", "*"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", "anon-key"))
        .and(header("Range", "0-7"))
        .and(header("Prefer", "count=exact"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", "0-1/2")
                .set_body_json(serde_json::json!([
                    audio_row_json("a1"),
                    audio_row_json("a2")
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client.list_audios(&FeedFilter::All, 0, 8).await.unwrap();

    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.total_count, Some(2));
    assert_eq!(page.rows[0].id.as_str(), "a1");
    assert_eq!(page.rows[0].storage_path, "u1/a1.wav");
}

#[tokio::test]
async fn list_offsets_the_range_for_later_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/audios"))
        .and(header("Range", "8-15"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", "8-8/9")
                .set_body_json(serde_json::json!([audio_row_json("a9")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client.list_audios(&FeedFilter::All, 8, 8).await.unwrap();
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.total_count, Some(9));
}

#[tokio::test]
async fn owner_filter_becomes_an_equality_constraint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/audios"))
        .and(query_param("user_id", "eq.u1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([audio_row_json("a1")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let filter = FeedFilter::Owner(UserId::new("u1"));
    let page = client.list_audios(&filter, 0, 8).await.unwrap();

    assert_eq!(page.rows.len(), 1);
    // No Content-Range header means no known total.
    assert_eq!(page.total_count, None);
}

#[tokio::test]
async fn unauthorized_list_maps_to_auth_required() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/audios"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.list_audios(&FeedFilter::All, 0, 8).await.unwrap_err();
    assert!(matches!(err, WavedropError::AuthRequired));
}

#[tokio::test]
async fn insert_sends_the_row_and_returns_the_representation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/audios"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(serde_json::json!({
            "title": "Rain on glass",
            "filename": "u1/7f3a.wav",
            "size": 12_582_912u64,
            "duration": 94,
            "user_id": "u1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([{
            "id": "a-new",
            "title": "Rain on glass",
            "filename": "u1/7f3a.wav",
            "size": 12_582_912u64,
            "duration": 94,
            "user_id": "u1",
            "created_at": "2025-11-02T09:30:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let record = NewAudioRecord {
        title: "Rain on glass".to_string(),
        owner_id: UserId::new("u1"),
        storage_path: "u1/7f3a.wav".to_string(),
        size_bytes: 12_582_912,
        duration_seconds: 94,
    };

    let item = client.insert_audio(record).await.unwrap();
    assert_eq!(item.id.as_str(), "a-new");
    assert_eq!(item.title, "Rain on glass");
}

// =============================================================================
// Object Storage
// =============================================================================

#[tokio::test]
async fn blob_upload_targets_the_bucket_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/audio-files/u1/7f3a.wav"))
        .and(header("Content-Type", "audio/wav"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bytes = vec![0x52, 0x49, 0x46, 0x46];
    client.upload_blob("u1/7f3a.wav", &bytes).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].body, bytes);
}

#[tokio::test]
async fn sign_url_posts_the_ttl_and_absolutizes_the_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/sign/audio-files/u1/7f3a.wav"))
        .and(body_json(serde_json::json!({ "expiresIn": 3600 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "signedURL": "/object/sign/audio-files/u1/7f3a.wav?token=abc123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let url = client.sign_url("u1/7f3a.wav", 3600).await.unwrap();

    assert_eq!(
        url.as_str(),
        format!(
            "{}/storage/v1/object/sign/audio-files/u1/7f3a.wav?token=abc123",
            server.uri()
        )
    );
}

#[tokio::test]
async fn sign_url_failure_surfaces_the_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/sign/audio-files/u1/missing.wav"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Object not found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.sign_url("u1/missing.wav", 3600).await.unwrap_err();
    assert!(matches!(err, WavedropError::Network(_)));
}

#[tokio::test]
async fn fetch_blob_returns_the_raw_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/object/sign/audio-files/u1/7f3a.wav"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3, 4]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let url = SignedUrl::new(format!(
        "{}/object/sign/audio-files/u1/7f3a.wav?token=abc",
        server.uri()
    ));
    let bytes = client.fetch_blob(&url).await.unwrap();
    assert_eq!(bytes, vec![1, 2, 3, 4]);
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn set_session_fetches_the_user_and_notifies_subscribers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer tok-1"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "u1",
            "email": "aki@example.com",
            "user_metadata": { "full_name": "Aki" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let events: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let events_clone = Arc::clone(&events);
    let _subscription = client.subscribe(Arc::new(move |user| {
        events_clone
            .lock()
            .unwrap()
            .push(user.map(|u| u.id.to_string()));
    }));

    assert!(client.current_user().await.unwrap().is_none());

    let user = client.set_session("tok-1").await.unwrap();
    assert_eq!(user.id.as_str(), "u1");
    assert_eq!(user.display_name.as_deref(), Some("Aki"));
    assert!(client.is_authenticated());
    assert_eq!(
        client.current_user().await.unwrap().map(|u| u.id),
        Some(UserId::new("u1"))
    );

    client.sign_out().await.unwrap();
    assert!(!client.is_authenticated());
    assert!(client.current_user().await.unwrap().is_none());

    assert_eq!(
        *events.lock().unwrap(),
        vec![Some("u1".to_string()), None]
    );
}

#[tokio::test]
async fn rejected_token_does_not_establish_a_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.set_session("expired").await.unwrap_err();
    assert!(matches!(err, wavedrop_client::ClientError::AuthRequired));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn session_bearer_is_attached_to_storage_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "u1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/audios"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_session("tok-1").await.unwrap();
    let page = client.list_audios(&FeedFilter::All, 0, 8).await.unwrap();
    assert!(page.rows.is_empty());
}
