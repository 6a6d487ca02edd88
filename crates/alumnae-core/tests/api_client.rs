use alumnae_core::api::{ApiClient, ApiError};
use alumnae_core::models::{board, GatheringForm, GatheringStatus};
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), "anon").unwrap()
}

fn gathering(id: i64, status: &str, participants: u32) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Gathering {}", id),
        "type": "Regional",
        "status": status,
        "date": "2024. 10. 30",
        "location": "Main hall",
        "participants": participants
    })
}

#[tokio::test]
async fn gatherings_group_into_board() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/gatherings"))
        .and(query_param("order", "id.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            gathering(1, "open", 3),
            gathering(2, "done", 40),
            gathering(3, "open", 0),
        ])))
        .mount(&server)
        .await;

    let gatherings = client(&server).fetch_gatherings().await.unwrap();
    let columns = board(&gatherings);
    assert_eq!(columns[1].status, GatheringStatus::Open);
    assert_eq!(columns[1].items.len(), 2);
    assert_eq!(columns[3].items[0].participants, 40);
}

#[tokio::test]
async fn sign_up_increments_participants() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/gatherings"))
        .and(query_param("id", "eq.1"))
        .and(body_json(json!({"participants": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([gathering(1, "open", 4)])))
        .expect(1)
        .mount(&server)
        .await;

    let current = serde_json::from_value(gathering(1, "open", 3)).unwrap();
    let updated = client(&server).sign_up(&current).await.unwrap();
    assert_eq!(updated.participants, 4);
}

#[tokio::test]
async fn sign_up_rejected_when_closed() {
    let server = MockServer::start().await;
    let closed = serde_json::from_value(gathering(2, "upcoming", 10)).unwrap();
    let err = client(&server).sign_up(&closed).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn create_and_move_gathering() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/gatherings"))
        .and(body_partial_json(json!({"title": "Book club", "status": "planning", "participants": 0})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([gathering(9, "planning", 0)])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/gatherings"))
        .and(query_param("id", "eq.9"))
        .and(body_json(json!({"status": "open"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([gathering(9, "open", 0)])))
        .mount(&server)
        .await;

    let client = client(&server);
    let form = GatheringForm {
        title: "Book club".to_string(),
        ..Default::default()
    };
    let created = client.create_gathering(&form.validate().unwrap()).await.unwrap();
    let moved = client
        .update_gathering_status(created.id, created.status.next())
        .await
        .unwrap();
    assert_eq!(moved.status, GatheringStatus::Open);
}

#[tokio::test]
async fn upload_photo_stores_object_then_row() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/alumnae-photos/\d+-[a-z0-9]{8}\.jpg$"))
        .and(header("content-type", "image/jpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Key": "alumnae-photos/x.jpg"})))
        .expect(1)
        .mount(&server)
        .await;

    let public_prefix = format!("{}/storage/v1/object/public/alumnae-photos/", server.uri());
    Mock::given(method("POST"))
        .and(path("/rest/v1/archive_photos"))
        .and(body_partial_json(json!({"title": "Sports Day", "taken_at": "2023-10-15"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": 12,
            "photo_url": format!("{}1-abcdefgh.jpg", public_prefix),
            "title": "Sports Day",
            "description": null,
            "taken_at": "2023-10-15",
            "created_at": "2024-01-02T03:04:05+00:00"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let photo = client(&server)
        .upload_photo(
            "alumnae-photos",
            "IMG_0001.JPG",
            vec![0xFF, 0xD8, 0xFF],
            "Sports Day",
            None,
            NaiveDate::from_ymd_opt(2023, 10, 15),
        )
        .await
        .unwrap();
    assert_eq!(photo.id, 12);
    assert!(photo.photo_url.starts_with(&public_prefix));
}

#[tokio::test]
async fn failed_upload_skips_insert() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "statusCode": "403",
            "error": "Unauthorized",
            "message": "new row violates row-level security policy"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/archive_photos"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .upload_photo("alumnae-photos", "a.png", vec![1], "t", None, None)
        .await
        .unwrap_err();
    match err {
        ApiError::AccessDenied(msg) => assert!(msg.contains("row-level security")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn photos_newest_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/archive_photos"))
        .and(query_param("order", "taken_at.desc.nullslast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "photo_url": "u2", "title": "B", "taken_at": "2024-05-01"},
            {"id": 1, "photo_url": "u1", "title": "A", "taken_at": "2023-05-01"}
        ])))
        .mount(&server)
        .await;

    let photos = client(&server).fetch_photos().await.unwrap();
    assert_eq!(photos.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);
}
