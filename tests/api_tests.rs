
use actix_web::{
    http::{header, StatusCode},
    middleware::NormalizePath,
    test, web, App,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use room_rental_backend::{
    background_task::{CleanupFailure, CleanupLog, CleanupQueue, CleanupReason},
    db::postgres::create_lazy_pool,
    middlewares::auth::AuthMiddleware,
    routes::configure_routes,
    storage::http_store::HttpObjectStore,
    AppState,
};
use serde_json::{json, Value};
use std::sync::Arc;
use test_utils::*;
use uuid::Uuid;

fn app_state() -> web::Data<AppState> {
    app_state_with_log(CleanupLog::default())
}

fn app_state_with_log(cleanup_log: CleanupLog) -> web::Data<AppState> {
    let config = test_config();
    let pool = create_lazy_pool(&config.database_url, config.database_max_connections)
        .expect("Failed to create lazy pool");
    let store = Arc::new(HttpObjectStore::new(&config).expect("Failed to build object store"));
    let (queue, _jobs) = CleanupQueue::new();

    web::Data::new(AppState::new(&config, pool, store, queue, cleanup_log))
}

macro_rules! spawn_app {
    () => {
        spawn_app!(app_state())
    };
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state)
                .wrap(AuthMiddleware)
                .wrap(NormalizePath::trim())
                .configure(configure_routes),
        )
        .await
    };
}

const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";

fn with_multipart(req: test::TestRequest, token: &str, parts: Vec<Part>) -> test::TestRequest {
    req.insert_header(bearer(token))
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(parts))
}

fn validation_messages(body: &Value) -> Vec<(String, String)> {
    body["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .map(|d| (d["field"].as_str().unwrap_or_default().to_string(), d["message"].as_str().unwrap_or_default().to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn access_token(user_id: Uuid, expires_in: i64) -> String {
    let claims = json!({
        "sub": user_id.to_string(),
        "email": "owner@example.com",
        "aud": "authenticated",
        "exp": Utc::now().timestamp() + expires_in,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_bytes()))
        .expect("Failed to sign token")
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

#[actix_rt::test]
async fn home_is_public() {
    let app = spawn_app!();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "Ok");
}

#[actix_rt::test]
async fn filter_options_are_public() {
    let app = spawn_app!();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/rooms/filters").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["property_types"].as_array().map(Vec::len), Some(6));
    assert_eq!(body["price_ranges"][0]["value"], "all");
    assert_eq!(body["tenant_preferences"][4]["label"], "Working Professionals");
}

#[actix_rt::test]
async fn unusable_token_on_public_route_is_ignored() {
    let app = spawn_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/rooms/filters")
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn malformed_room_id_is_rejected_before_lookup() {
    let app = spawn_app!();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/rooms/not-a-uuid").to_request()).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid input: 'not-a-uuid' is not a valid room id");
}

#[actix_rt::test]
async fn owner_views_require_a_session() {
    let app = spawn_app!();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/me/rooms").to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing credentials");
}

#[actix_rt::test]
async fn writes_require_a_session() {
    let app = spawn_app!();
    let id = Uuid::new_v4();

    let requests = vec![
        test::TestRequest::post().uri("/api/v1/rooms").to_request(),
        test::TestRequest::patch().uri(&format!("/api/v1/rooms/{}", id)).to_request(),
        test::TestRequest::patch().uri(&format!("/api/v1/rooms/{}/availability", id)).to_request(),
        test::TestRequest::delete().uri(&format!("/api/v1/rooms/{}", id)).to_request(),
        test::TestRequest::post().uri("/api/v1/auth/sign-out").to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_rt::test]
async fn forged_token_is_rejected_on_protected_route() {
    let app = spawn_app!();
    let forged = encode(
        &Header::default(),
        &json!({"sub": Uuid::new_v4().to_string(), "aud": "authenticated", "exp": Utc::now().timestamp() + 600}),
        &EncodingKey::from_secret(b"some-other-secret-of-sufficient-length"),
    )
    .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/me/rooms")
        .insert_header(bearer(&forged))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid token");
}

#[actix_rt::test]
async fn expired_token_is_reported_as_expired() {
    let app = spawn_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/me/rooms")
        .insert_header(bearer(&access_token(Uuid::new_v4(), -60)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Token has expired");
}

#[actix_rt::test]
async fn create_requires_multipart_body() {
    let app = spawn_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/rooms")
        .insert_header(bearer(&access_token(Uuid::new_v4(), 600)))
        .set_json(json!({"title": "Sunny Room near Metro"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_client_error());
    assert_ne!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn sign_out_without_revocation_store_is_refused() {
    let app = spawn_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/sign-out")
        .insert_header(bearer(&access_token(Uuid::new_v4(), 600)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Redis not configured");
}

#[actix_rt::test]
async fn health_reports_unreachable_database() {
    let cleanup_log = CleanupLog::default();
    cleanup_log.record(CleanupFailure {
        key: format!("{}/1700000000000-abc1234.png", Uuid::new_v4()),
        reason: CleanupReason::ListingDeleted,
        error: "object is locked".into(),
        failed_at: Utc::now(),
    });
    let app = spawn_app!(app_state_with_log(cleanup_log));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["database"], "Unavailable");
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["redis_status"], "Not configured");
    assert_eq!(body["image_cleanup"]["failed_deletions"], 1);
    assert!(body["image_cleanup"].get("recent_failures").is_none());
    assert!(!body.to_string().contains("object is locked"));
}

#[actix_rt::test]
async fn public_routes_match_after_path_normalization() {
    let app = spawn_app!();

    let resp = test::call_service(&app, test::TestRequest::get().uri("//api/v1/rooms/filters/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn create_without_usable_images_lists_each_rejection() {
    let app = spawn_app!();
    let token = access_token(Uuid::new_v4(), 600);

    let req = with_multipart(
        test::TestRequest::post().uri("/api/v1/rooms"),
        &token,
        vec![
            Part::field("listing", room_form_json()),
            Part::file("images", "floorplan.gif", "image/gif", GIF.to_vec()),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        validation_messages(&body),
        vec![
            ("images".to_string(), "Please upload at least one image".to_string()),
            ("images".to_string(), "floorplan.gif: Please upload JPG, PNG, or WebP images only.".to_string()),
        ]
    );
}

#[actix_rt::test]
async fn oversized_image_is_turned_away_with_its_own_reason() {
    let app = spawn_app!();
    let token = access_token(Uuid::new_v4(), 600);

    let mut panorama = PNG.to_vec();
    panorama.resize(21 * 1024 * 1024, 0);

    let req = with_multipart(
        test::TestRequest::post().uri("/api/v1/rooms"),
        &token,
        vec![
            Part::field("listing", room_form_json()),
            Part::file("images", "panorama.png", "image/png", panorama),
            Part::file("images", "floorplan.gif", "image/gif", GIF.to_vec()),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    let messages = validation_messages(&body);
    assert!(messages.contains(&("images".to_string(), "panorama.png: Image must be less than 5MB.".to_string())));
    assert!(messages.contains(&("images".to_string(), "floorplan.gif: Please upload JPG, PNG, or WebP images only.".to_string())));
}

#[actix_rt::test]
async fn create_rejects_invalid_listing_part() {
    let app = spawn_app!();
    let token = access_token(Uuid::new_v4(), 600);
    let mut form = serde_json::to_value(room_form()).unwrap();
    form["title"] = json!("Hut");

    let req = with_multipart(
        test::TestRequest::post().uri("/api/v1/rooms"),
        &token,
        vec![
            Part::field("listing", form.to_string()),
            Part::file("images", "bedroom.png", "image/png", PNG.to_vec()),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        validation_messages(&body),
        vec![("title".to_string(), "Title must be between 5 and 100 characters".to_string())]
    );
}

#[actix_rt::test]
async fn edit_with_malformed_removal_list_is_rejected() {
    let app = spawn_app!();
    let token = access_token(Uuid::new_v4(), 600);

    let req = with_multipart(
        test::TestRequest::patch().uri(&format!("/api/v1/rooms/{}", Uuid::new_v4())),
        &token,
        vec![
            Part::field("listing", room_form_json()),
            Part::field("remove_images", "https://storage.test/not-a-list"),
            Part::file("images", "bedroom.png", "image/png", PNG.to_vec()),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    let messages = validation_messages(&body);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, "remove_images");
}
