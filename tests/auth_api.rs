use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{test, web, App};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rollcall_server::auth::handlers::{login, profile, student_login, student_profile};
use rollcall_server::auth::Claims;
use rollcall_server::db::models::Role;
use rollcall_server::{not_found, AppState, Settings};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

// Lazy pool: nothing here needs a live database. Handlers that do reach the
// datastore surface the generic 500, which is itself under test.
fn test_state() -> AppState {
    let config = Settings::new_for_test().unwrap();
    let pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy(&config.database.url)
        .unwrap();
    AppState::with_pool(config, pool)
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .route("/api/auth/login", web::post().to(login))
                .route("/api/auth/profile", web::get().to(profile))
                .route("/api/student-auth/login", web::post().to(student_login))
                .route("/api/student-auth/profile", web::get().to(student_profile)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_login_requires_credentials() {
    let app = test_app!(test_state());

    for body in [
        json!({ "email": "student1@example.com", "password": "" }),
        json!({ "email": "", "password": "123456" }),
        json!({ "email": "student1@example.com" }),
        json!({}),
    ] {
        let response = test::TestRequest::post()
            .uri("/api/student-auth/login")
            .set_json(&body)
            .send_request(&app)
            .await;

        assert_eq!(response.status(), 400, "body: {}", body);
        let parsed: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(parsed, json!({ "error": "Email and password are required" }));
    }
}

#[actix_web::test]
async fn test_account_login_requires_credentials() {
    let app = test_app!(test_state());

    let response = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "", "password": "" }))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn test_profile_without_token() {
    let app = test_app!(test_state());

    let response = test::TestRequest::get()
        .uri("/api/student-auth/profile")
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 401);
    let parsed: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(parsed, json!({ "error": "No token provided" }));
}

#[actix_web::test]
async fn test_profile_with_invalid_token() {
    let app = test_app!(test_state());

    // Garbage bearer token and a malformed header without the Bearer scheme
    // are indistinguishable to the caller.
    for header in ["Bearer garbage", "garbage", "Bearer "] {
        let response = test::TestRequest::get()
            .uri("/api/student-auth/profile")
            .insert_header(("Authorization", header))
            .send_request(&app)
            .await;

        assert_eq!(response.status(), 401, "header: {:?}", header);
        let parsed: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(parsed, json!({ "error": "Invalid token" }));
    }
}

#[actix_web::test]
async fn test_profile_with_non_utf8_header() {
    let app = test_app!(test_state());

    // Header is present but unreadable: that is an invalid token, not a
    // missing one.
    let response = test::TestRequest::get()
        .uri("/api/student-auth/profile")
        .insert_header((
            HeaderName::from_static("authorization"),
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        ))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 401);
    let parsed: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(parsed, json!({ "error": "Invalid token" }));
}

#[actix_web::test]
async fn test_profile_with_expired_token() {
    let app = test_app!(test_state());

    let now = Utc::now();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "student1@example.com".to_string(),
        role: Role::Student,
        iat: (now - Duration::hours(26)).timestamp(),
        exp: (now - Duration::hours(2)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test_secret"),
    )
    .unwrap();

    let response = test::TestRequest::get()
        .uri("/api/student-auth/profile")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 401);
    let parsed: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(parsed, json!({ "error": "Invalid token" }));
}

#[actix_web::test]
async fn test_profile_with_token_just_past_expiry() {
    let app = test_app!(test_state());

    // Thirty seconds past exp: rejected immediately, no grace window.
    let now = Utc::now();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "student1@example.com".to_string(),
        role: Role::Student,
        iat: (now - Duration::hours(24)).timestamp(),
        exp: (now - Duration::seconds(30)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test_secret"),
    )
    .unwrap();

    let response = test::TestRequest::get()
        .uri("/api/student-auth/profile")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 401);
    let parsed: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(parsed, json!({ "error": "Invalid token" }));
}

#[actix_web::test]
async fn test_unmatched_route_returns_json_404() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .route("/api/student-auth/login", web::post().to(student_login))
            .default_service(web::route().to(not_found)),
    )
    .await;

    let response = test::TestRequest::get()
        .uri("/api/does-not-exist")
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 404);
    let parsed: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(parsed, json!({ "error": "Not Found" }));
}

#[actix_web::test]
async fn test_datastore_failure_is_opaque() {
    // A well-formed, correctly signed token whose profile lookup hits an
    // unreachable datastore must produce the generic 500 body, nothing more.
    let app = test_app!(test_state());

    let now = Utc::now();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "student1@example.com".to_string(),
        role: Role::Student,
        iat: now.timestamp(),
        exp: (now + Duration::hours(24)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test_secret"),
    )
    .unwrap();

    let response = test::TestRequest::get()
        .uri("/api/student-auth/profile")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 500);
    let parsed: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(parsed, json!({ "error": "Internal server error" }));
}
