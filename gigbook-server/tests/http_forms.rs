//! Router-level tests for requests that are settled before the database.
//!
//! The pool points at a closed port, so anything that does reach the
//! database fails fast and shows how persistence errors are surfaced.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use gigbook_server::{build_router, AppState};

fn app() -> Router {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://gigbook@127.0.0.1:1/gigbook")
        .unwrap();
    build_router(Arc::new(AppState::new(pool)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn field_names(body: &Value) -> Vec<String> {
    body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn venue_form_with_missing_fields_is_rejected() {
    let response = app()
        .oneshot(post_json(
            "/venues/create",
            json!({ "name": "The Dive", "state": "ZZ" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(
        body["message"],
        "An error occurred. Venue The Dive could not be listed."
    );
    let fields = field_names(&body);
    assert!(fields.contains(&"city".to_string()));
    assert!(fields.contains(&"state".to_string()));
    assert!(fields.contains(&"address".to_string()));
    // the submission comes back for correction
    assert_eq!(body["form"]["name"], "The Dive");
}

#[tokio::test]
async fn artist_form_with_bad_phone_is_rejected() {
    let response = app()
        .oneshot(post_json(
            "/artists/create",
            json!({
                "name": "Guns N Petals",
                "city": "San Francisco",
                "state": "CA",
                "phone": "call me maybe"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(field_names(&body), vec!["phone".to_string()]);
}

#[tokio::test]
async fn show_form_with_bad_start_time_is_rejected() {
    let response = app()
        .oneshot(post_json(
            "/shows/create",
            json!({ "venue_id": 1, "artist_id": 4, "start_time": "next tuesday" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["message"], "An error occurred. Show could not be listed.");
    assert_eq!(field_names(&body), vec!["start_time".to_string()]);
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    for (uri, resource) in [
        ("/venues/abc", "venue"),
        ("/artists/-3", "artist"),
        ("/venues/abc/edit", "venue"),
    ] {
        let response = app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["error"], "not_found");
        assert!(
            body["message"].as_str().unwrap().starts_with(resource),
            "{uri}: {}",
            body["message"]
        );
    }
}

#[tokio::test]
async fn null_in_text_field_is_a_form_rejection() {
    let response = app()
        .oneshot(post_json(
            "/venues/create",
            json!({ "name": null, "city": "SF" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "An error occurred. Venue could not be listed.");
    assert_eq!(field_names(&body), vec!["name".to_string()]);
    assert_eq!(body["form"]["city"], "SF");
}

#[tokio::test]
async fn id_sent_as_string_is_a_form_rejection() {
    let response = app()
        .oneshot(post_json(
            "/shows/create",
            json!({ "venue_id": "1", "artist_id": 2, "start_time": "2035-01-01 20:00" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["message"], "An error occurred. Show could not be listed.");
    assert_eq!(field_names(&body), vec!["venue_id".to_string()]);
    assert_eq!(body["form"]["venue_id"], "1");
}

#[tokio::test]
async fn edit_body_with_wrong_types_names_the_venue() {
    let response = app()
        .oneshot(post_json(
            "/venues/7/edit",
            json!({ "name": "The Dive", "seeking_talent": "yes" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "An error occurred. Venue The Dive could not be edited."
    );
    assert_eq!(field_names(&body), vec!["seeking_talent".to_string()]);
}

#[tokio::test]
async fn unreadable_bodies_get_json_errors() {
    let search_as_json = post_json("/venues/search", json!({ "search_term": "hop" }));
    let response = app().oneshot(search_as_json).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body_json(response).await["error"], "unsupported_media_type");

    let form_as_text = Request::builder()
        .method(Method::POST)
        .uri("/artists/create")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("name=Matt"))
        .unwrap();
    let response = app().oneshot(form_as_text).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body_json(response).await["error"], "unsupported_media_type");

    let broken = Request::builder()
        .method(Method::POST)
        .uri("/venues/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app().oneshot(broken).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_body");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn blank_forms_need_no_database() {
    let response = app().oneshot(get("/venues/create")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["form"]["name"], "");
    assert!(body["choices"]["states"]
        .as_array()
        .unwrap()
        .contains(&json!("CA")));

    let response = app().oneshot(get("/artists/create")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app().oneshot(get("/shows/create")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(!body["form"]["start_time"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn valid_create_against_dead_database_is_a_failed_write() {
    let response = app()
        .oneshot(post_json(
            "/venues/create",
            json!({
                "name": "The Musical Hop",
                "city": "San Francisco",
                "state": "CA",
                "address": "1015 Folsom Street",
                "genres": ["Jazz", "reggae"]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "write_failed");
}

#[tokio::test]
async fn read_against_dead_database_is_a_server_error() {
    let response = app().oneshot(get("/venues")).await.unwrap();
    assert!(response.status().is_server_error());
    let body = body_json(response).await;
    assert_eq!(body["message"], "an internal error occurred");
}

#[tokio::test]
async fn health_reports_degraded_database() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"]["connected"], false);
}
