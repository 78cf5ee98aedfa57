//! Leadbook Admin library.
//!
//! The lead console: a password-protected table of every enquiry with
//! search, inline edit and delete. Exposed as a library so the binary and
//! the integration tests build the same router.
//!
//! # Security
//!
//! Lead records hold personal contact details. Bind to a private interface
//! or put the console behind an authenticating proxy, and change the seeded
//! `admin` password before real use.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{Request, Response, StatusCode},
    middleware::from_fn,
    routing::get,
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

pub use config::AdminConfig;
pub use state::AppState;

/// Build the admin router with its full middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        // Path only: the query string carries search terms
                        path = %request.uri().path(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the record store cannot be read.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().readiness() {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{HeaderValue, Method, header};
    use chrono::{TimeZone, Utc};
    use leadbook_core::{Lead, LeadStatus, LeadSubmission};
    use leadbook_store::RecordStore;
    use tower::ServiceExt;

    use super::*;

    fn test_app() -> (Router, RecordStore) {
        let store = RecordStore::in_memory();
        (app(AppState::new(AdminConfig::default(), store.clone())), store)
    }

    fn seed_lead(store: &RecordStore) -> Lead {
        let input = LeadSubmission {
            name: "Asha Rao".to_string(),
            email: "asha@x.com".to_string(),
            phone: "9876543210".to_string(),
            curriculum: "CBSE".to_string(),
            grade: "5".to_string(),
        }
        .validate()
        .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        store.append_new_lead(input, now)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(uri: &str, body: &str, cookie: Option<&HeaderValue>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, cookie: Option<&HeaderValue>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    /// Log in and return the session cookie (`name=value`).
    async fn login(app: &Router) -> HeaderValue {
        let response = app
            .clone()
            .oneshot(form_post("/auth/login", "username=admin&password=admin123", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/leads");

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.contains("SameSite=Strict"));
        assert!(set_cookie.contains("HttpOnly"));
        let pair = set_cookie.split(';').next().unwrap();
        HeaderValue::from_str(pair).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = test_app();
        let response = app.oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-robots-tag"], "noindex, nofollow");
    }

    #[tokio::test]
    async fn test_leads_require_login() {
        let (app, _) = test_app();
        let response = app.oneshot(get("/leads", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let (app, _) = test_app();
        let response = app
            .oneshot(form_post("/auth/login", "username=admin&password=wrong", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Invalid username or password"));
    }

    #[tokio::test]
    async fn test_empty_login_fields() {
        let (app, _) = test_app();
        let response = app
            .oneshot(form_post("/auth/login", "username=&password=", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Username is required"));
        assert!(html.contains("Password is required"));
    }

    #[tokio::test]
    async fn test_login_then_list_and_filter() {
        let (app, store) = test_app();
        seed_lead(&store);
        let cookie = login(&app).await;

        let response = app.clone().oneshot(get("/leads", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Logged in successfully"));
        assert!(html.contains("Asha Rao"));

        let response = app
            .clone()
            .oneshot(get("/leads?q=nobody", Some(&cookie)))
            .await
            .unwrap();
        assert!(body_text(response).await.contains("No leads found"));

        // Already logged in: the login page bounces to the console
        let response = app.oneshot(get("/auth/login", Some(&cookie))).await.unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/leads");
    }

    #[tokio::test]
    async fn test_update_status() {
        let (app, store) = test_app();
        let lead = seed_lead(&store);
        let cookie = login(&app).await;

        let response = app
            .clone()
            .oneshot(form_post(
                &format!("/leads/{}", lead.id),
                "status=Enroll&q=asha",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/leads?q=asha");
        assert_eq!(store.list_leads()[0].status, LeadStatus::Enroll);

        let response = app.oneshot(get("/leads?q=asha", Some(&cookie))).await.unwrap();
        assert!(body_text(response).await.contains("Lead updated successfully"));
    }

    #[tokio::test]
    async fn test_invalid_edit_rerenders_row() {
        let (app, store) = test_app();
        let lead = seed_lead(&store);
        let cookie = login(&app).await;

        let response = app
            .oneshot(form_post(
                &format!("/leads/{}", lead.id),
                "phone=12345",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Phone must be 10 digits"));
        assert!(html.contains("value=\"12345\""));
        assert_eq!(store.list_leads()[0].phone, "9876543210");
    }

    #[tokio::test]
    async fn test_update_unknown_lead() {
        let (app, _) = test_app();
        let cookie = login(&app).await;

        let response = app
            .clone()
            .oneshot(form_post("/leads/42", "status=Enroll", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/leads");

        let response = app.oneshot(get("/leads", Some(&cookie))).await.unwrap();
        assert!(body_text(response).await.contains("Lead not found"));
    }

    #[tokio::test]
    async fn test_confirm_then_delete() {
        let (app, store) = test_app();
        let lead = seed_lead(&store);
        let cookie = login(&app).await;

        let response = app
            .clone()
            .oneshot(get(&format!("/leads/{}/delete", lead.id), Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Are you sure"));
        assert_eq!(store.list_leads().len(), 1);

        let response = app
            .oneshot(form_post(
                &format!("/leads/{}/delete", lead.id),
                "q=",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(store.list_leads().is_empty());
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let (app, _) = test_app();
        let cookie = login(&app).await;

        let response = app
            .clone()
            .oneshot(form_post("/auth/logout", "", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");

        // The pre-logout cookie no longer grants access
        let response = app.oneshot(get("/leads", Some(&cookie))).await.unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");
    }
}
