//! Embedded stylesheet.

use axum::{
    Router,
    http::header,
    response::IntoResponse,
    routing::get,
};

use crate::state::AppState;

const ADMIN_CSS: &str = include_str!("../../static/admin.css");

pub fn router() -> Router<AppState> {
    Router::new().route("/static/admin.css", get(stylesheet))
}

/// GET /static/admin.css
async fn stylesheet() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "private, max-age=3600"),
        ],
        ADMIN_CSS,
    )
}
