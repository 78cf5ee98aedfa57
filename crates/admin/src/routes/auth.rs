//! Authentication route handlers for admin.
//!
//! Username/password login against the record store. A successful login
//! rotates the session ID and stores the admin marker in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use leadbook_core::AdminLogin;
use leadbook_core::validation::fields;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAdminAuth, auth::LOGIN_PATH, clear_current_admin, set_current_admin};
use crate::models::{CurrentAdmin, Flash};
use crate::services::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

/// Where a successful login lands.
pub const HOME_PATH: &str = "/leads";

/// Login form fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub username_error: Option<String>,
    pub password_error: Option<String>,
    pub form_error: Option<&'static str>,
    pub flash: Option<Flash>,
}

impl LoginTemplate {
    fn new(username: String, flash: Option<Flash>) -> Self {
        Self {
            username,
            username_error: None,
            password_error: None,
            form_error: None,
            flash,
        }
    }

    fn with_error(mut self, error: &AdminAuthError) -> Self {
        if let AdminAuthError::Validation(errors) = error {
            self.username_error = errors.first(fields::USERNAME).map(str::to_owned);
            self.password_error = errors.first(fields::PASSWORD).map(str::to_owned);
        }
        self.form_error = error.form_message();
        self
    }
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(
    OptionalAdminAuth(admin): OptionalAdminAuth,
    session: Session,
) -> Result<Response> {
    if admin.is_some() {
        return Ok(Redirect::to(HOME_PATH).into_response());
    }
    let flash = Flash::take(&session).await?;
    Ok(LoginTemplate::new(String::new(), flash).into_response())
}

/// Check credentials and start the admin session.
///
/// POST /auth/login
#[instrument(skip(state, session, form), fields(username = %form.username))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let LoginForm { username, password } = form;
    let login = AdminLogin::new(username.clone(), password);

    // Argon2 verification is CPU-bound
    let store = state.store().clone();
    let outcome =
        tokio::task::spawn_blocking(move || AdminAuthService::new(&store).authenticate(&login))
            .await?;

    match outcome {
        Ok(user) => {
            // Fresh session ID on privilege change
            session.cycle_id().await?;
            set_current_admin(&session, &CurrentAdmin::logged_in(&user, Utc::now())).await?;
            set_sentry_user(&user.id, &user.username);
            Flash::success("Logged in successfully").push(&session).await?;
            Ok(Redirect::to(HOME_PATH).into_response())
        }
        Err(error) => {
            let status = match error {
                AdminAuthError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AdminAuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            };
            Ok((status, LoginTemplate::new(username, None).with_error(&error)).into_response())
        }
    }
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    session.cycle_id().await?;
    clear_sentry_user();
    Flash::success("You have been logged out").push(&session).await?;
    Ok(Redirect::to(LOGIN_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use leadbook_core::ValidationErrors;

    use super::*;

    #[test]
    fn test_login_page_renders_demo_hint() {
        let html = LoginTemplate::new(String::new(), None).render().unwrap();
        assert!(html.contains("name=\"username\""));
        assert!(html.contains("type=\"password\""));
        assert!(html.contains("action=\"/auth/login\""));
    }

    #[test]
    fn test_invalid_credentials_message() {
        let html = LoginTemplate::new("admin".to_string(), None)
            .with_error(&AdminAuthError::InvalidCredentials)
            .render()
            .unwrap();
        assert!(html.contains("Invalid username or password"));
        assert!(html.contains("value=\"admin\""));
    }

    #[test]
    fn test_field_errors() {
        let mut errors = ValidationErrors::single(fields::USERNAME, "Username is required");
        errors.add(fields::PASSWORD, "Password is required");
        let page = LoginTemplate::new(String::new(), None)
            .with_error(&AdminAuthError::Validation(errors));
        assert_eq!(page.username_error.as_deref(), Some("Username is required"));
        assert_eq!(page.password_error.as_deref(), Some("Password is required"));
        assert!(page.form_error.is_none());
    }
}
