//! Integration tests for Leadbook.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p leadbook-integration-tests
//! ```
//!
//! Each [`TestContext`] serves the storefront and the admin console on
//! ephemeral localhost ports over one file-backed record store in a
//! temporary directory, the same arrangement as a deployment sharing
//! `LEADBOOK_DATA_PATH`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use leadbook_store::{RecordStore, StoreConfig};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Both sites running against one store.
pub struct TestContext {
    pub storefront_url: String,
    pub admin_url: String,
    pub store: RecordStore,
    pub data_path: PathBuf,
    _data_dir: TempDir,
}

impl TestContext {
    /// Start both servers.
    ///
    /// # Panics
    ///
    /// Panics if the temporary store or a listener cannot be created.
    pub async fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("create temp dir");
        let data_path = data_dir.path().join("leadbook.json");
        let store = RecordStore::open(Some(&data_path), &StoreConfig::default())
            .expect("open record store");

        let storefront_config = leadbook_storefront::StorefrontConfig {
            otp_delay: Duration::ZERO,
            ..leadbook_storefront::StorefrontConfig::default()
        };
        let storefront = leadbook_storefront::app(leadbook_storefront::AppState::new(
            &storefront_config,
            store.clone(),
        ));
        let admin = leadbook_admin::app(leadbook_admin::AppState::new(
            leadbook_admin::AdminConfig::default(),
            store.clone(),
        ));

        let storefront_addr = serve(storefront).await;
        let admin_addr = serve(admin).await;

        Self {
            storefront_url: format!("http://{storefront_addr}"),
            admin_url: format!("http://{admin_addr}"),
            store,
            data_path,
            _data_dir: data_dir,
        }
    }

    #[must_use]
    pub fn storefront(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    #[must_use]
    pub fn admin(&self, path: &str) -> String {
        format!("{}{path}", self.admin_url)
    }

    /// A browser-like client: keeps cookies and follows redirects.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn browser() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("build HTTP client")
    }

    /// Log `client` into the admin console as the seeded admin and return
    /// the landing page.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn admin_login(&self, client: &reqwest::Client) -> reqwest::Response {
        client
            .post(self.admin("/auth/login"))
            .form(&[("username", "admin"), ("password", "admin123")])
            .send()
            .await
            .expect("admin login request")
    }
}

/// Enquiry form fields for a valid lead.
#[must_use]
pub fn enquiry_form<'a>(name: &'a str, email: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("name", name),
        ("email", email),
        ("phone", "9876543210"),
        ("curriculum", "CBSE"),
        ("grade", "5"),
        ("student_confirm", "on"),
    ]
}

/// The hidden `code_sent_to` value a rendered enquiry page carries, which a
/// browser posts back with the form.
#[must_use]
pub fn code_sent_to(page: &str) -> Option<String> {
    const MARKER: &str = r#"name="code_sent_to" value=""#;
    let start = page.find(MARKER)? + MARKER.len();
    let len = page.get(start..)?.find('"')?;
    page.get(start..start + len).map(str::to_owned)
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}
