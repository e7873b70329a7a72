#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use chrono::Utc;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::Layer;

use snaplink::application::services::{AccountService, CredentialAuthenticator, LinkService};
use snaplink::domain::entities::{Link, NewLink, NewUser, User};
use snaplink::domain::repositories::{LinkRepository, UserRepository};
use snaplink::error::StoreError;
use snaplink::infrastructure::security::JwtCodec;
use snaplink::routes::build_router;
use snaplink::state::AppState;
use snaplink::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

pub const TEST_SECRET: &[u8] = b"test-signing-secret";
pub const BASE_URL: &str = "http://localhost:3000";

/// Link store backed by a vector. Enforces short code uniqueness on insert
/// like the `urls_short_code_key` constraint does.
#[derive(Default)]
pub struct InMemoryLinkStore {
    links: Mutex<Vec<Link>>,
    /// When set, `exists_by_code` always answers `false`, so collisions are
    /// only caught at insert time.
    blind_existence_check: bool,
}

impl InMemoryLinkStore {
    pub fn blind() -> Self {
        Self {
            links: Mutex::default(),
            blind_existence_check: true,
        }
    }

    pub fn all(&self) -> Vec<Link> {
        self.links.lock().unwrap().clone()
    }

    pub fn get(&self, code: &str) -> Option<Link> {
        self.all().into_iter().find(|l| l.short_code == code)
    }

    /// Stores a link directly, bypassing code allocation.
    pub fn seed(&self, code: &str, url: &str, owner_id: Option<i64>) -> Link {
        let mut links = self.links.lock().unwrap();
        let link = Link::new(
            links.len() as i64 + 1,
            url.to_string(),
            code.to_string(),
            owner_id,
            "127.0.0.1".to_string(),
            0,
            Utc::now(),
        );
        links.push(link.clone());
        link
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkStore {
    async fn exists_by_code(&self, code: &str) -> Result<bool, StoreError> {
        if self.blind_existence_check {
            return Ok(false);
        }
        Ok(self.get(code).is_some())
    }

    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let mut links = self.links.lock().unwrap();
        if links.iter().any(|l| l.short_code == new_link.short_code) {
            return Err(StoreError::DuplicateCode(new_link.short_code));
        }

        let link = Link::new(
            links.len() as i64 + 1,
            new_link.original_url,
            new_link.short_code,
            new_link.owner_id,
            new_link.source_ip,
            0,
            Utc::now(),
        );
        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, StoreError> {
        Ok(self.get(code))
    }

    async fn increment_clicks(&self, code: &str) -> Result<bool, StoreError> {
        let mut links = self.links.lock().unwrap();
        match links.iter_mut().find(|l| l.short_code == code) {
            Some(link) => {
                link.click_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, StoreError> {
        let mut owned: Vec<Link> = self
            .all()
            .into_iter()
            .filter(|l| l.owner_id == Some(owner_id))
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.links.lock().unwrap().len() as i64)
    }

    async fn total_clicks(&self) -> Result<i64, StoreError> {
        Ok(self.all().iter().map(|l| l.click_count).sum())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.username == new_user.username || u.email == new_user.email)
        {
            return Err(StoreError::DuplicateIdentity);
        }

        let user = User {
            id: users.len() as i64 + 1,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.users.lock().unwrap().len() as i64)
    }
}

/// Link store whose every call fails as if the database were down.
pub struct UnavailableLinkStore;

fn unavailable() -> StoreError {
    StoreError::Unavailable(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl LinkRepository for UnavailableLinkStore {
    async fn exists_by_code(&self, _code: &str) -> Result<bool, StoreError> {
        Err(unavailable())
    }
    async fn insert(&self, _new_link: NewLink) -> Result<Link, StoreError> {
        Err(unavailable())
    }
    async fn find_by_code(&self, _code: &str) -> Result<Option<Link>, StoreError> {
        Err(unavailable())
    }
    async fn increment_clicks(&self, _code: &str) -> Result<bool, StoreError> {
        Err(unavailable())
    }
    async fn list_by_owner(&self, _owner_id: i64) -> Result<Vec<Link>, StoreError> {
        Err(unavailable())
    }
    async fn count(&self) -> Result<i64, StoreError> {
        Err(unavailable())
    }
    async fn total_clicks(&self) -> Result<i64, StoreError> {
        Err(unavailable())
    }
    async fn ping(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
}

/// Yields every code twice in a row (`C00000`, `C00000`, `C00001`, ...),
/// so consecutive requests collide.
#[derive(Default)]
pub struct PairedCodeGenerator {
    calls: AtomicUsize,
}

impl CodeGenerator for PairedCodeGenerator {
    fn generate(&self) -> String {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        format!("C{:05}", n / 2)
    }
}

/// Always yields the same code.
pub struct FixedCodeGenerator(pub &'static str);

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub links: Arc<InMemoryLinkStore>,
    pub users: Arc<InMemoryUserStore>,
}

pub fn create_test_state(
    links: Arc<dyn LinkRepository>,
    users: Arc<dyn UserRepository>,
    generator: Arc<dyn CodeGenerator>,
) -> AppState {
    let codec = Arc::new(JwtCodec::new(TEST_SECRET, 3600));

    AppState {
        link_service: Arc::new(LinkService::new(links, generator, BASE_URL)),
        account_service: Arc::new(AccountService::new(users, codec.clone())),
        authenticator: Arc::new(CredentialAuthenticator::new(codec)),
        behind_proxy: false,
    }
}

pub fn test_app_with(links: InMemoryLinkStore, generator: Arc<dyn CodeGenerator>) -> TestApp {
    let links = Arc::new(links);
    let users = Arc::new(InMemoryUserStore::default());
    let state = create_test_state(links.clone(), users.clone(), generator);

    let app: Router = build_router(state).layer(MockConnectInfoLayer);

    TestApp {
        server: TestServer::new(app).unwrap(),
        links,
        users,
    }
}

pub fn test_app() -> TestApp {
    test_app_with(InMemoryLinkStore::default(), Arc::new(RandomCodeGenerator))
}

/// Signs a credential with the test secret.
pub fn token_for(id: i64, username: &str, email: &str, ttl_seconds: i64) -> String {
    JwtCodec::new(TEST_SECRET, ttl_seconds)
        .sign(&snaplink::domain::entities::Identity {
            id,
            username: username.to_string(),
            email: email.to_string(),
        })
        .unwrap()
}

/// Registers `username` and logs in, returning the issued token.
pub async fn register_and_login(server: &TestServer, username: &str, email: &str) -> String {
    server
        .post("/register")
        .json(&json!({ "username": username, "email": email, "password": "secret1" }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post("/login")
        .json(&json!({ "email": email, "password": "secret1" }))
        .await;
    response.assert_status_ok();

    response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string()
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
