//! Shared harness for the end-to-end tests: the full router over an in-memory
//! SQLite store, driven with `tower::ServiceExt::oneshot`.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use api_adapters::AppState;
use auth_adapters::HmacNoticeSigner;
use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use domains::{AddressPolicy, AdminSet, NoticeSigner, PromptRepository};
use services::PromptService;
use storage_adapters::SqlitePromptRepository;
use tower::ServiceExt;

pub const ADMIN_IP: &str = "127.0.0.1";
pub const SECRET: &[u8] = b"integration-secret";

pub struct TestApp {
    router: Router,
    pub repo: Arc<dyn PromptRepository>,
    pub signer: Arc<HmacNoticeSigner>,
}

/// What a test needs from a response.
pub struct Outcome {
    pub status: StatusCode,
    pub location: Option<String>,
    /// Raw `pb_flash` token, if the response set one
    pub flash_token: Option<String>,
    pub body: String,
}

impl TestApp {
    pub async fn new(policy: AddressPolicy) -> Self {
        let repo: Arc<dyn PromptRepository> = Arc::new(
            SqlitePromptRepository::new("sqlite::memory:")
                .await
                .expect("in-memory sqlite"),
        );
        let signer = Arc::new(HmacNoticeSigner::new(SECRET).expect("signer"));
        let state = AppState {
            prompts: Arc::new(PromptService::new(repo.clone(), AdminSet::from_csv(ADMIN_IP))),
            signer: signer.clone(),
            address_policy: policy,
        };
        Self {
            router: api_adapters::router(state),
            repo,
            signer,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Outcome {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        Outcome::read(response).await
    }

    pub async fn get(&self, path: &str, ip: &str) -> Outcome {
        self.send(request("GET", path, ip, Body::empty())).await
    }

    pub async fn post_form(&self, path: &str, ip: &str, form: &str) -> Outcome {
        let mut req = request("POST", path, ip, Body::from(form.to_string()));
        req.headers_mut().insert(
            CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().expect("header"),
        );
        self.send(req).await
    }

    /// Loads the list page presenting a flash token the way a browser would.
    pub async fn get_with_flash(&self, ip: &str, token: &str) -> Outcome {
        let mut req = request("GET", "/", ip, Body::empty());
        req.headers_mut().insert(
            COOKIE,
            format!("pb_flash={token}").parse().expect("header"),
        );
        self.send(req).await
    }

    pub fn sign_notice(&self, message: &str) -> String {
        self.signer.sign(message)
    }

    /// The verified notice a redirect queued, if any.
    pub fn notice(&self, outcome: &Outcome) -> Option<String> {
        outcome
            .flash_token
            .as_deref()
            .and_then(|token| self.signer.verify(token))
    }
}

/// A request arriving from `ip` as the transport peer.
pub fn request(method: &str, path: &str, ip: &str, body: Body) -> Request<Body> {
    let mut req = Request::builder()
        .method(method)
        .uri(path)
        .body(body)
        .expect("request");
    let peer: IpAddr = ip.parse().expect("test ip");
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::new(peer, 40_000)));
    req
}

impl Outcome {
    async fn read(response: Response) -> Self {
        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let flash_token = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.strip_prefix("pb_flash="))
            .filter_map(|rest| rest.split(';').next())
            .find(|token| !token.is_empty())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        Self {
            status,
            location,
            flash_token,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub fn is_redirect_home(&self) -> bool {
        self.status == StatusCode::SEE_OTHER && self.location.as_deref() == Some("/")
    }
}
