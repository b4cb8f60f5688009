//! # prompt-board
//!
//! The entry point that assembles the application from its adapters.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use api_adapters::AppState;
use auth_adapters::HmacNoticeSigner;
use configs::Settings;
use domains::PromptRepository;
use secrecy::ExposeSecret;
use services::PromptService;
use tower_http::services::ServeDir;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the logger so RUST_LOG is honoured
    configs::load_dotenv();
    init_tracing();

    let settings = Settings::from_env().context("loading settings")?;

    if settings.uses_default_secret() {
        tracing::warn!("SECRET_KEY is not set; notices are signed with the built-in default key");
    }
    if settings.address_policy.trusts_forwarding_headers() {
        tracing::warn!(
            "ADDRESS_POLICY=proxy-header: client addresses come from X-Forwarded-For. \
             Only run this way behind a reverse proxy that overwrites that header."
        );
    }
    if settings.admins.is_empty() {
        tracing::info!("no admin addresses configured");
    }

    // 1. Storage
    let repo = open_repository(&settings.database_url).await?;

    // 2. Notice signing
    let signer = HmacNoticeSigner::new(settings.secret_key.expose_secret().as_bytes())?;

    // 3. Shared state
    let state = AppState {
        prompts: Arc::new(PromptService::new(repo, settings.admins.clone())),
        signer: Arc::new(signer),
        address_policy: settings.address_policy,
    };

    let app = api_adapters::middleware::request_tracing(
        api_adapters::router(state)
            .nest_service("/static", ServeDir::new(&settings.static_dir)),
    );

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.bind_addr))?;

    tracing::info!(
        address_policy = %settings.address_policy,
        admins = settings.admins.len(),
        "prompt-board listening on http://{}",
        settings.bind_addr
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// `RUST_LOG` filters (default `info`); `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

#[cfg(feature = "db-sqlite")]
async fn open_repository(url: &str) -> anyhow::Result<Arc<dyn PromptRepository>> {
    let repo = storage_adapters::SqlitePromptRepository::new(url)
        .await
        .context("Failed to init SQLite")?;
    tracing::info!(database_url = %url, "using sqlite storage");
    Ok(Arc::new(repo))
}

#[cfg(not(feature = "db-sqlite"))]
async fn open_repository(url: &str) -> anyhow::Result<Arc<dyn PromptRepository>> {
    tracing::warn!(database_url = %url, "built without db-sqlite; prompts are kept in memory only");
    Ok(Arc::new(storage_adapters::MemoryPromptRepository::new()))
}
