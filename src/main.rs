//! WeCloud Storefront HTTP server.

use std::sync::Arc;

use axum::Router;
use http::HeaderValue;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wecloud_storefront::adapters::google::{
    GoogleDirectoryConfig, GoogleDirectoryProvisioner, ServiceAccountKey,
};
use wecloud_storefront::adapters::http::storefront::{storefront_router, StorefrontAppState};
use wecloud_storefront::adapters::postgres::{
    PostgresAccountRepository, PostgresPaymentRepository, PostgresPurchaseLedger,
};
use wecloud_storefront::adapters::razorpay::{RazorpayConfig, RazorpayGateway};
use wecloud_storefront::config::{AppConfig, ServerConfig, ServiceAccountKeySource};
use wecloud_storefront::domain::storefront::{
    PasswordHasher, PaymentSignatureVerifier, PlanCatalog,
};
use wecloud_storefront::ports::AccountRepository;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const UNPROVISIONED_REPORT_LIMIT: u32 = 50;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server);

    tracing::info!(
        environment = ?config.server.environment,
        live_payments = config.payment.is_live_mode(),
        "starting wecloud storefront"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let state = build_state(&config, pool)?;
    report_unprovisioned(state.account_repository.as_ref()).await;
    let app = build_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.json_logs() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_state(config: &AppConfig, pool: PgPool) -> Result<StorefrontAppState, BoxError> {
    let key_secret = config.payment.razorpay_key_secret.expose_secret();
    let gateway = RazorpayGateway::new(
        RazorpayConfig::new(config.payment.razorpay_key_id.clone(), key_secret.clone())
            .with_base_url(config.payment.api_base_url.clone()),
    );

    let key = match config.directory.key_source()? {
        ServiceAccountKeySource::Path(path) => ServiceAccountKey::from_file(path)?,
        ServiceAccountKeySource::Json(json) => ServiceAccountKey::from_json(json)?,
    };
    tracing::info!(client_email = %key.client_email, "loaded directory service account");
    let directory = GoogleDirectoryProvisioner::new(
        GoogleDirectoryConfig::new(
            key,
            config.directory.delegated_admin_email.clone(),
            config.directory.org_unit_root.clone(),
        )
        .with_base_url(config.directory.api_base_url.clone()),
    );

    Ok(StorefrontAppState {
        catalog: Arc::new(PlanCatalog::standard().clone()),
        payment_repository: Arc::new(PostgresPaymentRepository::new(pool.clone())),
        account_repository: Arc::new(PostgresAccountRepository::new(pool.clone())),
        completion_writer: Arc::new(PostgresPurchaseLedger::new(pool)),
        gateway_key_id: gateway.key_id().to_string(),
        payment_gateway: Arc::new(gateway),
        directory: Arc::new(directory),
        signature_verifier: PaymentSignatureVerifier::new(key_secret.clone()),
        password_hasher: PasswordHasher::default(),
    })
}

/// Surfaces accounts whose directory provisioning failed so they can be fixed by hand.
async fn report_unprovisioned(accounts: &dyn AccountRepository) {
    match accounts.list_unprovisioned(UNPROVISIONED_REPORT_LIMIT).await {
        Ok(pending) => {
            for account in &pending {
                tracing::warn!(
                    account_id = %account.id,
                    email = %account.email,
                    plan_id = %account.plan_id,
                    "account is not provisioned in the directory"
                );
            }
        }
        Err(error) => tracing::warn!(%error, "could not list unprovisioned accounts"),
    }
}

fn build_router(state: StorefrontAppState, server: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server));

    storefront_router().with_state(state).layer(middleware)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() && !server.is_production() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await
}

/// Resolves when `signal` fires. A signal listener that fails never resolves,
/// so the server keeps running.
async fn wait_for_signal<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(error) = signal.await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
