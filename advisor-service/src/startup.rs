//! Application startup and lifecycle management.

use crate::config::{AdvisorConfig, StoreBackend};
use crate::handlers::{
    advice::financial_advice,
    budgets::{create_budget, delete_budget, list_budgets},
    chat::advisor_chat,
    health::health_check,
    metrics::metrics,
    summary::generate_summary,
    transactions::{create_transaction, list_transactions, transaction_summary},
};
use crate::services::providers::openai::OpenAiProvider;
use crate::services::store::{memory::InMemoryStore, supabase::SupabaseStore};
use crate::services::{AdmissionGate, CompletionProvider, GatedProvider, GatedStore, RowStore};
use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderName, HeaderValue, Method, Request},
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    timeout::handle_timeout_error,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application state.
///
/// The provider and store held here are already behind their admission
/// gates.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AdvisorConfig>,
    pub provider: Arc<dyn CompletionProvider>,
    pub store: Arc<dyn RowStore>,
}

impl AppState {
    /// Wrap the given dependencies in admission gates sized by `config.limits`.
    pub fn new(
        config: AdvisorConfig,
        provider: Arc<dyn CompletionProvider>,
        store: Arc<dyn RowStore>,
    ) -> Self {
        let limits = &config.limits;
        let provider = GatedProvider::new(
            provider,
            AdmissionGate::new(limits.provider_max_in_flight, limits.provider_timeout),
        );
        let store = GatedStore::new(
            store,
            AdmissionGate::new(limits.store_max_in_flight, limits.store_timeout),
        );

        Self {
            config: Arc::new(config),
            provider: Arc::new(provider),
            store: Arc::new(store),
        }
    }

    /// Build the real adapters from configuration.
    pub fn from_config(config: AdvisorConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("advisor-service/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("HTTP client: {}", e)))?;

        let provider: Arc<dyn CompletionProvider> =
            Arc::new(OpenAiProvider::new(&config.openai, client.clone()));
        tracing::info!(
            model = %config.openai.model,
            configured = config.openai.is_configured(),
            "Initialized OpenAI provider"
        );

        let store: Arc<dyn RowStore> = match config.store.backend {
            StoreBackend::Supabase => Arc::new(
                SupabaseStore::new(&config.store, client)
                    .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
            ),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; rows are lost on restart");
                Arc::new(InMemoryStore::new())
            }
        };
        tracing::info!(backend = store.name(), "Initialized row store");

        Ok(Self::new(config, provider, store))
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.config.limits.request_timeout;
    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/summary", post(generate_summary))
        .route("/api/financial-advice", post(financial_advice))
        .route(
            "/api/transactions",
            post(create_transaction).get(list_transactions),
        )
        .route("/api/transactions/summary", get(transaction_summary))
        .route("/api/budgets", post(create_budget).get(list_budgets))
        .route("/api/budgets/:id", delete(delete_budget))
        .route("/api/advisor/chat", post(advisor_chat))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(request_timeout),
        )
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: AdvisorConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config)?;
        Self::with_state(state).await
    }

    /// Bind a listener for an already assembled state (port 0 = random port).
    pub async fn with_state(state: AppState) -> Result<Self, AppError> {
        let addr = format!("{}:{}", state.config.common.host, state.config.common.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Advisor service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}
