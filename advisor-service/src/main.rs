use advisor_service::config::AdvisorConfig;
use advisor_service::services::metrics::init_metrics;
use advisor_service::startup::Application;
use service_core::observability::init_tracing;
use tokio::signal;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = AdvisorConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        &config.observability.service_name,
        &config.observability.log_level,
        config.observability.otlp_endpoint.as_deref(),
    );
    init_metrics();

    if !config.openai.is_configured() {
        tracing::warn!("OpenAI API key not found in environment variables");
    }

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_with_shutdown(shutdown_signal()).await
}
