use std::net::SocketAddr;
use std::sync::Arc;

use hms_core::error::AppError;
use hms_core::observability::logging::init_tracing;

use hospital_service::config::HmsConfig;
use hospital_service::services::{EmailProvider, MockEmailService, SmtpEmailService};
use hospital_service::{build_router, build_state};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = HmsConfig::from_env()?;
    init_tracing(&config.log_level);

    let email: Arc<dyn EmailProvider> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpEmailService::new(
            smtp.host.clone(),
            smtp.port,
            smtp.username.clone(),
            smtp.password.clone(),
            smtp.from_address.clone(),
        )),
        None => {
            tracing::warn!("SMTP not configured, using mock email provider");
            Arc::new(MockEmailService)
        }
    };

    let port = config.port;
    let state = build_state(config, email);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "hospital-service listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
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
