//! Schooldesk server entry point.

use std::sync::Arc;

use axum::Router;
use schooldesk_api::{AppState, router as api_router};
use schooldesk_common::Config;
use schooldesk_core::{SeedOptions, SeedService};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schooldesk=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting schooldesk server...");

    let config = Config::load()?;

    let db = Arc::new(schooldesk_db::init(&config).await?);
    info!("Connected to database");

    info!("Running database migrations...");
    schooldesk_db::migrate(&db).await?;
    info!("Migrations completed");

    if config.seed.enabled {
        let options = SeedOptions::from(&config.seed);
        info!(
            students = options.students,
            staff = options.staff,
            clear = options.clear,
            "Seeding sample data..."
        );
        let report = SeedService::new(Arc::clone(&db)).run(&options).await?;
        info!(
            grades = report.grades,
            students = report.students,
            staff = report.staff,
            notifications = report.notifications,
            events = report.events,
            activities = report.activities,
            "Seeding completed"
        );
    }

    let state = AppState::new(db);

    let app = Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
