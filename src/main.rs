use axum::{
    routing::{get, post},
    Router,
};
use kanban_backend::{config::Config, database::pool::create_pool, routes, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let pool = create_pool(&config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool, &config)?;
    info!(
        timeout_secs = config.webhook_timeout_secs,
        "Webhook delivery configured"
    );

    let webhook_api = Router::new()
        .route(
            "/api/workspaces/:workspace_id/webhooks",
            get(routes::webhook::list_webhooks).post(routes::webhook::create_webhook),
        )
        .route(
            "/api/workspaces/:workspace_id/webhooks/:webhook_id",
            get(routes::webhook::get_webhook)
                .patch(routes::webhook::update_webhook)
                .delete(routes::webhook::delete_webhook),
        )
        .route(
            "/api/workspaces/:workspace_id/webhooks/:webhook_id/test",
            post(routes::webhook::test_webhook),
        )
        .route(
            "/api/workspaces/:workspace_id/events",
            post(routes::card_events::publish_card_event),
        );

    let activity_api = Router::new().route(
        "/api/cards/:card_id/activities",
        get(routes::activity::list_card_activities),
    );

    let app = Router::new()
        .route("/health", get(routes::health::health))
        .merge(webhook_api)
        .merge(activity_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
