//! HTTP interface over [`LedgerService`].

mod analytics;
pub mod dto;
pub mod error;
mod extract;
mod sellers;
mod transactions;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    middleware,
    routing::get,
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::LedgerService;

use self::error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LedgerService>,
}

impl AppState {
    pub fn new(service: LedgerService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/seller",
            get(sellers::list_sellers)
                .post(sellers::create_seller)
                .put(sellers::replace_seller)
                .patch(sellers::patch_seller),
        )
        .route("/seller/top-seller", get(analytics::top_seller))
        .route(
            "/seller/sellers-with-income-less-threshold",
            get(analytics::sellers_below_threshold),
        )
        .route(
            "/seller/{id}",
            get(sellers::get_seller).delete(sellers::delete_seller),
        )
        .route(
            "/seller/{id}/transaction",
            get(sellers::list_seller_transactions),
        )
        .route("/seller/{id}/best-period", get(analytics::best_period))
        .route(
            "/transaction",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route("/transaction/{id}", get(transactions::get_transaction));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .method_not_allowed_fallback(error::method_not_allowed)
        .fallback(error::route_not_found)
        .layer(middleware::from_fn(error::describe_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.service.ping().await?;
    Ok(Json(json!({ "status": "ok" })))
}

/// Serve the API on `addr` until Ctrl-C.
pub async fn serve(service: LedgerService, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "seller-ledger listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
