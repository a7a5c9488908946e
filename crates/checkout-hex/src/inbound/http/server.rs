use axum::{
    extract::{Path, State},
    routing::{get, post},
    serve, Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::totals_information::GuestTotalsInformationManagement;
use crate::errors::AppError;
use checkout_types::domain::quote::QuoteId;
use checkout_types::domain::totals::{TotalsInformation, TotalsSnapshot};
use checkout_types::ports::cart_repository::{CartRepository, CartTotalRepository};
use checkout_types::ports::quote_id_mask::QuoteIdMaskRepository;

/// Totals estimate for customer carts and, through masked ids, guest carts.
pub type TotalsApi<R> = GuestTotalsInformationManagement<R, R, R>;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

#[derive(Clone)]
pub struct HttpServer<R>
where
    R: CartRepository + CartTotalRepository + QuoteIdMaskRepository,
{
    pub service: Arc<TotalsApi<R>>,
    pub config: HttpServerConfig,
}

impl<R> HttpServer<R>
where
    R: CartRepository + CartTotalRepository + QuoteIdMaskRepository,
{
    pub async fn new(service: TotalsApi<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        Router::new()
            .route("/health", get(health))
            .route(
                "/carts/{cart_id}/totals-information",
                post(estimate_totals::<R>),
            )
            .route(
                "/guest-carts/{masked_id}/totals-information",
                post(estimate_guest_totals::<R>),
            )
            .layer(trace_layer)
            .with_state(self.service.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

async fn estimate_totals<R>(
    State(service): State<Arc<TotalsApi<R>>>,
    Path(cart_id): Path<String>,
    Json(payload): Json<TotalsInformation>,
) -> Result<Json<TotalsSnapshot>, AppError>
where
    R: CartRepository + CartTotalRepository + QuoteIdMaskRepository,
{
    let cart_id = cart_id
        .parse::<u64>()
        .map(QuoteId)
        .map_err(|e| AppError::BadRequest(format!("invalid cart id {cart_id:?}: {e}")))?;
    let totals = service.inner().calculate(cart_id, payload).await?;
    Ok(Json(totals))
}

async fn estimate_guest_totals<R>(
    State(service): State<Arc<TotalsApi<R>>>,
    Path(masked_id): Path<String>,
    Json(payload): Json<TotalsInformation>,
) -> Result<Json<TotalsSnapshot>, AppError>
where
    R: CartRepository + CartTotalRepository + QuoteIdMaskRepository,
{
    let totals = service.calculate(&masked_id, payload).await?;
    Ok(Json(totals))
}
