//! Service router and server lifecycle.

use std::net::{IpAddr, SocketAddr};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use super::{
    error::ApiError,
    handlers::{health_handler, info_handler, sanitize_handler, sanitize_raw_handler},
    types::ServiceState,
};
use crate::core::config::{DocnormConfig, ServiceConfig};
use crate::core::pipeline::NormalizationPipeline;
use crate::{DocnormError, Result};

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        tracing::warn!(
            "CORS allows all origins. Set DOCNORM_CORS_ORIGINS or service.cors_origins to restrict it."
        );
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    tracing::info!("CORS configured with {} explicit allowed origin(s)", parsed.len());
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the service router.
///
/// Public so the routes can be nested into a larger application.
///
/// # Examples
///
/// ```rust
/// use docnorm::core::config::DocnormConfig;
/// use docnorm::core::pipeline::NormalizationPipeline;
/// use docnorm::service::{ServiceState, create_router};
///
/// # fn main() -> docnorm::Result<()> {
/// let config = DocnormConfig::default();
/// let pipeline = NormalizationPipeline::with_defaults(&config)?;
/// let state = ServiceState::new(pipeline, config.service.max_concurrent_requests);
/// let app = axum::Router::new().nest("/docnorm", create_router(state, &config.service));
/// # let _ = app;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: ServiceState, config: &ServiceConfig) -> Router {
    Router::new()
        .route("/v1/sanitize", post(sanitize_handler))
        .route("/v1/sanitize/raw", post(sanitize_raw_handler))
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .layer(DefaultBodyLimit::max(config.max_request_body_bytes))
        .layer(RequestBodyLimitLayer::new(config.max_request_body_bytes))
        .layer(map_response(classify_payload_too_large))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Body-limit rejections from the transport layers become `INVALID_ARGUMENT`.
async fn classify_payload_too_large(response: Response) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }
    tracing::warn!("rejected request body above the transport limit");
    ApiError::invalid_argument("request body exceeds the configured size limit").into_response()
}

/// Start the service with the given configuration and default extractors.
///
/// No embedding backend is attached; use [`serve_with_state`] with
/// [`ServiceState::with_embedding_backend`] to host one.
pub async fn serve(config: DocnormConfig) -> Result<()> {
    config.validate()?;
    let pipeline = NormalizationPipeline::with_defaults(&config)?;
    let state = ServiceState::new(pipeline, config.service.max_concurrent_requests);
    serve_with_state(&config.service, state).await
}

/// Start the service with prepared state.
///
/// Runs until Ctrl-C, then drains in-flight requests and shuts down every extractor
/// and the embedding backend.
pub async fn serve_with_state(config: &ServiceConfig, state: ServiceState) -> Result<()> {
    let ip: IpAddr = config.host.parse().map_err(|e| {
        DocnormError::config_with_source(format!("invalid host address '{}'", config.host), e)
    })?;
    let addr = SocketAddr::new(ip, config.port);

    let app = create_router(state.clone(), config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        workers = state.pool.size(),
        "docnorm service listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down");
    state.shutdown()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
