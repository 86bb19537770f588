use std::net::SocketAddr;

use axum::{http::Method, routing::get, Router};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::{auth, ef};

pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let mut router = Router::new()
        .merge(auth::router())
        .merge(ef::router())
        .route("/health", get(|| async { "ok" }));

    // Version endpoint only outside production-like environments.
    if state.config.environment.is_debug() {
        let version = state.config.app_version.clone();
        router = router.route(
            "/version",
            get(move || {
                let version = version.clone();
                async move { version }
            }),
        );
    }

    router
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// CORS per configuration: explicit origin list, or a regex predicate when
/// CORS_ORIGINS_REGEX is set. `*` in CORS_HEADERS mirrors the request headers
/// because wildcard headers cannot be combined with credentials.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = match &config.cors_origins_regex {
        Some(re) => {
            let re = re.clone();
            AllowOrigin::predicate(move |origin, _| {
                origin.to_str().map(|o| re.is_match(o)).unwrap_or(false)
            })
        }
        None => AllowOrigin::list(
            config
                .cors_origins
                .iter()
                .filter_map(|o| o.parse().ok()),
        ),
    };

    let headers = if config.cors_headers.iter().any(|h| h == "*") {
        AllowHeaders::mirror_request()
    } else {
        AllowHeaders::list(
            config
                .cors_headers
                .iter()
                .filter_map(|h| h.parse().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_headers(headers)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_credentials(true)
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
