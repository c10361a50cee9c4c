//! Postgate server: the posts API behind bearer-token authorization.

mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use authz_resolver::RateLimiter;
use axum::Router;
use axum::http::{HeaderName, Request, StatusCode};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, ServerConfig};

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Parser)]
#[command(name = "postgate-server", version, about)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter override, e.g. `debug` or `info,authz_resolver=trace`.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = AppConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        cfg.logging.level = level;
    }
    logging::init(&cfg.logging)?;

    run(cfg).await
}

async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let revocations = authn_resolver::build_revocation_list(&cfg.authn);
    let authn = authn_resolver::build_authenticator(&cfg.authn, revocations)
        .context("failed to initialize authn_resolver")?;

    let rate_limiter = Arc::new(RateLimiter::new());
    let authz = authz_resolver::build_pipeline(&cfg.authz, authn, Arc::clone(&rate_limiter))
        .context("failed to initialize authz_resolver")?;

    let router = with_http_layers(posts::build_router(&cfg.posts, authz), &cfg.server);

    let cancel = CancellationToken::new();
    let sweeper = tokio::spawn(sweep_rate_limits(
        rate_limiter,
        cfg.authz.create_rate_limit.window(),
        cfg.authz.create_rate_limit.sweep_interval(),
        cancel.clone(),
    ));

    let listener = tokio::net::TcpListener::bind(cfg.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind_addr))?;
    tracing::info!("HTTP server bound on {}", cfg.server.bind_addr);

    let shutdown = {
        let cancel = cancel.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("HTTP server shutting down gracefully");
            cancel.cancel();
        }
    };

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await;
    cancel.cancel();
    sweeper.await?;
    served.context("HTTP server failed")
}

fn with_http_layers(router: Router, cfg: &ServerConfig) -> Router {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            Duration::from_secs(cfg.request_timeout_secs),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<axum::body::Body>| {
                let rid = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    request_id = %rid,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
}

/// Periodically drop expired rate-limit windows until cancelled.
async fn sweep_rate_limits(
    limiter: Arc<RateLimiter>,
    window: Duration,
    every: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let removed = limiter.purge_expired(window);
                if removed > 0 {
                    tracing::debug!(
                        removed,
                        remaining = limiter.len(),
                        "Purged rate-limit windows"
                    );
                }
            }
        }
    }
}
