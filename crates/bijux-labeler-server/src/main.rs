#![forbid(unsafe_code)]

use bijux_labeler_model::ConflictPolicy;
use bijux_labeler_server::{build_router, parse_origin_list, AppState, ServerConfig};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> Result<bool, String> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(v) => match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Ok(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Ok(false),
            other => Err(format!("{name}: expected a boolean, got `{other}`")),
        },
    }
}

fn env_usize(name: &str, default: usize) -> Result<usize, String> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(v) => v
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("{name}: invalid number `{v}`: {e}")),
    }
}

fn config_from_env() -> Result<ServerConfig, String> {
    let defaults = ServerConfig::default();
    let conflict_policy = match env::var("LABELER_CONFLICT_POLICY") {
        Err(_) => defaults.conflict_policy,
        Ok(v) => ConflictPolicy::from_str(&v).map_err(|e| format!("LABELER_CONFLICT_POLICY: {e}"))?,
    };
    let cors_allowed_origins = match env::var("LABELER_CORS_ORIGINS") {
        Err(_) => defaults.cors_allowed_origins,
        Ok(v) => parse_origin_list(&v),
    };
    Ok(ServerConfig {
        bind_addr: env::var("LABELER_BIND").unwrap_or(defaults.bind_addr),
        data_root: env::var("LABELER_DATA_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_root),
        cors_allowed_origins,
        max_body_bytes: env_usize("LABELER_MAX_BODY_BYTES", defaults.max_body_bytes)?,
        max_upload_files: env_usize("LABELER_MAX_UPLOAD_FILES", defaults.max_upload_files)?,
        conflict_policy,
    })
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("signal registration failed, falling back to ctrl-c: {e}");
            }
        }
    }
    let _ = tokio::signal::ctrl_c().await;
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing(env_bool("LABELER_LOG_JSON", true)?);

    let config = config_from_env()?;
    config.validate()?;
    info!(
        config = %serde_json::to_string(&config).unwrap_or_default(),
        "effective configuration"
    );

    let bind_addr = config.bind_addr.clone();
    let state = AppState::open(config)
        .map_err(|e| format!("cannot open data root: {e}"))?;
    let app = build_router(state);

    let addr: std::net::SocketAddr = bind_addr
        .parse()
        .map_err(|e| format!("invalid bind addr {bind_addr}: {e}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("bind failed: {e}"))?;
    info!("labeler-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))?;
    info!("labeler-server stopped");
    Ok(())
}
