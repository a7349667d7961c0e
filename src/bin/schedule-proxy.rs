use ff_schedule_api::proxy::{self, API_URL_VAR, ProxyState};
use std::env;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = env::var("FFSCHED_PROXY_BIND")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BIND.to_string());

    // Read again on every request; this is only a heads-up.
    match env::var(API_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => info!("forwarding schedule requests to {url}"),
        _ => warn!("{API_URL_VAR} is not set; requests will fail until it is"),
    }

    let listener = TcpListener::bind(&addr).await?;
    info!("schedule proxy listening on http://{addr}");
    axum::serve(listener, proxy::router(ProxyState::from_env())).await?;

    Ok(())
}
