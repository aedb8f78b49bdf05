use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use relay_bridge::host::{InMemoryHost, SubmitSequence};
use relay_bridge::server::{BridgeState, router};

#[derive(Parser)]
#[command(
    name = "relay-bridge",
    about = "HTTP control plane over terminal panes"
)]
struct Args {
    /// Port to listen on (loopback only).
    #[arg(long, default_value_t = relay_bridge::DEFAULT_PORT)]
    port: u16,

    /// Submit terminator for /chat: cr, lf, or resend.
    #[arg(long, default_value = "cr")]
    submit: String,

    /// Delay before the submit terminator fires, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    submit_delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_bridge=info".into()),
        )
        .init();

    let args = Args::parse();
    let submit: SubmitSequence = args.submit.parse().map_err(anyhow::Error::msg)?;

    let state = Arc::new(BridgeState::new(
        Arc::new(InMemoryHost::new()),
        submit,
        Duration::from_millis(args.submit_delay_ms),
    ));
    let app = router(state);

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind bridge listener on {addr}"))?;

    tracing::info!("relay-bridge listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
