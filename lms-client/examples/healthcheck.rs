//! Backend connectivity check
//!
//! Reads `LMS_BACKEND_URL` / `LMS_ANON_KEY` from the environment (or a
//! `.env` file) and probes the auth and table capabilities.
//!
//! ```sh
//! cargo run --example healthcheck
//! ```

use anyhow::Result;
use lms_client::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ClientConfig::from_env()?;
    let client = config.build_client()?;

    let report = lms_client::health::run(&client).await;
    println!("session probe: {}", if report.session_ok { "ok" } else { "failed" });
    println!("table probe:   {}", if report.db_ok { "ok" } else { "failed" });
    for error in &report.errors {
        println!("  - {error}");
    }

    if report.ok() {
        println!("backend reachable");
    } else {
        std::process::exit(1);
    }
    Ok(())
}
