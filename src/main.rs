//! Thin wrapper that delegates to the interfaces layer.

use venue_matcher::interfaces::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
