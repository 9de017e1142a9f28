use anyhow::Result;
use clap::Parser;
use sourceforge_harvest::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries command output (reports, schema JSON, SVG).
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "sourceforge-harvest starting"
    );

    let cli = Cli::parse();
    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("sourceforge-harvest finished"),
        Err(e) => tracing::error!(error = %e, "sourceforge-harvest aborted"),
    }
    result
}
