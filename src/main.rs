use anyhow::Result;
use inboxpilot::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
