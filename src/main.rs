use anyhow::Result;
use calbridge::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
