use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod auth;
pub mod mcp;
pub mod serve;

use crate::core::{AppConfig, logging};

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "3000")]
        port: String,

        /// Also answer tool server requests on stdin/stdout
        #[arg(long, action, default_value = "false")]
        mcp: bool,

        /// Open the consent page in a browser once listening
        #[arg(long, action, default_value = "false")]
        open_browser: bool,
    },
    /// Run the tool server over stdin/stdout
    Mcp {},
    /// Perform OAuth authentication and save the credential
    Auth {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    dotenvy::dotenv().ok();
    logging::init();

    let Some(command) = args.command else {
        return Ok(());
    };
    let config = AppConfig::from_env()?;

    // Handle each sub command
    match command {
        Command::Serve {
            host,
            port,
            mcp,
            open_browser,
        } => {
            serve::run(config, host, port, mcp, open_browser).await?;
        }
        Command::Mcp {} => {
            mcp::run(config).await?;
        }
        Command::Auth {} => {
            auth::run(config).await?;
        }
    }

    Ok(())
}
