use std::io::{self, Write};

use anyhow::{Result, anyhow};

use crate::core::AppConfig;
use crate::credentials::{CredentialStore, FileCredentialStore};
use crate::google::GoogleOAuth;

/// Interactive consent for headless setups: print the URL, read back the
/// code and save the credential where `serve` and `mcp` will find it.
pub async fn run(config: AppConfig) -> Result<()> {
    let path = config
        .credentials_path
        .clone()
        .ok_or_else(|| anyhow!("Set CALBRIDGE_CREDENTIALS_PATH to save the credential"))?;

    let oauth = GoogleOAuth::new(&config);
    let auth_url = oauth.authorization_url();
    println!(
        "\nPlease open the following URL in your browser and authorize access:\n\n{}\n",
        auth_url
    );
    if let Err(e) = webbrowser::open(&auth_url) {
        tracing::debug!("Could not open a browser: {}", e);
    }

    print!("Paste the authorization code here: ");
    io::stdout().flush()?;
    let mut code = String::new();
    io::stdin().read_line(&mut code)?;
    let code = code.trim();
    if code.is_empty() {
        return Err(anyhow!("No authorization code entered"));
    }

    let credential = oauth.exchange_code_for_token(code).await?;
    let store = FileCredentialStore::new(&path);
    store.set(credential).await?;
    println!("Credential saved to {}", store.path().display());

    Ok(())
}
