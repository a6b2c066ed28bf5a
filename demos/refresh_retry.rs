//! Token refresh demo.
//!
//! Sends a few requests with a possibly expired access token. If Salesforce
//! answers 401 the client refreshes the token, retries, and saves the new
//! token to `~/.restforce/tokens/demo.json`. The next run starts from the
//! saved token.
//!
//! Required environment variables:
//! - SF_INSTANCE_URL
//! - SF_ACCESS_TOKEN
//! - SF_REFRESH_TOKEN
//! - SF_CONSUMER_KEY
//!
//! Optional:
//! - SF_CONSUMER_SECRET
//! - SF_LOGIN_URL (defaults to https://login.salesforce.com)
//! - SF_IDENTITY_URL (enables the user info call)
//!
//! Run with: RUST_LOG=restforce_rest=debug cargo run --example refresh_retry

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use restforce::{
    AccessToken, FileTokenStorage, OAuthClient, OAuthConfig, ReqwestTransport, RestforceClient,
    SalesforceRestClient, TokenStorage,
};

const STORAGE_KEY: &str = "demo";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Restforce Token Refresh Demo ===\n");

    let storage = FileTokenStorage::new()?;
    let token = match storage.load(STORAGE_KEY)? {
        Some(token) => {
            println!("✓ Using saved token for {}", token.instance_url());
            token
        }
        None => token_from_env()?,
    };

    let mut oauth = OAuthConfig::new(env("SF_CONSUMER_KEY")?);
    if let Ok(secret) = std::env::var("SF_CONSUMER_SECRET") {
        oauth = oauth.with_secret(secret);
    }
    if let Ok(login_url) = std::env::var("SF_LOGIN_URL") {
        oauth = oauth.with_login_url(login_url);
    }

    let mut builder = SalesforceRestClient::builder(
        ReqwestTransport::default_client()?,
        OAuthClient::new(oauth),
        token,
    )
    .notifier(storage.notifier(STORAGE_KEY));
    if let Ok(identity_url) = std::env::var("SF_IDENTITY_URL") {
        builder = builder.resource_owner_url(identity_url);
    }
    let restforce = RestforceClient::new(builder.build()?);

    let limits = restforce.limits().await.context("limits request failed")?;
    println!(
        "✓ Daily API requests remaining: {}",
        limits["DailyApiRequests"]["Remaining"]
    );

    let accounts = restforce
        .query::<serde_json::Value>("SELECT Id, Name FROM Account ORDER BY CreatedDate DESC LIMIT 5")
        .await?;
    println!("✓ {} accounts, showing {}", accounts.total_size, accounts.records.len());
    for account in &accounts.records {
        println!("  - {} {}", account["Id"], account["Name"]);
    }

    if !restforce.inner().resource_owner_url().is_empty() {
        let user = restforce.user_info().await?;
        println!("✓ Signed in as {}", user["username"]);
    }

    let held = restforce.inner().access_token().await;
    println!("\nInstance in use: {}", held.instance_url());

    Ok(())
}

fn token_from_env() -> anyhow::Result<AccessToken> {
    Ok(AccessToken::new(
        env("SF_ACCESS_TOKEN")?,
        env("SF_INSTANCE_URL")?,
        env("SF_REFRESH_TOKEN")?,
        "",
    ))
}

fn env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{} is not set", name))
}
