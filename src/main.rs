mod cli;
mod client;
mod config;
mod error;
mod oauth;
mod output;
mod progress;

use std::error::Error;

use clap::Parser;
use log::{info, warn};

use cli::Cli;
use client::ShikiClient;
use config::Config;
use error::{Result, ShikiError};
use oauth::OAuthClient;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let verbose = cli.verbose;
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");

        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref())?;
    let access_token = resolve_access_token(&cli, &config).await?;

    let client = ShikiClient::new(endpoint, access_token);

    let query = std::fs::read_to_string(&cli.query_file).map_err(|e| ShikiError::QueryRead {
        path: cli.query_file.clone(),
        source: e,
    })?;
    info!("query loaded from {}", cli.query_file.display());

    let spinner = progress::create_spinner("Fetching pages...", cli.quiet);
    let fetch = client
        .execute_paginated(&query, None, cli.max_pages)
        .await;
    progress::finish_spinner(
        spinner,
        &format!("Fetched {} entities", fetch.entities.len()),
    );

    match fetch.aborted {
        // Nothing accumulated and the loop failed: surface the failure.
        Some(err) if fetch.entities.is_empty() => return Err(err),
        Some(err) => warn!(
            "fetch aborted after {} page(s), writing partial results: {err}",
            fetch.pages_fetched
        ),
        None => {}
    }

    info!("you have parsed {} entities", fetch.entities.len());
    output::write_entities(&fetch.entities, cli.response_file.as_deref())?;

    Ok(())
}

/// Decide how the bearer token is obtained: use the provided access token,
/// refresh it first when asked to, or mint a fresh pair from an
/// authorization code when no token was given at all.
async fn resolve_access_token(cli: &Cli, config: &Config) -> Result<String> {
    match &cli.access_token {
        None => {
            let auth_code = cli
                .auth_code
                .as_deref()
                .ok_or(ShikiError::MissingCredentials)?;

            info!("access token not provided, exchanging authorization code");
            let oauth = OAuthClient::new(config.client_id(), config.client_secret());
            let pair = oauth.exchange_code(auth_code).await?.into_pair()?;
            info!("access and refresh tokens retrieved");
            Ok(pair.access_token)
        }
        Some(_) if cli.refresh_if_expired => {
            let refresh_token = cli
                .refresh_token
                .as_deref()
                .ok_or(ShikiError::MissingRefreshToken)?;

            info!("refreshing access token");
            let oauth = OAuthClient::new(config.client_id(), config.client_secret());
            let pair = oauth.refresh(refresh_token).await?.into_pair()?;
            info!("access token refreshed");
            Ok(pair.access_token)
        }
        Some(token) => Ok(token.clone()),
    }
}
