use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShikiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL errors: {}", messages.join(", "))]
    GraphQL { messages: Vec<String> },

    #[error("empty response from API")]
    EmptyResponse,

    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(
        "no GraphQL endpoint. Pass --endpoint, set SHIKI_GRAPHQL_ENDPOINT, or add endpoint to the config file"
    )]
    MissingEndpoint,

    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error(
        "no credentials. Pass --access-token (SHIKI_ACCESS_TOKEN) or --auth-code (SHIKI_AUTH_CODE)"
    )]
    MissingCredentials,

    #[error("no refresh token. Pass --refresh-token or set SHIKI_REFRESH_TOKEN")]
    MissingRefreshToken,

    #[error("token endpoint returned success but the payload is missing {0}")]
    IncompleteTokenResponse(&'static str),

    #[error("failed to read query file {path}: {source}")]
    QueryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ShikiError>;
