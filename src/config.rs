use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;
use url::Url;

use crate::error::{Result, ShikiError};

/// OAuth application registered with Shikimori; overridable via config file
/// or SHIKI_CLIENT_ID / SHIKI_CLIENT_SECRET.
const DEFAULT_CLIENT_ID: &str =
    "bce7ad35b631293ff006be882496b29171792c8839b5094115268da7a97ca34c";
const DEFAULT_CLIENT_SECRET: &str =
    "811459eada36b14ff0cf0cc353f8162e72a7d6e6c7930b647a5c587d1beffe68";

#[derive(Deserialize, Default)]
pub struct Config {
    pub endpoint: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Ok(Config::default()),
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| ShikiError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents, &config_path)
    }

    fn parse(contents: &str, path: &std::path::Path) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ShikiError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "shiki").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Endpoint with explicit flag/env value taking precedence over the
    /// config file. Validated as a URL before any network call.
    pub fn resolve_endpoint(&self, explicit: Option<&str>) -> Result<String> {
        let endpoint = explicit
            .map(String::from)
            .or_else(|| self.endpoint.clone())
            .ok_or(ShikiError::MissingEndpoint)?;

        Url::parse(&endpoint).map_err(|_| ShikiError::InvalidEndpoint(endpoint.clone()))?;
        Ok(endpoint)
    }

    pub fn client_id(&self) -> String {
        std::env::var("SHIKI_CLIENT_ID")
            .ok()
            .or_else(|| self.client_id.clone())
            .unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string())
    }

    pub fn client_secret(&self) -> String {
        std::env::var("SHIKI_CLIENT_SECRET")
            .ok()
            .or_else(|| self.client_secret.clone())
            .unwrap_or_else(|| DEFAULT_CLIENT_SECRET.to_string())
    }
}
