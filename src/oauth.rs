//! OAuth2 token flows for the Shikimori API.
//!
//! Two fixed POST form requests against the provider token URL: exchanging an
//! authorization code for a token pair, and refreshing an expired pair. See
//! https://shikimori.one/oauth for the provider side of the flow.

use reqwest::Client;
use serde::Deserialize;

use crate::client::USER_AGENT;
use crate::error::{Result, ShikiError};

const TOKEN_URL: &str = "https://shikimori.one/oauth/token";
const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

pub struct OAuthClient {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

/// Token payload returned by the provider. `access_token` and
/// `refresh_token` are optional here so an incomplete 2xx body maps to a
/// dedicated error instead of a deserialization failure.
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
}

/// Token pair validated to be complete.
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenResponse {
    pub fn into_pair(self) -> Result<TokenPair> {
        let access_token = self
            .access_token
            .ok_or(ShikiError::IncompleteTokenResponse("access_token"))?;
        let refresh_token = self
            .refresh_token
            .ok_or(ShikiError::IncompleteTokenResponse("refresh_token"))?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

impl OAuthClient {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: Client::new(),
            token_url: TOKEN_URL.to_string(),
            client_id,
            client_secret,
        }
    }

    /// Point the helper at a mock token endpoint.
    #[cfg(test)]
    pub fn with_token_url(client_id: String, client_secret: String, token_url: String) -> Self {
        Self {
            http: Client::new(),
            token_url,
            client_id,
            client_secret,
        }
    }

    /// Exchange an authorization code for an access/refresh token pair.
    pub async fn exchange_code(&self, auth_code: &str) -> Result<TokenResponse> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", auth_code),
            ("redirect_uri", REDIRECT_URI),
        ];
        self.request_token(&params).await
    }

    /// Obtain a fresh token pair from a refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        self.request_token(&params).await
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .header("User-Agent", USER_AGENT)
            .form(params)
            .send()
            .await
            .map_err(|e| ShikiError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response body>".to_string());
            return Err(ShikiError::Auth(body));
        }

        response
            .json()
            .await
            .map_err(|e| ShikiError::Auth(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OAuthClient {
        OAuthClient::with_token_url(
            "app-id".to_string(),
            "app-secret".to_string(),
            format!("{}/oauth/token", server.uri()),
        )
    }

    #[tokio::test]
    async fn exchange_code_posts_authorization_code_grant() {
        let server = MockServer::start().await;
        let oauth = client_for(&server);

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=my-code"))
            .and(body_string_contains("client_id=app-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "at-1",
                "refresh_token": "rt-1",
                "token_type": "Bearer",
                "expires_in": 86400
            })))
            .expect(1)
            .mount(&server)
            .await;

        let pair = oauth.exchange_code("my-code").await.unwrap().into_pair().unwrap();
        assert_eq!(pair.access_token, "at-1");
        assert_eq!(pair.refresh_token, "rt-1");
    }

    #[tokio::test]
    async fn refresh_posts_refresh_token_grant() {
        let server = MockServer::start().await;
        let oauth = client_for(&server);

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=rt-old"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "at-2",
                "refresh_token": "rt-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let pair = oauth.refresh("rt-old").await.unwrap().into_pair().unwrap();
        assert_eq!(pair.access_token, "at-2");
        assert_eq!(pair.refresh_token, "rt-2");
    }

    #[tokio::test]
    async fn non_success_status_is_an_auth_error_with_body() {
        let server = MockServer::start().await;
        let oauth = client_for(&server);

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"error":"invalid_grant"}"#),
            )
            .mount(&server)
            .await;

        match oauth.exchange_code("stale").await {
            Err(ShikiError::Auth(body)) => assert!(body.contains("invalid_grant")),
            other => panic!("expected Auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn incomplete_token_payload_is_rejected() {
        let server = MockServer::start().await;
        let oauth = client_for(&server);

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "at-only"
            })))
            .mount(&server)
            .await;

        let response = oauth.exchange_code("code").await.unwrap();
        match response.into_pair() {
            Err(ShikiError::IncompleteTokenResponse(field)) => {
                assert_eq!(field, "refresh_token");
            }
            other => panic!("expected IncompleteTokenResponse, got {:?}", other.map(|_| ())),
        }
    }
}
