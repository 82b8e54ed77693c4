use std::time::Instant;

use log::{debug, error, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ShikiError};

/// Shikimori rejects requests without the registered application name.
pub const USER_AGENT: &str = "Api Test";

pub struct ShikiClient {
    http: Client,
    endpoint: String,
    access_token: String,
}

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a Map<String, Value>>,
}

#[derive(Deserialize)]
struct GraphQLResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Deserialize, Debug)]
struct GraphQLError {
    message: String,
}

/// Outcome of a paginated fetch. A request failure mid-loop does not discard
/// what was already accumulated; it is carried in `aborted` instead.
pub struct PagedFetch {
    pub entities: Vec<Value>,
    pub pages_fetched: u32,
    pub aborted: Option<ShikiError>,
}

impl ShikiClient {
    pub fn new(endpoint: String, access_token: String) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            access_token,
        }
    }

    /// Execute a single GraphQL query and return the `data` object.
    pub async fn execute(&self, query: &str, variables: Option<&Map<String, Value>>) -> Result<Value> {
        let request = GraphQLRequest { query, variables };

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("User-Agent", USER_AGENT)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ShikiError::Api {
                status: response.status().as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        let gql_response: GraphQLResponse = response.json().await?;

        if let Some(errors) = gql_response.errors {
            return Err(ShikiError::GraphQL {
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }

        gql_response.data.ok_or(ShikiError::EmptyResponse)
    }

    /// Execute a query repeatedly with an incrementing `page` variable,
    /// concatenating every array-valued field of each page's `data` object.
    ///
    /// Stops early when a page carries no array-valued field (no more data)
    /// or when a request fails; in both cases whatever was accumulated so
    /// far is returned.
    pub async fn execute_paginated(
        &self,
        query: &str,
        variables: Option<Map<String, Value>>,
        max_pages: u32,
    ) -> PagedFetch {
        let mut vars = variables.unwrap_or_default();
        let mut entities: Vec<Value> = Vec::new();
        let mut pages_fetched = 0;
        let mut aborted = None;

        let start = Instant::now();

        for page in 1..=max_pages {
            vars.insert("page".to_string(), Value::from(page));

            let data = match self.execute(query, Some(&vars)).await {
                Ok(data) => data,
                Err(e) => {
                    error!("error while fetching page {page}: {e}");
                    aborted = Some(e);
                    break;
                }
            };

            pages_fetched += 1;
            let mut found_list = false;

            match data {
                Value::Object(fields) => {
                    for (key, value) in fields {
                        match value {
                            Value::Array(items) => {
                                found_list = true;
                                entities.extend(items);
                            }
                            _ => warn!("unexpected structure for field '{key}', skipping"),
                        }
                    }
                }
                _ => warn!("no data received for page {page}"),
            }

            if !found_list {
                info!("no more data found, stopping at page {page}");
                break;
            }

            debug!("page {page} fetched, {} entities so far", entities.len());
        }

        info!(
            "fetched {} entities across {} page(s) in {:.2}s",
            entities.len(),
            pages_fetched,
            start.elapsed().as_secs_f64()
        );

        PagedFetch {
            entities,
            pages_fetched,
            aborted,
        }
    }
}
