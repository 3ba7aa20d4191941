//! HTTP transport for the knowledge base
//!
//! The fetcher talks to the knowledge base through the [`Transport`] trait so
//! the retry policy can be exercised against scripted responses.
//! [`HttpTransport`] is the reqwest implementation.

use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use tracing::debug;

use crate::error::TransportError;

/// One of the three action-API request shapes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiQuery {
    /// `wbgetclaims` for one (entity, property) pair
    Claims { entity: String, property: String },
    /// `wbsearchentities`, limited to one hit
    Search { text: String, language: String },
    /// `wbgetentities` labels in one language
    Labels { entity: String, language: String },
}

impl ApiQuery {
    /// Query-string parameters
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("format", "json".to_string())];
        match self {
            ApiQuery::Claims { entity, property } => {
                params.push(("action", "wbgetclaims".to_string()));
                params.push(("entity", entity.clone()));
                params.push(("property", property.clone()));
            }
            ApiQuery::Search { text, language } => {
                params.push(("action", "wbsearchentities".to_string()));
                params.push(("search", text.clone()));
                params.push(("language", language.clone()));
                params.push(("type", "item".to_string()));
                params.push(("limit", "1".to_string()));
                params.push(("props", "id".to_string()));
            }
            ApiQuery::Labels { entity, language } => {
                params.push(("action", "wbgetentities".to_string()));
                params.push(("ids", entity.clone()));
                params.push(("props", "labels".to_string()));
                params.push(("languages", language.clone()));
            }
        }
        params
    }

    /// Short label for logs
    pub fn describe(&self) -> String {
        match self {
            ApiQuery::Claims { entity, property } => format!("claims {}/{}", entity, property),
            ApiQuery::Search { text, .. } => format!("search '{}'", text),
            ApiQuery::Labels { entity, language } => format!("labels {}@{}", entity, language),
        }
    }
}

/// Raw HTTP response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Raw `Retry-After` header, if any
    pub retry_after: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            retry_after: None,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            retry_after: None,
            body: String::new(),
        }
    }

    pub fn too_many_requests(retry_after: Option<&str>) -> Self {
        Self {
            status: 429,
            retry_after: retry_after.map(str::to_string),
            body: String::new(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one GET; any HTTP status is a successful transport round trip
    async fn get(&self, query: &ApiQuery) -> Result<ApiResponse, TransportError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    api_url: String,
}

impl HttpTransport {
    pub fn new(
        api_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(user_agent)
                .map_err(|e| TransportError(format!("Invalid user agent: {}", e)))?,
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, query: &ApiQuery) -> Result<ApiResponse, TransportError> {
        debug!(url = %self.api_url, query = %query.describe(), "Querying knowledge base");

        let response = self
            .client
            .get(&self.api_url)
            .query(&query.params())
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("Failed to read body: {}", e)))?;

        Ok(ApiResponse {
            status,
            retry_after,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_claims_params() {
        let query = ApiQuery::Claims {
            entity: "Q10132".to_string(),
            property: "P27".to_string(),
        };
        let params = query.params();
        assert_eq!(param(&params, "action"), Some("wbgetclaims"));
        assert_eq!(param(&params, "entity"), Some("Q10132"));
        assert_eq!(param(&params, "property"), Some("P27"));
        assert_eq!(param(&params, "format"), Some("json"));
    }

    #[test]
    fn test_search_is_limited_to_one_hit() {
        let query = ApiQuery::Search {
            text: "Rafael Nadal".to_string(),
            language: "en".to_string(),
        };
        let params = query.params();
        assert_eq!(param(&params, "action"), Some("wbsearchentities"));
        assert_eq!(param(&params, "limit"), Some("1"));
        assert_eq!(param(&params, "type"), Some("item"));
    }

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new(
            "https://www.wikidata.org/w/api.php",
            "courtstats-test/0.1",
            Duration::from_secs(10),
        );
        assert!(transport.is_ok());
    }
}
