use std::sync::Arc;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::azure::git::GitResource;
use crate::config::AzureConfig;
use crate::error::{AppError, Result};

/// Response body of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Raw(Vec<u8>),
}

impl Payload {
    /// Empty bodies read as `{}`; anything that is not JSON is kept raw.
    pub fn from_body(body: Vec<u8>) -> Self {
        if body.is_empty() {
            return Payload::Json(Value::Object(Default::default()));
        }
        match serde_json::from_slice(&body) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Raw(body),
        }
    }
}

#[derive(Debug, Default)]
pub struct RequestOptions<'a> {
    /// Overrides the configured api-version
    pub api_version: Option<&'a str>,
    pub body: Option<&'a Value>,
    pub query: Vec<(&'a str, String)>,
    pub content_type: Option<&'a str>,
}

impl<'a> RequestOptions<'a> {
    pub fn query(query: Vec<(&'a str, String)>) -> Self {
        Self { query, ..Self::default() }
    }
}

/// Authenticated Azure DevOps REST client. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct AzureDevOpsClient {
    http: Client,
    config: Arc<AzureConfig>,
}

impl AzureDevOpsClient {
    pub fn new(config: AzureConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("azdo-pr-changes/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn git(&self) -> GitResource<'_> {
        GitResource::new(self)
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.organization_url, endpoint)
    }

    /// Send a request and return the raw body. Any non-2xx status is an
    /// `AppError::Api` carrying the status and response text.
    pub fn send(&self, method: Method, endpoint: &str, options: RequestOptions<'_>) -> Result<Vec<u8>> {
        let url = self.url(endpoint);
        let api_version = options.api_version.unwrap_or(self.config.api_version.as_str());

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .basic_auth("", Some(self.config.personal_access_token.expose_secret()))
            .header(CONTENT_TYPE, options.content_type.unwrap_or("application/json"))
            .query(&options.query)
            .query(&[("api-version", api_version)]);

        if let Some(body) = options.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        tracing::debug!("{} {} (api-version {})", method, url, api_version);
        let response = builder.send()?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::debug!("{} {} failed with {}", method, url, status);
            return Err(AppError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes()?.to_vec())
    }

    pub fn request(&self, method: Method, endpoint: &str, options: RequestOptions<'_>) -> Result<Payload> {
        self.send(method, endpoint, options).map(Payload::from_body)
    }

    pub fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions<'_>,
    ) -> Result<T> {
        match self.request(method, endpoint, options)? {
            Payload::Json(value) => Ok(serde_json::from_value(value)?),
            Payload::Raw(body) => Err(AppError::Internal(format!(
                "Expected JSON from {}, got {} bytes of raw content",
                endpoint,
                body.len()
            ))),
        }
    }
}
