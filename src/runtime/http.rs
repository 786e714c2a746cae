use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use serde_json::{Map, Value};

use crate::{Config, MollieflowError, Result, model::HttpMethod};

/// Fully shaped, authenticated request with an absolute url, ready for
/// dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub qs: Map<String, Value>,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Failure reason from a problem-document style body
    /// (`{status, title, detail}`).
    pub fn error_message(&self) -> String {
        self.body
            .get("detail")
            .or_else(|| self.body.get("title"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("request failed with status {}", self.status))
    }
}

/// Host extension point for dispatching prepared requests. The host owns
/// retry, pagination and timeout policy; tests stub this.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(
        &self,
        request: PreparedRequest,
    ) -> Result<HttpResponse>;
}

/// Default transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn create(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| MollieflowError::Http(format!("failed to build http client: {}", err)))?;

        Ok(Self {
            client,
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }
}

fn query_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(
        &self,
        request: PreparedRequest,
    ) -> Result<HttpResponse> {
        let method: reqwest::Method = request
            .method
            .as_ref()
            .parse()
            .map_err(|_| MollieflowError::Http(format!("invalid method '{:?}'", request.method)))?;

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("accept"), HeaderValue::from_static("application/json"));
        for (key, value) in &request.headers {
            headers.insert(
                key.parse::<HeaderName>().map_err(|err| MollieflowError::Http(err.to_string()))?,
                value.parse().map_err(|err: InvalidHeaderValue| MollieflowError::Http(err.to_string()))?,
            );
        }

        let mut query = Vec::new();
        for (key, value) in &request.qs {
            query.push((key.clone(), query_string(value)));
        }

        let mut builder = self.client.request(method, &request.url).headers(headers).query(&query).timeout(self.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| MollieflowError::Http(format!("http error: {}", err)))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|err| MollieflowError::Http(err.to_string()))?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(HttpResponse { status, body })
    }
}
