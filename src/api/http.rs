// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! REST transport for the fitness backend.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;

use crate::api::{ApiRequest, Method};
use crate::error::{ClientError, Result};
use crate::models::ErrorBody;

/// HTTP client bound to one backend base URL.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client for `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send `request`, attaching `token` as a bearer credential when present.
    ///
    /// Returns the parsed JSON body on success. Failing statuses become
    /// [`ClientError::Api`]; failures before any response arrives become
    /// [`ClientError::Network`].
    pub async fn execute(&self, request: &ApiRequest, token: Option<&str>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self
            .http
            .request(to_reqwest_method(request.method), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(
                method = %request.method,
                path = %request.path,
                error = %e,
                "API request failed"
            );
            ClientError::Network(e.to_string())
        })?;

        self.check_response_json(request, response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json(
        &self,
        request: &ApiRequest,
        response: reqwest::Response,
    ) -> Result<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .map(|b| b.error);
            let err = ClientError::from_status(status.as_u16(), message);
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                error = %err,
                "API request rejected"
            );
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| ClientError::Decode(format!("JSON parse error: {}", e)))
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}
