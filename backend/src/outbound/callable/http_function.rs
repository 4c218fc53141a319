//! Reqwest-backed callable-function adapter.
//!
//! This adapter owns transport details only: request framing, optional
//! bearer authentication, timeout and HTTP error mapping, and decoding of
//! the `result`/`error` envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{CallableRequestDto, CallableResponseDto};
use crate::domain::ports::{CallableFunction, CallableFunctionError};

const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Invokes functions at `<base_url>/<name>` over HTTPS.
pub struct HttpCallableFunction {
    client: Client,
    base_url: Url,
    id_token: Option<Zeroizing<String>>,
}

impl HttpCallableFunction {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            id_token: None,
        })
    }

    /// Authenticate calls with the caller's ID token.
    #[must_use]
    pub fn with_id_token(mut self, id_token: impl Into<String>) -> Self {
        self.id_token = Some(Zeroizing::new(id_token.into()));
        self
    }

    fn endpoint(&self, name: &str) -> Result<Url, CallableFunctionError> {
        function_url(&self.base_url, name)
    }
}

#[async_trait]
impl CallableFunction for HttpCallableFunction {
    async fn call(&self, name: &str, payload: Value) -> Result<Value, CallableFunctionError> {
        let endpoint = self.endpoint(name)?;
        debug!(function = name, %endpoint, "invoking callable function");

        let mut request = self
            .client
            .post(endpoint)
            .json(&CallableRequestDto { data: &payload });
        if let Some(token) = &self.id_token {
            request = request.bearer_auth(token.as_str());
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        decode_response(status, body.as_ref())
    }
}

fn function_url(base_url: &Url, name: &str) -> Result<Url, CallableFunctionError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| {
            CallableFunctionError::transport(format!("base URL cannot take a path: {base_url}"))
        })?
        .pop_if_empty()
        .push(name);
    Ok(url)
}

fn decode_response(status: StatusCode, body: &[u8]) -> Result<Value, CallableFunctionError> {
    let decoded = serde_json::from_slice::<CallableResponseDto>(body);

    if let Ok(CallableResponseDto {
        error: Some(error), ..
    }) = &decoded
    {
        return Err(CallableFunctionError::remote(
            error.status.as_deref().unwrap_or(UNKNOWN_STATUS),
            error.message.clone().unwrap_or_default(),
        ));
    }
    if !status.is_success() {
        return Err(CallableFunctionError::remote(
            status.as_u16().to_string(),
            body_preview(body),
        ));
    }

    match decoded {
        Ok(CallableResponseDto {
            result: Some(result),
            ..
        }) => Ok(result),
        Ok(_) => Err(CallableFunctionError::decode(
            "response did not contain a result",
        )),
        Err(err) => Err(CallableFunctionError::decode(format!(
            "invalid callable response JSON: {err}"
        ))),
    }
}

fn map_transport_error(error: reqwest::Error) -> CallableFunctionError {
    if error.is_timeout() {
        CallableFunctionError::transport(format!("request timed out: {error}"))
    } else {
        CallableFunctionError::transport(error.to_string())
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
