//! Bearer-authenticated HTTP transport for the AgroLink API.
//!
//! Every outgoing request picks up the current credential from the shared
//! [`CredentialCell`] at send time; the public login endpoint simply
//! receives the header harmlessly if a token happens to be held. Non-2xx
//! responses surface as [`GatewayError::Api`] with the message extracted
//! from the body's `message` field when present. Nothing is retried and
//! nothing is cached.
//!
//! No request timeout is enforced: a hung request suspends its caller
//! indefinitely. Known gap, carried deliberately until the backend contract
//! specifies one.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use crate::credential::CredentialCell;

/// Fallback when a failure response carries no usable `message` field.
const GENERIC_API_FAILURE: &str = "request failed";

/// Errors surfaced by the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No response was received at all.
    #[error("network failure")]
    Network(#[source] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or a generic fallback.
        message: String,
    },

    /// The response body did not match the expected envelope.
    #[error("malformed response: {0}")]
    Parse(String),
}

impl GatewayError {
    /// User-visible message for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Standard `{data: ...}` response envelope used by every endpoint.
#[derive(Debug, serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Shape of an error response body, best effort.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP gateway for the AgroLink API.
///
/// Cheap to clone; all clones share one connection pool and one credential
/// cell.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    inner: Arc<GatewayInner>,
}

#[derive(Debug)]
struct GatewayInner {
    client: reqwest::Client,
    base_url: String,
    credential: CredentialCell,
}

impl HttpGateway {
    /// Create a gateway rooted at `base_url` (no trailing slash), reading
    /// the bearer credential from `credential`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credential: CredentialCell) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                client: reqwest::Client::new(),
                base_url: base_url.into(),
                credential,
            }),
        }
    }

    /// The credential cell this gateway reads from.
    #[must_use]
    pub fn credential(&self) -> &CredentialCell {
        &self.inner.credential
    }

    /// GET a `{data: T}` envelope.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure, non-2xx status, or a
    /// malformed envelope.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, GatewayError> {
        let request = self
            .inner
            .client
            .get(self.url(path))
            .query(query);
        self.send_envelope(self.authorize(request)).await
    }

    /// POST a JSON body, expecting a `{data: T}` envelope back.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure, non-2xx status, or a
    /// malformed envelope.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let request = self.inner.client.post(self.url(path)).json(body);
        self.send_envelope(self.authorize(request)).await
    }

    /// POST a multipart form, expecting a `{data: T}` envelope back.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure, non-2xx status, or a
    /// malformed envelope.
    #[instrument(skip(self, form), fields(path = %path))]
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, GatewayError> {
        let request = self.inner.client.post(self.url(path)).multipart(form);
        self.send_envelope(self.authorize(request)).await
    }

    /// GET a raw binary payload (spreadsheet export).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` on transport failure or non-2xx status.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get_bytes(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Vec<u8>, GatewayError> {
        let request = self.authorize(self.inner.client.get(self.url(path)).query(query));
        let response = request.send().await.map_err(map_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let bytes = response.bytes().await.map_err(map_transport)?;
        Ok(bytes.to_vec())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Attach the bearer header if a credential is currently held.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.inner.credential.get() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token.expose())),
            None => request,
        }
    }

    async fn send_envelope<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = request.send().await.map_err(map_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let body = response.text().await.map_err(map_transport)?;
        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| GatewayError::Parse(e.to_string()))?;
        Ok(envelope.data)
    }
}

/// A failed `reqwest` call with a status is an API error; everything else
/// means no usable response arrived.
fn map_transport(err: reqwest::Error) -> GatewayError {
    err.status().map_or(GatewayError::Network(err), |status| {
        GatewayError::Api {
            status: status.as_u16(),
            message: GENERIC_API_FAILURE.to_string(),
        }
    })
}

fn api_error(status: u16, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_API_FAILURE.to_string());
    GatewayError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_extracted_from_body() {
        let err = api_error(422, r#"{"message": "catatan wajib diisi"}"#);
        match err {
            GatewayError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "catatan wajib diisi");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_fallback_on_unparseable_body() {
        for body in ["", "<html>Bad Gateway</html>", r#"{"message": ""}"#] {
            match api_error(502, body) {
                GatewayError::Api { message, .. } => assert_eq!(message, GENERIC_API_FAILURE),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_envelope_rejects_missing_data() {
        let result = serde_json::from_str::<Envelope<Vec<u32>>>(r#"{"items": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_network_error_display() {
        // The transport variant always reads as a generic network failure
        let err_text = GatewayError::Api {
            status: 500,
            message: GENERIC_API_FAILURE.to_string(),
        }
        .to_string();
        assert_eq!(err_text, "API error (500): request failed");
    }
}
