//! Thin typed wrapper over the REST backend.
//!
//! Every endpoint answers with the same envelope, `{ message, data,
//! status }`; the helpers here unwrap it and normalize failures into
//! [`ApiError`]. Nothing in this module touches store state.

use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (DNS, connect, timeout, body decode).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with an error status.
    #[error("api error {status}: {message}")]
    Status { status: u16, message: String },
}

/// Standard response envelope used by every resource.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub message: String,
    pub data: T,
    pub status: u16,
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    auth_token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            auth_token: RwLock::new(None),
        }
    }

    /// Install (or clear) the bearer token used for every request.
    pub fn set_auth_token(&self, token: Option<String>) {
        *self.auth_token.write() = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.auth_token.read().as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let response = self.authorize(req).send().await?;
        let http_status = response.status();

        if !http_status.is_success() {
            return Err(ApiError::Status {
                status: http_status.as_u16(),
                message: error_message(http_status, response).await,
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        if envelope.status >= 400 {
            return Err(ApiError::Status {
                status: envelope.status,
                message: envelope.message,
            });
        }
        Ok(envelope.data)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.http.get(self.url(path))).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        self.execute(self.http.get(self.url(path)).query(query))
            .await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.http.post(self.url(path)).json(body))
            .await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.http.put(self.url(path)).json(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let _: Option<serde_json::Value> = self.execute(self.http.delete(self.url(path))).await?;
        Ok(())
    }
}

/// Pull the envelope message out of an error response, falling back to the
/// HTTP reason phrase when the body is not an envelope.
async fn error_message(status: StatusCode, response: reqwest::Response) -> String {
    match response.json::<Envelope<Option<serde_json::Value>>>().await {
        Ok(envelope) if !envelope.message.is_empty() => envelope.message,
        _ => status
            .canonical_reason()
            .unwrap_or("request rejected")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_parses_standard_shape() {
        let raw = r#"{"message":"ok","data":[1,2,3],"status":200}"#;
        let envelope: Envelope<Vec<u32>> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.data, vec![1, 2, 3]);
        assert_eq!(envelope.status, 200);
    }

    #[test]
    fn envelope_message_defaults_to_empty() {
        let raw = r#"{"data":null,"status":204}"#;
        let envelope: Envelope<Option<serde_json::Value>> = serde_json::from_str(raw).unwrap();
        assert!(envelope.message.is_empty());
    }

    #[test]
    fn url_join_tolerates_trailing_slash() {
        let client = ApiClient::new("https://api.example.test/v1/");
        assert_eq!(client.url("/boards"), "https://api.example.test/v1/boards");
    }
}
