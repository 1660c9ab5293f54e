// HTTP adapter - Cut list service access over reqwest

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport adapter decoding service responses as ISO-8859-1
pub struct HttpReqwestAdapter {
    client: reqwest::Client,
}

impl HttpReqwestAdapter {
    /// Create new HTTP adapter
    pub fn new() -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::TransportFail(e.to_string()))?;

        Ok(Self { client })
    }
}

/// Map every byte to the code point of the same value
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[async_trait]
impl TransportPort for HttpReqwestAdapter {
    async fn get_text(&self, url: &str) -> Result<String, DomainError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::TransportFail(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::TransportFail(format!(
                "{} answered {}",
                url,
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::TransportFail(e.to_string()))?;
        Ok(decode_latin1(&body))
    }
}
