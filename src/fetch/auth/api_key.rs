use crate::fetch::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that injects an API key as an HTTP header.
///
/// The header name and value are validated once in [`ApiKey::new`], so
/// sending a request cannot fail on a malformed key.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    pub fn new(inner: C, header_name: &str, key: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())
            .with_context(|| format!("invalid header name '{header_name}'"))?;
        let mut value = HeaderValue::from_str(key).context("API key is not a valid header value")?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name,
            value,
        })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;

    #[test]
    fn test_rejects_invalid_header_name() {
        let client = BasicClient::new().unwrap();
        assert!(ApiKey::new(client, "bad header", "key").is_err());
    }

    #[test]
    fn test_rejects_key_with_newline() {
        let client = BasicClient::new().unwrap();
        assert!(ApiKey::new(client, "x-api-key", "abc\ndef").is_err());
    }

    #[test]
    fn test_key_value_is_sensitive() {
        let client = BasicClient::new().unwrap();
        let auth = ApiKey::new(client, "X-Api-Key", "token").unwrap();
        assert_eq!(auth.header_name.as_str(), "x-api-key");
        assert!(auth.value.is_sensitive());
        assert_eq!(auth.value.to_str().unwrap(), "token");
    }
}
