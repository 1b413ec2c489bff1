use std::io::{self, Read};
use std::time::Duration;

use futures::TryStreamExt;
use reqwest::StatusCode;
use serde_json::Value;
use tokio_util::io::{StreamReader, SyncIoBridge};
use url::Url;

use crate::error::ValidateError;

/// The two schema documents of one run.
#[derive(Debug, Clone)]
pub struct FetchedSchemas {
    pub topic: Value,
    pub shared: Value,
}

/// HTTP client for the schema store and for remote data files.
///
/// Every request is a single attempt bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http: reqwest::Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, ValidateError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("elter-validate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ValidateError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { http })
    }

    /// Retrieve the topic and shared schemas.
    ///
    /// Both requests are issued concurrently. The call fails unless both
    /// answer `200 OK`; only then are the bodies parsed.
    pub async fn fetch_schemas(
        &self,
        topic_url: &Url,
        shared_url: &Url,
    ) -> Result<FetchedSchemas, ValidateError> {
        let (topic, shared) = tokio::join!(self.get(topic_url), self.get(shared_url));

        let unavailable = |reason: String| ValidateError::SchemaUnavailable {
            topic_url: topic_url.to_string(),
            shared_url: shared_url.to_string(),
            reason,
        };

        let (topic_body, shared_body) = match (topic, shared) {
            (Ok(t), Ok(s)) => (t, s),
            (Err(e), Ok(_)) => return Err(unavailable(format!("topic schema: {e}"))),
            (Ok(_), Err(e)) => return Err(unavailable(format!("shared schema: {e}"))),
            (Err(te), Err(se)) => {
                return Err(unavailable(format!("topic schema: {te}; shared schema: {se}")))
            }
        };

        Ok(FetchedSchemas {
            topic: parse_schema(topic_url, topic_body)?,
            shared: parse_schema(shared_url, shared_body)?,
        })
    }

    /// Open a remote data file as a blocking reader over the response body.
    ///
    /// The body is streamed: only the chunk being parsed is held in memory.
    /// The reader blocks on this runtime, so it must be consumed off the
    /// runtime thread (e.g. in `spawn_blocking`).
    pub async fn fetch_input(&self, url: &Url) -> Result<Box<dyn Read + Send>, ValidateError> {
        let response = self
            .send(url)
            .await
            .map_err(|reason| ValidateError::input_unreadable(url.as_str(), reason))?;

        let body = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
        Ok(Box::new(SyncIoBridge::new(StreamReader::new(Box::pin(body)))))
    }

    async fn get(&self, url: &Url) -> Result<Vec<u8>, String> {
        let response = self.send(url).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| format!("reading body of {url} failed: {e}"))?;

        tracing::debug!(%url, bytes = body.len(), "retrieved");
        Ok(body.to_vec())
    }

    /// GET `url`, accepting only `200 OK`.
    async fn send(&self, url: &Url) -> Result<reqwest::Response, String> {
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| format!("request to {url} failed: {e}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(format!("{url} answered {status}"));
        }
        Ok(response)
    }
}

/// Decode a schema body as UTF-8 JSON.
pub fn parse_schema(url: &Url, body: Vec<u8>) -> Result<Value, ValidateError> {
    let malformed = |reason: String| ValidateError::SchemaMalformed {
        url: url.to_string(),
        reason,
    };

    let text = String::from_utf8(body).map_err(|e| malformed(format!("not UTF-8: {e}")))?;
    serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))
}
