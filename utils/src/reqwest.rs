use std::{fmt::Debug, time::Duration};

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;
use url::Url;

use crate::serde::{SerdePathError, SerdeResponseParse};

#[derive(Debug)]
pub enum ReqwestStage {
    Send,
    Status,
    DecodeText,
    Deserialise,
}

fn parse_url<U: ToString>(url: U) -> crate::Result<Url> {
    url.to_string()
        .parse::<Url>()
        .map_err(|_| crate::Error::InvalidUrl(url.to_string()))
}

#[derive(Debug)]
#[allow(dead_code)]
pub struct ReqwestErrorContext {
    pub url: Url,
    query: String,
    attempts: u32,
    /// Body of an error status response, empty otherwise.
    pub response_body: String,
}

#[derive(Debug)]
pub enum ReqwestInnerError {
    Reqwest(reqwest::Error),
    SerdePath(SerdePathError),
}

impl ReqwestInnerError {
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Reqwest(err) => err.is_connect(),
            Self::SerdePath(_) => false,
        }
    }
}

/// Bounded retries with exponential backoff, applied to connection failures,
/// timeouts, `429 Too Many Requests` and server errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        max_retries: 0,
        base_delay: Duration::ZERO,
    };

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1 << attempt.min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(100),
        }
    }
}

struct AttemptFailure {
    stage: ReqwestStage,
    error: reqwest::Error,
    body: Option<String>,
}

impl AttemptFailure {
    fn is_retryable(&self) -> bool {
        self.error.is_connect()
            || self.error.is_timeout()
            || self.error.status().is_some_and(|status| {
                status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            })
    }

    fn into_error(self, mut context: Box<ReqwestErrorContext>) -> crate::Error {
        if let Some(body) = self.body {
            context.response_body = body;
        }

        if matches!(self.stage, ReqwestStage::Send) && self.error.is_connect() {
            crate::Error::Internet(context.url)
        } else {
            crate::Error::ReqwestFailed {
                stage: self.stage,
                context,
                inner: ReqwestInnerError::Reqwest(self.error),
            }
        }
    }
}

pub struct Reqwest {
    builder: RequestBuilder,
    error_context: Option<ReqwestErrorContext>,
    retry: RetryPolicy,
}

impl Reqwest {
    pub fn get<U: ToString>(url: U) -> crate::Result<Self> {
        let url = parse_url(url)?;
        let client = reqwest::Client::new();
        let builder = client.get(url.clone());
        Ok(Self::new(builder, url))
    }

    fn new(builder: RequestBuilder, url: Url) -> Self {
        Self {
            builder,
            error_context: Some(ReqwestErrorContext {
                url,
                query: String::new(),
                attempts: 0,
                response_body: String::new(),
            }),
            retry: RetryPolicy::NONE,
        }
    }

    pub fn query<T: serde::Serialize + Debug>(mut self, query: &T) -> Self {
        self.builder = self.builder.query(query);
        if let Some(context) = self.error_context.as_mut() {
            context.query = format!("{query:?}");
        }
        self
    }

    pub fn bearer_auth(mut self, token: &str) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub async fn receive_text(self) -> crate::Result<String> {
        let (text, _) = self.receive_text_internal().await?;
        Ok(text)
    }

    async fn send_once(builder: RequestBuilder) -> Result<String, AttemptFailure> {
        let response = builder.send().await.map_err(|error| AttemptFailure {
            stage: ReqwestStage::Send,
            error,
            body: None,
        })?;

        // error statuses keep their body for the caller
        let status_error = response.error_for_status_ref().err();
        if let Some(error) = status_error {
            return Err(AttemptFailure {
                stage: ReqwestStage::Status,
                error,
                body: response.text().await.ok(),
            });
        }

        response.text().await.map_err(|error| AttemptFailure {
            stage: ReqwestStage::DecodeText,
            error,
            body: None,
        })
    }

    async fn receive_text_internal(mut self) -> crate::Result<(String, Box<ReqwestErrorContext>)> {
        let mut error_context = Box::new(
            self.error_context
                .take()
                .ok_or(crate::Error::ReqwestErrorContextMissing)?,
        );

        let mut builder = self.builder;
        loop {
            // requests with streaming bodies cannot be cloned and are sent once
            let next = builder.try_clone();
            error_context.attempts += 1;

            let failure = match Self::send_once(builder).await {
                Ok(text) => return Ok((text, error_context)),
                Err(failure) => failure,
            };

            let retries_done = error_context.attempts - 1;
            match next {
                Some(next) if retries_done < self.retry.max_retries && failure.is_retryable() => {
                    let delay = self.retry.delay_for(retries_done);
                    warn!(
                        url = %error_context.url,
                        attempt = error_context.attempts,
                        stage = ?failure.stage,
                        ?delay,
                        "request failed, retrying: {}",
                        failure.error
                    );
                    tokio::time::sleep(delay).await;
                    builder = next;
                }
                _ => return Err(failure.into_error(error_context)),
            }
        }
    }

    pub async fn receive_json<J: Debug + DeserializeOwned>(self) -> crate::Result<J> {
        let (text, error_context) = self.receive_text_internal().await?;

        let parse_result = text.as_str().serde_parse_custom();
        let Ok(json) = parse_result else {
            let err = parse_result.unwrap_err();
            return Err(crate::Error::ReqwestFailed {
                stage: ReqwestStage::Deserialise,
                context: error_context,
                inner: ReqwestInnerError::SerdePath(err),
            });
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_server::TestServer;

    use super::*;

    const FAST_RETRY: RetryPolicy = RetryPolicy {
        max_retries: 5,
        base_delay: Duration::from_millis(1),
    };

    #[test]
    fn test_retry_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(4), Duration::from_millis(1600));
        assert_eq!(RetryPolicy::NONE.delay_for(3), Duration::ZERO);
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            Reqwest::get("not a url"),
            Err(crate::Error::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_internet_error() {
        // port 9 (discard) on localhost is closed in test environments
        let result = Reqwest::get("http://127.0.0.1:9/")
            .unwrap()
            .receive_text()
            .await;

        let err = result.unwrap_err();
        assert!(err.is_connect(), "{err:?}");
    }

    #[tokio::test]
    async fn test_retries_server_errors_and_rate_limits() {
        let server = TestServer::start(vec![
            ("503 Service Unavailable", ""),
            ("429 Too Many Requests", ""),
            ("200 OK", "ok"),
        ])
        .await;

        let text = Reqwest::get(&server.url)
            .unwrap()
            .retry(FAST_RETRY)
            .receive_text()
            .await
            .unwrap();

        assert_eq!(text, "ok");
        assert_eq!(server.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let server = TestServer::start(vec![
            ("502 Bad Gateway", "first"),
            ("502 Bad Gateway", "second"),
            ("200 OK", "ok"),
        ])
        .await;

        let policy = RetryPolicy {
            max_retries: 1,
            ..FAST_RETRY
        };
        let result = Reqwest::get(&server.url)
            .unwrap()
            .retry(policy)
            .receive_text()
            .await;

        match result {
            Err(crate::Error::ReqwestFailed {
                stage: ReqwestStage::Status,
                context,
                ..
            }) => {
                assert_eq!(context.attempts, 2);
                assert_eq!(context.response_body, "second");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(server.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = TestServer::start(vec![
            ("404 Not Found", r#"{"error":true}"#),
            ("200 OK", "ok"),
        ])
        .await;

        let result = Reqwest::get(&server.url)
            .unwrap()
            .retry(FAST_RETRY)
            .receive_text()
            .await;

        match result {
            Err(crate::Error::ReqwestFailed {
                stage: ReqwestStage::Status,
                context,
                ..
            }) => {
                assert_eq!(context.attempts, 1);
                assert_eq!(context.response_body, r#"{"error":true}"#);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(server.requests().len(), 1);
    }
}
