//! Page fetching with fixed-delay retries and status classification.

use super::http_client::create_http_client_with_timeout;
use crate::config::Config;
use crate::error::AppError;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Single attempt at loading a page's markup.
///
/// Implementations classify failures into [`AppError`] variants so the retry
/// loop can tell transient problems from missing pages.
pub trait PageFetcher {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// How often and how patiently a page is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        RetryPolicy {
            max_attempts: config.max_retries.max(1),
            delay: Duration::from_secs(config.retry_delay_seconds),
        }
    }
}

/// Maps a non-success HTTP status to the matching error.
pub fn classify_status(status: reqwest::StatusCode, url: &str) -> AppError {
    let status_code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown error");
    match status_code {
        404 => AppError::page_not_found(url),
        429 => AppError::rate_limit(reason, url),
        400..=499 => AppError::client_error(status_code, reason, url),
        _ => AppError::server_error(status_code, reason, url),
    }
}

fn classify_request_error(e: reqwest::Error, url: &str) -> AppError {
    if e.is_timeout() {
        AppError::network_timeout(url)
    } else if e.is_connect() {
        AppError::network_connection(url, e.to_string())
    } else {
        AppError::Fetch(e)
    }
}

/// Fetches `url`, retrying transient failures with a fixed delay.
///
/// Non-retryable errors (missing page, other client errors) are returned at
/// once; transient ones are returned after the last attempt.
#[instrument(skip(fetcher, policy))]
pub async fn fetch_with_retry<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    policy: &RetryPolicy,
) -> Result<String, AppError> {
    let mut attempt = 1;
    loop {
        match fetcher.fetch_page(url).await {
            Ok(body) => return Ok(body),
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                warn!(
                    "Attempt {attempt}/{} for {url} failed: {e}. Retrying in {:?}",
                    policy.max_attempts, policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    error!("Giving up on {url} after {attempt} attempts: {e}");
                }
                return Err(e);
            }
        }
    }
}

/// Fetcher backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    render_delay: Duration,
}

impl HttpFetcher {
    pub fn new(client: Client, render_delay: Duration) -> Self {
        HttpFetcher {
            client,
            render_delay,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
        Ok(Self::new(
            client,
            Duration::from_secs(config.render_delay_seconds),
        ))
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, AppError> {
        debug!("Fetching page: {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_request_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status, url));
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_request_error(e, url))?;
        if body.trim().is_empty() {
            return Err(AppError::empty_page(url));
        }

        if !self.render_delay.is_zero() {
            tokio::time::sleep(self.render_delay).await;
        }
        debug!("Fetched {} bytes from {url}", body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Plays back a fixed sequence of results, then repeats the last one.
    struct ScriptedFetcher {
        script: Mutex<Vec<Result<String, AppError>>>,
        calls: AtomicU32,
    }

    impl ScriptedFetcher {
        fn new(mut script: Vec<Result<String, AppError>>) -> Self {
            script.reverse();
            ScriptedFetcher {
                script: Mutex::new(script),
                calls: AtomicU32::new(0),
            }
        }
    }

    impl PageFetcher for ScriptedFetcher {
        async fn fetch_page(&self, url: &str) -> Result<String, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop().unwrap()
            } else {
                match script.last().unwrap() {
                    Ok(body) => Ok(body.clone()),
                    Err(_) => Err(AppError::network_timeout(url)),
                }
            }
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let fetcher = ScriptedFetcher::new(vec![
            Err(AppError::network_timeout("u")),
            Err(AppError::server_error(503, "Service Unavailable", "u")),
            Ok("<html></html>".to_string()),
        ]);
        let body = fetch_with_retry(&fetcher, "u", &fast_policy(3)).await.unwrap();
        assert_eq!(body, "<html></html>");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let fetcher = ScriptedFetcher::new(vec![Err(AppError::network_timeout("u"))]);
        let err = fetch_with_retry(&fetcher, "u", &fast_policy(3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NetworkTimeout { .. }));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let fetcher = ScriptedFetcher::new(vec![
            Err(AppError::page_not_found("u")),
            Ok("unused".to_string()),
        ]);
        let err = fetch_with_retry(&fetcher, "u", &fast_policy(3))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_classify_status() {
        use reqwest::StatusCode;
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "u"),
            AppError::PageNotFound { .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "u"),
            AppError::RateLimit { .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "u"),
            AppError::ClientError { status: 403, .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "u"),
            AppError::ServerError { status: 502, .. }
        ));
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = Config {
            max_retries: 5,
            retry_delay_seconds: 2,
            ..Config::default()
        };
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    /// Matches the full `User-Agent` value, commas included.
    struct UserAgentIs(&'static str);

    impl wiremock::Match for UserAgentIs {
        fn matches(&self, request: &wiremock::Request) -> bool {
            request
                .headers
                .get("user-agent")
                .and_then(|value| value.to_str().ok())
                == Some(self.0)
        }
    }

    #[tokio::test]
    async fn test_http_fetcher_classifies_responses() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/players/a/a01/gamelog/2010"))
            .and(UserAgentIs(crate::constants::USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/players/a/a01/gamelog/2011"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/players/a/a01/gamelog/2012"))
            .respond_with(ResponseTemplate::new(200).set_body_string("   "))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(
            super::super::http_client::create_test_http_client(),
            Duration::ZERO,
        );
        let url = |season: i32| format!("{}/players/a/a01/gamelog/{season}", mock_server.uri());

        assert_eq!(fetcher.fetch_page(&url(2010)).await.unwrap(), "<html>ok</html>");
        assert!(matches!(
            fetcher.fetch_page(&url(2011)).await,
            Err(AppError::ServerError { status: 503, .. })
        ));
        assert!(matches!(
            fetcher.fetch_page(&url(2012)).await,
            Err(AppError::EmptyPage { .. })
        ));
        // Unmatched paths are answered with 404
        assert!(matches!(
            fetcher.fetch_page(&url(2013)).await,
            Err(AppError::PageNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_http_fetcher_reports_connection_failure() {
        // Nothing listens on port 9 of the loopback interface
        let fetcher = HttpFetcher::new(
            super::super::http_client::create_test_http_client(),
            Duration::ZERO,
        );
        let err = fetcher
            .fetch_page("http://127.0.0.1:9/players/a/a01/gamelog/2010")
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
