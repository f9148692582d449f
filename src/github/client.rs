use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;

use crate::config::GithubConfig;
use crate::error::{Error, Result};
use crate::github::types::{BlobResponse, RepoResponse, TreeEntry, TreeResponse};
use crate::github::RepoHost;
use crate::trace::TraceEvent;

/// Typed HTTP client for the GitHub REST API and raw content host.
///
/// Injects the `Authorization` header on every request when a token is
/// configured and maps response statuses onto the crate error taxonomy,
/// with structured tracing per call.
pub struct GithubClient {
    http: reqwest::Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig, token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        // GitHub rejects requests without a User-Agent.
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("reposummary/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(ref token) = token {
            let val = HeaderValue::from_str(&format!("token {token}"))
                .map_err(|e| Error::Config(format!("invalid token header: {e}")))?;
            headers.insert(AUTHORIZATION, val);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("HTTP client build failed: {e}")))?;

        Ok(Self { http, config })
    }

    // ── Internal HTTP helper with status mapping + tracing ─────────

    async fn get_checked(&self, url: &str) -> Result<reqwest::Response> {
        let start = Instant::now();
        let result = self.http.get(url).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                TraceEvent::GithubCall {
                    endpoint: url.to_string(),
                    status: 0,
                    duration_ms,
                }
                .emit();
                return Err(e.into());
            }
        };

        let status = resp.status();
        TraceEvent::GithubCall {
            endpoint: url.to_string(),
            status: status.as_u16(),
            duration_ms,
        }
        .emit();

        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(map_error_status(status, &body))
    }

    /// GET a URL and decode the JSON body into `T`.
    async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let resp = self.get_checked(url).await?;
        let body = resp.text().await?;
        decode_json(&body)
    }
}

/// A 2xx body that is not the expected JSON is a decode error, kept
/// apart from transport failures.
fn decode_json<T>(body: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    Ok(serde_json::from_str(body)?)
}

/// Map a non-2xx GitHub response onto the error taxonomy.
///
/// 403 bodies are inspected for the rate-limit message, since GitHub
/// reports rate limiting and plain permission denials with the same
/// status code.
fn map_error_status(status: StatusCode, body: &str) -> Error {
    match status {
        StatusCode::UNAUTHORIZED => Error::InvalidToken,
        StatusCode::NOT_FOUND => Error::RepoNotFound,
        StatusCode::FORBIDDEN => {
            let message = serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
                .unwrap_or_default();
            if message.contains("API rate limit exceeded") {
                Error::RateLimit
            } else {
                Error::Gateway(403)
            }
        }
        other => Error::Gateway(other.as_u16()),
    }
}

#[async_trait::async_trait]
impl RepoHost for GithubClient {
    async fn default_branch(&self, owner: &str, repo: &str) -> Result<String> {
        let url = format!("{}/repos/{owner}/{repo}", self.config.api_base_url);
        let parsed: RepoResponse = self.get_json(&url).await?;
        Ok(parsed.default_branch)
    }

    async fn tree(&self, owner: &str, repo: &str, reference: &str) -> Result<Vec<TreeEntry>> {
        let url = format!(
            "{}/repos/{owner}/{repo}/git/trees/{reference}?recursive=1",
            self.config.api_base_url
        );
        let parsed: TreeResponse = self.get_json(&url).await?;

        if parsed.truncated {
            return Err(Error::TreeTooLarge);
        }
        parsed.tree.ok_or(Error::EmptyTree)
    }

    async fn blob(&self, url: &str) -> Result<BlobResponse> {
        self.get_json(url).await
    }

    async fn raw_file(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
        path: &str,
    ) -> Result<String> {
        let url = format!("{}/{owner}/{repo}/{reference}/{path}", self.config.raw_base_url);
        let resp = self.get_checked(&url).await?;
        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_basics() {
        assert!(matches!(
            map_error_status(StatusCode::UNAUTHORIZED, ""),
            Error::InvalidToken
        ));
        assert!(matches!(
            map_error_status(StatusCode::NOT_FOUND, "{\"message\":\"Not Found\"}"),
            Error::RepoNotFound
        ));
        assert!(matches!(
            map_error_status(StatusCode::INTERNAL_SERVER_ERROR, ""),
            Error::Gateway(500)
        ));
    }

    #[test]
    fn forbidden_with_rate_limit_message_maps_to_rate_limit() {
        let body = r#"{"message": "API rate limit exceeded for 1.2.3.4. (But here's the good news: ...)"}"#;
        assert!(matches!(
            map_error_status(StatusCode::FORBIDDEN, body),
            Error::RateLimit
        ));
    }

    #[test]
    fn forbidden_without_rate_limit_message_stays_gateway() {
        let body = r#"{"message": "Repository access blocked"}"#;
        assert!(matches!(
            map_error_status(StatusCode::FORBIDDEN, body),
            Error::Gateway(403)
        ));

        // Unparseable body must not panic the mapping.
        assert!(matches!(
            map_error_status(StatusCode::FORBIDDEN, "<html>nope</html>"),
            Error::Gateway(403)
        ));
    }

    #[test]
    fn malformed_success_body_maps_to_json_error() {
        // A captive portal or proxy can answer 200 with HTML.
        let err = decode_json::<TreeResponse>("<html>offline</html>").unwrap_err();
        assert!(matches!(err, Error::Json(_)));

        let parsed: TreeResponse =
            decode_json(r#"{"sha":"abc","truncated":false,"tree":[]}"#).unwrap();
        assert!(!parsed.truncated);
    }
}
