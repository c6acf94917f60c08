//! GitHub GraphQL client
//!
//! Posts the issues query to a single endpoint and classifies every outcome as a page,
//! an authorization failure, or a transient failure worth retrying.

use super::query::{GraphQlRequest, GraphQlResponse, IssueConnection, RepositoryData};
use crate::issues::RepoSpec;
use core::fmt::{Display, Formatter};
use core::time::Duration;
use ohno::{AppError, app_err};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use url::Url;

const LOG_TARGET: &str = " graphql";

/// Why a page request did not produce a page.
#[derive(Debug)]
pub enum PageError {
    /// The credential was rejected (HTTP 401). Retrying cannot help.
    Unauthorized(AppError),

    /// Anything else: network trouble, a bad status, a malformed body, or GraphQL errors.
    Transient(AppError),
}

impl PageError {
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    #[must_use]
    pub fn into_inner(self) -> AppError {
        match self {
            Self::Unauthorized(e) | Self::Transient(e) => e,
        }
    }
}

impl Display for PageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unauthorized(e) => write!(f, "unauthorized: {e}"),
            Self::Transient(e) => write!(f, "{e}"),
        }
    }
}

/// A source of issue pages, one cursor step at a time.
pub trait IssuePageSource {
    fn fetch_page(&self, repo: &RepoSpec, after: Option<&str>) -> impl Future<Output = Result<IssueConnection, PageError>> + Send;
}

/// Authenticated client for the GitHub GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    client: reqwest::Client,
    endpoint: Url,
    page_size: u8,
}

impl GraphQlClient {
    pub fn new(token: &str, endpoint: Url, page_size: u8, timeout: Duration) -> crate::Result<Self> {
        let mut auth_val = HeaderValue::from_str(&format!("bearer {token}"))?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);

        let client = reqwest::Client::builder()
            .user_agent("issue-slicer")
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            page_size,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post_issues_query(&self, repo: &RepoSpec, after: Option<&str>) -> Result<IssueConnection, PageError> {
        let request = GraphQlRequest::issues(repo, after, self.page_size);

        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| PageError::Transient(app_err!("could not query issues of {repo}: {e}")))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(PageError::Unauthorized(app_err!(
                "the GitHub token was rejected while querying issues of {repo} (HTTP 401)"
            )));
        }

        if !status.is_success() {
            return Err(PageError::Transient(app_err!("querying issues of {repo} failed with HTTP {status}")));
        }

        let body: GraphQlResponse<RepositoryData> = resp
            .json()
            .await
            .map_err(|e| PageError::Transient(app_err!("malformed response while querying issues of {repo}: {e}")))?;

        if let Some(errors) = body.errors
            && !errors.is_empty()
        {
            for error in &errors {
                log::warn!(target: LOG_TARGET, "GraphQL error for {repo}: {}", error.message);
            }

            return Err(PageError::Transient(app_err!(
                "the GraphQL endpoint reported {} error(s) for {repo}",
                errors.len()
            )));
        }

        let connection = body
            .data
            .and_then(|data| data.repository)
            .map(|repository| repository.issues)
            .ok_or_else(|| PageError::Transient(app_err!("response for {repo} carries no repository data")))?;

        if connection.page_info.has_next_page && connection.page_info.end_cursor.is_none() {
            return Err(PageError::Transient(app_err!(
                "response for {repo} reports more pages but no cursor to continue from"
            )));
        }

        Ok(connection)
    }
}

impl IssuePageSource for GraphQlClient {
    fn fetch_page(&self, repo: &RepoSpec, after: Option<&str>) -> impl Future<Output = Result<IssueConnection, PageError>> + Send {
        self.post_issues_query(repo, after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_error_classification() {
        let fatal = PageError::Unauthorized(app_err!("nope"));
        let transient = PageError::Transient(app_err!("try again"));

        assert!(fatal.is_fatal());
        assert!(!transient.is_fatal());
        assert!(fatal.to_string().starts_with("unauthorized"));
        assert!(transient.into_inner().to_string().contains("try again"));
    }

    #[test]
    fn test_client_new() {
        let endpoint = Url::parse("https://api.github.com/graphql").unwrap();
        let client = GraphQlClient::new("ghp_example", endpoint.clone(), 100, Duration::from_secs(60)).unwrap();
        assert_eq!(client.endpoint(), &endpoint);
    }

    #[test]
    fn test_client_rejects_token_with_newline() {
        let endpoint = Url::parse("https://api.github.com/graphql").unwrap();
        let _ = GraphQlClient::new("bad\ntoken", endpoint, 100, Duration::from_secs(60)).unwrap_err();
    }
}
