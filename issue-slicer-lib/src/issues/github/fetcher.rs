use super::client::{IssuePageSource, PageError};
use crate::Result;
use crate::issues::{IssueRow, LabelRules, Progress, RepoSpec};
use core::fmt::{Debug, Formatter};
use core::time::Duration;
use std::sync::Arc;

const LOG_TARGET: &str = "   fetcher";

/// How hard to push on a page that keeps failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of consecutive failed attempts after which a repository is abandoned.
    pub max_consecutive_failures: u32,

    /// Fixed wait between a failed attempt and its retry.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_failures: 25,
            delay: Duration::from_secs(5),
        }
    }
}

/// What happened while downloading one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub repo: RepoSpec,
    pub fetched: u64,

    /// Total issue count reported by the server with the first page.
    pub total_count: Option<u64>,
    pub pages: u64,
    pub abandoned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchState {
    Fetching { failures: u32 },
    Backoff { failures: u32 },
    Abandoned,
    Done,
}

/// Walks the cursor chain of a repository's issues, retrying transient failures.
pub struct Fetcher<'a, S> {
    source: &'a S,
    rules: &'a LabelRules,
    policy: RetryPolicy,
    progress: &'a dyn Progress,
}

impl<S> Debug for Fetcher<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Fetcher")
            .field("rules", &self.rules)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<'a, S: IssuePageSource> Fetcher<'a, S> {
    pub fn new(source: &'a S, rules: &'a LabelRules, policy: RetryPolicy, progress: &'a dyn Progress) -> Self {
        Self {
            source,
            rules,
            policy,
            progress,
        }
    }

    /// Append every issue of `repo` to `sink`.
    ///
    /// Rows already appended stay in `sink` whatever the outcome, so a caller can still
    /// persist a partial download after an error. Pagination that keeps failing is
    /// abandoned and reported through [`FetchSummary::abandoned`]; only a rejected
    /// credential produces an error.
    pub async fn fetch_repository(&self, repo: &RepoSpec, sink: &mut Vec<IssueRow>) -> Result<FetchSummary> {
        let repository = repo.repo_arc();
        let mut summary = FetchSummary {
            repo: repo.clone(),
            fetched: 0,
            total_count: None,
            pages: 0,
            abandoned: false,
        };

        self.progress.set_phase(repo.repo());
        log::info!(target: LOG_TARGET, "Downloading issues of {repo}");

        let mut cursor: Option<String> = None;
        let mut state = FetchState::Fetching { failures: 0 };

        loop {
            state = match state {
                FetchState::Fetching { failures } => match self.source.fetch_page(repo, cursor.as_deref()).await {
                    Ok(page) => {
                        let total = *summary.total_count.get_or_insert(page.total_count);
                        summary.pages += 1;

                        for node in page.nodes {
                            sink.push(node.into_row(Arc::clone(&repository), self.rules));
                            summary.fetched += 1;
                        }

                        log::info!(target: LOG_TARGET, "Processing {}/{total}...", summary.fetched);
                        self.progress.set_position(summary.fetched, total);

                        if page.page_info.has_next_page {
                            cursor = page.page_info.end_cursor;
                            FetchState::Fetching { failures: 0 }
                        } else {
                            FetchState::Done
                        }
                    }

                    Err(PageError::Unauthorized(e)) => {
                        log::error!(target: LOG_TARGET, "Giving up on {repo}: {e}");
                        return Err(e);
                    }

                    Err(PageError::Transient(e)) => {
                        let failures = failures + 1;
                        log::warn!(
                            target: LOG_TARGET,
                            "Page request for {repo} failed ({failures}/{}): {e}",
                            self.policy.max_consecutive_failures
                        );

                        if failures >= self.policy.max_consecutive_failures {
                            FetchState::Abandoned
                        } else {
                            FetchState::Backoff { failures }
                        }
                    }
                },

                FetchState::Backoff { failures } => {
                    log::debug!(target: LOG_TARGET, "Retrying in {:?}", self.policy.delay);
                    tokio::time::sleep(self.policy.delay).await;
                    FetchState::Fetching { failures }
                }

                FetchState::Abandoned => {
                    let message = format!(
                        "Abandoning {repo} after {} consecutive failures, keeping {} issues",
                        self.policy.max_consecutive_failures, summary.fetched
                    );
                    log::error!(target: LOG_TARGET, "{message}");
                    self.progress.println(&message);
                    summary.abandoned = true;
                    break;
                }

                FetchState::Done => break,
            };
        }

        if let Some(total) = summary.total_count
            && !summary.abandoned
            && total != summary.fetched
        {
            log::debug!(target: LOG_TARGET, "Server reported {total} issues for {repo} but {} were downloaded", summary.fetched);
        }

        Ok(summary)
    }
}
