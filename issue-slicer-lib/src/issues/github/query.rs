//! GraphQL query text and the response shapes it produces.

use crate::issues::{IssueRow, LabelRules, RepoSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Issues of one repository, newest first, one page at a time.
pub const ISSUES_QUERY: &str = r"query ($owner: String!, $name: String!, $afterIssue: String, $pageSize: Int!) {
  repository(owner: $owner, name: $name) {
    name
    issues(after: $afterIssue, first: $pageSize, orderBy: {field: CREATED_AT, direction: DESC}) {
      nodes {
        number
        title
        createdAt
        closedAt
        milestone {
          title
        }
        labels(first: 10) {
          nodes {
            name
          }
          totalCount
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
      totalCount
    }
  }
}
";

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'static str,
    pub variables: IssueQueryVariables<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueQueryVariables<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub after_issue: Option<&'a str>,
    pub page_size: u8,
}

impl<'a> GraphQlRequest<'a> {
    #[must_use]
    pub fn issues(repo: &'a RepoSpec, after: Option<&'a str>, page_size: u8) -> Self {
        Self {
            query: ISSUES_QUERY,
            variables: IssueQueryVariables {
                owner: repo.owner(),
                name: repo.repo(),
                after_issue: after,
                page_size,
            },
        }
    }
}

/// Envelope of every GraphQL response: data and/or application-level errors.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryNode {
    pub issues: IssueConnection,
}

/// One page of issues.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueConnection {
    #[serde(default)]
    pub nodes: Vec<IssueNode>,
    pub page_info: PageInfo,
    pub total_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueNode {
    pub number: u64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub milestone: Option<Milestone>,
    pub labels: Option<LabelConnection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Milestone {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelConnection {
    #[serde(default)]
    pub nodes: Vec<LabelNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelNode {
    pub name: String,
}

impl IssueNode {
    /// Flatten the node into a row, deriving the primary area and bug flag from its labels.
    #[must_use]
    pub fn into_row(self, repository: Arc<str>, rules: &LabelRules) -> IssueRow {
        let labels: Vec<String> = self
            .labels
            .map(|connection| connection.nodes.into_iter().map(|label| label.name).collect())
            .unwrap_or_default();

        let primary_area = rules.primary_area(labels.iter().map(String::as_str)).map(str::to_string);
        let is_bug = rules.is_bug(labels.iter().map(String::as_str));

        IssueRow {
            repository,
            number: self.number,
            title: self.title,
            created_at: self.created_at,
            closed_at: self.closed_at,
            milestone: self.milestone.map(|m| m.title).filter(|title| !title.is_empty()),
            primary_area,
            is_bug,
            labels,
        }
    }
}
