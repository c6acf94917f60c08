//! Downloading issues through the GitHub GraphQL API.

mod client;
mod fetcher;
mod query;

pub use client::{GraphQlClient, IssuePageSource, PageError};
pub use fetcher::{FetchSummary, Fetcher, RetryPolicy};
pub use query::{IssueConnection, IssueNode, LabelConnection, LabelNode, Milestone, PageInfo};
