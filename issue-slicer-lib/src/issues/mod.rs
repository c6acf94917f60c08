//! Issue data: rows, the GitHub download loop, and the issues CSV file
//!
//! This module is responsible for getting issue metadata out of GitHub and into a flat,
//! diff-friendly CSV file, and for reading such a file back for analysis.
//!
//! # Implementation Model
//!
//! The core type is [`IssueRow`], one flattened issue with its derived area and bug flags.
//!
//! Downloading is split between a [`github::GraphQlClient`], which issues one page query and
//! classifies the outcome as a page, an authorization failure, or a transient failure, and
//! the [`github::Fetcher`], which walks the cursor chain of a repository and applies the
//! retry policy. Anything implementing [`github::IssuePageSource`] can feed the fetcher.
//!
//! The [`issues_csv`] module owns the file format shared by the download and analysis
//! phases: a BOM-prefixed, fully quoted CSV sorted by creation time, repository and number.

pub mod github;
mod issue_row;
pub mod issues_csv;
mod label_rules;
mod progress;
mod repo_spec;

pub use issue_row::IssueRow;
pub use label_rules::LabelRules;
pub use progress::Progress;
pub use repo_spec::RepoSpec;
