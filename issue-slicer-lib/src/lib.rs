#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for issue-slicer
//!
//! This library consolidates all functionality for the issue-slicer tool, which downloads
//! the issues of GitHub repositories into a CSV file and slices such a file into weekly
//! and per-area triage reports.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`issues`]: Issue rows, the GraphQL download loop, and the CSV file format
//! - [`triage`]: Aggregation of issue rows into weekly and per-area tables
//! - [`reports`]: Report generation in multiple formats

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub mod issues;

pub mod triage;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
