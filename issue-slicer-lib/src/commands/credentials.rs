//! GitHub token lookup.

use crate::Result;
use directories::BaseDirs;
use ohno::{IntoAppError, bail};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "   secrets";

const SECRETS_FILE: &str = "secrets.toml";

#[derive(Debug, Deserialize)]
struct Secrets {
    github_token: Option<String>,
}

/// Location of the per-user secrets file, when the platform has a config directory.
#[must_use]
pub fn default_secrets_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join("issue-slicer").join(SECRETS_FILE))
}

/// Pick the token to authenticate with.
///
/// An explicit token (the command line or the `GITHUB_TOKEN` variable) wins over the secrets file.
pub fn resolve_token(explicit: Option<&str>, secrets_path: Option<&Path>) -> Result<String> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    if let Some(path) = secrets_path
        && let Some(token) = read_secrets(path)?
    {
        log::debug!(target: LOG_TARGET, "Using the GitHub token from '{}'", path.display());
        return Ok(token);
    }

    let location = secrets_path.map_or_else(|| "the secrets file".to_string(), |p| format!("'{}'", p.display()));
    bail!("no GitHub token found: pass --github-token, set GITHUB_TOKEN, or add github_token to {location}")
}

fn read_secrets(path: &Path) -> Result<Option<String>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).into_app_err_with(|| format!("reading secrets file '{}'", path.display())),
    };

    let secrets: Secrets = toml::from_str(&text).into_app_err_with(|| format!("parsing secrets file '{}'", path.display()))?;
    Ok(secrets.github_token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()))
}
