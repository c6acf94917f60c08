use crate::Result;
use crate::issues::github::RetryPolicy;
use crate::issues::{LabelRules, RepoSpec};
use crate::triage::{AreaOrder, GaMilestoneRule, TriageOptions};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use core::time::Duration;
use ohno::{EnrichableExt, IntoAppError, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File looked up in the current directory when no configuration path is given.
pub const DEFAULT_CONFIG_FILE: &str = "slicer.toml";

const MAX_PAGE_SIZE: u8 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub download: DownloadConfig,
    pub labels: LabelConfig,
    pub triage: TriageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownloadConfig {
    pub repositories: Vec<RepoSpec>,
    pub output: Utf8PathBuf,
    pub endpoint: Url,
    pub page_size: u8,
    pub max_consecutive_failures: u32,

    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,

    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            repositories: vec![RepoSpec::new("dotnet", "maui")],
            output: Utf8PathBuf::from("issues.csv"),
            endpoint: default_endpoint(),
            page_size: MAX_PAGE_SIZE,
            max_consecutive_failures: 25,
            retry_delay: Duration::from_secs(5),
            request_timeout: Duration::from_secs(60),
        }
    }
}

fn default_endpoint() -> Url {
    Url::parse("https://api.github.com/graphql").expect("default endpoint should be a valid URL")
}

impl DownloadConfig {
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_consecutive_failures: self.max_consecutive_failures,
            delay: self.retry_delay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    pub area_pattern: String,
    pub bug: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            area_pattern: "^area/".to_string(),
            bug: "t/bug".to_string(),
        }
    }
}

impl LabelConfig {
    pub fn rules(&self) -> Result<LabelRules> {
        LabelRules::new(&self.area_pattern, self.bug.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TriageConfig {
    pub start_date: NaiveDate,

    /// Ignore `start_date` and begin at the day the oldest issue was created.
    pub start_at_oldest_issue: bool,
    pub target_milestones: Vec<String>,
    pub ga_milestone_prefix: String,
    pub ga_milestone_exclusions: Vec<String>,
    pub future_milestones: Vec<String>,
    pub category_labels: Vec<String>,
    pub case_insensitive_area_order: bool,
    pub max_console_areas: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2021, 6, 1).expect("default start date should be a valid date"),
            start_at_oldest_issue: false,
            target_milestones: Vec::new(),
            ga_milestone_prefix: "6.0".to_string(),
            ga_milestone_exclusions: vec!["servicing".to_string()],
            future_milestones: vec![".NET 7".to_string(), "Future".to_string()],
            category_labels: Vec::new(),
            case_insensitive_area_order: false,
            max_console_areas: 20,
        }
    }
}

impl TriageConfig {
    #[must_use]
    pub fn options(&self) -> TriageOptions {
        TriageOptions {
            start_date: (!self.start_at_oldest_issue).then_some(self.start_date),
            target_milestones: self.target_milestones.clone(),
            ga_milestones: (!self.ga_milestone_prefix.is_empty())
                .then(|| GaMilestoneRule::new(&self.ga_milestone_prefix, &self.ga_milestone_exclusions)),
            future_milestones: self.future_milestones.clone(),
            category_labels: self.category_labels.clone(),
            area_order: if self.case_insensitive_area_order {
                AreaOrder::CaseInsensitive
            } else {
                AreaOrder::CaseSensitive
            },
        }
    }
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// An explicitly named file must exist. Without a name, `slicer.toml` in the current
    /// directory is used when present.
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = Utf8PathBuf::from(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // No config file found, use defaults
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        Self::parse(&text).map_err(|e| e.enrich_with(|| format!("parsing configuration file '{final_path}'")))
    }

    /// Parse and validate configuration text.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let download = &self.download;
        if !(1..=MAX_PAGE_SIZE).contains(&download.page_size) {
            bail!("page_size must be between 1 and {MAX_PAGE_SIZE}, got {}", download.page_size);
        }

        if download.max_consecutive_failures == 0 {
            bail!("max_consecutive_failures must be at least 1");
        }

        if self.labels.bug.is_empty() {
            bail!("the bug label must not be empty");
        }

        let _ = self.labels.rules()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_toml_matches_defaults() {
        let parsed = Config::parse(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_section() {
        let config = Config::parse(
            r#"
            [download]
            repositories = ["dotnet/runtime", "https://github.com/dotnet/aspnetcore"]
            retry_delay = "250ms"

            [triage]
            category_labels = ["t/bug", "t/enhancement"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.download.repositories,
            vec![RepoSpec::new("dotnet", "runtime"), RepoSpec::new("dotnet", "aspnetcore")]
        );
        assert_eq!(config.download.retry_delay, Duration::from_millis(250));
        assert_eq!(config.download.page_size, 100);
        assert_eq!(config.labels, LabelConfig::default());

        // keys absent from the [triage] table keep their defaults
        assert_eq!(config.triage.start_date, TriageConfig::default().start_date);
        assert!(!config.triage.start_at_oldest_issue);
        assert_eq!(config.triage.future_milestones, vec![".NET 7", "Future"]);
    }

    #[test]
    fn test_partial_triage_table_keeps_start_date() {
        let config = Config::parse("[triage]\nmax_console_areas = 5\n").unwrap();
        assert_eq!(config.triage.max_console_areas, 5);
        assert_eq!(config.triage.options().start_date, NaiveDate::from_ymd_opt(2021, 6, 1));
    }

    #[test]
    fn test_start_at_oldest_issue() {
        let config = Config::parse("[triage]\nstart_at_oldest_issue = true\n").unwrap();
        assert_eq!(config.triage.options().start_date, None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::parse("[download]\npages = 3\n").unwrap_err();
        assert!(err.to_string().contains("pages"));
    }

    #[test]
    fn test_invalid_page_size() {
        let _ = Config::parse("[download]\npage_size = 0\n").unwrap_err();
        let _ = Config::parse("[download]\npage_size = 101\n").unwrap_err();
        let _ = Config::parse("[download]\npage_size = 1\n").unwrap();
    }

    #[test]
    fn test_zero_failures_rejected() {
        let _ = Config::parse("[download]\nmax_consecutive_failures = 0\n").unwrap_err();
    }

    #[test]
    fn test_invalid_area_pattern_rejected() {
        let err = Config::parse("[labels]\narea_pattern = \"area/(\"\n").unwrap_err();
        assert!(err.to_string().contains("area label pattern"));
    }

    #[test]
    fn test_empty_bug_label_rejected() {
        let _ = Config::parse("[labels]\nbug = \"\"\n").unwrap_err();
    }

    #[test]
    fn test_invalid_repository_rejected() {
        let _ = Config::parse("[download]\nrepositories = [\"maui\"]\n").unwrap_err();
    }

    #[test]
    fn test_triage_options() {
        let options = TriageConfig::default().options();
        assert_eq!(options.start_date, NaiveDate::from_ymd_opt(2021, 6, 1));
        assert!(options.ga_milestones.as_ref().unwrap().matches("6.0.100"));
        assert_eq!(options.area_order, AreaOrder::CaseSensitive);

        let disabled = TriageConfig {
            ga_milestone_prefix: String::new(),
            case_insensitive_area_order: true,
            ..TriageConfig::default()
        };
        let options = disabled.options();
        assert!(options.ga_milestones.is_none());
        assert_eq!(options.area_order, AreaOrder::CaseInsensitive);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Utf8Path::new("/nonexistent/slicer.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading configuration file"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("custom.toml")).unwrap();
        fs::write(&path, "[labels]\nbug = \"bug\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.labels.bug, "bug");
    }

    #[test]
    fn test_save_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("slicer.toml")).unwrap();

        Config::save_default(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG_TOML);
    }

    #[test]
    fn test_retry_policy() {
        let policy = DownloadConfig::default().retry_policy();
        assert_eq!(policy, RetryPolicy::default());
    }
}
