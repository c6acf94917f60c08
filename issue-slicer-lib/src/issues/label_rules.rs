use crate::Result;
use ohno::IntoAppError;
use regex::Regex;

/// Label naming conventions used to classify issues.
///
/// Repositories name their subsystem labels differently (`area/xaml`, `area-controls`, ...),
/// so the area predicate is a regular expression and the bug marker an exact label name.
#[derive(Debug, Clone)]
pub struct LabelRules {
    area: Regex,
    bug: String,
}

impl LabelRules {
    pub fn new(area_pattern: &str, bug_label: impl Into<String>) -> Result<Self> {
        let area = Regex::new(area_pattern).into_app_err_with(|| format!("invalid area label pattern '{area_pattern}'"))?;

        Ok(Self {
            area,
            bug: bug_label.into(),
        })
    }

    #[must_use]
    pub fn is_area_label(&self, label: &str) -> bool {
        self.area.is_match(label)
    }

    #[must_use]
    pub fn bug_label(&self) -> &str {
        &self.bug
    }

    /// The first label, in server order, that names an area.
    pub fn primary_area<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
        labels.into_iter().find(|label| self.is_area_label(label))
    }

    pub fn is_bug<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> bool {
        labels.into_iter().any(|label| label == self.bug)
    }
}
