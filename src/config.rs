//! Engine configuration.
//!
//! Which rows to hide, where to find their list, and which pages the script
//! runs on. Deserializable from JSON so a host can ship its own policy.

use std::collections::BTreeSet;

use page::MatchPattern;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Marker attribute caching a list's inferred row height.
pub const DEFAULT_ROW_HEIGHT_ATTR: &str = "data-tm-row-height";

/// Accessible label of the section holding the user's own calendars.
pub const DEFAULT_SECTION_LABEL: &str = "My calendars";

pub const DEFAULT_MATCH: &str = "https://calendar.google.com/*";

/// How the target list is located in the host tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListLocator {
    /// `[role="list"][aria-label="<label>"]`.
    Section { label: String },
    /// Inside every `[aria-hidden="false"][data-collapsed="false"]` group,
    /// the nearest `[role="list"]` around an element whose trimmed text is a
    /// hidden label.
    ExpandedGroups,
}

impl ListLocator {
    pub fn watches_groups(&self) -> bool {
        matches!(self, ListLocator::ExpandedGroups)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Userscript `@match` patterns.
    pub matches: Vec<String>,
    /// Row labels to remove.
    pub hidden_labels: BTreeSet<String>,
    pub locator: ListLocator,
    pub row_height_attr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matches: vec![DEFAULT_MATCH.to_string()],
            hidden_labels: ["Birthdays", "Tasks"].into_iter().map(String::from).collect(),
            locator: ListLocator::Section {
                label: DEFAULT_SECTION_LABEL.to_string(),
            },
            row_height_attr: DEFAULT_ROW_HEIGHT_ATTR.to_string(),
        }
    }
}

impl Config {
    /// Preset that scans every expanded group for the "Birthdays" row.
    pub fn birthdays_only() -> Self {
        Self {
            hidden_labels: BTreeSet::from(["Birthdays".to_string()]),
            locator: ListLocator::ExpandedGroups,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hidden_labels.iter().all(|l| l.trim().is_empty()) {
            return Err(ConfigError::EmptyHiddenLabels);
        }
        self.match_patterns()?;
        if let ListLocator::Section { label } = &self.locator {
            if label.trim().is_empty() {
                return Err(ConfigError::EmptySectionLabel);
            }
        }
        if self.row_height_attr.trim().is_empty() {
            return Err(ConfigError::EmptyMarkerAttr);
        }
        Ok(())
    }

    /// Parsed `matches`.
    pub fn match_patterns(&self) -> Result<Vec<MatchPattern>, ConfigError> {
        if self.matches.is_empty() {
            return Err(ConfigError::EmptyMatches);
        }
        self.matches
            .iter()
            .map(|m| MatchPattern::parse(m).map_err(ConfigError::from))
            .collect()
    }

    /// `true` if `label` (trimmed) is one of the hidden labels.
    pub fn hides(&self, label: &str) -> bool {
        self.hidden_labels.contains(label.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hides_birthdays_and_tasks() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.hides(" Birthdays "));
        assert!(config.hides("Tasks"));
        assert!(!config.hides("Work"));
    }

    #[test]
    fn json_overrides_and_defaults() {
        let config = Config::from_json(
            r#"{"hidden_labels": ["Holidays in Germany"], "locator": {"kind": "section", "label": "Other calendars"}}"#,
        )
        .unwrap();
        assert!(config.hides("Holidays in Germany"));
        assert!(!config.hides("Birthdays"));
        assert_eq!(config.matches, vec![DEFAULT_MATCH.to_string()]);
        assert_eq!(config.row_height_attr, DEFAULT_ROW_HEIGHT_ATTR);
    }

    #[test]
    fn expanded_groups_locator_from_json() {
        let config = Config::from_json(r#"{"locator": {"kind": "expanded_groups"}}"#).unwrap();
        assert!(config.locator.watches_groups());
    }

    #[test]
    fn rejects_bad_configs() {
        assert!(matches!(
            Config::from_json(r#"{"hidden_labels": []}"#),
            Err(ConfigError::EmptyHiddenLabels)
        ));
        assert!(matches!(
            Config::from_json(r#"{"matches": []}"#),
            Err(ConfigError::EmptyMatches)
        ));
        assert!(matches!(
            Config::from_json(r#"{"matches": ["calendar.google.com"]}"#),
            Err(ConfigError::InvalidMatch(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"locator": {"kind": "section", "label": " "}}"#),
            Err(ConfigError::EmptySectionLabel)
        ));
        assert!(matches!(
            Config::from_json(r#"{"unknown": 1}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn birthdays_preset() {
        let config = Config::birthdays_only();
        assert!(config.validate().is_ok());
        assert!(config.hides("Birthdays"));
        assert!(!config.hides("Tasks"));
    }
}
