use crate::errors::{Result, SelectorError};
use crate::types::{Dialect, Preference};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one `resolve` call. Immutable for the duration of the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    /// Most-preferred first; the first non-empty value on a node wins.
    pub identifying_attributes: Vec<String>,
    pub notable_tags: Vec<String>,
    pub preference_order: Vec<Preference>,
    pub dialect: Dialect,
    /// Treat UUIDs, framework ids and hashed class names as absent.
    pub skip_generated_values: bool,
    /// Accept a zero-match selector when the target is no longer attached to the document.
    pub accept_detached_match: bool,
    /// Upper bound on ancestor levels climbed above the target.
    pub max_depth: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            identifying_attributes: vec![
                "data-testid".to_string(),
                "id".to_string(),
                "href".to_string(),
            ],
            notable_tags: vec![
                "a".to_string(),
                "button".to_string(),
                "form".to_string(),
                "input".to_string(),
            ],
            preference_order: vec![Preference::Text, Preference::Attributes],
            dialect: Dialect::default(),
            skip_generated_values: true,
            accept_detached_match: false,
            max_depth: None,
        }
    }
}

impl ResolverConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ResolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.preference_order.is_empty() {
            return Err(SelectorError::InvalidConfig(
                "preferenceOrder must name at least one strategy".to_string(),
            ));
        }
        if let Some(name) = self.identifying_attributes.iter().find(|a| a.trim().is_empty()) {
            return Err(SelectorError::InvalidConfig(format!(
                "identifyingAttributes contains a blank name: {:?}",
                name
            )));
        }
        if let Some(tag) = self.notable_tags.iter().find(|t| t.trim().is_empty()) {
            return Err(SelectorError::InvalidConfig(format!(
                "notableTags contains a blank tag: {:?}",
                tag
            )));
        }
        Ok(())
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_identifying_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifying_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_notable_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notable_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_preference_order(mut self, order: Vec<Preference>) -> Self {
        self.preference_order = order;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn is_notable(&self, tag: &str) -> bool {
        self.notable_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_camel_case_shape() {
        let config = ResolverConfig::from_json_str(
            r#"{
                "identifyingAttributes": ["data-testid", "id"],
                "notableTags": ["button"],
                "preferenceOrder": ["attributes", "text"],
                "dialect": "css"
            }"#,
        )
        .unwrap();

        assert_eq!(config.identifying_attributes, vec!["data-testid", "id"]);
        assert_eq!(config.notable_tags, vec!["button"]);
        assert_eq!(
            config.preference_order,
            vec![Preference::Attributes, Preference::Text]
        );
        assert_eq!(config.dialect, Dialect::Css);
        assert!(config.skip_generated_values);
        assert!(!config.accept_detached_match);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = ResolverConfig::from_json_str("{}").unwrap();
        assert_eq!(config.dialect, Dialect::Xpath);
        assert_eq!(config.identifying_attributes[0], "data-testid");
        assert_eq!(config.max_depth, None);
    }

    #[test]
    fn test_rejects_empty_preference_order() {
        let err = ResolverConfig::from_json_str(r#"{"preferenceOrder": []}"#).unwrap_err();
        assert!(matches!(err, SelectorError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_blank_attribute_name() {
        let err =
            ResolverConfig::from_json_str(r#"{"identifyingAttributes": ["id", " "]}"#).unwrap_err();
        assert!(matches!(err, SelectorError::InvalidConfig(_)));
    }

    #[test]
    fn test_notable_tags_compare_case_insensitively() {
        let config = ResolverConfig::default().with_notable_tags(["BUTTON"]);
        assert!(config.is_notable("button"));
        assert!(!config.is_notable("div"));
    }

    #[test]
    fn test_loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locator.json");
        std::fs::write(&path, r#"{"dialect": "css", "maxDepth": 3}"#).unwrap();

        let config = ResolverConfig::from_file(&path).unwrap();
        assert_eq!(config.dialect, Dialect::Css);
        assert_eq!(config.max_depth, Some(3));
    }
}
