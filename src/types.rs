use serde::{Deserialize, Serialize};
use std::fmt;

/// Output syntax family of a rendered selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Xpath,
    Css,
}

/// Disambiguation strategy active for one resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Text,
    Attributes,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Xpath => write!(f, "xpath"),
            Dialect::Css => write!(f, "css"),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preference::Text => write!(f, "text"),
            Preference::Attributes => write!(f, "attributes"),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xpath" => Ok(Dialect::Xpath),
            "css" => Ok(Dialect::Css),
            other => Err(format!("unknown dialect '{}'", other)),
        }
    }
}
