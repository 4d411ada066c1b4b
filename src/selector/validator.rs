use crate::dom::node::Document;
use crate::errors::{Result, SelectorError};
use crate::types::Dialect;
use serde::Serialize;
use std::fmt;

/// Classification of a candidate selector against the live document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ValidationOutcome {
    /// Exactly one match, and it is the target.
    Unique,
    NoMatch,
    /// Several matches, the target among them.
    Ambiguous { matches: usize },
    /// Matches exist but none of them is the target.
    Mismatch { matches: usize },
}

impl ValidationOutcome {
    pub fn is_unique(&self) -> bool {
        matches!(self, ValidationOutcome::Unique)
    }

    pub fn into_result(self, selector: &str) -> Result<()> {
        match self {
            ValidationOutcome::Unique => Ok(()),
            ValidationOutcome::NoMatch => Err(SelectorError::NoElementsFound {
                selector: selector.to_string(),
            }),
            ValidationOutcome::Ambiguous { matches } => Err(SelectorError::AmbiguousMatch {
                selector: selector.to_string(),
                matches,
            }),
            ValidationOutcome::Mismatch { .. } => Err(SelectorError::TargetMismatch {
                selector: selector.to_string(),
            }),
        }
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationOutcome::Unique => write!(f, "unique"),
            ValidationOutcome::NoMatch => write!(f, "no match"),
            ValidationOutcome::Ambiguous { matches } => {
                write!(f, "ambiguous ({} matches)", matches)
            }
            ValidationOutcome::Mismatch { matches } => {
                write!(f, "mismatch ({} matches, target not among them)", matches)
            }
        }
    }
}

pub struct SelectorValidator<'d, D: Document> {
    document: &'d D,
}

impl<'d, D: Document> SelectorValidator<'d, D> {
    pub fn new(document: &'d D) -> Self {
        Self { document }
    }

    pub fn classify(
        &self,
        selector: &str,
        dialect: Dialect,
        target: &D::Node,
    ) -> Result<ValidationOutcome> {
        let matches = self.document.query(selector, dialect)?;
        let includes_target = matches.iter().any(|node| node == target);
        Ok(match (matches.len(), includes_target) {
            (0, _) => ValidationOutcome::NoMatch,
            (1, true) => ValidationOutcome::Unique,
            (count, true) => ValidationOutcome::Ambiguous { matches: count },
            (count, false) => ValidationOutcome::Mismatch { matches: count },
        })
    }
}

/// Checks that `selector` resolves to exactly `target` in `document`.
pub fn validate_selector<D: Document>(
    document: D,
    selector: &str,
    dialect: Dialect,
    target: &D::Node,
) -> Result<()> {
    SelectorValidator::new(&document)
        .classify(selector, dialect, target)?
        .into_result(selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHelper;

    const PAGE: &str = r#"<div><p class="a">one</p><p class="b">two</p></div><span>x</span>"#;

    #[test]
    fn test_classifies_every_outcome() {
        let doc = TestHelper::parse(PAGE);
        let first = TestHelper::element(&doc, "p.a").unwrap();
        let document = &doc;
        let validator = SelectorValidator::new(&document);

        assert_eq!(
            validator.classify("p.a", Dialect::Css, &first).unwrap(),
            ValidationOutcome::Unique
        );
        assert_eq!(
            validator.classify("p", Dialect::Css, &first).unwrap(),
            ValidationOutcome::Ambiguous { matches: 2 }
        );
        assert_eq!(
            validator.classify("p.b", Dialect::Css, &first).unwrap(),
            ValidationOutcome::Mismatch { matches: 1 }
        );
        assert_eq!(
            validator.classify("//em", Dialect::Xpath, &first).unwrap(),
            ValidationOutcome::NoMatch
        );
    }

    #[test]
    fn test_validate_selector_maps_outcomes_to_errors() {
        let doc = TestHelper::parse(PAGE);
        let first = TestHelper::element(&doc, "p.a").unwrap();

        assert!(validate_selector(&doc, r#"//p[text()="one"]"#, Dialect::Xpath, &first).is_ok());
        assert!(matches!(
            validate_selector(&doc, "//p", Dialect::Xpath, &first),
            Err(SelectorError::AmbiguousMatch { matches: 2, .. })
        ));
        assert!(matches!(
            validate_selector(&doc, "em", Dialect::Css, &first),
            Err(SelectorError::NoElementsFound { .. })
        ));
        assert!(matches!(
            validate_selector(&doc, "span", Dialect::Css, &first),
            Err(SelectorError::TargetMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_selector_is_an_error_not_an_outcome() {
        let doc = TestHelper::parse(PAGE);
        let first = TestHelper::element(&doc, "p.a").unwrap();

        assert!(matches!(
            validate_selector(&doc, "//p[", Dialect::Xpath, &first),
            Err(SelectorError::InvalidSelector(_))
        ));
    }
}
