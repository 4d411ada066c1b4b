use crate::dom::HtmlDocument;
use crate::errors::{Result, SelectorError};
use crate::types::Dialect;
use crate::{Document, ResolverConfig};
use scraper::ElementRef;

/// Fixture helpers shared by unit and integration tests.
pub struct TestHelper;

impl TestHelper {
    pub fn parse(html: &str) -> HtmlDocument {
        HtmlDocument::parse(html)
    }

    /// First element matching `css`.
    pub fn element<'a>(doc: &'a HtmlDocument, css: &str) -> Result<ElementRef<'a>> {
        doc.select_first(css)?
            .ok_or_else(|| SelectorError::NoElementsFound {
                selector: css.to_string(),
            })
    }

    pub fn elements<'a>(doc: &'a HtmlDocument, css: &str) -> Result<Vec<ElementRef<'a>>> {
        doc.select_all(css)
    }

    /// Whether `selector` matches exactly `target` and nothing else.
    pub fn matches_only(
        doc: &HtmlDocument,
        selector: &str,
        dialect: Dialect,
        target: &ElementRef<'_>,
    ) -> bool {
        match doc.query(selector, dialect) {
            Ok(found) => found.len() == 1 && found[0] == *target,
            Err(_) => false,
        }
    }

    pub fn css_config() -> ResolverConfig {
        ResolverConfig::default().with_dialect(Dialect::Css)
    }

    pub fn xpath_config() -> ResolverConfig {
        ResolverConfig::default().with_dialect(Dialect::Xpath)
    }
}
