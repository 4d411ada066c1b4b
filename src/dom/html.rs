use crate::dom::node::{ChildNode, Document, DomNode};
use crate::errors::{Result, SelectorError};
use scraper::{ElementRef, Html, Node, Selector};

/// A parsed HTML page, queryable with CSS (via `scraper`) and XPath.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(html_content: &str) -> Self {
        Self {
            html: Html::parse_document(html_content),
        }
    }

    pub fn root(&self) -> Option<ElementRef<'_>> {
        Some(self.html.root_element())
    }

    pub fn select_all(&self, css: &str) -> Result<Vec<ElementRef<'_>>> {
        let selector = parse_css(css)?;
        Ok(self.html.select(&selector).collect())
    }

    pub fn select_first(&self, css: &str) -> Result<Option<ElementRef<'_>>> {
        let selector = parse_css(css)?;
        let first = self.html.select(&selector).next();
        Ok(first)
    }
}

fn parse_css(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| SelectorError::InvalidSelector(format!("{}: {:?}", css, e)))
}

impl<'a> DomNode for ElementRef<'a> {
    fn tag_name(&self) -> String {
        self.value().name().to_ascii_lowercase()
    }

    fn local_name(&self) -> String {
        self.value().name().to_string()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }

    fn class_list(&self) -> Vec<String> {
        self.value().classes().map(str::to_string).collect()
    }

    fn child_nodes(&self) -> Vec<ChildNode<Self>> {
        (**self)
            .children()
            .map(|child| match child.value() {
                Node::Element(_) => ElementRef::wrap(child)
                    .map(ChildNode::Element)
                    .unwrap_or(ChildNode::Other),
                Node::Text(text) => {
                    let content: &str = text;
                    ChildNode::Text(content.to_string())
                }
                _ => ChildNode::Other,
            })
            .collect()
    }

    fn parent_element(&self) -> Option<Self> {
        (**self).parent().and_then(ElementRef::wrap)
    }
}

impl<'a> Document for &'a HtmlDocument {
    type Node = ElementRef<'a>;

    fn root_element(&self) -> Option<ElementRef<'a>> {
        let document: &'a HtmlDocument = *self;
        document.root()
    }

    fn query_css(&self, selector: &str) -> Result<Vec<ElementRef<'a>>> {
        let document: &'a HtmlDocument = *self;
        document.select_all(selector)
    }
}
