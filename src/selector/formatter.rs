use super::path::{Anchor, PathChain, PathSegment};
use crate::types::Dialect;
use std::fmt::Write;

/// Renders a path chain into selector text. Performs no validation.
pub trait SelectorFormatter {
    fn dialect(&self) -> Dialect;

    /// Rendering of a single anchored level, without combinators.
    fn segment(&self, segment: &PathSegment) -> String;

    fn render(&self, chain: &PathChain) -> String;
}

pub fn formatter_for(dialect: Dialect) -> Box<dyn SelectorFormatter> {
    match dialect {
        Dialect::Xpath => Box::new(XpathFormatter),
        Dialect::Css => Box::new(CssFormatter),
    }
}

/// `//tag[@attr="v"]`, `//tag[text()="v"]`, `//tag` and `//*` steps.
pub struct XpathFormatter;

impl SelectorFormatter for XpathFormatter {
    fn dialect(&self) -> Dialect {
        Dialect::Xpath
    }

    fn segment(&self, segment: &PathSegment) -> String {
        let tag = &segment.descriptor.tag;
        let mut out = match &segment.anchor {
            Anchor::Ignored => return "*".to_string(),
            Anchor::Tag => tag.clone(),
            Anchor::Attribute { name, value } => {
                format!("{}[@{}={}]", tag, name, json_quote(value))
            }
            Anchor::Text(text) => format!("{}[text()={}]", tag, json_quote(text)),
        };
        if let Some(index) = segment.index {
            let _ = write!(out, "[{}]", index.among_matching);
        }
        out
    }

    fn render(&self, chain: &PathChain) -> String {
        chain
            .segments
            .iter()
            .map(|segment| format!("//{}", self.segment(segment)))
            .collect()
    }
}

/// `tag[attr="v"]` or `tag.class` compounds joined by `>` between adjacent
/// anchored levels and by a descendant space across ignored ones.
pub struct CssFormatter;

impl SelectorFormatter for CssFormatter {
    fn dialect(&self) -> Dialect {
        Dialect::Css
    }

    fn segment(&self, segment: &PathSegment) -> String {
        let descriptor = &segment.descriptor;
        let mut out = css_identifier(&descriptor.local_name);
        match &segment.anchor {
            Anchor::Ignored => return String::new(),
            Anchor::Attribute { name, value } => {
                let _ = write!(out, "[{}={}]", css_identifier(name), css_string(value));
            }
            Anchor::Tag | Anchor::Text(_) => {
                for class in &descriptor.classes {
                    let _ = write!(out, ".{}", css_identifier(class));
                }
            }
        }
        if let Some(index) = segment.index {
            let _ = write!(out, ":nth-child({})", index.child_position);
        }
        out
    }

    fn render(&self, chain: &PathChain) -> String {
        let mut out = String::new();
        let mut gap = false;
        for segment in &chain.segments {
            if !segment.anchor.is_anchored() {
                gap = true;
                continue;
            }
            if !out.is_empty() {
                out.push_str(if gap { " " } else { " > " });
            }
            out.push_str(&self.segment(segment));
            gap = false;
        }
        out
    }
}

fn json_quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Double-quoted CSS string with quotes, backslashes and control
/// characters escaped.
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push('\u{FFFD}'),
            c if c.is_control() => {
                let _ = write!(out, "\\{:x} ", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escapes an identifier the way `CSS.escape` does.
pub fn css_identifier(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    if chars == ['-'] {
        return "\\-".to_string();
    }
    let mut out = String::with_capacity(ident.len());
    for (i, &c) in chars.iter().enumerate() {
        let leading_digit = c.is_ascii_digit() && (i == 0 || (i == 1 && chars[0] == '-'));
        match c {
            '\0' => out.push('\u{FFFD}'),
            c if ('\u{1}'..='\u{1f}').contains(&c) || c == '\u{7f}' || leading_digit => {
                let _ = write!(out, "\\{:x} ", c as u32);
            }
            c if c as u32 >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() => {
                out.push(c)
            }
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::descriptor::NodeDescriptor;
    use crate::selector::sibling::SiblingIndex;

    fn segment(tag: &str, anchor: Anchor, classes: &[&str], index: Option<usize>) -> PathSegment {
        PathSegment {
            descriptor: NodeDescriptor {
                tag: tag.to_ascii_lowercase(),
                local_name: tag.to_string(),
                is_notable: false,
                identifying_attribute: None,
                direct_text: None,
                classes: classes.iter().map(|c| c.to_string()).collect(),
            },
            anchor,
            index: index.map(|n| SiblingIndex {
                among_matching: n,
                child_position: n + 1,
            }),
        }
    }

    fn chain(segments: Vec<PathSegment>) -> PathChain {
        PathChain {
            segments,
            can_climb: true,
        }
    }

    fn testid(value: &str) -> Anchor {
        Anchor::Attribute {
            name: "data-testid".to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_xpath_renders_each_anchor_kind() {
        let rendered = XpathFormatter.render(&chain(vec![
            segment("form", testid("login"), &[], None),
            segment("div", Anchor::Ignored, &[], None),
            segment("li", Anchor::Text("Save".to_string()), &[], Some(2)),
            segment("button", Anchor::Tag, &[], None),
        ]));
        assert_eq!(
            rendered,
            r#"//form[@data-testid="login"]//*//li[text()="Save"][2]//button"#
        );
    }

    #[test]
    fn test_xpath_values_are_json_quoted() {
        let quoted = segment("div", testid("a\"b"), &[], None);
        let rendered = XpathFormatter.render(&chain(vec![quoted]));
        assert_eq!(rendered, r#"//div[@data-testid="a\"b"]"#);
    }

    #[test]
    fn test_css_keeps_host_spelling_of_foreign_tags() {
        let clip = || segment("clipPath", Anchor::Tag, &[], None);
        assert_eq!(CssFormatter.render(&chain(vec![clip()])), "clipPath");
        assert_eq!(XpathFormatter.render(&chain(vec![clip()])), "//clippath");
    }

    #[test]
    fn test_css_joins_adjacent_levels_with_child_combinator() {
        let rendered = CssFormatter.render(&chain(vec![
            segment("section", testid("left"), &[], None),
            segment("ul", Anchor::Tag, &["menu"], None),
            segment("li", Anchor::Tag, &[], Some(1)),
        ]));
        assert_eq!(rendered, r#"section[data-testid="left"] > ul.menu > li:nth-child(2)"#);
    }

    #[test]
    fn test_css_ignored_levels_become_descendant_gaps() {
        let rendered = CssFormatter.render(&chain(vec![
            segment("html", Anchor::Ignored, &[], None),
            segment("form", testid("login"), &[], None),
            segment("div", Anchor::Ignored, &[], None),
            segment("div", Anchor::Ignored, &[], None),
            segment("button", Anchor::Tag, &["primary"], None),
        ]));
        assert_eq!(rendered, r#"form[data-testid="login"] button.primary"#);
    }

    #[test]
    fn test_css_escaping() {
        assert_eq!(css_string("a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(css_string("line\nbreak"), "\"line\\a break\"");
        assert_eq!(css_identifier("save-button"), "save-button");
        assert_eq!(css_identifier("1col"), "\\31 col");
        assert_eq!(css_identifier("-2x"), "-\\32 x");
        assert_eq!(css_identifier("-"), "\\-");
        assert_eq!(css_identifier("md:flex"), "md\\:flex");
    }

    #[test]
    fn test_formatter_for_dialect() {
        assert_eq!(formatter_for(Dialect::Css).dialect(), Dialect::Css);
        assert_eq!(formatter_for(Dialect::Xpath).dialect(), Dialect::Xpath);
    }
}
