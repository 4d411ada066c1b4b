use super::descriptor::NodeDescriptor;
use super::sibling::{Signature, SiblingDisambiguator, SiblingIndex};
use crate::config::ResolverConfig;
use crate::dom::node::DomNode;
use crate::types::Preference;
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// What a chain level contributes to the rendered selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Anchor {
    /// Climbed through; renders as a wildcard (XPath) or a descendant gap (CSS).
    Ignored,
    Tag,
    Attribute { name: String, value: String },
    Text(String),
}

impl Anchor {
    /// Text outranks attributes only while the text preference is active;
    /// the target always anchors, falling back to its bare tag.
    pub fn choose(descriptor: &NodeDescriptor, preference: Preference, is_target: bool) -> Self {
        if preference == Preference::Text {
            if let Some(text) = &descriptor.direct_text {
                return Anchor::Text(text.clone());
            }
        }
        if let Some((name, value)) = &descriptor.identifying_attribute {
            return Anchor::Attribute {
                name: name.clone(),
                value: value.clone(),
            };
        }
        if descriptor.is_notable || is_target {
            Anchor::Tag
        } else {
            Anchor::Ignored
        }
    }

    pub fn is_anchored(&self) -> bool {
        !matches!(self, Anchor::Ignored)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSegment {
    pub descriptor: NodeDescriptor,
    pub anchor: Anchor,
    pub index: Option<SiblingIndex>,
}

/// Segments ordered outermost first; the last one is the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathChain {
    pub segments: Vec<PathSegment>,
    /// Whether the outermost visited node still has a parent element.
    pub can_climb: bool,
}

impl PathChain {
    pub fn depth(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    pub fn target(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl fmt::Display for PathChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .segments
            .iter()
            .map(|segment| {
                let anchor = match &segment.anchor {
                    Anchor::Ignored => "ignored".to_string(),
                    Anchor::Tag => "tag".to_string(),
                    Anchor::Attribute { name, value } => format!("@{}={:?}", name, value),
                    Anchor::Text(text) => format!("text={:?}", text),
                };
                match segment.index {
                    Some(index) => format!(
                        "{}({})#{}",
                        segment.descriptor.tag, anchor, index.among_matching
                    ),
                    None => format!("{}({})", segment.descriptor.tag, anchor),
                }
            })
            .collect();
        write!(f, "{}", parts.join(" > "))
    }
}

pub struct PathBuilder<'c> {
    config: &'c ResolverConfig,
}

impl<'c> PathBuilder<'c> {
    pub fn new(config: &'c ResolverConfig) -> Self {
        Self { config }
    }

    /// Walks `depth` levels up from `target` and describes every visited node.
    /// Returns `None` when the tree runs out of ancestors first.
    pub fn build_chain<N: DomNode>(
        &self,
        target: &N,
        depth: usize,
        preference: Preference,
    ) -> Option<PathChain> {
        let mut visited = vec![target.clone()];
        let mut current = target.clone();
        for _ in 0..depth {
            let parent = current.parent_element()?;
            visited.push(parent.clone());
            current = parent;
        }
        let can_climb = current.parent_element().is_some();

        let segments = visited
            .iter()
            .enumerate()
            .rev()
            .map(|(level, node)| self.segment(node, preference, level == 0))
            .collect();

        let chain = PathChain {
            segments,
            can_climb,
        };
        trace!(depth, %preference, chain = %chain, "built path chain");
        Some(chain)
    }

    fn segment<N: DomNode>(
        &self,
        node: &N,
        preference: Preference,
        is_target: bool,
    ) -> PathSegment {
        let descriptor = NodeDescriptor::describe(node, self.config, preference);
        let anchor = Anchor::choose(&descriptor, preference, is_target);
        let index = if anchor.is_anchored() {
            let signature = Signature::new(&descriptor, &anchor, self.config.dialect);
            SiblingDisambiguator::index_for(node, &signature)
        } else {
            None
        };
        PathSegment {
            descriptor,
            anchor,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHelper;
    use crate::types::Dialect;

    const PAGE: &str = r#"
        <div class="shell">
          <div>
            <form data-testid="login">
              <div><span>Remember me</span></div>
              <div><button></button></div>
            </form>
          </div>
        </div>
    "#;

    #[test]
    fn test_depth_zero_anchors_only_the_target() {
        let doc = TestHelper::parse(PAGE);
        let button = TestHelper::element(&doc, "button").unwrap();
        let config = ResolverConfig::default();

        let chain = PathBuilder::new(&config)
            .build_chain(&button, 0, Preference::Text)
            .unwrap();
        assert_eq!(chain.segments.len(), 1);
        assert_eq!(chain.segments[0].anchor, Anchor::Tag);
        assert!(chain.can_climb);
    }

    #[test]
    fn test_wrapper_levels_are_ignored_and_anchors_kept() {
        let doc = TestHelper::parse(PAGE);
        let button = TestHelper::element(&doc, "button").unwrap();
        let config = ResolverConfig::default();

        let chain = PathBuilder::new(&config)
            .build_chain(&button, 2, Preference::Attributes)
            .unwrap();
        let anchors: Vec<&Anchor> = chain.segments.iter().map(|s| &s.anchor).collect();
        assert_eq!(
            anchors,
            vec![
                &Anchor::Attribute {
                    name: "data-testid".to_string(),
                    value: "login".to_string()
                },
                &Anchor::Ignored,
                &Anchor::Tag,
            ]
        );
        assert_eq!(chain.depth(), 2);
        assert_eq!(chain.to_string(), r#"form(@data-testid="login") > div(ignored) > button(tag)"#);
    }

    #[test]
    fn test_text_anchors_intermediate_levels_under_text_preference() {
        let doc = TestHelper::parse(r#"<ul><li>First<i></i></li></ul><label>Name<input></label>"#);
        let input = TestHelper::element(&doc, "input").unwrap();
        let config = ResolverConfig::default().with_dialect(Dialect::Xpath);

        // label has two child nodes, so no direct text
        let chain = PathBuilder::new(&config)
            .build_chain(&input, 1, Preference::Text)
            .unwrap();
        assert_eq!(chain.segments[0].anchor, Anchor::Ignored);

        let doc = TestHelper::parse(r#"<section><h2>Billing</h2></section>"#);
        let heading = TestHelper::element(&doc, "h2").unwrap();
        let chain = PathBuilder::new(&config)
            .build_chain(&heading, 0, Preference::Text)
            .unwrap();
        assert_eq!(chain.segments[0].anchor, Anchor::Text("Billing".to_string()));
    }

    #[test]
    fn test_climbing_past_the_root_returns_none() {
        let doc = TestHelper::parse("<p>hi</p>");
        let p = TestHelper::element(&doc, "p").unwrap();
        let config = ResolverConfig::default();
        let builder = PathBuilder::new(&config);

        // p -> body -> html
        let top = builder.build_chain(&p, 2, Preference::Attributes).unwrap();
        assert!(!top.can_climb);
        assert!(builder.build_chain(&p, 3, Preference::Attributes).is_none());
    }

    #[test]
    fn test_anchored_levels_carry_sibling_indexes() {
        let doc = TestHelper::parse("<nav><a>x</a><a>x</a></nav>");
        let second = TestHelper::element(&doc, "a:nth-child(2)").unwrap();
        let config = ResolverConfig::default();

        let chain = PathBuilder::new(&config)
            .build_chain(&second, 0, Preference::Text)
            .unwrap();
        let index = chain.segments[0].index.unwrap();
        assert_eq!(index.among_matching, 2);
    }
}
