use crate::config::ResolverConfig;
use crate::dom::node::{ChildNode, DomNode};
use crate::types::{Dialect, Preference};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static GENERATED_VALUE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // UUID
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
        // React useId
        r"^:r[0-9a-z]+:$",
        // content hashes
        r"(?i)^[0-9a-f]{16,}$",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

static GENERATED_CLASS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Emotion / styled-components
        r"^css-",
        // webpack module hashes
        r"^_[A-Za-z0-9]{5,}$",
        r"^theme-",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

pub fn looks_generated(value: &str) -> bool {
    GENERATED_VALUE_PATTERNS.iter().any(|re| re.is_match(value))
}

pub fn is_stable_class(class: &str) -> bool {
    !GENERATED_CLASS_PATTERNS.iter().any(|re| re.is_match(class))
}

/// Semantic summary of one element, recomputed on every resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDescriptor {
    /// Lowercased; used for notable-tag checks and sibling comparison.
    pub tag: String,
    /// Host spelling of the tag, rendered into CSS type selectors.
    pub local_name: String,
    pub is_notable: bool,
    pub identifying_attribute: Option<(String, String)>,
    pub direct_text: Option<String>,
    pub classes: Vec<String>,
}

impl NodeDescriptor {
    /// `direct_text` is filled only under the text preference, and only when
    /// the dialect can express a text predicate.
    pub fn describe<N: DomNode>(
        node: &N,
        config: &ResolverConfig,
        preference: Preference,
    ) -> Self {
        let tag = node.tag_name();
        let is_notable = config.is_notable(&tag);

        let identifying_attribute = config.identifying_attributes.iter().find_map(|name| {
            node.attribute(name)
                .filter(|value| !value.is_empty())
                .filter(|value| !(config.skip_generated_values && looks_generated(value)))
                .map(|value| (name.clone(), value))
        });

        let direct_text = if preference == Preference::Text && config.dialect == Dialect::Xpath {
            sole_text_child(node)
        } else {
            None
        };

        let classes = node
            .class_list()
            .into_iter()
            .filter(|class| !config.skip_generated_values || is_stable_class(class))
            .collect();

        Self {
            tag,
            local_name: node.local_name(),
            is_notable,
            identifying_attribute,
            direct_text,
            classes,
        }
    }

    /// Neither notable nor carrying an attribute or text to anchor on.
    pub fn is_uninformative(&self) -> bool {
        !self.is_notable && self.identifying_attribute.is_none() && self.direct_text.is_none()
    }
}

fn sole_text_child<N: DomNode>(node: &N) -> Option<String> {
    let mut children = node.child_nodes();
    if children.len() != 1 {
        return None;
    }
    match children.pop() {
        Some(ChildNode::Text(text)) if !text.trim().is_empty() => Some(text),
        _ => None,
    }
}
