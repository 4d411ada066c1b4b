use super::descriptor::NodeDescriptor;
use super::path::Anchor;
use crate::dom::node::{ChildNode, DomNode};
use crate::types::Dialect;
use serde::Serialize;

/// Position of an anchored node among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SiblingIndex {
    /// 1-based index among siblings matched by the same fragment (XPath `[n]`).
    pub among_matching: usize,
    /// 1-based index among all element siblings (CSS `:nth-child(n)`).
    pub child_position: usize,
}

/// The part of a rendered fragment that decides which siblings it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    tag: String,
    attribute: Option<(String, String)>,
    text: Option<String>,
    classes: Vec<String>,
}

impl Signature {
    pub fn new(descriptor: &NodeDescriptor, anchor: &Anchor, dialect: Dialect) -> Self {
        let (attribute, text) = match anchor {
            Anchor::Attribute { name, value } => (Some((name.clone(), value.clone())), None),
            Anchor::Text(text) if dialect == Dialect::Xpath => (None, Some(text.clone())),
            _ => (None, None),
        };
        let classes = if dialect == Dialect::Css && attribute.is_none() {
            descriptor.classes.clone()
        } else {
            Vec::new()
        };
        Self {
            tag: descriptor.tag.clone(),
            attribute,
            text,
            classes,
        }
    }

    /// Whether the fragment this signature renders to would select `node`.
    pub fn matches<N: DomNode>(&self, node: &N) -> bool {
        if node.tag_name() != self.tag {
            return false;
        }
        if let Some((name, value)) = &self.attribute {
            if node.attribute(name).as_deref() != Some(value.as_str()) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let has_text = node
                .child_nodes()
                .iter()
                .any(|child| matches!(child, ChildNode::Text(t) if t == text));
            if !has_text {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let own = node.class_list();
            if !self.classes.iter().all(|class| own.contains(class)) {
                return false;
            }
        }
        true
    }
}

/// Decides whether a fragment needs a positional suffix to tell a node
/// apart from its siblings. Reads the live tree on every call.
pub struct SiblingDisambiguator;

impl SiblingDisambiguator {
    pub fn needs_index<N: DomNode>(node: &N, signature: &Signature) -> bool {
        node.siblings()
            .iter()
            .any(|sibling| sibling != node && signature.matches(sibling))
    }

    pub fn index_among_siblings<N: DomNode>(node: &N, signature: &Signature) -> Option<usize> {
        node.siblings()
            .iter()
            .filter(|sibling| signature.matches(*sibling))
            .position(|sibling| sibling == node)
            .map(|i| i + 1)
    }

    pub fn child_position<N: DomNode>(node: &N) -> Option<usize> {
        node.siblings()
            .iter()
            .position(|sibling| sibling == node)
            .map(|i| i + 1)
    }

    /// Index for `node`, or `None` when its fragment is already unique
    /// among its siblings.
    pub fn index_for<N: DomNode>(node: &N, signature: &Signature) -> Option<SiblingIndex> {
        if !Self::needs_index(node, signature) {
            return None;
        }
        Some(SiblingIndex {
            among_matching: Self::index_among_siblings(node, signature)?,
            child_position: Self::child_position(node)?,
        })
    }
}
