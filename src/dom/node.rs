use crate::errors::Result;
use crate::types::Dialect;
use std::fmt::Debug;

/// One entry of a node's `childNodes` list.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildNode<N> {
    Element(N),
    Text(String),
    Other,
}

/// Minimal read-only view of an element in a host tree.
///
/// Handles are cheap to clone and compare by node identity, so two handles
/// are equal only when they point at the same element of the same tree.
/// The engine never mutates the tree through this trait.
pub trait DomNode: Clone + PartialEq + Debug {
    /// Lowercased tag name.
    fn tag_name(&self) -> String;

    /// Tag name as the host spells it. Differs from [`tag_name`](Self::tag_name)
    /// for foreign elements such as SVG `clipPath`.
    fn local_name(&self) -> String {
        self.tag_name()
    }

    fn attribute(&self, name: &str) -> Option<String>;

    fn class_list(&self) -> Vec<String>;

    fn child_nodes(&self) -> Vec<ChildNode<Self>>;

    fn parent_element(&self) -> Option<Self>;

    /// Element children in document order.
    fn children(&self) -> Vec<Self> {
        self.child_nodes()
            .into_iter()
            .filter_map(|child| match child {
                ChildNode::Element(node) => Some(node),
                _ => None,
            })
            .collect()
    }

    /// Element children of the parent, including `self`. A parentless node
    /// is its own only sibling.
    fn siblings(&self) -> Vec<Self> {
        match self.parent_element() {
            Some(parent) => parent.children(),
            None => vec![self.clone()],
        }
    }
}

/// A document that selectors are resolved against.
pub trait Document {
    type Node: DomNode;

    fn root_element(&self) -> Option<Self::Node>;

    fn query_css(&self, selector: &str) -> Result<Vec<Self::Node>>;

    fn query_xpath(&self, expression: &str) -> Result<Vec<Self::Node>> {
        crate::dom::xpath::evaluate(self.root_element(), expression)
    }

    fn query(&self, selector: &str, dialect: Dialect) -> Result<Vec<Self::Node>> {
        match dialect {
            Dialect::Css => self.query_css(selector),
            Dialect::Xpath => self.query_xpath(selector),
        }
    }

    /// Whether `node` is still reachable from this document's root.
    fn contains(&self, node: &Self::Node) -> bool {
        let Some(root) = self.root_element() else {
            return false;
        };
        let mut current = node.clone();
        while let Some(parent) = current.parent_element() {
            current = parent;
        }
        current == root
    }
}
