pub mod html;
pub mod node;
pub mod xpath;

pub use html::HtmlDocument;
pub use node::{ChildNode, Document, DomNode};
