pub mod config;
pub mod dom;
pub mod errors;
pub mod selector;
pub mod testing;
pub mod types;

pub use config::ResolverConfig;
pub use dom::{ChildNode, Document, DomNode, HtmlDocument};
pub use errors::{Result, SelectorError};
pub use selector::{resolve, resolve_with_report, validate_selector, Resolution};
pub use types::*;
