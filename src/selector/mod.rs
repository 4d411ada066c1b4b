pub mod descriptor;
pub mod formatter;
pub mod path;
pub mod sibling;
pub mod strategy;
pub mod validator;

pub use descriptor::NodeDescriptor;
pub use formatter::{formatter_for, CssFormatter, SelectorFormatter, XpathFormatter};
pub use path::{Anchor, PathBuilder, PathChain, PathSegment};
pub use sibling::{SiblingDisambiguator, SiblingIndex, Signature};
pub use strategy::{
    resolve, resolve_with_report, Resolution, ResolutionAttempt, ResolutionMethod,
    SelectorResolver,
};
pub use validator::{validate_selector, SelectorValidator, ValidationOutcome};
