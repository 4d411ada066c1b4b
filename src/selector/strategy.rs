//! Backoff loop that turns a target element into a validated selector.
//!
//! Each attempt builds a chain for the current ancestor depth and preference,
//! renders it and validates it against the live document:
//!
//! ```text
//! Building -> Validating -> Success
//!                        -> Retrying -> Building   (next preference, same depth)
//!                                    -> Building   (first preference, depth + 1)
//!                                    -> Exhausted  (no parent left / depth cap)
//! ```
//!
//! Nothing is memoized between attempts; every build re-reads the tree.

use super::formatter::{formatter_for, SelectorFormatter};
use super::path::{Anchor, PathBuilder, PathChain};
use super::validator::{SelectorValidator, ValidationOutcome};
use crate::config::ResolverConfig;
use crate::dom::node::Document;
use crate::errors::{Result, SelectorError};
use crate::types::{Dialect, Preference};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// One build/render/validate round.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionAttempt {
    pub preference_index: usize,
    pub preference: Preference,
    pub depth: usize,
    pub chain: PathChain,
    pub selector: String,
    pub outcome: ValidationOutcome,
}

/// How the target level of the winning selector is anchored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResolutionMethod {
    Attribute { name: String },
    Text,
    Tag,
}

impl fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionMethod::Attribute { name } => write!(f, "{}", name),
            ResolutionMethod::Text => write!(f, "text"),
            ResolutionMethod::Tag => write!(f, "tag"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub selector: String,
    pub dialect: Dialect,
    pub method: ResolutionMethod,
    pub depth: usize,
    pub attempts: Vec<ResolutionAttempt>,
}

enum State {
    Building {
        depth: usize,
        preference_index: usize,
    },
    Validating {
        depth: usize,
        preference_index: usize,
        chain: PathChain,
        selector: String,
    },
    Retrying {
        depth: usize,
        preference_index: usize,
        can_climb: bool,
    },
    Success,
    Exhausted,
}

pub struct SelectorResolver<'c> {
    config: &'c ResolverConfig,
    formatter: Box<dyn SelectorFormatter>,
}

impl<'c> SelectorResolver<'c> {
    pub fn new(config: &'c ResolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            formatter: formatter_for(config.dialect),
        })
    }

    pub fn resolve<D: Document>(&self, document: &D, target: &D::Node) -> Result<Resolution> {
        let builder = PathBuilder::new(self.config);
        let validator = SelectorValidator::new(document);
        let preferences = &self.config.preference_order;
        let mut attempts: Vec<ResolutionAttempt> = Vec::new();
        let mut state = State::Building {
            depth: 0,
            preference_index: 0,
        };

        loop {
            state = match state {
                State::Building {
                    depth,
                    preference_index,
                } => {
                    let preference = preferences[preference_index];
                    match builder.build_chain(target, depth, preference) {
                        Some(chain) => {
                            let selector = self.formatter.render(&chain);
                            State::Validating {
                                depth,
                                preference_index,
                                chain,
                                selector,
                            }
                        }
                        None => State::Exhausted,
                    }
                }

                State::Validating {
                    depth,
                    preference_index,
                    chain,
                    selector,
                } => {
                    let outcome = validator.classify(&selector, self.config.dialect, target)?;
                    let accepted = match outcome.into_result(&selector) {
                        Ok(()) => true,
                        Err(SelectorError::NoElementsFound { .. })
                            if self.accepts_detached(document, target, &selector) =>
                        {
                            true
                        }
                        Err(err) if err.is_retryable() => {
                            debug!(
                                depth,
                                preference = %preferences[preference_index],
                                error = %err,
                                "candidate selector rejected"
                            );
                            false
                        }
                        Err(err) => return Err(err),
                    };

                    let can_climb = chain.can_climb;
                    attempts.push(ResolutionAttempt {
                        preference_index,
                        preference: preferences[preference_index],
                        depth,
                        chain,
                        selector,
                        outcome,
                    });

                    if accepted {
                        State::Success
                    } else {
                        State::Retrying {
                            depth,
                            preference_index,
                            can_climb,
                        }
                    }
                }

                State::Retrying {
                    depth,
                    preference_index,
                    can_climb,
                } => {
                    let under_cap = self.config.max_depth.map_or(true, |max| depth < max);
                    if preference_index + 1 < preferences.len() {
                        State::Building {
                            depth,
                            preference_index: preference_index + 1,
                        }
                    } else if can_climb && under_cap {
                        State::Building {
                            depth: depth + 1,
                            preference_index: 0,
                        }
                    } else {
                        State::Exhausted
                    }
                }

                State::Success => return Ok(self.finish(attempts)),

                State::Exhausted => return Err(self.exhausted(attempts)),
            };
        }
    }

    /// Zero matches count as success only for a target that has left the
    /// document, and only when configured.
    fn accepts_detached<D: Document>(
        &self,
        document: &D,
        target: &D::Node,
        selector: &str,
    ) -> bool {
        if !self.config.accept_detached_match || document.contains(target) {
            return false;
        }
        warn!(
            selector = %selector,
            "target is detached from the document, accepting selector with no matches"
        );
        true
    }

    fn finish(&self, attempts: Vec<ResolutionAttempt>) -> Resolution {
        let (selector, depth, method) = match attempts.last() {
            Some(last) => (
                last.selector.clone(),
                last.depth,
                last.chain
                    .target()
                    .map(|segment| method_of(&segment.anchor))
                    .unwrap_or(ResolutionMethod::Tag),
            ),
            None => (String::new(), 0, ResolutionMethod::Tag),
        };
        info!(
            selector = %selector,
            method = %method,
            depth,
            attempts = attempts.len(),
            "resolved selector"
        );
        Resolution {
            selector,
            dialect: self.config.dialect,
            method,
            depth,
            attempts,
        }
    }

    fn exhausted(&self, attempts: Vec<ResolutionAttempt>) -> SelectorError {
        let last = attempts.last();
        let chain = last.map(|a| a.chain.to_string()).unwrap_or_default();
        let last_selector = last.map(|a| a.selector.clone());
        let last_outcome = last.map(|a| a.outcome);
        warn!(
            chain = %chain,
            last_selector = ?last_selector,
            last_outcome = ?last_outcome,
            attempts = attempts.len(),
            "no good selector found"
        );
        SelectorError::Exhausted {
            chain,
            last_selector,
            last_outcome,
            attempts: attempts.len(),
        }
    }
}

fn method_of(anchor: &Anchor) -> ResolutionMethod {
    match anchor {
        Anchor::Attribute { name, .. } => ResolutionMethod::Attribute { name: name.clone() },
        Anchor::Text(_) => ResolutionMethod::Text,
        Anchor::Tag | Anchor::Ignored => ResolutionMethod::Tag,
    }
}

/// Resolves `target` to a selector string in the configured dialect.
pub fn resolve<D: Document>(
    document: D,
    target: &D::Node,
    config: &ResolverConfig,
) -> Result<String> {
    resolve_with_report(document, target, config).map(|resolution| resolution.selector)
}

/// Like [`resolve`], also returning every attempt made along the way.
pub fn resolve_with_report<D: Document>(
    document: D,
    target: &D::Node,
    config: &ResolverConfig,
) -> Result<Resolution> {
    SelectorResolver::new(config)?.resolve(&document, target)
}
