//! XPath evaluation over any [`DomNode`] tree.
//!
//! Covers location paths built from `/` and `//` steps with a tag or `*`
//! node test and any number of predicates of the forms `[@name="value"]`,
//! `[text()="value"]` and `[n]`. Double-quoted literals are read as JSON
//! strings so backslash escapes round-trip; single-quoted literals are taken
//! verbatim.

use crate::dom::node::{ChildNode, DomNode};
use crate::errors::{Result, SelectorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    Any,
    Tag(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Attribute { name: String, value: String },
    Text(String),
    Position(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Predicate>,
}

pub fn parse(expression: &str) -> Result<Vec<Step>> {
    let mut parser = Parser {
        source: expression,
        chars: expression.trim().chars().collect(),
        pos: 0,
    };
    parser.parse_path()
}

/// Evaluates `expression` against the tree rooted at `root`. A `None` root
/// evaluates against an empty document.
///
/// Each step is one pre-order walk of the tree, so results come back in
/// document order and every node is visited at most once per step.
pub fn evaluate<N: DomNode>(root: Option<N>, expression: &str) -> Result<Vec<N>> {
    let steps = parse(expression)?;
    let Some(root) = root else {
        return Ok(Vec::new());
    };

    let mut contexts: Vec<N> = Vec::new();
    let mut document_is_context = true;
    for step in &steps {
        contexts = select_step(step, &root, &contexts, document_is_context);
        document_is_context = false;
    }
    Ok(contexts)
}

fn select_step<N: DomNode>(
    step: &Step,
    root: &N,
    contexts: &[N],
    document_is_context: bool,
) -> Vec<N> {
    let mut walk = StepWalk {
        step,
        contexts,
        cursor: 0,
        selected: Vec::new(),
    };
    walk.enter(vec![root.clone()], document_is_context, false);
    walk.selected
}

/// `contexts` must be in document order; `cursor` tracks the next one the
/// walk has yet to reach.
struct StepWalk<'s, N> {
    step: &'s Step,
    contexts: &'s [N],
    cursor: usize,
    selected: Vec<N>,
}

impl<N: DomNode> StepWalk<'_, N> {
    fn enter(&mut self, children: Vec<N>, parent_is_context: bool, under_context: bool) {
        let is_candidate_parent = match self.step.axis {
            Axis::Child => parent_is_context,
            Axis::Descendant => parent_is_context || under_context,
        };
        let inside = parent_is_context || under_context;
        if !is_candidate_parent && !inside && self.cursor >= self.contexts.len() {
            return;
        }

        let picked = if is_candidate_parent {
            apply_step(self.step, children.clone())
        } else {
            Vec::new()
        };
        let mut picked = picked.into_iter().peekable();

        for child in children {
            if picked.next_if(|node| *node == child).is_some() {
                self.selected.push(child.clone());
            }
            let is_context = self.contexts.get(self.cursor) == Some(&child);
            if is_context {
                self.cursor += 1;
            }
            let grandchildren = child.children();
            self.enter(grandchildren, is_context, inside);
        }
    }
}

fn apply_step<N: DomNode>(step: &Step, children: Vec<N>) -> Vec<N> {
    let mut selected: Vec<N> = children
        .into_iter()
        .filter(|node| match &step.test {
            NodeTest::Any => true,
            NodeTest::Tag(tag) => node.tag_name() == *tag,
        })
        .collect();

    for predicate in &step.predicates {
        selected = match predicate {
            Predicate::Position(n) => selected.into_iter().nth(n - 1).into_iter().collect(),
            Predicate::Attribute { name, value } => selected
                .into_iter()
                .filter(|node| node.attribute(name).as_deref() == Some(value.as_str()))
                .collect(),
            Predicate::Text(value) => selected
                .into_iter()
                .filter(|node| {
                    node.child_nodes()
                        .iter()
                        .any(|child| matches!(child, ChildNode::Text(text) if text == value))
                })
                .collect(),
        };
    }
    selected
}

struct Parser<'s> {
    source: &'s str,
    chars: Vec<char>,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn parse_path(&mut self) -> Result<Vec<Step>> {
        if self.chars.is_empty() {
            return Err(self.error("empty expression"));
        }
        let mut steps = Vec::new();
        while self.pos < self.chars.len() {
            steps.push(self.parse_step()?);
        }
        Ok(steps)
    }

    fn parse_step(&mut self) -> Result<Step> {
        if !self.eat('/') {
            return Err(self.error("expected '/'"));
        }
        let axis = if self.eat('/') {
            Axis::Descendant
        } else {
            Axis::Child
        };

        let test = if self.eat('*') {
            NodeTest::Any
        } else {
            let name = self.name();
            if name.is_empty() {
                return Err(self.error("expected a tag name or '*'"));
            }
            NodeTest::Tag(name.to_ascii_lowercase())
        };

        let mut predicates = Vec::new();
        while self.eat('[') {
            predicates.push(self.parse_predicate()?);
        }

        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn parse_predicate(&mut self) -> Result<Predicate> {
        self.skip_whitespace();
        let predicate = if self.eat('@') {
            let name = self.name();
            if name.is_empty() {
                return Err(self.error("expected an attribute name"));
            }
            let value = self.parse_comparison()?;
            Predicate::Attribute { name, value }
        } else if self.eat_keyword("text()") {
            Predicate::Text(self.parse_comparison()?)
        } else if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            let mut digits = String::new();
            while let Some(c) = self.peek().filter(char::is_ascii_digit) {
                digits.push(c);
                self.pos += 1;
            }
            let position: usize = digits
                .parse()
                .map_err(|_| self.error("position out of range"))?;
            if position == 0 {
                return Err(self.error("positions start at 1"));
            }
            Predicate::Position(position)
        } else {
            return Err(self.error("unsupported predicate"));
        };

        self.skip_whitespace();
        if !self.eat(']') {
            return Err(self.error("expected ']'"));
        }
        Ok(predicate)
    }

    fn parse_comparison(&mut self) -> Result<String> {
        self.skip_whitespace();
        if !self.eat('=') {
            return Err(self.error("expected '='"));
        }
        self.skip_whitespace();
        self.literal()
    }

    fn literal(&mut self) -> Result<String> {
        match self.peek() {
            Some('"') => {
                let start = self.pos;
                self.pos += 1;
                let mut escaped = false;
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    match c {
                        '\\' if !escaped => escaped = true,
                        '"' if !escaped => {
                            let raw: String = self.chars[start..self.pos].iter().collect();
                            return serde_json::from_str(&raw)
                                .map_err(|e| self.error(&format!("bad string literal: {}", e)));
                        }
                        _ => escaped = false,
                    }
                }
                Err(self.error("unterminated string literal"))
            }
            Some('\'') => {
                self.pos += 1;
                let mut value = String::new();
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    if c == '\'' {
                        return Ok(value);
                    }
                    value.push(c);
                }
                Err(self.error("unterminated string literal"))
            }
            _ => Err(self.error("expected a string literal")),
        }
    }

    fn name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self
            .peek()
            .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        {
            name.push(c);
            self.pos += 1;
        }
        name
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let len = keyword.chars().count();
        let end = self.pos + len;
        if end <= self.chars.len()
            && self.chars[self.pos..end].iter().copied().eq(keyword.chars())
        {
            self.pos = end;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn error(&self, message: &str) -> SelectorError {
        SelectorError::InvalidSelector(format!(
            "{} at offset {} in {:?}",
            message, self.pos, self.source
        ))
    }
}
