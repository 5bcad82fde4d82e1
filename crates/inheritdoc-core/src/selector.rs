//! Selector paths.
//!
//! A selector path scopes an inheritdoc substitution to part of the
//! referenced member's documentation. The accepted language is the subset of
//! XPath that documentation comments use in practice:
//!
//! ```text
//! path      := ('/' | '//')? step (('/' | '//') step)*
//! step      := '.' | '..' | test predicate*
//! test      := '*' | name
//! predicate := '[' ( '@' name ( '=' quoted )? | integer ) ']'
//! ```
//!
//! Paths are always evaluated relative to a context element, so `/summary`
//! and `summary` both select the `summary` children of the member element.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult,
};
use smallvec::SmallVec;

use crate::errors::SelectorError;
use crate::tree::{DocTree, NodeId};

/// How a step reaches its candidates from the context node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// `/`: the context node itself.
    Child,
    /// `//`: the context node and every element below it.
    Descendant,
}

/// What a step matches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeTest {
    /// `*`
    AnyElement,
    Name(String),
    /// `.`
    SelfNode,
    /// `..`
    Parent,
}

/// A bracketed filter on a step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Predicate {
    HasAttribute(String),
    AttributeEquals(String, String),
    /// 1-based position among the step's candidates.
    Position(usize),
}

/// One step of a selector path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Predicate>,
}

/// A parsed selector path, keeping its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectorPath {
    source: String,
    steps: SmallVec<[Step; 4]>,
}

impl SelectorPath {
    /// Parse a selector path.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }

        match all_consuming(path)(trimmed) {
            Ok((_, steps)) => Ok(Self {
                source: source.to_string(),
                steps,
            }),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(SelectorError::Syntax {
                path: source.to_string(),
                rest: e.input.to_string(),
            }),
            Err(nom::Err::Incomplete(_)) => Err(SelectorError::Syntax {
                path: source.to_string(),
                rest: String::new(),
            }),
        }
    }

    /// The path as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Select the elements matched by this path, starting at `context`.
    ///
    /// The result holds each matched node once, in document order. A path
    /// may match nothing.
    pub fn select(&self, tree: &DocTree, context: NodeId) -> Vec<NodeId> {
        if tree.get(context).is_none() {
            return Vec::new();
        }

        let mut current = vec![context];
        for step in &self.steps {
            let mut next = Vec::new();
            let mut seen = HashSet::new();

            for &node in &current {
                let bases = match step.axis {
                    Axis::Child => vec![node],
                    Axis::Descendant => {
                        let mut bases = vec![node];
                        bases.extend(
                            tree.descendants(node)
                                .into_iter()
                                .filter(|&id| tree.is_element(id)),
                        );
                        bases
                    }
                };

                for base in bases {
                    let candidates = step_candidates(tree, base, &step.test);
                    for id in apply_predicates(tree, candidates, &step.predicates) {
                        if seen.insert(id) {
                            next.push(id);
                        }
                    }
                }
            }

            current = next;
        }

        if current.len() > 1 {
            let order: HashMap<NodeId, usize> = tree
                .preorder()
                .into_iter()
                .enumerate()
                .map(|(index, id)| (id, index))
                .collect();
            current.sort_by_key(|id| order.get(id).copied().unwrap_or(usize::MAX));
        }
        current
    }
}

fn step_candidates(tree: &DocTree, base: NodeId, test: &NodeTest) -> Vec<NodeId> {
    match test {
        NodeTest::SelfNode => vec![base],
        NodeTest::Parent => tree.parent(base).into_iter().collect(),
        NodeTest::AnyElement => tree
            .children(base)
            .iter()
            .copied()
            .filter(|&id| tree.is_element(id))
            .collect(),
        NodeTest::Name(name) => tree
            .children(base)
            .iter()
            .copied()
            .filter(|&id| tree.element_name(id) == Some(name.as_str()))
            .collect(),
    }
}

fn apply_predicates(tree: &DocTree, mut candidates: Vec<NodeId>, predicates: &[Predicate]) -> Vec<NodeId> {
    for predicate in predicates {
        candidates = match predicate {
            Predicate::Position(0) => Vec::new(),
            Predicate::Position(n) => candidates.get(n - 1).copied().into_iter().collect(),
            Predicate::HasAttribute(attr) => candidates
                .into_iter()
                .filter(|&id| tree.attribute(id, attr).is_some())
                .collect(),
            Predicate::AttributeEquals(attr, expected) => candidates
                .into_iter()
                .filter(|&id| tree.attribute(id, attr) == Some(expected.as_str()))
                .collect(),
        };
    }
    candidates
}

impl fmt::Display for SelectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for SelectorPath {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Grammar

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

fn name(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(is_name_start), take_while(is_name_char)))(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
    ))(input)
}

fn attribute_predicate(input: &str) -> IResult<&str, Predicate> {
    map(
        preceded(
            char('@'),
            pair(
                name,
                opt(preceded(delimited(multispace0, char('='), multispace0), quoted)),
            ),
        ),
        |(attr, expected)| match expected {
            Some(expected) => Predicate::AttributeEquals(attr.to_string(), expected.to_string()),
            None => Predicate::HasAttribute(attr.to_string()),
        },
    )(input)
}

fn position_predicate(input: &str) -> IResult<&str, Predicate> {
    map_res(digit1, |digits: &str| digits.parse::<usize>().map(Predicate::Position))(input)
}

fn predicate(input: &str) -> IResult<&str, Predicate> {
    delimited(
        pair(char('['), multispace0),
        alt((attribute_predicate, position_predicate)),
        pair(multispace0, char(']')),
    )(input)
}

fn node_test(input: &str) -> IResult<&str, NodeTest> {
    alt((
        value(NodeTest::Parent, tag("..")),
        value(NodeTest::SelfNode, tag(".")),
        value(NodeTest::AnyElement, tag("*")),
        map(name, |n: &str| NodeTest::Name(n.to_string())),
    ))(input)
}

fn separator(input: &str) -> IResult<&str, Axis> {
    alt((
        value(Axis::Descendant, tag("//")),
        value(Axis::Child, tag("/")),
    ))(input)
}

fn step(input: &str) -> IResult<&str, (NodeTest, Vec<Predicate>)> {
    pair(node_test, many0(predicate))(input)
}

fn path(input: &str) -> IResult<&str, SmallVec<[Step; 4]>> {
    let (input, first_axis) = opt(separator)(input)?;
    let (input, (test, predicates)) = step(input)?;
    let (input, rest) = many0(pair(separator, step))(input)?;

    let mut steps = SmallVec::new();
    steps.push(Step {
        axis: first_axis.unwrap_or(Axis::Child),
        test,
        predicates,
    });
    for (axis, (test, predicates)) in rest {
        steps.push(Step { axis, test, predicates });
    }
    Ok((input, steps))
}
