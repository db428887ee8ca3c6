//! Span-preserving S-expression tree builder.
//!
//! Every parenthesized group becomes a [`Node`] in a flat arena. Nodes keep
//! the byte range of their group in the original input, so the text of a
//! node is always an exact slice of the source.
//!
//! Quoted tokens are not special: a parenthesis inside a quoted string is
//! still a delimiter.

use std::fmt;
use std::ops::Range;
use thiserror::Error;

const OPEN: char = '(';
const CLOSE: char = ')';
const DELIMITERS: &[char] = &[OPEN, CLOSE];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unbalanced ')' at byte {0}")]
    UnbalancedClose(usize),
    #[error("Unterminated group opened at byte {start} ({depth} group(s) still open at end of input)")]
    Unterminated { start: usize, depth: usize },
}

/// Index of a node in its [`SExpTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One parenthesized group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'a> {
    /// Exact source text including both delimiters. Empty until finalized.
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl<'a> Node<'a> {
    fn open(start: usize, parent: Option<NodeId>) -> Self {
        Self {
            text: "",
            start,
            end: start,
            parent,
            children: Vec::new(),
        }
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// First token of the group with delimiters stripped.
    pub fn keyword(&self) -> &'a str {
        self.words().next().unwrap_or("")
    }

    /// The `i`-th token of the group, nested groups included.
    pub fn word(&self, i: usize) -> Option<&'a str> {
        self.words().nth(i)
    }

    /// Whitespace-separated tokens with delimiters stripped. A token made of
    /// delimiters only stays in place as `""`, so `( place ...)` has an empty
    /// keyword.
    pub fn words(&self) -> impl Iterator<Item = &'a str> {
        self.text
            .split_whitespace()
            .map(|w| w.trim_matches(DELIMITERS))
    }
}

/// All nodes of one input, in the order their opening delimiters appeared.
#[derive(Debug, Clone)]
pub struct SExpTree<'a> {
    input: &'a str,
    nodes: Vec<Node<'a>>,
    roots: Vec<NodeId>,
}

impl<'a> SExpTree<'a> {
    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn nodes(&self) -> &[Node<'a>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level groups (children of the implicit root).
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &Node<'a> {
        &self.nodes[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node<'a>)> + '_ {
        self.node(id)
            .children
            .iter()
            .map(move |&child| (child, self.node(child)))
    }

    /// Children of `id` whose keyword is `keyword`.
    pub fn children_with(&self, id: NodeId, keyword: &str) -> Vec<NodeId> {
        self.children(id)
            .filter(|(_, node)| node.keyword() == keyword)
            .map(|(child, _)| child)
            .collect()
    }

    /// Tokens of `id` that are not inside any of its child groups.
    pub fn own_words(&self, id: NodeId) -> Vec<&'a str> {
        let node = self.node(id);
        let mut words = Vec::new();
        let mut cursor = node.start + 1;
        let inner_end = node.end.saturating_sub(1).max(cursor);
        for &child in &node.children {
            let child = self.node(child);
            words.extend(self.input[cursor..child.start].split_whitespace());
            cursor = child.end;
        }
        words.extend(self.input[cursor..inner_end].split_whitespace());
        words
    }
}

/// Builds an [`SExpTree`] in a single pass over the input.
pub struct SExpParser<'a> {
    input: &'a str,
}

impl<'a> SExpParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    pub fn parse(&self) -> Result<SExpTree<'a>, ParseError> {
        let mut nodes: Vec<Node<'a>> = Vec::new();
        let mut roots = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();

        for (pos, ch) in self.input.char_indices() {
            match ch {
                OPEN => {
                    let id = NodeId(nodes.len());
                    let parent = stack.last().copied();
                    match parent {
                        Some(parent) => nodes[parent.0].children.push(id),
                        None => roots.push(id),
                    }
                    nodes.push(Node::open(pos, parent));
                    stack.push(id);
                }
                CLOSE => {
                    let id = stack.pop().ok_or(ParseError::UnbalancedClose(pos))?;
                    let node = &mut nodes[id.0];
                    node.end = pos + CLOSE.len_utf8();
                    node.text = &self.input[node.start..node.end];
                }
                _ => {}
            }
        }

        if let Some(&innermost) = stack.last() {
            return Err(ParseError::Unterminated {
                start: nodes[innermost.0].start,
                depth: stack.len(),
            });
        }

        tracing::debug!("Parsed {} groups ({} top-level)", nodes.len(), roots.len());

        Ok(SExpTree {
            input: self.input,
            nodes,
            roots,
        })
    }
}
