//! The tagged tree every stanza is made of.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attrs::AttrGetter;
use crate::jid::Jid;

/// Attribute mapping of a node.
pub type Attrs = BTreeMap<String, AttrValue>;

/// Scalar values an attribute can hold on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Jid(Jid),
}

impl AttrValue {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AttrValue::Str(_) => "string",
            AttrValue::Int(_) => "int",
            AttrValue::Bool(_) => "bool",
            AttrValue::Jid(_) => "jid",
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Str(s) => f.write_str(s),
            AttrValue::Int(i) => write!(f, "{i}"),
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Jid(j) => write!(f, "{j}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<Jid> for AttrValue {
    fn from(value: Jid) -> Self {
        AttrValue::Jid(value)
    }
}

impl From<&Jid> for AttrValue {
    fn from(value: &Jid) -> Self {
        AttrValue::Jid(value.clone())
    }
}

/// Payload of a node: nothing, raw bytes, or child nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeContent {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    Nodes(Vec<Node>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub tag: String,
    pub attrs: Attrs,
    pub content: NodeContent,
}

/// Returned by [`Node::get_child_by_tag`] when the path does not resolve.
static EMPTY_NODE: Node = Node {
    tag: String::new(),
    attrs: BTreeMap::new(),
    content: NodeContent::Empty,
};

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn bytes(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.content = NodeContent::Bytes(data.into());
        self
    }

    pub fn children(mut self, nodes: Vec<Node>) -> Self {
        self.content = NodeContent::Nodes(nodes);
        self
    }

    /// Open a deferred-error cursor over this node's attributes.
    pub fn attr_getter(&self) -> AttrGetter<'_> {
        AttrGetter::new(&self.attrs)
    }

    /// Child nodes, or an empty slice if the content is not a node list.
    pub fn child_nodes(&self) -> &[Node] {
        match &self.content {
            NodeContent::Nodes(nodes) => nodes,
            _ => &[],
        }
    }

    pub fn bytes_content(&self) -> Option<&[u8]> {
        match &self.content {
            NodeContent::Bytes(data) => Some(data),
            _ => None,
        }
    }

    /// Follow `tags` one level at a time, taking the first matching child at each step.
    pub fn get_optional_child_by_tag(&self, tags: &[&str]) -> Option<&Node> {
        let mut current = self;
        for tag in tags {
            current = current.child_nodes().iter().find(|child| child.tag == *tag)?;
        }
        Some(current)
    }

    /// Like [`get_optional_child_by_tag`](Self::get_optional_child_by_tag), but
    /// yields an empty node instead of `None`.
    pub fn get_child_by_tag(&self, tags: &[&str]) -> &Node {
        self.get_optional_child_by_tag(tags).unwrap_or(&EMPTY_NODE)
    }
}
