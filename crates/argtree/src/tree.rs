//! Arena owning every node of one parser, with the group-tree walks.

use crate::error::{Error, Result};
use crate::group::Validator;
use crate::node::{Node, NodeId, NodeKind};

pub(crate) const ROOT: NodeId = NodeId(0);

#[derive(Debug)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub(crate) fn new(root_help: &str, validator: Validator) -> Self {
        Self {
            nodes: vec![Node::group(root_help.to_string(), validator)],
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Group(group)) => &group.children,
            _ => &[],
        }
    }

    /// Append `node` under `parent`. A parent that is not a group of this
    /// tree falls back to the root.
    pub(crate) fn push(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        let parent = match self.nodes.get(parent.0) {
            Some(n) if n.is_group() && parent != id => parent,
            _ => {
                tracing::warn!(?parent, "parent is not a group of this parser, attaching to root");
                ROOT
            }
        };
        if let NodeKind::Group(group) = &mut self.nodes[parent.0].kind {
            group.children.push(id);
        }
        id
    }

    /// Clear per-parse state. Stored values are left alone.
    pub(crate) fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    /// Depth-first search for a flag answering to the long name `name`.
    pub(crate) fn find_long(&self, group: NodeId, name: &str) -> Option<NodeId> {
        self.find_flag(group, &|node: &Node| {
            node.matcher().is_some_and(|m| m.match_long(name))
        })
    }

    /// Depth-first search for a flag answering to the short name `short`.
    pub(crate) fn find_short(&self, group: NodeId, short: char) -> Option<NodeId> {
        self.find_flag(group, &|node: &Node| {
            node.matcher().is_some_and(|m| m.match_short(short))
        })
    }

    fn find_flag(&self, group: NodeId, hit: &dyn Fn(&Node) -> bool) -> Option<NodeId> {
        for &child in self.children(group) {
            let node = self.node(child)?;
            if node.is_group() {
                if let Some(found) = self.find_flag(child, hit) {
                    return Some(found);
                }
            } else if hit(node) {
                return Some(child);
            }
        }
        None
    }

    /// First positional, in declaration order through nested groups, that
    /// can still take a token.
    pub(crate) fn next_ready_positional(&self, group: NodeId) -> Option<NodeId> {
        for &child in self.children(group) {
            let node = self.node(child)?;
            if node.is_group() {
                if let Some(found) = self.next_ready_positional(child) {
                    return Some(found);
                }
            } else if node.is_ready() {
                return Some(child);
            }
        }
        None
    }

    /// Whether a node counts as matched. Groups evaluate their validator.
    pub(crate) fn matched(&self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let NodeKind::Group(group) = &node.kind else {
            return node.matched;
        };
        let total = group.children.len();
        let matched = group
            .children
            .iter()
            .filter(|&&child| self.matched(child))
            .count();
        group.validator.check(total, matched, || {
            group.children.iter().all(|&child| {
                !self.node(child).is_some_and(Node::is_group) || self.matched(child)
            })
        })
    }

    /// The deepest group on the first failing path below `id`, or `id`.
    pub(crate) fn first_failing_group(&self, id: NodeId) -> NodeId {
        for &child in self.children(id) {
            let is_group = self.node(child).is_some_and(Node::is_group);
            if is_group && !self.matched(child) {
                return self.first_failing_group(child);
            }
        }
        id
    }

    pub(crate) fn has_flag(&self, group: NodeId) -> bool {
        self.children(group).iter().any(|&child| match self.node(child) {
            Some(node) if node.is_group() => self.has_flag(child),
            Some(node) => node.matcher().is_some() && !node.hidden,
            None => false,
        })
    }

    pub(crate) fn mark_matched(&mut self, id: NodeId, shown: &str) -> Result<()> {
        match self.node_mut(id) {
            Some(node) => node.mark_matched(shown),
            None => Err(Error::Parse(format!("Flag could not be matched: {shown}"))),
        }
    }

    pub(crate) fn parse_value(&mut self, id: NodeId, token: &str) -> Result<()> {
        match self.node_mut(id) {
            Some(node) => node.parse_value(token),
            None => Err(Error::Parse(format!(
                "Passed in argument, but no positional arguments were ready to receive it: {token}"
            ))),
        }
    }
}
