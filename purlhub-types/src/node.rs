//! Hierarchical account nodes.
//!
//! A node is addressed by its path (`/default/Sales`). Its name is always
//! the last path component; renaming a node only ever replaces that
//! component.

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default event tracking mode of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Live,
    Draft,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct NodePath {
    dir: String,
    base: String,
}

impl NodePath {
    fn parse(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        match path.rsplit_once('/') {
            Some(("", base)) => Self {
                dir: "/".to_string(),
                base: base.to_string(),
            },
            Some((dir, base)) => Self {
                dir: dir.to_string(),
                base: base.to_string(),
            },
            None => Self {
                dir: String::new(),
                base: path.to_string(),
            },
        }
    }

    fn format(&self) -> String {
        match self.dir.as_str() {
            "" => self.base.clone(),
            "/" => format!("/{}", self.base),
            dir => format!("{dir}/{}", self.base),
        }
    }
}

/// A node in an account's hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NodeRecord", into = "NodeRecord")]
pub struct Node {
    path: NodePath,
    loaded_path: Option<String>,
    /// Arbitrary type classification (sent as `classification` on save).
    pub node_class: Option<String>,
    pub description: Option<String>,
    pub status: Option<NodeStatus>,
    pub child_nodes: Vec<Node>,
}

impl Node {
    #[must_use]
    pub fn new(path: &str, node_class: impl Into<String>) -> Self {
        Self {
            path: NodePath::parse(path),
            loaded_path: None,
            node_class: Some(node_class.into()),
            description: None,
            status: None,
            child_nodes: Vec::new(),
        }
    }

    /// Parses a server payload, remembering the path every node (children
    /// included) was stored under.
    pub fn from_remote(value: Value) -> Result<Self> {
        let mut node: Node = serde_json::from_value(value)?;
        node.mark_loaded();
        Ok(node)
    }

    fn mark_loaded(&mut self) {
        self.loaded_path = Some(self.path.format());
        for child in &mut self.child_nodes {
            child.mark_loaded();
        }
    }

    /// The node's own name (last path component).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.path.base
    }

    /// Renames the node. Only the last component of `name` is used.
    pub fn set_name(&mut self, name: &str) {
        self.path.base = NodePath::parse(name).base;
    }

    /// The full hierarchical path, including the name.
    #[must_use]
    pub fn path(&self) -> String {
        self.path.format()
    }

    /// Alias of [`Node::node_class`].
    #[must_use]
    pub fn classification(&self) -> Option<&str> {
        self.node_class.as_deref()
    }

    /// The path this node is stored under remotely, if it was loaded.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.loaded_path.as_deref()
    }

    /// The new name when a loaded node was renamed.
    #[must_use]
    pub fn renamed_to(&self) -> Option<&str> {
        let loaded = self.loaded_path.as_deref()?;
        if NodePath::parse(loaded).base != self.path.base {
            Some(&self.path.base)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeRecord {
    #[serde(default)]
    node_name: String,
    #[serde(default)]
    node_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    node_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<NodeStatus>,
    #[serde(default)]
    child_nodes: Vec<Node>,
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        let path = if record.node_path.is_empty() {
            NodePath::parse(&record.node_name)
        } else {
            NodePath::parse(&record.node_path)
        };
        Self {
            path,
            loaded_path: None,
            node_class: record.node_class,
            description: record.description,
            status: record.status,
            child_nodes: record.child_nodes,
        }
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        Self {
            node_name: node.path.base.clone(),
            node_path: node.path.format(),
            node_class: node.node_class,
            description: node.description,
            status: node.status,
            child_nodes: node.child_nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_parsing_keeps_leading_slash() {
        assert_eq!(NodePath::parse("/default/Sales").format(), "/default/Sales");
        assert_eq!(NodePath::parse("/default").format(), "/default");
        assert_eq!(NodePath::parse("default").format(), "default");
        assert_eq!(NodePath::parse("/default/Sales/").base, "Sales");
    }

    #[test]
    fn set_name_only_replaces_last_component() {
        let mut node = Node::new("/default/Sales", "campaign");
        node.set_name("/elsewhere/Marketing");
        assert_eq!(node.name(), "Marketing");
        assert_eq!(node.path(), "/default/Marketing");
    }

    #[test]
    fn classification_aliases_node_class() {
        let node = Node::new("/default", "campaign");
        assert_eq!(node.classification(), Some("campaign"));
    }

    #[test]
    fn from_remote_marks_children_loaded() {
        let node = Node::from_remote(json!({
            "nodeName": "default",
            "nodePath": "/default",
            "nodeClass": "root",
            "status": "live",
            "childNodes": [{"nodeName": "Sales", "nodePath": "/default/Sales"}]
        }))
        .unwrap();

        assert_eq!(node.id(), Some("/default"));
        assert_eq!(node.status, Some(NodeStatus::Live));
        assert_eq!(node.child_nodes[0].id(), Some("/default/Sales"));
        assert_eq!(node.child_nodes[0].name(), "Sales");
    }

    #[test]
    fn rename_is_detected_against_loaded_path() {
        let mut node = Node::from_remote(json!({"nodeName": "Sales", "nodePath": "/default/Sales"}))
            .unwrap();
        assert_eq!(node.renamed_to(), None);
        node.set_name("Marketing");
        assert_eq!(node.renamed_to(), Some("Marketing"));
        assert_eq!(node.id(), Some("/default/Sales"));
    }

    #[test]
    fn serializes_name_and_path() {
        let node = Node::new("/default/Sales", "campaign");
        let wire = serde_json::to_value(&node).unwrap();
        assert_eq!(wire["nodeName"], "Sales");
        assert_eq!(wire["nodePath"], "/default/Sales");
        assert_eq!(wire["nodeClass"], "campaign");
    }
}
