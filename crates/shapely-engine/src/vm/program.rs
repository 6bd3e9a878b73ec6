//! Program points
//!
//! Analysis state is threaded through a chain of program points. Any step
//! that may produce new abstract values (calling a factory, instantiating a
//! marker type) creates a successor node and makes it current.

use rustc_hash::FxHashSet;
use std::fmt;

/// Unique identifier for a program point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A program point in the flow graph
#[derive(Debug, Clone)]
pub struct CfgNode {
    pub id: NodeId,
    /// Label describing the step that created this node
    pub name: String,
    /// Predecessor nodes
    pub incoming: Vec<NodeId>,
}

/// The flow graph of program points
#[derive(Debug, Clone)]
pub struct Program {
    nodes: Vec<CfgNode>,
    entry: NodeId,
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    /// Create a program with a single entry node
    pub fn new() -> Self {
        Program {
            nodes: vec![CfgNode {
                id: NodeId(0),
                name: "entry".to_string(),
                incoming: Vec::new(),
            }],
            entry: NodeId(0),
        }
    }

    /// The entry node
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Create a new node reachable from `from`
    pub fn connect_new(&mut self, from: NodeId, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(CfgNode {
            id,
            name: name.into(),
            incoming: vec![from],
        });
        id
    }

    /// Get a node by id
    pub fn node(&self, id: NodeId) -> Option<&CfgNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Check whether `target` is reachable from `source` (every node reaches itself)
    pub fn is_reachable(&self, source: NodeId, target: NodeId) -> bool {
        let mut stack = vec![target];
        let mut visited = FxHashSet::default();

        while let Some(current) = stack.pop() {
            if current == source {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.node(current) {
                stack.extend(node.incoming.iter().copied());
            }
        }

        false
    }

    /// Number of nodes in the program
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A program always has its entry node
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
