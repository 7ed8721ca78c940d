use crate::transition::{PayloadRule, TransitionRow};
use serde::{Deserialize, Serialize};

/// The Static Analysis View of a transition table.
///
/// `Schematic` is the graph representation extracted from the table's row
/// labels. It is used for visualization, documentation, and review of which
/// moves a flow declares.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Schematic {
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Schematic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn from_rows<S, E, P, H>(name: &str, rows: &[TransitionRow<S, E, P, H>]) -> Self {
        let mut schematic = Schematic::new(name);
        for row in rows {
            let to = row.destination().label();
            schematic.add_node(to);
            for from in row.source().labels() {
                schematic.add_node(from);
                schematic.edges.push(Edge {
                    from: (*from).to_string(),
                    to: to.to_string(),
                    event: row.event().label().to_string(),
                    row: row.label().to_string(),
                    payload: row.payload_rule(),
                });
            }
        }
        schematic
    }

    fn add_node(&mut self, label: &str) {
        if self.node(label).is_some() {
            return;
        }
        // Destinations written as `<...>` are resolved from the current state.
        let kind = if label.starts_with('<') {
            NodeKind::Resolved
        } else {
            NodeKind::State
        };
        self.nodes.push(Node {
            id: label.to_string(),
            kind,
        });
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges leaving `from`.
    pub fn edges_from<'a>(&'a self, from: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.from == from)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    State,    // Declared state
    Resolved, // Computed at dispatch time (e.g. "<previous>")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub event: String,
    pub row: String,
    pub payload: PayloadRule,
}
