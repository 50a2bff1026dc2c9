use super::ids::NodeId;
use slotmap::SlotMap;
use std::collections::HashMap;

/// What a node of the free-energy map stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeLabel {
    /// The zero-point anchor from which absolute values are resolved.
    Reference,
    Ligand(String),
}

impl NodeLabel {
    pub fn ligand_name(&self) -> Option<&str> {
        match self {
            NodeLabel::Reference => None,
            NodeLabel::Ligand(name) => Some(name),
        }
    }
}

/// A derived absolute value and its standard uncertainty, in kcal/mol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub uncertainty: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: NodeLabel,
    pub estimate: Option<Estimate>,
}

/// A directed free-energy difference, `dG(to) - dG(from) = value`.
///
/// Experimental absolute values are stored as measurements from the reference node with
/// `computational == false`; calculated relative values connect two ligands and are
/// flagged `computational == true`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub from: NodeId,
    pub to: NodeId,
    pub value: f64,
    pub uncertainty: f64,
    pub computational: bool,
}

/// A weighted graph of free-energy measurements anchored at a reference node.
#[derive(Debug, Clone)]
pub struct FeMap {
    /// Primary storage for nodes, including the reference node.
    nodes: SlotMap<NodeId, Node>,
    /// Ligand nodes in the order they were first seen.
    ligand_order: Vec<NodeId>,
    /// Lookup map from ligand name to node.
    ligand_ids: HashMap<String, NodeId>,
    reference: NodeId,
    measurements: Vec<Measurement>,
}

impl Default for FeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FeMap {
    /// Creates a map holding only the reference node.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let reference = nodes.insert(Node {
            label: NodeLabel::Reference,
            estimate: None,
        });
        Self {
            nodes,
            ligand_order: Vec::new(),
            ligand_ids: HashMap::new(),
            reference,
            measurements: Vec::new(),
        }
    }

    pub fn reference(&self) -> NodeId {
        self.reference
    }

    /// Returns the node for `name`, creating it on first use.
    pub fn add_ligand(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.ligand_ids.get(name) {
            return id;
        }
        let id = self.nodes.insert(Node {
            label: NodeLabel::Ligand(name.to_string()),
            estimate: None,
        });
        self.ligand_ids.insert(name.to_string(), id);
        self.ligand_order.push(id);
        id
    }

    /// Adds an experimental absolute measurement (reference → ligand).
    pub fn add_absolute(&mut self, ligand: &str, value: f64, uncertainty: f64) -> NodeId {
        let to = self.add_ligand(ligand);
        self.measurements.push(Measurement {
            from: self.reference,
            to,
            value,
            uncertainty,
            computational: false,
        });
        to
    }

    /// Adds a computed relative measurement (ligand_i → ligand_j).
    pub fn add_relative(&mut self, ligand_i: &str, ligand_j: &str, value: f64, uncertainty: f64) {
        let from = self.add_ligand(ligand_i);
        let to = self.add_ligand(ligand_j);
        self.measurements.push(Measurement {
            from,
            to,
            value,
            uncertainty,
            computational: true,
        });
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn ligand_id(&self, name: &str) -> Option<NodeId> {
        self.ligand_ids.get(name).copied()
    }

    pub fn ligand_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.label.ligand_name())
    }

    /// Iterates ligand nodes in first-seen order.
    pub fn ligands(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.ligand_order.iter().map(|&id| (id, &self.nodes[id]))
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_ligands(&self) -> usize {
        self.ligand_order.len()
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Computational ligand-to-ligand measurements, in insertion order.
    pub fn relative_measurements(&self) -> impl Iterator<Item = &Measurement> {
        self.measurements.iter().filter(|m| m.computational)
    }

    /// Ligands touched by at least one computational measurement, in first-seen order.
    pub fn computed_ligands(&self) -> Vec<NodeId> {
        self.ligand_order
            .iter()
            .copied()
            .filter(|&id| {
                self.relative_measurements()
                    .any(|m| m.from == id || m.to == id)
            })
            .collect()
    }

    pub fn estimate(&self, name: &str) -> Option<Estimate> {
        self.ligand_id(name)
            .and_then(|id| self.nodes.get(id))
            .and_then(|n| n.estimate)
    }

    pub fn set_estimate(&mut self, id: NodeId, estimate: Estimate) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.estimate = Some(estimate);
        }
    }

    pub fn clear_estimates(&mut self) {
        for node in self.nodes.values_mut() {
            node.estimate = None;
        }
    }

    /// Undirected adjacency over measurements joining two ligands; measurements touching
    /// the reference node and self-loops are left out.
    pub fn ligand_adjacency(&self) -> HashMap<NodeId, Vec<NodeId>> {
        let mut adjacency: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for m in &self.measurements {
            if m.from == m.to || m.from == self.reference || m.to == self.reference {
                continue;
            }
            adjacency.entry(m.from).or_default().push(m.to);
            adjacency.entry(m.to).or_default().push(m.from);
        }
        adjacency
    }
}
