//! Strongly-connected units of the retainer graph.
//!
//! Iterative Tarjan over incoming edges. Starting at a root, it walks every
//! not-yet-resolved retainer and emits each unit after all units upstream of
//! it, which is the order breakdowns have to be built in. State persists
//! across roots so a node is visited at most once per load.

use crate::graph::Graph;

const UNVISITED: u32 = u32::MAX;

/// A strongly-connected set of nodes (dense indices)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: u32,
    pub members: Vec<usize>,
}

pub struct SccFinder {
    order: Vec<u32>,
    lowlink: Vec<u32>,
    on_stack: Vec<bool>,
    unit_of: Vec<u32>,
    stack: Vec<usize>,
    next_order: u32,
    next_unit: u32,
}

impl SccFinder {
    pub fn new(node_count: usize) -> Self {
        Self {
            order: vec![UNVISITED; node_count],
            lowlink: vec![0; node_count],
            on_stack: vec![false; node_count],
            unit_of: vec![UNVISITED; node_count],
            stack: Vec::new(),
            next_order: 0,
            next_unit: 0,
        }
    }

    /// Unit id assigned to a node, once it has been emitted
    pub fn unit_of(&self, index: usize) -> Option<u32> {
        match self.unit_of[index] {
            UNVISITED => None,
            id => Some(id),
        }
    }

    /// Emit the units reachable from `root` over incoming edges.
    ///
    /// Nodes for which `resolved` returns true, and nodes emitted by an
    /// earlier call, are treated as boundaries and not walked through.
    pub fn units_from(
        &mut self,
        graph: &Graph,
        root: usize,
        resolved: impl Fn(usize) -> bool,
    ) -> Vec<Unit> {
        let mut units = Vec::new();
        if resolved(root) || self.order[root] != UNVISITED {
            return units;
        }

        // (node, position in its in_edges list)
        let mut frames: Vec<(usize, usize)> = Vec::new();
        self.visit(root);
        frames.push((root, 0));

        while let Some(&(node, pos)) = frames.last() {
            let in_edges = &graph.nodes()[node].in_edges;

            if let Some(&edge) = in_edges.get(pos) {
                if let Some(top) = frames.last_mut() {
                    top.1 += 1;
                }
                let retainer = graph.edge_source(edge);
                if resolved(retainer) {
                    continue;
                }
                if self.order[retainer] == UNVISITED {
                    self.visit(retainer);
                    frames.push((retainer, 0));
                } else if self.on_stack[retainer] {
                    self.lowlink[node] = self.lowlink[node].min(self.order[retainer]);
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[node]);
            }

            if self.lowlink[node] == self.order[node] {
                units.push(self.pop_unit(node));
            }
        }

        units
    }

    fn visit(&mut self, node: usize) {
        self.order[node] = self.next_order;
        self.lowlink[node] = self.next_order;
        self.next_order += 1;
        self.on_stack[node] = true;
        self.stack.push(node);
    }

    fn pop_unit(&mut self, head: usize) -> Unit {
        let id = self.next_unit;
        self.next_unit += 1;

        let mut members = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack[member] = false;
            self.unit_of[member] = id;
            members.push(member);
            if member == head {
                break;
            }
        }
        members.reverse();

        Unit { id, members }
    }
}
