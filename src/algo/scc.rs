//! Strongly connected components via Tarjan's algorithm.
//!
//! The depth-first search is iterative with an explicit frame stack;
//! recursion would overflow the machine stack on graphs with very long
//! paths.

use tracing::info;

use crate::graph::csr::Topology;
use crate::graph::{EdgeId, NodeId};

const UNSET: u64 = u64::MAX;

#[derive(Debug, Clone, Copy)]
struct NodeState {
    depth: u64,
    low_link: u64,
    on_stack: bool,
}

impl NodeState {
    fn seen(&self) -> bool {
        self.depth != UNSET
    }

    fn is_component_root(&self) -> bool {
        self.depth == self.low_link
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            depth: UNSET,
            low_link: UNSET,
            on_stack: false,
        }
    }
}

// one suspended visit: the node and the cursor into its out-edges
struct Frame {
    node: NodeId,
    next_edge: EdgeId,
}

/// Computes, for every node of a graph, the id of the strongly connected
/// component it belongs to.
pub struct Scc;

impl Scc {
    /// Component ids per node, numbered `0..k` in the order the components
    /// close, which is reverse topological order of the condensation.
    /// Runs in O(n + m) time with O(n) additional space.
    pub fn compute(graph: &impl Topology) -> Vec<u64> {
        let n = graph.number_of_nodes();
        let mut components = vec![UNSET; n];
        let mut states = vec![NodeState::default(); n];
        let mut assigned = 0u64;
        let mut depth = 0u64;

        // start a search at every node without a component yet
        for root in 0..n as NodeId {
            if components[root as usize] == UNSET {
                Self::search(
                    graph,
                    root,
                    &mut states,
                    &mut components,
                    &mut assigned,
                    &mut depth,
                );
            }
        }

        info!(components = assigned, "computed strongly connected components");
        components
    }

    fn search(
        graph: &impl Topology,
        root: NodeId,
        states: &mut [NodeState],
        components: &mut [u64],
        assigned: &mut u64,
        depth: &mut u64,
    ) {
        let mut dfs_stack: Vec<Frame> = Vec::new();
        let mut component_nodes: Vec<NodeId> = Vec::new();

        let enter = |node: NodeId, states: &mut [NodeState], depth: &mut u64| {
            states[node as usize] = NodeState {
                depth: *depth,
                low_link: *depth,
                on_stack: true,
            };
            *depth += 1;
        };

        enter(root, states, depth);
        component_nodes.push(root);
        dfs_stack.push(Frame {
            node: root,
            next_edge: graph.edge_range(root).start,
        });

        while let Some(top) = dfs_stack.len().checked_sub(1) {
            let node = dfs_stack[top].node;
            if dfs_stack[top].next_edge != graph.edge_range(node).end {
                let edge = dfs_stack[top].next_edge;
                dfs_stack[top].next_edge += 1;
                let neighbor = graph.target(edge);
                let neighbor_state = states[neighbor as usize];
                if !neighbor_state.seen() {
                    // tree edge, descend
                    enter(neighbor, states, depth);
                    component_nodes.push(neighbor);
                    dfs_stack.push(Frame {
                        node: neighbor,
                        next_edge: graph.edge_range(neighbor).start,
                    });
                } else if neighbor_state.on_stack {
                    // back edge into the current search tree
                    let state = &mut states[node as usize];
                    state.low_link = state.low_link.min(neighbor_state.depth);
                }
                // seen but off the stack: cross edge into a closed
                // component, nothing to record
            } else {
                // all neighbors visited, close the node; members stay on the
                // component stack (and keep on_stack set) until their root
                // closes, so later cross edges into them still lower low-links
                if states[node as usize].is_component_root() {
                    loop {
                        let member = component_nodes
                            .pop()
                            .expect("component stack holds at least the root");
                        components[member as usize] = *assigned;
                        states[member as usize].on_stack = false;
                        if member == node {
                            break;
                        }
                    }
                    *assigned += 1;
                }

                // a recursive implementation would update the parent's
                // low-link after returning; mirror that before dropping
                // the frame
                let low = states[node as usize].low_link;
                dfs_stack.pop();
                if let Some(parent) = dfs_stack.last() {
                    let parent_state = &mut states[parent.node as usize];
                    parent_state.low_link = parent_state.low_link.min(low);
                }
            }
        }
    }
}
