use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::collections::storage::ArenaPtr;

/// A node in a control flow graph.
pub trait CfgNode: ArenaPtr {
    /// The region type associated with the node.
    type Region: CfgRegion<A = Self::A, Node = Self>;

    /// Get the successors of the node.
    ///
    /// Successors are read from the node itself, predecessors need a
    /// traversal of the whole region, see [CfgInfo].
    fn succs(self, arena: &Self::A) -> Vec<Self>;
}

/// A region with a single entry node, e.g., a function.
pub trait CfgRegion: ArenaPtr {
    /// The node type associated with the region.
    type Node: CfgNode<A = Self::A, Region = Self> + Hash;

    /// Get the entry node of the region.
    fn entry_node(self, arena: &Self::A) -> Self::Node;

    /// Generate the control flow information for the region.
    fn cfg_info(self, arena: &Self::A) -> CfgInfo<Self::Node> { CfgInfo::new(arena, self) }
}

/// Successors and predecessors of the nodes reachable from the entry.
pub struct CfgInfo<N>
where
    N: CfgNode,
{
    /// The successors of each node, without duplicates.
    succs: FxHashMap<N, Vec<N>>,
    /// The predecessors of each node, without duplicates.
    preds: FxHashMap<N, Vec<N>>,
}

impl<N> CfgInfo<N>
where
    N: CfgNode + Hash,
{
    /// Derive the control flow graph information from the region.
    ///
    /// Only the nodes reachable from the entry are recorded, edges coming from
    /// unreachable nodes are ignored.
    pub fn new(arena: &N::A, region: N::Region) -> Self {
        let mut succs: FxHashMap<N, Vec<N>> = FxHashMap::default();
        let mut preds: FxHashMap<N, Vec<N>> = FxHashMap::default();

        let entry = region.entry_node(arena);

        let mut worklist: Vec<N> = vec![entry];
        let mut visited = FxHashSet::default();

        while let Some(node) = worklist.pop() {
            if !visited.insert(node) {
                continue;
            }

            succs.entry(node).or_default();
            preds.entry(node).or_default();

            for succ in node.succs(arena) {
                // a branch may target the same block twice
                let node_succs = succs.entry(node).or_default();
                if !node_succs.contains(&succ) {
                    node_succs.push(succ);
                }
                let succ_preds = preds.entry(succ).or_default();
                if !succ_preds.contains(&node) {
                    succ_preds.push(node);
                }

                worklist.push(succ);
            }
        }

        Self { succs, preds }
    }

    /// Get the successors of a node.
    ///
    /// # Returns
    ///
    /// - `Some(succs)`: The successors of the node, in the order of the
    ///   terminator's targets.
    /// - `None`: The node is not reachable.
    pub fn succs(&self, node: N) -> Option<&[N]> { self.succs.get(&node).map(|v| v.as_slice()) }

    /// Get the predecessors of a node.
    ///
    /// The order of predecessors is not guaranteed.
    ///
    /// # Returns
    ///
    /// - `Some(preds)`: The reachable predecessors of the node.
    /// - `None`: The node is not reachable.
    pub fn preds(&self, node: N) -> Option<&[N]> { self.preds.get(&node).map(|v| v.as_slice()) }

    /// Check if the node is reachable from the entry.
    pub fn is_reachable(&self, node: N) -> bool { self.succs.contains_key(&node) }
}
