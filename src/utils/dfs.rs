//! # Depth-First Search on Control Flow Graph
//!
//! The traversal keeps an explicit stack instead of recursing, so the depth of
//! the graph does not bound the native stack. It yields [Event::Enter] when a
//! node is first reached and [Event::Leave] once every node reachable through
//! its unvisited successors has been left, which gives pre-order and
//! post-order as filtered views of the same walk.

use std::hash::Hash;

use rustc_hash::FxHashSet;

use super::cfg::{CfgNode, CfgRegion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Enter,
    Leave,
}

/// Reusable state of the traversal.
pub struct DfsContext<N>
where
    N: CfgNode,
{
    stack: Vec<(Event, N)>,
    visited: FxHashSet<N>,
}

impl<N> Default for DfsContext<N>
where
    N: CfgNode,
{
    fn default() -> Self {
        Self {
            stack: Vec::new(),
            visited: FxHashSet::default(),
        }
    }
}

impl<N> DfsContext<N>
where
    N: CfgNode + Hash,
{
    /// Walk the nodes reachable from the entry of `region`.
    ///
    /// Unreachable nodes are never yielded, and each reachable node is entered
    /// and left exactly once.
    pub fn iter<'a>(&'a mut self, arena: &'a N::A, region: N::Region) -> DfsIterator<'a, N> {
        self.stack.clear();
        self.visited.clear();
        let entry = region.entry_node(arena);
        self.stack.push((Event::Enter, entry));
        DfsIterator { arena, dfs: self }
    }

    pub fn pre_order_iter<'a>(
        &'a mut self,
        arena: &'a N::A,
        region: N::Region,
    ) -> DfsPreOrderIterator<'a, N> {
        DfsPreOrderIterator(self.iter(arena, region))
    }

    /// Nodes in post-order: a node comes after every node first reached
    /// through it.
    ///
    /// This is the iteration order of backward data flow analyses, successors
    /// tend to be updated before their predecessors.
    pub fn post_order_iter<'a>(
        &'a mut self,
        arena: &'a N::A,
        region: N::Region,
    ) -> DfsPostOrderIterator<'a, N> {
        DfsPostOrderIterator(self.iter(arena, region))
    }
}

pub struct DfsIterator<'a, N>
where
    N: CfgNode,
{
    arena: &'a N::A,
    dfs: &'a mut DfsContext<N>,
}

impl<'a, N> Iterator for DfsIterator<'a, N>
where
    N: CfgNode + Hash,
{
    type Item = (Event, N);

    fn next(&mut self) -> Option<Self::Item> {
        let (event, node) = loop {
            let (event, node) = self.dfs.stack.pop()?;
            // a node can be pushed by several predecessors before it is
            // entered, only the first one counts.
            if event == Event::Enter && self.dfs.visited.contains(&node) {
                continue;
            }
            break (event, node);
        };

        if event == Event::Enter {
            self.dfs.visited.insert(node);
            self.dfs.stack.push((Event::Leave, node));

            let succs = node.succs(self.arena);

            // reversed, so the first successor is on top of the stack and is
            // explored first.
            self.dfs.stack.extend(
                succs
                    .into_iter()
                    .rev()
                    .filter(|succ| !self.dfs.visited.contains(succ))
                    .map(|succ| (Event::Enter, succ)),
            );
        }

        Some((event, node))
    }
}

pub struct DfsPreOrderIterator<'a, N>(DfsIterator<'a, N>)
where
    N: CfgNode;

impl<'a, N> Iterator for DfsPreOrderIterator<'a, N>
where
    N: CfgNode + Hash,
{
    type Item = N;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.0.next()? {
                (Event::Enter, node) => return Some(node),
                (Event::Leave, _) => continue,
            }
        }
    }
}

pub struct DfsPostOrderIterator<'a, N>(DfsIterator<'a, N>)
where
    N: CfgNode;

impl<'a, N> Iterator for DfsPostOrderIterator<'a, N>
where
    N: CfgNode + Hash,
{
    type Item = N;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.0.next()? {
                (Event::Leave, node) => return Some(node),
                (Event::Enter, _) => continue,
            }
        }
    }
}
