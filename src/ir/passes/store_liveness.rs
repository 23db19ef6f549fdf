//! # Store Liveness Analysis
//!
//! A backward data flow analysis over memory slots. A slot is live at a
//! program point if some path from that point loads the slot before storing
//! to it again. For each reachable block `B`:
//!
//! ```text
//! out[B] = U in[S] for all S in succ[B]
//! in[B]  = transfer(B, out[B])
//! ```
//!
//! where the transfer function walks the block bottom-up, adding the slot of
//! each load and removing the slot of each store. The sets start empty and
//! only grow, so the iteration stops at the least fixed point.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::{
    collections::{linked_list::LinkedListContainerPtr, storage::ArenaPtr},
    ir::{
        passman::{LocalPass, PassError, PassResult},
        Block,
        Context,
        Func,
        Inst,
        MemAccess,
        Slot,
    },
    utils::{
        cfg::{CfgInfo, CfgNode, CfgRegion},
        dfs::DfsContext,
    },
};

pub const STORE_LIVENESS: &str = "store-liveness";

pub type SlotSet = FxHashSet<Slot>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreLivenessError {
    #[error("function @{0} has no entry block")]
    MissingEntry(String),

    #[error("liveness of block ^{block} in @{func} is not a fixed point")]
    NotFixedPoint { func: String, block: String },
}

impl From<StoreLivenessError> for PassError {
    fn from(err: StoreLivenessError) -> Self { PassError::analysis_error(STORE_LIVENESS, Box::new(err)) }
}

/// Apply the instructions of `block` to `live`, from the last to the first.
///
/// On entry `live` holds the slots live after the block, on return the slots
/// live before it.
pub fn transfer(ctx: &Context, block: Block, live: &mut SlotSet) {
    for inst in block.iter(ctx).rev() {
        match inst.mem_access(ctx) {
            MemAccess::Load(slot) => {
                live.insert(slot);
            }
            MemAccess::Store(slot) => {
                live.remove(&slot);
            }
            MemAccess::Other => {}
        }
    }
}

/// The converged liveness of one function.
pub struct StoreLiveness {
    func: Func,
    cfg: CfgInfo<Block>,
    /// Reachable blocks in post-order.
    order: Vec<Block>,
    live_in: FxHashMap<Block, SlotSet>,
    live_out: FxHashMap<Block, SlotSet>,
    iterations: usize,
}

impl StoreLiveness {
    /// Solve the liveness equations of `func`.
    pub fn new(ctx: &Context, func: Func) -> Result<Self, StoreLivenessError> {
        if func.entry(ctx).is_none() {
            return Err(StoreLivenessError::MissingEntry(func.name(ctx).to_string()));
        }

        let cfg = func.cfg_info(ctx);
        let order: Vec<Block> = DfsContext::<Block>::default()
            .post_order_iter(ctx, func)
            .collect();

        let mut live_in: FxHashMap<Block, SlotSet> = FxHashMap::default();
        let mut live_out: FxHashMap<Block, SlotSet> = FxHashMap::default();

        for &block in order.iter() {
            live_in.insert(block, SlotSet::default());
            live_out.insert(block, SlotSet::default());
        }

        let mut iterations = 0;
        let mut changed = true;

        while changed {
            changed = false;
            iterations += 1;

            for &block in order.iter() {
                // out[B] = U in[S] for all S in succ[B], with the values of
                // this round for successors already visited.
                let mut out_set = SlotSet::default();
                for succ in cfg.succs(block).unwrap_or(&[]) {
                    out_set.extend(live_in[succ].iter().copied());
                }

                let mut in_set = out_set.clone();
                transfer(ctx, block, &mut in_set);

                if live_out[&block] != out_set {
                    live_out.insert(block, out_set);
                    changed = true;
                }

                if live_in[&block] != in_set {
                    live_in.insert(block, in_set);
                    changed = true;
                }
            }

            log::trace!(
                "[ store-liveness ] @{} round {}: changed = {}",
                func.name(ctx),
                iterations,
                changed
            );
        }

        log::debug!(
            "[ store-liveness ] @{} converged after {} iterations over {} blocks",
            func.name(ctx),
            iterations,
            order.len()
        );

        Ok(Self {
            func,
            cfg,
            order,
            live_in,
            live_out,
            iterations,
        })
    }

    /// The reachable blocks, in the post-order the solver visited them.
    pub fn order(&self) -> &[Block] { &self.order }

    /// The slots live at the first instruction of `block`.
    ///
    /// `None` if the block is not reachable from the entry.
    pub fn live_in(&self, block: Block) -> Option<&SlotSet> { self.live_in.get(&block) }

    /// The slots live right after the last instruction of `block`.
    ///
    /// `None` if the block is not reachable from the entry.
    pub fn live_out(&self, block: Block) -> Option<&SlotSet> { self.live_out.get(&block) }

    pub fn is_reachable(&self, block: Block) -> bool { self.cfg.is_reachable(block) }

    /// The number of rounds over all blocks, the last one changes nothing.
    pub fn iterations(&self) -> usize { self.iterations }

    /// The distinct successors of a reachable block.
    pub fn succs(&self, block: Block) -> Option<&[Block]> { self.cfg.succs(block) }

    /// The reachable predecessors of a reachable block.
    pub fn preds(&self, block: Block) -> Option<&[Block]> { self.cfg.preds(block) }

    /// Apply both equations once more and check nothing moves.
    ///
    /// Successors are read again from `ctx`, so instructions or edges changed
    /// after the solve are reported, as is a block that has been freed. Blocks
    /// that became reachable later are not visited.
    pub fn check_fixed_point(&self, ctx: &Context) -> Result<(), StoreLivenessError> {
        let not_fixed_point = |block: String| StoreLivenessError::NotFixedPoint {
            func: self.func.name(ctx).to_string(),
            block,
        };

        for &block in self.order.iter() {
            if block.try_deref(ctx).is_none() {
                return Err(not_fixed_point(format!("bb{}", block.id())));
            }

            let mut out_set = SlotSet::default();
            for succ in block.succs(ctx) {
                match self.live_in.get(&succ) {
                    Some(live) => out_set.extend(live.iter().copied()),
                    None => return Err(not_fixed_point(block.name(ctx))),
                }
            }

            let mut in_set = out_set.clone();
            transfer(ctx, block, &mut in_set);

            if self.live_out[&block] != out_set || self.live_in[&block] != in_set {
                return Err(not_fixed_point(block.name(ctx)));
            }
        }
        Ok(())
    }

    /// Collect the stores whose slot is not live right after them.
    ///
    /// Each reachable block is scanned once, bottom-up from `out[B]`, with the
    /// same rules as [transfer], except that a store to a dead slot is
    /// recorded instead of changing the set. Nothing is modified, the stores
    /// are returned block by block, bottom-up within a block.
    pub fn dead_stores(&self, ctx: &Context) -> Vec<Inst> {
        let mut dead = Vec::new();

        for &block in self.order.iter() {
            let mut live = self.live_out[&block].clone();

            for inst in block.iter(ctx).rev() {
                match inst.mem_access(ctx) {
                    MemAccess::Load(slot) => {
                        live.insert(slot);
                    }
                    MemAccess::Store(slot) => {
                        if !live.remove(&slot) {
                            dead.push(inst);
                        }
                    }
                    MemAccess::Other => {}
                }
            }
        }

        dead
    }
}

/// The analysis pass computing [StoreLiveness].
#[derive(Default)]
pub struct StoreLivenessAnalysis;

impl LocalPass for StoreLivenessAnalysis {
    type Output = StoreLiveness;

    fn run(&mut self, ctx: &Context, func: Func) -> PassResult<Self::Output> {
        Ok(StoreLiveness::new(ctx, func)?)
    }
}
