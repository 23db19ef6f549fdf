use core::fmt;

use super::{Context, Func, Inst};
use crate::{
    collections::{
        linked_list::{LinkedListContainerPtr, LinkedListNodePtr},
        storage::{ArenaAlloc, ArenaPtr, BaseArenaPtr},
    },
    impl_arena,
    utils::cfg::CfgNode,
};

/// The data of a block.
pub struct BlockData {
    /// The label of the block, `None` to print a generated one.
    name: Option<String>,
    /// The first instruction of the block.
    head: Option<Inst>,
    /// The last instruction of the block.
    tail: Option<Inst>,
    /// The next block in the function layout.
    next: Option<Block>,
    /// The previous block in the function layout.
    prev: Option<Block>,
    /// The parent function of the block.
    parent: Option<Func>,
}

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq)]
pub struct Block(BaseArenaPtr<BlockData>);

impl_arena!(Context, BlockData, Block, blocks);

impl Block {
    /// Create a new detached block without instructions.
    pub fn new(ctx: &mut Context) -> Block {
        ctx.alloc(BlockData {
            name: None,
            head: None,
            tail: None,
            next: None,
            prev: None,
            parent: None,
        })
    }

    /// Create a new block with a label.
    pub fn with_name(ctx: &mut Context, name: impl Into<String>) -> Block {
        let block = Block::new(ctx);
        block.deref_mut(ctx).name = Some(name.into());
        block
    }

    /// The label of the block.
    ///
    /// Unnamed blocks are labeled after their arena index.
    pub fn name(self, ctx: &Context) -> String {
        match &self.deref(ctx).name {
            Some(name) => name.clone(),
            None => format!("bb{}", self.id()),
        }
    }

    /// The terminator of the block, if the block ends with one.
    pub fn terminator(self, ctx: &Context) -> Option<Inst> {
        self.tail(ctx).filter(|inst| inst.is_terminator(ctx))
    }

    pub fn id(self) -> usize { self.0.id() }

    pub fn display(self, ctx: &Context, debug: bool) -> DisplayBlock<'_> {
        DisplayBlock {
            ctx,
            block: self,
            debug,
        }
    }
}

impl CfgNode for Block {
    type Region = Func;

    /// The successors are the targets of the terminator. A block that does not
    /// end with a terminator leaves the function.
    fn succs(self, arena: &Self::A) -> Vec<Self> {
        match self.terminator(arena) {
            Some(inst) => inst.succ_blocks(arena),
            None => Vec::new(),
        }
    }
}

impl LinkedListContainerPtr<Inst> for Block {
    fn head(self, ctx: &Context) -> Option<Inst> { self.deref(ctx).head }

    fn tail(self, ctx: &Context) -> Option<Inst> { self.deref(ctx).tail }

    fn set_head(self, ctx: &mut Context, head: Option<Inst>) { self.deref_mut(ctx).head = head; }

    fn set_tail(self, ctx: &mut Context, tail: Option<Inst>) { self.deref_mut(ctx).tail = tail; }
}

impl LinkedListNodePtr for Block {
    type ContainerPtr = Func;

    fn next(self, ctx: &Context) -> Option<Block> { self.deref(ctx).next }

    fn prev(self, ctx: &Context) -> Option<Block> { self.deref(ctx).prev }

    fn set_next(self, ctx: &mut Context, next: Option<Block>) { self.deref_mut(ctx).next = next; }

    fn set_prev(self, ctx: &mut Context, prev: Option<Block>) { self.deref_mut(ctx).prev = prev; }

    fn container(self, ctx: &Context) -> Option<Func> { self.deref(ctx).parent }

    fn set_container(self, ctx: &mut Context, container: Option<Func>) {
        self.deref_mut(ctx).parent = container;
    }
}

pub struct DisplayBlock<'a> {
    ctx: &'a Context,
    block: Block,
    debug: bool,
}

impl fmt::Display for DisplayBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "^{}:", self.block.name(self.ctx))?;

        if self.debug {
            write!(f, " /* {} */", self.block.id())?;
        }

        writeln!(f)?;

        for inst in self.block.iter(self.ctx) {
            writeln!(f, "    {}", inst.display(self.ctx, self.debug))?;
        }

        Ok(())
    }
}
