#![allow(dead_code)]

use orzdse::{
    collections::{
        linked_list::LinkedListContainerPtr,
        storage::{ArenaAlloc, ArenaPtr, BaseArena, BaseArenaPtr},
    },
    impl_arena,
    ir::{Block, Context, Func, Inst, Slot},
    utils::cfg::{CfgNode, CfgRegion},
};

// A bare control flow graph, without instructions, to test the graph
// utilities on shapes the IR terminators cannot express.

#[derive(Default)]
pub struct CfgContext {
    blocks: BaseArena<CfgBlockData>,
    funcs: BaseArena<CfgFuncData>,
}

pub struct CfgBlockData {
    succs: Vec<CfgBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CfgBlock(BaseArenaPtr<CfgBlockData>);

impl_arena!(CfgContext, CfgBlockData, CfgBlock, blocks);

pub struct CfgFuncData {
    entry: CfgBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CfgFunc(BaseArenaPtr<CfgFuncData>);

impl_arena!(CfgContext, CfgFuncData, CfgFunc, funcs);

impl CfgNode for CfgBlock {
    type Region = CfgFunc;

    fn succs(self, arena: &Self::A) -> Vec<Self> { self.deref(arena).succs.clone() }
}

impl CfgRegion for CfgFunc {
    type Node = CfgBlock;

    fn entry_node(self, arena: &Self::A) -> Self::Node { self.deref(arena).entry }
}

impl CfgFunc {
    pub fn new(arena: &mut CfgContext, entry: CfgBlock) -> Self {
        arena.alloc(CfgFuncData { entry })
    }
}

impl CfgBlock {
    pub fn new(arena: &mut CfgContext) -> Self { arena.alloc(CfgBlockData { succs: Vec::new() }) }

    pub fn add_succ(self, arena: &mut CfgContext, succ: CfgBlock) {
        self.deref_mut(arena).succs.push(succ);
    }

    pub fn id(self) -> usize { self.0.id() }
}

// Helpers to build IR functions.

pub fn block(ctx: &mut Context, func: Func, name: &str) -> Block {
    let block = Block::with_name(ctx, name);
    func.push_back(ctx, block);
    block
}

pub fn push(ctx: &mut Context, block: Block, inst: Inst) -> Inst {
    block.push_back(ctx, inst);
    inst
}

pub fn load(ctx: &mut Context, block: Block, slot: Slot) -> Inst {
    let inst = Inst::load(ctx, slot);
    push(ctx, block, inst)
}

pub fn store(ctx: &mut Context, block: Block, slot: Slot) -> Inst {
    let inst = Inst::store(ctx, slot);
    push(ctx, block, inst)
}

pub fn volatile_store(ctx: &mut Context, block: Block, slot: Slot) -> Inst {
    let inst = Inst::volatile_store(ctx, slot);
    push(ctx, block, inst)
}

pub fn call(ctx: &mut Context, block: Block, callee: &str) -> Inst {
    let inst = Inst::call(ctx, callee);
    push(ctx, block, inst)
}

pub fn jump(ctx: &mut Context, block: Block, dest: Block) -> Inst {
    let inst = Inst::jump(ctx, dest);
    push(ctx, block, inst)
}

pub fn br(ctx: &mut Context, block: Block, then_dest: Block, else_dest: Block) -> Inst {
    let inst = Inst::br(ctx, then_dest, else_dest);
    push(ctx, block, inst)
}

pub fn ret(ctx: &mut Context, block: Block) -> Inst {
    let inst = Inst::ret(ctx);
    push(ctx, block, inst)
}

pub fn insts(ctx: &Context, block: Block) -> Vec<Inst> { block.iter(ctx).collect() }

pub fn dump(ctx: &Context, func: Func) -> String { func.display(ctx, false).to_string() }
