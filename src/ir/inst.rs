use core::fmt;

use super::{Block, Context, Slot, Symbol};
use crate::{
    collections::{
        linked_list::LinkedListNodePtr,
        storage::{ArenaAlloc, ArenaFree, ArenaPtr, BaseArenaPtr},
    },
    impl_arena,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstKind {
    /// Read the memory slot.
    Load(Slot),
    /// Overwrite the memory slot.
    Store(Slot),
    /// Overwrite the memory slot with an externally observable effect.
    ///
    /// The write may be seen outside the function (memory-mapped I/O, a slot
    /// shared with another thread, etc.), so it is never a candidate for
    /// elimination and does not end the lifetime of earlier stores.
    VolatileStore(Slot),
    /// Call a function.
    ///
    /// Calls are opaque to the memory analysis, slots are not assumed to
    /// escape through them.
    Call(Symbol),
    /// Unconditional jump.
    Jump(Block),
    /// Two-way branch, the condition is not modeled.
    Br(Block, Block),
    /// Return from the function.
    Ret,
}

/// How an instruction accesses memory, as far as store liveness is concerned.
///
/// Every [InstKind] maps to exactly one variant, see [Inst::mem_access].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemAccess {
    /// The instruction reads the slot.
    Load(Slot),
    /// The instruction overwrites the slot, and the write is not observable
    /// by anything but later loads in this function.
    Store(Slot),
    /// No effect on slot liveness.
    Other,
}

pub struct InstData {
    /// The instruction kind.
    kind: InstKind,

    /// The next instruction.
    next: Option<Inst>,
    /// The previous instruction.
    prev: Option<Inst>,
    /// The parent block.
    parent: Option<Block>,
}

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq)]
pub struct Inst(BaseArenaPtr<InstData>);

impl_arena!(Context, InstData, Inst, insts);

impl Inst {
    /// Create a new detached instruction.
    pub fn new(ctx: &mut Context, kind: InstKind) -> Inst {
        ctx.alloc(InstData {
            kind,
            next: None,
            prev: None,
            parent: None,
        })
    }

    pub fn load(ctx: &mut Context, slot: Slot) -> Inst { Self::new(ctx, InstKind::Load(slot)) }

    pub fn store(ctx: &mut Context, slot: Slot) -> Inst { Self::new(ctx, InstKind::Store(slot)) }

    pub fn volatile_store(ctx: &mut Context, slot: Slot) -> Inst {
        Self::new(ctx, InstKind::VolatileStore(slot))
    }

    pub fn call(ctx: &mut Context, callee: impl Into<Symbol>) -> Inst {
        Self::new(ctx, InstKind::Call(callee.into()))
    }

    pub fn jump(ctx: &mut Context, dest: Block) -> Inst { Self::new(ctx, InstKind::Jump(dest)) }

    pub fn br(ctx: &mut Context, then_dest: Block, else_dest: Block) -> Inst {
        Self::new(ctx, InstKind::Br(then_dest, else_dest))
    }

    pub fn ret(ctx: &mut Context) -> Inst { Self::new(ctx, InstKind::Ret) }

    pub fn kind(self, ctx: &Context) -> &InstKind { &self.deref(ctx).kind }

    /// Classify the memory access of the instruction.
    ///
    /// New instruction kinds must be added here, the match is kept exhaustive
    /// on purpose.
    pub fn mem_access(self, ctx: &Context) -> MemAccess {
        match self.kind(ctx) {
            InstKind::Load(slot) => MemAccess::Load(*slot),
            InstKind::Store(slot) => MemAccess::Store(*slot),
            InstKind::VolatileStore(_)
            | InstKind::Call(_)
            | InstKind::Jump(_)
            | InstKind::Br(..)
            | InstKind::Ret => MemAccess::Other,
        }
    }

    pub fn is_terminator(self, ctx: &Context) -> bool {
        matches!(
            self.kind(ctx),
            InstKind::Jump(_) | InstKind::Br(..) | InstKind::Ret
        )
    }

    /// Get the successor blocks of the terminator, in operand order.
    ///
    /// Both targets are returned for a branch, even if they are the same
    /// block. Non-terminators have no successors.
    pub fn succ_blocks(self, ctx: &Context) -> Vec<Block> {
        match self.kind(ctx) {
            InstKind::Jump(dest) => vec![*dest],
            InstKind::Br(then_dest, else_dest) => vec![*then_dest, *else_dest],
            InstKind::Ret
            | InstKind::Load(_)
            | InstKind::Store(_)
            | InstKind::VolatileStore(_)
            | InstKind::Call(_) => Vec::new(),
        }
    }

    /// Free the instruction from the context.
    ///
    /// # Panics
    ///
    /// Panics if the instruction is still linked in a block.
    ///
    /// # See Also
    ///
    /// - [Inst::unlink]
    /// - [Inst::remove]
    pub fn drop(self, ctx: &mut Context) {
        if self.container(ctx).is_some() {
            panic!("cannot drop instruction because it is still linked");
        }
        ctx.free(self);
    }

    /// Unlink the instruction from its block and free it.
    pub fn remove(self, ctx: &mut Context) {
        self.unlink(ctx);
        self.drop(ctx);
    }

    pub fn id(self) -> usize { self.0.id() }

    pub fn display(self, ctx: &Context, debug: bool) -> DisplayInst<'_> {
        DisplayInst {
            ctx,
            inst: self,
            debug,
        }
    }
}

impl LinkedListNodePtr for Inst {
    type ContainerPtr = Block;

    fn next(self, ctx: &Context) -> Option<Inst> { self.deref(ctx).next }

    fn prev(self, ctx: &Context) -> Option<Inst> { self.deref(ctx).prev }

    fn set_next(self, ctx: &mut Context, next: Option<Inst>) { self.deref_mut(ctx).next = next; }

    fn set_prev(self, ctx: &mut Context, prev: Option<Inst>) { self.deref_mut(ctx).prev = prev; }

    fn container(self, ctx: &Context) -> Option<Block> { self.deref(ctx).parent }

    fn set_container(self, ctx: &mut Context, container: Option<Block>) {
        self.deref_mut(ctx).parent = container;
    }
}

pub struct DisplayInst<'a> {
    ctx: &'a Context,
    inst: Inst,
    debug: bool,
}

impl fmt::Display for DisplayInst<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctx = self.ctx;

        match self.inst.kind(ctx) {
            InstKind::Load(slot) => write!(f, "load {}", slot.display(ctx))?,
            InstKind::Store(slot) => write!(f, "store {}", slot.display(ctx))?,
            InstKind::VolatileStore(slot) => write!(f, "store.volatile {}", slot.display(ctx))?,
            InstKind::Call(callee) => write!(f, "call @{}", callee)?,
            InstKind::Jump(dest) => write!(f, "jump ^{}", dest.name(ctx))?,
            InstKind::Br(then_dest, else_dest) => write!(
                f,
                "br ^{}, ^{}",
                then_dest.name(ctx),
                else_dest.name(ctx)
            )?,
            InstKind::Ret => write!(f, "ret")?,
        }

        if self.debug {
            write!(f, " /* {} */", self.inst.id())?;
        }

        Ok(())
    }
}
