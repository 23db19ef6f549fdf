use core::fmt;

use super::{Block, Context};
use crate::{
    collections::{
        linked_list::LinkedListContainerPtr,
        storage::{ArenaAlloc, ArenaPtr, BaseArenaPtr},
    },
    impl_arena,
    utils::cfg::CfgRegion,
};

/// The name of a function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self { Symbol(name.to_string()) }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self { Symbol(name) }
}

/// The data of a function.
///
/// Blocks are kept in an intrusive linked list, the head block is the entry
/// of the control flow graph.
pub struct FuncData {
    self_ptr: Func,
    /// The name of the function.
    name: Symbol,
    /// The head block of the function, also the entry block in control flow.
    head: Option<Block>,
    /// The tail block of the function, not necessarily an exit block.
    tail: Option<Block>,
}

impl FuncData {
    pub fn self_ptr(&self) -> Func { self.self_ptr }
}

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq)]
pub struct Func(BaseArenaPtr<FuncData>);

impl_arena!(Context, FuncData, Func, funcs);

impl Func {
    /// Create a function and register its name in the context.
    ///
    /// # Panics
    ///
    /// Panics if the name is already defined, check with
    /// [Context::lookup_func] first.
    pub fn new(ctx: &mut Context, name: impl Into<Symbol>) -> Func {
        let func = ctx.alloc_with(|self_ptr| FuncData {
            self_ptr,
            name: name.into(),
            head: None,
            tail: None,
        });
        ctx.insert_func(func);
        func
    }

    pub fn name(self, ctx: &Context) -> &Symbol { &self.deref(ctx).name }

    /// The entry block, if the function has any block.
    pub fn entry(self, ctx: &Context) -> Option<Block> { self.head(ctx) }

    pub fn id(self) -> usize { self.0.id() }

    pub fn display(self, ctx: &Context, debug: bool) -> DisplayFunc<'_> {
        DisplayFunc {
            ctx,
            data: self.deref(ctx),
            debug,
        }
    }
}

impl CfgRegion for Func {
    type Node = Block;

    fn entry_node(self, arena: &Self::A) -> Self::Node {
        self.head(arena).expect("entry block of function not found")
    }
}

impl LinkedListContainerPtr<Block> for Func {
    fn head(self, arena: &Self::A) -> Option<Block> { self.deref(arena).head }

    fn tail(self, arena: &Self::A) -> Option<Block> { self.deref(arena).tail }

    fn set_head(self, arena: &mut Self::A, head: Option<Block>) {
        self.deref_mut(arena).head = head;
    }

    fn set_tail(self, arena: &mut Self::A, tail: Option<Block>) {
        self.deref_mut(arena).tail = tail;
    }
}

pub struct DisplayFunc<'a> {
    ctx: &'a Context,
    data: &'a FuncData,
    debug: bool,
}

impl fmt::Display for DisplayFunc<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func @{}", self.data.name)?;

        if self.debug {
            write!(f, " /* {} */", self.data.self_ptr().id())?;
        }

        writeln!(f, " {{")?;

        for block in self.data.self_ptr().iter(self.ctx) {
            write!(f, "{}", block.display(self.ctx, self.debug))?;
        }

        write!(f, "}}")
    }
}
