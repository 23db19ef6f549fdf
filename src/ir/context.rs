use core::fmt;

use rustc_hash::FxHashMap;

use super::{BlockData, Func, FuncData, InstData, SlotData, Symbol};
use crate::collections::storage::BaseArena;

/// The context of the IR.
///
/// A context owns every entity of the IR. Entities refer to each other by
/// arena handles, and the context must be passed to dereference them.
#[derive(Default)]
pub struct Context {
    // +-----------------+
    // |    storages     |
    // +-----------------+
    /// The storage of blocks.
    pub(super) blocks: BaseArena<BlockData>,
    /// The storage of instructions.
    pub(super) insts: BaseArena<InstData>,
    /// The storage of memory slots.
    pub(super) slots: BaseArena<SlotData>,
    /// The storage of functions.
    pub(super) funcs: BaseArena<FuncData>,

    /// The functions defined in the context, by name.
    pub(super) symbols: FxHashMap<Symbol, Func>,
}

impl Context {
    /// Map the name of the function to the function.
    ///
    /// # Panics
    ///
    /// Panics if the symbol is already defined.
    pub(super) fn insert_func(&mut self, func: Func) {
        let symbol = func.name(self).clone();
        if self.symbols.contains_key(&symbol) {
            panic!("symbol {:?} is already defined", symbol);
        }
        self.symbols.insert(symbol, func);
    }

    /// Lookup a function by its name.
    pub fn lookup_func(&self, symbol: impl Into<Symbol>) -> Option<Func> {
        self.symbols.get(&symbol.into()).copied()
    }

    /// All the functions in the context, in creation order.
    pub fn funcs(&self) -> Vec<Func> {
        self.funcs
            .iter()
            .map(|(_, data)| data.self_ptr())
            .collect()
    }

    /// The number of live instructions in the context, including the detached
    /// ones that are not freed yet.
    pub fn num_insts(&self) -> usize { self.insts.len() }

    pub fn display(&self, debug: bool) -> DisplayContext<'_> { DisplayContext { ctx: self, debug } }
}

pub struct DisplayContext<'a> {
    ctx: &'a Context,
    debug: bool,
}

impl fmt::Display for DisplayContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for func in self.ctx.funcs() {
            writeln!(f, "{}", func.display(self.ctx, self.debug))?;
            writeln!(f)?;
        }
        Ok(())
    }
}
