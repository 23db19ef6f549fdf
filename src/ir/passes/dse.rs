//! # Dead Store Elimination
//!
//! Removes stores whose value can never be loaded: on every path from the
//! store, the slot is stored again or the function returns before any load of
//! it. The whole function is analyzed first (see
//! [store_liveness](super::store_liveness)), and only then are the dead stores
//! erased, so the IR never changes under the solver.

use super::store_liveness::StoreLiveness;
use crate::ir::{
    passman::{GlobalPassMut, LocalPassMut, ParamStorage, PassResult},
    Context,
    Func,
    Inst,
};

/// Parameter: validate the liveness fixed point before erasing anything.
pub const DSE_CHECK_FIXED_POINT: &str = "dse-check-fixed-point";

#[derive(Debug, Default, Clone)]
pub struct DeadStoreElim {
    check_fixed_point: bool,
}

impl DeadStoreElim {
    pub fn new() -> Self { Self::default() }

    pub fn with_fixed_point_check(mut self, check: bool) -> Self {
        self.check_fixed_point = check;
        self
    }

    /// Register the parameters of this pass with their defaults.
    pub fn register_params(params: &mut ParamStorage) {
        params.insert(DSE_CHECK_FIXED_POINT, false);
    }

    /// Solve the liveness of `func` and collect its dead stores.
    fn collect(&self, ctx: &Context, func: Func) -> PassResult<Vec<Inst>> {
        let liveness = StoreLiveness::new(ctx, func)?;

        if self.check_fixed_point {
            liveness.check_fixed_point(ctx)?;
        }

        Ok(liveness.dead_stores(ctx))
    }
}

/// Unlink and free the collected stores, returning how many were removed.
fn erase(ctx: &mut Context, func: Func, dead_stores: Vec<Inst>) -> usize {
    if !dead_stores.is_empty() {
        log::debug!(
            "[ dse ] @{}: removing {} dead store(s)",
            func.name(ctx),
            dead_stores.len()
        );
    }

    let removed = dead_stores.len();
    for inst in dead_stores {
        log::trace!("[ dse ] removing {}", inst.display(ctx, true));
        inst.remove(ctx);
    }
    removed
}

impl LocalPassMut for DeadStoreElim {
    /// The number of removed stores.
    type Output = usize;

    fn run(&mut self, ctx: &mut Context, func: Func) -> PassResult<(Self::Output, bool)> {
        let dead_stores = self.collect(ctx, func)?;
        let removed = erase(ctx, func, dead_stores);
        Ok((removed, removed > 0))
    }

    fn fetch_params(&mut self, params: &ParamStorage) {
        self.check_fixed_point = params
            .get(DSE_CHECK_FIXED_POINT)
            .unwrap_or(self.check_fixed_point);
    }
}

impl GlobalPassMut for DeadStoreElim {
    /// The number of removed stores in all functions.
    type Output = usize;

    /// Analyze every function before erasing anything, so an error leaves the
    /// whole context untouched.
    fn run(&mut self, ctx: &mut Context) -> PassResult<(Self::Output, bool)> {
        let mut batches = Vec::new();
        for func in ctx.funcs() {
            batches.push((func, self.collect(ctx, func)?));
        }

        // functions are analyzed independently, erasing in one does not
        // change the verdict of another
        let removed: usize = batches
            .into_iter()
            .map(|(func, dead_stores)| erase(ctx, func, dead_stores))
            .sum();

        Ok((removed, removed > 0))
    }

    fn fetch_params(&mut self, params: &ParamStorage) {
        LocalPassMut::fetch_params(self, params);
    }
}

/// Run dead store elimination on `func` with the default parameters.
///
/// # Returns
///
/// Whether any store was removed.
pub fn eliminate_dead_stores(ctx: &mut Context, func: Func) -> PassResult<bool> {
    let (_, changed) = LocalPassMut::run(&mut DeadStoreElim::new(), ctx, func)?;
    Ok(changed)
}
