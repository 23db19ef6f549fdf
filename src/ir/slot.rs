use core::fmt;

use super::Context;
use crate::{
    collections::storage::{ArenaAlloc, ArenaPtr, BaseArenaPtr},
    impl_arena,
};

/// A memory slot, the location a load or a store refers to.
///
/// Slots are compared by identity only: two accesses touch the same memory iff
/// they carry the same [Slot]. No alias information is attached, two distinct
/// slots never overlap.
pub struct SlotData {
    /// The name of the slot, only used for display.
    name: String,
}

#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq)]
pub struct Slot(BaseArenaPtr<SlotData>);

impl_arena!(Context, SlotData, Slot, slots);

impl Slot {
    pub fn new(ctx: &mut Context, name: impl Into<String>) -> Slot {
        ctx.alloc(SlotData {
            name: name.into(),
        })
    }

    pub fn name(self, ctx: &Context) -> &str { &self.deref(ctx).name }

    pub fn id(self) -> usize { self.0.id() }

    pub fn display(self, ctx: &Context) -> DisplaySlot<'_> { DisplaySlot { ctx, slot: self } }
}

pub struct DisplaySlot<'a> {
    ctx: &'a Context,
    slot: Slot,
}

impl fmt::Display for DisplaySlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.slot.name(self.ctx))
    }
}
