mod block;
mod context;
mod global;
mod inst;
mod slot;

pub mod passes;
pub mod passman;
pub mod verify;

pub use block::{Block, BlockData, DisplayBlock};
pub use context::{Context, DisplayContext};
pub use global::{DisplayFunc, Func, FuncData, Symbol};
pub use inst::{DisplayInst, Inst, InstData, InstKind, MemAccess};
pub use slot::{Slot, SlotData};
