//! Structural checks on the control flow graph.
//!
//! The passes assume a consistent graph and do not check it themselves, a
//! caller building IR by hand can run [Verify::verify] first.

use thiserror::Error;

use super::{Context, Func};
use crate::collections::linked_list::{LinkedListContainerPtr, LinkedListNodePtr};

pub trait Verify {
    type Error;

    fn verify(&self, ctx: &Context) -> Result<(), Self::Error>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("function @{func} has no blocks")]
    EmptyFunc { func: String },

    #[error("terminator in the middle of block ^{block} in @{func}")]
    TerminatorNotLast { func: String, block: String },

    #[error("block ^{block} in @{func} branches to ^{succ} outside of the function")]
    ForeignSuccessor {
        func: String,
        block: String,
        succ: String,
    },
}

impl Verify for Func {
    type Error = VerifyError;

    fn verify(&self, ctx: &Context) -> Result<(), Self::Error> {
        let func = *self;
        let func_name = || func.name(ctx).to_string();

        if func.entry(ctx).is_none() {
            return Err(VerifyError::EmptyFunc { func: func_name() });
        }

        for block in func.iter(ctx) {
            let tail = block.tail(ctx);
            for inst in block.iter(ctx) {
                if inst.is_terminator(ctx) && Some(inst) != tail {
                    return Err(VerifyError::TerminatorNotLast {
                        func: func_name(),
                        block: block.name(ctx),
                    });
                }
            }

            if let Some(terminator) = block.terminator(ctx) {
                for succ in terminator.succ_blocks(ctx) {
                    if succ.container(ctx) != Some(func) {
                        return Err(VerifyError::ForeignSuccessor {
                            func: func_name(),
                            block: block.name(ctx),
                            succ: succ.name(ctx),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
