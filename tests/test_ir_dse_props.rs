//! Random control flow graphs checked against a direct path search.
//!
//! A store is dead iff no path from the point right after it reaches a load
//! of the same slot before another store to it. The search below walks the
//! paths explicitly, without any data flow sets.

use std::collections::HashSet;

use orzdse::ir::{
    passes::{dse::eliminate_dead_stores, store_liveness::StoreLiveness},
    Block,
    Context,
    Func,
    Inst,
    Slot,
};
use proptest::prelude::*;

mod common;

const NUM_SLOTS: usize = 3;
const MAX_BLOCKS: usize = 6;

#[derive(Debug, Clone)]
enum Op {
    Load(usize),
    Store(usize),
    VolatileStore(usize),
    Call,
}

#[derive(Debug, Clone)]
enum Term {
    /// The block ends without a terminator.
    Missing,
    Ret,
    Jump(usize),
    Br(usize, usize),
}

type Shape = Vec<(Vec<Op>, Term)>;

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..NUM_SLOTS).prop_map(Op::Load),
        4 => (0..NUM_SLOTS).prop_map(Op::Store),
        1 => (0..NUM_SLOTS).prop_map(Op::VolatileStore),
        1 => Just(Op::Call),
    ]
}

fn term_strategy() -> impl Strategy<Value = Term> {
    prop_oneof![
        1 => Just(Term::Missing),
        2 => Just(Term::Ret),
        3 => (0..MAX_BLOCKS).prop_map(Term::Jump),
        3 => (0..MAX_BLOCKS, 0..MAX_BLOCKS).prop_map(|(a, b)| Term::Br(a, b)),
    ]
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    prop::collection::vec(
        (prop::collection::vec(op_strategy(), 0..6), term_strategy()),
        1..=MAX_BLOCKS,
    )
}

fn succs(term: &Term, num_blocks: usize) -> Vec<usize> {
    match term {
        Term::Missing | Term::Ret => Vec::new(),
        Term::Jump(dest) => vec![dest % num_blocks],
        Term::Br(then_dest, else_dest) => vec![then_dest % num_blocks, else_dest % num_blocks],
    }
}

fn reachable(shape: &Shape) -> HashSet<usize> {
    let mut visited = HashSet::new();
    let mut worklist = vec![0];
    while let Some(block) = worklist.pop() {
        if visited.insert(block) {
            worklist.extend(succs(&shape[block].1, shape.len()));
        }
    }
    visited
}

/// Whether a load of `slot` is reachable from `pos` in `block` without an
/// intervening store to `slot`.
fn is_read_later(shape: &Shape, block: usize, pos: usize, slot: usize) -> bool {
    let mut worklist = vec![(block, pos)];
    let mut entered = HashSet::new();

    while let Some((block, start)) = worklist.pop() {
        let (ops, term) = &shape[block];

        let mut overwritten = false;
        for op in &ops[start..] {
            match op {
                Op::Load(s) if *s == slot => return true,
                Op::Store(s) if *s == slot => {
                    overwritten = true;
                    break;
                }
                _ => {}
            }
        }

        if overwritten {
            continue;
        }

        for succ in succs(term, shape.len()) {
            if entered.insert(succ) {
                worklist.push((succ, 0));
            }
        }
    }

    false
}

struct Built {
    ctx: Context,
    func: Func,
    blocks: Vec<Block>,
    /// Every non-volatile store with its block and position in the shape.
    stores: Vec<(Inst, usize, usize)>,
}

fn build(shape: &Shape) -> Built {
    let mut ctx = Context::default();
    let func = Func::new(&mut ctx, "random");
    let slots: Vec<Slot> = (0..NUM_SLOTS)
        .map(|i| Slot::new(&mut ctx, format!("s{}", i)))
        .collect();
    let blocks: Vec<Block> = (0..shape.len())
        .map(|i| common::block(&mut ctx, func, &format!("bb{}", i)))
        .collect();

    let mut stores = Vec::new();

    for (index, (ops, term)) in shape.iter().enumerate() {
        let block = blocks[index];
        for (pos, op) in ops.iter().enumerate() {
            match op {
                Op::Load(slot) => {
                    common::load(&mut ctx, block, slots[*slot]);
                }
                Op::Store(slot) => {
                    let inst = common::store(&mut ctx, block, slots[*slot]);
                    stores.push((inst, index, pos));
                }
                Op::VolatileStore(slot) => {
                    common::volatile_store(&mut ctx, block, slots[*slot]);
                }
                Op::Call => {
                    common::call(&mut ctx, block, "opaque");
                }
            }
        }

        let num_blocks = shape.len();
        match term {
            Term::Missing => {}
            Term::Ret => {
                common::ret(&mut ctx, block);
            }
            Term::Jump(dest) => {
                common::jump(&mut ctx, block, blocks[dest % num_blocks]);
            }
            Term::Br(then_dest, else_dest) => {
                common::br(
                    &mut ctx,
                    block,
                    blocks[then_dest % num_blocks],
                    blocks[else_dest % num_blocks],
                );
            }
        }
    }

    Built {
        ctx,
        func,
        blocks,
        stores,
    }
}

fn expected_dead(shape: &Shape, built: &Built) -> HashSet<Inst> {
    let reachable = reachable(shape);
    built
        .stores
        .iter()
        .filter(|(_, block, _)| reachable.contains(block))
        .filter(|(_, block, pos)| {
            let slot = match shape[*block].0[*pos] {
                Op::Store(slot) => slot,
                Op::Load(_) | Op::VolatileStore(_) | Op::Call => unreachable!(),
            };
            !is_read_later(shape, *block, pos + 1, slot)
        })
        .map(|(inst, _, _)| *inst)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    /// The collected stores are exactly the ones no path reads.
    #[test]
    fn prop_dead_stores_match_path_search(shape in shape_strategy()) {
        let built = build(&shape);
        let liveness = StoreLiveness::new(&built.ctx, built.func).unwrap();

        prop_assert!(liveness.check_fixed_point(&built.ctx).is_ok());

        let dead: HashSet<Inst> = liveness.dead_stores(&built.ctx).into_iter().collect();
        prop_assert_eq!(dead, expected_dead(&shape, &built));
    }

    /// Erasing removes the dead stores and nothing else, and a second run
    /// finds nothing more.
    #[test]
    fn prop_elimination_is_exact_and_idempotent(shape in shape_strategy()) {
        let mut built = build(&shape);
        let dead = expected_dead(&shape, &built);

        let before: Vec<Vec<Inst>> = built
            .blocks
            .iter()
            .map(|block| common::insts(&built.ctx, *block))
            .collect();

        let changed = eliminate_dead_stores(&mut built.ctx, built.func).unwrap();
        prop_assert_eq!(changed, !dead.is_empty());

        for (block, before) in built.blocks.iter().zip(before) {
            let after = common::insts(&built.ctx, *block);
            let expected: Vec<Inst> = before.into_iter().filter(|inst| !dead.contains(inst)).collect();
            prop_assert_eq!(after, expected);
        }

        let once = common::dump(&built.ctx, built.func);
        prop_assert!(!eliminate_dead_stores(&mut built.ctx, built.func).unwrap());
        prop_assert_eq!(common::dump(&built.ctx, built.func), once);
    }
}
