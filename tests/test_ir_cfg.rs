use common::{CfgBlock, CfgContext, CfgFunc};
use orzdse::{
    ir::{Context, Func},
    utils::cfg::{CfgInfo, CfgRegion},
};

mod common;

fn sorted_preds(cfg_info: &CfgInfo<CfgBlock>, block: CfgBlock) -> Vec<CfgBlock> {
    let mut preds = cfg_info.preds(block).unwrap().to_vec();
    preds.sort_by_key(|block| block.id());
    preds
}

#[test]
fn test_cfg_info_0() {
    let mut arena = CfgContext::default();
    let bb0 = CfgBlock::new(&mut arena);
    let bb1 = CfgBlock::new(&mut arena);
    let bb2 = CfgBlock::new(&mut arena);
    let bb3 = CfgBlock::new(&mut arena);
    let bb4 = CfgBlock::new(&mut arena);
    let bb5 = CfgBlock::new(&mut arena);
    let bb6 = CfgBlock::new(&mut arena);

    // bb7 unreachable
    let bb7 = CfgBlock::new(&mut arena);

    bb0.add_succ(&mut arena, bb1);
    bb0.add_succ(&mut arena, bb2);
    bb0.add_succ(&mut arena, bb4);

    bb1.add_succ(&mut arena, bb3);
    bb2.add_succ(&mut arena, bb3);

    bb3.add_succ(&mut arena, bb4);

    bb4.add_succ(&mut arena, bb5);

    bb5.add_succ(&mut arena, bb0);
    bb5.add_succ(&mut arena, bb1);
    bb5.add_succ(&mut arena, bb6);

    bb7.add_succ(&mut arena, bb6);

    //   bb7     bb0 -----+ <-+
    //    |      / \      |   |
    //    |     /   \     |   |
    //    | +-> bb1 bb2   |   |
    //    | |     \ /     |   |
    //    | |     bb3     |   |
    //    | |      |      |   |
    //    | |     bb4 <---+   |
    //    | |      |          |
    //    | +---- bb5 --------+
    //    |        |
    //    +-----> bb6

    let func = CfgFunc::new(&mut arena, bb0);

    let cfg_info = func.cfg_info(&arena);

    assert_eq!(cfg_info.succs(bb0).unwrap(), [bb1, bb2, bb4]);
    assert_eq!(cfg_info.succs(bb1).unwrap(), [bb3]);
    assert_eq!(cfg_info.succs(bb2).unwrap(), [bb3]);
    assert_eq!(cfg_info.succs(bb3).unwrap(), [bb4]);
    assert_eq!(cfg_info.succs(bb4).unwrap(), [bb5]);
    assert_eq!(cfg_info.succs(bb5).unwrap(), [bb0, bb1, bb6]);
    assert_eq!(cfg_info.succs(bb6).unwrap(), []);

    assert_eq!(sorted_preds(&cfg_info, bb0), [bb5]);
    assert_eq!(sorted_preds(&cfg_info, bb1), [bb0, bb5]);
    assert_eq!(sorted_preds(&cfg_info, bb2), [bb0]);
    assert_eq!(sorted_preds(&cfg_info, bb3), [bb1, bb2]);
    assert_eq!(sorted_preds(&cfg_info, bb4), [bb0, bb3]);
    assert_eq!(sorted_preds(&cfg_info, bb5), [bb4]);
    // the edge from bb7 is not recorded
    assert_eq!(sorted_preds(&cfg_info, bb6), [bb5]);

    assert!(!cfg_info.is_reachable(bb7));
    assert_eq!(cfg_info.succs(bb7), None);
    assert_eq!(cfg_info.preds(bb7), None);
}

#[test]
fn test_cfg_info_duplicate_edge() {
    let mut arena = CfgContext::default();
    let bb0 = CfgBlock::new(&mut arena);
    let bb1 = CfgBlock::new(&mut arena);

    bb0.add_succ(&mut arena, bb1);
    bb0.add_succ(&mut arena, bb1);

    let func = CfgFunc::new(&mut arena, bb0);

    let cfg_info = func.cfg_info(&arena);

    assert_eq!(cfg_info.succs(bb0).unwrap(), [bb1]);
    assert_eq!(cfg_info.preds(bb1).unwrap(), [bb0]);
}

#[test]
fn test_cfg_info_ir_branch_to_same_block() {
    let mut ctx = Context::default();
    let func = Func::new(&mut ctx, "f");

    let entry = common::block(&mut ctx, func, "entry");
    let exit = common::block(&mut ctx, func, "exit");

    common::br(&mut ctx, entry, exit, exit);
    common::ret(&mut ctx, exit);

    let cfg_info = func.cfg_info(&ctx);

    assert_eq!(cfg_info.succs(entry).unwrap(), [exit]);
    assert_eq!(cfg_info.preds(exit).unwrap(), [entry]);
    assert_eq!(cfg_info.preds(entry).unwrap(), []);
}
