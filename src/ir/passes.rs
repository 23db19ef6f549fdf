pub mod dse;
pub mod store_liveness;
