//! Append-only, hash-linked block chain.
//!
//! [`Chain`] owns the blocks and only appends candidates that pass
//! [`check_block`] against its current tail. The same checks are exposed
//! for validating blocks and whole chains received from elsewhere.

pub mod chain;
pub mod cli;
pub mod import;
pub mod logging;
pub mod model;
pub mod routes;
pub mod validate;

pub use chain::{Chain, Clock, SystemClock};
pub use model::{
    compute_hash, validate_structure, Block, GENESIS_DATA, GENESIS_HASH, GENESIS_PREVIOUS_HASH,
};
pub use validate::{
    audit_raw_chain, check_block, check_raw_block, is_block_valid, is_raw_block_valid,
    validate_chain, ChainError, Rejection,
};
