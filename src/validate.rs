//! Pairwise and whole-chain validation.
//!
//! The pairwise check runs in a fixed order and stops at the first failure:
//!
//! 1. predecessor is structurally valid
//! 2. candidate is structurally valid
//! 3. `candidate.index == predecessor.index + 1`
//! 4. `candidate.previous_hash == predecessor.hash`
//! 5. recomputed hash equals `candidate.hash`
//!
//! Typed [`Block`] values cannot be malformed, so [`check_block`] starts at
//! step 3. Untrusted JSON goes through [`check_raw_block`], which runs all
//! five.

use serde_json::Value;
use thiserror::Error;

use crate::model::Block;

/// Why a candidate block was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("predecessor block is malformed")]
    MalformedPredecessor,

    #[error("candidate block is malformed")]
    MalformedCandidate,

    /// `expected` is `None` when the predecessor index has no successor.
    #[error("index {found} does not follow the predecessor")]
    IndexMismatch { expected: Option<u64>, found: u64 },

    #[error("previous hash does not match predecessor hash")]
    PreviousHashMismatch,

    #[error("stored hash does not match recomputed hash")]
    HashMismatch,
}

/// Why a whole chain was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain is empty")]
    Empty,

    #[error("first block is not the genesis block")]
    GenesisMismatch,

    #[error("block at position {position} rejected: {reason}")]
    InvalidBlock { position: usize, reason: Rejection },
}

/// Linkage and hash checks of `candidate` against `predecessor`.
pub fn check_block(candidate: &Block, predecessor: &Block) -> Result<(), Rejection> {
    let expected = predecessor.index().checked_add(1);
    if expected != Some(candidate.index()) {
        return Err(Rejection::IndexMismatch {
            expected,
            found: candidate.index(),
        });
    }
    if candidate.previous_hash() != predecessor.hash() {
        return Err(Rejection::PreviousHashMismatch);
    }
    if candidate.recompute_hash() != candidate.hash() {
        return Err(Rejection::HashMismatch);
    }
    Ok(())
}

/// Boolean form of [`check_block`].
pub fn is_block_valid(candidate: &Block, predecessor: &Block) -> bool {
    check_block(candidate, predecessor).is_ok()
}

/// Full five-step check over untrusted input.
pub fn check_raw_block(candidate: &Value, predecessor: &Value) -> Result<(), Rejection> {
    let predecessor = Block::from_value(predecessor).ok_or(Rejection::MalformedPredecessor)?;
    let candidate = Block::from_value(candidate).ok_or(Rejection::MalformedCandidate)?;
    check_block(&candidate, &predecessor)
}

/// Boolean form of [`check_raw_block`].
pub fn is_raw_block_valid(candidate: &Value, predecessor: &Value) -> bool {
    check_raw_block(candidate, predecessor).is_ok()
}

/// Validate a whole chain, stopping at the first bad block.
///
/// Block 0 must be the genesis block; every later block must pass
/// [`check_block`] against the one before it.
pub fn validate_chain(blocks: &[Block]) -> Result<(), ChainError> {
    let genesis = blocks.first().ok_or(ChainError::Empty)?;
    if !genesis.is_genesis() {
        return Err(ChainError::GenesisMismatch);
    }
    blocks
        .windows(2)
        .enumerate()
        .try_for_each(|(i, pair)| {
            check_block(&pair[1], &pair[0]).map_err(|reason| ChainError::InvalidBlock {
                position: i + 1,
                reason,
            })
        })
}

/// Audit an untrusted chain and report every failing position.
///
/// An empty result means the chain is valid. A malformed block shows up
/// twice: once as a malformed candidate and once as a malformed
/// predecessor of the block after it.
pub fn audit_raw_chain(values: &[Value]) -> Vec<ChainError> {
    let Some(first) = values.first() else {
        return vec![ChainError::Empty];
    };

    let mut errors = vec![];
    let genesis_ok = Block::from_value(first).is_some_and(|b| b.is_genesis());
    if !genesis_ok {
        errors.push(ChainError::GenesisMismatch);
    }

    for (i, pair) in values.windows(2).enumerate() {
        if let Err(reason) = check_raw_block(&pair[1], &pair[0]) {
            errors.push(ChainError::InvalidBlock {
                position: i + 1,
                reason,
            });
        }
    }
    errors
}
