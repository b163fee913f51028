//! The in-memory chain: an append-only sequence rooted at genesis.

use time::OffsetDateTime;

use crate::model::Block;
use crate::validate::{check_block, validate_chain, ChainError, Rejection};

/// Source of block timestamps, in Unix seconds.
pub trait Clock: Send {
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }
}

/// Append-only chain. Never empty: genesis is inserted at construction and
/// blocks are only ever pushed after passing validation.
pub struct Chain {
    blocks: Vec<Block>,
    clock: Box<dyn Clock>,
}

impl Chain {
    /// New chain seeded with genesis, timestamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        let genesis = Block::genesis(clock.now());
        tracing::debug!(timestamp = genesis.timestamp(), "chain seeded with genesis");
        Self {
            blocks: vec![genesis],
            clock: Box::new(clock),
        }
    }

    pub fn genesis(&self) -> &Block {
        self.blocks
            .first()
            .expect("chain is seeded with genesis and never shrinks")
    }

    /// Last appended block.
    pub fn latest(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain is seeded with genesis and never shrinks")
    }

    /// Every block in append order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, index: u64) -> Option<&Block> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: genesis is never removed.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Validate `candidate` against the current latest block and push it on
    /// success. A rejected candidate leaves the chain untouched.
    pub fn append(&mut self, candidate: Block) -> Result<(), Rejection> {
        if let Err(reason) = check_block(&candidate, self.latest()) {
            tracing::debug!(
                index = candidate.index(),
                hash = candidate.hash(),
                %reason,
                "block rejected"
            );
            return Err(reason);
        }
        tracing::info!(
            index = candidate.index(),
            hash = candidate.hash(),
            "block appended"
        );
        self.blocks.push(candidate);
        Ok(())
    }

    /// Build a block carrying `data` on top of the latest block and append
    /// it. Returns the block only if it is now part of the chain.
    pub fn create_new_block(&mut self, data: impl Into<String>) -> Result<Block, Rejection> {
        let candidate = Block::successor(self.latest(), data, self.clock.now());
        self.append(candidate.clone())?;
        Ok(candidate)
    }

    /// Re-validate every held block.
    pub fn audit(&self) -> Result<(), ChainError> {
        validate_chain(&self.blocks)
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}
