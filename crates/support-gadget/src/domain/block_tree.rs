//! Block tree
//!
//! Append-only arena of accepted blocks rooted at genesis. Parent links are
//! arena handles, so the tree cannot contain a cycle and every walk is an
//! integer-indexed loop bounded by block height.

use super::block::{Block, BlockId, BlockProposal};
use crate::error::{GadgetError, GadgetResult};

/// Append-only block arena, indexed by `BlockId`
#[derive(Clone, Debug)]
pub struct BlockTree {
    blocks: Vec<Block>,
}

impl Default for BlockTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockTree {
    /// Create a tree holding only genesis
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// Number of accepted blocks, genesis included
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        id.index() < self.blocks.len()
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    /// Look up a block, failing with `UnknownBlock`
    pub fn block(&self, id: BlockId) -> GadgetResult<&Block> {
        self.get(id).ok_or(GadgetError::UnknownBlock { block: id })
    }

    pub fn height_of(&self, id: BlockId) -> GadgetResult<u64> {
        self.block(id).map(|b| b.height)
    }

    pub fn parent_of(&self, id: BlockId) -> GadgetResult<Option<BlockId>> {
        self.block(id).map(|b| b.parent)
    }

    /// Blocks in acceptance order
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Accept a proposal into the arena. Height is derived from the parent.
    pub fn insert(&mut self, proposal: BlockProposal) -> GadgetResult<BlockId> {
        let block = self.next_block(proposal)?;
        Ok(self.append(block))
    }

    /// The block `proposal` would become if inserted now, without
    /// touching the arena.
    pub fn next_block(&self, proposal: BlockProposal) -> GadgetResult<Block> {
        let parent_height = self
            .get(proposal.parent)
            .map(|p| p.height)
            .ok_or_else(|| GadgetError::UnknownParent {
                parent: proposal.parent,
                label: proposal.label.clone(),
            })?;

        let id = BlockId(self.blocks.len());
        Ok(Block::from_proposal(id, parent_height + 1, proposal))
    }

    /// Push a block built by `next_block` with no insert in between
    pub(crate) fn append(&mut self, block: Block) -> BlockId {
        debug_assert_eq!(block.id.index(), self.blocks.len());
        let id = block.id;
        self.blocks.push(block);
        id
    }

    /// Drop every block accepted after the first `count`. Genesis stays.
    pub(crate) fn truncate(&mut self, count: usize) {
        self.blocks.truncate(count.max(1));
    }

    /// Blocks from `descendant` (inclusive) up to `boundary`'s height
    /// (exclusive), nearest-to-`descendant` first.
    ///
    /// Empty when both sit at the same height. The walk stops on height
    /// alone: if `boundary` is not really an ancestor the result is not an
    /// ancestral segment, so callers resolve the common ancestor first.
    pub fn ancestors_between(
        &self,
        descendant: BlockId,
        boundary: BlockId,
    ) -> GadgetResult<Vec<BlockId>> {
        let start = self.block(descendant)?;
        let boundary_height = self.height_of(boundary)?;
        if boundary_height > start.height {
            return Err(GadgetError::BoundaryAboveDescendant {
                descendant,
                descendant_height: start.height,
                boundary,
                boundary_height,
            });
        }

        let mut blocks = Vec::with_capacity((start.height - boundary_height) as usize);
        let mut cursor = start;
        while cursor.height > boundary_height {
            blocks.push(cursor.id);
            cursor = self.step_up(cursor)?;
        }
        Ok(blocks)
    }

    /// Nearest block from which both `a` and `b` are reachable via parent links.
    ///
    /// Genesis in the worst case.
    pub fn common_ancestor(&self, a: BlockId, b: BlockId) -> GadgetResult<BlockId> {
        let mut left = self.block(a)?;
        let mut right = self.block(b)?;

        while left.height > right.height {
            left = self.step_up(left)?;
        }
        while right.height > left.height {
            right = self.step_up(right)?;
        }
        while left.id != right.id {
            left = self.step_up(left)?;
            right = self.step_up(right)?;
        }
        Ok(left.id)
    }

    /// The segment a vote for `target` adds on top of `last`, if `target`
    /// continues the chain through `last`.
    ///
    /// `Some(empty)` when `target == last`; `None` for any other relation
    /// (ancestor of `last`, sibling, diverging branch).
    pub fn forward_path(
        &self,
        last: BlockId,
        target: BlockId,
    ) -> GadgetResult<Option<Vec<BlockId>>> {
        if target == last {
            self.block(target)?;
            return Ok(Some(Vec::new()));
        }
        if self.height_of(target)? <= self.height_of(last)? {
            return Ok(None);
        }

        let path = self.ancestors_between(target, last)?;
        let oldest_parent = match path.last() {
            Some(&oldest) => self.parent_of(oldest)?,
            None => None,
        };
        Ok((oldest_parent == Some(last)).then_some(path))
    }

    fn step_up(&self, block: &Block) -> GadgetResult<&Block> {
        let parent = block
            .parent
            .ok_or(GadgetError::WalkedPastGenesis { block: block.id })?;
        self.block(parent)
    }
}
