use std::collections::BTreeSet;

use super::cell::{CellId, ChunkId};

/// Rectangular block of cells rebuilt as one mesh unit.
#[derive(Debug, Clone)]
pub struct HexGridChunk {
    /// Chunk column and row in the chunk grid.
    pub(super) offset: (usize, usize),
    /// Cells in local row-major order.
    pub(super) cells: Vec<CellId>,
}

impl HexGridChunk {
    pub(super) fn new(offset: (usize, usize), capacity: usize) -> Self {
        Self {
            offset,
            cells: Vec::with_capacity(capacity),
        }
    }

    pub fn offset(&self) -> (usize, usize) {
        self.offset
    }

    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }
}

/// Chunks waiting for a rebuild.
///
/// Marking an already dirty chunk is a no-op, so any burst of edits collapses
/// into one rebuild per chunk when the set is drained.
#[derive(Debug, Default, Clone)]
pub struct DirtyChunks(BTreeSet<ChunkId>);

impl DirtyChunks {
    pub fn mark(&mut self, chunk: ChunkId) {
        self.0.insert(chunk);
    }

    pub fn contains(&self, chunk: ChunkId) -> bool {
        self.0.contains(&chunk)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Empties the set, returning chunk ids in ascending order.
    pub fn drain(&mut self) -> Vec<ChunkId> {
        std::mem::take(&mut self.0).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marking_twice_coalesces() {
        let mut dirty = DirtyChunks::default();
        dirty.mark(4);
        dirty.mark(1);
        dirty.mark(4);
        assert_eq!(dirty.len(), 2);
        assert_eq!(dirty.drain(), vec![1, 4]);
        assert!(dirty.is_empty());
    }

    #[test]
    fn chunk_keeps_insertion_order() {
        let mut chunk = HexGridChunk::new((1, 2), 4);
        chunk.cells.extend([7, 3, 9]);
        assert_eq!(chunk.cells(), &[7, 3, 9]);
        assert_eq!(chunk.offset(), (1, 2));
    }
}
