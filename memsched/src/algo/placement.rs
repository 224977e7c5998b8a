use crate::helpe::*;

impl MemoryBlock {
    #[inline(always)]
    pub fn new(start: ByteSteps, size: ByteSteps) -> Self {
        Self {
            start,
            size,
            owner: None,
        }
    }

    #[inline(always)]
    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// First address past the block.
    #[inline(always)]
    pub fn end(&self) -> ByteSteps {
        self.start + self.size
    }

    #[inline(always)]
    pub fn fits(&self, request: ByteSteps) -> bool {
        self.is_free() && self.size >= request
    }
}

impl fmt::Display for MemoryBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Start: {}, Size: {}, Free: {}]", self.start, self.size, self.is_free())
    }
}

/// Picks the index of the block that should host a request
/// of `request` bytes, if any.
///
/// First-fit returns the lowest-addressed free block that is big
/// enough. Best-fit returns the smallest such block; among equals,
/// the lowest-addressed one wins.
pub fn find_block(
    blocks:     &[MemoryBlock],
    request:    ByteSteps,
    strategy:   Strategy,
) -> Option<usize> {
    let mut candidates = blocks.iter()
        .enumerate()
        .filter(|(_, b)| b.fits(request));

    match strategy {
        Strategy::FirstFit  => candidates.next().map(|(idx, _)| idx),
        // Ties resolve to the first, i.e. lowest-addressed, minimum.
        Strategy::BestFit   => candidates
            .min_by_key(|(_, b)| b.size)
            .map(|(idx, _)| idx),
    }
}

impl MemoryManager {
    /// A manager whose whole `[0, total)` range is one free block.
    pub fn new(total: ByteSteps) -> Result<Self, ConfigError> {
        if total == 0 {
            return Err(ConfigError::ZeroMemory);
        }

        Ok(Self {
            blocks: vec![MemoryBlock::new(0, total)],
            total,
        })
    }

    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    pub fn total(&self) -> ByteSteps {
        self.total
    }

    /// Tries to reserve `process.memory_required` contiguous bytes
    /// for `process`. Returns `false` if no single free block is big
    /// enough--regardless of how much memory is free in total.
    pub fn allocate(&mut self, process: &Process, strategy: Strategy) -> bool {
        let request = process.memory_required;
        let Some(idx) = find_block(&self.blocks, request, strategy) else {
            log::trace!("No {} block of {} bytes for P{}", strategy, request, process.pid);
            return false;
        };

        let chosen = &mut self.blocks[idx];
        let remainder = chosen.size - request;
        chosen.size = request;
        chosen.owner = Some(process.pid);
        log::trace!("P{} placed at offset {}", process.pid, chosen.start);

        if remainder > 0 {
            // The leftover stays free, right after the chosen block.
            let leftover = MemoryBlock::new(chosen.start + request, remainder);
            self.blocks.insert(idx + 1, leftover);
        }
        debug_assert!(crate::analyze::blocks_are_valid(&self.blocks, self.total), "Bad split!");

        true
    }

    /// Frees every block owned by `pid`, then coalesces neighbouring
    /// free blocks. Unknown `pid`s are a no-op.
    pub fn deallocate(&mut self, pid: u32) {
        for block in self.blocks.iter_mut().filter(|b| b.owner == Some(pid)) {
            block.owner = None;
        }
        self.merge();
        debug_assert!(crate::analyze::blocks_are_valid(&self.blocks, self.total), "Bad merge!");
        debug_assert!(crate::analyze::is_coalesced(&self.blocks), "Adjacent free blocks left!");
    }

    // Don't advance `i` after a merge: the grown block may
    // have yet another free neighbour.
    fn merge(&mut self) {
        let mut i = 0;
        while i + 1 < self.blocks.len() {
            if self.blocks[i].is_free() && self.blocks[i + 1].is_free() {
                let absorbed = self.blocks.remove(i + 1);
                log::trace!("Merging {} into block at {}", absorbed, self.blocks[i].start);
                self.blocks[i].size += absorbed.size;
            } else {
                i += 1;
            }
        }
    }

    /// The block currently owned by `pid`, if any.
    pub fn owner_of(&self, pid: u32) -> Option<&MemoryBlock> {
        self.blocks
            .iter()
            .find(|b| b.owner == Some(pid))
    }

    /// Total free bytes, contiguous or not.
    pub fn free_memory(&self) -> ByteSteps {
        self.blocks
            .iter()
            .filter(|b| b.is_free())
            .fold(0, |sum, b| sum + b.size)
    }

    /// Size of the biggest request that would currently succeed.
    pub fn largest_free_block(&self) -> ByteSteps {
        self.blocks
            .iter()
            .filter(|b| b.is_free())
            .map(|b| b.size)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{blocks_are_valid, is_coalesced};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn proc_of(pid: u32, mem: ByteSteps) -> Process {
        Process::new(pid, 0, 1, mem)
    }

    fn layout(mm: &MemoryManager) -> Vec<(ByteSteps, ByteSteps, Option<u32>)> {
        mm.blocks()
            .iter()
            .map(|b| (b.start, b.size, b.owner))
            .collect()
    }

    /// Builds free holes of sizes [40, 10, 30] separated by
    /// 5-byte allocations owned by pids 100 and 101.
    fn holes_40_10_30() -> MemoryManager {
        let mut mm = MemoryManager::new(90).unwrap();
        for (pid, mem) in [(1, 40), (100, 5), (2, 10), (101, 5), (3, 30)] {
            assert!(mm.allocate(&proc_of(pid, mem), Strategy::FirstFit));
        }
        mm.deallocate(1);
        mm.deallocate(2);
        mm.deallocate(3);
        assert_eq!(
            layout(&mm),
            vec![(0, 40, None), (40, 5, Some(100)), (45, 10, None), (55, 5, Some(101)), (60, 30, None)]
        );

        mm
    }

    #[test]
    fn zero_memory_is_rejected() {
        assert_eq!(MemoryManager::new(0).unwrap_err(), ConfigError::ZeroMemory);
    }

    #[test]
    fn starts_as_one_free_block() {
        let mm = MemoryManager::new(150).unwrap();
        assert_eq!(mm.total(), 150);
        assert_eq!(layout(&mm), vec![(0, 150, None)]);
        assert_eq!(mm.free_memory(), 150);
        assert_eq!(mm.largest_free_block(), 150);
    }

    #[test]
    fn allocation_splits_block() {
        let mut mm = MemoryManager::new(150).unwrap();
        assert!(mm.allocate(&proc_of(1, 50), Strategy::FirstFit));
        assert_eq!(layout(&mm), vec![(0, 50, Some(1)), (50, 100, None)]);
        assert_eq!(mm.owner_of(1), Some(&mm.blocks()[0]));
        assert_eq!(mm.owner_of(2), None);
    }

    #[test]
    fn exact_fit_does_not_split() {
        let mut mm = MemoryManager::new(64).unwrap();
        assert!(mm.allocate(&proc_of(1, 64), Strategy::BestFit));
        assert_eq!(layout(&mm), vec![(0, 64, Some(1))]);
        assert!(!mm.allocate(&proc_of(2, 1), Strategy::BestFit));
    }

    #[test]
    fn oversized_request_fails_without_side_effects() {
        let mut mm = MemoryManager::new(100).unwrap();
        assert!(!mm.allocate(&proc_of(1, 101), Strategy::FirstFit));
        assert_eq!(layout(&mm), vec![(0, 100, None)]);
    }

    #[test]
    fn fragmentation_defeats_large_request() {
        let mut mm = MemoryManager::new(30).unwrap();
        for (pid, mem) in [(1, 10), (2, 10), (3, 10)] {
            assert!(mm.allocate(&proc_of(pid, mem), Strategy::FirstFit));
        }
        mm.deallocate(1);
        mm.deallocate(3);
        assert_eq!(mm.free_memory(), 20);
        assert!(!mm.allocate(&proc_of(4, 15), Strategy::FirstFit));
        assert!(!mm.allocate(&proc_of(4, 15), Strategy::BestFit));
        assert_eq!(layout(&mm), vec![(0, 10, None), (10, 10, Some(2)), (20, 10, None)]);
    }

    #[test]
    fn first_fit_and_best_fit_diverge() {
        let mut first = holes_40_10_30();
        let mut best = first.clone();

        assert_eq!(find_block(first.blocks(), 10, Strategy::FirstFit), Some(0));
        assert_eq!(find_block(best.blocks(), 10, Strategy::BestFit), Some(2));

        assert!(first.allocate(&proc_of(9, 10), Strategy::FirstFit));
        assert_eq!(first.owner_of(9).map(|b| b.start), Some(0));
        assert!(best.allocate(&proc_of(9, 10), Strategy::BestFit));
        assert_eq!(best.owner_of(9).map(|b| b.start), Some(45));
    }

    #[test]
    fn best_fit_ties_go_to_lowest_address() {
        let mut mm = MemoryManager::new(50).unwrap();
        for (pid, mem) in [(1, 10), (2, 10), (3, 10), (4, 20)] {
            assert!(mm.allocate(&proc_of(pid, mem), Strategy::FirstFit));
        }
        mm.deallocate(1);
        mm.deallocate(3);
        assert_eq!(find_block(mm.blocks(), 8, Strategy::BestFit), Some(0));
    }

    #[test]
    fn freeing_middle_block_coalesces_both_sides() {
        let mut mm = MemoryManager::new(30).unwrap();
        for (pid, mem) in [(1, 10), (2, 10), (3, 10)] {
            assert!(mm.allocate(&proc_of(pid, mem), Strategy::FirstFit));
        }
        mm.deallocate(1);
        mm.deallocate(3);
        mm.deallocate(2);
        assert_eq!(layout(&mm), vec![(0, 30, None)]);
    }

    #[test]
    fn deallocate_is_idempotent() {
        let mut mm = MemoryManager::new(100).unwrap();
        assert!(mm.allocate(&proc_of(1, 30), Strategy::FirstFit));
        assert!(mm.allocate(&proc_of(2, 30), Strategy::FirstFit));
        mm.deallocate(1);
        let once = layout(&mm);
        mm.deallocate(1);
        assert_eq!(layout(&mm), once);
        mm.deallocate(42);
        assert_eq!(layout(&mm), once);
    }

    #[test]
    fn random_sequences_conserve_memory() {
        const TOTAL: ByteSteps = 1000;
        let mut rng = StdRng::seed_from_u64(7);
        for strategy in [Strategy::FirstFit, Strategy::BestFit] {
            let mut mm = MemoryManager::new(TOTAL).unwrap();
            let mut live: Vec<u32> = vec![];
            for pid in 0..2_000u32 {
                if !live.is_empty() && rng.gen_bool(0.45) {
                    let victim = live.swap_remove(rng.gen_range(0..live.len()));
                    mm.deallocate(victim);
                    assert!(is_coalesced(mm.blocks()));
                } else if mm.allocate(&proc_of(pid, rng.gen_range(1..=120)), strategy) {
                    live.push(pid);
                }
                assert!(blocks_are_valid(mm.blocks(), TOTAL));
                assert_eq!(mm.blocks().iter().map(|b| b.size).sum::<ByteSteps>(), TOTAL);
                assert_eq!(mm.blocks().iter().filter(|b| !b.is_free()).count(), live.len());
            }
            for pid in live.drain(..) {
                mm.deallocate(pid);
            }
            assert_eq!(layout(&mm), vec![(0, TOTAL, None)]);
        }
    }
}
