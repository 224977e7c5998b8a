//! Welcome to `memsched`!
//!
//! A discrete-event simulator of two non-preemptive CPU scheduling
//! policies (FCFS and SJF) sitting on top of a contiguous-partition
//! memory allocator (first-fit or best-fit, with coalescing).

mod process;
mod analyze;

pub mod algo;
pub mod procset;
pub mod helpe;
pub mod logger;

pub use crate::helpe::*;

/// Our fundamental unit of interest. A [`Process`] describes some
/// work that needs [`burst_time`](Process::burst_time) ticks of CPU
/// and [`memory_required`](Process::memory_required) bytes of
/// contiguous memory, becoming eligible at
/// [`arrival_time`](Process::arrival_time).
///
/// The outcome fields are `None` until the scheduler actually admits
/// and runs the process. A process which fails admission keeps them
/// `None` forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub pid:                u32,
    pub arrival_time:       Ticks,
    pub burst_time:         Ticks,
    pub memory_required:    ByteSteps,
    // Starts equal to `burst_time`. Neither FCFS nor SJF ever
    // touches it; preemptive policies would.
    pub remaining_time:     Ticks,
    pub start_time:         Option<Ticks>,
    pub completion_time:    Option<Ticks>,
}

/// A contiguous partition `[start, start + size)` of the simulated
/// address space. A block is free iff it has no owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlock {
    pub start:  ByteSteps,
    pub size:   ByteSteps,
    pub owner:  Option<u32>,
}

/// Owns the address-ordered list of [`MemoryBlock`]s which
/// covers `[0, total)` at all times.
///
/// Between any two calls the following hold:
/// - blocks are sorted by `start`,
/// - each block begins where the previous one ends,
/// - after a [`deallocate`](MemoryManager::deallocate), no two
///   neighbouring blocks are both free.
#[derive(Debug, Clone)]
pub struct MemoryManager {
    blocks: Vec<MemoryBlock>,
    total:  ByteSteps,
}
