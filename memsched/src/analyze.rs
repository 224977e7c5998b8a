use crate::helpe::*;

/// Checks that `blocks` tile `[0, total)` exactly: sorted by
/// start, no gaps, no overlaps, no empty blocks.
pub fn blocks_are_valid(blocks: &[MemoryBlock], total: ByteSteps) -> bool {
    let mut expected_start = 0;
    for b in blocks {
        if b.start != expected_start || b.size == 0 { return false; }
        expected_start = b.end();
    }

    expected_start == total
}

/// No two neighbouring blocks are both free.
pub fn is_coalesced(blocks: &[MemoryBlock]) -> bool {
    blocks.iter()
        .tuple_windows()
        .all(|(a, b)| !(a.is_free() && b.is_free()))
}

/// How much of the free memory is unusable by a request as big as
/// all of it, in `[0, 1)`. Zero when free memory is one block (or none).
pub fn external_fragmentation(mm: &MemoryManager) -> f64 {
    let free = mm.free_memory();
    if free == 0 { return 0.0; }

    1.0 - mm.largest_free_block() as f64 / free as f64
}

/// Aggregate figures over a finished simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub completed:          usize,
    pub skipped:            usize,
    // Clock value at the last completion.
    pub makespan:           Ticks,
    pub avg_turnaround:     f64,
    pub avg_waiting:        f64,
    // Busy ticks over makespan.
    pub cpu_utilization:    f64,
}

impl Summary {
    pub fn of(outcome: &Outcome) -> Self {
        let done = &outcome.completed;
        let makespan = done.iter()
            .filter_map(|p| p.completion_time)
            .max()
            .unwrap_or(0);
        let (turnaround_sum, waiting_sum) = done.iter()
            .fold((0.0, 0.0), |(t, w), p| {
                (t + p.turnaround_time().unwrap_or(0) as f64, w + p.waiting_time().unwrap_or(0) as f64)
            });
        let avg = |sum: f64| if done.is_empty() { 0.0 } else { sum / done.len() as f64 };
        let busy = get_total_burst(done);

        Self {
            completed:          done.len(),
            skipped:            outcome.skipped.len(),
            makespan,
            avg_turnaround:     avg(turnaround_sum),
            avg_waiting:        avg(waiting_sum),
            cpu_utilization:    if makespan == 0 { 0.0 } else { busy as f64 / makespan as f64 },
        }
    }
}
