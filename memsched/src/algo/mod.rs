pub mod placement;
mod fcfs;
mod sjf;

use crate::helpe::*;

/// Drives processes through the CPU, reserving their memory
/// right before they run and releasing it right after.
///
/// Every [Scheduler] owns its own [MemoryManager] and clock, so
/// independent simulations never share state.
#[derive(Debug, Clone)]
pub struct Scheduler {
    memory:     MemoryManager,
    strategy:   Strategy,
}

/// Why a process never ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InsufficientMemory,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InsufficientMemory => write!(f, "insufficient memory"),
        }
    }
}

/// A process that failed admission at its turn. It is never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skip {
    pub pid:    u32,
    pub reason: SkipReason,
    // Clock value at the failed admission.
    pub at:     Ticks,
}

/// What a simulation produces: completed processes in the order
/// they ran, and the processes that never got memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub completed:  Vec<Process>,
    pub skipped:    Vec<Skip>,
}

impl Outcome {
    pub fn completed_pids(&self) -> Vec<u32> {
        self.completed.iter().map(|p| p.pid).collect()
    }

    pub fn skipped_pids(&self) -> Vec<u32> {
        self.skipped.iter().map(|s| s.pid).collect()
    }
}

impl Scheduler {
    pub fn new(memory_size: ByteSteps, strategy: Strategy) -> Result<Self, ConfigError> {
        Ok(Self {
            memory: MemoryManager::new(memory_size)?,
            strategy,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }

    /// Runs `processes` under `policy`.
    pub fn simulate(&mut self, policy: Policy, processes: Vec<Process>) -> Result<Outcome, ProcessError> {
        match policy {
            Policy::Fcfs    => self.simulate_fcfs(processes),
            Policy::Sjf     => self.simulate_sjf(processes),
        }
    }

    /// Admission, run and release of one process, shared by both
    /// policies. On success the process is appended to `outcome`
    /// and the new clock value is returned. On failure a [Skip] is
    /// recorded and the clock does not move.
    fn admit_and_run(&mut self, mut p: Process, clock: Ticks, outcome: &mut Outcome) -> Ticks {
        if !self.memory.allocate(&p, self.strategy) {
            log::warn!("Process {} skipped due to insufficient memory.", p.pid);
            outcome.skipped.push(Skip {
                pid:    p.pid,
                reason: SkipReason::InsufficientMemory,
                at:     clock,
            });
            return clock;
        }

        let done = p.run_from(clock);
        log::debug!("t={clock} P{} admitted, completes at t={done}", p.pid);
        self.memory.deallocate(p.pid);
        outcome.completed.push(p);

        done
    }
}
