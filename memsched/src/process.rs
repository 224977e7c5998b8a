use crate::helpe::*;

impl Process {
    /// Creates a fresh, not yet scheduled [Process].
    pub fn new(
        pid:                u32,
        arrival_time:       Ticks,
        burst_time:         Ticks,
        memory_required:    ByteSteps,
    ) -> Self {
        Self {
            pid,
            arrival_time,
            burst_time,
            memory_required,
            remaining_time:     burst_time,
            start_time:         None,
            completion_time:    None,
        }
    }

    /// Returns `true` if the process is eligible at moment `t`.
    #[inline(always)]
    pub fn has_arrived_by(&self, t: Ticks) -> bool {
        self.arrival_time <= t
    }

    /// Stamps the outcome of running the process to completion,
    /// starting at `t`. Returns the completion time.
    #[inline(always)]
    pub fn run_from(&mut self, t: Ticks) -> Ticks {
        debug_assert!(self.start_time.is_none(), "P{} ran twice", self.pid);
        let done = t + self.burst_time;
        self.start_time = Some(t);
        self.completion_time = Some(done);

        done
    }

    /// Time from arrival to completion.
    pub fn turnaround_time(&self) -> Option<Ticks> {
        self.completion_time.map(|c| c - self.arrival_time)
    }

    /// Time from arrival to first getting the CPU.
    pub fn waiting_time(&self) -> Option<Ticks> {
        self.start_time.map(|s| s - self.arrival_time)
    }
}

fn show(t: Option<Ticks>) -> String {
    match t {
        Some(v) => v.to_string(),
        None    => String::from("None"),
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P{}(arrival={}, burst={}, mem={}, start={}, complete={})",
            self.pid,
            self.arrival_time,
            self.burst_time,
            self.memory_required,
            show(self.start_time),
            show(self.completion_time),
        )
    }
}
