use crate::helpe::*;

impl Scheduler {
    /// Non-preemptive shortest-job-first.
    ///
    /// Whenever the CPU frees up, every process that has arrived by
    /// then joins the ready queue, and the one with the smallest burst
    /// runs to completion. Equal bursts go in arrival order.
    ///
    /// A selected process that does not fit is dropped from the queue
    /// and never reconsidered, exactly like FCFS skips. This also means
    /// the loop always terminates: each iteration either consumes a
    /// queued process or moves the clock to a later arrival.
    pub fn simulate_sjf(&mut self, processes: Vec<Process>) -> Result<Outcome, ProcessError> {
        let mut pending = by_arrival(init(processes)?).into_iter().peekable();
        let mut ready: Vec<Process> = vec![];
        let mut outcome = Outcome::default();
        let mut clock: Ticks = 0;

        while pending.peek().is_some() || !ready.is_empty() {
            while let Some(p) = pending.next_if(|p| p.has_arrived_by(clock)) {
                ready.push(p);
            }

            // `position_min_by_key` keeps the first of several minima,
            // i.e. the earliest arrival among equal bursts.
            if let Some(idx) = ready.iter().position_min_by_key(|p| p.burst_time) {
                let next = ready.remove(idx);
                clock = self.admit_and_run(next, clock, &mut outcome);
            } else if let Some(p) = pending.peek() {
                clock = p.arrival_time;
            }
        }

        Ok(outcome)
    }
}
